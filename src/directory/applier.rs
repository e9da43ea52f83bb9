// file: src/directory/applier.rs
// version: 1.0.0
// guid: a3ee62ca-1a7c-47fc-baa7-2e9fbd3c1903

//! ACE application seam

use super::acl::{AceSpec, AceStatus};
use crate::Result;
use tracing::info;

/// Adds or removes a single ACE on a directory object.
///
/// Implementations must be idempotent: adding an ACE that is already present
/// or removing one that is absent reports [`AceStatus::AlreadyInPlace`].
/// `Err` is reserved for conditions where the state of the object is unknown
/// (unreachable directory, missing tool, unreadable ACL).
#[async_trait::async_trait]
pub trait AceApplier: Send + Sync {
    async fn apply_or_remove_ace(
        &self,
        spec: &AceSpec,
        identity: &str,
        remove: bool,
    ) -> Result<AceStatus>;
}

/// Applier that only logs the change it would make
#[derive(Debug, Default)]
pub struct DryRunAceApplier;

#[async_trait::async_trait]
impl AceApplier for DryRunAceApplier {
    async fn apply_or_remove_ace(
        &self,
        spec: &AceSpec,
        identity: &str,
        remove: bool,
    ) -> Result<AceStatus> {
        info!(
            "DRY RUN: Would {} {} {:?} for {} on {}",
            if remove { "remove" } else { "add" },
            spec.access.as_str(),
            spec.rights,
            identity,
            spec.target_path
        );
        Ok(AceStatus::Planned)
    }
}
