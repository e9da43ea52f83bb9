// file: src/delegation/command.rs
// version: 1.0.0
// guid: 90ce6ddf-5497-41f5-999e-ecdbbdb45077

//! Grant or revoke Full Control on the DFS configuration objects

use super::request::DelegationRequest;
use super::targets::{build_ace_specs, DFS_DELEGATION_TARGETS};
use crate::directory::{AceApplier, AceStatus, NamingContextResolver};
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Per-object result of one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AceReport {
    pub target_path: String,
    pub status: AceStatus,
}

/// Aggregate result of one invocation
#[derive(Debug, Clone, Serialize)]
pub struct DelegationOutcome {
    pub group_identity: String,
    pub remove: bool,
    pub naming_context: String,
    /// Number of ACE operations that succeeded
    pub applied_count: usize,
    /// True only when every ACE operation succeeded
    pub success: bool,
    pub entries: Vec<AceReport>,
    pub completed_at: DateTime<Utc>,
}

/// Applies or removes the DFS delegation ACEs for one group
pub struct DelegationCommand {
    resolver: Box<dyn NamingContextResolver>,
    applier: Box<dyn AceApplier>,
}

impl DelegationCommand {
    pub fn new(resolver: Box<dyn NamingContextResolver>, applier: Box<dyn AceApplier>) -> Self {
        Self { resolver, applier }
    }

    /// Run the delegation.
    ///
    /// ACEs are processed in table order. A collaborator error aborts the run
    /// immediately; ACEs already applied are left in place.
    pub async fn execute(&self, request: &DelegationRequest) -> Result<DelegationOutcome> {
        let action = if request.remove() { "remove" } else { "add" };
        debug!(
            group = request.group_identity(),
            remove = request.remove(),
            "Starting DFS delegation"
        );

        let naming_context = self.resolver.default_naming_context().await?;

        let mut entries = Vec::with_capacity(DFS_DELEGATION_TARGETS.len());
        let mut applied_count = 0;

        for spec in build_ace_specs(&naming_context) {
            debug!("Requesting {} of {:?} on {}", action, spec.rights, spec.target_path);
            let status = self
                .applier
                .apply_or_remove_ace(&spec, request.group_identity(), request.remove())
                .await?;
            debug!("{}: {}", spec.target_path, status);

            if status.is_success() {
                applied_count += 1;
            }
            entries.push(AceReport {
                target_path: spec.target_path,
                status,
            });
        }

        let success = applied_count == DFS_DELEGATION_TARGETS.len();
        if success {
            if request.remove() {
                info!(
                    "DFS delegation removed for {} on {}",
                    request.group_identity(),
                    naming_context
                );
            } else {
                info!(
                    "DFS delegation applied for {} on {}",
                    request.group_identity(),
                    naming_context
                );
            }
        } else {
            warn!(
                "DFS delegation {} for {} incomplete: {} of {} ACE operations succeeded",
                action,
                request.group_identity(),
                applied_count,
                DFS_DELEGATION_TARGETS.len()
            );
        }
        debug!("Finished DFS delegation");

        Ok(DelegationOutcome {
            group_identity: request.group_identity().to_string(),
            remove: request.remove(),
            naming_context,
            applied_count,
            success,
            entries,
            completed_at: Utc::now(),
        })
    }
}
