// file: src/delegation/request.rs
// version: 1.0.0
// guid: 31f24a98-de14-45a4-a4d0-4008b3709787

//! Delegation request validation

use serde::Serialize;
use validator::Validate;

/// A validated request to grant or revoke DFS delegation for one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct DelegationRequest {
    #[validate(length(min = 1, message = "group identity cannot be empty"))]
    group_identity: String,
    remove: bool,
}

impl DelegationRequest {
    /// Build a request, rejecting empty or whitespace-only identities
    pub fn new(group_identity: &str, remove: bool) -> crate::Result<Self> {
        let request = Self {
            group_identity: group_identity.trim().to_string(),
            remove,
        };

        request.validate().map_err(|e| {
            crate::error::DelegationError::validation(format!("Invalid delegation request: {}", e))
        })?;

        Ok(request)
    }

    pub fn group_identity(&self) -> &str {
        &self.group_identity
    }

    /// True when the ACEs should be removed instead of added
    pub fn remove(&self) -> bool {
        self.remove
    }
}
