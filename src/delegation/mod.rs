// file: src/delegation/mod.rs
// version: 1.0.0
// guid: bd7c515e-9ab2-47cf-8da3-ad5b1a5519ed

//! DFS delegation: request validation, target table and the command itself

pub mod command;
pub mod request;
pub mod targets;

pub use command::{AceReport, DelegationCommand, DelegationOutcome};
pub use request::DelegationRequest;
pub use targets::{build_ace_specs, AceTarget, DFS_DELEGATION_TARGETS};
