// file: src/lib.rs
// version: 1.0.0
// guid: a5a56939-b958-46e4-8baf-7c1514a0392e

//! # DFS Delegation
//!
//! Grants or revokes Full Control over the DFS configuration containers of an
//! Active Directory domain (`CN=DFSR-GlobalSettings` and `CN=Dfs-Configuration`
//! under `CN=System`) for a single group.

pub mod cli;
pub mod config;
pub mod delegation;
pub mod directory;
pub mod error;
pub mod logging;

pub use error::{DelegationError, Result};

/// Version information for the utility
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
