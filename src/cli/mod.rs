// file: src/cli/mod.rs
// version: 1.0.0
// guid: c4153e2a-bc74-420c-8d3a-3e89cba0c3b7

//! Command line interface for DFS delegation

pub mod args;
pub mod commands;

pub use args::Cli;
pub use commands::{delegate_command, delegate_with, Collaborators};
