// file: src/logging/mod.rs
// version: 1.0.0
// guid: 1a990ab3-580f-444e-a93e-a8fbec2a08f4

//! Logging system for DFS delegation

pub mod logger;

pub use logger::{init_logger, with_async_operation_span};
