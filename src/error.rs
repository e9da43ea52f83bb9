// file: src/error.rs
// version: 1.0.0
// guid: 1ef91b49-b27c-457b-9458-9a2539a98733

use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, DelegationError>;

/// Error types for DFS delegation
#[derive(Error, Debug)]
pub enum DelegationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Directory error: {0}")]
    Directory(String),

    #[error("LDAP error: {0}")]
    Ldap(#[from] ldap3::LdapError),

    #[error("Process error running {command}: {stderr} (exit code {exit_code:?})")]
    Process {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl DelegationError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new directory error
    pub fn directory(msg: impl Into<String>) -> Self {
        Self::Directory(msg.into())
    }

    /// Create a process error for a command that could not be started
    pub fn process(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::Process {
            command: command.into(),
            exit_code: None,
            stderr: stderr.into(),
        }
    }
}
