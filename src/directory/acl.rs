// file: src/directory/acl.rs
// version: 1.0.0
// guid: e3e0f9d2-4f46-46a4-b20c-9ecf034b9296

//! Access control entry descriptions for directory objects

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Directory rights that can be granted through an ACE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveDirectoryRights {
    /// Full control over the object
    GenericAll,
    GenericRead,
    GenericWrite,
    GenericExecute,
}

impl ActiveDirectoryRights {
    /// Permission code understood by `dsacls /G`
    pub fn dsacls_code(&self) -> &'static str {
        match self {
            ActiveDirectoryRights::GenericAll => "GA",
            ActiveDirectoryRights::GenericRead => "GR",
            ActiveDirectoryRights::GenericWrite => "GW",
            ActiveDirectoryRights::GenericExecute => "GE",
        }
    }

    /// Label `dsacls` prints in an ACL listing
    pub fn listing_label(&self) -> &'static str {
        match self {
            ActiveDirectoryRights::GenericAll => "FULL CONTROL",
            ActiveDirectoryRights::GenericRead => "GENERIC READ",
            ActiveDirectoryRights::GenericWrite => "GENERIC WRITE",
            ActiveDirectoryRights::GenericExecute => "GENERIC EXECUTE",
        }
    }
}

/// Whether the ACE allows or denies its rights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessControlType {
    Allow,
    Deny,
}

impl AccessControlType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessControlType::Allow => "Allow",
            AccessControlType::Deny => "Deny",
        }
    }
}

/// Which objects below the target inherit the ACE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityInheritance {
    /// The target object only
    None,
    /// The target object and all descendants
    All,
    /// All descendants, not the target itself
    Descendents,
    /// Immediate children only
    Children,
}

impl SecurityInheritance {
    /// Flag for `dsacls /I:`, `None` when no inheritance flag is passed
    pub fn dsacls_flag(&self) -> Option<&'static str> {
        match self {
            SecurityInheritance::None => None,
            SecurityInheritance::All => Some("T"),
            SecurityInheritance::Descendents => Some("S"),
            SecurityInheritance::Children => Some("P"),
        }
    }
}

/// A single ACE to add to or remove from one directory object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AceSpec {
    /// Distinguished name of the object carrying the ACE
    pub target_path: String,
    pub rights: ActiveDirectoryRights,
    pub access: AccessControlType,
    /// Object type the ACE is limited to; nil applies to all object types
    pub object_type: Uuid,
    pub inheritance: SecurityInheritance,
}

impl AceSpec {
    /// An inheritable Allow ACE covering all object types
    pub fn allow_all(target_path: impl Into<String>, rights: ActiveDirectoryRights) -> Self {
        Self {
            target_path: target_path.into(),
            rights,
            access: AccessControlType::Allow,
            object_type: Uuid::nil(),
            inheritance: SecurityInheritance::All,
        }
    }
}

/// Result of applying or removing one ACE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AceStatus {
    /// The ACL was modified
    Changed,
    /// Nothing to do: the ACE was already present (add) or absent (remove)
    AlreadyInPlace,
    /// Dry run, nothing was modified
    Planned,
    /// The directory refused the change
    Failed,
}

impl AceStatus {
    pub fn is_success(&self) -> bool {
        !matches!(self, AceStatus::Failed)
    }
}

impl fmt::Display for AceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AceStatus::Changed => "changed",
            AceStatus::AlreadyInPlace => "already in place",
            AceStatus::Planned => "planned",
            AceStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}
