// file: src/config/mod.rs
// version: 1.0.0
// guid: ee28be34-ee5a-4b83-8f9b-48a8d381d55a

//! Configuration module for DFS delegation
//!
//! Describes how to reach the directory and where to find `dsacls`.

pub mod loader;

use serde::{Deserialize, Serialize};
use url::Url;

/// Default LDAP operation timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level tool configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DelegationConfig {
    /// Directory connection settings
    #[serde(default)]
    pub ldap: LdapConfig,
    /// Fixed naming context; skips the RootDSE lookup when set
    #[serde(default)]
    pub naming_context: Option<String>,
    /// NetBIOS domain used to qualify bare group names (e.g. `EXAMPLE`)
    #[serde(default)]
    pub domain: Option<String>,
    /// Explicit path to dsacls.exe
    #[serde(default)]
    pub dsacls_path: Option<String>,
}

/// LDAP connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LdapConfig {
    /// LDAP URL of a domain controller
    #[serde(default = "default_ldap_url")]
    pub url: String,
    /// Bind DN for a simple bind; anonymous when absent
    #[serde(default)]
    pub bind_dn: Option<String>,
    /// Bind password (supports environment variable substitution)
    #[serde(default)]
    pub bind_password: Option<String>,
    /// Connection and operation timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LdapConfig {
    fn default() -> Self {
        Self {
            url: default_ldap_url(),
            bind_dn: None,
            bind_password: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_ldap_url() -> String {
    match std::env::var("USERDNSDOMAIN") {
        Ok(domain) if !domain.trim().is_empty() => {
            format!("ldap://{}", domain.trim().to_lowercase())
        }
        _ => "ldap://localhost".to_string(),
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl DelegationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        self.ldap.validate()?;

        if let Some(nc) = &self.naming_context {
            if !nc.to_ascii_uppercase().contains("DC=") {
                return Err(crate::error::DelegationError::validation(format!(
                    "Naming context must contain at least one DC= component: {}",
                    nc
                )));
            }
        }

        if let Some(domain) = &self.domain {
            if domain.trim().is_empty() || domain.contains('\\') {
                return Err(crate::error::DelegationError::validation(format!(
                    "Invalid NetBIOS domain: {:?}",
                    domain
                )));
            }
        }

        Ok(())
    }
}

impl LdapConfig {
    /// Validate the connection settings
    pub fn validate(&self) -> crate::Result<()> {
        let url = Url::parse(&self.url).map_err(|e| {
            crate::error::DelegationError::validation(format!(
                "Invalid LDAP URL {}: {}",
                self.url, e
            ))
        })?;

        if !matches!(url.scheme(), "ldap" | "ldaps" | "ldapi") {
            return Err(crate::error::DelegationError::validation(format!(
                "Unsupported LDAP URL scheme: {}",
                url.scheme()
            )));
        }

        if self.bind_dn.is_some() && self.bind_password.is_none() {
            return Err(crate::error::DelegationError::validation(
                "bind_password is required when bind_dn is set",
            ));
        }

        if self.timeout_secs == 0 {
            return Err(crate::error::DelegationError::validation(
                "timeout_secs must be greater than zero",
            ));
        }

        Ok(())
    }
}
