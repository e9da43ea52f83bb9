// file: src/directory/naming.rs
// version: 1.1.0
// guid: a65e2d17-e169-43c2-b332-a2d93df6647c

//! Default naming context resolution

use crate::config::LdapConfig;
use crate::Result;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, Scope, SearchEntry};
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_NAMING_CONTEXT_ATTR: &str = "defaultNamingContext";

/// Resolves the root distinguished name of the current domain
#[async_trait::async_trait]
pub trait NamingContextResolver: Send + Sync {
    async fn default_naming_context(&self) -> Result<String>;
}

/// Resolver returning a preconfigured naming context
pub struct StaticNamingContext {
    naming_context: String,
}

impl StaticNamingContext {
    pub fn new(naming_context: impl Into<String>) -> Self {
        Self {
            naming_context: naming_context.into(),
        }
    }
}

#[async_trait::async_trait]
impl NamingContextResolver for StaticNamingContext {
    async fn default_naming_context(&self) -> Result<String> {
        debug!("Using configured naming context {}", self.naming_context);
        Ok(self.naming_context.clone())
    }
}

/// Resolver reading `defaultNamingContext` from the RootDSE of a domain controller
pub struct LdapNamingContextResolver {
    config: LdapConfig,
}

impl LdapNamingContextResolver {
    pub fn new(config: LdapConfig) -> Self {
        Self { config }
    }

    async fn read_naming_context(
        &self,
        ldap: &mut Ldap,
        timeout: Duration,
    ) -> Result<Option<String>> {
        if let (Some(dn), Some(password)) = (&self.config.bind_dn, &self.config.bind_password) {
            debug!("Binding as {}", dn);
            ldap.with_timeout(timeout)
                .simple_bind(dn, password)
                .await?
                .success()?;
        }

        let (entries, _res) = ldap
            .with_timeout(timeout)
            .search(
                "",
                Scope::Base,
                "(objectClass=*)",
                vec![DEFAULT_NAMING_CONTEXT_ATTR],
            )
            .await?
            .success()?;

        Ok(entries
            .into_iter()
            .map(SearchEntry::construct)
            .find_map(|entry| first_attr_value(&entry, DEFAULT_NAMING_CONTEXT_ATTR)))
    }
}

#[async_trait::async_trait]
impl NamingContextResolver for LdapNamingContextResolver {
    async fn default_naming_context(&self) -> Result<String> {
        let timeout = Duration::from_secs(self.config.timeout_secs);
        let settings = LdapConnSettings::new().set_conn_timeout(timeout);

        debug!("Connecting to {}", self.config.url);
        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &self.config.url).await?;
        ldap3::drive!(conn);

        // Unbind whether or not the lookup succeeded
        let lookup = self.read_naming_context(&mut ldap, timeout).await;
        if let Err(e) = ldap.unbind().await {
            debug!("Unbind from {} failed: {}", self.config.url, e);
        }
        let naming_context = lookup?;

        match naming_context {
            Some(nc) => {
                info!("Resolved default naming context: {}", nc);
                Ok(nc)
            }
            None => Err(crate::error::DelegationError::directory(format!(
                "RootDSE at {} has no {} attribute",
                self.config.url, DEFAULT_NAMING_CONTEXT_ATTR
            ))),
        }
    }
}

/// First non-empty value of an attribute, matching the name case-insensitively
fn first_attr_value(entry: &SearchEntry, attr: &str) -> Option<String> {
    entry
        .attrs
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(attr))
        .and_then(|(_, values)| values.iter().find(|v| !v.trim().is_empty()))
        .cloned()
}
