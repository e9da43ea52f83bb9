// file: src/config/loader.rs
// version: 1.0.0
// guid: 64d19348-d13d-4699-93a9-7ecbd69f976a

//! Configuration file loading and environment variable substitution

use super::DelegationConfig;
use crate::Result;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
    env_vars: HashMap<String, String>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self {
            env_vars: std::env::vars().collect(),
        }
    }

    /// Default config location, `<config_dir>/dfs-delegation/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dfs-delegation").join("config.yaml"))
    }

    /// Load the config from an explicit path, the default location, or built-in defaults
    pub fn load(&self, path: Option<&str>) -> Result<DelegationConfig> {
        if let Some(path) = path {
            let expanded = shellexpand::tilde(path);
            return self.load_config(expanded.as_ref());
        }

        match Self::default_path() {
            Some(default) if default.exists() => self.load_config(default),
            _ => {
                debug!("No configuration file found, using defaults");
                let config = DelegationConfig::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Load configuration from YAML file
    pub fn load_config<P: AsRef<Path>>(&self, path: P) -> Result<DelegationConfig> {
        let content = fs::read_to_string(&path).map_err(|e| {
            crate::error::DelegationError::config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        debug!("Loaded configuration from {}", path.as_ref().display());

        let expanded = self.expand_env_vars(&content)?;
        let config: DelegationConfig = serde_yaml::from_str(&expanded)?;

        config.validate()?;

        Ok(config)
    }

    /// Expand environment variables in configuration content
    fn expand_env_vars(&self, content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            crate::error::DelegationError::config(format!("Invalid regex pattern: {}", e))
        })?;

        let mut result = content.to_string();
        let mut missing_vars = Vec::new();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];

            if let Some(value) = self.env_vars.get(var_name) {
                result = result.replace(placeholder, value);
            } else if !missing_vars.iter().any(|v| v == var_name) {
                missing_vars.push(var_name.to_string());
            }
        }

        if !missing_vars.is_empty() {
            return Err(crate::error::DelegationError::config(format!(
                "Missing environment variables: {}",
                missing_vars.join(", ")
            )));
        }

        Ok(result)
    }

    /// Set environment variable for substitution
    pub fn set_env_var(&mut self, key: String, value: String) {
        self.env_vars.insert(key, value);
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
