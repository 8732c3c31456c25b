// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Service configuration.
//!
//! ```toml
//! state_file = "/var/lib/broker/dynamic-security.json"
//! log_level = "info"
//! admin_client_id = "dynsec-cli"
//! admin_username = "admin"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Dynamic-security configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynsecConfig {
    /// JSON state file holding the persisted policy.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Client id recorded in audit lines for commands applied locally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_client_id: Option<String>,

    /// Username recorded in audit lines for commands applied locally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_username: Option<String>,
}

fn default_state_file() -> PathBuf {
    PathBuf::from("dynamic-security.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DynsecConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            log_level: default_log_level(),
            admin_client_id: None,
            admin_username: None,
        }
    }
}

impl DynsecConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.state_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("state_file must not be empty".into()));
        }

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Unknown log_level '{}' (expected one of {})",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}
