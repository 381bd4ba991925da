//! Configuration management for Toolgate
//!
//! This module handles loading, parsing, and validating configuration from
//! a YAML file. A missing file is not an error: every setting has a
//! default, so `toolgate` runs out of the box.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, ToolgateError};
use crate::transport::TransportConfig;

/// Main configuration structure for Toolgate
///
/// Currently a single `transport:` section carrying the retry/timeout
/// policy applied to every transport the CLI constructs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Transport retry/timeout policy
    #[serde(default)]
    pub transport: TransportConfig,
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// Returns the defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    ///
    /// # Examples
    ///
    /// ```
    /// use toolgate::config::Config;
    ///
    /// let config = Config::load("does/not/exist.yaml").unwrap();
    /// assert_eq!(config.transport.timeout_ms, 30_000);
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file absent, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&raw)?;
        Ok(config)
    }

    /// Validate the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ToolgateError::Config`] when a setting is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.transport.timeout_ms == 0 {
            return Err(
                ToolgateError::Config("transport.timeout_ms must be positive".to_string()).into(),
            );
        }
        if self.transport.retry_attempts == 0 {
            return Err(ToolgateError::Config(
                "transport.retry_attempts must be at least 1".to_string(),
            )
            .into());
        }
        Ok(())
    }
}
