//! Analyzer configuration
//!
//! Loaded from a JSON file; every field is optional and falls back to the
//! defaults below.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::Severity;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings that shape semantic analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Reserved keyspace holding cluster metadata (default: "system")
    #[serde(default = "default_system_keyspace")]
    pub system_keyspace: String,

    /// Reject writes into the system keyspace (default: true)
    #[serde(default = "default_system_namespace_readonly")]
    pub system_namespace_readonly: bool,

    /// Smallest accepted USING TTL (default: 0, meaning no expiry)
    #[serde(default = "default_min_ttl_seconds")]
    pub min_ttl_seconds: i64,

    /// Largest accepted USING TTL (default: 20 years)
    #[serde(default = "default_max_ttl_seconds")]
    pub max_ttl_seconds: i64,

    /// Minimum severity written by the logger (default: "INFO")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_system_keyspace() -> String {
    "system".to_string()
}
fn default_system_namespace_readonly() -> bool {
    true
}
fn default_min_ttl_seconds() -> i64 {
    0
}
fn default_max_ttl_seconds() -> i64 {
    630_720_000
} // 20 * 365 days
fn default_log_level() -> String {
    "INFO".to_string()
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            system_keyspace: default_system_keyspace(),
            system_namespace_readonly: default_system_namespace_readonly(),
            min_ttl_seconds: default_min_ttl_seconds(),
            max_ttl_seconds: default_max_ttl_seconds(),
            log_level: default_log_level(),
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse and validate configuration JSON
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: AnalyzerConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.system_keyspace.is_empty() {
            return Err(ConfigError::Invalid(
                "system_keyspace must not be empty".into(),
            ));
        }

        if self.min_ttl_seconds < 0 {
            return Err(ConfigError::Invalid(
                "min_ttl_seconds must be >= 0".into(),
            ));
        }

        if self.min_ttl_seconds > self.max_ttl_seconds {
            return Err(ConfigError::Invalid(format!(
                "min_ttl_seconds ({}) exceeds max_ttl_seconds ({})",
                self.min_ttl_seconds, self.max_ttl_seconds
            )));
        }

        if self.log_severity().is_none() {
            return Err(ConfigError::Invalid(format!(
                "Unknown log_level: '{}'",
                self.log_level
            )));
        }

        Ok(())
    }

    /// True if `seconds` is an acceptable TTL
    pub fn is_valid_ttl(&self, seconds: i64) -> bool {
        (self.min_ttl_seconds..=self.max_ttl_seconds).contains(&seconds)
    }

    /// Parsed `log_level`
    pub fn log_severity(&self) -> Option<Severity> {
        Severity::parse(&self.log_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AnalyzerConfig::default());
        assert_eq!(config.system_keyspace, "system");
        assert!(config.system_namespace_readonly);
        assert_eq!(config.max_ttl_seconds, 630720000);
        assert_eq!(config.log_severity(), Some(Severity::Info));
    }

    #[test]
    fn test_ttl_bounds() {
        let config = AnalyzerConfig::default();
        assert!(config.is_valid_ttl(0));
        assert!(config.is_valid_ttl(630720000));
        assert!(!config.is_valid_ttl(-1));
        assert!(!config.is_valid_ttl(630720001));
    }

    #[test]
    fn test_inverted_ttl_range_rejected() {
        let result =
            AnalyzerConfig::from_json_str(r#"{"min_ttl_seconds": 10, "max_ttl_seconds": 5}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let result = AnalyzerConfig::from_json_str(r#"{"log_level": "LOUD"}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result = AnalyzerConfig::from_json_str("{not json");
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }
}
