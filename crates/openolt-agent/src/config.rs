//! Agent configuration.
//!
//! Loaded from an optional YAML file; every field has a default so an empty
//! file (or no file) yields a usable configuration. Command-line flags are
//! applied on top by the binary.
//!
//! ```yaml
//! device_id: 0
//! command_queue_depth: 16
//! enable_on_startup: true
//! enable:
//!   fallback_pon_ports: 2
//!   config_error_policy: fallback
//! logging:
//!   level: info
//!   format: json
//! ```

use crate::olt::OltOrchConfig;
use openolt_bal::api::host::{BAL_MAX_OLTS, BAL_MAX_PON_INTERFACES};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid configuration for {field}: {message}")]
    Invalid { field: String, message: String },
}

impl ConfigError {
    fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    /// BAL id of the OLT this agent manages.
    pub device_id: u32,
    /// Pending management commands the daemon buffers.
    pub command_queue_depth: usize,
    /// Enable the OLT once when the daemon starts.
    pub enable_on_startup: bool,
    pub enable: OltOrchConfig,
    pub logging: LoggingConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            command_queue_depth: 16,
            enable_on_startup: true,
            enable: OltOrchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AgentConfig {
    /// Reads and validates a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Parses and validates YAML text. Empty text yields the defaults.
    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        let config: AgentConfig = if text.trim().is_empty() {
            AgentConfig::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.device_id >= BAL_MAX_OLTS {
            return Err(ConfigError::invalid(
                "device_id",
                format!("must be below {}", BAL_MAX_OLTS),
            ));
        }
        if !(1..=BAL_MAX_PON_INTERFACES).contains(&self.enable.fallback_pon_ports) {
            return Err(ConfigError::invalid(
                "enable.fallback_pon_ports",
                format!("must be between 1 and {}", BAL_MAX_PON_INTERFACES),
            ));
        }
        if self.command_queue_depth == 0 {
            return Err(ConfigError::invalid(
                "command_queue_depth",
                "must be at least 1",
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid("logging.level", "must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::olt::ConfigErrorPolicy;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(AgentConfig::from_yaml_str("").unwrap(), AgentConfig::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AgentConfig::from_yaml_str(
            "device_id: 3\nenable:\n  config_error_policy: fatal\n",
        )
        .unwrap();

        assert_eq!(config.device_id, 3);
        assert_eq!(config.enable.config_error_policy, ConfigErrorPolicy::Fatal);
        assert_eq!(config.enable.fallback_pon_ports, 1);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = AgentConfig::from_yaml_str("device_idd: 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation() {
        let err = AgentConfig::from_yaml_str("enable:\n  fallback_pon_ports: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "enable.fallback_pon_ports"));

        let err = AgentConfig::from_yaml_str("enable:\n  fallback_pon_ports: 4294967295\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "enable.fallback_pon_ports"));

        let yaml = format!("enable:\n  fallback_pon_ports: {}\n", BAL_MAX_PON_INTERFACES);
        assert_eq!(
            AgentConfig::from_yaml_str(&yaml).unwrap().enable.fallback_pon_ports,
            BAL_MAX_PON_INTERFACES
        );

        let err = AgentConfig::from_yaml_str(&format!("device_id: {}\n", BAL_MAX_OLTS)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "device_id"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "device_id: 1\nenable:\n  fallback_pon_ports: 2\nlogging:\n  format: pretty"
        )
        .unwrap();

        let config = AgentConfig::load(file.path()).unwrap();
        assert_eq!(config.device_id, 1);
        assert_eq!(config.enable.fallback_pon_ports, 2);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_load_missing_file() {
        let err = AgentConfig::load("/nonexistent/openolt-agent.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/openolt-agent.yaml"));
    }
}
