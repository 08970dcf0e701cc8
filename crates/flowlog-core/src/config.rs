//! Configuration for flow event reporting
//!
//! Holds the reporter identity stamped onto every event a [`FlowLogger`]
//! creates, plus output settings. Loadable from TOML, JSON, or the
//! environment.
//!
//! [`FlowLogger`]: crate::FlowLogger

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builder::ReporterDraft;

/// Environment variable names read by [`FlowLoggerConfig::from_env`].
pub const ENV_DEPLOYMENT: &str = "FLOWLOG_DEPLOYMENT";
pub const ENV_NAME: &str = "FLOWLOG_NAME";
pub const ENV_VERSION: &str = "FLOWLOG_VERSION";
pub const ENV_CONTAINER_ID: &str = "FLOWLOG_CONTAINER_ID";
pub const ENV_INSTANCE: &str = "FLOWLOG_INSTANCE";

/// Configuration loading/validation error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The config document could not be parsed
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A value is present but unusable
    #[error("Invalid config value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Default reporter identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    pub deployment: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub container_id: Option<String>,
    pub instance: Option<String>,
}

impl ReporterConfig {
    /// Apply the configured values to a reporter draft.
    pub(crate) fn apply(&self, mut draft: ReporterDraft) -> ReporterDraft {
        if let Some(v) = &self.deployment {
            draft = draft.deployment(v.clone());
        }
        if let Some(v) = &self.name {
            draft = draft.name(v.clone());
        }
        if let Some(v) = &self.version {
            draft = draft.version(v.clone());
        }
        if let Some(v) = &self.container_id {
            draft = draft.container_id(v.clone());
        }
        if let Some(v) = &self.instance {
            draft = draft.instance(v.clone());
        }
        draft
    }

    fn fields(&self) -> [(&'static str, &Option<String>); 5] {
        [
            ("reporter.deployment", &self.deployment),
            ("reporter.name", &self.name),
            ("reporter.version", &self.version),
            ("reporter.container_id", &self.container_id),
            ("reporter.instance", &self.instance),
        ]
    }
}

/// Flow logger configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowLoggerConfig {
    /// Emit indented JSON instead of one line per event
    pub pretty: bool,
    /// Reporter identity applied to every event
    pub reporter: ReporterConfig,
}

impl FlowLoggerConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Build the reporter identity from `FLOWLOG_*` environment variables.
    ///
    /// Unset or empty variables leave the field unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            pretty: false,
            reporter: ReporterConfig {
                deployment: get(ENV_DEPLOYMENT),
                name: get(ENV_NAME),
                version: get(ENV_VERSION),
                container_id: get(ENV_CONTAINER_ID),
                instance: get(ENV_INSTANCE),
            },
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in self.reporter.fields() {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: field.to_string(),
                        message: "must not be blank".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = FlowLoggerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.reporter, ReporterConfig::default());
    }

    #[test]
    fn test_toml_parsing() {
        let config = FlowLoggerConfig::from_toml(
            r#"
            pretty = true

            [reporter]
            deployment = "prod"
            name = "billing"
            container_id = "c-42"
            "#,
        )
        .unwrap();
        assert!(config.pretty);
        assert_eq!(config.reporter.deployment.as_deref(), Some("prod"));
        assert_eq!(config.reporter.container_id.as_deref(), Some("c-42"));
        assert_eq!(config.reporter.version, None);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = FlowLoggerConfig::new();
        config.reporter.name = Some("svc".into());
        let parsed = FlowLoggerConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_json_serialization() {
        let mut config = FlowLoggerConfig::new();
        config.reporter.instance = Some("i-1".into());
        let parsed = FlowLoggerConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_blank_value_rejected() {
        let mut config = FlowLoggerConfig::new();
        config.reporter.name = Some("  ".into());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("reporter.name"));
    }

    #[test]
    fn test_load_file() {
        let file = config_file(
            r#"
            [reporter]
            name = "billing"
            instance = "i-7"
            "#,
        );
        let config = FlowLoggerConfig::load(file.path()).unwrap();
        assert!(!config.pretty);
        assert_eq!(config.reporter.name.as_deref(), Some("billing"));
        assert_eq!(config.reporter.instance.as_deref(), Some("i-7"));
    }

    #[test]
    fn test_load_file_rejects_blank_value() {
        let file = config_file("[reporter]\nversion = \" \"\n");
        let err = FlowLoggerConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "reporter.version"));
    }

    #[test]
    fn test_load_file_parse_error() {
        let file = config_file("[reporter\n");
        assert!(matches!(
            FlowLoggerConfig::load(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FlowLoggerConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            FlowLoggerConfig::from_toml("pretty = \"yes\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_lookup() {
        let vars: HashMap<&str, &str> = [(ENV_NAME, "svc"), (ENV_VERSION, ""), (ENV_INSTANCE, "i-3")]
            .into_iter()
            .collect();
        let config = FlowLoggerConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.reporter.name.as_deref(), Some("svc"));
        assert_eq!(config.reporter.version, None);
        assert_eq!(config.reporter.instance.as_deref(), Some("i-3"));
        assert_eq!(config.reporter.deployment, None);
    }
}
