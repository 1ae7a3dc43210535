//! Configuration management

use crate::contracts::ContractError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per entry
    #[default]
    Text,
    /// A single JSON document
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Log level, overridden by `RUST_LOG`
    pub log_level: String,
    /// Builder config used when a command is not given one
    pub builder_config_path: Option<PathBuf>,
    /// Output format
    pub output_format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            builder_config_path: None,
            output_format: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Loads the configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Io`] if the file cannot be read and
    /// [`ContractError::Yaml`] if it is not a valid configuration.
    pub fn load(path: &Path) -> Result<Self, ContractError> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Loads the configuration, falling back to defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ContractError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.builder_config_path, None);
        assert_eq!(config.output_format, OutputFormat::Text);
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "logLevel: debug\noutputFormat: json").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.builder_config_path, None);
    }

    #[test]
    fn test_load_invalid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "outputFormat: xml").unwrap();

        assert!(matches!(
            Config::load(file.path()),
            Err(ContractError::Yaml(_))
        ));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let config = Config::load_or_default(&dir.path().join("missing.yaml")).unwrap();

        assert_eq!(config, Config::default());
        assert!(matches!(
            Config::load(&dir.path().join("missing.yaml")),
            Err(ContractError::Io(_))
        ));
    }
}
