//! # Configuration System
//!
//! YAML configuration for LHIPA analysis runs:
//!
//! - Analysis settings (modulus maxima threshold, debug artifacts)
//! - Correction of the final value
//! - Logging
//!
//! ## Configuration Search Path
//!
//! Configuration is loaded from the first file found:
//! 1. Path specified via `LHIPA_CONFIG` environment variable
//! 2. `./lhipa.yaml` (current directory)
//! 3. `~/.config/lhipa/config.yaml` (user config)
//! 4. `/etc/lhipa/config.yaml` (system config)
//!
//! ## Example Configuration
//!
//! ```yaml
//! analysis:
//!   mod_max_threshold: 0.05
//!   debug_log: false
//!
//! correction:
//!   multiplicative: 0.0
//!   additive: 0.0
//!
//! logging:
//!   level: info
//!   format: compact
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::lhipa::{Corrections, LhipaOptions};
use crate::observe::LogConfig;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "LHIPA_CONFIG";

/// Error type for configuration operations.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found
    NotFound(String),
    /// Failed to read or write configuration file
    ReadError(String),
    /// Failed to parse configuration
    ParseError(String),
    /// Invalid configuration value
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(msg) => write!(f, "config not found: {}", msg),
            ConfigError::ReadError(msg) => write!(f, "failed to read config: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "failed to parse config: {}", msg),
            ConfigError::ValidationError(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Analysis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Modulus maxima below this magnitude are discarded
    pub mod_max_threshold: f64,
    /// Log every intermediate artifact at debug level
    pub debug_log: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            mod_max_threshold: 0.0,
            debug_log: false,
        }
    }
}

/// Complete LHIPA configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LhipaConfig {
    /// Configuration version
    pub version: String,
    /// Analysis settings
    pub analysis: AnalysisConfig,
    /// Correction of the final value
    pub correction: Corrections,
    /// Logging configuration
    pub logging: LogConfig,
}

impl Default for LhipaConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            analysis: AnalysisConfig::default(),
            correction: Corrections::default(),
            logging: LogConfig::default(),
        }
    }
}

impl LhipaConfig {
    /// Load configuration from the default search path.
    ///
    /// Returns the default config if no file is found. A path named by
    /// `LHIPA_CONFIG` that does not exist is an error.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(ConfigError::NotFound(format!(
                    "{} points to {}",
                    CONFIG_ENV_VAR,
                    path.display()
                )));
            }
            return Self::load_from(&path);
        }

        for path in &Self::config_search_paths() {
            if path.exists() {
                return Self::load_from(path);
            }
        }

        tracing::debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load and validate configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))
    }

    /// Get configuration search paths.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./lhipa.yaml")];

        if let Some(dirs) = directories::ProjectDirs::from("", "", "lhipa") {
            paths.push(dirs.config_dir().join("config.yaml"));
        }

        paths.push(PathBuf::from("/etc/lhipa/config.yaml"));
        paths
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.analysis.mod_max_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::ValidationError(
                "mod_max_threshold must be a non-negative number".to_string(),
            ));
        }

        if !self.correction.multiplicative.is_finite() || !self.correction.additive.is_finite() {
            return Err(ConfigError::ValidationError(
                "correction parameters must be finite".to_string(),
            ));
        }

        Ok(())
    }

    /// Analysis options described by this configuration.
    pub fn options(&self) -> LhipaOptions {
        LhipaOptions {
            mod_max_threshold: self.analysis.mod_max_threshold,
            debug_log: self.analysis.debug_log,
            corrections: self.correction,
        }
    }

    /// Generate example configuration YAML.
    pub fn example_yaml() -> String {
        let config = Self {
            analysis: AnalysisConfig {
                mod_max_threshold: 0.05,
                ..Default::default()
            },
            ..Default::default()
        };

        serde_yaml::to_string(&config).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::{LogFormat, LogLevel};

    #[test]
    fn test_default_config() {
        let config = LhipaConfig::default();
        assert_eq!(config.analysis.mod_max_threshold, 0.0);
        assert!(!config.analysis.debug_log);
        assert_eq!(config.correction, Corrections::NONE);
        assert_eq!(config.options(), LhipaOptions::default());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
analysis:
  mod_max_threshold: 0.05
  debug_log: true

correction:
  multiplicative: 1.5
  additive: 0.002

logging:
  level: debug
  format: json
"#;

        let config = LhipaConfig::parse(yaml).unwrap();
        assert_eq!(config.analysis.mod_max_threshold, 0.05);
        assert!(config.analysis.debug_log);
        assert_eq!(config.correction.multiplicative, 1.5);
        assert_eq!(config.correction.additive, 0.002);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);

        let options = config.options();
        assert_eq!(options.mod_max_threshold, 0.05);
        assert!(options.debug_log);
        assert_eq!(options.corrections.multiplicative, 1.5);
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
correction:
  additive: 0.01
"#;

        let config = LhipaConfig::parse(yaml).unwrap();
        assert_eq!(config.correction.additive, 0.01);
        // Defaults should be applied
        assert_eq!(config.correction.multiplicative, 0.0);
        assert_eq!(config.analysis.mod_max_threshold, 0.0);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_parse_error() {
        let err = LhipaConfig::parse("analysis: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
        assert!(err.to_string().starts_with("failed to parse config"));
    }

    #[test]
    fn test_parse_rejects_invalid_values() {
        let err = LhipaConfig::parse("analysis:\n  mod_max_threshold: -1\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = LhipaConfig::parse("correction:\n  additive: .inf\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validation() {
        let mut config = LhipaConfig::default();
        assert!(config.validate().is_ok());

        config.analysis.mod_max_threshold = -0.5;
        assert!(config.validate().is_err());

        config.analysis.mod_max_threshold = f64::NAN;
        assert!(config.validate().is_err());

        config.analysis.mod_max_threshold = 0.1;
        config.correction.additive = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lhipa.yaml");

        let mut config = LhipaConfig::default();
        config.analysis.mod_max_threshold = 0.02;
        config.correction.multiplicative = 2.0;
        config.save(&path).unwrap();

        let loaded = LhipaConfig::load_from(&path).unwrap();
        assert_eq!(loaded.analysis, config.analysis);
        assert_eq!(loaded.correction, config.correction);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "analysis:\n  mod_max_threshold: -1.0\n").unwrap();
        let err = LhipaConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LhipaConfig::load_from(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }

    #[test]
    fn test_example_yaml() {
        let yaml = LhipaConfig::example_yaml();
        assert!(yaml.contains("analysis:"));
        assert!(yaml.contains("correction:"));
        let parsed = LhipaConfig::parse(&yaml).unwrap();
        assert_eq!(parsed.analysis.mod_max_threshold, 0.05);
    }

    #[test]
    fn test_config_search_paths() {
        let paths = LhipaConfig::config_search_paths();
        assert!(paths.len() >= 2);
        assert!(paths[0].ends_with("lhipa.yaml"));
        assert!(paths[paths.len() - 1].ends_with("config.yaml"));
    }
}
