//! Context configuration, loaded from JSON.
use super::version::VersionExpression;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_MAX_DISTRIBUTION_YEARS: u32 = 200;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("max_distribution_years must be at least 1")]
    InvalidDistributionLimit,
}

/// A provider the caller expects to find, e.g. `{"name": "Statistics", "version": "^0.3"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRequirement {
    pub name: String,
    pub version: VersionExpression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContextConfig {
    pub providers: Vec<ProviderRequirement>,
    /// Pins the calendar date used by the financial models.
    pub today: Option<NaiveDate>,
    /// Upper bound on simulated distribution years.
    pub max_distribution_years: u32,
    /// Reject parameter lists holding the same name and variable twice.
    pub strict_parameters: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
            today: None,
            max_distribution_years: DEFAULT_MAX_DISTRIBUTION_YEARS,
            strict_parameters: false,
        }
    }
}

impl ContextConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_distribution_years == 0 {
            return Err(ConfigError::InvalidDistributionLimit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::version::VersionOperator;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_object() {
        let config = ContextConfig::from_json("{}").unwrap();
        assert_eq!(config, ContextConfig::default());
        assert_eq!(config.max_distribution_years, 200);
        assert!(!config.strict_parameters);
    }

    #[test]
    fn test_full_document() {
        let config = ContextConfig::from_json(
            r#"{
                "providers": [{"name": "Statistics", "version": "^0.3.0"}],
                "today": "2024-06-30",
                "max_distribution_years": 60,
                "strict_parameters": true
            }"#,
        )
        .unwrap();
        assert_eq!(config.providers[0].name, "Statistics");
        assert_eq!(config.providers[0].version.operator, VersionOperator::Compatible);
        assert_eq!(config.today, NaiveDate::from_ymd_opt(2024, 6, 30));
        assert_eq!(config.max_distribution_years, 60);
        assert!(config.strict_parameters);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(ContextConfig::from_json("{\"unknown\": 1}"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            ContextConfig::from_json(r#"{"providers": [{"name": "Statistics", "version": "1.0"}]}"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            ContextConfig::from_json(r#"{"max_distribution_years": 0}"#),
            Err(ConfigError::InvalidDistributionLimit)
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"today": "2030-01-15"}}"#).unwrap();
        let config = ContextConfig::from_path(file.path()).unwrap();
        assert_eq!(config.today, NaiveDate::from_ymd_opt(2030, 1, 15));

        let missing = ContextConfig::from_path("/nonexistent/algorithms.json").unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
