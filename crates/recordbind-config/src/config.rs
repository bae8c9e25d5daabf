//! The root configuration type.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{AnalysisConfig, BodyConfig, ConfigError, LoggingConfig, SourcesConfig};
use recordbind_extract::{STRING_SOURCES, VALUE_SOURCES};

/// Complete binder configuration.
///
/// Load it once with [`ConfigLoader`](crate::ConfigLoader) and hand it to
/// the binder at start-up.
///
/// # Example
///
/// ```
/// use recordbind_config::BinderConfig;
///
/// let config = BinderConfig::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.body.max_bytes, 256 * 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct BinderConfig {
    /// Extraction source selection.
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Schema analysis settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// JSON body pre-pass.
    #[serde(default)]
    pub body: BodyConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BinderConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - a source name has no built-in implementation
    /// - a source is listed twice
    /// - the path separator is empty
    /// - the body limit is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_sources("sources.strings", &self.sources.strings, &STRING_SOURCES)?;
        check_sources("sources.values", &self.sources.values, &VALUE_SOURCES)?;

        let mut seen = HashSet::new();
        for name in self.sources.strings.iter().chain(&self.sources.values) {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::invalid_value(
                    "sources",
                    format!("source '{name}' is listed more than once"),
                ));
            }
        }

        if self.sources.path_separator.is_empty() {
            return Err(ConfigError::invalid_value(
                "sources.path_separator",
                "must not be empty",
            ));
        }

        if self.body.max_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "body.max_bytes",
                "must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Debug logging with pretty output and strict analysis.
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = recordbind_telemetry::LogFormat::Pretty;
        config.analysis.strict = true;
        config
    }

    /// Info logging with JSON output.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = recordbind_telemetry::LogFormat::Json;
        config
    }
}

fn check_sources(field: &str, names: &[String], known: &[&str]) -> Result<(), ConfigError> {
    match names.iter().find(|name| !known.contains(&name.as_str())) {
        Some(unknown) => Err(ConfigError::invalid_value(
            field,
            format!("unknown source '{unknown}', expected one of {known:?}"),
        )),
        None => Ok(()),
    }
}
