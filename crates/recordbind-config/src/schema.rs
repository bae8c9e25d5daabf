//! Configuration section types.

use recordbind_extract::{DEFAULT_MAX_BODY_BYTES, STRING_SOURCES, VALUE_SOURCES};
use recordbind_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

/// Extraction source selection.
///
/// Order is priority: for each field the first listed source that has a
/// value wins.
///
/// # Example
///
/// ```
/// use recordbind_config::SourcesConfig;
///
/// let config = SourcesConfig::default();
/// assert_eq!(config.strings, vec!["query", "path", "header"]);
/// assert_eq!(config.values, vec!["ctx"]);
/// assert_eq!(config.path_separator, ".");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SourcesConfig {
    /// String sources in priority order.
    #[serde(default = "default_strings")]
    pub strings: Vec<String>,

    /// Value sources in priority order.
    #[serde(default = "default_values")]
    pub values: Vec<String>,

    /// Joins a parent's key to its nested field keys.
    #[serde(default = "default_separator")]
    pub path_separator: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            strings: default_strings(),
            values: default_values(),
            path_separator: default_separator(),
        }
    }
}

fn default_strings() -> Vec<String> {
    STRING_SOURCES.iter().map(ToString::to_string).collect()
}

fn default_values() -> Vec<String> {
    VALUE_SOURCES.iter().map(ToString::to_string).collect()
}

fn default_separator() -> String {
    ".".to_string()
}

/// Schema analysis settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Reject records with fields that carry directives but cannot be bound,
    /// instead of skipping those fields.
    #[serde(default)]
    pub strict: bool,
}

/// JSON body pre-pass settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BodyConfig {
    /// Deserialize the body into the record before source decoding.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Largest accepted body in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level filter.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl From<&LoggingConfig> for LogConfig {
    fn from(config: &LoggingConfig) -> Self {
        Self {
            enabled: config.enabled,
            level: config.level.clone(),
            format: config.format,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_defaults() {
        assert!(!AnalysisConfig::default().strict);

        let body = BodyConfig::default();
        assert!(body.enabled);
        assert_eq!(body.max_bytes, 262_144);

        let logging = LoggingConfig::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let sources: SourcesConfig = toml::from_str(r#"strings = ["header"]"#).unwrap();
        assert_eq!(sources.strings, vec!["header"]);
        assert_eq!(sources.values, vec!["ctx"]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<BodyConfig, _> = toml::from_str("max_size = 10");
        assert!(result.is_err());
    }

    #[test]
    fn test_logging_conversion() {
        let config = LoggingConfig {
            enabled: true,
            level: "debug".to_string(),
            format: LogFormat::Json,
        };
        let log = LogConfig::from(&config);
        assert_eq!(log.level, "debug");
        assert_eq!(log.format, LogFormat::Json);
        assert!(log.include_target);
    }
}
