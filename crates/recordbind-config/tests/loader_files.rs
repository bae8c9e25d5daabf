//! Loading configuration files from disk.

use recordbind_config::{ConfigError, ConfigLoader};
use recordbind_telemetry::LogFormat;
use std::io::Write;

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp file");
    file.write_all(content.as_bytes()).expect("write");
    file
}

#[test]
fn test_toml_file() {
    let file = write_temp(
        ".toml",
        r#"
            [sources]
            strings = ["path", "query"]
            path_separator = "_"

            [body]
            max_bytes = 2048

            [logging]
            format = "json"
        "#,
    );

    let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();

    assert_eq!(config.sources.strings, vec!["path", "query"]);
    assert_eq!(config.sources.values, vec!["ctx"]);
    assert_eq!(config.sources.path_separator, "_");
    assert_eq!(config.body.max_bytes, 2048);
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_json_file() {
    let file = write_temp(".json", r#"{"analysis": {"strict": true}}"#);

    let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
    assert!(config.analysis.strict);
}

#[test]
fn test_unknown_key_rejected() {
    let file = write_temp(".toml", "[body]\nlimit = 10\n");

    let result = ConfigLoader::new().with_file(file.path());
    assert!(matches!(result, Err(ConfigError::TomlError(_))));
}

#[test]
fn test_unsupported_extension() {
    let file = write_temp(".yaml", "body: {}");

    let result = ConfigLoader::new().with_file(file.path());
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

#[test]
fn test_missing_dotenv_file() {
    let result = ConfigLoader::new().with_dotenv_file("/nonexistent/.env");
    assert!(matches!(result, Err(ConfigError::Dotenv(_))));
}
