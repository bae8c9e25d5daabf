//! Typed configuration for recordbind.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields and unknown sources)
//! - Layered configuration (defaults → file → env)
//!
//! # Example
//!
//! ```no_run
//! use recordbind_config::{BinderConfig, ConfigLoader};
//!
//! # fn main() -> Result<(), recordbind_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_file("binder.toml")?
//!     .with_env_prefix("RECORDBIND")
//!     .load()?;
//!
//! println!("source priority: {:?}", config.sources.strings);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [sources]
//! strings = ["query", "path", "header"]
//! values = ["ctx"]
//! path_separator = "."
//!
//! [analysis]
//! strict = false
//!
//! [body]
//! enabled = true
//! max_bytes = 262144
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "pretty"
//! ```
//!
//! # Environment Variable Overrides
//!
//! - `RECORDBIND__SOURCES__STRINGS=header,query`
//! - `RECORDBIND__ANALYSIS__STRICT=true`
//! - `RECORDBIND__LOGGING__FORMAT=json`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::BinderConfig;
pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use schema::{AnalysisConfig, BodyConfig, LoggingConfig, SourcesConfig};
