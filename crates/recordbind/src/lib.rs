//! # recordbind
//!
//! **Bind HTTP request data into typed records**
//!
//! Declare where each field comes from, then let a [`Binder`] fill the
//! record from a request:
//!
//! - **Declarative sources** – query string, path parameters, headers and
//!   request-scoped values, tried in a configurable priority order
//! - **Typed decoding** – integers, floats, booleans, durations, sequences,
//!   optional nested records and custom decodable types
//! - **Attributed errors** – every failure names the field, source, key and
//!   offending value, and renders to a JSON [`ErrorPayload`]
//! - **Body and validation** – optional JSON body pre-pass and a
//!   [`Validate`] hook
//!
//! ## Quick Start
//!
//! ```rust
//! use recordbind::prelude::*;
//! use std::time::Duration;
//!
//! #[derive(Debug, Default, Bindable)]
//! #[bind(crate = "recordbind::core")]
//! struct ListOrders {
//!     #[bind(path = "customer")]
//!     customer: u64,
//!     #[bind(query = "status", exploder = ",")]
//!     statuses: Vec<String>,
//!     #[bind(query = "timeout", default = "30s")]
//!     timeout: Duration,
//! }
//!
//! let binder = Binder::with_defaults();
//! let ctx = ExtractionContext::builder()
//!     .uri("/customers/42/orders?status=open,held".parse().unwrap())
//!     .path_param("customer", "42")
//!     .build();
//!
//! let orders: ListOrders = binder.bind(&ctx).unwrap();
//! assert_eq!(orders.customer, 42);
//! assert_eq!(orders.statuses, vec!["open", "held"]);
//! assert_eq!(orders.timeout, Duration::from_secs(30));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! record type ─► Analyzer ─► Schema (cached per type)
//!                               │
//! ExtractionContext ─► SourceSet ─► Decoder ─► FieldSetter ─► record
//! ```

#![doc(html_root_url = "https://docs.rs/recordbind/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod binder;
mod error;
mod payload;
mod validate;

pub use binder::Binder;
pub use error::PipelineError;
pub use payload::{ErrorClass, ErrorPayload};
pub use validate::{Validate, ValidationErrors};

// Re-export the engine crates
pub use recordbind_config as config;
pub use recordbind_core as core;
pub use recordbind_decoder as decoder;
pub use recordbind_extract as extract;
pub use recordbind_schema as schema;
pub use recordbind_telemetry as telemetry;

// Re-export the derive macro
pub use recordbind_macros::Bindable;

/// Installs logging as configured and registers metric descriptions.
///
/// Does nothing when logging is disabled.
///
/// # Errors
///
/// Returns `TelemetryError` if a global subscriber is already installed or
/// the level filter is invalid.
pub fn init_telemetry(config: &config::BinderConfig) -> telemetry::TelemetryResult<()> {
    if !config.logging.enabled {
        return Ok(());
    }
    telemetry::init_telemetry(&telemetry::LogConfig::from(&config.logging))
}

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use recordbind::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Binder, ErrorPayload, PipelineError, Validate, ValidationErrors};

    pub use recordbind_config::{BinderConfig, ConfigLoader};
    pub use recordbind_core::{BindError, Bindable, ErrorKind, Json, Opaque, Parsed};
    pub use recordbind_extract::ExtractionContext;
    pub use recordbind_macros::Bindable;
}
