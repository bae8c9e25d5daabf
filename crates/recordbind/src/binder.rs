//! The request binding pipeline.

use crate::error::PipelineError;
use crate::validate::Validate;
use recordbind_config::{BinderConfig, BodyConfig, ConfigError};
use recordbind_core::Bindable;
use recordbind_decoder::{Decoder, SourceSet};
use recordbind_extract::{build_sources, http_sources, read_json, BodyError, ExtractionContext};
use recordbind_schema::{AnalysisError, AnalysisPolicy, Analyzer, Schema, SchemaCache};
use recordbind_telemetry::{record_bind, record_schema_analyzed, BindOutcome};
use serde::de::DeserializeOwned;
use std::any::type_name;
use std::fmt;
use std::sync::Arc;

/// Binds [`ExtractionContext`]s into records.
///
/// A binder owns the ordered source set and a schema cache; it is cheap to
/// clone and can be shared across requests.
///
/// ```text
/// [body JSON] → sources (priority order) → defaults → [Validate]
/// ```
///
/// # Example
///
/// ```
/// use recordbind::prelude::*;
///
/// #[derive(Debug, Default, Bindable)]
/// #[bind(crate = "recordbind::core")]
/// struct Search {
///     #[bind(query = "q")]
///     text: String,
///     #[bind(query = "limit", default = "20")]
///     limit: u32,
/// }
///
/// let binder = Binder::with_defaults();
/// let ctx = ExtractionContext::builder()
///     .uri("/search?q=rust".parse().unwrap())
///     .build();
///
/// let search: Search = binder.bind(&ctx).unwrap();
/// assert_eq!(search.text, "rust");
/// assert_eq!(search.limit, 20);
/// ```
#[derive(Clone)]
pub struct Binder {
    sources: Arc<SourceSet<ExtractionContext>>,
    schemas: Arc<SchemaCache>,
    body: BodyConfig,
}

impl Binder {
    /// Creates a binder over `sources`, analyzing records with `analyzer`.
    ///
    /// The analyzer should recognize the names of `sources`; see
    /// [`SourceSet::analyzer`].
    pub fn new(sources: SourceSet<ExtractionContext>, analyzer: Analyzer) -> Self {
        Self {
            sources: Arc::new(sources),
            schemas: Arc::new(SchemaCache::new(analyzer)),
            body: BodyConfig::default(),
        }
    }

    /// The built-in HTTP sources with default settings.
    pub fn with_defaults() -> Self {
        let sources = http_sources();
        let analyzer = sources.analyzer();
        Self::new(sources, analyzer)
    }

    /// Builds a binder from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration does not validate.
    pub fn from_config(config: &BinderConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let sources = build_sources(
            config.sources.strings.as_slice(),
            config.sources.values.as_slice(),
        )
        .map_err(|e| ConfigError::invalid_value("sources", e.to_string()))?;

        let policy = if config.analysis.strict {
            AnalysisPolicy::Strict
        } else {
            AnalysisPolicy::FailOpen
        };
        let analyzer = sources
            .analyzer()
            .with_separator(config.sources.path_separator.as_str())
            .with_policy(policy);

        Ok(Self::new(sources, analyzer).with_body(config.body.clone()))
    }

    /// Replaces the body settings.
    #[must_use]
    pub fn with_body(mut self, body: BodyConfig) -> Self {
        self.body = body;
        self
    }

    /// The source set in priority order.
    pub fn sources(&self) -> &SourceSet<ExtractionContext> {
        &self.sources
    }

    /// The schema cache.
    pub fn schemas(&self) -> &SchemaCache {
        &self.schemas
    }

    /// Analyzes `T` ahead of the first request.
    ///
    /// Registering surfaces declaration errors at start-up instead of on
    /// the first bind.
    pub fn register<T: Bindable>(&self) -> Result<Arc<Schema>, AnalysisError> {
        let name = type_name::<T>();
        match self.schemas.insert::<T>() {
            Ok(schema) => {
                tracing::debug!(
                    type_name = name,
                    fields = schema.field_count(),
                    children = schema.children().len(),
                    "schema analyzed"
                );
                record_schema_analyzed(name);
                Ok(schema)
            }
            Err(e) => {
                tracing::warn!(type_name = name, error = %e, "schema analysis failed");
                Err(e)
            }
        }
    }

    /// The schema for `T`, analyzing it on first use.
    pub fn schema<T: Bindable>(&self) -> Result<Arc<Schema>, AnalysisError> {
        match self.schemas.get::<T>() {
            Some(schema) => Ok(schema),
            None => self.register::<T>(),
        }
    }

    /// Binds a fresh `T` from the request sources.
    ///
    /// # Errors
    ///
    /// Returns the first binding error; see [`PipelineError`].
    pub fn bind<T: Bindable + Default>(&self, ctx: &ExtractionContext) -> Result<T, PipelineError> {
        let result = self.decode_new(ctx);
        finish::<T, _>(result)
    }

    /// Binds into an existing `T`, overwriting the fields that receive a value.
    ///
    /// # Errors
    ///
    /// Returns the first binding error. Fields set before it keep their values.
    pub fn bind_into<T: Bindable>(
        &self,
        ctx: &ExtractionContext,
        target: &mut T,
    ) -> Result<(), PipelineError> {
        let result = self.decode(ctx, target);
        finish::<T, _>(result)
    }

    /// Binds a fresh `T` and validates it.
    ///
    /// # Errors
    ///
    /// Returns a binding error, or the validation errors of a decoded record.
    pub fn bind_validated<T: Bindable + Default + Validate>(
        &self,
        ctx: &ExtractionContext,
    ) -> Result<T, PipelineError> {
        let result = self.decode_new(ctx).and_then(validated);
        finish::<T, _>(result)
    }

    /// Reads the JSON body into `T`, then overlays the request sources.
    ///
    /// An empty body, or body binding disabled in the configuration, starts
    /// from `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns a body error before any source is consulted.
    pub fn bind_with_body<T: Bindable + Default + DeserializeOwned>(
        &self,
        ctx: &ExtractionContext,
    ) -> Result<T, PipelineError> {
        let result = self.decode_over_body(ctx);
        finish::<T, _>(result)
    }

    /// The full pipeline: body, sources, then validation.
    ///
    /// # Example
    ///
    /// ```
    /// use recordbind::prelude::*;
    /// use serde::Deserialize;
    ///
    /// #[derive(Debug, Default, Deserialize, Bindable)]
    /// #[bind(crate = "recordbind::core")]
    /// struct Rename {
    ///     #[serde(skip)]
    ///     #[bind(path = "id")]
    ///     id: u64,
    ///     name: String,
    /// }
    ///
    /// impl Validate for Rename {
    ///     fn validate(&self) -> Result<(), ValidationErrors> {
    ///         let mut errors = ValidationErrors::new();
    ///         if self.name.is_empty() {
    ///             errors.add("name", "cannot be blank");
    ///         }
    ///         errors.into_result()
    ///     }
    /// }
    ///
    /// let binder = Binder::with_defaults();
    /// let ctx = ExtractionContext::builder()
    ///     .path_param("id", "7")
    ///     .body(r#"{"name": "renamed"}"#)
    ///     .build();
    ///
    /// let rename: Rename = binder.bind_request(&ctx).unwrap();
    /// assert_eq!(rename.id, 7);
    /// assert_eq!(rename.name, "renamed");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the first failing stage's error.
    pub fn bind_request<T: Bindable + Default + DeserializeOwned + Validate>(
        &self,
        ctx: &ExtractionContext,
    ) -> Result<T, PipelineError> {
        let result = self.decode_over_body(ctx).and_then(validated);
        finish::<T, _>(result)
    }

    fn decode<T: Bindable>(
        &self,
        ctx: &ExtractionContext,
        target: &mut T,
    ) -> Result<(), PipelineError> {
        let schema = self.schema::<T>()?;
        Decoder::new(&self.sources, ctx).decode_into(&schema, target)?;
        Ok(())
    }

    fn decode_new<T: Bindable + Default>(
        &self,
        ctx: &ExtractionContext,
    ) -> Result<T, PipelineError> {
        let mut target = T::default();
        self.decode(ctx, &mut target)?;
        Ok(target)
    }

    fn decode_over_body<T: Bindable + Default + DeserializeOwned>(
        &self,
        ctx: &ExtractionContext,
    ) -> Result<T, PipelineError> {
        let mut target = self.read_body::<T>(ctx)?;
        self.decode(ctx, &mut target)?;
        Ok(target)
    }

    fn read_body<T: Default + DeserializeOwned>(
        &self,
        ctx: &ExtractionContext,
    ) -> Result<T, BodyError> {
        if !self.body.enabled {
            return Ok(T::default());
        }
        Ok(read_json(ctx, self.body.max_bytes)?.unwrap_or_default())
    }
}

impl Default for Binder {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("sources", &self.sources)
            .field("schemas", &self.schemas.len())
            .field("body", &self.body)
            .finish()
    }
}

fn validated<T: Validate>(target: T) -> Result<T, PipelineError> {
    target.validate()?;
    Ok(target)
}

/// Logs and counts the outcome of a bind of `T`.
fn finish<T, R>(result: Result<R, PipelineError>) -> Result<R, PipelineError> {
    let name = type_name::<T>();
    match &result {
        Ok(_) => record_bind(name, BindOutcome::Success),
        Err(err) => {
            log_failure(name, err);
            record_bind(name, err.outcome());
        }
    }
    result
}

fn log_failure(name: &'static str, err: &PipelineError) {
    match err {
        PipelineError::Bind(e) if e.is_input_error() => tracing::debug!(
            type_name = name,
            error_kind = e.kind().code(),
            field = e.field(),
            source = e.source_name().unwrap_or_default(),
            "binding failed"
        ),
        PipelineError::Validation(e) => tracing::debug!(
            type_name = name,
            invalid_fields = e.len(),
            "validation failed"
        ),
        PipelineError::Body(e) => tracing::debug!(type_name = name, error = %e, "body rejected"),
        PipelineError::Bind(_) | PipelineError::Analysis(_) => {
            tracing::warn!(type_name = name, error = %err, "record cannot be bound");
        }
    }
}
