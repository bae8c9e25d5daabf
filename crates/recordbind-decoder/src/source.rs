//! Extraction sources.
//!
//! A source answers "what is the value for this key?" against a request
//! context `C`. Two flavours exist:
//!
//! - [`StringsSource`]: zero or more strings (query parameters, headers, ...)
//! - [`ValueSource`]: at most one value of any type (request-scoped context)
//!
//! A [`SourceSet`] holds both lists in priority order. The name of each
//! source is also the directive name fields use to bind from it.
//!
//! # Example
//!
//! ```
//! use recordbind_decoder::{FnStringsSource, SourceSet};
//! use std::collections::HashMap;
//!
//! type Ctx = HashMap<String, Vec<String>>;
//!
//! let sources: SourceSet<Ctx> = SourceSet::new().with_strings(FnStringsSource::new(
//!     "query",
//!     |ctx: &Ctx, key: &str| Ok(ctx.get(key).cloned().unwrap_or_default()),
//! ));
//!
//! assert_eq!(sources.string_keys(), vec!["query"]);
//! ```

use recordbind_core::{BoxError, Opaque};
use recordbind_schema::Analyzer;
use std::fmt;
use std::sync::Arc;

/// A source yielding any number of strings per key.
pub trait StringsSource<C>: Send + Sync {
    /// Directive name, e.g. `"query"`.
    fn name(&self) -> &str;

    /// Returns every value for `key`; empty when absent.
    fn extract(&self, ctx: &C, key: &str) -> Result<Vec<String>, BoxError>;
}

/// A source yielding at most one value per key.
pub trait ValueSource<C>: Send + Sync {
    /// Directive name, e.g. `"ctx"`.
    fn name(&self) -> &str;

    /// Returns the value for `key`, if any.
    fn extract(&self, ctx: &C, key: &str) -> Result<Option<Opaque>, BoxError>;
}

/// A [`StringsSource`] backed by a closure.
pub struct FnStringsSource<F> {
    name: String,
    func: F,
}

impl<F> FnStringsSource<F> {
    /// Creates a closure-backed source.
    pub fn new<C>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&C, &str) -> Result<Vec<String>, BoxError> + Send + Sync,
    {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<C, F> StringsSource<C> for FnStringsSource<F>
where
    F: Fn(&C, &str) -> Result<Vec<String>, BoxError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn extract(&self, ctx: &C, key: &str) -> Result<Vec<String>, BoxError> {
        (self.func)(ctx, key)
    }
}

/// A [`ValueSource`] backed by a closure.
pub struct FnValueSource<F> {
    name: String,
    func: F,
}

impl<F> FnValueSource<F> {
    /// Creates a closure-backed source.
    pub fn new<C>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&C, &str) -> Result<Option<Opaque>, BoxError> + Send + Sync,
    {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<C, F> ValueSource<C> for FnValueSource<F>
where
    F: Fn(&C, &str) -> Result<Option<Opaque>, BoxError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn extract(&self, ctx: &C, key: &str) -> Result<Option<Opaque>, BoxError> {
        (self.func)(ctx, key)
    }
}

/// Ordered string sources followed by ordered value sources.
///
/// Immutable once built; share it behind an `Arc` across requests.
pub struct SourceSet<C> {
    strings: Vec<Arc<dyn StringsSource<C>>>,
    values: Vec<Arc<dyn ValueSource<C>>>,
}

impl<C> Default for SourceSet<C> {
    fn default() -> Self {
        Self {
            strings: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<C> Clone for SourceSet<C> {
    fn clone(&self) -> Self {
        Self {
            strings: self.strings.clone(),
            values: self.values.clone(),
        }
    }
}

impl<C> SourceSet<C> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a string source with the lowest priority so far.
    pub fn with_strings(mut self, source: impl StringsSource<C> + 'static) -> Self {
        self.push_strings(Arc::new(source));
        self
    }

    /// Appends a value source with the lowest priority so far.
    pub fn with_values(mut self, source: impl ValueSource<C> + 'static) -> Self {
        self.push_values(Arc::new(source));
        self
    }

    /// Appends a shared string source.
    pub fn push_strings(&mut self, source: Arc<dyn StringsSource<C>>) {
        self.strings.push(source);
    }

    /// Appends a shared value source.
    pub fn push_values(&mut self, source: Arc<dyn ValueSource<C>>) {
        self.values.push(source);
    }

    /// String sources in priority order.
    pub fn strings(&self) -> &[Arc<dyn StringsSource<C>>] {
        &self.strings
    }

    /// Value sources in priority order.
    pub fn values(&self) -> &[Arc<dyn ValueSource<C>>] {
        &self.values
    }

    /// Names of the string sources, in priority order.
    pub fn string_keys(&self) -> Vec<&str> {
        self.strings.iter().map(|s| s.name()).collect()
    }

    /// Names of the value sources, in priority order.
    pub fn value_keys(&self) -> Vec<&str> {
        self.values.iter().map(|s| s.name()).collect()
    }

    /// An analyzer recognizing exactly this set's source names.
    pub fn analyzer(&self) -> Analyzer {
        Analyzer::new(self.string_keys(), self.value_keys())
    }

    /// Returns `true` if the set has no source at all.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty() && self.values.is_empty()
    }
}

impl<C> fmt::Debug for SourceSet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceSet")
            .field("strings", &self.string_keys())
            .field("values", &self.value_keys())
            .finish()
    }
}

/// A value picked for a field.
#[derive(Debug, Clone)]
pub enum RawValue {
    /// Strings from a string source, an exploded text value, or a default.
    Strings(Vec<String>),
    /// A value from a value source.
    Opaque(Opaque),
}
