//! Binding errors.
//!
//! Every failure raised while decoding a request into a record is a
//! [`BindError`]. It carries an [`ErrorKind`] plus as much attribution as was
//! known at the point of failure: the field path, the source that supplied
//! the value and the key it was looked up under, the offending value, the
//! destination type and, for collections, the element index.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;

/// Boxed error used for source and decoder failures.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Result type alias using [`BindError`].
pub type BindResult<T> = Result<T, BindError>;

/// Classification of binding failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A source failed while extracting a value.
    ExtractionFailure,
    /// More than one value for a field that holds one.
    MultipleValuesNotSupported,
    /// A fixed-size collection received the wrong number of values.
    ArityMismatch,
    /// Not a valid signed integer for the destination width.
    InvalidInteger,
    /// Not a valid unsigned integer for the destination width.
    InvalidPositiveInteger,
    /// Not a recognized boolean.
    InvalidBoolean,
    /// Not a valid float.
    InvalidFloat,
    /// Not a valid duration.
    InvalidDuration,
    /// A custom decoding capability rejected the value.
    DecodeFailure,
    /// The destination type cannot be bound.
    UnsupportedType,
    /// A value source produced a value that is neither assignable nor text.
    IncompatibleType,
}

impl ErrorKind {
    /// Returns `true` when the failure was caused by request input rather
    /// than by the binding target's declaration.
    pub const fn is_input_error(&self) -> bool {
        !matches!(self, Self::UnsupportedType | Self::IncompatibleType)
    }

    /// Machine-readable code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ExtractionFailure => "EXTRACTION_FAILURE",
            Self::MultipleValuesNotSupported => "MULTIPLE_VALUES_NOT_SUPPORTED",
            Self::ArityMismatch => "ARITY_MISMATCH",
            Self::InvalidInteger => "INVALID_INTEGER",
            Self::InvalidPositiveInteger => "INVALID_POSITIVE_INTEGER",
            Self::InvalidBoolean => "INVALID_BOOLEAN",
            Self::InvalidFloat => "INVALID_FLOAT",
            Self::InvalidDuration => "INVALID_DURATION",
            Self::DecodeFailure => "DECODE_FAILURE",
            Self::UnsupportedType => "UNSUPPORTED_TYPE",
            Self::IncompatibleType => "INCOMPATIBLE_TYPE",
        }
    }

    const fn describe(&self) -> &'static str {
        match self {
            Self::ExtractionFailure => "unable to extract value",
            Self::MultipleValuesNotSupported => "multiple values not supported",
            Self::ArityMismatch => "wrong number of values",
            Self::InvalidInteger => "invalid integer",
            Self::InvalidPositiveInteger => "invalid positive integer",
            Self::InvalidBoolean => "invalid boolean",
            Self::InvalidFloat => "invalid float",
            Self::InvalidDuration => "invalid duration",
            Self::DecodeFailure => "unable to decode value",
            Self::UnsupportedType => "unsupported type",
            Self::IncompatibleType => "incompatible type",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// An attributed binding failure.
///
/// # Example
///
/// ```
/// use recordbind_core::{BindError, ErrorKind};
///
/// let err = BindError::new(ErrorKind::InvalidInteger, "\"abc\" is not a valid i32")
///     .with_field("number")
///     .with_source("query", "n")
///     .with_value("abc");
///
/// assert_eq!(err.kind(), ErrorKind::InvalidInteger);
/// assert_eq!(err.key(), Some("n"));
/// assert!(err.to_string().contains("field 'number'"));
/// ```
#[derive(Debug)]
pub struct BindError {
    kind: ErrorKind,
    field: String,
    source_name: Option<String>,
    key: Option<String>,
    value: Option<String>,
    type_name: Option<&'static str>,
    index: Option<usize>,
    message: String,
    cause: Option<BoxError>,
}

impl BindError {
    /// Creates an unattributed error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: String::new(),
            source_name: None,
            key: None,
            value: None,
            type_name: None,
            index: None,
            message: message.into(),
            cause: None,
        }
    }

    /// A source failed for `key`.
    pub fn extraction_failure(source_name: &str, key: &str, cause: BoxError) -> Self {
        Self::new(
            ErrorKind::ExtractionFailure,
            format!("{source_name} source failed for key '{key}': {cause}"),
        )
        .with_source(source_name, key)
        .with_cause(cause)
    }

    /// `count` values arrived for a field holding one.
    pub fn multiple_values(count: usize, type_name: &'static str) -> Self {
        Self::new(
            ErrorKind::MultipleValuesNotSupported,
            format!("received {count} values for a single {type_name}"),
        )
        .with_type(type_name)
    }

    /// A fixed-size collection of `expected` elements got `actual` values.
    pub fn arity_mismatch(expected: usize, actual: usize, type_name: &'static str) -> Self {
        Self::new(
            ErrorKind::ArityMismatch,
            format!("expected exactly {expected} values, got {actual}"),
        )
        .with_type(type_name)
    }

    /// The destination type is not bindable.
    pub fn unsupported_type(type_name: &'static str) -> Self {
        Self::new(
            ErrorKind::UnsupportedType,
            format!("type {type_name} cannot be bound"),
        )
        .with_type(type_name)
    }

    /// A value of `value_type` can neither be assigned to nor read as text.
    pub fn incompatible_type(value_type: &'static str, type_name: &'static str) -> Self {
        Self::new(
            ErrorKind::IncompatibleType,
            format!("value of type {value_type} is not assignable to {type_name}"),
        )
        .with_type(type_name)
    }

    /// `raw` could not be parsed into `type_name`.
    pub fn invalid_value(
        kind: ErrorKind,
        raw: &str,
        type_name: &'static str,
        cause: BoxError,
    ) -> Self {
        Self::new(kind, format!("\"{raw}\" is not a valid {type_name}: {cause}"))
            .with_value(raw)
            .with_type(type_name)
            .with_cause(cause)
    }

    /// Sets the field path.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Sets the supplying source and its lookup key.
    pub fn with_source(mut self, source_name: impl Into<String>, key: impl Into<String>) -> Self {
        self.source_name = Some(source_name.into());
        self.key = Some(key.into());
        self
    }

    /// Sets the offending value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the destination type name.
    pub fn with_type(mut self, type_name: &'static str) -> Self {
        self.type_name = Some(type_name);
        self
    }

    /// Sets the collection element index.
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Sets the underlying error.
    pub fn with_cause(mut self, cause: BoxError) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Dotted field path from the root record; empty when unknown.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Name of the source that supplied the value.
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// Lookup key used with the source.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Offending raw value.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Destination type name.
    pub fn type_name(&self) -> Option<&'static str> {
        self.type_name
    }

    /// Collection element index.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Human-readable detail, without attribution.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `true` if the request input caused this error.
    pub fn is_input_error(&self) -> bool {
        self.kind.is_input_error()
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "binding error")?;
        } else {
            write!(f, "binding error on field '{}'", self.field)?;
        }
        if let (Some(source), Some(key)) = (&self.source_name, &self.key) {
            write!(f, " ({source} '{key}')")?;
        }
        if let Some(index) = self.index {
            write!(f, " at index {index}")?;
        }
        write!(f, ": {}: {}", self.kind, self.message)
    }
}

impl StdError for BindError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_classification() {
        assert!(ErrorKind::InvalidInteger.is_input_error());
        assert!(ErrorKind::ExtractionFailure.is_input_error());
        assert!(ErrorKind::ArityMismatch.is_input_error());
        assert!(!ErrorKind::UnsupportedType.is_input_error());
        assert!(!ErrorKind::IncompatibleType.is_input_error());
    }

    #[test]
    fn test_display_with_attribution() {
        let err = BindError::new(ErrorKind::InvalidFloat, "\"x\" is not a valid f64")
            .with_field("scores")
            .with_source("query", "score")
            .with_index(2);
        assert_eq!(
            err.to_string(),
            "binding error on field 'scores' (query 'score') at index 2: invalid float: \"x\" is not a valid f64"
        );
    }

    #[test]
    fn test_display_without_attribution() {
        let err = BindError::unsupported_type("alloc::rc::Rc<u8>");
        assert_eq!(
            err.to_string(),
            "binding error: unsupported type: type alloc::rc::Rc<u8> cannot be bound"
        );
        assert_eq!(err.type_name(), Some("alloc::rc::Rc<u8>"));
    }

    #[test]
    fn test_source_chain() {
        let cause: BoxError = "boom".into();
        let err = BindError::extraction_failure("header", "x-id", cause);
        assert_eq!(err.kind(), ErrorKind::ExtractionFailure);
        assert_eq!(err.source_name(), Some("header"));
        assert_eq!(err.key(), Some("x-id"));
        assert_eq!(StdError::source(&err).map(ToString::to_string), Some("boom".into()));
    }

    #[test]
    fn test_invalid_value_carries_raw() {
        let cause: BoxError = "invalid digit found in string".into();
        let err = BindError::invalid_value(ErrorKind::InvalidInteger, "abc", "i32", cause);
        assert_eq!(err.value(), Some("abc"));
        assert_eq!(err.type_name(), Some("i32"));
        assert!(err.message().starts_with("\"abc\" is not a valid i32"));
    }

    #[test]
    fn test_error_kind_codes() {
        assert_eq!(ErrorKind::InvalidBoolean.code(), "INVALID_BOOLEAN");
        assert_eq!(
            ErrorKind::MultipleValuesNotSupported.code(),
            "MULTIPLE_VALUES_NOT_SUPPORTED"
        );
        let json = serde_json::to_string(&ErrorKind::ArityMismatch).unwrap();
        assert_eq!(json, "\"arity_mismatch\"");
    }
}
