//! Extraction error types.
//!
//! [`ExtractionError`] is what a source returns when the request itself
//! cannot be read; the decoder wraps it into an `ExtractionFailure` binding
//! error. [`BodyError`] covers the JSON body pre-pass.

use http::StatusCode;
use std::fmt;

/// Part of the request a value was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// Path parameters (e.g., `/users/{id}`)
    Path,
    /// Query string parameters
    Query,
    /// HTTP headers
    Header,
    /// Request-scoped context values
    Context,
    /// Request body
    Body,
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => write!(f, "path"),
            Self::Query => write!(f, "query"),
            Self::Header => write!(f, "header"),
            Self::Context => write!(f, "context"),
            Self::Body => write!(f, "body"),
        }
    }
}

/// A request part that could not be read.
///
/// # Example
///
/// ```rust
/// use recordbind_extract::{ExtractionError, ExtractionSource};
/// use http::StatusCode;
///
/// let err = ExtractionError::invalid_encoding(ExtractionSource::Header, "x-name");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.extraction_source(), ExtractionSource::Header);
/// assert!(err.to_string().contains("x-name"));
/// ```
#[derive(Debug)]
pub struct ExtractionError {
    extraction_source: ExtractionSource,
    kind: ExtractionErrorKind,
    field: Option<String>,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtractionErrorKind {
    /// The raw part is not well formed
    Malformed,
    /// A value is not valid UTF-8 text
    InvalidEncoding,
}

impl ExtractionError {
    /// Creates an error for a request part that does not parse.
    #[must_use]
    pub fn malformed(source: ExtractionSource, details: impl Into<String>) -> Self {
        let details = details.into();
        Self {
            extraction_source: source,
            kind: ExtractionErrorKind::Malformed,
            message: format!("malformed {source}: {details}"),
            field: None,
        }
    }

    /// Creates an error for a value that is not readable as text.
    #[must_use]
    pub fn invalid_encoding(source: ExtractionSource, field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            extraction_source: source,
            kind: ExtractionErrorKind::InvalidEncoding,
            message: format!("{source} parameter '{field}' is not valid text"),
            field: Some(field),
        }
    }

    /// Returns the extraction source.
    #[must_use]
    pub fn extraction_source(&self) -> ExtractionSource {
        self.extraction_source
    }

    /// Returns the field name if applicable.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ExtractionErrorKind::Malformed => "MALFORMED_REQUEST",
            ExtractionErrorKind::InvalidEncoding => "INVALID_ENCODING",
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExtractionError {}

/// Failure to deserialize the request body into the target record.
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    /// The body exceeds the configured limit.
    #[error("payload too large: max {limit} bytes, got {actual} bytes")]
    TooLarge {
        /// Configured maximum.
        limit: usize,
        /// Received size.
        actual: usize,
    },

    /// The body is not valid JSON for the target record.
    #[error("malformed JSON body: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl BodyError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Malformed(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// A source name with no built-in implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {flavour} source '{name}'")]
pub struct UnknownSource {
    /// `"string"` or `"value"`.
    pub flavour: &'static str,
    /// The unrecognized name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_error() {
        let err = ExtractionError::malformed(ExtractionSource::Query, "bad escape");

        assert_eq!(err.extraction_source(), ExtractionSource::Query);
        assert_eq!(err.field(), None);
        assert_eq!(err.error_code(), "MALFORMED_REQUEST");
        assert_eq!(err.to_string(), "malformed query: bad escape");
    }

    #[test]
    fn test_invalid_encoding_error() {
        let err = ExtractionError::invalid_encoding(ExtractionSource::Header, "x-token");

        assert_eq!(err.field(), Some("x-token"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_ENCODING");
    }

    #[test]
    fn test_body_error_status() {
        let err = BodyError::TooLarge {
            limit: 1024,
            actual: 2048,
        };
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(err.to_string().contains("1024"));
        assert!(err.to_string().contains("2048"));

        let parse = serde_json::from_str::<u8>("x").unwrap_err();
        assert_eq!(BodyError::from(parse).status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_extraction_source_display() {
        assert_eq!(ExtractionSource::Path.to_string(), "path");
        assert_eq!(ExtractionSource::Query.to_string(), "query");
        assert_eq!(ExtractionSource::Header.to_string(), "header");
        assert_eq!(ExtractionSource::Context.to_string(), "context");
        assert_eq!(ExtractionSource::Body.to_string(), "body");
    }
}
