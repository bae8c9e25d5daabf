//! Client-facing error rendering.
//!
//! ```json
//! {
//!   "error_description": "Bad Request",
//!   "error": "invalid_argument",
//!   "fields": { "n": "with query parameter: invalid integer: \"abc\" is not a valid i32" },
//!   "metadata": { "code": "INVALID_INTEGER" }
//! }
//! ```

use crate::error::PipelineError;
use http::StatusCode;
use recordbind_core::BindError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const INTERNAL_DESCRIPTION: &str = "internal server error";

/// Coarse error class reported in the `error` member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// The request carried an unusable value.
    InvalidArgument,
    /// The request body exceeded the limit.
    PayloadTooLarge,
    /// The failure is on the server side.
    Internal,
}

/// JSON error envelope for a failed bind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Human-readable summary.
    pub error_description: String,
    /// Error class.
    pub error: ErrorClass,
    /// Offending keys or fields mapped to a message.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
    /// Extra context such as a request id.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
    #[serde(skip)]
    status: Option<StatusCode>,
}

impl ErrorPayload {
    /// Renders `err`, hiding the details of server-side failures.
    pub fn new(err: &PipelineError) -> Self {
        Self::render(err, false)
    }

    /// Renders `err` including server-side details. Meant for development.
    pub fn verbose(err: &PipelineError) -> Self {
        Self::render(err, true)
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// HTTP status the payload should be sent with.
    pub fn status_code(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn render(err: &PipelineError, expose_internal: bool) -> Self {
        let status = err.status_code();
        let mut payload = Self {
            error_description: INTERNAL_DESCRIPTION.to_owned(),
            error: ErrorClass::Internal,
            fields: BTreeMap::new(),
            metadata: Map::new(),
            status: Some(status),
        };

        match err {
            PipelineError::Bind(e) if e.is_input_error() => {
                payload.error = ErrorClass::InvalidArgument;
                payload.error_description = canonical(status);
                payload.fields.insert(attributed_key(e), parameter_message(e));
                payload
                    .metadata
                    .insert("code".to_owned(), Value::from(e.kind().code()));
            }
            PipelineError::Body(e) => {
                payload.error = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    ErrorClass::PayloadTooLarge
                } else {
                    ErrorClass::InvalidArgument
                };
                payload.error_description = e.to_string();
            }
            PipelineError::Validation(e) => {
                payload.error = ErrorClass::InvalidArgument;
                payload.error_description = e.to_string();
                payload.fields = e
                    .iter()
                    .map(|(field, message)| (field.to_owned(), message.to_owned()))
                    .collect();
            }
            PipelineError::Bind(_) | PipelineError::Analysis(_) => {
                if expose_internal {
                    payload.error_description = err.to_string();
                }
            }
        }

        payload
    }
}

impl From<&PipelineError> for ErrorPayload {
    fn from(err: &PipelineError) -> Self {
        Self::new(err)
    }
}

fn canonical(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or(INTERNAL_DESCRIPTION)
        .to_owned()
}

/// The lookup key when known, else the field path.
fn attributed_key(err: &BindError) -> String {
    err.key().unwrap_or_else(|| err.field()).to_owned()
}

fn parameter_message(err: &BindError) -> String {
    let detail = if err.message().is_empty() {
        err.kind().to_string()
    } else {
        format!("{}: {}", err.kind(), err.message())
    };
    match err.source_name() {
        Some(source) => format!("with {source} parameter: {detail}"),
        None => detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationErrors;
    use recordbind_core::ErrorKind;
    use recordbind_extract::BodyError;

    fn invalid_n() -> PipelineError {
        BindError::new(ErrorKind::InvalidInteger, "\"abc\" is not a valid i32")
            .with_field("number")
            .with_source("query", "n")
            .with_value("abc")
            .into()
    }

    #[test]
    fn test_input_error_payload() {
        let payload = ErrorPayload::new(&invalid_n());

        assert_eq!(payload.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(payload.error, ErrorClass::InvalidArgument);
        assert_eq!(payload.error_description, "Bad Request");
        assert_eq!(
            payload.fields.get("n").map(String::as_str),
            Some("with query parameter: invalid integer: \"abc\" is not a valid i32")
        );
        assert_eq!(payload.metadata["code"], "INVALID_INTEGER");
    }

    #[test]
    fn test_input_error_without_key_uses_field() {
        let err: PipelineError = BindError::new(ErrorKind::InvalidBoolean, "")
            .with_field("flags.on")
            .into();
        let payload = ErrorPayload::new(&err);
        assert_eq!(
            payload.fields.get("flags.on").map(String::as_str),
            Some("invalid boolean")
        );
    }

    #[test]
    fn test_validation_payload() {
        let err = PipelineError::from(
            ValidationErrors::new()
                .with("from", "must not be greater than to")
                .with("to", "required"),
        );
        let payload = ErrorPayload::new(&err);

        assert_eq!(payload.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            payload.error_description,
            "the request has one or multiple invalid fields"
        );
        assert_eq!(payload.fields.len(), 2);
    }

    #[test]
    fn test_body_too_large_payload() {
        let err = PipelineError::from(BodyError::TooLarge {
            limit: 8,
            actual: 64,
        });
        let payload = ErrorPayload::new(&err);

        assert_eq!(payload.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(payload.error, ErrorClass::PayloadTooLarge);
        assert!(payload.fields.is_empty());
    }

    #[test]
    fn test_internal_details_hidden_unless_verbose() {
        let err = PipelineError::from(BindError::unsupported_type("HashMap<String, String>"));

        let hidden = ErrorPayload::new(&err);
        assert_eq!(hidden.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(hidden.error, ErrorClass::Internal);
        assert_eq!(hidden.error_description, INTERNAL_DESCRIPTION);

        let shown = ErrorPayload::verbose(&err);
        assert!(shown.error_description.contains("HashMap"));
    }

    #[test]
    fn test_serialized_shape() {
        let payload = ErrorPayload::new(&invalid_n()).with_metadata("request_id", "req-1");
        let json: Value = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["error"], "invalid_argument");
        assert_eq!(json["metadata"]["request_id"], "req-1");
        assert!(json["fields"]["n"].is_string());
        assert!(json.get("status").is_none());
    }

    #[test]
    fn test_empty_maps_omitted() {
        let err = PipelineError::from(BodyError::TooLarge {
            limit: 1,
            actual: 2,
        });
        let json = serde_json::to_value(ErrorPayload::new(&err)).unwrap();
        assert!(json.get("fields").is_none());
        assert!(json.get("metadata").is_none());
    }
}
