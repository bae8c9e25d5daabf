//! Pipeline errors.

use crate::validate::ValidationErrors;
use http::StatusCode;
use recordbind_core::BindError;
use recordbind_extract::BodyError;
use recordbind_schema::AnalysisError;
use recordbind_telemetry::BindOutcome;

/// Any failure of a [`Binder`](crate::Binder) call.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The JSON body could not be read.
    #[error(transparent)]
    Body(#[from] BodyError),

    /// A source value could not be bound, or the record type is misdeclared.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// The record type cannot be analyzed.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// The decoded record failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

impl PipelineError {
    /// Returns `true` when the request, not the record declaration, is at fault.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Body(_) | Self::Validation(_) => true,
            Self::Bind(e) => e.is_input_error(),
            Self::Analysis(_) => false,
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Body(e) => e.status_code(),
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            _ if self.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Metrics outcome label.
    pub fn outcome(&self) -> BindOutcome {
        match self {
            Self::Body(_) => BindOutcome::BodyError,
            Self::Validation(_) => BindOutcome::ValidationError,
            Self::Bind(e) if e.is_input_error() => BindOutcome::InputError,
            Self::Bind(_) | Self::Analysis(_) => BindOutcome::TypeError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recordbind_core::ErrorKind;

    #[test]
    fn test_input_bind_error_is_bad_request() {
        let err = PipelineError::from(BindError::new(ErrorKind::InvalidInteger, "bad"));
        assert!(err.is_client_error());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.outcome(), BindOutcome::InputError);
    }

    #[test]
    fn test_misuse_is_internal() {
        let err = PipelineError::from(BindError::unsupported_type("HashMap"));
        assert!(!err.is_client_error());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.outcome(), BindOutcome::TypeError);
    }

    #[test]
    fn test_body_too_large() {
        let err = PipelineError::from(BodyError::TooLarge {
            limit: 4,
            actual: 9,
        });
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.outcome(), BindOutcome::BodyError);
    }

    #[test]
    fn test_validation() {
        let err = PipelineError::from(ValidationErrors::new().with("name", "required"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.outcome(), BindOutcome::ValidationError);
    }
}
