//! Binding metrics.
//!
//! Recorded through the `metrics` facade; installing an exporter is left to
//! the application.
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `recordbind_bind_total` | Counter | `type`, `outcome` | Bind attempts by outcome |
//! | `recordbind_schema_analyzed_total` | Counter | `type` | Schemas built |

use metrics::{counter, describe_counter};

/// Counter of bind attempts.
pub const BIND_TOTAL: &str = "recordbind_bind_total";

/// Counter of schema analyses.
pub const SCHEMA_ANALYZED_TOTAL: &str = "recordbind_schema_analyzed_total";

/// How a bind attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindOutcome {
    /// The record was filled and validated.
    Success,
    /// The body could not be read.
    BodyError,
    /// A source value was rejected.
    InputError,
    /// The record type cannot be bound as declared.
    TypeError,
    /// Validation rejected the record.
    ValidationError,
}

impl BindOutcome {
    /// Label value for the `outcome` label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::BodyError => "body_error",
            Self::InputError => "input_error",
            Self::TypeError => "type_error",
            Self::ValidationError => "validation_error",
        }
    }
}

/// Registers descriptions for the binding metrics.
pub fn describe_metrics() {
    describe_counter!(BIND_TOTAL, "Total bind attempts by outcome");
    describe_counter!(SCHEMA_ANALYZED_TOTAL, "Total record schemas analyzed");
}

/// Records one bind attempt.
pub fn record_bind(type_name: &'static str, outcome: BindOutcome) {
    counter!(
        BIND_TOTAL,
        "type" => type_name,
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Records one schema analysis.
pub fn record_schema_analyzed(type_name: &'static str) {
    counter!(SCHEMA_ANALYZED_TOTAL, "type" => type_name).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(BindOutcome::Success.as_str(), "success");
        assert_eq!(BindOutcome::InputError.as_str(), "input_error");
        assert_eq!(BindOutcome::ValidationError.as_str(), "validation_error");
    }

    #[test]
    fn test_recording_without_recorder() {
        // Without an installed recorder the calls are no-ops.
        describe_metrics();
        record_bind("Example", BindOutcome::Success);
        record_schema_analyzed("Example");
    }
}
