//! Analysis errors.

use thiserror::Error;

/// Error raised by the analyzer under [`AnalysisPolicy::Strict`](crate::AnalysisPolicy::Strict),
/// or for any policy when the target is not a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The target type is not a record.
    #[error("type {type_name} is not a record")]
    NotARecord {
        /// Name of the target type.
        type_name: &'static str,
    },

    /// A directive-bearing field sits behind two levels of `Option`.
    #[error("field '{field}' of type {type_name} has more than one level of nullable indirection")]
    DoubleIndirection {
        /// Dotted field path.
        field: String,
        /// Declared field type.
        type_name: &'static str,
    },

    /// A directive-bearing field has a type the setter cannot fill.
    #[error("field '{field}' of type {type_name} cannot be bound from a string source")]
    Unclassifiable {
        /// Dotted field path.
        field: String,
        /// Declared field type.
        type_name: &'static str,
    },
}

impl AnalysisError {
    /// Dotted path of the offending field, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::NotARecord { .. } => None,
            Self::DoubleIndirection { field, .. } | Self::Unclassifiable { field, .. } => {
                Some(field)
            }
        }
    }
}
