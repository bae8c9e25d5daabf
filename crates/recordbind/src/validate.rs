//! Post-decode validation hook.

use serde::Serialize;
use std::collections::BTreeMap;

/// Record-level validation run after a successful decode.
///
/// # Example
///
/// ```
/// use recordbind::{Validate, ValidationErrors};
///
/// struct Range {
///     from: u32,
///     to: u32,
/// }
///
/// impl Validate for Range {
///     fn validate(&self) -> Result<(), ValidationErrors> {
///         let mut errors = ValidationErrors::new();
///         if self.from > self.to {
///             errors.add("from", "must not be greater than to");
///         }
///         errors.into_result()
///     }
/// }
///
/// let err = Range { from: 5, to: 1 }.validate().unwrap_err();
/// assert_eq!(err.get("from"), Some("must not be greater than to"));
/// ```
pub trait Validate {
    /// Checks the record, reporting every invalid field.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Invalid fields mapped to their messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(transparent)]
#[error("the request has one or multiple invalid fields")]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for `field`. A later message for the same field wins.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) -> &mut Self {
        self.fields.insert(field.into(), message.into());
        self
    }

    /// Builder form of [`ValidationErrors::add`].
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    /// Message recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// `true` when no field is invalid.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of invalid fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterates `(field, message)` in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_later_message_wins() {
        let errors = ValidationErrors::new()
            .with("name", "required")
            .with("name", "too short");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("name"), Some("too short"));
    }

    #[test]
    fn test_serializes_as_map() {
        let errors: ValidationErrors = [("b", "two"), ("a", "one")].into_iter().collect();
        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"a":"one","b":"two"}"#);
    }
}
