//! Accumulated lookup keys per source.

use indexmap::IndexMap;
use serde::Serialize;

/// Lookup key per source name, accumulated from the root down to a field.
///
/// String-source keys compose with a separator as the analyzer descends into
/// nested records; value-source keys are stored literally.
///
/// # Example
///
/// ```rust
/// use recordbind_schema::SourcePaths;
///
/// let mut paths = SourcePaths::new();
/// paths.compose("query", "nested", ".");
/// paths.compose("query", "name", ".");
/// paths.set_literal("ctx", "user");
///
/// assert_eq!(paths.get("query"), Some("nested.name"));
/// assert_eq!(paths.get("ctx"), Some("user"));
/// assert_eq!(paths.get("header"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SourcePaths {
    inner: IndexMap<String, String>,
}

impl SourcePaths {
    /// Creates an empty set of paths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `key` to the path for `source`, joined with `separator`.
    pub fn compose(&mut self, source: &str, key: &str, separator: &str) {
        match self.inner.get_mut(source) {
            Some(existing) if !existing.is_empty() => {
                existing.push_str(separator);
                existing.push_str(key);
            }
            Some(existing) => key.clone_into(existing),
            None => {
                self.inner.insert(source.to_owned(), key.to_owned());
            }
        }
    }

    /// Sets the path for `source` to `key`, discarding any inherited prefix.
    pub fn set_literal(&mut self, source: &str, key: &str) {
        self.inner.insert(source.to_owned(), key.to_owned());
    }

    /// Returns the path for `source`.
    #[must_use]
    pub fn get(&self, source: &str) -> Option<&str> {
        self.inner.get(source).map(String::as_str)
    }

    /// Returns `true` if any of `sources` has a path.
    pub fn contains_any<'a>(&self, sources: impl IntoIterator<Item = &'a str>) -> bool {
        sources.into_iter().any(|s| self.inner.contains_key(s))
    }

    /// First recorded `(source, path)` pair.
    #[must_use]
    pub fn first(&self) -> Option<(&str, &str)> {
        self.inner
            .first()
            .map(|(source, path)| (source.as_str(), path.as_str()))
    }

    /// Iterates `(source, path)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(s, p)| (s.as_str(), p.as_str()))
    }

    /// Number of sources with a path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if no source has a path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_nested() {
        let mut paths = SourcePaths::new();
        paths.compose("query", "a", ".");
        paths.compose("query", "b", ".");
        paths.compose("query", "c", ".");
        assert_eq!(paths.get("query"), Some("a.b.c"));
    }

    #[test]
    fn test_compose_custom_separator() {
        let mut paths = SourcePaths::new();
        paths.compose("query", "filter", "[");
        paths.compose("query", "name", "[");
        assert_eq!(paths.get("query"), Some("filter[name"));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut parent = SourcePaths::new();
        parent.compose("query", "nested", ".");
        let mut child = parent.clone();
        child.compose("query", "leaf", ".");
        assert_eq!(parent.get("query"), Some("nested"));
        assert_eq!(child.get("query"), Some("nested.leaf"));
    }

    #[test]
    fn test_literal_overrides_prefix() {
        let mut paths = SourcePaths::new();
        paths.compose("ctx", "outer", ".");
        paths.set_literal("ctx", "inner");
        assert_eq!(paths.get("ctx"), Some("inner"));
    }

    #[test]
    fn test_contains_any_and_first() {
        let mut paths = SourcePaths::new();
        assert!(paths.first().is_none());
        paths.compose("header", "x-id", ".");
        paths.set_literal("ctx", "id");
        assert!(paths.contains_any(["ctx"]));
        assert!(!paths.contains_any(["query", "path"]));
        assert_eq!(paths.first(), Some(("header", "x-id")));
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn test_serializes_as_map() {
        let mut paths = SourcePaths::new();
        paths.compose("query", "n", ".");
        assert_eq!(serde_json::to_string(&paths).unwrap(), r#"{"query":"n"}"#);
    }
}
