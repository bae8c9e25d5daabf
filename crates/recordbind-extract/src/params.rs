//! Path parameters captured by a router.
//!
//! Routing itself happens outside recordbind; the router hands over the
//! captured `(name, value)` pairs and [`PathSource`](crate::PathSource)
//! answers lookups from them.

use smallvec::SmallVec;

/// Parameters stored inline before spilling to the heap.
const INLINE_PARAMS: usize = 4;

/// Captured path parameters, in route order.
///
/// # Example
///
/// ```rust
/// use recordbind_extract::Params;
///
/// let params: Params = [("org", "acme"), ("id", "42")].into_iter().collect();
///
/// assert_eq!(params.get("id"), Some("42"));
/// assert_eq!(params.get("user"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter. A later duplicate name is shadowed by the first.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the value captured for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of captured parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter
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
    fn test_params_push_and_get() {
        let mut params = Params::new();
        assert!(params.is_empty());

        params.push("id", "123");
        params.push("name", "alice");

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("id"), Some("123"));
        assert_eq!(params.get("name"), Some("alice"));
        assert_eq!(params.get("unknown"), None);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let params: Params = [("id", "1"), ("id", "2")].into_iter().collect();
        assert_eq!(params.get("id"), Some("1"));
    }

    #[test]
    fn test_params_spill_past_inline_capacity() {
        let params: Params = (0..10).map(|i| (format!("key{i}"), format!("value{i}"))).collect();

        assert_eq!(params.len(), 10);
        assert_eq!(params.get("key7"), Some("value7"));
        assert_eq!(params.iter().next(), Some(("key0", "value0")));
    }
}
