//! Query string source.

use crate::context::ExtractionContext;
use recordbind_core::BoxError;
use recordbind_decoder::StringsSource;

/// Directive name of [`QuerySource`].
pub const QUERY: &str = "query";

/// Reads URL query parameters.
///
/// Returns every value of a repeated key in order of appearance. Values are
/// percent-decoded; a comma is not a separator unless the field declares an
/// exploder.
///
/// # Example
///
/// ```rust
/// use recordbind_decoder::StringsSource;
/// use recordbind_extract::{ExtractionContext, QuerySource};
/// use http::Uri;
///
/// let ctx = ExtractionContext::builder()
///     .uri(Uri::from_static("/users?id=1&id=2&q=a%2Cb"))
///     .build();
///
/// assert_eq!(QuerySource.extract(&ctx, "id").unwrap(), vec!["1", "2"]);
/// assert_eq!(QuerySource.extract(&ctx, "q").unwrap(), vec!["a,b"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct QuerySource;

impl StringsSource<ExtractionContext> for QuerySource {
    fn name(&self) -> &str {
        QUERY
    }

    fn extract(&self, ctx: &ExtractionContext, key: &str) -> Result<Vec<String>, BoxError> {
        Ok(ctx
            .query_values(key)?
            .into_iter()
            .map(str::to_owned)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Uri;

    fn ctx(uri: &'static str) -> ExtractionContext {
        ExtractionContext::builder().uri(Uri::from_static(uri)).build()
    }

    #[test]
    fn test_missing_key_is_empty() {
        assert!(QuerySource.extract(&ctx("/"), "n").unwrap().is_empty());
        assert!(QuerySource.extract(&ctx("/?m=1"), "n").unwrap().is_empty());
    }

    #[test]
    fn test_empty_value_is_kept() {
        assert_eq!(QuerySource.extract(&ctx("/?n="), "n").unwrap(), vec![""]);
    }

    #[test]
    fn test_nested_keys_are_literal() {
        let ctx = ctx("/?filter.name=x&filter=y");
        assert_eq!(QuerySource.extract(&ctx, "filter.name").unwrap(), vec!["x"]);
        assert_eq!(QuerySource.extract(&ctx, "filter").unwrap(), vec!["y"]);
    }
}
