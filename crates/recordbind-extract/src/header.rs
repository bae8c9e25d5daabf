//! Header source.

use crate::context::ExtractionContext;
use crate::error::{ExtractionError, ExtractionSource};
use recordbind_core::BoxError;
use recordbind_decoder::StringsSource;

/// Directive name of [`HeaderSource`].
pub const HEADER: &str = "header";

/// Reads request headers.
///
/// Names are matched case-insensitively and every non-empty occurrence is
/// returned. A value that is not visible ASCII fails the extraction.
///
/// # Example
///
/// ```rust
/// use recordbind_decoder::StringsSource;
/// use recordbind_extract::{ExtractionContext, HeaderSource};
///
/// let ctx = ExtractionContext::builder()
///     .header("x-request-id", "abc-123")
///     .build();
///
/// assert_eq!(HeaderSource.extract(&ctx, "X-Request-Id").unwrap(), vec!["abc-123"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderSource;

impl StringsSource<ExtractionContext> for HeaderSource {
    fn name(&self) -> &str {
        HEADER
    }

    fn extract(&self, ctx: &ExtractionContext, key: &str) -> Result<Vec<String>, BoxError> {
        let mut values = Vec::new();
        for value in ctx.headers().get_all(key) {
            let text = value
                .to_str()
                .map_err(|_| ExtractionError::invalid_encoding(ExtractionSource::Header, key))?;
            if !text.is_empty() {
                values.push(text.to_owned());
            }
        }
        Ok(values)
    }
}
