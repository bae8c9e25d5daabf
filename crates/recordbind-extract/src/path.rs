//! Path parameter source.

use crate::context::ExtractionContext;
use recordbind_core::BoxError;
use recordbind_decoder::StringsSource;

/// Directive name of [`PathSource`].
pub const PATH: &str = "path";

/// Reads router-captured path parameters.
///
/// An absent or empty parameter yields no value.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathSource;

impl StringsSource<ExtractionContext> for PathSource {
    fn name(&self) -> &str {
        PATH
    }

    fn extract(&self, ctx: &ExtractionContext, key: &str) -> Result<Vec<String>, BoxError> {
        Ok(ctx
            .path_params()
            .get(key)
            .filter(|value| !value.is_empty())
            .map(|value| vec![value.to_owned()])
            .unwrap_or_default())
    }
}
