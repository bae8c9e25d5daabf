//! Request-scoped value source.

use crate::context::ExtractionContext;
use recordbind_core::{BoxError, Opaque};
use recordbind_decoder::ValueSource;

/// Directive name of [`ContextSource`].
pub const CONTEXT: &str = "ctx";

/// Reads typed values stored on the context by earlier request layers.
///
/// A value of the field's own type is assigned directly; text values are
/// parsed like any other source.
///
/// # Example
///
/// ```rust
/// use recordbind_core::Opaque;
/// use recordbind_decoder::ValueSource;
/// use recordbind_extract::{ContextSource, ExtractionContext};
///
/// let ctx = ExtractionContext::builder()
///     .value("user_id", Opaque::new(42_u64))
///     .build();
///
/// let value = ContextSource.extract(&ctx, "user_id").unwrap().unwrap();
/// assert_eq!(value.downcast_ref::<u64>(), Some(&42));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextSource;

impl ValueSource<ExtractionContext> for ContextSource {
    fn name(&self) -> &str {
        CONTEXT
    }

    fn extract(&self, ctx: &ExtractionContext, key: &str) -> Result<Option<Opaque>, BoxError> {
        Ok(ctx.value(key).cloned())
    }
}
