//! JSON body pre-pass.
//!
//! Before source decoding, a record may be filled from the request body.
//! Source values then overlay whatever the body set.

use crate::context::ExtractionContext;
use crate::error::BodyError;
use serde::de::DeserializeOwned;

/// Default maximum body size (256 KiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 256 * 1024;

/// Deserializes the request body as JSON.
///
/// Returns `Ok(None)` for an empty body.
///
/// # Errors
///
/// [`BodyError::TooLarge`] when the body exceeds `max_bytes`, and
/// [`BodyError::Malformed`] when it is not valid JSON for `T`.
///
/// # Example
///
/// ```rust
/// use recordbind_extract::{read_json, ExtractionContext, DEFAULT_MAX_BODY_BYTES};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct CreateUser {
///     name: String,
/// }
///
/// let ctx = ExtractionContext::builder().body(r#"{"name": "Alice"}"#).build();
/// let user: CreateUser = read_json(&ctx, DEFAULT_MAX_BODY_BYTES).unwrap().unwrap();
/// assert_eq!(user.name, "Alice");
/// ```
pub fn read_json<T: DeserializeOwned>(
    ctx: &ExtractionContext,
    max_bytes: usize,
) -> Result<Option<T>, BodyError> {
    let body = ctx.body();
    if body.is_empty() {
        return Ok(None);
    }
    if body.len() > max_bytes {
        return Err(BodyError::TooLarge {
            limit: max_bytes,
            actual: body.len(),
        });
    }
    Ok(Some(serde_json::from_slice(body)?))
}
