//! Derive macro for recordbind.
//!
//! `#[derive(Bindable)]` generates the type metadata and field access the
//! binding engine needs for a record. Field directives live in `#[bind(...)]`
//! attributes.
//!
//! # Example
//!
//! ```rust,ignore
//! use recordbind_macros::Bindable;
//!
//! #[derive(Debug, Default, Bindable)]
//! struct ListUsers {
//!     #[bind(query = "limit", default = "20")]
//!     limit: u32,
//!     #[bind(query = "emails", exploder = ",")]
//!     emails: Vec<String>,
//!     #[bind(header = "x-tenant")]
//!     tenant: Option<String>,
//!     #[bind(flatten)]
//!     page: Page,
//! }
//! ```
//!
//! # Field attributes
//!
//! - `source = "key"`: any name/value pair is recorded as a directive. The
//!   analyzer decides which names are sources (`query`, `path`, `header`,
//!   `ctx`, ...) and treats `default` and `exploder` specially.
//! - `flatten`: embedded sub-record; its fields do not get a field-path prefix.
//! - `skip`: the field is invisible to the engine.
//!
//! # Container attributes
//!
//! - `decode(text, structured, binary)`: the type is a leaf decoded by its
//!   own `TextDecode` / `StructuredDecode` / `BinaryDecode` implementations.
//!   Requires `Default`.
//! - `crate = "path"`: path to `recordbind-core` when it is not a direct
//!   dependency, e.g. `crate = "recordbind::core"`.

mod derive;
mod parse;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `Bindable` (and `Record` or `Decodable`) for a type.
///
/// See the crate documentation for the supported attributes.
#[proc_macro_derive(Bindable, attributes(bind))]
pub fn derive_bindable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand_bindable(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
