//! # recordbind extract
//!
//! HTTP request context and the built-in extraction sources for recordbind.
//!
//! | Source | Directive | Yields |
//! |--------|-----------|--------|
//! | [`QuerySource`] | `query` | every value of a query key |
//! | [`PathSource`] | `path` | the router-captured parameter |
//! | [`HeaderSource`] | `header` | every value of a header |
//! | [`ContextSource`] | `ctx` | a typed request-scoped value |
//!
//! All sources read from an [`ExtractionContext`]. [`read_json`] supports the
//! optional body pre-pass.
//!
//! ## Example
//!
//! ```rust
//! use recordbind_core::Opaque;
//! use recordbind_decoder::Decoder;
//! use recordbind_extract::{http_sources, ExtractionContext};
//! use http::Uri;
//! # use recordbind_core::{Bindable, FieldInfo, Record, Shape, Slot, TypeInfo};
//! # #[derive(Default)]
//! # struct Lookup { id: u64, tenant: String }
//! # impl Bindable for Lookup {
//! #     fn type_info() -> TypeInfo {
//! #         TypeInfo::of::<Self>(Shape::Record(vec![
//! #             FieldInfo::new("id", u64::type_info).with_tags(&[("path", "id")]),
//! #             FieldInfo::new("tenant", String::type_info).with_tags(&[("ctx", "tenant")]),
//! #         ]))
//! #     }
//! #     fn slot(&mut self) -> Slot<'_> { Slot::Record(self) }
//! #     fn assign_opaque(&mut self, _value: &Opaque) -> bool { false }
//! # }
//! # impl Record for Lookup {
//! #     fn field_mut(&mut self, index: usize) -> Option<&mut dyn Bindable> {
//! #         match index { 0 => Some(&mut self.id), 1 => Some(&mut self.tenant), _ => None }
//! #     }
//! # }
//!
//! let ctx = ExtractionContext::builder()
//!     .uri(Uri::from_static("/users/7"))
//!     .path_param("id", "7")
//!     .value("tenant", Opaque::new(String::from("acme")))
//!     .build();
//!
//! let sources = http_sources();
//! let schema = sources.analyzer().analyze_type::<Lookup>().unwrap();
//! let mut lookup = Lookup::default();
//! Decoder::new(&sources, &ctx).decode_into(&schema, &mut lookup).unwrap();
//!
//! assert_eq!(lookup.id, 7);
//! assert_eq!(lookup.tenant, "acme");
//! ```

#![doc(html_root_url = "https://docs.rs/recordbind-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod body;
mod context;
mod error;
mod header;
mod params;
mod path;
mod query;
mod registry;
mod value;

pub use body::{read_json, DEFAULT_MAX_BODY_BYTES};
pub use context::{ExtractionContext, ExtractionContextBuilder};
pub use error::{BodyError, ExtractionError, ExtractionSource, UnknownSource};
pub use header::{HeaderSource, HEADER};
pub use params::Params;
pub use path::{PathSource, PATH};
pub use query::{QuerySource, QUERY};
pub use registry::{
    build_sources, http_sources, strings_source, value_source, STRING_SOURCES, VALUE_SOURCES,
};
pub use value::{ContextSource, CONTEXT};
