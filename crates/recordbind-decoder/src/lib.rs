//! # recordbind decoder
//!
//! Fills a record from its extraction sources following an analyzed
//! [`Schema`](recordbind_schema::Schema).
//!
//! ## Flow
//!
//! ```text
//! Schema level ──► pick a winner per field ──► resolve the record chain once
//!      │              (strings, values, default)        │
//!      │                                                ▼
//!      └──────────► children (lazily) ◄──────── FieldSetter per winner
//! ```
//!
//! For each field the first string source with a non-empty answer wins, then
//! the first value source with a value, then the field's default. Nested
//! records behind `Option` stay `None` unless something below them is set.
//!
//! ## Example
//!
//! ```
//! use recordbind_core::{Bindable, FieldInfo, Opaque, Record, Shape, Slot, TypeInfo};
//! use recordbind_decoder::{Decoder, FnStringsSource, SourceSet};
//!
//! #[derive(Default)]
//! struct Page {
//!     size: u32,
//! }
//!
//! impl Bindable for Page {
//!     fn type_info() -> TypeInfo {
//!         TypeInfo::of::<Self>(Shape::Record(vec![
//!             FieldInfo::new("size", u32::type_info).with_tags(&[("query", "size")]),
//!         ]))
//!     }
//!     fn slot(&mut self) -> Slot<'_> {
//!         Slot::Record(self)
//!     }
//!     fn assign_opaque(&mut self, _value: &Opaque) -> bool {
//!         false
//!     }
//! }
//!
//! impl Record for Page {
//!     fn field_mut(&mut self, index: usize) -> Option<&mut dyn Bindable> {
//!         (index == 0).then_some(&mut self.size as &mut dyn Bindable)
//!     }
//! }
//!
//! let sources: SourceSet<&str> = SourceSet::new().with_strings(FnStringsSource::new(
//!     "query",
//!     |raw: &&str, _key: &str| Ok(vec![raw.to_string()]),
//! ));
//! let schema = sources.analyzer().analyze_type::<Page>().unwrap();
//!
//! let mut page = Page::default();
//! Decoder::new(&sources, &"25").decode_into(&schema, &mut page).unwrap();
//! assert_eq!(page.size, 25);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod decoder;
mod setter;
pub mod source;

pub use decoder::{Decoder, DEFAULT_SOURCE};
pub use setter::FieldSetter;
pub use source::{FnStringsSource, FnValueSource, RawValue, SourceSet, StringsSource, ValueSource};
