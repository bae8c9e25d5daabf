//! # Recordbind Core
//!
//! Type metadata and mutable views shared by every recordbind crate.
//!
//! Rust has no runtime reflection, so each bindable type describes itself
//! through the [`Bindable`] trait:
//!
//! - [`TypeInfo`] / [`Shape`] - static description of a type, walked once by the analyzer
//! - [`Slot`] - mutable, type-erased view the field setter writes through
//! - [`Opaque`] - an arbitrary value handed over by a single-value source
//! - [`BindError`] - attributed binding failure with an [`ErrorKind`]
//!
//! Records normally get their implementation from `#[derive(Bindable)]` in
//! `recordbind-macros`. Scalars, `String`, [`std::time::Duration`],
//! `Option<T>`, `Vec<T>` and `[T; N]` are covered here.

#![doc(html_root_url = "https://docs.rs/recordbind-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bindable;
pub mod decode;
pub mod duration;
mod error;
mod opaque;
mod shape;

pub use bindable::{assign_from, Bindable, Nullable, Record, Scalar, Sequence, Slot};
pub use decode::{
    unsupported_capability, BinaryDecode, Decodable, Json, Parsed, StructuredDecode, TextDecode,
};
pub use duration::{parse_duration, DurationError};
pub use error::{BindError, BindResult, BoxError, ErrorKind};
pub use opaque::Opaque;
pub use shape::{Capabilities, FieldInfo, ScalarKind, Shape, TypeInfo};
