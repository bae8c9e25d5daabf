//! Type schema analysis for recordbind.
//!
//! This crate turns a record's static [`TypeInfo`](recordbind_core::TypeInfo)
//! into a [`Schema`]: an immutable extraction plan listing, per record level,
//! the fields bindable there and the nested levels below it. Schemas are built
//! once per type and shared through [`SchemaCache`].
//!
//! # Example
//!
//! ```rust,ignore
//! use recordbind_macros::Bindable;
//! use recordbind_schema::{Analyzer, SchemaCache};
//!
//! #[derive(Default, Bindable)]
//! struct Input {
//!     #[bind(query = "n")]
//!     number: i32,
//! }
//!
//! let cache = SchemaCache::new(Analyzer::new(["query", "path", "header"], ["ctx"]));
//! let schema = cache.get_or_analyze::<Input>()?;
//! assert_eq!(schema.resolvable()[0].source_paths().get("query"), Some("n"));
//! ```
//!
//! # Schema tree
//!
//! ```text
//!   Input (root)
//!     ├── resolvable: number  [query: n]
//!     └── child #2: Filter
//!           └── resolvable: name  [query: filter.name]
//! ```

mod analyzer;
mod cache;
mod error;
mod paths;
mod schema;

pub use analyzer::{
    AnalysisPolicy, Analyzer, DEFAULT_DIRECTIVE, DEFAULT_SEPARATOR, EXPLODER_DIRECTIVE,
};
pub use cache::SchemaCache;
pub use error::AnalysisError;
pub use paths::SourcePaths;
pub use schema::{FieldDescriptor, IndexPath, Schema, TypeCategory};
