//! The analyzed extraction plan.

use crate::paths::SourcePaths;
use recordbind_core::{Capabilities, ScalarKind};
use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;

/// Positional path of a field relative to its enclosing record.
pub type IndexPath = SmallVec<[usize; 4]>;

/// How the field setter converts raw values for a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "of")]
pub enum TypeCategory {
    /// A native scalar.
    Scalar(ScalarKind),
    /// A native scalar behind `Option`.
    NullableScalar(ScalarKind),
    /// `std::time::Duration`, possibly behind `Option`.
    Duration,
    /// A type with custom decoding capabilities.
    Capability(Capabilities),
    /// A `Vec` or fixed array; the payload classifies the element.
    Collection(Box<TypeCategory>),
    /// Filled only by direct assignment from a value source.
    Opaque,
}

impl TypeCategory {
    /// Returns `true` for collections.
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }

    /// Returns `true` for capability-decodable fields.
    pub fn is_capability(&self) -> bool {
        matches!(self, Self::Capability(_))
    }
}

/// A field bindable at its schema level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub(crate) field_path: String,
    pub(crate) index_path: IndexPath,
    pub(crate) source_paths: SourcePaths,
    pub(crate) category: TypeCategory,
    pub(crate) type_name: &'static str,
    pub(crate) default_value: Option<String>,
    pub(crate) exploder: Option<String>,
}

impl FieldDescriptor {
    /// Dotted field-name path from the root record.
    pub fn field_path(&self) -> &str {
        &self.field_path
    }

    /// Position relative to the enclosing record.
    pub fn index_path(&self) -> &[usize] {
        &self.index_path
    }

    /// Lookup key per source.
    pub fn source_paths(&self) -> &SourcePaths {
        &self.source_paths
    }

    /// Conversion category.
    pub fn category(&self) -> &TypeCategory {
        &self.category
    }

    /// Declared type name of the field.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Static fallback value.
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Delimiter for multi-valued parameters.
    pub fn exploder(&self) -> Option<&str> {
        self.exploder.as_deref()
    }

    /// Name to report when no source supplied the value: the first source
    /// path, or the field path.
    pub fn display_name(&self) -> &str {
        self.source_paths
            .first()
            .map_or(self.field_path.as_str(), |(_, path)| path)
    }
}

/// Extraction plan for one record level.
///
/// The root covers the target type itself; each child covers a nested record
/// reached through a field that has no direct binding of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub(crate) is_root: bool,
    pub(crate) index_path: IndexPath,
    pub(crate) resolvable: Vec<FieldDescriptor>,
    pub(crate) children: Vec<Schema>,
}

impl Schema {
    pub(crate) fn root() -> Self {
        Self {
            is_root: true,
            index_path: IndexPath::new(),
            resolvable: Vec::new(),
            children: Vec::new(),
        }
    }

    pub(crate) fn child(index: usize) -> Self {
        Self {
            is_root: false,
            index_path: smallvec::smallvec![index],
            resolvable: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Returns `true` for the top-level schema.
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// Position of the owning field in the parent record. Empty for the root.
    pub fn index_path(&self) -> &[usize] {
        &self.index_path
    }

    /// Fields bound at this level, in declaration order.
    pub fn resolvable(&self) -> &[FieldDescriptor] {
        &self.resolvable
    }

    /// Nested schemas, in declaration order.
    pub fn children(&self) -> &[Schema] {
        &self.children
    }

    /// Returns `true` if nothing at or below this level is bindable.
    pub fn is_empty(&self) -> bool {
        self.resolvable.is_empty() && self.children.iter().all(Schema::is_empty)
    }

    /// Total number of bindable fields at or below this level.
    pub fn field_count(&self) -> usize {
        self.resolvable.len() + self.children.iter().map(Schema::field_count).sum::<usize>()
    }

    /// Finds a descriptor anywhere in the tree by its field path.
    pub fn find(&self, field_path: &str) -> Option<&FieldDescriptor> {
        self.resolvable
            .iter()
            .find(|d| d.field_path == field_path)
            .or_else(|| self.children.iter().find_map(|c| c.find(field_path)))
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
