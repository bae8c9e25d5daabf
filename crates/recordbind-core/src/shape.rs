//! Static type descriptions.
//!
//! A [`TypeInfo`] is produced by [`Bindable::type_info`](crate::Bindable::type_info)
//! and describes everything the schema analyzer needs to know about a type
//! without holding an instance of it.

use serde::Serialize;
use std::any::TypeId;
use std::fmt;

/// Native scalar kinds the field setter can parse from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    /// `String`, never fails to parse.
    Str,
    /// `bool`.
    Bool,
    /// `i8`.
    I8,
    /// `i16`.
    I16,
    /// `i32`.
    I32,
    /// `i64`.
    I64,
    /// `isize`.
    Isize,
    /// `u8`.
    U8,
    /// `u16`.
    U16,
    /// `u32`.
    U32,
    /// `u64`.
    U64,
    /// `usize`.
    Usize,
    /// `f32`.
    F32,
    /// `f64`.
    F64,
}

impl ScalarKind {
    /// Rust name of the scalar type.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// Returns `true` for the signed integer kinds.
    pub const fn is_signed_integer(self) -> bool {
        matches!(
            self,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::Isize
        )
    }

    /// Returns `true` for the unsigned integer kinds.
    pub const fn is_unsigned_integer(self) -> bool {
        matches!(
            self,
            Self::U8 | Self::U16 | Self::U32 | Self::U64 | Self::Usize
        )
    }

    /// Returns `true` for `f32` and `f64`.
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }
}

/// Custom decoding capabilities a type advertises.
///
/// When several are present the field setter tries them in the order
/// text, structured, binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Capabilities {
    /// Decodes from a text representation.
    pub text: bool,
    /// Decodes from a structured document (JSON).
    pub structured: bool,
    /// Decodes from raw bytes.
    pub binary: bool,
}

impl Capabilities {
    /// No capability.
    pub const NONE: Self = Self::new(false, false, false);
    /// Text decoding only.
    pub const TEXT: Self = Self::new(true, false, false);
    /// Structured decoding only.
    pub const STRUCTURED: Self = Self::new(false, true, false);
    /// Binary decoding only.
    pub const BINARY: Self = Self::new(false, false, true);

    /// Creates a capability set.
    pub const fn new(text: bool, structured: bool, binary: bool) -> Self {
        Self {
            text,
            structured,
            binary,
        }
    }

    /// Combines two capability sets.
    pub const fn union(self, other: Self) -> Self {
        Self::new(
            self.text || other.text,
            self.structured || other.structured,
            self.binary || other.binary,
        )
    }

    /// Returns `true` if at least one capability is present.
    pub const fn any(self) -> bool {
        self.text || self.structured || self.binary
    }
}

/// Structural shape of a bindable type.
#[derive(Debug, Clone)]
pub enum Shape {
    /// A composite record with named fields in declaration order.
    Record(Vec<FieldInfo>),
    /// `Option<T>`: one level of nullable indirection.
    Nullable(Box<TypeInfo>),
    /// `Vec<T>`.
    Sequence(Box<TypeInfo>),
    /// `[T; N]`.
    Array {
        /// Number of elements.
        len: usize,
        /// Element type.
        element: Box<TypeInfo>,
    },
    /// A native scalar.
    Scalar(ScalarKind),
    /// `std::time::Duration`.
    Duration,
    /// Anything else. Only direct assignment or a custom capability can fill it.
    Opaque,
}

/// Static description of a bindable type.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    name: &'static str,
    type_id: TypeId,
    shape: Shape,
    capabilities: Capabilities,
}

impl TypeInfo {
    /// Describes `T` with the given shape and no capabilities.
    pub fn of<T: 'static>(shape: Shape) -> Self {
        Self {
            name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
            shape,
            capabilities: Capabilities::NONE,
        }
    }

    /// Sets the custom decoding capabilities.
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type identity.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Structural shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Custom decoding capabilities of the type itself.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Record fields, if this is a record.
    pub fn fields(&self) -> Option<&[FieldInfo]> {
        match &self.shape {
            Shape::Record(fields) => Some(fields),
            _ => None,
        }
    }
}

/// One field of a record.
///
/// `tags` holds every `key = "value"` pair of the field's `#[bind(...)]`
/// attribute in declaration order. The field type is described lazily so that
/// recursive records do not recurse while building their own metadata.
#[derive(Clone, Copy)]
pub struct FieldInfo {
    name: &'static str,
    tags: &'static [(&'static str, &'static str)],
    flatten: bool,
    type_info: fn() -> TypeInfo,
}

impl FieldInfo {
    /// Creates a field with no tags.
    pub const fn new(name: &'static str, type_info: fn() -> TypeInfo) -> Self {
        Self {
            name,
            tags: &[],
            flatten: false,
            type_info,
        }
    }

    /// Attaches the field's directive tags.
    pub const fn with_tags(mut self, tags: &'static [(&'static str, &'static str)]) -> Self {
        self.tags = tags;
        self
    }

    /// Marks the field as an embedded sub-record.
    pub const fn flattened(mut self) -> Self {
        self.flatten = true;
        self
    }

    /// Field name as declared.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All directive tags.
    pub fn tags(&self) -> &'static [(&'static str, &'static str)] {
        self.tags
    }

    /// Looks up a tag by key. The first occurrence wins.
    pub fn tag(&self, key: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| *value)
    }

    /// Returns `true` for embedded sub-records.
    pub fn is_flattened(&self) -> bool {
        self.flatten
    }

    /// Describes the field's declared type.
    pub fn type_info(&self) -> TypeInfo {
        (self.type_info)()
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("flatten", &self.flatten)
            .finish_non_exhaustive()
    }
}
