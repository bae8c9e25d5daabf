//! The [`Bindable`] trait and the mutable views it exposes.

use crate::decode::Decodable;
use crate::error::{BindResult, BoxError};
use crate::opaque::Opaque;
use crate::shape::{ScalarKind, Shape, TypeInfo};
use std::any::Any;
use std::time::Duration;

/// A type the engine can describe and write into.
///
/// Implemented for scalars, `String`, [`Duration`], `Option<T>`, `Vec<T>` and
/// `[T; N]`; records get it from `#[derive(Bindable)]`.
pub trait Bindable: 'static {
    /// Static description of the type.
    fn type_info() -> TypeInfo
    where
        Self: Sized;

    /// Mutable view used by the field setter.
    fn slot(&mut self) -> Slot<'_>;

    /// Assigns `value` if it holds exactly this type.
    ///
    /// Returns `false` and leaves `self` untouched otherwise.
    fn assign_opaque(&mut self, value: &Opaque) -> bool;
}

/// Assigns a clone of `value` to `dest` when the types match.
///
/// The usual body of [`Bindable::assign_opaque`].
pub fn assign_from<T: Any>(dest: &mut T, value: &Opaque) -> bool {
    match value.clone_as::<T>() {
        Some(v) => {
            *dest = v;
            true
        }
        None => false,
    }
}

/// Mutable view of a bindable value, by shape.
pub enum Slot<'a> {
    /// A record; nested fields are reached by index.
    Record(&'a mut dyn Record),
    /// An `Option<T>`.
    Nullable(&'a mut dyn Nullable),
    /// A `Vec<T>` or `[T; N]`.
    Sequence(&'a mut dyn Sequence),
    /// A native scalar.
    Scalar(&'a mut dyn Scalar),
    /// A [`Duration`].
    Duration(&'a mut Duration),
    /// A type with custom decoding capabilities.
    Decodable(&'a mut dyn Decodable),
    /// A type only reachable through [`Bindable::assign_opaque`].
    Opaque,
}

/// Field access on a record.
pub trait Record {
    /// Returns the field at `index`, counted over the fields listed in the
    /// record's [`Shape::Record`].
    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Bindable>;
}

/// One level of nullable indirection.
pub trait Nullable {
    /// Returns `true` if no value is allocated.
    fn is_null(&self) -> bool;

    /// Returns the inner value, allocating a default one if absent.
    fn get_or_allocate(&mut self) -> &mut dyn Bindable;

    /// Fills a fresh default inner value with `fill` and stores it only if
    /// `fill` succeeds. On error `self` is left as it was.
    fn set_with(
        &mut self,
        fill: &mut dyn FnMut(&mut dyn Bindable) -> BindResult<()>,
    ) -> BindResult<()>;
}

/// A variable or fixed length collection.
pub trait Sequence {
    /// `Some(N)` for fixed-size arrays.
    fn fixed_len(&self) -> Option<usize>;

    /// Current number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds a fresh collection of `len` elements, passing each default
    /// element with its index to `fill`, and replaces `self` with it only if
    /// every element succeeds. On error `self` is left as it was.
    ///
    /// Fixed-size arrays always build `N` elements and ignore `len`.
    fn build_with(
        &mut self,
        len: usize,
        fill: &mut dyn FnMut(usize, &mut dyn Bindable) -> BindResult<()>,
    ) -> BindResult<()>;
}

/// A native scalar parsed from text.
pub trait Scalar {
    /// Scalar kind.
    fn kind(&self) -> ScalarKind;

    /// Parses `raw` and stores the result.
    fn parse_assign(&mut self, raw: &str) -> Result<(), BoxError>;
}

macro_rules! impl_bindable {
    ($ty:ty, $shape:expr, $slot:ident) => {
        impl Bindable for $ty {
            fn type_info() -> TypeInfo {
                TypeInfo::of::<$ty>($shape)
            }

            fn slot(&mut self) -> Slot<'_> {
                Slot::$slot(self)
            }

            fn assign_opaque(&mut self, value: &Opaque) -> bool {
                assign_from(self, value)
            }
        }
    };
}

macro_rules! impl_parsed_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Scalar for $ty {
            fn kind(&self) -> ScalarKind {
                ScalarKind::$kind
            }

            fn parse_assign(&mut self, raw: &str) -> Result<(), BoxError> {
                *self = raw.parse::<$ty>()?;
                Ok(())
            }
        }

        impl_bindable!($ty, Shape::Scalar(ScalarKind::$kind), Scalar);
    )*};
}

impl_parsed_scalar! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
}

impl Scalar for String {
    fn kind(&self) -> ScalarKind {
        ScalarKind::Str
    }

    fn parse_assign(&mut self, raw: &str) -> Result<(), BoxError> {
        raw.clone_into(self);
        Ok(())
    }
}

impl_bindable!(String, Shape::Scalar(ScalarKind::Str), Scalar);

impl Scalar for bool {
    fn kind(&self) -> ScalarKind {
        ScalarKind::Bool
    }

    fn parse_assign(&mut self, raw: &str) -> Result<(), BoxError> {
        *self = match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => true,
            "0" | "f" | "F" | "FALSE" | "false" | "False" => false,
            _ => return Err(format!("unrecognized boolean \"{raw}\"").into()),
        };
        Ok(())
    }
}

impl_bindable!(bool, Shape::Scalar(ScalarKind::Bool), Scalar);

impl_bindable!(Duration, Shape::Duration, Duration);

impl<T: Bindable + Default> Nullable for Option<T> {
    fn is_null(&self) -> bool {
        self.is_none()
    }

    fn get_or_allocate(&mut self) -> &mut dyn Bindable {
        self.get_or_insert_with(T::default)
    }

    fn set_with(
        &mut self,
        fill: &mut dyn FnMut(&mut dyn Bindable) -> BindResult<()>,
    ) -> BindResult<()> {
        let mut inner = T::default();
        fill(&mut inner)?;
        *self = Some(inner);
        Ok(())
    }
}

impl<T: Bindable + Default> Bindable for Option<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Shape::Nullable(Box::new(T::type_info())))
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Nullable(self)
    }

    fn assign_opaque(&mut self, value: &Opaque) -> bool {
        if assign_from(self, value) {
            return true;
        }
        let mut inner = T::default();
        if inner.assign_opaque(value) {
            *self = Some(inner);
            true
        } else {
            false
        }
    }
}

impl<T: Bindable + Default> Sequence for Vec<T> {
    fn fixed_len(&self) -> Option<usize> {
        None
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn build_with(
        &mut self,
        len: usize,
        fill: &mut dyn FnMut(usize, &mut dyn Bindable) -> BindResult<()>,
    ) -> BindResult<()> {
        let mut fresh = Vec::with_capacity(len);
        for index in 0..len {
            let mut element = T::default();
            fill(index, &mut element)?;
            fresh.push(element);
        }
        *self = fresh;
        Ok(())
    }
}

impl<T: Bindable + Default> Bindable for Vec<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Shape::Sequence(Box::new(T::type_info())))
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Sequence(self)
    }

    fn assign_opaque(&mut self, value: &Opaque) -> bool {
        assign_from(self, value)
    }
}

impl<T: Bindable + Default, const N: usize> Sequence for [T; N] {
    fn fixed_len(&self) -> Option<usize> {
        Some(N)
    }

    fn len(&self) -> usize {
        N
    }

    fn build_with(
        &mut self,
        _len: usize,
        fill: &mut dyn FnMut(usize, &mut dyn Bindable) -> BindResult<()>,
    ) -> BindResult<()> {
        let mut fresh: [T; N] = std::array::from_fn(|_| T::default());
        for (index, element) in fresh.iter_mut().enumerate() {
            fill(index, element)?;
        }
        *self = fresh;
        Ok(())
    }
}

impl<T: Bindable + Default, const N: usize> Bindable for [T; N] {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Shape::Array {
            len: N,
            element: Box::new(T::type_info()),
        })
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Sequence(self)
    }

    fn assign_opaque(&mut self, value: &Opaque) -> bool {
        assign_from(self, value)
    }
}
