//! Converting raw values into a destination field.
//!
//! Precedence for one field:
//!
//! 1. an [`Opaque`] value of the destination's own type is assigned as is
//! 2. otherwise the value must read as text, else `IncompatibleType`
//! 3. an empty list leaves the field untouched
//! 4. collections are rebuilt element by element
//! 5. anything else takes exactly one value (capability types take the first)
//!
//! Each single value then goes through the destination's slot: `Option` is
//! filled from a fresh default, capability types decode (text, structured,
//! binary), durations and scalars parse. Conversion happens on a scratch
//! value and the field is only written once it succeeds.

use crate::source::RawValue;
use recordbind_core::{
    parse_duration, BindError, BindResult, Bindable, Decodable, ErrorKind, Opaque, ScalarKind,
    Slot,
};
use recordbind_schema::TypeCategory;

/// Writes raw values into one destination field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSetter<'a> {
    category: &'a TypeCategory,
    type_name: &'static str,
}

impl<'a> FieldSetter<'a> {
    /// Creates a setter for a field of the given category and declared type.
    pub fn new(category: &'a TypeCategory, type_name: &'static str) -> Self {
        Self {
            category,
            type_name,
        }
    }

    /// Sets `dest` from `value`.
    pub fn set(&self, dest: &mut dyn Bindable, value: &RawValue) -> BindResult<()> {
        match value {
            RawValue::Opaque(opaque) => self.set_opaque(dest, opaque),
            RawValue::Strings(list) => {
                let list: Vec<&str> = list.iter().map(String::as_str).collect();
                self.set_strings(dest, &list)
            }
        }
    }

    fn set_opaque(&self, dest: &mut dyn Bindable, value: &Opaque) -> BindResult<()> {
        if dest.assign_opaque(value) {
            return Ok(());
        }
        let Some(text) = value.as_text() else {
            return Err(BindError::incompatible_type(
                value.type_name(),
                self.type_name,
            ));
        };
        self.set_strings(dest, &[text])
    }

    fn set_strings(&self, dest: &mut dyn Bindable, list: &[&str]) -> BindResult<()> {
        let Some(first) = list.first() else {
            return Ok(());
        };
        if let TypeCategory::Collection(element) = self.category {
            return self.set_collection(dest, element, list);
        }
        if list.len() > 1 && !self.category.is_capability() {
            return Err(BindError::multiple_values(list.len(), self.type_name));
        }
        self.set_single(dest, first)
    }

    fn set_collection(
        &self,
        dest: &mut dyn Bindable,
        element: &TypeCategory,
        list: &[&str],
    ) -> BindResult<()> {
        match dest.slot() {
            Slot::Nullable(nullable) => {
                nullable.set_with(&mut |inner| self.set_collection(inner, element, list))
            }
            Slot::Sequence(sequence) => {
                if let Some(expected) = sequence.fixed_len() {
                    if expected != list.len() {
                        return Err(BindError::arity_mismatch(
                            expected,
                            list.len(),
                            self.type_name,
                        ));
                    }
                }
                let item_setter = FieldSetter::new(element, self.type_name);
                sequence.build_with(list.len(), &mut |index, item| {
                    let raw = list
                        .get(index)
                        .ok_or_else(|| BindError::unsupported_type(self.type_name))?;
                    item_setter
                        .set_single(item, raw)
                        .map_err(|e| e.with_index(index))
                })
            }
            _ => Err(BindError::unsupported_type(self.type_name)),
        }
    }

    fn set_single(&self, dest: &mut dyn Bindable, raw: &str) -> BindResult<()> {
        match dest.slot() {
            Slot::Nullable(nullable) => nullable.set_with(&mut |inner| self.set_single(inner, raw)),
            Slot::Decodable(decodable) => self.decode(decodable, raw),
            Slot::Duration(duration) => {
                *duration = parse_duration(raw).map_err(|e| {
                    BindError::invalid_value(ErrorKind::InvalidDuration, raw, "duration", Box::new(e))
                })?;
                Ok(())
            }
            Slot::Scalar(scalar) => {
                let kind = scalar.kind();
                scalar
                    .parse_assign(raw)
                    .map_err(|e| BindError::invalid_value(scalar_error(kind), raw, kind.name(), e))
            }
            Slot::Record(_) | Slot::Sequence(_) | Slot::Opaque => {
                Err(BindError::unsupported_type(self.type_name))
            }
        }
    }

    fn decode(&self, target: &mut dyn Decodable, raw: &str) -> BindResult<()> {
        let capabilities = target.capabilities();
        if !(capabilities.text || capabilities.structured || capabilities.binary) {
            return Err(BindError::unsupported_type(self.type_name));
        }
        let result = target.decode_fresh(&mut |fresh| {
            if capabilities.text {
                fresh.decode_text(raw)
            } else if capabilities.structured {
                fresh.decode_structured(raw.as_bytes())
            } else {
                fresh.decode_binary(raw.as_bytes())
            }
        });
        result.map_err(|e| BindError::invalid_value(ErrorKind::DecodeFailure, raw, self.type_name, e))
    }
}

const fn scalar_error(kind: ScalarKind) -> ErrorKind {
    if kind.is_signed_integer() {
        ErrorKind::InvalidInteger
    } else if kind.is_unsigned_integer() {
        ErrorKind::InvalidPositiveInteger
    } else if kind.is_float() {
        ErrorKind::InvalidFloat
    } else {
        // Strings never fail to parse.
        ErrorKind::InvalidBoolean
    }
}
