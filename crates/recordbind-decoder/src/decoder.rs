//! Schema-driven decoding.

use crate::setter::FieldSetter;
use crate::source::{RawValue, SourceSet};
use recordbind_core::{BindError, BindResult, Bindable, ErrorKind, Opaque, Record, Slot};
use recordbind_schema::{FieldDescriptor, Schema};

/// Source name reported for values taken from a field's default.
pub const DEFAULT_SOURCE: &str = "default";

/// Fills a record from a [`SourceSet`] following a [`Schema`].
///
/// A decoder borrows the sources and the request context for one decode
/// pass. Nested records reached through `Option` are allocated only when a
/// field below them actually receives a value.
///
/// # Example
///
/// ```rust,ignore
/// let decoder = Decoder::new(&sources, &ctx);
/// let mut input = Input::default();
/// decoder.decode(&schema, &mut input)?;
/// ```
pub struct Decoder<'a, C> {
    sources: &'a SourceSet<C>,
    ctx: &'a C,
}

/// The value a field will receive and where it came from.
struct Winner<'s> {
    descriptor: &'s FieldDescriptor,
    source: &'s str,
    key: &'s str,
    value: RawValue,
}

impl<'a, C> Decoder<'a, C> {
    /// Creates a decoder over `sources` for one request context.
    pub fn new(sources: &'a SourceSet<C>, ctx: &'a C) -> Self {
        Self { sources, ctx }
    }

    /// Decodes into `root`, which must match the type `schema` was built for.
    ///
    /// Stops at the first error; fields set before it keep their new values.
    pub fn decode(&self, schema: &Schema, root: &mut dyn Bindable) -> BindResult<()> {
        let mut pending = Vec::new();
        self.decode_level(schema, root, &mut pending)
    }

    /// Typed convenience over [`Decoder::decode`].
    pub fn decode_into<T: Bindable>(&self, schema: &Schema, root: &mut T) -> BindResult<()> {
        self.decode(schema, root)
    }

    // `pending` holds the index paths from `anchor` down to this level that
    // have not been materialized yet.
    fn decode_level<'s>(
        &self,
        schema: &'s Schema,
        anchor: &mut dyn Bindable,
        pending: &mut Vec<&'s [usize]>,
    ) -> BindResult<()> {
        let mut winners = Vec::new();
        for descriptor in schema.resolvable() {
            if let Some(winner) = self.winner(descriptor)? {
                winners.push(winner);
            }
        }

        if winners.is_empty() {
            for child in schema.children() {
                pending.push(child.index_path());
                let result = self.decode_level(child, &mut *anchor, pending);
                pending.pop();
                result?;
            }
            return Ok(());
        }

        let level = descend(anchor, pending)?;
        {
            let record = record_of(&mut *level)?;
            for winner in &winners {
                let descriptor = winner.descriptor;
                let field = field_at(&mut *record, descriptor.index_path())?;
                FieldSetter::new(descriptor.category(), descriptor.type_name())
                    .set(field, &winner.value)
                    .map_err(|e| {
                        e.with_field(descriptor.field_path())
                            .with_source(winner.source, winner.key)
                    })?;
            }
        }

        let mut fresh = Vec::new();
        for child in schema.children() {
            fresh.push(child.index_path());
            let result = self.decode_level(child, &mut *level, &mut fresh);
            fresh.pop();
            result?;
        }
        Ok(())
    }

    fn winner<'s>(&'s self, descriptor: &'s FieldDescriptor) -> BindResult<Option<Winner<'s>>> {
        let paths = descriptor.source_paths();
        let explode = descriptor
            .exploder()
            .filter(|_| descriptor.category().is_collection());

        for source in self.sources.strings() {
            let name = source.name();
            let Some(key) = paths.get(name) else {
                continue;
            };
            let mut values = source.extract(self.ctx, key).map_err(|e| {
                BindError::extraction_failure(name, key, e).with_field(descriptor.field_path())
            })?;
            if values.is_empty() {
                continue;
            }
            if let (Some(delimiter), [single]) = (explode, values.as_slice()) {
                values = split(single, delimiter);
            }
            return Ok(Some(Winner {
                descriptor,
                source: name,
                key,
                value: RawValue::Strings(values),
            }));
        }

        for source in self.sources.values() {
            let name = source.name();
            let Some(key) = paths.get(name) else {
                continue;
            };
            let found = source.extract(self.ctx, key).map_err(|e| {
                BindError::extraction_failure(name, key, e).with_field(descriptor.field_path())
            })?;
            let Some(found) = found else {
                continue;
            };
            let exploded = explode
                .zip(string_value(&found))
                .map(|(delimiter, text)| split(text, delimiter))
                .filter(|parts| parts.len() > 1);
            let value = match exploded {
                Some(parts) => RawValue::Strings(parts),
                None => RawValue::Opaque(found),
            };
            return Ok(Some(Winner {
                descriptor,
                source: name,
                key,
                value,
            }));
        }

        let Some(default) = descriptor.default_value() else {
            return Ok(None);
        };
        let values = match explode {
            Some(delimiter) => split(default, delimiter),
            None => vec![default.to_owned()],
        };
        Ok(Some(Winner {
            descriptor,
            source: DEFAULT_SOURCE,
            key: descriptor.display_name(),
            value: RawValue::Strings(values),
        }))
    }
}

impl<C> std::fmt::Debug for Decoder<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decoder")
            .field("sources", self.sources)
            .finish_non_exhaustive()
    }
}

/// Only string values are exploded; byte buffers pass through whole.
fn string_value(value: &Opaque) -> Option<&str> {
    value
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| value.downcast_ref::<&'static str>().copied())
}

fn split(raw: &str, delimiter: &str) -> Vec<String> {
    raw.split(delimiter).map(str::to_owned).collect()
}

/// Walks `path` from `value`, allocating `Option`s on the way.
fn descend<'b>(
    mut value: &'b mut dyn Bindable,
    path: &[&[usize]],
) -> BindResult<&'b mut dyn Bindable> {
    for segment in path {
        for &index in *segment {
            value = field_of(record_of(value)?, index)?;
        }
    }
    Ok(value)
}

fn field_at<'b>(mut record: &'b mut dyn Record, path: &[usize]) -> BindResult<&'b mut dyn Bindable> {
    let Some((&last, init)) = path.split_last() else {
        return Err(BindError::new(ErrorKind::UnsupportedType, "empty field index path"));
    };
    for &index in init {
        record = record_of(field_of(record, index)?)?;
    }
    field_of(record, last)
}

fn field_of(record: &mut dyn Record, index: usize) -> BindResult<&mut dyn Bindable> {
    record
        .field_mut(index)
        .ok_or_else(|| BindError::new(ErrorKind::UnsupportedType, format!("no field at index {index}")))
}

/// The record behind `value`, allocating through `Option` when empty.
fn record_of(value: &mut dyn Bindable) -> BindResult<&mut dyn Record> {
    match value.slot() {
        Slot::Record(record) => Ok(record),
        Slot::Nullable(nullable) => record_of(nullable.get_or_allocate()),
        _ => Err(BindError::new(
            ErrorKind::UnsupportedType,
            "expected a record or an optional record",
        )),
    }
}
