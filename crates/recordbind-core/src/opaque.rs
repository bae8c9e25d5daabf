//! Type-erased values handed over by single-value sources.

use bytes::Bytes;
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

type Cloner = fn(&(dyn Any + Send + Sync)) -> Option<Box<dyn Any>>;

/// An arbitrary value of unknown static type.
///
/// Cloning an `Opaque` is cheap; the wrapped value is shared. When the field
/// setter assigns it to a destination of the same type, the value itself is
/// cloned.
///
/// # Example
///
/// ```
/// use recordbind_core::Opaque;
///
/// let value = Opaque::new(42_u32);
/// assert!(value.is::<u32>());
/// assert_eq!(value.clone_as::<u32>(), Some(42));
/// assert_eq!(value.as_text(), None);
///
/// let text = Opaque::new(String::from("hello"));
/// assert_eq!(text.as_text(), Some("hello"));
/// ```
#[derive(Clone)]
pub struct Opaque {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
    cloner: Cloner,
}

fn clone_erased<T: Any + Clone>(value: &(dyn Any + Send + Sync)) -> Option<Box<dyn Any>> {
    value
        .downcast_ref::<T>()
        .map(|v| Box::new(v.clone()) as Box<dyn Any>)
}

impl Opaque {
    /// Wraps a value.
    pub fn new<T: Any + Clone + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_name: type_name::<T>(),
            cloner: clone_erased::<T>,
        }
    }

    /// Name of the wrapped type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the wrapped value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.value.downcast_ref::<T>().is_some()
    }

    /// Borrows the wrapped value as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Clones the wrapped value out if it is a `T`.
    pub fn clone_as<T: Any>(&self) -> Option<T> {
        if !self.is::<T>() {
            return None;
        }
        (self.cloner)(&*self.value)
            .and_then(|boxed| boxed.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    /// Views the value as text.
    ///
    /// `String`, `&'static str`, and UTF-8 `Vec<u8>` or [`Bytes`] qualify.
    pub fn as_text(&self) -> Option<&str> {
        if let Some(s) = self.downcast_ref::<String>() {
            return Some(s.as_str());
        }
        if let Some(s) = self.downcast_ref::<&'static str>() {
            return Some(s);
        }
        if let Some(raw) = self.downcast_ref::<Vec<u8>>() {
            return std::str::from_utf8(raw).ok();
        }
        if let Some(raw) = self.downcast_ref::<Bytes>() {
            return std::str::from_utf8(raw).ok();
        }
        None
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Opaque")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
