//! Custom decoding capabilities.
//!
//! A type that knows how to build itself from a text, structured (JSON) or
//! binary representation implements the matching trait and marks itself with
//! `#[bind(decode(text, structured, binary))]` when deriving [`Bindable`].
//! Two ready-made wrappers are provided: [`Json`] and [`Parsed`].

use crate::bindable::{assign_from, Bindable, Slot};
use crate::error::BoxError;
use crate::opaque::Opaque;
use crate::shape::{Capabilities, Shape, TypeInfo};
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;

/// Decodes from text.
pub trait TextDecode {
    /// Replaces `self` with the value encoded in `text`.
    fn decode_text(&mut self, text: &str) -> Result<(), BoxError>;
}

/// Decodes from a structured (JSON) document.
pub trait StructuredDecode {
    /// Replaces `self` with the value encoded in `data`.
    fn decode_structured(&mut self, data: &[u8]) -> Result<(), BoxError>;
}

/// Decodes from raw bytes.
pub trait BinaryDecode {
    /// Replaces `self` with the value encoded in `data`.
    fn decode_binary(&mut self, data: &[u8]) -> Result<(), BoxError>;
}

/// Object-safe view over a capability-decodable value.
///
/// Methods for capabilities the type lacks return an error built with
/// [`unsupported_capability`]; callers consult [`capabilities`](Self::capabilities)
/// first.
pub trait Decodable {
    /// Capabilities this value supports.
    fn capabilities(&self) -> Capabilities;

    /// Runs `decode` on a fresh default value and replaces `self` with it
    /// only if decoding succeeds. On error `self` is left as it was.
    fn decode_fresh(
        &mut self,
        decode: &mut dyn FnMut(&mut dyn Decodable) -> Result<(), BoxError>,
    ) -> Result<(), BoxError>;

    /// Text decoding.
    fn decode_text(&mut self, text: &str) -> Result<(), BoxError>;

    /// Structured decoding.
    fn decode_structured(&mut self, data: &[u8]) -> Result<(), BoxError>;

    /// Binary decoding.
    fn decode_binary(&mut self, data: &[u8]) -> Result<(), BoxError>;
}

#[derive(Debug)]
struct UnsupportedCapability(&'static str);

impl fmt::Display for UnsupportedCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} decoding is not supported", self.0)
    }
}

impl std::error::Error for UnsupportedCapability {}

/// Error for a capability the type does not implement.
pub fn unsupported_capability(capability: &'static str) -> BoxError {
    Box::new(UnsupportedCapability(capability))
}

/// A field decoded from a JSON document.
///
/// # Example
///
/// ```
/// use recordbind_core::{Decodable, Json};
/// use std::collections::HashMap;
///
/// let mut filters: Json<HashMap<String, u32>> = Json::default();
/// filters.decode_structured(br#"{"age": 30}"#).unwrap();
/// assert_eq!(filters.0["age"], 30);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Unwraps the inner value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: DeserializeOwned + Default> StructuredDecode for Json<T> {
    fn decode_structured(&mut self, data: &[u8]) -> Result<(), BoxError> {
        self.0 = serde_json::from_slice(data)?;
        Ok(())
    }
}

impl<T: DeserializeOwned + Default> Decodable for Json<T> {
    fn capabilities(&self) -> Capabilities {
        Capabilities::STRUCTURED
    }

    fn decode_fresh(
        &mut self,
        decode: &mut dyn FnMut(&mut dyn Decodable) -> Result<(), BoxError>,
    ) -> Result<(), BoxError> {
        let mut fresh = Self(T::default());
        decode(&mut fresh)?;
        *self = fresh;
        Ok(())
    }

    fn decode_text(&mut self, _text: &str) -> Result<(), BoxError> {
        Err(unsupported_capability("text"))
    }

    fn decode_structured(&mut self, data: &[u8]) -> Result<(), BoxError> {
        StructuredDecode::decode_structured(self, data)
    }

    fn decode_binary(&mut self, _data: &[u8]) -> Result<(), BoxError> {
        Err(unsupported_capability("binary"))
    }
}

impl<T: DeserializeOwned + Default + 'static> Bindable for Json<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Shape::Opaque).with_capabilities(Capabilities::STRUCTURED)
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Decodable(self)
    }

    fn assign_opaque(&mut self, value: &Opaque) -> bool {
        assign_from(self, value)
    }
}

/// A field decoded from text through [`FromStr`].
///
/// # Example
///
/// ```
/// use recordbind_core::{Decodable, Parsed};
///
/// let mut initial: Parsed<char> = Parsed::default();
/// initial.decode_text("k").unwrap();
/// assert_eq!(initial.0, 'k');
/// assert!(initial.decode_text("not a char").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed<T>(pub T);

impl<T> Parsed<T> {
    /// Unwraps the inner value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> TextDecode for Parsed<T>
where
    T: FromStr + Default,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    fn decode_text(&mut self, text: &str) -> Result<(), BoxError> {
        self.0 = text.parse()?;
        Ok(())
    }
}

impl<T> Decodable for Parsed<T>
where
    T: FromStr + Default,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    fn capabilities(&self) -> Capabilities {
        Capabilities::TEXT
    }

    fn decode_fresh(
        &mut self,
        decode: &mut dyn FnMut(&mut dyn Decodable) -> Result<(), BoxError>,
    ) -> Result<(), BoxError> {
        let mut fresh = Self(T::default());
        decode(&mut fresh)?;
        *self = fresh;
        Ok(())
    }

    fn decode_text(&mut self, text: &str) -> Result<(), BoxError> {
        TextDecode::decode_text(self, text)
    }

    fn decode_structured(&mut self, _data: &[u8]) -> Result<(), BoxError> {
        Err(unsupported_capability("structured"))
    }

    fn decode_binary(&mut self, _data: &[u8]) -> Result<(), BoxError> {
        Err(unsupported_capability("binary"))
    }
}

impl<T> Bindable for Parsed<T>
where
    T: FromStr + Default + 'static,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Shape::Opaque).with_capabilities(Capabilities::TEXT)
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Decodable(self)
    }

    fn assign_opaque(&mut self, value: &Opaque) -> bool {
        assign_from(self, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Rgb(u8, u8, u8);

    impl FromStr for Rgb {
        type Err = std::num::ParseIntError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let hex = s.trim_start_matches('#');
            let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2).unwrap_or("zz"), 16);
            Ok(Self(channel(0)?, channel(2)?, channel(4)?))
        }
    }

    #[derive(Debug, Default, PartialEq, serde::Deserialize)]
    struct Filter {
        name: String,
        limit: u32,
    }

    #[test]
    fn test_json_structured_decode() {
        let mut filter: Json<Filter> = Json::default();
        Decodable::decode_structured(&mut filter, br#"{"name":"x","limit":3}"#).unwrap();
        assert_eq!(
            filter.into_inner(),
            Filter {
                name: "x".into(),
                limit: 3
            }
        );
    }

    #[test]
    fn test_json_rejects_text_and_binary() {
        let mut filter: Json<Filter> = Json::default();
        assert!(Decodable::decode_text(&mut filter, "x").is_err());
        assert!(Decodable::decode_binary(&mut filter, b"x").is_err());
        assert_eq!(filter.capabilities(), Capabilities::STRUCTURED);
    }

    #[test]
    fn test_json_malformed() {
        let mut filter: Json<Filter> = Json::default();
        let err = Decodable::decode_structured(&mut filter, b"{").unwrap_err();
        assert!(err.to_string().contains("EOF"));
    }

    #[test]
    fn test_parsed_text_decode() {
        let mut color: Parsed<Rgb> = Parsed::default();
        Decodable::decode_text(&mut color, "#ff8000").unwrap();
        assert_eq!(color.0, Rgb(255, 128, 0));
        assert!(Decodable::decode_text(&mut color, "#ff").is_err());
        assert_eq!(color.0, Rgb(255, 128, 0));
    }

    #[test]
    fn test_decode_fresh_commits_on_success_only() {
        let mut color = Parsed(Rgb(1, 2, 3));
        let result = color.decode_fresh(&mut |fresh| fresh.decode_text("#zz"));
        assert!(result.is_err());
        assert_eq!(color.0, Rgb(1, 2, 3));

        color
            .decode_fresh(&mut |fresh| fresh.decode_text("#000010"))
            .unwrap();
        assert_eq!(color.0, Rgb(0, 0, 16));
    }

    #[test]
    fn test_wrappers_advertise_capabilities() {
        assert_eq!(
            Json::<Filter>::type_info().capabilities(),
            Capabilities::STRUCTURED
        );
        assert_eq!(
            Parsed::<Rgb>::type_info().capabilities(),
            Capabilities::TEXT
        );
        assert!(matches!(Parsed::<Rgb>::type_info().shape(), Shape::Opaque));
    }

    #[test]
    fn test_unsupported_capability_message() {
        assert_eq!(
            unsupported_capability("binary").to_string(),
            "binary decoding is not supported"
        );
    }
}
