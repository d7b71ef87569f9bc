//! Rapid deserialization through serde.
//!
//! `&mut Decoder<R>` implements [`serde::Deserializer`]. Every method reads
//! the next tag and checks it against what the destination accepts before a
//! payload byte is touched, so an `i64` field never silently swallows a
//! string and a `Vec<String>` never accepts an array of bools.
//!
//! Integer destinations accept either wire width, then apply their own range
//! check. `Option<T>` always decodes as `Some`: absent struct fields are the
//! way to express `None`.
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_rapid::{from_slice, rapid, to_vec, Error};
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Data {
//!     x: u8,
//!     tags: Vec<String>,
//! }
//!
//! let bytes = to_vec(&rapid!({ "x": 7, "tags": ["a", "b"] })).unwrap();
//! let data: Data = from_slice(&bytes).unwrap();
//! assert_eq!(data, Data { x: 7, tags: vec!["a".into(), "b".into()] });
//!
//! // 300 is a valid wire integer but does not fit the destination.
//! let bytes = to_vec(&rapid!({ "x": 300, "tags": [] })).unwrap();
//! assert!(from_slice::<Data>(&bytes).is_err());
//!
//! // A wide integer never satisfies a string destination.
//! let bytes = to_vec(&1_000_000).unwrap();
//! assert!(matches!(
//!     from_slice::<String>(&bytes),
//!     Err(Error::UnexpectedType { .. })
//! ));
//! ```

use crate::tag::{self, Element, Tag};
use crate::{Decoder, Error, RapidMap, Result, Value};
use serde::de::value::StringDeserializer;
use serde::de::{self, DeserializeOwned, Error as _, IntoDeserializer};
use serde::forward_to_deserialize_any;
use std::io;

impl<R: io::Read> Decoder<R> {
    fn visit_array<'de, V>(&mut self, element: Element, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.enter()?;
        let result = self.array_body(element, visitor);
        self.leave();
        result
    }

    fn array_body<'de, V>(&mut self, element: Element, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let len = self.count()?;
        let mut access = SeqAccess {
            de: self,
            remaining: len,
            element,
        };
        let value = visitor.visit_seq(&mut access)?;
        if access.remaining > 0 {
            return Err(Error::invalid_length(
                len,
                &"a destination that consumes every element",
            ));
        }
        Ok(value)
    }

    fn visit_object<'de, V>(&mut self, element: Element, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.enter()?;
        let result = self.object_body(element, visitor);
        self.leave();
        result
    }

    fn object_body<'de, V>(&mut self, element: Element, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let len = self.count()?;
        let keys = self.keys(len)?;
        let mut access = MapAccess {
            de: self,
            keys: keys.into_iter(),
            element,
        };
        let value = visitor.visit_map(&mut access)?;
        if access.keys.len() > 0 {
            return Err(Error::invalid_length(
                len,
                &"a destination that consumes every entry",
            ));
        }
        Ok(value)
    }

    fn variant_body<'de, V>(&mut self, element: Element, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let len = self.count()?;
        if len != 1 {
            return Err(Error::invalid_length(len, &"a map with a single entry"));
        }
        let variant = self.keys(1)?.pop().unwrap_or_default();
        visitor.visit_enum(EnumAccess {
            de: self,
            variant,
            element,
        })
    }

    fn integer<'de, V>(&mut self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let tag = self.expect(tag::INT)?;
        visitor.visit_i64(self.int_payload(tag.code())?)
    }
}

impl<'de, 'a, R: io::Read> de::Deserializer<'de> for &'a mut Decoder<R> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let (offset, code) = self.next_code()?;
        match self.resolve(offset, code)? {
            Tag::Bool => visitor.visit_bool(self.bool_payload()?),
            Tag::Int8 | Tag::Int64 => visitor.visit_i64(self.int_payload(code)?),
            Tag::Float64 => visitor.visit_f64(self.float_payload()?),
            Tag::String => visitor.visit_string(self.string_payload()?),
            Tag::Array(element) => self.visit_array(element, visitor),
            Tag::Map(element) => self.visit_object(element, visitor),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.expect(tag::BOOL)?;
        visitor.visit_bool(self.bool_payload()?)
    }

    fn deserialize_i8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.integer(visitor)
    }

    fn deserialize_i16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.integer(visitor)
    }

    fn deserialize_i32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.integer(visitor)
    }

    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.integer(visitor)
    }

    fn deserialize_i128<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.integer(visitor)
    }

    fn deserialize_u8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.integer(visitor)
    }

    fn deserialize_u16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.integer(visitor)
    }

    fn deserialize_u32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.integer(visitor)
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.integer(visitor)
    }

    fn deserialize_u128<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.integer(visitor)
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_f64(visitor)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.expect(tag::FLOAT64)?;
        visitor.visit_f64(self.float_payload()?)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.expect(tag::STRING)?;
        visitor.visit_string(self.string_payload()?)
    }

    /// Bytes travel as an array of ints.
    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let width = match self.expect(tag::ARRAY | tag::INT)? {
            Tag::Array(element) => element.bits(),
            other => {
                return Err(Error::unexpected_type(
                    self.offset(),
                    other.code(),
                    tag::ARRAY | tag::INT,
                ))
            }
        };
        let len = self.count()?;
        let mut bytes = Vec::with_capacity(len.min(4096));
        for _ in 0..len {
            let value = self.int_payload(width)?;
            let byte = u8::try_from(value).map_err(|_| {
                Error::invalid_value(de::Unexpected::Signed(value), &"a byte")
            })?;
            bytes.push(byte);
        }
        visitor.visit_byte_buf(bytes)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type("unit"))
    }

    fn deserialize_unit_struct<V>(self, name: &'static str, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type(name))
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.expect(tag::ARRAY | tag::ELEMENTS)? {
            Tag::Array(element) => self.visit_array(element, visitor),
            other => Err(Error::unexpected_type(
                self.offset(),
                other.code(),
                tag::ARRAY | tag::ELEMENTS,
            )),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.expect(tag::MAP_STRING)? {
            Tag::Map(element) => self.visit_object(element, visitor),
            other => Err(Error::unexpected_type(
                self.offset(),
                other.code(),
                tag::MAP_STRING,
            )),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    /// Unit variants are strings; every other variant is a map holding a
    /// single entry keyed by the variant name.
    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let (offset, code) = self.next_code()?;
        match self.resolve(offset, code)? {
            Tag::String => {
                let variant = self.string_payload()?;
                visitor.visit_enum(StringDeserializer::<Error>::new(variant))
            }
            Tag::Map(element) => {
                self.enter()?;
                let result = self.variant_body(element, visitor);
                self.leave();
                result
            }
            _ => Err(Error::unexpected_type(
                offset,
                code,
                tag::STRING | tag::MAP_STRING,
            )),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_any(visitor)
    }

    fn is_human_readable(&self) -> bool {
        false
    }
}

struct SeqAccess<'a, R> {
    de: &'a mut Decoder<R>,
    remaining: usize,
    element: Element,
}

impl<'de, 'a, R: io::Read> de::SeqAccess<'de> for SeqAccess<'a, R> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        self.de.pending = self.element.implicit();
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

struct MapAccess<'a, R> {
    de: &'a mut Decoder<R>,
    keys: std::vec::IntoIter<String>,
    element: Element,
}

impl<'de, 'a, R: io::Read> de::MapAccess<'de> for MapAccess<'a, R> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.keys.next() {
            Some(key) => seed
                .deserialize(StringDeserializer::<Error>::new(key))
                .map(Some),
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        self.de.pending = self.element.implicit();
        seed.deserialize(&mut *self.de)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.keys.len())
    }
}

struct EnumAccess<'a, R> {
    de: &'a mut Decoder<R>,
    variant: String,
    element: Element,
}

impl<'de, 'a, R: io::Read> de::EnumAccess<'de> for EnumAccess<'a, R> {
    type Error = Error;
    type Variant = VariantAccess<'a, R>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(StringDeserializer::<Error>::new(self.variant))?;
        Ok((
            variant,
            VariantAccess {
                de: self.de,
                element: self.element,
            },
        ))
    }
}

struct VariantAccess<'a, R> {
    de: &'a mut Decoder<R>,
    element: Element,
}

impl<'de, 'a, R: io::Read> de::VariantAccess<'de> for VariantAccess<'a, R> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Err(Error::invalid_type(
            de::Unexpected::Map,
            &"a string naming a unit variant",
        ))
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        self.de.pending = self.element.implicit();
        seed.deserialize(&mut *self.de)
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.de.pending = self.element.implicit();
        de::Deserializer::deserialize_seq(&mut *self.de, visitor)
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.de.pending = self.element.implicit();
        de::Deserializer::deserialize_map(&mut *self.de, visitor)
    }
}

/// Deserializes a `T` out of an in-memory [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use serde_rapid::{from_value, rapid};
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_value(rapid!({ "x": 1, "y": -2 })).unwrap();
/// assert_eq!(point, Point { x: 1, y: -2 });
/// ```
///
/// # Errors
///
/// Returns an error if the value's shape does not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: RapidMap<Value>) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(StringDeserializer::<Error>::new(key))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer {
    variant: String,
    value: Value,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(StringDeserializer::<Error>::new(self.variant))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Value,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Err(Error::custom("expected a string for a unit variant"))
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(ValueDeserializer::new(self.value))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Array(array) => visitor.visit_seq(SeqDeserializer::new(array.into_values())),
            other => Err(Error::custom(format!(
                "expected an array for a tuple variant, found {}",
                other.kind()
            ))),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Object(object) => visitor.visit_map(MapDeserializer::new(object.into_map())),
            other => Err(Error::custom(format!(
                "expected an object for a struct variant, found {}",
                other.kind()
            ))),
        }
    }
}

/// Walks an in-memory [`Value`] as a serde data source.
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    #[must_use]
    pub fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> IntoDeserializer<'de, Error> for Value {
    type Deserializer = ValueDeserializer;

    fn into_deserializer(self) -> ValueDeserializer {
        ValueDeserializer::new(self)
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Int(i) => visitor.visit_i64(i),
            Value::Float(f) => visitor.visit_f64(f),
            Value::String(s) => visitor.visit_string(s),
            Value::Array(array) => visitor.visit_seq(SeqDeserializer::new(array.into_values())),
            Value::Object(object) => visitor.visit_map(MapDeserializer::new(object.into_map())),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(variant) => visitor.visit_enum(StringDeserializer::<Error>::new(variant)),
            Value::Object(object) if object.len() == 1 => {
                let mut entries = object.into_map().into_iter();
                match entries.next() {
                    Some((variant, value)) => visitor.visit_enum(EnumDeserializer { variant, value }),
                    None => Err(Error::custom("expected a single-entry object for an enum")),
                }
            }
            other => Err(Error::invalid_type(
                de::Unexpected::Other(other.kind()),
                &"a string or a single-entry object",
            )),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{rapid, to_vec};
    use serde::Deserialize;
    use std::collections::HashMap;

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Decoder::new(bytes).decode()
    }

    #[derive(Deserialize, Debug, PartialEq)]
    enum Shape {
        Empty,
        Circle(f64),
        Rect { w: u32, h: u32 },
        Pair(String, i64),
    }

    #[test]
    fn test_ints_normalize_across_widths() {
        assert_eq!(decode::<u64>(&[0x02, 0x05]).unwrap(), 5);
        let mut wide = vec![0x04];
        wide.extend_from_slice(&(-3i64).to_le_bytes());
        assert_eq!(decode::<i32>(&wide).unwrap(), -3);
        assert!(decode::<u32>(&wide).is_err());

        let bytes = [0x50, 0x04, 0x02, 0x01, b'a', 0, 9, 0, 0, 0, 0, 0, 0, 0];
        let map: HashMap<String, i64> = decode(&bytes).unwrap();
        assert_eq!(map["a"], 9);
    }

    #[test]
    fn test_tag_mismatch() {
        let mut wide = vec![0x04];
        wide.extend_from_slice(&1000i64.to_le_bytes());
        match decode::<String>(&wide) {
            Err(Error::UnexpectedType {
                offset: 0,
                found,
                expected,
            }) => {
                assert_eq!(found, tag::INT64);
                assert_eq!(expected, tag::STRING);
            }
            other => panic!("expected a tag mismatch, got {other:?}"),
        }
        assert!(decode::<f64>(&[0x02, 0x01]).is_err());
        assert!(decode::<Vec<String>>(&[0x21, 0x02, 0x01, 0x01]).is_err());
    }

    #[test]
    fn test_tuple_must_consume_every_element() {
        let bytes = to_vec(&vec![1, 2, 3]).unwrap();
        assert!(decode::<(i64, i64)>(&bytes).is_err());
        assert_eq!(decode::<(i64, i64, i64)>(&bytes).unwrap(), (1, 2, 3));
    }

    #[test]
    fn test_enums() {
        assert_eq!(decode::<Shape>(&to_vec("Empty").unwrap()).unwrap(), Shape::Empty);
        assert_eq!(
            decode::<Shape>(&to_vec(&rapid!({ "Circle": 1.5 })).unwrap()).unwrap(),
            Shape::Circle(1.5)
        );
        assert_eq!(
            decode::<Shape>(&to_vec(&rapid!({ "Rect": { "w": 2, "h": 3 } })).unwrap()).unwrap(),
            Shape::Rect { w: 2, h: 3 }
        );
        assert_eq!(
            decode::<Shape>(&to_vec(&rapid!({ "Pair": ["x", 4] })).unwrap()).unwrap(),
            Shape::Pair("x".into(), 4)
        );
        assert!(decode::<Shape>(&to_vec(&rapid!({ "Circle": 1.5, "Empty": 1.0 })).unwrap()).is_err());
    }

    #[test]
    fn test_value_from_wire_narrows() {
        let value: Value = decode(&to_vec(&rapid!([1, 2])).unwrap()).unwrap();
        assert_eq!(value, rapid!([1, 2]));
    }

    #[test]
    fn test_from_value_enum_and_option() {
        let shape: Shape = from_value(rapid!({ "Rect": { "w": 1, "h": 1 } })).unwrap();
        assert_eq!(shape, Shape::Rect { w: 1, h: 1 });
        let maybe: Option<String> = from_value(rapid!("x")).unwrap();
        assert_eq!(maybe.as_deref(), Some("x"));
    }
}
