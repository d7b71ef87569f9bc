//! Rapid serialization through serde.
//!
//! Rust values are projected onto the literal set before they reach the wire:
//!
//! - integers of every width become `Int` (wider types must fit `i64`)
//! - sequences and tuples become arrays, structs and maps become maps
//! - unit variants become strings; newtype, tuple and struct variants become
//!   a map holding one entry keyed by the variant name
//! - homogeneous containers are narrowed, so `Vec<String>` is an array of
//!   strings and `HashMap<String, u8>` a map of ints
//!
//! `None`, `()` and unit structs have no literal form and are rejected, as are
//! map keys that are not strings.
//!
//! ```rust
//! use serde::Serialize;
//! use serde_rapid::{to_value, to_vec, Error, Value};
//!
//! #[derive(Serialize)]
//! struct Data { x: i32, tags: Vec<&'static str> }
//!
//! let value = to_value(&Data { x: 1, tags: vec!["a"] }).unwrap();
//! assert_eq!(value.as_object().unwrap().get("x"), Some(Value::Int(1)));
//!
//! // Scalars skip the in-memory form and go straight to the sink.
//! assert_eq!(to_vec(&true).unwrap(), vec![0x01, 0x01]);
//!
//! assert!(matches!(to_vec(&None::<i32>), Err(Error::UnsupportedType(_))));
//! ```

use crate::value::Object;
use crate::{Encoder, Error, RapidMap, Result, Value};
use serde::ser;
use serde::Serialize;
use std::io;

/// Builds a [`Value`] from any `T: Serialize`.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: RapidMap<Value>,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

fn overflow<T: ToString>(v: T) -> Error {
    Error::IntegerOverflow(v.to_string())
}

/// Wraps `value` in a single-entry map keyed by the variant name.
fn tagged_variant(variant: &'static str, value: Value) -> Value {
    let mut map = RapidMap::with_capacity(1);
    map.insert(variant.to_string(), value);
    Value::Object(Object::from_map(map))
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Int(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        i64::try_from(v).map(Value::Int).map_err(|_| overflow(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        i64::try_from(v).map(Value::Int).map_err(|_| overflow(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        i64::try_from(v).map(Value::Int).map_err(|_| overflow(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Float(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::from(v.iter().map(|&b| i64::from(b)).collect::<Vec<i64>>()))
    }

    fn serialize_none(self) -> Result<Value> {
        Err(Error::unsupported_type("None"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Err(Error::unsupported_type("()"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value> {
        Err(Error::unsupported_type(name))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(tagged_variant(variant, to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0), None))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, Some(variant)))
    }
}

impl SerializeVec {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity.min(4096)),
            variant,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Value {
        let array = Value::array(self.vec);
        match self.variant {
            Some(variant) => tagged_variant(variant, array),
            None => array,
        }
    }
}

impl SerializeMap {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: RapidMap::with_capacity(capacity.min(4096)),
            current_key: None,
            variant,
        }
    }

    fn insert<T: ?Sized + Serialize>(&mut self, key: String, value: &T) -> Result<()> {
        let value = to_value(value)?;
        if self.map.insert(key.clone(), value).is_some() {
            return Err(Error::DuplicateKey(key));
        }
        Ok(())
    }

    fn finish(self) -> Value {
        let object = Value::object(self.map);
        match self.variant {
            Some(variant) => tagged_variant(variant, object),
            None => object,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(key) {
            Ok(Value::String(s)) => {
                self.current_key = Some(s);
                Ok(())
            }
            Ok(other) => Err(Error::unsupported_type(&format!(
                "map key of type {}",
                other.kind()
            ))),
            Err(e) => Err(e),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.insert(key, value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

/// Converts any `T: Serialize` into a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_rapid::{rapid, to_value};
/// use std::collections::BTreeMap;
///
/// let mut scores = BTreeMap::new();
/// scores.insert("alice", 3u8);
/// scores.insert("bob", 200u8);
///
/// assert_eq!(to_value(&scores).unwrap(), rapid!({ "alice": 3, "bob": 200 }));
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for values with no literal form and
/// [`Error::IntegerOverflow`] for integers that do not fit `i64`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// A compound that is collected in memory and encoded once complete.
///
/// Containers need their element type and count in the header, so they
/// cannot be streamed element by element.
pub struct Buffered<'a, W, S> {
    encoder: &'a mut Encoder<W>,
    inner: S,
}

impl<'a, W: io::Write> ser::Serializer for &'a mut Encoder<W> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Buffered<'a, W, SerializeVec>;
    type SerializeTuple = Buffered<'a, W, SerializeVec>;
    type SerializeTupleStruct = Buffered<'a, W, SerializeVec>;
    type SerializeTupleVariant = Buffered<'a, W, SerializeVec>;
    type SerializeMap = Buffered<'a, W, SerializeMap>;
    type SerializeStruct = Buffered<'a, W, SerializeMap>;
    type SerializeStructVariant = Buffered<'a, W, SerializeMap>;

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.write_bool(v)
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.write_int(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.write_int(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.write_int(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.write_int(v)
    }

    fn serialize_i128(self, v: i128) -> Result<()> {
        self.write_int(i64::try_from(v).map_err(|_| overflow(v))?)
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.write_int(i64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.write_int(i64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.write_int(i64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.write_int(i64::try_from(v).map_err(|_| overflow(v))?)
    }

    fn serialize_u128(self, v: u128) -> Result<()> {
        self.write_int(i64::try_from(v).map_err(|_| overflow(v))?)
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.write_float(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        self.write_float(v)
    }

    fn serialize_char(self, v: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.write_string(v.encode_utf8(&mut buf))
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.write_string(v)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        let value = ser::Serializer::serialize_bytes(ValueSerializer, v)?;
        self.encode(&value)
    }

    fn serialize_none(self) -> Result<()> {
        Err(Error::unsupported_type("None"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        Err(Error::unsupported_type("()"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<()> {
        Err(Error::unsupported_type(name))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.write_string(variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let value = ser::Serializer::serialize_newtype_variant(
            ValueSerializer,
            name,
            variant_index,
            variant,
            value,
        )?;
        self.encode(&value)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(Buffered {
            inner: ser::Serializer::serialize_seq(ValueSerializer, len)?,
            encoder: self,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        Ok(Buffered {
            inner: ser::Serializer::serialize_tuple(ValueSerializer, len)?,
            encoder: self,
        })
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Ok(Buffered {
            inner: ser::Serializer::serialize_tuple_struct(ValueSerializer, name, len)?,
            encoder: self,
        })
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Ok(Buffered {
            inner: ser::Serializer::serialize_tuple_variant(
                ValueSerializer,
                name,
                variant_index,
                variant,
                len,
            )?,
            encoder: self,
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(Buffered {
            inner: ser::Serializer::serialize_map(ValueSerializer, len)?,
            encoder: self,
        })
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        Ok(Buffered {
            inner: ser::Serializer::serialize_struct(ValueSerializer, name, len)?,
            encoder: self,
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(Buffered {
            inner: ser::Serializer::serialize_struct_variant(
                ValueSerializer,
                name,
                variant_index,
                variant,
                len,
            )?,
            encoder: self,
        })
    }

    fn is_human_readable(&self) -> bool {
        false
    }
}

impl<'a, W, S> ser::SerializeSeq for Buffered<'a, W, S>
where
    W: io::Write,
    S: ser::SerializeSeq<Ok = Value, Error = Error>,
{
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.serialize_element(value)
    }

    fn end(self) -> Result<()> {
        let value = self.inner.end()?;
        self.encoder.encode(&value)
    }
}

impl<'a, W, S> ser::SerializeTuple for Buffered<'a, W, S>
where
    W: io::Write,
    S: ser::SerializeTuple<Ok = Value, Error = Error>,
{
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.serialize_element(value)
    }

    fn end(self) -> Result<()> {
        let value = self.inner.end()?;
        self.encoder.encode(&value)
    }
}

impl<'a, W, S> ser::SerializeTupleStruct for Buffered<'a, W, S>
where
    W: io::Write,
    S: ser::SerializeTupleStruct<Ok = Value, Error = Error>,
{
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.serialize_field(value)
    }

    fn end(self) -> Result<()> {
        let value = self.inner.end()?;
        self.encoder.encode(&value)
    }
}

impl<'a, W, S> ser::SerializeTupleVariant for Buffered<'a, W, S>
where
    W: io::Write,
    S: ser::SerializeTupleVariant<Ok = Value, Error = Error>,
{
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.serialize_field(value)
    }

    fn end(self) -> Result<()> {
        let value = self.inner.end()?;
        self.encoder.encode(&value)
    }
}

impl<'a, W, S> ser::SerializeMap for Buffered<'a, W, S>
where
    W: io::Write,
    S: ser::SerializeMap<Ok = Value, Error = Error>,
{
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.serialize_key(key)
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.serialize_value(value)
    }

    fn end(self) -> Result<()> {
        let value = self.inner.end()?;
        self.encoder.encode(&value)
    }
}

impl<'a, W, S> ser::SerializeStruct for Buffered<'a, W, S>
where
    W: io::Write,
    S: ser::SerializeStruct<Ok = Value, Error = Error>,
{
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.serialize_field(key, value)
    }

    fn end(self) -> Result<()> {
        let value = self.inner.end()?;
        self.encoder.encode(&value)
    }
}

impl<'a, W, S> ser::SerializeStructVariant for Buffered<'a, W, S>
where
    W: io::Write,
    S: ser::SerializeStructVariant<Ok = Value, Error = Error>,
{
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.serialize_field(key, value)
    }

    fn end(self) -> Result<()> {
        let value = self.inner.end()?;
        self.encoder.encode(&value)
    }
}
