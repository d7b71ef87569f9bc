//! Dynamic value representation for rapid data.
//!
//! [`Value`] is the closed set of literals the codec transports. Containers
//! come in two flavours that mirror the wire: *typed* containers whose
//! elements all share one payload type and are written without per-element
//! tags, and *dynamic* containers whose elements are themselves [`Value`]s.
//!
//! ## Core Types
//!
//! - [`Value`]: bool, integer, float, string, array or object
//! - [`Array`]: dynamic values, or a homogeneous run of bools, ints, floats or strings
//! - [`Object`]: a string-keyed map of strings, ints or dynamic values
//!
//! ## Creating Values
//!
//! The [`Value::array`] and [`Value::object`] constructors pick the typed
//! flavour whenever a non-empty container is homogeneous, which is also what
//! the [`rapid!`](crate::rapid) macro and [`to_value`](crate::to_value) do:
//!
//! ```rust
//! use serde_rapid::{Array, Value};
//!
//! let tags = Value::array(vec![Value::from("rust"), Value::from("serde")]);
//! assert_eq!(
//!     tags,
//!     Value::Array(Array::Strings(vec!["rust".into(), "serde".into()]))
//! );
//!
//! let mixed = Value::array(vec![Value::from(1), Value::from("x")]);
//! assert!(matches!(mixed, Value::Array(Array::Values(_))));
//! ```
//!
//! Building a variant directly keeps exactly the flavour you chose, and the
//! native decoder ([`decode_value`](crate::decode_value)) reproduces it exactly.

use crate::tag::{Element, Tag};
use crate::RapidMap;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed rapid literal.
///
/// # Examples
///
/// ```rust
/// use serde_rapid::Value;
///
/// let num = Value::from(42);
/// let text = Value::from("hello");
///
/// assert!(num.is_int());
/// assert_eq!(num.as_i64(), Some(42));
/// assert_eq!(text.as_str(), Some("hello"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Array),
    Object(Object),
}

/// A homogeneous array.
#[derive(Clone, Debug, PartialEq)]
pub enum Array {
    /// Every element carries its own tag.
    Values(Vec<Value>),
    Bools(Vec<bool>),
    Ints(Vec<i64>),
    Floats(Vec<f64>),
    Strings(Vec<String>),
}

/// A string-keyed map.
#[derive(Clone, Debug, PartialEq)]
pub enum Object {
    Strings(RapidMap<String>),
    Ints(RapidMap<i64>),
    /// Every value carries its own tag.
    Values(RapidMap<Value>),
}

impl Value {
    /// Builds an array, choosing a typed flavour when the elements allow it.
    #[must_use]
    pub fn array(values: Vec<Value>) -> Value {
        Value::Array(Array::from_values(values))
    }

    /// Builds an object, choosing a typed flavour when the values allow it.
    #[must_use]
    pub fn object(map: RapidMap<Value>) -> Value {
        Value::Object(Object::from_map(map))
    }

    /// The tag this value is written with.
    ///
    /// ```rust
    /// use serde_rapid::tag::Tag;
    /// use serde_rapid::Value;
    ///
    /// assert_eq!(Value::from(255).tag(), Tag::Int8);
    /// assert_eq!(Value::from(256).tag(), Tag::Int64);
    /// ```
    #[must_use]
    pub fn tag(&self) -> Tag {
        match self {
            Value::Bool(_) => Tag::Bool,
            Value::Int(i) => match Element::for_int(*i) {
                Element::Int8 => Tag::Int8,
                _ => Tag::Int64,
            },
            Value::Float(_) => Tag::Float64,
            Value::String(_) => Tag::String,
            Value::Array(array) => Tag::Array(array.element()),
            Value::Object(object) => Tag::Map(object.element()),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float, or an integer widened to `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl Array {
    /// Narrows a list of values: a non-empty list whose elements are all
    /// bools, all ints, all floats or all strings becomes the typed flavour.
    /// Anything else, including an empty list, stays dynamic.
    ///
    /// ```rust
    /// use serde_rapid::{Array, Value};
    ///
    /// let ints = Array::from_values(vec![Value::from(1), Value::from(300)]);
    /// assert_eq!(ints, Array::Ints(vec![1, 300]));
    ///
    /// assert_eq!(Array::from_values(vec![]), Array::Values(vec![]));
    /// ```
    #[must_use]
    pub fn from_values(values: Vec<Value>) -> Array {
        let Some(first) = values.first() else {
            return Array::Values(values);
        };
        let kind = first.kind();
        if !values.iter().all(|v| v.kind() == kind) {
            return Array::Values(values);
        }
        match kind {
            "bool" => Array::Bools(values.iter().filter_map(Value::as_bool).collect()),
            "int" => Array::Ints(values.iter().filter_map(Value::as_i64).collect()),
            "float" => Array::Floats(values.iter().filter_map(Value::as_f64).collect()),
            "string" => Array::Strings(
                values
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => Array::Values(values),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Array::Values(v) => v.len(),
            Array::Bools(v) => v.len(),
            Array::Ints(v) => v.len(),
            Array::Floats(v) => v.len(),
            Array::Strings(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element type written in the array header. Integer arrays are
    /// narrow only when every element fits; an empty one is wide.
    #[must_use]
    pub fn element(&self) -> Element {
        match self {
            Array::Values(_) => Element::Interface,
            Array::Bools(_) => Element::Bool,
            Array::Ints(v) => Element::for_ints(v.iter().copied(), Element::Int64),
            Array::Floats(_) => Element::Float64,
            Array::Strings(_) => Element::String,
        }
    }

    /// Returns element `index` as a [`Value`].
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            Array::Values(v) => v.get(index).cloned(),
            Array::Bools(v) => v.get(index).copied().map(Value::Bool),
            Array::Ints(v) => v.get(index).copied().map(Value::Int),
            Array::Floats(v) => v.get(index).copied().map(Value::Float),
            Array::Strings(v) => v.get(index).cloned().map(Value::String),
        }
    }

    /// Widens every element into a [`Value`].
    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        match self {
            Array::Values(v) => v,
            Array::Bools(v) => v.into_iter().map(Value::Bool).collect(),
            Array::Ints(v) => v.into_iter().map(Value::Int).collect(),
            Array::Floats(v) => v.into_iter().map(Value::Float).collect(),
            Array::Strings(v) => v.into_iter().map(Value::String).collect(),
        }
    }
}

impl Object {
    /// Narrows a map of values: a non-empty map whose values are all strings
    /// or all ints becomes the typed flavour. Everything else stays dynamic.
    #[must_use]
    pub fn from_map(map: RapidMap<Value>) -> Object {
        if map.is_empty() {
            return Object::Values(map);
        }
        if map.values().all(Value::is_string) {
            return Object::Strings(map.map_values(|v| match v {
                Value::String(s) => s,
                _ => String::new(),
            }));
        }
        if map.values().all(Value::is_int) {
            return Object::Ints(map.map_values(|v| v.as_i64().unwrap_or_default()));
        }
        Object::Values(map)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Object::Strings(m) => m.len(),
            Object::Ints(m) => m.len(),
            Object::Values(m) => m.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The value type written in the second map header byte. Integer maps
    /// are narrow only when every value fits; an empty one is narrow.
    #[must_use]
    pub fn element(&self) -> Element {
        match self {
            Object::Strings(_) => Element::String,
            Object::Ints(m) => Element::for_ints(m.values().copied(), Element::Int8),
            Object::Values(_) => Element::Interface,
        }
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        match self {
            Object::Strings(m) => m.contains_key(key),
            Object::Ints(m) => m.contains_key(key),
            Object::Values(m) => m.contains_key(key),
        }
    }

    /// Returns the value for `key` as a [`Value`].
    ///
    /// ```rust
    /// use serde_rapid::rapid;
    ///
    /// let obj = rapid!({ "name": "Alice", "age": "thirty" });
    /// let name = obj.as_object().and_then(|o| o.get("name"));
    /// assert_eq!(name.as_ref().and_then(|v| v.as_str()), Some("Alice"));
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Object::Strings(m) => m.get(key).cloned().map(Value::String),
            Object::Ints(m) => m.get(key).copied().map(Value::Int),
            Object::Values(m) => m.get(key).cloned(),
        }
    }

    /// Keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<&String> {
        match self {
            Object::Strings(m) => m.keys().collect(),
            Object::Ints(m) => m.keys().collect(),
            Object::Values(m) => m.keys().collect(),
        }
    }

    /// Widens every value into a [`Value`].
    #[must_use]
    pub fn into_map(self) -> RapidMap<Value> {
        match self {
            Object::Strings(m) => m.map_values(Value::String),
            Object::Ints(m) => m.map_values(Value::Int),
            Object::Values(m) => m,
        }
    }
}

impl Default for Object {
    fn default() -> Self {
        Object::Values(RapidMap::new())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Array(array) => {
                f.write_str("[")?;
                for (i, item) in array.clone().into_values().iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(object) => {
                f.write_str("{")?;
                let map = object.clone().into_map();
                for (i, (k, v)) in map.sorted().into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{k:?}:{v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(array) => array.serialize(serializer),
            Value::Object(object) => object.serialize(serializer),
        }
    }
}

impl Serialize for Array {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Array::Values(v) => v.serialize(serializer),
            Array::Bools(v) => v.serialize(serializer),
            Array::Ints(v) => v.serialize(serializer),
            Array::Floats(v) => v.serialize(serializer),
            Array::Strings(v) => v.serialize(serializer),
        }
    }
}

impl Serialize for Object {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Object::Strings(m) => m.serialize(serializer),
            Object::Ints(m) => m.serialize(serializer),
            Object::Values(m) => m.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a bool, integer, float, string, array or map")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Value, E> {
                Ok(Value::Int(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Value, E>
            where
                E: de::Error,
            {
                i64::try_from(value)
                    .map(Value::Int)
                    .map_err(|_| E::custom(format!("integer {value} does not fit in i64")))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Value, E> {
                Ok(Value::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Value, E> {
                Ok(Value::String(value))
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = RapidMap::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    values.insert(key, value);
                }
                Ok(Value::object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Int(i) => Ok(i),
            other => Err(crate::Error::custom(format!(
                "expected int, found {}",
                other.kind()
            ))),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            other => Err(crate::Error::custom(format!(
                "expected float, found {}",
                other.kind()
            ))),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(crate::Error::custom(format!(
                "expected bool, found {}",
                other.kind()
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(crate::Error::custom(format!(
                "expected string, found {}",
                other.kind()
            ))),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! from_integer {
    ($($ty:ty)*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

from_integer!(i8 i16 i32 i64 u8 u16 u32);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

/// Narrows like [`Value::array`].
impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::array(value)
    }
}

impl From<Vec<bool>> for Value {
    fn from(value: Vec<bool>) -> Self {
        Value::Array(Array::Bools(value))
    }
}

impl From<Vec<i64>> for Value {
    fn from(value: Vec<i64>) -> Self {
        Value::Array(Array::Ints(value))
    }
}

impl From<Vec<f64>> for Value {
    fn from(value: Vec<f64>) -> Self {
        Value::Array(Array::Floats(value))
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Value::Array(Array::Strings(value))
    }
}

/// Narrows like [`Value::object`].
impl From<RapidMap<Value>> for Value {
    fn from(value: RapidMap<Value>) -> Self {
        Value::object(value)
    }
}

impl From<RapidMap<String>> for Value {
    fn from(value: RapidMap<String>) -> Self {
        Value::Object(Object::Strings(value))
    }
}

impl From<RapidMap<i64>> for Value {
    fn from(value: RapidMap<i64>) -> Self {
        Value::Object(Object::Ints(value))
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_of(entries: Vec<(&str, Value)>) -> RapidMap<Value> {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_array_narrowing() {
        assert_eq!(
            Array::from_values(vec![Value::from(true), Value::from(false)]),
            Array::Bools(vec![true, false])
        );
        assert_eq!(
            Array::from_values(vec![Value::from(1.5), Value::from(2.0)]),
            Array::Floats(vec![1.5, 2.0])
        );
        assert_eq!(
            Array::from_values(vec![Value::from(1), Value::from(1.5)]),
            Array::Values(vec![Value::Int(1), Value::Float(1.5)])
        );
        let nested = vec![Value::from(vec![1i64]), Value::from(vec![2i64])];
        assert_eq!(Array::from_values(nested.clone()), Array::Values(nested));
    }

    #[test]
    fn test_object_narrowing() {
        let strings = Object::from_map(map_of(vec![("a", Value::from("x"))]));
        assert!(matches!(strings, Object::Strings(_)));

        let ints = Object::from_map(map_of(vec![("a", Value::from(1)), ("b", Value::from(2))]));
        assert_eq!(ints.element(), Element::Int8);

        let bools = Object::from_map(map_of(vec![("a", Value::from(true))]));
        assert!(matches!(bools, Object::Values(_)));

        assert_eq!(Object::from_map(RapidMap::new()), Object::default());
    }

    #[test]
    fn test_collection_widths() {
        assert_eq!(Array::Ints(vec![]).element(), Element::Int64);
        assert_eq!(Array::Ints(vec![0, 255]).element(), Element::Int8);
        assert_eq!(Array::Ints(vec![256, 0]).element(), Element::Int64);
        assert_eq!(Object::Ints(RapidMap::new()).element(), Element::Int8);
    }

    #[test]
    fn test_tryfrom() {
        assert_eq!(i64::try_from(Value::Int(42)).unwrap(), 42);
        assert_eq!(f64::try_from(Value::Int(2)).unwrap(), 2.0);
        assert!(bool::try_from(Value::Int(1)).is_err());
        assert_eq!(String::try_from(Value::from("hi")).unwrap(), "hi");
        assert!(String::try_from(Value::Int(42)).is_err());
    }

    #[test]
    fn test_widening_accessors() {
        let array = Array::Ints(vec![1, 2]);
        assert_eq!(array.get(1), Some(Value::Int(2)));
        assert_eq!(array.get(2), None);
        assert_eq!(array.into_values(), vec![Value::Int(1), Value::Int(2)]);

        let object = Object::from_map(map_of(vec![("k", Value::from("v"))]));
        assert_eq!(object.get("k"), Some(Value::from("v")));
        assert_eq!(object.into_map().get("k"), Some(&Value::from("v")));
    }

    #[test]
    fn test_display_sorts_keys() {
        let value = Value::object(map_of(vec![
            ("b", Value::from(vec![Value::from(1), Value::from("x")])),
            ("a", Value::from(1.0)),
        ]));
        assert_eq!(value.to_string(), r#"{"a":1.0,"b":[1,"x"]}"#);
    }

    #[test]
    fn test_json_interop() {
        let json = serde_json::json!({"a": [1, 2], "b": "x", "c": [true, "y"]});
        let value: Value = serde_json::from_value(json.clone()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.get("a"), Some(Value::Array(Array::Ints(vec![1, 2]))));
        assert_eq!(serde_json::to_value(&value).unwrap(), json);
    }
}
