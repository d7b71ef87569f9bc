//! Native rapid encoding of [`Value`]s.
//!
//! [`Encoder`] writes each value as a self-describing byte sequence: a tag,
//! then the payload. It does no buffering of its own, so wrap slow sinks in a
//! [`BufWriter`](std::io::BufWriter). The same encoder also accepts any
//! `T: Serialize` through [`Encoder::serialize`].
//!
//! ```rust
//! use serde_rapid::{Encoder, Value};
//!
//! let mut encoder = Encoder::new(Vec::new());
//! encoder.encode(&Value::from(255)).unwrap();
//! encoder.encode(&Value::from(256)).unwrap();
//!
//! assert_eq!(
//!     encoder.into_inner(),
//!     vec![0x02, 0xff, 0x04, 0x00, 0x01, 0, 0, 0, 0, 0, 0]
//! );
//! ```

use crate::tag::{self, Element, Tag};
use crate::value::{Array, Object};
use crate::{Error, RapidMap, Result, Value};
use serde::Serialize;
use std::io;

/// Writes rapid values to an [`io::Write`] sink.
///
/// Pass `&mut W` to keep ownership of the sink; [`Encoder::into_inner`] hands
/// it back otherwise.
#[derive(Debug)]
pub struct Encoder<W> {
    writer: W,
    written: u64,
}

impl<W: io::Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Encoder { writer, written: 0 }
    }

    /// Encodes one value.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidString`] if a string or key contains a NUL byte
    /// - [`Error::Io`] if the sink fails, with the position being written
    ///
    /// A string that fails validation writes nothing. Whatever an I/O failure
    /// interrupts stays in the sink.
    pub fn encode(&mut self, value: &Value) -> Result<()> {
        check_value(value)?;
        let start = self.written;
        self.write_value(value)?;
        tracing::trace!(
            kind = value.kind(),
            bytes = self.written - start,
            "encoded value"
        );
        Ok(())
    }

    /// Encodes any `T: Serialize` by projecting it onto the literal set.
    ///
    /// # Errors
    ///
    /// As [`Encoder::encode`], plus [`Error::UnsupportedType`] for values with
    /// no literal form such as `None` or `()`.
    pub fn serialize<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(&mut *self)
    }

    /// Flushes the sink. The encoder itself holds nothing back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the sink fails to flush.
    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::io("flushing the sink", e))
    }

    /// Total bytes the sink has accepted, including those of a write that
    /// later failed.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Writes `bytes`, counting every byte the sink accepts even when it
    /// fails part way through.
    pub(crate) fn put(&mut self, mut bytes: &[u8], what: &str) -> Result<()> {
        while !bytes.is_empty() {
            match self.writer.write(bytes) {
                Ok(0) => {
                    return Err(Error::io(
                        &format!("writing {what}"),
                        io::ErrorKind::WriteZero.into(),
                    ))
                }
                Ok(n) => {
                    self.written += n as u64;
                    bytes = &bytes[n..];
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(Error::io(&format!("writing {what}"), e)),
            }
        }
        Ok(())
    }

    fn put_tag(&mut self, tag: Tag) -> Result<()> {
        match tag.value_code() {
            Some(value_code) => self.put(&[tag.code(), value_code], "map header"),
            None => self.put(&[tag.code()], "tag"),
        }
    }

    fn write_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Bool(b) => self.write_bool(*b),
            Value::Int(i) => self.write_int(*i),
            Value::Float(f) => self.write_float(*f),
            Value::String(s) => {
                self.put_tag(Tag::String)?;
                self.put_string(s)
            }
            Value::Array(array) => self.write_array(array),
            Value::Object(object) => self.write_object(object),
        }
    }

    pub(crate) fn write_bool(&mut self, value: bool) -> Result<()> {
        self.put(&[tag::BOOL, u8::from(value)], "bool")
    }

    /// Writes a tagged integer with the narrowest width that holds it.
    pub(crate) fn write_int(&mut self, value: i64) -> Result<()> {
        match Element::for_int(value) {
            Element::Int8 => self.put(&[tag::INT8, value as u8], "int8"),
            _ => {
                self.put_tag(Tag::Int64)?;
                self.put(&value.to_le_bytes(), "int64 payload")
            }
        }
    }

    pub(crate) fn write_float(&mut self, value: f64) -> Result<()> {
        self.put_tag(Tag::Float64)?;
        self.put(&value.to_le_bytes(), "float64 payload")
    }

    pub(crate) fn write_string(&mut self, value: &str) -> Result<()> {
        check_string(value)?;
        self.put_tag(Tag::String)?;
        self.put_string(value)
    }

    /// Writes an untagged string payload that has already been checked.
    fn put_string(&mut self, value: &str) -> Result<()> {
        if value.contains('\n') {
            self.put(value.replace('\n', "\\n").as_bytes(), "string payload")?;
        } else {
            self.put(value.as_bytes(), "string payload")?;
        }
        self.put(&[tag::TERMINATOR], "string terminator")
    }

    fn put_int(&mut self, value: i64, width: Element) -> Result<()> {
        match width {
            Element::Int8 => self.put(&[value as u8], "int8 payload"),
            _ => self.put(&value.to_le_bytes(), "int64 payload"),
        }
    }

    fn write_count(&mut self, len: usize) -> Result<()> {
        let len = i64::try_from(len).map_err(|_| Error::IntegerOverflow(len.to_string()))?;
        self.write_int(len)
            .map_err(|e| e.within(|| "element count".to_string()))
    }

    fn write_array(&mut self, array: &Array) -> Result<()> {
        let element = array.element();
        self.put_tag(Tag::Array(element))?;
        self.write_count(array.len())?;
        match array {
            Array::Values(values) => {
                for (i, value) in values.iter().enumerate() {
                    self.write_value(value)
                        .map_err(|e| e.within(|| format!("element {i}")))?;
                }
            }
            Array::Bools(values) => {
                let bytes: Vec<u8> = values.iter().map(|b| u8::from(*b)).collect();
                self.put(&bytes, "bool payloads")?;
            }
            Array::Ints(values) => {
                for (i, value) in values.iter().enumerate() {
                    self.put_int(*value, element)
                        .map_err(|e| e.within(|| format!("element {i}")))?;
                }
            }
            Array::Floats(values) => {
                for (i, value) in values.iter().enumerate() {
                    self.put(&value.to_le_bytes(), "float64 payload")
                        .map_err(|e| e.within(|| format!("element {i}")))?;
                }
            }
            Array::Strings(values) => {
                for (i, value) in values.iter().enumerate() {
                    self.put_string(value)
                        .map_err(|e| e.within(|| format!("element {i}")))?;
                }
            }
        }
        Ok(())
    }

    fn write_object(&mut self, object: &Object) -> Result<()> {
        match object {
            Object::Strings(map) => {
                let entries = map.sorted();
                self.write_map_header(object.element(), &entries)?;
                for (key, value) in entries {
                    self.put_string(value).map_err(|e| e.within(|| value_for(key)))?;
                }
            }
            Object::Ints(map) => {
                let width = object.element();
                let entries = map.sorted();
                self.write_map_header(width, &entries)?;
                for (key, value) in entries {
                    self.put_int(*value, width)
                        .map_err(|e| e.within(|| value_for(key)))?;
                }
            }
            Object::Values(map) => {
                let entries = map.sorted();
                self.write_map_header(Element::Interface, &entries)?;
                for (key, value) in entries {
                    self.write_value(value)
                        .map_err(|e| e.within(|| value_for(key)))?;
                }
            }
        }
        Ok(())
    }

    /// Writes the two header bytes, the count, then every key in the order
    /// given. Values follow in the same order.
    fn write_map_header<V>(&mut self, element: Element, entries: &[(&String, &V)]) -> Result<()> {
        self.put_tag(Tag::Map(element))?;
        self.write_count(entries.len())?;
        for (key, _) in entries {
            self.put_string(key)
                .map_err(|e| e.within(|| format!("key {key:?}")))?;
        }
        Ok(())
    }
}

/// Encodes one value into `writer`.
///
/// # Errors
///
/// See [`Encoder::encode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_value<W: io::Write>(writer: W, value: &Value) -> Result<()> {
    Encoder::new(writer).encode(value)
}

fn value_for(key: &str) -> String {
    format!("value for key {key:?}")
}

fn check_string(value: &str) -> Result<()> {
    if value.as_bytes().contains(&0) {
        return Err(Error::invalid_string(value));
    }
    Ok(())
}

fn check_keys<V>(map: &RapidMap<V>) -> Result<()> {
    map.keys().try_for_each(|key| check_string(key))
}

/// Validates every string in a value tree so that a rejected value leaves
/// the sink untouched.
pub(crate) fn check_value(value: &Value) -> Result<()> {
    match value {
        Value::Bool(_) | Value::Int(_) | Value::Float(_) => Ok(()),
        Value::String(s) => check_string(s),
        Value::Array(Array::Strings(values)) => values.iter().try_for_each(|s| check_string(s)),
        Value::Array(Array::Values(values)) => values.iter().try_for_each(check_value),
        Value::Array(_) => Ok(()),
        Value::Object(Object::Strings(map)) => {
            check_keys(map)?;
            map.values().try_for_each(|s| check_string(s))
        }
        Value::Object(Object::Ints(map)) => check_keys(map),
        Value::Object(Object::Values(map)) => {
            check_keys(map)?;
            map.values().try_for_each(check_value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rapid;

    fn encode(value: &Value) -> Vec<u8> {
        let mut encoder = Encoder::new(Vec::new());
        encoder.encode(value).unwrap();
        encoder.into_inner()
    }

    struct FailingWriter {
        budget: usize,
    }

    impl io::Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "sink closed"));
            }
            let n = buf.len().min(self.budget);
            self.budget -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_scalars() {
        assert_eq!(encode(&Value::Bool(true)), vec![0x01, 0x01]);
        assert_eq!(encode(&Value::Bool(false)), vec![0x01, 0x00]);
        assert_eq!(encode(&Value::Int(0)), vec![0x02, 0x00]);
        assert_eq!(
            encode(&Value::Int(-1)),
            vec![0x04, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
        let mut expected = vec![0x08];
        expected.extend_from_slice(&10.5f64.to_le_bytes());
        assert_eq!(encode(&Value::Float(10.5)), expected);
    }

    #[test]
    fn test_string_escapes_newlines() {
        assert_eq!(
            encode(&Value::from("a\nb")),
            vec![0x10, b'a', b'\\', b'n', b'b', 0x00]
        );
    }

    #[test]
    fn test_nul_rejected_before_writing() {
        let mut encoder = Encoder::new(Vec::new());
        let value = rapid!({ "ok": "fine", "bad": "a\0b" });
        assert!(matches!(
            encoder.encode(&value),
            Err(Error::InvalidString(_))
        ));
        assert!(encoder.get_ref().is_empty());

        let value = Value::from(vec!["x".to_string(), "\0".to_string()]);
        assert!(encoder.encode(&value).is_err());

        let value = rapid!([1, ["deep", { "k\0": 2 }]]);
        assert!(encoder.encode(&value).is_err());
        assert_eq!(encoder.bytes_written(), 0);
    }

    #[test]
    fn test_int_array_width_scans_every_element() {
        let narrow = encode(&Value::from(vec![1i64, 2, 255]));
        assert_eq!(narrow, vec![0x22, 0x02, 3, 1, 2, 255]);

        let wide = encode(&Value::from(vec![300i64, 1]));
        assert_eq!(wide[0], tag::ARRAY | tag::INT64);
        assert_eq!(wide.len(), 1 + 2 + 16);

        assert_eq!(encode(&Value::from(Vec::<i64>::new())), vec![0x24, 0x02, 0]);
    }

    #[test]
    fn test_empty_map() {
        assert_eq!(
            encode(&Value::Object(Object::Ints(RapidMap::new()))),
            vec![0x50, 0x02, 0x02, 0x00]
        );
        assert_eq!(
            encode(&Value::Object(Object::default())),
            vec![0x50, 0x80, 0x02, 0x00]
        );
    }

    #[test]
    fn test_io_error_carries_position() {
        let mut encoder = Encoder::new(FailingWriter { budget: 14 });
        let value = rapid!({ "a": [1, "xxxxxxxx"] });
        let err = encoder.encode(&value).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("element 1"), "{msg}");
        assert!(msg.contains("value for key \"a\""), "{msg}");
    }

    #[test]
    fn test_partial_write_is_counted() {
        let mut encoder = Encoder::new(FailingWriter { budget: 3 });
        assert!(encoder.encode(&Value::from("abcdef")).is_err());
        assert_eq!(encoder.bytes_written(), 3);
    }
}
