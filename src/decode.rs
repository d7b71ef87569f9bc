//! Native rapid decoding.
//!
//! [`Decoder`] reads values back from any [`io::Read`] source. Every read
//! starts with a tag that is checked before any payload byte is trusted.
//! [`Decoder::decode_value`] rebuilds a [`Value`] exactly as it was encoded,
//! typed containers included, and [`Decoder::decode`] fills any
//! `T: Deserialize` instead.
//!
//! ```rust
//! use serde_rapid::{Decoder, Error, Value};
//!
//! let bytes = [0x02, 0x07, 0x10, b'h', b'i', 0x00];
//! let mut decoder = Decoder::new(&bytes[..]);
//!
//! assert_eq!(decoder.decode_value().unwrap(), Value::Int(7));
//! assert_eq!(decoder.decode::<String>().unwrap(), "hi");
//! assert!(matches!(decoder.decode_value(), Err(Error::EndOfInput)));
//! ```

use crate::tag::{self, Element, Tag};
use crate::value::{Array, Object};
use crate::{Error, RapidMap, RapidOptions, Result, Value};
use serde::de::DeserializeOwned;
use std::io;

/// Byte source that tracks how much has been consumed.
pub(crate) struct Source<R> {
    reader: R,
    offset: u64,
}

impl<R: io::Read> Source<R> {
    fn new(reader: R) -> Self {
        Source { reader, offset: 0 }
    }

    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }

    /// Fills `buf`. Running dry is a truncation unless nothing at all was
    /// read and `boundary` says a new value could start here.
    fn fill(&mut self, buf: &mut [u8], what: &str, boundary: bool) -> Result<()> {
        let mut read = 0;
        while read < buf.len() {
            match self.reader.read(&mut buf[read..]) {
                Ok(0) if read == 0 && boundary => return Err(Error::EndOfInput),
                Ok(0) => return Err(Error::truncated(self.offset + read as u64, what)),
                Ok(n) => read += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    return Err(Error::io(&format!("reading {what}"), e)
                        .within(|| format!("byte {}", self.offset + read as u64)))
                }
            }
        }
        self.offset += read as u64;
        Ok(())
    }

    fn byte(&mut self, what: &str) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf, what, false)?;
        Ok(buf[0])
    }

    pub(crate) fn tag(&mut self, boundary: bool) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf, "tag", boundary)?;
        Ok(buf[0])
    }

    fn eight(&mut self, what: &str) -> Result<[u8; 8]> {
        let mut buf = [0u8; 8];
        self.fill(&mut buf, what, false)?;
        Ok(buf)
    }

    /// Reads a string payload up to its terminator and undoes the newline
    /// escape.
    fn string(&mut self) -> Result<String> {
        let start = self.offset;
        let mut bytes = Vec::new();
        loop {
            match self.byte("string payload")? {
                tag::TERMINATOR => break,
                b => bytes.push(b),
            }
        }
        let s = String::from_utf8(bytes).map_err(|_| Error::InvalidUtf8 { offset: start })?;
        if s.contains("\\n") {
            Ok(s.replace("\\n", "\n"))
        } else {
            Ok(s)
        }
    }
}

/// Reads rapid values from an [`io::Read`] source.
///
/// The decoder reads byte by byte while scanning strings; wrap unbuffered
/// sources in a [`BufReader`](std::io::BufReader).
pub struct Decoder<R> {
    pub(crate) source: Source<R>,
    pub(crate) options: RapidOptions,
    pub(crate) depth: usize,
    /// Element type of the next payload when a typed container has already
    /// declared it, so that no tag precedes it on the wire.
    pub(crate) pending: Option<Element>,
}

impl<R: io::Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, RapidOptions::default())
    }

    pub fn with_options(reader: R, options: RapidOptions) -> Self {
        Decoder {
            source: Source::new(reader),
            options,
            depth: 0,
            pending: None,
        }
    }

    /// Decodes one value into its exact in-memory form.
    ///
    /// # Errors
    ///
    /// - [`Error::EndOfInput`] if the source is empty where the value would start
    /// - [`Error::TruncatedPayload`] if it ends anywhere inside the value
    /// - [`Error::UnexpectedType`] for tags that name no literal
    /// - [`Error::InvalidUtf8`], [`Error::InvalidLength`],
    ///   [`Error::DuplicateKey`], [`Error::DepthLimitExceeded`] for malformed payloads
    pub fn decode_value(&mut self) -> Result<Value> {
        self.depth = 0;
        self.pending = None;
        let start = self.source.offset();
        let value = self.read_value()?;
        tracing::trace!(
            kind = value.kind(),
            bytes = self.source.offset() - start,
            "decoded value"
        );
        Ok(value)
    }

    /// Decodes one value into `T`, checking every tag against what `T` accepts.
    ///
    /// # Errors
    ///
    /// As [`Decoder::decode_value`], plus [`Error::UnexpectedType`] whenever
    /// the wire holds a different type than `T` expects.
    pub fn decode<T>(&mut self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.depth = 0;
        self.pending = None;
        T::deserialize(&mut *self)
    }

    /// Bytes consumed so far.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.source.offset()
    }

    pub fn get_ref(&self) -> &R {
        &self.source.reader
    }

    pub fn into_inner(self) -> R {
        self.source.reader
    }

    pub(crate) fn read_raw(&mut self, buf: &mut [u8], what: &str) -> Result<()> {
        self.source.fill(buf, what, true)
    }

    /// Reads the next tag byte, or takes the one a typed container declared.
    pub(crate) fn next_code(&mut self) -> Result<(u64, u8)> {
        let offset = self.source.offset();
        match self.pending.take() {
            Some(element) => Ok((offset, element.bits())),
            None => Ok((offset, self.source.tag(self.depth == 0)?)),
        }
    }

    /// Reads the next tag, checks it against `expected` and resolves it.
    pub(crate) fn expect(&mut self, expected: u8) -> Result<Tag> {
        let (offset, found) = self.next_code()?;
        if !tag::satisfies(found, expected) {
            return Err(Error::unexpected_type(offset, found, expected));
        }
        self.resolve(offset, found)
    }

    /// Resolves a first tag byte, reading the second byte of map headers.
    pub(crate) fn resolve(&mut self, offset: u64, code: u8) -> Result<Tag> {
        if code == tag::MAP_STRING {
            let value_code = self.source.byte("map value type")?;
            return Tag::map_of(value_code)
                .ok_or_else(|| Error::unexpected_type(offset + 1, value_code, tag::MAP_VALUES));
        }
        Tag::from_code(code).ok_or_else(|| Error::unexpected_type(offset, code, tag::ANY))
    }

    pub(crate) fn bool_payload(&mut self) -> Result<bool> {
        Ok(self.source.byte("bool payload")? & 1 == 1)
    }

    pub(crate) fn int_payload(&mut self, code: u8) -> Result<i64> {
        if code == tag::INT8 {
            Ok(i64::from(self.source.byte("int8 payload")?))
        } else {
            Ok(i64::from_le_bytes(self.source.eight("int64 payload")?))
        }
    }

    pub(crate) fn float_payload(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.source.eight("float64 payload")?))
    }

    pub(crate) fn string_payload(&mut self) -> Result<String> {
        self.source.string()
    }

    /// Reads a container's element count, which is always a tagged int.
    pub(crate) fn count(&mut self) -> Result<usize> {
        let offset = self.source.offset();
        let found = self.source.byte("element count")?;
        if !tag::satisfies(found, tag::INT) {
            return Err(Error::unexpected_type(offset, found, tag::INT));
        }
        let len = self.int_payload(found)?;
        usize::try_from(len).map_err(|_| Error::InvalidLength { offset, len })
    }

    /// Reads the keys of a map, rejecting repeats.
    pub(crate) fn keys(&mut self, len: usize) -> Result<Vec<String>> {
        let mut keys: Vec<String> = Vec::with_capacity(len.min(4096));
        let mut seen = std::collections::HashSet::with_capacity(len.min(4096));
        for _ in 0..len {
            let key = self.string_payload()?;
            if !seen.insert(key.clone()) {
                return Err(Error::DuplicateKey(key));
            }
            keys.push(key);
        }
        Ok(keys)
    }

    pub(crate) fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(Error::DepthLimitExceeded(self.options.max_depth));
        }
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth -= 1;
    }

    fn read_value(&mut self) -> Result<Value> {
        let (offset, code) = self.next_code()?;
        let tag = self.resolve(offset, code)?;
        self.read_tagged(tag)
    }

    fn read_tagged(&mut self, tag: Tag) -> Result<Value> {
        match tag {
            Tag::Bool => Ok(Value::Bool(self.bool_payload()?)),
            Tag::Int8 | Tag::Int64 => Ok(Value::Int(self.int_payload(tag.code())?)),
            Tag::Float64 => Ok(Value::Float(self.float_payload()?)),
            Tag::String => Ok(Value::String(self.string_payload()?)),
            Tag::Array(element) => {
                self.enter()?;
                let array = self.read_array(element);
                self.leave();
                Ok(Value::Array(array?))
            }
            Tag::Map(element) => {
                self.enter()?;
                let object = self.read_object(element);
                self.leave();
                Ok(Value::Object(object?))
            }
        }
    }

    fn read_array(&mut self, element: Element) -> Result<Array> {
        let len = self.count()?;
        let capacity = len.min(4096);
        let array = match element {
            Element::Bool => {
                let mut values = Vec::with_capacity(capacity);
                for _ in 0..len {
                    values.push(self.bool_payload()?);
                }
                Array::Bools(values)
            }
            Element::Int8 | Element::Int64 => {
                let mut values = Vec::with_capacity(capacity);
                for _ in 0..len {
                    values.push(self.int_payload(element.bits())?);
                }
                Array::Ints(values)
            }
            Element::Float64 => {
                let mut values = Vec::with_capacity(capacity);
                for _ in 0..len {
                    values.push(self.float_payload()?);
                }
                Array::Floats(values)
            }
            Element::String => {
                let mut values = Vec::with_capacity(capacity);
                for _ in 0..len {
                    values.push(self.string_payload()?);
                }
                Array::Strings(values)
            }
            Element::Interface => {
                let mut values = Vec::with_capacity(capacity);
                for _ in 0..len {
                    values.push(self.read_value()?);
                }
                Array::Values(values)
            }
        };
        Ok(array)
    }

    fn read_object(&mut self, element: Element) -> Result<Object> {
        let len = self.count()?;
        let keys = self.keys(len)?;
        let object = match element {
            Element::String => {
                let mut map = RapidMap::with_capacity(keys.len());
                for key in keys {
                    let value = self.string_payload()?;
                    map.insert(key, value);
                }
                Object::Strings(map)
            }
            Element::Int8 | Element::Int64 => {
                let mut map = RapidMap::with_capacity(keys.len());
                for key in keys {
                    let value = self.int_payload(element.bits())?;
                    map.insert(key, value);
                }
                Object::Ints(map)
            }
            _ => {
                let mut map = RapidMap::with_capacity(keys.len());
                for key in keys {
                    let value = self.read_value()?;
                    map.insert(key, value);
                }
                Object::Values(map)
            }
        };
        Ok(object)
    }
}

/// Decodes one value from `reader` into its exact in-memory form.
///
/// # Errors
///
/// See [`Decoder::decode_value`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_value<R: io::Read>(reader: R) -> Result<Value> {
    Decoder::new(reader).decode_value()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Result<Value> {
        Decoder::new(bytes).decode_value()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(decode(&[0x01, 0x01]).unwrap(), Value::Bool(true));
        assert_eq!(decode(&[0x02, 0xff]).unwrap(), Value::Int(255));
        let mut wide = vec![0x04];
        wide.extend_from_slice(&256i64.to_le_bytes());
        assert_eq!(decode(&wide).unwrap(), Value::Int(256));
    }

    #[test]
    fn test_string_unescapes() {
        let bytes = [0x10, b'a', b'\\', b'n', b'b', 0x00];
        assert_eq!(decode(&bytes).unwrap(), Value::from("a\nb"));
    }

    #[test]
    fn test_eof_classification() {
        assert!(decode(&[]).unwrap_err().is_eof());
        assert!(matches!(
            decode(&[0x04, 0x01]),
            Err(Error::TruncatedPayload { offset: 2, .. })
        ));
        assert!(matches!(
            decode(&[0x10, b'a']),
            Err(Error::TruncatedPayload { .. })
        ));
        // Inside a dynamic array the next element's tag is not a boundary.
        assert!(matches!(
            decode(&[0xA0, 0x02, 0x02, 0x01, 0x01]),
            Err(Error::TruncatedPayload { .. })
        ));
    }

    #[test]
    fn test_unknown_tags() {
        assert!(matches!(
            decode(&[0x00]),
            Err(Error::UnexpectedType { found: 0x00, .. })
        ));
        assert!(matches!(
            decode(&[0x50, 0x01, 0x02, 0x00]),
            Err(Error::UnexpectedType { offset: 1, found: 0x01, .. })
        ));
    }

    #[test]
    fn test_negative_count() {
        let mut bytes = vec![0x30, 0x04];
        bytes.extend_from_slice(&(-1i64).to_le_bytes());
        assert!(matches!(
            decode(&bytes),
            Err(Error::InvalidLength { len: -1, .. })
        ));
    }

    #[test]
    fn test_duplicate_keys() {
        let bytes = [0x50, 0x10, 0x02, 0x02, b'a', 0, b'a', 0, b'x', 0, b'y', 0];
        assert!(matches!(decode(&bytes), Err(Error::DuplicateKey(k)) if k == "a"));
    }

    #[test]
    fn test_depth_limit() {
        let options = RapidOptions::new().with_max_depth(2);
        // [[[ ]]] as nested dynamic arrays.
        let bytes = [0xA0, 0x02, 0x01, 0xA0, 0x02, 0x01, 0xA0, 0x02, 0x00];
        let mut decoder = Decoder::with_options(&bytes[..], options);
        assert!(matches!(
            decoder.decode_value(),
            Err(Error::DepthLimitExceeded(2))
        ));
        assert!(Decoder::new(&bytes[..]).decode_value().is_ok());
    }

    #[test]
    fn test_typed_containers_keep_their_flavour() {
        let bytes = [0x24, 0x02, 0x00];
        assert_eq!(decode(&bytes).unwrap(), Value::Array(Array::Ints(vec![])));
        let bytes = [0x50, 0x04, 0x02, 0x00];
        assert_eq!(
            decode(&bytes).unwrap(),
            Value::Object(Object::Ints(RapidMap::new()))
        );
    }
}
