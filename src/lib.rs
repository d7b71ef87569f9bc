//! # serde_rapid
//!
//! A Serde-compatible implementation of the rapid binary literal format.
//!
//! ## What is rapid?
//!
//! rapid is a compact, self-describing binary encoding for literal values:
//! bools, 64-bit integers, 64-bit floats, UTF-8 strings, arrays of those, and
//! string-keyed maps. Every value starts with a one-byte type tag, so a value
//! can be decoded without a schema, and a decoder that expects one type can
//! reject another before it reads a single payload byte.
//!
//! ## Key Features
//!
//! - **Compact**: small non-negative integers take two bytes, and homogeneous
//!   arrays and maps declare their element type once instead of per element
//! - **Self-delimiting**: values can be written back to back into a stream
//!   and read out again without framing
//! - **Deterministic**: map keys are written in sorted order, so equal maps
//!   always produce equal bytes
//! - **Serde Compatible**: works with existing Rust types via
//!   `#[derive(Serialize, Deserialize)]`
//! - **No Unsafe Code**: written entirely in safe Rust
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! serde_rapid = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Basic Serialization and Deserialization
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_rapid::{from_slice, to_vec};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User {
//!     id: 123,
//!     name: "Alice".to_string(),
//!     active: true,
//! };
//!
//! let bytes = to_vec(&user).unwrap();
//! let user_back: User = from_slice(&bytes).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ### Dynamic Values
//!
//! [`Value`] holds any rapid literal, and the [`rapid!`] macro builds one
//! from JSON-like syntax:
//!
//! ```rust
//! use serde_rapid::{decode_value, encode_value, rapid, Value};
//!
//! let value = rapid!({
//!     "name": "Alice",
//!     "scores": [95, 87, 92],
//! });
//!
//! let mut bytes = Vec::new();
//! encode_value(&mut bytes, &value).unwrap();
//! let back = decode_value(&bytes[..]).unwrap();
//!
//! assert_eq!(back, value);
//! assert_eq!(back.as_object().unwrap().get("scores").unwrap().as_array().unwrap().len(), 3);
//! ```
//!
//! ### Streams
//!
//! ```rust
//! use serde_rapid::{read_all, write_all, RapidOptions, Value};
//!
//! let mut bytes = Vec::new();
//! write_all(&mut bytes, [1, 2, 3], RapidOptions::new()).unwrap();
//!
//! let values = read_all(&bytes[..], RapidOptions::new()).unwrap();
//! assert_eq!(values, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
//! ```
//!
//! ## Wire Format
//!
//! | Value | Bytes |
//! |-------|-------|
//! | bool | `0x01`, then `0x00` or `0x01` |
//! | int in `0..256` | `0x02`, then one byte |
//! | any other int | `0x04`, then 8 bytes little-endian |
//! | float | `0x08`, then 8 bytes little-endian IEEE-754 |
//! | string | `0x10`, then the bytes with `\n` written as `\\n`, then `0x00` |
//! | array | `0x20 \| element`, count, payloads |
//! | map | `0x50`, value type, count, sorted keys, values |
//!
//! Element type `0x80` marks a dynamic array or map whose entries carry their
//! own tags. See [`tag`] for the full table.
//!
//! ## Type Mapping
//!
//! | Rust | rapid |
//! |------|-------|
//! | `bool` | bool |
//! | `i8`..`i64`, `u8`..`u32` | int |
//! | `u64`, `i128`, `u128` | int when the value fits `i64` |
//! | `f32`, `f64` | float |
//! | `char`, `String`, `&str` | string |
//! | `Vec<T>`, tuples, `&[u8]` | array |
//! | structs, `HashMap<String, V>` | map |
//! | unit enum variants | string |
//! | other enum variants | map with one entry |
//! | `Option<T>` | `T` when `Some`; `None` is not representable |
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result):
//!
//! ```rust
//! use serde_rapid::{from_slice, Error};
//!
//! match from_slice::<String>(&[0x02, 0x01]) {
//!     Err(Error::UnexpectedType { offset, .. }) => assert_eq!(offset, 0),
//!     other => panic!("unexpected result: {other:?}"),
//! }
//! ```

pub mod de;
pub mod decode;
pub mod encode;
pub mod error;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;
pub mod stream;
pub mod tag;
pub mod value;

pub use de::{from_value, ValueDeserializer};
pub use decode::{decode_value, Decoder};
pub use encode::{encode_value, Encoder};
pub use error::{Error, Result};
pub use map::RapidMap;
pub use options::RapidOptions;
pub use ser::{to_value, ValueSerializer};
pub use stream::{read_all, write_all, StreamReader, StreamWriter};
pub use value::{Array, Object, Value};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Serialize any `T: Serialize` to a byte vector.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_rapid::to_vec;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let bytes = to_vec(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(&bytes[..4], &[0x50, 0x02, 0x02, 0x02]);
/// ```
///
/// # Errors
///
/// Returns an error if the value has no rapid form (e.g. `None`), an integer
/// does not fit `i64`, or a string contains a NUL byte.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    let mut bytes = Vec::with_capacity(128);
    to_writer(&mut bytes, value)?;
    Ok(bytes)
}

/// Serialize any `T: Serialize` into an [`io::Write`] sink.
///
/// # Errors
///
/// As [`to_vec`], plus [`Error::Io`] if the sink fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    Encoder::new(writer).serialize(value)
}

/// Deserialize an instance of type `T` from bytes holding exactly one value.
///
/// # Examples
///
/// ```rust
/// use serde_rapid::from_slice;
///
/// let words: Vec<String> = from_slice(&[0x30, 0x02, 0x01, b'h', b'i', 0x00]).unwrap();
/// assert_eq!(words, vec!["hi".to_string()]);
///
/// // Bytes after the value are rejected.
/// assert!(from_slice::<u8>(&[0x02, 0x01, 0x02]).is_err());
/// ```
///
/// # Errors
///
/// Returns an error if the bytes are malformed, do not match `T`, or carry
/// anything after the value.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let mut decoder = Decoder::new(v);
    let value = decoder.decode()?;
    let offset = decoder.offset();
    if offset != v.len() as u64 {
        return Err(Error::custom(format!(
            "{} trailing bytes after the value at offset {offset}",
            v.len() as u64 - offset
        )));
    }
    Ok(value)
}

/// Deserialize an instance of type `T` from an [`io::Read`] source.
///
/// Only the bytes of one value are consumed; anything after it is left in
/// the source. Use [`Decoder`] or [`StreamReader`] to read several.
///
/// # Errors
///
/// As [`from_slice`], plus [`Error::Io`] if the source fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    Decoder::new(reader).decode()
}
