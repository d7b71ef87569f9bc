//! The type-tag contract shared by [`Encoder`](crate::Encoder) and
//! [`Decoder`](crate::Decoder).
//!
//! Every value on the wire starts with a one-byte tag (two bytes for maps).
//! Scalar tags are single bits. Container tags are a container modifier
//! OR'ed with the bit of the element they carry, so `ARRAY | STRING` (`0x30`)
//! is an array of strings and `ARRAY | INTERFACE` (`0xA0`) is an array whose
//! elements carry their own tags.
//!
//! ```rust
//! use serde_rapid::tag::{self, Element, Tag};
//!
//! let strings = Tag::Array(Element::String);
//! assert_eq!(strings.code(), 0x30);
//! assert!(strings.is_array());
//! assert_eq!(strings.element(), Some(Element::String));
//!
//! assert!(tag::satisfies(tag::INT64, tag::INT));
//! assert!(!tag::satisfies(tag::INT64, tag::STRING));
//! ```

use std::fmt;

pub const BOOL: u8 = 0x01;
/// Narrow integer: one unsigned payload byte.
pub const INT8: u8 = 0x02;
/// Wide integer: eight little-endian two's-complement payload bytes.
pub const INT64: u8 = 0x04;
pub const FLOAT64: u8 = 0x08;
pub const STRING: u8 = 0x10;
pub const ARRAY: u8 = 0x20;
pub const MAP: u8 = 0x40;
/// Dynamic element: every element carries its own tag.
pub const INTERFACE: u8 = 0x80;

/// Either integer width.
pub const INT: u8 = INT8 | INT64;
/// Every payload bit an array may carry.
pub const ELEMENTS: u8 = BOOL | INT | FLOAT64 | STRING | INTERFACE;
/// Matches any well-formed tag.
pub const ANY: u8 = 0xFF;

/// The only key type a map header may declare.
pub const MAP_STRING: u8 = MAP | STRING;
/// Every value type a map header may declare.
pub const MAP_VALUES: u8 = STRING | INT | INTERFACE;

/// Terminates every string payload.
pub const TERMINATOR: u8 = 0x00;

/// Identifies a stream of values. Written once at the head of a stream.
pub const SIGNATURE: [u8; 5] = *b"RAPID";

/// Largest integer (exclusive) that is written with the narrow width.
pub const NARROW_LIMIT: i64 = 256;

const CONTAINERS: u8 = ARRAY | MAP;

/// The payload kind carried by a scalar or by each slot of a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Element {
    Bool,
    Int8,
    Int64,
    Float64,
    String,
    Interface,
}

impl Element {
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Element::Bool => BOOL,
            Element::Int8 => INT8,
            Element::Int64 => INT64,
            Element::Float64 => FLOAT64,
            Element::String => STRING,
            Element::Interface => INTERFACE,
        }
    }

    /// Resolves a single payload bit. Anything else, including a combination
    /// of bits, yields `None`.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Element> {
        match bits {
            BOOL => Some(Element::Bool),
            INT8 => Some(Element::Int8),
            INT64 => Some(Element::Int64),
            FLOAT64 => Some(Element::Float64),
            STRING => Some(Element::String),
            INTERFACE => Some(Element::Interface),
            _ => None,
        }
    }

    /// Picks the integer width for a single value.
    #[inline]
    #[must_use]
    pub const fn for_int(value: i64) -> Element {
        if value >= 0 && value < NARROW_LIMIT {
            Element::Int8
        } else {
            Element::Int64
        }
    }

    /// Picks one integer width for a whole collection: narrow only when every
    /// value fits. `empty` is used when there are no values at all.
    pub fn for_ints<I>(values: I, empty: Element) -> Element
    where
        I: IntoIterator<Item = i64>,
    {
        let mut seen = false;
        for value in values {
            seen = true;
            if Element::for_int(value) == Element::Int64 {
                return Element::Int64;
            }
        }
        if seen {
            Element::Int8
        } else {
            empty
        }
    }

    /// The tag that precedes an element payload, or `None` when the payload
    /// carries its own tag.
    #[inline]
    #[must_use]
    pub const fn implicit(self) -> Option<Element> {
        match self {
            Element::Interface => None,
            other => Some(other),
        }
    }

    /// Whether a map header may declare this as its value type.
    #[inline]
    #[must_use]
    pub const fn is_map_value(self) -> bool {
        matches!(
            self,
            Element::String | Element::Int8 | Element::Int64 | Element::Interface
        )
    }
}

/// A fully resolved wire tag.
///
/// Maps always have string keys, so [`Tag::Map`] only records the value type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    Bool,
    Int8,
    Int64,
    Float64,
    String,
    Array(Element),
    Map(Element),
}

impl Tag {
    /// The first header byte.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Tag::Bool => BOOL,
            Tag::Int8 => INT8,
            Tag::Int64 => INT64,
            Tag::Float64 => FLOAT64,
            Tag::String => STRING,
            Tag::Array(element) => ARRAY | element.bits(),
            Tag::Map(_) => MAP_STRING,
        }
    }

    /// The second header byte, present only for maps.
    #[must_use]
    pub const fn value_code(self) -> Option<u8> {
        match self {
            Tag::Map(element) => Some(element.bits()),
            _ => None,
        }
    }

    /// Resolves a first header byte. Map headers need their second byte and
    /// go through [`Tag::map_of`] instead.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Tag> {
        match code {
            BOOL => Some(Tag::Bool),
            INT8 => Some(Tag::Int8),
            INT64 => Some(Tag::Int64),
            FLOAT64 => Some(Tag::Float64),
            STRING => Some(Tag::String),
            _ if code & CONTAINERS == ARRAY => match Element::from_bits(code & !ARRAY) {
                Some(element) => Some(Tag::Array(element)),
                None => None,
            },
            _ => None,
        }
    }

    /// Resolves the second byte of a map header.
    #[must_use]
    pub const fn map_of(value_code: u8) -> Option<Tag> {
        match Element::from_bits(value_code) {
            Some(element) if element.is_map_value() => Some(Tag::Map(element)),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_array(self) -> bool {
        matches!(self, Tag::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_map(self) -> bool {
        matches!(self, Tag::Map(_))
    }

    /// The element type of a container tag.
    #[inline]
    #[must_use]
    pub const fn element(self) -> Option<Element> {
        match self {
            Tag::Array(element) | Tag::Map(element) => Some(element),
            _ => None,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&describe(self.code()))?;
        if let Tag::Map(element) = self {
            write!(f, " of {}", describe(element.bits()))?;
        }
        Ok(())
    }
}

/// Bitwise containment check between a tag read from the wire and the tags a
/// destination accepts.
///
/// `found` must share at least one payload bit with `expected`, carry no bit
/// outside of it, and have exactly the container modifier `expected` has.
#[must_use]
pub const fn satisfies(found: u8, expected: u8) -> bool {
    found & expected & !CONTAINERS != 0
        && found & !expected == 0
        && found & CONTAINERS == expected & CONTAINERS
}

/// Human-readable name of a tag byte or tag mask, for error messages.
#[must_use]
pub fn describe(code: u8) -> String {
    if code == ANY {
        return "any value".to_string();
    }
    let mut names = Vec::new();
    for (bit, name) in [
        (BOOL, "bool"),
        (INT8, "int8"),
        (INT64, "int64"),
        (FLOAT64, "float64"),
        (STRING, "string"),
        (INTERFACE, "interface"),
    ] {
        if code & bit != 0 {
            names.push(name);
        }
    }
    let payload = if names.is_empty() {
        "nothing".to_string()
    } else {
        names.join("|")
    };
    let mut out = match code & CONTAINERS {
        ARRAY => format!("array of {payload}"),
        MAP => format!("map of {payload}"),
        CONTAINERS => format!("array|map of {payload}"),
        _ => payload,
    };
    out.push_str(&format!(" (0x{code:02x})"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_layout() {
        assert_eq!(
            [BOOL, INT8, INT64, FLOAT64, STRING, ARRAY, MAP, INTERFACE],
            [1, 2, 4, 8, 16, 32, 64, 128]
        );
        assert_eq!(Tag::Array(Element::String).code(), 0x30);
        assert_eq!(Tag::Array(Element::Interface).code(), 0xA0);
        assert_eq!(Tag::Map(Element::String).code(), 0x50);
        assert_eq!(Tag::Map(Element::Int8).value_code(), Some(INT8));
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Tag::from_code(0x30), Some(Tag::Array(Element::String)));
        assert_eq!(Tag::from_code(INT64), Some(Tag::Int64));
        assert_eq!(Tag::from_code(0x00), None);
        assert_eq!(Tag::from_code(ARRAY | INT8 | INT64), None);
        assert_eq!(Tag::from_code(MAP_STRING), None);
        assert_eq!(Tag::map_of(INTERFACE), Some(Tag::Map(Element::Interface)));
        assert_eq!(Tag::map_of(BOOL), None);
    }

    #[test]
    fn test_satisfies() {
        assert!(satisfies(INT8, INT));
        assert!(satisfies(INT64, INT));
        assert!(!satisfies(INT64, STRING));
        assert!(!satisfies(STRING, MAP_STRING));
        assert!(!satisfies(ARRAY | STRING, STRING));
        assert!(!satisfies(ARRAY | STRING, MAP_STRING));
        assert!(satisfies(ARRAY | STRING, ARRAY | ELEMENTS));
        assert!(satisfies(MAP_STRING, MAP_STRING));
    }

    #[test]
    fn test_int_width() {
        assert_eq!(Element::for_int(0), Element::Int8);
        assert_eq!(Element::for_int(255), Element::Int8);
        assert_eq!(Element::for_int(256), Element::Int64);
        assert_eq!(Element::for_int(-1), Element::Int64);
        assert_eq!(Element::for_ints([300, 1, 2], Element::Int8), Element::Int64);
        assert_eq!(Element::for_ints([1, 2, 300], Element::Int8), Element::Int64);
        assert_eq!(Element::for_ints([1, 2], Element::Int64), Element::Int8);
        assert_eq!(Element::for_ints(Vec::new(), Element::Int64), Element::Int64);
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(INT64), "int64 (0x04)");
        assert_eq!(describe(0x30), "array of string (0x30)");
        assert_eq!(Tag::Map(Element::Int8).to_string(), "map of string (0x50) of int8 (0x02)");
    }
}
