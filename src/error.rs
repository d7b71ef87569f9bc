//! Error types for rapid encoding and decoding.
//!
//! Every failure is reported through the single [`Error`] enum. Decode errors
//! carry the byte offset at which the problem was detected, and I/O failures
//! carry a description of what was being written or read when the sink or
//! source gave up.
//!
//! ## End of input
//!
//! Running out of bytes exactly where a new value would start is not a
//! corruption: it is reported as [`Error::EndOfInput`] so that callers reading
//! a sequence of values can stop cleanly. Running out of bytes anywhere else is
//! [`Error::TruncatedPayload`].
//!
//! ```rust
//! use serde_rapid::{from_slice, Error, Value};
//!
//! let err = from_slice::<Value>(&[]).unwrap_err();
//! assert!(err.is_eof());
//!
//! // A wide-int tag followed by only three of its eight payload bytes.
//! let err = from_slice::<Value>(&[0x04, 1, 2, 3]).unwrap_err();
//! assert!(matches!(err, Error::TruncatedPayload { .. }));
//! ```

use crate::tag;
use std::fmt;
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Represents all possible errors that can occur while encoding or decoding.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The value has no representation in the literal type set.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// A string payload contains a NUL byte, which is reserved as the terminator.
    #[error("invalid string {0:?}: strings must not contain a NUL byte")]
    InvalidString(String),

    /// A tag read from the wire does not satisfy the destination.
    #[error(
        "unexpected type at byte {offset}: found {}, expected {}",
        tag_name(.found),
        tag_name(.expected)
    )]
    UnexpectedType { offset: u64, found: u8, expected: u8 },

    /// The input ended cleanly at a value boundary.
    #[error("end of input")]
    EndOfInput,

    /// The input ended in the middle of a value.
    #[error("truncated payload at byte {offset}: input ended while reading {expected}")]
    TruncatedPayload { offset: u64, expected: String },

    /// The sink or source reported an error.
    #[error("I/O error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: Arc<io::Error>,
    },

    /// A string payload is not valid UTF-8.
    #[error("invalid UTF-8 in string starting at byte {offset}")]
    InvalidUtf8 { offset: u64 },

    /// A container declared a negative element count.
    #[error("invalid length {len} at byte {offset}")]
    InvalidLength { offset: u64, len: i64 },

    /// An integer does not fit the 64-bit signed wire range.
    #[error("integer out of range: {0}")]
    IntegerOverflow(String),

    /// A map on the wire repeats a key.
    #[error("duplicate map key {0:?}")]
    DuplicateKey(String),

    /// Containers are nested deeper than the configured limit.
    #[error("nesting exceeds the limit of {0} levels")]
    DepthLimitExceeded(usize),

    /// A stream does not begin with the expected signature.
    #[error("invalid stream signature {0:?}")]
    InvalidSignature([u8; 5]),

    /// Custom error raised through serde.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Returns `true` when the input ended cleanly at a value boundary.
    ///
    /// ```rust
    /// use serde_rapid::Error;
    ///
    /// assert!(Error::EndOfInput.is_eof());
    /// assert!(!Error::DuplicateKey("a".into()).is_eof());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Error::EndOfInput)
    }

    pub fn unsupported_type(what: &str) -> Self {
        Error::UnsupportedType(what.to_string())
    }

    pub fn invalid_string(s: &str) -> Self {
        Error::InvalidString(s.to_string())
    }

    pub fn unexpected_type(offset: u64, found: u8, expected: u8) -> Self {
        Error::UnexpectedType {
            offset,
            found,
            expected,
        }
    }

    pub fn truncated(offset: u64, expected: &str) -> Self {
        Error::TruncatedPayload {
            offset,
            expected: expected.to_string(),
        }
    }

    /// Wraps an I/O error with a description of the operation that failed.
    pub fn io(context: &str, source: io::Error) -> Self {
        Error::Io {
            context: context.to_string(),
            source: Arc::new(source),
        }
    }

    /// Creates a custom error with a display message.
    ///
    /// ```rust
    /// use serde_rapid::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert_eq!(err.to_string(), "something went wrong");
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Appends positional context to an I/O error; other errors pass through.
    ///
    /// The context is only rendered when there is an I/O error to attach it to.
    ///
    /// ```rust
    /// use serde_rapid::Error;
    /// use std::io;
    ///
    /// let err = Error::io("writing string payload", io::ErrorKind::WriteZero.into())
    ///     .within(|| "element 2".to_string())
    ///     .within(|| "value for key \"a\"".to_string());
    /// assert!(err
    ///     .to_string()
    ///     .starts_with("I/O error while writing string payload in element 2 in value for key \"a\""));
    /// ```
    #[must_use]
    pub fn within<F>(self, position: F) -> Self
    where
        F: FnOnce() -> String,
    {
        match self {
            Error::Io { context, source } => Error::Io {
                context: format!("{context} in {}", position()),
                source,
            },
            other => other,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

fn tag_name(code: &u8) -> String {
    tag::describe(*code)
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_type_names_both_tags() {
        let err = Error::unexpected_type(7, tag::INT64, tag::STRING);
        let msg = err.to_string();
        assert!(msg.contains("byte 7"));
        assert!(msg.contains("int64"));
        assert!(msg.contains("string"));
    }

    #[test]
    fn test_within_leaves_other_errors_alone() {
        let err = Error::EndOfInput.within(|| unreachable!());
        assert!(err.is_eof());
    }

    #[test]
    fn test_io_keeps_source() {
        use std::error::Error as _;

        let err = Error::io("writing tag", io::Error::new(io::ErrorKind::Other, "disk full"));
        assert_eq!(err.source().map(|s| s.to_string()), Some("disk full".to_string()));
    }
}
