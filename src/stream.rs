//! Sequences of rapid values.
//!
//! A stream is a run of encoded values written back to back, optionally
//! preceded by [`SIGNATURE`](crate::tag::SIGNATURE). Values need no separator
//! because every value is self-delimiting.
//!
//! ```rust
//! use serde_rapid::{rapid, StreamReader, StreamWriter};
//!
//! let mut writer = StreamWriter::new(Vec::new());
//! writer.write_value(&rapid!({ "id": 1 })).unwrap();
//! writer.write(&vec!["a", "b"]).unwrap();
//! let bytes = writer.into_inner();
//! assert!(bytes.starts_with(b"RAPID"));
//!
//! let values: Vec<_> = StreamReader::new(&bytes[..])
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(values, vec![rapid!({ "id": 1 }), rapid!(["a", "b"])]);
//! ```

use crate::tag::SIGNATURE;
use crate::encode::check_value;
use crate::{to_value, Decoder, Encoder, Error, RapidOptions, Result, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Writes a stream of values to an [`io::Write`] sink.
pub struct StreamWriter<W> {
    encoder: Encoder<W>,
    options: RapidOptions,
    count: usize,
    started: bool,
}

impl<W: io::Write> StreamWriter<W> {
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, RapidOptions::default())
    }

    pub fn with_options(writer: W, options: RapidOptions) -> Self {
        StreamWriter {
            encoder: Encoder::new(writer),
            options,
            count: 0,
            started: false,
        }
    }

    /// Writes one value. Returns `false` without writing anything once the
    /// configured limit has been reached.
    ///
    /// # Errors
    ///
    /// As [`Encoder::encode`].
    pub fn write_value(&mut self, value: &Value) -> Result<bool> {
        if self.limit_reached() {
            return Ok(false);
        }
        check_value(value)?;
        self.begin()?;
        self.encoder.encode(value)?;
        self.count += 1;
        Ok(true)
    }

    /// Writes any `T: Serialize` as the next value. Returns `false` once the
    /// limit has been reached. A value that cannot be encoded leaves the sink
    /// untouched when it would have been the first one, signature included.
    ///
    /// # Errors
    ///
    /// As [`Encoder::serialize`].
    pub fn write<T>(&mut self, value: &T) -> Result<bool>
    where
        T: ?Sized + Serialize,
    {
        if self.limit_reached() {
            return Ok(false);
        }
        if self.signature_pending() {
            // The first value is checked in full before the signature goes out.
            return self.write_value(&to_value(value)?);
        }
        self.encoder.serialize(value)?;
        self.count += 1;
        Ok(true)
    }

    /// Writes values until `values` runs out or the limit is reached, and
    /// returns how many were written by this call.
    ///
    /// # Errors
    ///
    /// Stops at the first value that fails to encode.
    pub fn write_all<I>(&mut self, values: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: Serialize,
    {
        let mut written = 0;
        for (i, value) in values.into_iter().enumerate() {
            match self.write(&value) {
                Ok(true) => written += 1,
                Ok(false) => break,
                Err(e) => return Err(e.within(|| format!("stream value {i}"))),
            }
        }
        Ok(written)
    }

    /// Values written so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Bytes written so far, signature included.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.encoder.bytes_written()
    }

    /// # Errors
    ///
    /// Returns [`Error::Io`] if the sink fails to flush.
    pub fn flush(&mut self) -> Result<()> {
        self.encoder.flush()
    }

    pub fn get_ref(&self) -> &W {
        self.encoder.get_ref()
    }

    pub fn into_inner(self) -> W {
        self.encoder.into_inner()
    }

    fn limit_reached(&self) -> bool {
        let reached = self.options.limit.is_some_and(|limit| self.count >= limit);
        if reached {
            tracing::debug!(count = self.count, "stream limit reached, value dropped");
        }
        reached
    }

    /// Writes the signature ahead of the first value. A failed attempt is
    /// retried by the next write.
    fn begin(&mut self) -> Result<()> {
        if self.signature_pending() {
            self.encoder.put(&SIGNATURE, "signature")?;
            tracing::debug!("wrote stream signature");
        }
        self.started = true;
        Ok(())
    }

    fn signature_pending(&self) -> bool {
        !self.started && self.options.signature
    }
}

/// Reads a stream of values from an [`io::Read`] source.
///
/// Iteration ends cleanly when the source runs dry between two values or the
/// configured limit is reached. Any other failure is yielded once, after
/// which the reader is exhausted: a malformed value leaves no reliable
/// boundary to resume from.
///
/// ```rust
/// use serde_rapid::{Error, StreamReader};
///
/// let mut reader = StreamReader::new(&b"RAPIX\x02\x01"[..]);
/// assert!(matches!(reader.next(), Some(Err(Error::InvalidSignature(_)))));
/// assert!(reader.next().is_none());
/// ```
pub struct StreamReader<R> {
    decoder: Decoder<R>,
    signature: bool,
    limit: Option<usize>,
    count: usize,
    checked: bool,
    done: bool,
}

impl<R: io::Read> StreamReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, RapidOptions::default())
    }

    pub fn with_options(reader: R, options: RapidOptions) -> Self {
        StreamReader {
            signature: options.signature,
            limit: options.limit,
            decoder: Decoder::with_options(reader, options),
            count: 0,
            checked: false,
            done: false,
        }
    }

    /// Reads the next value into `T`.
    ///
    /// ```rust
    /// use serde_rapid::{StreamReader, StreamWriter};
    ///
    /// let mut writer = StreamWriter::new(Vec::new());
    /// writer.write_all([(1, "one"), (2, "two")]).unwrap();
    /// let bytes = writer.into_inner();
    ///
    /// let mut reader = StreamReader::new(&bytes[..]);
    /// let first: (u8, String) = reader.next_as().unwrap().unwrap();
    /// assert_eq!(first, (1, "one".to_string()));
    /// assert_eq!(reader.count(), 1);
    /// ```
    pub fn next_as<T>(&mut self) -> Option<Result<T>>
    where
        T: DeserializeOwned,
    {
        self.read_next(|decoder| decoder.decode())
    }

    /// Values read so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Bytes consumed so far, signature included.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.decoder.offset()
    }

    pub fn get_ref(&self) -> &R {
        self.decoder.get_ref()
    }

    pub fn into_inner(self) -> R {
        self.decoder.into_inner()
    }

    /// Consumes the signature once. `false` means the source was empty.
    fn check_signature(&mut self) -> Result<bool> {
        if self.checked || !self.signature {
            self.checked = true;
            return Ok(true);
        }
        self.checked = true;
        let mut found = [0u8; 5];
        match self.decoder.read_raw(&mut found, "signature") {
            Ok(()) => {}
            Err(e) if e.is_eof() => return Ok(false),
            Err(e) => return Err(e),
        }
        if found != SIGNATURE {
            return Err(Error::InvalidSignature(found));
        }
        tracing::debug!("verified stream signature");
        Ok(true)
    }

    fn read_next<T, F>(&mut self, read: F) -> Option<Result<T>>
    where
        F: FnOnce(&mut Decoder<R>) -> Result<T>,
    {
        if self.done {
            return None;
        }
        if self.limit.is_some_and(|limit| self.count >= limit) {
            tracing::debug!(count = self.count, "stream limit reached");
            self.done = true;
            return None;
        }
        match self.check_signature() {
            Ok(true) => {}
            Ok(false) => {
                self.done = true;
                return None;
            }
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        }
        match read(&mut self.decoder) {
            Ok(value) => {
                self.count += 1;
                Some(Ok(value))
            }
            Err(e) if e.is_eof() => {
                tracing::debug!(count = self.count, "stream complete");
                self.done = true;
                None
            }
            Err(e) => {
                tracing::debug!(count = self.count, error = %e, "stream aborted");
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: io::Read> Iterator for StreamReader<R> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Result<Value>> {
        self.read_next(|decoder| decoder.decode_value())
    }
}

/// Reads every value in a stream.
///
/// # Errors
///
/// Returns the first error other than a clean end of input.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn read_all<R: io::Read>(reader: R, options: RapidOptions) -> Result<Vec<Value>> {
    StreamReader::with_options(reader, options).collect()
}

/// Writes `values` as a stream, flushes the sink and returns how many values
/// were written.
///
/// # Examples
///
/// ```rust
/// use serde_rapid::{read_all, write_all, RapidOptions, Value};
///
/// let mut bytes = Vec::new();
/// let options = RapidOptions::new().with_limit(2);
/// assert_eq!(write_all(&mut bytes, ["a", "b", "c"], options.clone()).unwrap(), 2);
///
/// let values = read_all(&bytes[..], options).unwrap();
/// assert_eq!(values, vec![Value::from("a"), Value::from("b")]);
/// ```
///
/// # Errors
///
/// Stops at the first value that fails to encode or the first sink failure.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn write_all<W, I>(writer: W, values: I, options: RapidOptions) -> Result<usize>
where
    W: io::Write,
    I: IntoIterator,
    I::Item: Serialize,
{
    let mut stream = StreamWriter::with_options(writer, options);
    let written = stream.write_all(values)?;
    stream.flush()?;
    Ok(written)
}
