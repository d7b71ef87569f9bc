//! Configuration options for rapid encoders, decoders and streams.
//!
//! A single value encoded with [`to_vec`](crate::to_vec) needs no
//! configuration: the wire format has no knobs. [`RapidOptions`] controls the
//! parts around it: how deep a decoder lets containers nest, and how the
//! stream layer frames and bounds a sequence of values.
//!
//! ## Examples
//!
//! ```rust
//! use serde_rapid::{RapidOptions, StreamWriter};
//!
//! let options = RapidOptions::new().with_signature(false).with_limit(2);
//! let mut writer = StreamWriter::with_options(Vec::new(), options);
//! writer.write_all([1, 2, 3]).unwrap();
//! assert_eq!(writer.count(), 2);
//! ```

/// Default limit on container nesting while decoding.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration options for rapid streams and decoders.
///
/// # Examples
///
/// ```rust
/// use serde_rapid::RapidOptions;
///
/// let options = RapidOptions::new();
/// assert!(options.signature);
/// assert_eq!(options.max_depth, 128);
/// assert_eq!(options.limit, None);
///
/// let options = RapidOptions::new()
///     .with_signature(false)
///     .with_max_depth(16)
///     .with_limit(100);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RapidOptions {
    /// Whether streams begin with [`SIGNATURE`](crate::tag::SIGNATURE).
    /// Only the stream layer reads this flag.
    pub signature: bool,
    /// Deepest container nesting a decoder accepts.
    pub max_depth: usize,
    /// Maximum number of values a stream writes or reads.
    pub limit: Option<usize>,
}

impl Default for RapidOptions {
    fn default() -> Self {
        RapidOptions {
            signature: true,
            max_depth: DEFAULT_MAX_DEPTH,
            limit: None,
        }
    }
}

impl RapidOptions {
    /// Creates default options: signed streams, 128 levels, no limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether streams are framed by the signature.
    ///
    /// Both ends of a stream must agree on this setting.
    #[must_use]
    pub fn with_signature(mut self, signature: bool) -> Self {
        self.signature = signature;
        self
    }

    /// Sets the deepest container nesting a decoder accepts.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_rapid::{Decoder, Error, RapidOptions, Value};
    ///
    /// // [[1]]: an array of dynamic values holding an array of ints.
    /// let bytes = serde_rapid::to_vec(&vec![vec![1]]).unwrap();
    ///
    /// let options = RapidOptions::new().with_max_depth(1);
    /// let mut decoder = Decoder::with_options(&bytes[..], options);
    /// assert!(matches!(
    ///     decoder.decode_value(),
    ///     Err(Error::DepthLimitExceeded(1))
    /// ));
    /// ```
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Caps the number of values a stream writes or reads.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
