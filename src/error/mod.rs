//! Error types for cursorbuf.

use thiserror::Error;

/// Errors that can occur while reading, writing, or resizing a buffer.
///
/// Every failure is scoped to the operation that raised it. Unless an
/// operation documents otherwise, a failure leaves the buffer's cursors and
/// contents unchanged.
#[derive(Debug, Error)]
pub enum BufError {
    /// A read needed more bytes than remain before the limit.
    #[error("buffer underflow: need {needed} bytes at offset {offset}, limit is {limit}")]
    Underflow {
        /// Offset the read started at.
        offset: usize,
        /// Number of bytes the read needed.
        needed: usize,
        /// The buffer's limit at the time of the read.
        limit: usize,
    },

    /// An explicit cursor setter was given a position past the limit.
    #[error("position {position} is larger than limit {limit}")]
    PositionOutOfBounds {
        /// The rejected position.
        position: usize,
        /// The buffer's limit.
        limit: usize,
    },

    /// An offset plus a length overflowed `usize`.
    #[error("offset {offset} + length {len} overflows")]
    IndexOverflow {
        /// Starting offset.
        offset: usize,
        /// Requested length.
        len: usize,
    },

    /// The buffer's capacity is locked and a resize was requested.
    #[error("capacity is fixed at {capacity} bytes, cannot change to {requested}")]
    FixedCapacity {
        /// Current (locked) capacity.
        capacity: usize,
        /// Capacity that was requested.
        requested: usize,
    },

    /// A generic integer accessor was given a width outside `1..=8`.
    #[error("integer width must be 1..=8 bytes, got {width}")]
    InvalidWidth {
        /// The rejected width.
        width: usize,
    },

    /// A block of the requested size could not be allocated.
    #[error("cannot allocate a block of {requested} bytes")]
    AllocationFailed {
        /// Size class that was requested.
        requested: usize,
    },

    /// A length-prefixed payload does not fit its prefix.
    #[error("payload of {len} bytes exceeds the {max} byte limit of its length prefix")]
    TooLarge {
        /// Payload length.
        len: usize,
        /// Largest length the prefix can represent.
        max: usize,
    },

    /// A tagged-index tag or index is outside the encodable range.
    #[error("value {value} is out of range (max {max})")]
    ValueOutOfRange {
        /// The rejected value.
        value: u64,
        /// Largest encodable value.
        max: u64,
    },

    /// A tagged-index header byte uses the reserved `1111` length pattern.
    #[error("malformed tagged index header: {header:#04x}")]
    MalformedTaggedIndex {
        /// The offending header byte.
        header: u8,
    },

    /// A string payload was not valid UTF-8.
    #[error("invalid utf-8 in string payload: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// An I/O error occurred in one of the reader/writer adapters.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid pool configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}
