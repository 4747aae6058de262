//! cursorbuf
//!
//! Cursor-based byte buffers for building and parsing binary payloads.
//!
//! `cursorbuf` pairs a growable [`Buffer`] with a size-classed
//! [`BlockPool`] that recycles its backing memory. On top of the buffer it
//! provides:
//!
//! - big- and little-endian fixed-width accessors, including odd widths
//! - biased prefix varints and a 4-bit tagged index
//! - length-prefixed byte and string payloads
//! - a one-byte trailing checksum and reversible XOR scrambling
//! - `std::io` and (feature `async-io`) `futures-io` adapters
//!
//! The crate intentionally:
//! - does NOT define a schema or message format
//! - does NOT install a global pool
//! - does NOT lock buffers; a buffer has one owner at a time
//!
//! # Example
//!
//! ```
//! use cursorbuf::{BlockPool, BufError, ScrambleSeed, TaggedIndex};
//!
//! fn main() -> Result<(), BufError> {
//!     let pool = BlockPool::new();
//!
//!     let mut buf = pool.buffer(64);
//!     buf.put_tagged_index(TaggedIndex::new(3, 1200))?
//!         .put_varint(-42)?
//!         .put_str_u8_len("hello")?
//!         .append_checksum()?
//!         .scramble(ScrambleSeed::Primary);
//!
//!     buf.flip();
//!     buf.unscramble(ScrambleSeed::Primary);
//!     assert!(buf.strip_checksum());
//!     assert_eq!(buf.get_tagged_index()?, TaggedIndex::new(3, 1200));
//!     assert_eq!(buf.get_varint()?, -42);
//!     assert_eq!(buf.get_str_u8_len()?.as_deref(), Some("hello"));
//!
//!     // the block goes back to the pool
//!     buf.release();
//!     assert_eq!(pool.stats().free_blocks, 1);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod checksum;
mod config;
mod error;
mod pool;
mod varint;

#[cfg(feature = "async-io")]
mod async_io;

pub use buffer::{Buffer, MAX_U16_LEN, MAX_U8_LEN};
pub use checksum::{ScrambleSeed, checksum};
pub use config::PoolConfig;
pub use error::BufError;
pub use pool::{Block, BlockPool, PoolStats};
pub use varint::{
    MAX_LEN as MAX_VARINT_LEN, MAX_TAG, MAX_TAGGED_INDEX, TaggedIndex, encoded_len, zigzag_decode,
    zigzag_encode,
};

#[cfg(feature = "async-io")]
pub use async_io::FillFrom;
