//! Biased prefix varints.
//!
//! The first byte of an encoded value carries a unary length prefix: `k`
//! leading one-bits followed by a zero select a `k + 1` byte encoding whose
//! remaining `7 * (k + 1)` bits hold `value - BIAS[k]` in big-endian order.
//! A first byte of `0xFF` is followed by a raw big-endian `u64`.
//!
//! Subtracting the bias means the encoder never produces two encodings for
//! one value: every tier starts exactly where the previous one ends. The
//! nine-byte tier is the exception on the decode side. Its payload is added
//! to the bias with wrapping arithmetic, so a payload above
//! `u64::MAX - 0x0102_0408_1020_4080` decodes to a value that also has a
//! shorter encoding. Decoding never fails on such input.
//!
//! | bytes | range                                    |
//! |-------|------------------------------------------|
//! | 1     | `0 ..= 0x7F`                             |
//! | 2     | `0x80 ..= 0x407F`                        |
//! | 3     | `0x4080 ..= 0x20_407F`                   |
//! | 4     | `0x20_4080 ..= 0x1020_407F`              |
//! | ...   | ...                                      |
//! | 9     | `0x0102_0408_1020_4080 ..= u64::MAX`     |
//!
//! ```
//! use cursorbuf::BlockPool;
//!
//! let pool = BlockPool::new();
//! let mut buf = pool.buffer(0);
//! buf.put_uvarint(300)?.put_varint(-2)?;
//! assert_eq!(buf.as_slice(), &[0x80, 0xAC, 0x03]);
//!
//! buf.flip();
//! assert_eq!(buf.get_uvarint()?, 300);
//! assert_eq!(buf.get_varint()?, -2);
//! # Ok::<(), cursorbuf::BufError>(())
//! ```

mod tagged;

use bytes::Bytes;

use crate::buffer::{Buffer, uint_from_be};
use crate::error::BufError;

pub use tagged::{MAX_TAG, MAX_TAGGED_INDEX, TaggedIndex};

/// Maximum number of bytes a single encoded varint occupies.
pub const MAX_LEN: usize = 9;

/// Offset subtracted from a value before it is stored in tier `k`.
pub(crate) const BIAS: [u64; MAX_LEN] = [
    0,
    0x80,
    0x4080,
    0x20_4080,
    0x1020_4080,
    0x08_1020_4080,
    0x0408_1020_4080,
    0x02_0408_1020_4080,
    0x0102_0408_1020_4080,
];

/// Returns the number of bytes `value` encodes to.
pub fn encoded_len(value: u64) -> usize {
    BIAS[1..]
        .iter()
        .position(|&bias| value < bias)
        .map_or(MAX_LEN, |tier| tier + 1)
}

/// Maps signed values onto unsigned ones so that small magnitudes stay small.
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverts [`zigzag_encode`].
pub fn zigzag_decode(value: u64) -> i64 {
    (value >> 1) as i64 ^ -((value & 1) as i64)
}

/// Encodes `value` into a scratch array, returning it with its length.
fn encode(value: u64) -> ([u8; MAX_LEN], usize) {
    let mut out = [0u8; MAX_LEN];
    let len = encoded_len(value);
    if len == MAX_LEN {
        out[0] = 0xFF;
        out[1..].copy_from_slice(&(value - BIAS[MAX_LEN - 1]).to_be_bytes());
    } else {
        let tier = len - 1;
        let payload = (value - BIAS[tier]).to_be_bytes();
        out[..len].copy_from_slice(&payload[8 - len..]);
        out[0] |= !(0xFFu8 >> tier);
    }
    (out, len)
}

/// Encoded length implied by a first byte.
fn len_from_header(first: u8) -> usize {
    first.leading_ones() as usize + 1
}

/// Decodes a complete encoding whose length matches its header.
fn decode(encoded: &[u8]) -> u64 {
    let len = encoded.len();
    if len == MAX_LEN {
        return uint_from_be(&encoded[1..]).wrapping_add(BIAS[MAX_LEN - 1]);
    }
    let payload_bits = 7 * len as u32;
    let payload = uint_from_be(encoded) & ((1u64 << payload_bits) - 1);
    payload + BIAS[len - 1]
}

impl Buffer {
    /// Writes an unsigned varint in its shortest form.
    pub fn put_uvarint(&mut self, value: u64) -> Result<&mut Self, BufError> {
        let (bytes, len) = encode(value);
        self.put_slice(&bytes[..len])
    }

    /// Reads an unsigned varint.
    ///
    /// The whole encoding is bounds-checked before anything is consumed, so
    /// a truncated value leaves the position where it was.
    pub fn get_uvarint(&mut self) -> Result<u64, BufError> {
        let (value, len) = self.peek_uvarint_with_len()?;
        self.get_slice(len)?;
        Ok(value)
    }

    /// Reads an unsigned varint without advancing.
    pub fn peek_uvarint(&self) -> Result<u64, BufError> {
        self.peek_uvarint_with_len().map(|(value, _)| value)
    }

    /// Writes a signed varint (zigzag, then unsigned).
    pub fn put_varint(&mut self, value: i64) -> Result<&mut Self, BufError> {
        self.put_uvarint(zigzag_encode(value))
    }

    /// Reads a signed varint.
    pub fn get_varint(&mut self) -> Result<i64, BufError> {
        self.get_uvarint().map(zigzag_decode)
    }

    /// Copies out the encoded bytes of the next varint without decoding them.
    pub fn get_uvarint_raw(&mut self) -> Result<Bytes, BufError> {
        let len = len_from_header(self.peek_u8()?);
        Ok(Bytes::copy_from_slice(self.get_slice(len)?))
    }

    fn peek_uvarint_with_len(&self) -> Result<(u64, usize), BufError> {
        let len = len_from_header(self.peek_u8()?);
        Ok((decode(self.peek_slice(len)?), len))
    }

    /// Reads a varint length header without consuming it, returning the
    /// payload length and the header size.
    fn peek_var_len(&self) -> Result<(usize, usize), BufError> {
        let (len, header) = self.peek_uvarint_with_len()?;
        let len = usize::try_from(len).map_err(|_| BufError::Underflow {
            offset: self.position() + header,
            needed: usize::MAX,
            limit: self.limit(),
        })?;
        Ok((len, header))
    }

    /// Writes a varint length followed by `bytes`.
    pub fn put_var_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self, BufError> {
        self.put_uvarint(bytes.len() as u64)?.put_slice(bytes)
    }

    /// Reads a varint length and that many bytes. A zero length yields `None`.
    pub fn get_var_bytes(&mut self) -> Result<Option<Bytes>, BufError> {
        let (len, header) = self.peek_var_len()?;
        self.prefixed(header, len, |buf| buf.get_bytes(len))
    }

    /// Writes a varint length followed by the UTF-8 bytes of `text`.
    pub fn put_var_str(&mut self, text: &str) -> Result<&mut Self, BufError> {
        self.put_var_bytes(text.as_bytes())
    }

    /// Reads a varint-length UTF-8 string. A zero length yields `None`.
    pub fn get_var_str(&mut self) -> Result<Option<String>, BufError> {
        let (len, header) = self.peek_var_len()?;
        self.prefixed(header, len, |buf| buf.get_str(len))
    }

    /// Writes `text` followed by a NUL byte, prefixed by the varint length of
    /// both.
    pub fn put_var_cstr(&mut self, text: &str) -> Result<&mut Self, BufError> {
        let len = text.len() + 1;
        self.put_uvarint(len as u64)?
            .put_slice(text.as_bytes())?
            .put_u8(0)
    }

    /// Reads a string written by [`put_var_cstr`](Self::put_var_cstr).
    ///
    /// One trailing NUL is stripped if present. A zero length yields `None`;
    /// an empty string written with its terminator reads back as `Some("")`.
    pub fn get_var_cstr(&mut self) -> Result<Option<String>, BufError> {
        let (len, header) = self.peek_var_len()?;
        if len == 0 {
            self.get_slice(header)?;
            return Ok(None);
        }
        self.prefixed(header, len, |buf| {
            let raw = buf.peek_slice(len)?;
            let text = raw.strip_suffix(&[0]).unwrap_or(raw);
            let text = std::str::from_utf8(text)?.to_owned();
            buf.get_slice(len)?;
            Ok(Some(text))
        })
    }
}
