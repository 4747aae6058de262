//! A 4-bit tag packed with a small index.
//!
//! The tag occupies the high nibble of the first byte. The low nibble starts
//! with the same unary length prefix as a plain varint (`0xxx`, `10xx`,
//! `110x`, `1110`), giving encodings of one to four bytes:
//!
//! | bytes | index range                 |
//! |-------|-----------------------------|
//! | 1     | `0 ..= 0x07`                |
//! | 2     | `0x08 ..= 0x407`            |
//! | 3     | `0x408 ..= 0x2_0407`        |
//! | 4     | `0x2_0408 ..= 0x102_0407`   |

use crate::buffer::Buffer;
use crate::error::BufError;

/// Largest tag that fits in the header nibble.
pub const MAX_TAG: u8 = 0x0F;

/// Largest index the four-byte tier can hold.
pub const MAX_TAGGED_INDEX: u32 = 0x00FF_FFFF + 0x02_0408;

const TAGGED_BIAS: [u32; 4] = [0, 0x08, 0x408, 0x2_0408];

/// A type tag and index decoded from one tagged varint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TaggedIndex {
    /// The tag, `0..=15`.
    pub tag: u8,
    /// The index, `0..=MAX_TAGGED_INDEX`.
    pub index: u32,
}

impl TaggedIndex {
    /// Creates a tagged index.
    pub fn new(tag: u8, index: u32) -> Self {
        Self { tag, index }
    }

    /// Number of bytes this value encodes to, or `None` if it is out of range.
    pub fn encoded_len(&self) -> Option<usize> {
        if self.tag > MAX_TAG || self.index > MAX_TAGGED_INDEX {
            return None;
        }
        let len = TAGGED_BIAS[1..]
            .iter()
            .position(|&bias| self.index < bias)
            .map_or(TAGGED_BIAS.len(), |tier| tier + 1);
        Some(len)
    }
}

impl Buffer {
    /// Writes a tag and index in the shortest tier that holds the index.
    ///
    /// # Errors
    ///
    /// [`BufError::ValueOutOfRange`] if the tag is above 15 or the index
    /// above [`MAX_TAGGED_INDEX`]; nothing is written.
    pub fn put_tagged_index(&mut self, value: TaggedIndex) -> Result<&mut Self, BufError> {
        if value.tag > MAX_TAG {
            return Err(BufError::ValueOutOfRange {
                value: value.tag.into(),
                max: MAX_TAG.into(),
            });
        }
        let Some(len) = value.encoded_len() else {
            return Err(BufError::ValueOutOfRange {
                value: value.index.into(),
                max: MAX_TAGGED_INDEX.into(),
            });
        };

        let tier = len - 1;
        let shift = 8 * tier;
        let header = (u64::from(value.tag) << 4) | u64::from(!(0x0Fu8 >> tier) & 0x0F);
        let payload = u64::from(value.index - TAGGED_BIAS[tier]);
        self.put_uint((header << shift) | payload, len)
    }

    /// Reads a tag and index.
    ///
    /// # Errors
    ///
    /// [`BufError::MalformedTaggedIndex`] if the low nibble of the header is
    /// `1111`, and [`BufError::Underflow`] if the encoding is truncated. The
    /// position is unchanged on error.
    pub fn get_tagged_index(&mut self) -> Result<TaggedIndex, BufError> {
        let header = self.peek_u8()?;
        let tier = (header << 4).leading_ones() as usize;
        if tier >= TAGGED_BIAS.len() {
            return Err(BufError::MalformedTaggedIndex { header });
        }

        let len = tier + 1;
        let raw = self.peek_uint(len)?;
        self.get_slice(len)?;

        let payload_bits = 3 + 7 * tier as u32;
        let payload = (raw & ((1u64 << payload_bits) - 1)) as u32;
        Ok(TaggedIndex {
            tag: header >> 4,
            index: payload + TAGGED_BIAS[tier],
        })
    }
}
