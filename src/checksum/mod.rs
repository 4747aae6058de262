//! One-byte checksums and reversible XOR scrambling.
//!
//! Both transforms work in place on the whole committed range of a buffer,
//! from offset zero. Writers apply them to `[0, position)` right before the
//! buffer is flipped or sent; readers undo them on `[0, limit)` right after
//! the bytes arrive.
//!
//! ```
//! use cursorbuf::{BlockPool, ScrambleSeed};
//!
//! let pool = BlockPool::new();
//! let mut buf = pool.buffer(0);
//! buf.put_slice(b"payload")?.append_checksum()?;
//! buf.scramble(ScrambleSeed::Primary);
//!
//! buf.flip();
//! buf.unscramble(ScrambleSeed::Primary);
//! assert!(buf.strip_checksum());
//! assert_eq!(buf.readable(), b"payload");
//! # Ok::<(), cursorbuf::BufError>(())
//! ```
//!
//! Neither transform is cryptographic. The scramble only hides plain text
//! from casual inspection, and the checksum only catches accidental damage.

use crate::buffer::Buffer;
use crate::error::BufError;

/// Initial accumulator of an XOR scramble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ScrambleSeed {
    /// `0xFF`
    Primary = 0xFF,
    /// `0x5A`
    Alternate = 0x5A,
}

impl ScrambleSeed {
    /// Returns the seed byte.
    pub fn byte(self) -> u8 {
        self as u8
    }
}

/// Computes the one-byte checksum of `bytes`.
///
/// Each byte is XOR-ed into a running value that is inverted whenever the
/// offset is a multiple of 16.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().enumerate().fold(0u8, |crc, (i, &b)| {
        let crc = if i & 0x0F == 0 { !crc } else { crc };
        crc ^ b
    })
}

/// Visits indices `len-1, len-4, ...`, then `len-2, len-5, ...`, then
/// `len-3, len-6, ...`.
fn strided_order(len: usize) -> impl Iterator<Item = usize> {
    (1..=3).flat_map(move |lag| {
        let first = len.checked_sub(lag);
        first.into_iter().flat_map(|first| (0..=first).rev().step_by(3))
    })
}

fn apply(data: &mut [u8], order: impl Iterator<Item = usize>, seed: u8) {
    let mut acc = seed;
    for i in order {
        acc ^= data[i];
        data[i] = acc;
    }
}

fn unapply(data: &mut [u8], order: impl Iterator<Item = usize>, seed: u8) {
    let mut acc = seed;
    for i in order {
        let prev = data[i];
        data[i] ^= acc;
        acc = prev;
    }
}

impl Buffer {
    /// Appends the checksum of `[0, position)` at the position.
    pub fn append_checksum(&mut self) -> Result<&mut Self, BufError> {
        let crc = checksum(self.slice_at(0, self.position())?);
        self.put_u8(crc)
    }

    /// Verifies and removes a trailing checksum.
    ///
    /// Checks the last byte before the limit against the checksum of the
    /// bytes in front of it. On a match the limit shrinks by one and `true`
    /// is returned. Otherwise, or if the buffer is empty, nothing changes
    /// and the result is `false`.
    pub fn strip_checksum(&mut self) -> bool {
        let Some(body) = self.limit().checked_sub(1) else {
            return false;
        };
        let data = self.as_slice();
        if checksum(&data[..body]) != data[body] {
            return false;
        }
        self.set_limit(body).is_ok()
    }

    /// Scrambles `[0, position)` in place, last byte first.
    pub fn scramble(&mut self, seed: ScrambleSeed) -> &mut Self {
        let len = self.position();
        apply(self.data_mut(), (0..len).rev(), seed.byte());
        self
    }

    /// Undoes [`scramble`](Self::scramble) over `[0, limit)`.
    pub fn unscramble(&mut self, seed: ScrambleSeed) -> &mut Self {
        let len = self.limit();
        unapply(self.data_mut(), (0..len).rev(), seed.byte());
        self
    }

    /// Scrambles `[0, position)` in three interleaved passes with stride 3,
    /// seeded with [`ScrambleSeed::Alternate`].
    pub fn scramble_strided(&mut self) -> &mut Self {
        let len = self.position();
        apply(
            self.data_mut(),
            strided_order(len),
            ScrambleSeed::Alternate.byte(),
        );
        self
    }

    /// Undoes [`scramble_strided`](Self::scramble_strided) over `[0, limit)`.
    pub fn unscramble_strided(&mut self) -> &mut Self {
        let len = self.limit();
        unapply(
            self.data_mut(),
            strided_order(len),
            ScrambleSeed::Alternate.byte(),
        );
        self
    }
}
