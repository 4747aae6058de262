//! Fixed-width numeric accessors.
//!
//! Every accessor comes in five forms: relative `get_*` (advances),
//! `peek_*` (does not advance), indexed `get_*_at`, relative `put_*` and
//! indexed `put_*_at`. Unsuffixed names are big-endian; `_le` names are
//! little-endian. The 3, 5, 6 and 7 byte widths (`u24`, `u40`, `u48`, `u56`
//! and their signed twins) pack values into fewer bytes than their natural
//! type: writes keep the low bytes, signed reads sign-extend.

use super::Buffer;
use crate::error::BufError;

/// Decodes up to 8 big-endian bytes into the low bytes of a `u64`.
pub(crate) fn uint_from_be(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0, |acc, &b| (acc << 8) | u64::from(b))
}

/// Decodes up to 8 little-endian bytes into the low bytes of a `u64`.
pub(crate) fn uint_from_le(bytes: &[u8]) -> u64 {
    bytes.iter().rev().fold(0, |acc, &b| (acc << 8) | u64::from(b))
}

/// Sign-extends the low `width` bytes of `value`.
fn sign_extend(value: u64, width: usize) -> i64 {
    let shift = 64 - 8 * width as u32;
    ((value << shift) as i64) >> shift
}

fn check_width(width: usize) -> Result<(), BufError> {
    if (1..=8).contains(&width) {
        Ok(())
    } else {
        Err(BufError::InvalidWidth { width })
    }
}

impl Buffer {
    /// Reads a `width`-byte big-endian unsigned integer.
    ///
    /// # Errors
    ///
    /// [`BufError::InvalidWidth`] if `width` is not in `1..=8`.
    pub fn get_uint(&mut self, width: usize) -> Result<u64, BufError> {
        check_width(width)?;
        Ok(uint_from_be(self.get_slice(width)?))
    }

    /// Reads a `width`-byte little-endian unsigned integer.
    ///
    /// # Errors
    ///
    /// [`BufError::InvalidWidth`] if `width` is not in `1..=8`.
    pub fn get_uint_le(&mut self, width: usize) -> Result<u64, BufError> {
        check_width(width)?;
        Ok(uint_from_le(self.get_slice(width)?))
    }

    /// Reads a `width`-byte big-endian signed integer, sign-extended.
    pub fn get_int(&mut self, width: usize) -> Result<i64, BufError> {
        Ok(sign_extend(self.get_uint(width)?, width))
    }

    /// Reads a `width`-byte little-endian signed integer, sign-extended.
    pub fn get_int_le(&mut self, width: usize) -> Result<i64, BufError> {
        Ok(sign_extend(self.get_uint_le(width)?, width))
    }

    /// Peeks a `width`-byte big-endian unsigned integer.
    pub fn peek_uint(&self, width: usize) -> Result<u64, BufError> {
        check_width(width)?;
        Ok(uint_from_be(self.peek_slice(width)?))
    }

    /// Peeks a `width`-byte little-endian unsigned integer.
    pub fn peek_uint_le(&self, width: usize) -> Result<u64, BufError> {
        check_width(width)?;
        Ok(uint_from_le(self.peek_slice(width)?))
    }

    /// Reads a `width`-byte big-endian unsigned integer at `index`.
    pub fn get_uint_at(&self, index: usize, width: usize) -> Result<u64, BufError> {
        check_width(width)?;
        Ok(uint_from_be(self.slice_at(index, width)?))
    }

    /// Reads a `width`-byte little-endian unsigned integer at `index`.
    pub fn get_uint_le_at(&self, index: usize, width: usize) -> Result<u64, BufError> {
        check_width(width)?;
        Ok(uint_from_le(self.slice_at(index, width)?))
    }

    /// Writes the low `width` bytes of `value`, big-endian.
    ///
    /// # Errors
    ///
    /// [`BufError::InvalidWidth`] if `width` is not in `1..=8`.
    pub fn put_uint(&mut self, value: u64, width: usize) -> Result<&mut Self, BufError> {
        check_width(width)?;
        self.put_slice(&value.to_be_bytes()[8 - width..])
    }

    /// Writes the low `width` bytes of `value`, little-endian.
    pub fn put_uint_le(&mut self, value: u64, width: usize) -> Result<&mut Self, BufError> {
        check_width(width)?;
        self.put_slice(&value.to_le_bytes()[..width])
    }

    /// Writes the low `width` bytes of `value` (twos complement), big-endian.
    pub fn put_int(&mut self, value: i64, width: usize) -> Result<&mut Self, BufError> {
        self.put_uint(value as u64, width)
    }

    /// Writes the low `width` bytes of `value` (twos complement), little-endian.
    pub fn put_int_le(&mut self, value: i64, width: usize) -> Result<&mut Self, BufError> {
        self.put_uint_le(value as u64, width)
    }

    /// Writes the low `width` bytes of `value` at `index`, big-endian.
    pub fn put_uint_at(
        &mut self,
        index: usize,
        value: u64,
        width: usize,
    ) -> Result<&mut Self, BufError> {
        check_width(width)?;
        self.put_slice_at(index, &value.to_be_bytes()[8 - width..])
    }

    /// Writes the low `width` bytes of `value` at `index`, little-endian.
    pub fn put_uint_le_at(
        &mut self,
        index: usize,
        value: u64,
        width: usize,
    ) -> Result<&mut Self, BufError> {
        check_width(width)?;
        self.put_slice_at(index, &value.to_le_bytes()[..width])
    }

    /// Reads one byte as a boolean (non-zero is `true`).
    pub fn get_bool(&mut self) -> Result<bool, BufError> {
        Ok(self.get_u8()? != 0)
    }

    /// Peeks one byte as a boolean.
    pub fn peek_bool(&self) -> Result<bool, BufError> {
        Ok(self.peek_u8()? != 0)
    }

    /// Reads the byte at `index` as a boolean.
    pub fn get_bool_at(&self, index: usize) -> Result<bool, BufError> {
        Ok(self.get_u8_at(index)? != 0)
    }

    /// Writes a boolean as `1` or `0`.
    pub fn put_bool(&mut self, value: bool) -> Result<&mut Self, BufError> {
        self.put_u8(u8::from(value))
    }

    /// Writes a boolean at `index`.
    pub fn put_bool_at(&mut self, index: usize, value: bool) -> Result<&mut Self, BufError> {
        self.put_u8_at(index, u8::from(value))
    }
}

/// Accessors for types with native `from_*_bytes` / `to_*_bytes`.
macro_rules! native_width {
    ($($ty:ident: $get:ident, $peek:ident, $get_at:ident, $put:ident, $put_at:ident, $from:ident, $to:ident, $order:literal;)*) => {
        impl Buffer {
            $(
                #[doc = concat!("Reads a ", $order, " `", stringify!($ty), "` and advances.")]
                pub fn $get(&mut self) -> Result<$ty, BufError> {
                    Ok($ty::$from(self.get_array()?))
                }

                #[doc = concat!("Reads a ", $order, " `", stringify!($ty), "` without advancing.")]
                pub fn $peek(&self) -> Result<$ty, BufError> {
                    Ok($ty::$from(self.peek_array()?))
                }

                #[doc = concat!("Reads a ", $order, " `", stringify!($ty), "` at `index`.")]
                pub fn $get_at(&self, index: usize) -> Result<$ty, BufError> {
                    Ok($ty::$from(self.array_at(index)?))
                }

                #[doc = concat!("Writes a ", $order, " `", stringify!($ty), "` and advances.")]
                pub fn $put(&mut self, value: $ty) -> Result<&mut Self, BufError> {
                    self.put_slice(&value.$to())
                }

                #[doc = concat!("Writes a ", $order, " `", stringify!($ty), "` at `index`.")]
                pub fn $put_at(&mut self, index: usize, value: $ty) -> Result<&mut Self, BufError> {
                    self.put_slice_at(index, &value.$to())
                }
            )*
        }
    };
}

native_width! {
    u8: get_u8, peek_u8, get_u8_at, put_u8, put_u8_at, from_be_bytes, to_be_bytes, "one-byte";
    i8: get_i8, peek_i8, get_i8_at, put_i8, put_i8_at, from_be_bytes, to_be_bytes, "one-byte";
    u16: get_u16, peek_u16, get_u16_at, put_u16, put_u16_at, from_be_bytes, to_be_bytes, "big-endian";
    u16: get_u16_le, peek_u16_le, get_u16_le_at, put_u16_le, put_u16_le_at, from_le_bytes, to_le_bytes, "little-endian";
    i16: get_i16, peek_i16, get_i16_at, put_i16, put_i16_at, from_be_bytes, to_be_bytes, "big-endian";
    i16: get_i16_le, peek_i16_le, get_i16_le_at, put_i16_le, put_i16_le_at, from_le_bytes, to_le_bytes, "little-endian";
    u32: get_u32, peek_u32, get_u32_at, put_u32, put_u32_at, from_be_bytes, to_be_bytes, "big-endian";
    u32: get_u32_le, peek_u32_le, get_u32_le_at, put_u32_le, put_u32_le_at, from_le_bytes, to_le_bytes, "little-endian";
    i32: get_i32, peek_i32, get_i32_at, put_i32, put_i32_at, from_be_bytes, to_be_bytes, "big-endian";
    i32: get_i32_le, peek_i32_le, get_i32_le_at, put_i32_le, put_i32_le_at, from_le_bytes, to_le_bytes, "little-endian";
    u64: get_u64, peek_u64, get_u64_at, put_u64, put_u64_at, from_be_bytes, to_be_bytes, "big-endian";
    u64: get_u64_le, peek_u64_le, get_u64_le_at, put_u64_le, put_u64_le_at, from_le_bytes, to_le_bytes, "little-endian";
    i64: get_i64, peek_i64, get_i64_at, put_i64, put_i64_at, from_be_bytes, to_be_bytes, "big-endian";
    i64: get_i64_le, peek_i64_le, get_i64_le_at, put_i64_le, put_i64_le_at, from_le_bytes, to_le_bytes, "little-endian";
    f32: get_f32, peek_f32, get_f32_at, put_f32, put_f32_at, from_be_bytes, to_be_bytes, "big-endian";
    f32: get_f32_le, peek_f32_le, get_f32_le_at, put_f32_le, put_f32_le_at, from_le_bytes, to_le_bytes, "little-endian";
    f64: get_f64, peek_f64, get_f64_at, put_f64, put_f64_at, from_be_bytes, to_be_bytes, "big-endian";
    f64: get_f64_le, peek_f64_le, get_f64_le_at, put_f64_le, put_f64_le_at, from_le_bytes, to_le_bytes, "little-endian";
}

/// Accessors for the packed 3, 5, 6 and 7 byte widths.
macro_rules! packed_width {
    ($($width:literal: $get:ident, $peek:ident, $get_at:ident, $put:ident, $put_at:ident, $iget:ident, $iput:ident, $read:ident, $write:ident, $write_at:ident, $order:literal;)*) => {
        impl Buffer {
            $(
                #[doc = concat!("Reads a ", stringify!($width), "-byte ", $order, " unsigned integer and advances.")]
                pub fn $get(&mut self) -> Result<u64, BufError> {
                    Ok($read(self.get_slice($width)?))
                }

                #[doc = concat!("Reads a ", stringify!($width), "-byte ", $order, " unsigned integer without advancing.")]
                pub fn $peek(&self) -> Result<u64, BufError> {
                    Ok($read(self.peek_slice($width)?))
                }

                #[doc = concat!("Reads a ", stringify!($width), "-byte ", $order, " unsigned integer at `index`.")]
                pub fn $get_at(&self, index: usize) -> Result<u64, BufError> {
                    Ok($read(self.slice_at(index, $width)?))
                }

                #[doc = concat!("Writes the low ", stringify!($width), " bytes of `value`, ", $order, ".")]
                pub fn $put(&mut self, value: u64) -> Result<&mut Self, BufError> {
                    self.$write(value, $width)
                }

                #[doc = concat!("Writes the low ", stringify!($width), " bytes of `value` at `index`, ", $order, ".")]
                pub fn $put_at(&mut self, index: usize, value: u64) -> Result<&mut Self, BufError> {
                    self.$write_at(index, value, $width)
                }

                #[doc = concat!("Reads a ", stringify!($width), "-byte ", $order, " signed integer, sign-extended.")]
                pub fn $iget(&mut self) -> Result<i64, BufError> {
                    Ok(sign_extend($read(self.get_slice($width)?), $width))
                }

                #[doc = concat!("Writes the low ", stringify!($width), " bytes of a signed `value`, ", $order, ".")]
                pub fn $iput(&mut self, value: i64) -> Result<&mut Self, BufError> {
                    self.$write(value as u64, $width)
                }
            )*
        }
    };
}

packed_width! {
    3: get_u24, peek_u24, get_u24_at, put_u24, put_u24_at, get_i24, put_i24, uint_from_be, put_uint, put_uint_at, "big-endian";
    3: get_u24_le, peek_u24_le, get_u24_le_at, put_u24_le, put_u24_le_at, get_i24_le, put_i24_le, uint_from_le, put_uint_le, put_uint_le_at, "little-endian";
    5: get_u40, peek_u40, get_u40_at, put_u40, put_u40_at, get_i40, put_i40, uint_from_be, put_uint, put_uint_at, "big-endian";
    5: get_u40_le, peek_u40_le, get_u40_le_at, put_u40_le, put_u40_le_at, get_i40_le, put_i40_le, uint_from_le, put_uint_le, put_uint_le_at, "little-endian";
    6: get_u48, peek_u48, get_u48_at, put_u48, put_u48_at, get_i48, put_i48, uint_from_be, put_uint, put_uint_at, "big-endian";
    6: get_u48_le, peek_u48_le, get_u48_le_at, put_u48_le, put_u48_le_at, get_i48_le, put_i48_le, uint_from_le, put_uint_le, put_uint_le_at, "little-endian";
    7: get_u56, peek_u56, get_u56_at, put_u56, put_u56_at, get_i56, put_i56, uint_from_be, put_uint, put_uint_at, "big-endian";
    7: get_u56_le, peek_u56_le, get_u56_le_at, put_u56_le, put_u56_le_at, get_i56_le, put_i56_le, uint_from_le, put_uint_le, put_uint_le_at, "little-endian";
}

#[cfg(test)]
mod tests {
    use crate::{BlockPool, BufError};

    #[test]
    fn test_big_and_little_endian_bytes() {
        let pool = BlockPool::new();
        let mut buf = pool.buffer(0);
        buf.put_u32(0x0102_0304).unwrap();
        buf.put_u32_le(0x0102_0304).unwrap();
        buf.put_u16(0xABCD).unwrap();
        buf.put_u16_le(0xABCD).unwrap();
        assert_eq!(
            buf.as_slice(),
            &[1, 2, 3, 4, 4, 3, 2, 1, 0xAB, 0xCD, 0xCD, 0xAB]
        );
    }

    #[test]
    fn test_packed_widths_truncate() {
        let pool = BlockPool::new();
        let mut buf = pool.buffer(0);
        buf.put_u24(0xFF12_3456).unwrap();
        buf.put_u40_le(0x01_0203_0405).unwrap();
        assert_eq!(buf.as_slice(), &[0x12, 0x34, 0x56, 5, 4, 3, 2, 1]);

        buf.flip();
        assert_eq!(buf.get_u24().unwrap(), 0x12_3456);
        assert_eq!(buf.get_u40_le().unwrap(), 0x01_0203_0405);
    }

    #[test]
    fn test_signed_packed_widths_sign_extend() {
        let pool = BlockPool::new();
        let mut buf = pool.buffer(0);
        buf.put_i24(-2).unwrap();
        buf.put_i56_le(-1_000_000_000_000).unwrap();
        buf.put_i48(0x7FFF_FFFF_FFFF).unwrap();
        assert_eq!(&buf.as_slice()[..3], &[0xFF, 0xFF, 0xFE]);

        buf.flip();
        assert_eq!(buf.get_i24().unwrap(), -2);
        assert_eq!(buf.get_i56_le().unwrap(), -1_000_000_000_000);
        assert_eq!(buf.get_i48().unwrap(), 0x7FFF_FFFF_FFFF);
    }

    #[test]
    fn test_generic_width_matches_typed() {
        let pool = BlockPool::new();
        let mut buf = pool.buffer(0);
        buf.put_uint(0xAABB_CCDD_EEFF, 6).unwrap();
        buf.flip();
        assert_eq!(buf.peek_u48().unwrap(), 0xAABB_CCDD_EEFF);
        assert_eq!(buf.get_uint(6).unwrap(), 0xAABB_CCDD_EEFF);
    }

    #[test]
    fn test_floats_use_ieee_bits() {
        let pool = BlockPool::new();
        let mut buf = pool.buffer(0);
        buf.put_f32(1.5).unwrap();
        buf.put_f64_le(-0.25).unwrap();
        assert_eq!(&buf.as_slice()[..4], &1.5f32.to_bits().to_be_bytes());

        buf.flip();
        assert_eq!(buf.get_f32().unwrap(), 1.5);
        assert_eq!(buf.get_f64_le().unwrap(), -0.25);
    }

    #[test]
    fn test_indexed_accessors_keep_position() {
        let pool = BlockPool::new();
        let mut buf = pool.buffer(0);
        buf.put_u64(0).unwrap();
        buf.put_u16_at(2, 0xBEEF).unwrap();
        buf.put_bool_at(7, true).unwrap();
        assert_eq!(buf.position(), 8);
        assert_eq!(buf.get_u16_at(2).unwrap(), 0xBEEF);
        assert!(buf.get_bool_at(7).unwrap());
        assert!(buf.get_u32_at(6).is_err());
    }

    #[test]
    fn test_peek_then_get() {
        let pool = BlockPool::new();
        let mut buf = pool.buffer(0);
        buf.put_i16_le(-300).unwrap().put_bool(false).unwrap();
        buf.flip();
        assert_eq!(buf.peek_i16_le().unwrap(), -300);
        assert_eq!(buf.get_i16_le().unwrap(), -300);
        assert!(!buf.peek_bool().unwrap());
        assert!(!buf.get_bool().unwrap());
        assert!(buf.get_u8().is_err());
    }

    #[test]
    fn test_bad_width_is_an_error() {
        let pool = BlockPool::new();
        let mut buf = pool.buffer(0);
        buf.put_u8(7).unwrap();
        assert!(matches!(
            buf.put_uint(1, 0),
            Err(BufError::InvalidWidth { width: 0 })
        ));
        assert!(matches!(
            buf.put_uint_le_at(0, 1, 9),
            Err(BufError::InvalidWidth { width: 9 })
        ));
        assert_eq!(buf.as_slice(), &[7]);

        buf.flip();
        assert!(matches!(
            buf.get_int(12),
            Err(BufError::InvalidWidth { width: 12 })
        ));
        assert_eq!(buf.position(), 0);
    }
}
