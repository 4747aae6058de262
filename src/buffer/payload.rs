//! Byte and string payloads with fixed-size length prefixes.
//!
//! A zero length reads back as `None`: an empty payload and an absent one
//! share the same encoding, so callers that need to tell them apart must
//! carry that information elsewhere.

use bytes::Bytes;

use super::Buffer;
use crate::error::BufError;

/// Largest payload a one-byte length prefix can describe.
pub const MAX_U8_LEN: usize = u8::MAX as usize;

/// Largest payload a two-byte length prefix can describe.
pub const MAX_U16_LEN: usize = u16::MAX as usize;

impl Buffer {
    /// Writes raw bytes at the position.
    pub fn put_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self, BufError> {
        self.put_slice(bytes)
    }

    /// Reads exactly `len` bytes. `len == 0` yields `None`.
    pub fn get_bytes(&mut self, len: usize) -> Result<Option<Bytes>, BufError> {
        if len == 0 {
            return Ok(None);
        }
        Ok(Some(Bytes::copy_from_slice(self.get_slice(len)?)))
    }

    /// Reads everything up to the limit. An exhausted buffer yields `None`.
    pub fn get_rest(&mut self) -> Result<Option<Bytes>, BufError> {
        self.get_bytes(self.remaining())
    }

    /// Reads everything up to the limit as UTF-8.
    pub fn get_rest_str(&mut self) -> Result<Option<String>, BufError> {
        self.get_str(self.remaining())
    }

    /// Reads exactly `len` bytes as UTF-8. `len == 0` yields `None`.
    ///
    /// The position only moves if the bytes are valid UTF-8.
    pub fn get_str(&mut self, len: usize) -> Result<Option<String>, BufError> {
        if len == 0 {
            return Ok(None);
        }
        let text = std::str::from_utf8(self.peek_slice(len)?)?.to_owned();
        self.position += len;
        Ok(Some(text))
    }

    /// Writes a one-byte length followed by `bytes`.
    ///
    /// # Errors
    ///
    /// [`BufError::TooLarge`] if `bytes` is longer than 255; nothing is written.
    pub fn put_bytes_u8_len(&mut self, bytes: &[u8]) -> Result<&mut Self, BufError> {
        if bytes.len() > MAX_U8_LEN {
            return Err(BufError::TooLarge {
                len: bytes.len(),
                max: MAX_U8_LEN,
            });
        }
        self.reserve_write(self.position, 1 + bytes.len())?;
        self.put_u8(bytes.len() as u8)?.put_slice(bytes)
    }

    /// Writes a two-byte big-endian length followed by `bytes`.
    ///
    /// # Errors
    ///
    /// [`BufError::TooLarge`] if `bytes` is longer than 65535; nothing is written.
    pub fn put_bytes_u16_len(&mut self, bytes: &[u8]) -> Result<&mut Self, BufError> {
        if bytes.len() > MAX_U16_LEN {
            return Err(BufError::TooLarge {
                len: bytes.len(),
                max: MAX_U16_LEN,
            });
        }
        self.reserve_write(self.position, 2 + bytes.len())?;
        self.put_u16(bytes.len() as u16)?.put_slice(bytes)
    }

    /// Reads a one-byte length and that many bytes.
    pub fn get_bytes_u8_len(&mut self) -> Result<Option<Bytes>, BufError> {
        let len = usize::from(self.peek_u8()?);
        self.prefixed(1, len, |buf| buf.get_bytes(len))
    }

    /// Reads a two-byte big-endian length and that many bytes.
    pub fn get_bytes_u16_len(&mut self) -> Result<Option<Bytes>, BufError> {
        let len = usize::from(self.peek_u16()?);
        self.prefixed(2, len, |buf| buf.get_bytes(len))
    }

    /// Writes a one-byte length followed by the UTF-8 bytes of `text`.
    pub fn put_str_u8_len(&mut self, text: &str) -> Result<&mut Self, BufError> {
        self.put_bytes_u8_len(text.as_bytes())
    }

    /// Writes a two-byte length followed by the UTF-8 bytes of `text`.
    pub fn put_str_u16_len(&mut self, text: &str) -> Result<&mut Self, BufError> {
        self.put_bytes_u16_len(text.as_bytes())
    }

    /// Reads a one-byte length and that many bytes as UTF-8.
    pub fn get_str_u8_len(&mut self) -> Result<Option<String>, BufError> {
        let len = usize::from(self.peek_u8()?);
        self.prefixed(1, len, |buf| buf.get_str(len))
    }

    /// Reads a two-byte length and that many bytes as UTF-8.
    pub fn get_str_u16_len(&mut self) -> Result<Option<String>, BufError> {
        let len = usize::from(self.peek_u16()?);
        self.prefixed(2, len, |buf| buf.get_str(len))
    }

    /// Skips a `prefix`-byte length header and runs `read` for the payload,
    /// restoring the position if the payload read fails.
    pub(crate) fn prefixed<T>(
        &mut self,
        prefix: usize,
        len: usize,
        read: impl FnOnce(&mut Self) -> Result<T, BufError>,
    ) -> Result<T, BufError> {
        let start = self.position;
        self.check_read(start, prefix.saturating_add(len))?;
        self.position = start + prefix;
        read(&mut *self).inspect_err(|_| self.position = start)
    }

    /// Copies the written range `[mark, position)` into a `Bytes`.
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(self.written())
    }
}
