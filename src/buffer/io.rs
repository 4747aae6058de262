//! `std::io` adapters.
//!
//! These move bytes between a [`Buffer`] and readers, writers and seekable
//! files. All of them go through the same growth rules as relative writes.

use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

use super::Buffer;
use crate::error::BufError;
use crate::pool::BlockPool;

/// Smallest spare region requested from the buffer per read call.
pub(crate) const READ_CHUNK: usize = 1024;

impl Buffer {
    /// Drains `reader` to EOF into a new buffer.
    ///
    /// The result has `position == 0` and `limit` equal to the number of
    /// bytes read.
    ///
    /// # Example
    ///
    /// ```
    /// use cursorbuf::{BlockPool, Buffer};
    ///
    /// let pool = BlockPool::new();
    /// let buf = Buffer::from_reader(&pool, &b"from a reader"[..])?;
    /// assert_eq!(buf.readable(), b"from a reader");
    /// # Ok::<(), cursorbuf::BufError>(())
    /// ```
    pub fn from_reader<R: Read>(pool: &BlockPool, reader: R) -> Result<Self, BufError> {
        let mut buf = Buffer::new(pool, READ_CHUNK);
        buf.fill_from(reader)?;
        buf.flip();
        Ok(buf)
    }

    /// Writes everything `reader` yields at the position, growing as needed.
    ///
    /// Returns the number of bytes read. Interrupted reads are retried; bytes
    /// read before any other error stay in the buffer.
    ///
    /// A fixed-capacity buffer is filled up to its capacity. Input that fits
    /// exactly succeeds; [`BufError::FixedCapacity`] means the reader had at
    /// least one more byte, which is consumed and discarded.
    pub fn fill_from<R: Read>(&mut self, mut reader: R) -> Result<usize, BufError> {
        let mut total = 0;
        loop {
            let spare = match self.spare_mut(READ_CHUNK) {
                Ok(spare) => spare,
                Err(err @ BufError::FixedCapacity { .. }) => {
                    return if at_eof(&mut reader)? {
                        Ok(total)
                    } else {
                        Err(err)
                    };
                }
                Err(err) => return Err(err),
            };
            match reader.read(spare) {
                Ok(0) => return Ok(total),
                Ok(n) => {
                    self.commit(n);
                    total += n;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Reads `len` bytes of `source` starting at `offset` into the position.
    ///
    /// Bytes past the end of `source` are filled with zeros, so the position
    /// always advances by exactly `len`.
    pub fn read_at<R: Read + Seek>(
        &mut self,
        source: &mut R,
        offset: u64,
        len: usize,
    ) -> Result<&mut Self, BufError> {
        let start = self.position;
        let end = self.reserve_write(start, len)?;
        source.seek(SeekFrom::Start(offset))?;

        let mut filled = 0;
        while filled < len {
            match source.read(&mut self.data_mut()[start + filled..end]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.data_mut()[start + filled..end].fill(0);
        self.position = end;
        Ok(self)
    }

    /// Writes up to `len` bytes of `[position, limit)` to `sink` at `offset`.
    ///
    /// The position is not moved. Returns the number of bytes written.
    pub fn dump_at<W: Write + Seek>(
        &self,
        sink: &mut W,
        offset: u64,
        len: usize,
    ) -> Result<usize, BufError> {
        let count = self.remaining().min(len);
        sink.seek(SeekFrom::Start(offset))?;
        sink.write_all(&self.readable()[..count])?;
        Ok(count)
    }

    /// Writes the written range `[mark, position)` to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), BufError> {
        writer.write_all(self.written())?;
        Ok(())
    }
}

/// Reads one byte to tell a drained reader from one with more to give.
fn at_eof<R: Read>(reader: &mut R) -> Result<bool, BufError> {
    let mut scratch = [0u8; 1];
    loop {
        match reader.read(&mut scratch) {
            Ok(n) => return Ok(n == 0),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}
