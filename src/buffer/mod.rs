//! Cursor-based growable byte buffer.
//!
//! A [`Buffer`] owns one [`Block`] from a [`BlockPool`] and four cursors:
//!
//! ```text
//! 0 <= mark <= position <= limit <= capacity == block.len()
//! ```
//!
//! Writes land at `position` and push `limit` (and, if needed, `capacity`)
//! forward. Reads consume `[position, limit)` and fail with
//! [`BufError::Underflow`] instead of running past the limit. The usual
//! write / [`flip`](Buffer::flip) / read cycle looks like this:
//!
//! ```
//! use cursorbuf::BlockPool;
//!
//! let pool = BlockPool::new();
//! let mut buf = pool.buffer(16);
//! buf.put_u32(0xDEAD_BEEF)?.put_uvarint(300)?;
//!
//! buf.flip();
//! assert_eq!(buf.get_u32()?, 0xDEAD_BEEF);
//! assert_eq!(buf.get_uvarint()?, 300);
//! assert!(!buf.has_remaining());
//! # Ok::<(), cursorbuf::BufError>(())
//! ```
//!
//! Dropping (or [`release`](Buffer::release)-ing) a buffer hands its block
//! back to the pool. A buffer is not internally synchronized; it is mutated
//! through `&mut self` by a single owner.

mod io;
mod payload;
mod primitive;

#[cfg(feature = "async-io")]
pub(crate) use io::READ_CHUNK;
pub use payload::{MAX_U8_LEN, MAX_U16_LEN};
pub(crate) use primitive::uint_from_be;

use std::fmt;
use std::mem;

use bytes::Buf;
use tracing::debug;

use crate::error::BufError;
use crate::pool::{Block, BlockPool};

/// A growable byte buffer with NIO-style cursors.
pub struct Buffer {
    pool: BlockPool,
    data: Block,
    capacity: usize,
    limit: usize,
    position: usize,
    mark: usize,
    fixed_capacity: bool,
}

impl Buffer {
    /// Creates an empty buffer with room for at least `capacity` bytes.
    ///
    /// The block comes from `pool`, so the actual capacity is rounded up to
    /// a size class. The limit starts at zero.
    ///
    /// # Panics
    ///
    /// Panics if the block cannot be allocated. See [`try_new`](Self::try_new).
    pub fn new(pool: &BlockPool, capacity: usize) -> Self {
        let data = pool.allocate(capacity);
        Self::from_block(pool, data, 0)
    }

    /// Fallible [`new`](Self::new).
    ///
    /// # Errors
    ///
    /// Returns [`BufError::AllocationFailed`] if the block cannot be allocated.
    pub fn try_new(pool: &BlockPool, capacity: usize) -> Result<Self, BufError> {
        let data = pool.try_allocate(capacity)?;
        Ok(Self::from_block(pool, data, 0))
    }

    /// Creates a buffer holding a copy of `bytes`.
    ///
    /// The limit is `bytes.len()`; the capacity is the size class that fits it.
    pub fn copy_from(pool: &BlockPool, bytes: &[u8]) -> Self {
        let mut data = pool.allocate(bytes.len());
        data[..bytes.len()].copy_from_slice(bytes);
        Self::from_block(pool, data, bytes.len())
    }

    /// Creates a buffer that takes ownership of `bytes` without copying.
    ///
    /// Capacity and limit both equal `bytes.len()`. On release the vector is
    /// offered to `pool` like any other block.
    pub fn adopt(pool: &BlockPool, bytes: Vec<u8>) -> Self {
        let limit = bytes.len();
        Self::from_block(pool, Block::from(bytes), limit)
    }

    fn from_block(pool: &BlockPool, data: Block, limit: usize) -> Self {
        Self {
            pool: pool.clone(),
            capacity: data.len(),
            data,
            limit,
            position: 0,
            mark: 0,
            fixed_capacity: false,
        }
    }

    /// Returns the block to the pool. The buffer cannot be used afterwards.
    ///
    /// Equivalent to dropping the buffer.
    pub fn release(self) {
        drop(self);
    }

    /// Consumes the buffer and returns its bytes up to the limit.
    ///
    /// The block is not returned to the pool.
    pub fn into_vec(mut self) -> Vec<u8> {
        let mut bytes = mem::take(&mut self.data).into_vec();
        bytes.truncate(self.limit);
        bytes
    }

    /// Returns the pool backing this buffer.
    pub fn pool(&self) -> &BlockPool {
        &self.pool
    }

    // ------------------------------------------------------------------
    // Cursors
    // ------------------------------------------------------------------

    /// Returns the capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the mark.
    pub fn mark_position(&self) -> usize {
        self.mark
    }

    /// Returns `limit - position`.
    pub fn remaining(&self) -> usize {
        self.limit - self.position
    }

    /// Returns `true` if there are bytes between position and limit.
    pub fn has_remaining(&self) -> bool {
        self.remaining() > 0
    }

    /// Returns `true` if capacity changes are forbidden.
    pub fn is_fixed_capacity(&self) -> bool {
        self.fixed_capacity
    }

    /// Locks or unlocks the capacity.
    ///
    /// A locked buffer rejects every write or resize that would change its
    /// capacity with [`BufError::FixedCapacity`].
    pub fn set_fixed_capacity(&mut self, fixed: bool) -> &mut Self {
        self.fixed_capacity = fixed;
        self
    }

    /// Sets the position.
    ///
    /// Fails if `position > limit`. A position below the mark is clamped up
    /// to the mark rather than rejected.
    pub fn set_position(&mut self, position: usize) -> Result<&mut Self, BufError> {
        if position > self.limit {
            return Err(BufError::PositionOutOfBounds {
                position,
                limit: self.limit,
            });
        }
        self.position = position.max(self.mark);
        Ok(self)
    }

    /// Sets the limit, growing the capacity first if `limit > capacity`.
    ///
    /// Mark and position are clamped down to the new limit.
    pub fn set_limit(&mut self, limit: usize) -> Result<&mut Self, BufError> {
        if limit > self.capacity {
            self.grow_capacity(limit)?;
        }
        self.limit = limit;
        self.mark = self.mark.min(limit);
        self.position = self.position.min(limit);
        Ok(self)
    }

    /// Moves the buffer onto a block of at least `capacity` bytes.
    ///
    /// The first `min(old, new)` bytes are preserved, the old block goes back
    /// to the pool, and cursors past the new capacity are clamped. Passing the
    /// current capacity is a no-op, even for a fixed-capacity buffer.
    ///
    /// # Errors
    ///
    /// [`BufError::FixedCapacity`] if the capacity is locked, and
    /// [`BufError::AllocationFailed`] if the new block cannot be allocated.
    /// The buffer is unchanged in both cases.
    pub fn grow_capacity(&mut self, capacity: usize) -> Result<&mut Self, BufError> {
        if capacity == self.capacity {
            return Ok(self);
        }
        if self.fixed_capacity {
            return Err(BufError::FixedCapacity {
                capacity: self.capacity,
                requested: capacity,
            });
        }

        let mut block = self.pool.try_allocate(capacity)?;
        let keep = self.capacity.min(block.len());
        block[..keep].copy_from_slice(&self.data[..keep]);
        let old = mem::replace(&mut self.data, block);
        self.pool.release(old);

        debug!(from = self.capacity, to = self.data.len(), "buffer capacity changed");
        self.capacity = self.data.len();
        self.limit = self.limit.min(self.capacity);
        self.position = self.position.min(self.capacity);
        self.mark = self.mark.min(self.capacity);
        Ok(self)
    }

    /// Prepares for a fresh sequence of writes: position and mark go to
    /// zero and the limit goes to the capacity.
    pub fn clear(&mut self) -> &mut Self {
        self.position = 0;
        self.mark = 0;
        self.limit = self.capacity;
        self
    }

    /// Switches from writing to reading what was written: the limit becomes
    /// the position, position and mark go to zero.
    pub fn flip(&mut self) -> &mut Self {
        self.limit = self.position;
        self.position = 0;
        self.mark = 0;
        self
    }

    /// Rewinds to re-read the same range: position and mark go to zero.
    pub fn rewind(&mut self) -> &mut Self {
        self.position = 0;
        self.mark = 0;
        self
    }

    /// Records the current position.
    pub fn mark(&mut self) -> &mut Self {
        self.mark = self.position;
        self
    }

    /// Returns to the recorded position.
    pub fn reset(&mut self) -> &mut Self {
        self.position = self.mark;
        self
    }

    /// Moves the unread bytes `[position, limit)` to the front.
    ///
    /// Afterwards `limit` is the number of unread bytes and position and mark
    /// are zero. Does nothing if the position is already zero.
    pub fn compact(&mut self) -> &mut Self {
        if self.position == 0 {
            return self;
        }
        self.data.copy_within(self.position..self.limit, 0);
        self.limit -= self.position;
        self.position = 0;
        self.mark = 0;
        self
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Returns `[0, limit)`.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.limit]
    }

    /// Returns `[0, limit)` mutably.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data[..self.limit]
    }

    /// Returns the unread range `[position, limit)`.
    pub fn readable(&self) -> &[u8] {
        &self.data[self.position..self.limit]
    }

    /// Returns the written range `[mark, position)`.
    pub fn written(&self) -> &[u8] {
        &self.data[self.mark..self.position]
    }

    // ------------------------------------------------------------------
    // Bounded primitives
    // ------------------------------------------------------------------

    /// Checks that `[offset, offset + len)` lies below the limit and returns
    /// the end offset.
    fn check_read(&self, offset: usize, len: usize) -> Result<usize, BufError> {
        let end = offset
            .checked_add(len)
            .ok_or(BufError::IndexOverflow { offset, len })?;
        if end > self.limit {
            return Err(BufError::Underflow {
                offset,
                needed: len,
                limit: self.limit,
            });
        }
        Ok(end)
    }

    /// Makes `[offset, offset + len)` writable, pushing the limit forward
    /// when needed, and returns the end offset.
    fn reserve_write(&mut self, offset: usize, len: usize) -> Result<usize, BufError> {
        let end = offset
            .checked_add(len)
            .ok_or(BufError::IndexOverflow { offset, len })?;
        if end > self.limit {
            self.set_limit(end)?;
        }
        Ok(end)
    }

    /// Reads `len` bytes at the position and advances past them.
    pub fn get_slice(&mut self, len: usize) -> Result<&[u8], BufError> {
        let start = self.position;
        let end = self.check_read(start, len)?;
        self.position = end;
        Ok(&self.data[start..end])
    }

    /// Reads `len` bytes at the position without advancing.
    pub fn peek_slice(&self, len: usize) -> Result<&[u8], BufError> {
        let end = self.check_read(self.position, len)?;
        Ok(&self.data[self.position..end])
    }

    /// Reads `len` bytes at `index`. The position is untouched.
    pub fn slice_at(&self, index: usize, len: usize) -> Result<&[u8], BufError> {
        let end = self.check_read(index, len)?;
        Ok(&self.data[index..end])
    }

    /// Writes `bytes` at the position and advances past them.
    pub fn put_slice(&mut self, bytes: &[u8]) -> Result<&mut Self, BufError> {
        let start = self.position;
        let end = self.reserve_write(start, bytes.len())?;
        self.data[start..end].copy_from_slice(bytes);
        self.position = end;
        Ok(self)
    }

    /// Writes `bytes` at `index`. The position is untouched.
    pub fn put_slice_at(&mut self, index: usize, bytes: &[u8]) -> Result<&mut Self, BufError> {
        let end = self.reserve_write(index, bytes.len())?;
        self.data[index..end].copy_from_slice(bytes);
        Ok(self)
    }

    pub(crate) fn get_array<const N: usize>(&mut self) -> Result<[u8; N], BufError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.get_slice(N)?);
        Ok(out)
    }

    pub(crate) fn peek_array<const N: usize>(&self) -> Result<[u8; N], BufError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.peek_slice(N)?);
        Ok(out)
    }

    pub(crate) fn array_at<const N: usize>(&self, index: usize) -> Result<[u8; N], BufError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.slice_at(index, N)?);
        Ok(out)
    }

    /// Mutable access to `[0, capacity)`, for in-place transforms that check
    /// their own range.
    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data[..self.capacity]
    }

    /// Returns the writable tail `[position, capacity)` after making sure it
    /// holds at least `min` bytes, without moving the limit.
    ///
    /// A fixed-capacity buffer hands out whatever tail it has left and only
    /// fails once that tail is empty.
    pub(crate) fn spare_mut(&mut self, min: usize) -> Result<&mut [u8], BufError> {
        let needed = self
            .position
            .checked_add(min)
            .ok_or(BufError::IndexOverflow {
                offset: self.position,
                len: min,
            })?;
        let exhausted = self.position >= self.capacity;
        if needed > self.capacity && (!self.fixed_capacity || exhausted) {
            let target = needed.max(self.capacity.saturating_mul(2));
            self.grow_capacity(target)?;
        }
        let (start, end) = (self.position, self.capacity);
        Ok(&mut self.data[start..end])
    }

    /// Commits `len` bytes written into [`spare_mut`](Self::spare_mut).
    pub(crate) fn commit(&mut self, len: usize) {
        self.position += len;
        self.limit = self.limit.max(self.position);
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        let block = mem::take(&mut self.data);
        if !block.is_empty() {
            self.pool.release(block);
        }
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("mark", &self.mark)
            .field("position", &self.position)
            .field("limit", &self.limit)
            .field("capacity", &self.capacity)
            .field("fixed_capacity", &self.fixed_capacity)
            .finish()
    }
}

/// Reads through `bytes::Buf` consume `[position, limit)`.
impl Buf for Buffer {
    fn remaining(&self) -> usize {
        self.limit - self.position
    }

    fn chunk(&self) -> &[u8] {
        self.readable()
    }

    fn advance(&mut self, cnt: usize) {
        assert!(
            cnt <= Buf::remaining(self),
            "cannot advance past limit: {} > {}",
            cnt,
            Buf::remaining(self)
        );
        self.position += cnt;
    }
}
