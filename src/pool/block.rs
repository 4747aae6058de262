//! Fixed-length byte blocks handed out by the pool.

use std::collections::TryReserveError;
use std::ops::{Deref, DerefMut};

/// A contiguous byte region owned by at most one buffer at a time.
///
/// Blocks produced by [`BlockPool::allocate`](crate::BlockPool::allocate)
/// have a length equal to a size class. Blocks built from arbitrary vectors
/// (see [`Block::from`]) may have any length; the pool trims them to a class
/// when they are released.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Block {
    bytes: Vec<u8>,
}

impl Block {
    /// Creates a zero-filled block of exactly `len` bytes.
    pub(crate) fn zeroed(len: usize) -> Self {
        Self {
            bytes: vec![0; len],
        }
    }

    /// Creates a zero-filled block of exactly `len` bytes, reporting
    /// allocation failure instead of aborting.
    pub(crate) fn try_zeroed(len: usize) -> Result<Self, TryReserveError> {
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(len)?;
        bytes.resize(len, 0);
        Ok(Self { bytes })
    }

    /// Returns the block length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the block has no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Shortens the block to `len` bytes, keeping the allocation.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.bytes.truncate(len);
    }

    /// Consumes the block and returns its bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }
}

impl From<Vec<u8>> for Block {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl Deref for Block {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl DerefMut for Block {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed() {
        let block = Block::zeroed(32);
        assert_eq!(block.len(), 32);
        assert!(block.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_try_zeroed_rejects_impossible_length() {
        assert!(Block::try_zeroed(usize::MAX).is_err());
        assert_eq!(Block::try_zeroed(8).unwrap().len(), 8);
    }

    #[test]
    fn test_truncate_keeps_prefix() {
        let mut block = Block::from(vec![1, 2, 3, 4, 5]);
        block.truncate(3);
        assert_eq!(&block[..], &[1, 2, 3]);
        assert_eq!(block.into_vec(), vec![1, 2, 3]);
    }
}
