//! Size-classed block pool.
//!
//! [`BlockPool`] caches freed byte blocks in per-class free lists so that
//! buffers growing and shrinking through the same sizes reuse memory instead
//! of going back to the allocator. Size classes are `unit * 2^n`; blocks
//! above `max_pooled` bypass the cache entirely.
//!
//! The pool is a cheap-to-clone handle. All clones share one free-list map,
//! guarded by a single mutex.

mod block;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::buffer::Buffer;
use crate::config::PoolConfig;
use crate::error::BufError;

pub use block::Block;

/// A snapshot of pool counters.
///
/// The counters are informational; nothing in the crate depends on them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Allocations served from a free list.
    pub hits: u64,
    /// Poolable allocations that found their free list empty.
    pub misses: u64,
    /// Bytes currently held in free lists.
    pub cached_bytes: u64,
    /// Total bytes handed out again from free lists.
    pub reused_bytes: u64,
    /// Largest size ever passed to `allocate`.
    pub max_requested: usize,
    /// Blocks currently held in free lists.
    pub free_blocks: usize,
}

/// A shared cache of reusable byte blocks, bucketed by size class.
///
/// # Example
///
/// ```
/// use cursorbuf::BlockPool;
///
/// let pool = BlockPool::new();
/// let block = pool.allocate(100);
/// assert_eq!(block.len(), 128);
///
/// pool.release(block);
/// let again = pool.allocate(120);
/// assert_eq!(again.len(), 128);
/// assert_eq!(pool.stats().hits, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BlockPool {
    inner: Arc<PoolInner>,
}

#[derive(Debug, Default)]
struct PoolInner {
    config: PoolConfig,
    state: Mutex<PoolState>,
    max_requested: AtomicUsize,
}

#[derive(Debug, Default)]
struct PoolState {
    free: BTreeMap<usize, Vec<Block>>,
    hits: u64,
    misses: u64,
    cached_bytes: u64,
    reused_bytes: u64,
}

impl BlockPool {
    /// Creates a pool with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pool with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BufError::InvalidConfig`] if `config` fails validation.
    pub fn with_config(config: PoolConfig) -> Result<Self, BufError> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(PoolInner {
                config,
                state: Mutex::new(PoolState::default()),
                max_requested: AtomicUsize::new(0),
            }),
        })
    }

    /// Returns the pool configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.inner.config
    }

    /// Creates an empty buffer backed by this pool.
    ///
    /// Shorthand for [`Buffer::new`].
    pub fn buffer(&self, capacity: usize) -> Buffer {
        Buffer::new(self, capacity)
    }

    /// Returns a block at least `size` bytes long.
    ///
    /// The length is rounded up to the nearest size class. Classes above the
    /// pooling threshold are allocated fresh and are counted as neither a hit
    /// nor a miss.
    ///
    /// # Panics
    ///
    /// Panics if the allocation fails, like `vec![0; size]` does. Use
    /// [`try_allocate`](Self::try_allocate) to get an error instead.
    pub fn allocate(&self, size: usize) -> Block {
        match self.try_allocate(size) {
            Ok(block) => block,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible [`allocate`](Self::allocate).
    ///
    /// # Errors
    ///
    /// Returns [`BufError::AllocationFailed`] if a block of the rounded size
    /// cannot be allocated.
    pub fn try_allocate(&self, size: usize) -> Result<Block, BufError> {
        let config = &self.inner.config;
        self.inner.max_requested.fetch_max(size, Ordering::Relaxed);

        let class = class_ceil(size, config.unit());
        let fresh = || {
            Block::try_zeroed(class).map_err(|_| BufError::AllocationFailed { requested: class })
        };
        if class > config.max_pooled() {
            debug!(size, class, "allocating unpooled block");
            return fresh();
        }

        let mut state = self.inner.state.lock();
        match state.free.get_mut(&class).and_then(Vec::pop) {
            Some(block) => {
                let len = block.len() as u64;
                state.hits += 1;
                state.cached_bytes -= len;
                state.reused_bytes += len;
                trace!(size, class, "block pool hit");
                Ok(block)
            }
            None => {
                state.misses += 1;
                drop(state);
                trace!(size, class, "block pool miss");
                fresh()
            }
        }
    }

    /// Returns a block to the pool.
    ///
    /// Blocks shorter than the unit or longer than the pooling threshold are
    /// dropped. Other blocks are filed under their length rounded down to a
    /// size class, trimmed to exactly that class.
    pub fn release(&self, mut block: Block) {
        let config = &self.inner.config;
        let len = block.len();
        if len < config.unit() || len > config.max_pooled() {
            if len > 0 {
                trace!(len, "dropping unpoolable block");
            }
            return;
        }

        let class = class_floor(len, config.unit());
        block.truncate(class);

        let mut state = self.inner.state.lock();
        if let Some(limit) = config.cache_limit() {
            if state.cached_bytes + class as u64 > limit as u64 {
                drop(state);
                debug!(class, limit, "cache limit reached, dropping block");
                return;
            }
        }
        state.free.entry(class).or_default().push(block);
        state.cached_bytes += class as u64;
        trace!(class, "block returned to pool");
    }

    /// Drops every cached block and returns the number of bytes freed.
    ///
    /// The pool never frees cached memory on its own; this is the explicit
    /// way to hand peak memory back to the allocator.
    pub fn trim(&self) -> usize {
        let mut state = self.inner.state.lock();
        let freed: usize = state
            .free
            .values()
            .flat_map(|list| list.iter().map(Block::len))
            .sum();
        state.free.clear();
        state.cached_bytes = 0;
        drop(state);
        debug!(freed, "trimmed block pool");
        freed
    }

    /// Returns a snapshot of the pool counters.
    pub fn stats(&self) -> PoolStats {
        let state = self.inner.state.lock();
        PoolStats {
            hits: state.hits,
            misses: state.misses,
            cached_bytes: state.cached_bytes,
            reused_bytes: state.reused_bytes,
            max_requested: self.inner.max_requested.load(Ordering::Relaxed),
            free_blocks: state.free.values().map(Vec::len).sum(),
        }
    }
}

/// Smallest size class `>= size`.
///
/// Falls back to `size` itself when the next class would overflow.
pub(crate) fn class_ceil(size: usize, unit: usize) -> usize {
    if size <= unit {
        return unit;
    }
    size.div_ceil(unit)
        .checked_next_power_of_two()
        .and_then(|units| units.checked_mul(unit))
        .unwrap_or(size)
}

/// Largest size class `<= len`. Requires `len >= unit`.
pub(crate) fn class_floor(len: usize, unit: usize) -> usize {
    let units = len / unit;
    let highest = usize::BITS - 1 - units.leading_zeros();
    (1usize << highest) * unit
}
