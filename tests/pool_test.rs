// Integration tests for BlockPool
// Tests cover: size classes, reuse through buffers, concurrency, configuration

use std::thread;

use cursorbuf::{Block, BlockPool, Buffer, PoolConfig};

#[test]
fn test_buffers_recycle_blocks() {
    let pool = BlockPool::new();
    for round in 0..10 {
        let mut buf = pool.buffer(100);
        buf.put_slice(&[round as u8; 100]).unwrap();
    }
    let stats = pool.stats();
    assert_eq!(stats.misses, 1, "only the first buffer should allocate");
    assert_eq!(stats.hits, 9);
    assert_eq!(stats.reused_bytes, 9 * 128);
    assert_eq!(stats.free_blocks, 1);
}

#[test]
fn test_growth_returns_outgrown_blocks() {
    let pool = BlockPool::new();
    let mut buf = pool.buffer(16);
    buf.put_slice(&[0u8; 200]).unwrap();
    drop(buf);

    // 16-byte block released on growth, 256-byte block released on drop
    let stats = pool.stats();
    assert_eq!(stats.free_blocks, 2);
    assert_eq!(stats.cached_bytes, 16 + 256);
}

#[test]
fn test_large_buffers_are_not_pooled() {
    let pool = BlockPool::new();
    let buf = pool.buffer(100_000);
    assert_eq!(buf.capacity(), 128 * 1024);
    drop(buf);

    let stats = pool.stats();
    assert_eq!(stats.free_blocks, 0);
    assert_eq!(stats.hits + stats.misses, 0);
    assert_eq!(stats.max_requested, 100_000);
}

#[test]
fn test_adopted_vec_is_offered_to_pool() {
    let pool = BlockPool::new();
    let buf = Buffer::adopt(&pool, vec![1u8; 100]);
    drop(buf);
    // 100 bytes round down to the 64-byte class
    assert_eq!(pool.stats().cached_bytes, 64);
    assert_eq!(pool.allocate(64).len(), 64);
    assert_eq!(pool.stats().hits, 1);
}

#[test]
fn test_custom_config_size_classes() {
    let config = PoolConfig::new(64, 1024).unwrap();
    let pool = BlockPool::with_config(config).unwrap();
    assert_eq!(pool.allocate(1).len(), 64);
    assert_eq!(pool.allocate(65).len(), 128);

    pool.release(Block::from(vec![0u8; 2048]));
    assert_eq!(pool.stats().free_blocks, 0, "above max_pooled is dropped");
    pool.release(Block::from(vec![0u8; 63]));
    assert_eq!(pool.stats().free_blocks, 0, "below unit is dropped");
}

#[test]
fn test_trim_releases_cached_memory() {
    let pool = BlockPool::new();
    let buffers: Vec<Buffer> = (0..8).map(|_| pool.buffer(1000)).collect();
    drop(buffers);
    assert_eq!(pool.stats().cached_bytes, 8 * 1024);

    assert_eq!(pool.trim(), 8 * 1024);
    assert_eq!(pool.stats().cached_bytes, 0);

    let _buf = pool.buffer(1000);
    assert_eq!(pool.stats().misses, 9);
}

#[test]
fn test_concurrent_allocate_release() {
    let pool = BlockPool::new();
    let threads = 8;
    let rounds = 500;

    thread::scope(|s| {
        for t in 0..threads {
            let pool = pool.clone();
            s.spawn(move || {
                for i in 0..rounds {
                    let size = 16 << ((t + i) % 8);
                    let mut buf = pool.buffer(size);
                    buf.put_uvarint(i as u64).unwrap();
                    buf.flip();
                    assert_eq!(buf.get_uvarint().unwrap(), i as u64);
                }
            });
        }
    });

    let stats = pool.stats();
    assert_eq!(
        stats.hits + stats.misses,
        (threads * rounds) as u64,
        "every poolable allocation is a hit or a miss"
    );
    // every block ever created is back in a free list
    assert_eq!(stats.free_blocks as u64, stats.misses);
}
