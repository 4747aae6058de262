//! Benchmarks for cursorbuf.
//!
//! Run with:
//!     cargo bench

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use cursorbuf::{BlockPool, Buffer, ScrambleSeed};

fn bench_varint(c: &mut Criterion) {
    let mut group = c.benchmark_group("varint");
    let pool = BlockPool::new();

    // One value per tier, so every encoding length is exercised
    let values: Vec<u64> = (0..9)
        .map(|tier| if tier == 8 { u64::MAX } else { 1u64 << (7 * tier) })
        .cycle()
        .take(4096)
        .collect();

    group.throughput(Throughput::Elements(values.len() as u64));
    group.bench_function("encode", |b| {
        let mut buf = pool.buffer(64 * 1024);
        b.iter(|| {
            buf.clear();
            for &v in &values {
                buf.put_uvarint(black_box(v)).unwrap();
            }
            black_box(buf.position())
        });
    });

    let mut encoded = pool.buffer(0);
    for &v in &values {
        encoded.put_uvarint(v).unwrap();
    }
    encoded.flip();
    group.bench_function("decode", |b| {
        b.iter(|| {
            encoded.rewind();
            let mut sum = 0u64;
            while encoded.has_remaining() {
                sum = sum.wrapping_add(encoded.get_uvarint().unwrap());
            }
            black_box(sum)
        });
    });

    group.finish();
}

fn bench_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool");
    let pool = BlockPool::new();

    group.bench_function("buffer_cycle_pooled", |b| {
        b.iter(|| {
            let mut buf = pool.buffer(black_box(1000));
            buf.put_u64(42).unwrap();
            black_box(buf.position())
        });
    });

    group.bench_function("buffer_growth", |b| {
        b.iter(|| {
            let mut buf = pool.buffer(16);
            for i in 0..1024u32 {
                buf.put_u32(i).unwrap();
            }
            black_box(buf.capacity())
        });
    });

    group.bench_function("vec_baseline", |b| {
        b.iter(|| {
            let mut v = Vec::with_capacity(black_box(1000));
            v.extend_from_slice(&42u64.to_be_bytes());
            black_box(v.len())
        });
    });

    group.finish();
}

fn bench_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("transforms");
    let pool = BlockPool::new();
    let size = 64 * 1024;
    let data: Vec<u8> = (0..size).map(|i| (i * 7 + 13) as u8).collect();

    group.throughput(Throughput::Bytes(size as u64));
    group.bench_function("checksum_scramble", |b| {
        b.iter(|| {
            let mut buf = Buffer::copy_from(&pool, black_box(&data));
            buf.set_position(buf.limit()).unwrap();
            buf.append_checksum().unwrap().scramble(ScrambleSeed::Primary);
            buf.flip();
            buf.unscramble(ScrambleSeed::Primary);
            black_box(buf.strip_checksum())
        });
    });

    group.bench_function("strided_scramble", |b| {
        let mut buf = Buffer::copy_from(&pool, &data);
        buf.set_position(buf.limit()).unwrap();
        b.iter(|| {
            buf.scramble_strided();
            black_box(buf.position())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_varint, bench_pool, bench_transforms);
criterion_main!(benches);
