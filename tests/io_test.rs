// Integration tests for the std::io and async adapters
// Tests cover: draining readers, positioned file reads/writes, write-out

use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use cursorbuf::{BlockPool, BufError, Buffer};

/// A reader that hands out one byte per call and reports an interruption
/// before each of them.
struct Trickle<'a> {
    data: &'a [u8],
    interrupt: bool,
}

impl Read for Trickle<'_> {
    fn read(&mut self, out: &mut [u8]) -> std::io::Result<usize> {
        self.interrupt = !self.interrupt;
        if self.interrupt {
            return Err(std::io::ErrorKind::Interrupted.into());
        }
        match self.data.split_first() {
            Some((&first, rest)) if !out.is_empty() => {
                out[0] = first;
                self.data = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

struct Broken;

impl Read for Broken {
    fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("disk on fire"))
    }
}

#[test]
fn test_from_reader_retries_interrupts() {
    let pool = BlockPool::new();
    let reader = Trickle {
        data: b"slow bytes",
        interrupt: false,
    };
    let buf = Buffer::from_reader(&pool, reader).unwrap();
    assert_eq!(buf.readable(), b"slow bytes");
}

#[test]
fn test_reader_error_surfaces_as_io() {
    let pool = BlockPool::new();
    let err = Buffer::from_reader(&pool, Broken).unwrap_err();
    assert!(matches!(err, BufError::Io(_)));
    assert!(err.to_string().contains("disk on fire"));
}

#[test]
fn test_record_file_round_trip() {
    let pool = BlockPool::new();
    let mut file = Cursor::new(Vec::new());

    // write two fixed-size records at known offsets
    for (slot, name) in [(0u64, "alpha"), (1, "beta")] {
        let mut rec = pool.buffer(32);
        rec.put_u32(slot as u32).unwrap().put_str_u8_len(name).unwrap();
        rec.flip();
        rec.set_limit(32).unwrap();
        assert_eq!(rec.dump_at(&mut file, slot * 32, 32).unwrap(), 32);
    }
    assert_eq!(file.get_ref().len(), 64);

    let mut rec = pool.buffer(0);
    rec.read_at(&mut file, 32, 32).unwrap();
    rec.flip();
    assert_eq!(rec.get_u32().unwrap(), 1);
    assert_eq!(rec.get_str_u8_len().unwrap().as_deref(), Some("beta"));
}

#[test]
fn test_read_at_past_eof_zero_fills() {
    let pool = BlockPool::new();
    let mut file = Cursor::new(vec![0xAB; 4]);
    let mut buf = pool.buffer(0);
    buf.put_u8(1).unwrap();
    buf.read_at(&mut file, 2, 6).unwrap();
    assert_eq!(buf.position(), 7);
    assert_eq!(buf.as_slice(), &[1, 0xAB, 0xAB, 0, 0, 0, 0]);
}

#[test]
fn test_write_to_then_read_back() {
    let pool = BlockPool::new();
    let mut buf = pool.buffer(0);
    buf.put_var_str("streamed").unwrap().put_varint(-99).unwrap();

    let mut sink = Cursor::new(Vec::new());
    buf.write_to(&mut sink).unwrap();
    sink.seek(SeekFrom::Start(0)).unwrap();

    let mut rx = Buffer::from_reader(&pool, sink).unwrap();
    assert_eq!(rx.get_var_str().unwrap().as_deref(), Some("streamed"));
    assert_eq!(rx.get_varint().unwrap(), -99);
}

#[test]
fn test_fill_from_into_fixed_buffer_overflows() {
    let pool = BlockPool::new();
    let mut buf = pool.buffer(16);
    buf.set_fixed_capacity(true);
    let err = buf.fill_from(&[0u8; 64][..]).unwrap_err();
    assert!(matches!(err, BufError::FixedCapacity { .. }));
    // the bytes that fit were kept
    assert_eq!(buf.position(), 16);
}

#[test]
fn test_fill_from_exact_fit_in_fixed_buffer() {
    let pool = BlockPool::new();
    let mut buf = pool.buffer(16);
    buf.set_fixed_capacity(true);
    let reader = Trickle {
        data: &[0x42; 16],
        interrupt: false,
    };
    assert_eq!(buf.fill_from(reader).unwrap(), 16);
    assert_eq!(buf.written(), &[0x42; 16]);

    // one byte more than fits is reported
    let mut buf = pool.buffer(16);
    buf.set_fixed_capacity(true);
    let err = buf.fill_from(&[0x42u8; 17][..]).unwrap_err();
    assert!(matches!(err, BufError::FixedCapacity { .. }));
    assert_eq!(buf.position(), 16);
}

#[test]
fn test_fill_from_into_fixed_buffer_with_room() {
    let pool = BlockPool::new();
    let mut buf = pool.buffer(16);
    buf.set_fixed_capacity(true);
    assert_eq!(buf.fill_from(&b"fits"[..]).unwrap(), 4);
    assert_eq!(buf.capacity(), 16);
    assert_eq!(buf.written(), b"fits");
}

#[test]
fn test_writer_failure() {
    struct Full;
    impl Write for Full {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let pool = BlockPool::new();
    let mut buf = pool.buffer(0);
    buf.put_u8(1).unwrap();
    assert!(matches!(buf.write_to(&mut Full), Err(BufError::Io(_))));
}

#[cfg(feature = "async-io")]
mod async_fill {
    use cursorbuf::BlockPool;
    use tokio::io::AsyncWriteExt;
    use tokio_util::compat::TokioAsyncReadCompatExt;

    #[tokio::test]
    async fn test_fill_from_duplex_stream() {
        let pool = BlockPool::new();
        let (mut tx, rx) = tokio::io::duplex(64);

        let writer = tokio::spawn(async move {
            for i in 0..100u8 {
                tx.write_all(&[i; 10]).await.unwrap();
            }
        });

        let mut buf = pool.buffer(0);
        let n = buf.fill_from_async(rx.compat()).await.unwrap();
        writer.await.unwrap();

        assert_eq!(n, 1000);
        buf.flip();
        for i in 0..100u8 {
            assert_eq!(buf.get_slice(10).unwrap(), &[i; 10]);
        }
    }

    #[test]
    fn test_fill_with_block_on() {
        let pool = BlockPool::new();
        let mut buf = pool.buffer(0);
        let data: &[u8] = b"blocking executor";
        let n = tokio_test::block_on(buf.fill_from_async(data)).unwrap();
        assert_eq!(n, data.len());
        assert_eq!(buf.as_slice(), data);
    }
}
