#![no_main]

use cursorbuf::{BlockPool, ScrambleSeed};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: Vec<u8>| {
    let pool = BlockPool::new();

    for seed in [ScrambleSeed::Primary, ScrambleSeed::Alternate] {
        let mut buf = pool.buffer(0);
        buf.put_slice(&data).unwrap().append_checksum().unwrap();
        buf.scramble(seed);
        buf.flip();
        buf.unscramble(seed);
        assert!(buf.strip_checksum());
        assert_eq!(buf.as_slice(), data.as_slice());
    }

    let mut buf = pool.buffer(0);
    buf.put_slice(&data).unwrap();
    buf.scramble_strided();
    buf.flip();
    buf.unscramble_strided();
    assert_eq!(buf.as_slice(), data.as_slice());
});
