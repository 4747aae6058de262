#![no_main]

use cursorbuf::{BlockPool, Buffer, MAX_VARINT_LEN, encoded_len};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: Vec<u8>| {
    let pool = BlockPool::new();

    // Decoding arbitrary bytes must never panic, and a failed decode must
    // not move the cursor.
    let mut buf = Buffer::copy_from(&pool, &data);
    while buf.has_remaining() {
        let before = buf.position();
        match buf.get_uvarint() {
            Ok(value) => {
                // below nine bytes every encoding is canonical; the nine-byte
                // tier wraps and may decode to a shorter value
                let consumed = buf.position() - before;
                if consumed < MAX_VARINT_LEN {
                    assert_eq!(consumed, encoded_len(value));
                } else {
                    assert_eq!(consumed, MAX_VARINT_LEN);
                }
            }
            Err(_) => {
                assert_eq!(buf.position(), before);
                break;
            }
        }
    }

    let mut buf = Buffer::copy_from(&pool, &data);
    while buf.has_remaining() {
        let before = buf.position();
        if buf.get_tagged_index().is_err() {
            assert_eq!(buf.position(), before);
            break;
        }
    }

    let mut buf = Buffer::copy_from(&pool, &data);
    loop {
        let before = buf.position();
        match buf.get_var_bytes() {
            Ok(_) if buf.has_remaining() => {}
            Ok(_) => break,
            Err(_) => {
                assert_eq!(buf.position(), before);
                break;
            }
        }
    }
});
