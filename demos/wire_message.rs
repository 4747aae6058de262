//! Building and parsing a framed wire message.
//!
//! Encodes a small record with tagged field headers and varints, seals it
//! with a checksum and a scramble, then decodes it again from the raw bytes.
//!
//! Run with:
//!     RUST_LOG=cursorbuf=trace cargo run --example wire_message

use cursorbuf::{BlockPool, BufError, Buffer, ScrambleSeed, TaggedIndex};
use tracing_subscriber::EnvFilter;

const FIELD_ID: u8 = 1;
const FIELD_NAME: u8 = 2;
const FIELD_SCORES: u8 = 3;

#[derive(Debug, PartialEq)]
struct Record {
    id: u64,
    name: String,
    scores: Vec<i64>,
}

fn encode(pool: &BlockPool, record: &Record) -> Result<Vec<u8>, BufError> {
    let mut buf = pool.buffer(64);
    buf.put_tagged_index(TaggedIndex::new(FIELD_ID, 0))?
        .put_uvarint(record.id)?
        .put_tagged_index(TaggedIndex::new(FIELD_NAME, 0))?
        .put_var_str(&record.name)?
        .put_tagged_index(TaggedIndex::new(FIELD_SCORES, record.scores.len() as u32))?;
    for &score in &record.scores {
        buf.put_varint(score)?;
    }
    buf.append_checksum()?.scramble(ScrambleSeed::Primary);
    Ok(buf.into_vec())
}

fn decode(pool: &BlockPool, wire: Vec<u8>) -> Result<Option<Record>, BufError> {
    let mut buf = Buffer::adopt(pool, wire);
    buf.unscramble(ScrambleSeed::Primary);
    if !buf.strip_checksum() {
        return Ok(None);
    }

    let mut record = Record {
        id: 0,
        name: String::new(),
        scores: Vec::new(),
    };
    while buf.has_remaining() {
        let header = buf.get_tagged_index()?;
        match header.tag {
            FIELD_ID => record.id = buf.get_uvarint()?,
            FIELD_NAME => record.name = buf.get_var_str()?.unwrap_or_default(),
            FIELD_SCORES => {
                for _ in 0..header.index {
                    record.scores.push(buf.get_varint()?);
                }
            }
            other => println!("skipping unknown field {other}"),
        }
    }
    Ok(Some(record))
}

fn main() -> Result<(), BufError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let pool = BlockPool::new();
    let record = Record {
        id: 300,
        name: "sensor-7".to_string(),
        scores: vec![-1, 64, -100_000, i64::MAX],
    };

    let wire = encode(&pool, &record)?;
    println!("encoded {} bytes: {:02x?}", wire.len(), wire);

    let decoded = decode(&pool, wire.clone())?;
    assert_eq!(decoded.as_ref(), Some(&record));
    println!("decoded: {decoded:?}");

    let mut corrupted = wire;
    corrupted[0] ^= 0x10;
    println!("corrupted frame verifies: {}", decode(&pool, corrupted)?.is_some());

    println!("pool stats: {:?}", pool.stats());
    Ok(())
}
