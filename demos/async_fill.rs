//! Filling a buffer from a tokio file through the futures-io adapter.
//!
//! Run with:
//!     cargo run --example async_fill --features async-io

use cursorbuf::BlockPool;
use tokio_util::compat::TokioAsyncReadCompatExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let pool = BlockPool::new();

    // Write a file of length-prefixed records
    let mut out = pool.buffer(0);
    for i in 0..1000u32 {
        out.put_var_str(&format!("record-{i}"))?;
    }
    let path = std::env::temp_dir().join("cursorbuf_async_fill.bin");
    tokio::fs::write(&path, out.written()).await?;
    out.release();

    // Read it back asynchronously
    let file = tokio::fs::File::open(&path).await?;
    let mut buf = pool.buffer(0);
    let n = buf.fill_from_async(file.compat()).await?;
    buf.flip();

    let mut count = 0;
    let mut last = None;
    while buf.has_remaining() {
        last = buf.get_var_str()?;
        count += 1;
    }
    println!("last: {last:?}");
    println!("read {n} bytes, {count} records");

    tokio::fs::remove_file(&path).await?;
    Ok(())
}
