//! Async ingestion into buffers.
//!
//! Built on `futures_io::AsyncRead`, so it works with any runtime. Tokio
//! readers can be adapted with `tokio_util::compat`.
//!
//! This module requires the `async-io` feature.

mod fill;

pub use fill::FillFrom;
