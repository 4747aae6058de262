//! Draining an async reader into a buffer.

use std::future::Future;
use std::io::ErrorKind;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_io::AsyncRead;
use pin_project_lite::pin_project;
use tracing::trace;

use crate::buffer::{Buffer, READ_CHUNK};
use crate::error::BufError;

pin_project! {
    /// Future returned by [`Buffer::fill_from_async`].
    ///
    /// Resolves to the number of bytes read once the reader reports EOF.
    /// Bytes read before an error stay in the buffer.
    #[must_use = "futures do nothing unless polled"]
    pub struct FillFrom<'a, R> {
        buffer: &'a mut Buffer,
        #[pin]
        reader: R,
        total: usize,
    }
}

impl<R: AsyncRead> Future for FillFrom<'_, R> {
    type Output = Result<usize, BufError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();
        loop {
            let spare = match this.buffer.spare_mut(READ_CHUNK) {
                Ok(spare) => spare,
                Err(err @ BufError::FixedCapacity { .. }) => {
                    // full: only an exhausted reader counts as success
                    let mut scratch = [0u8; 1];
                    match this.reader.as_mut().poll_read(cx, &mut scratch) {
                        Poll::Pending => return Poll::Pending,
                        Poll::Ready(Ok(0)) => return Poll::Ready(Ok(*this.total)),
                        Poll::Ready(Ok(_)) => return Poll::Ready(Err(err)),
                        Poll::Ready(Err(e)) if e.kind() == ErrorKind::Interrupted => continue,
                        Poll::Ready(Err(e)) => return Poll::Ready(Err(BufError::Io(e))),
                    }
                }
                Err(e) => return Poll::Ready(Err(e)),
            };
            match this.reader.as_mut().poll_read(cx, spare) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Ok(0)) => {
                    trace!(total = *this.total, "async fill reached eof");
                    return Poll::Ready(Ok(*this.total));
                }
                Poll::Ready(Ok(n)) => {
                    this.buffer.commit(n);
                    *this.total += n;
                }
                Poll::Ready(Err(e)) if e.kind() == ErrorKind::Interrupted => continue,
                Poll::Ready(Err(e)) => return Poll::Ready(Err(BufError::Io(e))),
            }
        }
    }
}

impl Buffer {
    /// Writes everything an async reader yields at the position.
    ///
    /// The async twin of [`fill_from`](Self::fill_from).
    ///
    /// # Example
    ///
    /// ```
    /// use cursorbuf::BlockPool;
    ///
    /// # tokio_test::block_on(async {
    /// let pool = BlockPool::new();
    /// let mut buf = pool.buffer(0);
    /// let n = buf.fill_from_async(&b"async bytes"[..]).await?;
    /// assert_eq!(n, 11);
    /// assert_eq!(buf.as_slice(), b"async bytes");
    /// # Ok::<(), cursorbuf::BufError>(())
    /// # }).unwrap();
    /// ```
    pub fn fill_from_async<R: AsyncRead>(&mut self, reader: R) -> FillFrom<'_, R> {
        FillFrom {
            buffer: self,
            reader,
            total: 0,
        }
    }
}
