use core::str::from_utf8;
use embassy_time::{with_timeout, Duration};
use embedded_io_async::{Read, ReadReady};
use heapless::Vec;

use crate::{find_bytes, log, Error};

/// Capacity of the buffer holding the response of the last command.
pub const RX_BUFFER_SIZE: usize = 256;

/// Number of bytes pulled from the transport with a single read.
const READ_CHUNK_LEN: usize = 64;

/// A fixed-capacity accumulator for modem responses.
///
/// The buffer never grows: bytes that do not fit are dropped and the buffer is marked as not
/// [fully read](ResponseBuffer::is_fully_read).
pub struct ResponseBuffer<const N: usize> {
    buffer: Vec<u8, N>,
    fully_read: bool,
}

impl<const N: usize> ResponseBuffer<N> {
    pub const fn new() -> Self {
        ResponseBuffer {
            buffer: Vec::new(),
            fully_read: true,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Append as much of `bytes` as fits, returning how many bytes were stored.
    pub fn extend_truncating(&mut self, bytes: &[u8]) -> usize {
        let fitting = bytes.len().min(self.remaining());
        let stored = self.buffer.extend_from_slice(&bytes[..fitting]);
        debug_assert!(stored.is_ok());
        fitting
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn remaining(&self) -> usize {
        N - self.buffer.len()
    }

    /// Whether the last read cycle ended because the modem went quiet, as opposed to running
    /// out of room.
    pub fn is_fully_read(&self) -> bool {
        self.fully_read
    }

    pub fn find(&self, pattern: &[u8]) -> Option<usize> {
        self.find_from(pattern, 0)
    }

    /// Like [ResponseBuffer::find], but ignores matches starting before `start`.
    pub fn find_from(&self, pattern: &[u8], start: usize) -> Option<usize> {
        let haystack = self.buffer.get(start..)?;
        find_bytes(haystack, pattern).map(|position| position + start)
    }

    pub fn contains(&self, pattern: &[u8]) -> bool {
        self.find(pattern).is_some()
    }
}

impl<const N: usize> Default for ResponseBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one read cycle, moving bytes from `reader` into `buffer`.
///
/// Waits up to `timeout` for the first bytes, then keeps reading for as long as new bytes show up
/// within `idle_gap` of each other. Unless `append` is set the buffer is cleared first.
///
/// Returns the number of bytes stored during this cycle.
pub async fn read_response<R, const N: usize>(
    reader: &mut R,
    buffer: &mut ResponseBuffer<N>,
    timeout: Duration,
    idle_gap: Duration,
    append: bool,
) -> Result<usize, Error>
where
    R: Read + ReadReady,
{
    if !append {
        buffer.clear();
    }
    buffer.fully_read = true;

    let start = buffer.len();
    let mut chunk = [0u8; READ_CHUNK_LEN];
    let mut window = timeout;

    loop {
        let amount = match with_timeout(window, reader.read(&mut chunk)).await {
            Ok(result) => result.map_err(|_| Error::Serial)?,
            Err(_) => break,
        };

        if amount == 0 {
            break;
        }

        let stored = buffer.extend_truncating(&chunk[..amount]);
        if stored < amount {
            log::warn!(
                "response buffer full, dropping {} bytes",
                amount - stored
            );
            buffer.fully_read = false;
            discard_pending(reader).await?;
            break;
        }

        window = idle_gap;
    }

    let received = buffer.len() - start;
    if received > 0 {
        match from_utf8(buffer.as_bytes()) {
            Ok(text) => log::trace!("CURRENT BUFFER (utf-8) {:?}", text),
            Err(_) => log::trace!("CURRENT BUFFER (binary) {:?}", buffer.as_bytes()),
        }
    }

    Ok(received)
}

/// Throw away whatever the transport has already received.
async fn discard_pending<R: Read + ReadReady>(reader: &mut R) -> Result<(), Error> {
    let mut scratch = [0u8; READ_CHUNK_LEN];
    while reader.read_ready().map_err(|_| Error::Serial)? {
        if reader.read(&mut scratch).await.map_err(|_| Error::Serial)? == 0 {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::MockSerial;
    use embassy_time::{Duration, Instant};
    use futures::executor::block_on;

    const TIMEOUT: Duration = Duration::from_millis(100);
    const GAP: Duration = Duration::from_millis(50);

    #[test]
    fn truncates_at_capacity() {
        let mut buffer = ResponseBuffer::<4>::new();
        assert_eq!(buffer.extend_truncating(b"AB"), 2);
        assert_eq!(buffer.extend_truncating(b"CDEF"), 2);
        assert_eq!(buffer.extend_truncating(b"G"), 0);
        assert_eq!(buffer.as_bytes(), b"ABCD");
        assert_eq!(buffer.remaining(), 0);
    }

    #[test]
    fn find_from_offset() {
        let mut buffer = ResponseBuffer::<32>::new();
        buffer.extend_truncating(b"OK\r\nCONNECT OK\r\n");
        assert_eq!(buffer.find(b"OK"), Some(0));
        assert_eq!(buffer.find_from(b"OK", 1), Some(12));
        assert_eq!(buffer.find_from(b"\r\n", 4), Some(14));
        assert_eq!(buffer.find_from(b"OK", 64), None);
        assert!(!ResponseBuffer::<8>::new().contains(b"OK"));
    }

    #[test]
    fn overwrite_and_append() {
        block_on(async {
            let mut serial = MockSerial::build()
                .reply(b"first")
                .reply_after(80, b"second")
                .reply_after(80, b"third")
                .finalize();
            let mut buffer = ResponseBuffer::<32>::new();

            let n = read_response(&mut serial, &mut buffer, TIMEOUT, GAP, false).await;
            assert_eq!(n, Ok(5));

            let n = read_response(&mut serial, &mut buffer, TIMEOUT, GAP, true).await;
            assert_eq!(n, Ok(6));
            assert_eq!(buffer.as_bytes(), b"firstsecond");

            let n = read_response(&mut serial, &mut buffer, TIMEOUT, GAP, false).await;
            assert_eq!(n, Ok(5));
            assert_eq!(buffer.as_bytes(), b"third");
            assert!(buffer.is_fully_read());
        })
    }

    #[test]
    fn append_preserves_arrival_order() {
        block_on(async {
            let chunks: [&[u8]; 4] = [b"+CDNSGIP: ", b"1,\"a.b\",", b"\"1.2.3.4\"", b"\r\n"];
            let mut builder = MockSerial::build();
            for chunk in chunks {
                builder = builder.reply_after(70, chunk);
            }
            let mut serial = builder.finalize();
            let mut buffer = ResponseBuffer::<64>::new();

            let mut total = 0;
            for chunk in chunks {
                let n = read_response(&mut serial, &mut buffer, TIMEOUT, GAP, true)
                    .await
                    .unwrap();
                assert_eq!(n, chunk.len());
                total += n;
            }

            assert_eq!(total, buffer.len());
            assert_eq!(buffer.as_bytes(), b"+CDNSGIP: 1,\"a.b\",\"1.2.3.4\"\r\n");
        })
    }

    #[test]
    fn overflow_marks_buffer_as_partial() {
        block_on(async {
            let mut serial = MockSerial::build()
                .reply(&[b'x'; 100])
                .reply_after(500, b"late")
                .finalize();
            let mut buffer = ResponseBuffer::<16>::new();

            let n = read_response(&mut serial, &mut buffer, TIMEOUT, GAP, false).await;
            assert_eq!(n, Ok(16));
            assert_eq!(buffer.len(), buffer.capacity());
            assert!(!buffer.is_fully_read());

            // the rest of the burst was drained, the late reply was not
            assert_eq!(serial.pending_reads(), 1);
        })
    }

    #[test]
    fn exact_fit_is_fully_read() {
        block_on(async {
            let mut serial = MockSerial::build().reply(&[b'x'; 16]).finalize();
            let mut buffer = ResponseBuffer::<16>::new();

            let n = read_response(&mut serial, &mut buffer, TIMEOUT, GAP, false).await;
            assert_eq!(n, Ok(16));
            assert!(buffer.is_fully_read());
        })
    }

    #[test]
    fn silence_yields_nothing() {
        block_on(async {
            let mut serial = MockSerial::build().finalize();
            let mut buffer = ResponseBuffer::<16>::new();
            buffer.extend_truncating(b"stale");

            let start = Instant::now();
            let n = read_response(&mut serial, &mut buffer, TIMEOUT, GAP, false).await;
            assert_eq!(n, Ok(0));
            assert!(start.elapsed() >= TIMEOUT);
            assert!(buffer.is_empty());
        })
    }
}
