//! Streams for exercising the codec's read loop.

use gametable_stream::{ByteStream, MemoryStream, StreamResult};

/// A stream that serves at most `chunk` bytes per read and records every
/// call it receives.
#[derive(Debug)]
pub struct TrickleStream {
    inner: MemoryStream,
    chunk: usize,
    read_calls: usize,
    productive_reads: usize,
    bytes_served: usize,
}

impl TrickleStream {
    /// Wraps `data`, serving `chunk` bytes (at least one) per read.
    pub fn new(data: Vec<u8>, chunk: usize) -> Self {
        Self {
            inner: MemoryStream::with_data(data),
            chunk: chunk.max(1),
            read_calls: 0,
            productive_reads: 0,
            bytes_served: 0,
        }
    }

    /// Serves one byte per read.
    pub fn one_byte(data: Vec<u8>) -> Self {
        Self::new(data, 1)
    }

    /// Number of `read` calls so far, including ones that hit the end.
    pub fn read_calls(&self) -> usize {
        self.read_calls
    }

    /// Number of bytes handed out so far.
    pub fn bytes_served(&self) -> usize {
        self.bytes_served
    }

    /// Number of `read` calls that returned data.
    pub fn productive_reads(&self) -> usize {
        self.productive_reads
    }
}

impl ByteStream for TrickleStream {
    fn read(&mut self, buf: &mut [u8]) -> StreamResult<usize> {
        self.read_calls += 1;
        let n = buf.len().min(self.chunk);
        let got = self.inner.read(&mut buf[..n])?;
        if got > 0 {
            self.productive_reads += 1;
            self.bytes_served += got;
        }
        Ok(got)
    }

    fn write_all(&mut self, data: &[u8]) -> StreamResult<()> {
        self.inner.write_all(data)
    }

    fn seek(&mut self, position: u64) -> StreamResult<()> {
        self.inner.seek(position)
    }

    fn position(&self) -> u64 {
        self.inner.position()
    }

    fn len(&self) -> StreamResult<u64> {
        self.inner.len()
    }

    fn flush(&mut self) -> StreamResult<()> {
        self.inner.flush()
    }
}
