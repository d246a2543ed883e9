//! In-memory byte stream.

use crate::error::{StreamError, StreamResult};
use crate::stream::ByteStream;

/// A Vec-backed byte stream.
///
/// This stream is suitable for:
/// - Unit and integration tests
/// - Encoding tables to bytes before handing them elsewhere
/// - Decoding tables already loaded into memory
///
/// # Example
///
/// ```rust
/// use gametable_stream::{ByteStream, MemoryStream};
///
/// let mut stream = MemoryStream::new();
/// stream.write_all(b"test data").unwrap();
/// assert_eq!(stream.position(), 9);
/// assert_eq!(stream.len().unwrap(), 9);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryStream {
    data: Vec<u8>,
    pos: usize,
}

impl MemoryStream {
    /// Creates a new empty stream.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stream over existing bytes, positioned at the start.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the bytes held by the stream.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the stream and returns its bytes.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl ByteStream for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> StreamResult<usize> {
        let available = self.data.len().saturating_sub(self.pos);
        let n = buf.len().min(available);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn write_all(&mut self, data: &[u8]) -> StreamResult<()> {
        let end = self.pos + data.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[self.pos..end].copy_from_slice(data);
        self.pos = end;
        Ok(())
    }

    fn seek(&mut self, position: u64) -> StreamResult<()> {
        let len = self.data.len() as u64;
        if position > len {
            return Err(StreamError::SeekPastEnd { position, len });
        }
        self.pos = position as usize;
        Ok(())
    }

    fn position(&self) -> u64 {
        self.pos as u64
    }

    fn len(&self) -> StreamResult<u64> {
        Ok(self.data.len() as u64)
    }

    fn flush(&mut self) -> StreamResult<()> {
        // Nothing is buffered
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_new_is_empty() {
        let stream = MemoryStream::new();
        assert_eq!(stream.len().unwrap(), 0);
        assert!(stream.is_empty().unwrap());
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn memory_write_advances_position() {
        let mut stream = MemoryStream::new();

        stream.write_all(b"hello").unwrap();
        assert_eq!(stream.position(), 5);

        stream.write_all(b" world").unwrap();
        assert_eq!(stream.position(), 11);
        assert_eq!(stream.data(), b"hello world");
    }

    #[test]
    fn memory_read_is_short_at_end() {
        let mut stream = MemoryStream::with_data(b"abc".to_vec());
        let mut buf = [0u8; 8];

        assert_eq!(stream.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"abc");
        assert_eq!(stream.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn memory_overwrite_in_place() {
        let mut stream = MemoryStream::with_data(b"hello world".to_vec());
        stream.seek(6).unwrap();
        stream.write_all(b"WORLD").unwrap();
        assert_eq!(stream.data(), b"hello WORLD");
        assert_eq!(stream.len().unwrap(), 11);
    }

    #[test]
    fn memory_write_extends_past_end() {
        let mut stream = MemoryStream::with_data(b"abc".to_vec());
        stream.seek(2).unwrap();
        stream.write_all(b"XYZ").unwrap();
        assert_eq!(stream.data(), b"abXYZ");
    }

    #[test]
    fn memory_seek_to_end_is_allowed() {
        let mut stream = MemoryStream::with_data(b"abc".to_vec());
        stream.seek(3).unwrap();
        assert_eq!(stream.position(), 3);
    }

    #[test]
    fn memory_seek_past_end_fails() {
        let mut stream = MemoryStream::with_data(b"abc".to_vec());
        let result = stream.seek(4);
        assert!(matches!(
            result,
            Err(StreamError::SeekPastEnd { position: 4, len: 3 })
        ));
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn memory_into_inner() {
        let mut stream = MemoryStream::new();
        stream.write_all(&[1, 2, 3]).unwrap();
        assert_eq!(stream.into_inner(), vec![1, 2, 3]);
    }
}
