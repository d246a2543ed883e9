//! Byte stream trait definition.

use crate::error::StreamResult;

/// A position-aware byte stream.
///
/// Streams are **opaque cursors**. They read and write raw bytes at the
/// current position and move that position explicitly. The codec owns all
/// interpretation of the bytes.
///
/// # Invariants
///
/// - `read` never returns more bytes than requested and advances the
///   position by exactly the number returned
/// - `read` returning `0` for a non-empty buffer means end of data
/// - `write_all` writes at the current position, overwriting existing bytes
///   and extending the stream as needed
/// - `seek` positions are absolute offsets from the start of the stream
///
/// # Implementors
///
/// - [`super::MemoryStream`] - For tests and in-memory buffers
/// - [`super::FileStream`] - For table files on disk
pub trait ByteStream {
    /// Reads up to `buf.len()` bytes at the current position.
    ///
    /// Returns the number of bytes read. A short read is not an error;
    /// callers that need an exact count must loop.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn read(&mut self, buf: &mut [u8]) -> StreamResult<usize>;

    /// Writes all of `data` at the current position.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn write_all(&mut self, data: &[u8]) -> StreamResult<()>;

    /// Moves the cursor to an absolute position.
    ///
    /// # Errors
    ///
    /// Returns an error if `position` is beyond the end of the stream.
    fn seek(&mut self, position: u64) -> StreamResult<()>;

    /// Returns the current cursor position.
    fn position(&self) -> u64;

    /// Returns the current length of the stream in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the length cannot be determined.
    fn len(&self) -> StreamResult<u64>;

    /// Returns `true` if the stream holds no bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the length cannot be determined.
    fn is_empty(&self) -> StreamResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Flushes pending writes to the underlying storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush operation fails.
    fn flush(&mut self) -> StreamResult<()>;
}
