//! Forced little-endian reads from a stream and a staging writer.
//!
//! A forced read either fills its whole buffer or fails with
//! [`CodecError::TruncatedInput`]; it never hands back a partial value. The
//! read loop asks the stream only for the bytes still missing, so a failed
//! read consumes exactly the bytes the stream had left.

use gametable_stream::ByteStream;

use crate::error::{CodecError, CodecResult};
use crate::identifier::Identifier;

/// Forced reads over any [`ByteStream`]. All reads are little-endian.
pub trait ReadExt: ByteStream {
    /// Fills `buf` completely or fails with `TruncatedInput`.
    fn read_forced(&mut self, buf: &mut [u8]) -> CodecResult<()> {
        let offset = self.position();
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read(&mut buf[filled..])?;
            if n == 0 {
                return Err(CodecError::TruncatedInput {
                    offset,
                    need: buf.len(),
                    have: filled,
                });
            }
            filled += n;
        }
        Ok(())
    }

    /// Reads exactly `N` bytes.
    fn read_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_forced(&mut buf)?;
        Ok(buf)
    }

    /// Reads `len` bytes into a new vector.
    fn read_vec(&mut self, len: usize) -> CodecResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_forced(&mut buf)?;
        Ok(buf)
    }

    /// Reads one byte.
    fn read_u8(&mut self) -> CodecResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Reads a `u16`.
    fn read_u16(&mut self) -> CodecResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Reads an `i32`.
    fn read_i32(&mut self) -> CodecResult<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    /// Reads a `u32`; counts and offsets use this.
    fn read_u32(&mut self) -> CodecResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Reads an `i64`.
    fn read_i64(&mut self) -> CodecResult<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    /// Reads an IEEE 754 `f32`, keeping its exact bit pattern.
    fn read_f32(&mut self) -> CodecResult<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    /// Reads a four-byte identifier.
    fn read_identifier(&mut self) -> CodecResult<Identifier> {
        Ok(Identifier::from_bytes(self.read_array()?))
    }

    /// Reads `len` bytes and checks they are all 7-bit ASCII.
    fn read_ascii(&mut self, len: usize) -> CodecResult<String> {
        let offset = self.position();
        let bytes = self.read_vec(len)?;
        if let Some(pos) = bytes.iter().position(|b| !b.is_ascii()) {
            return Err(CodecError::invalid_string(
                offset,
                format!("byte {:#04x} at index {pos} is not 7-bit ASCII", bytes[pos]),
            ));
        }
        // ASCII is always valid UTF-8
        String::from_utf8(bytes)
            .map_err(|e| CodecError::invalid_string(offset, e.to_string()))
    }
}

impl<S: ByteStream + ?Sized> ReadExt for S {}

/// In-memory buffer that builds a table image. All writes are little-endian.
///
/// Positions are relative to the start of the buffer; the writer adds the
/// stream base when it turns them into absolute offsets.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty buffer with room for `cap` bytes.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: Vec::with_capacity(cap),
        }
    }

    /// Number of bytes written so far.
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    /// Appends raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Appends one byte.
    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    /// Appends a `u16`.
    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Appends an `i32`.
    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Appends a `u32`.
    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Appends an `i64`.
    pub fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Appends an `f32` bit for bit.
    pub fn write_f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Appends the four bytes of `id`.
    pub fn write_identifier(&mut self, id: Identifier) {
        self.buf.extend_from_slice(&id.to_bytes());
    }

    /// Overwrites a previously written `u32` (for backpatching offsets).
    ///
    /// # Panics
    ///
    /// Panics if `pos + 4` is past the end of the buffer.
    pub fn patch_u32(&mut self, pos: usize, v: u32) {
        self.buf[pos..pos + 4].copy_from_slice(&v.to_le_bytes());
    }

    /// The bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the writer and returns its buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
