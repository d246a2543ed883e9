//! # gametable Stream
//!
//! Position-aware byte streams used by the gametable codec.
//!
//! A stream is an **opaque cursor over bytes**. It knows nothing about
//! records, lists or offsets; the codec owns all format interpretation and
//! drives the cursor explicitly (read, seek, restore).
//!
//! ## Design Principles
//!
//! - Reads may be short; `0` means end of data
//! - Seeks are absolute, measured from the start of the stream
//! - A stream is exclusively borrowed (`&mut`) by one codec call at a time
//!
//! ## Available Streams
//!
//! - [`MemoryStream`] - Vec-backed, for tests and in-memory round trips
//! - [`FileStream`] - Backed by an OS file
//!
//! ## Example
//!
//! ```rust
//! use gametable_stream::{ByteStream, MemoryStream};
//!
//! let mut stream = MemoryStream::new();
//! stream.write_all(b"FORM").unwrap();
//! stream.seek(0).unwrap();
//!
//! let mut buf = [0u8; 4];
//! assert_eq!(stream.read(&mut buf).unwrap(), 4);
//! assert_eq!(&buf, b"FORM");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod stream;

pub use error::{StreamError, StreamResult};
pub use file::FileStream;
pub use memory::MemoryStream;
pub use stream::ByteStream;
