//! Error types for stream operations.

use std::io;
use thiserror::Error;

/// Result type for stream operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Errors that can occur during stream operations.
#[derive(Debug, Error)]
pub enum StreamError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Attempted to seek beyond the end of the stream.
    #[error("seek beyond end of stream: position {position}, len {len}")]
    SeekPastEnd {
        /// The requested position.
        position: u64,
        /// The current stream length.
        len: u64,
    },
}
