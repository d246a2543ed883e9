//! Error types for the codec crate.

use gametable_stream::StreamError;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while building schemas, reading or writing tables.
#[derive(Error, Debug)]
pub enum CodecError {
    /// A forced read found fewer bytes than it needed.
    #[error("truncated input at offset {offset:#x} (need {need} bytes, have {have})")]
    TruncatedInput {
        /// Stream position where the read started.
        offset: u64,
        /// Number of bytes the read required.
        need: usize,
        /// Number of bytes that were actually available.
        have: usize,
    },

    /// An offset placeholder is zero with a non-zero count, or points
    /// outside the stream.
    #[error("invalid offset {offset:#x} for {count} element(s) in a stream of {stream_len} bytes")]
    InvalidOffset {
        /// The offset read from the placeholder.
        offset: u32,
        /// The element count that accompanied it.
        count: u32,
        /// Length of the stream being read.
        stream_len: u64,
    },

    /// A list count is larger than the configured maximum.
    #[error("list of {count} elements exceeds the limit of {max}")]
    ListTooLong {
        /// The count read from the stream.
        count: u32,
        /// The configured maximum.
        max: u32,
    },

    /// A string payload is not 7-bit ASCII or has a bad terminator.
    #[error("invalid string at offset {offset:#x}: {message}")]
    InvalidString {
        /// Position of the string payload.
        offset: u64,
        /// Description of the problem.
        message: String,
    },

    /// The caller passed arguments the codec cannot act on.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the problem.
        message: String,
    },

    /// A schema failed validation while it was being built.
    #[error("invalid schema: {message}")]
    InvalidSchema {
        /// Description of the problem.
        message: String,
    },

    /// A value cannot be represented in the binary layout.
    #[error("encoding failed: {message}")]
    EncodingFailed {
        /// Description of the encoding error.
        message: String,
    },

    /// The underlying stream failed.
    #[error(transparent)]
    Stream(#[from] StreamError),
}

impl CodecError {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            message: message.into(),
        }
    }

    /// Create an encoding failed error.
    pub fn encoding_failed(message: impl Into<String>) -> Self {
        Self::EncodingFailed {
            message: message.into(),
        }
    }

    /// Create an invalid string error.
    pub fn invalid_string(offset: u64, message: impl Into<String>) -> Self {
        Self::InvalidString {
            offset,
            message: message.into(),
        }
    }
}
