//! # gametable Testkit
//!
//! Test utilities for gametable.
//!
//! This crate provides:
//! - Sample tables and temporary table files
//! - Property-based test generators using proptest
//! - A stream that hands out bytes in small chunks and counts its reads
//! - Golden test utilities and fixed byte vectors
//! - Fuzz targets for the table decoders
//!
//! ## Usage
//!
//! ```rust
//! use gametable_testkit::prelude::*;
//!
//! let tree = cinematic_tree().unwrap();
//! let bytes = to_bytes(&tree, &sample_cinematic()).unwrap();
//! let back: CinematicData = from_bytes(&tree, &bytes).unwrap();
//! assert_eq!(back, sample_cinematic());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod fuzz;
pub mod generators;
pub mod golden;
pub mod streams;
pub mod vectors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::fuzz::*;
    pub use crate::generators::*;
    pub use crate::golden::*;
    pub use crate::streams::*;
    pub use crate::vectors::*;
    pub use gametable_codec::{from_bytes, read_table, to_bytes, write_table, Identifier};
    pub use gametable_stream::{ByteStream, MemoryStream};
    pub use gametable_tables::*;
}

pub use fixtures::*;
pub use fuzz::*;
pub use generators::*;
pub use golden::*;
pub use streams::*;
pub use vectors::*;
