//! # gametable Codec
//!
//! Schema-driven binary encoding for game data tables.
//!
//! A table is described by a [`Tree`]: a root [`RecordNode`] whose fields
//! are [`Edge`]s binding a Rust field (through a getter/setter pair) to a
//! [`Node`]. The same tree drives both the reader and the writer, so the
//! on-disk layout is defined in exactly one place.
//!
//! ## Binary Layout
//!
//! - All integers are little-endian; `f32` is IEEE-754
//! - A record is its fields back to back, in declaration order
//! - A list is `count` then a 4-byte absolute offset to its elements
//! - Strings and lists-at-offset are a 4-byte offset only
//! - A string payload is `length:1 bytes:length terminator:1`
//! - Offset `0` means null
//!
//! Variable payloads follow the fixed region in the order their
//! placeholders were written, so output is deterministic.
//!
//! ## Usage
//!
//! ```
//! use gametable_codec::{from_bytes, record_value, to_bytes, Identifier, Node, RecordNode, Tree};
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Marker {
//!     id: Identifier,
//!     label: String,
//! }
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Map {
//!     markers: Vec<Marker>,
//! }
//!
//! record_value!(Marker);
//!
//! let marker = RecordNode::builder::<Marker>()
//!     .field("id", Node::IDENTIFIER, |m: &Marker| m.id, |m, v| m.id = v)
//!     .field("label", Node::STRING, |m: &Marker| m.label.clone(), |m, v| m.label = v)
//!     .build()
//!     .unwrap();
//! let map = RecordNode::builder::<Map>()
//!     .field(
//!         "markers",
//!         Node::list(Node::record(marker)).unwrap(),
//!         |m: &Map| m.markers.clone(),
//!         |m, v| m.markers = v,
//!     )
//!     .build()
//!     .unwrap();
//! let tree = Tree::new("map", map);
//!
//! let value = Map {
//!     markers: vec![Marker { id: "SPWN".parse().unwrap(), label: "start".into() }],
//! };
//! let bytes = to_bytes(&tree, &value).unwrap();
//! let back: Map = from_bytes(&tree, &bytes).unwrap();
//! assert_eq!(back, value);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod edge;
mod equality;
mod error;
mod identifier;
mod node;
mod primitive;
mod reader;
mod table;
mod tree;
mod value;
mod writer;

pub use config::{CodecConfig, DEFAULT_MAX_LIST_ELEMENTS};
pub use edge::Edge;
pub use equality::{
    accumulate_hash, hash_code, sequence_equals, HASH_PRIME_EMPTY, HASH_PRIME_PRESENT,
};
pub use error::{CodecError, CodecResult};
pub use identifier::{is_valid_byte, Identifier, EMPTY_CHAR};
pub use node::{
    CountWidth, Field, ListNode, Node, PayloadNode, RecordBuilder, RecordNode, ScalarKind,
    SubTree, OFFSET_WIDTH,
};
pub use primitive::{ByteWriter, ReadExt};
pub use reader::TableReader;
pub use table::{from_bytes, read_table, to_bytes, write_table, TableCodec};
pub use tree::Tree;
pub use value::{FieldShape, FieldValue, Value};
pub use writer::{TableWriter, MAX_STRING_LEN};
