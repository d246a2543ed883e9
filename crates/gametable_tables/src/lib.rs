//! # gametable Tables
//!
//! Concrete table types built on `gametable_codec`.
//!
//! | Table | Root type | Tree |
//! |---|---|---|
//! | cinematic | [`CinematicData`] | [`cinematic_tree`] |
//! | conversation | [`ConversationData`] | [`conversation_tree`] |
//!
//! [`TableKind`] and [`AnyTable`] let tools handle either table without
//! knowing its type at compile time.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cinematic;
mod conversation;
mod kind;

pub use cinematic::{
    cinematic_tree, CinematicCharacter, CinematicData, CinematicObject, CinematicSound,
    CinematicText,
};
pub use conversation::{
    conversation_tree, conversation_tree_deferred, frame_node, ConversationCharacter,
    ConversationData, ConversationFrame, ConversationInfo,
};
pub use kind::{AnyTable, TableKind};
