//! Runtime selection of a table type.

use std::fmt;
use std::str::FromStr;

use gametable_codec::{CodecError, CodecResult, TableCodec, Tree};
use gametable_stream::ByteStream;
use serde::Serialize;

use crate::cinematic::{cinematic_tree, CinematicData};
use crate::conversation::{conversation_tree, ConversationData};

/// The table types this crate knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// [`CinematicData`].
    Cinematic,
    /// [`ConversationData`].
    Conversation,
}

impl TableKind {
    /// Every known kind.
    pub const ALL: [TableKind; 2] = [TableKind::Cinematic, TableKind::Conversation];

    /// Lower-case name.
    pub const fn name(self) -> &'static str {
        match self {
            TableKind::Cinematic => "cinematic",
            TableKind::Conversation => "conversation",
        }
    }

    /// Builds the schema for this kind.
    pub fn tree(self) -> CodecResult<Tree> {
        match self {
            TableKind::Cinematic => cinematic_tree(),
            TableKind::Conversation => conversation_tree(),
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TableKind {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TableKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CodecError::invalid_argument(format!("unknown table kind '{s}'")))
    }
}

/// A decoded table of any known kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnyTable {
    /// A cinematic table.
    Cinematic(CinematicData),
    /// A conversation table.
    Conversation(ConversationData),
}

impl AnyTable {
    /// The kind of this table.
    pub fn kind(&self) -> TableKind {
        match self {
            AnyTable::Cinematic(_) => TableKind::Cinematic,
            AnyTable::Conversation(_) => TableKind::Conversation,
        }
    }

    /// Order-sensitive hash of the table contents.
    pub fn content_hash(&self) -> u64 {
        match self {
            AnyTable::Cinematic(data) => data.content_hash(),
            AnyTable::Conversation(data) => data.content_hash(),
        }
    }

    /// Reads a table of `kind` at the stream's current position.
    pub fn read<S: ByteStream + ?Sized>(
        codec: &TableCodec,
        kind: TableKind,
        tree: &Tree,
        stream: &mut S,
    ) -> CodecResult<Self> {
        Ok(match kind {
            TableKind::Cinematic => AnyTable::Cinematic(codec.read(stream, tree)?),
            TableKind::Conversation => AnyTable::Conversation(codec.read(stream, tree)?),
        })
    }

    /// Writes the table at the stream's current position.
    pub fn write<S: ByteStream + ?Sized>(
        &self,
        codec: &TableCodec,
        tree: &Tree,
        stream: &mut S,
    ) -> CodecResult<()> {
        match self {
            AnyTable::Cinematic(data) => codec.write(stream, tree, data),
            AnyTable::Conversation(data) => codec.write(stream, tree, data),
        }
    }

    /// Encodes the table into a new buffer.
    pub fn to_bytes(&self, codec: &TableCodec, tree: &Tree) -> CodecResult<Vec<u8>> {
        match self {
            AnyTable::Cinematic(data) => codec.to_bytes(tree, data),
            AnyTable::Conversation(data) => codec.to_bytes(tree, data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gametable_stream::MemoryStream;

    #[test]
    fn parse_kind() {
        assert_eq!("cinematic".parse::<TableKind>().unwrap(), TableKind::Cinematic);
        assert_eq!("Conversation".parse::<TableKind>().unwrap(), TableKind::Conversation);
        assert!("quest".parse::<TableKind>().is_err());
        assert_eq!(TableKind::Conversation.to_string(), "conversation");
    }

    #[test]
    fn read_and_write_through_kind() {
        let codec = TableCodec::default();
        let kind = TableKind::Conversation;
        let tree = kind.tree().unwrap();
        let table = AnyTable::Conversation(ConversationData::default());

        let mut stream = MemoryStream::new();
        table.write(&codec, &tree, &mut stream).unwrap();
        stream.seek(0).unwrap();
        let back = AnyTable::read(&codec, kind, &tree, &mut stream).unwrap();
        assert_eq!(back, table);
        assert_eq!(back.kind(), kind);
    }

    #[test]
    fn wrong_tree_is_rejected() {
        let codec = TableCodec::default();
        let tree = TableKind::Cinematic.tree().unwrap();
        let table = AnyTable::Conversation(ConversationData::default());
        assert!(matches!(
            table.to_bytes(&codec, &tree),
            Err(CodecError::InvalidArgument { .. })
        ));
    }
}
