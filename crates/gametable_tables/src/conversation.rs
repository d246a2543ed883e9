//! Conversation tables: speakers, dialogue frames and free-form metadata.
//!
//! Frames are described by a [`SubTree`] that is attached after the root
//! schema is built, so other tables can share the frame layout.

use std::hash::{Hash, Hasher};

use gametable_codec::{
    accumulate_hash, hash_code, record_value, sequence_equals, CodecResult, Identifier, Node,
    RecordNode, SubTree, Tree, HASH_PRIME_EMPTY, HASH_PRIME_PRESENT,
};
use serde::Serialize;

/// A speaker in a conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ConversationCharacter {
    /// Character code.
    pub id: Identifier,
    /// Display name.
    pub name: String,
    /// Portrait resource, if the speaker has one.
    pub portrait: Option<String>,
}

/// One line of dialogue and the frames it can lead to.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversationFrame {
    /// Frame number, referenced by `next_frames`.
    pub index: i32,
    /// Code of the speaking character.
    pub speaker: Identifier,
    /// Spoken text.
    pub text: String,
    /// Display time in seconds.
    pub duration: f32,
    /// Frames reachable from this one, in menu order.
    pub next_frames: Vec<i32>,
}

/// A key/value metadata entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ConversationInfo {
    /// Entry key.
    pub key: Identifier,
    /// Entry value.
    pub value: String,
}

/// Root record of a conversation table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversationData {
    /// Conversation code.
    pub id: Identifier,
    /// Speakers.
    pub characters: Vec<ConversationCharacter>,
    /// Dialogue frames.
    pub frames: Vec<ConversationFrame>,
    /// Metadata; `None` when the table has no metadata block at all.
    pub infos: Option<Vec<ConversationInfo>>,
}

record_value!(ConversationCharacter, ConversationFrame, ConversationInfo);

impl PartialEq for ConversationFrame {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
            && self.speaker == other.speaker
            && self.text == other.text
            && self.duration.to_bits() == other.duration.to_bits()
            && sequence_equals(Some(&self.next_frames[..]), Some(&other.next_frames[..]))
    }
}

impl Eq for ConversationFrame {}

impl Hash for ConversationFrame {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.speaker.hash(state);
        self.text.hash(state);
        self.duration.to_bits().hash(state);
        accumulate_hash(0, Some(&self.next_frames[..]), HASH_PRIME_PRESENT, HASH_PRIME_EMPTY)
            .hash(state);
    }
}

impl PartialEq for ConversationData {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && sequence_equals(Some(&self.characters[..]), Some(&other.characters[..]))
            && sequence_equals(Some(&self.frames[..]), Some(&other.frames[..]))
            && sequence_equals(self.infos.as_deref(), other.infos.as_deref())
    }
}

impl ConversationData {
    /// Order-sensitive hash of the whole table.
    pub fn content_hash(&self) -> u64 {
        let mut h = hash_code(&self.id);
        h = accumulate_hash(h, Some(&self.characters[..]), HASH_PRIME_PRESENT, HASH_PRIME_EMPTY);
        h = accumulate_hash(h, Some(&self.frames[..]), HASH_PRIME_PRESENT, HASH_PRIME_EMPTY);
        // distinguishes a missing metadata block from an empty one
        h = h.wrapping_mul(HASH_PRIME_PRESENT).wrapping_add(u64::from(self.infos.is_some()));
        accumulate_hash(h, self.infos.as_deref(), HASH_PRIME_PRESENT, HASH_PRIME_EMPTY)
    }
}

/// Builds the record schema of a conversation frame.
pub fn frame_node() -> CodecResult<RecordNode> {
    RecordNode::builder::<ConversationFrame>()
        .field("index", Node::I32, |f: &ConversationFrame| f.index, |f, v| f.index = v)
        .field("speaker", Node::IDENTIFIER, |f: &ConversationFrame| f.speaker, |f, v| f.speaker = v)
        .field("text", Node::STRING, |f: &ConversationFrame| f.text.clone(), |f, v| f.text = v)
        .field("duration", Node::F32, |f: &ConversationFrame| f.duration, |f, v| f.duration = v)
        .field(
            "next_frames",
            Node::list(Node::I32)?,
            |f: &ConversationFrame| f.next_frames.clone(),
            |f, v| f.next_frames = v,
        )
        .build()
}

fn character_node() -> CodecResult<RecordNode> {
    RecordNode::builder::<ConversationCharacter>()
        .field("id", Node::IDENTIFIER, |c: &ConversationCharacter| c.id, |c, v| c.id = v)
        .field("name", Node::STRING, |c: &ConversationCharacter| c.name.clone(), |c, v| c.name = v)
        .field(
            "portrait",
            Node::STRING,
            |c: &ConversationCharacter| c.portrait.clone(),
            |c, v| c.portrait = v,
        )
        .build()
}

fn info_node() -> CodecResult<RecordNode> {
    RecordNode::builder::<ConversationInfo>()
        .field("key", Node::IDENTIFIER, |i: &ConversationInfo| i.key, |i, v| i.key = v)
        .field("value", Node::STRING, |i: &ConversationInfo| i.value.clone(), |i, v| i.value = v)
        .build()
}

/// Builds the conversation schema with its frame sub-tree still unattached.
///
/// The returned tree is unusable until a frame record is attached to the
/// returned [`SubTree`].
pub fn conversation_tree_deferred() -> CodecResult<(Tree, SubTree)> {
    let frames = SubTree::new::<ConversationFrame>("conversation_frame");
    let root = RecordNode::builder::<ConversationData>()
        .field("id", Node::IDENTIFIER, |d: &ConversationData| d.id, |d, v| d.id = v)
        .field(
            "characters",
            Node::list(Node::record(character_node()?))?,
            |d: &ConversationData| d.characters.clone(),
            |d, v| d.characters = v,
        )
        .field(
            "frames",
            Node::list(Node::subtree(&frames))?,
            |d: &ConversationData| d.frames.clone(),
            |d, v| d.frames = v,
        )
        .field(
            "infos",
            Node::list_at_offset(Node::record(info_node()?))?,
            |d: &ConversationData| d.infos.clone(),
            |d, v| d.infos = v,
        )
        .build()?;
    Ok((Tree::new("conversation", root), frames))
}

/// Builds the complete conversation schema.
pub fn conversation_tree() -> CodecResult<Tree> {
    let (tree, frames) = conversation_tree_deferred()?;
    frames.attach(frame_node()?)?;
    Ok(tree)
}
