//! Cinematic tables: the actors, props, sounds and subtitles of a cutscene.

use std::hash::{Hash, Hasher};

use gametable_codec::{
    accumulate_hash, hash_code, record_value, sequence_equals, CodecResult, Identifier, Node,
    RecordNode, Tree, HASH_PRIME_EMPTY, HASH_PRIME_PRESENT,
};
use serde::Serialize;

/// A character taking part in a cinematic.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CinematicCharacter {
    /// Character code.
    pub id: Identifier,
    /// Display name.
    pub name: String,
    /// Model resource.
    pub model: String,
    /// Uniform model scale.
    pub scale: f32,
    /// Behaviour flags.
    pub flags: u32,
}

/// A static prop placed in the scene.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CinematicObject {
    /// Object code.
    pub id: Identifier,
    /// Model resource.
    pub model: String,
    /// Position on the x axis.
    pub x: f32,
    /// Position on the y axis.
    pub y: f32,
    /// Position on the z axis.
    pub z: f32,
    /// Rotation around the vertical axis, in degrees.
    pub rotation: f32,
}

/// A sound cue.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CinematicSound {
    /// Sound code.
    pub id: Identifier,
    /// Audio file.
    pub file: String,
    /// Volume, `0.0..=1.0`.
    pub volume: f32,
    /// Start time in engine ticks.
    pub start_ticks: i64,
}

/// A subtitle line.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CinematicText {
    /// Text code.
    pub id: Identifier,
    /// Subtitle text.
    pub text: String,
    /// Start time in milliseconds.
    pub start_ms: i32,
    /// Display duration in milliseconds.
    pub duration_ms: i32,
}

/// Root record of a cinematic table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CinematicData {
    /// Cinematic code.
    pub id: Identifier,
    /// Content revision.
    pub version: u32,
    /// Characters in the scene.
    pub characters: Vec<CinematicCharacter>,
    /// Props in the scene.
    pub objects: Vec<CinematicObject>,
    /// Sound cues.
    pub sounds: Vec<CinematicSound>,
    /// Subtitles.
    pub texts: Vec<CinematicText>,
}

record_value!(CinematicCharacter, CinematicObject, CinematicSound, CinematicText);

// Floats compare by bit pattern so equality agrees with `Hash` and a decoded
// NaN equals the value that was written.

impl PartialEq for CinematicCharacter {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.model == other.model
            && self.scale.to_bits() == other.scale.to_bits()
            && self.flags == other.flags
    }
}

impl Eq for CinematicCharacter {}

impl PartialEq for CinematicObject {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.model == other.model
            && self.x.to_bits() == other.x.to_bits()
            && self.y.to_bits() == other.y.to_bits()
            && self.z.to_bits() == other.z.to_bits()
            && self.rotation.to_bits() == other.rotation.to_bits()
    }
}

impl Eq for CinematicObject {}

impl PartialEq for CinematicSound {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.file == other.file
            && self.volume.to_bits() == other.volume.to_bits()
            && self.start_ticks == other.start_ticks
    }
}

impl Eq for CinematicSound {}

impl Hash for CinematicCharacter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.name.hash(state);
        self.model.hash(state);
        self.scale.to_bits().hash(state);
        self.flags.hash(state);
    }
}

impl Hash for CinematicObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.model.hash(state);
        for v in [self.x, self.y, self.z, self.rotation] {
            v.to_bits().hash(state);
        }
    }
}

impl Hash for CinematicSound {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.file.hash(state);
        self.volume.to_bits().hash(state);
        self.start_ticks.hash(state);
    }
}

impl Hash for CinematicText {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.text.hash(state);
        self.start_ms.hash(state);
        self.duration_ms.hash(state);
    }
}

impl PartialEq for CinematicData {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.version == other.version
            && sequence_equals(Some(&self.characters[..]), Some(&other.characters[..]))
            && sequence_equals(Some(&self.objects[..]), Some(&other.objects[..]))
            && sequence_equals(Some(&self.sounds[..]), Some(&other.sounds[..]))
            && sequence_equals(Some(&self.texts[..]), Some(&other.texts[..]))
    }
}

impl CinematicData {
    /// Order-sensitive hash of the whole table.
    pub fn content_hash(&self) -> u64 {
        let mut h = hash_code(&(self.id, self.version));
        h = accumulate_hash(h, Some(&self.characters[..]), HASH_PRIME_PRESENT, HASH_PRIME_EMPTY);
        h = accumulate_hash(h, Some(&self.objects[..]), HASH_PRIME_PRESENT, HASH_PRIME_EMPTY);
        h = accumulate_hash(h, Some(&self.sounds[..]), HASH_PRIME_PRESENT, HASH_PRIME_EMPTY);
        accumulate_hash(h, Some(&self.texts[..]), HASH_PRIME_PRESENT, HASH_PRIME_EMPTY)
    }
}

fn character_node() -> CodecResult<RecordNode> {
    RecordNode::builder::<CinematicCharacter>()
        .field("id", Node::IDENTIFIER, |c: &CinematicCharacter| c.id, |c, v| c.id = v)
        .field("name", Node::STRING, |c: &CinematicCharacter| c.name.clone(), |c, v| c.name = v)
        .field("model", Node::STRING, |c: &CinematicCharacter| c.model.clone(), |c, v| c.model = v)
        .field("scale", Node::F32, |c: &CinematicCharacter| c.scale, |c, v| c.scale = v)
        .field("flags", Node::U32, |c: &CinematicCharacter| c.flags, |c, v| c.flags = v)
        .build()
}

fn object_node() -> CodecResult<RecordNode> {
    RecordNode::builder::<CinematicObject>()
        .field("id", Node::IDENTIFIER, |o: &CinematicObject| o.id, |o, v| o.id = v)
        .field("model", Node::STRING, |o: &CinematicObject| o.model.clone(), |o, v| o.model = v)
        .field("x", Node::F32, |o: &CinematicObject| o.x, |o, v| o.x = v)
        .field("y", Node::F32, |o: &CinematicObject| o.y, |o, v| o.y = v)
        .field("z", Node::F32, |o: &CinematicObject| o.z, |o, v| o.z = v)
        .field("rotation", Node::F32, |o: &CinematicObject| o.rotation, |o, v| o.rotation = v)
        .build()
}

fn sound_node() -> CodecResult<RecordNode> {
    RecordNode::builder::<CinematicSound>()
        .field("id", Node::IDENTIFIER, |s: &CinematicSound| s.id, |s, v| s.id = v)
        .field("file", Node::STRING, |s: &CinematicSound| s.file.clone(), |s, v| s.file = v)
        .field("volume", Node::F32, |s: &CinematicSound| s.volume, |s, v| s.volume = v)
        .field("start_ticks", Node::I64, |s: &CinematicSound| s.start_ticks, |s, v| s.start_ticks = v)
        .build()
}

fn text_node() -> CodecResult<RecordNode> {
    RecordNode::builder::<CinematicText>()
        .field("id", Node::IDENTIFIER, |t: &CinematicText| t.id, |t, v| t.id = v)
        .field("text", Node::STRING, |t: &CinematicText| t.text.clone(), |t, v| t.text = v)
        .field("start_ms", Node::I32, |t: &CinematicText| t.start_ms, |t, v| t.start_ms = v)
        .field("duration_ms", Node::I32, |t: &CinematicText| t.duration_ms, |t, v| t.duration_ms = v)
        .build()
}

/// Builds the schema of a cinematic table.
pub fn cinematic_tree() -> CodecResult<Tree> {
    let root = RecordNode::builder::<CinematicData>()
        .field("id", Node::IDENTIFIER, |d: &CinematicData| d.id, |d, v| d.id = v)
        .field("version", Node::U32, |d: &CinematicData| d.version, |d, v| d.version = v)
        .field(
            "characters",
            Node::list(Node::record(character_node()?))?,
            |d: &CinematicData| d.characters.clone(),
            |d, v| d.characters = v,
        )
        .field(
            "objects",
            Node::list(Node::record(object_node()?))?,
            |d: &CinematicData| d.objects.clone(),
            |d, v| d.objects = v,
        )
        .field(
            "sounds",
            Node::list(Node::record(sound_node()?))?,
            |d: &CinematicData| d.sounds.clone(),
            |d, v| d.sounds = v,
        )
        .field(
            "texts",
            Node::list(Node::record(text_node()?))?,
            |d: &CinematicData| d.texts.clone(),
            |d, v| d.texts = v,
        )
        .build()?;
    Ok(Tree::new("cinematic", root))
}
