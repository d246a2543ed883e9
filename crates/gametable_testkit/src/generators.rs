//! Property-based test generators using proptest.
//!
//! Generated tables only contain values the writer accepts: strings are
//! printable ASCII of at most 255 bytes. Floats include NaN, infinities and
//! negative zero, which round-trip bit for bit.

use gametable_codec::Identifier;
use gametable_tables::{
    AnyTable, CinematicCharacter, CinematicData, CinematicObject, CinematicSound, CinematicText,
    ConversationCharacter, ConversationData, ConversationFrame, ConversationInfo,
};
use proptest::prelude::*;

/// Strategy for identifiers over the full `u32` range.
pub fn identifier_strategy() -> impl Strategy<Value = Identifier> {
    any::<u32>().prop_map(Identifier::from_int)
}

/// Strategy for identifiers whose bytes all have a character projection.
pub fn printable_identifier_strategy() -> impl Strategy<Value = Identifier> {
    prop::array::uniform4(0x20u8..=0x7A).prop_map(Identifier::from_bytes)
}

/// Strategy for strings the writer can encode.
pub fn ascii_string_strategy(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(0x20u8..0x7F, 0..=max_len.min(255))
        .prop_map(|bytes| bytes.into_iter().map(char::from).collect())
}

/// Strategy for floats, weighted towards ordinary values.
pub fn f32_strategy() -> impl Strategy<Value = f32> {
    prop_oneof![
        6 => -1.0e6f32..1.0e6f32,
        1 => prop::sample::select(vec![f32::NAN, -0.0, f32::INFINITY, f32::NEG_INFINITY]),
        1 => any::<u32>().prop_map(f32::from_bits),
    ]
}

/// Strategy for arbitrary bytes, used as corrupt input.
pub fn corrupt_bytes_strategy(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..max_len)
}

/// Strategy for cinematic characters.
pub fn cinematic_character_strategy() -> impl Strategy<Value = CinematicCharacter> {
    (
        identifier_strategy(),
        ascii_string_strategy(32),
        ascii_string_strategy(16),
        f32_strategy(),
        any::<u32>(),
    )
        .prop_map(|(id, name, model, scale, flags)| CinematicCharacter {
            id,
            name,
            model,
            scale,
            flags,
        })
}

/// Strategy for cinematic objects.
pub fn cinematic_object_strategy() -> impl Strategy<Value = CinematicObject> {
    (
        identifier_strategy(),
        ascii_string_strategy(16),
        prop::array::uniform4(f32_strategy()),
    )
        .prop_map(|(id, model, [x, y, z, rotation])| CinematicObject {
            id,
            model,
            x,
            y,
            z,
            rotation,
        })
}

/// Strategy for cinematic sounds.
pub fn cinematic_sound_strategy() -> impl Strategy<Value = CinematicSound> {
    (
        identifier_strategy(),
        ascii_string_strategy(16),
        f32_strategy(),
        any::<i64>(),
    )
        .prop_map(|(id, file, volume, start_ticks)| CinematicSound {
            id,
            file,
            volume,
            start_ticks,
        })
}

/// Strategy for cinematic subtitles.
pub fn cinematic_text_strategy() -> impl Strategy<Value = CinematicText> {
    (
        identifier_strategy(),
        ascii_string_strategy(255),
        any::<i32>(),
        any::<i32>(),
    )
        .prop_map(|(id, text, start_ms, duration_ms)| CinematicText {
            id,
            text,
            start_ms,
            duration_ms,
        })
}

/// Strategy for whole cinematic tables.
pub fn cinematic_strategy() -> impl Strategy<Value = CinematicData> {
    (
        identifier_strategy(),
        any::<u32>(),
        prop::collection::vec(cinematic_character_strategy(), 0..4),
        prop::collection::vec(cinematic_object_strategy(), 0..4),
        prop::collection::vec(cinematic_sound_strategy(), 0..4),
        prop::collection::vec(cinematic_text_strategy(), 0..4),
    )
        .prop_map(
            |(id, version, characters, objects, sounds, texts)| CinematicData {
                id,
                version,
                characters,
                objects,
                sounds,
                texts,
            },
        )
}

/// Strategy for conversation speakers.
pub fn conversation_character_strategy() -> impl Strategy<Value = ConversationCharacter> {
    (
        identifier_strategy(),
        ascii_string_strategy(32),
        prop::option::of(ascii_string_strategy(16)),
    )
        .prop_map(|(id, name, portrait)| ConversationCharacter { id, name, portrait })
}

/// Strategy for conversation frames.
pub fn conversation_frame_strategy() -> impl Strategy<Value = ConversationFrame> {
    (
        any::<i32>(),
        identifier_strategy(),
        ascii_string_strategy(64),
        f32_strategy(),
        prop::collection::vec(any::<i32>(), 0..4),
    )
        .prop_map(
            |(index, speaker, text, duration, next_frames)| ConversationFrame {
                index,
                speaker,
                text,
                duration,
                next_frames,
            },
        )
}

/// Strategy for conversation metadata entries.
pub fn conversation_info_strategy() -> impl Strategy<Value = ConversationInfo> {
    (identifier_strategy(), ascii_string_strategy(32))
        .prop_map(|(key, value)| ConversationInfo { key, value })
}

/// Strategy for whole conversation tables.
pub fn conversation_strategy() -> impl Strategy<Value = ConversationData> {
    (
        identifier_strategy(),
        prop::collection::vec(conversation_character_strategy(), 0..4),
        prop::collection::vec(conversation_frame_strategy(), 0..6),
        prop::option::of(prop::collection::vec(conversation_info_strategy(), 0..3)),
    )
        .prop_map(|(id, characters, frames, infos)| ConversationData {
            id,
            characters,
            frames,
            infos,
        })
}

/// Strategy for a table of either kind.
pub fn any_table_strategy() -> impl Strategy<Value = AnyTable> {
    prop_oneof![
        cinematic_strategy().prop_map(AnyTable::Cinematic),
        conversation_strategy().prop_map(AnyTable::Conversation),
    ]
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
