//! Benchmark utilities.

use gametable_codec::Identifier;
use gametable_tables::{
    CinematicCharacter, CinematicData, CinematicObject, CinematicSound, CinematicText,
    ConversationCharacter, ConversationData, ConversationFrame, ConversationInfo,
};
use rand::Rng;

/// Generate a random ASCII string of `len` printable characters.
pub fn random_ascii(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| char::from(rng.gen_range(0x20u8..0x7F))).collect()
}

/// Generate a random identifier.
pub fn random_identifier() -> Identifier {
    Identifier::from_int(rand::thread_rng().gen())
}

/// Generate a cinematic table with `count` entries in every list.
pub fn cinematic_table(count: usize) -> CinematicData {
    let mut rng = rand::thread_rng();
    CinematicData {
        id: random_identifier(),
        version: 1,
        characters: (0..count)
            .map(|_| CinematicCharacter {
                id: random_identifier(),
                name: random_ascii(12),
                model: random_ascii(24),
                scale: rng.gen_range(0.5..2.0),
                flags: rng.gen(),
            })
            .collect(),
        objects: (0..count)
            .map(|_| CinematicObject {
                id: random_identifier(),
                model: random_ascii(24),
                x: rng.gen(),
                y: rng.gen(),
                z: rng.gen(),
                rotation: rng.gen_range(0.0..360.0),
            })
            .collect(),
        sounds: (0..count)
            .map(|_| CinematicSound {
                id: random_identifier(),
                file: random_ascii(32),
                volume: rng.gen(),
                start_ticks: rng.gen_range(0..1_000_000),
            })
            .collect(),
        texts: (0..count)
            .map(|i| CinematicText {
                id: random_identifier(),
                text: random_ascii(64),
                start_ms: i as i32 * 1000,
                duration_ms: 900,
            })
            .collect(),
    }
}

/// Generate a conversation table with `frames` frames, each linking to the
/// next few.
pub fn conversation_table(frames: usize) -> ConversationData {
    let mut rng = rand::thread_rng();
    ConversationData {
        id: random_identifier(),
        characters: (0..4)
            .map(|i| ConversationCharacter {
                id: random_identifier(),
                name: random_ascii(10),
                portrait: (i % 2 == 0).then(|| random_ascii(20)),
            })
            .collect(),
        frames: (0..frames)
            .map(|i| ConversationFrame {
                index: i as i32,
                speaker: random_identifier(),
                text: random_ascii(80),
                duration: rng.gen_range(1.0..5.0),
                next_frames: (1..=3).map(|d| (i + d) as i32).collect(),
            })
            .collect(),
        infos: Some(
            (0..8)
                .map(|_| ConversationInfo {
                    key: random_identifier(),
                    value: random_ascii(16),
                })
                .collect(),
        ),
    }
}
