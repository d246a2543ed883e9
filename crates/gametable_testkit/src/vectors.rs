//! Fixed byte vectors for the table layouts.
//!
//! Each vector pairs a small table with the exact bytes the writer must
//! produce for it. The bytes double as reader input, so a vector pins the
//! layout in both directions.

use gametable_codec::Identifier;
use gametable_tables::{
    AnyTable, CinematicCharacter, CinematicData, ConversationData, ConversationFrame, TableKind,
};

/// A table together with its expected encoding.
#[derive(Debug, Clone)]
pub struct TableVector {
    /// Description of the test case.
    pub description: &'static str,
    /// Kind of the table.
    pub kind: TableKind,
    /// The decoded table.
    pub table: AnyTable,
    /// Expected bytes, hex-encoded; whitespace separates fields.
    pub expected_hex: &'static str,
}

fn ident(s: &str) -> Identifier {
    s.parse().unwrap_or(Identifier::EMPTY)
}

/// Returns the standard table vectors.
#[must_use]
pub fn standard_vectors() -> Vec<TableVector> {
    vec![
        TableVector {
            description: "cinematic with one character and three empty lists",
            kind: TableKind::Cinematic,
            table: AnyTable::Cinematic(CinematicData {
                id: ident("CN01"),
                version: 1,
                characters: vec![CinematicCharacter {
                    id: ident("CARH"),
                    name: "Ca".into(),
                    model: String::new(),
                    scale: 1.0,
                    flags: 2,
                }],
                ..CinematicData::default()
            }),
            expected_hex: "\
                31304e43 01000000 \
                01000000 28000000 \
                00000000 3c000000 \
                00000000 3c000000 \
                00000000 3c000000 \
                48524143 3c000000 40000000 0000803f 02000000 \
                02436100 \
                0000",
        },
        TableVector {
            description: "conversation with one frame and no metadata block",
            kind: TableKind::Conversation,
            table: AnyTable::Conversation(ConversationData {
                id: ident("DLG1"),
                characters: Vec::new(),
                frames: vec![ConversationFrame {
                    index: 0,
                    speaker: ident("GRD1"),
                    text: "Hi".into(),
                    duration: 0.5,
                    next_frames: vec![1],
                }],
                infos: None,
            }),
            expected_hex: "\
                31474c44 \
                00000000 18000000 \
                01000000 18000000 \
                00000000 \
                00000000 31445247 30000000 0000003f 01000000 34000000 \
                02486900 \
                01000000",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::golden::hex_decode;

    #[test]
    fn vectors_decode_to_whole_words() {
        for vector in standard_vectors() {
            let bytes = hex_decode(vector.expected_hex);
            assert!(!bytes.is_empty(), "{}", vector.description);
            assert_eq!(vector.table.kind(), vector.kind);
        }
    }
}
