//! Fuzz targets for the table decoders.
//!
//! These can be used with cargo-fuzz or driven by proptest. Every target
//! must return normally for any input; a panic is a bug.

use gametable_codec::{CodecConfig, TableCodec, Tree};
use gametable_stream::MemoryStream;
use gametable_tables::{AnyTable, TableKind};

/// Largest list count accepted while fuzzing.
const FUZZ_MAX_LIST_ELEMENTS: u32 = 4096;

fn fuzz_codec() -> TableCodec {
    TableCodec::new(CodecConfig::new().max_list_elements(FUZZ_MAX_LIST_ELEMENTS))
}

fn decode(kind: TableKind, tree: &Tree, data: &[u8]) -> Option<AnyTable> {
    let mut stream = MemoryStream::with_data(data.to_vec());
    AnyTable::read(&fuzz_codec(), kind, tree, &mut stream).ok()
}

/// Fuzz target for table decoding.
///
/// Arbitrary bytes either decode to a table or produce an error.
pub fn fuzz_table_decode(kind: TableKind, data: &[u8]) {
    let Ok(tree) = kind.tree() else {
        return;
    };
    let _ = decode(kind, &tree, data);
}

/// Fuzz target for decode/encode/decode round trips.
///
/// Anything that decodes must re-encode and decode to the same table.
pub fn fuzz_table_roundtrip(kind: TableKind, data: &[u8]) {
    let Ok(tree) = kind.tree() else {
        return;
    };
    let Some(table) = decode(kind, &tree, data) else {
        return;
    };
    let codec = fuzz_codec();
    let encoded = table
        .to_bytes(&codec, &tree)
        .expect("decoded table must re-encode");
    let decoded = decode(kind, &tree, &encoded).expect("re-encoded table must decode");
    assert_eq!(
        format!("{:?}", table),
        format!("{:?}", decoded),
        "Roundtrip mismatch"
    );
}

/// Runs both targets for every table kind.
pub fn fuzz_all(data: &[u8]) {
    for kind in TableKind::ALL {
        fuzz_table_decode(kind, data);
        fuzz_table_roundtrip(kind, data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_tiny_inputs() {
        fuzz_all(&[]);
        fuzz_all(&[0]);
        fuzz_all(&[0xFF; 7]);
    }

    #[test]
    fn all_zero_input_decodes() {
        // every count and offset is zero: all lists and strings are null
        let data = vec![0u8; 64];
        let tree = TableKind::Conversation.tree().unwrap();
        assert!(decode(TableKind::Conversation, &tree, &data).is_some());
        fuzz_all(&data);
    }

    #[test]
    fn huge_counts_are_rejected_cheaply() {
        let mut data = vec![0u8; 48];
        data[8..12].copy_from_slice(&u32::MAX.to_le_bytes());
        data[12..16].copy_from_slice(&16u32.to_le_bytes());
        fuzz_all(&data);
    }
}
