//! Reencode command implementation.

use gametable_stream::FileStream;
use gametable_tables::TableKind;
use std::path::Path;

/// Runs the reencode command.
///
/// Decodes `input` and writes the table to `output` in canonical layout.
pub fn run(input: &Path, kind: TableKind, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (table, input_len) = super::load_table(input, kind)?;
    let tree = kind.tree()?;

    let mut stream = FileStream::create(output)?;
    table.write(&super::cli_codec(), &tree, &mut stream)?;
    stream.sync()?;
    let output_len = std::fs::metadata(output)?.len();

    tracing::info!(
        table = %kind,
        input_len,
        output_len,
        "reencoded table"
    );
    println!(
        "Reencoded {} table: {} bytes -> {} bytes",
        kind, input_len, output_len
    );
    println!("Written to {:?}", output);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gametable_codec::TableCodec;
    use gametable_tables::{cinematic_tree, AnyTable};
    use gametable_testkit::{sample_cinematic, sample_table, TempTableFile};

    #[test]
    fn reencode_is_identity_on_canonical_input() {
        let table = sample_table(TableKind::Conversation);
        let file = TempTableFile::with_table("in.bin", &table).unwrap();
        let out = file.path().with_file_name("out.bin");

        run(file.path(), TableKind::Conversation, &out).unwrap();
        assert_eq!(std::fs::read(&out).unwrap(), file.bytes());
    }

    #[test]
    fn reencode_drops_trailing_bytes() {
        let tree = cinematic_tree().unwrap();
        let canonical = AnyTable::Cinematic(sample_cinematic())
            .to_bytes(&TableCodec::default(), &tree)
            .unwrap();
        let mut padded = canonical.clone();
        padded.extend_from_slice(&[0xEE; 16]);

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("padded.bin");
        let output = dir.path().join("canonical.bin");
        std::fs::write(&input, &padded).unwrap();

        run(&input, TableKind::Cinematic, &output).unwrap();
        assert_eq!(std::fs::read(&output).unwrap(), canonical);
    }

    #[test]
    fn reencode_reports_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("short.bin");
        std::fs::write(&input, [0u8; 4]).unwrap();
        assert!(run(&input, TableKind::Cinematic, &dir.path().join("out.bin")).is_err());
    }
}
