//! Dump command implementation.

use gametable_tables::{AnyTable, CinematicData, ConversationData, TableKind};
use std::fmt::Write as _;
use std::path::Path;

/// Runs the dump command.
pub fn run(path: &Path, kind: TableKind, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (table, len) = super::load_table(path, kind)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&table)?),
        "text" => {
            println!("Table: {} ({} bytes)", kind, len);
            println!("Content hash: {:016x}", table.content_hash());
            println!();
            print!("{}", render_text(&table));
        }
        other => return Err(format!("Unknown format '{}' (expected text or json)", other).into()),
    }

    Ok(())
}

/// Renders a table as indented text.
pub fn render_text(table: &AnyTable) -> String {
    let mut out = String::new();
    match table {
        AnyTable::Cinematic(data) => render_cinematic(&mut out, data),
        AnyTable::Conversation(data) => render_conversation(&mut out, data),
    }
    out
}

fn render_cinematic(out: &mut String, data: &CinematicData) {
    let _ = writeln!(out, "id: {} (0x{:08x})", data.id, data.id.value());
    let _ = writeln!(out, "version: {}", data.version);

    let _ = writeln!(out, "characters: {}", data.characters.len());
    for c in &data.characters {
        let _ = writeln!(
            out,
            "  [{}] {:?} model={:?} scale={} flags=0x{:x}",
            c.id, c.name, c.model, c.scale, c.flags
        );
    }

    let _ = writeln!(out, "objects: {}", data.objects.len());
    for o in &data.objects {
        let _ = writeln!(
            out,
            "  [{}] {:?} at ({}, {}, {}) rot={}",
            o.id, o.model, o.x, o.y, o.z, o.rotation
        );
    }

    let _ = writeln!(out, "sounds: {}", data.sounds.len());
    for s in &data.sounds {
        let _ = writeln!(
            out,
            "  [{}] {:?} volume={} start={}",
            s.id, s.file, s.volume, s.start_ticks
        );
    }

    let _ = writeln!(out, "texts: {}", data.texts.len());
    for t in &data.texts {
        let _ = writeln!(
            out,
            "  [{}] {:?} {}ms +{}ms",
            t.id, t.text, t.start_ms, t.duration_ms
        );
    }
}

fn render_conversation(out: &mut String, data: &ConversationData) {
    let _ = writeln!(out, "id: {} (0x{:08x})", data.id, data.id.value());

    let _ = writeln!(out, "characters: {}", data.characters.len());
    for c in &data.characters {
        match &c.portrait {
            Some(portrait) => {
                let _ = writeln!(out, "  [{}] {:?} portrait={:?}", c.id, c.name, portrait);
            }
            None => {
                let _ = writeln!(out, "  [{}] {:?} portrait=<null>", c.id, c.name);
            }
        }
    }

    let _ = writeln!(out, "frames: {}", data.frames.len());
    for f in &data.frames {
        let next: Vec<String> = f.next_frames.iter().map(ToString::to_string).collect();
        let _ = writeln!(
            out,
            "  #{} [{}] {:?} {}s -> [{}]",
            f.index,
            f.speaker,
            f.text,
            f.duration,
            next.join(", ")
        );
    }

    match &data.infos {
        Some(infos) => {
            let _ = writeln!(out, "infos: {}", infos.len());
            for info in infos {
                let _ = writeln!(out, "  {} = {:?}", info.key, info.value);
            }
        }
        None => {
            let _ = writeln!(out, "infos: <null>");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gametable_testkit::{sample_table, TempTableFile};

    #[test]
    fn render_lists_every_section() {
        let text = render_text(&sample_table(TableKind::Cinematic));
        for section in ["id:", "version:", "characters:", "objects:", "sounds:", "texts:"] {
            assert!(text.contains(section), "missing {section} in\n{text}");
        }
    }

    #[test]
    fn render_marks_null_infos() {
        let table = AnyTable::Conversation(ConversationData::default());
        let text = render_text(&table);
        assert!(text.contains("infos: <null>"));
        assert!(text.contains("frames: 0"));
    }

    #[test]
    fn dump_file_in_both_formats() {
        let file =
            TempTableFile::with_table("dump.bin", &sample_table(TableKind::Conversation)).unwrap();
        run(file.path(), TableKind::Conversation, "text").unwrap();
        run(file.path(), TableKind::Conversation, "json").unwrap();
        assert!(run(file.path(), TableKind::Conversation, "yaml").is_err());
    }

    #[test]
    fn dump_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.bin");
        assert!(run(&missing, TableKind::Cinematic, "text").is_err());
    }
}
