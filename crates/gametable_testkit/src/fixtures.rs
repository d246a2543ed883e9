//! Sample tables and temporary table files.

use std::path::{Path, PathBuf};

use gametable_codec::{CodecResult, Identifier, TableCodec};
use gametable_stream::{ByteStream, FileStream};
use gametable_tables::{
    AnyTable, CinematicCharacter, CinematicData, CinematicObject, CinematicSound, CinematicText,
    ConversationCharacter, ConversationData, ConversationFrame, ConversationInfo, TableKind,
};
use tempfile::TempDir;

fn ident(s: &str) -> Identifier {
    s.parse().unwrap_or(Identifier::EMPTY)
}

/// A cinematic table with every list populated.
pub fn sample_cinematic() -> CinematicData {
    CinematicData {
        id: ident("END1"),
        version: 2,
        characters: vec![
            CinematicCharacter {
                id: ident("REVN"),
                name: "Revan".into(),
                model: "p_revan".into(),
                scale: 1.0,
                flags: 0x01,
            },
            CinematicCharacter {
                id: ident("HK47"),
                name: "HK-47".into(),
                model: "p_hk47".into(),
                scale: 1.1,
                flags: 0x04,
            },
        ],
        objects: vec![CinematicObject {
            id: ident("CONS"),
            model: "plc_console".into(),
            x: 12.5,
            y: -3.25,
            z: 0.0,
            rotation: 180.0,
        }],
        sounds: vec![CinematicSound {
            id: ident("MUS1"),
            file: "mus_theme".into(),
            volume: 0.75,
            start_ticks: 0,
        }],
        texts: vec![CinematicText {
            id: ident("TX01"),
            text: "Statement: Master.".into(),
            start_ms: 250,
            duration_ms: 2000,
        }],
    }
}

/// A conversation table with branching frames and metadata.
pub fn sample_conversation() -> ConversationData {
    ConversationData {
        id: ident("DANT"),
        characters: vec![
            ConversationCharacter {
                id: ident("JUHN"),
                name: "Juhani".into(),
                portrait: Some("po_juhani".into()),
            },
            ConversationCharacter {
                id: ident("NARR"),
                name: String::new(),
                portrait: None,
            },
        ],
        frames: vec![
            ConversationFrame {
                index: 0,
                speaker: ident("JUHN"),
                text: "You will not pass.".into(),
                duration: 2.5,
                next_frames: vec![1, 2],
            },
            ConversationFrame {
                index: 1,
                speaker: ident("NARR"),
                text: "[Persuade]".into(),
                duration: 0.0,
                next_frames: vec![3],
            },
            ConversationFrame {
                index: 2,
                speaker: ident("NARR"),
                text: "[Attack]".into(),
                duration: 0.0,
                next_frames: Vec::new(),
            },
        ],
        infos: Some(vec![
            ConversationInfo {
                key: ident("AREA"),
                value: "danm14aa".into(),
            },
            ConversationInfo {
                key: ident("CAM"),
                value: String::new(),
            },
        ]),
    }
}

/// The sample table of `kind`.
pub fn sample_table(kind: TableKind) -> AnyTable {
    match kind {
        TableKind::Cinematic => AnyTable::Cinematic(sample_cinematic()),
        TableKind::Conversation => AnyTable::Conversation(sample_conversation()),
    }
}

/// A table file in a temporary directory, removed on drop.
pub struct TempTableFile {
    path: PathBuf,
    _temp_dir: TempDir,
}

impl TempTableFile {
    /// Creates an empty file named `name` in a fresh temporary directory.
    pub fn new(name: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(name);
        FileStream::create(&path).expect("Failed to create table file");
        Self {
            path,
            _temp_dir: temp_dir,
        }
    }

    /// Creates a file holding `table` encoded with the default codec.
    pub fn with_table(name: &str, table: &AnyTable) -> CodecResult<Self> {
        let file = Self::new(name);
        let tree = table.kind().tree()?;
        let mut stream = FileStream::create(&file.path)?;
        table.write(&TableCodec::default(), &tree, &mut stream)?;
        stream.sync()?;
        Ok(file)
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole file.
    pub fn bytes(&self) -> Vec<u8> {
        std::fs::read(&self.path).expect("Failed to read table file")
    }

    /// Opens the file for reading.
    pub fn open(&self) -> FileStream {
        FileStream::open_read_only(&self.path).expect("Failed to open table file")
    }

    /// Reads a table of `kind` from the start of the file.
    pub fn read(&self, kind: TableKind) -> CodecResult<AnyTable> {
        let tree = kind.tree()?;
        let mut stream = self.open();
        stream.seek(0)?;
        AnyTable::read(&TableCodec::default(), kind, &tree, &mut stream)
    }
}
