//! CLI command implementations.

pub mod dump;
pub mod ident;
pub mod reencode;
pub mod verify;

use gametable_codec::{CodecConfig, TableCodec};
use gametable_stream::{ByteStream, FileStream};
use gametable_tables::{AnyTable, TableKind};
use std::path::Path;

/// Opens `path` read-only and decodes a `kind` table from its start.
///
/// Returns the table and the file length.
pub(crate) fn load_table(
    path: &Path,
    kind: TableKind,
) -> Result<(AnyTable, u64), Box<dyn std::error::Error>> {
    let tree = kind.tree()?;
    let mut stream = FileStream::open_read_only(path)?;
    let len = stream.len()?;
    tracing::debug!(path = ?path, table = %kind, len, "loading table");

    let table = AnyTable::read(&cli_codec(), kind, &tree, &mut stream)?;
    Ok((table, len))
}

/// Codec used by every command: default limits, strict terminators.
pub(crate) fn cli_codec() -> TableCodec {
    TableCodec::new(CodecConfig::new().strict_terminators(true))
}
