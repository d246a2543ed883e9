//! Whole-table read and write entry points.

use std::any::Any;

use gametable_stream::{ByteStream, MemoryStream};

use crate::config::CodecConfig;
use crate::error::{CodecError, CodecResult};
use crate::reader::TableReader;
use crate::tree::Tree;
use crate::writer::{flush_to, TableWriter};

/// Reads and writes whole tables with a fixed configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableCodec {
    config: CodecConfig,
}

impl TableCodec {
    /// Creates a codec with the given configuration.
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Reads one table instance starting at the stream's current position.
    ///
    /// On success the cursor is left right after the table's fixed region.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `tree` does not describe `T`, or references a
    ///   sub-tree that is not attached. Checked before any byte is read.
    /// - `TruncatedInput`, `InvalidOffset`, `ListTooLong` or
    ///   `InvalidString` for malformed input.
    pub fn read<T, S>(&self, stream: &mut S, tree: &Tree) -> CodecResult<T>
    where
        T: Any,
        S: ByteStream + ?Sized,
    {
        check_tree::<T>(tree)?;
        let start = stream.position();
        let mut reader = TableReader::new(stream, self.config)?;
        let instance = reader.read_record(tree.root())?;
        let instance = instance.downcast::<T>().map_err(|_| {
            CodecError::invalid_argument(format!("tree '{}' built a different type", tree.name()))
        })?;
        tracing::debug!(
            table = tree.name(),
            start,
            fixed_size = tree.fixed_size(),
            "read table"
        );
        Ok(*instance)
    }

    /// Writes one table instance at the stream's current position.
    ///
    /// The whole table is encoded before anything reaches the stream, so
    /// argument and encoding errors leave the stream untouched. A failing
    /// stream may still leave partial output behind.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `tree` does not describe `T` or references an
    ///   unattached sub-tree.
    /// - `EncodingFailed` if a value cannot be represented.
    /// - `Stream` if the stream fails.
    pub fn write<T, S>(&self, stream: &mut S, tree: &Tree, instance: &T) -> CodecResult<()>
    where
        T: Any,
        S: ByteStream + ?Sized,
    {
        let bytes = self.encode(tree, instance, stream.position())?;
        flush_to(stream, &bytes)?;
        tracing::debug!(table = tree.name(), len = bytes.len(), "wrote table");
        Ok(())
    }

    /// Encodes `instance` as if written at stream position 0.
    pub fn to_bytes<T: Any>(&self, tree: &Tree, instance: &T) -> CodecResult<Vec<u8>> {
        self.encode(tree, instance, 0)
    }

    /// Decodes one instance from the start of `bytes`.
    pub fn from_bytes<T: Any>(&self, tree: &Tree, bytes: &[u8]) -> CodecResult<T> {
        let mut stream = MemoryStream::with_data(bytes.to_vec());
        self.read(&mut stream, tree)
    }

    fn encode<T: Any>(&self, tree: &Tree, instance: &T, base: u64) -> CodecResult<Vec<u8>> {
        check_tree::<T>(tree)?;
        let mut writer = TableWriter::new(base);
        writer.write_record(tree.root(), instance)?;
        writer.finish()
    }
}

fn check_tree<T: Any>(tree: &Tree) -> CodecResult<()> {
    tree.check_root::<T>()?;
    let missing = tree.unresolved();
    if !missing.is_empty() {
        return Err(CodecError::invalid_argument(format!(
            "tree '{}' has unattached sub-trees: {}",
            tree.name(),
            missing.join(", ")
        )));
    }
    Ok(())
}

/// Reads one table instance with the default configuration.
pub fn read_table<T: Any, S: ByteStream + ?Sized>(stream: &mut S, tree: &Tree) -> CodecResult<T> {
    TableCodec::default().read(stream, tree)
}

/// Writes one table instance with the default configuration.
pub fn write_table<T: Any, S: ByteStream + ?Sized>(
    stream: &mut S,
    tree: &Tree,
    instance: &T,
) -> CodecResult<()> {
    TableCodec::default().write(stream, tree, instance)
}

/// Encodes a table instance into a new buffer.
pub fn to_bytes<T: Any>(tree: &Tree, instance: &T) -> CodecResult<Vec<u8>> {
    TableCodec::default().to_bytes(tree, instance)
}

/// Decodes a table instance from a buffer.
pub fn from_bytes<T: Any>(tree: &Tree, bytes: &[u8]) -> CodecResult<T> {
    TableCodec::default().from_bytes(tree, bytes)
}
