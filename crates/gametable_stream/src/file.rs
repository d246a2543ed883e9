//! File-backed byte stream.

use crate::error::{StreamError, StreamResult};
use crate::stream::ByteStream;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// A byte stream over an OS file.
///
/// The stream tracks its own cursor and length so that `position` and `len`
/// never touch the file. Every read and write goes straight to the file;
/// callers that write many small pieces should stage them in memory first
/// (the codec writer does).
///
/// # Durability
///
/// - `flush()` calls `File::flush()` to push data to the OS
/// - `sync()` calls `File::sync_all()` to ensure data is on disk
///
/// # Example
///
/// ```no_run
/// use gametable_stream::{ByteStream, FileStream};
/// use std::path::Path;
///
/// let mut stream = FileStream::create(Path::new("cinematic.bin")).unwrap();
/// stream.write_all(b"table bytes").unwrap();
/// stream.sync().unwrap();
/// ```
#[derive(Debug)]
pub struct FileStream {
    path: PathBuf,
    file: File,
    pos: u64,
    len: u64,
}

impl FileStream {
    /// Opens an existing file for reading and writing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be opened.
    pub fn open(path: &Path) -> StreamResult<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::from_file(path, file)
    }

    /// Opens an existing file for reading only.
    ///
    /// Writes on a read-only stream fail with an I/O error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be opened.
    pub fn open_read_only(path: &Path) -> StreamResult<Self> {
        let file = OpenOptions::new().read(true).open(path)?;
        Self::from_file(path, file)
    }

    /// Creates a file, truncating any existing content.
    ///
    /// Parent directories are created if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file cannot
    /// be created.
    pub fn create(path: &Path) -> StreamResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Self::from_file(path, file)
    }

    fn from_file(path: &Path, file: File) -> StreamResult<Self> {
        let len = file.metadata()?.len();
        Ok(Self {
            path: path.to_path_buf(),
            file,
            pos: 0,
            len,
        })
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Syncs all data and metadata to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync operation fails.
    pub fn sync(&mut self) -> StreamResult<()> {
        self.file.sync_all()?;
        Ok(())
    }
}

impl ByteStream for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> StreamResult<usize> {
        if buf.is_empty() || self.pos >= self.len {
            return Ok(0);
        }
        self.file.seek(SeekFrom::Start(self.pos))?;
        let n = self.file.read(buf)?;
        self.pos += n as u64;
        Ok(n)
    }

    fn write_all(&mut self, data: &[u8]) -> StreamResult<()> {
        if data.is_empty() {
            return Ok(());
        }
        self.file.seek(SeekFrom::Start(self.pos))?;
        self.file.write_all(data)?;
        self.pos += data.len() as u64;
        self.len = self.len.max(self.pos);
        Ok(())
    }

    fn seek(&mut self, position: u64) -> StreamResult<()> {
        if position > self.len {
            return Err(StreamError::SeekPastEnd {
                position,
                len: self.len,
            });
        }
        self.pos = position;
        Ok(())
    }

    fn position(&self) -> u64 {
        self.pos
    }

    fn len(&self) -> StreamResult<u64> {
        Ok(self.len)
    }

    fn flush(&mut self) -> StreamResult<()> {
        self.file.flush()?;
        Ok(())
    }
}
