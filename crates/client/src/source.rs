//! Chunked byte sources for upload sessions.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// An ordered byte stream read in bounded chunks.
///
/// Implementations that cannot reposition return an `Unsupported` I/O error
/// from [`seek_to`](Self::seek_to) and report it via
/// [`is_seekable`](Self::is_seekable).
pub trait ChunkSource {
    /// Reads the next block of at most `max` bytes. `None` at end of stream.
    fn next_chunk(&mut self, max: usize) -> std::io::Result<Option<Vec<u8>>>;

    /// Repositions the source to an absolute byte offset.
    fn seek_to(&mut self, offset: u64) -> std::io::Result<()>;

    /// Whether the source supports repositioning.
    fn is_seekable(&self) -> bool {
        true
    }
}

/// Reads a file in bounded chunks with seek support.
pub struct FileSource {
    file: File,
    size: u64,
    offset: u64,
}

impl FileSource {
    /// Opens `path` for chunked reading.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        Ok(Self {
            file,
            size,
            offset: 0,
        })
    }

    /// Total file size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Current byte offset.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Bytes remaining to read.
    pub fn remaining(&self) -> u64 {
        self.size - self.offset
    }
}

impl ChunkSource for FileSource {
    fn next_chunk(&mut self, max: usize) -> std::io::Result<Option<Vec<u8>>> {
        let remaining = self.size.saturating_sub(self.offset);
        if remaining == 0 {
            return Ok(None);
        }

        let read_size = remaining.min(max as u64) as usize;
        let mut buf = vec![0u8; read_size];
        let n = self.file.read(&mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        buf.truncate(n);
        self.offset += n as u64;
        Ok(Some(buf))
    }

    fn seek_to(&mut self, offset: u64) -> std::io::Result<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.offset = offset;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, name: &str, data: &[u8]) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn reads_whole_file_in_chunks() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(dir.path(), "test.bin", b"AABBCCDDEE");

        let mut source = FileSource::open(&path).unwrap();
        assert_eq!(source.size(), 10);
        assert_eq!(source.remaining(), 10);

        assert_eq!(source.next_chunk(4).unwrap().unwrap(), b"AABB");
        assert_eq!(source.next_chunk(4).unwrap().unwrap(), b"CCDD");
        assert_eq!(source.next_chunk(4).unwrap().unwrap(), b"EE");
        assert!(source.next_chunk(4).unwrap().is_none());
        assert_eq!(source.offset(), 10);
    }

    #[test]
    fn seek_and_resume() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(dir.path(), "test.bin", b"0123456789");

        let mut source = FileSource::open(&path).unwrap();
        source.seek_to(6).unwrap();
        assert_eq!(source.offset(), 6);
        assert_eq!(source.remaining(), 4);

        assert_eq!(source.next_chunk(8).unwrap().unwrap(), b"6789");
        assert!(source.next_chunk(8).unwrap().is_none());
    }

    #[test]
    fn empty_file_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(dir.path(), "empty.bin", b"");

        let mut source = FileSource::open(&path).unwrap();
        assert!(source.next_chunk(1024).unwrap().is_none());
    }

    #[test]
    fn file_source_reports_seekable() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(dir.path(), "x.bin", b"x");
        let source = FileSource::open(&path).unwrap();
        assert!(source.is_seekable());
    }
}
