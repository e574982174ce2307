//! Virtual tar archive builder for streaming directory uploads.
//!
//! Walks a directory and presents its contents as an ordered sequence of
//! byte segments — one USTAR header block per file, the file's content, then
//! zero padding to the next 512-byte boundary — without ever materializing
//! the archive on disk. File content is only referenced, never buffered;
//! consumers read it lazily while sending.
//!
//! The end-of-archive terminator (two zero blocks) is intentionally never
//! produced: the stream is a valid prefix of a tar archive and the receiving
//! server is expected to complete or tolerate it.

mod builder;
mod header;
mod scan;

pub use builder::{ArchiveBuilder, Segment, SegmentIter, padding_for};
pub use header::{BLOCK_SIZE, encode_header};
pub use scan::{FileMeta, scan_dir};

/// Errors produced while building a virtual archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("entry name too long for a ustar header: {0}")]
    NameTooLong(String),

    #[error("file too large for a ustar size field: {0}")]
    FileTooLarge(String),
}
