//! Lazy segment stream over a scanned directory.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::ArchiveError;
use crate::header::{BLOCK_SIZE, encode_header};
use crate::scan::{FileMeta, scan_dir};

/// One atomic unit of the virtual archive stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Encoded 512-byte archive entry header.
    Header(Vec<u8>),
    /// Reference to a source file's content, read lazily by the consumer.
    Content { path: PathBuf, size: u64 },
    /// Run of zero bytes aligning the entry to the next block boundary.
    Padding(u64),
}

impl Segment {
    /// Length in bytes this segment contributes to the stream.
    pub fn len(&self) -> u64 {
        match self {
            Segment::Header(block) => block.len() as u64,
            Segment::Content { size, .. } => *size,
            Segment::Padding(len) => *len,
        }
    }

    /// Returns `true` for a zero-length segment.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Zero padding needed to align `size` to the next block boundary.
pub fn padding_for(size: u64) -> u64 {
    (BLOCK_SIZE - size % BLOCK_SIZE) % BLOCK_SIZE
}

/// Streams a directory's contents as a tar-format archive prefix.
///
/// Construction performs a metadata-only scan and fixes the exact total
/// byte count; [`segments`](Self::segments) then yields the stream lazily,
/// in per-file Header → Content → Padding order. The end-of-archive
/// terminator blocks are never yielded.
pub struct ArchiveBuilder {
    files: Vec<FileMeta>,
    total_size: u64,
}

impl ArchiveBuilder {
    /// Scans `root` and computes the archive size from stat data alone.
    pub fn from_dir(root: &Path) -> Result<Self, ArchiveError> {
        if !root.is_dir() {
            return Err(ArchiveError::NotADirectory(root.display().to_string()));
        }

        let files = scan_dir(root)?;
        let total_size = files
            .iter()
            .map(|f| BLOCK_SIZE + f.size + padding_for(f.size))
            .sum();

        debug!(
            root = %root.display(),
            files = files.len(),
            total_size,
            "scanned archive root"
        );

        Ok(Self { files, total_size })
    }

    /// Exact byte count of the full segment stream.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Number of files the archive will contain.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Lazily yields segments in archive order.
    pub fn segments(&self) -> SegmentIter<'_> {
        SegmentIter {
            files: &self.files,
            index: 0,
            stage: Stage::Header,
        }
    }
}

#[derive(Clone, Copy)]
enum Stage {
    Header,
    Content,
    Padding,
}

/// Iterator over a builder's segment stream.
pub struct SegmentIter<'a> {
    files: &'a [FileMeta],
    index: usize,
    stage: Stage,
}

impl Iterator for SegmentIter<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        loop {
            let file = self.files.get(self.index)?;

            match self.stage {
                Stage::Header => {
                    self.stage = Stage::Content;
                    let block =
                        encode_header(&file.relative_path, file.size, file.mtime, file.mode);
                    return Some(Segment::Header(block));
                }
                Stage::Content => {
                    self.stage = Stage::Padding;
                    return Some(Segment::Content {
                        path: file.abs_path.clone(),
                        size: file.size,
                    });
                }
                Stage::Padding => {
                    let pad = padding_for(file.size);
                    self.index += 1;
                    self.stage = Stage::Header;
                    if pad > 0 {
                        return Some(Segment::Padding(pad));
                    }
                    // Aligned file: no padding segment, continue to the next file.
                }
            }
        }
    }
}
