//! Directory scanning for archive construction.
//!
//! Recursively walks a directory and records per-file metadata with stat
//! calls only — no file content is read. Relative paths are normalized to
//! forward slashes. Enumeration order is whatever the filesystem walk
//! yields; it is not guaranteed stable across platforms or runs.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::ArchiveError;
use crate::header::{MAX_OCTAL_11, NAME_LEN};

/// Metadata for one regular file found under the archive root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    /// Path relative to the archive root, `/`-separated.
    pub relative_path: String,
    /// Absolute path used for lazy content reads.
    pub abs_path: PathBuf,
    /// Exact size in bytes at scan time.
    pub size: u64,
    /// Modification time as seconds since the Unix epoch.
    pub mtime: u64,
    /// Permission bits for the archive entry header.
    pub mode: u32,
}

/// Scans `root` recursively and returns metadata for every regular file.
///
/// Entry names that do not fit the ustar name field and files too large for
/// its size field are rejected here, before any header is encoded.
pub fn scan_dir(root: &Path) -> Result<Vec<FileMeta>, ArchiveError> {
    let mut files = Vec::new();
    walk_dir(root, root, &mut files)?;
    Ok(files)
}

fn walk_dir(root: &Path, current: &Path, files: &mut Vec<FileMeta>) -> Result<(), ArchiveError> {
    let entries = std::fs::read_dir(current)?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let metadata = entry.metadata()?;

        if metadata.is_dir() {
            walk_dir(root, &path, files)?;
        } else if metadata.is_file() {
            let rel_path = path.strip_prefix(root).map_err(std::io::Error::other)?;

            // Normalize to forward slashes.
            let rel_str = rel_path.to_string_lossy().replace('\\', "/");
            if rel_str.len() > NAME_LEN {
                return Err(ArchiveError::NameTooLong(rel_str));
            }

            let size = metadata.len();
            if size > MAX_OCTAL_11 {
                return Err(ArchiveError::FileTooLarge(rel_str));
            }

            files.push(FileMeta {
                relative_path: rel_str,
                abs_path: path,
                size,
                mtime: file_mtime(&metadata),
                mode: file_mode(&metadata),
            });
        }
    }

    Ok(())
}

fn file_mtime(metadata: &std::fs::Metadata) -> u64 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(unix)]
fn file_mode(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn file_mode(_metadata: &std::fs::Metadata) -> u32 {
    0o644
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        fs::write(root.join("metadata.yaml"), b"frames: 12\n").unwrap();
        fs::write(root.join("frame0.bin"), vec![1u8; 600]).unwrap();

        fs::create_dir_all(root.join("extra").join("deep")).unwrap();
        fs::write(root.join("extra").join("deep").join("notes.txt"), b"hi").unwrap();

        dir
    }

    #[test]
    fn scan_finds_all_files() {
        let dir = create_test_tree();
        let files = scan_dir(dir.path()).unwrap();

        assert_eq!(files.len(), 3);
        let paths: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert!(paths.contains(&"metadata.yaml"));
        assert!(paths.contains(&"frame0.bin"));
        assert!(paths.contains(&"extra/deep/notes.txt"));
    }

    #[test]
    fn scan_records_sizes() {
        let dir = create_test_tree();
        let files = scan_dir(dir.path()).unwrap();
        let frame = files
            .iter()
            .find(|f| f.relative_path == "frame0.bin")
            .unwrap();
        assert_eq!(frame.size, 600);
    }

    #[test]
    fn scan_empty_dir() {
        let dir = TempDir::new().unwrap();
        let files = scan_dir(dir.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn scan_nonexistent_dir() {
        let result = scan_dir(Path::new("/nonexistent/path/that/does/not/exist"));
        assert!(matches!(result, Err(ArchiveError::Io(_))));
    }

    #[test]
    fn scan_rejects_overlong_names() {
        let dir = TempDir::new().unwrap();
        let long_name = "x".repeat(120);
        fs::write(dir.path().join(&long_name), b"data").unwrap();

        let result = scan_dir(dir.path());
        assert!(matches!(result, Err(ArchiveError::NameTooLong(_))));
    }
}
