//! Upload error types.

/// Errors produced while driving an upload end to end.
///
/// Every variant aborts the current upload; nothing is retried and no
/// partial-success value is returned.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported path: {0}")]
    UnsupportedPath(String),

    #[error("upload of {size} bytes exceeds server maximum of {max}")]
    SizeLimitExceeded { size: u64, max: u64 },

    #[error("client error: {0}")]
    Client(#[from] tuspack_client::ClientError),

    #[error("archive error: {0}")]
    Archive(#[from] tuspack_archive::ArchiveError),
}
