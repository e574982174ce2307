//! TUS protocol client and resumable upload session.
//!
//! [`TusClient`] performs the four HTTP exchanges of the upload protocol;
//! [`UploadSession`] drives an ordered byte stream through it in bounded
//! chunks with a monotonic offset. Every network call is a single exchange
//! with no internal retries — callers own the retry policy.

mod client;
mod session;
mod source;

pub use client::{TusClient, absolute_resource_url};
pub use session::{DeclaredLength, UploadSession};
pub use source::{ChunkSource, FileSource};

/// Default chunk size: 4 MiB.
///
/// Bounds the body of a single chunk-write request; larger streams are
/// split across as many writes as needed.
pub const DEFAULT_CHUNK_SIZE: usize = 4 * 1024 * 1024;

/// Errors produced by the TUS client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("connection error: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("create failed with status {status}: {body}")]
    CreateFailed { status: u16, body: String },

    #[error("chunk upload failed with status {status}: {body}")]
    ChunkUploadFailed { status: u16, body: String },

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("source is not seekable")]
    NotSeekable,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
