//! End-to-end upload flow.
//!
//! [`Uploader`] classifies a caller-supplied path, negotiates the server
//! size limit, and drives either a single-file transfer or a packaged
//! directory transfer through the client crate. [`UploadState`] is the
//! thread-safe progress container a polling front-end reads while a worker
//! runs the transfer.

mod error;
mod state;
mod uploader;

pub use error::UploadError;
pub use state::{UploadState, UploadStatus};
pub use uploader::{ARCHIVE_NAME, SENTINEL_FILE, Uploader};
