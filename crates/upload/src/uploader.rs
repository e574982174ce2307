//! Upload orchestration.
//!
//! Classifies the input path, enforces the server size limit before any
//! resource is created, and drives the transfer: whole files as
//! fixed-length resources, sentinel-marked directories as deferred-length
//! virtual tar streams.

use std::path::Path;

use tracing::{debug, info};

use tuspack_archive::{ArchiveBuilder, Segment};
use tuspack_client::{
    ChunkSource, DEFAULT_CHUNK_SIZE, DeclaredLength, FileSource, TusClient, UploadSession,
};
use tuspack_protocol::Endpoint;

use crate::error::UploadError;

/// Marker file identifying a directory as a packageable unit.
pub const SENTINEL_FILE: &str = "metadata.yaml";

/// Fixed resource name used for packaged directories.
pub const ARCHIVE_NAME: &str = "imgstore.tar";

/// Drives single-file and packaged-directory uploads against one endpoint.
pub struct Uploader {
    client: TusClient,
    endpoint: Endpoint,
    chunk_size: usize,
}

impl Uploader {
    /// Creates an uploader with the default 4 MiB chunk size.
    pub fn new(endpoint: Endpoint) -> Result<Self, UploadError> {
        Ok(Self {
            client: TusClient::new()?,
            endpoint,
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    /// Overrides the chunk size. A zero value keeps the default.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        if chunk_size > 0 {
            self.chunk_size = chunk_size;
        }
        self
    }

    /// The endpoint this uploader talks to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Probes the endpoint and returns the advertised maximum size.
    ///
    /// Front-ends call this from their Connect action as a credential
    /// check. The result is not cached; each upload probes again on its
    /// own.
    pub async fn check_connectivity(&self) -> Result<u64, UploadError> {
        let max = self
            .client
            .probe_max_size(&self.endpoint.url, &self.endpoint.headers)
            .await?;
        debug!(max, "connectivity probe");
        Ok(max)
    }

    /// Classifies `path` and runs the matching upload mode.
    ///
    /// A regular file named `metadata.yaml` uploads its parent directory as
    /// an archive; any other regular file uploads as-is; a directory must
    /// contain the sentinel file directly. `on_progress` receives fractions
    /// in [0, 1] after every chunk write.
    pub async fn upload<F>(&self, path: &Path, on_progress: F) -> Result<(), UploadError>
    where
        F: FnMut(f64),
    {
        let path = path
            .canonicalize()
            .map_err(|_| UploadError::UnsupportedPath(path.display().to_string()))?;
        let meta = std::fs::metadata(&path)
            .map_err(|_| UploadError::UnsupportedPath(path.display().to_string()))?;

        if meta.is_file() {
            if path.file_name() == Some(std::ffi::OsStr::new(SENTINEL_FILE)) {
                let root = path
                    .parent()
                    .ok_or_else(|| UploadError::UnsupportedPath(path.display().to_string()))?;
                self.upload_directory(root, on_progress).await
            } else {
                self.upload_file(&path, on_progress).await
            }
        } else if meta.is_dir() {
            if path.join(SENTINEL_FILE).is_file() {
                self.upload_directory(&path, on_progress).await
            } else {
                Err(UploadError::UnsupportedPath(path.display().to_string()))
            }
        } else {
            Err(UploadError::UnsupportedPath(path.display().to_string()))
        }
    }

    /// Uploads one file as a fixed-length resource named after its base name.
    async fn upload_file<F>(&self, path: &Path, mut on_progress: F) -> Result<(), UploadError>
    where
        F: FnMut(f64),
    {
        let size = std::fs::metadata(path)?.len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| UploadError::UnsupportedPath(path.display().to_string()))?;

        info!(path = %path.display(), size, "uploading single file");
        self.check_size(size).await?;

        let resource = self
            .client
            .create(
                &self.endpoint.url,
                &name,
                Some(size),
                &self.endpoint.headers,
                &self.endpoint.metadata,
            )
            .await?;

        let mut session = UploadSession::new(
            &self.client,
            resource,
            DeclaredLength::Fixed(size),
            self.endpoint.headers.clone(),
        );
        let mut source = FileSource::open(path)?;

        // Always a fresh transfer from offset 0; any existing server-side
        // offset for the resource is deliberately ignored for single files.
        session
            .send_all(&mut source, self.chunk_size, 0, |sent| {
                if size > 0 {
                    on_progress(sent as f64 / size as f64);
                }
            })
            .await?;

        Ok(())
    }

    /// Streams a directory as a deferred-length virtual tar archive.
    async fn upload_directory<F>(&self, root: &Path, mut on_progress: F) -> Result<(), UploadError>
    where
        F: FnMut(f64),
    {
        let builder = ArchiveBuilder::from_dir(root)?;
        let total = builder.total_size();
        info!(
            root = %root.display(),
            files = builder.file_count(),
            total,
            "uploading packaged directory"
        );

        self.check_size(total).await?;

        let resource = self
            .client
            .create(
                &self.endpoint.url,
                ARCHIVE_NAME,
                None,
                &self.endpoint.headers,
                &self.endpoint.metadata,
            )
            .await?;

        let mut session = UploadSession::new(
            &self.client,
            resource,
            DeclaredLength::Deferred,
            self.endpoint.headers.clone(),
        );

        for segment in builder.segments() {
            match segment {
                // Header and padding blocks go out whole, regardless of the
                // configured chunk size; only file content is sub-chunked.
                Segment::Header(block) => {
                    let offset = session.send_chunk(block).await?;
                    report_archive_progress(offset, total, &mut on_progress);
                }
                Segment::Content { path, .. } => {
                    let mut source = FileSource::open(&path)?;
                    while let Some(data) = source.next_chunk(self.chunk_size)? {
                        let offset = session.send_chunk(data).await?;
                        report_archive_progress(offset, total, &mut on_progress);
                    }
                }
                Segment::Padding(len) => {
                    let offset = session.send_chunk(vec![0u8; len as usize]).await?;
                    report_archive_progress(offset, total, &mut on_progress);
                }
            }
        }

        debug!(offset = session.offset(), total, "archive stream complete");
        session.finalize_if_deferred(session.offset()).await?;
        Ok(())
    }

    /// Fails before any resource is created when the server advertises a
    /// non-zero maximum smaller than `size`.
    async fn check_size(&self, size: u64) -> Result<(), UploadError> {
        let max = self
            .client
            .probe_max_size(&self.endpoint.url, &self.endpoint.headers)
            .await?;
        info!(size, max, "negotiated upload size");
        if max > 0 && size > max {
            return Err(UploadError::SizeLimitExceeded { size, max });
        }
        Ok(())
    }
}

fn report_archive_progress<F>(offset: u64, total: u64, on_progress: &mut F)
where
    F: FnMut(f64),
{
    if total > 0 {
        on_progress((offset as f64 / total as f64).min(1.0));
    }
}
