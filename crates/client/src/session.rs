//! Resumable upload session over a created TUS resource.

use std::collections::HashMap;

use tracing::debug;
use url::Url;

use crate::ClientError;
use crate::client::TusClient;
use crate::source::ChunkSource;

/// Declared length of a remote upload resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredLength {
    /// Length fixed at creation time.
    Fixed(u64),
    /// Length unknown at creation, fixed later by
    /// [`UploadSession::finalize_if_deferred`].
    Deferred,
}

/// Sends an ordered byte stream to one upload resource in bounded chunks.
///
/// Tracks a monotonically non-decreasing local offset; one chunk write is in
/// flight at a time and nothing is retried.
pub struct UploadSession<'a> {
    client: &'a TusClient,
    resource: Url,
    length: DeclaredLength,
    headers: HashMap<String, String>,
    offset: u64,
    finalized: bool,
}

impl<'a> UploadSession<'a> {
    /// Creates a session over an already-created resource.
    pub fn new(
        client: &'a TusClient,
        resource: Url,
        length: DeclaredLength,
        headers: HashMap<String, String>,
    ) -> Self {
        Self {
            client,
            resource,
            length,
            headers,
            offset: 0,
            finalized: false,
        }
    }

    /// The resource this session writes to.
    pub fn resource(&self) -> &Url {
        &self.resource
    }

    /// Current local byte offset.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Writes one chunk at the current offset and advances it.
    ///
    /// Returns the new offset.
    pub async fn send_chunk(&mut self, data: Vec<u8>) -> Result<u64, ClientError> {
        let len = data.len() as u64;
        self.client
            .write_chunk(&self.resource, data, self.offset, &self.headers)
            .await?;
        self.offset += len;
        Ok(self.offset)
    }

    /// Sends the whole source in chunks of at most `chunk_size` bytes.
    ///
    /// Starts logically at `start_offset` (the source must already be
    /// positioned there) and invokes `on_progress` with the cumulative byte
    /// count after every successful write. Returns the total bytes sent.
    pub async fn send_all<S, F>(
        &mut self,
        source: &mut S,
        chunk_size: usize,
        start_offset: u64,
        mut on_progress: F,
    ) -> Result<u64, ClientError>
    where
        S: ChunkSource,
        F: FnMut(u64),
    {
        self.offset = start_offset;
        let mut total_sent: u64 = 0;

        while let Some(data) = source.next_chunk(chunk_size)? {
            let len = data.len() as u64;
            self.send_chunk(data).await?;
            total_sent += len;
            on_progress(total_sent);
        }

        debug!(resource = %self.resource, total_sent, offset = self.offset, "source exhausted");
        Ok(total_sent)
    }

    /// Queries the server's current offset and repositions the source there.
    ///
    /// Fails with [`ClientError::NotSeekable`] when the source cannot be
    /// repositioned and the queried offset is non-zero. Returns the offset.
    pub async fn resume_from_server<S: ChunkSource>(
        &mut self,
        source: &mut S,
    ) -> Result<u64, ClientError> {
        let offset = self
            .client
            .query_offset(&self.resource, &self.headers)
            .await?;

        if offset != 0 {
            if !source.is_seekable() {
                return Err(ClientError::NotSeekable);
            }
            source.seek_to(offset)?;
        }
        self.offset = offset;
        Ok(offset)
    }

    /// Fixes the resource length when it was created as deferred.
    ///
    /// A no-op for fixed-length resources and for sessions already
    /// finalized. The zero-length finalizing write leaves the offset
    /// unchanged.
    pub async fn finalize_if_deferred(&mut self, total: u64) -> Result<(), ClientError> {
        if self.length != DeclaredLength::Deferred || self.finalized {
            return Ok(());
        }
        self.client
            .finalize(&self.resource, total, &self.headers)
            .await?;
        self.finalized = true;
        Ok(())
    }
}
