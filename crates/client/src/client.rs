//! Low-level TUS protocol exchanges.
//!
//! Each method performs exactly one HTTP exchange and parses the headers
//! the protocol requires. Caller-supplied headers are applied after the
//! protocol headers, so callers can override any of them.

use std::collections::HashMap;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, LOCATION};
use tracing::{debug, info};
use url::Url;

use tuspack_protocol::headers::{
    HEADER_DEFER_LENGTH, HEADER_MAX_SIZE, HEADER_RESUMABLE, HEADER_UPLOAD_LENGTH,
    HEADER_UPLOAD_METADATA, HEADER_UPLOAD_OFFSET, OFFSET_CONTENT_TYPE, TUS_VERSION,
};
use tuspack_protocol::metadata::encode_metadata;

use crate::ClientError;

/// Client for the four TUS exchanges: probe, create, offset query, chunk write.
pub struct TusClient {
    http: reqwest::Client,
}

impl TusClient {
    /// Creates a client with default TLS settings.
    pub fn new() -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http })
    }

    /// Probes the endpoint for the server-advertised maximum upload size.
    ///
    /// A maximum of 0 means unlimited.
    pub async fn probe_max_size(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<u64, ClientError> {
        let resp = self
            .exchange(Method::OPTIONS, url, &[], headers, None)
            .await?;
        parse_numeric_header(resp.headers(), HEADER_MAX_SIZE)
    }

    /// Creates an upload resource and returns its absolute URL.
    ///
    /// A known `size` sets `Upload-Length`; `None` sets the defer-length
    /// marker instead. `name` is injected into the metadata header as the
    /// `filename` entry, overriding any caller-supplied `filename` key.
    pub async fn create(
        &self,
        url: &str,
        name: &str,
        size: Option<u64>,
        headers: &HashMap<String, String>,
        metadata: &HashMap<String, String>,
    ) -> Result<Url, ClientError> {
        let create_url = Url::parse(url)?;

        let length_header = match size {
            Some(n) => (HEADER_UPLOAD_LENGTH, n.to_string()),
            None => (HEADER_DEFER_LENGTH, "1".to_string()),
        };
        let protocol = [
            length_header,
            (HEADER_UPLOAD_METADATA, encode_metadata(metadata, name)),
        ];

        let resp = self
            .exchange(Method::POST, url, &protocol, headers, None)
            .await?;

        let status = resp.status().as_u16();
        if status != 201 {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::CreateFailed { status, body });
        }

        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| ClientError::Protocol("missing Location header".into()))?;

        let resource = absolute_resource_url(&create_url, &location)?;
        info!(resource = %resource, "created upload resource");
        Ok(resource)
    }

    /// Queries the server's current byte offset for a resource.
    pub async fn query_offset(
        &self,
        resource: &Url,
        headers: &HashMap<String, String>,
    ) -> Result<u64, ClientError> {
        let resp = self
            .exchange(Method::HEAD, resource.as_str(), &[], headers, None)
            .await?;
        let offset = parse_numeric_header(resp.headers(), HEADER_UPLOAD_OFFSET)?;
        debug!(resource = %resource, offset, "queried offset");
        Ok(offset)
    }

    /// Writes one chunk at the given offset.
    ///
    /// Zero-length `data` is valid and is how deferred-length resources are
    /// finalized.
    pub async fn write_chunk(
        &self,
        resource: &Url,
        data: Vec<u8>,
        offset: u64,
        headers: &HashMap<String, String>,
    ) -> Result<(), ClientError> {
        debug!(len = data.len(), offset, "writing chunk");

        let protocol = [
            (CONTENT_TYPE.as_str(), OFFSET_CONTENT_TYPE.to_string()),
            (HEADER_UPLOAD_OFFSET, offset.to_string()),
        ];
        let resp = self
            .exchange(Method::PATCH, resource.as_str(), &protocol, headers, Some(data))
            .await?;

        let status = resp.status().as_u16();
        if status != 204 {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::ChunkUploadFailed { status, body });
        }
        Ok(())
    }

    /// Fixes the final length of a deferred-length resource.
    ///
    /// Sends a zero-length chunk at `final_size` with `Upload-Length` set;
    /// the server converts the resource to fixed length without consuming
    /// any bytes, so the offset is unchanged by this call.
    pub async fn finalize(
        &self,
        resource: &Url,
        final_size: u64,
        headers: &HashMap<String, String>,
    ) -> Result<(), ClientError> {
        let mut headers = headers.clone();
        headers.insert(HEADER_UPLOAD_LENGTH.to_string(), final_size.to_string());
        self.write_chunk(resource, Vec::new(), final_size, &headers)
            .await
    }

    /// Performs one HTTP exchange with protocol and caller headers applied.
    async fn exchange(
        &self,
        method: Method,
        url: &str,
        protocol: &[(&str, String)],
        extra: &HashMap<String, String>,
        body: Option<Vec<u8>>,
    ) -> Result<reqwest::Response, ClientError> {
        let mut headers = HeaderMap::new();
        insert_header(&mut headers, HEADER_RESUMABLE, TUS_VERSION)?;
        for (name, value) in protocol {
            insert_header(&mut headers, name, value)?;
        }
        // Caller headers last: they win on collision.
        for (name, value) in extra {
            insert_header(&mut headers, name, value)?;
        }

        let mut req = self.http.request(method, url).headers(headers);
        if let Some(data) = body {
            req = req.body(data);
        }
        Ok(req.send().await?)
    }
}

fn insert_header(map: &mut HeaderMap, name: &str, value: &str) -> Result<(), ClientError> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| ClientError::InvalidHeader(name.to_string()))?;
    let value = HeaderValue::from_str(value)
        .map_err(|_| ClientError::InvalidHeader(value.to_string()))?;
    map.insert(name, value);
    Ok(())
}

fn parse_numeric_header(headers: &HeaderMap, name: &str) -> Result<u64, ClientError> {
    let value = headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ClientError::Protocol(format!("missing {name} header")))?;
    value
        .trim()
        .parse()
        .map_err(|_| ClientError::Protocol(format!("non-numeric {name} header: {value:?}")))
}

/// Resolves a creation-response `Location` against the creation URL.
///
/// A `Location` that already carries its own scheme and host is returned
/// unchanged; a relative one inherits the creation URL's scheme and host.
pub fn absolute_resource_url(create_url: &Url, location: &str) -> Result<Url, url::ParseError> {
    match Url::parse(location) {
        Ok(absolute) => Ok(absolute),
        Err(url::ParseError::RelativeUrlWithoutBase) => create_url.join(location),
        Err(e) => Err(e),
    }
}
