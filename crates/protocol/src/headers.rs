//! Exact header names and constants required for interoperability.

/// Protocol version sent in [`HEADER_RESUMABLE`] on every exchange.
pub const TUS_VERSION: &str = "1.0.0";

/// Carries the protocol version on every request.
pub const HEADER_RESUMABLE: &str = "Tus-Resumable";

/// Server-advertised maximum upload size (OPTIONS response). 0 means unlimited.
pub const HEADER_MAX_SIZE: &str = "Tus-Max-Size";

/// Declared total length of a fixed-length resource.
pub const HEADER_UPLOAD_LENGTH: &str = "Upload-Length";

/// Marker header for resources created without a known length.
pub const HEADER_DEFER_LENGTH: &str = "Upload-Defer-Length";

/// Encoded key/value metadata attached at resource creation.
pub const HEADER_UPLOAD_METADATA: &str = "Upload-Metadata";

/// Byte offset of a chunk write (request) or the server's current offset
/// (HEAD response).
pub const HEADER_UPLOAD_OFFSET: &str = "Upload-Offset";

/// Content type required on chunk writes.
pub const OFFSET_CONTENT_TYPE: &str = "application/offset+octet-stream";

/// Caller authentication header understood by the upload server.
pub const HEADER_API_KEY: &str = "X-API-Key";

/// Optional caller identity header.
pub const HEADER_API_USER: &str = "X-API-User";
