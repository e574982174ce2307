//! Wire vocabulary for the TUS resumable-upload protocol.
//!
//! Header names, the protocol version, the `Upload-Metadata` codec and the
//! endpoint configuration shared by the client and upload crates. Header
//! values here are byte-exact: interoperating servers parse them literally.

pub mod endpoint;
pub mod headers;
pub mod metadata;

pub use endpoint::Endpoint;
pub use metadata::{MetadataError, decode_metadata, encode_metadata};
