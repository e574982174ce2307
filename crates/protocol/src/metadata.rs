//! `Upload-Metadata` header codec.
//!
//! The header value is a comma-separated list of `key<space>base64(value)`
//! pairs. A `filename` entry is always injected at encode time and overrides
//! any caller-supplied `filename` key.

use std::collections::HashMap;

use base64::{Engine, engine::general_purpose::STANDARD};

/// Errors produced while decoding an `Upload-Metadata` header.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("malformed metadata pair: {0:?}")]
    MalformedPair(String),

    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("metadata value is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Encodes a metadata map plus the mandatory `filename` entry.
///
/// Pairs are emitted in lexicographic key order so the header value is
/// deterministic for a given map. A caller-supplied `filename` key is
/// dropped in favor of the injected one.
pub fn encode_metadata(metadata: &HashMap<String, String>, filename: &str) -> String {
    let mut pairs: Vec<(&str, &str)> = metadata
        .iter()
        .filter(|(k, _)| k.as_str() != "filename")
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    pairs.push(("filename", filename));
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    pairs
        .iter()
        .map(|(k, v)| format!("{k} {}", STANDARD.encode(v)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Decodes an `Upload-Metadata` header value back into a map.
pub fn decode_metadata(header: &str) -> Result<HashMap<String, String>, MetadataError> {
    let mut out = HashMap::new();
    if header.is_empty() {
        return Ok(out);
    }

    for pair in header.split(',') {
        let (key, encoded) = pair
            .split_once(' ')
            .ok_or_else(|| MetadataError::MalformedPair(pair.to_string()))?;
        if key.is_empty() {
            return Err(MetadataError::MalformedPair(pair.to_string()));
        }
        let value = String::from_utf8(STANDARD.decode(encoded)?)?;
        out.insert(key.to_string(), value);
    }
    Ok(out)
}
