//! Upload endpoint configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::headers::HEADER_API_KEY;

/// Immutable description of one upload target.
///
/// Holds the resource-creation URL, the extra headers attached to every
/// exchange (API key, optional user identity) and the metadata map attached
/// to created resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Resource-creation URL.
    pub url: String,
    /// Extra request headers sent on every exchange.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    /// Key/value metadata attached to created resources.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl Endpoint {
    /// Creates an endpoint with no extra headers or metadata.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            metadata: HashMap::new(),
        }
    }

    /// Adds a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns the configured API key, or an empty string if unset.
    pub fn api_key(&self) -> &str {
        self.headers
            .get(HEADER_API_KEY)
            .map(String::as_str)
            .unwrap_or("")
    }
}
