//! Custom error types specific to the `adapters` crate.
//!
//! These errors cover everything that can go wrong before a response from the
//! account API is in hand: building the client, resolving URLs, reading the
//! avatar file and the transport itself. A response with a non-success status
//! is *not* an error at this layer; it is returned as an `ApiResponse`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("cannot read avatar file '{path}': {source}")]
    AvatarFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl AdapterError {
    pub fn transport(endpoint: &str, err: impl std::fmt::Display) -> Self {
        AdapterError::Transport {
            endpoint: endpoint.to_string(),
            reason: err.to_string(),
        }
    }
}
