//! Core `adapters` crate for abstracting the remote account API.
//!
//! This crate defines the `AccountApi` trait, which outlines the calls the
//! session controller makes (register, login, profile, age update, avatar
//! upload), and provides the HTTP implementation used in production.

pub mod errors;
pub mod http;
pub mod models;

use async_trait::async_trait;

pub use errors::AdapterError;
pub use http::HttpAccountApi;
pub use models::{
    AgeRoute, AgeUpdateRequest, ApiResponse, AvatarFile, Endpoint, LoginRequest, RegisterRequest,
};
pub use reqwest::Url;

/// Remote account API as seen by the controller.
///
/// Implementations return `Ok` for every response the server produced,
/// whatever its status; `Err` means no usable response arrived.
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Base address relative asset URLs are resolved against.
    fn base_url(&self) -> &Url;

    async fn register(&self, request: &RegisterRequest) -> Result<ApiResponse, AdapterError>;

    async fn login(&self, request: &LoginRequest) -> Result<ApiResponse, AdapterError>;

    async fn fetch_profile(&self, token: &str) -> Result<ApiResponse, AdapterError>;

    async fn update_age(
        &self,
        token: &str,
        route: AgeRoute,
        request: &AgeUpdateRequest,
    ) -> Result<ApiResponse, AdapterError>;

    async fn upload_avatar(&self, token: &str, file: &AvatarFile)
        -> Result<ApiResponse, AdapterError>;
}

/// Turns an asset URL from the API into something displayable.
///
/// Anything that already parses as an absolute URL (`https:`, `data:`, ...)
/// passes through untouched; everything else is joined onto the base address
/// with the usual reference resolution rules, so `//host/x` keeps its own host.
pub fn resolve_asset_url(base_url: &Url, raw: &str) -> String {
    if Url::parse(raw).is_ok() {
        return raw.to_string();
    }
    match base_url.join(raw) {
        Ok(url) => url.to_string(),
        Err(err) => {
            tracing::debug!(raw, error = %err, "Cannot resolve asset URL");
            raw.to_string()
        }
    }
}
