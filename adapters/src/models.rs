//! Generic data models for the `adapters` crate.
//!
//! These models describe the request bodies sent to the account API and the
//! loosely-typed responses it returns. Responses are kept as raw JSON so that
//! callers can apply their own fallbacks when a field is missing; a body that
//! does not parse is simply absent.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::errors::AdapterError;

/// The remote operations the controller knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Register,
    Login,
    Profile,
    UpdateAge,
    UpdateAgeFallback,
    UploadAvatar,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Register => "/register",
            Endpoint::Login => "/login",
            Endpoint::Profile | Endpoint::UpdateAge => "/me",
            Endpoint::UpdateAgeFallback => "/me/update",
            Endpoint::UploadAvatar => "/me/avatar",
        }
    }
}

/// Which route an age update is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeRoute {
    Primary,
    Fallback,
}

impl AgeRoute {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            AgeRoute::Primary => Endpoint::UpdateAge,
            AgeRoute::Fallback => Endpoint::UpdateAgeFallback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeUpdateRequest {
    pub age: u32,
}

/// An image selected for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    /// Where the file came from locally, used for a preview when the server
    /// does not hand back a URL.
    pub local_path: Option<String>,
}

impl AvatarFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
            local_path: None,
        }
    }

    /// Reads an image from disk, guessing the content type from its extension.
    /// Unknown extensions are sent as `application/octet-stream`.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, AdapterError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| AdapterError::AvatarFile {
                path: path.display().to_string(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "avatar".to_string());
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

        Ok(Self {
            content_type: mime_guess::from_path(path).first_or_octet_stream().to_string(),
            file_name,
            bytes,
            local_path: Some(absolute.display().to_string()),
        })
    }

    /// A `file://` URL pointing at the local copy, if known.
    pub fn preview_url(&self) -> Option<String> {
        self.local_path.as_ref().map(|p| format!("file://{}", p))
    }
}

/// Status plus best-effort JSON body of an API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    /// Builds a response from raw bytes; anything that is not JSON is dropped.
    pub fn from_bytes(status: u16, bytes: &[u8]) -> Self {
        Self {
            status,
            body: serde_json::from_slice(bytes).ok(),
        }
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// A top-level field of the body, if the body is an object carrying it.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.as_ref()?.get(name).filter(|v| !v.is_null())
    }

    /// A non-empty string field.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name)?.as_str().filter(|s| !s.is_empty())
    }

    pub fn message(&self) -> Option<&str> {
        self.str_field("message")
    }
}
