//! Client-side session storage.
//!
//! The controller persists exactly two plain strings: the bearer token and
//! the last known avatar URL. Handlers receive a `SessionStore` rather than
//! reaching for storage themselves, so the token lifecycle can be driven in
//! tests with `MemorySessionStore` and on disk with `FileSessionStore`.

pub mod file;
pub mod memory;

use thiserror::Error;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot access session file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("session file '{path}' is corrupted: {reason}")]
    Corrupted { path: String, reason: String },

    #[error("failed to serialize session: {0}")]
    Serialize(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// The slots a session store holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    Token,
    AvatarUrl,
}

impl SessionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKey::Token => "auth_token",
            SessionKey::AvatarUrl => "avatar_url",
        }
    }
}

/// Key-value storage for the session slots.
///
/// Values carry no expiry; a stale token is only discovered when the API
/// answers 401.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: SessionKey) -> Result<Option<String>>;

    /// Overwrites the slot.
    fn set(&self, key: SessionKey, value: &str) -> Result<()>;

    /// Removes the slot. Clearing an empty slot is not an error.
    fn clear(&self, key: SessionKey) -> Result<()>;

    /// The stored token, with an empty string counting as none.
    fn token(&self) -> Result<Option<String>> {
        Ok(self.get(SessionKey::Token)?.filter(|t| !t.is_empty()))
    }

    fn set_token(&self, token: &str) -> Result<()> {
        self.set(SessionKey::Token, token)
    }

    fn clear_token(&self) -> Result<()> {
        self.clear(SessionKey::Token)
    }

    fn avatar_url(&self) -> Result<Option<String>> {
        Ok(self.get(SessionKey::AvatarUrl)?.filter(|u| !u.is_empty()))
    }

    fn set_avatar_url(&self, url: &str) -> Result<()> {
        self.set(SessionKey::AvatarUrl, url)
    }
}
