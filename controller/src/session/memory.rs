//! In-memory session store.
//!
//! Nothing survives the process. Used by tests and by callers that want a
//! throwaway session.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::{Result, SessionKey, SessionStore};

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slots: Mutex<HashMap<SessionKey, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds a token.
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.slots.lock().insert(SessionKey::Token, token.to_string());
        store
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: SessionKey) -> Result<Option<String>> {
        Ok(self.slots.lock().get(&key).cloned())
    }

    fn set(&self, key: SessionKey, value: &str) -> Result<()> {
        self.slots.lock().insert(key, value.to_string());
        Ok(())
    }

    fn clear(&self, key: SessionKey) -> Result<()> {
        self.slots.lock().remove(&key);
        Ok(())
    }
}
