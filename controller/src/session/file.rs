//! File-based session store.
//!
//! Keeps the two session slots in a small TOML file, written with owner-only
//! permissions on Unix:
//!
//! ```toml
//! auth_token = "eyJhbGciOiJIUzI1NiJ9.eyJlbWFpbCI6ImFAYi5jb20ifQ.sig"
//! avatar_url = "http://localhost:5000/uploads/a.png"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::{Result, SessionError, SessionKey, SessionStore};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    avatar_url: Option<String>,
}

impl SessionFile {
    fn slot(&mut self, key: SessionKey) -> &mut Option<String> {
        match key {
            SessionKey::Token => &mut self.auth_token,
            SessionKey::AvatarUrl => &mut self.avatar_url,
        }
    }
}

#[derive(Debug)]
pub struct FileSessionStore {
    file_path: PathBuf,
    cache: Mutex<SessionFile>,
}

impl FileSessionStore {
    /// `~/.config/dashgate/session.toml` or the platform equivalent.
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("dashgate").join("session.toml")
        } else if let Some(home_dir) = dirs::home_dir() {
            home_dir.join(".dashgate").join("session.toml")
        } else {
            PathBuf::from(".dashgate").join("session.toml")
        }
    }

    /// Opens the store at `file_path`. A missing file is an empty session.
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self> {
        let file_path = file_path.into();
        let cache = Self::load(&file_path)?;
        tracing::debug!(path = %file_path.display(), "Opened session file");
        Ok(Self {
            file_path,
            cache: Mutex::new(cache),
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load(path: &Path) -> Result<SessionFile> {
        if !path.exists() {
            return Ok(SessionFile::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&contents).map_err(|err| SessionError::Corrupted {
            path: path.display().to_string(),
            reason: err.message().to_string(),
        })
    }

    fn save(&self, file: &SessionFile) -> Result<()> {
        let io_err = |source| SessionError::Io {
            path: self.file_path.display().to_string(),
            source,
        };

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let contents =
            toml::to_string_pretty(file).map_err(|err| SessionError::Serialize(err.to_string()))?;
        fs::write(&self.file_path, contents).map_err(io_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.file_path, fs::Permissions::from_mode(0o600))
                .map_err(io_err)?;
        }

        Ok(())
    }

    fn update(&self, key: SessionKey, value: Option<&str>) -> Result<()> {
        let mut cache = self.cache.lock();
        let mut next = cache.clone();
        *next.slot(key) = value.map(str::to_string);
        if next == *cache {
            return Ok(());
        }
        self.save(&next)?;
        *cache = next;
        tracing::debug!(key = key.as_str(), cleared = value.is_none(), "Session slot written");
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: SessionKey) -> Result<Option<String>> {
        Ok(self.cache.lock().slot(key).clone())
    }

    fn set(&self, key: SessionKey, value: &str) -> Result<()> {
        self.update(key, Some(value))
    }

    fn clear(&self, key: SessionKey) -> Result<()> {
        self.update(key, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_session() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::open(dir.path().join("session.toml")).unwrap();
        assert_eq!(store.token().unwrap(), None);
        assert_eq!(store.avatar_url().unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.toml");

        let store = FileSessionStore::open(&path).unwrap();
        store.set_token("h.p.s").unwrap();
        store.set_avatar_url("http://x/a.png").unwrap();

        let reopened = FileSessionStore::open(&path).unwrap();
        assert_eq!(reopened.token().unwrap().as_deref(), Some("h.p.s"));
        assert_eq!(reopened.avatar_url().unwrap().as_deref(), Some("http://x/a.png"));
    }

    #[test]
    fn test_clear_removes_only_that_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.toml");

        let store = FileSessionStore::open(&path).unwrap();
        store.set_token("h.p.s").unwrap();
        store.set_avatar_url("http://x/a.png").unwrap();
        store.clear_token().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("auth_token"));
        assert!(contents.contains("avatar_url"));

        let reopened = FileSessionStore::open(&path).unwrap();
        assert_eq!(reopened.token().unwrap(), None);
    }

    #[test]
    fn test_file_keys_match_slot_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.toml");

        let store = FileSessionStore::open(&path).unwrap();
        store.set(SessionKey::Token, "h.p.s").unwrap();
        store.set(SessionKey::AvatarUrl, "http://x/a.png").unwrap();

        let table: toml::Table = fs::read_to_string(&path).unwrap().parse().unwrap();
        for (key, value) in [(SessionKey::Token, "h.p.s"), (SessionKey::AvatarUrl, "http://x/a.png")] {
            assert_eq!(table.get(key.as_str()).and_then(|v| v.as_str()), Some(value));
        }
    }

    #[test]
    fn test_corrupted_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.toml");
        fs::write(&path, "auth_token = [unterminated").unwrap();

        let err = FileSessionStore::open(&path).unwrap_err();
        assert!(matches!(err, SessionError::Corrupted { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::open(dir.path().join("session.toml")).unwrap();
        store.set_token("t").unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
