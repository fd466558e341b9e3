//! Central module for controller configuration.
//!
//! Settings come from an optional YAML file; every field has a default so an
//! absent file yields a working local setup pointed at
//! `http://localhost:5000`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use dashgate_adapters::Url;
use serde::Deserialize;

use crate::errors::{ControllerError, Result};
use crate::session::FileSessionStore;

/// How failure messages from register and login reach the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageMode {
    /// Show the server's message verbatim, or a default when it sends none.
    #[default]
    Passthrough,
    /// Fold server messages into a small set of known texts.
    Normalize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ControllerConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub message_mode: MessageMode,
    /// Pause between a successful login and showing the dashboard.
    #[serde(default = "default_login_redirect_delay_ms")]
    pub login_redirect_delay_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub session_path: Option<PathBuf>,
}

fn default_api_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_login_redirect_delay_ms() -> u64 {
    600
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            message_mode: MessageMode::default(),
            login_redirect_delay_ms: default_login_redirect_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            session_path: None,
        }
    }
}

impl ControllerConfig {
    pub fn login_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.login_redirect_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn session_path(&self) -> PathBuf {
        self.session_path
            .clone()
            .unwrap_or_else(FileSessionStore::default_path)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ControllerConfig = serde_yml::from_str(yaml)
            .map_err(|err| ControllerError::Config(format!("invalid YAML: {}", err)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let scheme = Url::parse(&self.api_base_url).map(|url| url.scheme().to_string());
        if !matches!(scheme.as_deref(), Ok("http" | "https")) {
            return Err(ControllerError::Config(format!(
                "api_base_url must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ControllerError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads the configuration file, falling back to defaults when it is absent.
pub fn load_config(path: &Path) -> Result<ControllerConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(ControllerConfig::default());
    }
    let content = std::fs::read_to_string(path).map_err(|err| {
        ControllerError::Config(format!("failed to read {}: {}", path.display(), err))
    })?;
    ControllerConfig::from_yaml(&content)
}
