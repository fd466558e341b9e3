//! Session and profile controller for the dashgate account API.
//!
//! Wires the register/login forms and the dashboard to a remote API through
//! the `dashgate_adapters::AccountApi` trait, keeping the bearer token and
//! cached avatar URL in an injected `SessionStore`.

pub mod auth;
pub mod config;
pub mod errors;
pub mod services;
pub mod session;
pub mod view;

use std::sync::Arc;

use dashgate_adapters::{AccountApi, HttpAccountApi};

use crate::auth::AuthService;
use crate::config::ControllerConfig;
use crate::services::ProfileSync;
use crate::session::{FileSessionStore, SessionStore};

/// The auth flow and dashboard sharing one API client and session store.
pub struct Controller {
    pub auth: AuthService,
    pub dashboard: ProfileSync,
    store: Arc<dyn SessionStore>,
}

impl Controller {
    pub fn new(
        config: &ControllerConfig,
        api: Arc<dyn AccountApi>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            auth: AuthService::new(api.clone(), store.clone(), config),
            dashboard: ProfileSync::new(api, store.clone()),
            store,
        }
    }

    /// Production wiring: HTTP adapter plus the on-disk session file.
    pub fn from_config(config: &ControllerConfig) -> errors::Result<Self> {
        let api = HttpAccountApi::new(&config.api_base_url, config.request_timeout())?;
        let store = FileSessionStore::open(config.session_path())?;
        tracing::debug!(api = %config.api_base_url, session = %store.path().display(), "Controller ready");
        Ok(Self::new(config, Arc::new(api), Arc::new(store)))
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }
}
