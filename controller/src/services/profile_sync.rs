//! Dashboard profile synchronization.
//!
//! Owns the dashboard view for one load: paints placeholders from the token
//! and the cached avatar, fetches the authoritative profile, and runs the two
//! mutations (avatar upload, age update). Response handling is delegated to
//! `transitions`; this service only sequences requests, drops stale
//! responses and applies effects to the session store.

use std::sync::Arc;

use chrono::Utc;
use dashgate_adapters::{AccountApi, AgeRoute, AgeUpdateRequest, AvatarFile};
use parking_lot::Mutex;

use crate::auth::token::display_name;
use crate::services::generation::{Control, Generations};
use crate::services::transitions::{self, Effect};
use crate::session::SessionStore;
use crate::view::{DashboardState, DashboardView, UiMessage};

pub struct ProfileSync {
    api: Arc<dyn AccountApi>,
    store: Arc<dyn SessionStore>,
    view: Mutex<DashboardView>,
    generations: Generations,
}

impl ProfileSync {
    pub fn new(api: Arc<dyn AccountApi>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            store,
            view: Mutex::new(DashboardView::default()),
            generations: Generations::new(),
        }
    }

    /// Snapshot of the current view.
    pub fn view(&self) -> DashboardView {
        self.view.lock().clone()
    }

    fn stored_token(&self) -> Option<String> {
        self.store.token().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Cannot read session token");
            None
        })
    }

    fn cached_avatar(&self) -> Option<String> {
        self.store.avatar_url().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Cannot read cached avatar URL");
            None
        })
    }

    fn apply(&self, effects: Vec<Effect>) {
        for effect in effects {
            let result = match &effect {
                Effect::ClearSession => {
                    tracing::info!("Credential rejected, clearing session");
                    self.store.clear_token()
                }
                Effect::CacheAvatar(url) => self.store.set_avatar_url(url),
            };
            if let Err(err) = result {
                tracing::warn!(error = %err, ?effect, "Failed to update session store");
            }
        }
    }

    /// Runs a transition against the view and applies its effects.
    fn transition(&self, update: impl FnOnce(&mut DashboardView) -> Vec<Effect>) -> DashboardView {
        let (effects, snapshot) = {
            let mut view = self.view.lock();
            let effects = update(&mut view);
            (effects, view.clone())
        };
        self.apply(effects);
        snapshot
    }

    /// Loads the dashboard. Without a stored token no request is made.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self) -> DashboardView {
        let ticket = self.generations.begin(Control::ProfileLoad);

        let Some(token) = self.stored_token() else {
            tracing::debug!("No session token, redirecting to login");
            return self.transition(|view| {
                *view = transitions::logged_out();
                Vec::new()
            });
        };

        let placeholder = transitions::loading(
            display_name(&token),
            self.cached_avatar(),
            Utc::now(),
        );
        *self.view.lock() = placeholder;

        let result = self.api.fetch_profile(&token).await;
        if !self.generations.is_current(ticket) {
            tracing::debug!("Discarding superseded profile response");
            return self.view();
        }

        let base_url = self.api.base_url().clone();
        self.transition(|view| transitions::profile_loaded(view, result, &base_url))
    }

    /// Mutations are only offered once the dashboard has been loaded and is
    /// still logged in.
    fn accepts_mutations(&self) -> bool {
        let view = self.view.lock();
        matches!(view.state, DashboardState::Ready | DashboardState::Degraded) && !view.is_terminal()
    }

    /// Token for a mutation; a missing one ends the session view.
    fn mutation_token(&self) -> Option<String> {
        let token = self.stored_token();
        if token.is_none() {
            self.transition(transitions::session_expired);
        }
        token
    }

    #[tracing::instrument(skip(self, file), fields(selected = file.is_some()))]
    pub async fn upload_avatar(&self, file: Option<AvatarFile>) -> DashboardView {
        if !self.accepts_mutations() {
            return self.view();
        }
        let Some(file) = file else {
            return self.transition(|view| {
                view.message = UiMessage::error(transitions::AVATAR_MISSING);
                Vec::new()
            });
        };

        let ticket = self.generations.begin(Control::Avatar);
        self.view.lock().busy.avatar = true;

        let Some(token) = self.mutation_token() else {
            return self.view();
        };

        let result = self.api.upload_avatar(&token, &file).await;
        if !self.generations.is_current(ticket) {
            tracing::debug!("Discarding superseded avatar response");
            return self.view();
        }

        let cached = self.cached_avatar();
        let base_url = self.api.base_url().clone();
        self.transition(|view| transitions::avatar_uploaded(view, result, &file, cached, &base_url))
    }

    /// Updates the age, falling back to the alternate route once if the
    /// primary one is not found.
    #[tracing::instrument(skip(self))]
    pub async fn update_age(&self, input: &str) -> DashboardView {
        if !self.accepts_mutations() {
            return self.view();
        }
        let Some(age) = transitions::parse_age(input) else {
            return self.transition(|view| {
                view.message = UiMessage::error(transitions::AGE_INVALID);
                Vec::new()
            });
        };

        let ticket = self.generations.begin(Control::Age);
        self.view.lock().busy.age = true;

        let Some(token) = self.mutation_token() else {
            return self.view();
        };

        let request = AgeUpdateRequest { age };
        let mut result = self.api.update_age(&token, AgeRoute::Primary, &request).await;
        if matches!(&result, Ok(response) if response.is_not_found())
            && self.generations.is_current(ticket)
        {
            tracing::info!("Primary age route not found, trying fallback route");
            result = self.api.update_age(&token, AgeRoute::Fallback, &request).await;
        }

        if !self.generations.is_current(ticket) {
            tracing::debug!("Discarding superseded age response");
            return self.view();
        }

        self.transition(|view| transitions::age_updated(view, result, age, Utc::now()))
    }
}
