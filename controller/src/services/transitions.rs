//! Pure state transitions for the dashboard.
//!
//! Each function takes the current view and the outcome of one request and
//! updates the view in place. Anything that must touch the session store is
//! returned as an `Effect` for the caller to apply, so these functions can be
//! tested without storage, network or a renderer.

use chrono::{DateTime, Utc};
use dashgate_adapters::{resolve_asset_url, AdapterError, ApiResponse, AvatarFile, Url};
use serde_json::Value;

use crate::view::{daily_progress, DashboardState, DashboardView, Navigation, UiMessage};

pub const PROFILE_FAILED: &str = "Unable to load profile.";
pub const PROFILE_RETRY: &str = "Unable to load profile. Try again.";
pub const SESSION_EXPIRED: &str = "Session expired. Please log in again.";

pub const AVATAR_MISSING: &str = "Choose an image to upload.";
pub const AVATAR_UPDATED: &str = "Avatar updated";
pub const AVATAR_FAILED: &str = "Unable to upload avatar.";
pub const AVATAR_RETRY: &str = "Unable to upload avatar. Try again.";

pub const AGE_INVALID: &str = "Enter a valid age.";
pub const AGE_UPDATED: &str = "Age updated";
pub const AGE_FAILED: &str = "Unable to update age.";
pub const AGE_RETRY: &str = "Unable to update age. Try again.";

/// Session store changes requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ClearSession,
    CacheAvatar(String),
}

/// No token: straight to login, nothing else rendered.
pub fn logged_out() -> DashboardView {
    DashboardView {
        state: DashboardState::Unauthenticated,
        redirect: Some(Navigation::Login),
        ..Default::default()
    }
}

/// Placeholder view painted before the profile request resolves.
pub fn loading(display_name: String, cached_avatar: Option<String>, now: DateTime<Utc>) -> DashboardView {
    DashboardView {
        state: DashboardState::Loading,
        display_name,
        avatar_url: cached_avatar,
        daily_progress: daily_progress(now),
        ..Default::default()
    }
}

/// An unauthorized answer ends the session for this view.
pub fn session_expired(view: &mut DashboardView) -> Vec<Effect> {
    view.state = DashboardState::Unauthenticated;
    view.redirect = Some(Navigation::Login);
    view.busy = Default::default();
    view.message = UiMessage::error(SESSION_EXPIRED);
    vec![Effect::ClearSession]
}

pub fn profile_loaded(
    view: &mut DashboardView,
    result: Result<ApiResponse, AdapterError>,
    base_url: &Url,
) -> Vec<Effect> {
    let response = match result {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(error = %err, "Profile request failed");
            return degrade(view, PROFILE_RETRY);
        }
    };

    if response.is_unauthorized() {
        return session_expired(view);
    }
    if !response.is_ok() {
        let text = response.message().unwrap_or(PROFILE_FAILED).to_string();
        return degrade(view, &text);
    }

    // An ok status with an unreadable body still counts as a failed load.
    if !response.body.as_ref().is_some_and(Value::is_object) {
        return degrade(view, PROFILE_FAILED);
    }

    // Fields are read one by one; a malformed field keeps its placeholder.
    let mut effects = Vec::new();
    view.state = DashboardState::Ready;
    view.message = UiMessage::default();
    if let Some(email) = response.str_field("email") {
        view.email = Some(email.to_string());
    }
    if let Some(age) = response.field("age").and_then(age_text) {
        view.age = Some(age);
    }
    if let Some(raw) = response.str_field("avatarUrl") {
        let url = resolve_asset_url(base_url, raw);
        view.avatar_url = Some(url.clone());
        effects.push(Effect::CacheAvatar(url));
    }
    effects
}

fn degrade(view: &mut DashboardView, text: &str) -> Vec<Effect> {
    view.state = DashboardState::Degraded;
    view.message = UiMessage::error(text);
    Vec::new()
}

pub fn avatar_uploaded(
    view: &mut DashboardView,
    result: Result<ApiResponse, AdapterError>,
    file: &AvatarFile,
    cached_avatar: Option<String>,
    base_url: &Url,
) -> Vec<Effect> {
    view.busy.avatar = false;

    let response = match result {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(error = %err, "Avatar upload failed");
            view.message = UiMessage::error(AVATAR_RETRY);
            return Vec::new();
        }
    };

    if response.is_unauthorized() {
        return session_expired(view);
    }
    if !response.is_ok() {
        view.message = UiMessage::error(response.message().unwrap_or(AVATAR_FAILED));
        return Vec::new();
    }

    let mut effects = Vec::new();
    let server_url = response
        .str_field("avatarUrl")
        .map(|raw| resolve_asset_url(base_url, raw));
    if let Some(url) = &server_url {
        effects.push(Effect::CacheAvatar(url.clone()));
    }
    if let Some(url) = server_url.or_else(|| file.preview_url()).or(cached_avatar) {
        view.avatar_url = Some(url);
    }
    view.message = UiMessage::success(response.message().unwrap_or(AVATAR_UPDATED));
    effects
}

/// Accepts positive whole numbers only.
pub fn parse_age(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok().filter(|age| *age > 0)
}

pub fn age_updated(
    view: &mut DashboardView,
    result: Result<ApiResponse, AdapterError>,
    submitted: u32,
    now: DateTime<Utc>,
) -> Vec<Effect> {
    view.busy.age = false;

    let response = match result {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(error = %err, "Age update failed");
            view.message = UiMessage::error(AGE_RETRY);
            return Vec::new();
        }
    };

    if response.is_unauthorized() {
        return session_expired(view);
    }
    if !response.is_ok() {
        view.message = UiMessage::error(response.message().unwrap_or(AGE_FAILED));
        return Vec::new();
    }

    let age = response
        .field("age")
        .and_then(age_text)
        .unwrap_or_else(|| submitted.to_string());
    view.age = Some(age);
    view.last_updated = Some(now);
    view.message = UiMessage::success(response.message().unwrap_or(AGE_UPDATED));
    Vec::new()
}

fn age_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}
