//! View model for the forms and the dashboard.
//!
//! Everything the user sees is plain data here. Handlers produce these values
//! and `render` turns them into text; nothing in this module talks to the
//! network or the session store.

pub mod render;

use std::time::Duration;

use chrono::{DateTime, Datelike, Utc};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Severity {
    #[default]
    None,
    Success,
    Error,
}

/// The single status line. Each action overwrites it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiMessage {
    pub text: String,
    pub severity: Severity,
}

impl UiMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Error,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Login,
    Dashboard { after: Duration },
}

/// Result of submitting the register or login form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Shown {
        message: UiMessage,
        clear_form: bool,
        navigate: Option<Navigation>,
    },
    /// A newer submit of the same form started first; nothing was applied.
    Superseded,
}

impl FormOutcome {
    pub fn failure(text: impl Into<String>) -> Self {
        FormOutcome::Shown {
            message: UiMessage::error(text),
            clear_form: false,
            navigate: None,
        }
    }

    pub fn message(&self) -> Option<&UiMessage> {
        match self {
            FormOutcome::Shown { message, .. } => Some(message),
            FormOutcome::Superseded => None,
        }
    }

    pub fn navigation(&self) -> Option<Navigation> {
        match self {
            FormOutcome::Shown { navigate, .. } => *navigate,
            FormOutcome::Superseded => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DashboardState {
    #[default]
    Unauthenticated,
    Loading,
    Ready,
    Degraded,
}

/// Advisory busy markers for the two mutation controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusyFlags {
    pub avatar: bool,
    pub age: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardView {
    pub state: DashboardState,
    /// Name decoded from the token, shown before the profile arrives.
    pub display_name: String,
    pub email: Option<String>,
    pub age: Option<String>,
    pub avatar_url: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub daily_progress: u8,
    pub message: UiMessage,
    pub busy: BusyFlags,
    pub redirect: Option<Navigation>,
}

impl DashboardView {
    /// What the greeting shows: the authoritative email if known, else the
    /// token's display name, else a generic "user".
    pub fn greeting_name(&self) -> &str {
        match self.email.as_deref() {
            Some(email) if !email.is_empty() => email,
            _ if !self.display_name.is_empty() => &self.display_name,
            _ => "user",
        }
    }

    /// Once redirected to login the view takes no further updates.
    pub fn is_terminal(&self) -> bool {
        matches!(self.redirect, Some(Navigation::Login))
    }
}

/// Daily progress figure: 55–94 percent, stepping by day of month.
pub fn daily_progress(now: DateTime<Utc>) -> u8 {
    let base = now.day() * 7;
    (55 + base % 40) as u8
}
