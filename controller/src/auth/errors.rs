//! User-facing failure texts for the auth forms.
//!
//! The server's message can be shown verbatim or folded into a short list of
//! known texts, depending on `MessageMode`.

use crate::config::MessageMode;

pub const REGISTER_SUCCESS: &str = "Registration successful";
pub const REGISTER_EXISTS: &str = "Email already exists";
pub const REGISTER_RETRY: &str = "Unable to register. Try again.";

pub const LOGIN_SUCCESS: &str = "Login successful";
pub const LOGIN_INVALID: &str = "Invalid password";
pub const LOGIN_RETRY: &str = "Unable to login. Try again.";

/// Which form a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthForm {
    Register,
    Login,
}

impl AuthForm {
    /// Shown when the server rejects the submit without saying why.
    fn default_failure(&self) -> &'static str {
        match self {
            AuthForm::Register => REGISTER_EXISTS,
            AuthForm::Login => LOGIN_INVALID,
        }
    }

    /// Shown when no response arrived or it could not be read.
    pub fn transport_failure(&self) -> &'static str {
        match self {
            AuthForm::Register => REGISTER_RETRY,
            AuthForm::Login => LOGIN_RETRY,
        }
    }
}

/// Text for a rejected submit, given whatever message the server sent.
pub fn failure_message(form: AuthForm, server_message: Option<&str>, mode: MessageMode) -> String {
    let raw = server_message.unwrap_or_else(|| form.default_failure());
    match mode {
        MessageMode::Passthrough => raw.to_string(),
        MessageMode::Normalize => normalize(form, raw).to_string(),
    }
}

fn normalize(form: AuthForm, message: &str) -> &'static str {
    let lower = message.to_lowercase();
    match form {
        AuthForm::Register if lower.contains("exists") => REGISTER_EXISTS,
        AuthForm::Register => REGISTER_RETRY,
        AuthForm::Login if lower.contains("invalid") || lower.contains("password") => LOGIN_INVALID,
        AuthForm::Login => LOGIN_RETRY,
    }
}
