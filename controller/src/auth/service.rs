//! Core logic for the register and login forms.
//!
//! Each submit sends exactly one request. Whatever happens on the wire, the
//! caller gets a `FormOutcome` to render; transport failures are downgraded to
//! a generic message here and never propagate.

use std::sync::Arc;

use dashgate_adapters::AccountApi;

use crate::auth::errors::{self, AuthForm};
use crate::auth::models::{LoginForm, RegisterForm};
use crate::config::{ControllerConfig, MessageMode};
use crate::services::generation::{Control, Generations};
use crate::session::SessionStore;
use crate::view::{FormOutcome, Navigation, UiMessage};

pub struct AuthService {
    api: Arc<dyn AccountApi>,
    store: Arc<dyn SessionStore>,
    message_mode: MessageMode,
    redirect_delay: std::time::Duration,
    generations: Generations,
}

impl AuthService {
    pub fn new(
        api: Arc<dyn AccountApi>,
        store: Arc<dyn SessionStore>,
        config: &ControllerConfig,
    ) -> Self {
        Self {
            api,
            store,
            message_mode: config.message_mode,
            redirect_delay: config.login_redirect_delay(),
            generations: Generations::new(),
        }
    }

    #[tracing::instrument(skip(self, form), fields(email = %form.email.trim()))]
    pub async fn register(&self, form: RegisterForm) -> FormOutcome {
        let ticket = self.generations.begin(Control::Register);
        let result = self.api.register(&form.into_request()).await;
        if !self.generations.is_current(ticket) {
            return FormOutcome::Superseded;
        }

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "Register request failed");
                return FormOutcome::failure(AuthForm::Register.transport_failure());
            }
        };

        if response.is_ok() {
            tracing::info!("Registration accepted");
            return FormOutcome::Shown {
                message: UiMessage::success(response.message().unwrap_or(errors::REGISTER_SUCCESS)),
                clear_form: true,
                navigate: None,
            };
        }

        tracing::info!(status = response.status, "Registration rejected");
        FormOutcome::failure(errors::failure_message(
            AuthForm::Register,
            response.message(),
            self.message_mode,
        ))
    }

    /// Logs in. Success needs an ok status and a token in the body; the token
    /// is then stored and the outcome navigates to the dashboard.
    #[tracing::instrument(skip(self, form), fields(email = %form.email.trim()))]
    pub async fn login(&self, form: LoginForm) -> FormOutcome {
        let ticket = self.generations.begin(Control::Login);
        let result = self.api.login(&form.into_request()).await;
        if !self.generations.is_current(ticket) {
            return FormOutcome::Superseded;
        }

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "Login request failed");
                return FormOutcome::failure(AuthForm::Login.transport_failure());
            }
        };

        let token = response.str_field("token").filter(|_| response.is_ok());
        let Some(token) = token else {
            tracing::info!(status = response.status, "Login rejected");
            return FormOutcome::failure(errors::failure_message(
                AuthForm::Login,
                response.message(),
                self.message_mode,
            ));
        };

        if let Err(err) = self.store.set_token(token) {
            tracing::warn!(error = %err, "Cannot persist session token");
            return FormOutcome::failure(AuthForm::Login.transport_failure());
        }

        tracing::info!("Login accepted, session stored");
        FormOutcome::Shown {
            message: UiMessage::success(response.message().unwrap_or(errors::LOGIN_SUCCESS)),
            clear_form: false,
            navigate: Some(Navigation::Dashboard {
                after: self.redirect_delay,
            }),
        }
    }

    /// Drops the stored token and sends the user back to login.
    pub fn logout(&self) -> Navigation {
        if let Err(err) = self.store.clear_token() {
            tracing::warn!(error = %err, "Cannot clear session token");
        }
        tracing::info!("Logged out");
        Navigation::Login
    }
}
