//! Authentication module: the register/login forms, token introspection and
//! the failure texts shown for them.

pub mod errors;
pub mod models;
pub mod service;
pub mod token;

pub use models::{LoginForm, RegisterForm};
pub use service::AuthService;
pub use token::{decode_token_payload, display_name, TokenPayload};
