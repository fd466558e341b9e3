//! Form inputs for the auth flow.
//!
//! These mirror what a user types; `into_request` trims them into the wire
//! models the adapters send.

use dashgate_adapters::{LoginRequest, RegisterRequest};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub age: Option<u32>,
}

impl RegisterForm {
    pub fn into_request(self) -> RegisterRequest {
        RegisterRequest {
            email: self.email.trim().to_string(),
            password: self.password.trim().to_string(),
            age: self.age,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn into_request(self) -> LoginRequest {
        LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.trim().to_string(),
        }
    }
}
