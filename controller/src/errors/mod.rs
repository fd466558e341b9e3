//! Global application error types.
//!
//! Operation handlers never surface transport failures as errors; they turn
//! them into UI messages. What remains here are the failures that stop the
//! controller from being built or used at all: bad configuration and an
//! unusable session store.

use thiserror::Error;

use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Adapter(#[from] dashgate_adapters::AdapterError),
}

pub type Result<T> = std::result::Result<T, ControllerError>;
