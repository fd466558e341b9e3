//! Module for the dashboard services.
//!
//! `profile_sync` sequences the dashboard's requests, `transitions` holds the
//! pure state machine behind it and `generation` decides which responses are
//! still wanted.

pub mod generation;
pub mod profile_sync;
pub mod transitions;

pub use profile_sync::ProfileSync;
