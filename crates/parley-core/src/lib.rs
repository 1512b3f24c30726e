//! Domain layer for Parley.
//!
//! Holds the message log and its transitions, language handling, the
//! capability gateway boundary and the configuration model. Nothing here
//! performs I/O.

pub mod capability;
pub mod chat;
pub mod config;
pub mod error;
pub mod language;

// Re-export common error type
pub use error::{ParleyError, Result};
