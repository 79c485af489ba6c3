//! Core domain of chatfill.
//!
//! Copies a fixed set of messages, picked by position, from the active chat
//! into a freshly created chat for the same character or group.

pub mod config;
pub mod duplicate;
pub mod error;
pub mod session;

// Re-export common error type
pub use error::ChatfillError;
