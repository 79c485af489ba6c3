//! Session domain module.
//!
//! This module contains the chat message model, entity binding types and the
//! [`SessionStore`] contract.
//!
//! # Module Structure
//!
//! - `message`: Chat message record (`ChatMessage`)
//! - `model`: Entity binding and session handles (`EntityRef`, `SessionHandle`, `AppendOptions`)
//! - `store`: Trait for the session lifecycle owner (`SessionStore`)

mod message;
mod model;
mod store;

pub use message::ChatMessage;
pub use model::{AppendOptions, EntityRef, SessionHandle};
pub use store::SessionStore;
