//! Session store trait.
//!
//! Defines the contract the duplication pipeline consumes from whatever owns
//! the live chat (a desktop host, a file-backed store, a test double).

use super::message::ChatMessage;
use super::model::{AppendOptions, EntityRef, SessionHandle};
use crate::error::Result;
use async_trait::async_trait;

/// An abstract owner of the chat/session lifecycle.
///
/// The store always has at most one *active* session. `current_messages`
/// reads whichever session is active at call time, so after
/// `create_session` succeeds it reflects the new, empty session.
///
/// # Implementation Notes
///
/// Implementations own the busy indicators. A store shared by concurrent
/// callers should report `is_saving` from the moment `create_session`
/// succeeds until [`finish_operation`](Self::finish_operation) is called, so
/// a second duplication started meanwhile is rejected before it reads or
/// switches the active session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the currently selected character or group, if any.
    async fn active_entity(&self) -> Option<EntityRef>;

    /// Whether a reply is currently being generated into the active session.
    async fn is_generating(&self) -> bool;

    /// Whether the active session is currently being saved.
    async fn is_saving(&self) -> bool;

    /// Returns the ID of the active session, if any.
    async fn current_session_id(&self) -> Option<String>;

    /// Returns a copy of the active session's ordered message list.
    async fn current_messages(&self) -> Vec<ChatMessage>;

    /// Creates a new empty session bound to the active entity and makes it
    /// the active session.
    ///
    /// # Arguments
    ///
    /// * `delete_current` - Whether the previously active session should be
    ///   deleted
    ///
    /// # Returns
    ///
    /// - `Ok(SessionHandle)`: The new session is usable and active
    /// - `Err(_)`: No session was created
    async fn create_session(&self, delete_current: bool) -> Result<SessionHandle>;

    /// Appends one message to the end of the active session.
    async fn append_message(&self, message: ChatMessage, options: AppendOptions) -> Result<()>;

    /// Persists the active session.
    async fn persist_current_session(&self) -> Result<()>;

    /// Called once when a run that created a session has ended, whatever
    /// the outcome. Stores that stay busy from `create_session` onward clear
    /// that state here.
    async fn finish_operation(&self) {}
}
