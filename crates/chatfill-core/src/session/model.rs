//! Session domain model.
//!
//! A session (chat) is an ordered, persisted sequence of messages bound to
//! one entity: either a single character or a group.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The character or group a conversation is associated with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    /// A single character, identified by its character id.
    Character(String),
    /// A group chat, identified by its group id.
    Group(String),
}

impl EntityRef {
    /// Returns the raw id regardless of entity kind.
    pub fn id(&self) -> &str {
        match self {
            EntityRef::Character(id) | EntityRef::Group(id) => id,
        }
    }

    /// Returns a filesystem-friendly key such as `character-42`.
    pub fn storage_key(&self) -> String {
        match self {
            EntityRef::Character(id) => format!("character-{id}"),
            EntityRef::Group(id) => format!("group-{id}"),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Character(id) => write!(f, "character {id}"),
            EntityRef::Group(id) => write!(f, "group {id}"),
        }
    }
}

/// Identifies a session created by a [`SessionStore`](super::SessionStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHandle {
    /// Unique session identifier
    pub id: String,
    /// Entity the session is bound to
    pub entity: EntityRef,
}

/// Options for appending a single message to the active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppendOptions {
    /// Whether the host view should scroll to the appended message.
    pub scroll: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_display_and_key() {
        let character = EntityRef::Character("7".to_string());
        let group = EntityRef::Group("party".to_string());

        assert_eq!(character.to_string(), "character 7");
        assert_eq!(group.storage_key(), "group-party");
        assert_eq!(group.id(), "party");
    }
}
