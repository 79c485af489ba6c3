//! On-disk representation of a session.

use chatfill_core::session::{ChatMessage, EntityRef, SessionHandle};
use serde::{Deserialize, Serialize};

/// Current schema version of session files.
pub const SESSION_SCHEMA_VERSION: &str = "1.0.0";

/// A session as written to `<sessions_dir>/<entity-key>/<id>.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Human-readable session title
    pub title: String,
    /// Timestamp when the session was created (RFC 3339)
    pub created_at: String,
    /// Timestamp when the session was last updated (RFC 3339)
    pub updated_at: String,
    /// The character or group the session belongs to
    pub entity: EntityRef,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

fn default_schema_version() -> String {
    SESSION_SCHEMA_VERSION.to_string()
}

impl StoredSession {
    /// Creates an empty session for `entity` with a fresh UUID.
    pub fn new(entity: EntityRef) -> Self {
        let now = chrono::Utc::now();
        Self {
            schema_version: default_schema_version(),
            id: uuid::Uuid::new_v4().to_string(),
            title: format!("{} - {}", entity, now.format("%Y-%m-%d %Hh%Mm%Ss")),
            created_at: now.to_rfc3339(),
            updated_at: now.to_rfc3339(),
            entity,
            messages: Vec::new(),
        }
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            id: self.id.clone(),
            entity: self.entity.clone(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

/// Lightweight listing entry for a stored session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub updated_at: String,
    pub message_count: usize,
}

impl From<&StoredSession> for SessionSummary {
    fn from(session: &StoredSession) -> Self {
        Self {
            id: session.id.clone(),
            title: session.title.clone(),
            updated_at: session.updated_at.clone(),
            message_count: session.messages.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_toml_roundtrip_keeps_message_fields() {
        let mut session = StoredSession::new(EntityRef::Group("party".to_string()));
        let mut message = ChatMessage::from_character("Narrator", "The tavern is quiet.");
        message.swipe_id = Some(1);
        message.swipes = vec!["first".to_string(), "second".to_string()];
        message
            .extra
            .insert("model".to_string(), "local".to_string());
        session.messages.push(message);
        session.messages.push(ChatMessage::from_user("User", "Hello"));

        let text = toml::to_string_pretty(&session).unwrap();
        let parsed: StoredSession = toml::from_str(&text).unwrap();

        assert_eq!(parsed, session);
    }
}
