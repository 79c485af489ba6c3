//! Chat message types.
//!
//! A [`ChatMessage`] mirrors a single record of the host chat log. The
//! duplication pipeline treats it as an opaque value: it is cloned, never
//! inspected or edited.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Display name of the author (user persona, character or narrator).
    pub name: String,
    /// Whether the message was written by the user.
    #[serde(default)]
    pub is_user: bool,
    /// Whether the message is a system/narrator message.
    #[serde(default)]
    pub is_system: bool,
    /// Timestamp when the message was sent (RFC 3339).
    #[serde(default)]
    pub send_date: String,
    /// The text body.
    pub mes: String,
    /// Index of the currently shown swipe variant, if the message has any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swipe_id: Option<u32>,
    /// Alternative generations for this message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub swipes: Vec<String>,
    /// Host-specific metadata carried through untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl ChatMessage {
    /// Creates a message authored by the user, stamped with the current time.
    pub fn from_user(name: impl Into<String>, mes: impl Into<String>) -> Self {
        Self::new(name, mes, true)
    }

    /// Creates a message authored by a character, stamped with the current time.
    pub fn from_character(name: impl Into<String>, mes: impl Into<String>) -> Self {
        Self::new(name, mes, false)
    }

    fn new(name: impl Into<String>, mes: impl Into<String>, is_user: bool) -> Self {
        Self {
            name: name.into(),
            is_user,
            is_system: false,
            send_date: chrono::Utc::now().to_rfc3339(),
            mes: mes.into(),
            swipe_id: None,
            swipes: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Returns a short single-line preview of the text body, for logs.
    pub fn preview(&self, max_chars: usize) -> String {
        let line = self.mes.lines().next().unwrap_or_default();
        if line.chars().count() > max_chars {
            let cut: String = line.chars().take(max_chars).collect();
            format!("{cut}…")
        } else {
            line.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_first_line() {
        let msg = ChatMessage::from_character("Seraphina", "Welcome to the glade\nSecond line");
        assert_eq!(msg.preview(7), "Welcome…");
        assert_eq!(msg.preview(100), "Welcome to the glade");
    }

    #[test]
    fn test_optional_fields_default_when_missing() {
        let msg: ChatMessage = serde_json::from_str(r#"{"name":"User","mes":"hi"}"#).unwrap();
        assert!(!msg.is_user);
        assert!(msg.swipe_id.is_none());
        assert!(msg.swipes.is_empty());
        assert!(msg.extra.is_empty());
    }
}
