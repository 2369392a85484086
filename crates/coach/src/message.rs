//! Transcript entries.

use serde::{Deserialize, Serialize};

use crate::error::CoachError;

/// Maximum length of a single user message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// Who said it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// Trim `text` and check it is worth sending.
pub fn normalize_user_text(text: &str) -> Result<&str, CoachError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CoachError::InvalidMessage(
            "Message must not be empty".into(),
        ));
    }
    if trimmed.chars().count() > MAX_MESSAGE_CHARS {
        return Err(CoachError::InvalidMessage(format!(
            "Message must be at most {MAX_MESSAGE_CHARS} characters"
        )));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn text_is_trimmed() {
        assert_eq!(normalize_user_text("  hello \n").unwrap(), "hello");
    }

    #[test]
    fn blank_and_oversized_text_rejected() {
        assert_matches!(normalize_user_text(" \t "), Err(CoachError::InvalidMessage(_)));
        let long = "a".repeat(MAX_MESSAGE_CHARS + 1);
        assert_matches!(normalize_user_text(&long), Err(CoachError::InvalidMessage(_)));
        assert!(normalize_user_text(&"a".repeat(MAX_MESSAGE_CHARS)).is_ok());
    }

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_value(ChatMessage::model("hi")).unwrap();
        assert_eq!(json["role"], "model");
    }
}
