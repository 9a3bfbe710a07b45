//! Chat messages exchanged with the backend

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// One entry of the ordered chat log
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    /// Milliseconds since the Unix epoch
    pub timestamp: f64,
}

impl ChatMessage {
    /// Locally authored message, id derived from the send time
    pub fn from_user(content: impl Into<String>, now_ms: f64) -> Self {
        Self {
            id: format!("user_{}", now_ms as u64),
            content: content.into(),
            sender: Sender::User,
            timestamp: now_ms,
        }
    }

    /// AI reply materialized from an `ai_response` event
    pub fn from_ai(content: impl Into<String>, now_ms: f64) -> Self {
        Self {
            id: format!("ai_{}", now_ms as u64),
            content: content.into(),
            sender: Sender::Ai,
            timestamp: now_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_sender_prefix() {
        assert_eq!(ChatMessage::from_user("hi", 1234.9).id, "user_1234");
        assert_eq!(ChatMessage::from_ai("hello", 99.0).id, "ai_99");
    }

    #[test]
    fn sender_is_lowercase_on_the_wire() {
        let msg = ChatMessage::from_ai("x", 1.0);
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""sender":"ai""#));
    }
}
