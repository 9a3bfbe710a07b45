//! Wire protocol - JSON text frames `{"event": <kind>, "data": {...}}`

use serde::{Deserialize, Serialize};

use crate::types::{ChatMessage, EmotionVector};

/// Frames sent to the backend
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    UserMessage { content: String, timestamp: f64 },
    /// Base64-encoded audio bytes
    AudioData { audio: String, timestamp: f64 },
}

impl ClientEvent {
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Frames pushed by the backend
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    EmotionUpdate(EmotionVector),
    ChatMessage(ChatMessage),
    AiResponse {
        content: String,
        #[serde(default)]
        emotion: Option<String>,
    },
}

impl ServerEvent {
    pub fn parse(frame: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(frame)
    }
}
