use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chat message delivered to the bot by the platform adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    pub channel_id: String,
    pub author_id: String,
    pub author_name: String,
    pub content: String,
    /// Set when the message arrived through a private channel with the author.
    #[serde(default)]
    pub is_private: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutboundMessage {
    pub message_id: Uuid,
    pub channel_id: String,
    pub content: String,
}

impl OutboundMessage {
    pub fn new(channel_id: impl Into<String>, content: impl Into<String>) -> Self {
        OutboundMessage {
            message_id: Uuid::new_v4(),
            channel_id: channel_id.into(),
            content: content.into(),
        }
    }

    /// A message addressed back to the author of `message`, prefixed with their mention.
    pub fn reply_to(message: &InboundMessage, content: impl AsRef<str>) -> Self {
        Self::new(
            message.channel_id.clone(),
            format!("<@{}>, {}", message.author_id, content.as_ref()),
        )
    }
}
