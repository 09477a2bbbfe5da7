//! Wire types exchanged with the assistant backend.
//!
//! The backend stores documents with Mongo-style `_id` keys; those are
//! renamed to plain `id` here.

use serde::{Deserialize, Serialize};

// =============================================================================
// Domain Types
// =============================================================================

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user.
    User,
    /// The assistant backend.
    Assistant,
}

impl Role {
    /// Lowercase wire name, also used as a CSS modifier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One turn in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Server-assigned identifier.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub role: Role,
    pub content: String,
    /// Server timestamp, passed through as received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Message {
    /// Build a message without server metadata.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: None,
            role,
            content: content.into(),
            created_at: None,
        }
    }
}

/// A server-persisted thread of messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub updated_at: String,
}

// =============================================================================
// Chat API Types
// =============================================================================

/// Body of the send-message call.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub user_id: String,
    pub message: String,
    /// Omitted when the next send should start a new conversation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

/// Backend answer to a send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Conversation the message landed in (newly created if none was sent).
    pub conversation_id: String,
    /// Assistant reply text.
    pub response: String,
}

// =============================================================================
// Conversation API Types
// =============================================================================

/// Body of the create-conversation call.
#[derive(Debug, Clone, Serialize)]
pub struct CreateConversationRequest {
    pub user_id: String,
    pub title: String,
}

/// Backend answer to a create-conversation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedConversation {
    pub conversation_id: String,
}

/// Error body returned by the backend on non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: serde_json::Value,
}
