//! Assistant backend API.
//!
//! The backend exposes a small REST surface: send a message, list a user's
//! conversations, list a conversation's messages, create a conversation and
//! a health probe. This module only shapes requests and types responses;
//! there are no retries and no caching.
//!
//! - [`ChatBackend`]: the seam the chat session talks to
//! - [`HttpBackend`]: reqwest implementation

mod client;
mod error;
mod types;

pub use client::{DEFAULT_CHAT_PATH, HttpBackend};
pub use error::{ApiError, Result};
pub use types::{
    ChatReply, ChatRequest, Conversation, CreateConversationRequest, CreatedConversation, Message,
    Role,
};

use async_trait::async_trait;

/// Operations the chat UI needs from the assistant backend.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Post a user message. Without `conversation_id` the backend starts a
    /// new conversation and returns its id.
    async fn send_message(
        &self,
        user_id: &str,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<ChatReply>;

    /// All conversations of a user, in backend order.
    async fn list_conversations(&self, user_id: &str) -> Result<Vec<Conversation>>;

    /// Full message history of a conversation, in backend order.
    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<Message>>;

    /// Create an empty conversation.
    async fn create_conversation(&self, user_id: &str, title: &str)
    -> Result<CreatedConversation>;

    /// Liveness probe; the body is passed through untouched.
    async fn health(&self) -> Result<serde_json::Value>;
}
