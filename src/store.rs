//! Per-session chat state.
//!
//! [`ChatState`] is a plain container: every field has a single-purpose
//! setter and nothing is derived. Keeping fields consistent with each other
//! (for example clearing messages when the conversation id is cleared) is
//! the job of [`crate::session::ChatSession`].

use crate::api::{Conversation, Message};

/// UI-relevant state of one browser session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatState {
    messages: Vec<Message>,
    current_conversation_id: Option<String>,
    conversations: Vec<Conversation>,
    input: String,
    loading: bool,
    error: Option<String>,
}

impl ChatState {
    /// Create an empty state: no conversation, no draft, idle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// `None` means the next send creates a conversation.
    #[must_use]
    pub fn current_conversation_id(&self) -> Option<&str> {
        self.current_conversation_id.as_deref()
    }

    #[must_use]
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the message list.
    pub fn set_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    /// Replace the conversation list.
    pub fn set_conversations(&mut self, conversations: Vec<Conversation>) {
        self.conversations = conversations;
    }

    pub fn set_current_conversation_id(&mut self, id: Option<String>) {
        self.current_conversation_id = id;
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}
