//! Chat session: one browser session's state plus the send orchestration.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::api::{ApiError, ChatBackend};
use crate::store::ChatState;

/// Default session timeout (30 minutes).
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Title used when the user creates a conversation explicitly.
pub const DEFAULT_CONVERSATION_TITLE: &str = "New Chat";

const SEND_FAILED: &str = "Failed to send message";
const LOAD_MESSAGES_FAILED: &str = "Failed to load messages";
const LOAD_CONVERSATIONS_FAILED: &str = "Failed to load conversations";
const CREATE_FAILED: &str = "Failed to create conversation";

/// Why a submit did not reach the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Input was empty or whitespace only.
    EmptyInput,
    /// A send is already in flight for this session.
    AlreadySending,
}

/// Result of [`ChatSession::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Message sent and its conversation adopted. A failed reload shows up
    /// as the state's error, not here.
    Sent { conversation_id: String },
    /// Message sent, but the user moved on before the reply arrived; only the
    /// conversation list was applied.
    Superseded { conversation_id: String },
    /// Nothing was sent.
    Ignored(IgnoreReason),
    /// The backend call failed; the error string was stored in the state.
    Failed(String),
}

/// Result of [`ChatSession::select_conversation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected,
    /// Already the current conversation; no fetch was issued.
    AlreadySelected,
    /// A newer request was issued while this one was in flight.
    Superseded,
    Failed(String),
}

/// Monotonic request tokens for the two independent parts of the state.
///
/// `view` covers the current conversation id and its message list, `list`
/// covers the conversation list. A response is applied only while its token
/// is still the latest of its lane.
#[derive(Debug, Default)]
struct Sequencer {
    view: u64,
    list: u64,
}

#[derive(Debug, Default)]
struct Shared {
    state: ChatState,
    seq: Sequencer,
    /// Conversation the latest view request leads to; `None` for a new chat
    /// or while the backend has yet to assign one.
    view_target: Option<String>,
}

impl Shared {
    fn next_view(&mut self, target: Option<&str>) -> u64 {
        self.seq.view += 1;
        self.view_target = target.map(str::to_string);
        self.seq.view
    }

    fn next_list(&mut self) -> u64 {
        self.seq.list += 1;
        self.seq.list
    }

    /// `id` is shown and no other view request is in flight.
    fn is_settled_on(&self, id: &str) -> bool {
        self.state.current_conversation_id() == Some(id)
            && self.view_target.as_deref() == Some(id)
    }
}

/// A single browser session.
///
/// Cloning is cheap and yields a handle to the same session. Backend calls
/// are made without holding the state lock, so a slow request never blocks
/// rendering or other actions of the same session.
#[derive(Debug, Clone)]
pub struct ChatSession {
    inner: Arc<ChatSessionInner>,
}

struct ChatSessionInner {
    /// Browser session identifier.
    id: String,
    /// Identity resolved when the session was created.
    user_id: String,
    backend: Arc<dyn ChatBackend>,
    shared: RwLock<Shared>,
    created_at: DateTime<Utc>,
    last_activity: RwLock<DateTime<Utc>>,
}

impl std::fmt::Debug for ChatSessionInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSessionInner")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl ChatSession {
    /// Create a session for `user_id` talking to `backend`.
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        backend: Arc<dyn ChatBackend>,
    ) -> Self {
        let now = Utc::now();
        Self {
            inner: Arc::new(ChatSessionInner {
                id: id.into(),
                user_id: user_id.into(),
                backend,
                shared: RwLock::new(Shared::default()),
                created_at: now,
                last_activity: RwLock::new(now),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.inner.user_id
    }

    /// Copy of the current state, for rendering.
    #[must_use]
    pub fn snapshot(&self) -> ChatState {
        self.read().state.clone()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Send orchestration
    // ─────────────────────────────────────────────────────────────────────────

    /// Send `text` as the next user message.
    ///
    /// Ignored without any backend call when the text is blank or a send is
    /// already in flight. Once the backend accepts the message its
    /// conversation id is adopted and the draft cleared; the message list and
    /// conversation list are then re-fetched from the backend, nothing is
    /// appended locally. A failed re-fetch is reported as a load error and
    /// leaves that part of the state as it was. A failed send changes only the
    /// loading flag and the error.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let (view_token, conversation_id) = {
            let mut shared = self.write();
            if text.trim().is_empty() {
                return SubmitOutcome::Ignored(IgnoreReason::EmptyInput);
            }
            if shared.state.is_loading() {
                return SubmitOutcome::Ignored(IgnoreReason::AlreadySending);
            }
            shared.state.set_input(text);
            shared.state.set_loading(true);
            shared.state.set_error(None);
            let conversation_id = shared
                .state
                .current_conversation_id()
                .map(str::to_string);
            (
                shared.next_view(conversation_id.as_deref()),
                conversation_id,
            )
        };
        self.touch();

        info!(
            name: "chat.send.started",
            session_id = %self.inner.id,
            conversation_id = ?conversation_id,
            "Sending message"
        );

        let reply = match self
            .inner
            .backend
            .send_message(&self.inner.user_id, text, conversation_id.as_deref())
            .await
        {
            Ok(reply) => reply,
            Err(err) => {
                let message = err.user_message(SEND_FAILED);
                warn!(
                    name: "chat.send.failed",
                    session_id = %self.inner.id,
                    error = %err,
                    "Send failed"
                );
                let mut shared = self.write();
                shared.state.set_loading(false);
                shared.state.set_error(Some(message.clone()));
                return SubmitOutcome::Failed(message);
            }
        };

        let (adopted, list_token) = {
            let mut shared = self.write();
            let adopted = shared.seq.view == view_token;
            if adopted {
                shared
                    .state
                    .set_current_conversation_id(Some(reply.conversation_id.clone()));
                shared.view_target = Some(reply.conversation_id.clone());
                shared.state.set_input("");
            }
            (adopted, shared.next_list())
        };

        let backend = &self.inner.backend;
        let messages = async {
            if adopted {
                Some(backend.list_messages(&reply.conversation_id).await)
            } else {
                None
            }
        };
        let (messages, conversations) =
            futures::future::join(messages, backend.list_conversations(&self.inner.user_id))
                .await;

        let mut shared = self.write();
        shared.state.set_loading(false);
        if shared.seq.list == list_token {
            match conversations {
                Ok(conversations) => shared.state.set_conversations(conversations),
                Err(err) => self.reload_failed(&mut shared, &err, LOAD_CONVERSATIONS_FAILED),
            }
        }

        if shared.seq.view != view_token {
            info!(
                name: "chat.send.superseded",
                session_id = %self.inner.id,
                conversation_id = %reply.conversation_id,
                "Reply arrived after the view changed; message list not applied"
            );
            return SubmitOutcome::Superseded {
                conversation_id: reply.conversation_id,
            };
        }
        match messages {
            Some(Ok(messages)) => shared.state.set_messages(messages),
            Some(Err(err)) => self.reload_failed(&mut shared, &err, LOAD_MESSAGES_FAILED),
            None => {}
        }
        info!(
            name: "chat.send.completed",
            session_id = %self.inner.id,
            conversation_id = %reply.conversation_id,
            "Message sent"
        );
        SubmitOutcome::Sent {
            conversation_id: reply.conversation_id,
        }
    }

    fn reload_failed(&self, shared: &mut Shared, err: &ApiError, fallback: &str) {
        warn!(
            name: "chat.send.reload_failed",
            session_id = %self.inner.id,
            error = %err,
            "Message sent but reload failed"
        );
        shared.state.set_error(Some(err.user_message(fallback)));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Conversation navigation
    // ─────────────────────────────────────────────────────────────────────────

    /// Make `id` the current conversation and show exactly its messages.
    ///
    /// Re-selecting the shown conversation is a no-op and issues no fetch,
    /// unless a request for another conversation is still in flight; that one
    /// is then superseded.
    pub async fn select_conversation(&self, id: &str) -> SelectOutcome {
        let token = {
            let mut shared = self.write();
            if shared.is_settled_on(id) {
                return SelectOutcome::AlreadySelected;
            }
            shared.next_view(Some(id))
        };
        self.touch();

        let result = self.inner.backend.list_messages(id).await;

        let mut shared = self.write();
        if shared.seq.view != token {
            return SelectOutcome::Superseded;
        }
        match result {
            Ok(messages) => {
                shared.state.set_current_conversation_id(Some(id.to_string()));
                shared.state.set_messages(messages);
                shared.state.set_error(None);
                info!(
                    name: "chat.conversation.selected",
                    session_id = %self.inner.id,
                    conversation_id = %id,
                    "Conversation selected"
                );
                SelectOutcome::Selected
            }
            Err(err) => {
                let message = err.user_message(LOAD_MESSAGES_FAILED);
                let shown = shared.state.current_conversation_id().map(str::to_string);
                shared.view_target = shown;
                warn!(
                    name: "chat.conversation.load_failed",
                    session_id = %self.inner.id,
                    conversation_id = %id,
                    error = %err,
                    "Failed to load messages"
                );
                shared.state.set_error(Some(message.clone()));
                SelectOutcome::Failed(message)
            }
        }
    }

    /// Leave the current conversation; the next send starts a new one.
    pub fn new_conversation(&self) {
        let mut shared = self.write();
        shared.next_view(None);
        shared.state.set_current_conversation_id(None);
        shared.state.set_messages(Vec::new());
        shared.state.set_error(None);
        drop(shared);
        self.touch();
    }

    /// Create an empty conversation on the backend and switch to it.
    pub async fn create_conversation(&self, title: Option<&str>) -> Result<String, String> {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_CONVERSATION_TITLE);
        let token = self.write().next_view(None);
        self.touch();

        match self
            .inner
            .backend
            .create_conversation(&self.inner.user_id, title)
            .await
        {
            Ok(created) => {
                {
                    let mut shared = self.write();
                    if shared.seq.view == token {
                        shared
                            .state
                            .set_current_conversation_id(Some(created.conversation_id.clone()));
                        shared.view_target = Some(created.conversation_id.clone());
                        shared.state.set_messages(Vec::new());
                        shared.state.set_error(None);
                    }
                }
                info!(
                    name: "chat.conversation.created",
                    session_id = %self.inner.id,
                    conversation_id = %created.conversation_id,
                    "Conversation created"
                );
                // The conversation exists even if the list refresh fails.
                let _ = self.refresh_conversations().await;
                Ok(created.conversation_id)
            }
            Err(err) => {
                let message = err.user_message(CREATE_FAILED);
                warn!(name: "chat.conversation.create_failed", error = %err, "Create failed");
                let mut shared = self.write();
                if shared.seq.view == token {
                    let shown = shared.state.current_conversation_id().map(str::to_string);
                    shared.view_target = shown;
                }
                shared.state.set_error(Some(message.clone()));
                Err(message)
            }
        }
    }

    /// Re-fetch the conversation list. Failures are stored as the error.
    pub async fn refresh_conversations(&self) -> Result<(), String> {
        let token = self.write().next_list();
        let result = self
            .inner
            .backend
            .list_conversations(&self.inner.user_id)
            .await;

        let mut shared = self.write();
        match result {
            Ok(conversations) => {
                if shared.seq.list == token {
                    shared.state.set_conversations(conversations);
                }
                Ok(())
            }
            Err(err) => {
                let message = err.user_message(LOAD_CONVERSATIONS_FAILED);
                warn!(
                    name: "chat.conversations.load_failed",
                    session_id = %self.inner.id,
                    error = %err,
                    "Failed to load conversations"
                );
                shared.state.set_error(Some(message.clone()));
                Err(message)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // View events
    // ─────────────────────────────────────────────────────────────────────────

    /// Store the input draft.
    pub fn set_input(&self, input: &str) {
        self.write().state.set_input(input);
        self.touch();
    }

    pub fn dismiss_error(&self) {
        self.write().state.set_error(None);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Check if the session has been idle longer than `timeout`.
    #[must_use]
    pub fn is_expired_with_timeout(&self, timeout: Duration) -> bool {
        let last = *self
            .inner
            .last_activity
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        // Negative duration means clock skew; treat as fresh.
        (Utc::now() - last)
            .to_std()
            .is_ok_and(|idle| idle > timeout)
    }

    fn touch(&self) {
        let mut guard = self
            .inner
            .last_activity
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Utc::now();
    }

    fn read(&self) -> RwLockReadGuard<'_, Shared> {
        self.inner
            .shared
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Shared> {
        self.inner
            .shared
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
