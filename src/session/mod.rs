//! Chat sessions and their orchestration.
//!
//! Each browser session owns one [`ChatSession`]: the [`ChatState`] shown in
//! the UI plus the operations that move it (send, select, new, refresh).
//! Sessions are identified by UUID and live in a [`SessionStore`] until they
//! have been idle for too long.
//!
//! # Architecture
//!
//! - [`ChatSession`]: state of one browser session and the send state machine
//! - [`SessionStore`]: thread-safe store for all active sessions
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use assistant_chat_web::api::HttpBackend;
//! use assistant_chat_web::session::SessionStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = Arc::new(HttpBackend::new("http://localhost:8000")?);
//! let store = SessionStore::new(backend);
//! let session = store.create("user123");
//! session.submit("Hello").await;
//!
//! let state = session.snapshot();
//! assert_eq!(state.messages().len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! [`ChatState`]: crate::store::ChatState

mod chat;
mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use chat::{
    ChatSession, DEFAULT_CONVERSATION_TITLE, DEFAULT_SESSION_TIMEOUT, IgnoreReason,
    SelectOutcome, SubmitOutcome,
};
pub use store::SessionStore;
