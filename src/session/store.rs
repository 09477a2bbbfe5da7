//! Browser session storage.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use super::chat::ChatSession;
use crate::api::ChatBackend;

/// Thread-safe store for chat sessions.
///
/// Provides methods for creating, retrieving, and cleaning up sessions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    sessions: RwLock<HashMap<String, ChatSession>>,
    backend: Arc<dyn ChatBackend>,
}

impl std::fmt::Debug for SessionStoreInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStoreInner")
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create an empty store whose sessions talk to `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                sessions: RwLock::new(HashMap::new()),
                backend,
            }),
        }
    }

    /// Create a new session for `user_id` under a fresh UUID and return it.
    #[must_use]
    pub fn create(&self, user_id: &str) -> ChatSession {
        let id = Uuid::new_v4().to_string();
        let session = ChatSession::new(id.clone(), user_id, Arc::clone(&self.inner.backend));
        self.inner
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, session.clone());
        debug!(session_id = %session.id(), "Chat session created");
        session
    }

    /// Get a session by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<ChatSession> {
        let guard = self
            .inner
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        guard.get(id).cloned()
    }

    /// Get the number of active sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if there are no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove sessions that have been inactive longer than `timeout`.
    ///
    /// Returns the number of sessions removed.
    pub fn cleanup_expired(&self, timeout: Duration) -> usize {
        let mut guard = self
            .inner
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = guard.len();
        guard.retain(|_, session| !session.is_expired_with_timeout(timeout));
        before - guard.len()
    }

    /// Periodically drop idle sessions until the returned task is aborted.
    pub fn spawn_sweeper(&self, timeout: Duration, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let removed = store.cleanup_expired(timeout);
                if removed > 0 {
                    info!(
                        name: "session.sweep",
                        removed,
                        remaining = store.len(),
                        "Expired chat sessions removed"
                    );
                }
            }
        })
    }
}
