//! Assistant chat web front-end
//!
//! A browser chat interface for a remote assistant backend: it renders the
//! conversation history, captures user input, calls the backend chat API and
//! reflects loading, conversation list and message list back into the page.
//!
//! # Architecture
//!
//! - **Server**: Axum router rendering HTML, enhanced with htmx fragment swaps
//! - **Sessions**: one chat state per browser session, identified by cookie
//! - **Backend client**: reqwest client for the assistant's REST API
//!
//! # Modules
//!
//! - [`api`]: backend API types, trait and HTTP client
//! - [`store`]: per-session chat state container
//! - [`session`]: send orchestration and session storage
//! - [`identity`]: user identity resolution
//! - [`ui`]: server-rendered views

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod api;
pub mod config;
pub mod identity;
pub mod server;
pub mod session;
pub mod store;
pub mod telemetry;
pub mod ui;

use crate::api::ChatBackend;
use crate::config::AppConfig;
use crate::identity::IdentityProvider;

use session::SessionStore;
use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Browser sessions and their chat state.
    pub sessions: SessionStore,
    /// Assistant backend client.
    pub backend: Arc<dyn ChatBackend>,
    /// Resolves the user id for new sessions.
    pub identity: Arc<dyn IdentityProvider>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}
