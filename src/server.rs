use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use tracing::{info, warn};

use crate::AppState;
use crate::api::{ChatBackend, HttpBackend};
use crate::config::AppConfig;
use crate::identity::{IdentityProvider, StaticIdentity};
use crate::session::{ChatSession, SessionStore};
use crate::ui;

/// Cookie carrying the browser session id.
pub const SESSION_COOKIE: &str = "chat_session";

/// Build the backend client described by the configuration.
pub fn build_backend(config: &AppConfig) -> anyhow::Result<HttpBackend> {
    let mut http = reqwest::Client::builder();
    if config.backend.connect_timeout_secs > 0 {
        http = http.connect_timeout(Duration::from_secs(config.backend.connect_timeout_secs));
    }
    let backend = HttpBackend::with_client(&config.backend.base_url, http.build()?)?
        .with_chat_path(&config.backend.chat_path);
    Ok(backend)
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let backend: Arc<dyn ChatBackend> = Arc::new(build_backend(&config)?);
    info!(
        name: "backend.config.loaded",
        base_url = %config.backend.base_url,
        chat_path = %config.backend.chat_path,
        "Backend configuration loaded"
    );

    let identity: Arc<dyn IdentityProvider> =
        Arc::new(StaticIdentity::new(config.identity.user_id.clone()));

    let sessions = SessionStore::new(Arc::clone(&backend));
    let sweeper = sessions.spawn_sweeper(
        Duration::from_secs(config.session.idle_timeout_secs),
        Duration::from_secs(config.session.sweep_interval_secs.max(1)),
    );

    let state = AppState {
        sessions,
        backend,
        identity,
        config: Arc::clone(&config),
    };

    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    let result = axum::serve(listener, app.into_make_service()).await;
    sweeper.abort();
    result?;
    Ok(())
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.server.static_dir.clone();
    Router::new()
        // HTML pages and fragments
        .route("/", get(index_handler))
        .route("/chat/panel", get(panel_handler))
        // Chat actions
        .route("/chat/send", post(send_handler))
        .route("/chat/input", post(input_handler))
        .route("/chat/error/dismiss", post(dismiss_error_handler))
        // Conversation actions
        .route("/conversations/select", post(select_handler))
        .route("/conversations/new", post(new_conversation_handler))
        .route("/conversations/create", post(create_conversation_handler))
        .route("/conversations/refresh", post(refresh_handler))
        .route("/health", get(health_handler))
        // Static assets
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Browser session
// ─────────────────────────────────────────────────────────────────────────────

type HandlerError = (StatusCode, String);

/// Find the session named by the cookie, or start a new one.
///
/// New sessions resolve the user identity once and load the conversation
/// list right away.
async fn browser_session(
    state: &AppState,
    jar: CookieJar,
) -> Result<(ChatSession, CookieJar), HandlerError> {
    if let Some(session) = jar
        .get(SESSION_COOKIE)
        .and_then(|c| state.sessions.get(c.value()))
    {
        return Ok((session, jar));
    }

    let user_id = state.identity.resolve().await.map_err(|e| {
        warn!(name: "identity.unavailable", error = %e, "Cannot start chat session");
        (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
    })?;
    let session = state.sessions.create(&user_id);
    info!(
        name: "session.created",
        session_id = %session.id(),
        "Chat session created"
    );
    // A failed load is shown in the error banner.
    let _ = session.refresh_conversations().await;

    let cookie = Cookie::build((SESSION_COOKIE, session.id().to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    Ok((session, jar.add(cookie)))
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers.get("hx-request").is_some_and(|v| v == "true")
}

/// htmx callers get the re-rendered panel, plain form posts a redirect home.
fn panel_response(session: &ChatSession, jar: CookieJar, headers: &HeaderMap) -> Response {
    if is_htmx(headers) {
        (jar, Html(ui::chat::chat_panel(&session.snapshot()))).into_response()
    } else {
        (jar, Redirect::to("/")).into_response()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Page Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - Full chat page.
async fn index_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, HandlerError> {
    let (session, jar) = browser_session(&state, jar).await?;
    let panel = ui::chat::chat_panel(&session.snapshot());
    let page = ui::layout::page("Chat", &state.config.server.htmx_src, &panel);
    Ok((jar, Html(page)).into_response())
}

/// GET /chat/panel - Chat panel fragment.
async fn panel_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, HandlerError> {
    let (session, jar) = browser_session(&state, jar).await?;
    Ok((jar, Html(ui::chat::chat_panel(&session.snapshot()))).into_response())
}

// ─────────────────────────────────────────────────────────────────────────────
// Action Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Form body carrying the message textarea.
#[derive(Debug, Deserialize)]
struct MessageForm {
    #[serde(default)]
    message: String,
}

/// POST /chat/send - Send the message and re-render.
async fn send_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Form(form): Form<MessageForm>,
) -> Result<Response, HandlerError> {
    let (session, jar) = browser_session(&state, jar).await?;
    let outcome = session.submit(&form.message).await;
    tracing::debug!(session_id = %session.id(), ?outcome, "Submit handled");
    Ok(panel_response(&session, jar, &headers))
}

/// POST /chat/input - Save the draft.
async fn input_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<MessageForm>,
) -> Result<Response, HandlerError> {
    let (session, jar) = browser_session(&state, jar).await?;
    session.set_input(&form.message);
    Ok((jar, StatusCode::NO_CONTENT).into_response())
}

/// POST /chat/error/dismiss - Clear the error banner.
async fn dismiss_error_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Response, HandlerError> {
    let (session, jar) = browser_session(&state, jar).await?;
    session.dismiss_error();
    Ok(panel_response(&session, jar, &headers))
}

#[derive(Debug, Deserialize)]
struct SelectForm {
    conversation_id: String,
}

/// POST /conversations/select - Switch conversation.
async fn select_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Form(form): Form<SelectForm>,
) -> Result<Response, HandlerError> {
    let (session, jar) = browser_session(&state, jar).await?;
    session.select_conversation(&form.conversation_id).await;
    Ok(panel_response(&session, jar, &headers))
}

/// POST /conversations/new - Start an unsaved conversation.
async fn new_conversation_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Response, HandlerError> {
    let (session, jar) = browser_session(&state, jar).await?;
    session.new_conversation();
    Ok(panel_response(&session, jar, &headers))
}

#[derive(Debug, Deserialize)]
struct CreateForm {
    #[serde(default)]
    title: Option<String>,
}

/// POST /conversations/create - Create a conversation on the backend.
async fn create_conversation_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Form(form): Form<CreateForm>,
) -> Result<Response, HandlerError> {
    let (session, jar) = browser_session(&state, jar).await?;
    let _ = session.create_conversation(form.title.as_deref()).await;
    Ok(panel_response(&session, jar, &headers))
}

/// POST /conversations/refresh - Reload the conversation list.
async fn refresh_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Response, HandlerError> {
    let (session, jar) = browser_session(&state, jar).await?;
    let _ = session.refresh_conversations().await;
    Ok(panel_response(&session, jar, &headers))
}

/// Health response: this service is up, backend status attached.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    backend: serde_json::Value,
}

/// GET /health - Liveness plus backend probe.
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let backend = match state.backend.health().await {
        Ok(body) => body,
        Err(e) => serde_json::json!({ "status": "unreachable", "error": e.to_string() }),
    };
    Json(HealthResponse {
        status: "ok",
        backend,
    })
}
