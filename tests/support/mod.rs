//! Fake assistant backend served over real HTTP on an ephemeral port.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};

#[derive(Default)]
pub struct Db {
    pub conversations: Vec<Value>,
    pub messages: HashMap<String, Vec<Value>>,
    pub chat_requests: Vec<Value>,
    pub message_fetches: usize,
    pub fail_chat: bool,
    next_id: usize,
}

impl Db {
    fn new_id(&mut self) -> String {
        self.next_id += 1;
        format!("c{}", self.next_id)
    }

    fn push_message(&mut self, conversation_id: &str, role: &str, content: &str) {
        let thread = self.messages.entry(conversation_id.to_string()).or_default();
        let order = thread.len() + 1;
        thread.push(json!({
            "_id": format!("{conversation_id}-m{order}"),
            "conversation_id": conversation_id,
            "role": role,
            "content": content,
            "created_at": "2025-01-01T00:00:00",
            "message_order": order,
        }));
    }

    fn create_conversation(&mut self, user_id: &str, title: &str) -> String {
        let id = self.new_id();
        self.conversations.insert(
            0,
            json!({
                "_id": id,
                "user_id": user_id,
                "title": title,
                "created_at": "2025-01-01T00:00:00",
                "updated_at": "2025-01-01T00:00:00",
            }),
        );
        self.messages.insert(id.clone(), Vec::new());
        id
    }
}

type Shared = Arc<Mutex<Db>>;

/// Handle to a running fake backend.
pub struct FakeBackend {
    pub base_url: String,
    pub db: Shared,
}

impl FakeBackend {
    /// Bind to `127.0.0.1:0` and serve until the test runtime shuts down.
    pub async fn start() -> Self {
        let db: Shared = Arc::new(Mutex::new(Db::default()));
        let app = Router::new()
            .route("/api/chat", post(chat))
            .route("/chat", post(chat))
            .route("/conversations", post(create_conversation))
            .route("/conversations/{id}", get(list_conversations))
            .route("/conversations/{id}/messages", get(list_messages))
            .route("/health", get(health))
            .with_state(Arc::clone(&db));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            db,
        }
    }

    /// Seed a conversation for `user_id` with alternating user/assistant turns.
    pub fn seed(&self, user_id: &str, title: &str, turns: &[&str]) -> String {
        let mut db = self.db.lock().unwrap();
        let id = db.create_conversation(user_id, title);
        for (i, content) in turns.iter().enumerate() {
            let role = if i % 2 == 0 { "user" } else { "assistant" };
            db.push_message(&id, role, content);
        }
        id
    }

    pub fn fail_chat(&self) {
        self.db.lock().unwrap().fail_chat = true;
    }

    pub fn chat_requests(&self) -> Vec<Value> {
        self.db.lock().unwrap().chat_requests.clone()
    }

    pub fn message_fetches(&self) -> usize {
        self.db.lock().unwrap().message_fetches
    }
}

fn detail(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

async fn chat(State(db): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut db = db.lock().unwrap();
    db.chat_requests.push(body.clone());
    if db.fail_chat {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "Model unavailable");
    }

    let user_id = body["user_id"].as_str().unwrap_or_default().to_string();
    let message = body["message"].as_str().unwrap_or_default().to_string();
    let id = match body.get("conversation_id").and_then(Value::as_str) {
        Some(id) if db.messages.contains_key(id) => id.to_string(),
        Some(_) => return detail(StatusCode::NOT_FOUND, "Conversation not found"),
        None => db.create_conversation(&user_id, "New Chat"),
    };

    let response = format!("Echo: {message}");
    db.push_message(&id, "user", &message);
    db.push_message(&id, "assistant", &response);
    Json(json!({ "conversation_id": id, "response": response })).into_response()
}

async fn create_conversation(State(db): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut db = db.lock().unwrap();
    let user_id = body["user_id"].as_str().unwrap_or_default().to_string();
    let title = body["title"].as_str().unwrap_or("New Conversation").to_string();
    let id = db.create_conversation(&user_id, &title);
    Json(json!({ "conversation_id": id })).into_response()
}

async fn list_conversations(State(db): State<Shared>, Path(user_id): Path<String>) -> Response {
    let db = db.lock().unwrap();
    let conversations: Vec<Value> = db
        .conversations
        .iter()
        .filter(|c| c["user_id"] == user_id.as_str())
        .cloned()
        .collect();
    Json(conversations).into_response()
}

async fn list_messages(State(db): State<Shared>, Path(id): Path<String>) -> Response {
    let mut db = db.lock().unwrap();
    db.message_fetches += 1;
    match db.messages.get(&id) {
        Some(messages) => Json(messages.clone()).into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response(),
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "database": "connected" }))
}
