//! In-memory backend for session tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::api::{
    ApiError, ChatBackend, ChatReply, Conversation, CreatedConversation, Message, Result, Role,
};

#[derive(Default)]
struct Data {
    conversations: Vec<Conversation>,
    messages: HashMap<String, Vec<Message>>,
    next_id: usize,
    fail_send: Option<Option<String>>,
    fail_list_messages: bool,
    fail_list_conversations: bool,
    fail_create: bool,
}

/// Behaves like the real backend: a send without conversation id creates
/// one, both turns are stored, and the assistant echoes the user.
#[derive(Default)]
pub(crate) struct FakeBackend {
    data: Mutex<Data>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    send_gate: Mutex<Option<Arc<Notify>>>,
    pub sends: AtomicUsize,
    pub message_fetches: AtomicUsize,
    pub last_send: Mutex<Option<(String, String, Option<String>)>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a conversation with the given messages.
    pub fn with_conversation(self, id: &str, title: &str, messages: &[(Role, &str)]) -> Self {
        {
            let mut data = self.data.lock().unwrap();
            data.conversations.push(Conversation {
                id: id.to_string(),
                title: title.to_string(),
                updated_at: "2025-01-01T00:00:00".to_string(),
            });
            data.messages.insert(
                id.to_string(),
                messages
                    .iter()
                    .map(|(role, content)| Message::new(*role, *content))
                    .collect(),
            );
        }
        self
    }

    /// Make sends fail with a backend error carrying `detail`.
    pub fn fail_sends(&self, detail: Option<&str>) {
        self.data.lock().unwrap().fail_send = Some(detail.map(str::to_string));
    }

    pub fn fail_message_fetches(&self) {
        self.data.lock().unwrap().fail_list_messages = true;
    }

    pub fn fail_conversation_fetches(&self) {
        self.data.lock().unwrap().fail_list_conversations = true;
    }

    pub fn fail_creates(&self) {
        self.data.lock().unwrap().fail_create = true;
    }

    /// Block message fetches for `conversation_id` until the returned
    /// notifier fires.
    pub fn gate_messages(&self, conversation_id: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(conversation_id.to_string(), Arc::clone(&notify));
        notify
    }

    /// Block the next send until the returned notifier fires.
    pub fn gate_sends(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.send_gate.lock().unwrap() = Some(Arc::clone(&notify));
        notify
    }

    pub fn stored_messages(&self, conversation_id: &str) -> Vec<Message> {
        self.data
            .lock()
            .unwrap()
            .messages
            .get(conversation_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn send_message(
        &self,
        user_id: &str,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<ChatReply> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        *self.last_send.lock().unwrap() = Some((
            user_id.to_string(),
            message.to_string(),
            conversation_id.map(str::to_string),
        ));
        let gate = self.send_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut data = self.data.lock().unwrap();
        if let Some(detail) = data.fail_send.clone() {
            return Err(ApiError::Backend { status: 500, detail });
        }
        let id = match conversation_id {
            Some(id) => {
                if !data.messages.contains_key(id) {
                    return Err(ApiError::Backend {
                        status: 404,
                        detail: Some("Conversation not found".to_string()),
                    });
                }
                id.to_string()
            }
            None => {
                data.next_id += 1;
                let id = format!("c{}", data.next_id);
                data.conversations.insert(
                    0,
                    Conversation {
                        id: id.clone(),
                        title: "New Chat".to_string(),
                        updated_at: "2025-01-02T00:00:00".to_string(),
                    },
                );
                data.messages.insert(id.clone(), Vec::new());
                id
            }
        };
        let response = format!("Echo: {message}");
        let thread = data.messages.entry(id.clone()).or_default();
        thread.push(Message::new(Role::User, message));
        thread.push(Message::new(Role::Assistant, response.clone()));
        Ok(ChatReply {
            conversation_id: id,
            response,
        })
    }

    async fn list_conversations(&self, _user_id: &str) -> Result<Vec<Conversation>> {
        let data = self.data.lock().unwrap();
        if data.fail_list_conversations {
            return Err(ApiError::Backend {
                status: 503,
                detail: None,
            });
        }
        Ok(data.conversations.clone())
    }

    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<Message>> {
        self.message_fetches.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().remove(conversation_id);
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let data = self.data.lock().unwrap();
        if data.fail_list_messages {
            return Err(ApiError::Backend {
                status: 503,
                detail: None,
            });
        }
        Ok(data
            .messages
            .get(conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_conversation(
        &self,
        _user_id: &str,
        title: &str,
    ) -> Result<CreatedConversation> {
        let mut data = self.data.lock().unwrap();
        if data.fail_create {
            return Err(ApiError::Backend {
                status: 400,
                detail: Some("Title too long".to_string()),
            });
        }
        data.next_id += 1;
        let id = format!("c{}", data.next_id);
        data.conversations.insert(
            0,
            Conversation {
                id: id.clone(),
                title: title.to_string(),
                updated_at: "2025-01-03T00:00:00".to_string(),
            },
        );
        data.messages.insert(id.clone(), Vec::new());
        Ok(CreatedConversation {
            conversation_id: id,
        })
    }

    async fn health(&self) -> Result<serde_json::Value> {
        Ok(serde_json::json!({ "status": "healthy" }))
    }
}
