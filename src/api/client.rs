//! reqwest implementation of [`ChatBackend`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::error::{ApiError, Result};
use super::types::{
    ChatReply, ChatRequest, Conversation, CreateConversationRequest, CreatedConversation,
    ErrorBody, Message,
};
use super::ChatBackend;

/// Default send route of the backend.
pub const DEFAULT_CHAT_PATH: &str = "/api/chat";

/// HTTP client for the assistant backend.
///
/// # Example
///
/// ```rust,no_run
/// use assistant_chat_web::api::{ChatBackend, HttpBackend};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpBackend::new("http://localhost:8000")?;
/// let reply = backend.send_message("user123", "Hello", None).await?;
/// let history = backend.list_messages(&reply.conversation_id).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    chat_path: Vec<String>,
    http: reqwest::Client,
}

impl HttpBackend {
    /// Create a client with a default reqwest client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The backend root (e.g., "http://localhost:8000")
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a client around a preconfigured reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        Ok(Self {
            base_url,
            chat_path: split_path(DEFAULT_CHAT_PATH),
            http,
        })
    }

    /// Override the send route (older backends expose `/chat`).
    #[must_use]
    pub fn with_chat_path(mut self, path: &str) -> Self {
        self.chat_path = split_path(path);
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Append percent-encoded path segments to the base URL.
    fn endpoint<I, S>(&self, segments: I) -> Result<Url>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.bytes().await?;
        if status.is_success() {
            Ok(serde_json::from_slice(&body)?)
        } else {
            let detail = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .map(|b| match b.detail {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                });
            Err(ApiError::Backend {
                status: status.as_u16(),
                detail,
            })
        }
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send_message(
        &self,
        user_id: &str,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<ChatReply> {
        let req = ChatRequest {
            user_id: user_id.to_string(),
            message: message.to_string(),
            conversation_id: conversation_id.map(str::to_string),
        };
        let url = self.endpoint(&self.chat_path)?;
        debug!(%url, conversation_id = ?req.conversation_id, "POST chat message");
        let response = self.http.post(url).json(&req).send().await?;
        Self::handle_response(response).await
    }

    async fn list_conversations(&self, user_id: &str) -> Result<Vec<Conversation>> {
        let url = self.endpoint(["conversations", user_id])?;
        let response = self.http.get(url).send().await?;
        Self::handle_response(response).await
    }

    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<Message>> {
        let url = self.endpoint(["conversations", conversation_id, "messages"])?;
        let response = self.http.get(url).send().await?;
        Self::handle_response(response).await
    }

    async fn create_conversation(
        &self,
        user_id: &str,
        title: &str,
    ) -> Result<CreatedConversation> {
        let req = CreateConversationRequest {
            user_id: user_id.to_string(),
            title: title.to_string(),
        };
        let response = self
            .http
            .post(self.endpoint(["conversations"])?)
            .json(&req)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn health(&self) -> Result<serde_json::Value> {
        let response = self.http.get(self.endpoint(["health"])?).send().await?;
        Self::handle_response(response).await
    }
}
