//! Direct chat-completions client.
//!
//! Speaks the OpenAI-compatible `POST {base}/chat/completions` API used by
//! both OpenAI and OpenRouter, with bearer-token auth.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use promptbrary_core::completion::{Completer, Completion, CompletionRequest};
use promptbrary_core::error::CoreError;

use crate::error::CompletionError;

pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Sent as `X-Title` so OpenRouter can attribute requests.
pub const APP_TITLE: &str = "Promptbrary";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Request body of `/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCall {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatCall {
    /// The system + user payload the workflows send.
    pub fn from_request(request: &CompletionRequest) -> Self {
        Self {
            model: request.model.clone(),
            messages: vec![
                ChatMessage::system(request.system_prompt.as_str()),
                ChatMessage::user(request.user_prompt.as_str()),
            ],
            temperature: request.temperature,
            max_tokens: Some(request.max_tokens),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: Option<u32>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for one chat-completions provider.
#[derive(Clone)]
pub struct CompletionClient {
    client: reqwest::Client,
    base_url: String,
    /// Server-held key used when a request carries none.
    default_key: Option<String>,
    referer: Option<String>,
}

impl CompletionClient {
    /// * `base_url` - API root, e.g. [`OPENROUTER_BASE_URL`].
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            default_key: None,
            referer: None,
        }
    }

    pub fn with_default_key(mut self, key: impl Into<String>) -> Self {
        self.default_key = Some(key.into());
        self
    }

    /// Value for the `HTTP-Referer` header.
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one chat call. `api_key` overrides the client's default key.
    pub async fn chat(
        &self,
        api_key: Option<&str>,
        call: &ChatCall,
    ) -> Result<Completion, CompletionError> {
        let key = api_key
            .or(self.default_key.as_deref())
            .filter(|k| !k.trim().is_empty())
            .ok_or(CompletionError::MissingKey)?;

        tracing::debug!(
            model = %call.model,
            messages = call.messages.len(),
            "Sending chat completion request"
        );

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(key)
            .header("X-Title", APP_TITLE)
            .json(call);
        if let Some(referer) = &self.referer {
            builder = builder.header("HTTP-Referer", referer);
        }

        let response = Self::ensure_success(builder.send().await?).await?;
        let bytes = response.bytes().await?;
        let parsed: ChatResponse = serde_json::from_slice(&bytes)
            .map_err(|e| CompletionError::Parse(e.to_string()))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();
        let tokens_used = parsed.usage.and_then(|u| u.total_tokens);

        tracing::debug!(chars = text.len(), ?tokens_used, "Chat completion received");
        Ok(Completion { text, tokens_used })
    }

    /// Map a non-2xx response to [`CompletionError::Auth`] or
    /// [`CompletionError::Provider`], carrying the upstream message.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, CompletionError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = upstream_message(&body)
            .unwrap_or_else(|| format!("Provider request failed with status {}", status.as_u16()));

        tracing::warn!(status = status.as_u16(), %message, "Provider rejected request");
        match status.as_u16() {
            401 | 403 => Err(CompletionError::Auth(message)),
            code => Err(CompletionError::Provider {
                status: code,
                message,
            }),
        }
    }
}

/// Pull a human-readable message out of a provider error body.
///
/// Accepts `{"error":{"message":..}}`, `{"error":".."}` and
/// `{"message":".."}`.
fn upstream_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = value["error"]["message"]
        .as_str()
        .or_else(|| value["error"].as_str())
        .or_else(|| value["message"].as_str())?;
    Some(message.to_string())
}

/// Raw chat access with the client's own key, used where callers build the
/// message list themselves (the server proxy).
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(&self, call: &ChatCall) -> Result<Completion, CompletionError>;
}

#[async_trait]
impl ChatBackend for CompletionClient {
    async fn send(&self, call: &ChatCall) -> Result<Completion, CompletionError> {
        self.chat(None, call).await
    }
}

#[async_trait]
impl Completer for CompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CoreError> {
        let call = ChatCall::from_request(request);
        Ok(self.chat(request.api_key.as_deref(), &call).await?)
    }
}

#[cfg(test)]
mod tests {
    use promptbrary_core::proxy::{EnhancePromptBody, ProxyPayload};

    use super::*;

    #[test]
    fn chat_call_serializes_two_messages() {
        let request = CompletionRequest::new(
            "be helpful".into(),
            "write a poem".into(),
            ProxyPayload::EnhancePrompt(EnhancePromptBody::default()),
        );
        let json = serde_json::to_value(ChatCall::from_request(&request)).unwrap();

        assert_eq!(json["model"], "openai/gpt-3.5-turbo");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "be helpful");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "write a poem");
        assert_eq!(json["max_tokens"], 1000);
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn upstream_message_shapes() {
        assert_eq!(
            upstream_message(r#"{"error":{"message":"Invalid key"}}"#).as_deref(),
            Some("Invalid key")
        );
        assert_eq!(upstream_message(r#"{"error":"nope"}"#).as_deref(), Some("nope"));
        assert_eq!(upstream_message(r#"{"message":"busy"}"#).as_deref(), Some("busy"));
        assert_eq!(upstream_message("<html>502</html>"), None);
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = CompletionClient::new("http://localhost:9/v1/");
        assert_eq!(client.base_url(), "http://localhost:9/v1");
    }
}
