//! The remote completion capability workflows call into.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::proxy::ProxyPayload;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";

/// Everything needed for one chat-completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Task framing and formatting constraints.
    pub system_prompt: String,
    /// The literal idea or prompt.
    pub user_prompt: String,
    /// Client-supplied key; `None` when the server holds its own.
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Structured form of the same request, for the server proxy.
    pub proxy: ProxyPayload,
}

impl CompletionRequest {
    pub fn new(system_prompt: String, user_prompt: String, proxy: ProxyPayload) -> Self {
        Self {
            system_prompt,
            user_prompt,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            proxy,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Text returned by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// Trimmed content of the first choice; empty means nothing to render.
    pub text: String,
    pub tokens_used: Option<u32>,
}

/// Issues one completion call. No retries.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CoreError>;
}
