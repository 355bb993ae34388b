//! Client for the Promptbrary server proxy, which calls the provider with
//! its own server-held key.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use promptbrary_core::completion::{Completer, Completion, CompletionRequest};
use promptbrary_core::error::CoreError;
use promptbrary_core::proxy::{
    EnhancePromptBody, EnhancePromptReply, ErrorReply, ProxyPayload, SocialPostBody,
    SocialPostReply,
};

use crate::error::CompletionError;

#[derive(Clone)]
pub struct ProxyClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    /// * `base_url` - Server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `POST /api/enhance-prompt`.
    pub async fn enhance_prompt(
        &self,
        body: &EnhancePromptBody,
    ) -> Result<EnhancePromptReply, CompletionError> {
        self.post("/api/enhance-prompt", body).await
    }

    /// `POST /api/generate-social-post`.
    pub async fn generate_social_post(
        &self,
        body: &SocialPostBody,
    ) -> Result<SocialPostReply, CompletionError> {
        self.post("/api/generate-social-post", body).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CompletionError> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = match serde_json::from_slice::<ErrorReply>(&bytes) {
                Ok(ErrorReply {
                    error,
                    details: Some(details),
                    ..
                }) => format!("{error}: {details}"),
                Ok(ErrorReply { error, .. }) => error,
                Err(_) => format!("Proxy request failed with status {}", status.as_u16()),
            };
            tracing::warn!(status = status.as_u16(), %path, %message, "Proxy rejected request");
            return Err(CompletionError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| CompletionError::Parse(e.to_string()))
    }
}

#[async_trait]
impl Completer for ProxyClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CoreError> {
        let (text, tokens_used) = match &request.proxy {
            ProxyPayload::EnhancePrompt(body) => {
                let reply = self.enhance_prompt(body).await?;
                (reply.enhanced_prompt, reply.tokens_used)
            }
            ProxyPayload::SocialPost(body) => {
                let reply = self.generate_social_post(body).await?;
                (reply.post, reply.tokens_used)
            }
        };
        Ok(Completion {
            text: text.trim().to_string(),
            tokens_used,
        })
    }
}
