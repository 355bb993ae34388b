//! Wire types of the server proxy endpoints.
//!
//! Shared by the HTTP server (which deserializes the bodies) and the proxy
//! client (which serializes them).

use serde::{Deserialize, Serialize};

/// `POST /api/enhance-prompt` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancePromptBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
}

/// `POST /api/generate-social-post` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialPostBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
}

/// Which proxy endpoint a workflow request maps onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyPayload {
    EnhancePrompt(EnhancePromptBody),
    SocialPost(SocialPostBody),
}

/// Success envelope of `/api/enhance-prompt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancePromptReply {
    pub success: bool,
    pub enhanced_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
}

/// Success envelope of `/api/generate-social-post`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialPostReply {
    pub success: bool,
    pub post: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
}

/// Error envelope shared by both endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_fields_are_not_serialized() {
        let body = EnhancePromptBody {
            prompt: Some("hi".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&body).unwrap(), serde_json::json!({ "prompt": "hi" }));
    }

    #[test]
    fn reply_uses_camel_case() {
        let reply = EnhancePromptReply {
            success: true,
            enhanced_prompt: "better".into(),
            tokens_used: Some(12),
        };
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            serde_json::json!({ "success": true, "enhancedPrompt": "better", "tokensUsed": 12 })
        );
    }
}
