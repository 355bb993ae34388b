//! Handlers for the completion proxy.
//!
//! Routes:
//! - `POST /api/enhance-prompt`       - rewrite a prompt with the server key
//! - `POST /api/generate-social-post` - draft a social media post

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use promptbrary_completion::client::{ChatCall, ChatMessage};
use promptbrary_completion::CompletionError;
use promptbrary_core::completion::DEFAULT_TEMPERATURE;
use promptbrary_core::prompts::{
    proxy_enhance_system_prompt, proxy_social_system_prompt, DEFAULT_PROXY_LENGTH,
    DEFAULT_PROXY_SOCIAL_TONE, DEFAULT_PROXY_STYLE, DEFAULT_PROXY_TONE,
};
use promptbrary_core::proxy::{
    EnhancePromptBody, EnhancePromptReply, SocialPostBody, SocialPostReply,
};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/enhance-prompt
///
/// Requires a non-empty `prompt`; `tone` and `length` fall back to
/// `professional` and `medium`.
pub async fn enhance_prompt(
    State(state): State<AppState>,
    payload: Result<Json<EnhancePromptBody>, JsonRejection>,
) -> AppResult<Json<EnhancePromptReply>> {
    let Json(body) = payload?;
    let prompt = required(body.prompt)
        .ok_or_else(|| AppError::BadRequest("Prompt is required".into()))?;

    let tone = body.tone.as_deref().unwrap_or(DEFAULT_PROXY_TONE);
    let length = body.length.as_deref().unwrap_or(DEFAULT_PROXY_LENGTH);

    let call = chat_call(
        &state,
        vec![
            ChatMessage::system(proxy_enhance_system_prompt(tone, length)),
            ChatMessage::user(prompt),
        ],
    );

    let completion = state
        .chat
        .send(&call)
        .await
        .map_err(|e| upstream("Failed to enhance prompt", e))?;

    tracing::info!(
        %tone,
        %length,
        tokens_used = ?completion.tokens_used,
        "Prompt enhanced"
    );

    Ok(Json(EnhancePromptReply {
        success: true,
        enhanced_prompt: completion.text,
        tokens_used: completion.tokens_used,
    }))
}

/// POST /api/generate-social-post
///
/// Requires `platform` and `topic`. The whole request is folded into a
/// single system message.
pub async fn generate_social_post(
    State(state): State<AppState>,
    payload: Result<Json<SocialPostBody>, JsonRejection>,
) -> AppResult<Json<SocialPostReply>> {
    let Json(body) = payload?;
    let (Some(platform), Some(topic)) = (required(body.platform), required(body.topic)) else {
        return Err(AppError::BadRequest(
            "Platform and topic are required".into(),
        ));
    };

    let style = body.style.as_deref().unwrap_or(DEFAULT_PROXY_STYLE);
    let tone = body.tone.as_deref().unwrap_or(DEFAULT_PROXY_SOCIAL_TONE);

    let call = chat_call(
        &state,
        vec![ChatMessage::system(proxy_social_system_prompt(
            &platform, &topic, style, tone,
        ))],
    );

    let completion = state
        .chat
        .send(&call)
        .await
        .map_err(|e| upstream("Failed to generate social post", e))?;

    tracing::info!(
        %platform,
        %style,
        %tone,
        tokens_used = ?completion.tokens_used,
        "Social post generated"
    );

    Ok(Json(SocialPostReply {
        success: true,
        post: completion.text,
        tokens_used: completion.tokens_used,
    }))
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Empty strings count as missing.
fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn chat_call(state: &AppState, messages: Vec<ChatMessage>) -> ChatCall {
    ChatCall {
        model: state.model.clone(),
        messages,
        temperature: DEFAULT_TEMPERATURE,
        max_tokens: None,
    }
}

/// Wrap a provider failure, keeping the upstream message as `details`.
fn upstream(operation: &str, err: CompletionError) -> AppError {
    tracing::error!(error = %err, operation, "Completion request failed");
    let details = match err {
        CompletionError::Auth(message) | CompletionError::Provider { message, .. } => message,
        other => other.to_string(),
    };
    AppError::Upstream {
        error: operation.to_string(),
        details,
    }
}
