//! Integration tests for the completion and proxy clients against an
//! in-process axum server standing in for the provider.

use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use promptbrary_completion::{CompletionClient, CompletionError, ProxyClient};
use promptbrary_core::completion::{Completer, CompletionRequest};
use promptbrary_core::error::CoreError;
use promptbrary_core::proxy::{EnhancePromptBody, ProxyPayload, SocialPostBody};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct Captured {
    requests: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
}

/// Serve `app` on an ephemeral port and return its base URL.
async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A provider that always answers with `status` and `body`.
async fn provider(status: StatusCode, body: Value) -> (String, Captured) {
    let captured = Captured::default();
    let app = Router::new()
        .route(
            "/v1/chat/completions",
            post(
                move |State(captured): State<Captured>, headers: HeaderMap, Json(payload): Json<Value>| {
                    let body = body.clone();
                    async move {
                        captured.requests.lock().unwrap().push((headers, payload));
                        (status, Json(body))
                    }
                },
            ),
        )
        .with_state(captured.clone());
    (format!("{}/v1", spawn(app).await), captured)
}

fn enhance_request() -> CompletionRequest {
    CompletionRequest::new(
        "system text".into(),
        "write a poem".into(),
        ProxyPayload::EnhancePrompt(EnhancePromptBody {
            prompt: Some("write a poem".into()),
            ..Default::default()
        }),
    )
    .with_api_key(Some("sk-user".into()))
}

// ---------------------------------------------------------------------------
// CompletionClient
// ---------------------------------------------------------------------------

#[tokio::test]
async fn successful_completion_is_trimmed_and_counts_tokens() {
    let (base, captured) = provider(
        StatusCode::OK,
        json!({
            "choices": [{ "message": { "role": "assistant", "content": "  A better poem prompt.\n" } }],
            "usage": { "total_tokens": 42 }
        }),
    )
    .await;

    let client = CompletionClient::new(base).with_referer("http://localhost:3000/");
    let completion = client.complete(&enhance_request()).await.unwrap();

    assert_eq!(completion.text, "A better poem prompt.");
    assert_eq!(completion.tokens_used, Some(42));

    let requests = captured.requests.lock().unwrap();
    let (headers, payload) = &requests[0];
    assert_eq!(headers["authorization"], "Bearer sk-user");
    assert_eq!(headers["x-title"], "Promptbrary");
    assert_eq!(headers["http-referer"], "http://localhost:3000/");
    assert_eq!(payload["messages"][0]["content"], "system text");
    assert_eq!(payload["messages"][1]["content"], "write a poem");
    assert_eq!(payload["max_tokens"], 1000);
}

#[tokio::test]
async fn default_key_is_used_when_request_has_none() {
    let (base, captured) = provider(
        StatusCode::OK,
        json!({ "choices": [{ "message": { "content": "ok" } }] }),
    )
    .await;

    let client = CompletionClient::new(base).with_default_key("sk-server");
    client
        .complete(&enhance_request().with_api_key(None))
        .await
        .unwrap();

    let requests = captured.requests.lock().unwrap();
    assert_eq!(requests[0].0["authorization"], "Bearer sk-server");
}

#[tokio::test]
async fn rejected_key_is_an_auth_error() {
    let (base, _) = provider(
        StatusCode::UNAUTHORIZED,
        json!({ "error": { "message": "Invalid API key" } }),
    )
    .await;

    let err = CompletionClient::new(base)
        .complete(&enhance_request())
        .await
        .unwrap_err();

    assert_eq!(err, CoreError::Auth("Invalid API key".into()));
}

#[tokio::test]
async fn non_success_carries_upstream_message() {
    let (base, _) = provider(
        StatusCode::TOO_MANY_REQUESTS,
        json!({ "error": { "message": "Rate limit exceeded" } }),
    )
    .await;

    let err = CompletionClient::new(base)
        .complete(&enhance_request())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CoreError::Provider {
            status: 429,
            message: "Rate limit exceeded".into()
        }
    );
}

#[tokio::test]
async fn body_without_choices_is_a_parse_error() {
    let (base, _) = provider(StatusCode::OK, json!({ "id": "cmpl-1" })).await;

    let err = CompletionClient::new(base)
        .complete(&enhance_request())
        .await
        .unwrap_err();

    assert_matches!(err, CoreError::Parse(_));
}

#[tokio::test]
async fn empty_choices_yield_empty_text() {
    let (base, _) = provider(StatusCode::OK, json!({ "choices": [] })).await;

    let completion = CompletionClient::new(base)
        .complete(&enhance_request())
        .await
        .unwrap();

    assert_eq!(completion.text, "");
}

#[tokio::test]
async fn missing_key_fails_before_any_request() {
    let (base, captured) = provider(StatusCode::OK, json!({ "choices": [] })).await;

    let client = CompletionClient::new(base);
    let call = promptbrary_completion::client::ChatCall::from_request(&enhance_request());
    let err = client.chat(None, &call).await.unwrap_err();

    assert_matches!(err, CompletionError::MissingKey);
    assert!(captured.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_provider_is_a_network_error() {
    // Bind then drop to get a port nothing is listening on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = CompletionClient::new(format!("http://{addr}/v1"))
        .complete(&enhance_request())
        .await
        .unwrap_err();

    assert_matches!(err, CoreError::Network(_));
}

// ---------------------------------------------------------------------------
// ProxyClient
// ---------------------------------------------------------------------------

#[tokio::test]
async fn proxy_client_routes_by_payload() {
    let captured = Captured::default();
    let app = Router::new()
        .route(
            "/api/enhance-prompt",
            post(|State(c): State<Captured>, Json(body): Json<Value>| async move {
                c.requests.lock().unwrap().push((HeaderMap::new(), body));
                Json(json!({ "success": true, "enhancedPrompt": " Better prompt ", "tokensUsed": 7 }))
            }),
        )
        .route(
            "/api/generate-social-post",
            post(|State(c): State<Captured>, Json(body): Json<Value>| async move {
                c.requests.lock().unwrap().push((HeaderMap::new(), body));
                Json(json!({ "success": true, "post": "We launched!" }))
            }),
        )
        .with_state(captured.clone());
    let proxy = ProxyClient::new(spawn(app).await);

    let enhanced = proxy.complete(&enhance_request()).await.unwrap();
    assert_eq!(enhanced.text, "Better prompt");
    assert_eq!(enhanced.tokens_used, Some(7));

    let social = CompletionRequest::new(
        String::new(),
        String::new(),
        ProxyPayload::SocialPost(SocialPostBody {
            platform: Some("twitter".into()),
            topic: Some("launch day".into()),
            ..Default::default()
        }),
    );
    let post = proxy.complete(&social).await.unwrap();
    assert_eq!(post.text, "We launched!");

    let requests = captured.requests.lock().unwrap();
    assert_eq!(requests[0].1, json!({ "prompt": "write a poem" }));
    assert_eq!(requests[1].1, json!({ "platform": "twitter", "topic": "launch day" }));
}

#[tokio::test]
async fn proxy_error_envelope_becomes_provider_error() {
    let app = Router::new().route(
        "/api/enhance-prompt",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to enhance prompt",
                    "details": "Rate limit exceeded"
                })),
            )
        }),
    );
    let proxy = ProxyClient::new(spawn(app).await);

    let err = proxy
        .enhance_prompt(&EnhancePromptBody {
            prompt: Some("hi".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_matches!(
        err,
        CompletionError::Provider { status: 500, message }
            if message == "Failed to enhance prompt: Rate limit exceeded"
    );
}
