#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use promptbrary_api::config::ServerConfig;
use promptbrary_api::router::build_app_router;
use promptbrary_api::state::AppState;
use promptbrary_completion::client::ChatCall;
use promptbrary_completion::{ChatBackend, CompletionError};
use promptbrary_core::completion::Completion;

pub const TEST_MODEL: &str = "test/model";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin and a front-end directory
/// that does not exist.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        frontend_dir: PathBuf::from("/nonexistent/promptbrary-frontend"),
    }
}

/// Scripted provider that records every call it receives.
pub struct StubChat {
    reply: Result<Completion, (u16, String)>,
    pub calls: Mutex<Vec<ChatCall>>,
}

impl StubChat {
    pub fn replying(text: &str, tokens_used: Option<u32>) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(Completion {
                text: text.to_string(),
                tokens_used,
            }),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(status: u16, message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err((status, message.to_string())),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<ChatCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for StubChat {
    async fn send(&self, call: &ChatCall) -> Result<Completion, CompletionError> {
        self.calls.lock().unwrap().push(call.clone());
        match &self.reply {
            Ok(completion) => Ok(completion.clone()),
            Err((status, message)) => Err(CompletionError::Provider {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

/// Build the production router around `chat` and [`test_config`].
pub fn build_test_app(chat: Arc<StubChat>) -> Router {
    build_test_app_with(test_config(), chat)
}

pub fn build_test_app_with(config: ServerConfig, chat: Arc<StubChat>) -> Router {
    let state = AppState {
        chat,
        model: TEST_MODEL.to_string(),
    };
    build_app_router(state, &config)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: String) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
