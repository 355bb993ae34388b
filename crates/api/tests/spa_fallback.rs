//! The server hands unknown GET paths to the front-end bundle.

mod common;

use axum::http::StatusCode;
use common::{body_json, body_text, get, post_json, StubChat};

fn app_with_frontend() -> (tempfile::TempDir, axum::Router) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>Promptbrary</h1>").unwrap();
    std::fs::create_dir(dir.path().join("js")).unwrap();
    std::fs::write(dir.path().join("js").join("app.js"), "console.log('hi');").unwrap();

    let mut config = common::test_config();
    config.frontend_dir = dir.path().to_path_buf();
    let app = common::build_test_app_with(config, StubChat::replying("done", Some(3)));
    (dir, app)
}

#[tokio::test]
async fn static_files_are_served() {
    let (_dir, app) = app_with_frontend();
    let response = get(app, "/js/app.js").await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.contains("javascript"), "got {content_type}");
    assert_eq!(body_text(response).await, "console.log('hi');");
}

#[tokio::test]
async fn unknown_paths_get_index_html() {
    let (_dir, app) = app_with_frontend();

    for path in ["/", "/history", "/social/drafts"] {
        let response = get(app.clone(), path).await;
        assert_eq!(response.status(), StatusCode::OK, "path {path}");
        assert_eq!(body_text(response).await, "<h1>Promptbrary</h1>");
    }
}

#[tokio::test]
async fn health_still_wins_over_fallback() {
    let (_dir, app) = app_with_frontend();
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("\"status\":\"ok\""));
}

#[tokio::test]
async fn get_on_proxy_paths_serves_index_html() {
    let (_dir, app) = app_with_frontend();

    for path in ["/api/enhance-prompt", "/api/generate-social-post"] {
        let response = get(app.clone(), path).await;
        assert_eq!(response.status(), StatusCode::OK, "path {path}");
        assert_eq!(body_text(response).await, "<h1>Promptbrary</h1>");
    }
}

#[tokio::test]
async fn post_on_proxy_paths_still_reaches_the_handler() {
    let (_dir, app) = app_with_frontend();
    let response = post_json(
        app,
        "/api/enhance-prompt",
        serde_json::json!({ "prompt": "write a poem" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["enhancedPrompt"], "done");
}
