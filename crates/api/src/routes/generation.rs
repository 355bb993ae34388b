use axum::routing::post;
use axum::Router;

use super::FrontendService;
use crate::handlers::generation;
use crate::state::AppState;

/// Completion proxy routes, mounted at `/api`.
///
/// ```text
/// POST   /enhance-prompt         -> enhance_prompt
/// POST   /generate-social-post   -> generate_social_post
/// ```
///
/// A GET on either path is a page load, so it gets the front-end bundle.
pub fn router(frontend: FrontendService) -> Router<AppState> {
    Router::new()
        .route(
            "/enhance-prompt",
            post(generation::enhance_prompt).get_service(frontend.clone()),
        )
        .route(
            "/generate-social-post",
            post(generation::generate_social_post).get_service(frontend),
        )
}
