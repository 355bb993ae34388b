pub mod generation;
pub mod health;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::state::AppState;

/// Front-end bundle service; missing files resolve to `index.html`.
pub type FrontendService = ServeDir<ServeFile>;

/// Build the `/api` route tree.
pub fn api_routes(frontend: FrontendService) -> Router<AppState> {
    Router::new().merge(generation::router(frontend))
}
