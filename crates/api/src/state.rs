use std::sync::Arc;

use promptbrary_completion::ChatBackend;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything heavy sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Provider client holding the server-side key.
    pub chat: Arc<dyn ChatBackend>,
    /// Model name sent with every completion call.
    pub model: String,
}
