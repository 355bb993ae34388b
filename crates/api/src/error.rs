use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use promptbrary_core::proxy::ErrorReply;

/// Application-level error type for HTTP handlers.
///
/// Every variant renders as the `{ success: false, error, details? }`
/// envelope the front-end expects.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The completion provider failed. `error` names the operation,
    /// `details` carries the upstream message.
    #[error("{error}: {details}")]
    Upstream { error: String, details: String },
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::Upstream { error, details } => {
                (StatusCode::INTERNAL_SERVER_ERROR, error, Some(details))
            }
        };

        let body = ErrorReply {
            success: false,
            error,
            details,
        };

        (status, axum::Json(body)).into_response()
    }
}
