use promptbrary_core::error::CoreError;

/// Errors from the completion and proxy HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider rejected the API key (401/403).
    #[error("Authentication rejected: {0}")]
    Auth(String),

    /// Any other non-2xx response.
    #[error("Provider error ({status}): {message}")]
    Provider {
        status: u16,
        /// Upstream error message, or a generic fallback.
        message: String,
    },

    /// A 2xx body without the expected completion fields.
    #[error("Malformed response body: {0}")]
    Parse(String),

    /// Neither the request nor the client carried an API key.
    #[error("No API key available")]
    MissingKey,
}

impl From<CompletionError> for CoreError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::Request(e) => CoreError::Network(e.to_string()),
            CompletionError::Auth(msg) => CoreError::Auth(msg),
            CompletionError::Provider { status, message } => CoreError::Provider { status, message },
            CompletionError::Parse(msg) => CoreError::Parse(msg),
            CompletionError::MissingKey => CoreError::Validation("missing key".into()),
        }
    }
}
