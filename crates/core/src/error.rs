#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Authentication rejected: {0}")]
    Auth(String),

    #[error("Provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed provider response: {0}")]
    Parse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Message shown to the user when the error is surfaced in a dialog.
    ///
    /// Upstream failures show the provider's own text rather than the
    /// prefixed `Display` form.
    pub fn user_message(&self) -> &str {
        match self {
            CoreError::Validation(msg)
            | CoreError::Auth(msg)
            | CoreError::Network(msg)
            | CoreError::Parse(msg)
            | CoreError::Storage(msg)
            | CoreError::Clipboard(msg)
            | CoreError::InvalidState(msg)
            | CoreError::Internal(msg) => msg,
            CoreError::Provider { message, .. } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_display_includes_status() {
        let err = CoreError::Provider {
            status: 429,
            message: "Rate limit exceeded".into(),
        };
        assert_eq!(err.to_string(), "Provider error (429): Rate limit exceeded");
        assert_eq!(err.user_message(), "Rate limit exceeded");
    }

    #[test]
    fn user_message_strips_prefix() {
        let err = CoreError::Auth("Invalid API key".into());
        assert_eq!(err.user_message(), "Invalid API key");
    }
}
