use thiserror::Error;

/// Convenient result type for setup code at the binary edge.
pub type Result<T> = anyhow::Result<T>;

/// Failure of a call against the users backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, timeout or body transfer failure.
    #[error("could not reach the server: {0}")]
    Transport(#[from] reqwest::Error),
    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Status { status: u16, message: String },
    /// The body was not valid JSON for the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Text shown to the user: the error's own message, or `fallback` when it
    /// has none (a rejection without a `message` body, for instance).
    pub fn user_message(&self, fallback: &str) -> String {
        let msg = match self {
            Self::Status { message, .. } => message.trim().to_string(),
            other => other.to_string(),
        };
        if msg.is_empty() {
            fallback.to_string()
        } else {
            msg
        }
    }
}
