//! LLM error types.

use thiserror::Error;

/// Errors that can occur during chat-completion calls.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No provider or credential configured; the call was never attempted.
    #[error("No chat provider configured: {0}")]
    NotConfigured(String),

    /// HTTP request failed (non-success status or transport error).
    #[error("Chat request failed: {0}")]
    RequestFailed(String),

    /// The response body was not what a chat-completion API returns.
    #[error("Malformed chat response: {0}")]
    MalformedResponse(String),

    /// Request timed out.
    #[error("Chat request timed out after {0}ms")]
    Timeout(u64),

    /// Provider could not be reached.
    #[error("Chat provider unavailable: {0}")]
    Unavailable(String),

    /// All retry attempts exhausted.
    #[error("All chat retry attempts exhausted after {attempts} tries: {last_error}")]
    RetriesExhausted {
        attempts: u32,
        last_error: String,
    },

    /// Configuration error.
    #[error("Chat configuration error: {0}")]
    ConfigError(String),
}

impl LlmError {
    /// Whether trying again later might succeed.
    ///
    /// Configuration gaps and malformed responses are not transient; network
    /// trouble is.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RequestFailed(_)
                | Self::Timeout(_)
                | Self::Unavailable(_)
                | Self::RetriesExhausted { .. }
        )
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(0)
        } else if err.is_connect() {
            LlmError::Unavailable(err.to_string())
        } else if err.is_decode() {
            LlmError::MalformedResponse(err.to_string())
        } else {
            LlmError::RequestFailed(err.to_string())
        }
    }
}
