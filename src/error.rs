//! Tonality error types

use std::time::Duration;

/// Tonality error types
#[derive(Debug, thiserror::Error)]
pub enum TonalityError {
    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Inference errors
    #[error("data error: {0}")]
    DataError(String),

    #[error("empty response from model")]
    EmptyResponse,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TonalityError {
    /// Whether the error came from the remote side rather than from bad input
    /// or local configuration.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Http(_)
                | Self::Api { .. }
                | Self::RateLimited { .. }
                | Self::AuthenticationFailed
                | Self::ModelNotFound(_)
                | Self::Timeout(_)
        )
    }
}

/// Result type alias for Tonality operations
pub type Result<T> = std::result::Result<T, TonalityError>;
