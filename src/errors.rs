//! Error types for skillbridge
//!
//! Library-level errors. Per-call tool failures are not errors: they are
//! folded into `ExecutionResult` values (see `types::execution`).

use thiserror::Error;

/// Main error type for the skillbridge library
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Static tool catalog failed validation at startup
    #[error("Invalid tool catalog: {0}")]
    CatalogError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ollama API errors outside the conversation loop
    #[error("Ollama API error: {0}")]
    OllamaApiError(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Conversation loop state machine violation
    #[error("Invalid state transition from {from} on {event}")]
    InvalidTransition { from: String, event: String },
}

/// Result type alias for skillbridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BridgeError::CatalogError("duplicate tool name: desktop_click".to_string());
        assert!(err.to_string().contains("Invalid tool catalog"));
        assert!(err.to_string().contains("desktop_click"));
    }

    #[test]
    fn test_transition_error_display() {
        let err = BridgeError::InvalidTransition {
            from: "Initial".to_string(),
            event: "AnswerReceived".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid state transition from Initial on AnswerReceived"
        );
    }
}
