//! Error types and handling.

use thiserror::Error;

/// Message shown when a request never reached the API.
pub const CONNECTIVITY_MESSAGE: &str = "Failed to connect to API server";

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// API answered with a status outside 2xx
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Request never completed (DNS, connect, TLS, reset)
    #[error("Failed to connect to API server: {0}")]
    Network(String),

    /// Well-formed JSON that does not fit the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Form refused before anything was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Workflow was cancelled before it finished
    #[error("Operation cancelled")]
    Cancelled,
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create a decode error with message
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a config error with message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error with message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error came from a cancelled workflow.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Short text for a user notification.
    ///
    /// Network failures collapse to the generic connectivity message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => CONNECTIVITY_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_message_only() {
        let err = AppError::Api {
            status: 409,
            message: "Department already exists".to_string(),
        };
        assert_eq!(err.to_string(), "Department already exists");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn test_network_error_user_message_is_generic() {
        let err = AppError::Network("connection refused".to_string());
        assert_eq!(err.user_message(), CONNECTIVITY_MESSAGE);
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_cancelled() {
        assert!(AppError::Cancelled.is_cancelled());
        assert!(!AppError::validation("x").is_cancelled());
    }
}
