//! # Error Types
//!
//! Failures of the backend collaborator, shared by every outbound port.

use thiserror::Error;

/// Errors surfaced by a backend gateway (HTTP or in-memory).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The requested resource does not exist (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend answered with a non-success status.
    #[error("Backend returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response (connect, timeout, DNS).
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The response body did not match the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Whether repeating the same request may succeed.
    ///
    /// Transport failures and 5xx/429 answers are transient; 4xx and decode
    /// errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Transport(_) => true,
            GatewayError::Http { status, .. } => *status >= 500 || *status == 429,
            GatewayError::NotFound(_) | GatewayError::Decode(_) => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound(_))
    }
}

/// Result type for gateway calls.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_classification() {
        assert!(GatewayError::Transport("timeout".into()).is_retryable());
        assert!(GatewayError::Http {
            status: 503,
            message: String::new()
        }
        .is_retryable());
        assert!(GatewayError::Http {
            status: 429,
            message: String::new()
        }
        .is_retryable());
        assert!(!GatewayError::Http {
            status: 400,
            message: String::new()
        }
        .is_retryable());
        assert!(!GatewayError::NotFound("poll 1".into()).is_retryable());
        assert!(!GatewayError::Decode("eof".into()).is_retryable());
    }
}
