//! Error types for the poll directory

use crate::domain::DraftViolation;
use shared_types::{GatewayError, PollId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// The draft breaks one or more creation rules.
    #[error("Invalid poll draft: {}", format_violations(.0))]
    InvalidDraft(Vec<DraftViolation>),

    #[error("Poll {0} not found")]
    PollNotFound(PollId),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Backend returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Malformed backend response: {0}")]
    Decode(String),
}

fn format_violations(violations: &[DraftViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl DirectoryError {
    /// Map a gateway error for a request about `poll_id`.
    pub fn for_poll(poll_id: PollId, err: GatewayError) -> Self {
        if err.is_not_found() {
            DirectoryError::PollNotFound(poll_id)
        } else {
            err.into()
        }
    }
}

impl From<GatewayError> for DirectoryError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(message) => DirectoryError::Http {
                status: 404,
                message,
            },
            GatewayError::Http { status, message } => DirectoryError::Http { status, message },
            GatewayError::Transport(message) => DirectoryError::Transport(message),
            GatewayError::Decode(message) => DirectoryError::Decode(message),
        }
    }
}

/// Result type for directory operations
pub type DirectoryResult<T> = Result<T, DirectoryError>;
