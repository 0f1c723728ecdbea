//! Error types for user profiles

use shared_types::GatewayError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// `None` is the caller's own profile.
    #[error("User {} not found", .0.as_deref().unwrap_or("(self)"))]
    UserNotFound(Option<String>),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Backend returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Malformed backend response: {0}")]
    Decode(String),
}

impl ProfileError {
    /// Map a gateway error for a request about `world_id`.
    pub fn for_user(world_id: Option<&str>, err: GatewayError) -> Self {
        if err.is_not_found() {
            ProfileError::UserNotFound(world_id.map(str::to_string))
        } else {
            err.into()
        }
    }
}

impl From<GatewayError> for ProfileError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(message) => ProfileError::Http {
                status: 404,
                message,
            },
            GatewayError::Http { status, message } => ProfileError::Http { status, message },
            GatewayError::Transport(message) => ProfileError::Transport(message),
            GatewayError::Decode(message) => ProfileError::Decode(message),
        }
    }
}

/// Result type for profile operations
pub type ProfileResult<T> = Result<T, ProfileError>;
