//! Error types for the voting session

use crate::domain::GateBlocker;
use shared_types::{GatewayError, PollId};
use thiserror::Error;

/// Voting session errors.
///
/// None of these are fatal: the session stays usable and the allocation is
/// never discarded because of one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VotingError {
    #[error("Poll {0} not found")]
    PollNotFound(PollId),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Backend returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Malformed backend response: {0}")]
    Decode(String),

    /// An allocation operation ran before hydration seeded one.
    #[error("No poll is hydrated")]
    NotHydrated,

    #[error("Hydration of poll {poll_id} failed: {reason}")]
    HydrationFailed { poll_id: PollId, reason: String },

    #[error("Submission blocked: {}", format_blockers(.blockers))]
    SubmissionBlocked { blockers: Vec<GateBlocker> },

    /// The poll ended between page load and submit.
    #[error("Poll {0} is no longer active")]
    PollEnded(PollId),

    #[error("A submission is already in flight")]
    SubmitInProgress,

    /// A response arrived for a poll the view already left.
    #[error("Discarded stale response for poll {0}")]
    StaleResponse(PollId),

    #[error("Invalid session configuration: {0}")]
    InvalidConfig(String),
}

fn format_blockers(blockers: &[GateBlocker]) -> String {
    blockers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<GatewayError> for VotingError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(message) => VotingError::Http {
                status: 404,
                message,
            },
            GatewayError::Http { status, message } => VotingError::Http { status, message },
            GatewayError::Transport(message) => VotingError::Transport(message),
            GatewayError::Decode(message) => VotingError::Decode(message),
        }
    }
}

/// Result type for voting session operations
pub type VotingResult<T> = Result<T, VotingError>;
