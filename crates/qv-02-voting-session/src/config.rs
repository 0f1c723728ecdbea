//! # Voting Session Configuration

use crate::domain::ReseedPolicy;
use crate::error::{VotingError, VotingResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on prior-vote fetch retries.
pub const MAX_PRIOR_VOTE_RETRIES: u32 = 10;

/// Voting session configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Whether a repeat hydration may overwrite unsaved edits.
    pub reseed_policy: ReseedPolicy,

    /// Extra attempts for the prior-vote fetch on transient failures.
    pub prior_vote_retries: u32,

    /// Pause between prior-vote attempts.
    #[serde(with = "humantime_serde")]
    pub retry_delay: Duration,

    /// Refetch poll details right before submitting and re-check that the
    /// poll is still active.
    pub recheck_active_before_submit: bool,

    /// Capacity of the session event channel.
    pub event_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reseed_policy: ReseedPolicy::PreserveEdits,
            prior_vote_retries: 2,
            retry_delay: Duration::from_millis(500),
            recheck_active_before_submit: true,
            event_buffer: 64,
        }
    }
}

impl SessionConfig {
    /// Config for tests: no retry delay.
    pub fn for_testing() -> Self {
        Self {
            retry_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> VotingResult<()> {
        if self.event_buffer == 0 {
            return Err(VotingError::InvalidConfig(
                "event_buffer must be at least 1".into(),
            ));
        }
        if self.prior_vote_retries > MAX_PRIOR_VOTE_RETRIES {
            return Err(VotingError::InvalidConfig(format!(
                "prior_vote_retries {} exceeds {}",
                self.prior_vote_retries, MAX_PRIOR_VOTE_RETRIES
            )));
        }
        Ok(())
    }
}
