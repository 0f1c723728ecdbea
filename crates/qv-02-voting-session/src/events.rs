//! Events published by a voting session.
//!
//! Other views (results panel, the author's poll card) subscribe to learn
//! that stored votes changed and their cached data is stale.

use serde::Serialize;
use shared_types::{PollId, VoteAction, VoteId};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VotingEvent {
    /// Allocation seeded for a poll.
    Hydrated {
        poll_id: PollId,
        has_prior_vote: bool,
    },
    /// Hydration failed; the view shows an error state.
    HydrationFailed { poll_id: PollId, reason: String },
    /// A vote was stored. Cached poll and vote data for `poll_id` is stale.
    VoteSubmitted {
        poll_id: PollId,
        action: VoteAction,
        vote_id: Option<VoteId>,
    },
}

impl VotingEvent {
    pub fn poll_id(&self) -> PollId {
        match self {
            VotingEvent::Hydrated { poll_id, .. }
            | VotingEvent::HydrationFailed { poll_id, .. }
            | VotingEvent::VoteSubmitted { poll_id, .. } => *poll_id,
        }
    }
}
