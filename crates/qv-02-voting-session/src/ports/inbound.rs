//! # Driving Ports (API - Inbound)
//!
//! Operations a poll view performs on its voting session.

use crate::domain::SubmitGate;
use crate::error::VotingResult;
use crate::application::{SessionStatus, SubmitReceipt};
use async_trait::async_trait;
use qv_01_allocation::Allocation;
use shared_types::PollId;

#[async_trait]
pub trait VotingSessionApi: Send + Sync {
    /// Select a poll and hydrate it (poll details + prior vote, concurrently).
    async fn open(&self, poll_id: PollId) -> VotingResult<()>;

    /// Re-run hydration for the current poll.
    async fn refresh(&self) -> VotingResult<()>;

    /// Leave the poll view. Late responses are discarded.
    fn close(&self);

    /// Current allocation, `None` until seeded.
    fn allocation(&self) -> Option<Allocation>;

    fn set_percentage(&self, index: usize, percentage: i32) -> VotingResult<Allocation>;

    fn increment(&self, index: usize) -> VotingResult<Allocation>;

    fn decrement(&self, index: usize) -> VotingResult<Allocation>;

    /// Evaluate the submission gate against the current state.
    fn gate(&self) -> SubmitGate;

    /// Issue exactly one create or update call for the current allocation.
    async fn submit(&self) -> VotingResult<SubmitReceipt>;

    fn status(&self) -> SessionStatus;
}
