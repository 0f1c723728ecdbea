//! # Driven Ports (SPI - Outbound Dependencies)
//!
//! What the voting session needs from the outside world: the poll backend
//! and a source of wall-clock time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_types::{
    EditVoteRequest, GatewayResult, PollId, PollView, PriorVote, SetVoteRequest, VoteAck,
};

/// Poll and vote endpoints of the backend.
#[async_trait]
pub trait PollApiGateway: Send + Sync {
    /// `GET /poll/{id}`
    async fn get_poll(&self, poll_id: PollId) -> GatewayResult<PollView>;

    /// `GET /user/getUserVotes?pollId={id}`
    ///
    /// `Ok(None)` when the user has not voted on this poll.
    async fn get_user_vote(&self, poll_id: PollId) -> GatewayResult<Option<PriorVote>>;

    /// `POST /user/setVote`
    async fn set_vote(&self, request: SetVoteRequest) -> GatewayResult<VoteAck>;

    /// `POST /user/editVote`
    async fn edit_vote(&self, request: EditVoteRequest) -> GatewayResult<VoteAck>;
}

/// Wall-clock time, used to decide whether a poll is active.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
