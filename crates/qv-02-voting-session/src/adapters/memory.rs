//! In-memory poll backend
//!
//! Stores polls and votes in process, counts calls per endpoint and can be
//! told to fail or stall specific calls.

use crate::ports::outbound::PollApiGateway;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared_types::{
    EditVoteRequest, GatewayError, GatewayResult, IdRepr, PollDetails, PollId, PollOption,
    PollSchedule, PollView, PriorVote, SetVoteRequest, VoteAck, VoteId,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

/// Gateway endpoints, for failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOp {
    GetPoll,
    GetUserVote,
    SetVote,
    EditVote,
}

/// Number of calls seen per endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub get_poll: usize,
    pub get_user_vote: usize,
    pub set_vote: usize,
    pub edit_vote: usize,
}

impl CallCounts {
    /// Create and update calls combined.
    pub fn writes(&self) -> usize {
        self.set_vote + self.edit_vote
    }
}

#[derive(Default)]
struct Counters {
    get_poll: AtomicUsize,
    get_user_vote: AtomicUsize,
    set_vote: AtomicUsize,
    edit_vote: AtomicUsize,
}

/// In-memory implementation of [`PollApiGateway`].
#[derive(Default)]
pub struct InMemoryPollApi {
    polls: RwLock<HashMap<PollId, PollView>>,
    votes: RwLock<HashMap<PollId, PriorVote>>,
    failures: RwLock<HashMap<GatewayOp, VecDeque<GatewayError>>>,
    delays: RwLock<HashMap<PollId, Duration>>,
    counters: Counters,
    next_vote: AtomicU64,
}

impl InMemoryPollApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll(self, poll: PollView) -> Self {
        self.insert_poll(poll);
        self
    }

    pub fn with_vote(self, poll_id: PollId, vote: PriorVote) -> Self {
        self.insert_vote(poll_id, vote);
        self
    }

    pub fn insert_poll(&self, poll: PollView) {
        self.polls.write().insert(poll.details.poll_id, poll);
    }

    pub fn insert_vote(&self, poll_id: PollId, vote: PriorVote) {
        self.votes.write().insert(poll_id, vote);
    }

    /// Stored vote for `poll_id`, if any.
    pub fn vote(&self, poll_id: PollId) -> Option<PriorVote> {
        self.votes.read().get(&poll_id).cloned()
    }

    /// Queue `error` as the result of the next `op` call.
    pub fn fail_next(&self, op: GatewayOp, error: GatewayError) {
        self.failures.write().entry(op).or_default().push_back(error);
    }

    /// Stall every read of `poll_id` by `delay`.
    pub fn set_delay(&self, poll_id: PollId, delay: Duration) {
        self.delays.write().insert(poll_id, delay);
    }

    pub fn calls(&self) -> CallCounts {
        CallCounts {
            get_poll: self.counters.get_poll.load(Ordering::SeqCst),
            get_user_vote: self.counters.get_user_vote.load(Ordering::SeqCst),
            set_vote: self.counters.set_vote.load(Ordering::SeqCst),
            edit_vote: self.counters.edit_vote.load(Ordering::SeqCst),
        }
    }

    fn take_failure(&self, op: GatewayOp) -> GatewayResult<()> {
        match self.failures.write().get_mut(&op).and_then(VecDeque::pop_front) {
            Some(err) => {
                debug!(?op, %err, "injected gateway failure");
                Err(err)
            }
            None => Ok(()),
        }
    }

    async fn stall(&self, poll_id: PollId) {
        let delay = self.delays.read().get(&poll_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl PollApiGateway for InMemoryPollApi {
    async fn get_poll(&self, poll_id: PollId) -> GatewayResult<PollView> {
        self.counters.get_poll.fetch_add(1, Ordering::SeqCst);
        self.stall(poll_id).await;
        self.take_failure(GatewayOp::GetPoll)?;

        self.polls
            .read()
            .get(&poll_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("poll {poll_id}")))
    }

    async fn get_user_vote(&self, poll_id: PollId) -> GatewayResult<Option<PriorVote>> {
        self.counters.get_user_vote.fetch_add(1, Ordering::SeqCst);
        self.stall(poll_id).await;
        self.take_failure(GatewayOp::GetUserVote)?;

        Ok(self.votes.read().get(&poll_id).cloned())
    }

    async fn set_vote(&self, request: SetVoteRequest) -> GatewayResult<VoteAck> {
        self.counters.set_vote.fetch_add(1, Ordering::SeqCst);
        self.take_failure(GatewayOp::SetVote)?;

        if !self.polls.read().contains_key(&request.poll_id) {
            return Err(GatewayError::NotFound(format!("poll {}", request.poll_id)));
        }

        let id = self.next_vote.fetch_add(1, Ordering::SeqCst) + 1;
        let vote_id = VoteId::new(format!("vote-{id}"));
        let vote = PriorVote {
            vote_id: vote_id.clone(),
            options: request.weight_distribution.iter().map(|(k, _)| k.clone()).collect(),
            voting_power: 1.0,
            weight_distribution: request.weight_distribution,
        };
        self.votes.write().insert(request.poll_id, vote);

        Ok(VoteAck {
            vote_id: Some(IdRepr::Text(vote_id.0)),
        })
    }

    async fn edit_vote(&self, request: EditVoteRequest) -> GatewayResult<VoteAck> {
        self.counters.edit_vote.fetch_add(1, Ordering::SeqCst);
        self.take_failure(GatewayOp::EditVote)?;

        let mut votes = self.votes.write();
        let vote = votes
            .values_mut()
            .find(|v| v.vote_id == request.vote_id)
            .ok_or_else(|| GatewayError::NotFound(format!("vote {}", request.vote_id)))?;
        vote.weight_distribution = request.weight_distribution;

        Ok(VoteAck {
            vote_id: Some(IdRepr::Text(request.vote_id.0)),
        })
    }
}

/// Poll with bare-label options and the given schedule.
pub fn poll_fixture(
    poll_id: u64,
    labels: &[&str],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> PollView {
    PollView {
        details: PollDetails {
            poll_id: PollId(poll_id),
            title: format!("Poll {poll_id}"),
            description: String::new(),
            options: labels.iter().map(|l| PollOption::from_label(*l)).collect(),
            tags: Vec::new(),
            schedule: PollSchedule::new(start, end),
            author: None,
            participant_count: 0,
            is_anonymous: false,
            created_at: Some(start),
            has_voted: None,
        },
        reported_active: None,
        results: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use shared_types::WeightDistribution;

    fn open_poll(id: u64) -> PollView {
        let now = Utc::now();
        poll_fixture(id, &["A", "B"], now, now + ChronoDuration::days(1))
    }

    #[tokio::test]
    async fn test_missing_poll_is_not_found() {
        let api = InMemoryPollApi::new();
        let err = api.get_poll(PollId(9)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_set_then_edit_vote() {
        let api = InMemoryPollApi::new().with_poll(open_poll(1));
        let dist: WeightDistribution = [("A".into(), 60)].into_iter().collect();

        let ack = api
            .set_vote(SetVoteRequest {
                poll_id: PollId(1),
                weight_distribution: dist,
            })
            .await
            .unwrap();
        let vote_id = ack.vote_id().unwrap();

        let edited: WeightDistribution = [("A".into(), 10), ("B".into(), 90)].into_iter().collect();
        api.edit_vote(EditVoteRequest {
            vote_id: vote_id.clone(),
            weight_distribution: edited.clone(),
        })
        .await
        .unwrap();

        let stored = api.get_user_vote(PollId(1)).await.unwrap().unwrap();
        assert_eq!(stored.vote_id, vote_id);
        assert_eq!(stored.weight_distribution, edited);
        assert_eq!(api.calls().writes(), 2);
    }

    #[tokio::test]
    async fn test_injected_failure_fires_once() {
        let api = InMemoryPollApi::new().with_poll(open_poll(1));
        api.fail_next(GatewayOp::GetPoll, GatewayError::Transport("down".into()));

        assert!(api.get_poll(PollId(1)).await.is_err());
        assert!(api.get_poll(PollId(1)).await.is_ok());
        assert_eq!(api.calls().get_poll, 2);
    }
}
