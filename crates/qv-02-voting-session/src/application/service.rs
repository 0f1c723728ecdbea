//! # Voting Session Service
//!
//! Application service for one poll view: hydrates the allocation, applies
//! user edits, evaluates the submission gate and submits votes.
//!
//! All model mutations are synchronous. The only suspension points are the
//! four backend calls, and no lock is held across them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use qv_01_allocation::Allocation;
use serde::Serialize;
use shared_types::{
    EditVoteRequest, GatewayResult, PollId, PollView, PriorVote, SetVoteRequest, VoteAction,
    VoteId, WeightDistribution,
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::adapters::SystemClock;
use crate::config::SessionConfig;
use crate::domain::{
    build_weight_distribution, decide_action, GateInput, HydrationStatus, HydrationTicket,
    Hydrator, SeedOutcome, SubmitGate,
};
use crate::error::{VotingError, VotingResult};
use crate::events::VotingEvent;
use crate::ports::{Clock, PollApiGateway, VotingSessionApi};

/// Acknowledgment of a stored vote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitReceipt {
    pub poll_id: PollId,
    pub action: VoteAction,
    pub vote_id: Option<VoteId>,
    pub weight_distribution: WeightDistribution,
    pub submitted_at: DateTime<Utc>,
}

/// Snapshot of a session for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    pub session_id: Uuid,
    pub poll_id: Option<PollId>,
    pub hydration: HydrationStatus,
    pub is_submitting: bool,
    pub has_prior_vote: bool,
    pub last_error: Option<String>,
    pub last_receipt: Option<SubmitReceipt>,
}

struct SessionState {
    hydrator: Hydrator,
    allocation: Option<Allocation>,
    submitting: bool,
    last_error: Option<String>,
    last_receipt: Option<SubmitReceipt>,
}

/// Clears the in-flight flag on every exit path of `submit`.
struct InFlight<'a> {
    state: &'a RwLock<SessionState>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.write().submitting = false;
    }
}

/// Voting session for one poll view.
pub struct VotingSession<G: PollApiGateway, C: Clock = SystemClock> {
    session_id: Uuid,
    gateway: Arc<G>,
    clock: C,
    config: SessionConfig,
    state: RwLock<SessionState>,
    events: broadcast::Sender<VotingEvent>,
}

impl<G: PollApiGateway> VotingSession<G, SystemClock> {
    pub fn with_system_clock(gateway: Arc<G>, config: SessionConfig) -> VotingResult<Self> {
        Self::new(gateway, SystemClock, config)
    }
}

impl<G: PollApiGateway, C: Clock> VotingSession<G, C> {
    pub fn new(gateway: Arc<G>, clock: C, config: SessionConfig) -> VotingResult<Self> {
        config.validate()?;
        let (events, _) = broadcast::channel(config.event_buffer);

        Ok(Self {
            session_id: Uuid::new_v4(),
            gateway,
            clock,
            state: RwLock::new(SessionState {
                hydrator: Hydrator::new(config.reseed_policy),
                allocation: None,
                submitting: false,
                last_error: None,
                last_receipt: None,
            }),
            config,
            events,
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Receive session events (hydration, stored votes).
    pub fn subscribe(&self) -> broadcast::Receiver<VotingEvent> {
        self.events.subscribe()
    }

    /// Poll details from the latest fetch.
    pub fn poll(&self) -> Option<PollView> {
        self.state.read().hydrator.poll().cloned()
    }

    pub fn prior_vote(&self) -> Option<PriorVote> {
        self.state.read().hydrator.prior_vote().cloned()
    }

    /// Whether the current poll is active by the session clock.
    pub fn is_poll_active(&self) -> bool {
        let now = self.clock.now();
        self.state
            .read()
            .hydrator
            .poll()
            .is_some_and(|p| p.details.is_active_at(now))
    }

    /// Replace the allocation with `f(current)`.
    ///
    /// Used by input adapters that compute the next allocation themselves.
    pub fn update_allocation<F>(&self, f: F) -> VotingResult<Allocation>
    where
        F: FnOnce(&Allocation) -> Allocation,
    {
        let mut state = self.state.write();
        let current = state.allocation.as_ref().ok_or(VotingError::NotHydrated)?;
        let next = f(current);
        state.allocation = Some(next.clone());
        Ok(next)
    }

    fn evaluate_gate(&self, state: &SessionState) -> SubmitGate {
        let now = self.clock.now();
        let poll_active = state
            .hydrator
            .poll()
            .is_some_and(|p| p.details.is_active_at(now));

        SubmitGate::evaluate(GateInput {
            allocation: state.allocation.as_ref(),
            prior: state.hydrator.prior_vote(),
            is_loading: state.hydrator.is_loading(),
            poll_active,
        })
    }

    fn publish(&self, event: VotingEvent) {
        if self.events.send(event).is_err() {
            trace!(session = %self.session_id, "no event subscribers");
        }
    }

    /// Prior vote with retries on transient failures. A 404 means "no vote".
    async fn fetch_prior_vote(&self, poll_id: PollId) -> GatewayResult<Option<PriorVote>> {
        let mut attempt = 0;
        loop {
            match self.gateway.get_user_vote(poll_id).await {
                Ok(vote) => return Ok(vote),
                Err(err) if err.is_not_found() => return Ok(None),
                Err(err) if err.is_retryable() && attempt < self.config.prior_vote_retries => {
                    attempt += 1;
                    warn!(%poll_id, attempt, error = %err, "prior vote fetch failed, retrying");
                    if !self.config.retry_delay.is_zero() {
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn hydrate(&self, ticket: HydrationTicket) -> VotingResult<()> {
        let poll_id = ticket.poll_id;
        let (poll, prior) = tokio::join!(
            self.gateway.get_poll(poll_id),
            self.fetch_prior_vote(poll_id)
        );

        let mut guard = self.state.write();
        let state = &mut *guard;

        if !state.hydrator.is_current(&ticket) {
            debug!(session = %self.session_id, %poll_id, "dropping stale hydration response");
            return Err(VotingError::StaleResponse(poll_id));
        }

        let mut failure = None;
        match poll {
            Ok(view) => {
                state.hydrator.apply_poll(&ticket, view);
            }
            Err(err) if err.is_not_found() => failure = Some(VotingError::PollNotFound(poll_id)),
            Err(err) => {
                failure = Some(VotingError::HydrationFailed {
                    poll_id,
                    reason: err.to_string(),
                })
            }
        }
        match prior {
            Ok(prior) => {
                state.hydrator.apply_prior(&ticket, prior);
            }
            Err(err) => {
                failure.get_or_insert(VotingError::HydrationFailed {
                    poll_id,
                    reason: err.to_string(),
                });
            }
        }

        if let Some(error) = failure {
            let reason = error.to_string();
            state.hydrator.fail(&ticket, reason.clone());
            state.last_error = Some(reason.clone());
            drop(guard);

            warn!(session = %self.session_id, %poll_id, %reason, "hydration failed");
            self.publish(VotingEvent::HydrationFailed { poll_id, reason });
            return Err(error);
        }

        match state.hydrator.try_seed(state.allocation.as_ref()) {
            SeedOutcome::Seeded(allocation) => state.allocation = Some(allocation),
            SeedOutcome::EditsPreserved | SeedOutcome::Pending => {}
        }
        let has_prior_vote = state.hydrator.prior_vote().is_some();
        state.last_error = None;
        drop(guard);

        info!(session = %self.session_id, %poll_id, has_prior_vote, "poll hydrated");
        self.publish(VotingEvent::Hydrated {
            poll_id,
            has_prior_vote,
        });
        Ok(())
    }

    async fn send_vote(
        &self,
        poll_id: PollId,
        snapshot: &Allocation,
        prior: Option<&PriorVote>,
    ) -> VotingResult<SubmitReceipt> {
        if self.config.recheck_active_before_submit {
            let fresh = self.gateway.get_poll(poll_id).await.map_err(|err| {
                if err.is_not_found() {
                    VotingError::PollNotFound(poll_id)
                } else {
                    VotingError::from(err)
                }
            })?;
            let active = fresh.details.is_active_at(self.clock.now());
            self.state.write().hydrator.refresh_poll(poll_id, fresh);
            if !active {
                return Err(VotingError::PollEnded(poll_id));
            }
        }

        let action = decide_action(prior);
        let distribution = build_weight_distribution(snapshot);

        let ack = match prior {
            Some(prior) => {
                self.gateway
                    .edit_vote(EditVoteRequest {
                        vote_id: prior.vote_id.clone(),
                        weight_distribution: distribution.clone(),
                    })
                    .await?
            }
            None => {
                self.gateway
                    .set_vote(SetVoteRequest {
                        poll_id,
                        weight_distribution: distribution.clone(),
                    })
                    .await?
            }
        };
        info!(session = %self.session_id, %poll_id, %action, "vote stored");

        let acked_id = ack.vote_id().or_else(|| prior.map(|p| p.vote_id.clone()));
        // Refetch so the stored vote, not our local copy, becomes the prior.
        let stored = match self.fetch_prior_vote(poll_id).await {
            Ok(Some(vote)) => Some(vote),
            refetch => {
                if let Err(err) = refetch {
                    warn!(%poll_id, error = %err, "refetch after submit failed, using submitted values");
                }
                acked_id.clone().map(|vote_id| PriorVote {
                    vote_id,
                    options: snapshot.entries().iter().map(|e| e.option().id.clone()).collect(),
                    voting_power: prior.map(|p| p.voting_power).unwrap_or_default(),
                    weight_distribution: distribution.clone(),
                })
            }
        };

        let receipt = SubmitReceipt {
            poll_id,
            action,
            vote_id: stored.as_ref().map(|v| v.vote_id.clone()).or(acked_id),
            weight_distribution: distribution,
            submitted_at: self.clock.now(),
        };

        {
            let mut state = self.state.write();
            if state.hydrator.poll_id() == Some(poll_id) {
                state
                    .hydrator
                    .record_submission(poll_id, stored, snapshot.clone());
                state.last_error = None;
                state.last_receipt = Some(receipt.clone());
            } else {
                debug!(session = %self.session_id, %poll_id, "view moved on, receipt not kept");
            }
        }

        self.publish(VotingEvent::VoteSubmitted {
            poll_id,
            action,
            vote_id: receipt.vote_id.clone(),
        });
        Ok(receipt)
    }
}

#[async_trait]
impl<G, C> VotingSessionApi for VotingSession<G, C>
where
    G: PollApiGateway + 'static,
    C: Clock + 'static,
{
    async fn open(&self, poll_id: PollId) -> VotingResult<()> {
        let ticket = {
            let mut state = self.state.write();
            if state.hydrator.poll_id() != Some(poll_id) {
                state.allocation = None;
                state.last_error = None;
                state.last_receipt = None;
            }
            state.hydrator.begin(poll_id)
        };

        info!(session = %self.session_id, %poll_id, "opening poll");
        self.hydrate(ticket).await
    }

    async fn refresh(&self) -> VotingResult<()> {
        let ticket = {
            let mut state = self.state.write();
            let poll_id = state.hydrator.poll_id().ok_or(VotingError::NotHydrated)?;
            state.hydrator.begin(poll_id)
        };
        self.hydrate(ticket).await
    }

    fn close(&self) {
        let mut state = self.state.write();
        if let Some(poll_id) = state.hydrator.poll_id() {
            debug!(session = %self.session_id, %poll_id, "closing poll");
        }
        state.hydrator.reset();
        state.allocation = None;
        state.last_error = None;
        state.last_receipt = None;
    }

    fn allocation(&self) -> Option<Allocation> {
        self.state.read().allocation.clone()
    }

    /// # Panics
    ///
    /// Panics when `index` is not an option of the current poll.
    fn set_percentage(&self, index: usize, percentage: i32) -> VotingResult<Allocation> {
        self.update_allocation(|a| a.set_percentage(index, percentage))
    }

    fn increment(&self, index: usize) -> VotingResult<Allocation> {
        self.update_allocation(|a| a.increment(index))
    }

    fn decrement(&self, index: usize) -> VotingResult<Allocation> {
        self.update_allocation(|a| a.decrement(index))
    }

    fn gate(&self) -> SubmitGate {
        let state = self.state.read();
        self.evaluate_gate(&state)
    }

    async fn submit(&self) -> VotingResult<SubmitReceipt> {
        let (poll_id, snapshot, prior) = {
            let mut state = self.state.write();
            if state.submitting {
                return Err(VotingError::SubmitInProgress);
            }

            let gate = self.evaluate_gate(&state);
            if !gate.is_enabled() {
                return Err(VotingError::SubmissionBlocked {
                    blockers: gate.blockers().to_vec(),
                });
            }

            let poll_id = state.hydrator.poll_id().ok_or(VotingError::NotHydrated)?;
            let snapshot = state.allocation.clone().ok_or(VotingError::NotHydrated)?;
            let prior = state.hydrator.prior_vote().cloned();
            state.submitting = true;
            (poll_id, snapshot, prior)
        };
        let _in_flight = InFlight { state: &self.state };

        match self.send_vote(poll_id, &snapshot, prior.as_ref()).await {
            Ok(receipt) => Ok(receipt),
            Err(err) => {
                warn!(session = %self.session_id, %poll_id, error = %err, "vote submission failed");
                let mut state = self.state.write();
                if state.hydrator.poll_id() == Some(poll_id) {
                    state.last_error = Some(err.to_string());
                }
                Err(err)
            }
        }
    }

    fn status(&self) -> SessionStatus {
        let state = self.state.read();
        SessionStatus {
            session_id: self.session_id,
            poll_id: state.hydrator.poll_id(),
            hydration: state.hydrator.status().clone(),
            is_submitting: state.submitting,
            has_prior_vote: state.hydrator.prior_vote().is_some(),
            last_error: state.last_error.clone(),
            last_receipt: state.last_receipt.clone(),
        }
    }
}
