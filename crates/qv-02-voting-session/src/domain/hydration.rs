//! # Prior-Vote Hydrator
//!
//! Tracks the two fetches that precede voting (poll details and the user's
//! prior vote) and seeds the allocation once both have arrived.
//!
//! ## Tickets
//!
//! Every fetch round is tagged with a [`HydrationTicket`]. Opening a
//! different poll, refreshing, or closing the view bumps the generation, so
//! responses carrying an older ticket are rejected instead of being applied
//! to the current allocation.
//!
//! ## Re-seeding
//!
//! A repeat hydration of the same poll produces a fresh seed. Whether that
//! seed replaces the live allocation is decided by [`ReseedPolicy`].

use qv_01_allocation::Allocation;
use serde::{Deserialize, Serialize};
use shared_types::{PollId, PollView, PriorVote};
use tracing::debug;

/// What to do with a fresh seed when the user already has an allocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReseedPolicy {
    /// Replace the allocation only while it still equals the last seed.
    #[default]
    PreserveEdits,
    /// Always replace the allocation with the fresh seed.
    Always,
}

/// Identifies one fetch round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HydrationTicket {
    pub poll_id: PollId,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum HydrationStatus {
    /// No poll selected.
    Idle,
    Loading,
    Ready,
    /// A fetch failed; the allocation stays unseeded until a retry succeeds.
    Failed(String),
}

/// Result of seeding.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedOutcome {
    /// Fresh allocation to install.
    Seeded(Allocation),
    /// Seed computed but unsaved edits were kept.
    EditsPreserved,
    /// Still waiting on the other fetch.
    Pending,
}

#[derive(Debug)]
pub struct Hydrator {
    policy: ReseedPolicy,
    poll_id: Option<PollId>,
    generation: u64,
    status: HydrationStatus,
    poll: Option<PollView>,
    /// Outer `None`: not fetched yet. Inner `None`: user has not voted.
    prior: Option<Option<PriorVote>>,
    /// Last allocation handed out by a seed (or accepted by a submission).
    baseline: Option<Allocation>,
}

impl Hydrator {
    pub fn new(policy: ReseedPolicy) -> Self {
        Self {
            policy,
            poll_id: None,
            generation: 0,
            status: HydrationStatus::Idle,
            poll: None,
            prior: None,
            baseline: None,
        }
    }

    /// Start a fetch round for `poll_id`.
    ///
    /// Switching to another poll drops everything known about the old one.
    pub fn begin(&mut self, poll_id: PollId) -> HydrationTicket {
        if self.poll_id != Some(poll_id) {
            self.poll = None;
            self.prior = None;
            self.baseline = None;
            self.poll_id = Some(poll_id);
        }
        self.generation += 1;
        self.status = HydrationStatus::Loading;

        debug!(%poll_id, generation = self.generation, "hydration started");
        HydrationTicket {
            poll_id,
            generation: self.generation,
        }
    }

    /// Forget the current poll; in-flight tickets become stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.poll_id = None;
        self.poll = None;
        self.prior = None;
        self.baseline = None;
        self.status = HydrationStatus::Idle;
    }

    pub fn is_current(&self, ticket: &HydrationTicket) -> bool {
        self.poll_id == Some(ticket.poll_id) && self.generation == ticket.generation
    }

    pub fn poll_id(&self) -> Option<PollId> {
        self.poll_id
    }

    pub fn status(&self) -> &HydrationStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == HydrationStatus::Loading
    }

    pub fn poll(&self) -> Option<&PollView> {
        self.poll.as_ref()
    }

    /// Prior vote, `None` both before the fetch and when the user has not voted.
    pub fn prior_vote(&self) -> Option<&PriorVote> {
        self.prior.as_ref().and_then(Option::as_ref)
    }

    pub fn has_prior_result(&self) -> bool {
        self.prior.is_some()
    }

    pub fn policy(&self) -> ReseedPolicy {
        self.policy
    }

    /// Record fresh poll details. Stale tickets are ignored and return `false`.
    pub fn apply_poll(&mut self, ticket: &HydrationTicket, poll: PollView) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.poll = Some(poll);
        true
    }

    /// Record the prior-vote fetch result. `None` means "no vote".
    pub fn apply_prior(&mut self, ticket: &HydrationTicket, prior: Option<PriorVote>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.prior = Some(prior);
        true
    }

    /// Mark the round failed.
    pub fn fail(&mut self, ticket: &HydrationTicket, reason: impl Into<String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.status = HydrationStatus::Failed(reason.into());
        true
    }

    /// Seed once both poll options and the prior-vote result are known.
    ///
    /// `current` is the allocation the view holds right now, if any.
    pub fn try_seed(&mut self, current: Option<&Allocation>) -> SeedOutcome {
        let (Some(poll), Some(prior)) = (self.poll.as_ref(), self.prior.as_ref()) else {
            return SeedOutcome::Pending;
        };

        let seed = Allocation::seed(
            &poll.details.options,
            prior.as_ref().map(|p| &p.weight_distribution),
        );
        self.status = HydrationStatus::Ready;

        let keep_edits = match (self.policy, current, self.baseline.as_ref()) {
            (ReseedPolicy::Always, _, _) => false,
            (ReseedPolicy::PreserveEdits, Some(current), Some(baseline)) => {
                // Option set changed upstream: the old rows no longer apply.
                let same_rows = current.len() == seed.len()
                    && current
                        .entries()
                        .iter()
                        .zip(seed.entries())
                        .all(|(a, b)| a.option().id == b.option().id);
                same_rows && current != baseline
            }
            (ReseedPolicy::PreserveEdits, _, _) => false,
        };

        if keep_edits {
            debug!(poll_id = ?self.poll_id, "re-seed skipped, unsaved edits kept");
            return SeedOutcome::EditsPreserved;
        }

        self.baseline = Some(seed.clone());
        SeedOutcome::Seeded(seed)
    }

    /// Install the vote stored by a successful submission.
    ///
    /// `submitted` becomes the new baseline, so a later re-seed treats it as
    /// clean.
    pub fn record_submission(&mut self, poll_id: PollId, prior: Option<PriorVote>, submitted: Allocation) {
        if self.poll_id != Some(poll_id) {
            return;
        }
        self.prior = Some(prior);
        self.baseline = Some(submitted);
    }

    /// Replace poll details outside a fetch round (submit-time recheck).
    pub fn refresh_poll(&mut self, poll_id: PollId, poll: PollView) {
        if self.poll_id == Some(poll_id) {
            self.poll = Some(poll);
        }
    }
}
