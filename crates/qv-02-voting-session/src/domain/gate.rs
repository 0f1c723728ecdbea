//! # Submission Gate
//!
//! Decides whether "Vote" is enabled and which backend call it turns into.
//!
//! The button is enabled only when all four conditions hold:
//!
//! 1. poll and prior-vote data are loaded,
//! 2. the allocation is submittable (something allocated, total <= 100),
//! 3. the poll is still active,
//! 4. the allocation differs from the prior vote.
//!
//! Every failing condition is reported, not just the first.

use qv_01_allocation::Allocation;
use serde::Serialize;
use shared_types::{PriorVote, VoteAction, WeightDistribution};
use std::fmt;

/// Whether the allocation differs from what is already stored.
///
/// Without a prior vote any non-zero entry counts as a change. With one,
/// each option is compared against `prior[option] ?? 0`.
pub fn has_changed(allocation: &Allocation, prior: Option<&PriorVote>) -> bool {
    match prior {
        None => allocation.entries().iter().any(|e| e.percentage() > 0),
        Some(prior) => allocation.entries().iter().any(|e| {
            e.percentage() != prior.weight_distribution.percentage_of(&e.option().id)
        }),
    }
}

/// Submission payload: one entry per option, zeros included.
pub fn build_weight_distribution(allocation: &Allocation) -> WeightDistribution {
    allocation.weight_distribution()
}

/// `Update` when a prior vote exists, `Create` otherwise.
pub fn decide_action(prior: Option<&PriorVote>) -> VoteAction {
    match prior {
        Some(_) => VoteAction::Update,
        None => VoteAction::Create,
    }
}

/// A condition currently keeping the submit button disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateBlocker {
    /// Poll details or the prior vote are still loading.
    Loading,
    /// Every option is at 0%.
    NothingAllocated,
    /// Total above 100%.
    OverBudget,
    /// Poll is past its end time (or not yet started).
    PollEnded,
    /// Allocation equals the stored vote.
    Unchanged,
}

impl fmt::Display for GateBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GateBlocker::Loading => "still loading",
            GateBlocker::NothingAllocated => "nothing allocated",
            GateBlocker::OverBudget => "allocation exceeds 100%",
            GateBlocker::PollEnded => "poll is not active",
            GateBlocker::Unchanged => "no changes since last vote",
        };
        f.write_str(text)
    }
}

/// Inputs of one gate evaluation.
#[derive(Debug, Clone, Copy)]
pub struct GateInput<'a> {
    /// `None` until hydration has seeded an allocation.
    pub allocation: Option<&'a Allocation>,
    pub prior: Option<&'a PriorVote>,
    pub is_loading: bool,
    pub poll_active: bool,
}

/// Outcome of a gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitGate {
    blockers: Vec<GateBlocker>,
    action: VoteAction,
}

impl SubmitGate {
    pub fn evaluate(input: GateInput<'_>) -> Self {
        let mut blockers = Vec::new();

        if input.is_loading || input.allocation.is_none() {
            blockers.push(GateBlocker::Loading);
        }

        if let Some(allocation) = input.allocation {
            if allocation.is_over_budget() {
                blockers.push(GateBlocker::OverBudget);
            } else if !allocation.is_submittable() {
                blockers.push(GateBlocker::NothingAllocated);
            }
        }

        if !input.poll_active {
            blockers.push(GateBlocker::PollEnded);
        }

        if let Some(allocation) = input.allocation {
            if !has_changed(allocation, input.prior) {
                blockers.push(GateBlocker::Unchanged);
            }
        }

        Self {
            blockers,
            action: decide_action(input.prior),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.blockers.is_empty()
    }

    pub fn blockers(&self) -> &[GateBlocker] {
        &self.blockers
    }

    pub fn is_blocked_by(&self, blocker: GateBlocker) -> bool {
        self.blockers.contains(&blocker)
    }

    /// Call the submit button would issue.
    pub fn action(&self) -> VoteAction {
        self.action
    }
}
