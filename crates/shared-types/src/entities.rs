//! # Poll Entities
//!
//! Core entities shared by the allocation engine, the voting session and the
//! poll directory.
//!
//! ## Clusters
//!
//! - **Identity**: `PollId`, `OptionId`, `VoteId`
//! - **Poll**: `PollOption`, `PollSchedule`, `PollDetails`, `PollView`
//! - **Votes**: `WeightDistribution`, `PriorVote`, `VoteAction`
//! - **Results**: `OptionTally`, `PollResults`
//!
//! ## Option Identity
//!
//! Every option carries a stable [`OptionId`]. Allocations, prior votes and
//! submissions are keyed by that id, never by the display label, so renaming
//! a label cannot break a weight lookup. Backends that still ship bare label
//! strings get `OptionId == label` (see `wire::OptionDto`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Upper bound of a single option's percentage and of a valid allocation total.
pub const MAX_PERCENTAGE: u8 = 100;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Backend identifier of a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollId(pub u64);

impl fmt::Display for PollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PollId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Stable identifier of a poll option.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(pub String);

impl OptionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OptionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for OptionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifier of a stored vote (the backend's `voteID`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteId(pub String);

impl VoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for VoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// CLUSTER B: POLL
// =============================================================================

/// A poll choice. Immutable once the poll is published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    /// Stable key used in every weight distribution.
    pub id: OptionId,
    /// Display text.
    pub label: String,
}

impl PollOption {
    pub fn new(id: impl Into<OptionId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Legacy option whose identity is its label.
    pub fn from_label(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            id: OptionId(label.clone()),
            label,
        }
    }
}

/// Voting window of a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSchedule {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl PollSchedule {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// A poll accepts votes from `start` (inclusive) until `end` (exclusive).
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && now < self.end
    }

    pub fn has_ended_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.end
    }
}

/// Poll author as shown on poll cards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub world_id: Option<String>,
    pub profile_picture: Option<String>,
}

/// A published poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollDetails {
    pub poll_id: PollId,
    pub title: String,
    pub description: String,
    /// Options in display order.
    pub options: Vec<PollOption>,
    pub tags: Vec<String>,
    pub schedule: PollSchedule,
    pub author: Option<Author>,
    pub participant_count: u64,
    pub is_anonymous: bool,
    pub created_at: Option<DateTime<Utc>>,
    /// Whether the requesting user already voted (feed listings only).
    pub has_voted: Option<bool>,
}

impl PollDetails {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.schedule.is_active_at(now)
    }

    pub fn option(&self, id: &OptionId) -> Option<&PollOption> {
        self.options.iter().find(|o| &o.id == id)
    }
}

/// Everything `GET /poll/{id}` returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollView {
    pub details: PollDetails,
    /// Activity flag as reported by the backend, kept for diagnostics only.
    /// The client decides activity from `details.schedule`.
    pub reported_active: Option<bool>,
    pub results: Option<PollResults>,
}

impl PollView {
    /// Results as sent by the backend, or zero tallies when none came back.
    pub fn results_or_empty(&self) -> PollResults {
        self.results.clone().unwrap_or_else(|| {
            PollResults::from_totals(&self.details.options, &BTreeMap::new(), 0.0)
        })
    }
}

// =============================================================================
// CLUSTER C: VOTES
// =============================================================================

/// Percentage points per option.
///
/// Values are always within `[0, MAX_PERCENTAGE]`; inserts clamp.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightDistribution(BTreeMap<OptionId, u8>);

impl WeightDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, option: OptionId, percentage: u8) {
        self.0.insert(option, percentage.min(MAX_PERCENTAGE));
    }

    pub fn get(&self, option: &OptionId) -> Option<u8> {
        self.0.get(option).copied()
    }

    /// Percentage for `option`, `0` when absent.
    pub fn percentage_of(&self, option: &OptionId) -> u8 {
        self.get(option).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OptionId, u8)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> u32 {
        self.0.values().map(|v| u32::from(*v)).sum()
    }
}

impl FromIterator<(OptionId, u8)> for WeightDistribution {
    fn from_iter<T: IntoIterator<Item = (OptionId, u8)>>(iter: T) -> Self {
        let mut distribution = Self::new();
        for (option, percentage) in iter {
            distribution.insert(option, percentage);
        }
        distribution
    }
}

/// The user's previously stored allocation for a poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorVote {
    pub vote_id: VoteId,
    pub options: Vec<OptionId>,
    pub voting_power: f64,
    pub weight_distribution: WeightDistribution,
}

/// Which backend call a submission turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteAction {
    /// `POST /user/setVote`
    Create,
    /// `POST /user/editVote`
    Update,
}

impl fmt::Display for VoteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteAction::Create => f.write_str("create"),
            VoteAction::Update => f.write_str("update"),
        }
    }
}

// =============================================================================
// CLUSTER D: RESULTS
// =============================================================================

/// Aggregated votes for one option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionTally {
    pub option: PollOption,
    pub votes: f64,
    /// Share of all votes, `0.0` when nobody voted.
    pub share_percent: f64,
}

/// Aggregated results of a poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollResults {
    pub total_votes: f64,
    pub tallies: Vec<OptionTally>,
}

impl PollResults {
    /// Build per-option tallies in poll option order.
    pub fn from_totals(
        options: &[PollOption],
        totals: &BTreeMap<OptionId, f64>,
        total_votes: f64,
    ) -> Self {
        let tallies = options
            .iter()
            .map(|option| {
                let votes = totals.get(&option.id).copied().unwrap_or(0.0);
                let share_percent = if total_votes > 0.0 {
                    votes / total_votes * 100.0
                } else {
                    0.0
                };
                OptionTally {
                    option: option.clone(),
                    votes,
                    share_percent,
                }
            })
            .collect();

        Self {
            total_votes,
            tallies,
        }
    }

    /// Tally with the most votes; ties resolve to the earliest option.
    pub fn leader(&self) -> Option<&OptionTally> {
        self.tallies
            .iter()
            .filter(|t| t.votes > 0.0)
            .fold(None, |best: Option<&OptionTally>, t| match best {
                Some(b) if b.votes >= t.votes => Some(b),
                _ => Some(t),
            })
    }
}

// =============================================================================
// CLUSTER E: USERS
// =============================================================================

/// Public profile of a voter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub world_id: String,
    pub name: Option<String>,
    pub profile_picture: Option<String>,
    pub polls_created: u64,
    pub polls_participated: u64,
}

impl UserProfile {
    /// `@name`, or `Anon` for users without a name.
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => format!("@{name}"),
            _ => "Anon".to_string(),
        }
    }
}

/// What a user did to a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Created,
    Voted,
    Other,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityKind::Created => f.pad("created"),
            ActivityKind::Voted => f.pad("voted"),
            ActivityKind::Other => f.pad("other"),
        }
    }
}

/// One entry of a user's activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserActivity {
    pub id: String,
    pub kind: ActivityKind,
    pub poll_id: PollId,
    pub poll_title: String,
    pub poll_description: String,
    pub created_at: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub voters_participated: u64,
    pub author: Author,
}

impl UserActivity {
    /// Poll card for the activity.
    ///
    /// Activities carry no options, tags or start date; the window starts at
    /// `created_at`.
    pub fn to_poll_card(&self) -> PollDetails {
        PollDetails {
            poll_id: self.poll_id,
            title: self.poll_title.clone(),
            description: self.poll_description.clone(),
            options: Vec::new(),
            tags: Vec::new(),
            schedule: PollSchedule::new(self.created_at, self.end_date),
            author: Some(self.author.clone()),
            participant_count: self.voters_participated,
            is_anonymous: false,
            created_at: Some(self.created_at),
            has_voted: Some(self.kind == ActivityKind::Voted),
        }
    }
}
