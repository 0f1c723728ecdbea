//! # Wire Payloads
//!
//! JSON shapes exchanged with the poll backend, and their conversion into
//! the entities in [`crate::entities`].
//!
//! ## Design Rules
//!
//! - Field names are camelCase on the wire (`pollId`, `weightDistribution`),
//!   except `voteID` which the backend spells in caps.
//! - Decoding is lenient about optional fields; a missing `voteID` means
//!   "no vote", not a decode failure.
//! - Percentages arrive as JSON numbers and are rounded and clamped into
//!   `[0, 100]` on the way in.

use crate::entities::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use std::collections::BTreeMap;

/// An identifier the backend may send either as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdRepr {
    Number(u64),
    Text(String),
}

impl IdRepr {
    pub fn into_string(self) -> String {
        match self {
            IdRepr::Number(n) => n.to_string(),
            IdRepr::Text(s) => s,
        }
    }
}

/// Round and clamp a wire percentage into `[0, 100]`.
pub fn percentage_from_wire(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, f64::from(MAX_PERCENTAGE)) as u8
}

// =============================================================================
// POLLS
// =============================================================================

/// A poll option on the wire: a bare label (legacy) or a keyed object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionDto {
    Keyed { id: IdRepr, label: String },
    Label(String),
}

impl From<OptionDto> for PollOption {
    fn from(dto: OptionDto) -> Self {
        match dto {
            OptionDto::Keyed { id, label } => PollOption::new(id.into_string(), label),
            OptionDto::Label(label) => PollOption::from_label(label),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "worldID")]
    pub world_id: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

impl From<AuthorDto> for Author {
    fn from(dto: AuthorDto) -> Self {
        Author {
            name: dto.name,
            world_id: dto.world_id,
            profile_picture: dto.profile_picture,
        }
    }
}

/// Poll object as returned by `GET /poll/{id}` and `GET /poll`.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollDto {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub poll_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub options: Vec<OptionDto>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author: Option<AuthorDto>,
    #[serde(default)]
    pub participant_count: u64,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub has_voted: Option<bool>,
}

impl From<PollDto> for PollDetails {
    fn from(dto: PollDto) -> Self {
        PollDetails {
            poll_id: PollId(dto.poll_id),
            title: dto.title,
            description: dto.description,
            options: dto.options.into_iter().map(PollOption::from).collect(),
            tags: dto.tags,
            schedule: PollSchedule::new(dto.start_date, dto.end_date),
            author: dto.author.map(Author::from),
            participant_count: dto.participant_count,
            is_anonymous: dto.is_anonymous,
            created_at: dto.creation_date,
            has_voted: dto.has_voted,
        }
    }
}

/// Response of `GET /poll/{id}`.
///
/// The backend wraps the poll together with its running totals; a bare poll
/// object is accepted as well.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PollDetailsResponse {
    #[serde(rename_all = "camelCase")]
    Wrapped {
        poll: PollDto,
        #[serde(default)]
        is_active: Option<bool>,
        #[serde(default)]
        options_total_votes: Option<BTreeMap<String, f64>>,
        #[serde(default)]
        total_votes: Option<f64>,
    },
    Flat(PollDto),
}

impl From<PollDetailsResponse> for PollView {
    fn from(response: PollDetailsResponse) -> Self {
        match response {
            PollDetailsResponse::Wrapped {
                poll,
                is_active,
                options_total_votes,
                total_votes,
            } => {
                let details = PollDetails::from(poll);
                let results = options_total_votes.map(|totals| {
                    let totals: BTreeMap<OptionId, f64> =
                        totals.into_iter().map(|(k, v)| (OptionId(k), v)).collect();
                    let total = total_votes.unwrap_or_else(|| totals.values().sum());
                    PollResults::from_totals(&details.options, &totals, total)
                });
                PollView {
                    details,
                    reported_active: is_active,
                    results,
                }
            }
            PollDetailsResponse::Flat(poll) => PollView {
                details: PollDetails::from(poll),
                reported_active: None,
                results: None,
            },
        }
    }
}

/// Response of `GET /poll`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollListResponse {
    #[serde(default)]
    pub polls: Vec<PollDto>,
    #[serde(default)]
    pub total: u64,
}

/// Body of `POST /poll`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollRequest {
    pub title: String,
    pub description: String,
    pub options: Vec<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_anonymous: Option<bool>,
}

// =============================================================================
// VOTES
// =============================================================================

/// Response of `GET /user/getUserVotes?pollId={id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserVoteResponse {
    #[serde(default, rename = "voteID", alias = "voteId")]
    pub vote_id: Option<IdRepr>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub voting_power: f64,
    #[serde(default)]
    pub weight_distribution: BTreeMap<String, f64>,
}

impl UserVoteResponse {
    /// `None` when the backend signals "no vote" with an empty record.
    pub fn into_prior_vote(self) -> Option<PriorVote> {
        let vote_id = self.vote_id?;
        Some(PriorVote {
            vote_id: VoteId(vote_id.into_string()),
            options: self.options.into_iter().map(OptionId).collect(),
            voting_power: self.voting_power,
            weight_distribution: self
                .weight_distribution
                .into_iter()
                .map(|(k, v)| (OptionId(k), percentage_from_wire(v)))
                .collect(),
        })
    }
}

/// Body of `POST /user/setVote`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetVoteRequest {
    pub poll_id: PollId,
    pub weight_distribution: WeightDistribution,
}

/// Body of `POST /user/editVote`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditVoteRequest {
    #[serde(rename = "voteID")]
    pub vote_id: VoteId,
    pub weight_distribution: WeightDistribution,
}

/// Acknowledgment of a vote write. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoteAck {
    #[serde(default, rename = "voteID", alias = "voteId")]
    pub vote_id: Option<IdRepr>,
}

impl VoteAck {
    pub fn vote_id(&self) -> Option<VoteId> {
        self.vote_id.clone().map(|id| VoteId(id.into_string()))
    }
}

// =============================================================================
// USERS
// =============================================================================

/// Response of `GET /user/getUserData[?worldID=]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataResponse {
    #[serde(default, rename = "worldID", alias = "worldId")]
    pub world_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "profilePicture")]
    pub world_profile_pic: Option<String>,
    #[serde(default, alias = "pollsCreatedCount")]
    pub polls_created: u64,
    #[serde(default, alias = "pollsParticipatedCount")]
    pub polls_participated: u64,
}

impl From<UserDataResponse> for UserProfile {
    fn from(dto: UserDataResponse) -> Self {
        UserProfile {
            world_id: dto.world_id,
            name: dto.name,
            profile_picture: dto.world_profile_pic,
            polls_created: dto.polls_created,
            polls_participated: dto.polls_participated,
        }
    }
}

/// Activity type as the backend spells it (`CREATED`, `voted`, ...).
pub fn activity_kind_from_wire(raw: &str) -> ActivityKind {
    match raw.trim().to_ascii_lowercase().as_str() {
        "created" | "create" => ActivityKind::Created,
        "voted" | "vote" => ActivityKind::Voted,
        _ => ActivityKind::Other,
    }
}

/// One entry of `GET /user/getUserActivities`.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActionDto {
    pub id: IdRepr,
    #[serde(rename = "type", default)]
    pub action_type: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub poll_id: u64,
    #[serde(default)]
    pub poll_title: String,
    #[serde(default)]
    pub poll_description: String,
    pub created_at: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub voters_participated: u64,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_profile_picture: Option<String>,
    #[serde(default, alias = "authorWorldID")]
    pub author_world_id: Option<String>,
}

impl From<UserActionDto> for UserActivity {
    fn from(dto: UserActionDto) -> Self {
        UserActivity {
            id: dto.id.into_string(),
            kind: activity_kind_from_wire(&dto.action_type),
            poll_id: PollId(dto.poll_id),
            poll_title: dto.poll_title,
            poll_description: dto.poll_description,
            created_at: dto.created_at,
            end_date: dto.end_date,
            voters_participated: dto.voters_participated,
            author: Author {
                name: dto.author_name,
                world_id: dto.author_world_id,
                profile_picture: dto.author_profile_picture,
            },
        }
    }
}

/// Response of `GET /user/getUserActivities`. `total` is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivitiesResponse {
    #[serde(default)]
    pub user_actions: Vec<UserActionDto>,
    #[serde(default)]
    pub total: Option<u64>,
}
