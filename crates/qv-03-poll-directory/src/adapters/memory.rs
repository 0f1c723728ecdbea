//! In-memory poll store with backend-equivalent filtering, sorting and
//! paging.

use crate::domain::{PollListQuery, PollPage, SortBy, SortOrder};
use crate::ports::PollDirectoryGateway;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use shared_types::{
    Author, CreatePollRequest, GatewayError, GatewayResult, PollDetails, PollId, PollOption,
    PollSchedule, PollView,
};
use std::cmp::Ordering as CmpOrdering;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory implementation of [`PollDirectoryGateway`].
///
/// `current_user` is the world id the store treats as the caller, for the
/// `userCreated` filter and as the author of created polls.
pub struct InMemoryPollDirectory {
    polls: RwLock<BTreeMap<PollId, PollView>>,
    voted: RwLock<HashSet<PollId>>,
    current_user: String,
    next_id: AtomicU64,
}

impl InMemoryPollDirectory {
    pub fn new(current_user: impl Into<String>) -> Self {
        Self {
            polls: RwLock::new(BTreeMap::new()),
            voted: RwLock::new(HashSet::new()),
            current_user: current_user.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn insert(&self, poll: PollView) {
        let id = poll.details.poll_id.0;
        self.next_id.fetch_max(id + 1, Ordering::SeqCst);
        self.polls.write().insert(poll.details.poll_id, poll);
    }

    pub fn mark_voted(&self, poll_id: PollId) {
        self.voted.write().insert(poll_id);
    }

    pub fn len(&self) -> usize {
        self.polls.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.polls.read().is_empty()
    }

    fn matches(&self, poll: &PollDetails, query: &PollListQuery, voted: &HashSet<PollId>) -> bool {
        let now = Utc::now();
        if let Some(active) = query.is_active {
            if poll.is_active_at(now) != active {
                return false;
            }
        }
        if query.user_voted == Some(true) && !voted.contains(&poll.poll_id) {
            return false;
        }
        if query.user_created == Some(true) {
            let mine = poll
                .author
                .as_ref()
                .and_then(|a| a.world_id.as_deref())
                .is_some_and(|id| id == self.current_user);
            if !mine {
                return false;
            }
        }
        if let Some(search) = &query.search {
            let needle = search.to_lowercase();
            if !poll.title.to_lowercase().contains(&needle)
                && !poll.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

fn compare(a: &PollDetails, b: &PollDetails, sort_by: SortBy) -> CmpOrdering {
    let primary = match sort_by {
        SortBy::CreationDate => a.created_at.cmp(&b.created_at),
        SortBy::EndDate => a.schedule.end.cmp(&b.schedule.end),
        SortBy::ParticipantCount => a.participant_count.cmp(&b.participant_count),
    };
    primary.then_with(|| a.poll_id.cmp(&b.poll_id))
}

#[async_trait]
impl PollDirectoryGateway for InMemoryPollDirectory {
    async fn list_polls(&self, query: &PollListQuery) -> GatewayResult<PollPage> {
        let voted = self.voted.read().clone();
        let mut matching: Vec<PollDetails> = self
            .polls
            .read()
            .values()
            .filter(|p| self.matches(&p.details, query, &voted))
            .map(|p| PollDetails {
                has_voted: Some(voted.contains(&p.details.poll_id)),
                ..p.details.clone()
            })
            .collect();

        let sort_by = query.effective_sort_by();
        matching.sort_by(|a, b| compare(a, b, sort_by));
        if query.effective_sort_order() == SortOrder::Desc {
            matching.reverse();
        }

        let total = matching.len() as u64;
        let limit = query.limit.max(1) as usize;
        let skip = (query.page.max(1) as usize - 1) * limit;

        Ok(PollPage {
            polls: matching.into_iter().skip(skip).take(limit).collect(),
            total,
        })
    }

    async fn get_poll(&self, poll_id: PollId) -> GatewayResult<PollView> {
        self.polls
            .read()
            .get(&poll_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("poll {poll_id}")))
    }

    async fn create_poll(&self, request: CreatePollRequest) -> GatewayResult<PollDetails> {
        let poll_id = PollId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let details = PollDetails {
            poll_id,
            title: request.title,
            description: request.description,
            options: request.options.into_iter().map(PollOption::from_label).collect(),
            tags: request.tags,
            schedule: PollSchedule::new(request.start_date, request.end_date),
            author: Some(Author {
                name: self.current_user.clone(),
                world_id: Some(self.current_user.clone()),
                profile_picture: None,
            }),
            participant_count: 0,
            is_anonymous: request.is_anonymous.unwrap_or(false),
            created_at: Some(Utc::now()),
            has_voted: Some(false),
        };

        self.polls.write().insert(
            poll_id,
            PollView {
                details: details.clone(),
                reported_active: None,
                results: None,
            },
        );
        Ok(details)
    }

    async fn delete_poll(&self, poll_id: PollId) -> GatewayResult<()> {
        self.polls
            .write()
            .remove(&poll_id)
            .map(|_| ())
            .ok_or_else(|| GatewayError::NotFound(format!("poll {poll_id}")))
    }
}
