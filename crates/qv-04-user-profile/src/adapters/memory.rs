//! In-memory user store that filters and orders activities like the backend.

use crate::domain::{ActivityFilter, ActivityPage, ActivityQuery};
use crate::ports::UserProfileGateway;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared_types::{ActivityKind, GatewayError, GatewayResult, UserActivity, UserProfile};
use std::collections::BTreeMap;

/// In-memory implementation of [`UserProfileGateway`].
///
/// Requests without a world id resolve to `current_user`.
pub struct InMemoryUserDirectory {
    current_user: String,
    profiles: RwLock<BTreeMap<String, UserProfile>>,
    activities: RwLock<BTreeMap<String, Vec<UserActivity>>>,
}

impl InMemoryUserDirectory {
    pub fn new(current_user: impl Into<String>) -> Self {
        Self {
            current_user: current_user.into(),
            profiles: RwLock::new(BTreeMap::new()),
            activities: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn current_user(&self) -> &str {
        &self.current_user
    }

    pub fn insert_profile(&self, profile: UserProfile) {
        self.profiles
            .write()
            .insert(profile.world_id.clone(), profile);
    }

    /// Record `activity` in the feed of `world_id`.
    pub fn push_activity(&self, world_id: &str, activity: UserActivity) {
        self.activities
            .write()
            .entry(world_id.to_string())
            .or_default()
            .push(activity);
    }

    fn resolve<'a>(&'a self, world_id: Option<&'a str>) -> &'a str {
        world_id.filter(|w| !w.is_empty()).unwrap_or(&self.current_user)
    }
}

fn matches(activity: &UserActivity, query: &ActivityQuery, now: DateTime<Utc>) -> bool {
    let filtered = match query.filter {
        None => true,
        Some(ActivityFilter::Active) => now < activity.end_date,
        Some(ActivityFilter::Inactive) => now >= activity.end_date,
        Some(ActivityFilter::Created) => activity.kind == ActivityKind::Created,
        Some(ActivityFilter::Participated) => activity.kind == ActivityKind::Voted,
    };
    if !filtered {
        return false;
    }
    match query.search_term() {
        Some(term) => activity
            .poll_title
            .to_lowercase()
            .contains(&term.to_lowercase()),
        None => true,
    }
}

#[async_trait]
impl UserProfileGateway for InMemoryUserDirectory {
    async fn get_user_data(&self, world_id: Option<&str>) -> GatewayResult<UserProfile> {
        let world_id = self.resolve(world_id);
        self.profiles
            .read()
            .get(world_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("user {world_id}")))
    }

    async fn get_user_activities(&self, query: &ActivityQuery) -> GatewayResult<ActivityPage> {
        let world_id = self.resolve(query.world_id.as_deref());
        let now = Utc::now();

        let mut found: Vec<UserActivity> = self
            .activities
            .read()
            .get(world_id)
            .map(|list| {
                list.iter()
                    .filter(|a| matches(a, query, now))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = found.len() as u64;
        Ok(ActivityPage::new(found, Some(total)))
    }
}
