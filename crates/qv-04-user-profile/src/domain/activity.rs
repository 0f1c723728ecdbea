//! Activity pages and the profile overview.

use serde::Serialize;
use shared_types::{UserActivity, UserProfile};

/// Activities shown on a profile before "view all".
pub const RECENT_PREVIEW: usize = 2;

/// One response of the activity endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivityPage {
    pub activities: Vec<UserActivity>,
    /// Total matching activities; the page length when the backend omits it.
    pub total: u64,
}

impl ActivityPage {
    pub fn new(activities: Vec<UserActivity>, total: Option<u64>) -> Self {
        let total = total.unwrap_or(activities.len() as u64);
        Self { activities, total }
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// The first `limit` activities.
    pub fn preview(&self, limit: usize) -> &[UserActivity] {
        &self.activities[..self.activities.len().min(limit)]
    }
}

/// Profile header plus its most recent activities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileOverview {
    pub profile: UserProfile,
    pub recent: Vec<UserActivity>,
    pub total_activities: u64,
    /// Whether the profile belongs to the caller.
    pub is_own_profile: bool,
    /// Set when the activity feed failed to load; the profile is still shown.
    pub activities_error: Option<String>,
}

impl ProfileOverview {
    pub fn has_more(&self) -> bool {
        self.total_activities > self.recent.len() as u64
    }
}
