//! # Profile Service
//!
//! Profile header and activity feed lookups on top of a
//! [`UserProfileGateway`].

use shared_types::UserProfile;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{ActivityPage, ActivityQuery, ProfileOverview, RECENT_PREVIEW};
use crate::error::{ProfileError, ProfileResult};
use crate::ports::UserProfileGateway;

pub struct ProfileService<G: UserProfileGateway> {
    gateway: Arc<G>,
}

impl<G: UserProfileGateway> ProfileService<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Profile of `world_id`, or of the caller when `None`.
    pub async fn profile(&self, world_id: Option<&str>) -> ProfileResult<UserProfile> {
        self.gateway
            .get_user_data(world_id)
            .await
            .map_err(|err| ProfileError::for_user(world_id, err))
    }

    pub async fn activities(&self, query: &ActivityQuery) -> ProfileResult<ActivityPage> {
        let page = self
            .gateway
            .get_user_activities(query)
            .await
            .map_err(|err| ProfileError::for_user(query.world_id.as_deref(), err))?;
        debug!(
            filter = ?query.filter,
            count = page.activities.len(),
            total = page.total,
            "activities loaded"
        );
        Ok(page)
    }

    /// Profile header and the latest activities, fetched together.
    ///
    /// A failed activity fetch leaves the overview usable with no recent
    /// entries and `activities_error` set. A failed profile fetch fails the
    /// whole call.
    pub async fn overview(&self, world_id: Option<&str>) -> ProfileResult<ProfileOverview> {
        let query = ActivityQuery {
            world_id: world_id.map(str::to_string),
            ..ActivityQuery::default()
        };
        let (profile, activities) = tokio::join!(self.profile(world_id), self.activities(&query));
        let profile = profile?;

        let (recent, total_activities, activities_error) = match activities {
            Ok(page) => (page.preview(RECENT_PREVIEW).to_vec(), page.total, None),
            Err(err) => {
                warn!(world_id = %profile.world_id, error = %err, "activity feed unavailable");
                (Vec::new(), 0, Some(err.to_string()))
            }
        };

        Ok(ProfileOverview {
            profile,
            recent,
            total_activities,
            is_own_profile: world_id.is_none(),
            activities_error,
        })
    }
}
