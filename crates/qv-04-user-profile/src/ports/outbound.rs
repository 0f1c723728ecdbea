//! # Driven Ports (SPI - Outbound Dependencies)

use crate::domain::{ActivityPage, ActivityQuery};
use async_trait::async_trait;
use shared_types::{GatewayResult, UserProfile};

/// User endpoints of the backend.
#[async_trait]
pub trait UserProfileGateway: Send + Sync {
    /// `GET /user/getUserData[?worldID=]`. `None` is the caller.
    async fn get_user_data(&self, world_id: Option<&str>) -> GatewayResult<UserProfile>;

    /// `GET /user/getUserActivities?filter&search[&worldID]`
    async fn get_user_activities(&self, query: &ActivityQuery) -> GatewayResult<ActivityPage>;
}
