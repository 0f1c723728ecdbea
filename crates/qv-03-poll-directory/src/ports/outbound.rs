//! # Driven Ports (SPI - Outbound Dependencies)

use crate::domain::{PollListQuery, PollPage};
use async_trait::async_trait;
use shared_types::{CreatePollRequest, GatewayResult, PollDetails, PollId, PollView};

/// Poll listing and management endpoints of the backend.
#[async_trait]
pub trait PollDirectoryGateway: Send + Sync {
    /// `GET /poll?page&limit&sortBy&sortOrder&...`
    async fn list_polls(&self, query: &PollListQuery) -> GatewayResult<PollPage>;

    /// `GET /poll/{id}`, including running totals when the backend sends them.
    async fn get_poll(&self, poll_id: PollId) -> GatewayResult<PollView>;

    /// `POST /poll`
    async fn create_poll(&self, request: CreatePollRequest) -> GatewayResult<PollDetails>;

    /// `DELETE /poll/{id}`
    async fn delete_poll(&self, poll_id: PollId) -> GatewayResult<()>;
}
