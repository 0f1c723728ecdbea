//! Port implementations over HTTP.
//!
//! | Port method | Request |
//! |-------------|---------|
//! | `get_poll` | `GET /poll/{id}` |
//! | `get_user_vote` | `GET /user/getUserVotes?pollId={id}` |
//! | `set_vote` | `POST /user/setVote` |
//! | `edit_vote` | `POST /user/editVote` |
//! | `list_polls` | `GET /poll?page&limit&sortBy&sortOrder&...` |
//! | `create_poll` | `POST /poll` |
//! | `delete_poll` | `DELETE /poll/{id}` |
//! | `get_user_data` | `GET /user/getUserData[?worldID=]` |
//! | `get_user_activities` | `GET /user/getUserActivities?filter&search[&worldID]` |

use async_trait::async_trait;
use qv_02_voting_session::PollApiGateway;
use qv_03_poll_directory::{PollDirectoryGateway, PollListQuery, PollPage};
use qv_04_user_profile::{ActivityPage, ActivityQuery, UserProfileGateway};
use reqwest::{Method, StatusCode};
use shared_types::{
    CreatePollRequest, EditVoteRequest, GatewayResult, PollDetails, PollDetailsResponse, PollId,
    PollListResponse, PollView, PriorVote, SetVoteRequest, UserActivitiesResponse, UserActivity,
    UserDataResponse, UserProfile, UserVoteResponse, VoteAck,
};
use tracing::debug;

use crate::client::{decode_body, status_error, transport_error, BackendClient};

impl BackendClient {
    async fn fetch_poll(&self, poll_id: PollId) -> GatewayResult<PollView> {
        let url = self.endpoint(&format!("poll/{poll_id}"))?;
        let response = self.send(self.request(Method::GET, url)).await?;
        let body: PollDetailsResponse = Self::read_json(response).await?;
        Ok(PollView::from(body))
    }

    async fn post_vote<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> GatewayResult<VoteAck> {
        let url = self.endpoint(path)?;
        let response = self.send(self.request(Method::POST, url).json(body)).await?;
        let bytes = response.bytes().await.map_err(transport_error)?;
        Ok(decode_ack(&bytes))
    }
}

/// `GET /user/getUserVotes` body to a prior vote. An empty body, `null` or
/// a record without `voteID` all mean "no vote".
pub fn decode_prior_vote(bytes: &[u8]) -> GatewayResult<Option<PriorVote>> {
    let trimmed = String::from_utf8_lossy(bytes);
    let trimmed = trimmed.trim();
    if trimmed.is_empty() || trimmed == "null" || trimmed == "{}" {
        return Ok(None);
    }
    let response: UserVoteResponse = decode_body(trimmed.as_bytes())?;
    Ok(response.into_prior_vote())
}

/// Vote write acknowledgments carry nothing the client depends on, so an
/// unreadable body is an empty ack.
fn decode_ack(bytes: &[u8]) -> VoteAck {
    decode_body(bytes).unwrap_or_default()
}

pub fn page_from_response(response: PollListResponse) -> PollPage {
    PollPage {
        polls: response.polls.into_iter().map(PollDetails::from).collect(),
        total: response.total,
    }
}

#[async_trait]
impl PollApiGateway for BackendClient {
    async fn get_poll(&self, poll_id: PollId) -> GatewayResult<PollView> {
        self.fetch_poll(poll_id).await
    }

    async fn get_user_vote(&self, poll_id: PollId) -> GatewayResult<Option<PriorVote>> {
        let url = self.endpoint_with_query("user/getUserVotes", [("pollId", poll_id.to_string())])?;
        let response = self.send_raw(self.request(Method::GET, url)).await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(%poll_id, "no prior vote");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body, "/user/getUserVotes"));
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        decode_prior_vote(&bytes)
    }

    async fn set_vote(&self, request: SetVoteRequest) -> GatewayResult<VoteAck> {
        self.post_vote("user/setVote", &request).await
    }

    async fn edit_vote(&self, request: EditVoteRequest) -> GatewayResult<VoteAck> {
        self.post_vote("user/editVote", &request).await
    }
}

#[async_trait]
impl PollDirectoryGateway for BackendClient {
    async fn list_polls(&self, query: &PollListQuery) -> GatewayResult<PollPage> {
        let url = self.endpoint_with_query("poll", query.to_query_pairs())?;
        let response = self.send(self.request(Method::GET, url)).await?;
        let body: PollListResponse = Self::read_json(response).await?;
        Ok(page_from_response(body))
    }

    async fn get_poll(&self, poll_id: PollId) -> GatewayResult<PollView> {
        self.fetch_poll(poll_id).await
    }

    async fn create_poll(&self, request: CreatePollRequest) -> GatewayResult<PollDetails> {
        let url = self.endpoint("poll")?;
        let response = self
            .send(self.request(Method::POST, url).json(&request))
            .await?;
        let body: PollDetailsResponse = Self::read_json(response).await?;
        Ok(PollView::from(body).details)
    }

    async fn delete_poll(&self, poll_id: PollId) -> GatewayResult<()> {
        let url = self.endpoint(&format!("poll/{poll_id}"))?;
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

pub fn activity_page_from_response(response: UserActivitiesResponse) -> ActivityPage {
    ActivityPage::new(
        response
            .user_actions
            .into_iter()
            .map(UserActivity::from)
            .collect(),
        response.total,
    )
}

#[async_trait]
impl UserProfileGateway for BackendClient {
    async fn get_user_data(&self, world_id: Option<&str>) -> GatewayResult<UserProfile> {
        let pairs = world_id
            .filter(|w| !w.is_empty())
            .map(|w| ("worldID", w.to_string()));
        let url = self.endpoint_with_query("user/getUserData", pairs)?;
        let response = self.send(self.request(Method::GET, url)).await?;
        let body: UserDataResponse = Self::read_json(response).await?;
        Ok(UserProfile::from(body))
    }

    async fn get_user_activities(&self, query: &ActivityQuery) -> GatewayResult<ActivityPage> {
        let url = self.endpoint_with_query("user/getUserActivities", query.to_query_pairs())?;
        let response = self.send(self.request(Method::GET, url)).await?;
        let body: UserActivitiesResponse = Self::read_json(response).await?;
        Ok(activity_page_from_response(body))
    }
}
