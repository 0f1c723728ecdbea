//! Gateway calls against a canned-response HTTP server.

use qv_api_client::{BackendClient, ClientConfig};
use qv_02_voting_session::PollApiGateway;
use qv_03_poll_directory::{
    DirectoryError, FeedPreset, PollDirectory, PollDirectoryGateway, PollFilters, PollListQuery,
};
use qv_04_user_profile::{
    ActivityFilter, ActivityQuery, ProfileError, ProfileService, UserProfileGateway,
};
use shared_types::{
    ActivityKind, GatewayError, OptionId, PollId, SetVoteRequest, VoteId, WeightDistribution,
};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Serve `responses` in order, one connection each, and return the raw
/// requests received.
async fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut stream).await);
            let response = format!(
                "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
        }
        requests
    });

    (base, handle)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn client(base: &str) -> BackendClient {
    BackendClient::new(&ClientConfig::default().with_base_url(base).with_auth_token("secret")).unwrap()
}

const POLL_BODY: &str = r#"{
    "poll": {
        "pollId": 7,
        "title": "Which L2 next?",
        "options": ["A", "B"],
        "startDate": "2025-01-01T00:00:00Z",
        "endDate": "2099-01-01T00:00:00Z"
    },
    "isActive": true,
    "optionsTotalVotes": {"A": 3, "B": 1},
    "totalVotes": 4
}"#;

#[tokio::test]
async fn test_get_poll_sends_bearer_and_decodes() {
    let (base, server) = serve(vec![(200, POLL_BODY)]).await;
    let client = client(&base);

    let view = PollApiGateway::get_poll(&client, PollId(7)).await.unwrap();

    assert_eq!(view.details.title, "Which L2 next?");
    assert_eq!(view.reported_active, Some(true));
    assert_eq!(view.results.unwrap().tallies[0].share_percent, 75.0);

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("GET /poll/7 HTTP/1.1"));
    assert!(requests[0].to_lowercase().contains("authorization: bearer secret"));
}

#[tokio::test]
async fn test_missing_user_vote_is_none() {
    let (base, server) = serve(vec![(404, r#"{"message":"No vote"}"#), (200, "")]).await;
    let client = client(&base);

    assert_eq!(client.get_user_vote(PollId(7)).await.unwrap(), None);
    assert_eq!(client.get_user_vote(PollId(7)).await.unwrap(), None);

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("GET /user/getUserVotes?pollId=7 "));
}

#[tokio::test]
async fn test_user_vote_server_error_is_retryable() {
    let (base, server) = serve(vec![(503, "busy")]).await;
    let err = client(&base).get_user_vote(PollId(7)).await.unwrap_err();

    assert_eq!(
        err,
        GatewayError::Http {
            status: 503,
            message: "busy".into()
        }
    );
    assert!(err.is_retryable());
    server.await.unwrap();
}

#[tokio::test]
async fn test_set_vote_posts_distribution() {
    let (base, server) = serve(vec![(200, r#"{"voteID":"v9"}"#)]).await;
    let client = client(&base);
    let weight_distribution: WeightDistribution =
        [(OptionId::new("A"), 60), (OptionId::new("B"), 0)].into_iter().collect();

    let ack = client
        .set_vote(SetVoteRequest {
            poll_id: PollId(7),
            weight_distribution,
        })
        .await
        .unwrap();
    assert_eq!(ack.vote_id(), Some(VoteId::new("v9")));

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("POST /user/setVote HTTP/1.1"));
    assert!(requests[0].ends_with(r#"{"pollId":7,"weightDistribution":{"A":60,"B":0}}"#));
}

#[tokio::test]
async fn test_list_polls_renders_query() {
    let (base, server) = serve(vec![(200, r#"{"polls":[],"total":0}"#)]).await;
    let client = client(&base);
    let query = PollListQuery::for_feed(FeedPreset::Trending, &PollFilters::default(), Some("dao"));

    let page = client.list_polls(&query).await.unwrap();
    assert!(page.polls.is_empty());

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with(
        "GET /poll?page=1&limit=10&sortBy=participantCount&sortOrder=desc&search=dao HTTP/1.1"
    ));
}

#[tokio::test]
async fn test_delete_missing_poll_through_directory() {
    let (base, server) = serve(vec![(404, "")]).await;
    let directory = PollDirectory::new(Arc::new(client(&base)));

    let err = directory.delete_poll(PollId(5)).await.unwrap_err();
    assert_eq!(err, DirectoryError::PollNotFound(PollId(5)));

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("DELETE /poll/5 HTTP/1.1"));
}

#[tokio::test]
async fn test_user_data_for_self_and_other_user() {
    let body = r#"{"worldID":"0xabc","name":"mitch","pollsCreated":3,"pollsParticipated":8}"#;
    let (base, server) = serve(vec![(200, body), (200, body)]).await;
    let client = client(&base);

    let me = client.get_user_data(None).await.unwrap();
    assert_eq!(me.display_name(), "@mitch");
    assert_eq!(me.polls_created, 3);
    client.get_user_data(Some("0xabc")).await.unwrap();

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("GET /user/getUserData HTTP/1.1"));
    assert!(requests[0].to_lowercase().contains("authorization: bearer secret"));
    assert!(requests[1].starts_with("GET /user/getUserData?worldID=0xabc HTTP/1.1"));
}

#[tokio::test]
async fn test_user_activities_render_query_and_decode() {
    let body = r#"{"userActions":[
        {"id":1,"type":"VOTED","pollId":4,"pollTitle":"Best bridge?","createdAt":"2025-01-01T00:00:00Z","endDate":"2025-01-08T00:00:00Z","votersParticipated":9,"authorName":"ana"}
    ],"total":12}"#;
    let (base, server) = serve(vec![(200, body)]).await;
    let client = client(&base);
    let query = ActivityQuery::for_user("0xana")
        .with_filter(ActivityFilter::Participated)
        .with_search("bridge");

    let page = client.get_user_activities(&query).await.unwrap();
    assert_eq!(page.total, 12);
    assert_eq!(page.activities[0].kind, ActivityKind::Voted);
    assert_eq!(page.activities[0].poll_id, PollId(4));

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with(
        "GET /user/getUserActivities?filter=participated&search=bridge&worldID=0xana HTTP/1.1"
    ));
}

#[tokio::test]
async fn test_unknown_user_through_profile_service() {
    let (base, server) = serve(vec![(404, r#"{"message":"User not found"}"#)]).await;
    let profiles = ProfileService::new(Arc::new(client(&base)));

    let err = profiles.profile(Some("0xghost")).await.unwrap_err();
    assert_eq!(err, ProfileError::UserNotFound(Some("0xghost".into())));
    server.await.unwrap();
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = PollDirectoryGateway::get_poll(&client(&base), PollId(1))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)));
    assert!(err.is_retryable());
}
