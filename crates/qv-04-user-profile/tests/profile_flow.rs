//! Profile and activity flows against the in-memory user store.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use qv_04_user_profile::{
    ActivityFilter, ActivityPage, ActivityQuery, InMemoryUserDirectory, ProfileError,
    ProfileService, UserProfileGateway,
};
use shared_types::{
    ActivityKind, Author, GatewayError, GatewayResult, PollId, UserActivity, UserProfile,
};
use std::sync::Arc;

fn profile(world_id: &str, name: Option<&str>) -> UserProfile {
    UserProfile {
        world_id: world_id.into(),
        name: name.map(str::to_string),
        profile_picture: None,
        polls_created: 1,
        polls_participated: 2,
    }
}

fn activity(id: u64, kind: ActivityKind, title: &str, age_hours: i64, ends_in_hours: i64) -> UserActivity {
    let now = Utc::now();
    UserActivity {
        id: format!("act-{id}"),
        kind,
        poll_id: PollId(id),
        poll_title: title.into(),
        poll_description: String::new(),
        created_at: now - Duration::hours(age_hours),
        end_date: now + Duration::hours(ends_in_hours),
        voters_participated: id,
        author: Author {
            name: "ana".into(),
            world_id: Some("0xana".into()),
            profile_picture: None,
        },
    }
}

fn store() -> Arc<InMemoryUserDirectory> {
    let store = InMemoryUserDirectory::new("0xme");
    store.insert_profile(profile("0xme", Some("me")));
    store.insert_profile(profile("0xana", None));
    store.push_activity("0xme", activity(1, ActivityKind::Created, "Best bridge?", 30, 24));
    store.push_activity("0xme", activity(2, ActivityKind::Voted, "Which L2 next?", 10, -2));
    store.push_activity("0xme", activity(3, ActivityKind::Voted, "Bridge fees", 1, 48));
    Arc::new(store)
}

#[tokio::test]
async fn test_own_profile_without_world_id() {
    let service = ProfileService::new(store());

    let me = service.profile(None).await.unwrap();
    assert_eq!(me.world_id, "0xme");
    assert_eq!(me.display_name(), "@me");

    let ana = service.profile(Some("0xana")).await.unwrap();
    assert_eq!(ana.display_name(), "Anon");
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let service = ProfileService::new(store());
    let err = service.profile(Some("0xghost")).await.unwrap_err();
    assert_eq!(err, ProfileError::UserNotFound(Some("0xghost".into())));
}

#[tokio::test]
async fn test_activities_newest_first() {
    let service = ProfileService::new(store());
    let page = service.activities(&ActivityQuery::default()).await.unwrap();

    let ids: Vec<u64> = page.activities.iter().map(|a| a.poll_id.0).collect();
    assert_eq!(ids, vec![3, 2, 1]);
    assert_eq!(page.total, 3);
}

#[tokio::test]
async fn test_activity_filters() {
    let service = ProfileService::new(store());
    let ids = |page: ActivityPage| page.activities.iter().map(|a| a.poll_id.0).collect::<Vec<_>>();

    let cases = [
        (ActivityFilter::Active, vec![3, 1]),
        (ActivityFilter::Inactive, vec![2]),
        (ActivityFilter::Created, vec![1]),
        (ActivityFilter::Participated, vec![3, 2]),
    ];
    for (filter, expected) in cases {
        let page = service
            .activities(&ActivityQuery::default().with_filter(filter))
            .await
            .unwrap();
        assert_eq!(ids(page), expected, "{filter}");
    }
}

#[tokio::test]
async fn test_activity_search_ignores_case() {
    let service = ProfileService::new(store());
    let page = service
        .activities(&ActivityQuery::for_user("0xme").with_search("BRIDGE"))
        .await
        .unwrap();
    assert_eq!(page.total, 2);

    let other = service
        .activities(&ActivityQuery::for_user("0xana"))
        .await
        .unwrap();
    assert!(other.is_empty());
}

#[tokio::test]
async fn test_overview_previews_recent_activity() {
    let service = ProfileService::new(store());
    let overview = service.overview(None).await.unwrap();

    assert!(overview.is_own_profile);
    assert_eq!(overview.recent.len(), 2);
    assert_eq!(overview.total_activities, 3);
    assert!(overview.has_more());
    assert!(overview.activities_error.is_none());

    let ana = service.overview(Some("0xana")).await.unwrap();
    assert!(!ana.is_own_profile);
    assert!(!ana.has_more());
}

struct ActivitiesDown(Arc<InMemoryUserDirectory>);

#[async_trait]
impl UserProfileGateway for ActivitiesDown {
    async fn get_user_data(&self, world_id: Option<&str>) -> GatewayResult<UserProfile> {
        self.0.get_user_data(world_id).await
    }

    async fn get_user_activities(&self, _query: &ActivityQuery) -> GatewayResult<ActivityPage> {
        Err(GatewayError::Http {
            status: 502,
            message: "bad gateway".into(),
        })
    }
}

#[tokio::test]
async fn test_overview_survives_activity_failure() {
    let service = ProfileService::new(Arc::new(ActivitiesDown(store())));
    let overview = service.overview(None).await.unwrap();

    assert_eq!(overview.profile.world_id, "0xme");
    assert!(overview.recent.is_empty());
    assert!(overview
        .activities_error
        .as_deref()
        .is_some_and(|e| e.contains("502")));
}
