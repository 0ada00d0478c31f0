use anyhow::Result;
use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;
use techhouse_site::domain::ports::TracingIndicator;
use techhouse_site::{ContentService, HydrationRole, RequestTracker, SiteConfig, TransferState};

fn hydrated_service(base_url: &str, state: Arc<TransferState>, role: HydrationRole) -> ContentService {
    let tracker = Arc::new(RequestTracker::new(Arc::new(TracingIndicator)));
    ContentService::with_hydration(&SiteConfig::with_base_url(base_url), tracker, state, role).unwrap()
}

#[tokio::test]
async fn test_server_payload_hydrates_client_without_network() -> Result<()> {
    let cms = MockServer::start();
    cms.mock(|when, then| {
        when.method(GET).path("/api/home");
        then.status(200)
            .json_body(json!({"home": {"banner": {"title": "Digital products, built right"}}}));
    });
    cms.mock(|when, then| {
        when.method(GET).path("/api/blogs/launch-day");
        then.status(200)
            .json_body(json!({"blog": {"slug": "launch-day", "title": "Launch day"}}));
    });

    // 伺服器端渲染
    let server_state = Arc::new(TransferState::new());
    let server = hydrated_service(&cms.url("/api"), server_state.clone(), HydrationRole::Server);
    let home = server.home().await.expect("home loaded on server");
    let blog = server.blog("launch-day").await.expect("blog loaded on server");

    assert!(server_state.contains("home:page"));
    assert!(server_state.contains("blog:launch-day"));
    let payload = server_state.to_payload()?;

    // 客戶端：API 指向另一個沒有任何資料的伺服器
    let browser_api = MockServer::start();
    let any_request = browser_api.mock(|when, then| {
        when.path_contains("/api");
        then.status(500);
    });

    let client_state = Arc::new(TransferState::from_payload(&payload)?);
    let client = hydrated_service(&browser_api.url("/api"), client_state.clone(), HydrationRole::Client);

    assert_eq!(client.home().await, Some(home));
    assert_eq!(client.blog("launch-day").await, Some(blog));
    assert_eq!(any_request.hits(), 0);

    // 每個槽位只能取用一次
    assert!(client_state.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_client_falls_back_to_network_for_missing_slot() -> Result<()> {
    let cms = MockServer::start();
    let jobs_mock = cms.mock(|when, then| {
        when.method(GET).path("/api/jobs").query_param("page", "1");
        then.status(200)
            .json_body(json!({"data": [{"slug": "qa-engineer", "title": "QA Engineer"}], "total": 1}));
    });

    let state = Arc::new(TransferState::from_payload(r#"{"home:page":{"banner":{"title":"x"}}}"#)?);
    let client = hydrated_service(&cms.url("/api"), state.clone(), HydrationRole::Client);

    let jobs = client.jobs(1).await.expect("jobs loaded from network");

    assert_eq!(jobs.items[0].slug, "qa-engineer");
    assert_eq!(jobs_mock.hits(), 1);
    assert!(state.contains("home:page"));
    Ok(())
}

#[tokio::test]
async fn test_failed_server_load_records_nothing() -> Result<()> {
    let cms = MockServer::start();
    cms.mock(|when, then| {
        when.method(GET).path("/api/services");
        then.status(503);
    });

    let state = Arc::new(TransferState::new());
    let server = hydrated_service(&cms.url("/api"), state.clone(), HydrationRole::Server);

    assert!(server.services().await.is_none());
    assert!(state.is_empty());
    assert!(state.to_script_tag()?.contains("techhouse-state"));
    Ok(())
}
