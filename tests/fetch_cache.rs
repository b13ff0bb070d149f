use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use arthur_console::fetch::{FetchSlot, FetchState, InferencesQuery};
use arthur_console::filters::{FilterEdit, FilterState};
use arthur_console::{Credential, Session};

fn session(server: &MockServer) -> Session {
    Session::new(&server.uri(), Credential::new("k").unwrap())
}

fn empty_page() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(json!({"count": 0, "inferences": []}))
        .set_delay(Duration::from_millis(50))
}

#[tokio::test]
async fn concurrent_views_share_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/inferences/query"))
        .respond_with(empty_page())
        .expect(1)
        .mount(&server)
        .await;

    let query = InferencesQuery::default();
    let session = session(&server);
    let filters = FilterState::default();

    let (a, b) = tokio::join!(
        query.fetch(Some(&session), &filters.applied),
        query.fetch(Some(&session), &filters.applied),
    );
    assert!(matches!(a, FetchState::Loaded(_)));
    assert!(matches!(b, FetchState::Loaded(_)));
    server.verify().await;
}

#[tokio::test]
async fn fresh_entry_is_reused_until_stale() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/inferences/query"))
        .respond_with(empty_page())
        .expect(1)
        .mount(&server)
        .await;

    let query = InferencesQuery::with_stale_after(Duration::from_secs(60));
    let session = session(&server);
    let filters = FilterState::default();

    query.fetch(Some(&session), &filters.applied).await;
    query.fetch(Some(&session), &filters.applied).await;
    assert_eq!(query.cache().len(), 1);
    server.verify().await;
}

#[tokio::test]
async fn failure_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/inferences/query"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(2)
        .mount(&server)
        .await;

    let query = InferencesQuery::with_stale_after(Duration::from_secs(60));
    let session = session(&server);
    let filters = FilterState::default();

    for _ in 0..2 {
        let state = query.fetch(Some(&session), &filters.applied).await;
        assert_eq!(state.error(), Some("Arthur API Error: 500 - boom"));
    }
    server.verify().await;
}

#[tokio::test]
async fn draft_edits_do_not_change_the_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/inferences/query"))
        .and(query_param("user_id", "u-7"))
        .respond_with(empty_page())
        .expect(1)
        .mount(&server)
        .await;

    let session = session(&server);
    let mut filters = FilterState::default();
    let before = InferencesQuery::key_for(Some(&session), &filters.applied);

    filters.edit_draft(FilterEdit::UserId(Some("u-7".into())));
    assert_eq!(
        InferencesQuery::key_for(Some(&session), &filters.applied),
        before
    );

    filters.apply();
    let query = InferencesQuery::default();
    let state = query.fetch(Some(&session), &filters.applied).await;
    assert!(matches!(state, FetchState::Loaded(_)));
    server.verify().await;
}

#[tokio::test]
async fn slot_ignores_results_for_superseded_keys() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/inferences/query"))
        .respond_with(empty_page())
        .mount(&server)
        .await;

    let query = InferencesQuery::default();
    let session = session(&server);
    let mut filters = FilterState::default();
    let mut slot = FetchSlot::default();

    let first = InferencesQuery::key_for(Some(&session), &filters.applied).unwrap();
    assert!(slot.request(first.clone()));
    filters.set_page(1);
    let second = InferencesQuery::key_for(Some(&session), &filters.applied).unwrap();
    assert!(slot.request(second.clone()));

    let (key, outcome) = query
        .load(&session, &filters.applied.to_query_params())
        .await;
    assert_eq!(key, second);
    assert!(!slot.complete(&first, &outcome));
    assert!(slot.state().is_loading());
    assert!(slot.complete(&second, &outcome));
    assert!(matches!(slot.state(), FetchState::Loaded(_)));
}
