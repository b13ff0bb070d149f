use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use arthur_console::api::{
    ApiBody, NewTaskRequest, QueryInferencesParams, RuleStatus, SortOrder, UpdateRuleRequest,
};
use arthur_console::{ApiError, ArthurClient};

fn inference_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "result": "Pass",
        "created_at": 1_700_000_000,
        "updated_at": 1_700_000_000,
        "task_name": "support-bot",
        "inference_prompt": {
            "id": format!("{id}-p"),
            "inference_id": id,
            "result": "Pass",
            "created_at": 1_700_000_000,
            "updated_at": 1_700_000_000,
            "message": "hello",
            "prompt_rule_results": [],
            "tokens": 3
        },
        "inference_feedback": []
    })
}

#[tokio::test]
async fn inferences_query_sends_bearer_and_repeated_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/inferences/query"))
        .and(header("authorization", "Bearer test-key"))
        .and(header("content-type", "application/json"))
        .and(query_param("task_name", "support bot"))
        .and(query_param("page", "0"))
        .and(query_param("page_size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "inferences": [inference_json("inf-1")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ArthurClient::new(&server.uri(), "test-key");
    let params = QueryInferencesParams {
        task_name: Some("support bot".into()),
        rule_statuses: Some(vec![RuleStatus::Pass, RuleStatus::Fail]),
        include_count: Some(true),
        sort: Some(SortOrder::Desc),
        page: Some(0),
        page_size: Some(10),
        ..QueryInferencesParams::default()
    };
    let page = client.get_inferences(&params).await.unwrap();

    assert_eq!(page.count, 1);
    assert_eq!(page.inferences[0].id, "inf-1");
    assert_eq!(page.inferences[0].inference_prompt.tokens, Some(3));

    let received = server.received_requests().await.unwrap();
    assert_eq!(
        received[0].url.query(),
        Some(
            "task_name=support+bot&rule_statuses=Pass&rule_statuses=Fail\
             &include_count=true&sort=desc&page_size=10&page=0"
        )
    );
    server.verify().await;
}

#[tokio::test]
async fn error_status_keeps_code_and_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tasks/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Task not found"))
        .mount(&server)
        .await;

    let client = ArthurClient::new(&server.uri(), "k");
    let err = client.get_task("missing").await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.body(), Some("Task not found"));
    assert_eq!(err.to_string(), "Arthur API Error: 404 - Task not found");
}

#[tokio::test]
async fn no_content_classifies_as_empty() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/tasks/t-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = ArthurClient::new(&server.uri(), "k");
    let body = client
        .request(reqwest::Method::DELETE, "/api/v2/tasks/t-1")
        .await
        .unwrap();
    assert_eq!(body, ApiBody::Empty);
}

#[tokio::test]
async fn non_json_success_is_returned_as_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let client = ArthurClient::new(&server.uri(), "k");
    let body = client.request(reqwest::Method::GET, "/health").await.unwrap();
    assert_eq!(body, ApiBody::Text("ok".into()));
}

#[tokio::test]
async fn typed_call_rejects_text_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tasks/t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let client = ArthurClient::new(&server.uri(), "k");
    let err = client.get_task("t-1").await.unwrap_err();
    assert!(matches!(err, ApiError::UnexpectedText { .. }));
}

#[tokio::test]
async fn create_task_posts_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/tasks"))
        .and(body_json(json!({"name": "support-bot"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "t-1",
            "name": "support-bot",
            "created_at": 1,
            "updated_at": 1,
            "rules": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ArthurClient::new(&server.uri(), "k");
    let task = client
        .create_task(&NewTaskRequest {
            name: "support-bot".into(),
        })
        .await
        .unwrap();
    assert_eq!(task.id, "t-1");
    assert!(task.rules.is_empty());
}

#[tokio::test]
async fn rule_toggle_patches_enabled_flag() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v2/tasks/t-1/rules/r-1"))
        .and(body_json(json!({"enabled": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "t-1",
            "name": "support-bot",
            "created_at": 1,
            "updated_at": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ArthurClient::new(&server.uri(), "k");
    client
        .update_task_rule("t-1", "r-1", &UpdateRuleRequest { enabled: false })
        .await
        .unwrap();
    server.verify().await;
}

#[tokio::test]
async fn search_term_is_url_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tasks"))
        .and(query_param("search", "a&b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ArthurClient::new(&server.uri(), "k");
    let tasks = client.search_tasks(Some("a&b")).await.unwrap();
    assert!(tasks.is_empty());
    server.verify().await;
}
