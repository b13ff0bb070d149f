//! Typed client for the Arthur GenAI Engine REST API.

use super::http_client::build_http_client;
use super::query::QueryInferencesParams;
use super::types::{
    NewRuleRequest, NewTaskRequest, PromptValidationRequest, QueryInferencesResponse,
    ResponseValidationRequest, RuleResponse, TaskResponse, UpdateRuleRequest, ValidationResult,
};
use crate::error::ApiError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::form_urlencoded;

const INFERENCES_QUERY_PATH: &str = "/api/v2/inferences/query";
const TASKS_PATH: &str = "/api/v2/tasks";

/// Body of a successful response, classified by status and content type.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiBody {
    /// `204 No Content`.
    Empty,
    Json(Value),
    Text(String),
}

pub struct ArthurClient {
    base_url: String,
    /// Pre-computed `"Bearer <key>"` header value.
    cached_auth_header: String,
    client: Client,
}

impl std::fmt::Debug for ArthurClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArthurClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ArthurClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self::with_http_client(base_url, api_key, build_http_client())
    }

    pub fn with_http_client(base_url: &str, api_key: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            cached_auth_header: format!("Bearer {api_key}"),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn prepare(&self, method: Method, endpoint: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{endpoint}", self.base_url))
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, &self.cached_auth_header)
    }

    /// Issue a request without a body and classify the response.
    pub async fn request(&self, method: Method, endpoint: &str) -> Result<ApiBody, ApiError> {
        debug!(%method, endpoint, "arthur.request");
        self.execute(self.prepare(method, endpoint), endpoint).await
    }

    /// Issue a request with a JSON body and classify the response.
    pub async fn request_with_body<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<ApiBody, ApiError> {
        debug!(%method, endpoint, "arthur.request");
        self.execute(self.prepare(method, endpoint).json(body), endpoint)
            .await
    }

    async fn execute(&self, request: RequestBuilder, endpoint: &str) -> Result<ApiBody, ApiError> {
        let transport = |source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.map_err(transport)?;
            warn!(status = status.as_u16(), endpoint, "arthur.error_status");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(ApiBody::Empty);
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));

        if is_json {
            let bytes = response.bytes().await.map_err(transport)?;
            let value = serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
                endpoint: endpoint.to_string(),
                source,
            })?;
            Ok(ApiBody::Json(value))
        } else {
            Ok(ApiBody::Text(response.text().await.map_err(transport)?))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let body = self.request(Method::GET, endpoint).await?;
        decode(endpoint, body)
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.request_with_body(method, endpoint, body).await?;
        decode(endpoint, response)
    }

    // ── Tasks ────────────────────────────────────────────────────

    pub async fn create_task(&self, request: &NewTaskRequest) -> Result<TaskResponse, ApiError> {
        self.send_json(Method::POST, TASKS_PATH, request).await
    }

    pub async fn get_task(&self, task_id: &str) -> Result<TaskResponse, ApiError> {
        self.get_json(&format!("{TASKS_PATH}/{task_id}")).await
    }

    pub async fn search_tasks(&self, search: Option<&str>) -> Result<Vec<TaskResponse>, ApiError> {
        let endpoint = match search.filter(|term| !term.is_empty()) {
            Some(term) => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair("search", term)
                    .finish();
                format!("{TASKS_PATH}?{query}")
            }
            None => TASKS_PATH.to_string(),
        };
        self.get_json(&endpoint).await
    }

    pub async fn archive_task(&self, task_id: &str) -> Result<(), ApiError> {
        self.request(Method::DELETE, &format!("{TASKS_PATH}/{task_id}"))
            .await
            .map(drop)
    }

    // ── Task rules ───────────────────────────────────────────────

    pub async fn create_task_rule(
        &self,
        task_id: &str,
        request: &NewRuleRequest,
    ) -> Result<RuleResponse, ApiError> {
        self.send_json(Method::POST, &format!("{TASKS_PATH}/{task_id}/rules"), request)
            .await
    }

    pub async fn update_task_rule(
        &self,
        task_id: &str,
        rule_id: &str,
        request: &UpdateRuleRequest,
    ) -> Result<TaskResponse, ApiError> {
        self.send_json(
            Method::PATCH,
            &format!("{TASKS_PATH}/{task_id}/rules/{rule_id}"),
            request,
        )
        .await
    }

    pub async fn archive_task_rule(&self, task_id: &str, rule_id: &str) -> Result<(), ApiError> {
        self.request(
            Method::DELETE,
            &format!("{TASKS_PATH}/{task_id}/rules/{rule_id}"),
        )
        .await
        .map(drop)
    }

    // ── Validation ───────────────────────────────────────────────

    pub async fn validate_prompt(
        &self,
        task_id: &str,
        request: &PromptValidationRequest,
    ) -> Result<ValidationResult, ApiError> {
        self.send_json(
            Method::POST,
            &format!("{TASKS_PATH}/{task_id}/validate_prompt"),
            request,
        )
        .await
    }

    pub async fn validate_response(
        &self,
        task_id: &str,
        inference_id: &str,
        request: &ResponseValidationRequest,
    ) -> Result<ValidationResult, ApiError> {
        self.send_json(
            Method::POST,
            &format!("{TASKS_PATH}/{task_id}/validate_response/{inference_id}"),
            request,
        )
        .await
    }

    // ── Inferences ───────────────────────────────────────────────

    pub async fn get_inferences(
        &self,
        params: &QueryInferencesParams,
    ) -> Result<QueryInferencesResponse, ApiError> {
        self.get_json(&inferences_endpoint(params)).await
    }
}

pub fn inferences_endpoint(params: &QueryInferencesParams) -> String {
    let query = params.to_query_string();
    if query.is_empty() {
        INFERENCES_QUERY_PATH.to_string()
    } else {
        format!("{INFERENCES_QUERY_PATH}?{query}")
    }
}

/// Typed view of a classified body. `204` decodes as `{}`; a text body is
/// rejected because every typed endpoint answers with JSON.
fn decode<T: DeserializeOwned>(endpoint: &str, body: ApiBody) -> Result<T, ApiError> {
    let value = match body {
        ApiBody::Json(value) => value,
        ApiBody::Empty => Value::Object(serde_json::Map::new()),
        ApiBody::Text(_) => {
            return Err(ApiError::UnexpectedText {
                endpoint: endpoint.to_string(),
            });
        }
    };
    serde_json::from_value(value).map_err(|source| ApiError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_trailing_slash() {
        let client = ArthurClient::new("https://engine.example.com/", "key");
        assert_eq!(client.base_url(), "https://engine.example.com");
    }

    #[test]
    fn debug_output_hides_credential() {
        let client = ArthurClient::new("https://engine.example.com", "super-secret");
        assert!(!format!("{client:?}").contains("super-secret"));
    }

    #[test]
    fn endpoint_without_params_has_no_question_mark() {
        assert_eq!(
            inferences_endpoint(&QueryInferencesParams::default()),
            "/api/v2/inferences/query"
        );
    }

    #[test]
    fn endpoint_appends_serialized_params() {
        let params = QueryInferencesParams {
            page: Some(2),
            page_size: Some(25),
            ..QueryInferencesParams::default()
        };
        assert_eq!(
            inferences_endpoint(&params),
            "/api/v2/inferences/query?page_size=25&page=2"
        );
    }

    #[test]
    fn decode_treats_empty_as_empty_object() {
        let result: ValidationResult = decode("/x", ApiBody::Empty).unwrap();
        assert_eq!(result, ValidationResult::default());
    }

    #[test]
    fn decode_rejects_text_bodies() {
        let err = decode::<ValidationResult>("/x", ApiBody::Text("ok".into())).unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedText { .. }));
    }

    #[test]
    fn decode_reports_shape_mismatch() {
        let err = decode::<QueryInferencesResponse>("/x", ApiBody::Json(json!({"count": "many"})))
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }
}
