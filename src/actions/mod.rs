//! Thin operations over a [`Session`].
//!
//! Each action builds a client from the session it is handed and forwards
//! one call. Errors come back exactly as the client produced them.

pub mod forms;
pub mod session;

pub use forms::{
    PromptValidationForm, ResponseValidationForm, RuleForm, RuleToggleForm, TaskForm,
};
pub use session::{Credential, Session, resolve_credential};

use crate::api::{
    NewRuleRequest, NewTaskRequest, PromptValidationRequest, QueryInferencesParams,
    QueryInferencesResponse, ResponseValidationRequest, RuleResponse, TaskResponse,
    UpdateRuleRequest, ValidationResult,
};
use crate::config::HttpConfig;
use crate::error::ApiError;
use tracing::{debug, info};

// ── Tasks ────────────────────────────────────────────────────────

pub async fn create_task(
    session: &Session,
    request: &NewTaskRequest,
) -> Result<TaskResponse, ApiError> {
    session.client().create_task(request).await
}

pub async fn get_task(session: &Session, task_id: &str) -> Result<TaskResponse, ApiError> {
    session.client().get_task(task_id).await
}

pub async fn search_tasks(
    session: &Session,
    search: Option<&str>,
) -> Result<Vec<TaskResponse>, ApiError> {
    session.client().search_tasks(search).await
}

pub async fn archive_task(session: &Session, task_id: &str) -> Result<(), ApiError> {
    session.client().archive_task(task_id).await
}

// ── Rules ────────────────────────────────────────────────────────

pub async fn create_task_rule(
    session: &Session,
    task_id: &str,
    request: &NewRuleRequest,
) -> Result<RuleResponse, ApiError> {
    session.client().create_task_rule(task_id, request).await
}

pub async fn update_task_rule(
    session: &Session,
    task_id: &str,
    rule_id: &str,
    request: &UpdateRuleRequest,
) -> Result<TaskResponse, ApiError> {
    session
        .client()
        .update_task_rule(task_id, rule_id, request)
        .await
}

pub async fn archive_task_rule(
    session: &Session,
    task_id: &str,
    rule_id: &str,
) -> Result<(), ApiError> {
    session.client().archive_task_rule(task_id, rule_id).await
}

// ── Validation ───────────────────────────────────────────────────

pub async fn validate_prompt(
    session: &Session,
    task_id: &str,
    request: &PromptValidationRequest,
) -> Result<ValidationResult, ApiError> {
    session.client().validate_prompt(task_id, request).await
}

pub async fn validate_response(
    session: &Session,
    task_id: &str,
    inference_id: &str,
    request: &ResponseValidationRequest,
) -> Result<ValidationResult, ApiError> {
    session
        .client()
        .validate_response(task_id, inference_id, request)
        .await
}

// ── Inferences ───────────────────────────────────────────────────

pub async fn get_inferences(
    session: &Session,
    params: &QueryInferencesParams,
) -> Result<QueryInferencesResponse, ApiError> {
    session.client().get_inferences(params).await
}

// ── Connection check ─────────────────────────────────────────────

/// Outcome of probing the engine with a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionCheck {
    pub success: bool,
    pub error: Option<String>,
}

impl ConnectionCheck {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Fetch a single inference to confirm the session is usable.
pub async fn test_connection(session: &Session) -> ConnectionCheck {
    let single = QueryInferencesParams {
        page_size: Some(1),
        ..QueryInferencesParams::default()
    };
    match get_inferences(session, &single).await {
        Ok(_) => {
            info!(base_url = session.base_url(), "arthur.connection_ok");
            ConnectionCheck::ok()
        }
        Err(error) => {
            debug!(%error, "arthur.connection_failed");
            ConnectionCheck::failed(error.to_string())
        }
    }
}

/// Like [`test_connection`] for raw, unvalidated input. A blank key or a
/// missing base URL is reported as a failed check.
pub async fn test_credentials(
    base_url: Option<&str>,
    raw_key: &str,
    http: &HttpConfig,
) -> ConnectionCheck {
    let Some(base_url) = base_url.map(str::trim).filter(|url| !url.is_empty()) else {
        return ConnectionCheck::failed("ARTHUR_BASE_URL is not configured");
    };
    let Some(credential) = Credential::new(raw_key) else {
        return ConnectionCheck::failed("Please enter an API key");
    };
    test_connection(&Session::with_http(base_url, credential, http)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_key_fails_without_network() {
        let check = test_credentials(
            Some("http://127.0.0.1:9"),
            "   ",
            &HttpConfig::default(),
        )
        .await;
        assert!(!check.success);
        assert_eq!(check.error.as_deref(), Some("Please enter an API key"));
    }

    #[tokio::test]
    async fn missing_base_url_fails_without_network() {
        let check = test_credentials(None, "key", &HttpConfig::default()).await;
        assert!(!check.success);
        assert!(check.error.unwrap().contains("ARTHUR_BASE_URL"));
    }
}
