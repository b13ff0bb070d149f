pub mod client;
pub mod details;
pub mod http_client;
pub mod query;
pub mod status;
pub mod types;

pub use client::{ApiBody, ArthurClient, inferences_endpoint};
pub use details::{
    HallucinationClaim, KeywordSpan, PiiEntitySpan, RegexSpan, RuleDetailKind, RuleDetails,
    ToxicityReading,
};
pub use http_client::{build_http_client, build_http_client_with_timeouts};
pub use query::QueryInferencesParams;
pub use status::{FeedbackTarget, RuleScope, RuleStatus, RuleType, SortOrder};
pub use types::{
    ExampleConfig, ExamplesConfig, ExternalInference, ExternalInferencePrompt,
    ExternalInferenceResponse, ExternalRuleResult, InferenceFeedbackResponse, KeywordsConfig,
    NewRuleRequest, NewTaskRequest, PiiConfig, PromptValidationRequest, QueryInferencesResponse,
    RegexConfig, ResponseValidationRequest, RuleConfig, RuleResponse, TaskResponse,
    ToxicityConfig, UpdateRuleRequest, ValidationResult,
};
