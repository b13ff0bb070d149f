//! Raw user input → typed requests.
//!
//! The API client never validates; these builders are where missing or
//! malformed input is rejected with a message fit for the user.

use crate::api::{
    ExampleConfig, ExamplesConfig, KeywordsConfig, NewRuleRequest, NewTaskRequest, PiiConfig,
    PromptValidationRequest, RegexConfig, ResponseValidationRequest, RuleConfig, RuleType,
    ToxicityConfig, UpdateRuleRequest,
};
use crate::error::FormError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub name: String,
}

impl TaskForm {
    pub fn build(&self) -> Result<NewTaskRequest, FormError> {
        let name = required(&self.name).ok_or(FormError::Required("Task name is required"))?;
        Ok(NewTaskRequest { name })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleForm {
    pub task_id: String,
    pub name: String,
    pub rule_type: String,
    pub apply_to_prompt: bool,
    pub apply_to_response: bool,
    /// Comma separated
    pub keywords: Option<String>,
    /// Comma separated
    pub regex_patterns: Option<String>,
    pub threshold: Option<String>,
    pub confidence_threshold: Option<String>,
    /// Comma separated
    pub disabled_pii_entities: Option<String>,
    /// Comma separated
    pub allow_list: Option<String>,
    pub hint: Option<String>,
    /// JSON array of `{"example": "...", "result": bool}`
    pub examples_json: Option<String>,
}

impl RuleForm {
    /// Returns the task id and the request to send for it.
    pub fn build(&self) -> Result<(String, NewRuleRequest), FormError> {
        const REQUIRED: &str = "Task ID, name, and type are required";

        let (Some(task_id), Some(name), Some(raw_type)) = (
            required(&self.task_id),
            required(&self.name),
            required(&self.rule_type),
        ) else {
            return Err(FormError::Required(REQUIRED));
        };

        let rule_type: RuleType = raw_type
            .parse()
            .map_err(|_| FormError::UnknownRuleType(raw_type.clone()))?;

        let request = NewRuleRequest {
            name,
            rule_type,
            apply_to_prompt: self.apply_to_prompt,
            apply_to_response: self.apply_to_response,
            config: self.config_for(rule_type)?,
        };
        Ok((task_id, request))
    }

    fn config_for(&self, rule_type: RuleType) -> Result<Option<RuleConfig>, FormError> {
        let config = match rule_type {
            RuleType::KeywordRule => present(self.keywords.as_deref()).map(|keywords| {
                RuleConfig::Keywords(KeywordsConfig {
                    keywords: split_list(keywords),
                })
            }),
            RuleType::RegexRule => present(self.regex_patterns.as_deref()).map(|patterns| {
                RuleConfig::Regex(RegexConfig {
                    regex_patterns: split_list(patterns),
                })
            }),
            RuleType::ToxicityRule => match present(self.threshold.as_deref()) {
                Some(raw) => Some(RuleConfig::Toxicity(ToxicityConfig {
                    threshold: Some(parse_number("threshold", raw)?),
                })),
                None => None,
            },
            RuleType::PiiDataRule => {
                let confidence_threshold = present(self.confidence_threshold.as_deref())
                    .map(|raw| parse_number("confidence threshold", raw))
                    .transpose()?;
                Some(RuleConfig::Pii(PiiConfig {
                    disabled_pii_entities: present(self.disabled_pii_entities.as_deref())
                        .map(split_list),
                    confidence_threshold,
                    allow_list: present(self.allow_list.as_deref()).map(split_list),
                }))
            }
            RuleType::ModelSensitiveDataRule => match present(self.examples_json.as_deref()) {
                Some(raw) => Some(RuleConfig::Examples(ExamplesConfig {
                    examples: parse_examples(raw)?,
                    hint: present(self.hint.as_deref()).map(str::to_string),
                })),
                None => None,
            },
            RuleType::ModelHallucinationRuleV2 | RuleType::PromptInjectionRule => None,
        };
        Ok(config)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleToggleForm {
    pub task_id: String,
    pub rule_id: String,
    pub enabled: bool,
}

impl RuleToggleForm {
    pub fn build(&self) -> Result<(String, String, UpdateRuleRequest), FormError> {
        let (Some(task_id), Some(rule_id)) = (required(&self.task_id), required(&self.rule_id))
        else {
            return Err(FormError::Required("Task ID and Rule ID are required"));
        };
        Ok((
            task_id,
            rule_id,
            UpdateRuleRequest {
                enabled: self.enabled,
            },
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptValidationForm {
    pub task_id: String,
    pub prompt: String,
    pub conversation_id: Option<String>,
    pub user_id: Option<String>,
}

impl PromptValidationForm {
    pub fn build(&self) -> Result<(String, PromptValidationRequest), FormError> {
        let (Some(task_id), Some(prompt)) = (required(&self.task_id), required(&self.prompt))
        else {
            return Err(FormError::Required("Task ID and prompt are required"));
        };
        Ok((
            task_id,
            PromptValidationRequest {
                prompt,
                conversation_id: present(self.conversation_id.as_deref()).map(str::to_string),
                user_id: present(self.user_id.as_deref()).map(str::to_string),
            },
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseValidationForm {
    pub task_id: String,
    pub inference_id: String,
    pub response: String,
    pub context: Option<String>,
}

impl ResponseValidationForm {
    pub fn build(&self) -> Result<(String, String, ResponseValidationRequest), FormError> {
        let (Some(task_id), Some(inference_id), Some(response)) = (
            required(&self.task_id),
            required(&self.inference_id),
            required(&self.response),
        ) else {
            return Err(FormError::Required(
                "Task ID, inference ID, and response are required",
            ));
        };
        Ok((
            task_id,
            inference_id,
            ResponseValidationRequest {
                response,
                context: present(self.context.as_deref()).map(str::to_string),
            },
        ))
    }
}

fn required(value: &str) -> Option<String> {
    present(Some(value)).map(str::to_string)
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, FormError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| FormError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

/// Any failure, including a well-formed non-array value, reports
/// `Invalid examples JSON format`.
fn parse_examples(raw: &str) -> Result<Vec<ExampleConfig>, FormError> {
    serde_json::from_str(raw).map_err(|_| FormError::InvalidExamplesJson)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_form(rule_type: &str) -> RuleForm {
        RuleForm {
            task_id: "task-1".into(),
            name: "guard".into(),
            rule_type: rule_type.into(),
            apply_to_prompt: true,
            ..RuleForm::default()
        }
    }

    #[test]
    fn task_name_is_required() {
        assert_eq!(
            TaskForm::default().build(),
            Err(FormError::Required("Task name is required"))
        );
        assert_eq!(
            TaskForm { name: "bot".into() }.build().unwrap().name,
            "bot"
        );
    }

    #[test]
    fn rule_requires_id_name_and_type() {
        let form = RuleForm {
            name: "x".into(),
            rule_type: "KeywordRule".into(),
            ..RuleForm::default()
        };
        assert_eq!(
            form.build(),
            Err(FormError::Required("Task ID, name, and type are required"))
        );
    }

    #[test]
    fn unknown_rule_type_is_rejected() {
        assert_eq!(
            rule_form("MagicRule").build(),
            Err(FormError::UnknownRuleType("MagicRule".into()))
        );
    }

    #[test]
    fn keywords_are_split_trimmed_and_filtered() {
        let form = RuleForm {
            keywords: Some(" password, ,secret ,token".into()),
            ..rule_form("KeywordRule")
        };
        let (task_id, request) = form.build().unwrap();
        assert_eq!(task_id, "task-1");
        assert_eq!(
            request.config,
            Some(RuleConfig::Keywords(KeywordsConfig {
                keywords: vec!["password".into(), "secret".into(), "token".into()],
            }))
        );
    }

    #[test]
    fn keyword_rule_without_keywords_has_no_config() {
        let (_, request) = rule_form("KeywordRule").build().unwrap();
        assert!(request.config.is_none());
    }

    #[test]
    fn toxicity_threshold_is_parsed() {
        let form = RuleForm {
            threshold: Some("0.35".into()),
            ..rule_form("ToxicityRule")
        };
        let (_, request) = form.build().unwrap();
        assert_eq!(
            request.config,
            Some(RuleConfig::Toxicity(ToxicityConfig {
                threshold: Some(0.35)
            }))
        );

        let bad = RuleForm {
            threshold: Some("high".into()),
            ..rule_form("ToxicityRule")
        };
        assert!(matches!(bad.build(), Err(FormError::InvalidNumber { .. })));
    }

    #[test]
    fn pii_config_is_always_present() {
        let (_, bare) = rule_form("PIIDataRule").build().unwrap();
        assert_eq!(bare.config, Some(RuleConfig::Pii(PiiConfig::default())));

        let form = RuleForm {
            confidence_threshold: Some("0.8".into()),
            allow_list: Some("ACME, Initech".into()),
            ..rule_form("PIIDataRule")
        };
        let (_, request) = form.build().unwrap();
        assert_eq!(
            request.config,
            Some(RuleConfig::Pii(PiiConfig {
                disabled_pii_entities: None,
                confidence_threshold: Some(0.8),
                allow_list: Some(vec!["ACME".into(), "Initech".into()]),
            }))
        );
    }

    #[test]
    fn sensitive_data_examples_must_be_a_json_array() {
        let good = RuleForm {
            examples_json: Some(r#"[{"example": "ssn 123", "result": true}]"#.into()),
            hint: Some("ids".into()),
            ..rule_form("ModelSensitiveDataRule")
        };
        let (_, request) = good.build().unwrap();
        let Some(RuleConfig::Examples(config)) = request.config else {
            panic!("expected examples config");
        };
        assert_eq!(config.examples.len(), 1);
        assert_eq!(config.hint.as_deref(), Some("ids"));

        let object = RuleForm {
            examples_json: Some(r#"{"example": "x"}"#.into()),
            ..rule_form("ModelSensitiveDataRule")
        };
        assert_eq!(object.build(), Err(FormError::InvalidExamplesJson));

        let garbage = RuleForm {
            examples_json: Some("[oops".into()),
            ..rule_form("ModelSensitiveDataRule")
        };
        assert_eq!(garbage.build(), Err(FormError::InvalidExamplesJson));
    }

    #[test]
    fn prompt_validation_omits_empty_optionals() {
        let form = PromptValidationForm {
            task_id: "t".into(),
            prompt: "hi".into(),
            conversation_id: Some(String::new()),
            user_id: Some("u-9".into()),
        };
        let (_, request) = form.build().unwrap();
        assert!(request.conversation_id.is_none());
        assert_eq!(request.user_id.as_deref(), Some("u-9"));

        assert_eq!(
            PromptValidationForm::default().build(),
            Err(FormError::Required("Task ID and prompt are required"))
        );
    }

    #[test]
    fn response_validation_and_toggle_require_ids() {
        assert_eq!(
            ResponseValidationForm {
                task_id: "t".into(),
                response: "r".into(),
                ..ResponseValidationForm::default()
            }
            .build(),
            Err(FormError::Required(
                "Task ID, inference ID, and response are required"
            ))
        );
        assert_eq!(
            RuleToggleForm::default().build(),
            Err(FormError::Required("Task ID and Rule ID are required"))
        );
    }
}
