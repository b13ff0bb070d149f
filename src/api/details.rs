//! Per-rule detail payloads.
//!
//! The engine sends one flat object whose shape depends on the rule that
//! produced it, with no discriminant field. It is converted into
//! [`RuleDetails`] (a tagged [`RuleDetailKind`]) as soon as it is parsed and
//! converted back to the flat shape when serialized.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSpan {
    pub keyword: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegexSpan {
    pub matching_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HallucinationClaim {
    pub claim: String,
    pub valid: bool,
    #[serde(default)]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiiEntitySpan {
    pub entity: String,
    pub span: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuleDetailKind {
    Keyword(Vec<KeywordSpan>),
    Regex(Vec<RegexSpan>),
    Hallucination(Vec<HallucinationClaim>),
    Pii(Vec<PiiEntitySpan>),
    /// Only toxicity fields were present. The reading itself lives in
    /// [`RuleDetails::toxicity`].
    Toxicity,
    /// Only the shared `score`/`message` fields were present.
    Base,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRuleDetails", into = "RawRuleDetails")]
pub struct RuleDetails {
    pub score: Option<bool>,
    pub message: Option<String>,
    pub kind: RuleDetailKind,
    /// Kept apart from `kind`: toxicity fields may ride along with any
    /// other payload.
    pub toxicity: Option<ToxicityReading>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToxicityReading {
    pub score: Option<f64>,
    pub violation_type: Option<String>,
}

impl RuleDetails {
    pub fn toxicity_score(&self) -> Option<f64> {
        self.toxicity.as_ref().and_then(|reading| reading.score)
    }
}

/// Wire shape: every variant's fields flattened into one optional bag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawRuleDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    score: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    keyword_matches: Option<Vec<KeywordSpan>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    regex_matches: Option<Vec<RegexSpan>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    claims: Option<Vec<HallucinationClaim>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pii_entities: Option<Vec<PiiEntitySpan>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    toxicity_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    toxicity_violation_type: Option<String>,
}

impl From<RawRuleDetails> for RuleDetails {
    fn from(raw: RawRuleDetails) -> Self {
        let toxicity = (raw.toxicity_score.is_some() || raw.toxicity_violation_type.is_some())
            .then(|| ToxicityReading {
                score: raw.toxicity_score,
                violation_type: raw.toxicity_violation_type,
            });
        let kind = if let Some(matches) = raw.keyword_matches {
            RuleDetailKind::Keyword(matches)
        } else if let Some(matches) = raw.regex_matches {
            RuleDetailKind::Regex(matches)
        } else if let Some(claims) = raw.claims {
            RuleDetailKind::Hallucination(claims)
        } else if let Some(entities) = raw.pii_entities {
            RuleDetailKind::Pii(entities)
        } else if toxicity.is_some() {
            RuleDetailKind::Toxicity
        } else {
            RuleDetailKind::Base
        };

        Self {
            score: raw.score,
            message: raw.message,
            kind,
            toxicity,
        }
    }
}

impl From<RuleDetails> for RawRuleDetails {
    fn from(details: RuleDetails) -> Self {
        let mut raw = Self {
            score: details.score,
            message: details.message,
            ..Self::default()
        };
        if let Some(reading) = details.toxicity {
            raw.toxicity_score = reading.score;
            raw.toxicity_violation_type = reading.violation_type;
        }
        match details.kind {
            RuleDetailKind::Keyword(matches) => raw.keyword_matches = Some(matches),
            RuleDetailKind::Regex(matches) => raw.regex_matches = Some(matches),
            RuleDetailKind::Hallucination(claims) => raw.claims = Some(claims),
            RuleDetailKind::Pii(entities) => raw.pii_entities = Some(entities),
            RuleDetailKind::Toxicity | RuleDetailKind::Base => {}
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> RuleDetails {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn keyword_payload_becomes_keyword_variant() {
        let details = parse(json!({
            "score": false,
            "message": "keywords matched",
            "keyword_matches": [{"keyword": "secret"}, {"keyword": "token"}]
        }));
        assert_eq!(details.message.as_deref(), Some("keywords matched"));
        let RuleDetailKind::Keyword(matches) = details.kind else {
            panic!("expected keyword variant");
        };
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[1].keyword, "token");
    }

    #[test]
    fn toxicity_only_payload_becomes_toxicity_variant() {
        let details = parse(json!({
            "toxicity_score": 0.82,
            "toxicity_violation_type": "harassment"
        }));
        assert_eq!(details.toxicity_score(), Some(0.82));
        assert_eq!(details.kind, RuleDetailKind::Toxicity);
        assert_eq!(
            details.toxicity.and_then(|t| t.violation_type).as_deref(),
            Some("harassment")
        );
    }

    #[test]
    fn toxicity_alongside_keywords_is_kept() {
        let details = parse(json!({
            "keyword_matches": [{"keyword": "secret"}],
            "toxicity_score": 0.3
        }));
        assert!(matches!(details.kind, RuleDetailKind::Keyword(_)));
        assert_eq!(details.toxicity_score(), Some(0.3));

        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["toxicity_score"], json!(0.3));
        assert_eq!(value["keyword_matches"][0]["keyword"], "secret");
    }

    #[test]
    fn pii_and_claims_are_distinguished() {
        let pii = parse(json!({
            "pii_entities": [{"entity": "EMAIL", "span": "a@b.c", "confidence": 0.9}]
        }));
        assert!(matches!(pii.kind, RuleDetailKind::Pii(ref e) if e[0].entity == "EMAIL"));

        let claims = parse(json!({
            "claims": [{"claim": "sky is green", "valid": false, "reason": "no"}]
        }));
        assert!(matches!(claims.kind, RuleDetailKind::Hallucination(ref c) if !c[0].valid));
    }

    #[test]
    fn bare_message_is_base_variant() {
        let details = parse(json!({"message": "model timed out"}));
        assert_eq!(details.kind, RuleDetailKind::Base);
        assert_eq!(details.toxicity_score(), None);
    }

    #[test]
    fn serializes_back_to_flat_shape_without_tag() {
        let details = RuleDetails {
            score: Some(false),
            message: None,
            kind: RuleDetailKind::Regex(vec![RegexSpan {
                matching_text: "4111-1111".into(),
                pattern: Some(r"\d{4}-\d{4}".into()),
            }]),
            toxicity: None,
        };
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(
            value,
            json!({
                "score": false,
                "regex_matches": [{"matching_text": "4111-1111", "pattern": "\\d{4}-\\d{4}"}]
            })
        );
    }
}
