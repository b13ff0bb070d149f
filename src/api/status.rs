use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of a rule (or of a whole inference) as reported by the engine.
///
/// The six documented values get their own variants. Anything else the
/// server sends is kept verbatim in [`RuleStatus::Other`] so it can still be
/// displayed and round-tripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuleStatus {
    Pass,
    Fail,
    Skipped,
    Unavailable,
    PartiallyUnavailable,
    ModelNotAvailable,
    Other(String),
}

impl RuleStatus {
    pub const ALL: [Self; 6] = [
        Self::Pass,
        Self::Fail,
        Self::Skipped,
        Self::Unavailable,
        Self::PartiallyUnavailable,
        Self::ModelNotAvailable,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pass => "Pass",
            Self::Fail => "Fail",
            Self::Skipped => "Skipped",
            Self::Unavailable => "Unavailable",
            Self::PartiallyUnavailable => "Partially Unavailable",
            Self::ModelNotAvailable => "Model Not Available",
            Self::Other(raw) => raw,
        }
    }

    pub fn parse(raw: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|known| known.as_str() == raw)
            .unwrap_or_else(|| Self::Other(raw.to_string()))
    }
}

impl From<String> for RuleStatus {
    fn from(raw: String) -> Self {
        match Self::parse(&raw) {
            Self::Other(_) => Self::Other(raw),
            known => known,
        }
    }
}

impl From<RuleStatus> for String {
    fn from(status: RuleStatus) -> Self {
        match status {
            RuleStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lenient parser for user input: accepts the wire spelling as well as
/// case-insensitive kebab/snake variants (`partially-unavailable`).
/// Unknown spellings are rejected rather than passed through.
impl FromStr for RuleStatus {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized: String = input
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        Self::ALL
            .into_iter()
            .find(|known| {
                known
                    .as_str()
                    .chars()
                    .filter(|c| *c != ' ')
                    .flat_map(char::to_lowercase)
                    .eq(normalized.chars())
            })
            .ok_or_else(|| format!("unknown rule status: {input}"))
    }
}

/// The seven rule kinds the engine knows about.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum RuleType {
    KeywordRule,
    ModelHallucinationRuleV2,
    ModelSensitiveDataRule,
    #[serde(rename = "PIIDataRule")]
    #[strum(serialize = "PIIDataRule")]
    PiiDataRule,
    PromptInjectionRule,
    RegexRule,
    ToxicityRule,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RuleScope {
    #[default]
    Default,
    Task,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FeedbackTarget {
    Context,
    ResponseResults,
    PromptResults,
}
