use super::format::{Badge, BadgeVariant, badge_for, format_date, percent, short_id};
use crate::api::{
    ExternalInference, ExternalRuleResult, RuleDetailKind, RuleDetails, RuleStatus,
};
use std::collections::HashSet;

// ── Row expansion ────────────────────────────────────────────────

/// Which rows show their detail panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedRows(HashSet<String>);

impl ExpandedRows {
    pub fn toggle(&mut self, id: &str) {
        if !self.0.remove(id) {
            self.0.insert(id.to_string());
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn expand_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        self.0.extend(ids.into_iter().map(str::to_string));
    }

    pub fn collapse_all(&mut self) {
        self.0.clear();
    }
}

// ── Pagination ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u32, page_size: u32, total_count: u64) -> Self {
        Self {
            page,
            page_size,
            total_count,
            total_pages: total_count.div_ceil(u64::from(page_size.max(1))),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) + 1 < self.total_pages
    }

    /// `Page 1 of 3 (25 total)`
    pub fn label(&self) -> String {
        format!(
            "Page {} of {} ({} total)",
            u64::from(self.page) + 1,
            self.total_pages,
            self.total_count
        )
    }
}

// ── Row summary ──────────────────────────────────────────────────

pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_RESPONSE: &str = "No response";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSummary {
    pub id: String,
    pub short_id: String,
    pub task_name: String,
    pub result: Badge,
    pub user_id: String,
    pub created_at: String,
    pub prompt: String,
    pub prompt_failed: usize,
    pub response: String,
    pub response_failed: usize,
}

impl RowSummary {
    pub fn from_inference(inference: &ExternalInference) -> Self {
        let response = inference.inference_response.as_ref();
        Self {
            id: inference.id.clone(),
            short_id: short_id(&inference.id),
            task_name: inference
                .task_name
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.into()),
            result: badge_for(&inference.result),
            user_id: inference
                .user_id
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.into()),
            created_at: format_date(inference.created_at),
            prompt: inference.inference_prompt.message.clone(),
            prompt_failed: failed_count(&inference.inference_prompt.prompt_rule_results),
            response: response.map_or_else(|| NO_RESPONSE.into(), |r| r.message.clone()),
            response_failed: response.map_or(0, |r| failed_count(&r.response_rule_results)),
        }
    }
}

pub fn failed_count(rules: &[ExternalRuleResult]) -> usize {
    rules
        .iter()
        .filter(|rule| rule.result == RuleStatus::Fail)
        .count()
}

/// `2 failed`, or nothing when no rule failed.
pub fn failed_label(count: usize) -> Option<String> {
    (count > 0).then(|| format!("{count} failed"))
}

// ── Detail panel ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToxicityBadge {
    pub percent: i64,
    pub variant: BadgeVariant,
    pub violation_type: Option<String>,
}

impl ToxicityBadge {
    /// Shown whenever a toxicity score is present, whatever else the
    /// details carry.
    pub fn from_details(details: &RuleDetails) -> Option<Self> {
        let percent = percent(details.toxicity_score()?);
        Some(Self {
            percent,
            variant: if percent == 0 {
                BadgeVariant::Secondary
            } else {
                BadgeVariant::Destructive
            },
            violation_type: details
                .toxicity
                .as_ref()
                .and_then(|reading| reading.violation_type.clone()),
        })
    }

    pub fn text(&self) -> String {
        format!("{}%", self.percent)
    }
}

/// One titled block of type-specific findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSection {
    pub title: &'static str,
    pub lines: Vec<String>,
}

impl DetailSection {
    /// Section for the detail kind, if it carries anything to list.
    pub fn from_kind(kind: &RuleDetailKind) -> Option<Self> {
        let (title, lines): (&'static str, Vec<String>) = match kind {
            RuleDetailKind::Keyword(matches) => (
                "Keywords found:",
                matches.iter().map(|m| m.keyword.clone()).collect(),
            ),
            RuleDetailKind::Regex(matches) => (
                "Pattern matches:",
                matches
                    .iter()
                    .map(|m| match &m.pattern {
                        Some(pattern) => format!("{} ({pattern})", m.matching_text),
                        None => m.matching_text.clone(),
                    })
                    .collect(),
            ),
            RuleDetailKind::Hallucination(claims) => (
                "Claims analysis:",
                claims
                    .iter()
                    .map(|claim| {
                        let verdict = if claim.valid { "Valid" } else { "Invalid" };
                        if claim.reason.is_empty() {
                            format!("{}: {verdict}", claim.claim)
                        } else {
                            format!("{}: {verdict} ({})", claim.claim, claim.reason)
                        }
                    })
                    .collect(),
            ),
            RuleDetailKind::Pii(entities) => (
                "PII detected:",
                entities
                    .iter()
                    .map(|e| match e.confidence {
                        Some(confidence) if confidence > 0.0 => {
                            format!("{}: {} ({}%)", e.entity, e.span, percent(confidence))
                        }
                        _ => format!("{}: {}", e.entity, e.span),
                    })
                    .collect(),
            ),
            RuleDetailKind::Toxicity | RuleDetailKind::Base => return None,
        };
        (!lines.is_empty()).then_some(Self { title, lines })
    }
}

/// Everything shown for one rule result inside the detail panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleLine {
    pub badge: Badge,
    pub name: String,
    pub toxicity: Option<ToxicityBadge>,
    /// Only for results other than `Pass`.
    pub message: Option<String>,
    /// Only for results other than `Pass`.
    pub section: Option<DetailSection>,
}

impl RuleLine {
    pub fn from_result(rule: &ExternalRuleResult) -> Self {
        let details = rule.details.as_ref();
        let explain = rule.result != RuleStatus::Pass;
        Self {
            badge: badge_for(&rule.result),
            name: rule.name.clone(),
            toxicity: details.and_then(ToxicityBadge::from_details),
            message: details
                .filter(|_| explain)
                .and_then(|d| d.message.clone())
                .filter(|m| !m.is_empty()),
            section: details
                .filter(|_| explain)
                .and_then(|d| DetailSection::from_kind(&d.kind)),
        }
    }

    /// `✗ Keyword Rule: Fail`
    pub fn heading(&self) -> String {
        format!("{} {}: {}", self.badge.icon, self.name, self.badge.label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePanel {
    pub message: String,
    pub tokens: Option<u64>,
    pub context: Option<String>,
    pub rules: Vec<RuleLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPanel {
    pub prompt: MessagePanel,
    pub response: Option<MessagePanel>,
}

impl DetailPanel {
    pub fn from_inference(inference: &ExternalInference) -> Self {
        let prompt = &inference.inference_prompt;
        Self {
            prompt: MessagePanel {
                message: prompt.message.clone(),
                tokens: prompt.tokens.filter(|&t| t > 0),
                context: None,
                rules: prompt
                    .prompt_rule_results
                    .iter()
                    .map(RuleLine::from_result)
                    .collect(),
            },
            response: inference.inference_response.as_ref().map(|response| MessagePanel {
                message: response.message.clone(),
                tokens: response.tokens.filter(|&t| t > 0),
                context: response.context.clone().filter(|c| !c.is_empty()),
                rules: response
                    .response_rule_results
                    .iter()
                    .map(RuleLine::from_result)
                    .collect(),
            }),
        }
    }
}

// ── Table ────────────────────────────────────────────────────────

/// One page of inferences, ready to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub summary: RowSummary,
    /// Present only for expanded rows.
    pub detail: Option<DetailPanel>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePage {
    pub rows: Vec<TableRow>,
    pub pagination: Pagination,
}

impl TablePage {
    pub fn build(
        inferences: &[ExternalInference],
        total_count: u64,
        page: u32,
        page_size: u32,
        expanded: &ExpandedRows,
    ) -> Self {
        let rows = inferences
            .iter()
            .map(|inference| TableRow {
                summary: RowSummary::from_inference(inference),
                detail: expanded
                    .is_expanded(&inference.id)
                    .then(|| DetailPanel::from_inference(inference)),
            })
            .collect();
        Self {
            rows,
            pagination: Pagination::new(page, page_size, total_count),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
