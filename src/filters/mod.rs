//! Draft/applied filter model for the inference table.
//!
//! The user edits a *draft* snapshot freely; only the *applied* snapshot
//! drives fetching. Every transition is a pure function over snapshots so it
//! can be exercised without any UI.

use crate::api::{QueryInferencesParams, RuleStatus, SortOrder};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ── Page size ────────────────────────────────────────────────────

/// One of the page sizes the table offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

impl PageSize {
    pub const ALLOWED: [u32; 4] = [10, 25, 50, 100];
    pub const DEFAULT: Self = Self(10);

    pub fn get(self) -> u32 {
        self.0
    }

    /// Next larger size, wrapping to the smallest.
    pub fn next(self) -> Self {
        let idx = Self::ALLOWED.iter().position(|&s| s == self.0).unwrap_or(0);
        Self(Self::ALLOWED[(idx + 1) % Self::ALLOWED.len()])
    }

    /// Next smaller size, wrapping to the largest.
    pub fn prev(self) -> Self {
        let idx = Self::ALLOWED.iter().position(|&s| s == self.0).unwrap_or(0);
        Self(Self::ALLOWED[(idx + Self::ALLOWED.len() - 1) % Self::ALLOWED.len()])
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for PageSize {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if Self::ALLOWED.contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!(
                "page size must be one of 10, 25, 50, 100 (got {value})"
            ))
        }
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.0
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| format!("page size must be a number (got {s})"))?;
        Self::try_from(value)
    }
}

// ── Filters ──────────────────────────────────────────────────────

/// One snapshot of the user-editable filters. `None` means "not filtered".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceFilters {
    pub task_name: Option<String>,
    pub user_id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub rule_statuses: Option<Vec<RuleStatus>>,
    pub page: Option<u32>,
    pub page_size: Option<PageSize>,
}

/// Single edit to a draft snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEdit {
    TaskName(Option<String>),
    UserId(Option<String>),
    /// One status or "any".
    RuleStatus(Option<RuleStatus>),
    DateRange {
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    },
}

impl InferenceFilters {
    pub fn with_page_size(page_size: PageSize) -> Self {
        Self {
            page: Some(0),
            page_size: Some(page_size),
            ..Self::default()
        }
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(0)
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size.unwrap_or_default()
    }

    /// Whether any narrowing filter (not pagination) is set.
    pub fn has_active_filters(&self) -> bool {
        self.task_name.is_some()
            || self.user_id.is_some()
            || self.start_time.is_some()
            || self.end_time.is_some()
            || self.rule_statuses.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Return a copy with one field changed. Blank text clears the field.
    pub fn edited(&self, edit: FilterEdit) -> Self {
        let mut next = self.clone();
        match edit {
            FilterEdit::TaskName(value) => next.task_name = non_blank(value),
            FilterEdit::UserId(value) => next.user_id = non_blank(value),
            FilterEdit::RuleStatus(status) => next.rule_statuses = status.map(|s| vec![s]),
            FilterEdit::DateRange { from, to } => {
                next.start_time = from.map(to_iso_string);
                next.end_time = to.map(to_iso_string);
            }
        }
        next
    }

    /// Normalized request parameters for this snapshot.
    pub fn to_query_params(&self) -> QueryInferencesParams {
        QueryInferencesParams {
            task_name: self.task_name.clone(),
            user_id: self.user_id.clone(),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            rule_statuses: self.rule_statuses.clone(),
            page: Some(self.page()),
            page_size: Some(self.page_size().get()),
            include_count: Some(true),
            sort: Some(SortOrder::Desc),
            ..QueryInferencesParams::default()
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `2024-01-31T00:00:00.000Z` style timestamps.
pub fn to_iso_string(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp.
pub fn parse_date_bound(input: &str) -> Result<DateTime<Utc>, String> {
    let input = input.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(input) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
        .ok_or_else(|| format!("expected YYYY-MM-DD or an RFC 3339 timestamp (got {input})"))
}

// ── Transitions ──────────────────────────────────────────────────

/// Commit a draft: new applied snapshot starts at page 0 and keeps the page
/// size that was applied before.
pub fn apply(draft: &InferenceFilters, applied: &InferenceFilters) -> InferenceFilters {
    InferenceFilters {
        page: Some(0),
        page_size: Some(applied.page_size()),
        ..draft.clone()
    }
}

/// Reset every filter, keeping the applied page size. The result is used
/// for both the draft and the applied snapshot.
pub fn clear(applied: &InferenceFilters) -> InferenceFilters {
    InferenceFilters::with_page_size(applied.page_size())
}

pub fn with_page(applied: &InferenceFilters, page: u32) -> InferenceFilters {
    InferenceFilters {
        page: Some(page),
        ..applied.clone()
    }
}

pub fn with_page_size(applied: &InferenceFilters, page_size: PageSize) -> InferenceFilters {
    InferenceFilters {
        page: Some(0),
        page_size: Some(page_size),
        ..applied.clone()
    }
}

/// Both snapshots, plus the operations a table view performs on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub draft: InferenceFilters,
    pub applied: InferenceFilters,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

impl FilterState {
    pub fn new(page_size: PageSize) -> Self {
        let initial = InferenceFilters::with_page_size(page_size);
        Self {
            draft: initial.clone(),
            applied: initial,
        }
    }

    pub fn edit_draft(&mut self, edit: FilterEdit) {
        self.draft = self.draft.edited(edit);
    }

    pub fn apply(&mut self) {
        self.applied = apply(&self.draft, &self.applied);
    }

    pub fn clear(&mut self) {
        let cleared = clear(&self.applied);
        self.draft = cleared.clone();
        self.applied = cleared;
    }

    pub fn set_page(&mut self, page: u32) {
        self.applied = with_page(&self.applied, page);
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.applied = with_page_size(&self.applied, page_size);
    }

    pub fn query_params(&self) -> QueryInferencesParams {
        self.applied.to_query_params()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn size(n: u32) -> PageSize {
        PageSize::try_from(n).unwrap()
    }

    #[test]
    fn editing_draft_leaves_applied_untouched() {
        let mut state = FilterState::default();
        state.edit_draft(FilterEdit::TaskName(Some("support".into())));
        assert_eq!(state.draft.task_name.as_deref(), Some("support"));
        assert!(state.applied.task_name.is_none());
    }

    #[test]
    fn apply_resets_page_and_keeps_applied_page_size() {
        let mut state = FilterState::new(size(25));
        state.set_page(4);
        state.draft.page_size = Some(size(100));
        state.edit_draft(FilterEdit::UserId(Some("u-1".into())));

        state.apply();

        assert_eq!(state.applied.page(), 0);
        assert_eq!(state.applied.page_size(), size(25));
        assert_eq!(state.applied.user_id.as_deref(), Some("u-1"));
    }

    #[test]
    fn clear_takes_effect_immediately_and_keeps_page_size() {
        let mut state = FilterState::new(size(50));
        state.edit_draft(FilterEdit::TaskName(Some("bot".into())));
        state.edit_draft(FilterEdit::RuleStatus(Some(RuleStatus::Fail)));
        state.apply();
        state.set_page(3);

        state.clear();

        assert_eq!(state.applied, InferenceFilters::with_page_size(size(50)));
        assert_eq!(state.draft, state.applied);
        assert!(!state.applied.has_active_filters());
    }

    #[test]
    fn changing_page_size_resets_page() {
        let mut state = FilterState::default();
        state.set_page(7);
        state.set_page_size(size(25));
        assert_eq!(state.applied.page(), 0);
        assert_eq!(state.applied.page_size(), size(25));
    }

    #[test]
    fn query_params_fill_defaults() {
        let params = InferenceFilters::default().to_query_params();
        assert_eq!(params.page, Some(0));
        assert_eq!(params.page_size, Some(10));
        assert_eq!(params.include_count, Some(true));
        assert_eq!(params.sort, Some(SortOrder::Desc));
        assert!(params.task_name.is_none());
        assert_eq!(
            params.to_query_string(),
            "include_count=true&sort=desc&page_size=10&page=0"
        );
    }

    #[test]
    fn blank_text_clears_field() {
        let filters = InferenceFilters::default()
            .edited(FilterEdit::TaskName(Some("bot".into())))
            .edited(FilterEdit::TaskName(Some("   ".into())));
        assert!(filters.task_name.is_none());
    }

    #[test]
    fn date_range_sets_iso_bounds() {
        let from = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let filters = InferenceFilters::default().edited(FilterEdit::DateRange {
            from: Some(from),
            to: None,
        });
        assert_eq!(filters.start_time.as_deref(), Some("2024-01-02T03:04:05.000Z"));
        assert!(filters.end_time.is_none());
    }

    #[test]
    fn date_bounds_accept_plain_dates_and_rfc3339() {
        assert_eq!(
            to_iso_string(parse_date_bound("2024-03-01").unwrap()),
            "2024-03-01T00:00:00.000Z"
        );
        assert_eq!(
            to_iso_string(parse_date_bound("2024-03-01T10:00:00+02:00").unwrap()),
            "2024-03-01T08:00:00.000Z"
        );
        assert!(parse_date_bound("March 1st").is_err());
    }

    #[test]
    fn single_status_selection_becomes_one_element_list() {
        let filters = InferenceFilters::default()
            .edited(FilterEdit::RuleStatus(Some(RuleStatus::Skipped)));
        assert_eq!(filters.rule_statuses, Some(vec![RuleStatus::Skipped]));
        let any = filters.edited(FilterEdit::RuleStatus(None));
        assert!(any.rule_statuses.is_none());
    }

    #[test]
    fn page_size_is_restricted_and_cycles() {
        assert!(PageSize::try_from(7).is_err());
        assert_eq!("25".parse::<PageSize>(), Ok(size(25)));
        assert_eq!(size(100).next(), size(10));
        assert_eq!(size(10).prev(), size(100));
    }
}
