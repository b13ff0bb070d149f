use crate::api::RuleStatus;
use chrono::{DateTime, Local, TimeZone, Utc};

/// Timestamps above this are taken to be milliseconds.
const MILLIS_THRESHOLD: i64 = 10_000_000_000;

/// Seconds or milliseconds since the epoch, told apart by magnitude.
pub fn timestamp_to_utc(timestamp: i64) -> Option<DateTime<Utc>> {
    if timestamp > MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(timestamp)
    } else {
        DateTime::from_timestamp(timestamp, 0)
    }
}

/// Local-time rendering used in the table.
pub fn format_date(timestamp: i64) -> String {
    format_date_in(timestamp, &Local)
}

pub fn format_date_in<Tz>(timestamp: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match timestamp_to_utc(timestamp) {
        Some(at) => at.with_timezone(tz).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp.to_string(),
    }
}

/// Display label for a status; unknown values are echoed unchanged.
pub fn format_rule_result(status: &RuleStatus) -> String {
    status.as_str().to_string()
}

/// How prominent a badge is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeVariant {
    Outline,
    Destructive,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Red,
    Grey,
    Yellow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub icon: char,
    pub label: String,
    pub variant: BadgeVariant,
    pub tone: Tone,
}

impl Badge {
    /// `✓ Pass`
    pub fn text(&self) -> String {
        format!("{} {}", self.icon, self.label)
    }
}

pub fn badge_for(status: &RuleStatus) -> Badge {
    let (icon, variant, tone) = match status {
        RuleStatus::Pass => ('✓', BadgeVariant::Outline, Tone::Green),
        RuleStatus::Fail => ('✗', BadgeVariant::Destructive, Tone::Red),
        RuleStatus::Skipped => ('»', BadgeVariant::Secondary, Tone::Grey),
        RuleStatus::Unavailable => ('?', BadgeVariant::Outline, Tone::Grey),
        RuleStatus::PartiallyUnavailable => ('⚠', BadgeVariant::Outline, Tone::Yellow),
        RuleStatus::ModelNotAvailable => ('!', BadgeVariant::Outline, Tone::Red),
        RuleStatus::Other(_) => ('?', BadgeVariant::Outline, Tone::Grey),
    };
    Badge {
        icon,
        label: format_rule_result(status),
        variant,
        tone,
    }
}

/// `0.42` → `42`
pub fn percent(fraction: f64) -> i64 {
    // Scores are fractions in [0, 1]; the cast cannot overflow.
    #[allow(clippy::cast_possible_truncation)]
    let rounded = (fraction * 100.0).round() as i64;
    rounded
}

/// First eight characters followed by `...`.
pub fn short_id(id: &str) -> String {
    let prefix: String = id.chars().take(8).collect();
    format!("{prefix}...")
}

/// Cut `text` to `width` characters, marking the cut with `…`.
pub fn truncate(text: &str, width: usize) -> String {
    let single_line = text.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= width {
        return single_line;
    }
    let kept: String = single_line.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}
