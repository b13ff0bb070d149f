//! Renderer-independent model of the inference table plus a plain-terminal
//! renderer. The TUI draws the same model with ratatui.

pub mod format;
pub mod render;
pub mod table;

pub use format::{
    Badge, BadgeVariant, Tone, badge_for, format_date, format_date_in, format_rule_result,
    short_id, timestamp_to_utc,
};
pub use render::{TableView, render_detail, render_table, styled_badge};
pub use table::{
    DetailPanel, DetailSection, ExpandedRows, MessagePanel, Pagination, RowSummary, RuleLine,
    TablePage, TableRow, ToxicityBadge, failed_count, failed_label,
};

pub const LOADING_MESSAGE: &str = "Loading inferences...";
pub const EMPTY_MESSAGE: &str = "No inferences found";

pub fn error_message(message: &str) -> String {
    format!("Error loading inferences: {message}")
}
