//! Plain-terminal rendering of the inference table.

use super::format::{Badge, BadgeVariant, Tone, truncate};
use super::table::{DetailPanel, MessagePanel, TablePage, TableRow, failed_label};
use super::{EMPTY_MESSAGE, LOADING_MESSAGE, error_message};
use crate::fetch::FetchState;
use crate::ui::style;

const HEADERS: [&str; 7] = [
    "ID",
    "Task",
    "Result",
    "User ID",
    "Created At",
    "Prompt",
    "Response",
];

/// Which of the mutually exclusive table states to draw.
#[derive(Debug)]
pub enum TableView<'a> {
    Error(&'a str),
    Loading,
    Empty,
    Rows(TablePage),
}

impl<'a> TableView<'a> {
    pub fn new(state: &'a FetchState, build: impl FnOnce() -> TablePage) -> Self {
        match state {
            FetchState::Failed(message) => Self::Error(message),
            FetchState::Idle | FetchState::Loading => Self::Loading,
            FetchState::Loaded(page) if page.inferences.is_empty() => Self::Empty,
            FetchState::Loaded(_) => Self::Rows(build()),
        }
    }
}

pub fn styled_badge(badge: &Badge) -> String {
    paint(badge, badge.text())
}

/// Color `text` the way `badge` is colored.
fn paint(badge: &Badge, text: String) -> String {
    match (badge.variant, badge.tone) {
        (BadgeVariant::Destructive, _) | (_, Tone::Red) => style::error(text),
        (_, Tone::Green) => style::value(text),
        (_, Tone::Yellow) => style::yellow(text),
        (_, Tone::Grey) => style::dim(text),
    }
}

/// Lines for the whole view. `message_width` bounds the prompt and
/// response columns.
pub fn render_table(view: &TableView<'_>, message_width: usize) -> Vec<String> {
    match view {
        TableView::Error(message) => vec![style::error(error_message(message))],
        TableView::Loading => vec![style::dim(LOADING_MESSAGE)],
        TableView::Empty => vec![style::dim(EMPTY_MESSAGE)],
        TableView::Rows(page) => {
            let mut lines = vec![style::header(HEADERS.join(" │ "))];
            for row in &page.rows {
                lines.push(render_row(row, message_width));
                if let Some(detail) = &row.detail {
                    lines.extend(render_detail(detail));
                }
            }
            lines.push(String::new());
            lines.push(style::dim(page.pagination.label()));
            lines
        }
    }
}

fn render_row(row: &TableRow, message_width: usize) -> String {
    let summary = &row.summary;
    let marker = if row.detail.is_some() { '▾' } else { '▸' };
    let with_failures = |text: &str, failed: usize| {
        let text = truncate(text, message_width);
        match failed_label(failed) {
            Some(label) => format!("{text} {}", style::error(format!("[{label}]"))),
            None => text,
        }
    };
    [
        format!("{marker} {}", style::cyan(&summary.short_id)),
        summary.task_name.clone(),
        styled_badge(&summary.result),
        summary.user_id.clone(),
        summary.created_at.clone(),
        with_failures(&summary.prompt, summary.prompt_failed),
        with_failures(&summary.response, summary.response_failed),
    ]
    .join(" │ ")
}

pub fn render_detail(detail: &DetailPanel) -> Vec<String> {
    let mut lines = Vec::new();
    render_panel(&mut lines, "Prompt Details", &detail.prompt);
    if let Some(response) = &detail.response {
        render_panel(&mut lines, "Response Details", response);
    }
    lines
}

fn render_panel(lines: &mut Vec<String>, title: &str, panel: &MessagePanel) {
    const INDENT: &str = "    ";
    lines.push(format!("  {}", style::header(title)));
    lines.extend(panel.message.lines().map(|line| format!("{INDENT}{line}")));
    if let Some(tokens) = panel.tokens {
        lines.push(format!("{INDENT}{}", style::dim(format!("Tokens: {tokens}"))));
    }
    if let Some(context) = &panel.context {
        lines.push(format!("{INDENT}Context:"));
        lines.extend(context.lines().map(|line| format!("{INDENT}  {}", style::dim(line))));
    }
    lines.push(format!("{INDENT}Rule Results:"));
    for rule in &panel.rules {
        let mut heading = format!("{INDENT}  {}", paint(&rule.badge, rule.heading()));
        if let Some(toxicity) = &rule.toxicity {
            let badge = match toxicity.variant {
                BadgeVariant::Secondary => style::dim(toxicity.text()),
                _ => style::error(toxicity.text()),
            };
            heading.push(' ');
            heading.push_str(&badge);
            if let Some(kind) = &toxicity.violation_type {
                heading.push(' ');
                heading.push_str(&style::dim(kind));
            }
        }
        lines.push(heading);
        if let Some(message) = &rule.message {
            lines.push(format!("{INDENT}      “{message}”"));
        }
        if let Some(section) = &rule.section {
            lines.push(format!("{INDENT}      {}", section.title));
            lines.extend(
                section
                    .lines
                    .iter()
                    .map(|line| format!("{INDENT}        • {line}")),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::QueryInferencesResponse;
    use crate::view::ExpandedRows;
    use std::sync::Arc;

    fn page(count: u64) -> TablePage {
        TablePage::build(&[], count, 0, 10, &ExpandedRows::default())
    }

    #[test]
    fn failed_state_shows_only_the_error_line() {
        let state = FetchState::Failed("Arthur API Error: 404 - not found".into());
        let lines = render_table(&TableView::new(&state, || page(0)), 40);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Error loading inferences: Arthur API Error: 404 - not found"));
    }

    #[test]
    fn loading_and_empty_states() {
        let loading = render_table(&TableView::new(&FetchState::Loading, || page(0)), 40);
        assert!(loading[0].contains(LOADING_MESSAGE));

        let empty_state = FetchState::Loaded(Arc::new(QueryInferencesResponse {
            count: 0,
            inferences: Vec::new(),
        }));
        let empty = render_table(&TableView::new(&empty_state, || page(0)), 40);
        assert_eq!(empty.len(), 1);
        assert!(empty[0].contains("No inferences found"));
    }
}
