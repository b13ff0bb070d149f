use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use super::state::{App, FilterField, Screen};
use super::theme;
use super::widgets::{ChoiceWidget, SpinnerWidget, TextInputWidget};
use crate::fetch::FetchState;
use crate::view::format::truncate;
use crate::view::{
    Badge, BadgeVariant, DetailPanel, EMPTY_MESSAGE, LOADING_MESSAGE, MessagePanel, TablePage,
    TableRow, Tone, error_message, failed_label,
};

pub(super) fn draw_ui(area: Rect, buf: &mut Buffer, app: &App) {
    let vertical = Layout::vertical([
        Constraint::Length(2), // Title
        Constraint::Min(4),    // Body
        Constraint::Length(1), // Keybindings
    ])
    .split(area);

    let title = match app.screen {
        Screen::Gate => t!("tui.gate_title"),
        Screen::Table => t!("tui.inferences"),
        Screen::Filters => t!("tui.filters"),
    };
    Line::from(vec![
        Span::styled(format!("  {} ", t!("tui.title")), theme::title_style()),
        Span::styled(format!("· {title}"), theme::heading_style()),
    ])
    .render(Rect::new(vertical[0].x, vertical[0].y, vertical[0].width, 1), buf);
    Line::from(Span::styled(
        format!("  {}", "─".repeat(area.width.saturating_sub(4) as usize)),
        theme::dim_style(),
    ))
    .render(
        Rect::new(vertical[0].x, vertical[0].y + 1, vertical[0].width, 1),
        buf,
    );

    match app.screen {
        Screen::Gate => render_gate(vertical[1], buf, app),
        Screen::Table => render_table(vertical[1], buf, app),
        Screen::Filters => render_filters(vertical[1], buf, app),
    }

    let keys = match app.screen {
        Screen::Gate => t!("tui.keys_gate"),
        Screen::Table => t!("tui.keys_table"),
        Screen::Filters => t!("tui.keys_filters"),
    };
    Line::from(Span::styled(format!("  {keys}"), theme::keybinding_style()))
        .render(vertical[2], buf);
}

fn render_gate(area: Rect, buf: &mut Buffer, app: &App) {
    let rows = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .split(area);

    Line::from(Span::styled(
        format!("  {}", t!("tui.gate_hint")),
        theme::input_style(),
    ))
    .render(rows[0], buf);
    let label = t!("tui.gate_label");
    TextInputWidget::new(&app.gate.input, &label, !app.gate.checking).render(rows[1], buf);

    if app.gate.checking {
        let message = t!("tui.connecting");
        SpinnerWidget::new(&app.spinner, &message).render(rows[2], buf);
    } else if let Some(error) = &app.gate.error {
        Line::from(Span::styled(format!("  {error}"), theme::error_style())).render(rows[2], buf);
    }
}

fn render_filters(area: Rect, buf: &mut Buffer, app: &App) {
    let form = &app.form;
    let mut constraints = vec![Constraint::Length(1); FilterField::ALL.len()];
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));
    let rows = Layout::vertical(constraints).split(area);

    for (idx, field) in FilterField::ALL.iter().enumerate() {
        let focused = form.focus == *field;
        let area = rows[idx];
        match field {
            FilterField::TaskName => {
                TextInputWidget::new(&form.task_name, &t!("tui.task_name"), focused)
                    .render(area, buf);
            }
            FilterField::UserId => {
                TextInputWidget::new(&form.user_id, &t!("tui.user_id"), focused).render(area, buf);
            }
            FilterField::Status => {
                ChoiceWidget::new(&form.status, &t!("tui.status"), focused).render(area, buf);
            }
            FilterField::From => {
                TextInputWidget::new(&form.from, &t!("tui.from"), focused).render(area, buf);
            }
            FilterField::To => {
                TextInputWidget::new(&form.to, &t!("tui.to"), focused).render(area, buf);
            }
        }
    }

    if let Some(error) = &form.error {
        Line::from(Span::styled(format!("  {error}"), theme::error_style()))
            .render(rows[FilterField::ALL.len()], buf);
    }
}

fn render_table(area: Rect, buf: &mut Buffer, app: &App) {
    let message_width = app.message_width;
    match app.slot.state() {
        FetchState::Failed(message) => {
            Line::from(Span::styled(
                format!("  {}", error_message(message)),
                theme::error_style(),
            ))
            .render(area, buf);
        }
        FetchState::Idle | FetchState::Loading => {
            SpinnerWidget::new(&app.spinner, LOADING_MESSAGE).render(area, buf);
        }
        FetchState::Loaded(page) if page.inferences.is_empty() => {
            Line::from(Span::styled(format!("  {EMPTY_MESSAGE}"), theme::dim_style()))
                .render(area, buf);
        }
        FetchState::Loaded(_) => {
            let Some(page) = app.table_page() else {
                return;
            };
            let (lines, cursor_line) = table_lines(&page, app.cursor, message_width);
            let height = area.height.saturating_sub(1) as usize;
            let scroll = cursor_line.saturating_sub(height.saturating_sub(1));
            Paragraph::new(lines)
                .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0))
                .render(
                    Rect::new(area.x, area.y, area.width, area.height.saturating_sub(1)),
                    buf,
                );
            let footer = Rect::new(area.x, area.y + area.height.saturating_sub(1), area.width, 1);
            Line::from(Span::styled(
                format!("  {}", page.pagination.label()),
                theme::dim_style(),
            ))
            .render(footer, buf);
        }
    }
}

/// All table lines plus the index of the line holding the cursor row.
fn table_lines(
    page: &TablePage,
    cursor: usize,
    message_width: usize,
) -> (Vec<Line<'static>>, usize) {
    let mut lines = Vec::new();
    let mut cursor_line = 0;
    for (idx, row) in page.rows.iter().enumerate() {
        if idx == cursor {
            cursor_line = lines.len();
        }
        lines.push(row_line(row, idx == cursor, message_width));
        if let Some(detail) = &row.detail {
            detail_lines(&mut lines, detail);
        }
    }
    (lines, cursor_line)
}

fn badge_span(badge: &Badge) -> Span<'static> {
    Span::styled(badge.text(), theme::badge_style(badge.variant, badge.tone))
}

fn row_line(row: &TableRow, selected: bool, message_width: usize) -> Line<'static> {
    let summary = &row.summary;
    let marker = if row.detail.is_some() { "▾" } else { "▸" };
    let base = if selected {
        theme::highlight_style()
    } else {
        Style::default()
    };
    let sep = || Span::styled(" │ ", theme::dim_style());

    let mut spans = vec![
        Span::styled(format!("  {marker} {}", summary.short_id), theme::title_style()),
        sep(),
        Span::raw(summary.task_name.clone()),
        sep(),
        badge_span(&summary.result),
        sep(),
        Span::raw(summary.user_id.clone()),
        sep(),
        Span::styled(summary.created_at.clone(), theme::dim_style()),
        sep(),
        Span::raw(truncate(&summary.prompt, message_width)),
    ];
    if let Some(label) = failed_label(summary.prompt_failed) {
        spans.push(Span::styled(format!(" [{label}]"), theme::error_style()));
    }
    spans.push(sep());
    spans.push(Span::raw(truncate(&summary.response, message_width)));
    if let Some(label) = failed_label(summary.response_failed) {
        spans.push(Span::styled(format!(" [{label}]"), theme::error_style()));
    }
    Line::from(spans).style(base)
}

fn detail_lines(lines: &mut Vec<Line<'static>>, detail: &DetailPanel) {
    panel_lines(lines, "Prompt Details", &detail.prompt);
    if let Some(response) = &detail.response {
        panel_lines(lines, "Response Details", response);
    }
}

fn panel_lines(lines: &mut Vec<Line<'static>>, title: &str, panel: &MessagePanel) {
    const INDENT: &str = "      ";
    lines.push(Line::from(Span::styled(
        format!("    {title}"),
        theme::heading_style(),
    )));
    lines.extend(
        panel
            .message
            .lines()
            .map(|text| Line::from(format!("{INDENT}{text}"))),
    );
    if let Some(tokens) = panel.tokens {
        lines.push(Line::from(Span::styled(
            format!("{INDENT}Tokens: {tokens}"),
            theme::dim_style(),
        )));
    }
    if let Some(context) = &panel.context {
        lines.push(Line::from(format!("{INDENT}Context:")));
        lines.extend(context.lines().map(|text| {
            Line::from(Span::styled(format!("{INDENT}  {text}"), theme::dim_style()))
        }));
    }
    lines.push(Line::from(format!("{INDENT}Rule Results:")));
    for rule in &panel.rules {
        let mut spans = vec![
            Span::raw(format!("{INDENT}  ")),
            Span::styled(
                rule.heading(),
                theme::badge_style(rule.badge.variant, rule.badge.tone),
            ),
        ];
        if let Some(toxicity) = &rule.toxicity {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                toxicity.text(),
                theme::badge_style(toxicity.variant, toxicity_tone(toxicity.variant)),
            ));
            if let Some(kind) = &toxicity.violation_type {
                spans.push(Span::styled(format!(" {kind}"), theme::dim_style()));
            }
        }
        lines.push(Line::from(spans));
        if let Some(message) = &rule.message {
            lines.push(Line::from(format!("{INDENT}      “{message}”")));
        }
        if let Some(section) = &rule.section {
            lines.push(Line::from(format!("{INDENT}      {}", section.title)));
            lines.extend(
                section
                    .lines
                    .iter()
                    .map(|item| Line::from(format!("{INDENT}        • {item}"))),
            );
        }
    }
}

fn toxicity_tone(variant: BadgeVariant) -> Tone {
    match variant {
        BadgeVariant::Secondary => Tone::Grey,
        _ => Tone::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ExternalInference, ExternalInferencePrompt, RuleStatus};
    use crate::view::ExpandedRows;

    fn inference(id: &str) -> ExternalInference {
        ExternalInference {
            id: id.into(),
            result: RuleStatus::Pass,
            created_at: 1_700_000_000,
            updated_at: 1_700_000_000,
            task_id: None,
            task_name: Some("support".into()),
            conversation_id: None,
            inference_prompt: ExternalInferencePrompt {
                id: format!("{id}-p"),
                inference_id: id.into(),
                result: RuleStatus::Pass,
                created_at: 1_700_000_000,
                updated_at: 1_700_000_000,
                message: "hello".into(),
                prompt_rule_results: Vec::new(),
                tokens: Some(3),
            },
            inference_response: None,
            inference_feedback: Vec::new(),
            user_id: None,
        }
    }

    #[test]
    fn cursor_line_accounts_for_expanded_rows() {
        let inferences = vec![inference("a"), inference("b")];
        let mut expanded = ExpandedRows::default();
        expanded.toggle("a");
        let page = TablePage::build(&inferences, 2, 0, 10, &expanded);

        let (lines, cursor_line) = table_lines(&page, 1, 20);
        assert!(lines.len() > 2);
        assert!(cursor_line > 1);
        assert_eq!(table_lines(&page, 0, 20).1, 0);
    }
}
