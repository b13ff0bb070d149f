use arthur_console::api::{RuleResponse, TaskResponse, ValidationResult};
use arthur_console::ui::style;
use arthur_console::view::{DetailSection, RuleLine, format_date, styled_badge};

pub fn task_line(task: &TaskResponse) -> String {
    format!(
        "{}  {}  {}",
        style::cyan(&task.id),
        style::header(&task.name),
        style::dim(format!(
            "{} rules · created {}",
            task.rules.len(),
            format_date(task.created_at)
        ))
    )
}

pub fn rule_line(rule: &RuleResponse) -> String {
    let targets = match (rule.apply_to_prompt, rule.apply_to_response) {
        (true, true) => "prompt+response",
        (true, false) => "prompt",
        (false, true) => "response",
        (false, false) => "none",
    };
    let state = match rule.enabled {
        Some(false) => style::dim("disabled"),
        _ => style::value("enabled"),
    };
    format!(
        "  {}  {}  {}  {}  {}",
        style::cyan(&rule.id),
        rule.name,
        style::yellow(rule.rule_type),
        style::dim(targets),
        state
    )
}

pub fn task_detail(task: &TaskResponse) -> Vec<String> {
    let mut lines = vec![task_line(task), String::new()];
    if task.rules.is_empty() {
        lines.push(style::dim(t!("tasks.no_rules")));
    } else {
        lines.push(style::header(t!("tasks.rules")));
        lines.extend(task.rules.iter().map(rule_line));
    }
    lines
}

pub fn validation_lines(result: &ValidationResult) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(id) = &result.inference_id {
        lines.push(format!("{} {}", t!("validate.inference"), style::cyan(id)));
    }
    let rules = result.rule_results.as_deref().unwrap_or_default();
    if rules.is_empty() {
        lines.push(style::dim(t!("validate.no_results")));
    }
    for rule in rules {
        let line = RuleLine::from_result(rule);
        let heading = format!("  {} {}", styled_badge(&line.badge), line.name);
        lines.push(match &line.toxicity {
            Some(toxicity) => format!("{heading} {}", toxicity.text()),
            None => heading,
        });
        if let Some(message) = &line.message {
            lines.push(format!("      “{message}”"));
        }
        if let Some(DetailSection { title, lines: items }) = &line.section {
            lines.push(format!("      {title}"));
            lines.extend(items.iter().map(|item| format!("        • {item}")));
        }
    }
    lines
}
