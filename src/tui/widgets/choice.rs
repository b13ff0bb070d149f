use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use super::super::theme;

/// One-of-many picker cycled with ←/→, shown on a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub items: Vec<String>,
    pub selected: usize,
}

impl Choice {
    pub fn new(items: Vec<String>) -> Self {
        Self { items, selected: 0 }
    }

    pub fn next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + self.items.len() - 1) % self.items.len();
        }
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.items.get(self.selected).map(String::as_str)
    }

    pub fn select(&mut self, value: &str) {
        self.selected = self.items.iter().position(|item| item == value).unwrap_or(0);
    }
}

pub struct ChoiceWidget<'a> {
    pub choice: &'a Choice,
    pub label: &'a str,
    pub focused: bool,
}

impl<'a> ChoiceWidget<'a> {
    pub fn new(choice: &'a Choice, label: &'a str, focused: bool) -> Self {
        Self {
            choice,
            label,
            focused,
        }
    }
}

impl Widget for ChoiceWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width < 6 {
            return;
        }
        let (label_style, value_style) = if self.focused {
            (theme::selected_style(), theme::selected_style())
        } else {
            (theme::dim_style(), theme::dim_style())
        };
        let value = self.choice.selected_value().unwrap_or_default();
        Line::from(vec![
            Span::styled(format!("  {:<10} ", self.label), label_style),
            Span::styled(format!("◂ {value} ▸"), value_style),
        ])
        .render(area, buf);
    }
}
