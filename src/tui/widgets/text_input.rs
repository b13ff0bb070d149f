use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use super::super::theme;

/// Single-line editable text with a byte-offset cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
    pub masked: bool,
}

impl TextInput {
    pub fn new(initial: &str) -> Self {
        Self {
            value: initial.to_string(),
            cursor: initial.len(),
            masked: false,
        }
    }

    /// Render every character as `*`.
    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn set(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.len();
    }

    pub fn insert(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.value[..self.cursor]
                .char_indices()
                .next_back()
                .map_or(0, |(i, _)| i);
            self.value.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.len() {
            let next = self.value[self.cursor..]
                .char_indices()
                .nth(1)
                .map_or(self.value.len(), |(i, _)| self.cursor + i);
            self.value.replace_range(self.cursor..next, "");
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.value[..self.cursor]
                .char_indices()
                .next_back()
                .map_or(0, |(i, _)| i);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.value.len() {
            self.cursor = self.value[self.cursor..]
                .char_indices()
                .nth(1)
                .map_or(self.value.len(), |(i, _)| self.cursor + i);
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Trimmed value, `None` when blank.
    pub fn text(&self) -> Option<String> {
        let trimmed = self.value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

pub struct TextInputWidget<'a> {
    pub input: &'a TextInput,
    pub label: &'a str,
    pub focused: bool,
}

impl<'a> TextInputWidget<'a> {
    pub fn new(input: &'a TextInput, label: &'a str, focused: bool) -> Self {
        Self {
            input,
            label,
            focused,
        }
    }
}

impl Widget for TextInputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width < 4 {
            return;
        }

        let label_style = if self.focused {
            theme::selected_style()
        } else {
            theme::dim_style()
        };
        let display_value = if self.input.masked {
            "*".repeat(self.input.value.chars().count())
        } else {
            self.input.value.clone()
        };
        let label = Span::styled(format!("  {:<10} ", self.label), label_style);

        let line = if self.focused {
            let (before, at_cursor, after) =
                split_at_cursor(&display_value, &self.input.value, self.input.cursor);
            Line::from(vec![
                label,
                Span::styled(before, theme::input_style()),
                Span::styled(at_cursor, theme::cursor_style()),
                Span::styled(after, theme::input_style()),
            ])
        } else {
            Line::from(vec![label, Span::styled(display_value, theme::dim_style())])
        };
        line.render(area, buf);
    }
}

/// Split `display` around the character the cursor of `value` sits on.
/// Masked input has a different byte layout than its display, so the
/// position is counted in characters of the real value.
fn split_at_cursor(display: &str, value: &str, cursor: usize) -> (String, String, String) {
    let chars: Vec<char> = display.chars().collect();
    let char_cursor = value[..cursor.min(value.len())].chars().count();

    let before: String = chars[..char_cursor.min(chars.len())].iter().collect();
    let at = chars
        .get(char_cursor)
        .map_or_else(|| " ".to_string(), char::to_string);
    let after: String = chars.iter().skip(char_cursor + 1).collect();
    (before, at, after)
}
