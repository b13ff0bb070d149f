use crate::view::{BadgeVariant, Tone};
use ratatui::style::{Color, Modifier, Style};

pub const PRIMARY: Color = Color::Cyan;
pub const ACCENT: Color = Color::Green;
pub const WARNING: Color = Color::Yellow;
pub const ERROR: Color = Color::Red;
pub const DIM: Color = Color::DarkGray;
pub const TEXT: Color = Color::White;

pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn heading_style() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn highlight_style() -> Style {
    Style::default().bg(Color::Rgb(40, 44, 52))
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn dim_style() -> Style {
    Style::default().fg(DIM)
}

pub fn input_style() -> Style {
    Style::default().fg(TEXT)
}

pub fn cursor_style() -> Style {
    Style::default().fg(Color::Black).bg(TEXT)
}

pub fn keybinding_style() -> Style {
    Style::default().fg(DIM)
}

/// Colors for a result badge.
pub fn badge_style(variant: BadgeVariant, tone: Tone) -> Style {
    let fg = match tone {
        Tone::Green => ACCENT,
        Tone::Red => ERROR,
        Tone::Yellow => WARNING,
        Tone::Grey => DIM,
    };
    match variant {
        BadgeVariant::Destructive => Style::default().fg(TEXT).bg(ERROR),
        BadgeVariant::Secondary => Style::default().fg(fg).add_modifier(Modifier::DIM),
        BadgeVariant::Outline => Style::default().fg(fg),
    }
}
