//! Colors for the view and status bar.

use ratatui::style::{Color, Modifier, Style};

use crate::app::ToastLevel;

/// Inverted cells: block cursor and visual selections.
pub fn highlight() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

pub fn status_bar() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

pub fn status_mode() -> Style {
    Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub fn toast(level: ToastLevel) -> (&'static str, Style) {
    match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
    }
}
