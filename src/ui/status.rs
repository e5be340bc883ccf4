use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::Model;
use crate::sync::StatusLine;

use super::style;

fn mode_label(status: &StatusLine) -> String {
    format!(" {} ", status.mode)
}

/// Mode, command-line type, and command-line content. The content is
/// only shown while a command-line type is set.
pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let status = &model.view.status;
    let mut spans = vec![Span::styled(mode_label(status), style::status_mode())];
    if !status.command_line_type.is_empty() {
        spans.push(Span::raw(" "));
        spans.push(Span::raw(status.command_line_type.clone()));
        if let Some(content) = &status.command_line {
            spans.push(Span::raw(content.clone()));
        }
    }
    let bar = Paragraph::new(Line::from(spans)).style(style::status_bar());
    frame.render_widget(bar, area);
}

/// Column just past the command-line content, where the terminal
/// cursor sits while a command line is being typed.
pub fn command_line_cursor_column(status: &StatusLine) -> u16 {
    let mut width = mode_label(status).width();
    if !status.command_line_type.is_empty() {
        width += 1 + status.command_line_type.width();
        width += status.command_line.as_deref().map_or(0, UnicodeWidthStr::width);
    }
    u16::try_from(width).unwrap_or(u16::MAX)
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = style::toast(level);
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
