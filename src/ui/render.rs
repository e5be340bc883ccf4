use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthChar;

use crate::app::Model;
use crate::sync::{LineIndex, ModeKind, ViewState};

use super::{status, style};

/// Split the window into the text view and the one-row status bar.
pub fn split_main_rows(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area)
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let chunks = split_main_rows(frame.area());
    let (text_area, status_area) = (chunks[0], chunks[1]);

    let index = model.view.line_index();
    render_text(model, &index, frame, text_area);
    status::render_status_bar(model, frame, status_area);

    if model.active_toast().is_some() && text_area.height > 0 {
        let toast_area = Rect::new(
            text_area.x,
            text_area.y + text_area.height - 1,
            text_area.width,
            1,
        );
        status::render_toast_bar(model, frame, toast_area);
    }

    if model.view.mode == ModeKind::CommandLine {
        let x = status_area.x
            + status::command_line_cursor_column(&model.view.status)
                .min(status_area.width.saturating_sub(1));
        frame.set_cursor_position((x, status_area.y));
    } else if let Some((x, y)) = caret_cell(model, &index, text_area) {
        frame.set_cursor_position((x, y));
    }
}

fn render_text(model: &Model, index: &LineIndex, frame: &mut Frame, area: Rect) {
    let lines: Vec<&str> = model.view.text.split('\n').collect();
    let rendered: Vec<Line> = model
        .viewport
        .visible_range()
        .filter_map(|line| {
            let text = lines.get(line)?;
            Some(styled_line(&model.view, index.line_start(line), text))
        })
        .collect();
    frame.render_widget(Paragraph::new(rendered), area);
}

fn is_highlighted(view: &ViewState, offset: usize) -> bool {
    view.highlights.iter().any(|range| range.contains(&offset))
}

/// One buffer line with highlighted runs inverted. A highlight over
/// the line break shows as one inverted blank cell.
fn styled_line(view: &ViewState, line_start: usize, text: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_highlighted = false;
    let mut end = line_start;

    for (i, c) in text.chars().enumerate() {
        let offset = line_start + i;
        let highlighted = is_highlighted(view, offset);
        if highlighted != run_highlighted && !run.is_empty() {
            spans.push(span_for(std::mem::take(&mut run), run_highlighted));
        }
        run_highlighted = highlighted;
        run.push(printable(c));
        end = offset + 1;
    }
    if !run.is_empty() {
        spans.push(span_for(run, run_highlighted));
    }
    if is_highlighted(view, end) {
        spans.push(Span::styled(" ", style::highlight()));
    }
    Line::from(spans)
}

fn span_for(text: String, highlighted: bool) -> Span<'static> {
    if highlighted {
        Span::styled(text, style::highlight())
    } else {
        Span::raw(text)
    }
}

/// Tabs and control characters take one blank cell so columns stay
/// predictable.
fn printable(c: char) -> char {
    if c.is_control() { ' ' } else { c }
}

fn caret_cell(model: &Model, index: &LineIndex, area: Rect) -> Option<(u16, u16)> {
    let caret = model.view.caret;
    let line = index.line_of(caret);
    let offset = model.viewport.offset();
    if line < offset {
        return None;
    }
    let row = u16::try_from(line - offset).ok()?;
    if row >= area.height {
        return None;
    }
    let width: usize = model
        .view
        .text
        .chars()
        .skip(index.line_start(line))
        .take(caret.saturating_sub(index.line_start(line)))
        .map(|c| printable(c).width().unwrap_or(0))
        .sum();
    let col = u16::try_from(width)
        .unwrap_or(u16::MAX)
        .min(area.width.saturating_sub(1));
    Some((area.x + col, area.y + row))
}
