use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::sync::ViewState;
use crate::ui::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The complete application state.
///
/// Editing state belongs to the session; this is only the latest
/// mirrored view plus window-local concerns.
#[derive(Debug, Clone)]
pub struct Model {
    /// Last view pulled from the session
    pub view: ViewState,
    /// Visible slice of the buffer
    pub viewport: Viewport,
    /// File preloaded at startup, if any
    pub file_path: Option<PathBuf>,
    toast: Option<Toast>,
    pub should_quit: bool,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(None, (80, 24))
    }
}

impl Model {
    pub fn new(file_path: Option<PathBuf>, (width, height): (u16, u16)) -> Self {
        Self {
            view: ViewState::default(),
            viewport: Viewport::new(width, text_area_height(height), 1),
            file_path,
            toast: None,
            should_quit: false,
        }
    }

    /// Replace the mirrored view and scroll the caret into sight.
    pub(super) fn set_view(&mut self, view: ViewState) {
        let index = view.line_index();
        self.viewport.set_total_lines(index.line_count());
        self.viewport.ensure_visible(index.line_of(view.caret));
        self.view = view;
    }

    pub(super) fn resize(&mut self, width: u16, height: u16) {
        self.viewport.resize(width, text_area_height(height));
        let line = self.view.line_index().line_of(self.view.caret);
        self.viewport.ensure_visible(line);
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

/// Rows left for the text view once the status bar is placed.
pub const fn text_area_height(total_height: u16) -> u16 {
    total_height.saturating_sub(1)
}
