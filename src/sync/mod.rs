//! Display synchronization.
//!
//! After every forwarded key the whole session state is pulled into a
//! [`Snapshot`], and [`ViewState::from_snapshot`] maps it to what the
//! view draws: text, caret, highlight ranges and status fields. The
//! mapping is pure, so repainting without an intervening key always
//! yields the same [`ViewState`].

mod mode;
mod selection;

pub use mode::{ModeKind, display_mode};
pub use selection::{
    LineIndex, block_cursor, block_selection, char_offset, char_selection, line_selection,
    selection_span,
};

use std::ops::Range;

use crate::session::{EditorSession, Position, SessionError};

/// Visual selection anchor and its flat byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub position: Position,
    pub byte: usize,
}

/// Everything read from the session for one repaint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub text: String,
    pub mode: String,
    pub cursor: Position,
    pub cursor_byte: usize,
    /// Only read in visual and select modes.
    pub anchor: Option<Anchor>,
    pub command_line_type: String,
    pub command_line: String,
}

/// Read the full session state.
pub fn pull<S: EditorSession + ?Sized>(session: &mut S) -> Result<Snapshot, SessionError> {
    let _scope = crate::perf::scope("sync.pull");
    let text = session.text()?;
    let mode = session.mode()?;
    let cursor = session.cursor_position()?;
    let cursor_byte = session.byte(cursor.row, cursor.col)?;

    let anchor = if ModeKind::classify(&mode).is_visual() {
        let position = session.cursor_anchor()?;
        if position.row > 0 {
            let byte = session.byte(position.row, position.col.max(1))?;
            Some(Anchor { position, byte })
        } else {
            None
        }
    } else {
        None
    };

    Ok(Snapshot {
        text,
        mode,
        cursor,
        cursor_byte,
        anchor,
        command_line_type: session.command_line_type()?,
        command_line: session.command_line()?,
    })
}

/// The three status bar fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusLine {
    pub mode: String,
    pub command_line_type: String,
    /// Hidden (`None`) whenever the command-line type is empty.
    pub command_line: Option<String>,
}

impl StatusLine {
    pub fn new(mode: &str, command_line_type: &str, command_line: &str) -> Self {
        Self {
            mode: display_mode(mode),
            command_line_type: command_line_type.to_string(),
            command_line: (!command_line_type.is_empty()).then(|| command_line.to_string()),
        }
    }
}

/// What the text view and status bar show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub text: String,
    /// Caret as a char offset into `text`.
    pub caret: usize,
    /// Inverted ranges, as char offsets into `text`.
    pub highlights: Vec<Range<usize>>,
    pub mode: ModeKind,
    pub status: StatusLine,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            text: String::new(),
            caret: 0,
            highlights: Vec::new(),
            mode: ModeKind::Other,
            status: StatusLine::default(),
        }
    }
}

impl ViewState {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let text = snapshot.text.clone();
        let index = LineIndex::new(&text);
        let caret = char_offset(&text, snapshot.cursor_byte);
        let mode = ModeKind::classify(&snapshot.mode);

        let highlights = match (mode, snapshot.anchor) {
            (kind, _) if kind.shows_block_cursor() => block_cursor(&index, caret).into_iter().collect(),
            (ModeKind::VisualChar, Some(anchor)) => {
                char_selection(&index, caret, char_offset(&text, anchor.byte))
                    .into_iter()
                    .collect()
            }
            (ModeKind::VisualLine, Some(anchor)) => {
                line_selection(&index, caret, char_offset(&text, anchor.byte))
                    .into_iter()
                    .collect()
            }
            (ModeKind::VisualBlock, Some(anchor)) => {
                block_selection(&text, &index, snapshot.cursor, anchor.position)
            }
            _ => Vec::new(),
        };

        Self {
            status: StatusLine::new(
                &snapshot.mode,
                &snapshot.command_line_type,
                &snapshot.command_line,
            ),
            text,
            caret,
            highlights,
            mode,
        }
    }

    pub fn line_index(&self) -> LineIndex {
        LineIndex::new(&self.text)
    }
}

/// Drives a session and mirrors it into [`ViewState`]s.
pub struct Synchronizer<S: EditorSession> {
    session: S,
}

impl<S: EditorSession> Synchronizer<S> {
    pub const fn new(session: S) -> Self {
        Self { session }
    }

    /// Replace the session buffer before the first render.
    pub fn load_text(&mut self, text: &str) -> Result<(), SessionError> {
        self.session.set_text(text)
    }

    /// Forward one key and repaint.
    pub fn key_press(&mut self, key: &str) -> Result<ViewState, SessionError> {
        tracing::debug!(key, "forwarding key");
        self.session.key_press(key)?;
        self.repaint()
    }

    /// Re-read the session and rebuild the view. No side effects on
    /// the session.
    pub fn repaint(&mut self) -> Result<ViewState, SessionError> {
        let snapshot = pull(&mut self.session)?;
        let view = ViewState::from_snapshot(&snapshot);
        crate::perf::log_event(
            "sync.repaint",
            format!(
                "mode={:?} caret={} highlights={:?}",
                snapshot.mode, view.caret, view.highlights
            ),
        );
        Ok(view)
    }

    pub const fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::scripted::ScriptedSession;

    fn synced(text: &str) -> Synchronizer<ScriptedSession> {
        let mut sync = Synchronizer::new(ScriptedSession::default());
        sync.load_text(text).unwrap();
        sync
    }

    fn snapshot_in(mode: &str, text: &str, cursor_byte: usize, anchor_byte: usize) -> Snapshot {
        Snapshot {
            text: text.to_string(),
            mode: mode.to_string(),
            cursor: Position::new(1, cursor_byte + 1),
            cursor_byte,
            anchor: Some(Anchor {
                position: Position::new(1, anchor_byte + 1),
                byte: anchor_byte,
            }),
            ..Snapshot::default()
        }
    }

    #[test]
    fn test_initial_render_shows_block_cursor_on_first_char() {
        let mut sync = synced("abc\ndef");
        let view = sync.repaint().unwrap();
        assert_eq!(view.text, "abc\ndef");
        assert_eq!(view.line_index().line_count(), 2);
        assert_eq!(view.caret, 0);
        assert_eq!(view.mode, ModeKind::NormalLike);
        assert_eq!(view.highlights, vec![0..1]);
        assert_eq!(&view.text[view.highlights[0].clone()], "a");
    }

    #[test]
    fn test_insert_replaces_block_cursor_with_caret() {
        let mut sync = synced("abc\ndef");
        sync.key_press("i").unwrap();
        let view = sync.key_press("X").unwrap();
        assert_eq!(view.text, "Xabc\ndef");
        assert_eq!(view.mode, ModeKind::InsertLike);
        assert!(view.highlights.is_empty());
        assert_eq!(view.caret, 1);
    }

    #[test]
    fn test_linewise_visual_covers_both_lines_contiguously() {
        let mut sync = synced("abc\ndef");
        sync.key_press("V").unwrap();
        let view = sync.key_press("j").unwrap();
        assert_eq!(view.mode, ModeKind::VisualLine);
        assert_eq!(view.highlights, vec![0..7]);
    }

    #[test]
    fn test_charwise_visual_includes_both_ends() {
        let mut sync = synced("abc\ndef");
        sync.key_press("l").unwrap();
        sync.key_press("v").unwrap();
        let view = sync.key_press("j").unwrap();
        // anchor on 'b', cursor on 'e'
        assert_eq!(view.highlights, vec![1..6]);
    }

    #[test]
    fn test_blockwise_visual_highlights_columns() {
        let mut sync = synced("abc\ndef");
        sync.key_press("<C-v>").unwrap();
        sync.key_press("l").unwrap();
        let view = sync.key_press("j").unwrap();
        assert_eq!(view.mode, ModeKind::VisualBlock);
        assert_eq!(view.status.mode, "^V");
        assert_eq!(view.highlights, vec![0..2, 4..6]);
    }

    #[test]
    fn test_repaint_is_idempotent() {
        let mut sync = synced("abc\ndef");
        sync.key_press("v").unwrap();
        sync.key_press("l").unwrap();
        let first = sync.repaint().unwrap();
        let second = sync.repaint().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_command_line_status_fields() {
        let mut sync = synced("abc");
        let view = sync.key_press(":").unwrap();
        assert_eq!(view.mode, ModeKind::CommandLine);
        assert!(view.highlights.is_empty());
        assert_eq!(view.status.command_line_type, ":");
        assert_eq!(view.status.command_line.as_deref(), Some(""));

        sync.key_press("w").unwrap();
        let view = sync.key_press("q").unwrap();
        assert_eq!(view.status.command_line.as_deref(), Some("wq"));

        let view = sync.key_press("<Esc>").unwrap();
        assert_eq!(view.status.command_line_type, "");
        assert_eq!(view.status.command_line, None);
    }

    #[test]
    fn test_anchor_is_not_read_outside_visual_modes() {
        let mut session = ScriptedSession::with_text("abc");
        let snapshot = pull(&mut session).unwrap();
        assert_eq!(snapshot.anchor, None);
    }

    #[test]
    fn test_unavailable_session_propagates() {
        let mut sync = synced("abc");
        sync.session_mut().unavailable = true;
        assert!(matches!(sync.repaint(), Err(SessionError::Unavailable(_))));
        assert!(matches!(sync.key_press("x"), Err(SessionError::Unavailable(_))));
    }

    #[test]
    fn test_unknown_mode_draws_no_highlight() {
        let view = ViewState::from_snapshot(&snapshot_in("future", "abc", 1, 1));
        assert_eq!(view.mode, ModeKind::Other);
        assert!(view.highlights.is_empty());
        assert_eq!(view.caret, 1);
    }

    #[test]
    fn test_zero_width_visual_span_is_one_character() {
        let view = ViewState::from_snapshot(&snapshot_in("v", "abcdefgh", 5, 5));
        assert_eq!(view.highlights, vec![5..6]);
        assert!(view.highlights.iter().all(|r| r.start <= r.end));
    }

    #[test]
    fn test_visual_mode_without_anchor_draws_nothing() {
        let mut snapshot = snapshot_in("v", "abc", 1, 1);
        snapshot.anchor = None;
        assert!(ViewState::from_snapshot(&snapshot).highlights.is_empty());
    }

    #[test]
    fn test_block_cursor_on_empty_buffer_is_omitted() {
        let view = ViewState::from_snapshot(&snapshot_in("n", "", 0, 0));
        assert!(view.highlights.is_empty());
    }

    #[test]
    fn test_repaint_does_not_forward_keys() {
        let mut sync = synced("abc");
        sync.repaint().unwrap();
        let before = sync.session().calls;
        let view = sync.repaint().unwrap();
        // text, mode, cursor, byte, cmdtype, cmdline
        assert_eq!(sync.session().calls - before, 6);
        assert_eq!(view.mode, ModeKind::NormalLike);
    }
}
