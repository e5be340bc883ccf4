//! The remote editing session.
//!
//! All editing semantics live in an external modal editor. This module
//! exposes the handful of queries the display needs as the
//! [`EditorSession`] trait, so rendering never sees the wire protocol:
//!
//! - [`NvimSession`]: Neovim embedded over msgpack-RPC
//! - a scripted in-memory session used by the test suite

mod nvim;
#[cfg(test)]
pub(crate) mod scripted;

pub use nvim::{NvimOptions, NvimSession, offset_from_line_start};

use std::time::Duration;

use thiserror::Error;

/// A 1-based (row, column) position inside the session buffer.
///
/// Columns count bytes within the line, matching what the session
/// reports for both the cursor and the visual anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Failures talking to the session. Every variant is fatal to the
/// operation that raised it.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("editor session unavailable: {0}")]
    Unavailable(String),
    #[error("editor session did not answer `{method}` within {timeout:?}")]
    Timeout { method: String, timeout: Duration },
    #[error("editor session rejected `{method}`: {message}")]
    Remote { method: String, message: String },
    #[error("malformed reply from editor session: {0}")]
    Protocol(String),
}

/// Typed operations against a modal editing session.
///
/// Implementors own all buffer and mode state; callers only observe it.
pub trait EditorSession {
    /// Replace the whole buffer, one line per `\n`-separated segment.
    fn set_text(&mut self, content: &str) -> Result<(), SessionError>;

    /// The whole buffer with lines joined by `\n`.
    fn text(&mut self) -> Result<String, SessionError>;

    /// Primary cursor of the first window.
    fn cursor_position(&mut self) -> Result<Position, SessionError>;

    /// Opposite end of the visual selection. Stale outside visual and
    /// select modes.
    fn cursor_anchor(&mut self) -> Result<Position, SessionError>;

    /// Feed one key, in Neovim key notation, into the input stream.
    fn key_press(&mut self, key: &str) -> Result<(), SessionError>;

    fn mode(&mut self) -> Result<String, SessionError>;

    /// In-progress command-line text, empty when none is active.
    fn command_line(&mut self) -> Result<String, SessionError>;

    /// Command-line type indicator (`:`, `/`, `?`, ...), empty when none is active.
    fn command_line_type(&mut self) -> Result<String, SessionError>;

    /// Flat 0-based byte offset of a 1-based (row, col) position.
    fn byte(&mut self, row: usize, col: usize) -> Result<usize, SessionError>;
}
