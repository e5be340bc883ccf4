//! In-memory modal session for tests.
//!
//! Emulates just enough of Neovim's behavior (insert/normal/visual/
//! command-line modes, hjkl motion) to drive the display end to end.

use super::{EditorSession, Position, SessionError};

const CTRL_V: &str = "\u{16}";

#[derive(Debug, Clone)]
pub(crate) struct ScriptedSession {
    lines: Vec<String>,
    row: usize,
    col: usize,
    mode: String,
    anchor: (usize, usize),
    cmd_type: String,
    cmd_line: String,
    pub(crate) calls: usize,
    pub(crate) unavailable: bool,
}

impl Default for ScriptedSession {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
            mode: "n".to_string(),
            anchor: (0, 0),
            cmd_type: String::new(),
            cmd_line: String::new(),
            calls: 0,
            unavailable: false,
        }
    }
}

impl ScriptedSession {
    pub(crate) fn with_text(text: &str) -> Self {
        let mut session = Self::default();
        session.load(text);
        session
    }

    fn load(&mut self, text: &str) {
        self.lines = text.split('\n').map(ToOwned::to_owned).collect();
        self.row = 0;
        self.col = 0;
    }

    fn check(&mut self) -> Result<(), SessionError> {
        self.calls += 1;
        if self.unavailable {
            return Err(SessionError::Unavailable("scripted session closed".to_string()));
        }
        Ok(())
    }

    fn line_len(&self) -> usize {
        self.lines[self.row].len()
    }

    fn clamp_normal_col(&mut self) {
        self.col = self.col.min(self.line_len().saturating_sub(1));
    }

    fn is_visual(&self) -> bool {
        matches!(self.mode.as_str(), "v" | "V") || self.mode == CTRL_V
    }

    fn toggle_visual(&mut self, mode: &str) {
        if self.mode == mode {
            self.mode = "n".to_string();
        } else {
            if !self.is_visual() {
                self.anchor = (self.row, self.col);
            }
            self.mode = mode.to_string();
        }
    }

    fn command_key(&mut self, key: &str) {
        match key {
            "<CR>" | "<Esc>" | "<C-c>" => {
                self.mode = "n".to_string();
                self.cmd_type.clear();
                self.cmd_line.clear();
            }
            "<BS>" => {
                if self.cmd_line.pop().is_none() {
                    self.mode = "n".to_string();
                    self.cmd_type.clear();
                }
            }
            "<lt>" => self.cmd_line.push('<'),
            other => self.cmd_line.push_str(other),
        }
    }

    fn insert_key(&mut self, key: &str) {
        match key {
            "<Esc>" | "<C-c>" => {
                self.mode = "n".to_string();
                self.col = self.col.saturating_sub(1);
                self.clamp_normal_col();
            }
            "<CR>" => {
                let rest = self.lines[self.row].split_off(self.col);
                self.lines.insert(self.row + 1, rest);
                self.row += 1;
                self.col = 0;
            }
            "<BS>" => {
                if self.col > 0 {
                    self.col -= 1;
                    self.lines[self.row].remove(self.col);
                }
            }
            other => {
                let text = if other == "<lt>" { "<" } else { other };
                self.lines[self.row].insert_str(self.col, text);
                self.col += text.len();
            }
        }
    }

    fn normal_key(&mut self, key: &str) {
        match key {
            "i" => self.mode = "i".to_string(),
            "a" => {
                self.col = (self.col + 1).min(self.line_len());
                self.mode = "i".to_string();
            }
            "h" => self.col = self.col.saturating_sub(1),
            "l" => {
                self.col += 1;
                self.clamp_normal_col();
            }
            "j" => {
                self.row = (self.row + 1).min(self.lines.len() - 1);
                self.clamp_normal_col();
            }
            "k" => {
                self.row = self.row.saturating_sub(1);
                self.clamp_normal_col();
            }
            "v" => self.toggle_visual("v"),
            "V" => self.toggle_visual("V"),
            "<C-v>" => self.toggle_visual(CTRL_V),
            "<Esc>" | "<C-c>" => self.mode = "n".to_string(),
            ":" | "/" | "?" => {
                self.mode = "c".to_string();
                self.cmd_type = key.to_string();
                self.cmd_line.clear();
            }
            _ => {}
        }
    }
}

impl EditorSession for ScriptedSession {
    fn set_text(&mut self, content: &str) -> Result<(), SessionError> {
        self.check()?;
        self.load(content);
        Ok(())
    }

    fn text(&mut self) -> Result<String, SessionError> {
        self.check()?;
        Ok(self.lines.join("\n"))
    }

    fn cursor_position(&mut self) -> Result<Position, SessionError> {
        self.check()?;
        Ok(Position::new(self.row + 1, self.col + 1))
    }

    fn cursor_anchor(&mut self) -> Result<Position, SessionError> {
        self.check()?;
        // Like line("v"), outside visual mode this is just the cursor.
        let (row, col) = if self.is_visual() {
            self.anchor
        } else {
            (self.row, self.col)
        };
        Ok(Position::new(row + 1, col + 1))
    }

    fn key_press(&mut self, key: &str) -> Result<(), SessionError> {
        self.check()?;
        match self.mode.as_str() {
            "c" => self.command_key(key),
            "i" => self.insert_key(key),
            _ => self.normal_key(key),
        }
        Ok(())
    }

    fn mode(&mut self) -> Result<String, SessionError> {
        self.check()?;
        Ok(self.mode.clone())
    }

    fn command_line(&mut self) -> Result<String, SessionError> {
        self.check()?;
        Ok(self.cmd_line.clone())
    }

    fn command_line_type(&mut self) -> Result<String, SessionError> {
        self.check()?;
        Ok(self.cmd_type.clone())
    }

    fn byte(&mut self, row: usize, col: usize) -> Result<usize, SessionError> {
        self.check()?;
        let start: usize = self
            .lines
            .iter()
            .take(row.saturating_sub(1))
            .map(|line| line.len() + 1)
            .sum();
        Ok((start + col).saturating_sub(1))
    }
}
