/// Rendering class of a session mode code.
///
/// The session owns the mode and its transitions; this only decides
/// which highlight to draw for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    /// Normal and operator-pending: block cursor.
    NormalLike,
    /// `v` and select `s`.
    VisualChar,
    /// `V` and select `S`.
    VisualLine,
    /// `CTRL-V` and select `CTRL-S`.
    VisualBlock,
    /// Insert, replace, and prompts waiting for a key: caret only.
    InsertLike,
    CommandLine,
    /// Terminal, shell, and anything not yet known: caret only.
    Other,
}

impl ModeKind {
    /// Classify a `mode()` code.
    pub fn classify(mode: &str) -> Self {
        let mut chars = mode.chars();
        match chars.next() {
            Some('n') => Self::NormalLike,
            Some('v' | 's') => Self::VisualChar,
            Some('V' | 'S') => Self::VisualLine,
            Some('\u{16}' | '\u{13}') => Self::VisualBlock,
            Some('i' | 'R' | 'r') => Self::InsertLike,
            Some('c') => Self::CommandLine,
            _ => Self::Other,
        }
    }

    pub const fn is_visual(self) -> bool {
        matches!(self, Self::VisualChar | Self::VisualLine | Self::VisualBlock)
    }

    pub const fn shows_block_cursor(self) -> bool {
        matches!(self, Self::NormalLike)
    }
}

/// Printable form of a mode code, with control characters in caret
/// notation (`^V`).
pub fn display_mode(mode: &str) -> String {
    let mut out = String::with_capacity(mode.len());
    for c in mode.chars() {
        if c.is_ascii_control() {
            out.push('^');
            out.push(char::from(u8::try_from(c).unwrap_or(b'?') ^ 0x40));
        } else {
            out.push(c);
        }
    }
    out
}
