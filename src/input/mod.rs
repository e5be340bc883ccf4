//! Keyboard input.
//!
//! Terminal key events are forwarded to the session in Neovim key
//! notation (`a`, `<lt>`, `<CR>`, `<C-w>`). One configurable binding is
//! reserved for closing the window and never forwarded.

use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown key `{0}` (try `esc`, `ctrl-q` or `f10`)")]
pub struct KeyBindingError(String);

/// A single key with modifiers, parsed from names like `esc`, `ctrl-q`
/// or `alt-f4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    code: KeyCode,
    modifiers: KeyModifiers,
}

impl KeyBinding {
    pub const ESCAPE: Self = Self {
        code: KeyCode::Esc,
        modifiers: KeyModifiers::NONE,
    };

    pub fn matches(&self, key: &KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        let relevant = KeyModifiers::CONTROL | KeyModifiers::ALT;
        let code = match key.code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        code == self.code && (key.modifiers & relevant) == self.modifiers
    }
}

impl Default for KeyBinding {
    fn default() -> Self {
        Self::ESCAPE
    }
}

impl FromStr for KeyBinding {
    type Err = KeyBindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let mut modifiers = KeyModifiers::NONE;
        let mut rest = lowered.as_str();
        loop {
            if let Some(tail) = rest.strip_prefix("ctrl-").or_else(|| rest.strip_prefix("c-")) {
                modifiers |= KeyModifiers::CONTROL;
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("alt-").or_else(|| rest.strip_prefix("m-")) {
                modifiers |= KeyModifiers::ALT;
                rest = tail;
            } else {
                break;
            }
        }

        let code = match rest {
            "esc" | "escape" => KeyCode::Esc,
            "enter" | "cr" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "backspace" | "bs" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "space" => KeyCode::Char(' '),
            f if f.len() > 1 && f.starts_with('f') => f[1..]
                .parse::<u8>()
                .ok()
                .filter(|n| (1..=24).contains(n))
                .map(KeyCode::F)
                .ok_or_else(|| KeyBindingError(s.to_string()))?,
            single if single.chars().count() == 1 => {
                KeyCode::Char(single.chars().next().unwrap_or(' '))
            }
            _ => return Err(KeyBindingError(s.to_string())),
        };
        Ok(Self { code, modifiers })
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("ctrl-")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("alt-")?;
        }
        match self.code {
            KeyCode::Esc => f.write_str("esc"),
            KeyCode::Enter => f.write_str("enter"),
            KeyCode::Tab => f.write_str("tab"),
            KeyCode::Backspace => f.write_str("backspace"),
            KeyCode::Delete => f.write_str("delete"),
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::F(n) => write!(f, "f{n}"),
            _ => f.write_str("?"),
        }
    }
}

/// Translate a key event into Neovim key notation.
///
/// Returns `None` for releases and for keys that produce no input
/// (bare modifiers, media keys, lock keys).
pub fn to_nvim_notation(key: &KeyEvent) -> Option<String> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    if let KeyCode::Char(c) = key.code {
        if !ctrl && !alt {
            return Some(if c == '<' {
                "<lt>".to_string()
            } else {
                c.to_string()
            });
        }
        let name = match c {
            ' ' => "Space".to_string(),
            '<' => "lt".to_string(),
            c if ctrl => c.to_ascii_lowercase().to_string(),
            c => c.to_string(),
        };
        return Some(bracketed(&name, ctrl, alt, false));
    }

    let name = match key.code {
        KeyCode::Enter => "CR".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => return Some(bracketed("Tab", ctrl, alt, true)),
        KeyCode::Backspace => "BS".to_string(),
        KeyCode::Delete => "Del".to_string(),
        KeyCode::Insert => "Insert".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => return None,
    };
    Some(bracketed(&name, ctrl, alt, shift))
}

fn bracketed(name: &str, ctrl: bool, alt: bool, shift: bool) -> String {
    let mut out = String::from("<");
    if shift {
        out.push_str("S-");
    }
    if ctrl {
        out.push_str("C-");
    }
    if alt {
        out.push_str("M-");
    }
    out.push_str(name);
    out.push('>');
    out
}
