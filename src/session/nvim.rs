use std::path::PathBuf;
use std::time::Duration;

use rmpv::Value;

use super::{EditorSession, Position, SessionError};
use crate::rpc::RpcClient;
use crate::rpc::codec::value_into_string;

/// How to launch the embedded Neovim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NvimOptions {
    pub program: PathBuf,
    /// Skip user config and plugins (`--clean`).
    pub clean: bool,
    pub timeout: Duration,
}

impl Default for NvimOptions {
    fn default() -> Self {
        Self {
            program: PathBuf::from("nvim"),
            clean: false,
            timeout: Duration::from_millis(2000),
        }
    }
}

impl NvimOptions {
    fn args(&self) -> Vec<&'static str> {
        // --headless keeps --embed from waiting for a UI to attach.
        let mut args = vec!["--embed", "--headless"];
        if self.clean {
            args.push("--clean");
        }
        args
    }
}

/// [`EditorSession`] backed by an embedded Neovim process.
pub struct NvimSession {
    rpc: RpcClient,
}

impl NvimSession {
    pub fn start(options: &NvimOptions) -> Result<Self, SessionError> {
        let rpc = RpcClient::spawn(&options.program, &options.args(), options.timeout)?;
        Ok(Self::with_client(rpc))
    }

    pub const fn with_client(rpc: RpcClient) -> Self {
        Self { rpc }
    }

    fn eval(&mut self, expr: &str) -> Result<Value, SessionError> {
        self.rpc.call("nvim_eval", vec![Value::from(expr)])
    }

    fn eval_int(&mut self, expr: &str) -> Result<i64, SessionError> {
        let value = self.eval(expr)?;
        value
            .as_i64()
            .ok_or_else(|| SessionError::Protocol(format!("`{expr}` returned {value}")))
    }

    fn eval_string(&mut self, expr: &str) -> Result<String, SessionError> {
        let value = self.eval(expr)?;
        let shown = value.to_string();
        value_into_string(value)
            .ok_or_else(|| SessionError::Protocol(format!("`{expr}` returned {shown}")))
    }

    fn first_window(&mut self) -> Result<Value, SessionError> {
        match self.rpc.call("nvim_list_wins", Vec::new())? {
            Value::Array(wins) => wins
                .into_iter()
                .next()
                .ok_or_else(|| SessionError::Protocol("session has no windows".to_string())),
            other => Err(SessionError::Protocol(format!(
                "nvim_list_wins returned {other}"
            ))),
        }
    }
}

impl EditorSession for NvimSession {
    fn set_text(&mut self, content: &str) -> Result<(), SessionError> {
        let lines: Vec<Value> = content.split('\n').map(Value::from).collect();
        self.rpc.call(
            "nvim_buf_set_lines",
            vec![
                Value::from(0),
                Value::from(0),
                Value::from(-1),
                Value::from(false),
                Value::Array(lines),
            ],
        )?;
        Ok(())
    }

    fn text(&mut self) -> Result<String, SessionError> {
        let value = self.rpc.call(
            "nvim_buf_get_lines",
            vec![
                Value::from(0),
                Value::from(0),
                Value::from(-1),
                Value::from(false),
            ],
        )?;
        let Value::Array(lines) = value else {
            return Err(SessionError::Protocol(
                "nvim_buf_get_lines returned a non-array".to_string(),
            ));
        };
        let lines = lines
            .into_iter()
            .map(|line| {
                value_into_string(line).ok_or_else(|| {
                    SessionError::Protocol("buffer line is not a string".to_string())
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lines.join("\n"))
    }

    fn cursor_position(&mut self) -> Result<Position, SessionError> {
        let window = self.first_window()?;
        let value = self.rpc.call("nvim_win_get_cursor", vec![window])?;
        let pair = value.as_array().map(|items| {
            (
                items.first().and_then(Value::as_u64),
                items.get(1).and_then(Value::as_u64),
            )
        });
        match pair {
            // The window cursor column is 0-based; positions are 1-based.
            Some((Some(row), Some(col))) => Ok(Position::new(to_usize(row)?, to_usize(col)? + 1)),
            _ => Err(SessionError::Protocol(format!(
                "nvim_win_get_cursor returned {value}"
            ))),
        }
    }

    fn cursor_anchor(&mut self) -> Result<Position, SessionError> {
        let row = self.eval_int("line(\"v\")")?;
        let col = self.eval_int("col(\"v\")")?;
        Ok(Position::new(
            usize::try_from(row).unwrap_or(0),
            usize::try_from(col).unwrap_or(0),
        ))
    }

    fn key_press(&mut self, key: &str) -> Result<(), SessionError> {
        self.rpc.call("nvim_input", vec![Value::from(key)])?;
        Ok(())
    }

    fn mode(&mut self) -> Result<String, SessionError> {
        self.eval_string("mode()")
    }

    fn command_line(&mut self) -> Result<String, SessionError> {
        self.eval_string("getcmdline()")
    }

    fn command_line_type(&mut self) -> Result<String, SessionError> {
        self.eval_string("getcmdtype()")
    }

    fn byte(&mut self, row: usize, col: usize) -> Result<usize, SessionError> {
        let line_start = self.eval_int(&format!("line2byte({row})"))?;
        Ok(offset_from_line_start(line_start, col))
    }
}

/// Flat 0-based byte offset from a `line2byte()` result and a 1-based
/// column.
///
/// `line2byte()` is 1-based and reports -1 for an empty or unloaded
/// buffer, which clamps to the start of the text.
pub fn offset_from_line_start(line2byte: i64, col: usize) -> usize {
    let start = usize::try_from(line2byte.saturating_sub(1)).unwrap_or(0);
    (start + col).saturating_sub(1)
}

fn to_usize(value: u64) -> Result<usize, SessionError> {
    usize::try_from(value).map_err(|_| SessionError::Protocol(format!("{value} out of range")))
}
