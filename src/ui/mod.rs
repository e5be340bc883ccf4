//! Terminal UI components.
//!
//! - [`viewport`]: which buffer lines are on screen
//! - [`style`]: inverted highlights and status colors
//! - the text view and status bar renderers

pub mod style;
pub mod viewport;

mod render;
mod status;

pub use render::{render, split_main_rows};
pub use status::command_line_cursor_column;
