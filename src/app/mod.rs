//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The mirrored view plus window state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Forwarding keys to the session is the one side effect; it runs
//! after `update` and feeds the refreshed view back as a message.

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use effects::{FileLoadError, load_file};
pub use model::{Model, ToastLevel, text_area_height};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::input::KeyBinding;
use crate::session::NvimOptions;

/// Main application struct that owns the session and runs the event loop.
pub struct App {
    file_path: Option<PathBuf>,
    nvim: NvimOptions,
    quit_key: KeyBinding,
}

impl App {
    /// Create a new application, optionally preloading a file.
    pub fn new(file_path: Option<PathBuf>) -> Self {
        Self {
            file_path,
            nvim: NvimOptions::default(),
            quit_key: KeyBinding::default(),
        }
    }

    /// How to launch the embedded editor.
    pub fn with_nvim_options(mut self, options: NvimOptions) -> Self {
        self.nvim = options;
        self
    }

    /// Key that closes the window instead of being forwarded.
    pub const fn with_quit_key(mut self, key: KeyBinding) -> Self {
        self.quit_key = key;
        self
    }
}
