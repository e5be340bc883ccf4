// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. session::SessionError)
    clippy::module_name_repetitions
)]

//! # Embedit
//!
//! A terminal text view whose editing is done by an embedded Neovim.
//!
//! Keys typed in the window are forwarded to `nvim --embed` over
//! msgpack-RPC. After every key the buffer, cursor, selection, mode, and
//! command line are read back and mirrored into the view.
//!
//! ## Architecture
//!
//! Embedit uses The Elm Architecture (TEA) pattern:
//! - **Model**: The last mirrored view plus window state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`session`]: The editor session contract and its Neovim backend
//! - [`rpc`]: msgpack-RPC transport to the child process
//! - [`sync`]: Snapshot pull, mode classification, and selection ranges
//! - [`ui`]: Terminal UI components
//! - [`input`]: Key translation and the quit binding
//! - [`config`]: Saved default flags
//! - [`perf`]: Timing scopes and the debug event log

pub mod app;
pub mod config;
pub mod input;
pub mod perf;
pub mod rpc;
pub mod session;
pub mod sync;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::session::{EditorSession, NvimOptions, NvimSession, SessionError};
    pub use crate::sync::{Synchronizer, ViewState};
    pub use crate::ui::viewport::Viewport;
}
