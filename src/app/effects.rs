use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::app::{App, Message, Model, ToastLevel, update};
use crate::session::{EditorSession, SessionError};
use crate::sync::Synchronizer;

/// The startup file could not be loaded. Not fatal: the session starts
/// with an empty buffer.
#[derive(Debug, Error)]
pub enum FileLoadError {
    #[error("Cannot open file \"{}\": not a regular file", .0.display())]
    NotAFile(PathBuf),
    #[error("Cannot open file \"{}\": {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot open file \"{}\": not valid UTF-8", .0.display())]
    NotUtf8(PathBuf),
}

/// Read a file for preloading.
///
/// A path that does not exist yet is not an error and yields `None`.
/// One trailing newline is dropped, as editors do when reading a file.
pub fn load_file(path: &Path) -> Result<Option<String>, FileLoadError> {
    if !path.exists() {
        return Ok(None);
    }
    if !path.is_file() {
        return Err(FileLoadError::NotAFile(path.to_path_buf()));
    }
    let bytes = std::fs::read(path).map_err(|source| FileLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut text =
        String::from_utf8(bytes).map_err(|_| FileLoadError::NotUtf8(path.to_path_buf()))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(Some(text))
}

impl App {
    /// Preload the startup file and take the first snapshot.
    pub(super) fn start<S: EditorSession>(
        &self,
        sync: &mut Synchronizer<S>,
        size: (u16, u16),
    ) -> Result<Model, SessionError> {
        let mut model = Model::new(self.file_path.clone(), size);

        if let Some(path) = &self.file_path {
            match load_file(path) {
                Ok(Some(text)) => {
                    sync.load_text(&text)?;
                    tracing::debug!(path = %path.display(), bytes = text.len(), "file preloaded");
                }
                Ok(None) => {
                    model.show_toast(ToastLevel::Info, format!("New file {}", path.display()));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "file load failed");
                    model.show_toast(ToastLevel::Warning, err.to_string());
                }
            }
        }

        let view = sync.repaint()?;
        Ok(update(model, Message::Refreshed(view)))
    }

    /// Run `update` and then the message's side effect, if any.
    pub(super) fn dispatch<S: EditorSession>(
        sync: &mut Synchronizer<S>,
        model: &mut Model,
        msg: Message,
    ) -> Result<(), SessionError> {
        crate::perf::log_event("event.message", format!("msg={msg:?}"));
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        Self::handle_message_side_effects(sync, model, &side_msg)
    }

    pub(super) fn handle_message_side_effects<S: EditorSession>(
        sync: &mut Synchronizer<S>,
        model: &mut Model,
        msg: &Message,
    ) -> Result<(), SessionError> {
        if let Message::Key(key) = msg {
            let view = sync.key_press(key)?;
            *model = update(std::mem::take(model), Message::Refreshed(view));
        }
        Ok(())
    }
}
