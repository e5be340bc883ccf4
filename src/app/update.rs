use crate::app::Model;
use crate::sync::ViewState;

/// All possible events and actions in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Forward a key, in Neovim notation, to the session
    Key(String),
    /// The session state was re-read
    Refreshed(ViewState),
    /// Terminal resized
    Resize(u16, u16),
    /// Close the window
    Quit,
}

/// Pure state transition.
///
/// Talking to the session is a side effect and happens outside, in
/// `App::handle_message_side_effects`, which feeds the resulting view
/// back in as [`Message::Refreshed`].
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::Key(_) => {}
        Message::Refreshed(view) => model.set_view(view),
        Message::Resize(width, height) => model.resize(width, height),
        Message::Quit => model.should_quit = true,
    }
    model
}
