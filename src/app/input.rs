use crossterm::event::{Event, KeyEvent};

use crate::app::{App, Message};
use crate::input::to_nvim_notation;

impl App {
    pub(super) fn handle_event(&self, event: &Event) -> Option<Message> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(w, h) => Some(Message::Resize(*w, *h)),
            _ => None,
        }
    }

    /// The quit binding closes the window; every other key that
    /// produces input goes to the session.
    pub(super) fn handle_key(&self, key: &KeyEvent) -> Option<Message> {
        if self.quit_key.matches(key) {
            return Some(Message::Quit);
        }
        to_nvim_notation(key).map(Message::Key)
    }
}
