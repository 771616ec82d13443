use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyCode};
use tracing::trace;

use crate::domain::{Message, UtvConfig, UtvError};
use crate::model::Model;

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &UtvConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, UtvError> {
        if event::poll(Duration::from_millis(self.event_poll_time))?
            && let Event::Key(key) = event::read()?
            && key.kind == event::KeyEventKind::Press
        {
            // While the search box is open, keystrokes go to it untranslated.
            if model.raw_keyevents() {
                return Ok(Some(Message::RawKey(key)));
            }
            return Ok(self.handle_key(key));
        }
        Ok(None)
    }

    fn handle_key(&self, key: event::KeyEvent) -> Option<Message> {
        let message = match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Char('/') => Some(Message::EnterSearch),
            KeyCode::Left => Some(Message::SelectPreviousColumn),
            KeyCode::Right => Some(Message::SelectNextColumn),
            KeyCode::Char('s') | KeyCode::Enter => Some(Message::ToggleSort),
            KeyCode::Char('n') | KeyCode::PageDown => Some(Message::NextPage),
            KeyCode::Char('p') | KeyCode::PageUp => Some(Message::PreviousPage),
            KeyCode::Char('g') => Some(Message::FirstPage),
            KeyCode::Char('G') => Some(Message::LastPage),
            KeyCode::Char('+') => Some(Message::GrowPageSize),
            KeyCode::Char('-') => Some(Message::ShrinkPageSize),
            KeyCode::Char('y') => Some(Message::CopyPage),
            KeyCode::Char('?') => Some(Message::Help),
            KeyCode::Esc => Some(Message::Exit),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UtvConfig;
    use ratatui::crossterm::event::{KeyEvent, KeyModifiers};

    fn controller() -> Controller {
        Controller::new(&UtvConfig {
            url: String::new(),
            page_size: 5,
            fetch_timeout_secs: 10,
            event_poll_time: 100,
        })
    }

    #[test]
    fn table_keys_map_to_messages() {
        let c = controller();
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert!(matches!(c.handle_key(key(KeyCode::Char('q'))), Some(Message::Quit)));
        assert!(matches!(c.handle_key(key(KeyCode::Char('/'))), Some(Message::EnterSearch)));
        assert!(matches!(c.handle_key(key(KeyCode::Char('n'))), Some(Message::NextPage)));
        assert!(matches!(c.handle_key(key(KeyCode::PageUp)), Some(Message::PreviousPage)));
        assert!(matches!(c.handle_key(key(KeyCode::Enter)), Some(Message::ToggleSort)));
        assert!(matches!(c.handle_key(key(KeyCode::Char('x'))), None));
    }
}
