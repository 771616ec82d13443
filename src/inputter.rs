use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Line editor for the search box. Every edit is reported with `changed`
/// set so the model can re-filter on each keystroke; Enter keeps the query
/// and leaves search mode, Esc cancels and clears it.
#[derive(Default)]
pub struct SearchInput {
    current_input: String,
    cursor_pos: usize, // in chars, not bytes
    finished: bool,
    canceled: bool,
}

#[derive(Default, Clone, Debug)]
pub struct InputResult {
    pub input: String,
    pub cursor_pos: usize,
    pub changed: bool,
    pub finished: bool,
    pub canceled: bool,
}

impl SearchInput {
    pub fn read(&mut self, key: KeyEvent) -> InputResult {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, KeyModifiers::NONE) => self.enter(),
            (KeyCode::Esc, KeyModifiers::NONE) => self.escape(),
            (KeyCode::Backspace, KeyModifiers::NONE) => self.backspace(),
            (KeyCode::Left, KeyModifiers::NONE) => self.left(),
            (KeyCode::Right, KeyModifiers::NONE) => self.right(),
            (KeyCode::Home, KeyModifiers::NONE) => self.home(),
            (KeyCode::End, KeyModifiers::NONE) => self.end(),
            (kc, km) => self.key(kc, km),
        }
    }

    pub fn get(&self) -> InputResult {
        self.result(false)
    }

    /// Seed the editor with an existing query, cursor at the end.
    pub fn set(&mut self, s: &str) {
        self.current_input = s.to_string();
        self.cursor_pos = self.current_input.chars().count();
    }

    pub fn clear(&mut self) {
        self.canceled = false;
        self.finished = false;
        self.current_input.clear();
        self.cursor_pos = 0;
    }

    fn result(&self, changed: bool) -> InputResult {
        InputResult {
            input: self.current_input.clone(),
            cursor_pos: self.cursor_pos,
            changed,
            finished: self.finished,
            canceled: self.canceled,
        }
    }

    fn enter(&mut self) -> InputResult {
        self.finished = true;
        self.result(false)
    }

    fn escape(&mut self) -> InputResult {
        self.clear();
        self.canceled = true;
        self.finished = true;
        self.result(true)
    }

    fn backspace(&mut self) -> InputResult {
        if self.cursor_pos > 0 {
            self.cursor_pos -= 1;
            let pos = self.byte_pos();
            self.current_input.remove(pos);
            self.result(true)
        } else {
            self.result(false)
        }
    }

    fn left(&mut self) -> InputResult {
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
        self.result(false)
    }

    fn right(&mut self) -> InputResult {
        if self.cursor_pos < self.current_input.chars().count() {
            self.cursor_pos += 1;
        }
        self.result(false)
    }

    fn home(&mut self) -> InputResult {
        self.cursor_pos = 0;
        self.result(false)
    }

    fn end(&mut self) -> InputResult {
        self.cursor_pos = self.current_input.chars().count();
        self.result(false)
    }

    fn key(&mut self, code: KeyCode, modifier: KeyModifiers) -> InputResult {
        if modifier.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return self.result(false);
        }
        if let Some(chr) = code.as_char() {
            let pos = self.byte_pos();
            self.current_input.insert(pos, chr);
            self.cursor_pos += 1;
            self.result(true)
        } else {
            self.result(false)
        }
    }

    fn byte_pos(&self) -> usize {
        self.current_input
            .char_indices()
            .nth(self.cursor_pos)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.current_input.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(input: &mut SearchInput, code: KeyCode) -> InputResult {
        input.read(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(input: &mut SearchInput, s: &str) -> InputResult {
        let mut last = InputResult::default();
        for c in s.chars() {
            last = press(input, KeyCode::Char(c));
        }
        last
    }

    #[test]
    fn typing_reports_a_changed_query() {
        let mut input = SearchInput::default();
        let result = type_str(&mut input, "reyes");
        assert_eq!(result.input, "reyes");
        assert!(result.changed);
        assert!(!result.finished);
    }

    #[test]
    fn enter_finishes_without_changing() {
        let mut input = SearchInput::default();
        type_str(&mut input, "lyme");
        let result = press(&mut input, KeyCode::Enter);
        assert_eq!(result.input, "lyme");
        assert!(result.finished);
        assert!(!result.canceled);
        assert!(!result.changed);
    }

    #[test]
    fn escape_cancels_and_clears() {
        let mut input = SearchInput::default();
        type_str(&mut input, "abc");
        let result = press(&mut input, KeyCode::Esc);
        assert_eq!(result.input, "");
        assert!(result.finished);
        assert!(result.canceled);
        assert!(result.changed);
    }

    #[test]
    fn backspace_removes_before_the_cursor() {
        let mut input = SearchInput::default();
        type_str(&mut input, "abc");
        press(&mut input, KeyCode::Left);
        let result = press(&mut input, KeyCode::Backspace);
        assert_eq!(result.input, "ac");
        assert_eq!(result.cursor_pos, 1);
        assert!(result.changed);
    }

    #[test]
    fn insert_in_the_middle_of_multibyte_text() {
        let mut input = SearchInput::default();
        type_str(&mut input, "søk");
        press(&mut input, KeyCode::Left);
        let result = press(&mut input, KeyCode::Char('ö'));
        assert_eq!(result.input, "søök");
    }
}
