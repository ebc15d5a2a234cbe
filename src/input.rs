//! Postcode input box
//!
//! Single-line text field with a cursor. Postcodes are alphanumeric, so
//! letters are upper-cased as they are typed and other punctuation is
//! dropped; spaces are kept for readability and stripped on submit.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Longest accepted input; real postcodes are at most 8 characters with the space
pub const MAX_INPUT_LEN: usize = 16;

/// Result of feeding a key to the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    /// The value or cursor changed
    Changed,
    /// Key not handled by the input
    Ignored,
}

/// Postcode text field state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostcodeInput {
    value: String,
    /// Cursor position in characters
    cursor: usize,
}

impl PostcodeInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Insert a character at the cursor. Returns false if it was rejected.
    pub fn insert(&mut self, c: char) -> bool {
        if !(c.is_ascii_alphanumeric() || c == ' ') || self.value.len() >= MAX_INPUT_LEN {
            return false;
        }
        // Input is ASCII only, so char and byte offsets agree
        self.value.insert(self.cursor, c.to_ascii_uppercase());
        self.cursor += 1;
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.value.remove(self.cursor);
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.value.len() {
            return false;
        }
        self.value.remove(self.cursor);
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.value.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    /// Handle an editing key
    pub fn handle_key(&mut self, key_event: KeyEvent) -> InputResult {
        if key_event
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return InputResult::Ignored;
        }

        let changed = match key_event.code {
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => {
                self.home();
                true
            }
            KeyCode::End => {
                self.end();
                true
            }
            _ => return InputResult::Ignored,
        };

        if changed {
            InputResult::Changed
        } else {
            InputResult::Ignored
        }
    }
}
