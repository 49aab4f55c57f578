//! Line buffer editing, independent of the terminal.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What the shell should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The buffer or cursor changed.
    Edited,
    /// Enter was pressed; carries the submitted line.
    Submit(String),
    Complete,
    Help,
    Terminate,
    /// The key has no effect.
    Ignored,
}

/// A single-line buffer with a cursor kept on a character boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    buffer: String,
    cursor: usize,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&self) -> &str {
        &self.buffer
    }

    /// Cursor as a byte offset.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Cursor as a character position, for display.
    pub fn display_cursor(&self) -> usize {
        self.buffer[..self.cursor].chars().count()
    }

    /// Replaces the buffer, e.g. after completion changed the line.
    pub fn set(&mut self, line: &str, cursor: usize) {
        self.buffer = line.to_string();
        self.cursor = cursor.min(self.buffer.len());
        while !self.buffer.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    fn previous_boundary(&self) -> Option<usize> {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(offset, _)| offset)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.buffer[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }

    fn insert(&mut self, c: char) {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn move_to(&mut self, offset: Option<usize>) -> Action {
        match offset {
            Some(offset) if offset != self.cursor => {
                self.cursor = offset;
                Action::Edited
            }
            _ => Action::Ignored,
        }
    }

    /// Applies a key press to the buffer.
    pub fn handle_key(&mut self, key_event: KeyEvent) -> Action {
        if key_event.kind == KeyEventKind::Release {
            return Action::Ignored;
        }
        let control = key_event.modifiers.contains(KeyModifiers::CONTROL);

        match key_event.code {
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                Action::Submit(line)
            }
            KeyCode::Tab => Action::Complete,
            KeyCode::Char('c') if control => Action::Terminate,
            KeyCode::Char('d') if control && self.buffer.is_empty() => Action::Terminate,
            KeyCode::Char('a') if control => self.move_to(Some(0)),
            KeyCode::Char('e') if control => self.move_to(Some(self.buffer.len())),
            KeyCode::Char('u') if control => {
                self.buffer.drain(..self.cursor);
                self.cursor = 0;
                Action::Edited
            }
            KeyCode::Char('k') if control => {
                self.buffer.truncate(self.cursor);
                Action::Edited
            }
            KeyCode::Char('?') => Action::Help,
            KeyCode::Char(c) if !control => {
                self.insert(c);
                Action::Edited
            }
            KeyCode::Backspace => match self.previous_boundary() {
                Some(offset) => {
                    self.buffer.remove(offset);
                    self.cursor = offset;
                    Action::Edited
                }
                None => Action::Ignored,
            },
            KeyCode::Delete => match self.next_boundary() {
                Some(_) => {
                    self.buffer.remove(self.cursor);
                    Action::Edited
                }
                None => Action::Ignored,
            },
            KeyCode::Left => self.move_to(self.previous_boundary()),
            KeyCode::Right => self.move_to(self.next_boundary()),
            KeyCode::Home => self.move_to(Some(0)),
            KeyCode::End => self.move_to(Some(self.buffer.len())),
            KeyCode::Esc => {
                self.clear();
                Action::Edited
            }
            _ => Action::Ignored,
        }
    }
}
