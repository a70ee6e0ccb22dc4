//! Line Editor State Machine
//!
//! Owns the edit buffer and cursor and turns key events into the smallest
//! terminal redraw that keeps the screen in step with the buffer.

use unicode_width::UnicodeWidthChar;

use super::input::KeyEvent;
use crate::ansi::cursor;

/// What the caller must do after an event has been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    /// Nothing beyond writing the echo
    None,
    /// A non-empty, trimmed command line was submitted
    Submitted(String),
    /// Enter on a blank line
    EmptySubmit,
    /// Ctrl-C discarded the pending line
    Interrupted,
    /// Recall an older history entry
    HistoryPrev,
    /// Recall a newer history entry
    HistoryNext,
}

/// Result of applying one key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// Bytes to write to the terminal, in order
    pub echo: String,
    /// Follow-up for the caller
    pub action: EditAction,
}

impl EditOutcome {
    fn echo(echo: String) -> Self {
        Self {
            echo,
            action: EditAction::None,
        }
    }

    fn action(echo: &str, action: EditAction) -> Self {
        Self {
            echo: echo.to_string(),
            action,
        }
    }

    fn nothing() -> Self {
        Self::echo(String::new())
    }
}

/// Single-line editor: buffer plus cursor, no modes.
///
/// Invariant: `0 <= cursor <= buffer.len()` (in characters).
#[derive(Debug, Default, Clone)]
pub struct LineEditor {
    buffer: Vec<char>,
    cursor: usize,
}

impl LineEditor {
    /// Create an empty editor
    pub fn new() -> Self {
        Self::default()
    }

    /// Current buffer contents
    pub fn text(&self) -> String {
        self.buffer.iter().collect()
    }

    /// Cursor offset in characters
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Buffer length in characters
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Apply one key event
    pub fn apply(&mut self, event: KeyEvent) -> EditOutcome {
        match event {
            KeyEvent::Char(c) => self.insert(c),
            KeyEvent::Backspace => self.backspace(),
            KeyEvent::DeleteForward => self.delete_forward(),
            KeyEvent::MoveLeft => self.move_left(),
            KeyEvent::MoveRight => self.move_right(),
            KeyEvent::Home => self.home(),
            KeyEvent::End => self.end(),
            KeyEvent::Interrupt => self.interrupt(),
            KeyEvent::Submit => self.submit(),
            KeyEvent::HistoryPrev => EditOutcome::action("", EditAction::HistoryPrev),
            KeyEvent::HistoryNext => EditOutcome::action("", EditAction::HistoryNext),
            KeyEvent::Ignored => EditOutcome::nothing(),
        }
    }

    /// Replace the whole buffer (history recall), cursor at end.
    /// Returns the full-line redraw: clear line, prompt, text.
    pub fn load(&mut self, text: &str, prompt: &str) -> String {
        self.buffer = text.chars().collect();
        self.cursor = self.buffer.len();
        format!("{}{}{}", cursor::CLEAR_LINE, prompt, text)
    }

    /// Full-line redraw of the current state after `prompt`, leaving the
    /// terminal cursor over the buffer cursor
    pub fn repaint(&self, prompt: &str) -> String {
        let mut echo = format!("{}{}", cursor::CLEAR_LINE, prompt);
        echo.extend(self.buffer.iter());
        echo.push_str(&cursor::left(columns(&self.buffer[self.cursor..])));
        echo
    }

    /// Empty the buffer and reset the cursor
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    fn insert(&mut self, c: char) -> EditOutcome {
        self.buffer.insert(self.cursor, c);
        self.cursor += 1;

        let tail = &self.buffer[self.cursor..];
        let mut echo = String::with_capacity(tail.len() + 8);
        echo.push(c);
        echo.extend(tail);
        echo.push_str(&cursor::left(columns(tail)));
        EditOutcome::echo(echo)
    }

    fn backspace(&mut self) -> EditOutcome {
        if self.cursor == 0 {
            return EditOutcome::nothing();
        }

        let removed = self.buffer.remove(self.cursor - 1);
        self.cursor -= 1;

        let tail = &self.buffer[self.cursor..];
        let removed_width = char_columns(removed);
        let mut echo = cursor::left(removed_width);
        echo.extend(tail);
        echo.push_str(&" ".repeat(removed_width));
        echo.push_str(&cursor::left(columns(tail) + removed_width));
        EditOutcome::echo(echo)
    }

    fn delete_forward(&mut self) -> EditOutcome {
        if self.cursor == self.buffer.len() {
            return EditOutcome::nothing();
        }

        let removed = self.buffer.remove(self.cursor);

        let tail = &self.buffer[self.cursor..];
        let removed_width = char_columns(removed);
        let mut echo: String = tail.iter().collect();
        echo.push_str(&" ".repeat(removed_width));
        echo.push_str(&cursor::left(columns(tail) + removed_width));
        EditOutcome::echo(echo)
    }

    fn move_left(&mut self) -> EditOutcome {
        if self.cursor == 0 {
            return EditOutcome::nothing();
        }
        self.cursor -= 1;
        EditOutcome::echo(cursor::left(char_columns(self.buffer[self.cursor])))
    }

    fn move_right(&mut self) -> EditOutcome {
        if self.cursor == self.buffer.len() {
            return EditOutcome::nothing();
        }
        let crossed = self.buffer[self.cursor];
        self.cursor += 1;
        EditOutcome::echo(cursor::right(char_columns(crossed)))
    }

    fn home(&mut self) -> EditOutcome {
        let delta = columns(&self.buffer[..self.cursor]);
        self.cursor = 0;
        EditOutcome::echo(cursor::left(delta))
    }

    fn end(&mut self) -> EditOutcome {
        let delta = columns(&self.buffer[self.cursor..]);
        self.cursor = self.buffer.len();
        EditOutcome::echo(cursor::right(delta))
    }

    fn interrupt(&mut self) -> EditOutcome {
        self.clear();
        EditOutcome::action("^C\r\n", EditAction::Interrupted)
    }

    fn submit(&mut self) -> EditOutcome {
        let command = self.text().trim().to_string();
        self.clear();

        if command.is_empty() {
            EditOutcome::action("\r\n", EditAction::EmptySubmit)
        } else {
            EditOutcome::action("\r\n", EditAction::Submitted(command))
        }
    }
}

/// Display columns of one character; control characters take none
fn char_columns(c: char) -> usize {
    c.width().unwrap_or(0)
}

fn columns(chars: &[char]) -> usize {
    chars.iter().map(|&c| char_columns(c)).sum()
}
