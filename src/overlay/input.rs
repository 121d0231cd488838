//! Prompt Input Module
//!
//! Single-line input buffer backing the overlay's text field, with cursor
//! management and the usual readline-style editing operations.

/// Cursor movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorDirection {
    Left,
    Right,
    Home,
    End,
}

/// Single-line text buffer with a character-indexed cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptInput {
    text: String,
    cursor: usize,
}

impl PromptInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the complete text content
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Cursor position in characters
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(idx, _)| idx)
            .unwrap_or(self.text.len())
    }

    /// Insert a character at the current cursor position
    pub fn insert_char(&mut self, ch: char) {
        // The field is single line; pasted newlines become spaces.
        let ch = if ch == '\n' || ch == '\r' { ' ' } else { ch };
        let at = self.byte_index(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
    }

    /// Insert text at current cursor position
    pub fn insert_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.insert_char(ch);
        }
    }

    /// Delete character before cursor (backspace)
    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_index(self.cursor - 1);
        self.text.remove(at);
        self.cursor -= 1;
    }

    /// Delete character at cursor (delete key)
    pub fn delete_char_forward(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    /// Move cursor in specified direction
    pub fn move_cursor(&mut self, direction: CursorDirection) {
        match direction {
            CursorDirection::Left => self.cursor = self.cursor.saturating_sub(1),
            CursorDirection::Right => self.cursor = (self.cursor + 1).min(self.char_count()),
            CursorDirection::Home => self.cursor = 0,
            CursorDirection::End => self.cursor = self.char_count(),
        }
    }

    /// Clear the whole line (Ctrl+U)
    pub fn delete_line(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Delete from cursor to end of line (Ctrl+K)
    pub fn delete_to_end_of_line(&mut self) {
        let at = self.byte_index(self.cursor);
        self.text.truncate(at);
    }

    /// Delete word backward (Ctrl+W)
    pub fn delete_word_backward(&mut self) {
        if self.cursor == 0 {
            return;
        }

        let chars: Vec<char> = self.text.chars().collect();
        let mut start = self.cursor;

        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }

        let from = self.byte_index(start);
        let to = self.byte_index(self.cursor);
        self.text.drain(from..to);
        self.cursor = start;
    }

    /// Read and clear the buffer
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut input = PromptInput::new();
        input.insert_char('H');
        input.insert_char('i');
        assert_eq!(input.as_str(), "Hi");

        input.delete_char();
        assert_eq!(input.as_str(), "H");

        input.move_cursor(CursorDirection::Home);
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_insert_in_middle() {
        let mut input = PromptInput::new();
        input.insert_str("lst files");
        input.move_cursor(CursorDirection::Home);
        input.move_cursor(CursorDirection::Right);
        input.insert_char('i');
        assert_eq!(input.as_str(), "list files");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = PromptInput::new();
        input.insert_str("héllo");
        input.move_cursor(CursorDirection::Left);
        input.delete_char();
        assert_eq!(input.as_str(), "hélo");

        input.move_cursor(CursorDirection::Home);
        input.move_cursor(CursorDirection::Right);
        input.delete_char_forward();
        assert_eq!(input.as_str(), "hlo");
    }

    #[test]
    fn test_word_deletion() {
        let mut input = PromptInput::new();
        input.insert_str("hello world  ");
        input.delete_word_backward();
        assert_eq!(input.as_str(), "hello ");
        assert_eq!(input.cursor(), 6);
    }

    #[test]
    fn test_line_operations() {
        let mut input = PromptInput::new();
        input.insert_str("another test");
        input.move_cursor(CursorDirection::Home);
        input.move_cursor(CursorDirection::Right);
        input.move_cursor(CursorDirection::Right);
        input.delete_to_end_of_line();
        assert_eq!(input.as_str(), "an");

        input.delete_line();
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_take_clears_buffer() {
        let mut input = PromptInput::new();
        input.insert_str("find big\nfiles");
        assert_eq!(input.take(), "find big files");
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_cursor_bounds() {
        let mut input = PromptInput::new();
        input.move_cursor(CursorDirection::Left);
        assert_eq!(input.cursor(), 0);
        input.insert_str("ab");
        input.move_cursor(CursorDirection::Right);
        assert_eq!(input.cursor(), 2);
    }
}
