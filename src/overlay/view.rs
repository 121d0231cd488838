//! Prompt view state and its rendering into a view zone.
//!
//! The zone is laid out like a small message log: the suggestion (or an
//! inline error) fills every row but the last, and the input field sits on
//! the last row. When the suggestion overflows its rows the view shows its
//! tail, so newly produced content is always visible.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use super::host::FontStyle;
use super::input::PromptInput;

pub const ASK_PLACEHOLDER: &str = "Ask me anything...";
pub const REFINE_PLACEHOLDER: &str = "Press enter to run or type to clarify...";

const PROMPT_PREFIX: &str = "> ";

/// Everything the view zone shows for one session
#[derive(Debug, Clone)]
pub struct PromptView {
    input: PromptInput,
    placeholder: &'static str,
    suggestion: Option<String>,
    error: Option<String>,
    font: FontStyle,
}

impl PromptView {
    pub fn new(font: FontStyle) -> Self {
        Self {
            input: PromptInput::new(),
            placeholder: ASK_PLACEHOLDER,
            suggestion: None,
            error: None,
            font,
        }
    }

    pub fn input(&self) -> &PromptInput {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut PromptInput {
        &mut self.input
    }

    pub fn placeholder(&self) -> &str {
        self.placeholder
    }

    /// The currently displayed suggestion, if any
    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Show the first candidate, or clear the suggestion when there are none.
    ///
    /// A blank first candidate counts as no suggestion.
    pub fn show_candidates(&mut self, candidates: Vec<String>) {
        self.error = None;
        self.suggestion = candidates
            .into_iter()
            .next()
            .filter(|candidate| !candidate.trim().is_empty());
        self.placeholder = REFINE_PLACEHOLDER;
    }

    /// Replace the suggestion with an inline error line.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.suggestion = None;
        self.error = Some(message.into());
        self.placeholder = REFINE_PLACEHOLDER;
    }

    fn message_lines(&self, width: usize) -> Vec<Line<'static>> {
        if let Some(error) = &self.error {
            let style = self.font.text().fg(Color::Red);
            return wrap_text(&format!("error: {}", error), width)
                .into_iter()
                .map(|line| Line::from(Span::styled(line, style)))
                .collect();
        }
        match &self.suggestion {
            Some(suggestion) => wrap_text(suggestion, width)
                .into_iter()
                .map(|line| Line::from(Span::styled(line, self.font.text())))
                .collect(),
            None => Vec::new(),
        }
    }

    fn input_line(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(
            PROMPT_PREFIX,
            self.font.prompt().add_modifier(Modifier::BOLD),
        )];
        if self.input.is_empty() {
            spans.push(Span::styled(
                self.placeholder,
                self.font.text().add_modifier(Modifier::DIM),
            ));
        } else {
            spans.push(Span::styled(self.input.as_str().to_string(), self.font.text()));
        }
        Line::from(spans)
    }

    /// Render into `area`, placing the terminal cursor inside the input field.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        frame.render_widget(Block::default().style(self.font.text()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);
        let message_area = chunks[0];
        let input_area = chunks[1];

        if message_area.height > 0 {
            let lines = self.message_lines(message_area.width as usize);
            let scroll = tail_scroll(lines.len(), message_area.height);
            let message = Paragraph::new(lines)
                .style(self.font.text())
                .scroll((scroll, 0));
            frame.render_widget(message, message_area);
        }

        frame.render_widget(
            Paragraph::new(self.input_line()).style(self.font.text()),
            input_area,
        );

        let (x, y) = cursor_position(input_area, self.input.cursor());
        frame.set_cursor(x, y);
    }
}

/// Scroll offset that keeps the last `height` of `line_count` lines visible
pub fn tail_scroll(line_count: usize, height: u16) -> u16 {
    let overflow = line_count.saturating_sub(height as usize);
    u16::try_from(overflow).unwrap_or(u16::MAX)
}

fn cursor_position(input_area: Rect, cursor: usize) -> (u16, u16) {
    let offset = PROMPT_PREFIX.chars().count() + cursor;
    let max_x = input_area.width.saturating_sub(1) as usize;
    let x = input_area.x + offset.min(max_x) as u16;
    (x, input_area.y)
}

/// Wrap text to the given width in characters, breaking at whitespace where possible
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut wrapped = Vec::new();

    for line in text.lines() {
        let chars: Vec<char> = line.chars().collect();
        if chars.len() <= max_width {
            wrapped.push(line.to_string());
            continue;
        }

        let mut start = 0;
        while start < chars.len() {
            let end = (start + max_width).min(chars.len());
            if end == chars.len() {
                wrapped.push(chars[start..end].iter().collect());
                break;
            }
            match chars[start..end].iter().rposition(|c| c.is_whitespace()) {
                Some(space) if space > 0 => {
                    wrapped.push(chars[start..start + space].iter().collect());
                    start += space + 1;
                }
                _ => {
                    wrapped.push(chars[start..end].iter().collect());
                    start = end;
                }
            }
        }
    }

    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_wrap_text() {
        let text = "This is a long line that should be wrapped at word boundaries";
        let wrapped = wrap_text(text, 20);
        assert!(wrapped.len() > 1);
        assert!(wrapped.iter().all(|line| line.chars().count() <= 20));
    }

    #[test]
    fn test_wrap_text_without_spaces() {
        let wrapped = wrap_text("abcdefghij", 4);
        assert_eq!(wrapped, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_keeps_explicit_lines() {
        let wrapped = wrap_text("git add -A\ngit commit", 40);
        assert_eq!(wrapped, vec!["git add -A", "git commit"]);
    }

    #[test]
    fn test_tail_scroll() {
        assert_eq!(tail_scroll(2, 3), 0);
        assert_eq!(tail_scroll(3, 3), 0);
        assert_eq!(tail_scroll(7, 3), 4);
    }

    #[test]
    fn test_candidates_replace_suggestion() {
        let mut view = PromptView::new(FontStyle::default());
        assert_eq!(view.placeholder(), ASK_PLACEHOLDER);

        view.show_candidates(vec!["ls -la".to_string(), "ls".to_string()]);
        assert_eq!(view.suggestion(), Some("ls -la"));
        assert_eq!(view.placeholder(), REFINE_PLACEHOLDER);

        view.show_candidates(Vec::new());
        assert_eq!(view.suggestion(), None);
    }

    #[test]
    fn test_error_clears_suggestion() {
        let mut view = PromptView::new(FontStyle::default());
        view.show_candidates(vec!["ls".to_string()]);
        view.show_error("status 500");
        assert_eq!(view.suggestion(), None);
        assert_eq!(view.error(), Some("status 500"));

        view.show_candidates(vec!["pwd".to_string()]);
        assert_eq!(view.error(), None);
    }

    #[test]
    fn test_render_places_cursor_in_input() {
        let backend = TestBackend::new(40, 4);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut view = PromptView::new(FontStyle::default());
        view.input_mut().insert_str("list");
        view.show_candidates(vec!["ls -la".to_string()]);

        terminal
            .draw(|frame| {
                let area = frame.size();
                view.render(frame, area);
            })
            .unwrap();

        assert_eq!(terminal.get_cursor().unwrap(), (6, 3));
    }
}
