//! Input bar widget.
//!
//! Single-line question editor drawn at the bottom of the screen. It has
//! three presentations: editable, editable while an answer is outstanding,
//! and disabled once the submission limit is reached.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::ui::theme::Styles;
use crate::ui::widgets::TextInputState;

const PROMPT: &str = "> ";
const CURSOR: &str = "█";

/// Input bar for typing questions.
pub struct InputBar<'a> {
    input: &'a TextInputState,
    placeholder: &'a str,
    pending: bool,
    disabled: bool,
}

impl<'a> InputBar<'a> {
    /// Create a new input bar widget.
    pub fn new(input: &'a TextInputState, placeholder: &'a str) -> Self {
        Self {
            input,
            placeholder,
            pending: false,
            disabled: false,
        }
    }

    /// Mark an answer as outstanding.
    #[must_use]
    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    /// Draw the bar as disabled (limit reached).
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Build the visible line, scrolled horizontally so the cursor fits.
    fn build_line(&self, width: usize) -> Line<'static> {
        if self.disabled {
            return Line::from(vec![
                Span::styled(PROMPT, Styles::dim()),
                Span::styled(self.placeholder.to_string(), Styles::dim()),
            ]);
        }

        let mut spans = vec![Span::styled(PROMPT, Styles::active())];

        if self.input.is_empty() {
            spans.push(Span::styled(CURSOR, Styles::active()));
            spans.push(Span::styled(self.placeholder.to_string(), Styles::dim()));
            return Line::from(spans);
        }

        let chars: Vec<char> = self.input.content().chars().collect();
        let cursor = self.input.cursor.min(chars.len());

        // Room for the text, leaving one cell for the cursor.
        let room = width.saturating_sub(PROMPT.len() + 1);
        let mut start = 0;
        let mut used: usize = chars[..cursor].iter().map(|c| c.width().unwrap_or(0)).sum();
        while used > room && start < cursor {
            used -= chars[start].width().unwrap_or(0);
            start += 1;
        }

        let before: String = chars[start..cursor].iter().collect();
        let after: String = chars[cursor..].iter().collect();
        spans.push(Span::styled(before, Styles::default()));
        spans.push(Span::styled(CURSOR, Styles::active()));
        spans.push(Span::styled(after, Styles::default()));
        Line::from(spans)
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.disabled {
            Styles::border()
        } else {
            Styles::border_active()
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);
        if self.pending {
            block = block
                .title(" waiting for answer ")
                .title_style(Styles::dim());
        }

        let inner = block.inner(area);
        let line = self.build_line(inner.width as usize);
        Paragraph::new(line).block(block).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_empty_input_shows_placeholder() {
        let input = TextInputState::new();
        let bar = InputBar::new(&input, "Ask something...");
        assert_eq!(line_text(&bar.build_line(40)), "> █Ask something...");
    }

    #[test]
    fn test_cursor_drawn_at_position() {
        let mut input = TextInputState::new();
        input.insert_str("abc");
        input.move_left();
        let bar = InputBar::new(&input, "");
        assert_eq!(line_text(&bar.build_line(40)), "> ab█c");
    }

    #[test]
    fn test_disabled_hides_content_and_cursor() {
        let mut input = TextInputState::new();
        input.insert_str("leftover");
        let bar = InputBar::new(&input, "Max 5 prompts reached").disabled(true);
        assert_eq!(line_text(&bar.build_line(40)), "> Max 5 prompts reached");
    }

    #[test]
    fn test_long_input_scrolls_to_cursor() {
        let mut input = TextInputState::new();
        input.insert_str("0123456789abcdef");
        let bar = InputBar::new(&input, "");
        // width 10: prompt 2 + 7 chars + cursor
        assert_eq!(line_text(&bar.build_line(10)), "> 9abcdef█");
    }

    #[test]
    fn test_render_does_not_panic_when_tiny() {
        let input = TextInputState::new();
        let area = Rect::new(0, 0, 3, 2);
        let mut buf = Buffer::empty(area);
        InputBar::new(&input, "Ask something...")
            .pending(true)
            .render(area, &mut buf);
    }
}
