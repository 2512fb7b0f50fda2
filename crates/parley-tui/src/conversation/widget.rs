//! Transcript pane widget.

use parley_engine::{Message, Role};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::text::wrap_lines;
use crate::ui::theme::Styles;

/// Label drawn before each message.
fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You:",
        Role::Bot => "Bot:",
        Role::Note => "Note:",
        Role::Error => "Error:",
    }
}

/// Build the display lines for `messages`, wrapped to `width`.
///
/// Messages are separated by a blank line. Embedded newlines start a new
/// line indented past the label. When `pending` is set a trailing
/// `Bot: ...` row is added.
pub fn transcript_lines(messages: &[&Message], pending: bool, width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for message in messages {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }

        let label = role_label(message.role());
        let indent = " ".repeat(label.len());
        let text_style = Styles::role_text(message.role());

        for (i, text_line) in message.text().split('\n').enumerate() {
            let lead = if i == 0 {
                Span::styled(label, Styles::role_label(message.role()))
            } else {
                Span::raw(indent.clone())
            };
            lines.push(Line::from(vec![
                lead,
                Span::styled(format!(" {text_line}"), text_style),
            ]));
        }
    }

    if pending {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(vec![
            Span::styled(role_label(Role::Bot), Styles::role_label(Role::Bot)),
            Span::styled(" ...", Styles::dim()),
        ]));
    }

    wrap_lines(lines, width)
}

fn pane_block() -> Block<'static> {
    Block::default()
        .title(" parley ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border())
        .style(Styles::default())
}

/// Furthest a [`TranscriptPane`] drawn in `area` can scroll back.
pub fn max_scroll(messages: &[&Message], pending: bool, area: Rect) -> usize {
    if messages.is_empty() && !pending {
        return 0;
    }
    let inner = pane_block().inner(area);
    let lines = transcript_lines(messages, pending, inner.width as usize);
    lines.len().saturating_sub(inner.height as usize)
}

/// Scrollable pane showing the visible transcript.
///
/// `scroll_back` counts lines scrolled up from the bottom; zero follows
/// the newest message.
pub struct TranscriptPane<'a> {
    messages: &'a [&'a Message],
    pending: bool,
    scroll_back: usize,
}

impl<'a> TranscriptPane<'a> {
    pub fn new(messages: &'a [&'a Message]) -> Self {
        Self {
            messages,
            pending: false,
            scroll_back: 0,
        }
    }

    #[must_use]
    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    #[must_use]
    pub fn scroll_back(mut self, lines: usize) -> Self {
        self.scroll_back = lines;
        self
    }
}

impl Widget for TranscriptPane<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = pane_block();
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if self.messages.is_empty() && !self.pending {
            Paragraph::new(Line::styled("Ask a question to get started.", Styles::dim()))
                .render(inner, buf);
            return;
        }

        let lines = transcript_lines(self.messages, self.pending, inner.width as usize);
        let max_scroll = lines.len().saturating_sub(inner.height as usize);
        let offset = max_scroll.saturating_sub(self.scroll_back);

        Paragraph::new(lines)
            .style(Styles::default())
            .scroll((offset.min(u16::MAX as usize) as u16, 0))
            .render(inner, buf);
    }
}
