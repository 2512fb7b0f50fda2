//! Status bar widget.
//!
//! One row: a badge for the session mode, the keys that currently do
//! something, and prompt usage pinned to the right edge. Hints that would
//! run into the usage text are dropped from the end.

use crate::ui::theme::{Palette, Styles};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

/// A key and what it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHint {
    pub key: &'static str,
    pub label: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }

    /// Columns taken by the key and label cells, padding included.
    fn width(self) -> usize {
        self.key.width() + self.label.width() + 4
    }
}

const SEND: KeyHint = KeyHint::new("Enter", "send");
const SCROLL: KeyHint = KeyHint::new("Up/Dn", "scroll");
const QUIT: KeyHint = KeyHint::new("Esc", "quit");

/// Session state as the status bar presents it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMode {
    /// Ready for a question.
    Chat,
    /// An answer is outstanding.
    Waiting,
    /// No submissions left.
    Limit,
}

impl StatusMode {
    pub fn label(self) -> &'static str {
        match self {
            StatusMode::Chat => "CHAT",
            StatusMode::Waiting => "WAITING",
            StatusMode::Limit => "LIMIT",
        }
    }

    /// Keys that act in this mode. Enter only submits while chatting.
    pub fn hints(self) -> &'static [KeyHint] {
        match self {
            StatusMode::Chat => &[SEND, SCROLL, QUIT],
            StatusMode::Waiting | StatusMode::Limit => &[SCROLL, QUIT],
        }
    }

    fn badge_style(self) -> Style {
        let bg = match self {
            StatusMode::Chat => Palette::ACCENT,
            StatusMode::Waiting => Palette::NOTE,
            StatusMode::Limit => Palette::ERROR,
        };
        Style::default()
            .fg(Palette::BG)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    }
}

/// Status bar displayed at the bottom of the screen.
#[derive(Debug, Clone)]
pub struct StatusBar {
    mode: StatusMode,
    usage: Option<(u32, u32)>,
}

impl StatusBar {
    pub fn new(mode: StatusMode) -> Self {
        Self { mode, usage: None }
    }

    /// Show `used/limit prompts` on the right.
    #[must_use]
    pub fn usage(mut self, used: u32, limit: u32) -> Self {
        self.usage = Some((used, limit));
        self
    }
}

impl Widget for StatusBar {
    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 1 {
            return;
        }

        for x in area.x..area.x.saturating_add(area.width) {
            buf[(x, area.y)].set_char(' ').set_style(Styles::status_bar());
        }

        let usage = self
            .usage
            .map(|(used, limit)| format!("{used}/{limit} prompts"));
        // One column of padding on each side of the usage text
        let reserved = usage.as_ref().map_or(0, |text| text.width() + 2);
        let budget = (area.width as usize).saturating_sub(reserved);

        let label = self.mode.label();
        let mut used = label.width() + 3;
        let mut spans = vec![
            Span::styled(format!(" {label} "), self.mode.badge_style()),
            Span::styled(" ", Styles::status_bar()),
        ];
        for hint in self.mode.hints() {
            if used + hint.width() > budget {
                break;
            }
            used += hint.width();
            spans.push(Span::styled(format!(" {} ", hint.key), Styles::key_hint()));
            spans.push(Span::styled(format!(" {} ", hint.label), Styles::key_label()));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);

        if let Some(text) = usage {
            let width = text.width();
            if width < area.width as usize {
                let x = area.x + area.width - width as u16 - 1;
                buf.set_string(x, area.y, &text, Styles::status_bar());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_row(bar: StatusBar, width: u16) -> String {
        let area = Rect::new(0, 0, width, 1);
        let mut buf = Buffer::empty(area);
        bar.render(area, &mut buf);
        (0..width).map(|x| buf[(x, 0)].symbol().to_string()).collect()
    }

    #[test]
    fn test_chat_mode_offers_send() {
        let row = render_row(StatusBar::new(StatusMode::Chat).usage(1, 5), 60);
        assert!(row.starts_with(" CHAT "));
        assert!(row.contains("Enter"));
        assert!(row.contains("send"));
        assert!(row.trim_end().ends_with("1/5 prompts"));
    }

    #[test]
    fn test_waiting_mode_hides_send() {
        let row = render_row(StatusBar::new(StatusMode::Waiting).usage(2, 5), 60);
        assert!(row.starts_with(" WAITING "));
        assert!(!row.contains("send"));
        assert!(row.contains("scroll"));
        assert!(row.contains("2/5 prompts"));
    }

    #[test]
    fn test_narrow_bar_drops_hints_before_usage() {
        let row = render_row(StatusBar::new(StatusMode::Chat).usage(1, 5), 30);
        assert!(row.starts_with(" CHAT "));
        assert!(!row.contains("Enter"));
        assert!(row.trim_end().ends_with("1/5 prompts"));
    }

    #[test]
    fn test_badge_color_follows_mode() {
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new(StatusMode::Limit).render(area, &mut buf);
        assert_eq!(buf[(1, 0)].bg, Palette::ERROR);
    }

    #[test]
    fn test_zero_height() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 1));
        StatusBar::new(StatusMode::Chat).render(Rect::new(0, 0, 10, 0), &mut buf);
    }
}
