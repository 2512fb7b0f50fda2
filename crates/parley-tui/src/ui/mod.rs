//! UI module for the parley TUI.

pub mod theme;
pub mod widgets;

use crate::app::App;
use crate::conversation::{input_placeholder, TranscriptPane};
use parley_engine::MAX_SUBMISSIONS;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Widget,
};
use widgets::{InputBar, StatusBar};

/// Height of the input bar including borders.
const INPUT_HEIGHT: u16 = 3;

/// Split the screen into transcript, input bar, and status bar.
pub fn main_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(1),
        ])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

/// Draw the whole screen for the current app state.
pub fn draw(app: &App, area: Rect, buf: &mut Buffer) {
    let (transcript_area, input_area, status_area) = main_layout(area);
    let controller = &app.controller;

    let visible = controller.visible_messages();
    TranscriptPane::new(&visible)
        .pending(controller.is_pending())
        .scroll_back(app.scroll_back)
        .render(transcript_area, buf);

    let placeholder = input_placeholder(controller.limit_reached(), controller.is_pending());
    InputBar::new(&app.input, &placeholder)
        .pending(controller.is_pending())
        .disabled(controller.limit_reached())
        .render(input_area, buf);

    StatusBar::new(app.status_mode())
        .usage(controller.submission_count(), MAX_SUBMISSIONS)
        .render(status_area, buf);
}
