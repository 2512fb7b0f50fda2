//! Test utilities for parley-tui.
//!
//! Stub answer services, helpers for driving the app, and rendering the
//! full screen to a string.

use crate::app::App;
use crate::event::Action;
use crate::ui;
use async_trait::async_trait;
use parley_engine::{AnswerError, AnswerService, AskRequest, AskResponse};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use std::sync::Arc;
use std::time::Duration;

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// What a [`StubService`] does with every request.
#[derive(Debug, Clone)]
enum Behavior {
    Answer(AskResponse),
    Fail,
    Panic,
    Never,
}

/// Answer service with a fixed behavior.
#[derive(Debug, Clone)]
pub struct StubService {
    behavior: Behavior,
}

impl StubService {
    /// Answer every question with `answer`.
    pub fn answering(answer: &str) -> Self {
        Self {
            behavior: Behavior::Answer(AskResponse::answer(answer)),
        }
    }

    /// Attach a note to every answer.
    #[must_use]
    pub fn with_note(self, note: &str) -> Self {
        match self.behavior {
            Behavior::Answer(response) => Self {
                behavior: Behavior::Answer(response.with_note(note)),
            },
            other => Self { behavior: other },
        }
    }

    /// Fail every request with an HTTP error.
    pub fn failing() -> Self {
        Self {
            behavior: Behavior::Fail,
        }
    }

    /// Panic inside the request task.
    pub fn panicking() -> Self {
        Self {
            behavior: Behavior::Panic,
        }
    }

    /// Never answer.
    pub fn never() -> Self {
        Self {
            behavior: Behavior::Never,
        }
    }
}

#[async_trait]
impl AnswerService for StubService {
    async fn ask(&self, _request: &AskRequest) -> Result<AskResponse, AnswerError> {
        match &self.behavior {
            Behavior::Answer(response) => Ok(response.clone()),
            Behavior::Fail => Err(AnswerError::Status(503)),
            Behavior::Panic => panic!("stub service panicked"),
            Behavior::Never => std::future::pending().await,
        }
    }
}

/// Create a test app whose service answers everything with "answer".
pub fn create_test_app() -> App {
    App::new(Arc::new(StubService::answering("answer")))
}

/// Type `text` into the input one character at a time.
pub fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_action(Action::Insert(c));
    }
}

/// Poll until the outstanding request has settled.
pub async fn settle_all(app: &mut App) {
    for _ in 0..400 {
        if app.poll_answer().await || !app.has_request_in_flight() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("answer did not settle");
}

/// Render the full screen at the default test size.
pub fn render_app_to_string(app: &App) -> String {
    render_app_to_string_sized(app, TEST_WIDTH, TEST_HEIGHT)
}

/// Render the full screen at a custom size.
pub fn render_app_to_string_sized(app: &App, width: u16, height: u16) -> String {
    let mut terminal =
        Terminal::new(TestBackend::new(width, height)).expect("Failed to create test terminal");
    terminal
        .draw(|frame| {
            let area = frame.area();
            ui::draw(app, area, frame.buffer_mut());
        })
        .expect("Failed to draw");
    buffer_to_string(terminal.backend().buffer())
}

/// Convert a buffer to text, one row per line, trailing spaces trimmed.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    crate::headless::buffer_to_string(buffer)
}
