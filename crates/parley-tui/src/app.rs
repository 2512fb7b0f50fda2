//! Application state and update logic for the parley TUI.

use crate::conversation;
use crate::event::Action;
use crate::ui::main_layout;
use crate::ui::widgets::{StatusMode, TextInputState};
use parley_engine::{
    AnswerError, AnswerService, AskRequest, AskResponse, Controller, SubmitOutcome,
};
use ratatui::layout::Rect;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Lines moved by a page scroll.
const PAGE_SCROLL: usize = 10;

type AnswerTask = JoinHandle<Result<AskResponse, AnswerError>>;

/// Application state.
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Conversation state.
    pub controller: Controller,

    /// Editor state for the draft (cursor position lives here).
    pub input: TextInputState,

    /// Lines scrolled up from the bottom of the transcript, never past
    /// the top of what fits in `transcript_area`.
    pub scroll_back: usize,

    /// Where the transcript pane was last laid out.
    transcript_area: Rect,

    service: Arc<dyn AnswerService>,

    /// Request currently awaiting its answer.
    in_flight: Option<AnswerTask>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("should_quit", &self.should_quit)
            .field("controller", &self.controller)
            .field("input", &self.input)
            .field("scroll_back", &self.scroll_back)
            .field("transcript_area", &self.transcript_area)
            .field("in_flight", &self.in_flight.is_some())
            .finish_non_exhaustive()
    }
}

impl App {
    /// Create a new app that sends questions to `service`.
    pub fn new(service: Arc<dyn AnswerService>) -> Self {
        Self {
            should_quit: false,
            controller: Controller::new(),
            input: TextInputState::new(),
            scroll_back: 0,
            transcript_area: Rect::default(),
            service,
            in_flight: None,
        }
    }

    /// Handle an action.
    ///
    /// Submitting spawns the request on the tokio runtime, so this must be
    /// called from within one.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Submit => self.submit(),
            Action::Insert(c) => self.edit(|input| input.insert(c)),
            Action::Backspace => self.edit(TextInputState::backspace),
            Action::Delete => self.edit(TextInputState::delete),
            Action::Left => self.input.move_left(),
            Action::Right => self.input.move_right(),
            Action::Home => self.input.move_home(),
            Action::End => self.input.move_end(),
            Action::ScrollUp => self.scroll_up(1),
            Action::ScrollDown => self.scroll_back = self.scroll_back.saturating_sub(1),
            Action::PageUp => self.scroll_up(PAGE_SCROLL),
            Action::PageDown => self.scroll_back = self.scroll_back.saturating_sub(PAGE_SCROLL),
            Action::None => {}
        }
    }

    /// Record the screen size for the next draw and re-clamp the scroll.
    pub fn set_viewport(&mut self, area: Rect) {
        let (transcript_area, _, _) = main_layout(area);
        self.transcript_area = transcript_area;
        self.scroll_back = self.scroll_back.min(self.max_scroll());
    }

    fn max_scroll(&self) -> usize {
        let visible = self.controller.visible_messages();
        conversation::max_scroll(&visible, self.controller.is_pending(), self.transcript_area)
    }

    fn scroll_up(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_add(lines).min(self.max_scroll());
    }

    /// Apply an edit and forward the new text as the draft.
    ///
    /// The input is disabled once the limit is reached.
    fn edit(&mut self, f: impl FnOnce(&mut TextInputState)) {
        if self.controller.limit_reached() {
            return;
        }
        f(&mut self.input);
        self.controller.update_draft(self.input.content());
    }

    fn submit(&mut self) {
        if let SubmitOutcome::Dispatched(request) = self.controller.submit() {
            self.input.clear();
            self.scroll_back = 0;
            self.dispatch(request);
        }
    }

    fn dispatch(&mut self, request: AskRequest) {
        let service = Arc::clone(&self.service);
        self.in_flight = Some(tokio::spawn(async move { service.ask(&request).await }));
    }

    /// Whether a request is awaiting its answer.
    pub fn has_request_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Settle the outstanding request if it has finished.
    ///
    /// Returns true if a settlement happened. A task that panicked or was
    /// cancelled settles as a failure.
    pub async fn poll_answer(&mut self) -> bool {
        if !self.in_flight.as_ref().is_some_and(JoinHandle::is_finished) {
            return false;
        }
        let Some(task) = self.in_flight.take() else {
            return false;
        };

        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(e) => Err(AnswerError::Task(e.to_string())),
        };
        self.controller.settle(outcome);
        self.scroll_back = 0;
        true
    }

    /// Abort any outstanding request before exiting.
    pub fn shutdown(&mut self) {
        if let Some(task) = self.in_flight.take() {
            debug!("aborting outstanding answer request");
            task.abort();
        }
    }

    /// What the status bar should show.
    pub fn status_mode(&self) -> StatusMode {
        if self.controller.limit_reached() {
            StatusMode::Limit
        } else if self.controller.is_pending() {
            StatusMode::Waiting
        } else {
            StatusMode::Chat
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, settle_all, type_text, StubService};
    use parley_engine::{Message, Role, FAILURE_TEXT, MAX_SUBMISSIONS};

    #[tokio::test]
    async fn test_typing_updates_draft() {
        let mut app = create_test_app();
        type_text(&mut app, "hey");
        assert_eq!(app.controller.draft(), "hey");

        app.handle_action(Action::Backspace);
        assert_eq!(app.controller.draft(), "he");

        app.handle_action(Action::Home);
        app.handle_action(Action::Delete);
        assert_eq!(app.controller.draft(), "e");
    }

    #[tokio::test]
    async fn test_submit_and_settle() {
        let mut app = App::new(Arc::new(
            StubService::answering("hello").with_note("tip"),
        ));
        type_text(&mut app, "hi");
        app.handle_action(Action::Submit);

        assert!(app.controller.is_pending());
        assert!(app.has_request_in_flight());
        assert!(app.input.is_empty());
        assert_eq!(app.controller.draft(), "");

        settle_all(&mut app).await;
        assert!(!app.controller.is_pending());
        assert!(!app.has_request_in_flight());
        assert_eq!(
            app.controller.transcript().as_slice(),
            &[Message::user("hi"), Message::bot("hello"), Message::note("tip")]
        );
    }

    #[tokio::test]
    async fn test_failed_request_settles_as_error() {
        let mut app = App::new(Arc::new(StubService::failing()));
        type_text(&mut app, "hi");
        app.handle_action(Action::Submit);
        settle_all(&mut app).await;

        let last = app.controller.transcript().last().unwrap();
        assert_eq!(last.role(), Role::Error);
        assert_eq!(last.text(), FAILURE_TEXT);
        assert!(!app.controller.is_pending());
    }

    #[tokio::test]
    async fn test_panicking_service_does_not_stick_pending() {
        let mut app = App::new(Arc::new(StubService::panicking()));
        type_text(&mut app, "hi");
        app.handle_action(Action::Submit);
        settle_all(&mut app).await;

        assert!(!app.controller.is_pending());
        assert_eq!(
            app.controller.transcript().last().map(Message::role),
            Some(Role::Error)
        );
    }

    #[tokio::test]
    async fn test_empty_submit_does_nothing() {
        let mut app = create_test_app();
        type_text(&mut app, "   ");
        app.handle_action(Action::Submit);
        assert!(!app.has_request_in_flight());
        assert!(app.controller.transcript().is_empty());
        assert_eq!(app.input.content(), "   ");
    }

    #[tokio::test]
    async fn test_typing_allowed_while_pending() {
        let mut app = create_test_app();
        type_text(&mut app, "first");
        app.handle_action(Action::Submit);
        type_text(&mut app, "next");
        assert_eq!(app.controller.draft(), "next");

        app.handle_action(Action::Submit);
        assert_eq!(app.controller.submission_count(), 1);
        assert_eq!(app.input.content(), "next");
        settle_all(&mut app).await;
    }

    #[tokio::test]
    async fn test_input_disabled_at_limit() {
        let mut app = create_test_app();
        for i in 0..MAX_SUBMISSIONS {
            type_text(&mut app, &format!("q{i}"));
            app.handle_action(Action::Submit);
            settle_all(&mut app).await;
        }
        assert!(app.controller.limit_reached());
        assert_eq!(app.status_mode(), StatusMode::Limit);

        type_text(&mut app, "more");
        assert!(app.input.is_empty());
        assert_eq!(app.controller.draft(), "");

        app.handle_action(Action::Submit);
        assert!(!app.has_request_in_flight());
        assert_eq!(app.controller.submission_count(), MAX_SUBMISSIONS);
    }

    /// Fill the transcript with `count` short answers.
    fn app_with_answers(count: usize) -> App {
        let mut app = create_test_app();
        app.controller.update_draft("q");
        app.controller.submit();
        app.controller.settle(Ok(AskResponse::answer(
            (1..=count).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n"),
        )));
        app
    }

    #[test]
    fn test_scroll_actions() {
        let mut app = app_with_answers(40);
        // Transcript pane of 20 rows, 18 inside the border
        app.set_viewport(Rect::new(0, 0, 80, 24));

        app.handle_action(Action::ScrollDown);
        assert_eq!(app.scroll_back, 0);
        app.handle_action(Action::PageUp);
        app.handle_action(Action::ScrollUp);
        assert_eq!(app.scroll_back, 11);
        app.handle_action(Action::PageDown);
        assert_eq!(app.scroll_back, 1);
    }

    #[test]
    fn test_scroll_stops_at_top() {
        let mut app = app_with_answers(40);
        app.set_viewport(Rect::new(0, 0, 80, 24));

        // "You: q", blank, 40 answer lines in 18 rows
        for _ in 0..50 {
            app.handle_action(Action::PageUp);
        }
        assert_eq!(app.scroll_back, 24);

        app.handle_action(Action::ScrollDown);
        assert_eq!(app.scroll_back, 23);
    }

    #[test]
    fn test_scroll_on_short_transcript_stays_at_bottom() {
        let mut app = create_test_app();
        app.set_viewport(Rect::new(0, 0, 80, 24));
        for _ in 0..50 {
            app.handle_action(Action::PageUp);
        }
        app.handle_action(Action::ScrollDown);
        assert_eq!(app.scroll_back, 0);
    }

    #[test]
    fn test_growing_viewport_reclamps_scroll() {
        let mut app = app_with_answers(40);
        app.set_viewport(Rect::new(0, 0, 80, 24));
        app.handle_action(Action::PageUp);
        app.handle_action(Action::PageUp);
        assert_eq!(app.scroll_back, 20);

        // 56 inner rows fit all 42 lines
        app.set_viewport(Rect::new(0, 0, 80, 62));
        assert_eq!(app.scroll_back, 0);
    }

    #[tokio::test]
    async fn test_quit_and_shutdown() {
        let mut app = App::new(Arc::new(StubService::never()));
        type_text(&mut app, "hang");
        app.handle_action(Action::Submit);
        assert!(app.has_request_in_flight());

        app.handle_action(Action::Quit);
        assert!(app.should_quit);
        app.shutdown();
        assert!(!app.has_request_in_flight());
    }

    #[test]
    fn test_status_modes() {
        let mut app = create_test_app();
        assert_eq!(app.status_mode(), StatusMode::Chat);
        app.controller.update_draft("x");
        app.controller.submit();
        assert_eq!(app.status_mode(), StatusMode::Waiting);
    }
}
