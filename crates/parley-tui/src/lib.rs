//! parley-tui: Terminal UI for the parley question client
//!
//! This crate renders the conversation and drives the engine's controller:
//! - Transcript pane showing the derived view of the conversation
//! - Input bar that is disabled once the submission limit is reached
//! - Status bar with key hints and usage
//! - Headless mode for testing and automation

mod app;
mod conversation;
mod event;
pub mod headless;
#[cfg(test)]
pub mod test_utils;
mod text;
mod ui;

pub use app::App;
pub use event::{Action, Event, EventHandler};
pub use parley_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use parley_engine::{AnswerService, Config, HttpAnswerService};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::sync::Arc;
use tracing::info;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI against the HTTP answer service described by `config`.
pub async fn run_tui(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let service = HttpAnswerService::from_config(config)?;
    info!(endpoint = %service.endpoint(), "starting tui");
    run_tui_with(Arc::new(service)).await
}

/// Run the TUI application with any answer service.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on
/// exit.
pub async fn run_tui_with(
    service: Arc<dyn AnswerService>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal with RAII guard for cleanup
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(service);

    // 4 Hz tick rate = 250ms
    let mut events = EventHandler::new(250);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    // Restore cursor before guard drops
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            app.set_viewport(area);
            ui::draw(app, area, frame.buffer_mut());
        })?;

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => app.handle_action(event::key_to_action(key)),
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => app.handle_action(Action::ScrollUp),
                    MouseEventKind::ScrollDown => app.handle_action(Action::ScrollDown),
                    _ => {}
                },
                // Terminal will handle resize automatically
                Event::Tick | Event::Resize(_, _) => {}
            }
        }

        app.poll_answer().await;

        if app.should_quit {
            app.shutdown();
            break;
        }
    }

    Ok(())
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
