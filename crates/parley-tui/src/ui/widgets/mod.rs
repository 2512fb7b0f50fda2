//! Reusable widgets for the parley TUI.

mod input_bar;
pub mod status_bar;
pub mod text_input;

pub use input_bar::InputBar;
pub use status_bar::{StatusBar, StatusMode};
pub use text_input::TextInputState;
