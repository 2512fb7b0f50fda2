//! Conversation pane module.
//!
//! Renders the derived view of the transcript, plus the pending row while
//! an answer is outstanding, and chooses the input placeholder.

mod placeholder;
mod widget;

pub use placeholder::input_placeholder;
pub use widget::{max_scroll, transcript_lines, TranscriptPane};
