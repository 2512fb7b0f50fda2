//! parley-engine: Headless conversation core for the parley question client
//!
//! This crate provides everything that does not touch the terminal:
//! - Transcript messages and the append-only transcript
//! - The derived visible view of the transcript
//! - The conversation controller with its submission limit
//! - The answer service seam and its HTTP implementation
//! - Configuration

pub mod answer;
pub mod config;
pub mod controller;
pub mod message;
pub mod transcript;
pub mod view;

// Re-export commonly used types
pub use answer::{
    decode_response, AnswerError, AnswerService, AskRequest, AskResponse, HttpAnswerService,
};
pub use config::{Config, ConfigError};
pub use controller::{Controller, SkipReason, SubmitOutcome, FAILURE_TEXT, MAX_SUBMISSIONS};
pub use message::{Message, Role};
pub use transcript::Transcript;
pub use view::{visible_messages, visible_messages_with, VISIBLE_USER_MESSAGES};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
