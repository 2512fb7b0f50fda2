//! State-aware placeholder text for the input area.

use parley_engine::MAX_SUBMISSIONS;

/// Placeholder text for the input area.
///
/// Reaching the limit takes precedence: the input is disabled from then on.
#[must_use]
pub fn input_placeholder(limit_reached: bool, pending: bool) -> String {
    if limit_reached {
        format!("Max {MAX_SUBMISSIONS} prompts reached")
    } else if pending {
        "Waiting for answer...".to_string()
    } else {
        "Ask something...".to_string()
    }
}
