//! Derived, display-only view of the transcript.
//!
//! The view is recomputed from the full transcript every time it is needed
//! and is never stored, so it cannot drift from the transcript.

use crate::message::{Message, Role};

/// How many of the most recent user messages stay visible.
pub const VISIBLE_USER_MESSAGES: usize = 3;

/// Messages to display: the last [`VISIBLE_USER_MESSAGES`] user messages and
/// every bot, note, and error message, in transcript order.
pub fn visible_messages(messages: &[Message]) -> Vec<&Message> {
    visible_messages_with(messages, VISIBLE_USER_MESSAGES)
}

/// Like [`visible_messages`] with an explicit user-message window.
///
/// A user message's recency is its rank among user messages only; the
/// non-user messages around it do not count.
pub fn visible_messages_with(messages: &[Message], user_window: usize) -> Vec<&Message> {
    let user_total = messages.iter().filter(|m| m.role() == Role::User).count();
    let first_visible = user_total.saturating_sub(user_window);

    let mut user_rank = 0;
    messages
        .iter()
        .filter(|m| {
            if m.role() != Role::User {
                return true;
            }
            let keep = user_rank >= first_visible;
            user_rank += 1;
            keep
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(view: &[&'a Message]) -> Vec<&'a str> {
        view.iter().map(|m| m.text()).collect()
    }

    #[test]
    fn test_empty_transcript() {
        assert!(visible_messages(&[]).is_empty());
    }

    #[test]
    fn test_fewer_than_window_shows_all() {
        let messages = vec![
            Message::user("U1"),
            Message::bot("B1"),
            Message::user("U2"),
        ];
        assert_eq!(texts(&visible_messages(&messages)), vec!["U1", "B1", "U2"]);
    }

    #[test]
    fn test_only_last_three_user_messages_visible() {
        let messages = vec![
            Message::user("U1"),
            Message::bot("B1"),
            Message::user("U2"),
            Message::error("E2"),
            Message::user("U3"),
            Message::bot("B3"),
            Message::note("N3"),
            Message::user("U4"),
            Message::bot("B4"),
            Message::user("U5"),
            Message::bot("B5"),
            Message::user("U6"),
            Message::error("E6"),
        ];

        let view = visible_messages(&messages);
        assert_eq!(
            texts(&view),
            vec!["B1", "E2", "B3", "N3", "U4", "B4", "U5", "B5", "U6", "E6"]
        );

        let users: Vec<&str> = view
            .iter()
            .filter(|m| m.role() == Role::User)
            .map(|m| m.text())
            .collect();
        assert_eq!(users, vec!["U4", "U5", "U6"]);
    }

    #[test]
    fn test_identical_user_texts_use_position() {
        let messages = vec![
            Message::user("same"),
            Message::bot("first answer"),
            Message::user("same"),
            Message::user("same"),
            Message::user("same"),
        ];

        let view = visible_messages(&messages);
        assert_eq!(view.len(), 4);
        assert_eq!(view[0].text(), "first answer");
        assert!(std::ptr::eq(view[1], &messages[2]));
    }

    #[test]
    fn test_non_user_messages_never_filtered() {
        let messages: Vec<Message> = (0..10).map(|i| Message::bot(format!("B{i}"))).collect();
        assert_eq!(visible_messages(&messages).len(), 10);
    }

    #[test]
    fn test_custom_window() {
        let messages = vec![Message::user("a"), Message::user("b"), Message::user("c")];
        assert_eq!(texts(&visible_messages_with(&messages, 1)), vec!["c"]);
        assert!(visible_messages_with(&messages, 0).is_empty());
    }
}
