//! Transcript message types.

use serde::{Deserialize, Serialize};

/// Who (or what) produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A question typed by the user.
    User,
    /// An answer returned by the answer service.
    Bot,
    /// A secondary annotation that accompanies an answer.
    Note,
    /// A failure to obtain an answer.
    Error,
}

impl Role {
    /// Lowercase name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
            Role::Note => "note",
            Role::Error => "error",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry in the transcript.
///
/// Fields are private so a message cannot change once it has been built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    text: String,
}

impl Message {
    /// Create a message with an explicit role.
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    /// Create a user question.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create a bot answer.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Role::Bot, text)
    }

    /// Create an answer annotation.
    pub fn note(text: impl Into<String>) -> Self {
        Self::new(Role::Note, text)
    }

    /// Create an error entry.
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Role::Error, text)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        assert_eq!(Message::user("q").role(), Role::User);
        assert_eq!(Message::bot("a").role(), Role::Bot);
        assert_eq!(Message::note("n").role(), Role::Note);
        assert_eq!(Message::error("e").role(), Role::Error);
        assert_eq!(Message::user("hello").text(), "hello");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::note("tip")).unwrap();
        assert_eq!(json, r#"{"role":"note","text":"tip"}"#);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Bot.to_string(), "bot");
        assert_eq!(Role::Error.as_str(), "error");
    }
}
