// src/session/mod.rs — Chat sessions and messages
//
// A ChatSession is one conversation thread. Messages are append-only and
// ordered by insertion; the serialized form uses camelCase keys and ISO-8601
// timestamps so it stays compatible with the web client's storage layout.

pub mod manager;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::AmbiguityResult;

pub use manager::SessionManager;

pub const DEFAULT_TITLE: &str = "New Requirement";
pub const TITLE_MAX_CHARS: usize = 30;
pub const STORY_FALLBACK: &str =
    "No ambiguity found, but I couldn't generate a story. Please elaborate.";
pub const APOLOGY: &str = "Sorry, I encountered an error while analyzing. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "AI")]
    Ai,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Text,
    Clarification,
    Story,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub kind: MessageType,
}

impl Message {
    fn new(role: MessageRole, content: String, kind: MessageType, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content,
            timestamp: at,
            kind,
        }
    }

    pub fn user(content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self::new(MessageRole::User, content.into(), MessageType::Text, at)
    }

    /// The welcome message every new session starts with.
    pub fn greeting(user_name: &str, at: DateTime<Utc>) -> Self {
        Self::new(
            MessageRole::Ai,
            format!(
                "Hello {user_name}! I'm your AI Requirement Analyst. Paste your requirement here, \
                 and I'll help you detect ambiguities and generate a solid User Story."
            ),
            MessageType::Text,
            at,
        )
    }

    /// Map an analysis verdict to the AI reply shown in the thread.
    pub fn from_result(result: &AmbiguityResult, at: DateTime<Utc>) -> Self {
        if result.is_ambiguous {
            return Self::new(
                MessageRole::Ai,
                numbered_list(&result.clarifications),
                MessageType::Clarification,
                at,
            );
        }
        let story = match result.user_story.as_deref() {
            Some(story) if !story.is_empty() => story.to_string(),
            _ => STORY_FALLBACK.to_string(),
        };
        Self::new(MessageRole::Ai, story, MessageType::Story, at)
    }

    pub fn apology(at: DateTime<Utc>) -> Self {
        Self::new(MessageRole::Ai, APOLOGY.to_string(), MessageType::Text, at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// A fresh session seeded with a greeting for `user_name`.
    pub fn new(id: String, user_name: &str) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: DEFAULT_TITLE.to_string(),
            messages: vec![Message::greeting(user_name, now)],
            updated_at: now,
        }
    }

    pub fn has_user_message(&self) -> bool {
        self.messages.iter().any(|m| m.role == MessageRole::User)
    }

    /// Current time, but never earlier than the last message.
    pub fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.messages.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        }
    }

    /// Append and bump `updated_at`. The caller is responsible for title
    /// derivation and persistence.
    pub(crate) fn push(&mut self, message: Message) {
        self.updated_at = message.timestamp;
        self.messages.push(message);
    }
}

/// Session title from the first user message: at most 30 characters, with
/// `...` appended when the text was cut.
pub fn derive_title(text: &str) -> String {
    if text.chars().count() > TITLE_MAX_CHARS {
        let head: String = text.chars().take(TITLE_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// `1. first\n2. second`: one line per item, 1-based.
pub fn numbered_list(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_derive_title_truncates_long_text() {
        let title = derive_title("Build a login page for admins to reset passwords");
        assert_eq!(title, "Build a login page for admins ...");
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS + 3);
    }

    #[test]
    fn test_derive_title_keeps_short_text() {
        assert_eq!(derive_title("Fix bug"), "Fix bug");
    }

    #[test]
    fn test_derive_title_exactly_thirty_chars() {
        let text = "a".repeat(30);
        assert_eq!(derive_title(&text), text);
    }

    #[test]
    fn test_derive_title_counts_chars_not_bytes() {
        let text = "é".repeat(31);
        assert_eq!(derive_title(&text), format!("{}...", "é".repeat(30)));
    }

    #[test]
    fn test_numbered_list() {
        let items = vec!["Who is the actor?".to_string(), "What is the trigger?".to_string()];
        assert_eq!(numbered_list(&items), "1. Who is the actor?\n2. What is the trigger?");
        assert_eq!(numbered_list(&[]), "");
    }

    #[test]
    fn test_from_result_ambiguous() {
        let result = AmbiguityResult {
            is_ambiguous: true,
            clarifications: vec!["Who is the actor?".into(), "What is the trigger?".into()],
            user_story: None,
            summary: "vague".into(),
        };
        let msg = Message::from_result(&result, Utc::now());
        assert_eq!(msg.role, MessageRole::Ai);
        assert_eq!(msg.kind, MessageType::Clarification);
        assert_eq!(msg.content, "1. Who is the actor?\n2. What is the trigger?");
    }

    #[test]
    fn test_from_result_story_and_fallback() {
        let mut result = AmbiguityResult {
            is_ambiguous: false,
            clarifications: vec![],
            user_story: Some("As a user, I want X, so that Y.".into()),
            summary: "clear".into(),
        };
        let msg = Message::from_result(&result, Utc::now());
        assert_eq!(msg.kind, MessageType::Story);
        assert_eq!(msg.content, "As a user, I want X, so that Y.");

        result.user_story = Some(String::new());
        assert_eq!(Message::from_result(&result, Utc::now()).content, STORY_FALLBACK);

        result.user_story = None;
        assert_eq!(Message::from_result(&result, Utc::now()).content, STORY_FALLBACK);
    }

    #[test]
    fn test_new_session_is_seeded() {
        let session = ChatSession::new("1".into(), "Alice");
        assert_eq!(session.title, DEFAULT_TITLE);
        assert_eq!(session.messages.len(), 1);
        assert!(session.messages[0].content.starts_with("Hello Alice!"));
        assert!(!session.has_user_message());
    }

    #[test]
    fn test_serialized_shape() {
        let session = ChatSession::new("1700000000000".into(), "Alice");
        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["messages"][0]["role"], "AI");
        assert_eq!(json["messages"][0]["type"], "text");
        // ISO-8601 timestamp string
        let ts = json["messages"][0]["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }

    #[test]
    fn test_missing_type_defaults_to_text() {
        let json = r#"{"id":"1","role":"USER","content":"hi","timestamp":"2026-01-01T00:00:00.000Z"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.kind, MessageType::Text);
        assert_eq!(msg.role, MessageRole::User);
    }
}
