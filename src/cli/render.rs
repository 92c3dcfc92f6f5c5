// src/cli/render.rs — Plain-text rendering of sessions and messages
//
// Pure functions of state; the REPL and subcommands only print what these
// return.

use chrono::Local;

use crate::session::{ChatSession, Message, MessageRole, MessageType};

pub const TIPS: [&str; 3] = [
    "Identify specific actors like \"Project Lead\" or \"System Admin\".",
    "Quantify goals whenever possible for clearer metrics.",
    "Define the \"Why\" to provide business value context.",
];

pub fn render_message(message: &Message) -> String {
    let who = match message.role {
        MessageRole::User => "You",
        MessageRole::Ai => "Analyst",
    };
    let time = message.timestamp.with_timezone(&Local).format("%H:%M");

    let mut out = format!("{who} · {time}\n");
    match message.kind {
        MessageType::Clarification => out.push_str("  [AMBIGUITY DETECTED]\n"),
        MessageType::Story => out.push_str("  [FINAL USER STORY]\n"),
        MessageType::Text => {}
    }
    for line in message.content.lines() {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

pub fn render_transcript(session: &ChatSession) -> String {
    let mut out = format!("── {} ──\n\n", session.title);
    for message in &session.messages {
        out.push_str(&render_message(message));
        out.push('\n');
    }
    out
}

/// Numbered session list, 1-based, marking the active session with `*`.
pub fn render_session_list(sessions: &[ChatSession], active_id: Option<&str>) -> String {
    let mut out = String::new();
    for (i, session) in sessions.iter().enumerate() {
        let marker = if Some(session.id.as_str()) == active_id {
            "*"
        } else {
            " "
        };
        let date = session.updated_at.with_timezone(&Local).format("%Y-%m-%d");
        out.push_str(&format!(
            "{marker} {:>2}. {:<33}  {date}  ({} messages)\n",
            i + 1,
            session.title,
            session.messages.len()
        ));
    }
    out
}

pub fn render_tips() -> String {
    let mut out = String::from("Analyzer tips:\n");
    for tip in TIPS {
        out.push_str(&format!("  • {tip}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AmbiguityResult;
    use chrono::Utc;

    #[test]
    fn test_render_clarification_has_badge_and_indent() {
        let result = AmbiguityResult {
            is_ambiguous: true,
            clarifications: vec!["Who?".into(), "When?".into()],
            user_story: None,
            summary: String::new(),
        };
        let text = render_message(&Message::from_result(&result, Utc::now()));
        assert!(text.starts_with("Analyst · "));
        assert!(text.contains("[AMBIGUITY DETECTED]"));
        assert!(text.contains("\n  1. Who?\n  2. When?\n"));
    }

    #[test]
    fn test_render_user_message_has_no_badge() {
        let text = render_message(&Message::user("Fix bug", Utc::now()));
        assert!(text.starts_with("You · "));
        assert!(!text.contains('['));
        assert!(text.ends_with("  Fix bug\n"));
    }

    #[test]
    fn test_session_list_marks_active() {
        let a = ChatSession::new("1".into(), "Alice");
        let mut b = ChatSession::new("2".into(), "Alice");
        b.title = "Checkout".into();
        let list = render_session_list(&[b, a], Some("1"));
        let lines: Vec<&str> = list.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("   1. Checkout"));
        assert!(lines[1].starts_with("*  2. New Requirement"));
    }

    #[test]
    fn test_transcript_has_title_and_all_messages() {
        let session = ChatSession::new("1".into(), "Alice");
        let text = render_transcript(&session);
        assert!(text.starts_with("── New Requirement ──"));
        assert!(text.contains("Hello Alice!"));
    }
}
