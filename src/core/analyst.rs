// src/core/analyst.rs — One request/response cycle of the requirement chat
//
// submit(): capture the history window, append the user's message, ask the
// analysis client, append the verdict (or an apology on failure), persist.
// Only one cycle may be in flight at a time, system-wide.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::analysis::AnalysisClient;
use crate::infra::errors::{AnalysisError, PersistenceError, SessionError, SubmitError};
use crate::session::{Message, SessionManager};

/// What one submit produced.
#[derive(Debug)]
pub struct SubmitOutcome {
    pub user_message: Message,
    pub reply: Message,
    /// Set when the reply is the apology; the detail is for logs only.
    pub analysis_error: Option<AnalysisError>,
    /// Set when the session could not be saved after this cycle.
    pub save_error: Option<PersistenceError>,
}

pub struct Analyst {
    client: AnalysisClient,
    typing: AtomicBool,
}

/// Clears the typing flag when the cycle ends, even if the future is dropped.
struct TypingGuard<'a>(&'a AtomicBool);

impl Drop for TypingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Analyst {
    pub fn new(client: AnalysisClient) -> Self {
        Self {
            client,
            typing: AtomicBool::new(false),
        }
    }

    pub fn client(&self) -> &AnalysisClient {
        &self.client
    }

    /// True while an analysis call is outstanding.
    pub fn is_typing(&self) -> bool {
        self.typing.load(Ordering::Acquire)
    }

    pub async fn submit(
        &self,
        sessions: &mut SessionManager,
        session_id: &str,
        text: &str,
    ) -> Result<SubmitOutcome, SubmitError> {
        if text.trim().is_empty() {
            return Err(SubmitError::EmptyInput);
        }
        if self
            .typing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SubmitError::Busy);
        }
        let _guard = TypingGuard(&self.typing);

        // History is taken before the new message lands; the new text is
        // sent separately as the final user turn.
        let history = sessions.history_window(session_id, self.client.history_window())?;

        let mut save_error = None;
        let user_message = tolerate_unsaved(
            sessions.append_user_message(session_id, text),
            sessions,
            session_id,
            &mut save_error,
        )?;

        let (reply, analysis_error) = match self.client.analyze(text, &history).await {
            Ok(result) => {
                let reply = tolerate_unsaved(
                    sessions.append_ai_message(session_id, &result),
                    sessions,
                    session_id,
                    &mut save_error,
                )?;
                (reply, None)
            }
            Err(e) => {
                tracing::warn!(session = session_id, "Analysis failed: {e}");
                let reply = tolerate_unsaved(
                    sessions.append_error_message(session_id),
                    sessions,
                    session_id,
                    &mut save_error,
                )?;
                (reply, Some(e))
            }
        };

        Ok(SubmitOutcome {
            user_message,
            reply,
            analysis_error,
            save_error,
        })
    }
}

/// A failed save leaves the message appended in memory; recover it so the
/// cycle can continue and report the save failure at the end.
fn tolerate_unsaved(
    result: Result<Message, SessionError>,
    sessions: &SessionManager,
    session_id: &str,
    save_error: &mut Option<PersistenceError>,
) -> Result<Message, SessionError> {
    match result {
        Ok(message) => Ok(message),
        Err(SessionError::Persistence(e)) => {
            tracing::warn!(session = session_id, "Session not saved: {e}");
            *save_error = Some(e);
            sessions
                .get(session_id)
                .and_then(|s| s.messages.last().cloned())
                .ok_or_else(|| SessionError::NotFound(session_id.to_string()))
        }
        Err(other) => Err(other),
    }
}
