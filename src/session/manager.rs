// src/session/manager.rs — Session collection lifecycle for one user
//
// Owns the ordered session list (newest first) and the active selection.
// Every mutation persists the whole collection under `sessions:<email>`.
// When a save fails the in-memory change is kept and the error returned, so
// the caller can report it and a later `save()` retries.

use std::sync::Arc;

use chrono::Utc;

use super::{derive_title, ChatSession, Message, MessageRole};
use crate::analysis::{AmbiguityResult, Turn};
use crate::auth::User;
use crate::infra::errors::{PersistenceError, SessionError};
use crate::store::{self, KeyValueStore};

pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    user: User,
    sessions: Vec<ChatSession>,
    active_id: Option<String>,
    last_id_ms: i64,
}

impl SessionManager {
    /// Load the user's sessions. An absent or empty collection is replaced
    /// by one fresh session. Only read failures are returned; a failed save
    /// of the fresh session is logged and retried on the next mutation.
    pub fn load(store: Arc<dyn KeyValueStore>, user: User) -> Result<Self, PersistenceError> {
        let key = store::sessions_key(&user.email);
        let sessions: Vec<ChatSession> =
            store::load_json(store.as_ref(), &key)?.unwrap_or_default();

        let last_id_ms = sessions
            .iter()
            .filter_map(|s| s.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        let active_id = sessions.first().map(|s| s.id.clone());

        tracing::debug!(email = %user.email, sessions = sessions.len(), "sessions loaded");

        let mut manager = Self {
            store,
            user,
            sessions,
            active_id,
            last_id_ms,
        };

        if manager.sessions.is_empty() {
            if let Err(e) = manager.create_session() {
                tracing::warn!("Could not persist initial session: {e}");
            }
        }
        Ok(manager)
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Sessions in display order, newest first.
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn get(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active(&self) -> Option<&ChatSession> {
        self.active_id.as_deref().and_then(|id| self.get(id))
    }

    /// Persist the full collection.
    pub fn save(&self) -> Result<(), PersistenceError> {
        let key = store::sessions_key(&self.user.email);
        store::save_json(self.store.as_ref(), &key, &self.sessions)
    }

    /// Start a new session at the front of the list and make it active.
    /// Returns the new session id.
    pub fn create_session(&mut self) -> Result<String, SessionError> {
        let session = ChatSession::new(self.next_session_id(), &self.user.name);
        let id = session.id.clone();
        self.sessions.insert(0, session);
        self.active_id = Some(id.clone());
        tracing::info!(session = %id, "session created");
        self.save()?;
        Ok(id)
    }

    /// Remove a session. Removing the active one activates the newest
    /// remaining session, or a fresh one if none remain.
    pub fn delete_session(&mut self, id: &str) -> Result<(), SessionError> {
        let idx = self.index_of(id)?;
        self.sessions.remove(idx);
        tracing::info!(session = %id, "session deleted");

        let active_gone = self.active_id.as_deref().map_or(true, |a| a == id);
        if active_gone {
            match self.sessions.first() {
                Some(first) => self.active_id = Some(first.id.clone()),
                None => {
                    self.active_id = None;
                    self.create_session()?;
                    return Ok(());
                }
            }
        }
        self.save()?;
        Ok(())
    }

    pub fn select_session(&mut self, id: &str) -> Result<(), SessionError> {
        self.index_of(id)?;
        self.active_id = Some(id.to_string());
        Ok(())
    }

    pub fn rename_session(&mut self, id: &str, title: &str) -> Result<(), SessionError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(SessionError::EmptyTitle);
        }
        let idx = self.index_of(id)?;
        self.sessions[idx].title = title.to_string();
        self.save()?;
        Ok(())
    }

    /// Append a USER message. The first user message of a session also
    /// becomes its title.
    pub fn append_user_message(
        &mut self,
        session_id: &str,
        text: &str,
    ) -> Result<Message, SessionError> {
        let idx = self.index_of(session_id)?;
        let session = &mut self.sessions[idx];

        if !session.has_user_message() {
            session.title = derive_title(text);
        }
        let message = Message::user(text, session.next_timestamp());
        session.push(message.clone());

        self.save()?;
        Ok(message)
    }

    /// Append the AI reply for an analysis verdict.
    pub fn append_ai_message(
        &mut self,
        session_id: &str,
        result: &AmbiguityResult,
    ) -> Result<Message, SessionError> {
        let idx = self.index_of(session_id)?;
        let message = Message::from_result(result, self.sessions[idx].next_timestamp());
        self.push_and_save(idx, message)
    }

    /// Append the generic apology shown when an analysis fails.
    pub fn append_error_message(&mut self, session_id: &str) -> Result<Message, SessionError> {
        let idx = self.index_of(session_id)?;
        let message = Message::apology(self.sessions[idx].next_timestamp());
        self.push_and_save(idx, message)
    }

    /// The last `n` messages of a session as model turns, oldest first.
    pub fn history_window(&self, session_id: &str, n: usize) -> Result<Vec<Turn>, SessionError> {
        let session = self
            .get(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;
        let skip = session.messages.len().saturating_sub(n);
        Ok(session.messages[skip..]
            .iter()
            .map(|m| match m.role {
                MessageRole::User => Turn::user(m.content.clone()),
                MessageRole::Ai => Turn::model(m.content.clone()),
            })
            .collect())
    }

    fn push_and_save(&mut self, idx: usize, message: Message) -> Result<Message, SessionError> {
        self.sessions[idx].push(message.clone());
        self.save()?;
        Ok(message)
    }

    fn index_of(&self, id: &str) -> Result<usize, SessionError> {
        self.sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// Millisecond timestamp id, bumped past the last one handed out so ids
    /// stay unique when sessions are created within the same millisecond.
    fn next_session_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        self.last_id_ms = now.max(self.last_id_ms + 1);
        self.last_id_ms.to_string()
    }
}
