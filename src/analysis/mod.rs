// src/analysis/mod.rs — Requirement analysis client
//
// Forwards the trailing conversation window plus the new requirement text to
// the model under a fixed analyst persona, and decodes the JSON verdict.

pub mod parser;
pub mod prompt;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::infra::config::AnalysisConfig;
use crate::infra::errors::AnalysisError;
use crate::provider::{ChatRequest, Message, ModelProvider};

/// The model's verdict for one exchange. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbiguityResult {
    pub is_ambiguous: bool,
    #[serde(default)]
    pub clarifications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_story: Option<String>,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

/// One role-tagged message of prior conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            text: text.into(),
        }
    }
}

impl From<&Turn> for Message {
    fn from(turn: &Turn) -> Self {
        match turn.role {
            TurnRole::User => Message::user(turn.text.clone()),
            TurnRole::Model => Message::assistant(turn.text.clone()),
        }
    }
}

pub struct AnalysisClient {
    provider: Arc<dyn ModelProvider>,
    model: String,
    history_window: usize,
    timeout: Duration,
    temperature: Option<f32>,
}

impl AnalysisClient {
    pub fn new(provider: Arc<dyn ModelProvider>, config: &AnalysisConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            history_window: config.history_window,
            timeout: config.timeout(),
            temperature: config.temperature,
        }
    }

    pub fn history_window(&self) -> usize {
        self.history_window
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the provider request: the last `history_window` turns (oldest
    /// dropped first) followed by `input` as a user turn.
    pub fn build_request(&self, input: &str, prior_turns: &[Turn]) -> ChatRequest {
        let skip = prior_turns.len().saturating_sub(self.history_window);
        let mut messages: Vec<Message> = prior_turns[skip..].iter().map(Message::from).collect();
        messages.push(Message::user(input));

        ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            system: Some(prompt::SYSTEM_INSTRUCTION.to_string()),
            response_schema: Some(prompt::response_schema()),
            ..Default::default()
        }
    }

    /// Run one analysis exchange, bounded by the configured timeout.
    pub async fn analyze(
        &self,
        input: &str,
        prior_turns: &[Turn],
    ) -> Result<AmbiguityResult, AnalysisError> {
        let request = self.build_request(input, prior_turns);
        tracing::debug!(
            provider = self.provider.id(),
            model = %self.model,
            history = request.messages.len() - 1,
            "analyzing requirement"
        );

        let response = tokio::time::timeout(self.timeout, self.provider.chat(request))
            .await
            .map_err(|_| AnalysisError::Timeout {
                seconds: self.timeout.as_secs(),
            })??;

        let result = parser::parse_analysis(&response.content)?;
        tracing::info!(
            ambiguous = result.is_ambiguous,
            clarifications = result.clarifications.len(),
            tokens = response.usage.total(),
            "analysis complete"
        );
        Ok(result)
    }
}
