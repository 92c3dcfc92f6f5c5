// src/provider/google.rs — Gemini generateContent over REST
//
// Wire types mirror the v1beta JSON. Prior turns map to `user`/`model`
// contents; a response schema switches the model to JSON output.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatRequest, ChatResponse, ModelProvider, Role, StopReason, TokenUsage};
use crate::infra::errors::ProviderError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const PROVIDER_ID: &str = "google";

/// Wait suggested to the retry layer on HTTP 429; Gemini sends no header.
const RATE_LIMIT_WAIT_MS: u64 = 5_000;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct GenerateResponse {
    candidates: Vec<Candidate>,
    usage_metadata: UsageMetadata,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct Candidate {
    content: Content,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct UsageMetadata {
    prompt_token_count: u32,
    candidates_token_count: u32,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

impl From<&ChatRequest> for GenerateRequest {
    fn from(request: &ChatRequest) -> Self {
        let contents = request
            .messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                };
                Content::text(Some(role), &m.content)
            })
            .collect();

        let config = GenerationConfig {
            max_output_tokens: request.max_tokens,
            temperature: request.temperature,
            response_mime_type: request
                .response_schema
                .as_ref()
                .map(|_| "application/json"),
            response_schema: request.response_schema.clone(),
        };
        let has_config = config.max_output_tokens.is_some()
            || config.temperature.is_some()
            || config.response_schema.is_some();

        Self {
            contents,
            system_instruction: request.system.as_deref().map(|s| Content::text(None, s)),
            generation_config: has_config.then_some(config),
        }
    }
}

impl From<GenerateResponse> for ChatResponse {
    fn from(resp: GenerateResponse) -> Self {
        let usage = TokenUsage {
            input_tokens: resp.usage_metadata.prompt_token_count,
            output_tokens: resp.usage_metadata.candidates_token_count,
        };
        let Some(first) = resp.candidates.into_iter().next() else {
            return ChatResponse {
                content: String::new(),
                usage,
                stop_reason: StopReason::Unknown,
            };
        };

        let stop_reason = match first.finish_reason.as_deref() {
            Some("STOP") => StopReason::EndTurn,
            Some("MAX_TOKENS") => StopReason::MaxTokens,
            Some("SAFETY") => StopReason::Safety,
            _ => StopReason::Unknown,
        };
        ChatResponse {
            content: first.content.parts.into_iter().map(|p| p.text).collect(),
            usage,
            stop_reason,
        }
    }
}

pub struct GoogleProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GoogleProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the provider at a different endpoint (proxies, local fakes).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }
}

fn http_error(message: String, retriable: bool) -> ProviderError {
    ProviderError::Http {
        provider: PROVIDER_ID.into(),
        message,
        retriable,
    }
}

#[async_trait]
impl ModelProvider for GoogleProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn name(&self) -> &str {
        "Google Gemini"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let body = GenerateRequest::from(&request);
        tracing::debug!(
            model = %request.model,
            turns = body.contents.len(),
            json = body.generation_config.is_some(),
            "gemini generateContent"
        );

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| http_error(e.to_string(), e.is_timeout() || e.is_connect()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited {
                provider: PROVIDER_ID.into(),
                retry_after_ms: RATE_LIMIT_WAIT_MS,
            });
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(http_error(
                format!("HTTP {status}: {detail}"),
                status.is_server_error(),
            ));
        }

        let decoded: GenerateResponse = response
            .json()
            .await
            .map_err(|e| http_error(format!("unreadable response body: {e}"), false))?;
        let parsed = ChatResponse::from(decoded);
        tracing::debug!(
            tokens = parsed.usage.total(),
            stop_reason = ?parsed.stop_reason,
            "gemini response"
        );
        Ok(parsed)
    }
}
