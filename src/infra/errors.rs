// src/infra/errors.rs — Error types for reqanalyzer

use thiserror::Error;

/// Failures of the durable key-value store.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Stored value for '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
}

/// Failures of the mock authentication gate.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email or password. Use demo@example.com / password")]
    InvalidCredentials,

    #[error("Please fill in all fields.")]
    MissingFields,

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Errors raised by a model provider while talking to its API.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider '{provider}' error: {message}")]
    Http {
        provider: String,
        message: String,
        retriable: bool,
    },

    #[error("Rate limited by '{provider}', retry after {retry_after_ms}ms")]
    RateLimited {
        provider: String,
        retry_after_ms: u64,
    },
}

impl ProviderError {
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ProviderError::Http {
                retriable: true,
                ..
            } | ProviderError::RateLimited { .. }
        )
    }
}

/// Failures of one requirement analysis exchange.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Transport failure: {0}")]
    Transport(#[from] ProviderError),

    #[error("Malformed analysis response: {0}")]
    MalformedResponse(String),

    #[error("Analysis timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("No API key found. Set GEMINI_API_KEY (or GOOGLE_API_KEY).")]
    NoApiKey,
}

/// Session Manager failures.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session '{0}' not found")]
    NotFound(String),

    #[error("Session title cannot be empty")]
    EmptyTitle,

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Failures of a full submit cycle (user message in, AI message out).
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("An analysis is already in progress")]
    Busy,

    #[error("Nothing to analyze")]
    EmptyInput,

    #[error(transparent)]
    Session(#[from] SessionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retriable_classification() {
        let rl = ProviderError::RateLimited {
            provider: "google".into(),
            retry_after_ms: 5000,
        };
        assert!(rl.is_retriable());

        let server = ProviderError::Http {
            provider: "google".into(),
            message: "HTTP 503".into(),
            retriable: true,
        };
        assert!(server.is_retriable());

        let bad_request = ProviderError::Http {
            provider: "google".into(),
            message: "HTTP 400".into(),
            retriable: false,
        };
        assert!(!bad_request.is_retriable());
    }

    #[test]
    fn test_auth_messages_match_form_text() {
        assert_eq!(
            AuthError::MissingFields.to_string(),
            "Please fill in all fields."
        );
        assert!(AuthError::InvalidCredentials
            .to_string()
            .contains("demo@example.com"));
    }

    #[test]
    fn test_transport_wraps_provider_error() {
        let err: AnalysisError = ProviderError::RateLimited {
            provider: "google".into(),
            retry_after_ms: 10,
        }
        .into();
        assert!(matches!(err, AnalysisError::Transport(_)));
    }
}
