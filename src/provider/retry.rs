// src/provider/retry.rs — Backoff wrapper for transient Gemini failures
//
// Only errors flagged retriable by the provider are retried (429, 5xx,
// connect/read failures). A 4xx verdict such as a bad key comes back at once.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{ChatRequest, ChatResponse, ModelProvider};
use crate::infra::errors::ProviderError;

/// Doubling waits between attempts, bounded by `ceiling`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backoff {
    pub retries: u32,
    pub first_wait: Duration,
    pub ceiling: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            retries: 2,
            first_wait: Duration::from_secs(1),
            ceiling: Duration::from_secs(10),
        }
    }
}

impl Backoff {
    pub fn with_retries(retries: u32) -> Self {
        Self {
            retries,
            ..Self::default()
        }
    }

    /// Wait before retry number `retry` (0 for the first retry). A server
    /// `retry-after` hint replaces the computed wait but is still capped.
    pub fn wait(&self, retry: u32, hint: Option<Duration>) -> Duration {
        let computed = self
            .first_wait
            .checked_mul(1u32.checked_shl(retry).unwrap_or(u32::MAX))
            .unwrap_or(self.ceiling);
        hint.unwrap_or(computed).min(self.ceiling)
    }
}

fn retry_after(error: &ProviderError) -> Option<Duration> {
    match *error {
        ProviderError::RateLimited { retry_after_ms, .. } if retry_after_ms > 0 => {
            Some(Duration::from_millis(retry_after_ms))
        }
        _ => None,
    }
}

/// Any provider, re-asked on transient errors.
pub struct RetryingProvider {
    inner: Arc<dyn ModelProvider>,
    backoff: Backoff,
}

impl RetryingProvider {
    pub fn new(inner: Arc<dyn ModelProvider>, backoff: Backoff) -> Self {
        Self { inner, backoff }
    }
}

#[async_trait]
impl ModelProvider for RetryingProvider {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let mut retry = 0;
        loop {
            let err = match self.inner.chat(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(err) => err,
            };
            if retry >= self.backoff.retries || !err.is_retriable() {
                return Err(err);
            }

            let wait = self.backoff.wait(retry, retry_after(&err));
            retry += 1;
            tracing::warn!(
                provider = self.inner.id(),
                retry,
                of = self.backoff.retries,
                wait_ms = wait.as_millis() as u64,
                "Gemini call failed, retrying: {err}"
            );
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{StopReason, TokenUsage};
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails `failures` times, then answers "ok".
    struct FlakyProvider {
        failures: u32,
        retriable: bool,
        calls: AtomicU32,
    }

    impl FlakyProvider {
        fn new(failures: u32, retriable: bool) -> Arc<Self> {
            Arc::new(Self {
                failures,
                retriable,
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ModelProvider for FlakyProvider {
        fn id(&self) -> &str {
            "flaky"
        }
        fn name(&self) -> &str {
            "Flaky"
        }
        async fn chat(&self, _req: ChatRequest) -> Result<ChatResponse, ProviderError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
                return Err(ProviderError::Http {
                    provider: "flaky".into(),
                    message: "HTTP 503".into(),
                    retriable: self.retriable,
                });
            }
            Ok(ChatResponse {
                content: "ok".into(),
                usage: TokenUsage::default(),
                stop_reason: StopReason::EndTurn,
            })
        }
    }

    fn quick(retries: u32) -> Backoff {
        Backoff {
            retries,
            first_wait: Duration::from_millis(1),
            ceiling: Duration::from_millis(2),
        }
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failures() {
        let inner = FlakyProvider::new(2, true);
        let provider = RetryingProvider::new(inner.clone(), quick(2));
        let resp = provider.chat(ChatRequest::default()).await.unwrap();
        assert_eq!(resp.content, "ok");
        assert_eq!(inner.calls(), 3);
    }

    #[tokio::test]
    async fn test_stops_when_retries_run_out() {
        let inner = FlakyProvider::new(5, true);
        let provider = RetryingProvider::new(inner.clone(), quick(1));
        assert!(provider.chat(ChatRequest::default()).await.is_err());
        assert_eq!(inner.calls(), 2);
    }

    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let inner = FlakyProvider::new(1, false);
        let provider = RetryingProvider::new(inner.clone(), quick(3));
        assert!(provider.chat(ChatRequest::default()).await.is_err());
        assert_eq!(inner.calls(), 1);
    }

    #[test]
    fn test_wait_doubles_up_to_ceiling() {
        let backoff = Backoff::default();
        assert_eq!(backoff.wait(0, None), Duration::from_secs(1));
        assert_eq!(backoff.wait(1, None), Duration::from_secs(2));
        assert_eq!(backoff.wait(3, None), Duration::from_secs(8));
        assert_eq!(backoff.wait(4, None), Duration::from_secs(10));
        assert_eq!(backoff.wait(40, None), Duration::from_secs(10));
    }

    #[test]
    fn test_retry_after_hint() {
        let backoff = Backoff::default();
        let limited = ProviderError::RateLimited {
            provider: "google".into(),
            retry_after_ms: 3_000,
        };
        assert_eq!(
            backoff.wait(0, retry_after(&limited)),
            Duration::from_secs(3)
        );

        let huge = Some(Duration::from_secs(60));
        assert_eq!(backoff.wait(0, huge), Duration::from_secs(10));

        let no_hint = ProviderError::RateLimited {
            provider: "google".into(),
            retry_after_ms: 0,
        };
        assert_eq!(retry_after(&no_hint), None);
    }
}
