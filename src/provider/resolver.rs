// src/provider/resolver.rs — API key discovery and provider assembly

use std::sync::Arc;

use super::google::GoogleProvider;
use super::retry::{Backoff, RetryingProvider};
use super::ModelProvider;
use crate::infra::config::AnalysisConfig;
use crate::infra::errors::AnalysisError;

/// Env vars checked for a Gemini key, in priority order.
pub const API_KEY_VARS: [&str; 3] = ["GEMINI_API_KEY", "GOOGLE_API_KEY", "API_KEY"];

/// First non-empty key found through `lookup`.
pub fn resolve_api_key_with<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_VARS
        .iter()
        .filter_map(|var| lookup(var))
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

pub fn resolve_api_key() -> Option<String> {
    resolve_api_key_with(|var| std::env::var(var).ok())
}

/// Build the Gemini provider, wrapped in retry when retries are enabled.
pub fn build_provider(config: &AnalysisConfig) -> Result<Arc<dyn ModelProvider>, AnalysisError> {
    let key = resolve_api_key().ok_or(AnalysisError::NoApiKey)?;
    let google: Arc<dyn ModelProvider> = Arc::new(GoogleProvider::new(key));
    if config.max_retries == 0 {
        return Ok(google);
    }
    Ok(Arc::new(RetryingProvider::new(
        google,
        Backoff::with_retries(config.max_retries),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_gemini_key_wins() {
        let lookup = lookup_from(&[("GOOGLE_API_KEY", "g"), ("GEMINI_API_KEY", "gem")]);
        assert_eq!(resolve_api_key_with(lookup), Some("gem".into()));
    }

    #[test]
    fn test_falls_back_to_generic_api_key() {
        let lookup = lookup_from(&[("API_KEY", " plain \n")]);
        assert_eq!(resolve_api_key_with(lookup), Some("plain".into()));
    }

    #[test]
    fn test_blank_keys_are_skipped() {
        let lookup = lookup_from(&[("GEMINI_API_KEY", "  "), ("GOOGLE_API_KEY", "g")]);
        assert_eq!(resolve_api_key_with(lookup), Some("g".into()));
    }

    #[test]
    fn test_no_key() {
        assert!(resolve_api_key_with(lookup_from(&[])).is_none());
    }
}
