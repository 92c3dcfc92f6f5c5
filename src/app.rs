// src/app.rs — Explicit application state handed to every CLI handler

use std::sync::Arc;

use anyhow::Context;

use crate::analysis::AnalysisClient;
use crate::auth::{AuthGate, User};
use crate::core::Analyst;
use crate::infra::config::Config;
use crate::infra::errors::AnalysisError;
use crate::provider::{resolver, ModelProvider};
use crate::session::SessionManager;
use crate::store::{FileStore, KeyValueStore};

pub struct App {
    pub config: Config,
    pub store: Arc<dyn KeyValueStore>,
    pub auth: AuthGate,
}

impl App {
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>) -> Self {
        let auth = AuthGate::new(store.clone());
        Self {
            config,
            store,
            auth,
        }
    }

    /// File-backed store at the configured (or default) location.
    pub fn from_config(config: Config) -> Self {
        let dir = config.storage.store_dir();
        tracing::debug!(dir = %dir.display(), "using file store");
        Self::new(config, Arc::new(FileStore::new(dir)))
    }

    pub fn require_user(&self) -> anyhow::Result<User> {
        self.auth
            .restore_session()
            .context("Not logged in. Run `reqanalyzer login` or `reqanalyzer signup` first.")
    }

    pub fn sessions_for(&self, user: User) -> anyhow::Result<SessionManager> {
        SessionManager::load(self.store.clone(), user).context("Failed to load sessions")
    }

    /// Analyst backed by Gemini, with the key taken from the environment.
    pub fn analyst(&self) -> Result<Analyst, AnalysisError> {
        let provider = resolver::build_provider(&self.config.analysis)?;
        Ok(self.analyst_with(provider))
    }

    pub fn analyst_with(&self, provider: Arc<dyn ModelProvider>) -> Analyst {
        Analyst::new(AnalysisClient::new(provider, &self.config.analysis))
    }
}
