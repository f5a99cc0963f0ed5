//! Reporter Configuration
//!
//! Read from the environment (after `.env` has been loaded by the binary).

use std::sync::Arc;

use agent_core::provider::{GenerationOptions, DEFAULT_MODEL};

use crate::credentials::GitHubToken;
use crate::error::Result;
use crate::fetcher::StatsFetcher;
use crate::github::{GitHubClientConfig, HttpGitHubClient};

pub const MODEL_ENV: &str = "REPORTER_MODEL";

#[derive(Clone, Debug)]
pub struct ReporterConfig {
    pub github: GitHubClientConfig,

    /// Default credentials; requests may supply their own
    pub token: Option<GitHubToken>,

    pub model: String,
}

impl ReporterConfig {
    pub fn from_env() -> Self {
        Self {
            github: GitHubClientConfig::from_env(),
            token: GitHubToken::from_env(),
            model: std::env::var(MODEL_ENV)
                .ok()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.into()),
        }
    }

    pub fn generation(&self) -> GenerationOptions {
        GenerationOptions::with_model(self.model.clone())
    }

    /// Fetcher backed by the real GitHub API
    pub fn http_fetcher(&self) -> Result<StatsFetcher> {
        let client = HttpGitHubClient::new(&self.github)?;
        Ok(StatsFetcher::new(Arc::new(client)))
    }
}
