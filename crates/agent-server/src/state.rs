//! Application State

use std::sync::Arc;

use axum::http::HeaderMap;

use agent_core::{provider::GenerationOptions, LlmProvider};
use github_reporter::{GitHubToken, StatsFetcher};

/// Header carrying a per-request GitHub token
pub const TOKEN_HEADER: &str = "x-github-token";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// LLM provider (Ollama, etc.)
    pub provider: Arc<dyn LlmProvider>,

    pub fetcher: StatsFetcher,

    /// Token from `GITHUB_TOKEN`, if any
    pub token: Option<GitHubToken>,

    pub generation: GenerationOptions,
}

impl AppState {
    /// Credentials for one request: the header wins over the configured token
    pub fn credentials(&self, headers: &HeaderMap) -> Option<GitHubToken> {
        let header = headers.get(TOKEN_HEADER).and_then(|v| v.to_str().ok());
        GitHubToken::resolve(header, self.token.as_ref())
    }
}
