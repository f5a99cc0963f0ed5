//! HTTP GitHub Client
//!
//! `GitHubApi` over the GitHub REST v3 API using `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, LINK};
use serde::de::DeserializeOwned;
use url::Url;

use super::{CommitEntry, CommitPage, GitHubApi, RepoResponse, UserResponse};
use crate::credentials::GitHubToken;
use crate::error::{GitHubError, ReporterError};

const GITHUB_V3_JSON: &str = "application/vnd.github.v3+json";

/// HTTP client settings
#[derive(Clone, Debug)]
pub struct GitHubClientConfig {
    /// API root, without trailing slash
    pub base_url: String,

    pub timeout_secs: u64,

    pub user_agent: String,
}

impl Default for GitHubClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com".into(),
            timeout_secs: 30,
            user_agent: concat!("github-reporter/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl GitHubClientConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let base_url = std::env::var("GITHUB_API_URL").unwrap_or(defaults.base_url);
        let timeout_secs = std::env::var("GITHUB_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        Self {
            base_url,
            timeout_secs,
            ..defaults
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// GitHub REST client
pub struct HttpGitHubClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpGitHubClient {
    pub fn new(config: &GitHubClientConfig) -> Result<Self, ReporterError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ReporterError::Config(format!("Failed to build GitHub client: {}", e)))?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ReporterError::Config(format!("Invalid GitHub API URL '{}': {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ReporterError::Config(format!(
                "Invalid GitHub API URL '{}'",
                config.base_url
            )));
        }

        Ok(Self { http, base_url })
    }

    pub fn from_env() -> Result<Self, ReporterError> {
        Self::new(&GitHubClientConfig::from_env())
    }

    /// Append `segments` to the API root, each percent-encoded as one path segment.
    ///
    /// Empty and dot segments name no GitHub resource and resolve to not found.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GitHubError> {
        if segments.iter().any(|s| s.is_empty() || *s == "." || *s == "..") {
            tracing::debug!(?segments, "Rejected GitHub path segment");
            return Err(GitHubError::not_found());
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GitHubError::Transport(format!("Invalid GitHub API URL '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue an authenticated GET; non-2xx statuses become `GitHubError::Status`
    async fn get(
        &self,
        token: &GitHubToken,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response, GitHubError> {
        tracing::debug!(%url, "GitHub request");

        let response = self
            .http
            .get(url.clone())
            .query(query)
            .header(AUTHORIZATION, format!("token {}", token.expose()))
            .header(ACCEPT, GITHUB_V3_JSON)
            .send()
            .await
            .map_err(|e| GitHubError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%url, status = status.as_u16(), "GitHub request failed");
            return Err(GitHubError::status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status"),
            ));
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &GitHubToken,
        segments: &[&str],
    ) -> Result<T, GitHubError> {
        self.get(token, self.endpoint(segments)?, &[])
            .await?
            .json()
            .await
            .map_err(|e| GitHubError::Decode(e.to_string()))
    }
}

#[async_trait]
impl GitHubApi for HttpGitHubClient {
    async fn get_user(&self, token: &GitHubToken, owner: &str) -> Result<UserResponse, GitHubError> {
        self.get_json(token, &["users", owner]).await
    }

    async fn get_repository(
        &self,
        token: &GitHubToken,
        owner: &str,
        repo: &str,
    ) -> Result<RepoResponse, GitHubError> {
        self.get_json(token, &["repos", owner, repo]).await
    }

    async fn get_latest_commit(
        &self,
        token: &GitHubToken,
        owner: &str,
        repo: &str,
    ) -> Result<CommitPage, GitHubError> {
        let url = self.endpoint(&["repos", owner, repo, "commits"])?;
        let response = self.get(token, url, &[("per_page", "1")]).await?;

        let link = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let commits: Vec<CommitEntry> = response
            .json()
            .await
            .map_err(|e| GitHubError::Decode(e.to_string()))?;

        Ok(CommitPage { commits, link })
    }

    fn name(&self) -> &str {
        "GitHub REST v3"
    }
}
