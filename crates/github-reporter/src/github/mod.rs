//! GitHub API Integration
//!
//! The `GitHubApi` trait abstracts the three REST endpoints the fetcher uses,
//! with an HTTP implementation for the real API and an in-memory mock.

mod http;
mod mock;
pub mod pagination;

pub use http::{GitHubClientConfig, HttpGitHubClient};
pub use mock::{Endpoint, MockGitHubClient};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::credentials::GitHubToken;
use crate::error::GitHubError;

/// GitHub REST client trait (Strategy pattern)
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// `GET /users/{owner}`
    async fn get_user(&self, token: &GitHubToken, owner: &str) -> Result<UserResponse, GitHubError>;

    /// `GET /repos/{owner}/{repo}`
    async fn get_repository(
        &self,
        token: &GitHubToken,
        owner: &str,
        repo: &str,
    ) -> Result<RepoResponse, GitHubError>;

    /// `GET /repos/{owner}/{repo}/commits?per_page=1`
    async fn get_latest_commit(
        &self,
        token: &GitHubToken,
        owner: &str,
        repo: &str,
    ) -> Result<CommitPage, GitHubError>;

    fn name(&self) -> &str;
}

/// Subset of the user profile payload
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserResponse {
    pub login: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Subset of the repository payload
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RepoResponse {
    pub name: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub license: Option<LicenseInfo>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LicenseInfo {
    #[serde(default)]
    pub name: Option<String>,
}

/// One entry of the commit list
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CommitEntry {
    #[serde(default)]
    pub commit: CommitDetail,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CommitDetail {
    #[serde(default)]
    pub author: Option<GitSignature>,
    #[serde(default)]
    pub committer: Option<GitSignature>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GitSignature {
    #[serde(default)]
    pub date: Option<String>,
}

impl CommitEntry {
    pub fn authored_at(date: impl Into<String>) -> Self {
        Self {
            commit: CommitDetail {
                author: Some(GitSignature { date: Some(date.into()) }),
                committer: None,
            },
        }
    }

    /// Author timestamp, falling back to the committer timestamp
    pub fn date(&self) -> Option<&str> {
        let author = self.commit.author.as_ref().and_then(|s| s.date.as_deref());
        let committer = self.commit.committer.as_ref().and_then(|s| s.date.as_deref());
        author.or(committer)
    }
}

/// A page of commits plus the raw `Link` header that came with it
#[derive(Clone, Debug, Default)]
pub struct CommitPage {
    pub commits: Vec<CommitEntry>,
    pub link: Option<String>,
}
