//! Stats Fetcher
//!
//! Turns the owner-profile, repository and commit-history lookups into one
//! `RepositoryStats` record. `fetch` never fails: every upstream problem is
//! folded into the record's `status` / `errorMessage` or into null fields.

use std::sync::Arc;

use crate::credentials::GitHubToken;
use crate::error::FetchIssue;
use crate::github::{pagination, GitHubApi};
use crate::model::{CommitActivity, OwnerProfile, RepositoryStats};

/// Fetches and normalizes repository statistics
#[derive(Clone)]
pub struct StatsFetcher {
    api: Arc<dyn GitHubApi>,
}

impl StatsFetcher {
    pub fn new(api: Arc<dyn GitHubApi>) -> Self {
        Self { api }
    }

    pub fn api_name(&self) -> &str {
        self.api.name()
    }

    /// Look up `owner/repo`. Calls are issued one after another.
    pub async fn fetch(
        &self,
        owner: &str,
        repo: &str,
        credentials: Option<&GitHubToken>,
    ) -> RepositoryStats {
        let Some(token) = credentials else {
            tracing::warn!(owner, repo, "No GitHub token configured, skipping lookup");
            return RepositoryStats::unavailable(&FetchIssue::MissingCredentials, None);
        };

        tracing::debug!(owner, repo, api = self.api.name(), "Fetching repository stats");
        let user = self.owner_profile(token, owner).await;

        let repository = match self.api.get_repository(token, owner, repo).await {
            Ok(repository) => repository,
            Err(e) => {
                let issue = FetchIssue::from_repository_error(owner, repo, &e);
                tracing::warn!(owner, repo, error = %e, status = %issue.status(), "Repository lookup failed");
                return RepositoryStats::unavailable(&issue, user);
            }
        };

        let activity = self.commit_activity(token, owner, repo).await;
        RepositoryStats::available(owner, repo, repository, activity, user)
    }

    /// Best effort: any failure yields `None`
    async fn owner_profile(&self, token: &GitHubToken, owner: &str) -> Option<OwnerProfile> {
        match self.api.get_user(token, owner).await {
            Ok(user) => Some(user.into()),
            Err(e) => {
                tracing::warn!(owner, error = %e, "Owner profile unavailable");
                None
            }
        }
    }

    async fn commit_activity(&self, token: &GitHubToken, owner: &str, repo: &str) -> CommitActivity {
        match self.api.get_latest_commit(token, owner, repo).await {
            Ok(page) => CommitActivity {
                count: pagination::commit_count(&page),
                last_commit_date: page.commits.first().and_then(|c| c.date()).map(str::to_string),
            },
            Err(e) => {
                let issue = FetchIssue::PartialData(format!("commit history unavailable: {}", e));
                tracing::warn!(owner, repo, %issue, "Commit lookup failed");
                CommitActivity::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GitHubError;
    use crate::github::{CommitPage, Endpoint, MockGitHubClient, RepoResponse};
    use crate::model::FetchStatus;

    fn token() -> GitHubToken {
        GitHubToken::new("ghp_test").unwrap()
    }

    fn build(api: MockGitHubClient) -> (StatsFetcher, Arc<MockGitHubClient>) {
        let api = Arc::new(api);
        (StatsFetcher::new(api.clone()), api)
    }

    #[tokio::test]
    async fn test_octocat_hello_world() {
        let (fetcher, api) = build(MockGitHubClient::with_sample_data());
        let stats = fetcher.fetch("octocat", "Hello-World", Some(&token())).await;

        assert_eq!(stats.status, FetchStatus::Success);
        assert_eq!(stats.name.as_deref(), Some("Hello-World"));
        assert_eq!(stats.stars, Some(2600));
        assert_eq!(stats.forks, Some(2400));
        assert_eq!(stats.issues, Some(1300));
        assert_eq!(stats.commits, Some(341));
        assert_eq!(stats.location, "octocat/Hello-World");
        assert_eq!(stats.primary_language, "None");
        assert_eq!(stats.license, "None");
        assert_eq!(stats.last_commit_date, "2012-03-06T23:06:50Z");
        assert!(stats.error_message.is_none());

        let user = stats.user.unwrap();
        assert_eq!(user.login, "octocat");
        assert_eq!(user.bio, "None");
        assert_eq!(user.location, "San Francisco");

        let endpoints: Vec<Endpoint> = api.calls().into_iter().map(|(e, _)| e).collect();
        assert_eq!(endpoints, vec![Endpoint::User, Endpoint::Repository, Endpoint::Commits]);
    }

    #[tokio::test]
    async fn test_missing_repository_is_private() {
        let (fetcher, api) = build(MockGitHubClient::with_sample_data());
        let stats = fetcher.fetch("ghost", "does-not-exist-xyz", Some(&token())).await;

        assert_eq!(stats.status, FetchStatus::Private);
        let message = stats.error_message.unwrap();
        assert!(message.contains("ghost/does-not-exist-xyz"));
        assert!(stats.user.is_none());
        assert_eq!(stats.location, "Unknown");
        assert!(!api.endpoints_called().contains(&Endpoint::Commits));
    }

    #[tokio::test]
    async fn test_other_upstream_errors_are_not_found() {
        let (fetcher, _) = build(
            MockGitHubClient::with_sample_data()
                .failing(Endpoint::Repository, GitHubError::status(500, "Internal Server Error")),
        );
        let stats = fetcher.fetch("octocat", "Hello-World", Some(&token())).await;
        assert_eq!(stats.status, FetchStatus::NotFound);
        assert_eq!(
            stats.error_message.as_deref(),
            Some("Failed to fetch repository: Internal Server Error")
        );
        // profile is independent of the repository outcome
        assert!(stats.user.is_some());

        let (fetcher, _) = build(
            MockGitHubClient::with_sample_data()
                .failing(Endpoint::Repository, GitHubError::Transport("dns error".into())),
        );
        let stats = fetcher.fetch("octocat", "Hello-World", Some(&token())).await;
        assert_eq!(stats.status, FetchStatus::NotFound);
        assert_eq!(stats.error_message.as_deref(), Some("Error fetching repository: dns error"));
        assert_eq!(stats.name, None);
        assert_eq!(stats.stars, None);
    }

    #[tokio::test]
    async fn test_missing_token_makes_no_calls() {
        let (fetcher, api) = build(MockGitHubClient::with_sample_data());
        let stats = fetcher.fetch("octocat", "Hello-World", None).await;

        assert_eq!(stats.status, FetchStatus::NotFound);
        assert_eq!(stats.error_message.as_deref(), Some("GITHUB_TOKEN is required"));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_profile_failure_is_silent() {
        let (fetcher, _) = build(
            MockGitHubClient::with_sample_data()
                .failing(Endpoint::User, GitHubError::status(502, "Bad Gateway")),
        );
        let stats = fetcher.fetch("octocat", "Hello-World", Some(&token())).await;
        assert_eq!(stats.status, FetchStatus::Success);
        assert!(stats.user.is_none());
        assert!(stats.error_message.is_none());
    }

    #[tokio::test]
    async fn test_commit_failure_keeps_success() {
        let (fetcher, _) = build(
            MockGitHubClient::with_sample_data()
                .failing(Endpoint::Commits, GitHubError::Transport("timeout".into())),
        );
        let stats = fetcher.fetch("octocat", "Hello-World", Some(&token())).await;
        assert_eq!(stats.status, FetchStatus::Success);
        assert_eq!(stats.commits, None);
        assert_eq!(stats.last_commit_date, "None");
        assert!(stats.error_message.is_none());
    }

    #[tokio::test]
    async fn test_empty_repository_has_null_commits() {
        let api = MockGitHubClient::new().with_repo(
            "octocat",
            RepoResponse {
                name: "empty".into(),
                language: Some("Rust".into()),
                ..RepoResponse::default()
            },
        );
        let (fetcher, _) = build(api);
        let stats = fetcher.fetch("octocat", "empty", Some(&token())).await;
        assert_eq!(stats.status, FetchStatus::Success);
        assert_eq!(stats.commits, None);
        assert_eq!(stats.primary_language, "Rust");
        assert_eq!(stats.stars, Some(0));
    }

    #[tokio::test]
    async fn test_single_page_counts_one_commit() {
        let api = MockGitHubClient::with_sample_data().with_commits(
            "octocat",
            "Hello-World",
            CommitPage {
                commits: vec![crate::github::CommitEntry::authored_at("2024-05-01T10:00:00Z")],
                link: None,
            },
        );
        let (fetcher, _) = build(api);
        let stats = fetcher.fetch("octocat", "Hello-World", Some(&token())).await;
        assert_eq!(stats.commits, Some(1));
        assert_eq!(stats.last_commit_date, "2024-05-01T10:00:00Z");
    }

    #[tokio::test]
    async fn test_fetch_is_idempotent() {
        let (fetcher, _) = build(MockGitHubClient::with_sample_data());
        let first = serde_json::to_string(&fetcher.fetch("octocat", "Hello-World", Some(&token())).await).unwrap();
        let second = serde_json::to_string(&fetcher.fetch("octocat", "Hello-World", Some(&token())).await).unwrap();
        assert_eq!(first, second);
    }
}
