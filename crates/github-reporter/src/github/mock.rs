//! Mock GitHub Client
//!
//! In-memory `GitHubApi` for tests and offline demos. Unknown users and
//! repositories answer 404 like the real API; individual endpoints can be
//! forced to fail. Every call is recorded.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{CommitEntry, CommitPage, GitHubApi, LicenseInfo, RepoResponse, UserResponse};
use crate::credentials::GitHubToken;
use crate::error::GitHubError;

/// The three upstream endpoints
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    User,
    Repository,
    Commits,
}

/// Mock client backed by static data
#[derive(Default)]
pub struct MockGitHubClient {
    users: HashMap<String, UserResponse>,
    repos: HashMap<(String, String), RepoResponse>,
    commits: HashMap<(String, String), CommitPage>,
    failures: HashMap<Endpoint, GitHubError>,
    calls: Mutex<Vec<(Endpoint, String)>>,
}

impl MockGitHubClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// `octocat` with a public `Hello-World` repository of 341 commits
    pub fn with_sample_data() -> Self {
        let link = r#"<https://api.github.com/repositories/1296269/commits?per_page=1&page=2>; rel="next", <https://api.github.com/repositories/1296269/commits?per_page=1&page=341>; rel="last""#;

        Self::new()
            .with_user(UserResponse {
                login: "octocat".into(),
                bio: None,
                followers: 9000,
                following: 9,
                avatar_url: Some("https://avatars.githubusercontent.com/u/583231?v=4".into()),
                location: Some("San Francisco".into()),
            })
            .with_repo(
                "octocat",
                RepoResponse {
                    name: "Hello-World".into(),
                    stargazers_count: 2600,
                    forks_count: 2400,
                    open_issues_count: 1300,
                    language: None,
                    license: Some(LicenseInfo { name: None }),
                },
            )
            .with_commits(
                "octocat",
                "Hello-World",
                CommitPage {
                    commits: vec![CommitEntry::authored_at("2012-03-06T23:06:50Z")],
                    link: Some(link.into()),
                },
            )
    }

    #[must_use]
    pub fn with_user(mut self, user: UserResponse) -> Self {
        self.users.insert(user.login.clone(), user);
        self
    }

    /// Register a repository; its name is taken from the payload
    #[must_use]
    pub fn with_repo(mut self, owner: impl Into<String>, repo: RepoResponse) -> Self {
        self.repos.insert((owner.into(), repo.name.clone()), repo);
        self
    }

    #[must_use]
    pub fn with_commits(
        mut self,
        owner: impl Into<String>,
        repo: impl Into<String>,
        page: CommitPage,
    ) -> Self {
        self.commits.insert((owner.into(), repo.into()), page);
        self
    }

    /// Make every call to `endpoint` fail with `error`
    #[must_use]
    pub fn failing(mut self, endpoint: Endpoint, error: GitHubError) -> Self {
        self.failures.insert(endpoint, error);
        self
    }

    /// Calls made so far, as `(endpoint, path)`
    pub fn calls(&self) -> Vec<(Endpoint, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn endpoints_called(&self) -> HashSet<Endpoint> {
        self.calls().into_iter().map(|(e, _)| e).collect()
    }

    fn record(&self, endpoint: Endpoint, path: String) -> Result<(), GitHubError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((endpoint, path));
        }
        match self.failures.get(&endpoint) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn key(owner: &str, repo: &str) -> (String, String) {
    (owner.to_string(), repo.to_string())
}

#[async_trait]
impl GitHubApi for MockGitHubClient {
    async fn get_user(&self, _token: &GitHubToken, owner: &str) -> Result<UserResponse, GitHubError> {
        self.record(Endpoint::User, format!("/users/{}", owner))?;
        self.users.get(owner).cloned().ok_or_else(GitHubError::not_found)
    }

    async fn get_repository(
        &self,
        _token: &GitHubToken,
        owner: &str,
        repo: &str,
    ) -> Result<RepoResponse, GitHubError> {
        self.record(Endpoint::Repository, format!("/repos/{}/{}", owner, repo))?;
        self.repos.get(&key(owner, repo)).cloned().ok_or_else(GitHubError::not_found)
    }

    async fn get_latest_commit(
        &self,
        _token: &GitHubToken,
        owner: &str,
        repo: &str,
    ) -> Result<CommitPage, GitHubError> {
        self.record(Endpoint::Commits, format!("/repos/{}/{}/commits", owner, repo))?;

        let repo_key = key(owner, repo);
        if let Some(page) = self.commits.get(&repo_key) {
            return Ok(page.clone());
        }
        if self.repos.contains_key(&repo_key) {
            // GitHub's answer for a repository without any commits
            Err(GitHubError::status(409, "Conflict"))
        } else {
            Err(GitHubError::not_found())
        }
    }

    fn name(&self) -> &str {
        "Mock"
    }
}
