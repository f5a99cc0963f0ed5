//! Domain Models
//!
//! The normalized stats record produced for one owner/repository lookup.
//!
//! Missing-value convention: descriptive strings are always present and use
//! the sentinel `"None"` (`"Unknown"` for `location`); counts and the
//! repository name use `null`.

use serde::{Deserialize, Serialize};

use crate::error::FetchIssue;
use crate::github::{RepoResponse, UserResponse};

/// Placeholder for a string field that could not be determined
pub const NONE_SENTINEL: &str = "None";

/// Placeholder for the repository location when the repository is unavailable
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// Outcome of the repository lookup
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    Success,
    /// Upstream answered 404: private to this token, or nonexistent
    Private,
    NotFound,
}

impl std::fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            FetchStatus::Success => "success",
            FetchStatus::Private => "private",
            FetchStatus::NotFound => "not_found",
        })
    }
}

/// Public profile of the repository owner
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerProfile {
    pub login: String,
    pub bio: String,
    pub followers: u64,
    pub following: u64,
    pub avatar_url: String,
    pub location: String,
}

impl From<UserResponse> for OwnerProfile {
    fn from(user: UserResponse) -> Self {
        Self {
            login: user.login,
            bio: or_sentinel(user.bio),
            followers: user.followers,
            following: user.following,
            avatar_url: or_sentinel(user.avatar_url),
            location: or_sentinel(user.location),
        }
    }
}

/// Commit information derived from the commit-history lookup
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommitActivity {
    /// Approximate total commit count
    pub count: Option<u64>,
    /// Timestamp of the most recent commit
    pub last_commit_date: Option<String>,
}

/// Normalized statistics for one repository and its owner
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryStats {
    pub name: Option<String>,
    pub stars: Option<u64>,
    pub forks: Option<u64>,
    pub issues: Option<u64>,
    pub commits: Option<u64>,
    pub location: String,
    pub primary_language: String,
    pub last_commit_date: String,
    pub license: String,
    pub user: Option<OwnerProfile>,
    pub status: FetchStatus,
    pub error_message: Option<String>,
}

impl RepositoryStats {
    /// Record for a repository that was found
    pub fn available(
        owner: &str,
        repo: &str,
        repository: RepoResponse,
        activity: CommitActivity,
        user: Option<OwnerProfile>,
    ) -> Self {
        Self {
            name: Some(repository.name),
            stars: Some(repository.stargazers_count),
            forks: Some(repository.forks_count),
            issues: Some(repository.open_issues_count),
            commits: activity.count.filter(|n| *n > 0),
            location: format!("{}/{}", owner, repo),
            primary_language: or_sentinel(repository.language),
            last_commit_date: or_sentinel(activity.last_commit_date),
            license: or_sentinel(repository.license.and_then(|l| l.name)),
            user,
            status: FetchStatus::Success,
            error_message: None,
        }
    }

    /// Record for a repository lookup that did not succeed
    pub fn unavailable(issue: &FetchIssue, user: Option<OwnerProfile>) -> Self {
        Self {
            name: None,
            stars: None,
            forks: None,
            issues: None,
            commits: None,
            location: UNKNOWN_LOCATION.into(),
            primary_language: NONE_SENTINEL.into(),
            last_commit_date: NONE_SENTINEL.into(),
            license: NONE_SENTINEL.into(),
            user,
            status: issue.status(),
            error_message: Some(issue.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == FetchStatus::Success
    }
}

/// Empty or missing strings collapse to the sentinel
fn or_sentinel(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| NONE_SENTINEL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::LicenseInfo;
    use serde_json::json;

    fn hello_world() -> RepoResponse {
        RepoResponse {
            name: "Hello-World".into(),
            stargazers_count: 2600,
            forks_count: 2400,
            open_issues_count: 1300,
            language: None,
            license: Some(LicenseInfo { name: Some("MIT License".into()) }),
        }
    }

    #[test]
    fn test_available_record_serializes_camel_case() {
        let activity = CommitActivity {
            count: Some(3),
            last_commit_date: Some("2012-03-06T23:06:50Z".into()),
        };
        let stats = RepositoryStats::available("octocat", "Hello-World", hello_world(), activity, None);
        let value = serde_json::to_value(&stats).unwrap();

        assert_eq!(value["status"], "success");
        assert_eq!(value["location"], "octocat/Hello-World");
        assert_eq!(value["primaryLanguage"], "None");
        assert_eq!(value["license"], "MIT License");
        assert_eq!(value["lastCommitDate"], "2012-03-06T23:06:50Z");
        assert_eq!(value["commits"], 3);
        assert_eq!(value["user"], serde_json::Value::Null);
        assert_eq!(value["errorMessage"], serde_json::Value::Null);
    }

    #[test]
    fn test_zero_commits_reported_as_null() {
        let activity = CommitActivity { count: Some(0), last_commit_date: None };
        let stats = RepositoryStats::available("o", "r", hello_world(), activity, None);
        assert_eq!(stats.commits, None);
        assert_eq!(stats.last_commit_date, NONE_SENTINEL);
    }

    #[test]
    fn test_unavailable_record_uses_sentinels() {
        let stats = RepositoryStats::unavailable(&FetchIssue::MissingCredentials, None);
        let value = serde_json::to_value(&stats).unwrap();

        assert_eq!(
            value,
            json!({
                "name": null,
                "stars": null,
                "forks": null,
                "issues": null,
                "commits": null,
                "location": "Unknown",
                "primaryLanguage": "None",
                "lastCommitDate": "None",
                "license": "None",
                "user": null,
                "status": "not_found",
                "errorMessage": "GITHUB_TOKEN is required"
            })
        );
    }

    #[test]
    fn test_owner_profile_blank_fields_become_sentinel() {
        let profile = OwnerProfile::from(UserResponse {
            login: "octocat".into(),
            bio: Some(String::new()),
            followers: 10,
            following: 0,
            avatar_url: Some("https://avatars.githubusercontent.com/u/583231".into()),
            location: None,
        });
        assert_eq!(profile.bio, "None");
        assert_eq!(profile.location, "None");
        assert_eq!(profile.avatar_url, "https://avatars.githubusercontent.com/u/583231");

        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("avatarUrl").is_some());
    }
}
