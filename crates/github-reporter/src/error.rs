//! Error Types for the GitHub Reporter

use agent_core::AgentError;
use thiserror::Error;

use crate::model::FetchStatus;

pub type Result<T> = std::result::Result<T, ReporterError>;

/// Failures that abort a workflow step or tool call
#[derive(Error, Debug)]
pub enum ReporterError {
    /// Step or tool received no usable payload
    #[error("{0}")]
    MissingInput(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ReporterError> for AgentError {
    fn from(err: ReporterError) -> Self {
        match err {
            ReporterError::MissingInput(msg) => AgentError::InvalidInput(msg),
            ReporterError::InvalidInput(msg) => AgentError::InvalidInput(msg),
            ReporterError::Config(msg) => AgentError::Config(msg),
            ReporterError::Serialization(e) => AgentError::Json(e),
        }
    }
}

/// Failure talking to the GitHub REST API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GitHubError {
    /// Non-2xx response
    #[error("GitHub returned {status} {reason}")]
    Status { status: u16, reason: String },

    /// Connection, DNS or timeout failure
    #[error("{0}")]
    Transport(String),

    /// Body did not match the expected shape
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl GitHubError {
    pub fn status(status: u16, reason: impl Into<String>) -> Self {
        GitHubError::Status {
            status,
            reason: reason.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::status(404, "Not Found")
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GitHubError::Status { status: 404, .. })
    }
}

/// Why a stats record is incomplete.
///
/// These never surface as `Err`: the fetcher folds them into the record's
/// `status` and `errorMessage` fields (or into null fields for partial data).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchIssue {
    #[error("GITHUB_TOKEN is required")]
    MissingCredentials,

    /// GitHub answers 404 both for missing repositories and for ones the token cannot see
    #[error("Repository {owner}/{repo} is private or does not exist")]
    RepositoryPrivateOrMissing { owner: String, repo: String },

    #[error("{0}")]
    UpstreamFailure(String),

    #[error("Partial data: {0}")]
    PartialData(String),
}

impl FetchIssue {
    /// Classify a failed repository lookup
    pub fn from_repository_error(owner: &str, repo: &str, err: &GitHubError) -> Self {
        match err {
            e if e.is_not_found() => FetchIssue::RepositoryPrivateOrMissing {
                owner: owner.to_string(),
                repo: repo.to_string(),
            },
            GitHubError::Status { reason, .. } => {
                FetchIssue::UpstreamFailure(format!("Failed to fetch repository: {}", reason))
            }
            GitHubError::Transport(msg) | GitHubError::Decode(msg) => {
                FetchIssue::UpstreamFailure(format!("Error fetching repository: {}", msg))
            }
        }
    }

    /// Record status this issue maps to
    pub fn status(&self) -> FetchStatus {
        match self {
            FetchIssue::RepositoryPrivateOrMissing { .. } => FetchStatus::Private,
            FetchIssue::MissingCredentials | FetchIssue::UpstreamFailure(_) => FetchStatus::NotFound,
            FetchIssue::PartialData(_) => FetchStatus::Success,
        }
    }
}
