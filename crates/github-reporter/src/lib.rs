//! # github-reporter
//!
//! GitHub repository and owner analytics for LLM agents.
//!
//! ## Components
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  github-workflow                                               │
//! │    fetch-github-stats ──▶ summarize-stats ──▶ { summary }      │
//! └───────────┬────────────────────────────┬───────────────────────┘
//!             │                            │
//! ┌───────────▼───────────┐    ┌───────────▼───────────┐
//! │  StatsFetcher         │    │  Agent (LlmProvider)  │
//! │  never fails, always  │    │  streams the report   │
//! │  annotates the record │    └───────────────────────┘
//! └───────────┬───────────┘
//!             │ GitHubApi (HTTP or mock)
//!   GET /users/{owner}
//!   GET /repos/{owner}/{repo}
//!   GET /repos/{owner}/{repo}/commits?per_page=1
//! ```
//!
//! The `GitHubReporter` agent exposes the same fetcher through the
//! `get-github-stats` tool.

pub mod agent;
pub mod config;
pub mod credentials;
pub mod error;
pub mod fetcher;
pub mod github;
pub mod model;
pub mod svckit;
pub mod workflow;

pub use agent::{github_reporter_agent, REPORTER_AGENT_NAME};
pub use config::ReporterConfig;
pub use credentials::GitHubToken;
pub use error::{FetchIssue, GitHubError, ReporterError, Result};
pub use fetcher::StatsFetcher;
pub use model::{FetchStatus, OwnerProfile, RepositoryStats};
pub use workflow::{github_workflow, ReportRequest, ReportSummary};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::GitHubStatsTool;
}

/// System prompt for the GitHub reporter agent
pub const REPORTER_AGENT_PROMPT: &str = r#"You are GitHub Reporter, an analyst for GitHub repositories and their owners.

Use the `get-github-stats` tool to fetch data for the requested owner and repository, then answer in exactly this layout:

📊 **Repository**: [location]

⭐ **Key Statistics**
- Name: [name]
- Stars: [stars]
- Forks: [forks]
- Open Issues: [issues]
- Total Commits: [commits]
- Primary Language: [primaryLanguage]
- Last Commit: [lastCommitDate]
- License: [license]

👤 **Owner Profile**
- Username: [user.login]
- Bio: [user.bio]
- Followers: [user.followers]
- Following: [user.following]
- Location: [user.location]

📝 **Summary**
- Status: [e.g. "Active with recent commits" or "Repository inaccessible"]
- Activity: [e.g. "Stable [primaryLanguage] project" or "No activity data available"]

## Rules

1. Always call the tool; never invent numbers.
2. If `status` is "private" or "not_found", leave out Key Statistics, keep the Owner Profile, and quote `errorMessage` under a **Notes** heading.
3. If `user` is null, write "Owner profile unavailable" instead of the Owner Profile fields.
4. Write "None" for any missing value; a missing location is "Unknown".
5. Keep the headers, bullets and line breaks as shown."#;
