//! Service Kit - Agent Tools
//!
//! Tools that implement `agent_core::Tool` for the GitHub reporter.

mod github_stats;

pub use github_stats::{GitHubStatsTool, TOOL_NAME};
