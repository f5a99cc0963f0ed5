//! GitHub Stats Tool
//!
//! Fetches repository and owner statistics from the GitHub API.

use async_trait::async_trait;

use agent_core::{
    tool::ParameterSchema,
    Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
};

use crate::credentials::GitHubToken;
use crate::fetcher::StatsFetcher;

pub const TOOL_NAME: &str = "get-github-stats";

/// Tool for looking up GitHub repository statistics
pub struct GitHubStatsTool {
    fetcher: StatsFetcher,
    token: Option<GitHubToken>,
}

impl GitHubStatsTool {
    /// `token` is used for every call this tool makes
    pub fn new(fetcher: StatsFetcher, token: Option<GitHubToken>) -> Self {
        Self { fetcher, token }
    }
}

#[async_trait]
impl Tool for GitHubStatsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: TOOL_NAME.into(),
            description: "Fetch GitHub repository statistics (stars, forks, open issues, commits, language, license) and the owner's public profile.".into(),
            parameters: vec![
                ParameterSchema::required_string("owner", "GitHub repository owner"),
                ParameterSchema::required_string("repo", "GitHub repository name"),
            ],
            category: Some("github".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let owner = call.str_arg("owner")?;
        let repo = call.str_arg("repo")?;

        let stats = self.fetcher.fetch(owner, repo, self.token.as_ref()).await;
        let data = serde_json::to_value(&stats)?;
        let output = serde_json::to_string_pretty(&data)?;

        // An unavailable repository is still a successful lookup; the record says why
        Ok(ToolResult::success(TOOL_NAME, output).with_data(data))
    }
}
