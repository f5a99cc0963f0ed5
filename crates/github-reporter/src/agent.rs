//! GitHub Reporter Agent

use std::sync::Arc;

use agent_core::{provider::GenerationOptions, Agent, AgentBuilder, LlmProvider, Result};

use crate::credentials::GitHubToken;
use crate::fetcher::StatsFetcher;
use crate::svckit::GitHubStatsTool;
use crate::REPORTER_AGENT_PROMPT;

pub const REPORTER_AGENT_NAME: &str = "GitHubReporter";

/// Build the reporter agent with the `get-github-stats` tool registered.
///
/// `token` is the credential the tool uses for this agent's lifetime.
pub fn github_reporter_agent(
    provider: Arc<dyn LlmProvider>,
    fetcher: StatsFetcher,
    token: Option<GitHubToken>,
    generation: GenerationOptions,
) -> Result<Agent> {
    AgentBuilder::new()
        .name(REPORTER_AGENT_NAME)
        .provider(provider)
        .system_prompt(REPORTER_AGENT_PROMPT)
        .generation(generation)
        .tool(GitHubStatsTool::new(fetcher, token))
        .max_iterations(4)
        .build()
}
