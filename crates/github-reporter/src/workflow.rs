//! GitHub Report Workflow
//!
//! Two steps: `fetch-github-stats` turns `{owner, repo}` into a
//! `RepositoryStats` record, `summarize-stats` streams a prose report of that
//! record from the workflow agent and returns `{summary}`.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use agent_core::{
    provider::{collect_text, GenerationOptions},
    Agent, AgentBuilder, LlmProvider, Message, Step, Workflow, WorkflowRun,
};

use crate::credentials::GitHubToken;
use crate::error::ReporterError;
use crate::fetcher::StatsFetcher;
use crate::model::UNKNOWN_LOCATION;

pub const WORKFLOW_ID: &str = "github-workflow";
pub const FETCH_STEP_ID: &str = "fetch-github-stats";
pub const SUMMARIZE_STEP_ID: &str = "summarize-stats";

/// Instructions for the agent that writes the workflow summary
pub const WORKFLOW_AGENT_PROMPT: &str = r#"You are a GitHub analytics expert that provides structured repository statistics.

Structure every response exactly as follows:

📊 Repository: [owner/repo]
═══════════════════════════

⭐ KEY STATISTICS
• Name: [name]
• Stars: [stars]
• Forks: [forks]
• Open Issues: [issues]
• Total Commits: [commits]

📝 SUMMARY
• Status: [short description, e.g. "Actively maintained" or "Repository inaccessible"]
• Activity: [recent activity, e.g. "High issue activity" or "Stable development"]

⚠️ NOTES
• [Relevant notes, e.g. "Private repository" or the errorMessage field]

Guidelines:
- Keep descriptions concise and professional.
- A null count means the value is unknown; say so instead of guessing.
- If status is "private" or "not_found", explain it in NOTES.
- Keep the exact layout, emojis and headers."#;

/// Owner/repository pair the workflow reports on
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub owner: String,
    pub repo: String,
}

impl ReportRequest {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Extract the pair from workflow input.
    ///
    /// Accepts `{owner, repo}`, a chat envelope `{"messages": [...]}` whose
    /// last user message carries the pair (as an object, a JSON string, or
    /// JSON embedded in prose), or such a string on its own.
    pub fn from_input(input: &Value) -> Result<Self, ReporterError> {
        match input {
            Value::Null => Err(ReporterError::MissingInput("Input data not found".into())),
            Value::Object(map) if map.contains_key("messages") => {
                let content = last_user_content(&input["messages"])
                    .ok_or_else(|| ReporterError::InvalidInput("no user message in envelope".into()))?;
                Self::from_input(content)
            }
            Value::Object(_) => Self::from_object(input),
            Value::String(text) => Self::from_text(text),
            other => Err(ReporterError::InvalidInput(format!(
                "expected an object with owner and repo, got {}",
                json_kind(other)
            ))),
        }
    }

    fn from_object(value: &Value) -> Result<Self, ReporterError> {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .ok_or_else(|| ReporterError::InvalidInput(format!("missing '{}'", name)))
        };

        Ok(Self {
            owner: field("owner")?,
            repo: field("repo")?,
        })
    }

    fn from_text(text: &str) -> Result<Self, ReporterError> {
        if let Ok(value) = serde_json::from_str::<Value>(text) {
            if value.is_object() {
                return Self::from_object(&value);
            }
        }

        let embedded = text
            .find('{')
            .zip(text.rfind('}'))
            .and_then(|(start, end)| text.get(start..=end))
            .and_then(|candidate| serde_json::from_str::<Value>(candidate).ok())
            .ok_or_else(|| ReporterError::InvalidInput("no owner/repo JSON found in message".into()))?;

        Self::from_object(&embedded)
    }
}

fn last_user_content(messages: &Value) -> Option<&Value> {
    messages
        .as_array()?
        .iter()
        .rev()
        .find(|m| m.get("role").and_then(Value::as_str) == Some("user"))
        .and_then(|m| m.get("content"))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Final workflow output
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub summary: String,
}

impl ReportSummary {
    pub fn from_run(run: &WorkflowRun) -> agent_core::Result<Self> {
        Ok(serde_json::from_value(run.output.clone())?)
    }
}

/// Step 1: fetch the stats record
pub struct FetchStatsStep {
    fetcher: StatsFetcher,
    token: Option<GitHubToken>,
}

impl FetchStatsStep {
    pub fn new(fetcher: StatsFetcher, token: Option<GitHubToken>) -> Self {
        Self { fetcher, token }
    }
}

#[async_trait]
impl Step for FetchStatsStep {
    fn id(&self) -> &str {
        FETCH_STEP_ID
    }

    fn description(&self) -> &str {
        "Fetches statistics for a GitHub repository"
    }

    async fn execute(&self, input: Value) -> agent_core::Result<Value> {
        let request = ReportRequest::from_input(&input)?;
        let stats = self
            .fetcher
            .fetch(&request.owner, &request.repo, self.token.as_ref())
            .await;
        Ok(serde_json::to_value(stats)?)
    }
}

/// Step 2: have the agent write the report
pub struct SummarizeStatsStep {
    agent: Agent,
}

impl SummarizeStatsStep {
    pub fn new(agent: Agent) -> Self {
        Self { agent }
    }

    pub fn prompt(stats: &Value) -> agent_core::Result<String> {
        let location = stats
            .get("location")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_LOCATION);
        Ok(format!(
            "Summarize the following GitHub repository statistics for {}:\n{}",
            location,
            serde_json::to_string_pretty(stats)?
        ))
    }
}

#[async_trait]
impl Step for SummarizeStatsStep {
    fn id(&self) -> &str {
        SUMMARIZE_STEP_ID
    }

    fn description(&self) -> &str {
        "Summarizes GitHub repository statistics"
    }

    async fn execute(&self, input: Value) -> agent_core::Result<Value> {
        if input.is_null() {
            return Err(ReporterError::MissingInput("Stats data not found".into()).into());
        }

        let prompt = Self::prompt(&input)?;
        let stream = self.agent.stream(&[Message::user(prompt)]).await?;
        let stream = Box::pin(stream.inspect(|chunk| {
            if let Ok(chunk) = chunk {
                tracing::trace!(step = SUMMARIZE_STEP_ID, delta = %chunk.delta, done = chunk.done, "Summary chunk");
            }
        }));
        let summary = collect_text(stream).await?;
        tracing::debug!(chars = summary.len(), "Summary generated");

        Ok(json!({ "summary": summary }))
    }
}

/// Assemble the `github-workflow` pipeline
pub fn github_workflow(
    provider: Arc<dyn LlmProvider>,
    fetcher: StatsFetcher,
    token: Option<GitHubToken>,
    generation: GenerationOptions,
) -> agent_core::Result<Workflow> {
    let agent = AgentBuilder::new()
        .name("GitHub Reporter Workflow")
        .provider(provider)
        .system_prompt(WORKFLOW_AGENT_PROMPT)
        .generation(generation)
        .build()?;

    Ok(Workflow::new(WORKFLOW_ID)
        .describe("Fetch GitHub repository statistics and summarize them")
        .then(FetchStatsStep::new(fetcher, token))
        .then(SummarizeStatsStep::new(agent)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::{AgentError, Role};
    use agent_runtime::ScriptedProvider;

    use crate::github::{Endpoint, MockGitHubClient};

    #[test]
    fn test_request_from_plain_object() {
        let request = ReportRequest::from_input(&json!({"owner": "octocat", "repo": "Hello-World"})).unwrap();
        assert_eq!(request, ReportRequest::new("octocat", "Hello-World"));
    }

    #[test]
    fn test_request_from_message_envelope() {
        let object = json!({"messages": [
            {"role": "user", "content": {"owner": "old", "repo": "ignored"}},
            {"role": "assistant", "content": "ok"},
            {"role": "user", "content": {"owner": "octocat", "repo": "Hello-World"}}
        ]});
        assert_eq!(ReportRequest::from_input(&object).unwrap().owner, "octocat");

        let stringified = json!({"messages": [
            {"role": "user", "content": "{\"owner\": \"octocat\", \"repo\": \"Hello-World\"}"}
        ]});
        assert_eq!(ReportRequest::from_input(&stringified).unwrap().repo, "Hello-World");

        let embedded = json!({"messages": [
            {"role": "user", "content": "Please report on {\"owner\": \"rust-lang\", \"repo\": \"rust\"} thanks"}
        ]});
        assert_eq!(
            ReportRequest::from_input(&embedded).unwrap(),
            ReportRequest::new("rust-lang", "rust")
        );
    }

    #[test]
    fn test_request_rejects_malformed_input() {
        let err = ReportRequest::from_input(&Value::Null).unwrap_err();
        assert_eq!(err.to_string(), "Input data not found");

        assert!(ReportRequest::from_input(&json!({"owner": "octocat"})).is_err());
        assert!(ReportRequest::from_input(&json!({"owner": "", "repo": "x"})).is_err());
        assert!(ReportRequest::from_input(&json!(42)).is_err());
        assert!(ReportRequest::from_input(&json!("no json here")).is_err());
        assert!(ReportRequest::from_input(&json!({"messages": []})).is_err());
    }

    #[test]
    fn test_prompt_embeds_location_and_json() {
        let prompt = SummarizeStatsStep::prompt(&json!({"location": "octocat/Hello-World", "stars": 1})).unwrap();
        assert!(prompt.starts_with("Summarize the following GitHub repository statistics for octocat/Hello-World:\n{"));
        assert!(prompt.contains("\"stars\": 1"));
    }

    #[tokio::test]
    async fn test_workflow_end_to_end() {
        let provider = Arc::new(
            ScriptedProvider::constant("📊 Repository: octocat/Hello-World").with_chunk_chars(5),
        );
        let api = Arc::new(MockGitHubClient::with_sample_data());
        let workflow = github_workflow(
            provider.clone(),
            StatsFetcher::new(api.clone()),
            GitHubToken::new("ghp_test"),
            GenerationOptions::default(),
        )
        .unwrap();
        assert_eq!(workflow.step_ids(), vec![FETCH_STEP_ID, SUMMARIZE_STEP_ID]);

        let run = workflow
            .run(json!({"owner": "octocat", "repo": "Hello-World"}))
            .await
            .unwrap();

        assert_eq!(run.workflow_id, WORKFLOW_ID);
        assert_eq!(run.steps[0].output["status"], "success");
        assert_eq!(
            ReportSummary::from_run(&run).unwrap().summary,
            "📊 Repository: octocat/Hello-World"
        );

        let sent = &provider.requests()[0];
        assert_eq!(sent[0].role, Role::System);
        assert!(sent[1].content.contains("for octocat/Hello-World:"));
        assert_eq!(api.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_summary_reassembles_small_chunks() {
        let report = "📊 Repository: octocat/Hello-World\n⭐ KEY STATISTICS\n• Stars: 2600";
        let agent = AgentBuilder::new()
            .provider(Arc::new(ScriptedProvider::constant(report).with_chunk_chars(3)))
            .system_prompt(WORKFLOW_AGENT_PROMPT)
            .build()
            .unwrap();

        let output = SummarizeStatsStep::new(agent)
            .execute(json!({"location": "octocat/Hello-World", "stars": 2600}))
            .await
            .unwrap();
        assert_eq!(output, json!({"summary": report}));
    }

    #[tokio::test]
    async fn test_workflow_summarizes_unavailable_repository() {
        let provider = Arc::new(ScriptedProvider::constant("Repository inaccessible"));
        let workflow = github_workflow(
            provider.clone(),
            StatsFetcher::new(Arc::new(MockGitHubClient::with_sample_data())),
            GitHubToken::new("ghp_test"),
            GenerationOptions::default(),
        )
        .unwrap();

        let run = workflow
            .run(json!({"owner": "ghost", "repo": "does-not-exist-xyz"}))
            .await
            .unwrap();
        assert_eq!(run.steps[0].output["status"], "private");
        assert!(provider.requests()[0][1].content.contains("for Unknown:"));
    }

    #[tokio::test]
    async fn test_malformed_input_aborts_before_network() {
        let api = Arc::new(MockGitHubClient::with_sample_data());
        let workflow = github_workflow(
            Arc::new(ScriptedProvider::constant("unused")),
            StatsFetcher::new(api.clone()),
            GitHubToken::new("ghp_test"),
            GenerationOptions::default(),
        )
        .unwrap();

        let err = workflow.run(json!({"repo": "Hello-World"})).await.unwrap_err();
        assert!(err.is_client_error());
        assert!(matches!(err, AgentError::Workflow { ref step, .. } if step == FETCH_STEP_ID));
        assert!(!api.endpoints_called().contains(&Endpoint::Repository));
        assert!(api.calls().is_empty());
    }
}
