//! Linear Workflows
//!
//! A workflow is an ordered list of steps. Each step receives the previous
//! step's JSON output as its input; the first step receives the workflow
//! input. Steps run sequentially and a failing step aborts the run.
//!
//! ```rust,ignore
//! let workflow = Workflow::new("github-workflow")
//!     .then(FetchStatsStep::new(fetcher, credentials))
//!     .then(SummarizeStatsStep::new(agent));
//!
//! let run = workflow.run(json!({"owner": "octocat", "repo": "Hello-World"})).await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{AgentError, Result};

/// One unit of work in a workflow
#[async_trait]
pub trait Step: Send + Sync {
    /// Stable identifier, unique within a workflow
    fn id(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Transform the step input into the step output
    async fn execute(&self, input: Value) -> Result<Value>;
}

/// Output recorded for one executed step
#[derive(Clone, Debug, Serialize)]
pub struct StepRecord {
    pub id: String,
    pub output: Value,
    pub elapsed_ms: u64,
}

/// Result of a completed workflow run
#[derive(Clone, Debug, Serialize)]
pub struct WorkflowRun {
    pub run_id: Uuid,
    pub workflow_id: String,
    pub steps: Vec<StepRecord>,
    /// Output of the last step
    pub output: Value,
}

/// An ordered chain of steps
pub struct Workflow {
    id: String,
    description: String,
    steps: Vec<Arc<dyn Step>>,
}

impl Workflow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            steps: Vec::new(),
        }
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a step to the chain
    #[must_use]
    pub fn then<S: Step + 'static>(mut self, step: S) -> Self {
        self.steps.push(Arc::new(step));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn step_ids(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.id()).collect()
    }

    /// Execute every step in order.
    ///
    /// A workflow without steps returns its input unchanged.
    pub async fn run(&self, input: Value) -> Result<WorkflowRun> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("workflow", workflow = %self.id, %run_id);
        self.run_steps(run_id, input).instrument(span).await
    }

    async fn run_steps(&self, run_id: Uuid, input: Value) -> Result<WorkflowRun> {
        let mut records = Vec::with_capacity(self.steps.len());
        let mut current = input;

        for step in &self.steps {
            let started = Instant::now();
            tracing::debug!(step = step.id(), "Running step");

            let output = step.execute(current).await.map_err(|source| {
                tracing::warn!(step = step.id(), error = %source, "Step failed");
                AgentError::Workflow {
                    step: step.id().to_string(),
                    source: Box::new(source),
                }
            })?;

            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            tracing::debug!(step = step.id(), elapsed_ms, "Step finished");

            records.push(StepRecord {
                id: step.id().to_string(),
                output: output.clone(),
                elapsed_ms,
            });
            current = output;
        }

        Ok(WorkflowRun {
            run_id,
            workflow_id: self.id.clone(),
            steps: records,
            output: current,
        })
    }
}
