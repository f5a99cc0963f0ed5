//! HTTP Handlers

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use agent_core::{provider::ModelInfo, AgentError, ToolCall, Tool};
use github_reporter::{
    github_reporter_agent, github_workflow, tools::GitHubStatsTool, ReportRequest, ReportSummary,
    RepositoryStats,
};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider_connected: bool,
    pub github_token_configured: bool,
    pub github_api: String,
}

#[derive(Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub message: String,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub message: String,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, code: &str, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

/// Client mistakes become 400, everything else 500
fn agent_error(err: &AgentError, code: &str) -> ApiError {
    if err.is_client_error() {
        tracing::debug!(error = %err, "Rejected request");
        api_error(StatusCode::BAD_REQUEST, "INVALID_INPUT", err.user_message())
    } else {
        tracing::error!(error = %err, "{} failed", code);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, code, err.user_message())
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider_connected,
        github_token_configured: state.token.is_some(),
        github_api: state.fetcher.api_name().to_string(),
    })
}

pub async fn list_models(State(state): State<AppState>) -> Result<Json<ModelsResponse>, ApiError> {
    let models = state.provider.list_models().await.map_err(|e| {
        tracing::warn!(error = %e, "Listing models failed");
        api_error(StatusCode::SERVICE_UNAVAILABLE, "PROVIDER_UNAVAILABLE", e.user_message())
    })?;

    Ok(Json(ModelsResponse { models }))
}

/// Ask the GitHub reporter agent
pub async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    if payload.message.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "INVALID_INPUT", "message must not be empty"));
    }

    let mut generation = state.generation.clone();
    if let Some(model) = payload.model {
        generation.model = model;
    }
    let model = generation.model.clone();

    let agent = github_reporter_agent(
        state.provider.clone(),
        state.fetcher.clone(),
        state.credentials(&headers),
        generation,
    )
    .map_err(|e| agent_error(&e, "AGENT_ERROR"))?;

    let message = agent
        .ask(&payload.message)
        .await
        .map_err(|e| agent_error(&e, "AGENT_ERROR"))?;

    Ok(Json(GenerateResponse { message, model }))
}

/// Run `get-github-stats` directly
pub async fn execute_stats_tool(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Result<Json<RepositoryStats>, ApiError> {
    let request = ReportRequest::from_input(&payload)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, "INVALID_INPUT", e.to_string()))?;

    let tool = GitHubStatsTool::new(state.fetcher.clone(), state.credentials(&headers));
    let call = ToolCall::new(tool.schema().name)
        .with_arg("owner", request.owner)
        .with_arg("repo", request.repo);
    let result = tool
        .execute(&call)
        .await
        .map_err(|e| agent_error(&e, "TOOL_ERROR"))?;

    let stats = result
        .data
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| agent_error(&AgentError::Json(e), "TOOL_ERROR"))?
        .ok_or_else(|| api_error(StatusCode::INTERNAL_SERVER_ERROR, "TOOL_ERROR", result.output))?;

    Ok(Json(stats))
}

/// Run the `github-workflow` pipeline
pub async fn run_workflow(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Result<Json<ReportSummary>, ApiError> {
    let workflow = github_workflow(
        state.provider.clone(),
        state.fetcher.clone(),
        state.credentials(&headers),
        state.generation.clone(),
    )
    .map_err(|e| agent_error(&e, "WORKFLOW_ERROR"))?;

    let run = workflow
        .run(payload)
        .await
        .map_err(|e| agent_error(&e, "WORKFLOW_ERROR"))?;
    tracing::info!(run_id = %run.run_id, steps = run.steps.len(), "Workflow finished");

    ReportSummary::from_run(&run)
        .map(Json)
        .map_err(|e| agent_error(&e, "WORKFLOW_ERROR"))
}
