//! github-reporter HTTP Server
//!
//! Axum-based server exposing the GitHub reporter agent, the
//! `get-github-stats` tool and the `github-workflow` pipeline.

mod handlers;
mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::LlmProvider;
use agent_runtime::OllamaProvider;
use github_reporter::ReporterConfig;

use crate::handlers::{execute_stats_tool, generate, health_check, list_models, run_workflow};
use crate::state::AppState;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ReporterConfig::from_env();

    // Initialize LLM provider
    let provider = Arc::new(OllamaProvider::from_env()?);
    match provider.health_check().await {
        Ok(true) => {
            tracing::info!(url = provider.base_url(), "Connected to Ollama");
            if let Ok(models) = provider.list_models().await {
                for model in models {
                    tracing::info!("  Model: {}", model.id);
                }
            }
        }
        Ok(false) | Err(_) => {
            tracing::warn!(url = provider.base_url(), "Ollama not available, generation will fail");
            tracing::warn!("  Make sure Ollama is running: ollama serve");
        }
    }

    if config.token.is_none() {
        tracing::warn!("GITHUB_TOKEN not set; requests must send an x-github-token header");
    }

    let state = AppState {
        provider,
        fetcher: config.http_fetcher()?,
        token: config.token.clone(),
        generation: config.generation(),
    };
    tracing::info!(model = %state.generation.model, github_api = %config.github.base_url, "Reporter configured");

    let request_timeout = std::env::var("REQUEST_TIMEOUT_MS")
        .ok()
        .and_then(|ms| ms.parse().ok())
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS);
    let app = app(state, Duration::from_millis(request_timeout));

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("github-reporter server running on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                                - Health check");
    tracing::info!("  GET  /api/models                            - List available models");
    tracing::info!("  POST /api/agents/github-reporter/generate   - Ask the reporter agent");
    tracing::info!("  POST /api/tools/get-github-stats/execute    - Fetch repository stats");
    tracing::info!("  POST /api/workflows/github-workflow/run     - Fetch and summarize");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router with CORS, tracing and request timeout layers
fn app(state: AppState, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/models", get(list_models))
        .route("/api/agents/github-reporter/generate", post(generate))
        .route("/api/tools/get-github-stats/execute", post(execute_stats_tool))
        .route("/api/workflows/github-workflow/run", post(run_workflow))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state)
}
