//! # agent-runtime
//!
//! Runtime providers for the GitHub reporter agents.
//!
//! ## Providers
//!
//! - **Ollama** (default feature): local LLM inference via `ollama-rs`
//! - **Scripted**: deterministic, offline replies for tests and demos
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::OllamaProvider;
//!
//! let provider = OllamaProvider::from_env()?;
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(provider))
//!     .build()?;
//! ```

#[cfg(feature = "ollama")]
pub mod ollama;
pub mod scripted;

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};
pub use scripted::ScriptedProvider;

// Re-export core types for convenience
pub use agent_core::{
    Agent, AgentError, LlmProvider, Message, Result, Role, Tool, ToolRegistry, Workflow,
};
