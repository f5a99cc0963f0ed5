//! # agent-core
//!
//! Core agent logic with provider-agnostic LLM abstraction, an extensible tool
//! system and linear multi-step workflows.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Workflow                            │
//! │   step ──▶ step ──▶ step      (JSON output feeds next input)  │
//! └───────────────┬──────────────────────────────────────────────┘
//!                 │ uses
//! ┌───────────────▼──────────────────────────────────────────────┐
//! │                          Agent                               │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐   │
//! │  │  Reasoning  │  │    Tools    │  │   LlmProvider       │   │
//! │  │    Loop     │──│   Registry  │──│   (Strategy)        │   │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping between Ollama, a scripted test
//! provider, or any other backend without changing agent or workflow logic.

pub mod provider;
pub mod tool;
pub mod reasoning;
pub mod message;
pub mod error;
pub mod workflow;

pub use error::{AgentError, Result};
pub use message::{Conversation, Message, Role};
pub use provider::LlmProvider;
pub use reasoning::{Agent, AgentBuilder};
pub use tool::{Tool, ToolCall, ToolResult, ToolRegistry, ToolSchema};
pub use workflow::{Step, Workflow, WorkflowRun};
