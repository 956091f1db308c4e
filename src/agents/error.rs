//! Run error taxonomy
//!
//! Every variant is fatal: the executor catches nothing, retries nothing,
//! and the first error aborts the run. Whatever files earlier coder steps
//! wrote remain on disk.

use thiserror::Error;

use crate::llm::LlmError;
use crate::tools::ToolError;

/// Errors that abort a pipeline run
#[derive(Debug, Error)]
pub enum AgentError {
    /// The planner's reasoning call produced no decodable plan
    #[error("Planning failed: {0}")]
    Planning(String),

    /// The architect's reasoning call produced no decodable task plan
    #[error("Architecture failed: {0}")]
    Architecture(String),

    /// The reasoning backend failed (propagated, not wrapped further)
    #[error("Reasoning call failed: {0}")]
    Reasoning(#[from] LlmError),

    /// A tool invocation failed in a way the run cannot continue from
    #[error("Tool invocation failed: {0}")]
    Tool(#[from] ToolError),

    /// Graph wiring mistake: missing entry, unknown node, unmapped edge key
    #[error("Graph error: {0}")]
    Graph(String),

    /// Prompt template failed to render
    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),
}
