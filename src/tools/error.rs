//! Tool error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during tool setup or execution
///
/// Most tool failures are reported to the model as an error `ToolResult`
/// rather than raised; these variants cover failures the pipeline itself
/// must abort on.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Path escapes project root: {path}")]
    SandboxViolation { path: PathBuf },

    #[error("Tool '{name}' failed: {message}")]
    Failed { name: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
