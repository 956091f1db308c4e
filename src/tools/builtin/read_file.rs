//! read_file tool - read a file's current contents

use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::tools::{Tool, ToolContext, ToolResult};

/// Read a file's contents
///
/// A missing file reads as empty text rather than an error: the coder asks
/// for each step's target file before it exists, and the run must proceed.
pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &'static str {
        "read_file"
    }

    fn description(&self) -> &'static str {
        "Read a file's contents. Returns empty text if the file does not exist yet."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "File path relative to the project root"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        let path = match input["path"].as_str() {
            Some(p) => p,
            None => return ToolResult::error("path is required"),
        };

        let full_path = match ctx.validate_path(Path::new(path)) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        match tokio::fs::read_to_string(&full_path).await {
            Ok(content) => {
                debug!(%path, len = content.len(), "ReadFileTool::execute: read file");
                ToolResult::success(content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(%path, "ReadFileTool::execute: file missing, returning empty");
                ToolResult::success("")
            }
            Err(e) => ToolResult::error(format!("Failed to read file: {}", e)),
        }
    }
}
