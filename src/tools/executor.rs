//! ToolExecutor - manages tool execution for a run

use std::collections::HashMap;
use tracing::debug;

use crate::llm::{ToolCall, ToolDefinition};

use super::builtin::{CurrentDirectoryTool, ListFilesTool, ReadFileTool, WriteFileTool};
use super::{Tool, ToolContext, ToolResult};

/// Manages tool execution for a run
pub struct ToolExecutor {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolExecutor {
    /// Create executor with the coder's tool set
    ///
    /// read_file, write_file, list_files, get_current_directory - the fixed
    /// set granted to the coder's tool-augmented reasoning call.
    pub fn coder() -> Self {
        debug!("ToolExecutor::coder: called");
        let mut tools: HashMap<String, Box<dyn Tool>> = HashMap::new();

        tools.insert("read_file".into(), Box::new(ReadFileTool));
        tools.insert("write_file".into(), Box::new(WriteFileTool));
        tools.insert("list_files".into(), Box::new(ListFilesTool));
        tools.insert("get_current_directory".into(), Box::new(CurrentDirectoryTool));

        Self { tools }
    }

    /// Get tool definitions for the LLM
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect()
    }

    /// Execute a tool call
    pub async fn execute(&self, tool_call: &ToolCall, ctx: &ToolContext) -> ToolResult {
        debug!(tool_name = %tool_call.name, tool_id = %tool_call.id, "ToolExecutor::execute: called");
        match self.tools.get(&tool_call.name) {
            Some(tool) => tool.execute(tool_call.input.clone(), ctx).await,
            None => ToolResult::error(format!("Unknown tool: {}", tool_call.name)),
        }
    }

    /// Execute multiple tool calls sequentially, preserving order
    pub async fn execute_all(&self, tool_calls: &[ToolCall], ctx: &ToolContext) -> Vec<(String, ToolResult)> {
        debug!(count = %tool_calls.len(), "ToolExecutor::execute_all: called");
        let mut results = Vec::with_capacity(tool_calls.len());

        for call in tool_calls {
            let result = self.execute(call, ctx).await;
            results.push((call.id.clone(), result));
        }

        results
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::coder()
    }
}
