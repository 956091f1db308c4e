//! get_current_directory tool - report the project root

use async_trait::async_trait;
use serde_json::Value;

use crate::tools::{Tool, ToolContext, ToolResult};

/// Report the project root all file operations are relative to
pub struct CurrentDirectoryTool;

#[async_trait]
impl Tool for CurrentDirectoryTool {
    fn name(&self) -> &'static str {
        "get_current_directory"
    }

    fn description(&self) -> &'static str {
        "Return the project root directory that file paths are resolved against."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _input: Value, ctx: &ToolContext) -> ToolResult {
        ToolResult::success(ctx.project_root.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_current_directory_reports_root() {
        let temp = tempdir().unwrap();
        let ctx = ToolContext::new(temp.path().to_path_buf(), "test".to_string());

        let result = CurrentDirectoryTool.execute(serde_json::json!({}), &ctx).await;

        assert!(!result.is_error);
        assert_eq!(result.content, temp.path().display().to_string());
    }
}
