//! list_files tool - enumerate files in the project root

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use walkdir::WalkDir;

use crate::tools::{Tool, ToolContext, ToolResult};

/// Max entries before the listing is truncated
const MAX_ENTRIES: usize = 500;

/// List all files under the project root, relative paths, sorted
pub struct ListFilesTool;

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &'static str {
        "list_files"
    }

    fn description(&self) -> &'static str {
        "List all files in the project, one relative path per line."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _input: Value, ctx: &ToolContext) -> ToolResult {
        let root = ctx.project_root.clone();

        let mut files: Vec<String> = WalkDir::new(&root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| e.path().strip_prefix(&root).ok().map(|p| p.to_path_buf()))
            // Hidden files and directories (.git etc) are noise to the model
            .filter(|rel| !rel.components().any(|c| c.as_os_str().to_string_lossy().starts_with('.')))
            .map(|rel| rel.to_string_lossy().to_string())
            .collect();

        files.sort();
        debug!(file_count = files.len(), "ListFilesTool::execute: listed files");

        if files.is_empty() {
            return ToolResult::success("(project is empty)");
        }

        if files.len() > MAX_ENTRIES {
            let shown = files.len().min(MAX_ENTRIES);
            let mut listing = files[..shown].join("\n");
            listing.push_str(&format!("\n... and {} more files", files.len() - shown));
            return ToolResult::success(listing);
        }

        ToolResult::success(files.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_list_files_sorted_relative() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("app.py"), "x").unwrap();
        fs::create_dir_all(temp.path().join("templates")).unwrap();
        fs::write(temp.path().join("templates/index.html"), "x").unwrap();

        let ctx = ToolContext::new(temp.path().to_path_buf(), "test".to_string());
        let result = ListFilesTool.execute(serde_json::json!({}), &ctx).await;

        assert!(!result.is_error);
        let lines: Vec<&str> = result.content.lines().collect();
        assert_eq!(lines, vec!["app.py", "templates/index.html"]);
    }

    #[tokio::test]
    async fn test_list_files_empty_project() {
        let temp = tempdir().unwrap();
        let ctx = ToolContext::new(temp.path().to_path_buf(), "test".to_string());

        let result = ListFilesTool.execute(serde_json::json!({}), &ctx).await;

        assert!(!result.is_error);
        assert!(result.content.contains("empty"));
    }

    #[tokio::test]
    async fn test_list_files_skips_hidden() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("visible.txt"), "x").unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();
        fs::write(temp.path().join(".git/config"), "x").unwrap();

        let ctx = ToolContext::new(temp.path().to_path_buf(), "test".to_string());
        let result = ListFilesTool.execute(serde_json::json!({}), &ctx).await;

        assert!(result.content.contains("visible.txt"));
        assert!(!result.content.contains(".git"));
    }
}
