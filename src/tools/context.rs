//! ToolContext - execution context for tools

use std::path::{Path, PathBuf};
use tracing::debug;

use super::ToolError;

/// Execution context for tools - scoped to one run's project root
///
/// Every tool invocation in a run shares one `ToolContext`. All file
/// operations are constrained to the project root; tools cannot escape it
/// unless sandboxing is explicitly disabled (tests only). The root is
/// resolved once by the entry point and passed in - nothing here touches
/// the process working directory or environment.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Project root - all file ops constrained here
    pub project_root: PathBuf,

    /// Run ID (for log correlation)
    pub run_id: String,

    /// Whether sandbox mode is enabled (default: true)
    pub sandbox_enabled: bool,
}

impl ToolContext {
    /// Create a new tool context
    pub fn new(project_root: PathBuf, run_id: String) -> Self {
        debug!(?project_root, %run_id, "ToolContext::new: called");
        Self {
            project_root,
            run_id,
            sandbox_enabled: true,
        }
    }

    /// Create a context with sandbox disabled (for testing)
    pub fn new_unsandboxed(project_root: PathBuf, run_id: String) -> Self {
        debug!(?project_root, %run_id, "ToolContext::new_unsandboxed: called");
        Self {
            project_root,
            run_id,
            sandbox_enabled: false,
        }
    }

    /// Normalize a path relative to the project root
    fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    /// Validate a path is within the project root (sandbox enforcement)
    ///
    /// Non-existent paths are allowed (write_file creates them) as long as
    /// their closest existing ancestor resolves inside the root.
    pub fn validate_path(&self, path: &Path) -> Result<PathBuf, ToolError> {
        debug!(?path, "ToolContext::validate_path: called");
        let normalized = self.normalize_path(path);

        if !self.sandbox_enabled {
            return Ok(normalized);
        }

        let canonical = if normalized.exists() {
            normalized.canonicalize().unwrap_or_else(|_| normalized.clone())
        } else if let Some(parent) = normalized.parent() {
            if parent.exists() {
                let canonical_parent = parent.canonicalize().unwrap_or_else(|_| parent.to_path_buf());
                canonical_parent.join(normalized.file_name().unwrap_or_default())
            } else {
                normalized.clone()
            }
        } else {
            normalized.clone()
        };

        let root_canonical = self.project_root.canonicalize().unwrap_or_else(|_| self.project_root.clone());

        if canonical.starts_with(&root_canonical) {
            Ok(canonical)
        } else {
            debug!(?path, "ToolContext::validate_path: sandbox violation");
            Err(ToolError::SandboxViolation {
                path: path.to_path_buf(),
            })
        }
    }
}
