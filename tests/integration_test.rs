//! End-to-end pipeline tests with a scripted reasoning backend

use std::fs;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tempfile::tempdir;

use codeforge::graph::RunStatus;
use codeforge::llm::{
    CompletionRequest, CompletionResponse, LlmClient, LlmError, StopReason, TokenUsage, ToolCall,
};
use codeforge::tools::ToolContext;

/// Reasoning backend that replays a fixed script of responses
struct ScriptedClient {
    responses: Mutex<Vec<CompletionResponse>>,
    calls: Mutex<usize>,
}

impl ScriptedClient {
    fn new(mut responses: Vec<CompletionResponse>) -> Self {
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
            calls: Mutex::new(0),
        }
    }

    fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        *self.calls.lock().unwrap() += 1;
        self.responses
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| LlmError::InvalidResponse("script exhausted".to_string()))
    }
}

fn text_response(content: &str) -> CompletionResponse {
    CompletionResponse {
        content: Some(content.to_string()),
        tool_calls: vec![],
        stop_reason: StopReason::EndTurn,
        usage: TokenUsage::default(),
    }
}

fn tool_response(name: &str, input: serde_json::Value) -> CompletionResponse {
    CompletionResponse {
        content: None,
        tool_calls: vec![ToolCall {
            id: format!("call_{}", name),
            name: name.to_string(),
            input,
        }],
        stop_reason: StopReason::ToolUse,
        usage: TokenUsage::default(),
    }
}

/// Script for a two-file calculator app: one planner reply, one architect
/// reply, and for each coder step a write_file call followed by a finish.
fn calculator_script() -> Vec<CompletionResponse> {
    vec![
        tool_response(
            "submit_plan",
            json!({
                "name": "calculator",
                "description": "A simple calculator web application",
                "tech_stack": "Flask",
                "features": ["addition", "subtraction"],
                "files": [
                    {"path": "app.py", "purpose": "Flask application"},
                    {"path": "templates/index.html", "purpose": "Calculator form"}
                ]
            }),
        ),
        tool_response(
            "submit_task_plan",
            json!({
                "implementation_steps": [
                    {"filepath": "app.py", "task_description": "create the Flask app with / route"},
                    {"filepath": "templates/index.html", "task_description": "add the calculator form"}
                ]
            }),
        ),
        tool_response(
            "write_file",
            json!({"path": "app.py", "content": "from flask import Flask\napp = Flask(__name__)\n"}),
        ),
        text_response("app.py written"),
        tool_response(
            "write_file",
            json!({"path": "templates/index.html", "content": "<form></form>\n"}),
        ),
        text_response("template written"),
    ]
}

#[tokio::test]
async fn test_full_pipeline_writes_files_and_finishes_done() {
    let temp = tempdir().unwrap();
    let llm = Arc::new(ScriptedClient::new(calculator_script()));

    let ctx = ToolContext::new(temp.path().to_path_buf(), "it-run".to_string());
    let state = codeforge::agents::run(
        "Create a simple calculator web application",
        llm.clone(),
        ctx,
        4096,
        10,
    )
    .await
    .unwrap();

    assert_eq!(state.status, RunStatus::Done);
    assert_eq!(state.plan.as_ref().unwrap().name, "calculator");
    assert_eq!(state.task_plan.as_ref().unwrap().step_count(), 2);
    // Cursor sits at the step count after the final, status-only invocation
    assert_eq!(state.coder_state.as_ref().unwrap().current_step_idx, 2);

    // 6 scripted calls; the exhausted coder invocation makes none
    assert_eq!(llm.call_count(), 6);

    let app = fs::read_to_string(temp.path().join("app.py")).unwrap();
    assert!(app.contains("Flask"));
    let html = fs::read_to_string(temp.path().join("templates/index.html")).unwrap();
    assert_eq!(html, "<form></form>\n");
}

#[tokio::test]
async fn test_pipeline_keeps_earlier_files_when_a_later_stage_fails() {
    let temp = tempdir().unwrap();

    // Planner and architect succeed, first coder step writes its file, then
    // the backend dies. The run aborts but the written file stays on disk.
    let script = vec![
        tool_response(
            "submit_plan",
            json!({
                "name": "calculator",
                "description": "A calculator",
                "files": [{"path": "app.py", "purpose": "Flask application"}]
            }),
        ),
        tool_response(
            "submit_task_plan",
            json!({
                "implementation_steps": [
                    {"filepath": "app.py", "task_description": "create Flask app"},
                    {"filepath": "README.md", "task_description": "write the readme"}
                ]
            }),
        ),
        tool_response("write_file", json!({"path": "app.py", "content": "# app\n"})),
        text_response("done with app.py"),
        // Script ends here: step two's reasoning call fails
    ];
    let llm = Arc::new(ScriptedClient::new(script));

    let ctx = ToolContext::new(temp.path().to_path_buf(), "it-partial".to_string());
    let result = codeforge::agents::run("calc", llm, ctx, 4096, 10).await;

    assert!(result.is_err());
    assert_eq!(fs::read_to_string(temp.path().join("app.py")).unwrap(), "# app\n");
    assert!(!temp.path().join("README.md").exists());
}

#[tokio::test]
async fn test_pipeline_with_empty_step_list_finishes_immediately() {
    let temp = tempdir().unwrap();

    let script = vec![
        tool_response(
            "submit_plan",
            json!({"name": "noop", "description": "nothing to build", "files": []}),
        ),
        tool_response("submit_task_plan", json!({"implementation_steps": []})),
    ];
    let llm = Arc::new(ScriptedClient::new(script));

    let ctx = ToolContext::new(temp.path().to_path_buf(), "it-empty".to_string());
    let state = codeforge::agents::run("do nothing", llm.clone(), ctx, 4096, 10).await.unwrap();

    assert_eq!(state.status, RunStatus::Done);
    assert_eq!(llm.call_count(), 2);
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_cli_help_lists_subcommands() {
    use assert_cmd::Command;
    use predicates::prelude::*;

    Command::cargo_bin("cf")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run").and(predicate::str::contains("plan")));
}
