//! Planner stage - feature request to project plan

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::Plan;
use crate::graph::{AgentState, GraphNode, StateUpdate};
use crate::llm::{CompletionRequest, CompletionResponse, LlmClient, Message, ToolDefinition};
use crate::prompts;

use super::AgentError;

/// Tool name the model submits its plan through
const SUBMIT_TOOL: &str = "submit_plan";

/// Planner stage - one structured reasoning call producing a `Plan`
pub struct Planner {
    llm: Arc<dyn LlmClient>,
    max_tokens: u32,
}

impl Planner {
    /// Create a planner with an injected reasoning client
    pub fn new(llm: Arc<dyn LlmClient>, max_tokens: u32) -> Self {
        Self { llm, max_tokens }
    }

    /// Tool schema mirroring the `Plan` shape
    fn submit_tool() -> ToolDefinition {
        ToolDefinition::new(
            SUBMIT_TOOL,
            "Submit the project plan. Call this once with the complete plan.",
            json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Project name"
                    },
                    "description": {
                        "type": "string",
                        "description": "What the project does"
                    },
                    "tech_stack": {
                        "type": "string",
                        "description": "Technology stack, e.g. 'Flask' or 'HTML/CSS/JS'"
                    },
                    "features": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "User-visible features"
                    },
                    "files": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "path": {
                                    "type": "string",
                                    "description": "Path relative to the project root"
                                },
                                "purpose": {
                                    "type": "string",
                                    "description": "One-line purpose of the file"
                                }
                            },
                            "required": ["path", "purpose"]
                        },
                        "description": "Every file the project needs"
                    }
                },
                "required": ["name", "description", "files"]
            }),
        )
    }

    /// Decode a `Plan` from the reasoning reply
    ///
    /// Primary path is the submit_plan tool call; a content body that parses
    /// as plan JSON is accepted as fallback. Anything else is a
    /// `Planning` error - no retry at this layer.
    fn decode_plan(&self, response: &CompletionResponse) -> Result<Plan, AgentError> {
        if let Some(input) = response.tool_input(SUBMIT_TOOL) {
            debug!("Planner::decode_plan: decoding submit_plan tool call");
            return serde_json::from_value::<Plan>(input.clone())
                .map_err(|e| AgentError::Planning(format!("submit_plan input did not decode: {}", e)));
        }

        if let Some(content) = &response.content
            && let Ok(plan) = serde_json::from_str::<Plan>(content)
        {
            debug!("Planner::decode_plan: decoded plan from content JSON");
            return Ok(plan);
        }

        Err(AgentError::Planning("reasoning call produced no decodable plan".to_string()))
    }
}

#[async_trait]
impl GraphNode for Planner {
    fn name(&self) -> &'static str {
        "planner"
    }

    async fn run(&self, state: &AgentState) -> Result<StateUpdate, AgentError> {
        debug!(prompt_len = state.user_prompt.len(), "Planner::run: called");

        let prompt = prompts::render(prompts::PLANNER, &json!({ "user_prompt": state.user_prompt }))?;

        let request = CompletionRequest {
            system_prompt: "You are a precise project planner. Always submit your plan through the provided tool."
                .to_string(),
            messages: vec![Message::user(prompt)],
            tools: vec![Self::submit_tool()],
            max_tokens: self.max_tokens,
        };

        let response = self.llm.complete(request).await?;
        let plan = self.decode_plan(&response)?;

        info!(plan_name = %plan.name, file_count = plan.files.len(), "Planner::run: plan produced");
        Ok(StateUpdate::with_plan(Arc::new(plan)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::{MockLlmClient, text_response};
    use crate::llm::{StopReason, TokenUsage, ToolCall};

    fn plan_tool_response(input: serde_json::Value) -> CompletionResponse {
        CompletionResponse {
            content: None,
            tool_calls: vec![ToolCall {
                id: "call_1".to_string(),
                name: SUBMIT_TOOL.to_string(),
                input,
            }],
            stop_reason: StopReason::ToolUse,
            usage: TokenUsage::default(),
        }
    }

    #[tokio::test]
    async fn test_planner_writes_plan() {
        let llm = Arc::new(MockLlmClient::new(vec![plan_tool_response(json!({
            "name": "calculator",
            "description": "A calculator web app",
            "files": [{"path": "app.py", "purpose": "Flask application"}]
        }))]));

        let planner = Planner::new(llm, 4096);
        let state = AgentState::new("Create a simple calculator web application");

        let update = planner.run(&state).await.unwrap();
        let plan = update.plan.unwrap();
        assert_eq!(plan.name, "calculator");
        assert_eq!(plan.files.len(), 1);
        assert!(update.status.is_none());
    }

    #[tokio::test]
    async fn test_planner_accepts_content_json_fallback() {
        let llm = Arc::new(MockLlmClient::new(vec![text_response(
            r#"{"name": "calculator", "description": "A calculator", "files": []}"#,
        )]));

        let planner = Planner::new(llm, 4096);
        let update = planner.run(&AgentState::new("calc")).await.unwrap();
        assert_eq!(update.plan.unwrap().name, "calculator");
    }

    #[tokio::test]
    async fn test_planner_undecodable_reply_is_planning_error() {
        let llm = Arc::new(MockLlmClient::new(vec![text_response("I cannot help with that.")]));

        let planner = Planner::new(llm, 4096);
        let result = planner.run(&AgentState::new("calc")).await;
        assert!(matches!(result, Err(AgentError::Planning(_))));
    }

    #[tokio::test]
    async fn test_planner_malformed_tool_input_is_planning_error() {
        // submit_plan called but missing required fields
        let llm = Arc::new(MockLlmClient::new(vec![plan_tool_response(json!({"name": 42}))]));

        let planner = Planner::new(llm, 4096);
        let result = planner.run(&AgentState::new("calc")).await;
        assert!(matches!(result, Err(AgentError::Planning(_))));
    }

    #[tokio::test]
    async fn test_planner_backend_failure_propagates_as_reasoning() {
        // Mock with no responses fails the complete call
        let llm = Arc::new(MockLlmClient::new(vec![]));

        let planner = Planner::new(llm, 4096);
        let result = planner.run(&AgentState::new("calc")).await;
        assert!(matches!(result, Err(AgentError::Reasoning(_))));
    }
}
