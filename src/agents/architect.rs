//! Architect stage - project plan to ordered implementation steps

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::{ImplementationStep, TaskPlan};
use crate::graph::{AgentState, GraphNode, StateUpdate};
use crate::llm::{CompletionRequest, CompletionResponse, LlmClient, Message, ToolDefinition};
use crate::prompts;

use super::AgentError;

/// Tool name the model submits its steps through
const SUBMIT_TOOL: &str = "submit_task_plan";

/// What the model is asked to produce: steps only
///
/// The plan back-reference is stamped by this stage from the state record,
/// so model output can neither omit nor corrupt plan identity.
#[derive(Debug, Deserialize)]
struct ArchitectOutput {
    implementation_steps: Vec<ImplementationStep>,
}

/// Architect stage - one structured reasoning call producing a `TaskPlan`
pub struct Architect {
    llm: Arc<dyn LlmClient>,
    max_tokens: u32,
}

impl Architect {
    /// Create an architect with an injected reasoning client
    pub fn new(llm: Arc<dyn LlmClient>, max_tokens: u32) -> Self {
        Self { llm, max_tokens }
    }

    /// Tool schema carrying only the step list
    fn submit_tool() -> ToolDefinition {
        ToolDefinition::new(
            SUBMIT_TOOL,
            "Submit the ordered implementation steps. Call this once with all steps.",
            json!({
                "type": "object",
                "properties": {
                    "implementation_steps": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "filepath": {
                                    "type": "string",
                                    "description": "Target file path relative to the project root"
                                },
                                "task_description": {
                                    "type": "string",
                                    "description": "Detailed, self-contained description of what to implement"
                                }
                            },
                            "required": ["filepath", "task_description"]
                        },
                        "description": "Steps in strict execution order"
                    }
                },
                "required": ["implementation_steps"]
            }),
        )
    }

    /// Decode the step list from the reasoning reply
    fn decode_steps(&self, response: &CompletionResponse) -> Result<Vec<ImplementationStep>, AgentError> {
        if let Some(input) = response.tool_input(SUBMIT_TOOL) {
            debug!("Architect::decode_steps: decoding submit_task_plan tool call");
            let output: ArchitectOutput = serde_json::from_value(input.clone())
                .map_err(|e| AgentError::Architecture(format!("submit_task_plan input did not decode: {}", e)))?;
            return Ok(output.implementation_steps);
        }

        if let Some(content) = &response.content
            && let Ok(output) = serde_json::from_str::<ArchitectOutput>(content)
        {
            debug!("Architect::decode_steps: decoded steps from content JSON");
            return Ok(output.implementation_steps);
        }

        Err(AgentError::Architecture(
            "reasoning call produced no decodable task plan".to_string(),
        ))
    }
}

#[async_trait]
impl GraphNode for Architect {
    fn name(&self) -> &'static str {
        "architect"
    }

    async fn run(&self, state: &AgentState) -> Result<StateUpdate, AgentError> {
        let plan = state
            .plan
            .as_ref()
            .ok_or_else(|| AgentError::Architecture("no plan in state record".to_string()))?
            .clone();

        debug!(plan_name = %plan.name, "Architect::run: called");

        let files = plan
            .files
            .iter()
            .map(|f| format!("- {}: {}", f.path, f.purpose))
            .collect::<Vec<_>>()
            .join("\n");
        let features = plan
            .features
            .iter()
            .map(|f| format!("- {}", f))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = prompts::render(
            prompts::ARCHITECT,
            &json!({
                "name": plan.name,
                "description": plan.description,
                "tech_stack": plan.tech_stack,
                "features": features,
                "files": files,
            }),
        )?;

        let request = CompletionRequest {
            system_prompt: "You are a precise software architect. Always submit your steps through the provided tool."
                .to_string(),
            messages: vec![Message::user(prompt)],
            tools: vec![Self::submit_tool()],
            max_tokens: self.max_tokens,
        };

        let response = self.llm.complete(request).await?;
        let steps = self.decode_steps(&response)?;

        // Plan identity is stamped here, deterministically
        let task_plan = TaskPlan::new(plan, steps);

        info!(step_count = task_plan.step_count(), "Architect::run: task plan produced");
        Ok(StateUpdate::with_task_plan(Arc::new(task_plan)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Plan;
    use crate::llm::client::mock::{MockLlmClient, text_response};
    use crate::llm::{StopReason, TokenUsage, ToolCall};

    fn steps_tool_response(input: serde_json::Value) -> CompletionResponse {
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

    fn state_with_plan() -> AgentState {
        let mut state = AgentState::new("Create a simple calculator web application");
        state.plan = Some(Arc::new(Plan {
            name: "calculator".to_string(),
            description: "A calculator web app".to_string(),
            tech_stack: "Flask".to_string(),
            features: vec!["arithmetic".to_string()],
            files: vec![],
        }));
        state
    }

    #[tokio::test]
    async fn test_architect_writes_task_plan() {
        let llm = Arc::new(MockLlmClient::new(vec![steps_tool_response(json!({
            "implementation_steps": [
                {"filepath": "app.py", "task_description": "create Flask app"},
                {"filepath": "templates/index.html", "task_description": "add calculator form"}
            ]
        }))]));

        let architect = Architect::new(llm, 4096);
        let state = state_with_plan();

        let update = architect.run(&state).await.unwrap();
        let task_plan = update.task_plan.unwrap();
        assert_eq!(task_plan.step_count(), 2);
        assert_eq!(task_plan.implementation_steps[0].filepath, "app.py");
    }

    #[tokio::test]
    async fn test_architect_stamps_exact_input_plan() {
        // The tool reply carries no plan at all; identity must come from state
        let llm = Arc::new(MockLlmClient::new(vec![steps_tool_response(json!({
            "implementation_steps": [
                {"filepath": "app.py", "task_description": "create Flask app"}
            ]
        }))]));

        let architect = Architect::new(llm, 4096);
        let state = state_with_plan();
        let input_plan = state.plan.clone().unwrap();

        let update = architect.run(&state).await.unwrap();
        let task_plan = update.task_plan.unwrap();
        assert!(Arc::ptr_eq(&task_plan.plan, &input_plan));
    }

    #[tokio::test]
    async fn test_architect_without_plan_fails() {
        let llm = Arc::new(MockLlmClient::new(vec![]));
        let architect = Architect::new(llm, 4096);

        let result = architect.run(&AgentState::new("calc")).await;
        assert!(matches!(result, Err(AgentError::Architecture(_))));
    }

    #[tokio::test]
    async fn test_architect_undecodable_reply_is_architecture_error() {
        let llm = Arc::new(MockLlmClient::new(vec![text_response("sure, here are some steps...")]));

        let architect = Architect::new(llm, 4096);
        let result = architect.run(&state_with_plan()).await;
        assert!(matches!(result, Err(AgentError::Architecture(_))));
    }
}
