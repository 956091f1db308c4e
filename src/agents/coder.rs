//! Coder stage - the resumable, tool-augmented iteration loop
//!
//! One implementation step per invocation. The graph's conditional edge
//! re-invokes this node until it reports `Done`, so for an n-step task plan
//! the node runs exactly n + 1 times: n working invocations, each advancing
//! the cursor by one, and a final one that only flips the status. Nothing
//! here verifies what the reasoning call actually wrote - a silent no-op
//! step counts as processed.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::CoderState;
use crate::graph::{AgentState, GraphNode, RunStatus, StateUpdate};
use crate::llm::{
    CompletionRequest, CompletionResponse, ContentBlock, LlmClient, Message, StopReason, ToolCall, ToolDefinition,
};
use crate::prompts;
use crate::tools::{ToolContext, ToolError, ToolExecutor, ToolResult};

use super::AgentError;

/// Coder stage - executes one implementation step per invocation
pub struct Coder {
    llm: Arc<dyn LlmClient>,
    tools: ToolExecutor,
    ctx: ToolContext,
    max_tokens: u32,
    max_turns: u32,
}

impl Coder {
    /// Create a coder with an injected reasoning client and tool context
    pub fn new(llm: Arc<dyn LlmClient>, tools: ToolExecutor, ctx: ToolContext, max_tokens: u32, max_turns: u32) -> Self {
        debug!(project_root = ?ctx.project_root, max_turns, "Coder::new: called");
        Self {
            llm,
            tools,
            ctx,
            max_tokens,
            max_turns,
        }
    }

    /// Read the step's target file through the read-file collaborator
    ///
    /// A missing file reads as empty text; only a genuine tool failure
    /// (sandbox violation, IO error) aborts the run.
    async fn read_existing(&self, filepath: &str) -> Result<String, AgentError> {
        let call = ToolCall {
            id: "seed-read".to_string(),
            name: "read_file".to_string(),
            input: json!({ "path": filepath }),
        };

        let result = self.tools.execute(&call, &self.ctx).await;
        if result.is_error {
            return Err(AgentError::Tool(ToolError::Failed {
                name: "read_file".to_string(),
                message: result.content,
            }));
        }
        Ok(result.content)
    }

    /// Run the multi-turn tool loop for one step
    ///
    /// The model may call zero or more tools before finishing; results are
    /// fed back as tool-result messages until it ends its turn or the turn
    /// budget runs out.
    async fn run_agentic_loop(
        &self,
        system_prompt: &str,
        task_prompt: &str,
        tool_defs: &[ToolDefinition],
    ) -> Result<(), AgentError> {
        debug!(prompt_len = task_prompt.len(), tool_count = tool_defs.len(), "Coder::run_agentic_loop: called");

        let mut messages = vec![Message::user(task_prompt)];
        let mut turn = 0u32;

        loop {
            turn += 1;
            if turn > self.max_turns {
                warn!(max_turns = self.max_turns, "Coder::run_agentic_loop: turn budget exhausted");
                break;
            }

            let request = CompletionRequest {
                system_prompt: system_prompt.to_string(),
                messages: messages.clone(),
                tools: tool_defs.to_vec(),
                max_tokens: self.max_tokens,
            };

            let response = self.llm.complete(request).await?;
            messages.push(build_assistant_message(&response));

            match response.stop_reason {
                StopReason::ToolUse => {
                    debug!(turn, tool_count = response.tool_calls.len(), "Coder::run_agentic_loop: executing tools");
                    let results = self.tools.execute_all(&response.tool_calls, &self.ctx).await;
                    messages.push(build_tool_result_message(&results));
                }
                StopReason::MaxTokens => {
                    debug!(turn, "Coder::run_agentic_loop: output truncated, asking to continue");
                    messages.push(Message::user(
                        "Continue from where you left off. Your previous response was truncated.",
                    ));
                }
                StopReason::EndTurn | StopReason::StopSequence => {
                    debug!(turn, "Coder::run_agentic_loop: model finished");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Build the assistant message replaying the model's reply
fn build_assistant_message(response: &CompletionResponse) -> Message {
    let mut blocks = Vec::new();

    if let Some(text) = &response.content {
        blocks.push(ContentBlock::text(text));
    }

    for call in &response.tool_calls {
        blocks.push(ContentBlock::ToolUse {
            id: call.id.clone(),
            name: call.name.clone(),
            input: call.input.clone(),
        });
    }

    Message::assistant_blocks(blocks)
}

/// Build the user message carrying tool results back to the model
fn build_tool_result_message(results: &[(String, ToolResult)]) -> Message {
    let blocks: Vec<ContentBlock> = results
        .iter()
        .map(|(id, result)| ContentBlock::tool_result(id, &result.content, result.is_error))
        .collect();

    Message::user_blocks(blocks)
}

#[async_trait]
impl GraphNode for Coder {
    fn name(&self) -> &'static str {
        "coder"
    }

    async fn run(&self, state: &AgentState) -> Result<StateUpdate, AgentError> {
        // Lazily initialize the cursor on first invocation
        let mut coder_state = match &state.coder_state {
            Some(cs) => cs.clone(),
            None => {
                let task_plan = state
                    .task_plan
                    .as_ref()
                    .ok_or_else(|| AgentError::Graph("coder invoked without a task plan".to_string()))?
                    .clone();
                CoderState::new(task_plan)
            }
        };

        let step = match coder_state.current_step() {
            Some(step) => step.clone(),
            None => {
                // Exhausted: flip the status, leave the cursor untouched.
                // Re-entering in this state is idempotent.
                info!(steps = coder_state.task_plan.step_count(), "Coder::run: all steps processed");
                return Ok(StateUpdate::with_coder_state(coder_state).and_status(RunStatus::Done));
            }
        };

        info!(
            step = coder_state.current_step_idx + 1,
            total = coder_state.task_plan.step_count(),
            filepath = %step.filepath,
            "Coder::run: executing step"
        );

        let existing_content = self.read_existing(&step.filepath).await?;

        let system_prompt = prompts::render(
            prompts::CODER_SYSTEM,
            &json!({ "project_root": self.ctx.project_root.display().to_string() }),
        )?;
        let task_prompt = prompts::render(
            prompts::CODER_TASK,
            &json!({
                "task_description": step.task_description,
                "filepath": step.filepath,
                "existing_content": existing_content,
            }),
        )?;

        let tool_defs = self.tools.definitions();
        self.run_agentic_loop(&system_prompt, &task_prompt, &tool_defs).await?;

        // Advance regardless of what the reasoning call did - no verification
        coder_state.advance();
        Ok(StateUpdate::with_coder_state(coder_state))
    }
}
