//! Pipeline stages and graph assembly
//!
//! Three stages run in sequence: planner, architect, coder. The coder node
//! carries a conditional self-loop and re-invokes until it reports `Done`.

mod architect;
mod coder;
mod error;
mod planner;

pub use architect::Architect;
pub use coder::Coder;
pub use error::AgentError;
pub use planner::Planner;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::graph::{AgentState, EdgeTarget, GraphExecutor, RunStatus};
use crate::llm::LlmClient;
use crate::tools::{ToolContext, ToolExecutor};

/// Assemble the three-stage pipeline graph
///
/// Wiring: planner -> architect -> coder, then a conditional edge on the
/// coder that loops back to itself until the run status is `Done`.
pub fn build_graph(llm: Arc<dyn LlmClient>, ctx: ToolContext, max_tokens: u32, max_turns: u32) -> GraphExecutor {
    let mut graph = GraphExecutor::new();

    graph.add_node(Box::new(Planner::new(llm.clone(), max_tokens)));
    graph.add_node(Box::new(Architect::new(llm.clone(), max_tokens)));
    graph.add_node(Box::new(Coder::new(llm, ToolExecutor::coder(), ctx, max_tokens, max_turns)));

    graph.add_edge("planner", "architect");
    graph.add_edge("architect", "coder");

    let mut targets = HashMap::new();
    targets.insert("coder".to_string(), EdgeTarget::Node("coder".to_string()));
    targets.insert("end".to_string(), EdgeTarget::End);
    graph.add_conditional_edge(
        "coder",
        Box::new(|state: &AgentState| {
            if state.status == RunStatus::Done {
                "end".to_string()
            } else {
                "coder".to_string()
            }
        }),
        targets,
    );

    graph.set_entry("planner");
    graph
}

/// Run the full pipeline for one feature request
pub async fn run(
    user_prompt: &str,
    llm: Arc<dyn LlmClient>,
    ctx: ToolContext,
    max_tokens: u32,
    max_turns: u32,
) -> Result<AgentState, AgentError> {
    info!(run_id = %ctx.run_id, "agents::run: starting pipeline");

    let graph = build_graph(llm, ctx, max_tokens, max_turns);
    let state = graph.run(AgentState::new(user_prompt)).await?;

    info!(status = %state.status, "agents::run: pipeline finished");
    Ok(state)
}
