//! CodeForge - natural-language feature requests to multi-file code changes
//!
//! A three-stage pipeline turns one feature request into a working set of
//! project files. A planner decides what to build, an architect orders the
//! work into per-file implementation steps, and a coder executes each step
//! with file tools, one reasoning call at a time.
//!
//! # Core Concepts
//!
//! - **One record, disjoint writers**: every stage reads a shared state
//!   record and returns a partial update naming only the fields it owns
//! - **Explicit iteration**: the coder's self-loop is a conditional graph
//!   edge resolved by one executor loop, not recursion
//! - **Sandboxed tools**: the coder's file tools are scoped to one project
//!   root and cannot escape it
//! - **Injected reasoning**: stages receive their LLM client; nothing is
//!   process-global
//!
//! # Modules
//!
//! - [`agents`] - Pipeline stages and graph assembly
//! - [`graph`] - Directed-graph execution engine
//! - [`domain`] - Plan, task plan, and coder cursor types
//! - [`llm`] - LLM client trait and OpenAI-compatible implementation
//! - [`tools`] - Sandboxed file tools for the coder
//! - [`prompts`] - Embedded prompt templates
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod agents;
pub mod cli;
pub mod config;
pub mod domain;
pub mod graph;
pub mod llm;
pub mod prompts;
pub mod tools;

// Re-export commonly used types
pub use agents::{AgentError, Architect, Coder, Planner, build_graph};
pub use config::{Config, LlmConfig};
pub use domain::{CoderState, ImplementationStep, Plan, PlanFile, TaskPlan};
pub use graph::{AgentState, EdgeTarget, GraphExecutor, GraphNode, RunStatus, StateUpdate};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, create_client};
pub use tools::{Tool, ToolContext, ToolError, ToolExecutor, ToolResult};
