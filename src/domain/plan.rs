//! Plan and TaskPlan - the planner's and architect's output records
//!
//! Both are produced once per run, then immutable: the run holds them as
//! `Arc` so the coder's iteration state can share the task plan without
//! cloning step lists on every invocation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// The planner's output - what to build and which files it needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Project name
    pub name: String,

    /// What the project does, in plain language
    pub description: String,

    /// Chosen technology stack
    #[serde(default)]
    pub tech_stack: String,

    /// User-visible features the finished project must have
    #[serde(default)]
    pub features: Vec<String>,

    /// Files the project needs
    #[serde(default)]
    pub files: Vec<PlanFile>,
}

/// One file the plan calls for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanFile {
    /// Path relative to the project root
    pub path: String,

    /// One-line purpose
    pub purpose: String,
}

/// The architect's output - the plan broken into ordered implementation steps
///
/// The back-reference to the plan is stamped by the architect stage itself,
/// never taken from model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskPlan {
    /// The plan this task plan was derived from
    pub plan: Arc<Plan>,

    /// Steps in strict execution order
    pub implementation_steps: Vec<ImplementationStep>,
}

impl TaskPlan {
    /// Create a task plan for a plan
    pub fn new(plan: Arc<Plan>, implementation_steps: Vec<ImplementationStep>) -> Self {
        Self {
            plan,
            implementation_steps,
        }
    }

    /// Number of implementation steps
    pub fn step_count(&self) -> usize {
        self.implementation_steps.len()
    }
}

/// One unit of coder work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementationStep {
    /// Target file path relative to the project root
    pub filepath: String,

    /// What to implement in that file
    pub task_description: String,
}
