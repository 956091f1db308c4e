//! AgentState - the shared state record threaded through every node
//!
//! Each stage owns a disjoint slice of the record: the planner writes
//! `plan`, the architect `task_plan`, the coder `coder_state` and `status`.
//! Nodes never mutate the record directly - they return a `StateUpdate`
//! naming only the fields they own, and the executor merges it. Fields are
//! typed and named rather than stringly-keyed so a stage cannot silently
//! overwrite another stage's output with an incompatible shape.

use std::sync::Arc;

use crate::domain::{CoderState, Plan, TaskPlan};

/// Overall run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    /// Work remains; the graph keeps dispatching
    #[default]
    InProgress,
    /// Every implementation step has been processed
    Done,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Done => write!(f, "DONE"),
        }
    }
}

/// The accumulating state record shared by all nodes
#[derive(Debug, Clone, Default)]
pub struct AgentState {
    /// The user's feature request (set once, before the run)
    pub user_prompt: String,

    /// Planner output
    pub plan: Option<Arc<Plan>>,

    /// Architect output
    pub task_plan: Option<Arc<TaskPlan>>,

    /// Coder iteration cursor
    pub coder_state: Option<CoderState>,

    /// Run status; the coder's conditional edge routes on this
    pub status: RunStatus,
}

impl AgentState {
    /// Create the initial record for a run
    pub fn new(user_prompt: impl Into<String>) -> Self {
        Self {
            user_prompt: user_prompt.into(),
            ..Default::default()
        }
    }

    /// Merge a node's partial update into the record
    pub fn apply(&mut self, update: StateUpdate) {
        if let Some(plan) = update.plan {
            self.plan = Some(plan);
        }
        if let Some(task_plan) = update.task_plan {
            self.task_plan = Some(task_plan);
        }
        if let Some(coder_state) = update.coder_state {
            self.coder_state = Some(coder_state);
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }
}

/// A node's partial update - only the fields the node owns
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub plan: Option<Arc<Plan>>,
    pub task_plan: Option<Arc<TaskPlan>>,
    pub coder_state: Option<CoderState>,
    pub status: Option<RunStatus>,
}

impl StateUpdate {
    /// Update that writes the planner's output
    pub fn with_plan(plan: Arc<Plan>) -> Self {
        Self {
            plan: Some(plan),
            ..Default::default()
        }
    }

    /// Update that writes the architect's output
    pub fn with_task_plan(task_plan: Arc<TaskPlan>) -> Self {
        Self {
            task_plan: Some(task_plan),
            ..Default::default()
        }
    }

    /// Update that writes the coder's cursor
    pub fn with_coder_state(coder_state: CoderState) -> Self {
        Self {
            coder_state: Some(coder_state),
            ..Default::default()
        }
    }

    /// Add a status change to this update
    pub fn and_status(mut self, status: RunStatus) -> Self {
        self.status = Some(status);
        self
    }
}
