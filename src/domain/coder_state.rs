//! CoderState - the coder's iteration cursor
//!
//! The only mutable record in the run. `current_step_idx` counts the steps
//! already fully processed; it increases by exactly one per coder invocation
//! and is bounded by the step count, which is what makes the coder's
//! self-loop terminate.

use std::sync::Arc;

use tracing::debug;

use super::{ImplementationStep, TaskPlan};

/// Per-run iteration state for the coder stage
#[derive(Debug, Clone)]
pub struct CoderState {
    /// The task plan being executed (shared, read-only)
    pub task_plan: Arc<TaskPlan>,

    /// Number of steps already fully processed; next step to execute
    pub current_step_idx: usize,
}

impl CoderState {
    /// Create a fresh cursor at the first step
    pub fn new(task_plan: Arc<TaskPlan>) -> Self {
        debug!(steps = task_plan.step_count(), "CoderState::new: called");
        Self {
            task_plan,
            current_step_idx: 0,
        }
    }

    /// Whether every step has been processed
    pub fn is_exhausted(&self) -> bool {
        self.current_step_idx >= self.task_plan.step_count()
    }

    /// The step the next invocation will execute, if any remain
    pub fn current_step(&self) -> Option<&ImplementationStep> {
        self.task_plan.implementation_steps.get(self.current_step_idx)
    }

    /// Advance the cursor past the step just processed
    ///
    /// Saturates at the step count; the cursor never exceeds it.
    pub fn advance(&mut self) {
        if self.current_step_idx < self.task_plan.step_count() {
            self.current_step_idx += 1;
        }
        debug!(current_step_idx = self.current_step_idx, "CoderState::advance: cursor moved");
    }
}
