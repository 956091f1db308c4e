//! Domain records: Plan, TaskPlan, ImplementationStep, CoderState
//!
//! Plan and TaskPlan are produced once and immutable for the rest of the
//! run; CoderState is the single record that evolves across repeated
//! invocations of the coder node.

mod coder_state;
mod plan;

pub use coder_state::CoderState;
pub use plan::{ImplementationStep, Plan, PlanFile, TaskPlan};
