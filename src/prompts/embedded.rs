//! Embedded prompts
//!
//! Compiled into the binary from .pmt files at build time.

/// Planner prompt - feature request to project plan
pub const PLANNER: &str = include_str!("../../prompts/planner.pmt");

/// Architect prompt - project plan to ordered implementation steps
pub const ARCHITECT: &str = include_str!("../../prompts/architect.pmt");

/// Coder system prompt - rules for the tool-augmented implementation call
pub const CODER_SYSTEM: &str = include_str!("../../prompts/coder_system.pmt");

/// Coder task prompt - one implementation step's instruction
pub const CODER_TASK: &str = include_str!("../../prompts/coder_task.pmt");
