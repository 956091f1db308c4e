//! Tool system for the coder's reasoning call
//!
//! The coder's LLM call is granted a fixed set of file tools, each scoped by
//! a `ToolContext` to the run's project root - tools cannot escape the
//! sandbox. Tool failures are reported back to the model as error results;
//! only sandbox and setup failures abort the run.

mod context;
mod error;
mod executor;
mod traits;

pub mod builtin;

pub use context::ToolContext;
pub use error::ToolError;
pub use executor::ToolExecutor;
pub use traits::{Tool, ToolResult};
