//! Graph execution engine
//!
//! A small directed-graph executor threading one accumulating state record
//! through registered nodes. Execution is single-threaded and sequential:
//! no node runs concurrently with another, and the coder's self-loop is
//! repeated re-invocation inside the executor's run loop.

mod executor;
mod state;

pub use executor::{EdgeSelector, EdgeTarget, GraphExecutor, GraphNode};
pub use state::{AgentState, RunStatus, StateUpdate};
