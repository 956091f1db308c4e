//! GraphExecutor - drives node execution from entry to terminal
//!
//! Nodes are registered by name and wired with static or conditional edges.
//! `run` is one explicit loop: invoke the current node, merge its partial
//! update, resolve the outgoing edge, repeat until a terminal edge or a node
//! with no outgoing edge. A conditional edge whose target is the node itself
//! is how the coder iterates - sequential re-invocation, not recursion, so
//! termination reasoning stays local to this loop.
//!
//! Failure semantics are fail-fast: a node error aborts the run and
//! propagates to the caller unchanged. Wiring mistakes (missing entry,
//! unknown node, unmatched selector key) are `AgentError::Graph`.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::agents::AgentError;

use super::state::{AgentState, StateUpdate};

/// A node in the orchestration graph
#[async_trait]
pub trait GraphNode: Send + Sync {
    /// Node name used for wiring
    fn name(&self) -> &'static str;

    /// Execute the node against the current record, returning a partial update
    async fn run(&self, state: &AgentState) -> Result<StateUpdate, AgentError>;
}

/// Where an edge leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeTarget {
    /// Another node, by name
    Node(String),
    /// Terminal sentinel - the run stops and returns the accumulated record
    End,
}

/// Selector for conditional edges: inspects the record, returns a target key
pub type EdgeSelector = Box<dyn Fn(&AgentState) -> String + Send + Sync>;

enum Edge {
    Static(String),
    Conditional {
        selector: EdgeSelector,
        targets: HashMap<String, EdgeTarget>,
    },
}

/// Directed-graph execution engine
pub struct GraphExecutor {
    nodes: HashMap<String, Box<dyn GraphNode>>,
    edges: HashMap<String, Edge>,
    entry: Option<String>,
}

impl GraphExecutor {
    /// Create an empty graph
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            entry: None,
        }
    }

    /// Register a node under its own name
    pub fn add_node(&mut self, node: Box<dyn GraphNode>) {
        debug!(node = node.name(), "GraphExecutor::add_node: called");
        self.nodes.insert(node.name().to_string(), node);
    }

    /// Add an unconditional edge
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) {
        let (from, to) = (from.into(), to.into());
        debug!(%from, %to, "GraphExecutor::add_edge: called");
        self.edges.insert(from, Edge::Static(to));
    }

    /// Add a conditional edge
    ///
    /// After `from` executes, `selector` inspects the merged record and
    /// returns a key into `targets`, which names the next node or `End`.
    pub fn add_conditional_edge(
        &mut self,
        from: impl Into<String>,
        selector: EdgeSelector,
        targets: HashMap<String, EdgeTarget>,
    ) {
        let from = from.into();
        debug!(%from, target_count = targets.len(), "GraphExecutor::add_conditional_edge: called");
        self.edges.insert(from, Edge::Conditional { selector, targets });
    }

    /// Set the entry node
    pub fn set_entry(&mut self, name: impl Into<String>) {
        self.entry = Some(name.into());
    }

    /// Execute from the entry node until a terminal condition
    ///
    /// Node errors are not caught here - the first failure aborts the run.
    pub async fn run(&self, initial: AgentState) -> Result<AgentState, AgentError> {
        let entry = self
            .entry
            .as_ref()
            .ok_or_else(|| AgentError::Graph("no entry node set".to_string()))?;

        let mut state = initial;
        let mut current = entry.clone();

        loop {
            let node = self
                .nodes
                .get(&current)
                .ok_or_else(|| AgentError::Graph(format!("unknown node: {}", current)))?;

            debug!(node = %current, "GraphExecutor::run: dispatching node");
            let update = node.run(&state).await?;
            state.apply(update);

            match self.next_node(&current, &state)? {
                Some(next) => {
                    debug!(from = %current, to = %next, "GraphExecutor::run: following edge");
                    current = next;
                }
                None => {
                    info!(last_node = %current, status = %state.status, "GraphExecutor::run: terminal reached");
                    return Ok(state);
                }
            }
        }
    }

    /// Resolve the outgoing edge of `from` against the merged record
    ///
    /// Returns `None` when the run should stop: terminal edge target or no
    /// outgoing edge at all.
    fn next_node(&self, from: &str, state: &AgentState) -> Result<Option<String>, AgentError> {
        match self.edges.get(from) {
            Some(Edge::Static(to)) => Ok(Some(to.clone())),
            Some(Edge::Conditional { selector, targets }) => {
                let key = selector(state);
                match targets.get(&key) {
                    Some(EdgeTarget::Node(to)) => Ok(Some(to.clone())),
                    Some(EdgeTarget::End) => Ok(None),
                    None => Err(AgentError::Graph(format!(
                        "conditional edge from '{}' selected unmapped key '{}'",
                        from, key
                    ))),
                }
            }
            None => Ok(None),
        }
    }
}

impl Default for GraphExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RunStatus;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Node that records how many times it ran and marks Done after `limit`
    struct CountingNode {
        name: &'static str,
        invocations: Arc<AtomicUsize>,
        limit: usize,
    }

    #[async_trait]
    impl GraphNode for CountingNode {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn run(&self, _state: &AgentState) -> Result<StateUpdate, AgentError> {
            let count = self.invocations.fetch_add(1, Ordering::SeqCst) + 1;
            if count > self.limit {
                Ok(StateUpdate::default().and_status(RunStatus::Done))
            } else {
                Ok(StateUpdate::default())
            }
        }
    }

    struct FailingNode;

    #[async_trait]
    impl GraphNode for FailingNode {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn run(&self, _state: &AgentState) -> Result<StateUpdate, AgentError> {
            Err(AgentError::Planning("no decodable plan".to_string()))
        }
    }

    fn loop_targets(node: &str) -> HashMap<String, EdgeTarget> {
        let mut targets = HashMap::new();
        targets.insert("continue".to_string(), EdgeTarget::Node(node.to_string()));
        targets.insert("end".to_string(), EdgeTarget::End);
        targets
    }

    fn status_selector() -> EdgeSelector {
        Box::new(|state: &AgentState| {
            if state.status == RunStatus::Done {
                "end".to_string()
            } else {
                "continue".to_string()
            }
        })
    }

    #[tokio::test]
    async fn test_run_without_entry_fails() {
        let graph = GraphExecutor::new();
        let result = graph.run(AgentState::new("x")).await;
        assert!(matches!(result, Err(AgentError::Graph(_))));
    }

    #[tokio::test]
    async fn test_run_unknown_entry_fails() {
        let mut graph = GraphExecutor::new();
        graph.set_entry("ghost");
        let result = graph.run(AgentState::new("x")).await;
        assert!(matches!(result, Err(AgentError::Graph(_))));
    }

    #[tokio::test]
    async fn test_single_node_without_edge_terminates() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let mut graph = GraphExecutor::new();
        graph.add_node(Box::new(CountingNode {
            name: "solo",
            invocations: invocations.clone(),
            limit: 0,
        }));
        graph.set_entry("solo");

        let state = graph.run(AgentState::new("x")).await.unwrap();
        assert_eq!(invocations.load(Ordering::SeqCst), 1);
        assert_eq!(state.status, RunStatus::Done);
    }

    #[tokio::test]
    async fn test_conditional_self_loop_reinvokes_until_done() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let mut graph = GraphExecutor::new();
        graph.add_node(Box::new(CountingNode {
            name: "looper",
            invocations: invocations.clone(),
            limit: 3,
        }));
        graph.add_conditional_edge("looper", status_selector(), loop_targets("looper"));
        graph.set_entry("looper");

        let state = graph.run(AgentState::new("x")).await.unwrap();

        // 3 working invocations + 1 that only flips the status
        assert_eq!(invocations.load(Ordering::SeqCst), 4);
        assert_eq!(state.status, RunStatus::Done);
    }

    #[tokio::test]
    async fn test_static_edge_chains_nodes() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let mut graph = GraphExecutor::new();
        graph.add_node(Box::new(CountingNode {
            name: "first",
            invocations: first.clone(),
            limit: 0,
        }));
        graph.add_node(Box::new(CountingNode {
            name: "second",
            invocations: second.clone(),
            limit: 0,
        }));
        graph.add_edge("first", "second");
        graph.set_entry("first");

        graph.run(AgentState::new("x")).await.unwrap();
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_node_failure_propagates_unchanged() {
        let mut graph = GraphExecutor::new();
        graph.add_node(Box::new(FailingNode));
        graph.set_entry("failing");

        let result = graph.run(AgentState::new("x")).await;
        assert!(matches!(result, Err(AgentError::Planning(_))));
    }

    #[tokio::test]
    async fn test_unmapped_selector_key_fails() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let mut graph = GraphExecutor::new();
        graph.add_node(Box::new(CountingNode {
            name: "looper",
            invocations,
            limit: 10,
        }));
        graph.add_conditional_edge(
            "looper",
            Box::new(|_| "nowhere".to_string()),
            loop_targets("looper"),
        );
        graph.set_entry("looper");

        let result = graph.run(AgentState::new("x")).await;
        assert!(matches!(result, Err(AgentError::Graph(_))));
    }
}
