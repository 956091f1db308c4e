//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// This is the reasoning backend every stage depends on. Clients are
/// constructed once by the entry point and injected as `Arc<dyn LlmClient>`
/// into each stage, so tests can substitute a scripted implementation.
/// Each call blocks until the backend replies; the pipeline makes no forward
/// progress while a call is in flight.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
