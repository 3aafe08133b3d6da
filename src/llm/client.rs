//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// This is the core abstraction for interacting with language models.
/// No conversation state is maintained between calls; each pipeline
/// stage sends a self-contained request. Backends may be slow (seconds)
/// and may return text that ignores the requested schema - callers own
/// the parse policy.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
