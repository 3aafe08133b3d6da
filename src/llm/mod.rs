//! Generation capability for the decomposition pipeline
//!
//! Every component that talks to a language model goes through the
//! [`LlmClient`] trait; the concrete backend is constructed once at
//! startup and injected, never created at module scope.

use std::sync::Arc;

use tracing::debug;

mod anthropic;
pub mod client;
mod error;
mod types;

pub use anthropic::AnthropicClient;
pub use client::LlmClient;
pub use error::LlmError;
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, TokenUsage};

use crate::config::LlmConfig;

/// Create an LLM client based on the provider specified in config
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "anthropic" => Ok(Arc::new(AnthropicClient::from_config(config)?)),
        other => Err(LlmError::InvalidResponse(format!(
            "Unknown LLM provider: '{}'. Supported: anthropic",
            other
        ))),
    }
}

/// One retrieval-augmented generation call: instruction + payload +
/// optional retrieved context, returning the raw model text.
///
/// The schema an instruction requests is a request, not a guarantee;
/// callers apply their own parse policy to the returned text.
pub async fn generate(
    llm: &Arc<dyn LlmClient>,
    instruction: &str,
    payload: &str,
    context: Option<&str>,
    max_tokens: u32,
) -> Result<String, LlmError> {
    debug!(
        payload_len = payload.len(),
        has_context = context.is_some(),
        "generate: called"
    );

    let body = match context {
        Some(context) => format!("{}\n\nExamples:\n{}", payload, context),
        None => payload.to_string(),
    };

    let request = CompletionRequest {
        system_prompt: instruction.to_string(),
        messages: vec![Message::user(body)],
        max_tokens,
    };

    let response = llm.complete(request).await?;
    response
        .content
        .ok_or_else(|| LlmError::InvalidResponse("model returned no text content".to_string()))
}
