//! Structured extraction of Objectives from raw OKR text
//!
//! Retrieval-augmented: the user's text is paired with the most similar
//! exemplar chunks before the generation call. Extraction is strict -
//! malformed model output is surfaced to the caller, never patched up,
//! because everything downstream needs a well-formed [`Objective`].

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::Objective;
use crate::index::ExemplarIndex;
use crate::llm::{LlmClient, LlmError, generate};
use crate::structured;

/// Fixed instruction for the extraction call
const EXTRACT_INSTRUCTION: &str = "You are an OKR parsing assistant. \
    Given an OKR statement and reference examples, extract and return ONLY a JSON object: \
    {\"objective\": \"...\", \"deliverables\": [\"...\"], \"timeline\": \"...\"}. \
    All three fields are required.";

/// Errors from the extraction stage
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Model output did not match the three-field schema; carries the
    /// raw text for diagnostics
    #[error("extraction output malformed: {raw}")]
    MalformedOutput { raw: String },

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Configuration for the extractor
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// How many exemplar chunks to retrieve per extraction
    pub top_k: usize,

    /// Max tokens for the extraction response
    pub max_tokens: u32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            max_tokens: 1024,
        }
    }
}

/// Extracts structured [`Objective`] records from free-text OKRs.
pub struct OkrExtractor {
    llm: Arc<dyn LlmClient>,
    index: Arc<ExemplarIndex>,
    config: ExtractorConfig,
}

impl OkrExtractor {
    /// Create a new extractor over an already-built exemplar index
    pub fn new(llm: Arc<dyn LlmClient>, index: Arc<ExemplarIndex>, config: ExtractorConfig) -> Self {
        Self { llm, index, config }
    }

    /// Extract a structured Objective from one OKR statement.
    ///
    /// No local state; the generation call is the only side effect.
    pub async fn extract(&self, okr_text: &str) -> Result<Objective, ExtractionError> {
        debug!(okr_len = okr_text.len(), "extract: called");

        let context = self.index.context_for(okr_text, self.config.top_k);
        debug!(has_context = context.is_some(), "extract: retrieved exemplars");

        let raw = generate(
            &self.llm,
            EXTRACT_INSTRUCTION,
            &format!("OKR: {}", okr_text),
            context.as_deref(),
            self.config.max_tokens,
        )
        .await?;

        let objective: Objective = structured::from_llm_text(&raw, "objective record")
            .map_err(|e| ExtractionError::MalformedOutput { raw: e.raw })?;

        info!(objective = %objective.objective, "extract: parsed objective");
        Ok(objective)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexConfig;
    use crate::llm::client::mock::MockLlmClient;

    fn extractor_with(responses: &[&str], corpus: &[&str]) -> OkrExtractor {
        let corpus: Vec<String> = corpus.iter().map(|c| c.to_string()).collect();
        OkrExtractor::new(
            Arc::new(MockLlmClient::with_text(responses)),
            Arc::new(ExemplarIndex::build(&corpus, &IndexConfig::default())),
            ExtractorConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_extract_parses_well_formed_output() {
        let extractor = extractor_with(
            &[r#"{"objective": "Improve latency", "deliverables": ["p99 < 200ms"], "timeline": "Q3"}"#],
            &["objective: Improve latency"],
        );

        let objective = extractor.extract("We want to improve latency in Q3").await.unwrap();
        assert_eq!(objective.objective, "Improve latency");
        assert_eq!(objective.deliverables, vec!["p99 < 200ms"]);
    }

    #[tokio::test]
    async fn test_extract_is_strict_on_non_json() {
        let extractor = extractor_with(&["Happy to help! The objective seems to be..."], &[]);

        let err = extractor.extract("some okr").await.unwrap_err();
        match err {
            ExtractionError::MalformedOutput { raw } => {
                assert!(raw.starts_with("Happy to help!"));
            }
            other => panic!("expected MalformedOutput, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_extract_is_strict_on_missing_field() {
        // Two of three fields present: still malformed, never partially filled
        let extractor = extractor_with(&[r#"{"objective": "x", "deliverables": []}"#], &[]);

        assert!(matches!(
            extractor.extract("some okr").await,
            Err(ExtractionError::MalformedOutput { .. })
        ));
    }

    #[tokio::test]
    async fn test_extract_works_with_empty_index() {
        let extractor = extractor_with(
            &[r#"{"objective": "x", "deliverables": [], "timeline": ""}"#],
            &[],
        );

        let objective = extractor.extract("bare okr").await.unwrap();
        assert_eq!(objective.timeline, "");
    }
}
