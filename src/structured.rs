//! Best-effort parsing of semi-structured model output
//!
//! Models are asked for JSON but the schema is a request, not a
//! guarantee. This module centralizes the lenient-deserialization step
//! (fence stripping, whitespace) while each caller keeps its own
//! failure policy: the extractor surfaces a parse failure, the
//! decomposer degrades to an empty list.

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Model output did not match the requested schema
#[derive(Debug, Error)]
#[error("model output is not valid {expected}: {source}")]
pub struct ParseError {
    /// Human-readable name of the expected shape
    pub expected: &'static str,

    /// The raw model text, kept verbatim for diagnostics
    pub raw: String,

    #[source]
    pub source: serde_json::Error,
}

/// Parse model output as JSON of type `T`.
///
/// Tolerates a markdown code fence around the JSON body and surrounding
/// whitespace; anything beyond that is a [`ParseError`] carrying the raw
/// text.
pub fn from_llm_text<T: DeserializeOwned>(raw: &str, expected: &'static str) -> Result<T, ParseError> {
    debug!(raw_len = raw.len(), expected, "from_llm_text: called");

    let body = strip_code_fence(raw.trim());
    serde_json::from_str(body).map_err(|source| {
        debug!(error = %source, "from_llm_text: parse failed");
        ParseError {
            expected,
            raw: raw.to_string(),
            source,
        }
    })
}

/// Remove a surrounding ``` fence (with optional language tag) if present
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop the language tag line ("json", "JSON", or empty)
    match body.split_once('\n') {
        Some((_tag, content)) => content.trim(),
        None => body.trim(),
    }
}
