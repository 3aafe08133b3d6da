//! Exemplar index - similarity retrieval over chunked reference OKRs
//!
//! Built once from a plain-text corpus and queried read-only afterwards.
//! Ranking uses cosine similarity over L2-normalized term-frequency
//! vectors; the vectors sit behind [`TermVector`] so a model-backed
//! embedding can replace them without touching callers.

mod chunker;

pub use chunker::{Window, chunk_text};

use std::collections::HashMap;
use std::path::Path;

use eyre::{Context, Result};
use tracing::{debug, info};

use crate::config::IndexConfig;

/// One retrievable chunk of reference OKR text.
///
/// Immutable after index build; `source_offset` is the character offset
/// of the chunk within its source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExemplarChunk {
    pub text: String,
    pub source_offset: usize,
}

/// L2-normalized bag-of-words vector over lowercase alphanumeric tokens.
#[derive(Debug, Clone, Default)]
struct TermVector(HashMap<String, f32>);

impl TermVector {
    fn from_text(text: &str) -> Self {
        let mut counts: HashMap<String, f32> = HashMap::new();
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            *counts.entry(token.to_lowercase()).or_insert(0.0) += 1.0;
        }

        let norm = counts.values().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in counts.values_mut() {
                *value /= norm;
            }
        }

        Self(counts)
    }

    /// Cosine similarity; both vectors are unit length so this is a dot product
    fn similarity(&self, other: &TermVector) -> f32 {
        let (small, large) = if self.0.len() <= other.0.len() {
            (&self.0, &other.0)
        } else {
            (&other.0, &self.0)
        };
        small
            .iter()
            .filter_map(|(term, weight)| large.get(term).map(|w| w * weight))
            .sum()
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

struct IndexedChunk {
    chunk: ExemplarChunk,
    vector: TermVector,
}

/// Similarity index over chunked exemplar OKR text.
pub struct ExemplarIndex {
    chunks: Vec<IndexedChunk>,
}

impl ExemplarIndex {
    /// Build an index from raw corpus documents.
    ///
    /// Each document is windowed per the chunking config and every
    /// window becomes one retrievable chunk. An empty corpus yields an
    /// index that answers every query with an empty result.
    pub fn build(corpus: &[String], config: &IndexConfig) -> Self {
        debug!(doc_count = corpus.len(), "ExemplarIndex::build: called");

        let mut chunks = Vec::new();
        for doc in corpus {
            for window in chunk_text(doc, config.chunk_size, config.chunk_overlap) {
                let vector = TermVector::from_text(&window.text);
                chunks.push(IndexedChunk {
                    chunk: ExemplarChunk {
                        text: window.text,
                        source_offset: window.source_offset,
                    },
                    vector,
                });
            }
        }

        info!(chunk_count = chunks.len(), "exemplar index built");
        Self { chunks }
    }

    /// Build from a plain-text corpus file with blank-line-separated documents
    pub fn from_corpus_file(path: &Path, config: &IndexConfig) -> Result<Self> {
        debug!(path = %path.display(), "ExemplarIndex::from_corpus_file: called");
        let corpus = load_corpus(path)?;
        Ok(Self::build(&corpus, config))
    }

    /// Top-`k` chunks most similar to `text`, most similar first.
    ///
    /// Ties keep original corpus order. A query with no indexable tokens
    /// returns nothing.
    pub fn query(&self, text: &str, k: usize) -> Vec<&ExemplarChunk> {
        debug!(query_len = text.len(), k, "ExemplarIndex::query: called");

        let query_vector = TermVector::from_text(text);
        if query_vector.is_empty() || k == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(f32, &ExemplarChunk)> = self
            .chunks
            .iter()
            .map(|entry| (query_vector.similarity(&entry.vector), &entry.chunk))
            .collect();

        // Stable sort keeps corpus order among equal scores
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        scored.into_iter().take(k).map(|(_, chunk)| chunk).collect()
    }

    /// Retrieved chunks joined into one context block, or None when the
    /// index has nothing relevant to offer.
    pub fn context_for(&self, text: &str, k: usize) -> Option<String> {
        let chunks = self.query(text, k);
        if chunks.is_empty() {
            return None;
        }
        Some(
            chunks
                .iter()
                .map(|c| c.text.as_str())
                .collect::<Vec<_>>()
                .join("\n---\n"),
        )
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Load a corpus file: documents separated by blank lines
pub fn load_corpus(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read corpus file {}", path.display()))?;

    let docs: Vec<String> = content
        .split("\n\n")
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect();

    debug!(doc_count = docs.len(), "load_corpus: loaded {}", path.display());
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(docs: &[&str]) -> ExemplarIndex {
        let corpus: Vec<String> = docs.iter().map(|d| d.to_string()).collect();
        ExemplarIndex::build(&corpus, &IndexConfig::default())
    }

    #[test]
    fn test_empty_corpus_returns_empty() {
        let index = ExemplarIndex::build(&[], &IndexConfig::default());
        assert!(index.is_empty());
        assert!(index.query("anything", 5).is_empty());
        assert_eq!(index.context_for("anything", 5), None);
    }

    #[test]
    fn test_most_similar_chunk_ranks_first() {
        let index = index_of(&[
            "objective: Improve latency",
            "objective: Grow revenue by onboarding enterprise accounts",
            "objective: Reduce infrastructure cost",
        ]);

        let results = index.query("Improve latency", 2);
        assert_eq!(results[0].text, "objective: Improve latency");
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let index = index_of(&["alpha beta", "gamma delta", "epsilon zeta"]);

        // Query matching nothing scores every chunk 0.0 equally
        let results = index.query("omega", 3);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].text, "alpha beta");
        assert_eq!(results[1].text, "gamma delta");
    }

    #[test]
    fn test_query_with_no_tokens_returns_empty() {
        let index = index_of(&["objective: Improve latency"]);
        assert!(index.query("!!! ...", 3).is_empty());
    }

    #[test]
    fn test_k_caps_result_count() {
        let index = index_of(&["latency one", "latency two", "latency three"]);
        assert_eq!(index.query("latency", 2).len(), 2);
    }

    #[test]
    fn test_context_for_joins_chunks() {
        let index = index_of(&["latency first", "latency second"]);
        let context = index.context_for("latency", 2).unwrap();
        assert!(context.contains("latency first"));
        assert!(context.contains("\n---\n"));
    }

    #[test]
    fn test_term_vector_similarity_is_symmetric() {
        let a = TermVector::from_text("improve latency now");
        let b = TermVector::from_text("latency");
        let ab = a.similarity(&b);
        let ba = b.similarity(&a);
        assert!((ab - ba).abs() < 1e-6);
        assert!(ab > 0.0);
    }

    #[test]
    fn test_load_corpus_splits_on_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("okrs.txt");
        std::fs::write(&path, "objective: one\nkr: a\n\nobjective: two\n").unwrap();

        let docs = load_corpus(&path).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1], "objective: two");
    }
}
