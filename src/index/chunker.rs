//! Fixed-window corpus chunking
//!
//! Splits a document into overlapping character windows so that a
//! salient example is never lost entirely to a chunk boundary.

use tracing::debug;

/// One window of corpus text plus its character offset in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub text: String,
    pub source_offset: usize,
}

/// Split `text` into windows of `size` characters with `overlap`
/// characters shared between consecutive windows.
///
/// Offsets are character offsets, not byte offsets, so multi-byte text
/// never splits inside a code point. An overlap >= size degrades to a
/// step of one character rather than looping forever.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<Window> {
    debug!(text_len = text.len(), size, overlap, "chunk_text: called");

    if text.is_empty() || size == 0 {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let step = size.saturating_sub(overlap).max(1);

    let mut windows = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + size).min(chars.len());
        windows.push(Window {
            text: chars[start..end].iter().collect(),
            source_offset: start,
        });
        if end == chars.len() {
            break;
        }
        start += step;
    }

    debug!(window_count = windows.len(), "chunk_text: done");
    windows
}
