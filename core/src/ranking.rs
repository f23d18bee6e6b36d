//! BM25 ranking over a loaded [`Index`].
//!
//! Every document is scored against the query terms, documents with a
//! non-positive score are dropped, and the rest are ordered by descending
//! score. Equal scores keep index order.

use crate::index::{DocEntry, Index};
use crate::tokenizer::tokenize;
use serde::Serialize;
use serde_json::{Number, Value};
use std::collections::HashMap;

pub const DEFAULT_TOP_K: i64 = 5;
pub const MAX_TOP_K: i64 = 20;
pub const SNIPPET_CHARS: usize = 500;
pub const EMPTY_QUERY: &str = "query is empty";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub score: f64,
    pub path: String,
    pub chunk_id: Value,
    pub id: Value,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub query: String,
    /// The caller's value, before clamping.
    pub top_k: i64,
    /// Declared chunk count, echoed exactly as the artifact stores it.
    pub index_chunks: Option<Number>,
    pub results: Vec<SearchHit>,
}

/// What a search hands back. An empty query is a soft error, not an `Err`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchOutcome {
    Results(SearchResponse),
    Error { error: String },
}

impl SearchOutcome {
    pub fn hits(&self) -> &[SearchHit] {
        match self {
            SearchOutcome::Results(r) => &r.results,
            SearchOutcome::Error { .. } => &[],
        }
    }
}

/// BM25 score of one document.
///
/// Terms absent from the document are skipped; terms absent from `idf` weigh
/// zero. A term repeated in `query_terms` is accumulated once per occurrence.
/// With `avgdl == 0` the length ratio is taken as 1.
pub fn score(
    query_terms: &[String],
    doc_tf: &HashMap<String, u32>,
    idf: &HashMap<String, f64>,
    dl: f64,
    avgdl: f64,
    k1: f64,
    b: f64,
) -> f64 {
    let ratio = if avgdl != 0.0 { dl / avgdl } else { 1.0 };
    let norm = k1 * (1.0 - b + b * ratio);
    let mut total = 0.0;
    for t in query_terms {
        let Some(&tf) = doc_tf.get(t) else { continue };
        let tf = tf as f64;
        let denom = tf + norm;
        let denom = if denom != 0.0 { denom } else { 1.0 };
        total += idf.get(t).copied().unwrap_or(0.0) * (tf * (k1 + 1.0)) / denom;
    }
    total
}

/// Score every document and return those with a positive score, best first.
pub fn rank<'a>(index: &'a Index, query_terms: &[String]) -> Vec<(f64, &'a DocEntry)> {
    let mut scored: Vec<(f64, &DocEntry)> = index
        .iter_docs()
        .filter_map(|(doc, dl)| {
            let s = score(
                query_terms,
                &doc.term_frequencies,
                &index.inverse_document_frequency,
                dl,
                index.average_document_length,
                index.k1,
                index.b,
            );
            (s > 0.0).then_some((s, doc))
        })
        .collect();
    // stable: ties stay in index order
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored
}

pub fn clamp_top_k(top_k: i64) -> usize {
    top_k.clamp(1, MAX_TOP_K) as usize
}

/// Newlines become spaces, then the text is cut to [`SNIPPET_CHARS`] characters.
pub fn snippet(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' { ' ' } else { c })
        .take(SNIPPET_CHARS)
        .collect()
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

pub fn search(index: &Index, query: &str, top_k: i64) -> SearchOutcome {
    let query = query.trim();
    if query.is_empty() {
        return SearchOutcome::Error { error: EMPTY_QUERY.to_string() };
    }
    let q_terms = tokenize(query);
    let scored = rank(index, &q_terms);
    let total_hits = scored.len();
    let results: Vec<SearchHit> = scored
        .into_iter()
        .take(clamp_top_k(top_k))
        .map(|(s, doc)| SearchHit {
            score: round4(s),
            path: doc.path.clone(),
            chunk_id: doc.chunk_id.clone(),
            id: doc.id.clone(),
            snippet: snippet(&doc.text),
        })
        .collect();
    tracing::debug!(query, terms = q_terms.len(), total_hits, returned = results.len(), "search");
    SearchOutcome::Results(SearchResponse {
        query: query.to_string(),
        top_k,
        index_chunks: index.document_count.clone(),
        results,
    })
}
