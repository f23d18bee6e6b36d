use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::collections::HashMap;

pub const DEFAULT_K1: f64 = 1.5;
pub const DEFAULT_B: f64 = 0.75;

fn default_k1() -> f64 { DEFAULT_K1 }
fn default_b() -> f64 { DEFAULT_B }

/// Accepts `null` as the empty string while still requiring the field to be present.
fn nullable_text<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}

/// One indexed chunk of a source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocEntry {
    /// Opaque identifier assigned by the index builder, echoed back verbatim.
    pub id: Value,
    pub path: String,
    pub chunk_id: Value,
    #[serde(rename = "tf")]
    pub term_frequencies: HashMap<String, u32>,
    /// Raw chunk text. Only used for snippets, never for scoring.
    #[serde(deserialize_with = "nullable_text")]
    pub text: String,
}

/// The whole BM25 index as written by the external builder.
///
/// `documents[i]` and `lengths[i]` describe the same chunk. Once loaded the
/// value is never mutated; a reload builds a new one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    #[serde(rename = "idf")]
    pub inverse_document_frequency: HashMap<String, f64>,
    #[serde(rename = "docs")]
    pub documents: Vec<DocEntry>,
    pub lengths: Vec<f64>,
    #[serde(rename = "avgdl")]
    pub average_document_length: f64,
    #[serde(default = "default_k1")]
    pub k1: f64,
    #[serde(default = "default_b")]
    pub b: f64,
    /// Declared chunk count, reported to callers but not used for scoring.
    #[serde(rename = "N", default, skip_serializing_if = "Option::is_none")]
    pub document_count: Option<Number>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStats {
    pub index_chunks: Option<Number>,
    pub loaded_docs: usize,
    pub vocabulary: usize,
    pub avgdl: f64,
    pub k1: f64,
    pub b: f64,
}

impl Index {
    pub fn len(&self) -> usize { self.documents.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }

    /// Documents paired with their recorded lengths, in index order.
    pub fn iter_docs(&self) -> impl Iterator<Item = (&DocEntry, f64)> + '_ {
        self.documents.iter().zip(self.lengths.iter().copied())
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            index_chunks: self.document_count.clone(),
            loaded_docs: self.documents.len(),
            vocabulary: self.inverse_document_frequency.len(),
            avgdl: self.average_document_length,
            k1: self.k1,
            b: self.b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hyperparameters_default_when_absent() {
        let idx: Index = serde_json::from_value(json!({
            "idf": {"rust": 1.2},
            "docs": [],
            "lengths": [],
            "avgdl": 0.0
        }))
        .unwrap();
        assert_eq!(idx.k1, DEFAULT_K1);
        assert_eq!(idx.b, DEFAULT_B);
        assert_eq!(idx.document_count, None);
    }

    #[test]
    fn null_text_reads_as_empty() {
        let doc: DocEntry = serde_json::from_value(json!({
            "id": "a#0", "path": "a.md", "chunk_id": 0, "tf": {"x": 1}, "text": null
        }))
        .unwrap();
        assert_eq!(doc.text, "");
        assert_eq!(doc.chunk_id, json!(0));
    }

    #[test]
    fn missing_text_is_rejected() {
        let res: Result<DocEntry, _> = serde_json::from_value(json!({
            "id": "a#0", "path": "a.md", "chunk_id": 0, "tf": {}
        }));
        assert!(res.is_err());
    }

    #[test]
    fn stats_reflect_index() {
        let idx: Index = serde_json::from_value(json!({
            "idf": {"a": 0.1, "b": 0.2},
            "docs": [{"id": 1, "path": "p", "chunk_id": 0, "tf": {"a": 1}, "text": "a"}],
            "lengths": [1],
            "avgdl": 1.0,
            "k1": 1.2,
            "N": 7
        }))
        .unwrap();
        let stats = idx.stats();
        assert_eq!(stats.index_chunks, Some(Number::from(7)));
        assert_eq!(stats.loaded_docs, 1);
        assert_eq!(stats.vocabulary, 2);
        assert_eq!(stats.k1, 1.2);
        assert_eq!(stats.b, DEFAULT_B);
    }
}
