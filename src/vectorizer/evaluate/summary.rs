use num::Float;
use serde::Serialize;

use crate::vectorizer::{corpus::DocumentStore, matrix::WeightMatrix, tfidf::IdfTable};

/// IDF values sorted ascending, most common terms first
/// ties are ordered by term name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdfSummary {
    pub list: Vec<(String, f64)>,
}

impl IdfSummary {
    pub fn from_table(idf: &IdfTable) -> Self {
        let mut list: Vec<(String, f64)> = idf.iter().map(|(t, v)| (t.to_string(), v)).collect();
        list.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        Self { list }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// `n` lowest IDF values
    pub fn head(&self, n: usize) -> &[(String, f64)] {
        &self.list[..n.min(self.list.len())]
    }

    /// `n` highest IDF values, still ascending
    pub fn tail(&self, n: usize) -> &[(String, f64)] {
        let start = self.list.len().saturating_sub(n);
        &self.list[start..]
    }

    /// Terms with IDF strictly above `threshold` (rare, distinctive terms)
    pub fn above(&self, threshold: f64) -> Vec<&str> {
        self.list
            .iter()
            .filter(|(_, v)| *v > threshold)
            .map(|(t, _)| t.as_str())
            .collect()
    }

    /// Terms with IDF strictly below `threshold` (terms shared by many documents)
    pub fn below(&self, threshold: f64) -> Vec<&str> {
        self.list
            .iter()
            .filter(|(_, v)| *v < threshold)
            .map(|(t, _)| t.as_str())
            .collect()
    }
}

/// TF and TF-IDF of one term in one document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentWeight<N = f64> {
    pub document: String,
    pub tf: N,
    pub tfidf: N,
}

/// Every input of one term's weighting: N, df, idf and per-document weights
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermBreakdown<N = f64> {
    pub term: String,
    pub doc_num: u64,
    pub doc_freq: u64,
    pub idf: f64,
    /// one entry per document, insertion order
    pub per_document: Vec<DocumentWeight<N>>,
}

impl<N> TermBreakdown<N>
where
    N: Float,
{
    /// `None` if `term` is not in the term universe
    pub fn new(
        term: &str,
        store: &DocumentStore,
        idf: &IdfTable,
        tf: &WeightMatrix<N>,
        tfidf: &WeightMatrix<N>,
    ) -> Option<Self> {
        let idf_value = idf.get(term)?;
        let per_document = store
            .document_names()
            .map(|doc| DocumentWeight {
                document: doc.to_string(),
                tf: tf.get(term, doc).unwrap_or_else(N::zero),
                tfidf: tfidf.get(term, doc).unwrap_or_else(N::zero),
            })
            .collect();
        Some(Self {
            term: term.to_string(),
            doc_num: idf.doc_num(),
            doc_freq: store.doc_freq(term),
            idf: idf_value,
            per_document,
        })
    }
}
