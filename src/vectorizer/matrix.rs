use indexmap::IndexSet;
use log::{debug, trace};
use num::Float;
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    error::Result,
    utils::datastruct::vector::ZeroSpVec,
    vectorizer::{corpus::DocumentStore, tfidf::{IdfTable, TFIDFEngine}, token::TermFrequency},
};

/// Term × document weight matrix
///
/// Rows are terms in first-seen order, columns are documents in insertion
/// order. Each column is stored sparse; a (term, document) pair with no
/// stored weight reads as `0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightMatrix<N = f64>
where
    N: Float,
{
    terms: IndexSet<String>,
    documents: IndexSet<String>,
    columns: Vec<ZeroSpVec<N>>,
    /// revision of the store it was built from
    #[serde(skip)]
    revision: u64,
}

impl<N> Default for WeightMatrix<N>
where
    N: Float,
{
    fn default() -> Self {
        Self::empty()
    }
}

impl<N> WeightMatrix<N>
where
    N: Float,
{
    /// 0 × 0 matrix
    pub fn empty() -> Self {
        Self {
            terms: IndexSet::new(),
            documents: IndexSet::new(),
            columns: Vec::new(),
            revision: 0,
        }
    }

    /// (rows, columns) = (terms, documents)
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.terms.len(), self.documents.len())
    }

    #[inline]
    pub fn term_num(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn doc_num(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.documents.is_empty()
    }

    /// Row labels
    pub fn terms(&self) -> &IndexSet<String> {
        &self.terms
    }

    /// Column labels
    pub fn documents(&self) -> &IndexSet<String> {
        &self.documents
    }

    pub fn document_name(&self, col: usize) -> Option<&str> {
        self.documents.get_index(col).map(|s| s.as_str())
    }

    pub fn term(&self, row: usize) -> Option<&str> {
        self.terms.get_index(row).map(|s| s.as_str())
    }

    /// Weight by label
    ///
    /// # Returns
    /// * `None` if the term or the document is unknown
    /// * `Some(0)` if both are known but the term does not occur in the document
    pub fn get(&self, term: &str, document: &str) -> Option<N> {
        let row = self.terms.get_index_of(term)?;
        let col = self.documents.get_index_of(document)?;
        self.get_by_index(row, col)
    }

    /// Weight by position
    pub fn get_by_index(&self, row: usize, col: usize) -> Option<N> {
        self.columns.get(col)?.get(row)
    }

    /// Sparse column of a document
    pub fn column(&self, col: usize) -> Option<&ZeroSpVec<N>> {
        self.columns.get(col)
    }

    /// Dense row of a term, one weight per document
    pub fn row(&self, term: &str) -> Option<Vec<N>> {
        let row = self.terms.get_index_of(term)?;
        self.row_by_index(row)
    }

    pub fn row_by_index(&self, row: usize) -> Option<Vec<N>> {
        if row >= self.terms.len() {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|col| col.get(row).unwrap_or_else(N::zero))
                .collect(),
        )
    }

    /// Sum of a column's weights
    pub fn column_sum(&self, col: usize) -> Option<N> {
        self.columns
            .get(col)
            .map(|c| c.raw_iter().fold(N::zero(), |acc, (_, v)| acc + v))
    }

    /// (term, dense row) in row order
    pub fn rows(&self) -> impl Iterator<Item = (&str, Vec<N>)> + '_ {
        self.terms
            .iter()
            .enumerate()
            .map(move |(i, term)| (term.as_str(), self.row_by_index(i).unwrap_or_default()))
    }

    /// Whether this matrix was built from the current contents of `store`
    #[inline]
    pub fn describes(&self, store: &DocumentStore) -> bool {
        self.revision == store.revision()
    }
}

#[inline]
fn cast<N: Float>(v: f64) -> N {
    <N as num::NumCast>::from(v).unwrap_or_else(N::zero)
}

/// Build the TF matrix of `store`
///
/// Each document's TF is computed with `E`, independently and in parallel,
/// then assembled in insertion order. Rows are the union of all term keys in
/// first-seen order; missing (term, document) pairs are `0`.
///
/// # Errors
/// `EmptyDocument` naming a document without tokens; no partial
/// matrix is returned
pub fn build_tf_matrix<N, E>(store: &DocumentStore) -> Result<WeightMatrix<N>>
where
    N: Float + Send + Sync,
    E: TFIDFEngine,
{
    if store.is_empty() {
        debug!("tf matrix: empty store");
        return Ok(WeightMatrix { revision: store.revision(), ..WeightMatrix::empty() });
    }

    let tf_maps = store
        .documents()
        .par_iter()
        .map(|(name, tokens)| {
            E::tf(&TermFrequency::from_tokens(tokens.as_slice())).map_err(|e| e.in_document(name))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut terms: IndexSet<String> = IndexSet::with_capacity(store.term_num());
    for tf in &tf_maps {
        for term in tf.keys() {
            if !terms.contains(term) {
                terms.insert(term.clone());
            }
        }
    }

    let columns: Vec<ZeroSpVec<N>> = tf_maps
        .iter()
        .map(|tf| {
            let pairs = tf
                .iter()
                .filter_map(|(term, &v)| terms.get_index_of(term).map(|row| (row as u32, cast::<N>(v))))
                .collect();
            ZeroSpVec::from_pairs(terms.len(), pairs)
        })
        .collect();

    let documents: IndexSet<String> = store.document_names().map(|s| s.to_string()).collect();
    debug!("tf matrix built: {} terms x {} documents", terms.len(), documents.len());
    Ok(WeightMatrix {
        terms,
        documents,
        columns,
        revision: store.revision(),
    })
}

/// Multiply every TF row by its term's IDF
///
/// Rows without an IDF entry keep their TF weight.
pub fn apply_idf<N>(tf: &WeightMatrix<N>, idf: &IdfTable) -> WeightMatrix<N>
where
    N: Float,
{
    let row_idf: Vec<Option<N>> = tf
        .terms
        .iter()
        .map(|term| idf.get(term).map(cast::<N>))
        .collect();

    let columns = tf
        .columns
        .iter()
        .map(|col| {
            col.map_nonzero(|row, v| match row_idf.get(row).copied().flatten() {
                Some(w) => v * w,
                None => {
                    trace!("no idf for row {}", row);
                    v
                }
            })
        })
        .collect();

    WeightMatrix {
        terms: tf.terms.clone(),
        documents: tf.documents.clone(),
        columns,
        revision: tf.revision,
    }
}

/// Build the TF-IDF matrix of `store`
///
/// `tf` is reused only when it was built from the current contents of
/// `store`, and rebuilt otherwise. IDF is always recomputed against the current store.
///
/// # Returns
/// * the TF-IDF matrix and the IDF table it was weighted with
pub fn build_tfidf_matrix<N, E>(
    store: &DocumentStore,
    tf: Option<&WeightMatrix<N>>,
) -> Result<(WeightMatrix<N>, IdfTable)>
where
    N: Float + Send + Sync,
    E: TFIDFEngine,
{
    let rebuilt;
    let tf = match tf {
        Some(tf) if tf.describes(store) => tf,
        Some(_) => {
            debug!("tf matrix does not match the store, rebuilding");
            rebuilt = build_tf_matrix::<N, E>(store)?;
            &rebuilt
        }
        None => {
            rebuilt = build_tf_matrix::<N, E>(store)?;
            &rebuilt
        }
    };
    let idf = IdfTable::compute::<E>(store);
    let tfidf = apply_idf(tf, &idf);
    debug!("tf-idf matrix built: {:?}", tfidf.shape());
    Ok((tfidf, idf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::VsmError, vectorizer::tfidf::DefaultTFIDFEngine};

    fn sample_store() -> DocumentStore {
        let mut store = DocumentStore::new();
        store
            .add_document("doc1", &["machine", "learning", "data", "science", "algorithm", "data", "learning"])
            .unwrap();
        store
            .add_document("doc2", &["deep", "learning", "neural", "network", "deep", "learning"])
            .unwrap();
        store
            .add_document("doc3", &["natural", "language", "processing", "text", "mining", "language", "text"])
            .unwrap();
        store
    }

    fn tf(store: &DocumentStore) -> WeightMatrix<f64> {
        build_tf_matrix::<f64, DefaultTFIDFEngine>(store).unwrap()
    }

    #[test]
    fn tf_matrix_shape_and_fill() {
        let store = sample_store();
        let m = tf(&store);
        assert_eq!(m.shape(), (store.term_num(), 3));
        assert_eq!(m.get("data", "doc1"), Some(2.0 / 7.0));
        assert_eq!(m.get("algorithm", "doc1"), Some(1.0 / 7.0));
        assert_eq!(m.get("deep", "doc1"), Some(0.0));
        assert_eq!(m.get("deep", "nope"), None);
        assert_eq!(m.get("nope", "doc1"), None);
        assert_eq!(m.row("learning"), Some(vec![2.0 / 7.0, 2.0 / 6.0, 0.0]));
    }

    #[test]
    fn tf_columns_sum_to_one() {
        let m = tf(&sample_store());
        for col in 0..m.doc_num() {
            assert!((m.column_sum(col).unwrap() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn columns_follow_insertion_order() {
        let mut store = DocumentStore::new();
        store.add_document("z", &["b"]).unwrap();
        store.add_document("a", &["a"]).unwrap();
        store.add_document("m", &["c", "a"]).unwrap();
        let m = tf(&store);
        let docs: Vec<&str> = m.documents().iter().map(|s| s.as_str()).collect();
        assert_eq!(docs, vec!["z", "a", "m"]);
        let terms: Vec<&str> = m.terms().iter().map(|s| s.as_str()).collect();
        assert_eq!(terms, vec!["b", "a", "c"]);
        // "a" was seen before "c", so row indices in column "m" arrive unsorted
        assert_eq!(m.get("a", "m"), Some(0.5));
        assert_eq!(m.get("c", "m"), Some(0.5));
    }

    #[test]
    fn builds_are_bit_identical() {
        let store = sample_store();
        assert_eq!(tf(&store), tf(&store));
        let (a, idf_a) = build_tfidf_matrix::<f64, DefaultTFIDFEngine>(&store, None).unwrap();
        let (b, idf_b) = build_tfidf_matrix::<f64, DefaultTFIDFEngine>(&store, None).unwrap();
        assert_eq!(a, b);
        assert_eq!(idf_a, idf_b);
    }

    #[test]
    fn tfidf_cell_is_tf_times_idf() {
        let store = sample_store();
        let tf_m = tf(&store);
        let (m, idf) = build_tfidf_matrix::<f64, DefaultTFIDFEngine>(&store, Some(&tf_m)).unwrap();
        for term in m.terms() {
            for doc in m.documents() {
                let expected = tf_m.get(term, doc).unwrap() * idf.get(term).unwrap();
                assert_eq!(m.get(term, doc), Some(expected));
            }
        }
        assert!((m.get("data", "doc1").unwrap() - 2.0 / 7.0 * (1.5_f64.ln() + 1.0)).abs() < 1e-12);
        assert_eq!(m.get("learning", "doc1"), Some(2.0 / 7.0));
    }

    #[test]
    fn stale_tf_is_rebuilt_and_idf_is_current() {
        let mut store = sample_store();
        let old_tf = tf(&store);
        store.add_document("doc4", &["data", "text"]).unwrap();
        let (m, idf) = build_tfidf_matrix::<f64, DefaultTFIDFEngine>(&store, Some(&old_tf)).unwrap();
        assert_eq!(m.doc_num(), 4);
        assert_eq!(idf.doc_num(), 4);
        assert_eq!(idf.get("data"), Some(DefaultTFIDFEngine::idf(4, 2)));
        assert_eq!(m.get("data", "doc4"), Some(0.5 * DefaultTFIDFEngine::idf(4, 2)));
    }

    #[test]
    fn tf_from_another_store_is_not_reused() {
        let mut a = DocumentStore::new();
        a.add_document("doc1", &["x", "x"]).unwrap();
        let mut b = DocumentStore::new();
        b.add_document("doc1", &["y"]).unwrap();
        let (m, _) = build_tfidf_matrix::<f64, DefaultTFIDFEngine>(&b, Some(&tf(&a))).unwrap();
        let terms: Vec<&str> = m.terms().iter().map(|s| s.as_str()).collect();
        assert_eq!(terms, vec!["y"]);
        assert_eq!(m.get("x", "doc1"), None);
        assert_eq!(m.get("y", "doc1"), Some(DefaultTFIDFEngine::idf(1, 1)));

        // same names, terms and generation, different counts
        let mut c = DocumentStore::new();
        c.add_document("doc1", &["x", "x", "y"]).unwrap();
        let mut d = DocumentStore::new();
        d.add_document("doc1", &["x", "y", "y"]).unwrap();
        let (reused, _) = build_tfidf_matrix::<f64, DefaultTFIDFEngine>(&d, Some(&tf(&c))).unwrap();
        let (fresh, _) = build_tfidf_matrix::<f64, DefaultTFIDFEngine>(&d, None).unwrap();
        assert_eq!(reused, fresh);
    }

    #[test]
    fn diverged_clones_do_not_share_tf() {
        let store = sample_store();
        let mut left = store.clone();
        let mut right = store.clone();
        let shared = tf(&store);
        assert!(shared.describes(&left));
        left.add_document("doc4", &["data"]).unwrap();
        right.add_document("doc4", &["text"]).unwrap();
        assert!(!shared.describes(&left));
        let left_tf = tf(&left);
        assert!(!left_tf.describes(&right));
        let (m, _) = build_tfidf_matrix::<f64, DefaultTFIDFEngine>(&right, Some(&left_tf)).unwrap();
        assert_eq!(m.get("text", "doc4"), Some(DefaultTFIDFEngine::idf(4, 2)));
        assert_eq!(m.get("data", "doc4"), Some(0.0));
    }

    #[test]
    fn empty_store_gives_empty_matrix() {
        let store = DocumentStore::new();
        let m = tf(&store);
        assert_eq!(m.shape(), (0, 0));
        assert!(m.is_empty());
        let (t, idf) = build_tfidf_matrix::<f64, DefaultTFIDFEngine>(&store, None).unwrap();
        assert_eq!(t.shape(), (0, 0));
        assert!(idf.is_empty());
    }

    #[test]
    fn empty_document_fails_the_whole_build() {
        let mut store = sample_store();
        store.add_document("blank", &[] as &[&str]).unwrap();
        let err = build_tf_matrix::<f64, DefaultTFIDFEngine>(&store).unwrap_err();
        assert_eq!(err, VsmError::EmptyDocument { document: Some("blank".to_string()) });
        assert!(build_tfidf_matrix::<f64, DefaultTFIDFEngine>(&store, None).is_err());
    }

    #[test]
    fn f32_matrix() {
        let m = build_tf_matrix::<f32, DefaultTFIDFEngine>(&sample_store()).unwrap();
        assert_eq!(m.get("data", "doc1"), Some((2.0_f64 / 7.0) as f32));
    }
}
