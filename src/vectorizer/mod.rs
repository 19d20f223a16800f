pub mod corpus;
pub mod evaluate;
pub mod matrix;
pub mod tfidf;
pub mod token;

use log::debug;
use num::Float;

use crate::{
    error::Result,
    vectorizer::{
        corpus::DocumentStore,
        evaluate::{
            ranking::{top_terms, RankedTerms, TieBreak, Weighting},
            summary::{IdfSummary, TermBreakdown},
        },
        matrix::{build_tf_matrix, build_tfidf_matrix, WeightMatrix},
        tfidf::{DefaultTFIDFEngine, IdfTable, TFIDFEngine},
    },
};

/// A derived table and the store generation it was built from
#[derive(Debug, Clone)]
struct Cached<T> {
    generation: u64,
    value: T,
}

impl<T> Cached<T> {
    #[inline]
    fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

/// Vector space model
///
/// Owns the document store and the tables derived from it (TF matrix, IDF
/// table, TF-IDF matrix). Derived tables are rebuilt lazily: each one
/// remembers the store generation it was built from and is recomputed on the
/// next query once `add_document` has moved the generation on.
///
/// `VectorSpaceModel<N, E>`:
/// - `N`: matrix element type (`f64` or `f32`)
/// - `E`: weighting engine, `DefaultTFIDFEngine` by default
#[derive(Debug, Clone)]
pub struct VectorSpaceModel<N = f64, E = DefaultTFIDFEngine>
where
    N: Float + Send + Sync,
    E: TFIDFEngine,
{
    store: DocumentStore,
    tf_cache: Option<Cached<WeightMatrix<N>>>,
    tfidf_cache: Option<Cached<WeightMatrix<N>>>,
    idf_cache: IdfTable,
    _marker: std::marker::PhantomData<E>,
}

impl<N, E> Default for VectorSpaceModel<N, E>
where
    N: Float + Send + Sync,
    E: TFIDFEngine,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> VectorSpaceModel<N, E>
where
    N: Float + Send + Sync,
    E: TFIDFEngine,
{
    pub fn new() -> Self {
        Self {
            store: DocumentStore::new(),
            tf_cache: None,
            tfidf_cache: None,
            idf_cache: IdfTable::new(),
            _marker: std::marker::PhantomData,
        }
    }

    /// Add a document
    /// Derived tables become stale and are rebuilt on their next query
    ///
    /// # Errors
    /// `DuplicateDocument` if `name` was already added
    pub fn add_document<T>(&mut self, name: &str, tokens: &[T]) -> Result<()>
    where
        T: AsRef<str>,
    {
        self.store.add_document(name, tokens)
    }

    /// The underlying document store
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn doc_num(&self) -> usize {
        self.store.doc_num()
    }

    /// Document names in insertion order
    pub fn document_names(&self) -> impl Iterator<Item = &str> {
        self.store.document_names()
    }

    /// Whether every derived table describes the current store
    pub fn is_fresh(&self) -> bool {
        let generation = self.store.generation();
        self.idf_cache.generation() == generation
            && self.tf_cache.as_ref().is_some_and(|c| c.is_current(generation))
            && self.tfidf_cache.as_ref().is_some_and(|c| c.is_current(generation))
    }

    /// Recompute IDF if the store changed since the last computation
    pub fn update_idf(&mut self) {
        if !self.idf_cache.is_current(&self.store) {
            debug!("idf stale (generation {} -> {})", self.idf_cache.generation(), self.store.generation());
            self.idf_cache = IdfTable::compute::<E>(&self.store);
        }
    }

    /// IDF table of the current store
    pub fn idf(&mut self) -> &IdfTable {
        self.update_idf();
        &self.idf_cache
    }

    /// IDF values sorted ascending
    pub fn idf_summary(&mut self) -> IdfSummary {
        IdfSummary::from_table(self.idf())
    }

    /// TF matrix of the current store
    ///
    /// # Errors
    /// `EmptyDocument` if a stored document has no tokens
    pub fn tf_matrix(&mut self) -> Result<&WeightMatrix<N>> {
        let generation = self.store.generation();
        let cache = match self.tf_cache.take() {
            Some(c) if c.is_current(generation) => c,
            _ => {
                debug!("tf matrix stale, rebuilding at generation {}", generation);
                let value = build_tf_matrix::<N, E>(&self.store)?;
                Cached { generation, value }
            }
        };
        Ok(&self.tf_cache.insert(cache).value)
    }

    /// TF-IDF matrix of the current store
    /// IDF is recomputed together with every rebuild
    ///
    /// # Errors
    /// `EmptyDocument` if a stored document has no tokens
    pub fn tfidf_matrix(&mut self) -> Result<&WeightMatrix<N>> {
        let generation = self.store.generation();
        let cache = match self.tfidf_cache.take() {
            Some(c) if c.is_current(generation) => c,
            _ => {
                self.tf_matrix()?;
                debug!("tf-idf matrix stale, rebuilding at generation {}", generation);
                let tf = self.tf_cache.as_ref().map(|c| &c.value);
                let (value, idf) = build_tfidf_matrix::<N, E>(&self.store, tf)?;
                self.idf_cache = idf;
                Cached { generation, value }
            }
        };
        Ok(&self.tfidf_cache.insert(cache).value)
    }

    /// Matrix for a weighting scheme
    pub fn matrix(&mut self, weighting: Weighting) -> Result<&WeightMatrix<N>> {
        match weighting {
            Weighting::Tf => self.tf_matrix(),
            Weighting::TfIdf => self.tfidf_matrix(),
        }
    }

    /// Top `top_n` terms of the document at `doc_index`, ties by term name
    ///
    /// # Errors
    /// `IndexOutOfRange` for an unknown position, `EmptyDocument` if a
    /// matrix had to be rebuilt and a document has no tokens
    pub fn relevant_terms(
        &mut self,
        doc_index: usize,
        top_n: usize,
        weighting: Weighting,
    ) -> Result<RankedTerms<N>> {
        self.relevant_terms_with(doc_index, top_n, weighting, TieBreak::TermAscending)
    }

    pub fn relevant_terms_with(
        &mut self,
        doc_index: usize,
        top_n: usize,
        weighting: Weighting,
        tie_break: TieBreak,
    ) -> Result<RankedTerms<N>> {
        let matrix = self.matrix(weighting)?;
        top_terms(matrix, doc_index, top_n, tie_break)
    }

    /// N, df, idf and per-document weights of `term`
    /// `Ok(None)` if the term never occurred
    pub fn explain_term(&mut self, term: &str) -> Result<Option<TermBreakdown<N>>> {
        self.tfidf_matrix()?;
        let (tf, tfidf) = match (&self.tf_cache, &self.tfidf_cache) {
            (Some(tf), Some(tfidf)) => (&tf.value, &tfidf.value),
            _ => return Ok(None),
        };
        Ok(TermBreakdown::new(term, &self.store, &self.idf_cache, tf, tfidf))
    }
}
