use indexmap::IndexMap;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{error::Result, vectorizer::{corpus::DocumentStore, token::TermFrequency}};

/// Weighting formulas used by the model
///
/// Swap the engine to change how TF and IDF are computed; the builder,
/// cache and ranking code stay the same.
pub trait TFIDFEngine {
    /// TF of every term of one document
    /// # Arguments
    /// * `freq` - term counts of the document
    /// # Returns
    /// * `IndexMap<String, f64>` - term -> TF, in first-occurrence order
    fn tf(freq: &TermFrequency) -> Result<IndexMap<String, f64>>;

    /// IDF of one term
    /// # Arguments
    /// * `doc_num` - N, documents in the collection
    /// * `doc_freq` - df, documents containing the term
    fn idf(doc_num: u64, doc_freq: u64) -> f64;
}

/// Default engine
/// tf(t, d) = count(t in d) / |d|
/// idf(t) = ln(N / (df(t) + 1)) + 1
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl TFIDFEngine for DefaultTFIDFEngine {
    #[inline]
    fn tf(freq: &TermFrequency) -> Result<IndexMap<String, f64>> {
        freq.tf_map()
    }

    #[inline]
    fn idf(doc_num: u64, doc_freq: u64) -> f64 {
        (doc_num as f64 / (doc_freq as f64 + 1.0)).ln() + 1.0
    }
}

/// Term frequency of one token sequence through engine `E`
pub fn compute_tf<E, T>(tokens: &[T]) -> Result<IndexMap<String, f64>>
where
    E: TFIDFEngine,
    T: AsRef<str>,
{
    E::tf(&TermFrequency::from_tokens(tokens))
}

/// IDF of every term, one entry per term of the universe
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdfTable {
    /// term -> idf, same order as the store's term universe
    #[serde(with = "indexmap::map::serde_seq")]
    idf: IndexMap<String, f64>,
    /// document count it was computed from
    doc_num: u64,
    /// store generation it was computed from
    generation: u64,
    /// store revision it was computed from
    #[serde(skip)]
    revision: u64,
}

impl IdfTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute IDF for the current state of `store`
    pub fn compute<E: TFIDFEngine>(store: &DocumentStore) -> Self {
        let doc_num = store.doc_num() as u64;
        let idf: Vec<(String, f64)> = store
            .terms()
            .par_iter()
            .map(|term| (term.clone(), E::idf(doc_num, store.doc_freq(term))))
            .collect();
        debug!("idf computed: {} terms over {} documents", idf.len(), doc_num);
        Self {
            idf: idf.into_iter().collect(),
            doc_num,
            generation: store.generation(),
            revision: store.revision(),
        }
    }

    #[inline]
    pub fn get(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.idf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }

    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// (term, idf) in term-universe order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.idf.iter().map(|(t, &v)| (t.as_str(), v))
    }

    /// Whether this table still describes `store`
    #[inline]
    pub fn is_current(&self, store: &DocumentStore) -> bool {
        self.revision == store.revision()
    }
}

/// IDF of every term of the store through engine `E`
pub fn compute_idf<E: TFIDFEngine>(store: &DocumentStore) -> IdfTable {
    IdfTable::compute::<E>(store)
}
