use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::{IndexMap, IndexSet};
use log::{trace, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VsmError};

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// Append-only document collection
///
/// Keeps, in insertion order, every document's token sequence together with
/// the term universe and the number of documents each term occurs in.
/// Every successful mutation bumps the generation number, which derived
/// tables compare against to detect that they are stale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentStore {
    /// document name -> token sequence
    documents: IndexMap<String, Vec<String>>,
    /// term universe, first-seen order
    terms: IndexSet<String>,
    /// term -> number of documents containing it
    doc_freq: IndexMap<String, u64>,
    /// mutation counter
    /// for update notify
    generation: u64,
    /// content stamp, unique across stores
    #[serde(skip, default = "next_revision")]
    revision: u64,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document
    ///
    /// # Arguments
    /// * `name` - unique document name
    /// * `tokens` - ordered token sequence (duplicates allowed)
    ///
    /// # Errors
    /// `DuplicateDocument` if `name` is already stored; the store is left untouched
    pub fn add_document<T>(&mut self, name: &str, tokens: &[T]) -> Result<()>
    where
        T: AsRef<str>,
    {
        if self.contains_document(name) {
            return Err(VsmError::DuplicateDocument(name.to_string()));
        }
        if tokens.is_empty() {
            warn!("document `{}` added without tokens", name);
        }
        let tokens: Vec<String> = tokens.iter().map(|t| t.as_ref().to_string()).collect();

        // df counts presence, so each distinct term once per document
        let mut seen: IndexSet<&str> = IndexSet::with_capacity(tokens.len());
        for token in &tokens {
            if seen.insert(token.as_str()) {
                self.terms.insert(token.clone());
                *self.doc_freq.entry(token.clone()).or_insert(0) += 1;
            }
        }
        trace!("add document `{}`: {} tokens, {} distinct", name, tokens.len(), seen.len());

        self.documents.insert(name.to_string(), tokens);
        self.generation += 1;
        self.revision = next_revision();
        Ok(())
    }

    /// Number of documents (N)
    #[inline]
    pub fn doc_num(&self) -> usize {
        self.documents.len()
    }

    /// Size of the term universe
    #[inline]
    pub fn term_num(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Generation number, incremented by every added document
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn contains_document(&self, name: &str) -> bool {
        self.documents.contains_key(name)
    }

    /// Stamp of the current contents
    ///
    /// Two stores share a revision only when one is an unmodified clone of
    /// the other. A new store has revision `0`.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    /// Token sequence of a document
    pub fn tokens(&self, name: &str) -> Option<&[String]> {
        self.documents.get(name).map(|t| t.as_slice())
    }

    /// Name of the document at `index` in insertion order
    pub fn document_name(&self, index: usize) -> Option<&str> {
        self.documents.get_index(index).map(|(name, _)| name.as_str())
    }

    /// Position of a document in insertion order
    pub fn document_index(&self, name: &str) -> Option<usize> {
        self.documents.get_index_of(name)
    }

    /// Document names in insertion order
    pub fn document_names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(|k| k.as_str())
    }

    /// Term universe in first-seen order
    pub fn terms(&self) -> &IndexSet<String> {
        &self.terms
    }

    /// df(t): documents containing `term` at least once
    #[inline]
    pub fn doc_freq(&self, term: &str) -> u64 {
        self.doc_freq.get(term).copied().unwrap_or(0)
    }

    /// (name, tokens) in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.documents.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub(crate) fn documents(&self) -> &IndexMap<String, Vec<String>> {
        &self.documents
    }
}
