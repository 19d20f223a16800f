use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VsmError};

/// TermFrequency
/// Counts how often each term occurs in one document.
/// Terms keep the order of their first occurrence, so every derived
/// table built from it is reproducible.
///
/// # Examples
/// ```
/// use tf_idf_vsm::TermFrequency;
/// let mut freq = TermFrequency::new();
/// freq.add_terms(&["data", "learning", "data"]);
///
/// let tf = freq.tf_map().unwrap();
/// assert_eq!(tf["data"], 2.0 / 3.0);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TermFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    term_count: IndexMap<String, u32>,
    total_term_count: u64,
}

/// Adding terms
impl TermFrequency {
    pub fn new() -> Self {
        TermFrequency {
            term_count: IndexMap::new(),
            total_term_count: 0,
        }
    }

    /// Count every token of a document
    ///
    /// # Arguments
    /// * `tokens` - the document's token sequence
    pub fn from_tokens<T>(tokens: &[T]) -> Self
    where
        T: AsRef<str>,
    {
        let mut freq = Self::new();
        freq.add_terms(tokens);
        freq
    }

    /// add a term
    ///
    /// # Arguments
    /// * `term` - term to count
    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        let count = self.term_count.entry(term.to_string()).or_insert(0);
        *count += 1;
        self.total_term_count += 1;
        self
    }

    /// add several terms
    ///
    /// # Arguments
    /// * `terms` - slice of terms to count
    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }
}

/// TF calculation
impl TermFrequency {
    /// Normalized frequency of every term: `count / total`
    ///
    /// # Returns
    /// * `IndexMap<String, f64>` - term and its TF, in first-occurrence order
    ///
    /// # Errors
    /// `EmptyDocument` when no term was counted
    pub fn tf_map(&self) -> Result<IndexMap<String, f64>> {
        if self.total_term_count == 0 {
            return Err(VsmError::EmptyDocument { document: None });
        }
        let total = self.total_term_count as f64;
        Ok(self
            .term_count
            .iter()
            .map(|(term, &count)| (term.clone(), count as f64 / total))
            .collect())
    }

    /// TF of a single term, 0.0 if it does not occur
    #[inline]
    pub fn tf_term(&self, term: &str) -> f64 {
        if self.total_term_count == 0 {
            return 0.0;
        }
        self.term_count(term) as f64 / self.total_term_count as f64
    }
}

/// Statistics
impl TermFrequency {
    /// occurrences of `term`
    #[inline]
    pub fn term_count(&self, term: &str) -> u32 {
        self.term_count.get(term).copied().unwrap_or(0)
    }

    /// Total number of counted tokens (T)
    #[inline]
    pub fn term_sum(&self) -> u64 {
        self.total_term_count
    }

    /// Number of distinct terms
    #[inline]
    pub fn term_num(&self) -> usize {
        self.term_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total_term_count == 0
    }

    #[inline]
    pub fn contains_term(&self, term: &str) -> bool {
        self.term_count.contains_key(term)
    }

    /// Distinct terms in first-occurrence order
    pub fn term_set_ref_str(&self) -> Vec<&str> {
        self.term_count.keys().map(|s| s.as_str()).collect()
    }

    /// (term, count) pairs in first-occurrence order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.term_count.iter().map(|(term, &count)| (term.as_str(), count))
    }

    /// Terms sharing the highest count
    ///
    /// # Returns
    /// * `Vec<(String, u32)>` - every term with the maximum count
    pub fn most_frequent_terms(&self) -> Vec<(String, u32)> {
        match self.term_count.values().max() {
            Some(&max_count) => self
                .term_count
                .iter()
                .filter(|&(_, &count)| count == max_count)
                .map(|(term, &count)| (term.clone(), count))
                .collect(),
            None => Vec::new(),
        }
    }

    /// distinct / total, 0.0 for an empty document
    pub fn unique_term_ratio(&self) -> f64 {
        if self.total_term_count == 0 {
            return 0.0;
        }
        self.term_count.len() as f64 / self.total_term_count as f64
    }
}
