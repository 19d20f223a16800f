/// This crate is a vector space model for term weighting:
/// TF, smoothed IDF and TF-IDF matrices plus per-document term ranking.
/// Tokenization is left to the caller; documents come in as token sequences.
pub mod error;
pub mod utils;
pub mod vectorizer;

/// Vector Space Model
/// The top-level struct of this crate.
/// It collects tokenized documents and answers TF / IDF / TF-IDF queries.
///
/// Internally, it holds:
/// - The document store (documents, term universe, document frequencies)
/// - A TF matrix cache
/// - An IDF table cache
/// - A TF-IDF matrix cache
///
/// Every cache remembers the store generation it was built from and is
/// rebuilt on the next query after a document was added.
///
/// `VectorSpaceModel<N, E>` has the following generic parameters:
/// - `N`: Matrix element type (f32, f64)
/// - `E`: Weighting engine type (e.g., DefaultTFIDFEngine)
pub use vectorizer::VectorSpaceModel;

/// Document Store
/// Append-only collection of named token sequences.
/// Document names keep their insertion order, which is also the column
/// order of every matrix built from the store.
/// Adding a name twice is rejected.
pub use vectorizer::corpus::DocumentStore;

/// Term Frequency structure
/// Counts term occurrences inside one document and turns them into
/// normalized term frequencies (count / total).
pub use vectorizer::token::TermFrequency;

/// TF IDF Calculation Engine Trait
/// Defines how TF and IDF are computed.
/// `DefaultTFIDFEngine` uses `count / total` and the smoothed
/// `ln(N / (df + 1)) + 1`.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, IdfTable, TFIDFEngine};

/// Term × document matrix and its builders
pub use vectorizer::matrix::{apply_idf, build_tf_matrix, build_tfidf_matrix, WeightMatrix};

/// Ranking and analysis results
/// - `RankedTerms`: top terms of a document, descending by weight
/// - `IdfSummary`: IDF values sorted ascending
/// - `TermBreakdown`: every input of one term's weights
pub use vectorizer::evaluate::{
    ranking::{top_terms, RankedTerms, TieBreak, Weighting},
    summary::{DocumentWeight, IdfSummary, TermBreakdown},
};

pub use error::{Result, VsmError};
