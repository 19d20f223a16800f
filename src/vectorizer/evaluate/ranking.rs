use std::{cmp::Ordering, fmt::Debug};

use num::Float;
use serde::Serialize;

use crate::{error::{Result, VsmError}, vectorizer::matrix::WeightMatrix};

/// How equal weights are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// ascending term name
    #[default]
    TermAscending,
    /// matrix row order (first-seen order of the terms)
    RowOrder,
}

/// Which matrix a ranking reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weighting {
    /// normalized term frequency
    Tf,
    /// term frequency × inverse document frequency
    #[default]
    TfIdf,
}

/// Top terms of one document
#[derive(Clone, PartialEq, Serialize)]
pub struct RankedTerms<N = f64> {
    /// Document the terms belong to
    pub document: String,
    /// (term, weight), descending by weight
    pub list: Vec<(String, N)>,
}

impl<N: Copy> RankedTerms<N> {
    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, N)> {
        self.list.iter().map(|(t, w)| (t.as_str(), *w))
    }

    pub fn terms(&self) -> Vec<&str> {
        self.list.iter().map(|(t, _)| t.as_str()).collect()
    }
}

impl<N> Debug for RankedTerms<N>
where
    N: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            writeln!(f, "RankedTerms({}) [", self.document)?;
            for (term, weight) in &self.list {
                writeln!(f, "    {}: {:?}", term, weight)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

/// Top `top_n` terms of the document at `doc_index`
///
/// Only terms with a non-zero weight in that column are ranked, so the
/// result holds `min(top_n, nonzero terms)` entries, sorted by descending
/// weight with ties resolved by `tie_break`.
///
/// # Errors
/// `IndexOutOfRange` if `doc_index` is not a column of `matrix`
pub fn top_terms<N>(
    matrix: &WeightMatrix<N>,
    doc_index: usize,
    top_n: usize,
    tie_break: TieBreak,
) -> Result<RankedTerms<N>>
where
    N: Float,
{
    let (column, document) = match (matrix.column(doc_index), matrix.document_name(doc_index)) {
        (Some(column), Some(document)) => (column, document),
        _ => {
            return Err(VsmError::IndexOutOfRange {
                index: doc_index,
                len: matrix.doc_num(),
            })
        }
    };

    // (row, weight); rows are already in row order
    let mut entries: Vec<(usize, N)> = column
        .raw_iter()
        .filter(|(_, w)| !w.is_nan() && !w.is_zero())
        .collect();

    let by_weight = |a: &N, b: &N| b.partial_cmp(a).unwrap_or(Ordering::Equal);
    match tie_break {
        TieBreak::TermAscending => entries.sort_by(|a, b| {
            by_weight(&a.1, &b.1).then_with(|| matrix.term(a.0).cmp(&matrix.term(b.0)))
        }),
        // stable
        TieBreak::RowOrder => entries.sort_by(|a, b| by_weight(&a.1, &b.1)),
    }

    let list = entries
        .into_iter()
        .take(top_n)
        .filter_map(|(row, w)| matrix.term(row).map(|t| (t.to_string(), w)))
        .collect();

    Ok(RankedTerms {
        document: document.to_string(),
        list,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::{corpus::DocumentStore, matrix::build_tf_matrix, tfidf::DefaultTFIDFEngine};

    fn matrix() -> WeightMatrix<f64> {
        let mut store = DocumentStore::new();
        store
            .add_document("doc1", &["machine", "learning", "data", "science", "algorithm", "data", "learning"])
            .unwrap();
        store.add_document("doc2", &["zeta", "beta", "alpha"]).unwrap();
        build_tf_matrix::<f64, DefaultTFIDFEngine>(&store).unwrap()
    }

    #[test]
    fn ties_break_by_term_name() {
        let ranked = top_terms(&matrix(), 0, 3, TieBreak::TermAscending).unwrap();
        assert_eq!(ranked.document, "doc1");
        assert_eq!(ranked.terms(), vec!["data", "learning", "algorithm"]);
        assert_eq!(ranked.list[0].1, 2.0 / 7.0);
        assert_eq!(ranked.list[2].1, 1.0 / 7.0);
    }

    #[test]
    fn ties_can_keep_row_order() {
        let ranked = top_terms(&matrix(), 1, 3, TieBreak::RowOrder).unwrap();
        assert_eq!(ranked.terms(), vec!["zeta", "beta", "alpha"]);
        let ranked = top_terms(&matrix(), 1, 3, TieBreak::TermAscending).unwrap();
        assert_eq!(ranked.terms(), vec!["alpha", "beta", "zeta"]);
    }

    #[test]
    fn descending_and_bounded_by_nonzero_terms() {
        let m = matrix();
        let ranked = top_terms(&m, 1, 10, TieBreak::default()).unwrap();
        // doc2 has 3 non-zero terms out of 8 rows
        assert_eq!(ranked.len(), 3);
        let ranked = top_terms(&m, 0, 10, TieBreak::default()).unwrap();
        assert_eq!(ranked.len(), 5);
        for pair in ranked.list.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn zero_top_n_is_empty() {
        let ranked = top_terms(&matrix(), 0, 0, TieBreak::default()).unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn out_of_range_index() {
        let err = top_terms(&matrix(), 2, 3, TieBreak::default()).unwrap_err();
        assert_eq!(err, VsmError::IndexOutOfRange { index: 2, len: 2 });
        let empty = WeightMatrix::<f64>::empty();
        assert!(top_terms(&empty, 0, 1, TieBreak::default()).is_err());
    }
}
