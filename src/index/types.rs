//! Core types for the positional index

use serde::{Deserialize, Serialize};

/// External document identifier (the corpus filename)
pub type DocId = u32;

/// Zero-based token offset within a document
pub type Position = u32;

/// A term's occurrences within one document
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionalPosting {
    pub doc_id: DocId,
    /// Strictly increasing token positions
    pub positions: Vec<Position>,
}

impl PositionalPosting {
    pub fn new(doc_id: DocId, positions: Vec<Position>) -> Self {
        debug_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        Self { doc_id, positions }
    }

    /// Number of occurrences of the term in this document
    pub fn term_frequency(&self) -> usize {
        self.positions.len()
    }
}

/// Log-dampened term frequency weight: `log10(count + 1)`
pub fn tf_weight(count: usize) -> f64 {
    (count as f64 + 1.0).log10()
}

/// All postings for one term plus cached statistics
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PostingList {
    term: String,
    postings: Vec<PositionalPosting>,
    /// `tf_weight` per posting, parallel to `postings`
    weights: Vec<f64>,
}

impl PostingList {
    /// Create a posting list from postings sorted by document id
    pub fn new(term: impl Into<String>, postings: Vec<PositionalPosting>) -> Self {
        debug_assert!(postings.windows(2).all(|w| w[0].doc_id < w[1].doc_id));
        let weights = postings
            .iter()
            .map(|p| tf_weight(p.term_frequency()))
            .collect();

        Self {
            term: term.into(),
            postings,
            weights,
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Number of distinct documents containing the term
    pub fn doc_frequency(&self) -> usize {
        self.postings.len()
    }

    pub fn postings(&self) -> &[PositionalPosting] {
        &self.postings
    }

    /// Document ids in ascending order
    pub fn doc_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.postings.iter().map(|p| p.doc_id)
    }

    /// Cached term frequency weight for a document, if the term occurs in it
    pub fn term_weight(&self, doc_id: DocId) -> Option<f64> {
        self.postings
            .binary_search_by_key(&doc_id, |p| p.doc_id)
            .ok()
            .map(|idx| self.weights[idx])
    }

    /// Iterate `(doc_id, weight)` pairs in document order
    pub fn weights(&self) -> impl Iterator<Item = (DocId, f64)> + '_ {
        self.postings
            .iter()
            .zip(&self.weights)
            .map(|(p, &w)| (p.doc_id, w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tf_weight() {
        assert_eq!(tf_weight(0), 0.0);
        assert!((tf_weight(9) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_posting_list_stats() {
        let list = PostingList::new(
            "cat",
            vec![
                PositionalPosting::new(1, vec![1]),
                PositionalPosting::new(4, vec![0, 3, 7]),
            ],
        );

        assert_eq!(list.term(), "cat");
        assert_eq!(list.doc_frequency(), 2);
        assert_eq!(list.doc_ids().collect::<Vec<_>>(), vec![1, 4]);
        assert!((list.term_weight(1).unwrap() - 2f64.log10()).abs() < 1e-12);
        assert!((list.term_weight(4).unwrap() - 4f64.log10()).abs() < 1e-12);
        assert_eq!(list.term_weight(2), None);
    }
}
