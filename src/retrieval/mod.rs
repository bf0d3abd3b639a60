//! Retrieval systems
//!
//! - `BooleanRetrieval`: evaluates the boolean query language with postings
//!   algebra, falling back to k-gram spelling correction for rare terms
//! - `TfIdfRetrieval`: ranks documents for a free-text query

mod boolean;
pub mod kgram;
pub mod scoring;
mod tfidf;

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::index::DocId;
use crate::Result;

pub use boolean::BooleanRetrieval;
pub use kgram::{levenshtein_distance, KGramEntry, KGramIndex};
pub use tfidf::TfIdfRetrieval;

/// A document together with its retrieval score
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    doc_id: DocId,
    score: f64,
}

impl RankedResult {
    pub fn new(doc_id: DocId, score: f64) -> Self {
        Self { doc_id, score }
    }

    pub fn doc_id(&self) -> DocId {
        self.doc_id
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Ranking order: higher score first, then lower document id
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.doc_id.cmp(&other.doc_id))
    }
}

/// A system that answers a query string with ranked documents
pub trait RetrievalSystem {
    /// All matching documents, best first
    fn retrieve(&self, query: &str) -> Result<Vec<RankedResult>>;

    /// The best `k` matching documents
    fn retrieve_k(&self, query: &str, k: usize) -> Result<Vec<RankedResult>> {
        let mut results = self.retrieve(query)?;
        results.truncate(k);
        Ok(results)
    }
}

/// Sort results into ranking order
pub fn rank(mut results: Vec<RankedResult>) -> Vec<RankedResult> {
    results.sort_by(RankedResult::rank_cmp);
    results
}

/// Keep the best `k` results in ranking order
///
/// Uses a bounded heap so only `k` results are held at once.
pub fn top_k<I>(results: I, k: usize) -> Vec<RankedResult>
where
    I: IntoIterator<Item = RankedResult>,
{
    if k == 0 {
        return Vec::new();
    }

    // Max-heap on ranking order: the worst kept result sits on top
    let mut heap: BinaryHeap<RankKey> = BinaryHeap::with_capacity(k + 1);

    for result in results {
        if heap.len() < k {
            heap.push(RankKey(result));
        } else if let Some(worst) = heap.peek() {
            if result.rank_cmp(&worst.0) == Ordering::Less {
                heap.pop();
                heap.push(RankKey(result));
            }
        }
    }

    heap.into_sorted_vec().into_iter().map(|key| key.0).collect()
}

/// Wrapper ordering results by rank for use in BinaryHeap
#[derive(Clone, Copy, Debug)]
struct RankKey(RankedResult);

impl PartialEq for RankKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankKey {}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.rank_cmp(&other.0)
    }
}
