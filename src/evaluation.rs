//! Retrieval evaluation metrics
//!
//! Metrics compare retrieved document ids against a ground-truth set of
//! relevant ids. Every ratio returns `None` instead of dividing by zero.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, SearchError};
use crate::index::DocId;

/// Confusion counts of a retrieved list against the relevant set
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Confusion {
    pub tp: usize,
    pub fp: usize,
    pub fn_: usize,
}

impl Confusion {
    pub fn precision(&self) -> Option<f64> {
        ratio(self.tp, self.tp + self.fp)
    }

    pub fn recall(&self) -> Option<f64> {
        ratio(self.tp, self.tp + self.fn_)
    }

    /// F-measure weighting recall `beta` times as much as precision
    pub fn f_score(&self, beta: f64) -> Option<f64> {
        let p = self.precision()?;
        let r = self.recall()?;
        let b2 = beta * beta;
        let denominator = b2 * p + r;
        if denominator == 0.0 {
            return None;
        }
        Some((1.0 + b2) * p * r / denominator)
    }
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

/// Count hits and misses of `retrieved` against `relevant`
pub fn confusion(retrieved: &[DocId], relevant: &[DocId]) -> Confusion {
    let relevant: HashSet<DocId> = relevant.iter().copied().collect();
    let retrieved: HashSet<DocId> = retrieved.iter().copied().collect();

    let tp = retrieved.intersection(&relevant).count();
    Confusion {
        tp,
        fp: retrieved.len() - tp,
        fn_: relevant.len() - tp,
    }
}

pub fn precision(retrieved: &[DocId], relevant: &[DocId]) -> Option<f64> {
    confusion(retrieved, relevant).precision()
}

pub fn recall(retrieved: &[DocId], relevant: &[DocId]) -> Option<f64> {
    confusion(retrieved, relevant).recall()
}

pub fn f_score(retrieved: &[DocId], relevant: &[DocId], beta: f64) -> Option<f64> {
    confusion(retrieved, relevant).f_score(beta)
}

/// Precision of the first `|relevant|` ranked documents
pub fn r_precision(ranked: &[DocId], relevant: &[DocId]) -> Option<f64> {
    let cutoff = relevant.len().min(ranked.len());
    precision(&ranked[..cutoff], relevant)
}

/// Average of precision@i over the ranks `i` holding a relevant document
///
/// Relevant documents that were never retrieved contribute zero.
pub fn average_precision(ranked: &[DocId], relevant: &[DocId]) -> Option<f64> {
    let relevant: HashSet<DocId> = relevant.iter().copied().collect();
    if relevant.is_empty() {
        return None;
    }

    let mut seen = HashSet::new();
    let mut hits = 0usize;
    let mut sum = 0.0;

    for (rank, doc_id) in ranked.iter().enumerate() {
        if relevant.contains(doc_id) && seen.insert(*doc_id) {
            hits += 1;
            sum += hits as f64 / (rank + 1) as f64;
        }
    }

    Some(sum / relevant.len() as f64)
}

/// Mean of per-query average precision scores
pub fn mean_average_precision(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    Some(scores.iter().sum::<f64>() / scores.len() as f64)
}

/// Read relevance judgements in `query_id doc_id ...` line format
///
/// Lines with fewer than two fields are skipped. Extra fields are ignored.
pub fn read_qrels(path: impl AsRef<Path>) -> Result<BTreeMap<String, Vec<DocId>>> {
    let text = fs::read_to_string(path)?;
    parse_qrels(&text)
}

/// Parse relevance judgements from text
pub fn parse_qrels(text: &str) -> Result<BTreeMap<String, Vec<DocId>>> {
    let mut qrels: BTreeMap<String, Vec<DocId>> = BTreeMap::new();

    for line in text.lines() {
        let mut fields = line.split_whitespace();
        let (Some(query_id), Some(doc_id)) = (fields.next(), fields.next()) else {
            continue;
        };

        let doc_id = doc_id
            .parse()
            .map_err(|_| SearchError::InvalidDocId(doc_id.to_string()))?;
        qrels.entry(query_id.to_string()).or_default().push(doc_id);
    }

    Ok(qrels)
}
