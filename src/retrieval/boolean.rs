//! Boolean retrieval over the positional index
//!
//! Each query node evaluates to a sorted list of document ids. The top-level
//! node list is a conjunction, intersected left to right and cut short as
//! soon as the running result is empty.

use tracing::debug;

use super::kgram::KGramIndex;
use super::{RankedResult, RetrievalSystem};
use crate::config::SearchSettings;
use crate::index::{
    difference, intersect, positional_intersect, postings, union_all, DocId, Index,
    PositionalPosting, WindowMode,
};
use crate::query::{display_conjunction, parse, QueryKind, QueryNode};
use crate::Result;

/// Boolean, phrase and proximity query evaluation
pub struct BooleanRetrieval<'a> {
    index: &'a Index,
    settings: SearchSettings,
}

impl<'a> BooleanRetrieval<'a> {
    pub fn new(index: &'a Index, settings: SearchSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { index, settings })
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Parse and evaluate a query string
    pub fn search(&self, query: &str) -> Result<Vec<DocId>> {
        let nodes = parse(query)?;
        debug!(query = %display_conjunction(&nodes), "Evaluating boolean query");
        Ok(self.evaluate(&nodes))
    }

    /// Evaluate an AND-combined node list
    pub fn evaluate(&self, nodes: &[QueryNode]) -> Vec<DocId> {
        let mut iter = nodes.iter();
        let mut result = match iter.next() {
            Some(node) => self.evaluate_node(node),
            None => return Vec::new(),
        };

        for node in iter {
            if result.is_empty() {
                break;
            }
            result = intersect(&result, &self.evaluate_node(node));
        }

        result
    }

    /// Evaluate a single node, applying its negation
    pub fn evaluate_node(&self, node: &QueryNode) -> Vec<DocId> {
        let matched = match &node.kind {
            QueryKind::Term(term) => self.lookup_term(term),
            QueryKind::Phrase(parts) => self.evaluate_phrase(parts),
            QueryKind::Proximity { left, right, k } => {
                let left = self.index.get_positional_postings(left);
                let right = self.index.get_positional_postings(right);
                postings::doc_ids(&positional_intersect(left, right, *k, WindowMode::Either))
            }
            QueryKind::Or(operands) => {
                let lists: Vec<Vec<DocId>> =
                    operands.iter().map(|op| self.evaluate_node(op)).collect();
                union_all(lists.iter().map(Vec::as_slice))
            }
            QueryKind::Group(children) => self.evaluate(children),
        };

        let result = if node.negated {
            difference(self.index.doc_ids(), &matched)
        } else {
            matched
        };

        debug!(
            node = node.query_type(),
            negated = node.negated,
            matched = result.len(),
            "Evaluated query node"
        );
        result
    }

    /// Exact term lookup with spelling correction for low-yield terms
    fn lookup_term(&self, term: &str) -> Vec<DocId> {
        let exact = postings::doc_ids(self.index.get_positional_postings(term));
        if exact.len() >= self.settings.min_results {
            return exact;
        }

        debug!(
            term,
            found = exact.len(),
            min_results = self.settings.min_results,
            "Too few results, trying spelling correction"
        );

        KGramIndex::build(term, self.settings.kgram_size)
            .with_length_tolerance(self.settings.length_tolerance)
            .resolve(self.index)
    }

    /// Strict left-to-right adjacency of all phrase parts
    fn evaluate_phrase(&self, parts: &[String]) -> Vec<DocId> {
        let (last, rest) = match parts.split_last() {
            None => return Vec::new(),
            Some((only, [])) => return self.lookup_term(only),
            Some(split) => split,
        };

        // Each step keeps the positions of the earlier part that start a match
        let mut acc: Vec<PositionalPosting> = self.index.get_positional_postings(last).to_vec();
        for part in rest.iter().rev() {
            if acc.is_empty() {
                break;
            }
            let left = self.index.get_positional_postings(part);
            acc = positional_intersect(left, &acc, 1, WindowMode::Following);
        }

        postings::doc_ids(&acc)
    }
}

impl RetrievalSystem for BooleanRetrieval<'_> {
    /// Matching documents in ascending id order, each scored `1.0`
    fn retrieve(&self, query: &str) -> Result<Vec<RankedResult>> {
        Ok(self
            .search(query)?
            .into_iter()
            .map(|doc_id| RankedResult::new(doc_id, 1.0))
            .collect())
    }
}
