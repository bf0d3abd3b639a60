//! Mutable accumulator for index construction
//!
//! Observations are collected into ordered maps so duplicate
//! `(term, doc, position)` triples collapse on insert. `build` consumes the
//! builder and produces an immutable [`Index`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use super::reader::Index;
use super::types::{DocId, Position, PositionalPosting, PostingList};
use crate::error::{Result, SearchError};
use crate::tokenizer::Tokenizer;

/// Builder collecting term observations for a whole corpus
#[derive(Debug, Default)]
pub struct IndexBuilder {
    /// term -> doc -> distinct positions
    terms: HashMap<String, BTreeMap<DocId, BTreeSet<Position>>>,
    /// Explicitly registered document lengths
    doc_lengths: HashMap<DocId, u32>,
    tokenizer: Tokenizer,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `term` in `doc_id` at `position`
    pub fn add(&mut self, term: &str, doc_id: DocId, position: Position) {
        self.terms
            .entry(term.to_string())
            .or_default()
            .entry(doc_id)
            .or_default()
            .insert(position);
    }

    /// Record the total token count of a document
    pub fn set_doc_len(&mut self, doc_id: DocId, length: u32) {
        self.doc_lengths.insert(doc_id, length);
    }

    /// Tokenize a document's text and record all of its tokens
    ///
    /// Returns the document length.
    pub fn add_document(&mut self, doc_id: DocId, text: &str) -> u32 {
        let mut length = 0;
        for (term, position) in self.tokenizer.tokenize(text) {
            self.add(&term, doc_id, position);
            length = position + 1;
        }
        self.set_doc_len(doc_id, length);
        length
    }

    /// Number of distinct terms observed so far
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Finalize into an immutable index
    ///
    /// Documents that received observations but no explicit length get the
    /// length implied by their highest position.
    pub fn build(self) -> Result<Index> {
        let mut doc_lengths = self.doc_lengths;
        let mut doc_ids = BTreeSet::new();
        let mut terms = HashMap::with_capacity(self.terms.len());

        for (term, docs) in self.terms {
            let mut postings = Vec::with_capacity(docs.len());
            for (doc_id, positions) in docs {
                doc_ids.insert(doc_id);
                let implied = positions.last().map_or(0, |&p| p + 1);
                doc_lengths.entry(doc_id).or_insert(implied);
                postings.push(PositionalPosting::new(doc_id, positions.into_iter().collect()));
            }
            terms.insert(term.clone(), PostingList::new(term, postings));
        }

        if doc_lengths.is_empty() {
            return Err(SearchError::EmptyCorpus);
        }

        let total: u64 = doc_lengths.values().map(|&len| len as u64).sum();
        let avg_doc_len = total as f64 / doc_lengths.len() as f64;

        debug!(
            terms = terms.len(),
            documents = doc_lengths.len(),
            avg_doc_len,
            "Built positional index"
        );

        Ok(Index::new(
            terms,
            doc_ids.into_iter().collect(),
            doc_lengths,
            avg_doc_len,
        ))
    }
}
