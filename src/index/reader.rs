//! Immutable, queryable positional index

use std::collections::HashMap;

use super::types::{DocId, PositionalPosting, PostingList};

/// Positional inverted index built by [`IndexBuilder`](super::IndexBuilder)
///
/// The index never changes after construction, so it can be shared across
/// threads and queried concurrently without locking.
#[derive(Clone, Debug)]
pub struct Index {
    terms: HashMap<String, PostingList>,
    /// Sorted vocabulary, used by spelling correction
    vocabulary: Vec<String>,
    /// Every document id appearing in a posting, ascending
    doc_ids: Vec<DocId>,
    doc_lengths: HashMap<DocId, u32>,
    avg_doc_len: f64,
}

impl Index {
    pub(crate) fn new(
        terms: HashMap<String, PostingList>,
        doc_ids: Vec<DocId>,
        doc_lengths: HashMap<DocId, u32>,
        avg_doc_len: f64,
    ) -> Self {
        let mut vocabulary: Vec<String> = terms.keys().cloned().collect();
        vocabulary.sort_unstable();

        Self {
            terms,
            vocabulary,
            doc_ids,
            doc_lengths,
            avg_doc_len,
        }
    }

    /// Postings for a term, sorted by document id; empty if the term is unknown
    pub fn get_positional_postings(&self, term: &str) -> &[PositionalPosting] {
        self.terms
            .get(term)
            .map(|list| list.postings())
            .unwrap_or(&[])
    }

    pub fn get_posting_list(&self, term: &str) -> Option<&PostingList> {
        self.terms.get(term)
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    /// All indexed terms in lexicographic order
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// The universe of document ids, ascending
    pub fn doc_ids(&self) -> &[DocId] {
        &self.doc_ids
    }

    pub fn num_docs(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn doc_len(&self, doc_id: DocId) -> Option<u32> {
        self.doc_lengths.get(&doc_id).copied()
    }

    pub fn doc_lengths(&self) -> &HashMap<DocId, u32> {
        &self.doc_lengths
    }

    pub fn avg_doc_len(&self) -> f64 {
        self.avg_doc_len
    }
}

#[cfg(test)]
mod tests {
    use crate::index::IndexBuilder;

    fn cat_index() -> super::Index {
        let mut builder = IndexBuilder::new();
        builder.add_document(1, "the cat sat");
        builder.add_document(2, "the cat ran");
        builder.build().unwrap()
    }

    #[test]
    fn test_unknown_term_is_empty() {
        let index = cat_index();
        assert!(index.get_positional_postings("dog").is_empty());
        assert!(index.get_posting_list("dog").is_none());
        assert!(!index.contains_term("dog"));
    }

    #[test]
    fn test_vocabulary_sorted() {
        let index = cat_index();
        assert_eq!(index.vocabulary(), &["cat", "ran", "sat", "the"]);
        assert_eq!(index.num_terms(), 4);
    }

    #[test]
    fn test_posting_list_lookup() {
        let index = cat_index();
        let list = index.get_posting_list("cat").unwrap();
        assert_eq!(list.doc_frequency(), 2);
        assert_eq!(list.postings()[0].positions, vec![1]);
        assert_eq!(index.num_docs(), 2);
    }

    #[test]
    fn test_every_token_is_indexed() {
        let docs = [(1, "a rose is a rose"), (2, "is it? it is!")];
        let mut builder = IndexBuilder::new();
        for (id, text) in docs {
            builder.add_document(id, text);
        }
        let index = builder.build().unwrap();

        let tokenizer = crate::tokenizer::Tokenizer::new();
        for (id, text) in docs {
            for (term, position) in tokenizer.tokenize(text) {
                let found = index
                    .get_positional_postings(&term)
                    .iter()
                    .any(|p| p.doc_id == id && p.positions.contains(&position));
                assert!(found, "missing {term}@{position} in doc {id}");
            }
        }
    }
}
