//! TF-IDF ranked retrieval

use std::collections::HashMap;

use tracing::debug;

use super::scoring::{idf, tf_idf_term_score};
use super::{rank, top_k, RankedResult, RetrievalSystem};
use crate::config::SearchSettings;
use crate::index::{tf_weight, DocId, Index};
use crate::tokenizer::Tokenizer;
use crate::Result;

/// Free-text ranking with saturated, length-normalized tf-idf
pub struct TfIdfRetrieval<'a> {
    index: &'a Index,
    settings: SearchSettings,
    tokenizer: Tokenizer,
}

impl<'a> TfIdfRetrieval<'a> {
    pub fn new(index: &'a Index, settings: SearchSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            index,
            settings,
            tokenizer: Tokenizer::new(),
        })
    }

    /// Score every document containing at least one query term
    ///
    /// Results are unordered.
    pub fn score(&self, query: &str) -> Vec<RankedResult> {
        let mut counts: Vec<(String, u32)> =
            self.tokenizer.term_counts(query).into_iter().collect();
        // Fixed accumulation order keeps scores reproducible
        counts.sort_unstable();

        let num_docs = self.index.num_docs();
        let avg_doc_len = self.index.avg_doc_len();
        let mut scores: HashMap<DocId, f64> = HashMap::new();

        for (term, count) in &counts {
            let Some(list) = self.index.get_posting_list(term) else {
                continue;
            };

            let tf_query = tf_weight(*count as usize);
            let term_idf = idf(num_docs, list.doc_frequency());

            for (doc_id, tf_doc) in list.weights() {
                let doc_len = self.doc_len(doc_id);
                *scores.entry(doc_id).or_insert(0.0) += tf_idf_term_score(
                    tf_query,
                    tf_doc,
                    term_idf,
                    doc_len,
                    avg_doc_len,
                    self.settings.saturation,
                );
            }
        }

        debug!(
            terms = counts.len(),
            matched = scores.len(),
            "Scored tf-idf query"
        );

        scores
            .into_iter()
            .map(|(doc_id, score)| RankedResult::new(doc_id, score / self.doc_len(doc_id)))
            .collect()
    }

    fn doc_len(&self, doc_id: DocId) -> f64 {
        f64::from(self.index.doc_len(doc_id).unwrap_or(1).max(1))
    }
}

impl RetrievalSystem for TfIdfRetrieval<'_> {
    fn retrieve(&self, query: &str) -> Result<Vec<RankedResult>> {
        Ok(rank(self.score(query)))
    }

    fn retrieve_k(&self, query: &str, k: usize) -> Result<Vec<RankedResult>> {
        Ok(top_k(self.score(query), k))
    }
}
