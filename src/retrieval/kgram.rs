//! K-gram spelling correction
//!
//! A transient character n-gram index built for a single misspelled term.
//! Every vocabulary term sharing a k-gram with it (and of similar length) is
//! a candidate; per k-gram only the candidates closest in edit distance
//! survive. The surviving candidates' postings replace the failed lookup.

use std::collections::{BTreeSet, HashSet};

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::index::{postings, DocId, Index};

/// A k-gram of the misspelled term and its closest vocabulary matches
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct KGramEntry {
    pub kgram: String,
    /// `(vocabulary term, edit distance to the misspelled term)`
    pub candidates: Vec<(String, usize)>,
}

/// K-gram index over one query term
#[derive(Clone, Debug)]
pub struct KGramIndex {
    term: String,
    kgrams: Vec<String>,
    length_tolerance: usize,
}

impl KGramIndex {
    /// Split `term` into its distinct length-`n` character windows
    ///
    /// Windows keep the order of their first appearance. A term shorter than
    /// `n`, or `n == 0`, produces no k-grams.
    pub fn build(term: &str, n: usize) -> Self {
        let chars: Vec<char> = term.chars().collect();
        let mut kgrams = Vec::new();

        if n > 0 {
            let mut seen = HashSet::new();
            for window in chars.windows(n) {
                let kgram: String = window.iter().collect();
                if seen.insert(kgram.clone()) {
                    kgrams.push(kgram);
                }
            }
        }

        Self {
            term: term.to_string(),
            kgrams,
            length_tolerance: 3,
        }
    }

    /// Set the maximum length difference between the term and a candidate
    pub fn with_length_tolerance(mut self, length_tolerance: usize) -> Self {
        self.length_tolerance = length_tolerance;
        self
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn kgrams(&self) -> &[String] {
        &self.kgrams
    }

    /// Find the closest vocabulary terms for every k-gram
    ///
    /// K-grams are scanned in parallel; the output order follows
    /// [`kgrams`](Self::kgrams) regardless of scheduling.
    pub fn match_vocabulary(&self, vocabulary: &[String]) -> Vec<KGramEntry> {
        let term_len = self.term.chars().count();

        self.kgrams
            .par_iter()
            .map(|kgram| {
                let mut candidates: Vec<(String, usize)> = vocabulary
                    .iter()
                    .filter(|word| word.chars().count().abs_diff(term_len) <= self.length_tolerance)
                    .filter(|word| word.contains(kgram.as_str()))
                    .map(|word| (word.clone(), levenshtein_distance(&self.term, word)))
                    .collect();

                if let Some(best) = candidates.iter().map(|(_, d)| *d).min() {
                    candidates.retain(|(_, d)| *d == best);
                }

                KGramEntry {
                    kgram: kgram.clone(),
                    candidates,
                }
            })
            .collect()
    }

    /// Documents containing any surviving candidate, sorted and deduplicated
    pub fn resolve(&self, index: &Index) -> Vec<DocId> {
        let entries = self.match_vocabulary(index.vocabulary());

        let chosen: BTreeSet<&str> = entries
            .iter()
            .flat_map(|entry| entry.candidates.iter().map(|(word, _)| word.as_str()))
            .collect();

        debug!(term = %self.term, candidates = ?chosen, "Spelling correction");

        let lists: Vec<Vec<DocId>> = chosen
            .iter()
            .map(|word| postings::doc_ids(index.get_positional_postings(word)))
            .collect();

        postings::union_all(lists.iter().map(Vec::as_slice))
    }
}

/// Calculate Levenshtein edit distance between two strings
///
/// Uses the classic two-row DP with O(min(m,n)) space.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    let len1 = s1_chars.len();
    let len2 = s2_chars.len();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    // Shorter string indexes the columns
    let (shorter, longer) = if len1 <= len2 {
        (&s1_chars, &s2_chars)
    } else {
        (&s2_chars, &s1_chars)
    };

    let mut prev_row: Vec<usize> = (0..=shorter.len()).collect();
    let mut curr_row = vec![0; shorter.len() + 1];

    for (i, &long_ch) in longer.iter().enumerate() {
        curr_row[0] = i + 1;

        for (j, &short_ch) in shorter.iter().enumerate() {
            let cost = usize::from(long_ch != short_ch);

            curr_row[j + 1] = (prev_row[j + 1] + 1) // deletion
                .min(curr_row[j] + 1) // insertion
                .min(prev_row[j] + cost); // substitution
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[shorter.len()]
}
