use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

/// Lower bound of the tf-idf saturation constant
pub const MIN_SATURATION: f64 = 1.2;
/// Upper bound of the tf-idf saturation constant
pub const MAX_SATURATION: f64 = 2.0;

/// Search settings shared by the retrieval systems
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Length of the character k-grams used for spelling correction
    pub kgram_size: usize,
    /// Minimum number of documents a term lookup must return before
    /// spelling correction is skipped
    pub min_results: usize,
    /// Saturation constant `K` of the tf-idf weighting
    pub saturation: f64,
    /// Maximum length difference between a misspelled term and a candidate
    pub length_tolerance: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            kgram_size: 2,
            min_results: 1,
            saturation: MAX_SATURATION,
            length_tolerance: 3,
        }
    }
}

impl SearchSettings {
    /// Set the k-gram size
    pub fn with_kgram_size(mut self, kgram_size: usize) -> Self {
        self.kgram_size = kgram_size;
        self
    }

    /// Set the minimum-result threshold
    pub fn with_min_results(mut self, min_results: usize) -> Self {
        self.min_results = min_results;
        self
    }

    /// Set the tf-idf saturation constant
    pub fn with_saturation(mut self, saturation: f64) -> Self {
        self.saturation = saturation;
        self
    }

    /// Set the candidate length tolerance
    pub fn with_length_tolerance(mut self, length_tolerance: usize) -> Self {
        self.length_tolerance = length_tolerance;
        self
    }

    /// Check that every setting is usable
    pub fn validate(&self) -> Result<()> {
        if self.kgram_size == 0 {
            return Err(SearchError::InvalidConfig(
                "k-gram size must be at least 1".to_string(),
            ));
        }

        if !(MIN_SATURATION..=MAX_SATURATION).contains(&self.saturation) {
            return Err(SearchError::InvalidConfig(format!(
                "saturation constant {} is outside [{}, {}]",
                self.saturation, MIN_SATURATION, MAX_SATURATION
            )));
        }

        Ok(())
    }
}
