/// Scoring functions for ranked retrieval

/// Inverse document frequency `ln(N / df)`
///
/// # Arguments
/// * `num_docs` - Total number of documents in the index
/// * `doc_frequency` - How many documents contain the term
pub fn idf(num_docs: usize, doc_frequency: usize) -> f64 {
    if doc_frequency == 0 || num_docs == 0 {
        return 0.0;
    }
    (num_docs as f64 / doc_frequency as f64).ln()
}

/// Saturated, length-normalized tf-idf contribution of one query term
///
/// # Arguments
/// * `tf_query` - Weighted frequency of the term in the query
/// * `tf_doc` - Weighted frequency of the term in the document
/// * `idf` - Inverse document frequency of the term
/// * `doc_len` - Length of the document (in tokens)
/// * `avg_doc_len` - Average document length across all documents
/// * `saturation` - Saturation constant `K`
///
/// # Returns
/// `tf_query * tf_doc / (tf_doc + K * doc_len / avg_doc_len) * idf`
pub fn tf_idf_term_score(
    tf_query: f64,
    tf_doc: f64,
    idf: f64,
    doc_len: f64,
    avg_doc_len: f64,
    saturation: f64,
) -> f64 {
    let norm = if avg_doc_len > 0.0 {
        doc_len / avg_doc_len
    } else {
        1.0
    };

    tf_query * (tf_doc / (tf_doc + saturation * norm)) * idf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idf() {
        assert_eq!(idf(4, 4), 0.0);
        assert!((idf(4, 1) - 4f64.ln()).abs() < 1e-12);
        assert_eq!(idf(4, 0), 0.0);
    }

    #[test]
    fn test_term_score_saturates() {
        let low = tf_idf_term_score(1.0, 1.0, 1.0, 10.0, 10.0, 2.0);
        let high = tf_idf_term_score(1.0, 100.0, 1.0, 10.0, 10.0, 2.0);
        assert!((low - 1.0 / 3.0).abs() < 1e-12);
        assert!(high > low && high < 1.0);
    }

    #[test]
    fn test_longer_documents_score_lower() {
        let short = tf_idf_term_score(1.0, 1.0, 1.0, 5.0, 10.0, 2.0);
        let long = tf_idf_term_score(1.0, 1.0, 1.0, 20.0, 10.0, 2.0);
        assert!(short > long);
    }
}
