use thiserror::Error;

/// Main error type for boolsearch operations
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Cannot build an index over an empty corpus")]
    EmptyCorpus,

    #[error("Invalid document id: {0}")]
    InvalidDocId(String),

    #[error("Query parse error: {0}")]
    QueryParse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for boolsearch operations
pub type Result<T> = std::result::Result<T, SearchError>;

impl SearchError {
    /// Check if this error was caused by user input rather than the corpus or environment
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            SearchError::QueryParse(_) | SearchError::InvalidConfig(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SearchError::InvalidDocId("abc".to_string());
        assert_eq!(err.to_string(), "Invalid document id: abc");

        let err = SearchError::EmptyCorpus;
        assert_eq!(
            err.to_string(),
            "Cannot build an index over an empty corpus"
        );
    }

    #[test]
    fn test_user_errors() {
        assert!(SearchError::QueryParse("x".to_string()).is_user_error());
        assert!(SearchError::InvalidConfig("x".to_string()).is_user_error());
        assert!(!SearchError::EmptyCorpus.is_user_error());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SearchError = io.into();
        assert!(matches!(err, SearchError::Io(_)));
    }
}
