//! Boolean, phrase and proximity search over a positional inverted index,
//! with k-gram spelling correction and tf-idf ranking.
//!
//! # Example
//!
//! ```
//! use boolsearch::{BooleanRetrieval, IndexBuilder, SearchSettings};
//!
//! let mut builder = IndexBuilder::new();
//! builder.add_document(1, "the cat sat");
//! builder.add_document(2, "the cat ran");
//! let index = builder.build().unwrap();
//!
//! let retrieval = BooleanRetrieval::new(&index, SearchSettings::default()).unwrap();
//! assert_eq!(retrieval.search("cat AND NOT ran").unwrap(), vec![1]);
//! assert_eq!(retrieval.search("\"cat sat\"").unwrap(), vec![1]);
//! ```

pub mod config;
pub mod corpus;
pub mod error;
pub mod evaluation;
pub mod index;
pub mod query;
pub mod retrieval;
pub mod tokenizer;

pub use config::SearchSettings;
pub use corpus::load_corpus;
pub use error::{Result, SearchError};
pub use index::{DocId, Index, IndexBuilder, PositionalPosting, PostingList};
pub use query::{QueryKind, QueryNode};
pub use retrieval::{BooleanRetrieval, RankedResult, RetrievalSystem, TfIdfRetrieval};
pub use tokenizer::Tokenizer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
