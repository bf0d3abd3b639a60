//! Query language
//!
//! A query string is lexed and parsed into a list of [`QueryNode`]s that the
//! boolean retrieval engine AND-combines. Parsing is independent of any index.

pub mod ast;
pub mod query_string;

pub use ast::{display_conjunction, QueryKind, QueryNode};
pub use query_string::{parse, QueryStringParser};
