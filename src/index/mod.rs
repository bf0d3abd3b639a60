//! Positional inverted index
//!
//! # Architecture
//!
//! - `IndexBuilder`: owned accumulator for `(term, doc, position)` observations
//! - `Index`: immutable result of `IndexBuilder::build`
//! - `postings`: merge-join algebra over sorted document ids and positions

mod builder;
pub mod postings;
mod reader;
mod types;

pub use builder::*;
pub use postings::{
    difference, intersect, positional_intersect, positional_matches, union, union_all,
    PositionMatch, WindowMode,
};
pub use reader::*;
pub use types::*;
