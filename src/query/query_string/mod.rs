//! Boolean query string parser
//!
//! Supports syntax like:
//! - `cat AND NOT dog`
//! - `(cat OR dog) AND food`
//! - `"exact phrase"`
//! - `cat /3 dog` (both terms within three positions, either order)
//!
//! `AND`, `OR` and `NOT` are only recognized in upper case.

pub mod lexer;
pub mod parser;

pub use lexer::{Lexer, Token};
pub use parser::{parse, QueryStringParser};
