//! Text normalization into positional tokens

#[allow(clippy::module_inception)]
mod tokenizer;

pub use tokenizer::{is_token_char, Tokenizer, Tokens};
