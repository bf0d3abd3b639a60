use std::collections::HashMap;
use std::path::Path;
use std::str::SplitWhitespace;

use crate::Result;

/// Text tokenizer producing lowercase `[a-z0-9']+` terms with positions
///
/// Every whitespace-delimited chunk contributes at most one token: the first
/// run of ASCII letters, digits and apostrophes inside it. Chunks without
/// such a run (e.g. `=` or `--`) are dropped and do not consume a position.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Lazily tokenize text into `(term, position)` pairs
    ///
    /// Each call starts counting positions at zero.
    ///
    /// # Example
    ///
    /// ```
    /// use boolsearch::tokenizer::Tokenizer;
    ///
    /// let tokens: Vec<_> = Tokenizer::new().tokenize("(Hello), world!").collect();
    /// assert_eq!(tokens, vec![("hello".to_string(), 0), ("world".to_string(), 1)]);
    /// ```
    pub fn tokenize<'a>(&self, text: &'a str) -> Tokens<'a> {
        Tokens {
            chunks: text.split_whitespace(),
            position: 0,
        }
    }

    /// Tokenize text into terms, dropping positions
    pub fn terms(&self, text: &str) -> Vec<String> {
        self.tokenize(text).map(|(term, _)| term).collect()
    }

    /// Count how often each term occurs in the text
    pub fn term_counts(&self, text: &str) -> HashMap<String, u32> {
        let mut counts = HashMap::new();
        for (term, _) in self.tokenize(text) {
            *counts.entry(term).or_insert(0) += 1;
        }
        counts
    }

    /// Read a file and tokenize its contents
    pub fn tokenize_file(&self, path: impl AsRef<Path>) -> Result<Vec<(String, u32)>> {
        let text = std::fs::read_to_string(path)?;
        Ok(self.tokenize(&text).collect())
    }
}

/// Lazy token sequence returned by [`Tokenizer::tokenize`]
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    chunks: SplitWhitespace<'a>,
    position: u32,
}

impl Iterator for Tokens<'_> {
    type Item = (String, u32);

    fn next(&mut self) -> Option<Self::Item> {
        for chunk in self.chunks.by_ref() {
            if let Some(word) = extract_word(chunk) {
                let position = self.position;
                self.position += 1;
                return Some((word.to_ascii_lowercase(), position));
            }
        }
        None
    }
}

/// Whether a character belongs to a token
pub fn is_token_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '\''
}

/// Find the first run of token characters inside a chunk
fn extract_word(chunk: &str) -> Option<&str> {
    let start = chunk.find(is_token_char)?;
    let rest = &chunk[start..];
    let end = rest.find(|c: char| !is_token_char(c)).unwrap_or(rest.len());
    Some(&rest[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str) -> Vec<(String, u32)> {
        Tokenizer::new().tokenize(text).collect()
    }

    #[test]
    fn test_basic_tokenization() {
        let tokens = collect("The cat sat");
        assert_eq!(
            tokens,
            vec![
                ("the".to_string(), 0),
                ("cat".to_string(), 1),
                ("sat".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_surrounding_punctuation_is_trimmed() {
        let tokens = collect("\"quoted,\" (paren) end.");
        let terms: Vec<_> = tokens.into_iter().map(|(t, _)| t).collect();
        assert_eq!(terms, vec!["quoted", "paren", "end"]);
    }

    #[test]
    fn test_apostrophes_are_kept() {
        assert_eq!(Tokenizer::new().terms("don't Stop"), vec!["don't", "stop"]);
    }

    #[test]
    fn test_inner_punctuation_keeps_first_run() {
        assert_eq!(Tokenizer::new().terms("state-of-the-art"), vec!["state"]);
    }

    #[test]
    fn test_punctuation_only_chunks_do_not_advance_position() {
        let tokens = collect("alpha = -- beta");
        assert_eq!(
            tokens,
            vec![("alpha".to_string(), 0), ("beta".to_string(), 1)]
        );
    }

    #[test]
    fn test_multiline_input() {
        let tokens = collect("first line\n\n  second\tline\n");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[3], ("line".to_string(), 3));
    }

    #[test]
    fn test_empty_input() {
        assert!(collect("").is_empty());
        assert!(collect("   \n\t").is_empty());
    }

    #[test]
    fn test_restartable() {
        let tokenizer = Tokenizer::new();
        let first: Vec<_> = tokenizer.tokenize("a b").collect();
        let second: Vec<_> = tokenizer.tokenize("c d").collect();
        assert_eq!(first[0].1, 0);
        assert_eq!(second[0].1, 0);
    }

    #[test]
    fn test_term_counts() {
        let counts = Tokenizer::new().term_counts("apple Apple banana");
        assert_eq!(counts.get("apple"), Some(&2));
        assert_eq!(counts.get("banana"), Some(&1));
    }

    #[test]
    fn test_tokenize_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1");
        std::fs::write(&path, "Library science\nretrieval").unwrap();

        let tokens = Tokenizer::new().tokenize_file(&path).unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2], ("retrieval".to_string(), 2));
    }

    #[test]
    fn test_tokenize_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Tokenizer::new().tokenize_file(dir.path().join("missing"));
        assert!(result.is_err());
    }
}
