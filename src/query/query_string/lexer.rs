//! Lexer for query string syntax
//!
//! Tokenizes boolean query strings such as `(cat OR dog) AND "the end" AND a /3 b`.

use crate::error::SearchError;
use crate::Result;

/// Token types for query string parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A term (maximal run of alphanumerics and apostrophes, verbatim)
    Term(String),
    /// Quoted text, verbatim
    Phrase(String),
    /// Proximity operator `/k`
    Proximity(u32),

    /// AND operator
    And,
    /// OR operator
    Or,
    /// NOT operator
    Not,

    /// Left parenthesis (grouping)
    LeftParen,
    /// Right parenthesis (grouping)
    RightParen,

    /// End of input
    Eof,
}

/// Lexer for tokenizing query strings
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    /// Create a new lexer for the given input string
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Get the next token from the input
    ///
    /// Characters that cannot start any token (punctuation other than
    /// quotes, parentheses and `/`) are skipped.
    pub fn next_token(&mut self) -> Result<Token> {
        loop {
            self.skip_whitespace();

            if self.is_eof() {
                return Ok(Token::Eof);
            }

            let ch = self.current_char();

            match ch {
                '(' => {
                    self.advance();
                    return Ok(Token::LeftParen);
                }
                ')' => {
                    self.advance();
                    return Ok(Token::RightParen);
                }
                '"' => {
                    self.advance();
                    return Ok(self.read_phrase());
                }
                '/' => {
                    self.advance();
                    return self.read_proximity();
                }
                _ if is_term_char(ch) => return Ok(self.read_term()),
                _ => self.advance(),
            }
        }
    }

    /// Tokenize the whole input, excluding the trailing `Eof`
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            match self.next_token()? {
                Token::Eof => return Ok(tokens),
                token => tokens.push(token),
            }
        }
    }

    /// Check if the lexer has reached the end of input
    pub fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    fn read_term(&mut self) -> Token {
        let mut term = String::new();

        while !self.is_eof() && is_term_char(self.current_char()) {
            term.push(self.current_char());
            self.advance();
        }

        // Keywords are case-sensitive so lowercase "and"/"or"/"not" stay searchable
        match term.as_str() {
            "AND" => Token::And,
            "OR" => Token::Or,
            "NOT" => Token::Not,
            _ => Token::Term(term),
        }
    }

    /// Read up to the closing quote; an unterminated phrase takes the rest of the input
    fn read_phrase(&mut self) -> Token {
        let mut phrase = String::new();

        while !self.is_eof() {
            let ch = self.current_char();
            self.advance();
            if ch == '"' {
                break;
            }
            phrase.push(ch);
        }

        Token::Phrase(phrase)
    }

    fn read_proximity(&mut self) -> Result<Token> {
        let start = self.position;
        let mut digits = String::new();

        while !self.is_eof() && self.current_char().is_ascii_digit() {
            digits.push(self.current_char());
            self.advance();
        }

        if digits.is_empty() {
            return Err(SearchError::QueryParse(format!(
                "Expected a distance after '/' at position {}",
                start
            )));
        }

        digits
            .parse::<u32>()
            .map(Token::Proximity)
            .map_err(|_| SearchError::QueryParse(format!("Invalid proximity distance: {}", digits)))
    }

    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while !self.is_eof() && self.current_char().is_whitespace() {
            self.advance();
        }
    }
}

/// Term run characters; apostrophes are kept like the index tokenizer keeps them
fn is_term_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '\''
}
