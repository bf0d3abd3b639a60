//! Recursive descent parser for boolean query strings
//!
//! # Grammar
//!
//! ```text
//! query    := and_expr (AND? and_expr)*
//! and_expr := NOT* unit (OR and_expr)*
//! unit     := TERM | TERM PROX_K TERM | PHRASE | '(' query ')'
//! ```
//!
//! The parser walks a shared token buffer with explicit `[start, end)`
//! ranges. Each range yields a conjunction: a list of nodes that are
//! AND-combined by the evaluator. Adjacent units without an operator are
//! AND-combined as well.
//!
//! # Example
//!
//! ```rust
//! use boolsearch::query::query_string::QueryStringParser;
//!
//! let nodes = QueryStringParser::new("cat AND NOT ran").unwrap().parse().unwrap();
//! assert_eq!(nodes.len(), 2);
//! assert!(nodes[1].negated);
//! ```

use tracing::warn;

use super::lexer::{Lexer, Token};
use crate::error::SearchError;
use crate::query::ast::{QueryKind, QueryNode};
use crate::tokenizer::Tokenizer;
use crate::Result;

/// Parser for boolean query strings
pub struct QueryStringParser {
    tokens: Vec<Token>,
    tokenizer: Tokenizer,
}

/// Per-range parse state
#[derive(Default)]
struct Conjunction {
    nodes: Vec<QueryNode>,
    /// Unit currently being built
    fragment: Option<QueryNode>,
    /// Negation toggled by `NOT` and not yet attached to a unit
    negate: bool,
}

impl Conjunction {
    /// Begin a new unit, taking the pending negation with it
    fn start(&mut self, node: QueryNode) {
        self.flush();
        self.fragment = Some(node.with_negated(std::mem::take(&mut self.negate)));
    }

    /// Take the current unit, applying any negation that followed it
    fn take_fragment(&mut self) -> Option<QueryNode> {
        let node = self.fragment.take()?;
        if std::mem::take(&mut self.negate) {
            Some(node.negate())
        } else {
            Some(node)
        }
    }

    /// Move the current unit into the conjunction
    fn flush(&mut self) {
        if let Some(node) = self.fragment.take() {
            self.nodes.push(node);
        }
    }

    fn finish(mut self) -> Vec<QueryNode> {
        if let Some(node) = self.take_fragment() {
            self.nodes.push(node);
        }
        self.nodes
    }
}

impl QueryStringParser {
    /// Create a new parser for the given query string
    pub fn new(input: &str) -> Result<Self> {
        Ok(Self {
            tokens: Lexer::new(input).tokenize()?,
            tokenizer: Tokenizer::new(),
        })
    }

    /// Parse the query string into a list of AND-combined nodes
    pub fn parse(&self) -> Result<Vec<QueryNode>> {
        self.parse_range(0, self.tokens.len())
    }

    fn parse_range(&self, start: usize, end: usize) -> Result<Vec<QueryNode>> {
        let mut state = Conjunction::default();
        let mut i = start;

        while i < end {
            match &self.tokens[i] {
                Token::Not => state.negate = !state.negate,
                Token::And => {
                    if let Some(node) = state.take_fragment() {
                        state.nodes.push(node);
                    }
                }
                Token::Or => {
                    let stop = self.find_and(i + 1, end).unwrap_or(end);
                    let left = state.take_fragment().ok_or_else(|| {
                        SearchError::QueryParse("OR is missing its left operand".to_string())
                    })?;

                    let mut operands = vec![left];
                    self.push_or_operands(&mut operands, self.parse_range(i + 1, stop)?);

                    state.fragment = Some(if operands.len() == 1 {
                        operands.remove(0)
                    } else {
                        QueryNode::or(operands)
                    });
                    i = stop;
                    continue;
                }
                Token::Proximity(k) => {
                    let node = self.parse_proximity(&mut state, i, end, *k)?;
                    state.fragment = Some(node);
                    i += 2;
                    continue;
                }
                Token::Term(term) => state.start(QueryNode::term(self.normalize_term(term))),
                Token::Phrase(text) => state.start(QueryNode::phrase(self.tokenizer.terms(text))),
                Token::LeftParen => {
                    let close = self.find_matching_paren(i, end);
                    if close.is_none() {
                        warn!(
                            position = i,
                            "Unmatched '(' in query, grouping the rest of the input"
                        );
                    }

                    let children = self.parse_range(i + 1, close.unwrap_or(end))?;
                    state.start(QueryNode::group(children));
                    i = close.map_or(end, |c| c + 1);
                    continue;
                }
                Token::RightParen | Token::Eof => {}
            }
            i += 1;
        }

        Ok(state.finish())
    }

    /// Combine the in-progress term with the term after `/k`
    fn parse_proximity(
        &self,
        state: &mut Conjunction,
        at: usize,
        end: usize,
        k: u32,
    ) -> Result<QueryNode> {
        let (left, negated) = match state.take_fragment() {
            Some(QueryNode {
                kind: QueryKind::Term(term),
                negated,
            }) => (term, negated),
            _ => {
                return Err(SearchError::QueryParse(format!(
                    "/{} must follow a term",
                    k
                )))
            }
        };

        let right = match self.tokens.get(at + 1) {
            Some(Token::Term(term)) if at + 1 < end => self.normalize_term(term),
            _ => {
                return Err(SearchError::QueryParse(format!(
                    "/{} must be followed by a term",
                    k
                )))
            }
        };

        Ok(QueryNode::proximity(left, right, k).with_negated(negated))
    }

    /// Normalize a query term exactly like indexed text
    ///
    /// A term with no indexable characters becomes the empty string, which
    /// matches nothing.
    fn normalize_term(&self, term: &str) -> String {
        self.tokenizer
            .tokenize(term)
            .next()
            .map(|(term, _)| term)
            .unwrap_or_default()
    }

    /// Splice the right-hand side of an OR into the operand list
    fn push_or_operands(&self, operands: &mut Vec<QueryNode>, mut rhs: Vec<QueryNode>) {
        if rhs.len() > 1 {
            operands.push(QueryNode::group(rhs));
            return;
        }

        match rhs.pop() {
            Some(QueryNode {
                kind: QueryKind::Or(nested),
                negated: false,
            }) => operands.extend(nested),
            Some(node) => operands.push(node),
            None => {}
        }
    }

    /// Next `AND` at nesting depth zero
    fn find_and(&self, start: usize, end: usize) -> Option<usize> {
        let mut depth = 0usize;
        (start..end).find(|&i| {
            match self.tokens[i] {
                Token::LeftParen => depth += 1,
                Token::RightParen => depth = depth.saturating_sub(1),
                Token::And => return depth == 0,
                _ => {}
            }
            false
        })
    }

    /// The `)` closing the `(` at `open`
    fn find_matching_paren(&self, open: usize, end: usize) -> Option<usize> {
        let mut depth = 0usize;
        (open..end).find(|&i| {
            match self.tokens[i] {
                Token::LeftParen => depth += 1,
                Token::RightParen => {
                    depth -= 1;
                    return depth == 0;
                }
                _ => {}
            }
            false
        })
    }
}

/// Parse a query string into a list of AND-combined nodes
pub fn parse(query: &str) -> Result<Vec<QueryNode>> {
    QueryStringParser::new(query)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(t: &str) -> QueryNode {
        QueryNode::term(t)
    }

    #[test]
    fn test_empty_query() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("   ").unwrap().is_empty());
    }

    #[test]
    fn test_simple_term_is_lowercased() {
        assert_eq!(parse("Rust").unwrap(), vec![term("rust")]);
    }

    #[test]
    fn test_terms_use_index_normalization() {
        assert_eq!(parse("Café").unwrap(), vec![term("caf")]);
        assert_eq!(parse("Don't").unwrap(), vec![term("don't")]);
        assert_eq!(
            parse("Café /2 Noir").unwrap(),
            vec![QueryNode::proximity("caf", "noir", 2)]
        );
        assert_eq!(parse("é").unwrap(), vec![term("")]);
    }

    #[test]
    fn test_and_not() {
        assert_eq!(
            parse("cat AND NOT ran").unwrap(),
            vec![term("cat"), term("ran").negate()]
        );
    }

    #[test]
    fn test_double_not_cancels() {
        assert_eq!(parse("NOT NOT cat").unwrap(), vec![term("cat")]);
    }

    #[test]
    fn test_dangling_and_is_ignored() {
        assert_eq!(parse("AND cat AND").unwrap(), vec![term("cat")]);
    }

    #[test]
    fn test_or_chain_is_flattened() {
        assert_eq!(
            parse("a OR b OR c").unwrap(),
            vec![QueryNode::or(vec![term("a"), term("b"), term("c")])]
        );
    }

    #[test]
    fn test_or_binds_tighter_than_and() {
        assert_eq!(
            parse("a OR b AND c").unwrap(),
            vec![QueryNode::or(vec![term("a"), term("b")]), term("c")]
        );
    }

    #[test]
    fn test_negation_stays_on_or_operand() {
        assert_eq!(
            parse("NOT a OR b").unwrap(),
            vec![QueryNode::or(vec![term("a").negate(), term("b")])]
        );
    }

    #[test]
    fn test_negated_group() {
        assert_eq!(
            parse("NOT (a OR b) AND c").unwrap(),
            vec![
                QueryNode::group(vec![QueryNode::or(vec![term("a"), term("b")])]).negate(),
                term("c"),
            ]
        );
    }

    #[test]
    fn test_nested_groups() {
        assert_eq!(
            parse("NOT ((a OR b) AND c)").unwrap(),
            vec![QueryNode::group(vec![
                QueryNode::group(vec![QueryNode::or(vec![term("a"), term("b")])]),
                term("c"),
            ])
            .negate()]
        );
    }

    #[test]
    fn test_or_with_group_operand() {
        assert_eq!(
            parse("a OR (b AND c)").unwrap(),
            vec![QueryNode::or(vec![
                term("a"),
                QueryNode::group(vec![term("b"), term("c")]),
            ])]
        );
    }

    #[test]
    fn test_unmatched_paren_takes_rest() {
        assert_eq!(
            parse("(a AND b").unwrap(),
            vec![QueryNode::group(vec![term("a"), term("b")])]
        );
    }

    #[test]
    fn test_stray_right_paren_is_ignored() {
        assert_eq!(parse("a ) AND b").unwrap(), vec![term("a"), term("b")]);
    }

    #[test]
    fn test_phrase_parts_are_normalized() {
        assert_eq!(
            parse("\"The  Cat, sat\"").unwrap(),
            vec![QueryNode::phrase(["the", "cat", "sat"])]
        );
    }

    #[test]
    fn test_negated_phrase() {
        assert_eq!(
            parse("cat AND NOT \"cat ran\"").unwrap(),
            vec![term("cat"), QueryNode::phrase(["cat", "ran"]).negate()]
        );
    }

    #[test]
    fn test_proximity() {
        assert_eq!(
            parse("Cat /3 DOG").unwrap(),
            vec![QueryNode::proximity("cat", "dog", 3)]
        );
    }

    #[test]
    fn test_negated_proximity() {
        assert_eq!(
            parse("a AND NOT b /2 c").unwrap(),
            vec![term("a"), QueryNode::proximity("b", "c", 2).negate()]
        );
    }

    #[test]
    fn test_proximity_missing_operands() {
        assert!(matches!(parse("/3 dog"), Err(SearchError::QueryParse(_))));
        assert!(matches!(parse("cat /3"), Err(SearchError::QueryParse(_))));
        assert!(matches!(
            parse("\"a b\" /3 dog"),
            Err(SearchError::QueryParse(_))
        ));
    }

    #[test]
    fn test_or_missing_left_operand() {
        assert!(matches!(parse("OR cat"), Err(SearchError::QueryParse(_))));
    }

    #[test]
    fn test_trailing_or_keeps_left_operand() {
        assert_eq!(parse("cat OR").unwrap(), vec![term("cat")]);
    }

    #[test]
    fn test_adjacent_units_are_conjoined() {
        assert_eq!(
            parse("a NOT b \"c d\"").unwrap(),
            vec![term("a"), term("b").negate(), QueryNode::phrase(["c", "d"])]
        );
    }

    #[test]
    fn test_display_round_trip() {
        let query = "NOT (a OR b) AND \"c d\" AND e /2 f";
        let nodes = parse(query).unwrap();
        assert_eq!(crate::query::display_conjunction(&nodes), query);
    }
}
