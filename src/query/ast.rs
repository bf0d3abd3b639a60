//! Abstract Syntax Tree for boolean queries
//!
//! A parsed query is a list of [`QueryNode`]s that are implicitly AND-combined.
//! Every node carries its own `negated` flag; negation is never pushed down
//! into the children of an `Or` or a `Group`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The shape of a query node
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryKind {
    /// A single normalized term
    Term(String),
    /// Terms that must appear adjacent and in order
    Phrase(Vec<String>),
    /// Two terms within `k` positions of each other, in either order
    Proximity { left: String, right: String, k: u32 },
    /// Union of the operands
    Or(Vec<QueryNode>),
    /// Conjunction of the children
    Group(Vec<QueryNode>),
}

/// A query node with its negation flag
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryNode {
    pub kind: QueryKind,
    #[serde(default)]
    pub negated: bool,
}

impl QueryNode {
    pub fn new(kind: QueryKind) -> Self {
        Self {
            kind,
            negated: false,
        }
    }

    pub fn term(term: impl Into<String>) -> Self {
        Self::new(QueryKind::Term(term.into()))
    }

    pub fn phrase<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(QueryKind::Phrase(parts.into_iter().map(Into::into).collect()))
    }

    pub fn proximity(left: impl Into<String>, right: impl Into<String>, k: u32) -> Self {
        Self::new(QueryKind::Proximity {
            left: left.into(),
            right: right.into(),
            k,
        })
    }

    pub fn or(operands: Vec<QueryNode>) -> Self {
        Self::new(QueryKind::Or(operands))
    }

    pub fn group(children: Vec<QueryNode>) -> Self {
        Self::new(QueryKind::Group(children))
    }

    /// Set the negation flag
    pub fn with_negated(mut self, negated: bool) -> Self {
        self.negated = negated;
        self
    }

    /// Negate this node
    pub fn negate(self) -> Self {
        let negated = !self.negated;
        self.with_negated(negated)
    }

    /// Get the query type name for debugging and logging
    pub fn query_type(&self) -> &'static str {
        match self.kind {
            QueryKind::Term(_) => "term",
            QueryKind::Phrase(_) => "phrase",
            QueryKind::Proximity { .. } => "proximity",
            QueryKind::Or(_) => "or",
            QueryKind::Group(_) => "group",
        }
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "NOT ")?;
        }

        match &self.kind {
            QueryKind::Term(term) => write!(f, "{}", term),
            QueryKind::Phrase(parts) => write!(f, "\"{}\"", parts.join(" ")),
            QueryKind::Proximity { left, right, k } => write!(f, "{} /{} {}", left, k, right),
            QueryKind::Or(operands) => write_joined(f, operands, " OR "),
            QueryKind::Group(children) => {
                write!(f, "(")?;
                write_joined(f, children, " AND ")?;
                write!(f, ")")
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, nodes: &[QueryNode], sep: &str) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", node)?;
    }
    Ok(())
}

/// Render a top-level conjunction back into query syntax
pub fn display_conjunction(nodes: &[QueryNode]) -> String {
    nodes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" AND ")
}
