//! CQL (Contextual Query Language) front end.
//!
//! Parses a CQL string into a small closed syntax tree. The grammar accepted
//! here is wider than what the translation engine supports: boolean `OR`,
//! `NOT` and `PROX`, the non-equality relations and multi-key sort clauses
//! all parse successfully so that the extractor can reject them with a typed
//! error instead of a generic syntax failure.
//!
//! ```
//! use holdings_query::cql::{parse, BooleanOp, CqlNode};
//!
//! let node = parse("title = bridges AND ext.selected = true").unwrap();
//! assert!(matches!(node, CqlNode::Boolean { op: BooleanOp::And, .. }));
//! ```

mod parser;

use std::fmt;

use chumsky::Parser;
use serde::Serialize;

use crate::query::QueryError;

/// Index assigned to a term written without `index relation` in front of it
pub const SERVER_CHOICE_INDEX: &str = "cql.serverChoice";

/// A parsed CQL expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "node", rename_all = "lowercase")]
pub enum CqlNode {
    /// `index relation term`
    Term(TermNode),

    /// `left op right`
    Boolean {
        op: BooleanOp,
        left: Box<CqlNode>,
        right: Box<CqlNode>,
    },

    /// `subtree sortBy key ...`
    Sort {
        keys: Vec<SortKey>,
        subtree: Box<CqlNode>,
    },
}

/// A single search clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermNode {
    /// Index (field) name as written in the query
    pub index: String,

    /// Base relation, `=` for unqualified terms
    pub relation: String,

    /// Search term with quotes and escapes removed
    pub term: String,
}

impl TermNode {
    pub fn new(
        index: impl Into<String>,
        relation: impl Into<String>,
        term: impl Into<String>,
    ) -> Self {
        Self {
            index: index.into(),
            relation: relation.into(),
            term: term.into(),
        }
    }

    /// A bare term searched against the server's choice of index
    pub fn server_choice(term: impl Into<String>) -> Self {
        Self::new(SERVER_CHOICE_INDEX, "=", term)
    }
}

/// Boolean combinators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BooleanOp {
    And,
    Or,
    Not,
    Prox,
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BooleanOp::And => "AND",
            BooleanOp::Or => "OR",
            BooleanOp::Not => "NOT",
            BooleanOp::Prox => "PROX",
        };
        f.write_str(name)
    }
}

/// One key of a `sortBy` clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortKey {
    pub index: String,

    /// Modifiers such as `sort.descending`, without the leading `/`
    pub modifiers: Vec<String>,
}

/// Parse a CQL query string.
///
/// Any syntax error is reported as [`QueryError::MalformedQuery`] with
/// line/column diagnostics.
pub fn parse(input: &str) -> Result<CqlNode, QueryError> {
    parser::query_parser()
        .parse(input)
        .into_result()
        .map_err(|errs| QueryError::MalformedQuery(parser::format_errors(&errs, input)))
}
