//! chumsky grammar for the CQL subset.

use chumsky::extra;
use chumsky::prelude::*;

use super::{BooleanOp, CqlNode, SortKey, TermNode};

/// Extra type for parsers - uses Rich errors for better messages
pub(crate) type Extra<'src> = extra::Err<Rich<'src, char>>;

/// Characters that end an unquoted word
const DELIMITERS: &str = "()=<>\"/";

/// Words that can never be read as an index or a bare search term
const RESERVED: [&str; 5] = ["and", "or", "not", "prox", "sortby"];

const NAMED_RELATIONS: [&str; 5] = ["adj", "all", "any", "within", "encloses"];

fn is_word_char(c: &char) -> bool {
    !c.is_whitespace() && !DELIMITERS.contains(*c)
}

fn is_reserved(word: &str) -> bool {
    RESERVED.iter().any(|r| word.eq_ignore_ascii_case(r))
}

// ============================================================================
// Primitive parsers
// ============================================================================

/// Unquoted word: anything up to whitespace or a delimiter
fn word<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    any()
        .filter(is_word_char)
        .repeated()
        .at_least(1)
        .to_slice()
        .map(|s: &str| s.to_string())
        .labelled("word")
}

/// Unquoted word that is not a keyword
fn plain_word<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    word().try_map(|w: String, span| {
        if is_reserved(&w) {
            Err(Rich::custom(span, format!("unexpected keyword '{}'", w)))
        } else {
            Ok(w)
        }
    })
}

/// Double-quoted string with backslash escapes: "value"
fn quoted_string<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    let escaped = just('\\').ignore_then(any());

    just('"')
        .ignore_then(
            choice((escaped, none_of("\\\"")))
                .repeated()
                .collect::<String>(),
        )
        .then_ignore(just('"'))
        .labelled("quoted string")
}

/// Search term: quoted string or plain word
fn search_term<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    quoted_string().or(plain_word()).labelled("search term")
}

/// Case-insensitive keyword matcher
fn kw<'src>(keyword: &'static str) -> impl Parser<'src, &'src str, (), Extra<'src>> + Clone {
    word()
        .try_map(move |w: String, span| {
            if w.eq_ignore_ascii_case(keyword) {
                Ok(())
            } else {
                Err(Rich::custom(
                    span,
                    format!("expected keyword '{}'", keyword),
                ))
            }
        })
        .padded()
}

/// Symbolic comparison: = == <> < > <= >=
fn comparison<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    choice((
        just("=="),
        just("<>"),
        just("<="),
        just(">="),
        just("="),
        just("<"),
        just(">"),
    ))
    .map(|s: &str| s.to_string())
    .labelled("comparison")
}

/// Modifier list: /name or /name=value, repeated
fn modifiers<'src>() -> impl Parser<'src, &'src str, Vec<String>, Extra<'src>> + Clone {
    let modifier = word()
        .then(comparison().then(search_term()).or_not())
        .map(|(name, value)| match value {
            Some((op, value)) => format!("{}{}{}", name, op, value),
            None => name,
        });

    just('/')
        .padded()
        .ignore_then(modifier)
        .repeated()
        .collect::<Vec<_>>()
}

// ============================================================================
// Clauses
// ============================================================================

fn relation<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    let named = word().try_map(|w: String, span| {
        let lower = w.to_ascii_lowercase();
        if NAMED_RELATIONS.contains(&lower.as_str()) {
            Ok(lower)
        } else {
            Err(Rich::custom(span, format!("unknown relation '{}'", w)))
        }
    });

    comparison()
        .or(named)
        .then_ignore(modifiers())
        .padded()
        .labelled("relation")
}

/// `index relation term` or a bare term
fn search_clause<'src>() -> impl Parser<'src, &'src str, CqlNode, Extra<'src>> + Clone {
    let qualified = plain_word()
        .padded()
        .then(relation())
        .then(search_term().padded())
        .map(|((index, relation), term)| CqlNode::Term(TermNode::new(index, relation, term)));

    let bare = search_term()
        .padded()
        .map(|term| CqlNode::Term(TermNode::server_choice(term)));

    qualified.or(bare)
}

fn boolean_op<'src>() -> impl Parser<'src, &'src str, BooleanOp, Extra<'src>> + Clone {
    choice((
        kw("and").to(BooleanOp::And),
        kw("or").to(BooleanOp::Or),
        kw("not").to(BooleanOp::Not),
        kw("prox").to(BooleanOp::Prox),
    ))
    .then_ignore(modifiers())
    .padded()
    .labelled("boolean operator")
}

/// Clauses joined by boolean operators, left-associative
fn scoped_clause<'src>() -> impl Parser<'src, &'src str, CqlNode, Extra<'src>> + Clone {
    recursive(|scoped| {
        let group = scoped.delimited_by(just('(').padded(), just(')').padded());
        let clause = group.or(search_clause());

        clause
            .clone()
            .then(boolean_op().then(clause).repeated().collect::<Vec<_>>())
            .map(|(first, rest)| {
                rest.into_iter()
                    .fold(first, |left, (op, right)| CqlNode::Boolean {
                        op,
                        left: Box::new(left),
                        right: Box::new(right),
                    })
            })
    })
}

fn sort_clause<'src>() -> impl Parser<'src, &'src str, Vec<SortKey>, Extra<'src>> + Clone {
    let key = plain_word()
        .then(modifiers())
        .padded()
        .map(|(index, modifiers)| SortKey { index, modifiers });

    kw("sortby").ignore_then(key.repeated().at_least(1).collect::<Vec<_>>())
}

/// Full query: scoped clause with an optional trailing sort clause
pub(crate) fn query_parser<'src>() -> impl Parser<'src, &'src str, CqlNode, Extra<'src>> {
    scoped_clause()
        .then(sort_clause().or_not())
        .map(|(subtree, keys)| match keys {
            Some(keys) => CqlNode::Sort {
                keys,
                subtree: Box::new(subtree),
            },
            None => subtree,
        })
        .padded()
        .then_ignore(end())
}

// ============================================================================
// Error formatting
// ============================================================================

/// Format chumsky errors as one `Line l, column c: reason` entry per error
pub(crate) fn format_errors(errs: &[Rich<'_, char>], input: &str) -> String {
    errs.iter()
        .map(|e| {
            let before = &input[..e.span().start];
            let line = before.matches('\n').count() + 1;
            let col = before.len() - before.rfind('\n').map_or(0, |i| i + 1);

            format!("Line {}, column {}: {}", line, col + 1, e.reason())
        })
        .collect::<Vec<_>>()
        .join("; ")
}
