//! Flattening of a CQL tree into a field → value mapping.

use std::collections::BTreeMap;

use crate::cql::{BooleanOp, CqlNode, TermNode};
use crate::query::fields::{is_id, normalize_field, SERVER_CHOICE};
use crate::query::QueryError;

/// A CQL query reduced to the pieces the validators look at.
///
/// Field names are normalised (lower-case, `codex.` prefix removed). Built
/// once per request and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatQuery {
    fields: BTreeMap<String, String>,
    sort_key: Option<String>,
    server_choice: Option<String>,
    id_lookup: Option<String>,
}

impl FlatQuery {
    /// Value of a normalised field
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// All `(field, value)` pairs, ordered by field name
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Normalised sort key, if a sort clause was given
    pub fn sort_key(&self) -> Option<&str> {
        self.sort_key.as_deref()
    }

    /// Unqualified search term, if one was given
    pub fn server_choice(&self) -> Option<&str> {
        self.server_choice.as_deref()
    }

    /// Whether the query names a record by id
    pub fn is_id_lookup(&self) -> bool {
        self.id_lookup.is_some()
    }

    pub fn id_lookup_value(&self) -> Option<&str> {
        self.id_lookup.as_deref()
    }

    fn insert_term(&mut self, term: &TermNode) -> Result<(), QueryError> {
        if term.relation != "=" {
            return Err(QueryError::UnsupportedOperator {
                field: term.index.clone(),
                relation: term.relation.clone(),
            });
        }

        let field = normalize_field(&term.index);

        if field == SERVER_CHOICE {
            self.server_choice = Some(term.term.clone());
            return Ok(());
        }

        if is_id(&field) {
            self.id_lookup = Some(term.term.clone());
        }

        if let Some(previous) = self.fields.insert(field.clone(), term.term.clone()) {
            tracing::debug!(
                field = %field,
                previous = %previous,
                value = %term.term,
                "Field given more than once, keeping the last value"
            );
        }

        Ok(())
    }
}

/// Flatten a parsed CQL tree.
///
/// Only `AND` chains of `=` terms with at most one sort key are accepted.
pub fn extract(node: &CqlNode) -> Result<FlatQuery, QueryError> {
    let mut flat = FlatQuery::default();
    collect(node, &mut flat)?;

    tracing::debug!(
        fields = flat.fields.len(),
        sort_key = ?flat.sort_key,
        server_choice = flat.server_choice.is_some(),
        id_lookup = flat.is_id_lookup(),
        "Extracted query parameters"
    );

    Ok(flat)
}

fn collect(node: &CqlNode, flat: &mut FlatQuery) -> Result<(), QueryError> {
    match node {
        CqlNode::Term(term) => flat.insert_term(term),
        CqlNode::Boolean {
            op: BooleanOp::And,
            left,
            right,
        } => {
            collect(left, flat)?;
            collect(right, flat)
        }
        CqlNode::Boolean { op, .. } => Err(QueryError::UnsupportedBooleanOperator(op.to_string())),
        CqlNode::Sort { keys, subtree } => {
            if keys.len() > 1 {
                return Err(QueryError::MultipleSortKeys(keys.len()));
            }
            flat.sort_key = keys.first().map(|key| normalize_field(&key.index));
            collect(subtree, flat)
        }
    }
}
