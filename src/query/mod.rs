//! Translation of CQL queries into vendor search queries.
//!
//! The pipeline runs in four steps, each in its own module:
//!
//! - [`extract`]: flattens the CQL tree into a [`FlatQuery`]
//! - [`title`] / [`package`]: validate the flattened fields for one resource
//!   kind and map codex values onto vendor codes
//! - [`pagination`]: reconciles the client `(offset, limit)` window with the
//!   vendor's fixed-size, 1-based pages
//! - [`render`]: builds one vendor query string per page
//!
//! [`Translator`] drives the whole pipeline.

pub mod extract;
pub mod fields;
pub mod mapping;
pub mod package;
pub mod pagination;
pub mod render;
pub mod title;
mod translate;
mod validate;

pub use extract::{extract, FlatQuery};
pub use package::validate_package;
pub use pagination::{reconcile, reconcile_with_max, DEFAULT_MAX_LIMIT, VENDOR_MAX_PAGE_SIZE};
pub use render::{render_package, render_title};
pub use title::validate_title;
pub use translate::{translate, Translator};

use serde::Serialize;

/// Errors produced while translating a query.
///
/// Every variant is a client input problem; nothing here is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// The query is not valid CQL
    #[error("Unsupported Query Format: {0}")]
    MalformedQuery(String),

    /// A relation other than `=` was used
    #[error("Unsupported Query Format: relation '{relation}' used with '{field}' is not supported, only '=' is allowed")]
    UnsupportedOperator { field: String, relation: String },

    /// OR, NOT or PROX was used
    #[error("Unsupported Query Format: boolean operator '{0}' is not supported, only AND is allowed")]
    UnsupportedBooleanOperator(String),

    /// More than one sort key was requested
    #[error("Unsupported Query Format: only one sort key is supported, found {0}")]
    MultipleSortKeys(usize),

    /// Sorting on anything but the resource's name field
    #[error("Unsupported Query Format: sorting by '{field}' is not supported, only '{expected}' is allowed")]
    UnsupportedSortField { field: String, expected: String },

    /// A field outside the resource's allow-list
    #[error("Unsupported Query Format: search field '{0}' is not supported")]
    UnsupportedField(String),

    /// A known field with a value outside its vocabulary
    #[error("Unsupported Query Format: value '{value}' is not supported for '{field}'")]
    UnsupportedValue { field: String, value: String },

    /// More than one primary search field at once
    #[error("Unsupported Query Format: only one search field may be used at a time, found {}", .0.join(", "))]
    AmbiguousSearchField(Vec<String>),

    /// No search term could be found
    #[error("Unsupported Query Format: no search term found, expected '{0}' or an unqualified term")]
    MissingSearchTerm(String),

    /// The search value could not be percent-encoded
    #[error("Unable to encode search value: {0}")]
    Encoding(String),
}

impl QueryError {
    pub(crate) fn unsupported_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        QueryError::UnsupportedValue {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Stable machine-readable code for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::MalformedQuery(_) => ErrorKind::MalformedQuery,
            QueryError::UnsupportedOperator { .. } => ErrorKind::UnsupportedOperator,
            QueryError::UnsupportedBooleanOperator(_) => ErrorKind::UnsupportedBooleanOperator,
            QueryError::MultipleSortKeys(_) => ErrorKind::MultipleSortKeys,
            QueryError::UnsupportedSortField { .. } => ErrorKind::UnsupportedSortField,
            QueryError::UnsupportedField(_) => ErrorKind::UnsupportedField,
            QueryError::UnsupportedValue { .. } => ErrorKind::UnsupportedValue,
            QueryError::AmbiguousSearchField(_) => ErrorKind::AmbiguousSearchField,
            QueryError::MissingSearchTerm(_) => ErrorKind::MissingSearchTerm,
            QueryError::Encoding(_) => ErrorKind::Encoding,
        }
    }
}

/// Machine-readable error codes, one per [`QueryError`] variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MalformedQuery,
    UnsupportedOperator,
    UnsupportedBooleanOperator,
    MultipleSortKeys,
    UnsupportedSortField,
    UnsupportedField,
    UnsupportedValue,
    AmbiguousSearchField,
    MissingSearchTerm,
    Encoding,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedQuery => "malformed_query",
            ErrorKind::UnsupportedOperator => "unsupported_operator",
            ErrorKind::UnsupportedBooleanOperator => "unsupported_boolean_operator",
            ErrorKind::MultipleSortKeys => "multiple_sort_keys",
            ErrorKind::UnsupportedSortField => "unsupported_sort_field",
            ErrorKind::UnsupportedField => "unsupported_field",
            ErrorKind::UnsupportedValue => "unsupported_value",
            ErrorKind::AmbiguousSearchField => "ambiguous_search_field",
            ErrorKind::MissingSearchTerm => "missing_search_term",
            ErrorKind::Encoding => "encoding",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = QueryError::unsupported_value("type", "bogus");
        assert_eq!(
            err.to_string(),
            "Unsupported Query Format: value 'bogus' is not supported for 'type'"
        );

        let err = QueryError::AmbiguousSearchField(vec!["title".into(), "publisher".into()]);
        assert!(err.to_string().ends_with("found title, publisher"));
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            QueryError::UnsupportedField("author".into()).kind(),
            ErrorKind::UnsupportedField
        );
        assert_eq!(
            QueryError::MultipleSortKeys(2).kind().as_str(),
            "multiple_sort_keys"
        );
        assert_eq!(
            serde_json::to_string(&ErrorKind::MissingSearchTerm).unwrap(),
            "\"missing_search_term\""
        );
    }
}
