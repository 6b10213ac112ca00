//! Validation rules shared by the title and package validators.

use crate::models::{ResourceKind, Selection};
use crate::query::extract::FlatQuery;
use crate::query::fields::{
    allowed_fields, is_extension, name_field, EXT_SELECTED, SOURCE, SOURCE_VALUES,
};
use crate::query::{mapping, QueryError};

/// Every bare field must be on the allow-list; `ext.` hints pass through.
pub(crate) fn check_fields(flat: &FlatQuery, kind: ResourceKind) -> Result<(), QueryError> {
    let allowed = allowed_fields(kind);

    for (field, _) in flat.fields() {
        if is_extension(field) {
            if field != EXT_SELECTED {
                tracing::warn!(field = %field, kind = %kind, "Ignoring unrecognised extension field");
            }
            continue;
        }
        if !allowed.contains(&field) {
            return Err(QueryError::UnsupportedField(field.to_string()));
        }
    }

    Ok(())
}

/// `source` is optional but must come from the fixed vocabulary
pub(crate) fn check_source(flat: &FlatQuery) -> Result<(), QueryError> {
    match flat.get(SOURCE) {
        Some(value) if !SOURCE_VALUES.contains(&value.trim().to_lowercase().as_str()) => {
            Err(QueryError::unsupported_value(SOURCE, value))
        }
        _ => Ok(()),
    }
}

/// Resolve the vendor sort field, defaulting to the resource's name field
pub(crate) fn sort_field(
    flat: &FlatQuery,
    kind: ResourceKind,
    vendor_field: &str,
) -> Result<String, QueryError> {
    let expected = name_field(kind);

    match flat.sort_key() {
        Some(key) if key != expected => Err(QueryError::UnsupportedSortField {
            field: key.to_string(),
            expected: expected.to_string(),
        }),
        _ => Ok(vendor_field.to_string()),
    }
}

pub(crate) fn selection(flat: &FlatQuery) -> Result<Option<Selection>, QueryError> {
    flat.get(EXT_SELECTED)
        .map(|value| {
            mapping::selection(value)
                .ok_or_else(|| QueryError::unsupported_value(EXT_SELECTED, value))
        })
        .transpose()
}

/// Map an optional field through a code table
pub(crate) fn mapped_code(
    flat: &FlatQuery,
    field: &str,
    table: &mapping::CodeTable,
) -> Result<Option<String>, QueryError> {
    flat.get(field)
        .map(|value| {
            table
                .vendor_code(value)
                .map(str::to_string)
                .ok_or_else(|| QueryError::unsupported_value(field, value))
        })
        .transpose()
}

/// The unqualified term, used when no named search field is given
pub(crate) fn server_choice_term(
    flat: &FlatQuery,
    kind: ResourceKind,
) -> Result<String, QueryError> {
    flat.server_choice()
        .filter(|term| !term.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| QueryError::MissingSearchTerm(name_field(kind).to_string()))
}
