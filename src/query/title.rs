//! Title search validation.

use crate::models::{CommonParameters, ResourceKind, TitleParameters, TitleSearchField};
use crate::query::extract::FlatQuery;
use crate::query::fields::{IDENTIFIER, PUBLISHER, RESOURCE_TYPE, SUBJECT, TITLE};
use crate::query::validate::{
    check_fields, check_source, mapped_code, selection, server_choice_term, sort_field,
};
use crate::query::{mapping, QueryError};

/// Codex fields that can drive the vendor `searchfield`, in precedence order
const SEARCH_FIELDS: [(&str, TitleSearchField); 4] = [
    (TITLE, TitleSearchField::TitleName),
    (IDENTIFIER, TitleSearchField::Identifier),
    (PUBLISHER, TitleSearchField::Publisher),
    (SUBJECT, TitleSearchField::Subject),
];

/// Validate a flattened query as a title search
pub fn validate_title(flat: &FlatQuery) -> Result<TitleParameters, QueryError> {
    let kind = ResourceKind::Title;

    check_fields(flat, kind)?;
    check_source(flat)?;
    let sort_field = sort_field(flat, kind, TitleSearchField::TitleName.vendor_code())?;
    let selection_filter = selection(flat)?;
    let resource_type_filter = mapped_code(flat, RESOURCE_TYPE, mapping::resource_types())?;
    let (search_field, search_value) = search_term(flat)?;

    tracing::debug!(
        search_field = search_field.vendor_code(),
        resource_type = ?resource_type_filter,
        selection = ?selection_filter,
        "Validated title query"
    );

    Ok(TitleParameters {
        common: CommonParameters {
            search_value,
            sort_field,
        },
        search_field,
        resource_type_filter,
        selection_filter,
    })
}

fn search_term(flat: &FlatQuery) -> Result<(TitleSearchField, String), QueryError> {
    let supplied: Vec<(&str, TitleSearchField, &str)> = SEARCH_FIELDS
        .iter()
        .filter_map(|(name, field)| flat.get(name).map(|value| (*name, *field, value)))
        .collect();

    match supplied.as_slice() {
        [] => Ok((
            TitleSearchField::TitleName,
            server_choice_term(flat, ResourceKind::Title)?,
        )),
        [(_, field, value)] if !value.trim().is_empty() => Ok((*field, value.to_string())),
        [(name, _, _)] => Err(QueryError::MissingSearchTerm(name.to_string())),
        many => Err(QueryError::AmbiguousSearchField(
            many.iter().map(|(name, _, _)| name.to_string()).collect(),
        )),
    }
}
