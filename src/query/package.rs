//! Package search validation.

use crate::models::{CommonParameters, PackageParameters, ResourceKind};
use crate::query::extract::FlatQuery;
use crate::query::fields::{NAME, TYPE};
use crate::query::validate::{
    check_fields, check_source, mapped_code, selection, server_choice_term, sort_field,
};
use crate::query::{mapping, QueryError};

/// Vendor field packages are sorted by
pub const PACKAGE_SORT_FIELD: &str = "packagename";

/// Validate a flattened query as a package search
pub fn validate_package(flat: &FlatQuery) -> Result<PackageParameters, QueryError> {
    let kind = ResourceKind::Package;

    check_fields(flat, kind)?;
    check_source(flat)?;
    let sort_field = sort_field(flat, kind, PACKAGE_SORT_FIELD)?;
    let selection_filter = selection(flat)?;
    let content_type_filter = mapped_code(flat, TYPE, mapping::content_types())?;

    let search_value = match flat.get(NAME) {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        Some(_) => return Err(QueryError::MissingSearchTerm(NAME.to_string())),
        None => server_choice_term(flat, kind)?,
    };

    tracing::debug!(
        content_type = ?content_type_filter,
        selection = ?selection_filter,
        "Validated package query"
    );

    Ok(PackageParameters {
        common: CommonParameters {
            search_value,
            sort_field,
        },
        content_type_filter,
        selection_filter,
    })
}
