//! Vendor query strings.
//!
//! Parameter order is part of the vendor contract and is reproduced exactly:
//!
//! - titles: `searchfield`, `resourcetype`?, `selection`?, `search`,
//!   `orderby`, `count`, `offset`, `searchtype=advanced`
//! - packages: `contenttype`?, `selection`?, `search`, `orderby`, `count`,
//!   `offset`
//!
//! `offset` carries the 1-based page number. Search values are
//! form-encoded (spaces become `+`).

use url::form_urlencoded;

use crate::models::{Page, PackageParameters, TitleParameters, VendorQuery};
use crate::query::QueryError;
use crate::utils::check_search_value;

/// Marker selecting the vendor's advanced title search
const ADVANCED_SEARCH: &str = "searchtype=advanced";

/// Render the title query for one page
pub fn render_title(params: &TitleParameters, page: &Page) -> Result<VendorQuery, QueryError> {
    let mut query = format!("searchfield={}", params.search_field.vendor_code());

    if let Some(resource_type) = &params.resource_type_filter {
        query.push_str(&format!("&resourcetype={}", resource_type));
    }
    if let Some(selection) = &params.selection_filter {
        query.push_str(&format!("&selection={}", selection.vendor_code()));
    }

    query.push_str(&format!(
        "&search={}",
        encode_search(&params.common.search_value)?
    ));
    push_paging(&mut query, &params.common.sort_field, page);
    query.push('&');
    query.push_str(ADVANCED_SEARCH);

    tracing::trace!(query = %query, "Rendered title query");
    Ok(VendorQuery::new(query))
}

/// Render the package query for one page
pub fn render_package(params: &PackageParameters, page: &Page) -> Result<VendorQuery, QueryError> {
    let mut filters = Vec::new();

    if let Some(content_type) = &params.content_type_filter {
        filters.push(format!("contenttype={}", content_type));
    }
    if let Some(selection) = &params.selection_filter {
        filters.push(format!("selection={}", selection.vendor_code()));
    }
    filters.push(format!(
        "search={}",
        encode_search(&params.common.search_value)?
    ));

    let mut query = filters.join("&");
    push_paging(&mut query, &params.common.sort_field, page);

    tracing::trace!(query = %query, "Rendered package query");
    Ok(VendorQuery::new(query))
}

fn push_paging(query: &mut String, sort_field: &str, page: &Page) {
    query.push_str(&format!(
        "&orderby={}&count={}&offset={}",
        sort_field, page.page_size, page.page_number
    ));
}

fn encode_search(value: &str) -> Result<String, QueryError> {
    check_search_value(value).map_err(|e| QueryError::Encoding(e.to_string()))?;
    Ok(form_urlencoded::byte_serialize(value.as_bytes()).collect())
}
