//! The translation driver: CQL string in, vendor queries out.

use crate::config::PagingConfig;
use crate::cql;
use crate::models::{Page, PaginationInfo, ResourceKind, Translation, VendorQuery};
use crate::query::pagination::{reconcile_with_max, DEFAULT_MAX_LIMIT, VENDOR_MAX_PAGE_SIZE};
use crate::query::{
    extract, render_package, render_title, validate_package, validate_title, QueryError,
};
use crate::utils::sanitize_lookup_id;

/// Translates queries against a vendor page size and a client window ceiling.
///
/// Holds no mutable state and can be shared freely between threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translator {
    max_page_size: usize,
    max_limit: usize,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator {
    /// Create a translator using the vendor's maximum page size
    pub fn new() -> Self {
        Self {
            max_page_size: VENDOR_MAX_PAGE_SIZE,
            max_limit: DEFAULT_MAX_LIMIT,
        }
    }

    /// Use smaller vendor pages. Values are clamped to `1..=100`.
    pub fn with_max_page_size(mut self, max_page_size: usize) -> Self {
        self.max_page_size = max_page_size.clamp(1, VENDOR_MAX_PAGE_SIZE);
        self
    }

    /// Largest `limit` accepted. Values below 1 are raised to 1.
    pub fn with_max_limit(mut self, max_limit: usize) -> Self {
        self.max_limit = max_limit.max(1);
        self
    }

    pub fn from_config(paging: &PagingConfig) -> Self {
        Self::new()
            .with_max_page_size(paging.max_page_size)
            .with_max_limit(paging.max_limit)
    }

    pub fn max_page_size(&self) -> usize {
        self.max_page_size
    }

    pub fn max_limit(&self) -> usize {
        self.max_limit
    }

    /// Check a client window and reconcile it with vendor pages.
    ///
    /// `limit` must be in `1..=max_limit` and `offset + limit` must not
    /// overflow.
    pub fn paginate(&self, offset: usize, limit: usize) -> Result<PaginationInfo, QueryError> {
        if limit == 0 || limit > self.max_limit {
            return Err(QueryError::unsupported_value("limit", limit.to_string()));
        }
        if offset.checked_add(limit).is_none() {
            return Err(QueryError::unsupported_value("offset", offset.to_string()));
        }

        Ok(reconcile_with_max(offset, limit, self.max_page_size))
    }

    /// Translate a CQL query and a client window into vendor queries.
    ///
    /// An `id` lookup short-circuits to [`Translation::IdLookup`] without
    /// validating the remaining fields.
    pub fn translate(
        &self,
        query: &str,
        offset: usize,
        limit: usize,
        kind: ResourceKind,
    ) -> Result<Translation, QueryError> {
        let pagination = self.paginate(offset, limit)?;

        let ast = cql::parse(query)?;
        let flat = extract(&ast)?;

        if let Some(id) = flat.id_lookup_value() {
            let id = sanitize_lookup_id(id)
                .map_err(|e| QueryError::unsupported_value("id", format!("{id} ({e})")))?;
            tracing::debug!(id = %id, kind = %kind, "Query is a direct id lookup");
            return Ok(Translation::IdLookup { id });
        }

        let translation = match kind {
            ResourceKind::Title => {
                let params = validate_title(&flat)?;
                build_queries(&pagination, |page| render_title(&params, page))?
            }
            ResourceKind::Package => {
                let params = validate_package(&flat)?;
                build_queries(&pagination, |page| render_package(&params, page))?
            }
        };

        tracing::info!(
            kind = %kind,
            offset,
            limit,
            queries = translation.queries().len(),
            "Translated query"
        );

        Ok(translation)
    }
}

/// Translate with the default [`Translator`]
pub fn translate(
    query: &str,
    offset: usize,
    limit: usize,
    kind: ResourceKind,
) -> Result<Translation, QueryError> {
    Translator::new().translate(query, offset, limit, kind)
}

fn build_queries<F>(pagination: &PaginationInfo, render: F) -> Result<Translation, QueryError>
where
    F: Fn(&Page) -> Result<VendorQuery, QueryError>,
{
    let queries = pagination
        .pages
        .iter()
        .map(render)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Translation::Search {
        queries,
        windowing: pagination.windowing(),
    })
}
