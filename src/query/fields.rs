//! Codex field vocabulary and field-name normalisation.
//!
//! Field names are matched case-insensitively and an optional `codex.`
//! prefix is stripped, so `codex.resourceType`, `resourcetype` and
//! `ResourceType` all normalise to [`RESOURCE_TYPE`].

use crate::models::ResourceKind;

/// Prefix of the aggregator's own vocabulary
pub const CODEX_PREFIX: &str = "codex.";

/// Prefix of forward-compatible client hints
pub const EXT_PREFIX: &str = "ext.";

/// Normalised form of [`crate::cql::SERVER_CHOICE_INDEX`]
pub const SERVER_CHOICE: &str = "cql.serverchoice";

pub const ID: &str = "id";
pub const TITLE: &str = "title";
pub const IDENTIFIER: &str = "identifier";
pub const SUBJECT: &str = "subject";
pub const PUBLISHER: &str = "publisher";
pub const RESOURCE_TYPE: &str = "resourcetype";
pub const NAME: &str = "name";
pub const TYPE: &str = "type";
pub const SOURCE: &str = "source";
pub const EXT_SELECTED: &str = "ext.selected";

const TITLE_FIELDS: [&str; 7] = [TITLE, IDENTIFIER, SUBJECT, PUBLISHER, RESOURCE_TYPE, SOURCE, ID];
const PACKAGE_FIELDS: [&str; 4] = [NAME, TYPE, SOURCE, ID];

/// Accepted values of `source`
pub const SOURCE_VALUES: [&str; 2] = ["kb", "all"];

/// Lower-case a field name and strip any `codex.` prefix
pub fn normalize_field(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    match lower.strip_prefix(CODEX_PREFIX) {
        Some(rest) => rest.to_string(),
        None => lower,
    }
}

/// Whether a normalised field is an `ext.` hint
pub fn is_extension(field: &str) -> bool {
    field.starts_with(EXT_PREFIX)
}

/// Whether a normalised field is the id fast-path field
pub fn is_id(field: &str) -> bool {
    field == ID
}

/// Bare fields a resource kind accepts
pub fn allowed_fields(kind: ResourceKind) -> &'static [&'static str] {
    match kind {
        ResourceKind::Title => &TITLE_FIELDS,
        ResourceKind::Package => &PACKAGE_FIELDS,
    }
}

/// The field that carries a resource's name, also its only sort field
pub fn name_field(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Title => TITLE,
        ResourceKind::Package => NAME,
    }
}
