//! Codex ↔ vendor code tables.
//!
//! Each table is built once on first use and shared for the lifetime of the
//! process. Lookups from the codex side are case-insensitive. Several codex
//! values may map onto the same vendor code (`ebook` and `book` both become
//! `book`); the reverse direction returns the first codex value listed for
//! that code.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::models::Selection;

/// An immutable two-way lookup between codex values and vendor codes
#[derive(Debug)]
pub struct CodeTable {
    name: &'static str,
    pairs: &'static [(&'static str, &'static str)],
    to_vendor: HashMap<&'static str, &'static str>,
    to_codex: HashMap<&'static str, &'static str>,
}

impl CodeTable {
    fn new(name: &'static str, pairs: &'static [(&'static str, &'static str)]) -> Self {
        let mut to_vendor = HashMap::with_capacity(pairs.len());
        let mut to_codex = HashMap::with_capacity(pairs.len());

        for (codex, vendor) in pairs {
            to_vendor.insert(*codex, *vendor);
            to_codex.entry(*vendor).or_insert(*codex);
        }

        Self {
            name,
            pairs,
            to_vendor,
            to_codex,
        }
    }

    /// Name of the codex field this table maps
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Vendor code for a codex value
    pub fn vendor_code(&self, codex: &str) -> Option<&'static str> {
        self.to_vendor
            .get(codex.trim().to_lowercase().as_str())
            .copied()
    }

    /// Canonical codex value for a vendor code
    pub fn codex_value(&self, vendor: &str) -> Option<&'static str> {
        self.to_codex
            .get(vendor.trim().to_lowercase().as_str())
            .copied()
    }

    /// All `(codex, vendor)` pairs in declaration order
    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        self.pairs
    }
}

const RESOURCE_TYPE_PAIRS: &[(&str, &str)] = &[
    ("audiobook", "audiobook"),
    ("book", "book"),
    ("ebook", "book"),
    ("bookseries", "bookseries"),
    ("database", "database"),
    ("journal", "journal"),
    ("newsletter", "newsletter"),
    ("newspaper", "newspaper"),
    ("proceedings", "proceedings"),
    ("report", "report"),
    ("audio", "streamingaudio"),
    ("streamingaudio", "streamingaudio"),
    ("video", "streamingvideo"),
    ("streamingvideo", "streamingvideo"),
    ("thesisdissertation", "thesisdissertation"),
    ("website", "website"),
    ("unspecified", "unspecified"),
];

const CONTENT_TYPE_PAIRS: &[(&str, &str)] = &[
    ("aggregated", "aggregatedfulltext"),
    ("abstract", "abstractandindex"),
    ("ebook", "ebook"),
    ("ejournal", "ejournal"),
    ("print", "print"),
    ("reference", "onlinereference"),
    ("streaming", "streamingmedia"),
    ("mixed", "mixedcontent"),
    ("unknown", "unknown"),
];

static RESOURCE_TYPES: Lazy<CodeTable> =
    Lazy::new(|| CodeTable::new("resourceType", RESOURCE_TYPE_PAIRS));

static CONTENT_TYPES: Lazy<CodeTable> = Lazy::new(|| CodeTable::new("type", CONTENT_TYPE_PAIRS));

/// Title `resourceType` → vendor publication type
pub fn resource_types() -> &'static CodeTable {
    &RESOURCE_TYPES
}

/// Package `type` → vendor content type
pub fn content_types() -> &'static CodeTable {
    &CONTENT_TYPES
}

/// Map an `ext.selected` value onto a vendor selection filter
pub fn selection(value: &str) -> Option<Selection> {
    match value.trim().to_lowercase().as_str() {
        "true" => Some(Selection::Selected),
        "false" => Some(Selection::NotSelected),
        "all" => Some(Selection::All),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("ebook", "book" ; "ebook is a book")]
    #[test_case("Book", "book" ; "case insensitive")]
    #[test_case("video", "streamingvideo" ; "video")]
    #[test_case("audio", "streamingaudio" ; "audio")]
    #[test_case("journal", "journal" ; "journal")]
    fn test_resource_type_to_vendor(codex: &str, vendor: &str) {
        assert_eq!(resource_types().vendor_code(codex), Some(vendor));
    }

    #[test_case("book", "book" ; "first listed value wins")]
    #[test_case("streamingvideo", "video" ; "streaming video")]
    #[test_case("STREAMINGAUDIO", "audio" ; "vendor code case insensitive")]
    fn test_resource_type_to_codex(vendor: &str, codex: &str) {
        assert_eq!(resource_types().codex_value(vendor), Some(codex));
    }

    #[test]
    fn test_unknown_values() {
        assert_eq!(resource_types().vendor_code("hologram"), None);
        assert_eq!(resource_types().codex_value("hologram"), None);
        assert_eq!(content_types().vendor_code("bogus"), None);
    }

    #[test]
    fn test_content_types_round_trip_every_entry() {
        for (codex, vendor) in content_types().entries() {
            assert_eq!(content_types().vendor_code(codex), Some(*vendor));
            assert_eq!(content_types().codex_value(vendor), Some(*codex));
        }
    }

    #[test]
    fn test_table_names() {
        assert_eq!(resource_types().name(), "resourceType");
        assert_eq!(content_types().name(), "type");
    }

    #[test_case("true", Some(Selection::Selected) ; "true is selected")]
    #[test_case("FALSE", Some(Selection::NotSelected) ; "false is not selected")]
    #[test_case("All", Some(Selection::All) ; "all")]
    #[test_case("yes", None ; "yes is unknown")]
    #[test_case("", None ; "empty is unknown")]
    fn test_selection(value: &str, expected: Option<Selection>) {
        assert_eq!(selection(value), expected);
    }
}
