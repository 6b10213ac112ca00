//! Translation results handed to the fetch collaborator.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Windowing;

/// A fully encoded vendor query string for one page.
///
/// Query-parameter form only: no scheme, host or path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorQuery(String);

impl VendorQuery {
    pub(crate) fn new(query: String) -> Self {
        Self(query)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for VendorQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VendorQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Outcome of translating one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Translation {
    /// Skip searching and fetch this identifier directly
    IdLookup { id: String },

    /// Fetch every query in order, concatenate the results, then apply
    /// `windowing`
    Search {
        queries: Vec<VendorQuery>,
        windowing: Windowing,
    },
}

impl Translation {
    /// Vendor queries to issue; empty for an id lookup
    pub fn queries(&self) -> &[VendorQuery] {
        match self {
            Translation::IdLookup { .. } => &[],
            Translation::Search { queries, .. } => queries,
        }
    }

    /// Whether the caller should bypass search entirely
    pub fn is_id_lookup(&self) -> bool {
        matches!(self, Translation::IdLookup { .. })
    }
}
