//! Validated, resource-specific vendor search parameters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resource kinds a query can be translated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Title,
    Package,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Title => "title",
            ResourceKind::Package => "package",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "title" | "titles" => Ok(ResourceKind::Title),
            "package" | "packages" => Ok(ResourceKind::Package),
            other => Err(format!("unknown resource kind: {}", other)),
        }
    }
}

/// Vendor-side selection filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    Selected,
    NotSelected,
    All,
}

impl Selection {
    /// Value of the vendor's `selection` query parameter
    pub fn vendor_code(&self) -> &'static str {
        match self {
            Selection::Selected => "selected",
            Selection::NotSelected => "notselected",
            Selection::All => "all",
        }
    }
}

/// Vendor field a title search runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleSearchField {
    TitleName,
    /// Combined ISBN/ISSN field
    Identifier,
    Publisher,
    Subject,
}

impl TitleSearchField {
    /// Value of the vendor's `searchfield` query parameter
    pub fn vendor_code(&self) -> &'static str {
        match self {
            TitleSearchField::TitleName => "titlename",
            TitleSearchField::Identifier => "isxn",
            TitleSearchField::Publisher => "publisher",
            TitleSearchField::Subject => "subject",
        }
    }
}

/// Parameters shared by every resource kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonParameters {
    /// Raw (not yet encoded) search value
    pub search_value: String,

    /// Vendor-side sort field, never empty
    pub sort_field: String,
}

/// Validated title search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleParameters {
    #[serde(flatten)]
    pub common: CommonParameters,

    pub search_field: TitleSearchField,

    /// Vendor publication type code
    pub resource_type_filter: Option<String>,

    pub selection_filter: Option<Selection>,
}

/// Validated package search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageParameters {
    #[serde(flatten)]
    pub common: CommonParameters,

    /// Vendor content type code
    pub content_type_filter: Option<String>,

    pub selection_filter: Option<Selection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_kind_from_str() {
        assert_eq!("title".parse::<ResourceKind>(), Ok(ResourceKind::Title));
        assert_eq!("Packages".parse::<ResourceKind>(), Ok(ResourceKind::Package));
        assert!("providers".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_vendor_codes() {
        assert_eq!(Selection::NotSelected.vendor_code(), "notselected");
        assert_eq!(TitleSearchField::Identifier.vendor_code(), "isxn");
        assert_eq!(TitleSearchField::TitleName.vendor_code(), "titlename");
    }

    #[test]
    fn test_title_parameters_serialize_flat() {
        let params = TitleParameters {
            common: CommonParameters {
                search_value: "bridges".to_string(),
                sort_field: "titlename".to_string(),
            },
            search_field: TitleSearchField::TitleName,
            resource_type_filter: Some("book".to_string()),
            selection_filter: Some(Selection::Selected),
        };

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["search_value"], "bridges");
        assert_eq!(json["search_field"], "titlename");
        assert_eq!(json["selection_filter"], "selected");
    }
}
