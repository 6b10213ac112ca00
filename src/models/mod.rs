//! Core data models for validated parameters, vendor pages and translation results.

mod paging;
mod params;
mod translation;

pub use paging::{Page, PaginationInfo, Windowing};
pub use params::{
    CommonParameters, PackageParameters, ResourceKind, Selection, TitleParameters,
    TitleSearchField,
};
pub use translation::{Translation, VendorQuery};
