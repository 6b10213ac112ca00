//! # Holdings Query
//!
//! Translates CQL search queries into the query strings of a knowledge-base
//! holdings vendor, and reconciles an arbitrary client `(offset, limit)`
//! window with the vendor's fixed-size, 1-based pages.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`cql`]: CQL grammar and syntax tree
//! - [`query`]: Extraction, validation, pagination and rendering
//! - [`models`]: Validated parameters, pages and translation results
//! - [`utils`]: Input validation helpers
//! - [`config`]: Configuration management
//!
//! ```
//! use holdings_query::{translate, ResourceKind, Translation};
//!
//! let translation = translate("title = bridges", 0, 10, ResourceKind::Title).unwrap();
//! match translation {
//!     Translation::Search { queries, windowing } => {
//!         assert_eq!(queries.len(), 1);
//!         assert_eq!(windowing.first_object_index, 0);
//!     }
//!     Translation::IdLookup { .. } => unreachable!(),
//! }
//! ```

pub mod config;
pub mod cql;
pub mod models;
pub mod query;
pub mod utils;

// Re-export commonly used types
pub use models::{ResourceKind, Translation, VendorQuery, Windowing};
pub use query::{translate, QueryError, Translator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
