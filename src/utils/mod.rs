//! Utility modules supporting query translation.
//!
//! - [`check_search_value`]: reject search values that cannot be encoded into a vendor query
//! - [`sanitize_lookup_id`]: validate the id handed back for a direct lookup
//! - [`ValidationError`]: why a value was rejected
//!
//! ```rust
//! use holdings_query::utils::{check_search_value, sanitize_lookup_id};
//!
//! assert!(check_search_value("bridge building").is_ok());
//! assert_eq!(sanitize_lookup_id(" 19-1615 ").unwrap(), "19-1615");
//! assert!(sanitize_lookup_id("../secret").is_err());
//! ```

mod validate;

pub use validate::{check_search_value, sanitize_lookup_id, ValidationError};
