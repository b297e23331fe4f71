//! Authorization contexts
//!
//! An `Authorizator` holds a subject's attributes and the ordered policy
//! sources declared for it, and answers permission checks.
//!
//! ## Example
//!
//! ```rust,ignore
//! use authorizator::authorizator::AuthorizatorConfig;
//! use authorizator::core::Arguments;
//! use authorizator::policy::PolicySet;
//!
//! let authorizator = AuthorizatorConfig::new()
//!     .with_attribute("role", "editor")
//!     .with_source_fn("roles", |attrs| {
//!         let editor = attrs.get_str("role") == Some("editor");
//!         PolicySet::new().policy("edit", editor).policy("publish", false)
//!     })
//!     .build();
//!
//! // Plain and compound checks
//! authorizator.is_allowed("edit", &Arguments::new())?;              // true
//! authorizator.is_allowed("edit_and_publish", &Arguments::new())?;  // false
//! authorizator.is_allowed("not_publish", &Arguments::new())?;       // true
//!
//! // Unknown names are errors, not denials
//! assert!(authorizator.is_allowed("delete", &Arguments::new()).is_err());
//! ```

mod authorizator;
mod config;

pub use authorizator::Authorizator;
pub use config::AuthorizatorConfig;
