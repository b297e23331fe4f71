//! Policies
//!
//! Everything between a declared policy and the table the resolver reads:
//!
//! - `PolicyValue` - a policy as declared (constant, callable, or list)
//! - `Predicate` / `normalize` - the uniform callable contract
//! - `PolicySource` / `PolicySet` - ordered, mergeable groups of policies
//! - `PolicyTable` - the merged result, name → predicates
//! - `PolicyDocument` - policies loaded from JSON
//!
//! ## Example
//!
//! ```rust,ignore
//! use authorizator::policy::{FnSource, PolicySet, PolicyValue};
//!
//! let roles = FnSource::new("roles", |attrs| {
//!     let role = attrs.get_str("role").unwrap_or_default().to_string();
//!     PolicySet::new()
//!         .policy("admin", role == "admin")
//!         .policy("editor", PolicyValue::nullary(move || role == "editor"))
//! });
//! ```

mod document;
mod predicate;
mod source;
mod table;

pub use document::{ArgumentRule, PolicyDocument, PolicyEntry};
pub use predicate::{
    is_granted, is_truthy, normalize, normalize_one, ArcPredicate, IntoOutcome, PolicyValue,
    Predicate,
};
pub(crate) use source::DeclaredPolicy;
pub use source::{FnSource, PolicySet, PolicySource, SharedSource};
pub use table::PolicyTable;
