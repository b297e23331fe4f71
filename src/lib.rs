pub mod core;
pub mod policy;
pub mod resolver;
pub mod authorizator;

// Optional components
pub mod logging;

pub use crate::authorizator::{Authorizator, AuthorizatorConfig};
pub use crate::core::{Arguments, Attributes, PolicyError, PolicyResult};
pub use crate::policy::{FnSource, PolicyDocument, PolicySet, PolicySource, PolicyValue, Predicate};
