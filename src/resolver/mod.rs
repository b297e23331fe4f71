//! Permission resolution
//!
//! `Resolver` answers "is this permission granted?" against a `PolicyTable`.
//! Names that are not policies of their own are decomposed as compound names
//! (see `Compound`).

mod compound;
mod resolver;

pub use compound::{Compound, AND_MARKER, NOT_PREFIX, OR_MARKER};
pub use resolver::Resolver;
