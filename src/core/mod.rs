//! Core types for the authorization engine
//!
//! This module provides the fundamental types used throughout the crate:
//! - `Arguments` - Named values passed to predicates at check time
//! - `Attributes` - Per-context values available to policy sources
//! - `PolicyError` - Error types

pub mod arguments;
pub mod error;

pub use arguments::{Arguments, Attributes};
pub use error::{PolicyError, PolicyResult};
