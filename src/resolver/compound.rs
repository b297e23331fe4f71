//! Compound permission names
//!
//! A permission name that is not a policy of its own may encode a boolean
//! expression over other names:
//!
//! | Marker  | Meaning                         | Example            |
//! |---------|---------------------------------|--------------------|
//! | `_or_`  | any component granted           | `admin_or_owner`   |
//! | `_and_` | every component granted         | `staff_and_active` |
//! | `not_`  | prefix; remainder must be denied | `not_banned`       |
//!
//! There is no grouping. `_or_` is split first, so `_and_` binds tighter and
//! `a_and_b_or_c` reads as `(a AND b) OR c`. `not_` only applies to a name
//! with neither infix marker, so it binds tightest.

/// Infix marker for conjunction
pub const AND_MARKER: &str = "_and_";

/// Infix marker for disjunction
pub const OR_MARKER: &str = "_or_";

/// Prefix marker for negation
pub const NOT_PREFIX: &str = "not_";

/// One level of decomposition of a compound name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compound<'a> {
    /// Granted if any component is granted
    Any(Vec<&'a str>),
    /// Granted if every component is granted
    All(Vec<&'a str>),
    /// Granted if the inner name is denied
    Not(&'a str),
}

impl<'a> Compound<'a> {
    /// Split a name one level
    ///
    /// Returns `None` when no marker applies. Every component is strictly
    /// shorter than `name`.
    pub fn parse(name: &'a str) -> Option<Self> {
        if name.contains(OR_MARKER) {
            Some(Compound::Any(name.split(OR_MARKER).collect()))
        } else if name.contains(AND_MARKER) {
            Some(Compound::All(name.split(AND_MARKER).collect()))
        } else {
            name.strip_prefix(NOT_PREFIX).map(Compound::Not)
        }
    }
}
