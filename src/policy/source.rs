//! Policy sources
//!
//! A source yields a partial mapping of permission name to policy. Sources are
//! registered on an `AuthorizatorConfig` in order and merged into the policy
//! table, later sources overwriting earlier ones.

use std::collections::HashMap;
use std::sync::Arc;

use super::predicate::PolicyValue;
use crate::core::Attributes;

/// A partial mapping of permission name to declared policy
///
/// # Example
///
/// ```ignore
/// let set = PolicySet::new()
///     .policy("create_user", true)
///     .policy("admin", PolicyValue::nullary(|| false));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PolicySet {
    entries: HashMap<String, PolicyValue>,
}

impl PolicySet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a policy (builder style)
    pub fn policy(mut self, name: impl Into<String>, value: impl Into<PolicyValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a policy, replacing any previous entry with the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PolicyValue>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Get a declared policy
    pub fn get(&self, name: &str) -> Option<&PolicyValue> {
        self.entries.get(name)
    }

    /// Number of policies in the set
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for PolicySet {
    type Item = (String, PolicyValue);
    type IntoIter = std::collections::hash_map::IntoIter<String, PolicyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for PolicySet
where
    K: Into<String>,
    V: Into<PolicyValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = PolicySet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

/// Trait for policy source implementations
///
/// Implement this trait for reusable groups of policies (role policies,
/// feature flags, ...). For simple closures, use `FnSource` instead.
pub trait PolicySource: Send + Sync {
    /// Name of this source (for logging/debugging)
    fn name(&self) -> &str;

    /// Produce this source's policies
    ///
    /// Called once when the policy table is built. Predicates that depend on
    /// attributes should capture the values they need from `attributes`.
    fn policies(&self, attributes: &Attributes) -> PolicySet;
}

/// A policy source created from a closure
///
/// ```ignore
/// let roles = FnSource::new("roles", |attrs| {
///     let is_admin = attrs.get_str("role") == Some("admin");
///     PolicySet::new().policy("admin", is_admin)
/// });
/// ```
pub struct FnSource<F>
where
    F: Fn(&Attributes) -> PolicySet + Send + Sync,
{
    name: String,
    func: F,
}

impl<F> FnSource<F>
where
    F: Fn(&Attributes) -> PolicySet + Send + Sync,
{
    /// Create a new function-based source
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> PolicySource for FnSource<F>
where
    F: Fn(&Attributes) -> PolicySet + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn policies(&self, attributes: &Attributes) -> PolicySet {
        (self.func)(attributes)
    }
}

/// A source holding one declared policy
///
/// Backs `AuthorizatorConfig::with_policy`.
pub(crate) struct DeclaredPolicy {
    name: String,
    value: PolicyValue,
}

impl DeclaredPolicy {
    pub(crate) fn new(name: impl Into<String>, value: impl Into<PolicyValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl PolicySource for DeclaredPolicy {
    fn name(&self) -> &str {
        &self.name
    }

    fn policies(&self, _attributes: &Attributes) -> PolicySet {
        PolicySet::new().policy(self.name.clone(), self.value.clone())
    }
}

/// Arc-wrapped source for sharing across contexts
pub type SharedSource = Arc<dyn PolicySource>;
