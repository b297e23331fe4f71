//! Authorizator Configuration
//!
//! Construction-time description of an authorization context: its attributes
//! and its ordered policy sources.

use std::sync::Arc;

use serde_json::Value;

use super::authorizator::Authorizator;
use crate::core::Attributes;
use crate::policy::{
    DeclaredPolicy, FnSource, PolicyDocument, PolicySet, PolicySource, PolicyValue, SharedSource,
};

/// Configuration for an `Authorizator`
///
/// Use the builder pattern to configure the context:
///
/// ```ignore
/// let authorizator = AuthorizatorConfig::new()
///     .with_attribute("user", "fede")
///     .with_attribute("role", "admin")
///     .with_source(RolePolicies)
///     .with_source_fn("features", |_| PolicySet::new().policy("avatars", true))
///     .with_policy("login", PolicyValue::predicate(|args: &Arguments| {
///         Ok::<_, PolicyError>(args.require("user")? == args.require("pass")?)
///     }))
///     .build();
/// ```
///
/// Sources are merged in the order they were added; on a name collision the
/// later one wins.
#[derive(Default, Clone)]
pub struct AuthorizatorConfig {
    /// Attributes available to every source
    pub attributes: Attributes,

    /// Policy sources, in registration order
    pub sources: Vec<SharedSource>,
}

impl AuthorizatorConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a policy document: its attributes are seeded and the
    /// document becomes the first source
    pub fn from_document(document: PolicyDocument) -> Self {
        let attributes = document.attributes.clone();
        Self {
            attributes,
            sources: vec![Arc::new(document)],
        }
    }

    /// Set an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.set(name, value);
        self
    }

    /// Set several attributes at once
    pub fn with_attributes<I, K, V>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.attributes
            .extend(attributes.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add a policy source
    pub fn with_source<S: PolicySource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Arc::new(source));
        self
    }

    /// Add a shared policy source
    pub fn with_shared_source(mut self, source: SharedSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Add a function-based policy source
    pub fn with_source_fn<F>(self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Attributes) -> PolicySet + Send + Sync + 'static,
    {
        self.with_source(FnSource::new(name, func))
    }

    /// Declare a single named policy
    ///
    /// Takes its place in the source order like any other source.
    pub fn with_policy(self, name: impl Into<String>, value: impl Into<PolicyValue>) -> Self {
        self.with_source(DeclaredPolicy::new(name, value))
    }

    /// Get the names of all sources, in registration order
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Build the authorization context
    pub fn build(self) -> Authorizator {
        Authorizator::from_config(self)
    }
}

impl std::fmt::Debug for AuthorizatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizatorConfig")
            .field("attributes", &self.attributes)
            .field("sources", &self.source_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = AuthorizatorConfig::default();
        assert!(config.attributes.is_empty());
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_source_order() {
        let config = AuthorizatorConfig::new()
            .with_source_fn("roles", |_: &Attributes| PolicySet::new())
            .with_policy("login", true)
            .with_source_fn("features", |_: &Attributes| PolicySet::new());

        assert_eq!(config.source_names(), vec!["roles", "login", "features"]);
    }

    #[test]
    fn test_attributes() {
        let config = AuthorizatorConfig::new()
            .with_attribute("user", "Me")
            .with_attributes([("role", "admin"), ("user", "You")]);

        assert_eq!(config.attributes.get_str("user"), Some("You"));
        assert_eq!(config.attributes.get_str("role"), Some("admin"));
    }

    #[test]
    fn test_from_document() {
        let document =
            PolicyDocument::from_json(r#"{ "attributes": { "user": "fede" }, "policies": { "read": true } }"#)
                .unwrap();
        let config = AuthorizatorConfig::from_document(document);

        assert_eq!(config.attributes.get_str("user"), Some("fede"));
        assert_eq!(config.source_names(), vec!["document"]);
    }
}
