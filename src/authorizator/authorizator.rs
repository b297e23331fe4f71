//! Authorization context
//!
//! An `Authorizator` is created once per check subject (a user, a session)
//! and answers permission checks for it.

use std::fmt;
use std::sync::OnceLock;

use serde_json::Value;

use super::config::AuthorizatorConfig;
use crate::core::{Arguments, Attributes, PolicyResult};
use crate::policy::{PolicyTable, SharedSource};
use crate::resolver::Resolver;

/// Authorization context for one subject
///
/// Owns the subject's attributes and policy sources. The policy table is
/// built from them on first use and kept for the lifetime of the context;
/// concurrent first checks build it once.
///
/// # Example
///
/// ```ignore
/// let authorizator = AuthorizatorConfig::new()
///     .with_attribute("user", "Me")
///     .with_source(UserPolicies)
///     .build();
///
/// if authorizator.is_allowed("edit_post", &Arguments::new().with("post_owner", "Me"))? {
///     // ...
/// }
///
/// authorizator.run_if_allowed("delete_post", &args, || delete(post))?;
/// ```
pub struct Authorizator {
    attributes: Attributes,
    sources: Vec<SharedSource>,
    table: OnceLock<PolicyTable>,
}

impl Authorizator {
    /// Create a context with no attributes and no sources
    pub fn new() -> Self {
        Self::from_config(AuthorizatorConfig::default())
    }

    /// Create a context from a configuration
    pub fn from_config(config: AuthorizatorConfig) -> Self {
        Self {
            attributes: config.attributes,
            sources: config.sources,
            table: OnceLock::new(),
        }
    }

    /// Get the policy table, building it on first access
    pub fn policies(&self) -> &PolicyTable {
        self.table
            .get_or_init(|| PolicyTable::build(&self.sources, &self.attributes))
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self.policies())
    }

    // --- Decisions ---

    /// Check a permission; every predicate of the policy must grant
    ///
    /// Returns `Ok(false)` for a denial and
    /// `Err(PolicyError::UnknownPermission)` for a name that is neither a
    /// policy nor a compound name.
    pub fn is_allowed(&self, permission: &str, args: &Arguments) -> PolicyResult<bool> {
        let allowed = self.resolver().resolve(permission, args)?;
        tracing::debug!("[Authorizator] '{}' -> {}", permission, allowed);
        Ok(allowed)
    }

    /// Check a permission; any predicate of the policy may grant
    pub fn is_allowed_any(&self, permission: &str, args: &Arguments) -> PolicyResult<bool> {
        let allowed = self.resolver().resolve_any(permission, args)?;
        tracing::debug!("[Authorizator] '{}' (any) -> {}", permission, allowed);
        Ok(allowed)
    }

    /// Check that every permission in the list is granted
    ///
    /// Stops at the first denial. An empty list holds vacuously.
    pub fn is_allowed_all<I, S>(&self, permissions: I, args: &Arguments) -> PolicyResult<bool>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let resolver = self.resolver();

        for permission in permissions {
            if !resolver.resolve(permission.as_ref(), args)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Check that at least one permission in the list is granted
    ///
    /// Stops at the first grant.
    pub fn is_allowed_any_of<I, S>(&self, permissions: I, args: &Arguments) -> PolicyResult<bool>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let resolver = self.resolver();

        for permission in permissions {
            if resolver.resolve(permission.as_ref(), args)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    // --- Conditional execution ---
    //
    // Each helper returns `Ok(Some(output))` when the action ran and
    // `Ok(None)` when it did not. Errors are never swallowed.

    /// Run `action` if the permission is granted
    pub fn run_if_allowed<T, F>(
        &self,
        permission: &str,
        args: &Arguments,
        action: F,
    ) -> PolicyResult<Option<T>>
    where
        F: FnOnce() -> T,
    {
        Ok(self.is_allowed(permission, args)?.then(action))
    }

    /// Run `action` if the permission is denied
    pub fn run_unless_allowed<T, F>(
        &self,
        permission: &str,
        args: &Arguments,
        action: F,
    ) -> PolicyResult<Option<T>>
    where
        F: FnOnce() -> T,
    {
        Ok((!self.is_allowed(permission, args)?).then(action))
    }

    /// Run `action` if every permission is granted
    pub fn run_if_all<I, S, T, F>(
        &self,
        permissions: I,
        args: &Arguments,
        action: F,
    ) -> PolicyResult<Option<T>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnOnce() -> T,
    {
        Ok(self.is_allowed_all(permissions, args)?.then(action))
    }

    /// Run `action` unless every permission is granted
    pub fn run_unless_all<I, S, T, F>(
        &self,
        permissions: I,
        args: &Arguments,
        action: F,
    ) -> PolicyResult<Option<T>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnOnce() -> T,
    {
        Ok((!self.is_allowed_all(permissions, args)?).then(action))
    }

    /// Run `action` if at least one permission is granted
    pub fn run_if_any<I, S, T, F>(
        &self,
        permissions: I,
        args: &Arguments,
        action: F,
    ) -> PolicyResult<Option<T>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnOnce() -> T,
    {
        Ok(self.is_allowed_any_of(permissions, args)?.then(action))
    }

    /// Run `action` if no permission is granted
    pub fn run_unless_any<I, S, T, F>(
        &self,
        permissions: I,
        args: &Arguments,
        action: F,
    ) -> PolicyResult<Option<T>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnOnce() -> T,
    {
        Ok((!self.is_allowed_any_of(permissions, args)?).then(action))
    }

    // --- Attributes ---

    /// Get an attribute
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Get all attributes
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Get the names of all sources, in registration order
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }
}

impl Default for Authorizator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Authorizator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorizator")
            .field("attributes", &self.attributes)
            .field("sources", &self.source_names())
            .field("built", &self.table.get().is_some())
            .finish()
    }
}
