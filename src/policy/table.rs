//! Policy table
//!
//! The merged, normalized mapping from permission name to predicates. Built
//! once per `Authorizator` and read-only afterwards.

use std::collections::HashMap;
use std::fmt;

use super::predicate::{normalize, ArcPredicate};
use super::source::SharedSource;
use crate::core::Attributes;

/// Permission name → normalized predicates
#[derive(Clone, Default)]
pub struct PolicyTable {
    entries: HashMap<String, Vec<ArcPredicate>>,
}

impl PolicyTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table by merging sources in registration order
    ///
    /// On a name collision the later source's entry replaces the earlier one
    /// entirely. No sources yields an empty table.
    pub fn build(sources: &[SharedSource], attributes: &Attributes) -> Self {
        let mut entries: HashMap<String, Vec<ArcPredicate>> = HashMap::new();

        for source in sources {
            let set = source.policies(attributes);
            tracing::debug!(
                "[PolicyTable] Merging source '{}' ({} policies)",
                source.name(),
                set.len()
            );

            for (name, value) in set {
                if entries.contains_key(&name) {
                    tracing::debug!(
                        "[PolicyTable] Policy '{}' overridden by source '{}'",
                        name,
                        source.name()
                    );
                }
                entries.insert(name, normalize(value));
            }
        }

        tracing::info!(
            "[PolicyTable] Built {} policies from {} sources",
            entries.len(),
            sources.len()
        );

        Self { entries }
    }

    /// Get the predicates stored for a permission
    pub fn get(&self, name: &str) -> Option<&[ArcPredicate]> {
        self.entries.get(name).map(|v| v.as_slice())
    }

    /// Check if a permission is a direct key
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Get all permission names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Number of policies
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for PolicyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for name in self.names() {
            map.entry(&name, &self.entries[name].len());
        }
        map.finish()
    }
}
