//! Policy documents
//!
//! JSON configuration for policies that do not need code: constants, lists
//! and simple argument rules.
//!
//! ```json
//! {
//!   "attributes": { "user": "fede" },
//!   "policies": {
//!     "read": true,
//!     "write": [true, { "argument": "owner", "equals_attribute": "user" }],
//!     "beta": { "argument": "channel", "equals": "beta" }
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::predicate::{Predicate, PolicyValue};
use super::source::{PolicySet, PolicySource};
use crate::core::{Arguments, Attributes, PolicyError, PolicyResult};

/// A policy document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyDocument {
    /// Attributes seeded into the authorization context
    #[serde(default)]
    pub attributes: Attributes,

    /// Permission name → policy entry
    #[serde(default)]
    pub policies: HashMap<String, PolicyEntry>,
}

/// A policy entry in a document
///
/// Arrays are always lists; an object is a rule when it has exactly the rule
/// fields, otherwise a constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PolicyEntry {
    /// Entries that must all hold
    List(Vec<PolicyEntry>),
    /// Compare one argument of the check
    Rule(ArgumentRule),
    /// Constant, judged by truthiness
    Constant(Value),
}

/// Compares an argument against a fixed value or an attribute
///
/// Exactly one of `equals` / `equals_attribute` must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArgumentRule {
    /// Argument to read from the bag
    pub argument: String,

    /// Expected value; `null` is a value to compare against, not an absence
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub equals: Option<Value>,

    /// Attribute holding the expected value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals_attribute: Option<String>,
}

/// Keep a present field as `Some`, even when it is `null`
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl ArgumentRule {
    fn validate(&self, permission: &str) -> PolicyResult<()> {
        match (&self.equals, &self.equals_attribute) {
            (Some(_), None) | (None, Some(_)) => Ok(()),
            (Some(_), Some(_)) => Err(PolicyError::invalid_config(format!(
                "policy '{}': rule on '{}' sets both 'equals' and 'equals_attribute'",
                permission, self.argument
            ))),
            (None, None) => Err(PolicyError::invalid_config(format!(
                "policy '{}': rule on '{}' needs 'equals' or 'equals_attribute'",
                permission, self.argument
            ))),
        }
    }
}

impl PolicyDocument {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> PolicyResult<Self> {
        let document: PolicyDocument = serde_json::from_str(json)?;
        document.validate()?;
        Ok(document)
    }

    /// Load and validate a JSON document from disk
    pub fn load(path: impl AsRef<Path>) -> PolicyResult<Self> {
        let path = path.as_ref();
        tracing::debug!("[PolicyDocument] Loading {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check every rule in the document
    pub fn validate(&self) -> PolicyResult<()> {
        fn walk(permission: &str, entry: &PolicyEntry) -> PolicyResult<()> {
            match entry {
                PolicyEntry::Rule(rule) => rule.validate(permission),
                PolicyEntry::List(entries) => entries.iter().try_for_each(|e| walk(permission, e)),
                PolicyEntry::Constant(_) => Ok(()),
            }
        }

        self.policies
            .iter()
            .try_for_each(|(permission, entry)| walk(permission, entry))
    }
}

impl PolicySource for PolicyDocument {
    fn name(&self) -> &str {
        "document"
    }

    fn policies(&self, attributes: &Attributes) -> PolicySet {
        self.policies
            .iter()
            .map(|(name, entry)| (name.clone(), to_policy(entry, attributes)))
            .collect()
    }
}

fn to_policy(entry: &PolicyEntry, attributes: &Attributes) -> PolicyValue {
    match entry {
        PolicyEntry::Constant(value) => PolicyValue::Constant(value.clone()),
        PolicyEntry::List(entries) => {
            PolicyValue::all(entries.iter().map(|e| to_policy(e, attributes)))
        }
        PolicyEntry::Rule(rule) => {
            let expected = match (&rule.equals, &rule.equals_attribute) {
                (Some(value), _) => Expected::Value(value.clone()),
                (None, Some(name)) => Expected::Attribute {
                    name: name.clone(),
                    value: attributes.get(name).cloned(),
                },
                (None, None) => Expected::Missing,
            };
            PolicyValue::predicate(ArgumentPredicate {
                argument: rule.argument.clone(),
                expected,
            })
        }
    }
}

enum Expected {
    Value(Value),
    Attribute { name: String, value: Option<Value> },
    Missing,
}

struct ArgumentPredicate {
    argument: String,
    expected: Expected,
}

impl Predicate for ArgumentPredicate {
    fn call(&self, args: &Arguments) -> PolicyResult<Value> {
        let actual = args.require(&self.argument)?;
        let expected = match &self.expected {
            Expected::Value(value) => value,
            Expected::Attribute {
                value: Some(value), ..
            } => value,
            Expected::Attribute { name, value: None } => {
                return Err(PolicyError::invalid_config(format!(
                    "undefined attribute: {}",
                    name
                )))
            }
            Expected::Missing => {
                return Err(PolicyError::invalid_config(format!(
                    "rule on '{}' has nothing to compare",
                    self.argument
                )))
            }
        };
        Ok(Value::Bool(actual == expected))
    }
}
