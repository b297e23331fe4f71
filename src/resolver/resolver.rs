//! Permission resolver
//!
//! Looks permissions up in a `PolicyTable`, evaluates their predicates and
//! falls back to compound-name decomposition for names that are not keys.

use super::compound::Compound;
use crate::core::{Arguments, PolicyError, PolicyResult};
use crate::policy::{is_granted, ArcPredicate, PolicyTable};

/// How the predicates of one policy are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Every predicate must grant
    All,
    /// At least one predicate must grant
    Any,
}

/// Resolves permissions against a policy table
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'t> {
    table: &'t PolicyTable,
}

impl<'t> Resolver<'t> {
    /// Create a resolver over a table
    pub fn new(table: &'t PolicyTable) -> Self {
        Self { table }
    }

    /// Resolve a permission with AND semantics over its predicates
    ///
    /// Only an outcome of exactly `true` counts. A policy with no predicates
    /// is denied. Names that are neither keys nor compound names fail with
    /// `PolicyError::UnknownPermission`.
    pub fn resolve(&self, permission: &str, args: &Arguments) -> PolicyResult<bool> {
        self.resolve_with(permission, args, Mode::All)
    }

    /// Resolve a permission with OR semantics over its predicates
    ///
    /// Compound names decompose exactly as in `resolve`.
    pub fn resolve_any(&self, permission: &str, args: &Arguments) -> PolicyResult<bool> {
        self.resolve_with(permission, args, Mode::Any)
    }

    fn resolve_with(&self, permission: &str, args: &Arguments, mode: Mode) -> PolicyResult<bool> {
        if let Some(predicates) = self.table.get(permission) {
            let granted = evaluate(predicates, args, mode)?;
            tracing::trace!(
                "[Resolver] '{}' ({:?} of {}) -> {}",
                permission,
                mode,
                predicates.len(),
                granted
            );
            return Ok(granted);
        }

        let compound = match Compound::parse(permission) {
            Some(compound) => compound,
            None => return Err(PolicyError::UnknownPermission(permission.to_string())),
        };

        tracing::trace!("[Resolver] Decomposing '{}' as {:?}", permission, compound);

        match compound {
            Compound::Any(names) => {
                for name in names {
                    if self.resolve(name, args)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Compound::All(names) => {
                for name in names {
                    if !self.resolve(name, args)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Compound::Not(name) => Ok(!self.resolve(name, args)?),
        }
    }
}

/// Evaluate the predicates of a single policy, short-circuiting
fn evaluate(predicates: &[ArcPredicate], args: &Arguments, mode: Mode) -> PolicyResult<bool> {
    if predicates.is_empty() {
        return Ok(false);
    }

    for predicate in predicates {
        let granted = is_granted(&predicate.call(args)?);
        match (mode, granted) {
            (Mode::All, false) => return Ok(false),
            (Mode::Any, true) => return Ok(true),
            _ => {}
        }
    }

    Ok(mode == Mode::All)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Attributes;
    use crate::policy::{FnSource, PolicySet, PolicyValue, SharedSource};
    use serde_json::json;
    use std::sync::Arc;

    fn table(set: PolicySet) -> PolicyTable {
        let source: SharedSource = Arc::new(FnSource::new("test", move |_: &Attributes| {
            set.clone()
        }));
        PolicyTable::build(&[source], &Attributes::new())
    }

    fn numbers() -> PolicyTable {
        table(
            PolicySet::new()
                .policy("one", true)
                .policy("two", true)
                .policy("three", false)
                .policy("four", false),
        )
    }

    fn no_args() -> Arguments {
        Arguments::new()
    }

    #[test]
    fn test_unknown_permission_on_empty_table() {
        let table = PolicyTable::new();
        let err = Resolver::new(&table)
            .resolve("whatever", &no_args())
            .unwrap_err();
        assert!(matches!(err, PolicyError::UnknownPermission(ref name) if name == "whatever"));
    }

    #[test]
    fn test_direct_constants() {
        let table = numbers();
        let resolver = Resolver::new(&table);

        assert!(resolver.resolve("one", &no_args()).unwrap());
        assert!(!resolver.resolve("three", &no_args()).unwrap());
    }

    #[test]
    fn test_callable_outcomes() {
        let table = table(
            PolicySet::new()
                .policy("can_lambda", PolicyValue::predicate(|_: &Arguments| true))
                .policy("cant_lambda", PolicyValue::predicate(|_: &Arguments| false))
                .policy("can_nullary", PolicyValue::nullary(|| true))
                .policy("truthy", PolicyValue::nullary(|| json!("yes"))),
        );
        let resolver = Resolver::new(&table);

        assert!(resolver.resolve("can_lambda", &no_args()).unwrap());
        assert!(!resolver.resolve("cant_lambda", &no_args()).unwrap());
        assert!(resolver.resolve("can_nullary", &no_args()).unwrap());
        assert!(!resolver.resolve("truthy", &no_args()).unwrap());
    }

    #[test]
    fn test_lists_are_and_combined() {
        let table = table(
            PolicySet::new()
                .policy(
                    "can_array",
                    PolicyValue::all([true.into(), PolicyValue::nullary(|| true), true.into()]),
                )
                .policy("cant_array", vec![true, false, true])
                .policy("empty", PolicyValue::all([])),
        );
        let resolver = Resolver::new(&table);

        assert!(resolver.resolve("can_array", &no_args()).unwrap());
        assert!(!resolver.resolve("cant_array", &no_args()).unwrap());
        assert!(!resolver.resolve("empty", &no_args()).unwrap());
    }

    #[test]
    fn test_resolve_any_is_or_combined() {
        let table = table(
            PolicySet::new()
                .policy("mixed", vec![false, true])
                .policy("none", vec![false, false])
                .policy("empty", PolicyValue::all([])),
        );
        let resolver = Resolver::new(&table);

        assert!(resolver.resolve_any("mixed", &no_args()).unwrap());
        assert!(!resolver.resolve("mixed", &no_args()).unwrap());
        assert!(!resolver.resolve_any("none", &no_args()).unwrap());
        assert!(!resolver.resolve_any("empty", &no_args()).unwrap());
        assert!(resolver
            .resolve_any("missing", &no_args())
            .unwrap_err()
            .is_unknown_permission());
    }

    #[test]
    fn test_truthy_callable_in_list_is_not_granted() {
        let table = table(PolicySet::new().policy(
            "list",
            PolicyValue::all([true.into(), PolicyValue::nullary(|| json!(1))]),
        ));
        let resolver = Resolver::new(&table);

        assert!(!resolver.resolve("list", &no_args()).unwrap());
    }

    #[test]
    fn test_truthy_constant_is_granted() {
        let table = table(PolicySet::new().policy("constant", json!(1)));
        assert!(Resolver::new(&table).resolve("constant", &no_args()).unwrap());
    }

    #[test]
    fn test_and_decomposition() {
        let table = numbers();
        let resolver = Resolver::new(&table);

        assert!(resolver.resolve("one_and_two", &no_args()).unwrap());
        assert!(!resolver.resolve("one_and_three", &no_args()).unwrap());
    }

    #[test]
    fn test_or_decomposition() {
        let table = numbers();
        let resolver = Resolver::new(&table);

        assert!(resolver.resolve("one_or_two", &no_args()).unwrap());
        assert!(resolver.resolve("three_or_one", &no_args()).unwrap());
        assert!(!resolver.resolve("three_or_four", &no_args()).unwrap());
    }

    #[test]
    fn test_not_decomposition() {
        let table = numbers();
        let resolver = Resolver::new(&table);

        assert!(resolver.resolve("not_three", &no_args()).unwrap());
        assert!(!resolver.resolve("not_one", &no_args()).unwrap());
        assert!(resolver.resolve("not_not_one", &no_args()).unwrap());
    }

    #[test]
    fn test_mixed_precedence() {
        let table = numbers();
        let resolver = Resolver::new(&table);

        // (one AND two) OR three
        assert!(resolver.resolve("one_and_two_or_three", &no_args()).unwrap());
        // (one AND three) OR four
        assert!(!resolver.resolve("one_and_three_or_four", &no_args()).unwrap());
        // three OR (one AND two)
        assert!(resolver.resolve("three_or_one_and_two", &no_args()).unwrap());
        // (NOT three) AND one
        assert!(resolver.resolve("not_three_and_one", &no_args()).unwrap());
    }

    #[test]
    fn test_direct_key_beats_decomposition() {
        let table = table(
            PolicySet::new()
                .policy("one", true)
                .policy("two", true)
                .policy("one_and_two", false)
                .policy("one_or_two", false),
        );
        let resolver = Resolver::new(&table);

        assert!(!resolver.resolve("one_and_two", &no_args()).unwrap());
        assert!(!resolver.resolve("one_or_two", &no_args()).unwrap());
    }

    #[test]
    fn test_unknown_component_propagates() {
        let table = numbers();
        let resolver = Resolver::new(&table);

        let err = resolver.resolve("one_and_five", &no_args()).unwrap_err();
        assert!(matches!(err, PolicyError::UnknownPermission(ref name) if name == "five"));

        let err = resolver.resolve("not_five", &no_args()).unwrap_err();
        assert!(err.is_unknown_permission());
    }

    #[test]
    fn test_short_circuit_skips_unknown_components() {
        let table = numbers();
        let resolver = Resolver::new(&table);

        assert!(!resolver.resolve("three_and_five", &no_args()).unwrap());
        assert!(resolver.resolve("one_or_five", &no_args()).unwrap());
    }

    #[test]
    fn test_arguments_pass_through() {
        let table = table(
            PolicySet::new()
                .policy(
                    "login",
                    PolicyValue::predicate(|args: &Arguments| {
                        Ok::<_, PolicyError>(args.require("a")? == args.require("b")?)
                    }),
                )
                .policy(
                    "splat",
                    PolicyValue::predicate(|args: &Arguments| {
                        args.iter().all(|(k, v)| v.as_str() == Some(k))
                    }),
                ),
        );
        let resolver = Resolver::new(&table);

        let same = Arguments::new().with("a", 1).with("b", 1);
        let different = Arguments::new().with("a", 1).with("b", 2);
        assert!(resolver.resolve("login", &same).unwrap());
        assert!(!resolver.resolve("login", &different).unwrap());

        let splat = Arguments::new().with("a", "a").with("b", "b").with("c", "c");
        let bad_splat = Arguments::new().with("a", "a").with("b", "b").with("c", "a");
        assert!(resolver.resolve("splat", &splat).unwrap());
        assert!(!resolver.resolve("splat", &bad_splat).unwrap());
    }

    #[test]
    fn test_predicate_errors_propagate() {
        let table = table(PolicySet::new().policy(
            "login",
            PolicyValue::predicate(|args: &Arguments| {
                Ok::<_, PolicyError>(args.require("user")? == args.require("pass")?)
            }),
        ));
        let resolver = Resolver::new(&table);

        let err = resolver
            .resolve("login", &Arguments::new().with("user", "u"))
            .unwrap_err();
        assert!(matches!(err, PolicyError::MissingArgument { ref argument } if argument == "pass"));
    }
}
