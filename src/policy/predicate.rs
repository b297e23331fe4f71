//! Predicate trait and callable normalization
//!
//! Contains:
//! - `Predicate` trait - the uniform callable contract
//! - `IntoOutcome` - what a predicate body may return
//! - `PolicyValue` - the source forms a policy can be declared in
//! - `normalize` - turns a `PolicyValue` into a list of predicates

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::core::{Arguments, PolicyResult};

/// Trait for predicate implementations
///
/// A predicate receives the argument bag of the current check and produces an
/// outcome. Only an outcome of exactly `true` grants the permission.
pub trait Predicate: Send + Sync {
    /// Evaluate the predicate against the argument bag
    fn call(&self, args: &Arguments) -> PolicyResult<Value>;
}

/// Implement Predicate for closures over the argument bag
///
/// Uses Higher-Ranked Trait Bounds (HRTB) so the closure works with any
/// lifetime of `Arguments`.
impl<F, R> Predicate for F
where
    F: for<'a> Fn(&'a Arguments) -> R + Send + Sync,
    R: IntoOutcome,
{
    fn call(&self, args: &Arguments) -> PolicyResult<Value> {
        (self)(args).into_outcome()
    }
}

/// Type alias for stored predicates
pub type ArcPredicate = Arc<dyn Predicate>;

/// Conversion from a predicate body's return value into an outcome
pub trait IntoOutcome {
    /// Convert into the raw outcome value
    fn into_outcome(self) -> PolicyResult<Value>;
}

impl IntoOutcome for bool {
    fn into_outcome(self) -> PolicyResult<Value> {
        Ok(Value::Bool(self))
    }
}

impl IntoOutcome for Value {
    fn into_outcome(self) -> PolicyResult<Value> {
        Ok(self)
    }
}

impl<T: IntoOutcome> IntoOutcome for PolicyResult<T> {
    fn into_outcome(self) -> PolicyResult<Value> {
        self.and_then(IntoOutcome::into_outcome)
    }
}

/// Truthiness of a constant: only `null` and `false` are falsy
pub fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

/// Strict grant check on an outcome
pub fn is_granted(outcome: &Value) -> bool {
    matches!(outcome, Value::Bool(true))
}

// ============================================================================
// PolicyValue - declared (un-normalized) policy forms
// ============================================================================

/// A policy as declared by a source, before normalization
///
/// # Example
///
/// ```ignore
/// let admin = PolicyValue::from(true);
/// let login = PolicyValue::predicate(|args: &Arguments| {
///     Ok::<_, PolicyError>(args.require("user")? == args.require("pass")?)
/// });
/// let ready = PolicyValue::nullary(|| true);
/// let both = PolicyValue::all([admin.clone(), ready.clone()]);
/// ```
#[derive(Clone)]
pub enum PolicyValue {
    /// A non-invocable value, judged by truthiness
    Constant(Value),
    /// An invocable predicate
    Callable(ArcPredicate),
    /// A sequence of policies that must all hold
    All(Vec<PolicyValue>),
}

impl PolicyValue {
    /// A constant policy
    pub fn constant(value: impl Into<Value>) -> Self {
        PolicyValue::Constant(value.into())
    }

    /// A predicate that receives the argument bag
    pub fn predicate<P: Predicate + 'static>(predicate: P) -> Self {
        PolicyValue::Callable(Arc::new(predicate))
    }

    /// A shared predicate
    pub fn shared(predicate: ArcPredicate) -> Self {
        PolicyValue::Callable(predicate)
    }

    /// A zero-argument callable; the argument bag is ignored
    pub fn nullary<F, R>(func: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: IntoOutcome,
    {
        Self::predicate(move |_: &Arguments| func())
    }

    /// A sequence of policies, AND-combined at resolution time
    pub fn all(values: impl IntoIterator<Item = PolicyValue>) -> Self {
        PolicyValue::All(values.into_iter().collect())
    }
}

impl From<bool> for PolicyValue {
    fn from(value: bool) -> Self {
        PolicyValue::Constant(Value::Bool(value))
    }
}

impl From<Value> for PolicyValue {
    fn from(value: Value) -> Self {
        PolicyValue::Constant(value)
    }
}

impl From<ArcPredicate> for PolicyValue {
    fn from(predicate: ArcPredicate) -> Self {
        PolicyValue::Callable(predicate)
    }
}

impl<T: Into<PolicyValue>> From<Vec<T>> for PolicyValue {
    fn from(values: Vec<T>) -> Self {
        PolicyValue::All(values.into_iter().map(Into::into).collect())
    }
}

impl fmt::Debug for PolicyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyValue::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            PolicyValue::Callable(_) => f.write_str("Callable(..)"),
            PolicyValue::All(values) => f.debug_tuple("All").field(values).finish(),
        }
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Predicate wrapping a constant, judged by truthiness
struct ConstantPredicate(bool);

impl Predicate for ConstantPredicate {
    fn call(&self, _args: &Arguments) -> PolicyResult<Value> {
        Ok(Value::Bool(self.0))
    }
}

/// Predicate for a nested sequence: every member must be exactly `true`
struct AllPredicate(Vec<ArcPredicate>);

impl Predicate for AllPredicate {
    fn call(&self, args: &Arguments) -> PolicyResult<Value> {
        if self.0.is_empty() {
            return Ok(Value::Bool(false));
        }
        for predicate in &self.0 {
            if !is_granted(&predicate.call(args)?) {
                return Ok(Value::Bool(false));
            }
        }
        Ok(Value::Bool(true))
    }
}

/// Normalize a single value into one predicate
pub fn normalize_one(value: PolicyValue) -> ArcPredicate {
    match value {
        PolicyValue::Constant(value) => Arc::new(ConstantPredicate(is_truthy(&value))),
        PolicyValue::Callable(predicate) => predicate,
        PolicyValue::All(values) => {
            Arc::new(AllPredicate(values.into_iter().map(normalize_one).collect()))
        }
    }
}

/// Normalize a declared policy into the list stored in the policy table
///
/// Scalars and callables become a one-element list; a top-level sequence is
/// normalized element by element and keeps its length.
pub fn normalize(value: PolicyValue) -> Vec<ArcPredicate> {
    match value {
        PolicyValue::All(values) => values.into_iter().map(normalize_one).collect(),
        other => vec![normalize_one(other)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PolicyError;
    use serde_json::json;

    struct Action(Value);

    impl Predicate for Action {
        fn call(&self, _args: &Arguments) -> PolicyResult<Value> {
            Ok(self.0.clone())
        }
    }

    fn eval(predicates: &[ArcPredicate], args: &Arguments) -> Vec<Value> {
        predicates.iter().map(|p| p.call(args).unwrap()).collect()
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(0)));
        assert!(is_truthy(&json!("")));
        assert!(is_truthy(&json!([])));
    }

    #[test]
    fn test_constants_use_truthiness() {
        let args = Arguments::new();

        assert_eq!(eval(&normalize(true.into()), &args), vec![json!(true)]);
        assert_eq!(eval(&normalize(false.into()), &args), vec![json!(false)]);
        assert_eq!(eval(&normalize(json!(1).into()), &args), vec![json!(true)]);
        assert_eq!(eval(&normalize(Value::Null.into()), &args), vec![json!(false)]);
    }

    #[test]
    fn test_callables_keep_raw_outcome() {
        let args = Arguments::new();

        let action = normalize(PolicyValue::predicate(Action(json!("yes"))));
        assert_eq!(eval(&action, &args), vec![json!("yes")]);

        let nullary = normalize(PolicyValue::nullary(|| json!(1)));
        assert_eq!(eval(&nullary, &args), vec![json!(1)]);
    }

    #[test]
    fn test_nullary_ignores_extra_arguments() {
        let args = Arguments::new().with("unused", 1).with("other", "x");
        let predicates = normalize(PolicyValue::nullary(|| true));

        assert_eq!(eval(&predicates, &args), vec![json!(true)]);
    }

    #[test]
    fn test_predicate_receives_arguments() {
        let predicates = normalize(PolicyValue::predicate(|args: &Arguments| {
            args.iter().all(|(k, v)| v.as_str() == Some(k))
        }));

        let matching = Arguments::new().with("a", "a").with("b", "b");
        let mismatched = Arguments::new().with("a", "a").with("c", "a");

        assert_eq!(eval(&predicates, &matching), vec![json!(true)]);
        assert_eq!(eval(&predicates, &mismatched), vec![json!(false)]);
    }

    #[test]
    fn test_predicate_errors_propagate() {
        let predicates = normalize(PolicyValue::predicate(|args: &Arguments| {
            Ok::<_, PolicyError>(args.require("a")? == args.require("b")?)
        }));

        let err = predicates[0].call(&Arguments::new().with("a", 1)).unwrap_err();
        assert!(matches!(err, PolicyError::MissingArgument { .. }));
    }

    #[test]
    fn test_sequence_keeps_elements() {
        let value = PolicyValue::all([
            true.into(),
            PolicyValue::nullary(|| true),
            false.into(),
        ]);
        let predicates = normalize(value);

        assert_eq!(predicates.len(), 3);
        assert_eq!(
            eval(&predicates, &Arguments::new()),
            vec![json!(true), json!(true), json!(false)]
        );
    }

    #[test]
    fn test_nested_sequence_is_strict() {
        let nested = PolicyValue::all([
            true.into(),
            PolicyValue::all([true.into(), PolicyValue::nullary(|| json!("truthy"))]),
        ]);
        let predicates = normalize(nested);

        assert_eq!(predicates.len(), 2);
        assert_eq!(
            eval(&predicates, &Arguments::new()),
            vec![json!(true), json!(false)]
        );
    }

    #[test]
    fn test_from_vec() {
        let value: PolicyValue = vec![true, false].into();
        assert!(matches!(value, PolicyValue::All(ref v) if v.len() == 2));
    }
}
