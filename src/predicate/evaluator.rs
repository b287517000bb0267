use super::{FieldPath, PredicateExpression};
use serde_json::Value;
use std::borrow::Cow;

/// Resolves a dotted field path against an element under test.
///
/// `None` means the path is missing. Implemented for `serde_json::Value`;
/// other implementations let callers evaluate predicates over their own
/// element representations.
pub trait FieldLookup {
    fn lookup(&self, path: &FieldPath) -> Option<&Value>;
}

impl FieldLookup for Value {
    /// Plain object walk. An array or scalar in the middle of the path is
    /// treated as missing.
    fn lookup(&self, path: &FieldPath) -> Option<&Value> {
        path.segments()
            .iter()
            .try_fold(self, |current, name| current.as_object()?.get(name))
    }
}

/// Evaluate `predicate` against `element`.
///
/// Never fails: missing or wrong-typed fields make `Equals` and `Empty` false.
/// `and` / `or` short-circuit, so the right operand is not looked at when the
/// left one already decides the result.
pub fn evaluate<L>(element: &L, predicate: &PredicateExpression) -> bool
where
    L: FieldLookup + ?Sized,
{
    match predicate {
        PredicateExpression::Equals { path, literal } => element
            .lookup(path)
            .and_then(scalar_text)
            .is_some_and(|text| text == literal.as_str()),
        PredicateExpression::Exists { path } => element.lookup(path).is_some(),
        PredicateExpression::Empty { path } => match element.lookup(path) {
            Some(Value::String(s)) => s.is_empty(),
            Some(Value::Array(items)) => items.is_empty(),
            _ => false,
        },
        PredicateExpression::And { left, right } => {
            evaluate(element, left) && evaluate(element, right)
        }
        PredicateExpression::Or { left, right } => {
            evaluate(element, left) || evaluate(element, right)
        }
    }
}

fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
