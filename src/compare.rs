//! Typed comparison of [`Value`]s.
//!
//! Everything is built on two primitives: [`equals`] and [`order`]. The six
//! operators are derived from them, so for any pair `a`, `b`:
//!
//! - `lt(a, b) == gt(b, a)`
//! - `ne(a, b) == !eq(a, b)`
//! - `le(a, b) == lt(a, b) || eq(a, b)`, and likewise for `ge`, whenever the
//!   pair can be ordered. A regex has no ordering, so `<=` and `>=` against
//!   one are `false` even when `==` (a match) holds.
//!
//! Pairs with no sensible ordering (a regex against a number, text that
//! doesn't parse as the other side's type) answer `false` to every operator
//! except `!=`.
//!
//! Untyped `Any` text is coerced to the type of the other operand:
//!
//! | other side | coercion |
//! |------------|----------|
//! | `Any`, `String` | none, lexicographic |
//! | `Integer` | integer literal syntax (`0x..`, `_`), `13.0` is not an integer |
//! | `Double` | decimal, then integer syntax |
//! | `DateTime` | the coercion date layouts |
//! | `Regexp` | `==` means "the regex matches the text" |

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

use crate::ast::Operator;
use crate::datetime::{COERCION_FORMATS, parse_date_time};
use crate::environment::Environment;
use crate::value::{Value, parse_decimal, parse_integer};

/// Resolves both operands against `env` and applies `op`.
pub fn compare(env: &Environment, op: Operator, left: &Value, right: &Value) -> bool {
    let left = env.resolve(left);
    let right = env.resolve(right);
    apply(op, &left, &right)
}

/// Applies `op` to two already-resolved values.
pub fn apply(op: Operator, left: &Value, right: &Value) -> bool {
    let result = match op {
        Operator::LessThan => lt(left, right),
        Operator::LessEqual => le(left, right),
        Operator::Equal => eq(left, right),
        Operator::NotEqual => ne(left, right),
        Operator::GreaterEqual => ge(left, right),
        Operator::GreaterThan => gt(left, right),
    };
    tracing::trace!(
        left = %left,
        left_kind = left.kind(),
        op = %op,
        right = %right,
        right_kind = right.kind(),
        result,
        "compare"
    );
    result
}

pub fn lt(left: &Value, right: &Value) -> bool {
    order(left, right) == Some(Ordering::Less)
}

pub fn gt(left: &Value, right: &Value) -> bool {
    order(left, right) == Some(Ordering::Greater)
}

pub fn le(left: &Value, right: &Value) -> bool {
    matches!(order(left, right), Some(Ordering::Less | Ordering::Equal))
}

pub fn ge(left: &Value, right: &Value) -> bool {
    matches!(order(left, right), Some(Ordering::Greater | Ordering::Equal))
}

pub fn eq(left: &Value, right: &Value) -> bool {
    equals(left, right)
}

pub fn ne(left: &Value, right: &Value) -> bool {
    !equals(left, right)
}

/// Equality, including regex matching. Everything that is not about regular
/// expressions is equal exactly when [`order`] says `Equal`.
pub fn equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Regexp(a), Value::Regexp(b)) => a == b,
        (Value::Regexp(re), Value::String { value: text, .. })
        | (Value::String { value: text, .. }, Value::Regexp(re))
        | (Value::Regexp(re), Value::Any(text))
        | (Value::Any(text), Value::Regexp(re)) => re.is_match(text),
        _ => order(left, right) == Some(Ordering::Equal),
    }
}

/// Ordering of two resolved values, `None` when they can't be ordered.
///
/// References and keywords must be resolved first; unresolved ones never
/// order.
pub fn order(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        // Untyped text against text
        (Value::Any(a), Value::Any(b)) => Some(a.as_str().cmp(b.as_str())),
        (Value::Any(a), Value::String { value: b, .. }) => Some(a.as_str().cmp(b.as_str())),
        (Value::String { value: a, .. }, Value::Any(b)) => Some(a.as_str().cmp(b.as_str())),

        // Untyped text coerced to the other side
        (Value::Any(a), Value::Integer { value: b, .. }) => coerce_integer(a).map(|a| a.cmp(b)),
        (Value::Integer { value: a, .. }, Value::Any(b)) => coerce_integer(b).map(|b| a.cmp(&b)),
        (Value::Any(a), Value::Double { value: b, .. }) => coerce_decimal(a).map(|a| a.cmp(b)),
        (Value::Double { value: a, .. }, Value::Any(b)) => coerce_decimal(b).map(|b| a.cmp(&b)),
        (Value::Any(a), Value::DateTime { value: b, .. }) => coerce_datetime(a).map(|a| a.cmp(b)),
        (Value::DateTime { value: a, .. }, Value::Any(b)) => coerce_datetime(b).map(|b| a.cmp(&b)),

        // Same type
        (Value::String { value: a, .. }, Value::String { value: b, .. }) => Some(a.cmp(b)),
        (Value::Integer { value: a, .. }, Value::Integer { value: b, .. }) => Some(a.cmp(b)),
        (Value::Double { value: a, .. }, Value::Double { value: b, .. }) => Some(a.cmp(b)),
        (Value::DateTime { value: a, .. }, Value::DateTime { value: b, .. }) => Some(a.cmp(b)),

        // Integer promoted to decimal
        (Value::Integer { value: a, .. }, Value::Double { value: b, .. }) => {
            Some(Decimal::from(*a).cmp(b))
        }
        (Value::Double { value: a, .. }, Value::Integer { value: b, .. }) => {
            Some(a.cmp(&Decimal::from(*b)))
        }

        // Regular expressions only ever test for equality
        (
            Value::Regexp(_),
            Value::String { .. }
            | Value::Integer { .. }
            | Value::Double { .. }
            | Value::DateTime { .. },
        )
        | (Value::Regexp(_), Value::Regexp(_) | Value::Any(_))
        | (Value::Any(_), Value::Regexp(_)) => None,

        // Typed literals of different kinds
        (
            Value::String { .. },
            Value::Integer { .. }
            | Value::Double { .. }
            | Value::DateTime { .. }
            | Value::Regexp(_),
        )
        | (Value::Integer { .. }, Value::String { .. } | Value::DateTime { .. } | Value::Regexp(_))
        | (Value::Double { .. }, Value::String { .. } | Value::DateTime { .. } | Value::Regexp(_))
        | (
            Value::DateTime { .. },
            Value::String { .. } | Value::Integer { .. } | Value::Double { .. } | Value::Regexp(_),
        ) => None,

        // Unresolved
        (Value::Var(_) | Value::Keyword(_), _) | (_, Value::Var(_) | Value::Keyword(_)) => None,
    }
}

fn coerce_integer(text: &str) -> Option<i64> {
    let coerced = parse_integer(text);
    if coerced.is_none() {
        tracing::debug!(text, "text is not an integer");
    }
    coerced
}

fn coerce_decimal(text: &str) -> Option<Decimal> {
    let coerced = parse_decimal(text)
        .ok()
        .or_else(|| parse_integer(text).map(Decimal::from));
    if coerced.is_none() {
        tracing::debug!(text, "text is not a decimal");
    }
    coerced
}

fn coerce_datetime(text: &str) -> Option<DateTime<FixedOffset>> {
    let coerced = parse_date_time(COERCION_FORMATS, text);
    if coerced.is_none() {
        tracing::debug!(text, "text is not a date");
    }
    coerced
}
