//! Helpers over the engine's dynamic value type.
//!
//! Property values travel through the engine as [`serde_json::Value`]. Rules
//! and attributes only ever need two things from a value: its string form and
//! an ordering against a bound of the same kind.

use std::borrow::Cow;
use std::cmp::Ordering;

use serde_json::Value;

use crate::error::{EngineError, Result};

/// Returns the string form of a value, or `None` for null.
///
/// Strings are returned verbatim; every other value uses its JSON text
/// (`17`, `true`, `[1,2]`).
#[must_use]
pub fn stringify(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        other => Some(Cow::Owned(other.to_string())),
    }
}

/// Short name of a value's kind, used in error messages.
#[must_use]
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Orders `value` against `bound`.
///
/// Numbers compare with numbers, strings with strings and booleans with
/// booleans. Any other pairing has no ordering and is a usage error.
pub fn compare(value: &Value, bound: &Value) -> Result<Ordering> {
    let ordering = match (value, bound) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
                Some(a.cmp(&b))
            } else if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
                Some(a.cmp(&b))
            } else {
                match (a.as_f64(), b.as_f64()) {
                    (Some(a), Some(b)) => a.partial_cmp(&b),
                    _ => None,
                }
            }
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    };

    ordering.ok_or_else(|| EngineError::NotComparable {
        value: kind_name(value),
        bound: kind_name(bound),
    })
}

/// Returns true when `min <= value <= max`.
pub fn within(value: &Value, min: &Value, max: &Value) -> Result<bool> {
    Ok(compare(value, min)? != Ordering::Less && compare(value, max)? != Ordering::Greater)
}

/// Joins the non-empty messages with `separator` and trims the result.
pub fn join_messages<I, S>(messages: I, separator: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for message in messages {
        let message = message.as_ref();
        if message.trim().is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push_str(separator);
        }
        out.push_str(message);
    }
    out.trim().to_owned()
}
