//! Type-directed SQL literal serialization.
//!
//! This only exists so that very long IN lists can be sent without exceeding a
//! backend's placeholder limit. It is not a general escaping utility: anything
//! other than a string, a finite number or null is rejected.

use crate::error::{SqlBindError, SqlBindResult};
use crate::value::Value;

/// Render one value as a SQL literal.
///
/// - strings: wrapped in `'`, embedded `'` doubled
/// - numbers: canonical decimal text (floats keep their fraction, `1.0`)
/// - null: `NULL`
pub fn escape(value: &Value) -> SqlBindResult<String> {
    let mut out = String::new();
    write_literal(&mut out, value)?;
    Ok(out)
}

/// Render values as a comma-separated literal list (no surrounding parens).
pub fn escape_list<'a>(values: impl IntoIterator<Item = &'a Value>) -> SqlBindResult<String> {
    let mut out = String::new();
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_literal(&mut out, value)?;
    }
    Ok(out)
}

fn write_literal(out: &mut String, value: &Value) -> SqlBindResult<()> {
    match value {
        Value::Null | Value::Json(serde_json::Value::Null) => out.push_str("NULL"),
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::UInt(u) => out.push_str(&u.to_string()),
        Value::Float(x) if x.is_finite() => out.push_str(&format!("{x:?}")),
        Value::Json(serde_json::Value::Number(n)) => out.push_str(&n.to_string()),
        Value::Text(s) => push_quoted(out, s),
        Value::Json(serde_json::Value::String(s)) => push_quoted(out, s),
        other => return Err(SqlBindError::unsupported_escape(kind_of(other))),
    }
    Ok(())
}

fn push_quoted(out: &mut String, s: &str) {
    out.reserve(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }
    out.push('\'');
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Int(_) | Value::UInt(_) => "integer",
        Value::Float(x) if x.is_finite() => "float",
        Value::Float(_) => "non-finite float",
        Value::Text(_) => "string",
        Value::Json(serde_json::Value::Array(_)) => "array",
        Value::Json(serde_json::Value::Object(_)) => "object",
        Value::Json(serde_json::Value::Bool(_)) => "bool",
        Value::Json(_) => "json",
    }
}
