//! Loose value coercion for form-shaped input
//!
//! Form posts and hand-written override files deliver booleans as `"1"`/`"0"`
//! and numbers as strings. These helpers give them a single interpretation.

use serde_json::{Number, Value};

/// Form-style truthiness.
///
/// Falsy: `null`, `false`, `0`, `""`, `"0"`, `"false"`, empty arrays and
/// empty objects. Everything else is truthy.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            let s = s.trim();
            !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"))
        }
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Truthiness of an optional value; absent is falsy.
pub fn truthy_opt(value: Option<&Value>) -> bool {
    value.is_some_and(truthy)
}

/// Whether a value counts as "not provided" (`null` or an empty string).
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Interpret a value as a number: numbers pass through, numeric-looking
/// strings are parsed. Integral results come back as integers so `"3"` and
/// `3.0` both serialize as `3`.
pub fn as_number(value: &Value) -> Option<Number> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number_from_f64(raw)
}

/// Interpret a value as an integer, truncating fractional input.
pub fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Integral floats become integer numbers; non-finite input is rejected.
pub fn number_from_f64(raw: f64) -> Option<Number> {
    if !raw.is_finite() {
        return None;
    }
    if raw.fract() == 0.0 && raw.abs() < 9.0e15 {
        Some(Number::from(raw as i64))
    } else {
        Number::from_f64(raw)
    }
}
