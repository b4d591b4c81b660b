#![forbid(unsafe_code)]

//! State values and the host coercions DOM sync relies on.
//!
//! DOM sync needs three things from a value: whether it is the null
//! sentinel, its truthiness (for checkbox/radio controls), and its string
//! form (for text fields and element content). [`StateValue`] captures
//! exactly that. The core implements it for [`serde_json::Value`] using
//! JavaScript's `Boolean(v)` and `String(v)` rules so a headless document
//! renders what a browser would.
//!
//! # Coercion table (`serde_json::Value`)
//!
//! | Value | `is_truthy` | `to_text` |
//! |-------|-------------|-----------|
//! | `null` | false | `""` |
//! | `true` / `false` | itself | `"true"` / `"false"` |
//! | `0`, `-0` | false | `"0"` |
//! | other numbers | true | shortest round-trip, `1e+21` style exponents |
//! | integers beyond ±2^53 | true | rounded to the nearest `f64` first |
//! | `""` | false | `""` |
//! | other strings | true | the string |
//! | arrays | true | elements joined with `,`, nulls empty |
//! | objects | true | `"[object Object]"` |

use serde_json::{Number, Value};

/// A value that can be held by a state entry and pushed into the DOM.
pub trait StateValue: Clone + 'static {
    /// The null/absent sentinel used when no initial value is given.
    fn null() -> Self;

    /// Whether this is the null sentinel.
    fn is_null(&self) -> bool;

    /// Host truthiness, used for the `checked` property.
    fn is_truthy(&self) -> bool;

    /// Host string coercion, used for `value` and element content.
    fn to_text(&self) -> String;
}

impl StateValue for Value {
    fn null() -> Self {
        Value::Null
    }

    fn is_null(&self) -> bool {
        self.is_null()
    }

    fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0 && !x.is_nan()),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => number_text(n),
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(StateValue::to_text)
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => "[object Object]".to_owned(),
        }
    }
}

/// Largest integer a JS `Number` holds exactly.
const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64().filter(|i| i.unsigned_abs() <= MAX_SAFE_INTEGER) {
        return i.to_string();
    }
    if let Some(u) = n.as_u64().filter(|&u| u <= MAX_SAFE_INTEGER) {
        return u.to_string();
    }
    n.as_f64().map_or_else(String::new, float_text)
}

fn float_text(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_owned();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if x == 0.0 {
        return "0".to_owned();
    }
    if (1e-6..1e21).contains(&x.abs()) {
        return format!("{x}");
    }
    let exp = format!("{x:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}
