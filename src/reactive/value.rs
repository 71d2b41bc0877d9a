//! Coercion of instance values into DOM strings

use serde_json::Value;

/// String form written into text content and markup
///
/// `Null` (an absent expression included) renders as the empty string;
/// arrays and objects render as compact JSON.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Numeric reading of a value, accepting numeric strings from form input
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coercion() {
        assert_eq!(display_string(&json!(null)), "");
        assert_eq!(display_string(&json!("hi")), "hi");
        assert_eq!(display_string(&json!(0)), "0");
        assert_eq!(display_string(&json!(1.5)), "1.5");
        assert_eq!(display_string(&json!(true)), "true");
        assert_eq!(display_string(&json!([1, 2])), "[1,2]");
        assert_eq!(display_string(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn numbers_from_input_strings() {
        assert_eq!(as_number(&json!("5")), Some(5.0));
        assert_eq!(as_number(&json!(" 2.5 ")), Some(2.5));
        assert_eq!(as_number(&json!(3)), Some(3.0));
        assert_eq!(as_number(&json!("five")), None);
        assert_eq!(as_number(&json!(null)), None);
    }
}
