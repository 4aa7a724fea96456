use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The closed set of field kinds a schema can declare.
///
/// Declarations accept both the short names (`text`, `list`) and the JSON-flavoured
/// aliases (`string`, `array`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// A JSON string.
    #[serde(alias = "string")]
    Text,
    /// A JSON number, integer or floating point.
    Number,
    /// A JSON boolean.
    #[serde(alias = "bool")]
    Boolean,
    /// A JSON array of any values.
    #[serde(alias = "array")]
    List,
}

impl FieldKind {
    /// Returns true when `value` has this kind. `null` never matches; callers treat it as
    /// an absent value.
    pub const fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (Self::Text, &Value::String(_)) |
            (Self::Number, &Value::Number(_)) |
            (Self::Boolean, &Value::Bool(_)) |
            (Self::List, &Value::Array(_)) => true,
            (Self::Text | Self::Number | Self::Boolean | Self::List, _) => false,
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Text => write!(f, "text"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::List => write!(f, "list"),
        }
    }
}

/// Names the JSON type of a value for error messages.
pub const fn describe_value(value: &Value) -> &'static str {
    match *value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "text",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_matches() {
        assert!(FieldKind::Text.matches(&json!("a")));
        assert!(FieldKind::Number.matches(&json!(1.5)));
        assert!(FieldKind::Boolean.matches(&json!(true)));
        assert!(FieldKind::List.matches(&json!([])));
        assert!(!FieldKind::Text.matches(&json!(1)));
        assert!(!FieldKind::List.matches(&json!({"a": 1})));
        assert!(!FieldKind::Number.matches(&Value::Null));
    }

    #[test]
    fn test_deserialize_aliases() {
        let kinds: Vec<FieldKind> = serde_json::from_value(json!(["string", "text", "array", "number", "bool"])).unwrap();
        assert_eq!(
            kinds,
            vec![
                FieldKind::Text,
                FieldKind::Text,
                FieldKind::List,
                FieldKind::Number,
                FieldKind::Boolean
            ]
        );
        assert!(serde_json::from_value::<FieldKind>(json!("date")).is_err());
    }

    #[test]
    fn test_describe_value() {
        assert_eq!(describe_value(&json!(null)), "null");
        assert_eq!(describe_value(&json!({"a": 1})), "object");
        assert_eq!(describe_value(&json!("x")), FieldKind::Text.to_string());
    }
}
