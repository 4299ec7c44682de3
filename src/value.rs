//! Auxiliary values carried opaquely on canonical records.
//!
//! Records keep every column the index does not interpret in an ordered
//! string-keyed map of [`Value`]s. Values pass through resolution unchanged
//! and are only read where a caller names the field explicitly.

use serde::{Deserialize, Serialize};

/// An opaque auxiliary field value.
///
/// Serialized untagged so projected records read as plain JSON.
///
/// # Examples
///
/// ```
/// use symres::Value;
///
/// let date = Value::from("2001-05-12");
/// let groups = Value::List(vec!["Zinc fingers".into()]);
///
/// assert!(date.is_string());
/// assert_eq!(groups.as_list().map(<[String]>::len), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<String>),
    Structured(serde_json::Value),
}

impl Value {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the first string this value holds, if any.
    ///
    /// A list yields its first element; scalars other than strings yield `None`.
    #[must_use]
    pub fn first_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            Self::List(v) => v.first().map(String::as_str),
            _ => None,
        }
    }

    /// Returns a human-readable type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Structured(_) => "structured",
        }
    }

    /// Converts a JSON value into the narrowest matching variant.
    ///
    /// Arrays made only of strings become [`Value::List`]; anything without
    /// a dedicated variant is kept as [`Value::Structured`].
    #[must_use]
    pub fn from_json(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Self::Int(i),
                (None, Some(f)) => Self::Float(f),
                (None, None) => Self::Structured(Json::Number(n)),
            },
            Json::String(s) => Self::String(s),
            Json::Array(items) if items.iter().all(Json::is_string) => Self::List(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Json::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            other => Self::Structured(other),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
            Self::List(v) => write!(f, "{}", v.join("|")),
            Self::Structured(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Self::List(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_string() {
        let val = Value::from("hello");
        assert!(val.is_string());
        assert_eq!(val.as_string(), Some("hello"));
        assert_eq!(val.first_str(), Some("hello"));
        assert_eq!(val.type_name(), "string");
    }

    #[test]
    fn test_value_list_first_str() {
        let val = Value::List(vec!["a".into(), "b".into()]);
        assert!(val.is_list());
        assert_eq!(val.first_str(), Some("a"));
        assert_eq!(format!("{val}"), "a|b");
    }

    #[test]
    fn test_value_null_default() {
        let val = Value::default();
        assert!(val.is_null());
        assert!(val.first_str().is_none());
    }

    #[test]
    fn test_from_json_narrows() {
        assert_eq!(Value::from_json(serde_json::json!(null)), Value::Null);
        assert_eq!(Value::from_json(serde_json::json!(3)), Value::Int(3));
        assert_eq!(Value::from_json(serde_json::json!(1.5)), Value::Float(1.5));
        assert_eq!(
            Value::from_json(serde_json::json!(["x", "y"])),
            Value::List(vec!["x".into(), "y".into()])
        );
        assert!(matches!(
            Value::from_json(serde_json::json!([1, "y"])),
            Value::Structured(_)
        ));
        assert!(matches!(
            Value::from_json(serde_json::json!({"k": 1})),
            Value::Structured(_)
        ));
    }

    #[test]
    fn test_untagged_serialization_is_plain_json() {
        let json = serde_json::to_string(&Value::from("2001-05-12")).unwrap();
        assert_eq!(json, "\"2001-05-12\"");
        let json = serde_json::to_string(&Value::List(vec!["A".into()])).unwrap();
        assert_eq!(json, "[\"A\"]");
        let back: Value = serde_json::from_str("[\"A\"]").unwrap();
        assert_eq!(back, Value::List(vec!["A".into()]));
    }
}
