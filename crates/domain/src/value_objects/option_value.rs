//! Option value - A resolved generation parameter

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fully resolved value for one provider-specific generation option
///
/// Serializes untagged so that encoders can drop it straight into a
/// provider payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Integer option (token limits, seeds, image dimensions)
    Int(i64),
    /// Floating point option (temperature, top-p, guidance scale)
    Float(f64),
    /// Free text option (presets, provider enum values)
    Text(String),
    /// List option, entered comma separated (stop sequences)
    List(Vec<String>),
}

impl OptionValue {
    /// Short name of the variant, used in error messages
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::List(_) => "list",
        }
    }

    /// Numeric view; integers widen to floats
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
            Self::List(v) => write!(f, "[{}]", v.join(",")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_widens_to_float() {
        assert_eq!(OptionValue::Int(7).as_f64(), Some(7.0));
        assert_eq!(OptionValue::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(OptionValue::Text("x".to_string()).as_f64(), None);
    }

    #[test]
    fn float_is_not_an_int() {
        assert_eq!(OptionValue::Float(1.0).as_i64(), None);
        assert_eq!(OptionValue::Int(512).as_i64(), Some(512));
    }

    #[test]
    fn serializes_untagged() {
        let values = vec![
            OptionValue::Int(512),
            OptionValue::Float(0.9),
            OptionValue::Text("NONE".to_string()),
            OptionValue::List(vec!["a".to_string(), "b".to_string()]),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[512,0.9,"NONE",["a","b"]]"#);
    }

    #[test]
    fn deserializes_integers_as_int() {
        let value: OptionValue = serde_json::from_str("42").unwrap();
        assert_eq!(value, OptionValue::Int(42));
        let value: OptionValue = serde_json::from_str("4.2").unwrap();
        assert_eq!(value, OptionValue::Float(4.2));
    }

    #[test]
    fn display_formats_list() {
        let value = OptionValue::List(vec!["END".to_string(), "STOP".to_string()]);
        assert_eq!(value.to_string(), "[END,STOP]");
        assert_eq!(OptionValue::List(Vec::new()).to_string(), "[]");
    }

    #[test]
    fn type_names() {
        assert_eq!(OptionValue::Int(1).type_name(), "int");
        assert_eq!(OptionValue::List(Vec::new()).type_name(), "list");
    }
}
