//! Conversions between [`Value`] and JSON, plus text rendering for cells.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use super::{Record, Value};

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    // u64 above i64::MAX and real numbers
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => Value::Sequence(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => Value::Record(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Record>(),
            ),
        }
    }
}

impl Value {
    /// Convert to JSON.
    ///
    /// Bytes become base64 strings, external records become objects of their
    /// exported fields keyed by visible name, non-finite floats become null.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Int(i) => JsonValue::Number((*i).into()),
            Value::Float(f) => Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Bytes(b) => JsonValue::String(BASE64.encode(b)),
            Value::Sequence(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Record(r) => JsonValue::Object(
                r.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<JsonMap<String, JsonValue>>(),
            ),
            Value::External(r) => {
                let mut map = JsonMap::new();
                for field in r.fields().iter().filter(|f| f.exported) {
                    let value = r.field_value(&field.name).unwrap_or_default();
                    map.insert(field.visible_name().to_string(), value.to_json());
                }
                JsonValue::Object(map)
            }
        }
    }

    /// Render as a single table cell.
    ///
    /// Strings are unquoted, null is `null`, bytes are base64 and containers
    /// are compact JSON.
    pub fn to_cell_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::String(s) => s.clone(),
            Value::Bytes(b) => BASE64.encode(b),
            _ => self.to_json().to_string(),
        }
    }
}

/// Floats keep a trailing `.0` when integral so they stay distinguishable from ints
pub(crate) fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", s),
            Value::Float(x) => f.write_str(&format_float(*x)),
            other => f.write_str(&other.to_cell_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_nested() {
        let value = Value::from(json!({"items": [{"id": 1}, {"id": 2.5}], "ok": true}));
        let record = value.as_record().unwrap();
        assert_eq!(record.get("ok"), Some(&Value::Bool(true)));

        let items = record.get("items").unwrap().as_sequence().unwrap();
        assert_eq!(items[0].get_key("id"), Some(Value::Int(1)));
        assert_eq!(items[1].get_key("id"), Some(Value::Float(2.5)));
    }

    #[test]
    fn test_large_unsigned_becomes_float() {
        let value = Value::from(json!(u64::MAX));
        assert!(matches!(value, Value::Float(_)));
    }

    #[test]
    fn test_to_json_roundtrip() {
        let original = json!({"a": [1, "x", null], "b": {"c": false}});
        assert_eq!(Value::from(original.clone()).to_json(), original);
    }

    #[test]
    fn test_cell_strings() {
        assert_eq!(Value::from("plain").to_cell_string(), "plain");
        assert_eq!(Value::Null.to_cell_string(), "null");
        assert_eq!(Value::Float(2.0).to_cell_string(), "2.0");
        assert_eq!(Value::Bytes(b"hi".to_vec()).to_cell_string(), "aGk=");
        assert_eq!(
            Value::from(json!({"k": [1, 2]})).to_cell_string(),
            r#"{"k":[1,2]}"#
        );
    }

    #[test]
    fn test_display_quotes_strings() {
        assert_eq!(Value::from("b").to_string(), "\"b\"");
        assert_eq!(Value::Int(1).to_string(), "1");
    }
}
