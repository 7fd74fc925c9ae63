//! Shape detection
//!
//! Classifies a value for rendering and completion: scalar, map, array, or an
//! array of records that all share the same keys (rendered as a table).

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::value::Value;

/// Structural category of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Scalar,
    Map,
    Array,
    HomogeneousArray,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::Scalar => "scalar",
            ShapeKind::Map => "map",
            ShapeKind::Array => "array",
            ShapeKind::HomogeneousArray => "homogeneous array",
        };
        f.write_str(name)
    }
}

/// Result of [`detect_shape`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub kind: ShapeKind,
    /// Element count for arrays, key count for maps, char/byte count for
    /// strings and bytes, 0 for other scalars
    pub length: usize,
    /// Shared record keys, sorted; only set for [`ShapeKind::HomogeneousArray`]
    pub fields: Vec<String>,
}

impl Shape {
    fn new(kind: ShapeKind, length: usize) -> Self {
        Self {
            kind,
            length,
            fields: Vec::new(),
        }
    }
}

/// Table-ready projection of a homogeneous array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnarData {
    pub columns: Vec<String>,
    /// One row per element, cells aligned with `columns`
    pub rows: Vec<Vec<String>>,
}

/// Classify a value
pub fn detect_shape(value: &Value) -> Shape {
    match value {
        Value::Record(_) | Value::External(_) => Shape::new(ShapeKind::Map, value.keys().len()),
        Value::Sequence(items) if items.is_empty() => Shape::new(ShapeKind::Array, 0),
        Value::Sequence(items) => match is_homogeneous_array(value) {
            Some(fields) => Shape {
                kind: ShapeKind::HomogeneousArray,
                length: items.len(),
                fields,
            },
            None => Shape::new(ShapeKind::Array, items.len()),
        },
        Value::String(_) | Value::Bytes(_) => Shape::new(ShapeKind::Scalar, value.len()),
        _ => Shape::new(ShapeKind::Scalar, 0),
    }
}

/// Shared key set of a non-empty sequence whose elements are all records with
/// identical, non-empty key sets. Keys are returned sorted.
pub fn is_homogeneous_array(value: &Value) -> Option<Vec<String>> {
    let items = value.as_sequence()?;
    let (head, rest) = items.split_first()?;

    let keys = record_keys(head)?;
    if keys.is_empty() {
        return None;
    }
    for item in rest {
        if record_keys(item)? != keys {
            return None;
        }
    }
    Some(keys.into_iter().collect())
}

fn record_keys(value: &Value) -> Option<BTreeSet<String>> {
    match value {
        Value::Record(_) | Value::External(_) => Some(value.keys().into_iter().collect()),
        _ => None,
    }
}

/// Project a homogeneous array into columns and stringified rows.
///
/// Columns listed in `preferred` come first, in that order; the remaining
/// fields follow in sorted order. Non-homogeneous input yields `None`.
pub fn extract_columnar_data(value: &Value, preferred: &[String]) -> Option<ColumnarData> {
    let fields = is_homogeneous_array(value)?;
    let items = value.as_sequence()?;

    let mut seen = HashSet::new();
    let mut columns: Vec<String> = preferred
        .iter()
        .filter(|p| fields.contains(p) && seen.insert(p.as_str()))
        .cloned()
        .collect();
    columns.extend(fields.into_iter().filter(|f| !preferred.contains(f)));

    let rows = items
        .iter()
        .map(|item| {
            columns
                .iter()
                .map(|column| item.get_key(column).unwrap_or_default().to_cell_string())
                .collect()
        })
        .collect();

    Some(ColumnarData { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_scalars() {
        assert_eq!(detect_shape(&Value::Null), Shape::new(ShapeKind::Scalar, 0));
        assert_eq!(detect_shape(&Value::Int(9)).length, 0);
        assert_eq!(detect_shape(&Value::from("héllo")).length, 5);
    }

    #[test]
    fn test_maps_and_arrays() {
        let map = detect_shape(&value(json!({"a": 1, "b": 2})));
        assert_eq!(map.kind, ShapeKind::Map);
        assert_eq!(map.length, 2);

        let empty = detect_shape(&value(json!([])));
        assert_eq!(empty, Shape::new(ShapeKind::Array, 0));

        let mixed = detect_shape(&value(json!([1, "a"])));
        assert_eq!(mixed.kind, ShapeKind::Array);
        assert_eq!(mixed.length, 2);
    }

    #[test]
    fn test_homogeneous_records() {
        let shape = detect_shape(&value(json!([
            {"name": "a", "id": 1},
            {"id": 2, "name": "b"}
        ])));
        assert_eq!(shape.kind, ShapeKind::HomogeneousArray);
        assert_eq!(shape.fields, vec!["id", "name"]);
    }

    #[test]
    fn test_mixed_keys_is_plain_array() {
        let v = value(json!([{"name": "a"}, {"title": "b"}]));
        assert_eq!(detect_shape(&v).kind, ShapeKind::Array);
        assert!(is_homogeneous_array(&v).is_none());
    }

    #[test]
    fn test_empty_records_are_not_homogeneous() {
        assert!(is_homogeneous_array(&value(json!([{}, {}]))).is_none());
    }

    #[test]
    fn test_columnar_preferred_order() {
        let v = value(json!([
            {"id": 1, "name": "a", "tags": ["x"], "note": null},
            {"id": 2, "name": "b", "tags": [], "note": "n"}
        ]));
        let preferred = vec!["name".to_string(), "missing".to_string()];
        let data = extract_columnar_data(&v, &preferred).unwrap();

        assert_eq!(data.columns, vec!["name", "id", "note", "tags"]);
        assert_eq!(data.rows[0], vec!["a", "1", "null", "[\"x\"]"]);
        assert_eq!(data.rows[1], vec!["b", "2", "n", "[]"]);
    }

    #[test]
    fn test_columnar_repeated_preference() {
        let v = value(json!([{"id": 1, "name": "a"}]));
        let preferred = vec!["name".to_string(), "id".to_string(), "name".to_string()];
        let data = extract_columnar_data(&v, &preferred).unwrap();

        assert_eq!(data.columns, vec!["name", "id"]);
        assert_eq!(data.rows[0], vec!["a", "1"]);
    }

    #[test]
    fn test_columnar_requires_homogeneity() {
        assert!(extract_columnar_data(&value(json!([1, 2])), &[]).is_none());
    }
}
