//! End-to-end resolution scenarios over JSON documents

use celnav::error::NavigationError;
use celnav::path::{PathKind, PathSegment, classify, format_path, parse_path};
use celnav::{Session, ShapeKind, Value, detect_shape};
use serde_json::json;

fn doc(json: serde_json::Value) -> Value {
    Value::from(json)
}

#[test]
fn test_dotted_index_into_records() {
    let root = doc(json!({"items": [{"id": 1}, {"id": 2}]}));
    let session = Session::default();
    assert_eq!(session.resolve(&root, "items.0.id").unwrap(), Value::Int(1));
}

#[test]
fn test_bracket_index() {
    let root = doc(json!({"items": ["a", "b", "c"]}));
    let session = Session::default();
    assert_eq!(
        session.resolve(&root, "items[1]").unwrap(),
        Value::String("b".to_string())
    );
}

#[test]
fn test_index_out_of_range() {
    let root = doc(json!({"items": ["a", "b", "c"]}));
    let session = Session::default();
    assert_eq!(
        session.resolve(&root, "items.5").unwrap_err(),
        NavigationError::IndexOutOfRange { index: 5, len: 3 }
    );
}

#[test]
fn test_classifier_table() {
    for input in ["[0]", "[123]", r#"["key"]"#, "items", "items.0", "items[0]"] {
        assert_eq!(classify(input), PathKind::Simple, "input {input:?}");
    }
    for input in [
        "[1,2]",
        "[a,b]",
        r#""literal""#,
        r#"{"a":1}"#,
        "size() > 0",
        "filter(x, x>0)",
    ] {
        assert_eq!(classify(input), PathKind::Complex, "input {input:?}");
    }
}

#[test]
fn test_reconstructed_paths_resolve_identically() {
    let root = doc(json!({
        "orders": [
            {"id": 7, "lines": [{"sku": "A-1", "qty": 2}]},
            {"id": 8, "lines": []}
        ],
        "meta data": {"source": "import"}
    }));
    let session = Session::default();

    for input in [
        "orders[0].lines[0].sku",
        "orders.1.id",
        r#"["meta data"].source"#,
        "orders[0]",
    ] {
        let segments = parse_path(input).unwrap();
        assert!(
            segments
                .iter()
                .all(|s| !matches!(s, PathSegment::Expr(_))),
            "input {input:?}"
        );
        let rebuilt = format_path(&segments);
        assert_eq!(
            session.resolve(&root, input).unwrap(),
            session.resolve(&root, &rebuilt).unwrap(),
            "input {input:?} rebuilt as {rebuilt:?}"
        );
    }
}

#[test]
fn test_expressions_use_the_engine() {
    let root = doc(json!({"items": [{"price": 5}, {"price": 20}, {"price": 12}]}));
    let session = Session::default();

    assert_eq!(session.resolve(&root, "size(_.items)").unwrap(), Value::Int(3));
    assert_eq!(
        session
            .resolve(&root, "_.items.filter(i, i.price > 10).map(i, i.price)")
            .unwrap(),
        Value::Sequence(vec![Value::Int(20), Value::Int(12)])
    );
    assert!(matches!(
        session.resolve(&root, "_.items[0].price / 0"),
        Err(NavigationError::Evaluation(_))
    ));
}

#[test]
fn test_mixed_record_keys_are_not_homogeneous() {
    let value = doc(json!([{"name": "a"}, {"title": "b"}]));
    let shape = detect_shape(&value);
    assert_eq!(shape.kind, ShapeKind::Array);
    assert!(shape.fields.is_empty());
}

#[test]
fn test_homogeneous_record_array() {
    let value = doc(json!([{"b": 1, "a": 2}, {"a": 3, "b": 4}]));
    let shape = detect_shape(&value);
    assert_eq!(shape.kind, ShapeKind::HomogeneousArray);
    assert_eq!(shape.fields, vec!["a".to_string(), "b".to_string()]);
}
