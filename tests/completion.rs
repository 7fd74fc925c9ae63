//! Completion and registry behavior through the public API

use std::sync::Arc;

use celnav::completion::{CompletionContext, CompletionEngine, CompletionKind};
use celnav::registry::FunctionMetadata;
use celnav::{BuiltinEngine, FunctionRegistry, Session, Value, ValueType};
use serde_json::json;

fn users() -> Value {
    Value::from(json!({"users": [{"name": "Alice"}, {"name": "Bob"}]}))
}

#[test]
fn test_root_prefix_offers_field() {
    let root = users();
    let engine = CompletionEngine::new(Session::default());

    let completions = engine.filter_completions("_.u", &CompletionContext::new(&root));
    assert!(
        completions
            .iter()
            .any(|c| c.kind == CompletionKind::Field && c.display == "users")
    );
}

#[test]
fn test_completion_is_deterministic() {
    let root = users();
    let engine = CompletionEngine::new(Session::default());
    let ctx = CompletionContext::new(&root);

    for input in ["_.", "_.users.", "_.users[0].", "_.users[0].name.s", "si"] {
        let first = engine.filter_completions(input, &ctx);
        let second = engine.filter_completions(input, &ctx);
        assert_eq!(first, second, "input {input:?}");

        for pair in first.windows(2) {
            assert!(
                pair[0].score > pair[1].score
                    || (pair[0].score == pair[1].score && pair[0].display <= pair[1].display),
                "input {input:?} is not sorted"
            );
        }
    }
}

#[test]
fn test_string_base_only_offers_string_functions() {
    let root = users();
    let engine = CompletionEngine::new(Session::default());

    let completions =
        engine.filter_completions("_.users[0].name.", &CompletionContext::new(&root));
    assert!(completions.iter().any(|c| c.display == "startsWith"));
    assert!(!completions.iter().any(|c| c.display == "flatten"));
}

#[test]
fn test_declared_type_when_base_is_missing() {
    let engine = CompletionEngine::new(Session::default());
    let ctx = CompletionContext::default().with_current_type(ValueType::List);

    let completions = engine.filter_completions("anything.", &ctx);
    assert!(completions.iter().any(|c| c.display == "flatten"));
    assert!(completions.iter().all(|c| c.kind == CompletionKind::Function));
}

#[test]
fn test_supplement_keeps_rich_filter_entry() {
    let session = Session::new(Arc::new(BuiltinEngine::new()));
    let before = session
        .registry()
        .get("filter")
        .cloned()
        .expect("filter macro registered");

    session.supplement_functions(&["filter(x, cond) - weak"]);

    let after = session.registry().get("filter").cloned().unwrap();
    assert_eq!(after.description, before.description);
    assert_ne!(after.description, "weak");
}

#[test]
fn test_registry_load_is_idempotent() {
    let functions = vec![
        FunctionMetadata::new("size", "size(x) -> int", "Length").category("list"),
        FunctionMetadata::new("trim", "string.trim() -> string", "Strip whitespace")
            .category("string")
            .method(),
    ];

    let mut registry = FunctionRegistry::new();
    registry.load(functions.clone());
    let once: Vec<FunctionMetadata> = registry.all().cloned().collect();
    registry.load(functions);

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.all().cloned().collect::<Vec<_>>(), once);
    assert_eq!(registry.get("trim").map(|f| f.is_method), Some(true));
}
