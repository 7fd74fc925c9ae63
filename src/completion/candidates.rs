//! Completion candidates and the type-compatibility table

use std::fmt;

use crate::path::{PathKind, PathSegment, ROOT_MARKER, classify, is_identifier, parse_path};
use crate::registry::FunctionMetadata;
use crate::value::ValueType;

/// Category of a completion candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionKind {
    Field,
    Index,
    Function,
    Keyword,
    Variable,
}

impl fmt::Display for CompletionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompletionKind::Field => "field",
            CompletionKind::Index => "index",
            CompletionKind::Function => "function",
            CompletionKind::Keyword => "keyword",
            CompletionKind::Variable => "variable",
        };
        f.write_str(name)
    }
}

/// One completion candidate
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Replacement text: the full expression up to and including this candidate
    pub text: String,
    /// Short label shown in menus
    pub display: String,
    pub kind: CompletionKind,
    /// Type name for fields, signature for functions
    pub detail: String,
    pub description: String,
    pub score: u32,
    /// Function documentation, for function candidates
    pub function: Option<FunctionMetadata>,
}

/// Literal keywords offered when completing a bare token
pub const KEYWORDS: [&str; 3] = ["true", "false", "null"];

/// Lower-cased function names applicable to each inferred type.
///
/// `type` is handled separately: it applies to every known type.
pub fn compatible_functions(ty: ValueType) -> &'static [&'static str] {
    match ty {
        ValueType::Map => &[
            "keys",
            "values",
            "filter",
            "map",
            "all",
            "exists",
            "exists_one",
            "size",
            "has",
        ],
        ValueType::List => &[
            "filter",
            "map",
            "all",
            "exists",
            "exists_one",
            "size",
            "flatten",
            "slice",
            "sort",
        ],
        ValueType::String => &[
            "contains",
            "startswith",
            "endswith",
            "matches",
            "lowerascii",
            "upperascii",
            "size",
        ],
        ValueType::Double | ValueType::Int | ValueType::Uint => {
            &["abs", "ceil", "floor", "round", "sqrt"]
        }
        _ => &[],
    }
}

/// True when `function` may be offered for a value of type `ty`.
///
/// Unknown types fail closed.
pub fn is_compatible(ty: ValueType, function: &str) -> bool {
    if ty == ValueType::Unknown {
        return false;
    }
    let name = function.to_lowercase();
    name == "type" || compatible_functions(ty).contains(&name.as_str())
}

/// Case-insensitive prefix test
pub fn prefix_matches(candidate: &str, partial: &str) -> bool {
    partial.is_empty() || candidate.to_lowercase().starts_with(&partial.to_lowercase())
}

/// Canonical root-relative form of a base, used as the prefix of field and
/// index candidates.
///
/// Simple paths are rebuilt from the root marker with named steps in dot
/// notation and numeric steps in brackets; expressions are kept verbatim.
/// An empty base yields an empty prefix.
pub fn rebuild_base(base: &str) -> String {
    let base = base.trim();
    if base.is_empty() {
        return String::new();
    }
    if base == ROOT_MARKER {
        return ROOT_MARKER.to_string();
    }
    if classify(base) == PathKind::Complex {
        return base.to_string();
    }
    let Ok(segments) = parse_path(base) else {
        return base.to_string();
    };

    let mut out = ROOT_MARKER.to_string();
    for segment in &segments {
        match segment {
            PathSegment::Field(name) if name.parse::<i64>().is_ok() => {
                out.push_str(&format!("[{name}]"));
            }
            PathSegment::Field(name) | PathSegment::QuotedKey(name) => {
                out.push_str(&key_step(name));
            }
            PathSegment::Index(i) => out.push_str(&format!("[{i}]")),
            PathSegment::Bracket(raw) => out.push_str(&format!("[{raw}]")),
            PathSegment::Expr(_) => return base.to_string(),
        }
    }
    out
}

/// `.key` when identifier-safe, else `["key"]`
pub fn key_step(key: &str) -> String {
    if is_identifier(key) {
        format!(".{key}")
    } else {
        format!("[\"{}\"]", key.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compatibility_table() {
        assert!(is_compatible(ValueType::String, "startsWith"));
        assert!(is_compatible(ValueType::List, "SIZE"));
        assert!(is_compatible(ValueType::Map, "keys"));
        assert!(!is_compatible(ValueType::List, "keys"));
        assert!(is_compatible(ValueType::Uint, "sqrt"));
        assert!(is_compatible(ValueType::Bool, "type"));
        assert!(!is_compatible(ValueType::Bool, "size"));
        assert!(!is_compatible(ValueType::Unknown, "type"));
        assert!(!is_compatible(ValueType::Unknown, "size"));
    }

    #[test]
    fn test_prefix_matches() {
        assert!(prefix_matches("Users", "us"));
        assert!(prefix_matches("anything", ""));
        assert!(!prefix_matches("id", "idx"));
    }

    #[test]
    fn test_rebuild_base() {
        assert_eq!(rebuild_base(""), "");
        assert_eq!(rebuild_base("_"), "_");
        assert_eq!(rebuild_base("items.0"), "_.items[0]");
        assert_eq!(rebuild_base("user[\"first name\"]"), "_.user[\"first name\"]");
        assert_eq!(rebuild_base("_.items[0]"), "_.items[0]");
        assert_eq!(rebuild_base("size(_.items)"), "size(_.items)");
    }

    #[test]
    fn test_key_step() {
        assert_eq!(key_step("name"), ".name");
        assert_eq!(key_step("first name"), "[\"first name\"]");
        assert_eq!(key_step("0"), "[\"0\"]");
    }
}
