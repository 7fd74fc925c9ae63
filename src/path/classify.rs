//! Simple-vs-complex classification of path input

use super::ROOT_MARKER;
use super::parser::{matching_bracket, unquote};

/// Operators whose presence forces expression evaluation
const OPERATORS: [&str; 8] = ["==", "!=", "<=", ">=", "<", ">", "&&", "||"];

/// How a path must be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Pure structural traversal
    Simple,
    /// Needs the expression engine
    Complex,
}

/// Classify a path.
///
/// Rules are checked in order; literal and bracket checks run before the
/// operator check so that a leading `[0]` is never mistaken for a comparison.
///
/// # Arguments
/// * `input` - Path or expression text
///
/// # Returns
/// * `PathKind` - `Simple` or `Complex`
pub fn classify(input: &str) -> PathKind {
    let s = input.trim();

    // 1. string literal
    if s.starts_with('"') || s.starts_with('\'') {
        return PathKind::Complex;
    }

    // 2. map literal
    if s.starts_with('{') {
        return PathKind::Complex;
    }

    // 3. leading bracket: index/quoted key, or a list literal
    if s.starts_with('[') {
        let Some(end) = matching_bracket(s, 0) else {
            return PathKind::Complex;
        };
        let interior = s[1..end].trim();
        if !is_index_or_quoted_key(interior) {
            return PathKind::Complex;
        }
        let rest = &s[end + 1..];
        if has_call(rest) || has_operator(rest) {
            return PathKind::Complex;
        }
        return PathKind::Simple;
    }

    // 4. function or method call
    if has_call(s) {
        return PathKind::Complex;
    }

    // 5. root marker used as an expression operand
    if let Some(rest) = s.strip_prefix(ROOT_MARKER) {
        if rest.starts_with('.') || rest.starts_with('[') {
            return PathKind::Complex;
        }
    }

    // 6. comparison or logical operator
    if has_operator(s) {
        return PathKind::Complex;
    }

    PathKind::Simple
}

fn is_index_or_quoted_key(interior: &str) -> bool {
    interior.parse::<i64>().is_ok() || unquote(interior).is_some()
}

/// A `(` followed somewhere by its matching `)`
fn has_call(s: &str) -> bool {
    let mut depth = 0usize;
    for b in s.bytes() {
        match b {
            b'(' => depth += 1,
            b')' if depth > 0 => return true,
            _ => {}
        }
    }
    false
}

fn has_operator(s: &str) -> bool {
    OPERATORS.iter().any(|op| s.contains(op))
}
