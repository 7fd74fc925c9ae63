//! Splitting partial input into a base expression and the token being typed
//!
//! The active engine's parser is tried first; input it rejects (which is
//! most half-typed input) is segmented lexically. Neither path reports
//! errors.

use tracing::trace;

use crate::engine::{Expr, ExpressionEngine};
use crate::path::ROOT_MARKER;

/// Result of [`split_input`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SplitInput {
    /// Expression whose members are being completed; empty for none
    pub base: String,
    /// Token being typed after the base
    pub partial: String,
    /// The partial sits inside an unterminated `[`
    pub in_bracket: bool,
    /// The unterminated `[` opens a quoted key, so only keys can follow
    pub quoted_key: bool,
}

impl SplitInput {
    fn new(base: &str, partial: &str, in_bracket: bool) -> Self {
        Self {
            base: base.trim().to_string(),
            partial: partial.to_string(),
            in_bracket,
            quoted_key: false,
        }
    }

    /// True when there is no base at all (not even the root marker)
    pub fn has_base(&self) -> bool {
        !self.base.is_empty()
    }
}

/// Split `input` into (base, partial).
///
/// # Arguments
/// * `input` - Text before the cursor
/// * `engine` - Engine used to probe the input's structure
/// * `after_dot` - Treat the input as ending at a member-access point
pub fn split_input(input: &str, engine: &dyn ExpressionEngine, after_dot: bool) -> SplitInput {
    let s = input.trim();

    if after_dot {
        return SplitInput::new(s.strip_suffix('.').unwrap_or(s), "", false);
    }
    if let Some(base) = s.strip_suffix('.') {
        return SplitInput::new(base, "", false);
    }
    if let Some(base) = s.strip_suffix('[') {
        return SplitInput::new(base, "", true);
    }

    match engine.compile(s) {
        Ok(Expr::Select { field, .. }) => match s.strip_suffix(field.as_str()) {
            Some(rest) if rest.trim_end().ends_with('.') => {
                let base = rest.trim_end();
                SplitInput::new(&base[..base.len() - 1], &field, false)
            }
            _ => lexical_split(s),
        },
        Ok(Expr::Ident(name)) if name == ROOT_MARKER => SplitInput::new(ROOT_MARKER, "", false),
        Ok(Expr::Ident(name)) => SplitInput::new("", &name, false),
        Ok(_) => SplitInput::new(s, "", false),
        Err(e) => {
            trace!(input = s, error = %e, "structural probe failed, splitting lexically");
            lexical_split(s)
        }
    }
}

/// Split on the last top-level `.` or `]`, or at an unterminated `[`.
fn lexical_split(s: &str) -> SplitInput {
    let bytes = s.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut open_brackets: Vec<usize> = Vec::new();
    let mut last_boundary: Option<usize> = None;

    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
        } else {
            match b {
                b'"' | b'\'' => quote = Some(b),
                b'[' => {
                    depth += 1;
                    open_brackets.push(i);
                }
                b']' if depth > 0 => {
                    depth -= 1;
                    open_brackets.pop();
                    if depth == 0 {
                        last_boundary = Some(i);
                    }
                }
                b'.' if depth == 0 => last_boundary = Some(i),
                _ => {}
            }
        }
        i += 1;
    }

    // unterminated bracket: its interior is the partial
    if let Some(&open) = open_brackets.first() {
        let interior = s[open + 1..].trim_start();
        let partial = interior
            .trim_start_matches(['"', '\''])
            .trim_end_matches(['"', '\'']);
        return SplitInput {
            quoted_key: interior.starts_with(['"', '\'']),
            ..SplitInput::new(&s[..open], partial, true)
        };
    }

    let (base, token) = match last_boundary {
        Some(pos) if bytes[pos] == b']' => (&s[..=pos], &s[pos + 1..]),
        Some(pos) => (&s[..pos], &s[pos + 1..]),
        None => ("", s),
    };

    if token.is_empty() || token.chars().all(|c| c.is_ascii_digit()) {
        // a numeric step is part of the base
        SplitInput::new(s, "", false)
    } else {
        SplitInput::new(base, token, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BuiltinEngine;

    fn split(input: &str) -> (String, String) {
        let result = split_input(input, &BuiltinEngine::new(), false);
        (result.base, result.partial)
    }

    fn pair(base: &str, partial: &str) -> (String, String) {
        (base.to_string(), partial.to_string())
    }

    #[test]
    fn test_structural_split() {
        assert_eq!(split("_.u"), pair("_", "u"));
        assert_eq!(split("_.user.na"), pair("_.user", "na"));
        assert_eq!(split("us"), pair("", "us"));
        assert_eq!(split("_"), pair("_", ""));
        assert_eq!(split("size(_.items)"), pair("size(_.items)", ""));
    }

    #[test]
    fn test_completion_points() {
        assert_eq!(split("_."), pair("_", ""));
        assert_eq!(split("_.items."), pair("_.items", ""));

        let bracket = split_input("_.items[", &BuiltinEngine::new(), false);
        assert_eq!(bracket.base, "_.items");
        assert!(bracket.in_bracket);
    }

    #[test]
    fn test_lexical_fallback() {
        assert_eq!(split("items.0"), pair("items.0", ""));
        assert_eq!(split("items.0.na"), pair("items.0", "na"));
        assert_eq!(split("items[0].na"), pair("items[0]", "na"));
        assert_eq!(split("items[0]"), pair("items[0]", ""));

        let open = split_input("user[\"fi", &BuiltinEngine::new(), false);
        assert_eq!((open.base.as_str(), open.partial.as_str()), ("user", "fi"));
        assert!(open.in_bracket);
        assert!(open.quoted_key);

        let index = split_input("items[1", &BuiltinEngine::new(), false);
        assert_eq!(index.partial, "1");
        assert!(!index.quoted_key);
    }

    #[test]
    fn test_after_dot_forces_base() {
        let forced = split_input("_.user", &BuiltinEngine::new(), true);
        assert_eq!(forced.base, "_.user");
        assert_eq!(forced.partial, "");
    }
}
