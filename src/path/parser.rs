//! Structural path parser
//!
//! Scans a path into [`PathSegment`]s. The scanner never looks inside an
//! expression tail: the first `(` ends structural parsing and everything
//! from the start of that token onward is kept verbatim.

use std::fmt;

use crate::error::NavigationError;

/// One step of a parsed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// `.name` or a leading `name`
    Field(String),
    /// `["name"]` or `['name']`, unescaped
    QuotedKey(String),
    /// `[N]`
    Index(i64),
    /// `[...]` whose interior is neither an integer nor a quoted key
    Bracket(String),
    /// Verbatim expression tail; always the last segment
    Expr(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => f.write_str(name),
            PathSegment::QuotedKey(key) => write!(f, "[\"{}\"]", escape(key)),
            PathSegment::Index(i) => write!(f, "[{i}]"),
            PathSegment::Bracket(raw) => write!(f, "[{raw}]"),
            PathSegment::Expr(tail) => f.write_str(tail),
        }
    }
}

/// Parse a path into segments.
///
/// # Arguments
/// * `input` - Path text such as `items[0].name` or `.a["b c"]`
///
/// # Returns
/// * `Result<Vec<PathSegment>, NavigationError>` - Segments, or
///   `InvalidSyntax` for empty fields, a trailing `.` or an unterminated `[`
pub fn parse_path(input: &str) -> Result<Vec<PathSegment>, NavigationError> {
    let s = input.trim();
    let bytes = s.as_bytes();
    let mut segments = Vec::new();
    let mut pos = 0;
    let mut after_dot = false;
    let mut at_start = true;

    while pos < bytes.len() {
        match bytes[pos] {
            b'.' => {
                if after_dot {
                    return Err(syntax(format!("empty field at position {pos}")));
                }
                after_dot = true;
                at_start = false;
                pos += 1;
            }
            b'[' => {
                if after_dot {
                    return Err(syntax(format!("empty field before '[' at position {pos}")));
                }
                let end = matching_bracket(s, pos)
                    .ok_or_else(|| syntax(format!("unterminated '[' at position {pos}")))?;
                segments.push(bracket_segment(s[pos + 1..end].trim(), pos)?);
                pos = end + 1;
                at_start = false;
            }
            b'(' => {
                segments.push(PathSegment::Expr(s[pos..].to_string()));
                return Ok(segments);
            }
            b']' => {
                return Err(syntax(format!("unexpected ']' at position {pos}")));
            }
            _ => {
                if !(after_dot || at_start) {
                    return Err(syntax(format!("expected '.' or '[' at position {pos}")));
                }
                let end = field_end(bytes, pos);
                if bytes.get(end) == Some(&b'(') {
                    segments.push(PathSegment::Expr(s[pos..].to_string()));
                    return Ok(segments);
                }
                let name = s[pos..end].trim();
                if name.is_empty() {
                    return Err(syntax(format!("empty field at position {pos}")));
                }
                segments.push(PathSegment::Field(name.to_string()));
                pos = end;
                after_dot = false;
                at_start = false;
            }
        }
    }

    if after_dot {
        return Err(syntax("path ends with '.'".to_string()));
    }

    Ok(segments)
}

/// Rebuild a path from segments.
///
/// Fields use dot notation, indices and quoted keys use brackets. Parsing the
/// result yields the same segments.
pub fn format_path(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            PathSegment::Field(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            PathSegment::Expr(tail) => {
                if !out.is_empty() && !tail.starts_with('(') {
                    out.push('.');
                }
                out.push_str(tail);
            }
            other => out.push_str(&other.to_string()),
        }
    }
    out
}

/// True for names that can be written in dot notation without quoting
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Byte index of the `]` closing the `[` at `open`, skipping quoted text
pub(crate) fn matching_bracket(s: &str, open: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = open;

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
                b'[' => depth += 1,
                b']' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        i += 1;
    }
    None
}

/// Unquote `"..."` or `'...'`, resolving backslash escapes
pub(crate) fn unquote(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 {
        return None;
    }
    let quote = bytes[0];
    if (quote != b'"' && quote != b'\'') || bytes[bytes.len() - 1] != quote {
        return None;
    }

    let inner = &s[1..s.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some(other) => out.push(other),
                None => return None,
            }
        } else if c as u32 == quote as u32 {
            // unescaped closing quote in the middle: not a single literal
            return None;
        } else {
            out.push(c);
        }
    }
    Some(out)
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn field_end(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|b| matches!(b, b'.' | b'[' | b'(' | b']'))
        .map(|offset| start + offset)
        .unwrap_or(bytes.len())
}

fn bracket_segment(interior: &str, pos: usize) -> Result<PathSegment, NavigationError> {
    if interior.is_empty() {
        return Err(syntax(format!("empty brackets at position {pos}")));
    }
    if let Ok(index) = interior.parse::<i64>() {
        return Ok(PathSegment::Index(index));
    }
    if let Some(key) = unquote(interior) {
        return Ok(PathSegment::QuotedKey(key));
    }
    Ok(PathSegment::Bracket(interior.to_string()))
}

fn syntax(msg: String) -> NavigationError {
    NavigationError::InvalidSyntax(msg)
}
