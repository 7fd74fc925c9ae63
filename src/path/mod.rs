//! Path grammar: classification and structural parsing
//!
//! A path is either *simple*, resolvable by walking the value tree, or
//! *complex*, needing the expression engine. The grammar accepted here:
//!
//! - `field` and `.field`
//! - `[N]` (integer index)
//! - `["key"]` / `['key']` (quoted key)
//! - an opaque expression tail starting at the first `(`, passed through
//!   verbatim
//!
//! The root marker `_` stands for the value being browsed.

mod classify;
mod parser;

pub use classify::{PathKind, classify};
pub use parser::{PathSegment, format_path, is_identifier, parse_path};

/// Identifier the expression engine binds to the root value
pub const ROOT_MARKER: &str = "_";

/// True when `input` (trimmed) is empty or only the root marker
pub fn is_root(input: &str) -> bool {
    let trimmed = input.trim();
    trimmed.is_empty() || trimmed == ROOT_MARKER
}
