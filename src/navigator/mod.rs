//! Path resolution
//!
//! Simple paths are walked directly over the value tree; anything else is
//! handed verbatim to the active [`ExpressionEngine`].

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::engine::{BuiltinEngine, ExpressionEngine};
use crate::error::NavigationError;
use crate::path::{PathKind, PathSegment, classify, is_root, parse_path};
use crate::value::Value;

/// Resolves paths and expressions against a root value
#[derive(Clone)]
pub struct Navigator {
    engine: Arc<dyn ExpressionEngine>,
}

impl Navigator {
    /// Create a navigator delegating complex input to `engine`
    pub fn new(engine: Arc<dyn ExpressionEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<dyn ExpressionEngine> {
        &self.engine
    }

    /// Resolve `input` against `root`.
    ///
    /// # Arguments
    /// * `root` - Value being browsed, bound to `_` for expressions
    /// * `input` - Path or expression; empty or `_` returns the root
    ///
    /// # Returns
    /// * `Result<Value, NavigationError>` - Resolved value, or the first
    ///   navigation failure. Engine failures are wrapped as `Evaluation`.
    pub fn resolve(&self, root: &Value, input: &str) -> Result<Value, NavigationError> {
        if is_root(input) {
            return Ok(root.clone());
        }

        match classify(input) {
            PathKind::Complex => self.evaluate(root, input),
            PathKind::Simple => {
                let segments = parse_path(input)?;
                if matches!(segments.last(), Some(PathSegment::Expr(_))) {
                    trace!(input, "simple path carries an expression tail");
                    return self.evaluate(root, input);
                }
                walk(root, &segments)
            }
        }
    }

    fn evaluate(&self, root: &Value, input: &str) -> Result<Value, NavigationError> {
        debug!(engine = self.engine.name(), input, "delegating to expression engine");
        self.engine
            .evaluate(input.trim(), root)
            .map_err(NavigationError::Evaluation)
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Arc::new(BuiltinEngine::new()))
    }
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("engine", &self.engine.name())
            .finish()
    }
}

/// Fold structural segments over `root`
pub fn walk(root: &Value, segments: &[PathSegment]) -> Result<Value, NavigationError> {
    let mut current = root.clone();
    for segment in segments {
        trace!(%segment, from = current.type_name(), "step");
        current = step(&current, segment)?;
    }
    Ok(current)
}

fn step(current: &Value, segment: &PathSegment) -> Result<Value, NavigationError> {
    if current.is_scalar() {
        return Err(NavigationError::NotNavigable {
            segment: segment.to_string(),
            type_name: current.type_name().to_string(),
        });
    }

    match segment {
        PathSegment::Field(name) => match current {
            Value::Sequence(_) => match name.parse::<i64>() {
                Ok(index) => index_step(current, index),
                Err(_) => Err(mismatch("map", current)),
            },
            _ => key_step(current, name),
        },
        PathSegment::QuotedKey(key) | PathSegment::Bracket(key) => key_step(current, key),
        PathSegment::Index(index) => index_step(current, *index),
        PathSegment::Expr(tail) => Err(NavigationError::InvalidSyntax(format!(
            "unexpected expression '{tail}' in path"
        ))),
    }
}

fn key_step(current: &Value, key: &str) -> Result<Value, NavigationError> {
    match current {
        Value::Record(_) | Value::External(_) => {
            current
                .get_key(key)
                .ok_or_else(|| NavigationError::KeyNotFound {
                    key: key.to_string(),
                })
        }
        other => Err(mismatch("map", other)),
    }
}

fn index_step(current: &Value, index: i64) -> Result<Value, NavigationError> {
    let Value::Sequence(items) = current else {
        return Err(mismatch("list", current));
    };
    usize::try_from(index)
        .ok()
        .and_then(|i| items.get(i))
        .cloned()
        .ok_or(NavigationError::IndexOutOfRange {
            index,
            len: items.len(),
        })
}

fn mismatch(expected: &str, found: &Value) -> NavigationError {
    NavigationError::TypeMismatch {
        expected: expected.to_string(),
        found: found.type_name().to_string(),
    }
}
