//! Expression engines
//!
//! The navigator and completion engine only talk to an engine through the
//! [`ExpressionEngine`] trait, so the active engine can be swapped at runtime
//! (see [`Session`](crate::session::Session)). [`BuiltinEngine`] is the
//! default: a CEL-flavoured subset with the root document bound to `_`.

pub mod ast;
mod eval;
mod functions;
mod lexer;
mod parser;

use std::collections::HashMap;
use std::fmt;

use tracing::trace;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use parser::parse;

use crate::error::EvalError;
use crate::registry::FunctionMetadata;
use crate::value::Value;
use eval::Evaluator;
use functions::Builtin;

/// Interface of a pluggable expression evaluator.
pub trait ExpressionEngine: Send + Sync {
    /// Engine name shown in diagnostics
    fn name(&self) -> &str;

    /// Parse an expression into the shared AST without evaluating it.
    ///
    /// Used by completion to probe the structure of partial input.
    fn compile(&self, expr: &str) -> Result<Expr, EvalError>;

    /// Evaluate an expression with `root` bound to the root identifier
    fn evaluate(&self, expr: &str, root: &Value) -> Result<Value, EvalError>;

    /// Functions available in this engine's environment
    fn functions(&self) -> Vec<FunctionMetadata>;

    /// Macros available in this engine's environment
    fn macros(&self) -> Vec<FunctionMetadata>;
}

/// Default engine
pub struct BuiltinEngine {
    functions: HashMap<String, Builtin>,
}

impl BuiltinEngine {
    pub fn new() -> Self {
        let functions = functions::builtins()
            .into_iter()
            .map(|builtin| (builtin.meta.name.clone(), builtin))
            .collect();
        Self { functions }
    }
}

impl Default for BuiltinEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BuiltinEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinEngine")
            .field("functions", &self.functions.len())
            .finish()
    }
}

impl ExpressionEngine for BuiltinEngine {
    fn name(&self) -> &str {
        "builtin"
    }

    fn compile(&self, expr: &str) -> Result<Expr, EvalError> {
        parse(expr)
    }

    fn evaluate(&self, expr: &str, root: &Value) -> Result<Value, EvalError> {
        let ast = parse(expr)?;
        trace!(expr, "evaluating");
        Evaluator::new(root, &self.functions).eval(&ast)
    }

    fn functions(&self) -> Vec<FunctionMetadata> {
        let mut metas: Vec<FunctionMetadata> =
            self.functions.values().map(|b| b.meta.clone()).collect();
        metas.sort_by(|a, b| a.name.cmp(&b.name));
        metas
    }

    fn macros(&self) -> Vec<FunctionMetadata> {
        functions::macro_metadata()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalErrorKind;

    fn doc() -> Value {
        Value::from(serde_json::json!({
            "name": "Ada",
            "tags": ["x", "y"],
            "items": [{"id": 1, "price": 2.5}, {"id": 2, "price": 10}],
            "meta": {"count": 3}
        }))
    }

    fn eval(expr: &str) -> Result<Value, EvalError> {
        BuiltinEngine::new().evaluate(expr, &doc())
    }

    #[test]
    fn test_member_access_and_indexing() {
        assert_eq!(eval("_.items[1].id").unwrap(), Value::Int(2));
        assert_eq!(eval("_[\"name\"]").unwrap(), Value::from("Ada"));
        assert_eq!(eval("meta.count").unwrap(), Value::Int(3));
        assert_eq!(eval("_").unwrap(), doc());
    }

    #[test]
    fn test_operators() {
        assert_eq!(eval("_.meta.count * 2 + 1").unwrap(), Value::Int(7));
        assert_eq!(eval("_.items[0].price < 3").unwrap(), Value::Bool(true));
        assert_eq!(eval("'x' in _.tags && !false").unwrap(), Value::Bool(true));
        assert_eq!(eval("1 == 1.0").unwrap(), Value::Bool(true));
        assert_eq!(eval("_.meta.count > 1 ? 'many' : 'few'").unwrap(), Value::from("many"));
        // right side never evaluated
        assert_eq!(eval("false && _.missing").unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_calls() {
        assert_eq!(eval("size(_.items)").unwrap(), Value::Int(2));
        assert_eq!(eval("_.name.size()").unwrap(), Value::Int(3));
        assert_eq!(eval("_.name.lowerAscii()").unwrap(), Value::from("ada"));
        assert_eq!(eval("_.tags.join(',')").unwrap(), Value::from("x,y"));
    }

    #[test]
    fn test_macros() {
        assert_eq!(
            eval("_.items.filter(i, i.id > 1).map(i, i.id)").unwrap(),
            Value::Sequence(vec![Value::Int(2)])
        );
        assert_eq!(eval("_.items.all(i, i.id > 0)").unwrap(), Value::Bool(true));
        assert_eq!(eval("_.tags.exists(t, t == 'y')").unwrap(), Value::Bool(true));
        assert_eq!(eval("_.tags.exists_one(t, t != 'q')").unwrap(), Value::Bool(false));
        assert_eq!(eval("has(_.meta.count)").unwrap(), Value::Bool(true));
        assert_eq!(eval("has(_.meta.other)").unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_errors() {
        assert_eq!(eval("nope").unwrap_err().kind, EvalErrorKind::UnknownIdentifier);
        assert_eq!(eval("nope(1)").unwrap_err().kind, EvalErrorKind::UnknownFunction);
        assert_eq!(eval("1 / 0").unwrap_err().kind, EvalErrorKind::DivisionByZero);
        assert_eq!(eval("_.items[5]").unwrap_err().kind, EvalErrorKind::Index);
        assert_eq!(eval("_.meta.other").unwrap_err().kind, EvalErrorKind::Key);
        assert_eq!(eval("'a' - 1").unwrap_err().kind, EvalErrorKind::Type);
        assert_eq!(eval("_.items[").unwrap_err().kind, EvalErrorKind::Syntax);
    }

    #[test]
    fn test_compile_shapes() {
        let engine = BuiltinEngine::new();
        assert!(matches!(
            engine.compile("_.users").unwrap(),
            Expr::Select { ref field, .. } if field == "users"
        ));
        assert_eq!(engine.compile("_").unwrap(), Expr::Ident("_".to_string()));
        assert!(engine.compile("_.").is_err());
    }

    #[test]
    fn test_metadata() {
        let engine = BuiltinEngine::new();
        let functions = engine.functions();
        assert!(functions.iter().any(|f| f.name == "size"));
        assert!(functions.windows(2).all(|w| w[0].name <= w[1].name));
        assert!(engine.macros().iter().any(|m| m.name == "filter"));
    }
}
