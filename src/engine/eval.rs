//! Tree-walking evaluator for the built-in engine

use std::cmp::Ordering;
use std::collections::HashMap;

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::functions::{Builtin, compare};
use crate::error::{EvalError, EvalErrorKind};
use crate::path::ROOT_MARKER;
use crate::value::{Record, Value};

/// Comprehension macros expanded by the evaluator
const COMPREHENSIONS: [&str; 5] = ["all", "exists", "exists_one", "filter", "map"];

/// Evaluation state: the root document, the function table and bound
/// comprehension variables (innermost last).
pub struct Evaluator<'a> {
    root: &'a Value,
    functions: &'a HashMap<String, Builtin>,
    scopes: Vec<(String, Value)>,
}

impl<'a> Evaluator<'a> {
    pub fn new(root: &'a Value, functions: &'a HashMap<String, Builtin>) -> Self {
        Self {
            root,
            functions,
            scopes: Vec::new(),
        }
    }

    pub fn eval(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Ident(name) => self.ident(name),
            Expr::Literal(value) => Ok(value.clone()),
            Expr::List(items) => items
                .iter()
                .map(|item| self.eval(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Sequence),
            Expr::Map(entries) => {
                let mut record = Record::new();
                for (key, value) in entries {
                    let key = match self.eval(key)? {
                        Value::String(s) => s,
                        Value::Int(i) => i.to_string(),
                        Value::Bool(b) => b.to_string(),
                        other => {
                            return Err(EvalError::type_error(format!(
                                "map keys must be strings, got {}",
                                other.type_name()
                            )));
                        }
                    };
                    let value = self.eval(value)?;
                    record.insert(key, value);
                }
                Ok(Value::Record(record))
            }
            Expr::Select { operand, field } => {
                let target = self.eval(operand)?;
                select(&target, field)
            }
            Expr::Index { operand, index } => {
                let target = self.eval(operand)?;
                let index = self.eval(index)?;
                index_value(&target, &index)
            }
            Expr::Call {
                target,
                function,
                args,
            } => self.call(target.as_deref(), function, args),
            Expr::Unary { op, operand } => {
                let value = self.eval(operand)?;
                unary(*op, value)
            }
            Expr::Binary { op, left, right } => self.binary(*op, left, right),
            Expr::Conditional {
                cond,
                then,
                otherwise,
            } => match self.eval(cond)? {
                Value::Bool(true) => self.eval(then),
                Value::Bool(false) => self.eval(otherwise),
                other => Err(EvalError::type_error(format!(
                    "condition must be bool, got {}",
                    other.type_name()
                ))),
            },
        }
    }

    fn ident(&self, name: &str) -> Result<Value, EvalError> {
        if let Some((_, value)) = self.scopes.iter().rev().find(|(n, _)| n == name) {
            return Ok(value.clone());
        }
        if name == ROOT_MARKER {
            return Ok(self.root.clone());
        }
        // top-level keys of the root are visible unqualified
        self.root.get_key(name).ok_or_else(|| {
            EvalError::new(
                EvalErrorKind::UnknownIdentifier,
                format!("undeclared reference to '{name}'"),
            )
        })
    }

    fn call(
        &mut self,
        target: Option<&Expr>,
        function: &str,
        args: &[Expr],
    ) -> Result<Value, EvalError> {
        match target {
            Some(receiver) if COMPREHENSIONS.contains(&function) => {
                self.comprehension(receiver, function, args)
            }
            None if function == "has" => self.has(args),
            _ => {
                let builtin = self.functions.get(function).ok_or_else(|| {
                    EvalError::new(
                        EvalErrorKind::UnknownFunction,
                        format!("undeclared reference to function '{function}'"),
                    )
                })?;

                let mut values = Vec::with_capacity(args.len() + 1);
                if let Some(receiver) = target {
                    values.push(self.eval(receiver)?);
                }
                for arg in args {
                    values.push(self.eval(arg)?);
                }
                (builtin.call)(&values)
            }
        }
    }

    /// `has(x.f)`: true when `x` is a map-like value carrying `f`
    fn has(&mut self, args: &[Expr]) -> Result<Value, EvalError> {
        let [Expr::Select { operand, field }] = args else {
            return Err(EvalError::syntax(
                "has() expects a single field selection argument, e.g. has(x.f)",
            ));
        };
        match self.eval(operand)? {
            v @ (Value::Record(_) | Value::External(_)) => {
                Ok(Value::Bool(v.get_key(field).is_some()))
            }
            other => Err(EvalError::type_error(format!(
                "has() is not defined for {}",
                other.type_name()
            ))),
        }
    }

    /// `receiver.macro(var, body)`
    fn comprehension(
        &mut self,
        receiver: &Expr,
        function: &str,
        args: &[Expr],
    ) -> Result<Value, EvalError> {
        let [Expr::Ident(var), body] = args else {
            return Err(EvalError::syntax(format!(
                "{function}() expects a variable name and an expression"
            )));
        };

        // maps iterate over their keys
        let items = match self.eval(receiver)? {
            Value::Sequence(items) => items,
            v @ (Value::Record(_) | Value::External(_)) => {
                v.keys().into_iter().map(Value::String).collect()
            }
            other => {
                return Err(EvalError::type_error(format!(
                    "{function}() is not defined for {}",
                    other.type_name()
                )));
            }
        };

        let mut kept = Vec::new();
        let mut hits = 0usize;
        for item in items {
            self.scopes.push((var.clone(), item.clone()));
            let result = self.eval(body);
            self.scopes.pop();
            let result = result?;

            if function == "map" {
                kept.push(result);
                continue;
            }
            let Value::Bool(holds) = result else {
                return Err(EvalError::type_error(format!(
                    "{function}() predicate must be bool, got {}",
                    result.type_name()
                )));
            };
            match function {
                "all" if !holds => return Ok(Value::Bool(false)),
                "exists" if holds => return Ok(Value::Bool(true)),
                "filter" if holds => kept.push(item),
                _ if holds => hits += 1,
                _ => {}
            }
        }

        Ok(match function {
            "all" => Value::Bool(true),
            "exists" => Value::Bool(false),
            "exists_one" => Value::Bool(hits == 1),
            _ => Value::Sequence(kept),
        })
    }

    fn binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<Value, EvalError> {
        // short-circuit
        if matches!(op, BinaryOp::And | BinaryOp::Or) {
            let lhs = self.bool_operand(op, left)?;
            return match (op, lhs) {
                (BinaryOp::And, false) => Ok(Value::Bool(false)),
                (BinaryOp::Or, true) => Ok(Value::Bool(true)),
                _ => self.bool_operand(op, right).map(Value::Bool),
            };
        }

        let lhs = self.eval(left)?;
        let rhs = self.eval(right)?;
        match op {
            BinaryOp::Eq => Ok(Value::Bool(equals(&lhs, &rhs))),
            BinaryOp::Ne => Ok(Value::Bool(!equals(&lhs, &rhs))),
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                let ordering = compare(&lhs, &rhs).ok_or_else(|| {
                    EvalError::type_error(format!(
                        "no such overload: {} {op} {}",
                        lhs.type_name(),
                        rhs.type_name()
                    ))
                })?;
                let holds = match op {
                    BinaryOp::Lt => ordering == Ordering::Less,
                    BinaryOp::Le => ordering != Ordering::Greater,
                    BinaryOp::Gt => ordering == Ordering::Greater,
                    _ => ordering != Ordering::Less,
                };
                Ok(Value::Bool(holds))
            }
            BinaryOp::In => membership(&lhs, &rhs),
            _ => arithmetic(op, lhs, rhs),
        }
    }

    fn bool_operand(&mut self, op: BinaryOp, expr: &Expr) -> Result<bool, EvalError> {
        match self.eval(expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(EvalError::type_error(format!(
                "operator {op} expects bool operands, got {}",
                other.type_name()
            ))),
        }
    }
}

fn select(target: &Value, field: &str) -> Result<Value, EvalError> {
    match target {
        Value::Record(_) | Value::External(_) => target.get_key(field).ok_or_else(|| {
            EvalError::new(EvalErrorKind::Key, format!("no such key: '{field}'"))
        }),
        other => Err(EvalError::type_error(format!(
            "cannot select field '{field}' from {}",
            other.type_name()
        ))),
    }
}

fn index_value(target: &Value, index: &Value) -> Result<Value, EvalError> {
    match (target, index) {
        (Value::Sequence(items), Value::Int(i)) => usize::try_from(*i)
            .ok()
            .and_then(|i| items.get(i))
            .cloned()
            .ok_or_else(|| {
                EvalError::new(
                    EvalErrorKind::Index,
                    format!("index {i} out of range for list of size {}", items.len()),
                )
            }),
        (Value::Record(_) | Value::External(_), Value::String(key)) => select(target, key),
        (Value::Record(r), Value::Int(i)) => r.get(&i.to_string()).cloned().ok_or_else(|| {
            EvalError::new(EvalErrorKind::Key, format!("no such key: {i}"))
        }),
        (target, index) => Err(EvalError::type_error(format!(
            "cannot index {} with {}",
            target.type_name(),
            index.type_name()
        ))),
    }
}

fn unary(op: UnaryOp, value: Value) -> Result<Value, EvalError> {
    match (op, value) {
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Neg, Value::Int(i)) => i
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| EvalError::type_error("integer overflow")),
        (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (op, other) => Err(EvalError::type_error(format!(
            "no such overload: {}{}",
            if op == UnaryOp::Not { "!" } else { "-" },
            other.type_name()
        ))),
    }
}

/// Equality with numeric cross-type comparison
fn equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(_), Value::Float(_)) | (Value::Float(_), Value::Int(_)) => {
            compare(a, b) == Some(Ordering::Equal)
        }
        _ => a == b,
    }
}

fn membership(needle: &Value, haystack: &Value) -> Result<Value, EvalError> {
    match haystack {
        Value::Sequence(items) => Ok(Value::Bool(items.iter().any(|item| equals(item, needle)))),
        Value::Record(_) | Value::External(_) => match needle {
            Value::String(key) => Ok(Value::Bool(haystack.get_key(key).is_some())),
            _ => Ok(Value::Bool(false)),
        },
        other => Err(EvalError::type_error(format!(
            "'in' is not defined for {}",
            other.type_name()
        ))),
    }
}

fn arithmetic(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    let overflow = || EvalError::type_error(format!("integer overflow in {op}"));
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => {
            let result = match op {
                BinaryOp::Add => a.checked_add(b),
                BinaryOp::Sub => a.checked_sub(b),
                BinaryOp::Mul => a.checked_mul(b),
                BinaryOp::Div | BinaryOp::Mod if b == 0 => {
                    return Err(EvalError::new(
                        EvalErrorKind::DivisionByZero,
                        "division by zero",
                    ));
                }
                BinaryOp::Div => a.checked_div(b),
                _ => a.checked_rem(b),
            };
            result.map(Value::Int).ok_or_else(overflow)
        }
        (Value::Int(a), Value::Float(b)) => float_arithmetic(op, a as f64, b),
        (Value::Float(a), Value::Int(b)) => float_arithmetic(op, a, b as f64),
        (Value::Float(a), Value::Float(b)) => float_arithmetic(op, a, b),
        (Value::String(a), Value::String(b)) if op == BinaryOp::Add => {
            Ok(Value::String(a + &b))
        }
        (Value::Sequence(mut a), Value::Sequence(b)) if op == BinaryOp::Add => {
            a.extend(b);
            Ok(Value::Sequence(a))
        }
        (Value::Bytes(mut a), Value::Bytes(b)) if op == BinaryOp::Add => {
            a.extend(b);
            Ok(Value::Bytes(a))
        }
        (a, b) => Err(EvalError::type_error(format!(
            "no such overload: {} {op} {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

fn float_arithmetic(op: BinaryOp, a: f64, b: f64) -> Result<Value, EvalError> {
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        _ => {
            return Err(EvalError::type_error("no such overload: double % double"));
        }
    };
    Ok(Value::Float(result))
}
