//! Recursive-descent parser for the built-in expression language
//!
//! Precedence, lowest first: `?:`, `||`, `&&`, relations (`== != < <= > >= in`),
//! `+ -`, `* / %`, unary `! -`, member access / indexing / calls.

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::lexer::{Lexer, Token, TokenKind};
use crate::error::EvalError;
use crate::value::Value;

/// Maximum nesting depth accepted by the parser
const MAX_DEPTH: usize = 128;

/// Parse an expression
pub fn parse(src: &str) -> Result<Expr, EvalError> {
    let tokens = Lexer::tokenize(src)?;
    let mut parser = Parser {
        tokens,
        idx: 0,
        depth: 0,
    };
    let expr = parser.expr()?;
    match parser.peek() {
        TokenKind::Eof => Ok(expr),
        other => Err(EvalError::syntax(format!(
            "unexpected {} at position {}",
            describe(other),
            parser.pos()
        ))),
    }
}

struct Parser {
    tokens: Vec<Token>,
    idx: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &TokenKind {
        self.tokens
            .get(self.idx)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    fn pos(&self) -> usize {
        self.tokens.get(self.idx).map(|t| t.pos).unwrap_or(0)
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.peek().clone();
        if self.idx < self.tokens.len() {
            self.idx += 1;
        }
        kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.idx += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), EvalError> {
        if self.eat(&kind) {
            Ok(())
        } else {
            Err(EvalError::syntax(format!(
                "expected {}, found {} at position {}",
                describe(&kind),
                describe(self.peek()),
                self.pos()
            )))
        }
    }

    fn enter(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::syntax("expression nested too deeply"));
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr, EvalError> {
        self.enter()?;
        let result = self.conditional();
        self.depth -= 1;
        result
    }

    fn conditional(&mut self) -> Result<Expr, EvalError> {
        let cond = self.or()?;
        if !self.eat(&TokenKind::Question) {
            return Ok(cond);
        }
        let then = self.expr()?;
        self.expect(TokenKind::Colon)?;
        let otherwise = self.expr()?;
        Ok(Expr::Conditional {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    fn or(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.and()?;
        while self.eat(&TokenKind::OrOr) {
            let right = self.and()?;
            left = binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn and(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.relation()?;
        while self.eat(&TokenKind::AndAnd) {
            let right = self.relation()?;
            left = binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn relation(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.addition()?;
        loop {
            let op = match self.peek() {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::Ne,
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Le => BinaryOp::Le,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::Ge => BinaryOp::Ge,
                TokenKind::Ident(word) if word == "in" => BinaryOp::In,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.addition()?;
            left = binary(op, left, right);
        }
    }

    fn addition(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.multiplication()?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.multiplication()?;
            left = binary(op, left, right);
        }
    }

    fn multiplication(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.unary()?;
            left = binary(op, left, right);
        }
    }

    fn unary(&mut self) -> Result<Expr, EvalError> {
        let op = match self.peek() {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            _ => return self.member(),
        };
        self.advance();
        self.enter()?;
        let operand = self.unary();
        self.depth -= 1;
        let operand = operand?;

        // fold negated numeric literals
        if op == UnaryOp::Neg {
            match operand {
                Expr::Literal(Value::Int(n)) => return Ok(Expr::Literal(Value::Int(-n))),
                Expr::Literal(Value::Float(f)) => return Ok(Expr::Literal(Value::Float(-f))),
                _ => {}
            }
        }
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn member(&mut self) -> Result<Expr, EvalError> {
        let mut expr = self.primary()?;
        loop {
            match self.peek() {
                TokenKind::Dot => {
                    self.advance();
                    let field = match self.advance() {
                        TokenKind::Ident(name) => name,
                        other => {
                            return Err(EvalError::syntax(format!(
                                "expected field name after '.', found {}",
                                describe(&other)
                            )));
                        }
                    };
                    if self.eat(&TokenKind::LParen) {
                        let args = self.arguments(TokenKind::RParen)?;
                        expr = Expr::Call {
                            target: Some(Box::new(expr)),
                            function: field,
                            args,
                        };
                    } else {
                        expr = Expr::Select {
                            operand: Box::new(expr),
                            field,
                        };
                    }
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.expr()?;
                    self.expect(TokenKind::RBracket)?;
                    expr = Expr::Index {
                        operand: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, EvalError> {
        let pos = self.pos();
        match self.advance() {
            TokenKind::Int(n) => Ok(Expr::Literal(Value::Int(n))),
            TokenKind::Float(f) => Ok(Expr::Literal(Value::Float(f))),
            TokenKind::Str(s) => Ok(Expr::Literal(Value::String(s))),
            TokenKind::Ident(name) => match name.as_str() {
                "true" => Ok(Expr::Literal(Value::Bool(true))),
                "false" => Ok(Expr::Literal(Value::Bool(false))),
                "null" => Ok(Expr::Literal(Value::Null)),
                _ => {
                    if self.eat(&TokenKind::LParen) {
                        let args = self.arguments(TokenKind::RParen)?;
                        Ok(Expr::Call {
                            target: None,
                            function: name,
                            args,
                        })
                    } else {
                        Ok(Expr::Ident(name))
                    }
                }
            },
            TokenKind::LParen => {
                let inner = self.expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::LBracket => Ok(Expr::List(self.arguments(TokenKind::RBracket)?)),
            TokenKind::LBrace => self.map_literal(),
            other => Err(EvalError::syntax(format!(
                "unexpected {} at position {pos}",
                describe(&other)
            ))),
        }
    }

    /// Comma-separated expressions up to `close`; a trailing comma is allowed
    fn arguments(&mut self, close: TokenKind) -> Result<Vec<Expr>, EvalError> {
        let mut items = Vec::new();
        if self.eat(&close) {
            return Ok(items);
        }
        loop {
            items.push(self.expr()?);
            if self.eat(&close) {
                return Ok(items);
            }
            self.expect(TokenKind::Comma)?;
            if self.eat(&close) {
                return Ok(items);
            }
        }
    }

    fn map_literal(&mut self) -> Result<Expr, EvalError> {
        let mut entries = Vec::new();
        if self.eat(&TokenKind::RBrace) {
            return Ok(Expr::Map(entries));
        }
        loop {
            let key = self.expr()?;
            self.expect(TokenKind::Colon)?;
            let value = self.expr()?;
            entries.push((key, value));
            if self.eat(&TokenKind::RBrace) {
                return Ok(Expr::Map(entries));
            }
            self.expect(TokenKind::Comma)?;
            if self.eat(&TokenKind::RBrace) {
                return Ok(Expr::Map(entries));
            }
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Ident(name) => format!("identifier '{name}'"),
        TokenKind::Int(n) => format!("integer {n}"),
        TokenKind::Float(f) => format!("number {f}"),
        TokenKind::Str(_) => "string literal".to_string(),
        TokenKind::Eof => "end of input".to_string(),
        TokenKind::Dot => "'.'".to_string(),
        TokenKind::Comma => "','".to_string(),
        TokenKind::Colon => "':'".to_string(),
        TokenKind::Question => "'?'".to_string(),
        TokenKind::LParen => "'('".to_string(),
        TokenKind::RParen => "')'".to_string(),
        TokenKind::LBracket => "'['".to_string(),
        TokenKind::RBracket => "']'".to_string(),
        TokenKind::LBrace => "'{'".to_string(),
        TokenKind::RBrace => "'}'".to_string(),
        other => format!("operator {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Box<Expr> {
        Box::new(Expr::Ident(name.to_string()))
    }

    #[test]
    fn test_select_chain() {
        let expr = parse("_.users.name").unwrap();
        assert_eq!(
            expr,
            Expr::Select {
                operand: Box::new(Expr::Select {
                    operand: ident("_"),
                    field: "users".to_string(),
                }),
                field: "name".to_string(),
            }
        );
    }

    #[test]
    fn test_method_call_and_index() {
        let expr = parse("_.items[0].size()").unwrap();
        match expr {
            Expr::Call {
                target: Some(target),
                function,
                args,
            } => {
                assert_eq!(function, "size");
                assert!(args.is_empty());
                assert!(matches!(*target, Expr::Index { .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_precedence() {
        let expr = parse("1 + 2 * 3 == 7 && true").unwrap();
        match expr {
            Expr::Binary {
                op: BinaryOp::And,
                left,
                ..
            } => assert!(matches!(
                *left,
                Expr::Binary {
                    op: BinaryOp::Eq,
                    ..
                }
            )),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse("-5").unwrap(), Expr::Literal(Value::Int(-5)));
        assert!(matches!(parse("[1, 2,]").unwrap(), Expr::List(items) if items.len() == 2));
        assert!(matches!(parse(r#"{"a": 1}"#).unwrap(), Expr::Map(entries) if entries.len() == 1));
        assert!(matches!(parse("a ? 1 : 2").unwrap(), Expr::Conditional { .. }));
    }

    #[test]
    fn test_incomplete_input_fails() {
        assert!(parse("_.").is_err());
        assert!(parse("_.items[").is_err());
        assert!(parse("size(").is_err());
        assert!(parse("a b").is_err());
        assert!(parse("").is_err());
    }
}
