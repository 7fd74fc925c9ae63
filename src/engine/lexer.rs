//! Tokenizer for the built-in expression language
//!
//! Unlike the path scanner, this lexer is strict: unknown characters and
//! unterminated strings are syntax errors. Callers that need tolerance for
//! half-typed input (completion) treat a failure as "fall back", not as a
//! diagnostic.

use crate::error::EvalError;

/// Token types
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    Dot,
    Comma,
    Colon,
    Question,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
    Eof,
}

/// Token with its byte offset in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: usize,
}

/// Expression lexer
pub struct Lexer<'a> {
    src: &'a str,
    chars: Vec<(usize, char)>,
    idx: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().collect(),
            idx: 0,
        }
    }

    /// Tokenize the entire input, ending with `Eof`
    pub fn tokenize(src: &str) -> Result<Vec<Token>, EvalError> {
        let mut lexer = Lexer::new(src);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.idx).map(|(_, c)| *c)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.idx + offset).map(|(_, c)| *c)
    }

    fn offset(&self) -> usize {
        self.chars
            .get(self.idx)
            .map(|(p, _)| *p)
            .unwrap_or(self.src.len())
    }

    fn next_token(&mut self) -> Result<Token, EvalError> {
        while self.peek().is_some_and(char::is_whitespace) {
            self.idx += 1;
        }

        let pos = self.offset();
        let Some(c) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                pos,
            });
        };

        let two = |lexer: &mut Self, kind: TokenKind| -> Result<Token, EvalError> {
            lexer.idx += 2;
            Ok(Token { kind, pos })
        };
        let one = |lexer: &mut Self, kind: TokenKind| -> Result<Token, EvalError> {
            lexer.idx += 1;
            Ok(Token { kind, pos })
        };

        match (c, self.peek_at(1)) {
            ('=', Some('=')) => two(self, TokenKind::EqEq),
            ('!', Some('=')) => two(self, TokenKind::NotEq),
            ('<', Some('=')) => two(self, TokenKind::Le),
            ('>', Some('=')) => two(self, TokenKind::Ge),
            ('&', Some('&')) => two(self, TokenKind::AndAnd),
            ('|', Some('|')) => two(self, TokenKind::OrOr),
            ('<', _) => one(self, TokenKind::Lt),
            ('>', _) => one(self, TokenKind::Gt),
            ('!', _) => one(self, TokenKind::Bang),
            ('.', Some(d)) if d.is_ascii_digit() => self.number(pos),
            ('.', _) => one(self, TokenKind::Dot),
            (',', _) => one(self, TokenKind::Comma),
            (':', _) => one(self, TokenKind::Colon),
            ('?', _) => one(self, TokenKind::Question),
            ('(', _) => one(self, TokenKind::LParen),
            (')', _) => one(self, TokenKind::RParen),
            ('[', _) => one(self, TokenKind::LBracket),
            (']', _) => one(self, TokenKind::RBracket),
            ('{', _) => one(self, TokenKind::LBrace),
            ('}', _) => one(self, TokenKind::RBrace),
            ('+', _) => one(self, TokenKind::Plus),
            ('-', _) => one(self, TokenKind::Minus),
            ('*', _) => one(self, TokenKind::Star),
            ('/', _) => one(self, TokenKind::Slash),
            ('%', _) => one(self, TokenKind::Percent),
            ('"', _) | ('\'', _) => self.string(pos, c),
            (d, _) if d.is_ascii_digit() => self.number(pos),
            (a, _) if a.is_alphabetic() || a == '_' => Ok(self.ident(pos)),
            (other, _) => Err(EvalError::syntax(format!(
                "unexpected character '{other}' at position {pos}"
            ))),
        }
    }

    fn ident(&mut self, pos: usize) -> Token {
        let start = self.idx;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.idx += 1;
        }
        let text: String = self.chars[start..self.idx].iter().map(|(_, c)| c).collect();
        Token {
            kind: TokenKind::Ident(text),
            pos,
        }
    }

    fn number(&mut self, pos: usize) -> Result<Token, EvalError> {
        let start = self.idx;
        let mut is_float = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.idx += 1;
            } else if c == '.' && !is_float && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) {
                is_float = true;
                self.idx += 1;
            } else if (c == 'e' || c == 'E')
                && self
                    .peek_at(1)
                    .is_some_and(|d| d.is_ascii_digit() || d == '-' || d == '+')
            {
                is_float = true;
                self.idx += 2;
            } else {
                break;
            }
        }
        let text: String = self.chars[start..self.idx].iter().map(|(_, c)| c).collect();

        let kind = if is_float || text.starts_with('.') {
            text.parse::<f64>().map(TokenKind::Float).map_err(|_| {
                EvalError::syntax(format!("invalid number '{text}' at position {pos}"))
            })?
        } else {
            text.parse::<i64>().map(TokenKind::Int).map_err(|_| {
                EvalError::syntax(format!("integer literal '{text}' out of range"))
            })?
        };
        Ok(Token { kind, pos })
    }

    fn string(&mut self, pos: usize, quote: char) -> Result<Token, EvalError> {
        self.idx += 1;
        let mut out = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(EvalError::syntax(format!(
                        "unterminated string starting at position {pos}"
                    )));
                }
                Some(c) if c == quote => {
                    self.idx += 1;
                    return Ok(Token {
                        kind: TokenKind::Str(out),
                        pos,
                    });
                }
                Some('\\') => {
                    self.idx += 1;
                    let escaped = match self.peek() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some(other) => other,
                        None => continue,
                    };
                    out.push(escaped);
                    self.idx += 1;
                }
                Some(c) => {
                    out.push(c);
                    self.idx += 1;
                }
            }
        }
    }
}
