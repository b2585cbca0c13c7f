//! Tokenizer and recursive-descent parser for formula text.
//!
//! Accepts numbers (with optional exponent), identifiers, `+ - * /`,
//! power as either `**` or `^`, unary sign, parentheses, and
//! comma-separated call arguments. Unknown characters are syntax errors;
//! unknown NAMES are not — they parse as identifiers and fail at
//! evaluation, preserving the deferred-failure contract of `compile`.

use crate::ast::{BinOp, Expr};
use crate::error::EvalError;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Pow,
    LParen,
    RParen,
    Comma,
    End,
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn lex_number(&mut self) -> Result<Token, EvalError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
            self.bump();
        }
        // Optional exponent: e / E, optionally signed.
        if self.peek() == Some('e') || self.peek() == Some('E') {
            let mark = self.pos;
            self.bump();
            if self.peek() == Some('+') || self.peek() == Some('-') {
                self.bump();
            }
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.bump();
                }
            } else {
                // Not an exponent after all; `e` is the Euler constant.
                self.pos = mark;
            }
        }
        let text = &self.src[start..self.pos];
        text.parse::<f64>().map(Token::Number).map_err(|_| EvalError::Syntax {
            position: start,
            message: format!("malformed number `{text}`"),
        })
    }

    fn next_token(&mut self) -> Result<(usize, Token), EvalError> {
        self.skip_whitespace();
        let position = self.pos;
        let Some(ch) = self.peek() else {
            return Ok((position, Token::End));
        };

        let token = match ch {
            '0'..='9' | '.' => self.lex_number()?,
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = self.pos;
                while self
                    .peek()
                    .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    self.bump();
                }
                Token::Ident(self.src[start..self.pos].to_owned())
            }
            '+' => {
                self.bump();
                Token::Plus
            }
            '-' => {
                self.bump();
                Token::Minus
            }
            '*' => {
                self.bump();
                if self.peek() == Some('*') {
                    self.bump();
                    Token::Pow
                } else {
                    Token::Star
                }
            }
            '^' => {
                self.bump();
                Token::Pow
            }
            '/' => {
                self.bump();
                Token::Slash
            }
            '(' => {
                self.bump();
                Token::LParen
            }
            ')' => {
                self.bump();
                Token::RParen
            }
            ',' => {
                self.bump();
                Token::Comma
            }
            other => {
                return Err(EvalError::Syntax {
                    position,
                    message: format!("unexpected character `{other}`"),
                })
            }
        };
        Ok((position, token))
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    position: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Result<Self, EvalError> {
        let mut lexer = Lexer::new(src);
        let (position, current) = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            position,
        })
    }

    fn advance(&mut self) -> Result<(), EvalError> {
        let (position, token) = self.lexer.next_token()?;
        self.position = position;
        self.current = token;
        Ok(())
    }

    fn error(&self, message: impl Into<String>) -> EvalError {
        EvalError::Syntax {
            position: self.position,
            message: message.into(),
        }
    }

    // expr := term { (+ | -) term }
    fn parse_expr(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.current {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance()?;
            let rhs = self.parse_term()?;
            lhs = Expr::Bin {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    // term := unary { (* | /) unary }
    fn parse_term(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.current {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                _ => break,
            };
            self.advance()?;
            let rhs = self.parse_unary()?;
            lhs = Expr::Bin {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    // unary := (+ | -) unary | power
    fn parse_unary(&mut self) -> Result<Expr, EvalError> {
        match self.current {
            Token::Minus => {
                self.advance()?;
                Ok(Expr::Neg(Box::new(self.parse_unary()?)))
            }
            Token::Plus => {
                self.advance()?;
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    // power := primary [ (** | ^) unary ]   (right-associative)
    fn parse_power(&mut self) -> Result<Expr, EvalError> {
        let base = self.parse_primary()?;
        if self.current == Token::Pow {
            self.advance()?;
            let exponent = self.parse_unary()?;
            return Ok(Expr::Bin {
                op: BinOp::Pow,
                lhs: Box::new(base),
                rhs: Box::new(exponent),
            });
        }
        Ok(base)
    }

    // primary := number | ident [ ( args ) ] | ( expr )
    fn parse_primary(&mut self) -> Result<Expr, EvalError> {
        match self.current.clone() {
            Token::Number(value) => {
                self.advance()?;
                Ok(Expr::Number(value))
            }
            Token::Ident(name) => {
                self.advance()?;
                if self.current == Token::LParen {
                    self.advance()?;
                    let mut args = Vec::new();
                    if self.current != Token::RParen {
                        loop {
                            args.push(self.parse_expr()?);
                            match self.current {
                                Token::Comma => self.advance()?,
                                Token::RParen => break,
                                _ => {
                                    return Err(self.error(format!(
                                        "expected `,` or `)` in call to `{name}`"
                                    )))
                                }
                            }
                        }
                    }
                    self.advance()?; // consume `)`
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Ident(name))
                }
            }
            Token::LParen => {
                self.advance()?;
                let inner = self.parse_expr()?;
                if self.current != Token::RParen {
                    return Err(self.error("missing closing parenthesis"));
                }
                self.advance()?;
                Ok(inner)
            }
            Token::End => Err(self.error("unexpected end of formula")),
            other => Err(self.error(format!("unexpected token {other:?}"))),
        }
    }
}

/// Parse formula text into an expression tree.
pub fn parse(src: &str) -> Result<Expr, EvalError> {
    let mut parser = Parser::new(src)?;
    let expr = parser.parse_expr()?;
    if parser.current != Token::End {
        return Err(parser.error("trailing input after formula"));
    }
    Ok(expr)
}
