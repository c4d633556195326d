//! Recursive-descent parser.
//!
//! The expression grammar is a fixed call nesting rather than a precedence
//! table:
//!
//! ```text
//! logical_or  := logical_and ("||" logical_and)*
//! logical_and := unary ("&&" unary)*
//! unary       := "!" unary | comparison
//! comparison  := additive (("<"|">"|"<="|">="|"=="|"!=") additive)*
//! additive    := term (("+"|"-") term)*
//! term        := primary (("*"|"/"|"%") primary)*
//! primary     := number | "true" | "false" | identifier
//!              | "(" logical_or ")" | "-" primary
//! ```
//!
//! Because `!` sits between `&&` and the comparisons, `!a && b` groups as
//! `(!a) && b` while `!a < b` groups as `!(a < b)`.
//!
//! Errors never abort the parse. A failing production records one
//! [`ParseError`] and yields `None`; the statement loops then skip a single
//! token and try again.

use crate::ast::{BinOp, CmpOp, Expr, LogicOp, Stmt, UnaryOp};
use crate::token::{Token, TokenKind};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Error, PartialEq)]
#[error("line {line}, column {column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

/// Result of a parse: every statement that could be built plus every
/// diagnostic recorded along the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parsed {
    pub statements: Vec<Stmt>,
    pub errors: Vec<ParseError>,
}

impl Parsed {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parses a complete token stream into top-level statements.
pub fn parse_program(tokens: &[Token]) -> Parsed {
    Parser::new(tokens).parse()
}

pub struct Parser<'t> {
    tokens: &'t [Token],
    current: usize,
    errors: Vec<ParseError>,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            current: 0,
            errors: Vec::new(),
        }
    }

    pub fn parse(mut self) -> Parsed {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            match self.statement() {
                Some(stmt) => statements.push(stmt),
                None => self.skip(),
            }
        }
        Parsed {
            statements,
            errors: self.errors,
        }
    }

    // ------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.current)
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().map_or(TokenKind::Eof, |t| t.kind)
    }

    fn is_at_end(&self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn advance(&mut self) -> Option<&'t Token> {
        let token = self.peek()?;
        if token.kind != TokenKind::Eof {
            self.current += 1;
        }
        Some(token)
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Resynchronization step after a failed statement.
    fn skip(&mut self) {
        self.advance();
    }

    fn error(&mut self, message: &str) {
        let (line, column, found) = match self.peek().or_else(|| self.tokens.last()) {
            Some(token) if token.kind == TokenKind::Eof => {
                (token.line, token.column, "end of input".to_string())
            }
            Some(token) => (token.line, token.column, format!("'{}'", token.text)),
            None => (1, 1, "end of input".to_string()),
        };
        let error = ParseError {
            message: format!("{}, found {}", message, found),
            line,
            column,
        };
        warn!("parse error at {}", error);
        self.errors.push(error);
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Option<&'t Token> {
        if self.check(kind) {
            self.advance()
        } else {
            self.error(message);
            None
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn statement(&mut self) -> Option<Stmt> {
        match self.peek_kind() {
            TokenKind::Print => self.print_statement(),
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::For => self.for_statement(),
            TokenKind::LeftBrace => self.block(),
            _ => self.assignment(),
        }
    }

    fn print_statement(&mut self) -> Option<Stmt> {
        self.advance();
        self.expect(TokenKind::LeftParen, "Expected '(' after 'print'")?;
        let expr = self.logical_or()?;
        self.expect(TokenKind::RightParen, "Expected ')' after print argument")?;
        self.matches(TokenKind::Semicolon);
        Some(Stmt::Print(expr))
    }

    fn if_statement(&mut self) -> Option<Stmt> {
        self.advance();
        let condition = self.parenthesized_condition("if")?;
        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.matches(TokenKind::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Some(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn while_statement(&mut self) -> Option<Stmt> {
        self.advance();
        let condition = self.parenthesized_condition("while")?;
        let body = Box::new(self.statement()?);
        Some(Stmt::While { condition, body })
    }

    fn for_statement(&mut self) -> Option<Stmt> {
        self.advance();
        self.expect(TokenKind::LeftParen, "Expected '(' after 'for'")?;

        let init = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.header_assignment()?))
        };
        self.expect(TokenKind::Semicolon, "Expected ';' after for-loop initializer")?;

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.logical_or()?)
        };
        self.expect(TokenKind::Semicolon, "Expected ';' after for-loop condition")?;

        let update = if self.check(TokenKind::RightParen) {
            None
        } else {
            Some(Box::new(self.header_assignment()?))
        };
        self.expect(TokenKind::RightParen, "Expected ')' after for-loop header")?;

        let body = Box::new(self.statement()?);
        Some(Stmt::For {
            init,
            condition,
            update,
            body,
        })
    }

    fn block(&mut self) -> Option<Stmt> {
        self.advance();
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            match self.statement() {
                Some(stmt) => stmts.push(stmt),
                None => self.skip(),
            }
        }
        self.expect(TokenKind::RightBrace, "Expected '}' to close block")?;
        Some(Stmt::Block(stmts))
    }

    fn assignment(&mut self) -> Option<Stmt> {
        let stmt = self.header_assignment()?;
        self.matches(TokenKind::Semicolon);
        Some(stmt)
    }

    /// `identifier "=" logical_or` with no trailing terminator.
    fn header_assignment(&mut self) -> Option<Stmt> {
        let name = self.expect(TokenKind::Identifier, "Expected identifier")?;
        self.expect(TokenKind::Assign, "Expected '=' after identifier")?;
        let value = self.logical_or()?;
        Some(Stmt::Assign {
            target: name.text.clone(),
            value,
        })
    }

    fn parenthesized_condition(&mut self, keyword: &str) -> Option<Expr> {
        self.expect(
            TokenKind::LeftParen,
            &format!("Expected '(' after '{}'", keyword),
        )?;
        let condition = self.logical_or()?;
        self.expect(
            TokenKind::RightParen,
            &format!("Expected ')' after {} condition", keyword),
        )?;
        Some(condition)
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn logical_or(&mut self) -> Option<Expr> {
        let mut left = self.logical_and()?;
        while self.matches(TokenKind::OrOr) {
            let right = self.logical_and()?;
            left = Expr::LogicalOp {
                op: LogicOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Some(left)
    }

    fn logical_and(&mut self) -> Option<Expr> {
        let mut left = self.unary()?;
        while self.matches(TokenKind::AndAnd) {
            let right = self.unary()?;
            left = Expr::LogicalOp {
                op: LogicOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Some(left)
    }

    fn unary(&mut self) -> Option<Expr> {
        if self.matches(TokenKind::Bang) {
            let operand = self.unary()?;
            return Some(Expr::UnaryOp {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Option<Expr> {
        let mut left = self.additive()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Less => CmpOp::Lt,
                TokenKind::Greater => CmpOp::Gt,
                TokenKind::LessEqual => CmpOp::LtE,
                TokenKind::GreaterEqual => CmpOp::GtE,
                TokenKind::EqualEqual => CmpOp::Eq,
                TokenKind::BangEqual => CmpOp::NotEq,
                _ => break,
            };
            self.advance();
            let right = self.additive()?;
            left = Expr::Comparison {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Some(left)
    }

    fn additive(&mut self) -> Option<Expr> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.term()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Some(left)
    }

    fn term(&mut self) -> Option<Expr> {
        let mut left = self.primary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.primary()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Some(left)
    }

    fn primary(&mut self) -> Option<Expr> {
        match self.peek_kind() {
            TokenKind::Number => {
                let token = self.advance()?;
                Some(Expr::Number(token.text.clone()))
            }
            TokenKind::True => {
                self.advance();
                Some(Expr::Bool(true))
            }
            TokenKind::False => {
                self.advance();
                Some(Expr::Bool(false))
            }
            TokenKind::Identifier => {
                let token = self.advance()?;
                Some(Expr::Identifier(token.text.clone()))
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.logical_or()?;
                self.expect(TokenKind::RightParen, "Expected ')' after expression")?;
                Some(expr)
            }
            TokenKind::Minus => {
                self.advance();
                let operand = self.primary()?;
                Some(Expr::UnaryOp {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                })
            }
            _ => {
                self.error("Expected number, identifier or '('");
                None
            }
        }
    }
}
