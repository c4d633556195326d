//! Lexical scanning: raw source text into an ordered token stream.
//!
//! Scanning never fails. Characters that start no token are dropped, and the
//! stream always ends with an [`TokenKind::Eof`] token positioned just past the
//! last character of the input.

use crate::token::{Token, TokenKind};
use tracing::debug;

/// Scans `source` into tokens terminated by an end-of-stream marker.
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).lex()
}

struct Lexer {
    chars: Vec<char>,
    current: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            current: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn lex(mut self) -> Vec<Token> {
        while let Some(c) = self.peek() {
            match c {
                '\n' => {
                    self.current += 1;
                    self.line += 1;
                    self.column = 1;
                }
                c if c.is_whitespace() => {
                    self.advance();
                }
                '/' if self.peek_next() == Some('/') => self.skip_line_comment(),
                '/' if self.peek_next() == Some('*') => self.skip_block_comment(),
                c if c.is_ascii_alphabetic() || c == '_' => self.word(),
                c if c.is_ascii_digit() => self.number(),
                _ => self.operator(c),
            }
        }

        self.tokens
            .push(Token::new(TokenKind::Eof, String::new(), self.line, self.column));
        self.tokens
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.current).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.current + 1).copied()
    }

    /// Consumes one character on the current line.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.current += 1;
        self.column += 1;
        Some(c)
    }

    fn push(&mut self, kind: TokenKind, text: impl Into<String>, column: usize) {
        self.tokens.push(Token::new(kind, text, self.line, column));
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) {
        // opening `/*`
        self.advance();
        self.advance();
        while let Some(c) = self.peek() {
            if c == '*' && self.peek_next() == Some('/') {
                self.advance();
                self.advance();
                return;
            }
            if c == '\n' {
                self.current += 1;
                self.line += 1;
                self.column = 1;
            } else {
                self.advance();
            }
        }
    }

    fn word(&mut self) {
        let column = self.column;
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if !(c.is_ascii_alphanumeric() || c == '_') {
                break;
            }
            text.push(c);
            self.advance();
        }
        let kind = TokenKind::keyword(&text).unwrap_or(TokenKind::Identifier);
        self.push(kind, text, column);
    }

    fn number(&mut self) {
        let column = self.column;
        let mut text = String::new();
        let mut seen_dot = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
            } else if c == '.' && !seen_dot {
                seen_dot = true;
                text.push(c);
            } else {
                break;
            }
            self.advance();
        }
        self.push(TokenKind::Number, text, column);
    }

    fn operator(&mut self, c: char) {
        let column = self.column;
        let next = self.peek_next();

        let two = match (c, next) {
            ('=', Some('=')) => Some((TokenKind::EqualEqual, "==")),
            ('!', Some('=')) => Some((TokenKind::BangEqual, "!=")),
            ('<', Some('=')) => Some((TokenKind::LessEqual, "<=")),
            ('>', Some('=')) => Some((TokenKind::GreaterEqual, ">=")),
            ('&', Some('&')) => Some((TokenKind::AndAnd, "&&")),
            ('|', Some('|')) => Some((TokenKind::OrOr, "||")),
            _ => None,
        };
        if let Some((kind, text)) = two {
            self.advance();
            self.advance();
            self.push(kind, text, column);
            return;
        }

        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '=' => TokenKind::Assign,
            '<' => TokenKind::Less,
            '>' => TokenKind::Greater,
            '!' => TokenKind::Bang,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            _ => {
                debug!(
                    line = self.line,
                    column, "skipping unrecognized character {:?}", c
                );
                self.advance();
                return;
            }
        };
        self.advance();
        self.push(kind, c.to_string(), column);
    }
}
