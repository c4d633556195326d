use std::fmt;

/// Classification of a lexical unit. The literal spelling lives in [`Token::text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    Identifier,
    Number,

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    Assign, // =

    // Comparison
    Less,         // <
    Greater,      // >
    LessEqual,    // <=
    GreaterEqual, // >=
    EqualEqual,   // ==
    BangEqual,    // !=

    // Logical
    AndAnd, // &&
    OrOr,   // ||
    Bang,   // !

    // Keywords
    Print,
    If,
    Else,
    While,
    For,
    True,
    False,

    // Delimiters
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Semicolon,
    Comma,

    Eof,
}

impl TokenKind {
    /// Maps a scanned word to its keyword kind, if it is reserved.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "print" => TokenKind::Print,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "for" => TokenKind::For,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            _ => return None,
        };
        Some(kind)
    }
}

/// A classified lexical unit. `line` and `column` are 1-based and point at the
/// first character of the token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}:{} - {}", self.line, self.column, self.text)
    }
}

/// Renders the token stream one token per line, stopping before the end marker.
pub fn dump_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens.iter().take_while(|t| t.kind != TokenKind::Eof) {
        out.push_str(&token.to_string());
        out.push('\n');
    }
    out
}
