use serde::{Deserialize, Serialize};
use std::fmt;

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Original text of the token
    pub literal: String,
    /// Line number where token appears (1-indexed)
    pub line: usize,
    /// Column number where token starts (1-indexed)
    pub column: usize,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(kind: TokenKind, literal: impl Into<String>, line: usize, column: usize) -> Self {
        Token {
            kind,
            literal: literal.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            _ => write!(f, "{} `{}`", self.kind, self.literal),
        }
    }
}

/// All possible token types in Monkey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Special
    /// Character that matches no lexical rule
    Illegal,
    /// End of input marker
    Eof,

    // Literals
    /// Identifier
    Ident,
    /// Integer literal
    Int,
    /// String literal (literal text keeps the quotes)
    String,

    // Operators
    /// Assignment operator (=)
    Assign,
    /// Plus operator (+)
    Plus,
    /// Minus operator (-)
    Minus,
    /// Bang operator (!)
    Bang,
    /// Asterisk operator (*)
    Asterisk,
    /// Slash operator (/)
    Slash,
    /// Less than operator (<)
    Lt,
    /// Greater than operator (>)
    Gt,
    /// Equality operator (==)
    Eq,
    /// Inequality operator (!=)
    NotEq,

    // Delimiters
    /// Comma delimiter
    Comma,
    /// Semicolon delimiter
    Semicolon,
    /// Left parenthesis (
    LParen,
    /// Right parenthesis )
    RParen,
    /// Left brace {
    LBrace,
    /// Right brace }
    RBrace,

    // Keywords
    /// `fn` keyword
    Function,
    /// `let` keyword
    Let,
    /// `return` keyword
    Return,
    /// `if` keyword
    If,
    /// `else` keyword
    Else,
    /// `true` keyword
    True,
    /// `false` keyword
    False,
}

impl TokenKind {
    /// Get keyword from string, `None` for plain identifiers
    pub fn keyword(s: &str) -> Option<TokenKind> {
        match s {
            "fn" => Some(TokenKind::Function),
            "let" => Some(TokenKind::Let),
            "return" => Some(TokenKind::Return),
            "if" => Some(TokenKind::If),
            "else" => Some(TokenKind::Else),
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            _ => None,
        }
    }

    /// Check if token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Function
                | TokenKind::Let
                | TokenKind::Return
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::True
                | TokenKind::False
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
            TokenKind::Ident => "IDENT",
            TokenKind::Int => "INT",
            TokenKind::String => "STRING",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Bang => "BANG",
            TokenKind::Asterisk => "ASTERISK",
            TokenKind::Slash => "SLASH",
            TokenKind::Lt => "LT",
            TokenKind::Gt => "GT",
            TokenKind::Eq => "EQ",
            TokenKind::NotEq => "NOT_EQ",
            TokenKind::Comma => "COMMA",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::Function => "FUNCTION",
            TokenKind::Let => "LET",
            TokenKind::Return => "RETURN",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
        };
        f.write_str(name)
    }
}
