use super::token::{Token, TokenKind};

/// Scanner turning Monkey source text into tokens
///
/// Scanning never fails: characters that match no rule become
/// [`TokenKind::Illegal`] tokens and are reported later by the parser.
pub struct Scanner {
    /// Source code as character vector
    source: Vec<char>,
    /// Accumulated tokens
    tokens: Vec<Token>,
    /// Start position of current token
    start: usize,
    /// Current position in source
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
    /// Line where the current token starts
    start_line: usize,
    /// Column where the current token starts
    start_column: usize,
}

impl Scanner {
    /// Creates a new scanner from source code
    pub fn new(source: &str) -> Self {
        Scanner {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
        }
    }

    /// Scans all tokens from source code; the last token is always EOF
    pub fn tokenize(mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.mark_start();
            self.scan_token();
        }

        self.mark_start();
        self.add_token(TokenKind::Eof);

        tracing::debug!(tokens = self.tokens.len(), "tokenized source");
        self.tokens
    }

    fn scan_token(&mut self) {
        let c = self.advance();

        match c {
            ' ' | '\r' | '\t' => {}
            '\n' => {
                self.line += 1;
                self.column = 1;
            }

            '(' => self.add_token(TokenKind::LParen),
            ')' => self.add_token(TokenKind::RParen),
            '{' => self.add_token(TokenKind::LBrace),
            '}' => self.add_token(TokenKind::RBrace),
            ',' => self.add_token(TokenKind::Comma),
            ';' => self.add_token(TokenKind::Semicolon),

            '+' => self.add_token(TokenKind::Plus),
            '-' => self.add_token(TokenKind::Minus),
            '*' => self.add_token(TokenKind::Asterisk),
            '/' => self.add_token(TokenKind::Slash),
            '<' => self.add_token(TokenKind::Lt),
            '>' => self.add_token(TokenKind::Gt),

            '=' => {
                if self.match_char('=') {
                    self.add_token(TokenKind::Eq);
                } else {
                    self.add_token(TokenKind::Assign);
                }
            }
            '!' => {
                if self.match_char('=') {
                    self.add_token(TokenKind::NotEq);
                } else {
                    self.add_token(TokenKind::Bang);
                }
            }

            '"' => self.scan_string(),

            c if c.is_ascii_digit() => self.scan_number(),

            c if c.is_ascii_alphabetic() || c == '_' => self.scan_identifier_or_keyword(),

            _ => self.add_token(TokenKind::Illegal),
        }
    }

    /// Scans a string literal, keeping the quotes in the token text.
    ///
    /// An unterminated string produces an ILLEGAL token for the opening quote
    /// and scanning restarts right after it.
    fn scan_string(&mut self) {
        let mut end = self.current;
        let mut lines = 0;
        let mut last_newline = None;

        while end < self.source.len() && self.source[end] != '"' {
            match self.source[end] {
                '\\' if end + 1 < self.source.len() => {
                    if self.source[end + 1] == '\n' {
                        lines += 1;
                        last_newline = Some(end + 1);
                    }
                    end += 2;
                }
                '\n' => {
                    lines += 1;
                    last_newline = Some(end);
                    end += 1;
                }
                _ => end += 1,
            }
        }

        if end >= self.source.len() {
            self.add_token(TokenKind::Illegal);
            return;
        }

        // consume body and closing quote
        self.current = end + 1;
        match last_newline {
            Some(pos) => {
                self.line += lines;
                self.column = self.current - pos;
            }
            None => self.column += self.current - self.start - 1,
        }

        self.add_token(TokenKind::String);
    }

    fn scan_number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        self.add_token(TokenKind::Int);
    }

    fn scan_identifier_or_keyword(&mut self) {
        while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let text: String = self.source[self.start..self.current].iter().collect();
        let kind = TokenKind::keyword(&text).unwrap_or(TokenKind::Ident);
        self.tokens
            .push(Token::new(kind, text, self.start_line, self.start_column));
    }

    fn mark_start(&mut self) {
        self.start = self.current;
        self.start_line = self.line;
        self.start_column = self.column;
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        self.column += 1;
        c
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.source[self.current]
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            false
        } else {
            self.current += 1;
            self.column += 1;
            true
        }
    }

    fn add_token(&mut self, kind: TokenKind) {
        let literal: String = self.source[self.start..self.current].iter().collect();
        self.tokens.push(Token::new(
            kind,
            literal,
            self.start_line,
            self.start_column,
        ));
    }
}

/// Convenience wrapper: tokenizes `source` in one call
pub fn tokenize(source: &str) -> Vec<Token> {
    Scanner::new(source).tokenize()
}
