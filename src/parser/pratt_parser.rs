use std::rc::Rc;

use super::ast::{BinaryOp, BlockStatement, Expression, Program, Statement, UnaryOp};
use crate::error::{Error, KindSet, Result};
use crate::lexer::{Token, TokenKind};

/// Operator binding power, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Floor for a full expression
    Lowest,
    /// `==`, `!=`
    Equals,
    /// `<`, `>`
    LessGreater,
    /// `+`, `-`
    Sum,
    /// `*`, `/`
    Product,
    /// Unary `-`, `!`
    Prefix,
    /// Function application `f(...)`
    Call,
}

impl Precedence {
    /// Binding power of a token when it appears in infix position
    pub fn of(kind: TokenKind) -> Precedence {
        match kind {
            TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
            TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
            TokenKind::LParen => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

type PrefixParseFn = fn(&mut Parser) -> Result<Expression>;
type InfixParseFn = fn(&mut Parser, Expression) -> Result<Expression>;

/// Prefix handler table, fixed at compile time
fn prefix_parse_fn(kind: TokenKind) -> Option<PrefixParseFn> {
    let handler: PrefixParseFn = match kind {
        TokenKind::Ident => Parser::parse_identifier,
        TokenKind::Int => Parser::parse_integer_literal,
        TokenKind::String => Parser::parse_string_literal,
        TokenKind::True | TokenKind::False => Parser::parse_boolean_literal,
        TokenKind::Bang | TokenKind::Minus => Parser::parse_prefix_expression,
        TokenKind::LParen => Parser::parse_grouped_expression,
        TokenKind::If => Parser::parse_if_expression,
        TokenKind::Function => Parser::parse_function_literal,
        _ => return None,
    };
    Some(handler)
}

/// Infix handler table, fixed at compile time
fn infix_parse_fn(kind: TokenKind) -> Option<InfixParseFn> {
    let handler: InfixParseFn = match kind {
        TokenKind::Plus
        | TokenKind::Minus
        | TokenKind::Asterisk
        | TokenKind::Slash
        | TokenKind::Lt
        | TokenKind::Gt
        | TokenKind::Eq
        | TokenKind::NotEq => Parser::parse_infix_expression,
        TokenKind::LParen => Parser::parse_call_expression,
        _ => return None,
    };
    Some(handler)
}

/// Recursive-descent statement parser with Pratt expression parsing
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    /// Creates a new parser over a token sequence produced by the scanner
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let (line, column) = tokens.last().map_or((1, 1), |t| (t.line, t.column));
            tokens.push(Token::new(TokenKind::Eof, "", line, column));
        }
        Parser { tokens, current: 0 }
    }

    /// Parses the tokens into a program; the first error aborts the parse
    pub fn parse(&mut self) -> Result<Program> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        tracing::debug!(statements = statements.len(), "parsed program");
        Ok(Program { statements })
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        match self.peek().kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    /// `let <ident> = <expr> ;`
    fn parse_let_statement(&mut self) -> Result<Statement> {
        self.expect(&[TokenKind::Let])?;
        let name = self.expect(&[TokenKind::Ident])?.literal;
        self.expect(&[TokenKind::Assign])?;
        let value = self.parse_expression(Precedence::Lowest)?;
        self.expect(&[TokenKind::Semicolon])?;

        Ok(Statement::Let { name, value })
    }

    /// `return <expr> ;`
    fn parse_return_statement(&mut self) -> Result<Statement> {
        self.expect(&[TokenKind::Return])?;
        let value = self.parse_expression(Precedence::Lowest)?;
        self.expect(&[TokenKind::Semicolon])?;

        Ok(Statement::Return(value))
    }

    /// `<expr> [;]`
    fn parse_expression_statement(&mut self) -> Result<Statement> {
        let expression = self.parse_expression(Precedence::Lowest)?;
        if self.check(TokenKind::Semicolon) {
            self.advance();
        }

        Ok(Statement::Expression(expression))
    }

    /// `{ <statement>* }`
    fn parse_block_statement(&mut self) -> Result<BlockStatement> {
        self.expect(&[TokenKind::LBrace])?;

        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }
        self.expect(&[TokenKind::RBrace])?;

        Ok(BlockStatement { statements })
    }

    /// Precedence climbing: a prefix handler produces the left operand, then
    /// infix handlers fold in operators that bind tighter than `precedence`.
    pub fn parse_expression(&mut self, precedence: Precedence) -> Result<Expression> {
        let prefix = prefix_parse_fn(self.peek().kind).ok_or_else(|| {
            let token = self.peek();
            Error::MissingPrefixHandler {
                kind: token.kind,
                literal: token.literal.clone(),
                index: self.current,
                line: token.line,
                column: token.column,
            }
        })?;
        let mut left = prefix(self)?;

        while !self.check(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            let infix = infix_parse_fn(self.peek().kind).ok_or_else(|| {
                let token = self.peek();
                Error::MissingInfixHandler {
                    kind: token.kind,
                    literal: token.literal.clone(),
                    index: self.current,
                    line: token.line,
                    column: token.column,
                }
            })?;
            left = infix(self, left)?;
        }

        Ok(left)
    }

    fn parse_identifier(&mut self) -> Result<Expression> {
        let token = self.expect(&[TokenKind::Ident])?;
        Ok(Expression::Identifier(token.literal))
    }

    fn parse_integer_literal(&mut self) -> Result<Expression> {
        let index = self.current;
        let token = self.expect(&[TokenKind::Int])?;
        let value = token
            .literal
            .parse::<i64>()
            .map_err(|_| Error::InvalidIntegerLiteral {
                literal: token.literal.clone(),
                index,
            })?;
        Ok(Expression::IntegerLiteral(value))
    }

    fn parse_string_literal(&mut self) -> Result<Expression> {
        let token = self.expect(&[TokenKind::String])?;
        Ok(Expression::StringLiteral(unescape(&token.literal)))
    }

    fn parse_boolean_literal(&mut self) -> Result<Expression> {
        let token = self.expect(&[TokenKind::True, TokenKind::False])?;
        Ok(Expression::BooleanLiteral(token.kind == TokenKind::True))
    }

    fn parse_prefix_expression(&mut self) -> Result<Expression> {
        let token = self.expect(&[TokenKind::Minus, TokenKind::Bang])?;
        let operator = match token.kind {
            TokenKind::Minus => UnaryOp::Neg,
            _ => UnaryOp::Not,
        };
        let operand = self.parse_expression(Precedence::Prefix)?;

        Ok(Expression::Prefix {
            operator,
            operand: Box::new(operand),
        })
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Result<Expression> {
        let precedence = self.peek_precedence();
        let token = self.expect(&[
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Asterisk,
            TokenKind::Slash,
            TokenKind::Lt,
            TokenKind::Gt,
            TokenKind::Eq,
            TokenKind::NotEq,
        ])?;
        let operator = match token.kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Asterisk => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::Eq => BinaryOp::Eq,
            _ => BinaryOp::NotEq,
        };
        let right = self.parse_expression(precedence)?;

        Ok(Expression::Infix {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    /// `( <expr> )`
    fn parse_grouped_expression(&mut self) -> Result<Expression> {
        self.expect(&[TokenKind::LParen])?;
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.expect(&[TokenKind::RParen])?;
        Ok(expression)
    }

    /// `if ( <expr> ) <block> [else <block>]`
    fn parse_if_expression(&mut self) -> Result<Expression> {
        self.expect(&[TokenKind::If])?;
        self.expect(&[TokenKind::LParen])?;
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect(&[TokenKind::RParen])?;
        let consequence = self.parse_block_statement()?;

        let alternative = if self.check(TokenKind::Else) {
            self.advance();
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Ok(Expression::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    /// `fn ( <params> ) <block>`
    fn parse_function_literal(&mut self) -> Result<Expression> {
        self.expect(&[TokenKind::Function])?;
        let parameters = self.parse_function_parameters()?;
        let body = self.parse_block_statement()?;

        Ok(Expression::FunctionLiteral {
            parameters,
            body: Rc::new(body),
        })
    }

    fn parse_function_parameters(&mut self) -> Result<Vec<String>> {
        self.expect(&[TokenKind::LParen])?;

        let mut parameters = Vec::new();
        if self.check(TokenKind::RParen) {
            self.advance();
            return Ok(parameters);
        }

        parameters.push(self.expect(&[TokenKind::Ident])?.literal);
        while self.expect(&[TokenKind::Comma, TokenKind::RParen])?.kind == TokenKind::Comma {
            parameters.push(self.expect(&[TokenKind::Ident])?.literal);
        }

        Ok(parameters)
    }

    /// Infix handler for `(`: `<callee> ( <args> )`
    fn parse_call_expression(&mut self, function: Expression) -> Result<Expression> {
        self.expect(&[TokenKind::LParen])?;

        let mut arguments = Vec::new();
        if self.check(TokenKind::RParen) {
            self.advance();
        } else {
            arguments.push(self.parse_expression(Precedence::Lowest)?);
            while self.expect(&[TokenKind::Comma, TokenKind::RParen])?.kind == TokenKind::Comma {
                arguments.push(self.parse_expression(Precedence::Lowest)?);
            }
        }

        Ok(Expression::Call {
            function: Box::new(function),
            arguments,
        })
    }

    // Helper methods

    /// Consume the current token if its kind is one of `kinds`
    fn expect(&mut self, kinds: &[TokenKind]) -> Result<Token> {
        if kinds.contains(&self.peek().kind) {
            Ok(self.advance())
        } else {
            let token = self.peek();
            Err(Error::UnexpectedToken {
                expected: KindSet(kinds.to_vec()),
                found: token.kind,
                literal: token.literal.clone(),
                index: self.current,
                line: token.line,
                column: token.column,
            })
        }
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek().kind)
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.current].clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }
}

/// Strip the surrounding quotes of a STRING token and resolve escapes
fn unescape(literal: &str) -> String {
    let body = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);

    let mut value = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some('"') => value.push('"'),
            Some('\\') => value.push('\\'),
            Some(other) => {
                value.push('\\');
                value.push(other);
            }
            None => value.push('\\'),
        }
    }
    value
}

/// Tokenize and parse `source` in one call
pub fn parse_source(source: &str) -> Result<Program> {
    Parser::new(crate::lexer::tokenize(source)).parse()
}
