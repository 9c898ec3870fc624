//! Error types for the Monkey interpreter

use std::fmt;

use thiserror::Error;

use crate::lexer::TokenKind;
use crate::runtime::ValueKind;

/// Monkey interpreter errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Parse errors
    /// A required token was not among the allowed kinds
    ///
    /// **Triggered by:** `expect` seeing a token outside its allowed set
    /// **Example:** `let = 5;` (missing identifier)
    #[error(
        "Unexpected token {found} `{literal}` at token {index} (line {line}, column {column}): expected {expected}"
    )]
    UnexpectedToken {
        /// Token kinds that would have been accepted
        expected: KindSet,
        /// Kind of the offending token
        found: TokenKind,
        /// Literal text of the offending token
        literal: String,
        /// Index of the offending token in the token sequence
        index: usize,
        /// Line of the offending token
        line: usize,
        /// Column of the offending token
        column: usize,
    },

    /// No expression can start with this token
    ///
    /// **Example:** `let x = ;`, `@`
    #[error(
        "No prefix parse function for {kind} `{literal}` at token {index} (line {line}, column {column})"
    )]
    MissingPrefixHandler {
        /// Kind of the offending token
        kind: TokenKind,
        /// Literal text of the offending token
        literal: String,
        /// Index of the offending token in the token sequence
        index: usize,
        /// Line of the offending token
        line: usize,
        /// Column of the offending token
        column: usize,
    },

    /// Token has binding power but no infix parse function
    #[error(
        "No infix parse function for {kind} `{literal}` at token {index} (line {line}, column {column})"
    )]
    MissingInfixHandler {
        /// Kind of the offending token
        kind: TokenKind,
        /// Literal text of the offending token
        literal: String,
        /// Index of the offending token in the token sequence
        index: usize,
        /// Line of the offending token
        line: usize,
        /// Column of the offending token
        column: usize,
    },

    /// Integer literal outside the 64-bit signed range
    #[error("Invalid integer literal `{literal}` at token {index}")]
    InvalidIntegerLiteral {
        /// Literal text
        literal: String,
        /// Index of the token in the token sequence
        index: usize,
    },

    // Runtime errors
    /// Reference to undefined identifier
    ///
    /// **Triggered by:** Using a name that no enclosing scope binds
    /// **Example:** `x + 1` (when x was never bound)
    #[error("Undefined identifier: {name}")]
    UndefinedIdentifier {
        /// Identifier name
        name: String,
    },

    /// `let` of a name already bound in the same scope
    ///
    /// **Example:** `let x = 1; let x = 2;`
    /// **Prevention:** Shadow from a nested block or function instead
    #[error("Identifier {name} is already defined in this scope")]
    DuplicateBinding {
        /// Identifier name
        name: String,
    },

    /// Attempt to call a non-function value
    #[error("Value is not callable: {kind}")]
    NotCallable {
        /// Kind of the non-callable value
        kind: ValueKind,
    },

    /// Operator has no entry for these operand kinds
    ///
    /// **Example:** `5 + true`, `-true`, `"a" - "b"`
    #[error("Unsupported operator: {operator} for {operands}")]
    UnsupportedOperator {
        /// Operator symbol
        operator: String,
        /// Operand kinds, left to right
        operands: OperandKinds,
    },

    /// Function called with the wrong number of arguments
    #[error("Wrong number of arguments: expected {expected}, got {got}")]
    ArityMismatch {
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        got: usize,
    },

    /// If-condition that is not a Boolean
    ///
    /// **Example:** `if (1) { 2 }`
    #[error("Condition must be Boolean, got {kind}")]
    ConditionNotBoolean {
        /// Kind of the condition value
        kind: ValueKind,
    },

    /// Division by zero error
    #[error("Division by zero")]
    DivisionByZero,

    /// Integer arithmetic left the 64-bit signed range
    #[error("Integer overflow in {operator}")]
    IntegerOverflow {
        /// Operator symbol
        operator: String,
    },
}

/// Phase an error was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStage {
    /// Raised while turning tokens into an AST
    Parse,
    /// Raised while evaluating an AST
    Runtime,
}

impl Error {
    /// Classify the phase this error belongs to
    pub fn stage(&self) -> ErrorStage {
        match self {
            Error::UnexpectedToken { .. }
            | Error::MissingPrefixHandler { .. }
            | Error::MissingInfixHandler { .. }
            | Error::InvalidIntegerLiteral { .. } => ErrorStage::Parse,

            Error::UndefinedIdentifier { .. }
            | Error::DuplicateBinding { .. }
            | Error::NotCallable { .. }
            | Error::UnsupportedOperator { .. }
            | Error::ArityMismatch { .. }
            | Error::ConditionNotBoolean { .. }
            | Error::DivisionByZero
            | Error::IntegerOverflow { .. } => ErrorStage::Runtime,
        }
    }
}

/// Set of token kinds accepted at a parse position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindSet(pub Vec<TokenKind>);

impl fmt::Display for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0.as_slice() {
            [single] => write!(f, "{}", single),
            kinds => {
                write!(f, "one of ")?;
                for (i, kind) in kinds.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", kind)?;
                }
                Ok(())
            }
        }
    }
}

/// Operand kinds of a failed operator lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperandKinds(pub Vec<ValueKind>);

impl fmt::Display for OperandKinds {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0.as_slice() {
            [operand] => write!(f, "operand of type {}", operand),
            kinds => {
                write!(f, "operands of types ")?;
                for (i, kind) in kinds.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", kind)?;
                }
                Ok(())
            }
        }
    }
}

/// Result type for Monkey operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_token_message() {
        let err = Error::UnexpectedToken {
            expected: KindSet(vec![TokenKind::Ident]),
            found: TokenKind::Assign,
            literal: "=".to_string(),
            index: 1,
            line: 1,
            column: 5,
        };
        assert_eq!(
            err.to_string(),
            "Unexpected token ASSIGN `=` at token 1 (line 1, column 5): expected IDENT"
        );
        assert_eq!(err.stage(), ErrorStage::Parse);
    }

    #[test]
    fn test_kind_set_display() {
        let set = KindSet(vec![TokenKind::Comma, TokenKind::RParen]);
        assert_eq!(set.to_string(), "one of COMMA, RPAREN");
        assert_eq!(KindSet(vec![TokenKind::Ident]).to_string(), "IDENT");
    }

    #[test]
    fn test_unsupported_operator_message() {
        let err = Error::UnsupportedOperator {
            operator: "+".to_string(),
            operands: OperandKinds(vec![ValueKind::Integer, ValueKind::Boolean]),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported operator: + for operands of types Integer, Boolean"
        );

        let err = Error::UnsupportedOperator {
            operator: "-".to_string(),
            operands: OperandKinds(vec![ValueKind::Boolean]),
        };
        assert_eq!(err.to_string(), "Unsupported operator: - for operand of type Boolean");
        assert_eq!(err.stage(), ErrorStage::Runtime);
    }
}
