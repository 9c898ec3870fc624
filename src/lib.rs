//! # Monkey - A Small Dynamically-Typed Language
//!
//! An interpreter for Monkey: integers, booleans, strings, `let` bindings,
//! `if`/`else` expressions, first-class functions with lexical closures and
//! early `return`.
//!
//! ## Quick Start
//!
//! ### Basic Usage
//!
//! Execute Monkey code from a string:
//!
//! ```rust
//! use monkey::{Evaluator, Parser, Scanner, Value};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let code = r#"
//!     let newAdder = fn(x) { fn(y) { x + y } };
//!     let addTwo = newAdder(2);
//!     addTwo(3);
//! "#;
//!
//! // Tokenize (scan)
//! let tokens = Scanner::new(code).tokenize();
//!
//! // Parse into AST
//! let mut parser = Parser::new(tokens);
//! let program = parser.parse()?;
//!
//! // Execute
//! let mut evaluator = Evaluator::new();
//! let result = evaluator.execute(&program)?;
//!
//! assert_eq!(result, Value::Int(5));
//! # Ok(())
//! # }
//! ```
//!
//! Or in one step with [`interpret`]:
//!
//! ```rust
//! use monkey::{interpret, Value};
//!
//! # fn main() -> monkey::Result<()> {
//! assert_eq!(interpret("-7 / 2")?, Value::Int(-4));
//! assert_eq!(interpret("if (1 < 2) { \"yes\" } else { \"no\" }")?, Value::string("yes"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Language Overview
//!
//! ### Data Types
//!
//! - **Integers**: 64-bit signed, `/` rounds toward negative infinity
//! - **Booleans**: `true`, `false`
//! - **Strings**: `"hello"`, concatenated with `+`
//! - **Null**: produced by an `if` whose branch is not taken
//! - **Functions**: `fn(x, y) { x + y }`, capturing their defining scope
//!
//! ### Control Flow
//!
//! - `if (cond) { ... } else { ... }` is an expression; the condition must be a Boolean
//! - `return expr;` leaves the enclosing function, or the program at top level
//!
//! ## Architecture
//!
//! 1. **Lexer** ([`lexer`]) - tokenizes source text, never fails
//! 2. **Parser** ([`parser`]) - Pratt parser producing an AST
//! 3. **Runtime** ([`runtime`]) - tree-walking evaluator driven through [`Visitor`]
//! 4. **REPL** ([`repl`]) - interactive loop sharing one evaluator across lines
//!
//! ## Error Handling
//!
//! Every stage reports through [`Error`]:
//!
//! ```rust
//! use monkey::{interpret, Error, ErrorStage};
//!
//! match interpret("5 + true") {
//!     Err(err @ Error::UnsupportedOperator { .. }) => {
//!         assert_eq!(err.stage(), ErrorStage::Runtime);
//!         assert_eq!(
//!             err.to_string(),
//!             "Unsupported operator: + for operands of types Integer, Boolean"
//!         );
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

/// Version of the Monkey interpreter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod runtime;

// Re-export main types
pub use error::{Error, ErrorStage, Result};
pub use lexer::{tokenize, Scanner, Token, TokenKind};
pub use parser::{
    parse_source, AstPrinter, BinaryOp, BlockStatement, Expression, Parser, Program, Statement,
    UnaryOp, Visitor,
};
pub use repl::{Repl, ReplConfig};
pub use runtime::{Environment, Evaluator, Flow, Value, ValueKind};

/// Tokenizes, parses and evaluates `source` with a fresh evaluator
pub fn interpret(source: &str) -> Result<Value> {
    let program = parse_source(source)?;
    Evaluator::new().execute(&program)
}
