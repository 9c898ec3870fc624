//! Monkey Parser Module
//!
//! Parses tokens into an Abstract Syntax Tree (AST): recursive descent for
//! statements, precedence climbing for expressions.

mod ast;
mod pratt_parser;
mod printer;

pub use ast::{BinaryOp, BlockStatement, Expression, Program, Statement, UnaryOp, Visitor};
pub use pratt_parser::{parse_source, Parser, Precedence};
pub use printer::AstPrinter;
