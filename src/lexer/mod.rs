//! Lexical analysis for Monkey
//!
//! Converts source text into a stream of tokens. The scanner never fails;
//! unknown characters are emitted as ILLEGAL tokens for the parser to reject.

mod scanner;
mod token;

pub use scanner::{tokenize, Scanner};
pub use token::{Token, TokenKind};
