//! Runtime evaluation of Monkey programs

mod environment;
mod evaluator;
pub mod operators;
mod value;

pub use environment::Environment;
pub use evaluator::{Evaluator, Flow};
pub use value::{Closure, Value, ValueKind};
