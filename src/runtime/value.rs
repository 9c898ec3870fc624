use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::parser::BlockStatement;
use crate::runtime::Environment;

/// Runtime value representation
#[derive(Debug, Clone)]
pub enum Value {
    /// Null value, result of an if without a taken branch or an empty block
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit integer value
    Int(i64),
    /// String value
    String(String),
    /// Function value (closure), shared between every binding that holds it
    Function(Rc<Closure>),
}

/// A function literal paired with the scope chain it was evaluated in
#[derive(Debug)]
pub struct Closure {
    /// Parameter names in declaration order
    pub parameters: Vec<String>,
    /// Function body
    pub body: Rc<BlockStatement>,
    /// Scope chain captured when the literal was evaluated
    pub env: Environment,
}

/// Closed set of runtime value kinds, used for operator dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// [`Value::Int`]
    Integer,
    /// [`Value::Bool`]
    Boolean,
    /// [`Value::String`]
    String,
    /// [`Value::Null`]
    Null,
    /// [`Value::Function`]
    Function,
}

impl Value {
    /// Returns the kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Int(_) => ValueKind::Integer,
            Value::String(_) => ValueKind::String,
            Value::Function(_) => ValueKind::Function,
        }
    }

    /// Creates a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            // Functions compare by identity
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Function(closure) => {
                write!(f, "fn({}) {}", closure.parameters.join(", "), closure.body)
            }
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ValueKind::Integer => "Integer",
            ValueKind::Boolean => "Boolean",
            ValueKind::String => "String",
            ValueKind::Null => "Null",
            ValueKind::Function => "Function",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closure() -> Rc<Closure> {
        Rc::new(Closure {
            parameters: vec!["x".to_string()],
            body: Rc::new(BlockStatement::default()),
            env: Environment::new(),
        })
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Value::Int(1).kind(), ValueKind::Integer);
        assert_eq!(Value::Bool(true).kind(), ValueKind::Boolean);
        assert_eq!(Value::string("a").kind(), ValueKind::String);
        assert_eq!(Value::Null.kind(), ValueKind::Null);
        assert_eq!(Value::Function(closure()).kind(), ValueKind::Function);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::string("hi").to_string(), "\"hi\"");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Function(closure()).to_string(), "fn(x) { }");
    }

    #[test]
    fn test_function_identity_equality() {
        let f = closure();
        assert_eq!(Value::Function(f.clone()), Value::Function(f));
        assert_ne!(Value::Function(closure()), Value::Function(closure()));
        assert_ne!(Value::Int(1), Value::Bool(true));
    }
}
