//! Operator registry
//!
//! Two dispatch tables built once on first use and never modified afterwards:
//! prefix operations keyed by `(operator, operand kind)` and infix operations
//! keyed by `(operator, left kind, right kind)`. A missing entry is an
//! [`Error::UnsupportedOperator`].

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::error::{Error, OperandKinds, Result};
use crate::parser::{BinaryOp, UnaryOp};
use crate::runtime::{Value, ValueKind};

/// Operation applied to a single operand
pub type PrefixOperation = fn(&Value) -> Result<Value>;

/// Operation applied to a pair of operands
pub type InfixOperation = fn(&Value, &Value) -> Result<Value>;

lazy_static! {
    static ref PREFIX_OPERATIONS: HashMap<(UnaryOp, ValueKind), PrefixOperation> = {
        let mut table: HashMap<(UnaryOp, ValueKind), PrefixOperation> = HashMap::new();
        table.insert((UnaryOp::Neg, ValueKind::Integer), negate_integer);
        table.insert((UnaryOp::Not, ValueKind::Boolean), not_boolean);
        table
    };

    static ref INFIX_OPERATIONS: HashMap<(BinaryOp, ValueKind, ValueKind), InfixOperation> = {
        use ValueKind::{Boolean, Integer};

        let mut table: HashMap<(BinaryOp, ValueKind, ValueKind), InfixOperation> =
            HashMap::new();

        // Integer arithmetic and comparison
        table.insert((BinaryOp::Add, Integer, Integer), add_integers);
        table.insert((BinaryOp::Sub, Integer, Integer), sub_integers);
        table.insert((BinaryOp::Mul, Integer, Integer), mul_integers);
        table.insert((BinaryOp::Div, Integer, Integer), div_integers);
        table.insert((BinaryOp::Lt, Integer, Integer), lt_integers);
        table.insert((BinaryOp::Gt, Integer, Integer), gt_integers);
        table.insert((BinaryOp::Eq, Integer, Integer), eq_integers);
        table.insert((BinaryOp::NotEq, Integer, Integer), not_eq_integers);

        // Boolean equality
        table.insert((BinaryOp::Eq, Boolean, Boolean), eq_booleans);
        table.insert((BinaryOp::NotEq, Boolean, Boolean), not_eq_booleans);

        // Integer/Boolean pairs are never equal
        table.insert((BinaryOp::Eq, Integer, Boolean), always_false);
        table.insert((BinaryOp::Eq, Boolean, Integer), always_false);
        table.insert((BinaryOp::NotEq, Integer, Boolean), always_true);
        table.insert((BinaryOp::NotEq, Boolean, Integer), always_true);

        // String concatenation
        table.insert((BinaryOp::Add, ValueKind::String, ValueKind::String), concat_strings);

        table
    };
}

/// Finds the prefix operation registered for `operator` on `operand`
pub fn lookup_prefix(operator: UnaryOp, operand: ValueKind) -> Option<PrefixOperation> {
    PREFIX_OPERATIONS.get(&(operator, operand)).copied()
}

/// Finds the infix operation registered for `operator` on `left` and `right`
pub fn lookup_infix(operator: BinaryOp, left: ValueKind, right: ValueKind) -> Option<InfixOperation> {
    INFIX_OPERATIONS.get(&(operator, left, right)).copied()
}

/// Applies a prefix operator through the registry
pub fn apply_prefix(operator: UnaryOp, operand: &Value) -> Result<Value> {
    match lookup_prefix(operator, operand.kind()) {
        Some(operation) => operation(operand),
        None => Err(Error::UnsupportedOperator {
            operator: operator.to_string(),
            operands: OperandKinds(vec![operand.kind()]),
        }),
    }
}

/// Applies an infix operator through the registry
pub fn apply_infix(operator: BinaryOp, left: &Value, right: &Value) -> Result<Value> {
    match lookup_infix(operator, left.kind(), right.kind()) {
        Some(operation) => operation(left, right),
        None => Err(unsupported_infix(operator, left, right)),
    }
}

fn unsupported_infix(operator: BinaryOp, left: &Value, right: &Value) -> Error {
    Error::UnsupportedOperator {
        operator: operator.to_string(),
        operands: OperandKinds(vec![left.kind(), right.kind()]),
    }
}

fn overflow(operator: impl ToString) -> Error {
    Error::IntegerOverflow {
        operator: operator.to_string(),
    }
}

fn integer_operands(operator: BinaryOp, left: &Value, right: &Value) -> Result<(i64, i64)> {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => Ok((*l, *r)),
        _ => Err(unsupported_infix(operator, left, right)),
    }
}

fn boolean_operands(operator: BinaryOp, left: &Value, right: &Value) -> Result<(bool, bool)> {
    match (left, right) {
        (Value::Bool(l), Value::Bool(r)) => Ok((*l, *r)),
        _ => Err(unsupported_infix(operator, left, right)),
    }
}

fn negate_integer(operand: &Value) -> Result<Value> {
    match operand {
        Value::Int(n) => n.checked_neg().map(Value::Int).ok_or_else(|| overflow(UnaryOp::Neg)),
        other => Err(Error::UnsupportedOperator {
            operator: UnaryOp::Neg.to_string(),
            operands: OperandKinds(vec![other.kind()]),
        }),
    }
}

fn not_boolean(operand: &Value) -> Result<Value> {
    match operand {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        other => Err(Error::UnsupportedOperator {
            operator: UnaryOp::Not.to_string(),
            operands: OperandKinds(vec![other.kind()]),
        }),
    }
}

macro_rules! checked_integer_op {
    ($name:ident, $operator:expr, $checked:ident) => {
        fn $name(left: &Value, right: &Value) -> Result<Value> {
            let (l, r) = integer_operands($operator, left, right)?;
            l.$checked(r)
                .map(Value::Int)
                .ok_or_else(|| overflow($operator))
        }
    };
}

macro_rules! integer_comparison {
    ($name:ident, $operator:expr, $cmp:tt) => {
        fn $name(left: &Value, right: &Value) -> Result<Value> {
            let (l, r) = integer_operands($operator, left, right)?;
            Ok(Value::Bool(l $cmp r))
        }
    };
}

macro_rules! boolean_comparison {
    ($name:ident, $operator:expr, $cmp:tt) => {
        fn $name(left: &Value, right: &Value) -> Result<Value> {
            let (l, r) = boolean_operands($operator, left, right)?;
            Ok(Value::Bool(l $cmp r))
        }
    };
}

checked_integer_op!(add_integers, BinaryOp::Add, checked_add);
checked_integer_op!(sub_integers, BinaryOp::Sub, checked_sub);
checked_integer_op!(mul_integers, BinaryOp::Mul, checked_mul);

integer_comparison!(lt_integers, BinaryOp::Lt, <);
integer_comparison!(gt_integers, BinaryOp::Gt, >);
integer_comparison!(eq_integers, BinaryOp::Eq, ==);
integer_comparison!(not_eq_integers, BinaryOp::NotEq, !=);

boolean_comparison!(eq_booleans, BinaryOp::Eq, ==);
boolean_comparison!(not_eq_booleans, BinaryOp::NotEq, !=);

/// Integer division rounding toward negative infinity
fn div_integers(left: &Value, right: &Value) -> Result<Value> {
    let (l, r) = integer_operands(BinaryOp::Div, left, right)?;
    if r == 0 {
        return Err(Error::DivisionByZero);
    }
    let quotient = l.checked_div(r).ok_or_else(|| overflow(BinaryOp::Div))?;
    let floored = if l % r != 0 && ((l < 0) != (r < 0)) {
        quotient - 1
    } else {
        quotient
    };
    Ok(Value::Int(floored))
}

fn always_false(_left: &Value, _right: &Value) -> Result<Value> {
    Ok(Value::Bool(false))
}

fn always_true(_left: &Value, _right: &Value) -> Result<Value> {
    Ok(Value::Bool(true))
}

fn concat_strings(left: &Value, right: &Value) -> Result<Value> {
    match (left, right) {
        (Value::String(l), Value::String(r)) => Ok(Value::String(format!("{}{}", l, r))),
        _ => Err(unsupported_infix(BinaryOp::Add, left, right)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> Value {
        Value::Int(n)
    }

    #[test]
    fn test_integer_arithmetic() {
        assert_eq!(apply_infix(BinaryOp::Add, &int(2), &int(3)).unwrap(), int(5));
        assert_eq!(apply_infix(BinaryOp::Sub, &int(2), &int(3)).unwrap(), int(-1));
        assert_eq!(apply_infix(BinaryOp::Mul, &int(4), &int(-3)).unwrap(), int(-12));
    }

    #[test]
    fn test_floor_division() {
        let cases = [(7, 2, 3), (-7, 2, -4), (7, -2, -4), (-7, -2, 3), (6, 3, 2), (-6, 3, -2), (0, 5, 0)];
        for (l, r, expected) in cases {
            assert_eq!(
                apply_infix(BinaryOp::Div, &int(l), &int(r)).unwrap(),
                int(expected),
                "{} / {}",
                l,
                r
            );
        }
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            apply_infix(BinaryOp::Div, &int(1), &int(0)),
            Err(Error::DivisionByZero)
        );
    }

    #[test]
    fn test_overflow() {
        assert!(matches!(
            apply_infix(BinaryOp::Add, &int(i64::MAX), &int(1)),
            Err(Error::IntegerOverflow { .. })
        ));
        assert!(matches!(
            apply_infix(BinaryOp::Div, &int(i64::MIN), &int(-1)),
            Err(Error::IntegerOverflow { .. })
        ));
        assert!(matches!(
            apply_prefix(UnaryOp::Neg, &int(i64::MIN)),
            Err(Error::IntegerOverflow { .. })
        ));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(apply_infix(BinaryOp::Lt, &int(1), &int(2)).unwrap(), Value::Bool(true));
        assert_eq!(apply_infix(BinaryOp::Gt, &int(1), &int(2)).unwrap(), Value::Bool(false));
        assert_eq!(apply_infix(BinaryOp::Eq, &int(2), &int(2)).unwrap(), Value::Bool(true));
        assert_eq!(apply_infix(BinaryOp::NotEq, &int(2), &int(2)).unwrap(), Value::Bool(false));
        assert_eq!(
            apply_infix(BinaryOp::Eq, &Value::Bool(true), &Value::Bool(true)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            apply_infix(BinaryOp::NotEq, &Value::Bool(true), &Value::Bool(false)).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_mixed_integer_boolean_equality() {
        assert_eq!(apply_infix(BinaryOp::Eq, &int(1), &Value::Bool(true)).unwrap(), Value::Bool(false));
        assert_eq!(apply_infix(BinaryOp::Eq, &Value::Bool(false), &int(0)).unwrap(), Value::Bool(false));
        assert_eq!(apply_infix(BinaryOp::NotEq, &int(1), &Value::Bool(true)).unwrap(), Value::Bool(true));
        assert_eq!(apply_infix(BinaryOp::NotEq, &Value::Bool(true), &int(1)).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(
            apply_infix(BinaryOp::Add, &Value::string("foo"), &Value::string("bar")).unwrap(),
            Value::string("foobar")
        );
        assert!(lookup_infix(BinaryOp::Eq, ValueKind::String, ValueKind::String).is_none());
    }

    #[test]
    fn test_prefix_operations() {
        assert_eq!(apply_prefix(UnaryOp::Neg, &int(5)).unwrap(), int(-5));
        assert_eq!(apply_prefix(UnaryOp::Not, &Value::Bool(true)).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_unsupported_operators() {
        assert_eq!(
            apply_infix(BinaryOp::Add, &int(5), &Value::Bool(true)),
            Err(Error::UnsupportedOperator {
                operator: "+".to_string(),
                operands: OperandKinds(vec![ValueKind::Integer, ValueKind::Boolean]),
            })
        );
        assert_eq!(
            apply_prefix(UnaryOp::Not, &int(5)),
            Err(Error::UnsupportedOperator {
                operator: "!".to_string(),
                operands: OperandKinds(vec![ValueKind::Integer]),
            })
        );
        assert!(apply_infix(BinaryOp::Lt, &Value::Bool(true), &Value::Bool(false)).is_err());
        assert!(apply_infix(BinaryOp::Eq, &Value::Null, &Value::Null).is_err());
    }

    #[test]
    fn test_lookup() {
        assert!(lookup_prefix(UnaryOp::Neg, ValueKind::Integer).is_some());
        assert!(lookup_prefix(UnaryOp::Neg, ValueKind::Boolean).is_none());
        assert!(lookup_infix(BinaryOp::Mul, ValueKind::Integer, ValueKind::Integer).is_some());
        assert!(lookup_infix(BinaryOp::Mul, ValueKind::String, ValueKind::Integer).is_none());
    }
}
