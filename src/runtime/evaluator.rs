use std::mem;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::parser::{BinaryOp, BlockStatement, Expression, Program, Statement, UnaryOp, Visitor};
use crate::runtime::operators::{apply_infix, apply_prefix};
use crate::runtime::{Closure, Environment, Value};

/// Outcome of evaluating a node
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Evaluation finished normally with this value
    Normal(Value),
    /// A `return` was hit; unwinds to the nearest call or the program
    Return(Value),
}

impl Flow {
    /// Unwraps the carried value, discarding the distinction
    pub fn into_value(self) -> Value {
        match self {
            Flow::Normal(value) | Flow::Return(value) => value,
        }
    }

    /// True for [`Flow::Return`]
    pub fn is_return(&self) -> bool {
        matches!(self, Flow::Return(_))
    }
}

/// Evaluates a sub-node and yields its value, propagating errors and returns
macro_rules! value_of {
    ($flow:expr) => {
        match $flow? {
            Flow::Normal(value) => value,
            returned @ Flow::Return(_) => return Ok(returned),
        }
    };
}

/// Tree-walking evaluator
///
/// Holds the current environment between calls to [`Evaluator::execute`], so
/// bindings made by one program stay visible to the next. This is what the
/// REPL relies on. Each program runs in its own scope, which is folded into
/// the session scope when it succeeds; a later program may redeclare a name.
#[derive(Debug, Default)]
pub struct Evaluator {
    env: Environment,
}

impl Evaluator {
    /// Creates an evaluator with an empty global scope
    pub fn new() -> Self {
        Evaluator {
            env: Environment::new(),
        }
    }

    /// Executes a program and returns its final value
    ///
    /// On error the environment is rolled back to what it was before the
    /// call; nothing the failed program bound is kept.
    pub fn execute(&mut self, program: &Program) -> Result<Value> {
        tracing::debug!(statements = program.statements.len(), "executing program");

        let saved = self.env.clone();
        match program.accept(self) {
            Ok(flow) => Ok(flow.into_value()),
            Err(err) => {
                tracing::debug!(error = %err, "execution failed, rolling back");
                self.env = saved;
                Err(err)
            }
        }
    }

    /// Current environment
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Drops every binding
    pub fn reset(&mut self) {
        self.env = Environment::new();
    }

    fn eval_statements(&mut self, statements: &[Statement]) -> Result<Flow> {
        let mut result = Flow::Normal(Value::Null);
        for statement in statements {
            result = statement.accept(self)?;
            if result.is_return() {
                break;
            }
        }
        Ok(result)
    }

    #[tracing::instrument(level = "trace", skip_all, fields(arity = arguments.len()))]
    fn apply_function(&mut self, closure: &Closure, arguments: Vec<Value>) -> Result<Value> {
        if closure.parameters.len() != arguments.len() {
            return Err(Error::ArityMismatch {
                expected: closure.parameters.len(),
                got: arguments.len(),
            });
        }

        let mut call_env = closure.env.enclosed();
        for (parameter, argument) in closure.parameters.iter().zip(arguments) {
            call_env.define(parameter.clone(), argument)?;
        }

        let caller = mem::replace(&mut self.env, call_env);
        let result = closure.body.accept(self);
        self.env = caller;

        result.map(Flow::into_value)
    }
}

impl Visitor for Evaluator {
    type Output = Result<Flow>;

    fn visit_program(&mut self, program: &Program) -> Result<Flow> {
        self.env.enter_scope();
        let result = self.eval_statements(&program.statements)?;
        self.env.commit_scope();
        Ok(result)
    }

    fn visit_let_statement(&mut self, name: &str, value: &Expression) -> Result<Flow> {
        let value = value_of!(value.accept(self));
        self.env.define(name.to_string(), value.clone())?;
        Ok(Flow::Normal(value))
    }

    fn visit_return_statement(&mut self, value: &Expression) -> Result<Flow> {
        let value = value_of!(value.accept(self));
        Ok(Flow::Return(value))
    }

    fn visit_expression_statement(&mut self, expression: &Expression) -> Result<Flow> {
        expression.accept(self)
    }

    fn visit_block_statement(&mut self, block: &BlockStatement) -> Result<Flow> {
        self.env.enter_scope();
        let result = self.eval_statements(&block.statements);
        self.env.exit_scope();
        result
    }

    fn visit_identifier(&mut self, name: &str) -> Result<Flow> {
        self.env.get(name).map(Flow::Normal)
    }

    fn visit_integer_literal(&mut self, value: i64) -> Result<Flow> {
        Ok(Flow::Normal(Value::Int(value)))
    }

    fn visit_string_literal(&mut self, value: &str) -> Result<Flow> {
        Ok(Flow::Normal(Value::string(value)))
    }

    fn visit_boolean_literal(&mut self, value: bool) -> Result<Flow> {
        Ok(Flow::Normal(Value::Bool(value)))
    }

    fn visit_prefix_expression(&mut self, operator: UnaryOp, operand: &Expression) -> Result<Flow> {
        let operand = value_of!(operand.accept(self));
        apply_prefix(operator, &operand).map(Flow::Normal)
    }

    fn visit_infix_expression(
        &mut self,
        left: &Expression,
        operator: BinaryOp,
        right: &Expression,
    ) -> Result<Flow> {
        let left = value_of!(left.accept(self));
        let right = value_of!(right.accept(self));
        apply_infix(operator, &left, &right).map(Flow::Normal)
    }

    fn visit_if_expression(
        &mut self,
        condition: &Expression,
        consequence: &BlockStatement,
        alternative: Option<&BlockStatement>,
    ) -> Result<Flow> {
        let condition = value_of!(condition.accept(self));
        let taken = match condition {
            Value::Bool(taken) => taken,
            other => {
                return Err(Error::ConditionNotBoolean { kind: other.kind() });
            }
        };

        if taken {
            consequence.accept(self)
        } else if let Some(alternative) = alternative {
            alternative.accept(self)
        } else {
            Ok(Flow::Normal(Value::Null))
        }
    }

    fn visit_function_literal(&mut self, parameters: &[String], body: &Rc<BlockStatement>) -> Result<Flow> {
        let closure = Closure {
            parameters: parameters.to_vec(),
            body: Rc::clone(body),
            env: self.env.snapshot(),
        };
        Ok(Flow::Normal(Value::Function(Rc::new(closure))))
    }

    fn visit_call_expression(&mut self, function: &Expression, arguments: &[Expression]) -> Result<Flow> {
        let closure = match value_of!(function.accept(self)) {
            Value::Function(closure) => closure,
            other => return Err(Error::NotCallable { kind: other.kind() }),
        };

        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.push(value_of!(argument.accept(self)));
        }

        self.apply_function(&closure, values).map(Flow::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;
    use crate::runtime::ValueKind;

    fn eval(source: &str) -> Result<Value> {
        let program = parse_source(source)?;
        Evaluator::new().execute(&program)
    }

    #[test]
    fn test_literals() {
        assert_eq!(eval("5").unwrap(), Value::Int(5));
        assert_eq!(eval("true").unwrap(), Value::Bool(true));
        assert_eq!(eval("\"hey\"").unwrap(), Value::string("hey"));
        assert_eq!(eval("").unwrap(), Value::Null);
    }

    #[test]
    fn test_let_yields_bound_value() {
        assert_eq!(eval("let a = 5;").unwrap(), Value::Int(5));
        assert_eq!(eval("let a = 5; let b = a * 2; b + 1").unwrap(), Value::Int(11));
    }

    #[test]
    fn test_return_short_circuits() {
        assert_eq!(eval("if (true) { return 1; } return 2;").unwrap(), Value::Int(1));
        assert_eq!(eval("return 3; 4").unwrap(), Value::Int(3));
        assert_eq!(
            eval("if (true) { if (true) { return 10; } return 1; }").unwrap(),
            Value::Int(10)
        );
    }

    #[test]
    fn test_return_propagates_through_expressions() {
        assert_eq!(
            eval("let f = fn() { 1 + if (true) { return 7; }; 99 }; f()").unwrap(),
            Value::Int(7)
        );
    }

    #[test]
    fn test_if_without_taken_branch_is_null() {
        assert_eq!(eval("if (false) { 1 }").unwrap(), Value::Null);
        assert_eq!(eval("if (1 > 2) { 1 } else { 2 }").unwrap(), Value::Int(2));
        assert_eq!(eval("if (true) { }").unwrap(), Value::Null);
    }

    #[test]
    fn test_condition_must_be_boolean() {
        assert_eq!(
            eval("if (1) { 2 }"),
            Err(Error::ConditionNotBoolean {
                kind: ValueKind::Integer
            })
        );
    }

    #[test]
    fn test_function_application() {
        assert_eq!(eval("let id = fn(x) { x }; id(5)").unwrap(), Value::Int(5));
        assert_eq!(eval("fn(x, y) { x + y }(2, 3)").unwrap(), Value::Int(5));
        assert_eq!(eval("let f = fn() { return 1; 2 }; f()").unwrap(), Value::Int(1));
    }

    #[test]
    fn test_closures_capture_definition_scope() {
        let source = "let x = 1; let f = fn() { x }; let g = fn() { let x = 2; f() }; g();";
        assert_eq!(eval(source).unwrap(), Value::Int(1));

        let source = "let newAdder = fn(x) { fn(y) { x + y } }; let addTwo = newAdder(2); addTwo(3);";
        assert_eq!(eval(source).unwrap(), Value::Int(5));
    }

    #[test]
    fn test_closure_does_not_see_later_bindings() {
        assert_eq!(
            eval("let f = fn() { y }; let y = 1; f()"),
            Err(Error::UndefinedIdentifier {
                name: "y".to_string()
            })
        );
    }

    #[test]
    fn test_call_errors() {
        assert_eq!(
            eval("let x = 5; x(1)"),
            Err(Error::NotCallable {
                kind: ValueKind::Integer
            })
        );
        assert_eq!(
            eval("fn(a, b) { a }(1)"),
            Err(Error::ArityMismatch {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn test_duplicate_binding() {
        assert_eq!(
            eval("let a = 1; let a = 2;"),
            Err(Error::DuplicateBinding {
                name: "a".to_string()
            })
        );
        // Shadowing in a nested block is allowed
        assert_eq!(eval("let a = 1; if (true) { let a = 2; a }").unwrap(), Value::Int(2));
    }

    #[test]
    fn test_block_bindings_do_not_leak() {
        assert!(matches!(
            eval("if (true) { let inner = 1; }; inner"),
            Err(Error::UndefinedIdentifier { .. })
        ));
    }

    #[test]
    fn test_environment_persists_between_programs() {
        let mut evaluator = Evaluator::new();
        evaluator.execute(&parse_source("let a = 2;").unwrap()).unwrap();
        let result = evaluator.execute(&parse_source("a * 3").unwrap()).unwrap();
        assert_eq!(result, Value::Int(6));
    }

    #[test]
    fn test_failed_program_is_rolled_back() {
        let mut evaluator = Evaluator::new();
        let before = evaluator.environment().scope_depth();
        let err = evaluator.execute(&parse_source("let a = 1; a + true").unwrap());
        assert!(err.is_err());
        assert!(!evaluator.environment().exists("a"));
        assert_eq!(evaluator.environment().scope_depth(), before);
    }

    #[test]
    fn test_caller_environment_restored_after_call_error() {
        let mut evaluator = Evaluator::new();
        evaluator
            .execute(&parse_source("let f = fn(x) { x + true };").unwrap())
            .unwrap();
        let depth = evaluator.environment().scope_depth();
        assert!(evaluator.execute(&parse_source("f(1)").unwrap()).is_err());
        assert_eq!(evaluator.environment().scope_depth(), depth);
        assert!(evaluator.environment().exists("f"));
    }

    #[test]
    fn test_session_scope_does_not_grow() {
        let mut evaluator = Evaluator::new();
        for i in 0..1000 {
            let line = format!("let v{} = {};", i, i);
            evaluator.execute(&parse_source(&line).unwrap()).unwrap();
        }
        assert_eq!(evaluator.environment().scope_depth(), 1);
        let result = evaluator.execute(&parse_source("v0 + v999").unwrap()).unwrap();
        assert_eq!(result, Value::Int(999));
    }

    #[test]
    fn test_later_program_may_redeclare() {
        let mut evaluator = Evaluator::new();
        evaluator.execute(&parse_source("let x = 1; let f = fn() { x };").unwrap()).unwrap();
        evaluator.execute(&parse_source("let x = 5;").unwrap()).unwrap();
        assert_eq!(evaluator.execute(&parse_source("x").unwrap()).unwrap(), Value::Int(5));
        assert_eq!(evaluator.execute(&parse_source("f()").unwrap()).unwrap(), Value::Int(1));
        assert_eq!(evaluator.environment().scope_depth(), 1);
    }

    #[test]
    fn test_reset() {
        let mut evaluator = Evaluator::new();
        evaluator.execute(&parse_source("let a = 1;").unwrap()).unwrap();
        evaluator.reset();
        assert!(!evaluator.environment().exists("a"));
    }

    #[test]
    fn test_flow_into_value() {
        assert_eq!(Flow::Return(Value::Int(1)).into_value(), Value::Int(1));
        assert!(!Flow::Normal(Value::Null).is_return());
    }
}
