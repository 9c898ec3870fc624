use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Complete Monkey program
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    /// Top-level statements in the program
    pub statements: Vec<Statement>,
}

/// Statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// Binding in the current scope: `let name = value;`
    Let {
        /// Name being bound
        name: String,
        /// Expression producing the bound value
        value: Expression,
    },

    /// Early exit from the enclosing function or program: `return value;`
    Return(Expression),

    /// Expression evaluated for its value
    Expression(Expression),
}

/// Brace-delimited sequence of statements
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockStatement {
    /// Statements in the block, in source order
    pub statements: Vec<Statement>,
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Variable reference
    Identifier(String),
    /// Integer literal expression
    IntegerLiteral(i64),
    /// String literal expression
    StringLiteral(String),
    /// Boolean literal expression
    BooleanLiteral(bool),

    /// Unary operation
    Prefix {
        /// Operator applied to the operand
        operator: UnaryOp,
        /// Operand expression
        operand: Box<Expression>,
    },

    /// Binary operation
    Infix {
        /// Left operand
        left: Box<Expression>,
        /// Operator
        operator: BinaryOp,
        /// Right operand
        right: Box<Expression>,
    },

    /// Conditional expression, yields a value
    If {
        /// Condition, must evaluate to a Boolean
        condition: Box<Expression>,
        /// Block evaluated when the condition is true
        consequence: BlockStatement,
        /// Optional block evaluated when the condition is false
        alternative: Option<BlockStatement>,
    },

    /// Function literal: `fn(params) { body }`
    FunctionLiteral {
        /// Parameter names in declaration order
        parameters: Vec<String>,
        /// Function body, shared with the closures created from it
        body: Rc<BlockStatement>,
    },

    /// Function application
    Call {
        /// Expression producing the callee
        function: Box<Expression>,
        /// Argument expressions in call order
        arguments: Vec<Expression>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    /// Addition operator (+), also string concatenation
    Add,
    /// Subtraction operator (-)
    Sub,
    /// Multiplication operator (*)
    Mul,
    /// Floor division operator (/)
    Div,

    // Comparison
    /// Less than operator (<)
    Lt,
    /// Greater than operator (>)
    Gt,
    /// Equality operator (==)
    Eq,
    /// Inequality operator (!=)
    NotEq,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Negation operator (-)
    Neg,
    /// Logical NOT operator (!)
    Not,
}

/// Traversal over the closed set of node variants.
///
/// A consumer implements one method per variant; [`Program::accept`],
/// [`Statement::accept`], [`BlockStatement::accept`] and [`Expression::accept`]
/// perform the dispatch. Adding a consumer never touches the node types.
pub trait Visitor {
    /// Result produced for every visited node
    type Output;

    /// Visit the root of a program
    fn visit_program(&mut self, program: &Program) -> Self::Output;
    /// Visit `let name = value;`
    fn visit_let_statement(&mut self, name: &str, value: &Expression) -> Self::Output;
    /// Visit `return value;`
    fn visit_return_statement(&mut self, value: &Expression) -> Self::Output;
    /// Visit an expression statement
    fn visit_expression_statement(&mut self, expression: &Expression) -> Self::Output;
    /// Visit a `{ ... }` block
    fn visit_block_statement(&mut self, block: &BlockStatement) -> Self::Output;
    /// Visit an identifier reference
    fn visit_identifier(&mut self, name: &str) -> Self::Output;
    /// Visit an integer literal
    fn visit_integer_literal(&mut self, value: i64) -> Self::Output;
    /// Visit a string literal
    fn visit_string_literal(&mut self, value: &str) -> Self::Output;
    /// Visit a boolean literal
    fn visit_boolean_literal(&mut self, value: bool) -> Self::Output;
    /// Visit a prefix (unary) expression
    fn visit_prefix_expression(&mut self, operator: UnaryOp, operand: &Expression)
        -> Self::Output;
    /// Visit an infix (binary) expression
    fn visit_infix_expression(
        &mut self,
        left: &Expression,
        operator: BinaryOp,
        right: &Expression,
    ) -> Self::Output;
    /// Visit an if-expression
    fn visit_if_expression(
        &mut self,
        condition: &Expression,
        consequence: &BlockStatement,
        alternative: Option<&BlockStatement>,
    ) -> Self::Output;
    /// Visit a function literal
    fn visit_function_literal(
        &mut self,
        parameters: &[String],
        body: &Rc<BlockStatement>,
    ) -> Self::Output;
    /// Visit a call expression
    fn visit_call_expression(
        &mut self,
        function: &Expression,
        arguments: &[Expression],
    ) -> Self::Output;
}

impl Program {
    /// Dispatch to [`Visitor::visit_program`]
    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_program(self)
    }
}

impl Statement {
    /// Dispatch to the visitor method for this statement's variant
    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Statement::Let { name, value } => visitor.visit_let_statement(name, value),
            Statement::Return(value) => visitor.visit_return_statement(value),
            Statement::Expression(expression) => visitor.visit_expression_statement(expression),
        }
    }
}

impl BlockStatement {
    /// Dispatch to [`Visitor::visit_block_statement`]
    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_block_statement(self)
    }
}

impl Expression {
    /// Dispatch to the visitor method for this expression's variant
    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expression::Identifier(name) => visitor.visit_identifier(name),
            Expression::IntegerLiteral(value) => visitor.visit_integer_literal(*value),
            Expression::StringLiteral(value) => visitor.visit_string_literal(value),
            Expression::BooleanLiteral(value) => visitor.visit_boolean_literal(*value),
            Expression::Prefix { operator, operand } => {
                visitor.visit_prefix_expression(*operator, operand)
            }
            Expression::Infix {
                left,
                operator,
                right,
            } => visitor.visit_infix_expression(left, *operator, right),
            Expression::If {
                condition,
                consequence,
                alternative,
            } => visitor.visit_if_expression(condition, consequence, alternative.as_ref()),
            Expression::FunctionLiteral { parameters, body } => {
                visitor.visit_function_literal(parameters, body)
            }
            Expression::Call {
                function,
                arguments,
            } => visitor.visit_call_expression(function, arguments),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, statement) in self.statements.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Statement::Let { name, value } => write!(f, "let {} = {};", name, value),
            Statement::Return(value) => write!(f, "return {};", value),
            Statement::Expression(expression) => write!(f, "{}", expression),
        }
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for statement in &self.statements {
            write!(f, " {}", statement)?;
        }
        write!(f, " }}")
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::Identifier(name) => write!(f, "{}", name),
            Expression::IntegerLiteral(value) => write!(f, "{}", value),
            Expression::StringLiteral(value) => write!(f, "{:?}", value),
            Expression::BooleanLiteral(value) => write!(f, "{}", value),
            Expression::Prefix { operator, operand } => write!(f, "({}{})", operator, operand),
            Expression::Infix {
                left,
                operator,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if {} {}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, " else {}", alternative)?;
                }
                Ok(())
            }
            Expression::FunctionLiteral { parameters, body } => {
                write!(f, "fn({}) {}", parameters.join(", "), body)
            }
            Expression::Call {
                function,
                arguments,
            } => {
                write!(f, "{}(", function)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Sub => write!(f, "-"),
            BinaryOp::Mul => write!(f, "*"),
            BinaryOp::Div => write!(f, "/"),
            BinaryOp::Lt => write!(f, "<"),
            BinaryOp::Gt => write!(f, ">"),
            BinaryOp::Eq => write!(f, "=="),
            BinaryOp::NotEq => write!(f, "!="),
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Not => write!(f, "!"),
        }
    }
}
