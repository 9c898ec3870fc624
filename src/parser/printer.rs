//! Indented tree rendering of the AST, for debugging output

use std::rc::Rc;

use super::ast::{BinaryOp, BlockStatement, Expression, Program, UnaryOp, Visitor};

/// Renders any node as one line per node, children indented two spaces.
///
/// ```text
/// Program
///   LetStatement x
///     InfixExpression +
///       IntegerLiteral 1
///       IntegerLiteral 2
/// ```
#[derive(Debug, Default)]
pub struct AstPrinter {
    depth: usize,
}

impl AstPrinter {
    /// Creates a printer starting at depth zero
    pub fn new() -> Self {
        AstPrinter::default()
    }

    /// Render a whole program
    pub fn print(program: &Program) -> String {
        program.accept(&mut AstPrinter::new())
    }

    fn line(&self, label: &str) -> String {
        format!("{}{}", "  ".repeat(self.depth), label)
    }

    /// Render `label` followed by the children produced by `children`, one level deeper
    fn node<F>(&mut self, label: &str, children: F) -> String
    where
        F: FnOnce(&mut Self) -> Vec<String>,
    {
        let mut lines = vec![self.line(label)];
        self.depth += 1;
        lines.extend(children(self));
        self.depth -= 1;
        lines.join("\n")
    }
}

impl Visitor for AstPrinter {
    type Output = String;

    fn visit_program(&mut self, program: &Program) -> String {
        self.node("Program", |p| {
            program.statements.iter().map(|s| s.accept(p)).collect()
        })
    }

    fn visit_let_statement(&mut self, name: &str, value: &Expression) -> String {
        self.node(&format!("LetStatement {}", name), |p| vec![value.accept(p)])
    }

    fn visit_return_statement(&mut self, value: &Expression) -> String {
        self.node("ReturnStatement", |p| vec![value.accept(p)])
    }

    fn visit_expression_statement(&mut self, expression: &Expression) -> String {
        self.node("ExpressionStatement", |p| vec![expression.accept(p)])
    }

    fn visit_block_statement(&mut self, block: &BlockStatement) -> String {
        self.node("BlockStatement", |p| {
            block.statements.iter().map(|s| s.accept(p)).collect()
        })
    }

    fn visit_identifier(&mut self, name: &str) -> String {
        self.line(&format!("Identifier {}", name))
    }

    fn visit_integer_literal(&mut self, value: i64) -> String {
        self.line(&format!("IntegerLiteral {}", value))
    }

    fn visit_string_literal(&mut self, value: &str) -> String {
        self.line(&format!("StringLiteral {:?}", value))
    }

    fn visit_boolean_literal(&mut self, value: bool) -> String {
        self.line(&format!("BooleanLiteral {}", value))
    }

    fn visit_prefix_expression(&mut self, operator: UnaryOp, operand: &Expression) -> String {
        self.node(&format!("PrefixExpression {}", operator), |p| {
            vec![operand.accept(p)]
        })
    }

    fn visit_infix_expression(
        &mut self,
        left: &Expression,
        operator: BinaryOp,
        right: &Expression,
    ) -> String {
        self.node(&format!("InfixExpression {}", operator), |p| {
            vec![left.accept(p), right.accept(p)]
        })
    }

    fn visit_if_expression(
        &mut self,
        condition: &Expression,
        consequence: &BlockStatement,
        alternative: Option<&BlockStatement>,
    ) -> String {
        self.node("IfExpression", |p| {
            let mut children = vec![condition.accept(p), consequence.accept(p)];
            if let Some(alternative) = alternative {
                children.push(alternative.accept(p));
            }
            children
        })
    }

    fn visit_function_literal(&mut self, parameters: &[String], body: &Rc<BlockStatement>) -> String {
        self.node(&format!("FunctionLiteral ({})", parameters.join(", ")), |p| {
            vec![body.accept(p)]
        })
    }

    fn visit_call_expression(&mut self, function: &Expression, arguments: &[Expression]) -> String {
        self.node("CallExpression", |p| {
            std::iter::once(function)
                .chain(arguments)
                .map(|e| e.accept(p))
                .collect()
        })
    }
}
