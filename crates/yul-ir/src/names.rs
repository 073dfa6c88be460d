//! Full-program name collection.
//!
//! The inliner seeds its name dispenser from this set so that no freshly
//! dispensed name can clash with anything already present in the module.

use std::collections::BTreeSet;

use crate::ast::{Block, Expression, Statement, TypedName};

#[derive(Debug, Default)]
pub struct NameCollector {
    names: BTreeSet<String>,
}

impl NameCollector {
    /// Collect every name occurring anywhere in `block`: declarations,
    /// function names, parameters, return variables and references.
    pub fn collect(block: &Block) -> BTreeSet<String> {
        let mut collector = NameCollector::default();
        collector.visit_block(block);
        collector.names
    }

    fn visit_block(&mut self, block: &Block) {
        for statement in &block.statements {
            self.visit_statement(statement);
        }
    }

    fn visit_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::ExpressionStatement { expression } => self.visit_expression(expression),
            Statement::Assignment {
                variable_names,
                value,
            } => {
                self.names
                    .extend(variable_names.iter().map(|id| id.name.clone()));
                self.visit_expression(value);
            }
            Statement::VariableDeclaration(decl) => {
                self.add_typed(&decl.variables);
                if let Some(value) = &decl.value {
                    self.visit_expression(value);
                }
            }
            Statement::FunctionDefinition(fun) => {
                self.names.insert(fun.name.clone());
                self.add_typed(&fun.parameters);
                self.add_typed(&fun.return_variables);
                self.visit_block(&fun.body);
            }
            Statement::If { condition, body } => {
                self.visit_expression(condition);
                self.visit_block(body);
            }
            Statement::Switch { expression, cases } => {
                self.visit_expression(expression);
                for case in cases {
                    self.visit_block(&case.body);
                }
            }
            Statement::ForLoop(for_loop) => {
                self.visit_block(&for_loop.pre);
                self.visit_expression(&for_loop.condition);
                self.visit_block(&for_loop.post);
                self.visit_block(&for_loop.body);
            }
            Statement::Block(block) => self.visit_block(block),
        }
    }

    fn visit_expression(&mut self, expression: &Expression) {
        match expression {
            Expression::Literal(_) => {}
            Expression::Identifier(id) => {
                self.names.insert(id.name.clone());
            }
            Expression::FunctionalInstruction(instr) => {
                for arg in &instr.arguments {
                    self.visit_expression(arg);
                }
            }
            Expression::FunctionCall(call) => {
                self.names.insert(call.function_name.name.clone());
                for arg in &call.arguments {
                    self.visit_expression(arg);
                }
            }
        }
    }

    fn add_typed(&mut self, names: &[TypedName]) {
        self.names.extend(names.iter().map(|n| n.name.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::*;

    #[test]
    fn collects_declarations_references_and_signatures() {
        let module = block(vec![
            function(
                "f",
                &["a"],
                &["r"],
                vec![let_(&["tmp"], Some(ident("a"))), assign(&["r"], ident("tmp"))],
            ),
            Statement::Block(block(vec![let_(
                &["x"],
                Some(call("f", vec![ident("outer")])),
            )])),
        ]);

        let names = NameCollector::collect(&module);
        let expected: BTreeSet<String> = ["f", "a", "r", "tmp", "x", "outer"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn loop_condition_and_switch_are_scanned() {
        let module = block(vec![Statement::Block(block(vec![
            for_loop(
                vec![let_(&["i"], Some(number("0")))],
                instr("lt", vec![ident("i"), ident("n")]),
                vec![assign(&["i"], instr("add", vec![ident("i"), number("1")]))],
                vec![],
            ),
            switch(ident("sel"), vec![default_case(vec![expr_stmt(ident("k"))])]),
        ]))]);

        let names = NameCollector::collect(&module);
        for name in ["i", "n", "sel", "k"] {
            assert!(names.contains(name), "missing {name}");
        }
        assert!(!names.contains("lt"), "instructions are not names");
    }
}
