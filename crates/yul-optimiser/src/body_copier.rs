use rustc_hash::FxHashMap;
use yul_ir::{
    Block, Case, Expression, ForLoop, FunctionCall, FunctionalInstruction, Identifier, Statement,
    TypedName, VariableDeclaration,
};

use crate::error::OptimiserError;
use crate::name_dispenser::NameDispenser;

/// Deep-copies a function body for splicing at a call site.
///
/// Every variable declared inside the body gets a fresh name derived from
/// `var_name_prefix + name`. References are translated through the caller's
/// substitutions first (parameters, return variable), then through the
/// renames registered so far.
pub struct BodyCopier<'a> {
    dispenser: &'a mut NameDispenser,
    var_name_prefix: &'a str,
    substitutions: &'a FxHashMap<String, String>,
    renames: FxHashMap<String, String>,
}

impl<'a> BodyCopier<'a> {
    pub fn new(
        dispenser: &'a mut NameDispenser,
        var_name_prefix: &'a str,
        substitutions: &'a FxHashMap<String, String>,
    ) -> Self {
        Self {
            dispenser,
            var_name_prefix,
            substitutions,
            renames: FxHashMap::default(),
        }
    }

    pub fn copy_block(&mut self, block: &Block) -> Result<Block, OptimiserError> {
        let statements = block
            .statements
            .iter()
            .map(|statement| self.copy_statement(statement))
            .collect::<Result<_, _>>()?;
        Ok(Block { statements })
    }

    fn copy_statement(&mut self, statement: &Statement) -> Result<Statement, OptimiserError> {
        Ok(match statement {
            Statement::ExpressionStatement { expression } => Statement::ExpressionStatement {
                expression: self.copy_expression(expression),
            },
            Statement::Assignment {
                variable_names,
                value,
            } => Statement::Assignment {
                variable_names: variable_names
                    .iter()
                    .map(|id| self.translate(id))
                    .collect(),
                value: self.copy_expression(value),
            },
            Statement::VariableDeclaration(decl) => {
                // Renames are registered before the initializer is copied.
                let variables = decl
                    .variables
                    .iter()
                    .map(|var| {
                        let fresh = self
                            .dispenser
                            .new_name(&format!("{}{}", self.var_name_prefix, var.name));
                        self.renames.insert(var.name.clone(), fresh.clone());
                        TypedName {
                            name: fresh,
                            type_name: var.type_name.clone(),
                        }
                    })
                    .collect();
                Statement::VariableDeclaration(VariableDeclaration {
                    variables,
                    value: decl.value.as_ref().map(|value| self.copy_expression(value)),
                })
            }
            Statement::FunctionDefinition(fun) => {
                return Err(OptimiserError::NestedFunctionDefinition {
                    name: fun.name.clone(),
                });
            }
            Statement::If { condition, body } => Statement::If {
                condition: self.copy_expression(condition),
                body: self.copy_block(body)?,
            },
            Statement::Switch { expression, cases } => Statement::Switch {
                expression: self.copy_expression(expression),
                cases: cases
                    .iter()
                    .map(|case| {
                        Ok(Case {
                            value: case.value.clone(),
                            body: self.copy_block(&case.body)?,
                        })
                    })
                    .collect::<Result<_, OptimiserError>>()?,
            },
            Statement::ForLoop(for_loop) => {
                // `pre` first: its declarations are in scope for the rest.
                let pre = self.copy_block(&for_loop.pre)?;
                Statement::ForLoop(ForLoop {
                    pre,
                    condition: self.copy_expression(&for_loop.condition),
                    post: self.copy_block(&for_loop.post)?,
                    body: self.copy_block(&for_loop.body)?,
                })
            }
            Statement::Block(block) => Statement::Block(self.copy_block(block)?),
        })
    }

    fn copy_expression(&mut self, expression: &Expression) -> Expression {
        match expression {
            Expression::Literal(literal) => Expression::Literal(literal.clone()),
            Expression::Identifier(id) => Expression::Identifier(self.translate(id)),
            Expression::FunctionalInstruction(instr) => {
                Expression::FunctionalInstruction(FunctionalInstruction {
                    instruction: instr.instruction.clone(),
                    arguments: self.copy_arguments(&instr.arguments),
                })
            }
            Expression::FunctionCall(call) => Expression::FunctionCall(FunctionCall {
                function_name: call.function_name.clone(),
                arguments: self.copy_arguments(&call.arguments),
            }),
        }
    }

    fn copy_arguments(&mut self, arguments: &[Expression]) -> Vec<Expression> {
        arguments
            .iter()
            .map(|arg| self.copy_expression(arg))
            .collect()
    }

    fn translate(&self, id: &Identifier) -> Identifier {
        let name = self
            .substitutions
            .get(&id.name)
            .or_else(|| self.renames.get(&id.name))
            .unwrap_or(&id.name);
        Identifier::new(name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yul_ir::builders::*;

    fn substitutions(pairs: &[(&str, &str)]) -> FxHashMap<String, String> {
        pairs
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect()
    }

    #[test]
    fn declarations_are_renamed_and_parameters_substituted() {
        let body = block(vec![
            let_(&["t"], Some(instr("mul", vec![ident("x"), number("2")]))),
            assign(&["y"], instr("add", vec![ident("t"), ident("global")])),
        ]);
        let mut dispenser = NameDispenser::new(["f", "x", "y", "t", "global", "a"]);
        let subs = substitutions(&[("x", "a"), ("y", "f_y")]);

        let copy = BodyCopier::new(&mut dispenser, "f_", &subs)
            .copy_block(&body)
            .expect("copy body");

        assert_eq!(
            copy,
            block(vec![
                let_(&["f_t"], Some(instr("mul", vec![ident("a"), number("2")]))),
                assign(&["f_y"], instr("add", vec![ident("f_t"), ident("global")])),
            ])
        );
    }

    #[test]
    fn repeated_copies_get_distinct_names() {
        let body = block(vec![let_(&["t"], Some(number("1")))]);
        let mut dispenser = NameDispenser::new(["t"]);
        let subs = FxHashMap::default();

        let first = BodyCopier::new(&mut dispenser, "f_", &subs)
            .copy_block(&body)
            .expect("first copy");
        let second = BodyCopier::new(&mut dispenser, "f_", &subs)
            .copy_block(&body)
            .expect("second copy");

        assert_eq!(first, block(vec![let_(&["f_t"], Some(number("1")))]));
        assert_eq!(second, block(vec![let_(&["f_t_1"], Some(number("1")))]));
    }

    #[test]
    fn loop_scoped_declarations_are_renamed_everywhere() {
        let body = block(vec![for_loop(
            vec![let_(&["i"], Some(number("0")))],
            instr("lt", vec![ident("i"), ident("n")]),
            vec![assign(&["i"], instr("add", vec![ident("i"), number("1")]))],
            vec![expr_stmt(call("g", vec![ident("i")]))],
        )]);
        let mut dispenser = NameDispenser::new(["i", "n", "g"]);
        let subs = substitutions(&[("n", "h_n")]);

        let copy = BodyCopier::new(&mut dispenser, "h_", &subs)
            .copy_block(&body)
            .expect("copy body");

        assert_eq!(
            copy,
            block(vec![for_loop(
                vec![let_(&["h_i"], Some(number("0")))],
                instr("lt", vec![ident("h_i"), ident("h_n")]),
                vec![assign(&["h_i"], instr("add", vec![ident("h_i"), number("1")]))],
                vec![expr_stmt(call("g", vec![ident("h_i")]))],
            )])
        );
    }

    #[test]
    fn nested_function_definition_is_fatal() {
        let body = block(vec![function("inner", &[], &[], vec![])]);
        let mut dispenser = NameDispenser::default();
        let subs = FxHashMap::default();

        let err = BodyCopier::new(&mut dispenser, "f_", &subs)
            .copy_block(&body)
            .expect_err("nested definitions are rejected");
        assert_eq!(
            err,
            OptimiserError::NestedFunctionDefinition {
                name: "inner".to_string()
            }
        );
    }
}
