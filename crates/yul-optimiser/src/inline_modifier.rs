//! Call-site rewriting.
//!
//! Expressions are rewritten in place; statements that have to run before
//! the rewritten expression (argument temporaries, inlined bodies) are
//! returned to the caller and spliced into the enclosing block right before
//! the statement that contains the expression.

use std::mem;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};
use yul_ir::{
    Block, Expression, FunctionCall, Identifier, Statement, TypedName, VariableDeclaration,
};

use crate::error::OptimiserError;
use crate::full_inliner::{Child, FullInliner};

/// Position of a nested block below the root: statement index and child.
type BlockPath = Vec<(usize, Child)>;

/// Rewrites one top-level block or function body in place.
///
/// The rewritten block is never taken out of the tree. It is addressed by
/// the index of its top-level statement plus a path, and re-resolved after
/// every call into the driver.
pub(crate) struct InlineModifier<'d, 'a> {
    driver: &'d mut FullInliner<'a>,
    /// Name of the function whose body is rewritten; empty at top level.
    current_function: String,
    root: usize,
}

impl<'d, 'a> InlineModifier<'d, 'a> {
    pub(crate) fn new(
        driver: &'d mut FullInliner<'a>,
        current_function: String,
        root: usize,
    ) -> Self {
        Self {
            driver,
            current_function,
            root,
        }
    }

    pub(crate) fn run(mut self) -> Result<(), OptimiserError> {
        self.visit_block(&mut BlockPath::new())
    }

    fn block(&mut self, path: &[(usize, Child)]) -> Result<&mut Block, OptimiserError> {
        self.driver.block_mut(self.root, path)
    }

    fn visit_block(&mut self, path: &mut BlockPath) -> Result<(), OptimiserError> {
        let mut i = 0;
        while i < self.block(path)?.statements.len() {
            let prefix = self.visit_statement(path, i)?;
            let length = prefix.len();
            if length > 0 {
                self.block(path)?.statements.splice(i..i, prefix);
                i += length;
            }
            i += 1;
        }
        Ok(())
    }

    /// Rewrites statement `i` of the block at `path`, returning what has to
    /// be placed before it.
    fn visit_statement(
        &mut self,
        path: &mut BlockPath,
        i: usize,
    ) -> Result<Vec<Statement>, OptimiserError> {
        let statement = &mut self.block(path)?.statements[i];
        if let Statement::FunctionDefinition(fun) = statement {
            return Err(OptimiserError::NestedFunctionDefinition {
                name: fun.name.clone(),
            });
        }
        let children = Child::of(statement);

        // The tree keeps the unrewritten expression until its rewrite is
        // complete.
        let mut prefix = Vec::new();
        if let Some(mut expression) = expression_slot(statement).cloned() {
            prefix = self.visit_expression(&mut expression)?;
            if let Some(slot) = expression_slot(&mut self.block(path)?.statements[i]) {
                *slot = expression;
            }
        }

        for child in children {
            path.push((i, child));
            let result = self.visit_block(path);
            path.pop();
            result?;
        }
        Ok(prefix)
    }

    fn visit_expression(
        &mut self,
        expression: &mut Expression,
    ) -> Result<Vec<Statement>, OptimiserError> {
        match expression {
            Expression::Literal(_) | Expression::Identifier(_) => Ok(Vec::new()),
            Expression::FunctionalInstruction(instr) => {
                self.visit_arguments(&mut instr.arguments, &[], &[], false)
            }
            Expression::FunctionCall(call) => {
                let (prefix, result) = self.visit_call(call)?;
                if let Some(result) = result {
                    *expression = Expression::Identifier(result);
                }
                Ok(prefix)
            }
        }
    }

    /// Returns the hoisted statements and, if the call was inlined, the
    /// variable that replaces it.
    fn visit_call(
        &mut self,
        call: &mut FunctionCall,
    ) -> Result<(Vec<Statement>, Option<Identifier>), OptimiserError> {
        let callee_name = call.function_name.name.clone();
        self.driver.handle_function(&callee_name)?;
        let callee = self.driver.signature(&callee_name)?;

        if call.arguments.len() != callee.parameters.len() {
            return Err(OptimiserError::ArityMismatch {
                name: callee_name,
                expected: callee.parameters.len(),
                found: call.arguments.len(),
            });
        }

        let do_inline =
            callee.name != self.current_function && callee.return_variables.len() == 1;

        let (name_hints, types): (Vec<String>, Vec<String>) = callee
            .parameters
            .iter()
            .map(|(param, ty)| (format!("{}_{}", callee.name, param), ty.clone()))
            .unzip();
        let mut prefix =
            self.visit_arguments(&mut call.arguments, &name_hints, &types, do_inline)?;

        if !do_inline {
            return Ok((prefix, None));
        }

        let mut substitutions = FxHashMap::default();
        for ((param, _), arg) in callee.parameters.iter().zip(&call.arguments) {
            let Some(arg) = arg.as_identifier() else {
                return Err(OptimiserError::UnhoistedArgument { name: callee_name });
            };
            substitutions.insert(param.clone(), arg.name.clone());
        }
        let (return_name, return_type) = &callee.return_variables[0];
        let result = self
            .driver
            .dispenser()
            .new_name(&format!("{}_{}", callee.name, return_name));
        substitutions.insert(return_name.clone(), result.clone());

        debug!(
            callee = %callee.name,
            caller = %self.current_function,
            result = %result,
            "inlining call"
        );
        prefix.push(Statement::VariableDeclaration(VariableDeclaration {
            variables: vec![TypedName::new(result.clone(), return_type.clone())],
            value: None,
        }));
        prefix.push(Statement::Block(
            self.driver.instantiate(&callee.name, &substitutions)?,
        ));
        Ok((prefix, Some(Identifier::new(result))))
    }

    /// Rewrites call or instruction arguments left to right.
    ///
    /// Arguments are evaluated right to left. Once an argument needs
    /// statements hoisted in front of the call, every argument to its right
    /// is evaluated before it and therefore has to be bound to a temporary
    /// in front of those statements; later prefixes are prepended.
    fn visit_arguments(
        &mut self,
        arguments: &mut [Expression],
        name_hints: &[String],
        types: &[String],
        mut move_to_front: bool,
    ) -> Result<Vec<Statement>, OptimiserError> {
        let mut prefix: Vec<Statement> = Vec::new();
        for (i, arg) in arguments.iter_mut().enumerate() {
            let mut hoisted = self.visit_expression(arg)?;
            if !hoisted.is_empty() {
                move_to_front = true;
                if arg.as_identifier().is_none() {
                    hoisted.push(self.bind_to_temporary(arg, name_hints.get(i), types.get(i)));
                }
                hoisted.append(&mut prefix);
                prefix = hoisted;
            } else if move_to_front {
                let binding = self.bind_to_temporary(arg, name_hints.get(i), types.get(i));
                prefix.insert(0, binding);
            }
        }
        Ok(prefix)
    }

    /// Replaces `arg` with a reference to a fresh variable initialised to it.
    fn bind_to_temporary(
        &mut self,
        arg: &mut Expression,
        name_hint: Option<&String>,
        type_name: Option<&String>,
    ) -> Statement {
        let var = self
            .driver
            .dispenser()
            .new_name(name_hint.map_or("", String::as_str));
        trace!(temporary = %var, "hoisting argument");
        let value = mem::replace(arg, Expression::Identifier(Identifier::new(var.clone())));
        Statement::VariableDeclaration(VariableDeclaration {
            variables: vec![TypedName::new(var, type_name.cloned().unwrap_or_default())],
            value: Some(value),
        })
    }
}

/// The expression a statement evaluates in front of its own position. A
/// `for` condition is evaluated once per iteration and has none.
fn expression_slot(statement: &mut Statement) -> Option<&mut Expression> {
    match statement {
        Statement::ExpressionStatement { expression } => Some(expression),
        Statement::Assignment { value, .. } => Some(value),
        Statement::VariableDeclaration(decl) => decl.value.as_mut(),
        Statement::If { condition, .. } => Some(condition),
        Statement::Switch { expression, .. } => Some(expression),
        _ => None,
    }
}
