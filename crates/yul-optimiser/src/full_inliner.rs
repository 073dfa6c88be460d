//! Driver of the full inliner.
//!
//! Owns the work-list of function definitions that still have to be
//! processed. Top-level blocks are rewritten first; whenever the rewrite meets
//! a call, the callee is processed (once) before the call site is decided, so
//! that a copied body already has its own calls inlined. Functions never
//! reached that way are drained from the work-list at the end.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tracing::{debug_span, trace};
use yul_ir::{Block, FunctionDefinition, Statement, TypedName};

use crate::body_copier::BodyCopier;
use crate::error::OptimiserError;
use crate::inline_modifier::InlineModifier;
use crate::name_dispenser::NameDispenser;

/// Shape of a callee as far as a call site is concerned.
pub(crate) struct CalleeSignature {
    pub(crate) name: String,
    pub(crate) parameters: Vec<(String, String)>,
    pub(crate) return_variables: Vec<(String, String)>,
}

pub struct FullInliner<'a> {
    ast: &'a mut Block,
    /// Function name to the index of its definition in the root block.
    functions: FxHashMap<String, usize>,
    /// Definitions not yet processed, keyed by statement index.
    pending: BTreeMap<usize, String>,
    dispenser: NameDispenser,
}

impl<'a> FullInliner<'a> {
    /// `dispenser` must already know every name used in `ast`.
    ///
    /// Fails if two top-level functions share a name.
    pub fn new(ast: &'a mut Block, dispenser: NameDispenser) -> Result<Self, OptimiserError> {
        let mut functions = FxHashMap::default();
        let mut pending = BTreeMap::new();
        for (index, statement) in ast.statements.iter().enumerate() {
            if let Statement::FunctionDefinition(fun) = statement {
                if functions.insert(fun.name.clone(), index).is_some() {
                    return Err(OptimiserError::DuplicateFunction {
                        name: fun.name.clone(),
                    });
                }
                pending.insert(index, fun.name.clone());
            }
        }
        Ok(Self {
            ast,
            functions,
            pending,
            dispenser,
        })
    }

    /// Convenience constructor seeding the dispenser from `ast` itself.
    pub fn with_collected_names(ast: &'a mut Block) -> Result<Self, OptimiserError> {
        let dispenser = NameDispenser::from_module(ast);
        Self::new(ast, dispenser)
    }

    pub fn run(&mut self) -> Result<(), OptimiserError> {
        for index in 0..self.ast.statements.len() {
            match &self.ast.statements[index] {
                Statement::Block(_) => {}
                Statement::FunctionDefinition(_) => continue,
                other => {
                    return Err(OptimiserError::InvalidTopLevel {
                        kind: other.kind_name(),
                    });
                }
            }
            InlineModifier::new(self, String::new(), index).run()?;
        }
        while let Some((_, name)) = self.pending.first_key_value() {
            let name = name.clone();
            trace!(function = %name, "draining work-list");
            self.handle_function(&name)?;
        }
        Ok(())
    }

    /// Process the body of `name` unless that already happened or is in
    /// progress.
    ///
    /// The body stays in the tree while it is rewritten, so a call site
    /// reached through a cycle copies every statement rewritten so far.
    pub fn handle_function(&mut self, name: &str) -> Result<(), OptimiserError> {
        let index = self.function_index(name)?;
        if self.pending.remove(&index).is_none() {
            return Ok(());
        }
        let _span = debug_span!("handle_function", function = %name).entered();
        InlineModifier::new(self, name.to_string(), index).run()
    }

    pub fn function(&self, name: &str) -> Result<&FunctionDefinition, OptimiserError> {
        let index = self.function_index(name)?;
        match &self.ast.statements[index] {
            Statement::FunctionDefinition(fun) => Ok(fun),
            _ => Err(unknown(name)),
        }
    }

    /// Whether `name` still waits on the work-list.
    pub fn is_pending(&self, name: &str) -> bool {
        self.functions
            .get(name)
            .is_some_and(|index| self.pending.contains_key(index))
    }

    /// Hand the dispenser back, e.g. to seed a later pass.
    pub fn into_dispenser(self) -> NameDispenser {
        self.dispenser
    }

    pub(crate) fn dispenser(&mut self) -> &mut NameDispenser {
        &mut self.dispenser
    }

    /// The block reached from top-level statement `root` (a block or a
    /// function body) by following `path`.
    pub(crate) fn block_mut(
        &mut self,
        root: usize,
        path: &[(usize, Child)],
    ) -> Result<&mut Block, OptimiserError> {
        let block = match self.ast.statements.get_mut(root) {
            Some(Statement::Block(block)) => block,
            Some(Statement::FunctionDefinition(fun)) => &mut fun.body,
            _ => return Err(OptimiserError::InvalidBlockPath { root }),
        };
        descend(block, path).ok_or(OptimiserError::InvalidBlockPath { root })
    }

    pub(crate) fn signature(&self, name: &str) -> Result<CalleeSignature, OptimiserError> {
        let fun = self.function(name)?;
        let pairs = |names: &[TypedName]| -> Vec<(String, String)> {
            names
                .iter()
                .map(|n| (n.name.clone(), n.type_name.clone()))
                .collect()
        };
        Ok(CalleeSignature {
            name: fun.name.clone(),
            parameters: pairs(&fun.parameters),
            return_variables: pairs(&fun.return_variables),
        })
    }

    /// Copy the body of `name` with `substitutions` applied, renaming its
    /// local declarations with the `<name>_` prefix.
    pub(crate) fn instantiate(
        &mut self,
        name: &str,
        substitutions: &FxHashMap<String, String>,
    ) -> Result<Block, OptimiserError> {
        let index = self.function_index(name)?;
        let Statement::FunctionDefinition(fun) = &self.ast.statements[index] else {
            return Err(unknown(name));
        };
        let prefix = format!("{name}_");
        BodyCopier::new(&mut self.dispenser, &prefix, substitutions).copy_block(&fun.body)
    }

    fn function_index(&self, name: &str) -> Result<usize, OptimiserError> {
        self.functions.get(name).copied().ok_or_else(|| unknown(name))
    }
}

/// Which nested block of a statement a rewrite descends into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Child {
    /// `if`, `for` and plain block bodies.
    Body,
    Case(usize),
    Pre,
    Post,
}

impl Child {
    /// Nested blocks of `statement` in visiting order. The `for` condition
    /// has no block and is skipped.
    pub(crate) fn of(statement: &Statement) -> Vec<Child> {
        match statement {
            Statement::If { .. } | Statement::Block(_) => vec![Child::Body],
            Statement::Switch { cases, .. } => (0..cases.len()).map(Child::Case).collect(),
            Statement::ForLoop(_) => vec![Child::Pre, Child::Post, Child::Body],
            _ => Vec::new(),
        }
    }
}

fn descend<'b>(mut block: &'b mut Block, path: &[(usize, Child)]) -> Option<&'b mut Block> {
    for &(index, child) in path {
        let current = block;
        let statement = current.statements.get_mut(index)?;
        block = match (statement, child) {
            (Statement::If { body, .. }, Child::Body) => body,
            (Statement::Block(body), Child::Body) => body,
            (Statement::Switch { cases, .. }, Child::Case(case)) => &mut cases.get_mut(case)?.body,
            (Statement::ForLoop(for_loop), Child::Pre) => &mut for_loop.pre,
            (Statement::ForLoop(for_loop), Child::Post) => &mut for_loop.post,
            (Statement::ForLoop(for_loop), Child::Body) => &mut for_loop.body,
            _ => return None,
        };
    }
    Some(block)
}

fn unknown(name: &str) -> OptimiserError {
    OptimiserError::UnknownFunction {
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yul_ir::builders::*;

    fn module() -> Block {
        block(vec![
            function("f", &["x"], &["y"], vec![assign(&["y"], ident("x"))]),
            function(
                "g",
                &["x"],
                &["y"],
                vec![assign(&["y"], call("f", vec![ident("x")]))],
            ),
        ])
    }

    #[test]
    fn handle_function_processes_callees_first_and_only_once() {
        let mut ast = module();
        let mut inliner = FullInliner::with_collected_names(&mut ast).expect("unique names");

        inliner.handle_function("g").expect("process g");
        assert!(!inliner.is_pending("g"));
        assert!(!inliner.is_pending("f"), "callee is processed on demand");

        let processed = inliner.function("g").expect("g exists").body.clone();
        inliner.handle_function("g").expect("second call is a no-op");
        assert_eq!(inliner.function("g").expect("g exists").body, processed);
    }

    #[test]
    fn lookup_of_unknown_function_fails() {
        let mut ast = module();
        let mut inliner = FullInliner::with_collected_names(&mut ast).expect("unique names");

        assert_eq!(
            inliner.handle_function("h"),
            Err(OptimiserError::UnknownFunction {
                name: "h".to_string()
            })
        );
        assert!(inliner.function("h").is_err());
    }

    #[test]
    fn dispenser_remembers_names_introduced_by_the_pass() {
        let mut ast = module();
        let mut inliner = FullInliner::with_collected_names(&mut ast).expect("unique names");
        inliner.run().expect("inlining succeeds");

        let dispenser = inliner.into_dispenser();
        assert!(dispenser.is_used("f_x"));
        assert!(dispenser.is_used("f_y"));
    }

    #[test]
    fn duplicate_function_names_are_rejected() {
        let mut ast = block(vec![
            function("f", &[], &["y"], vec![]),
            function("f", &[], &["y"], vec![]),
        ]);

        assert_eq!(
            FullInliner::with_collected_names(&mut ast).err(),
            Some(OptimiserError::DuplicateFunction {
                name: "f".to_string()
            })
        );
    }

    #[test]
    fn block_paths_reach_nested_bodies() {
        let mut ast = block(vec![nested(vec![
            let_(&["i"], Some(number("0"))),
            for_loop(vec![], ident("i"), vec![], vec![expr_stmt(ident("i"))]),
        ])]);
        let mut inliner = FullInliner::with_collected_names(&mut ast).expect("unique names");

        let body = inliner.block_mut(0, &[(1, Child::Body)]).expect("loop body");
        assert_eq!(body.statements, vec![expr_stmt(ident("i"))]);
        assert!(inliner.block_mut(0, &[(0, Child::Body)]).is_err());
        assert!(inliner.block_mut(3, &[]).is_err());
    }
}
