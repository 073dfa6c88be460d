/// Violations of the pre-conditions the inliner relies on.
///
/// None of these are recoverable: the module is left partially rewritten and
/// has to be discarded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptimiserError {
    #[error("function hoisting has to be done before function inlining (nested definition of `{name}`)")]
    NestedFunctionDefinition { name: String },
    #[error("invalid top-level element `{kind}`: inlining requires the function hoister and grouper")]
    InvalidTopLevel { kind: &'static str },
    #[error("call to unknown function `{name}`")]
    UnknownFunction { name: String },
    #[error("call to `{name}` passes {found} arguments but the function takes {expected}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("argument of inlined call to `{name}` was not reduced to a variable")]
    UnhoistedArgument { name: String },
    #[error("function `{name}` is defined more than once")]
    DuplicateFunction { name: String },
    /// Internal: a rewrite position below top-level statement `root` no
    /// longer names a block.
    #[error("no block at the rewrite position below top-level statement {root}")]
    InvalidBlockPath { root: usize },
}
