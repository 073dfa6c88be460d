//! Optimiser passes over the Yul IR.
//!
//! Currently this is the full inliner: every call to a function with exactly
//! one return variable is replaced by a renamed copy of the callee's body,
//! except direct self-calls and calls inside `for` loop conditions. The pass
//! expects function definitions to have been hoisted to the top level.

mod body_copier;
mod error;
mod full_inliner;
mod inline_modifier;
mod name_dispenser;

use yul_ir::Block;

pub use body_copier::BodyCopier;
pub use error::OptimiserError;
pub use full_inliner::FullInliner;
pub use name_dispenser::NameDispenser;

/// Run the full inliner over `ast`, returning the dispenser with every name
/// introduced by the pass recorded.
pub fn full_inline(
    ast: &mut Block,
    dispenser: NameDispenser,
) -> Result<NameDispenser, OptimiserError> {
    let mut inliner = FullInliner::new(ast, dispenser)?;
    inliner.run()?;
    Ok(inliner.into_dispenser())
}
