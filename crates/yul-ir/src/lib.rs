//! Tree-shaped intermediate representation consumed by the optimiser passes.

mod ast;
pub mod builders;
mod names;
mod printer;

pub use ast::{
    Block, Case, Expression, ForLoop, FunctionCall, FunctionDefinition, FunctionalInstruction,
    Identifier, Literal, LiteralKind, Statement, TypedName, VariableDeclaration,
};
pub use names::NameCollector;
