use serde::{Deserialize, Serialize};

/// An ordered statement sequence. The root block of a module owns the whole
/// tree; every nested node is owned by exactly one parent.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind")]
pub enum Statement {
    ExpressionStatement {
        expression: Expression,
    },
    Assignment {
        variable_names: Vec<Identifier>,
        value: Expression,
    },
    VariableDeclaration(VariableDeclaration),
    FunctionDefinition(FunctionDefinition),
    If {
        condition: Expression,
        body: Block,
    },
    Switch {
        expression: Expression,
        cases: Vec<Case>,
    },
    ForLoop(ForLoop),
    Block(Block),
}

impl Statement {
    /// Short node name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::ExpressionStatement { .. } => "ExpressionStatement",
            Statement::Assignment { .. } => "Assignment",
            Statement::VariableDeclaration(_) => "VariableDeclaration",
            Statement::FunctionDefinition(_) => "FunctionDefinition",
            Statement::If { .. } => "If",
            Statement::Switch { .. } => "Switch",
            Statement::ForLoop(_) => "ForLoop",
            Statement::Block(_) => "Block",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct VariableDeclaration {
    pub variables: Vec<TypedName>,
    pub value: Option<Expression>,
}

/// A function definition. After function hoisting these only occur as direct
/// statements of the root block.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FunctionDefinition {
    pub name: String,
    pub parameters: Vec<TypedName>,
    pub return_variables: Vec<TypedName>,
    pub body: Block,
}

/// `for { pre } condition { post } { body }`. Declarations in `pre` are
/// visible in the condition, `post` and `body`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ForLoop {
    pub pre: Block,
    pub condition: Expression,
    pub post: Block,
    pub body: Block,
}

/// One arm of a `switch`; `value == None` is the default arm.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Case {
    pub value: Option<Literal>,
    pub body: Block,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind")]
pub enum Expression {
    Literal(Literal),
    Identifier(Identifier),
    FunctionalInstruction(FunctionalInstruction),
    FunctionCall(FunctionCall),
}

impl Expression {
    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Expression::Identifier(identifier) => Some(identifier),
            _ => None,
        }
    }
}

impl From<Identifier> for Expression {
    fn from(identifier: Identifier) -> Self {
        Expression::Identifier(identifier)
    }
}

impl From<Literal> for Expression {
    fn from(literal: Literal) -> Self {
        Expression::Literal(literal)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Number,
    Boolean,
    String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Literal {
    /// Serialized as `literal_kind`; `kind` is the variant tag of `Expression`.
    #[serde(rename = "literal_kind")]
    pub kind: LiteralKind,
    pub value: String,
    /// Opaque type tag; empty when untyped.
    #[serde(default)]
    pub type_name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TypedName {
    pub name: String,
    /// Opaque type tag; empty when untyped.
    #[serde(default)]
    pub type_name: String,
}

impl TypedName {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A builtin instruction applied to operand expressions, e.g. `add(x, 1)`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FunctionalInstruction {
    pub instruction: String,
    pub arguments: Vec<Expression>,
}

/// A call to a user-defined function of the module.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub function_name: Identifier,
    pub arguments: Vec<Expression>,
}
