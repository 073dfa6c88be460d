//! Terse constructors for building trees by hand (tests, fixtures).

use crate::ast::{
    Block, Case, Expression, ForLoop, FunctionCall, FunctionDefinition, FunctionalInstruction,
    Identifier, Literal, LiteralKind, Statement, TypedName, VariableDeclaration,
};

fn untyped(names: &[&str]) -> Vec<TypedName> {
    names.iter().map(|name| TypedName::new(*name, "")).collect()
}

pub fn block(statements: Vec<Statement>) -> Block {
    Block::new(statements)
}

/// A nested block used as a statement.
pub fn nested(statements: Vec<Statement>) -> Statement {
    Statement::Block(Block::new(statements))
}

pub fn ident(name: &str) -> Expression {
    Identifier::new(name).into()
}

pub fn number(value: &str) -> Expression {
    number_literal(value).into()
}

pub fn number_literal(value: &str) -> Literal {
    Literal {
        kind: LiteralKind::Number,
        value: value.to_string(),
        type_name: String::new(),
    }
}

pub fn call(name: &str, arguments: Vec<Expression>) -> Expression {
    Expression::FunctionCall(FunctionCall {
        function_name: Identifier::new(name),
        arguments,
    })
}

pub fn instr(instruction: &str, arguments: Vec<Expression>) -> Expression {
    Expression::FunctionalInstruction(FunctionalInstruction {
        instruction: instruction.to_string(),
        arguments,
    })
}

pub fn let_(names: &[&str], value: Option<Expression>) -> Statement {
    Statement::VariableDeclaration(VariableDeclaration {
        variables: untyped(names),
        value,
    })
}

pub fn let_typed(variables: &[(&str, &str)], value: Option<Expression>) -> Statement {
    Statement::VariableDeclaration(VariableDeclaration {
        variables: variables
            .iter()
            .map(|(name, ty)| TypedName::new(*name, *ty))
            .collect(),
        value,
    })
}

pub fn assign(names: &[&str], value: Expression) -> Statement {
    Statement::Assignment {
        variable_names: names.iter().map(|name| Identifier::new(*name)).collect(),
        value,
    }
}

pub fn expr_stmt(expression: Expression) -> Statement {
    Statement::ExpressionStatement { expression }
}

pub fn function(
    name: &str,
    parameters: &[&str],
    return_variables: &[&str],
    body: Vec<Statement>,
) -> Statement {
    Statement::FunctionDefinition(FunctionDefinition {
        name: name.to_string(),
        parameters: untyped(parameters),
        return_variables: untyped(return_variables),
        body: Block::new(body),
    })
}

pub fn typed_function(
    name: &str,
    parameters: &[(&str, &str)],
    return_variables: &[(&str, &str)],
    body: Vec<Statement>,
) -> Statement {
    let typed = |names: &[(&str, &str)]| {
        names
            .iter()
            .map(|(name, ty)| TypedName::new(*name, *ty))
            .collect()
    };
    Statement::FunctionDefinition(FunctionDefinition {
        name: name.to_string(),
        parameters: typed(parameters),
        return_variables: typed(return_variables),
        body: Block::new(body),
    })
}

pub fn if_(condition: Expression, body: Vec<Statement>) -> Statement {
    Statement::If {
        condition,
        body: Block::new(body),
    }
}

pub fn switch(expression: Expression, cases: Vec<Case>) -> Statement {
    Statement::Switch { expression, cases }
}

pub fn case(value: &str, body: Vec<Statement>) -> Case {
    Case {
        value: Some(number_literal(value)),
        body: Block::new(body),
    }
}

pub fn default_case(body: Vec<Statement>) -> Case {
    Case {
        value: None,
        body: Block::new(body),
    }
}

pub fn for_loop(
    pre: Vec<Statement>,
    condition: Expression,
    post: Vec<Statement>,
    body: Vec<Statement>,
) -> Statement {
    Statement::ForLoop(ForLoop {
        pre: Block::new(pre),
        condition,
        post: Block::new(post),
        body: Block::new(body),
    })
}
