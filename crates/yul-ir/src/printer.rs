//! Debug rendering of the IR in a Yul-like surface form.
//!
//! This is for logs and test expectations only; there is no parser that reads
//! it back.

use std::fmt::{self, Display, Write};

use crate::ast::{Block, Expression, Literal, LiteralKind, Statement, TypedName};

const INDENT: &str = "    ";

struct Printer<'a, 'f> {
    out: &'a mut fmt::Formatter<'f>,
    depth: usize,
}

impl Printer<'_, '_> {
    fn indent(&mut self) -> fmt::Result {
        for _ in 0..self.depth {
            self.out.write_str(INDENT)?;
        }
        Ok(())
    }

    fn block(&mut self, block: &Block) -> fmt::Result {
        if block.is_empty() {
            return self.out.write_str("{ }");
        }
        self.out.write_str("{\n")?;
        self.depth += 1;
        for statement in &block.statements {
            self.indent()?;
            self.statement(statement)?;
            self.out.write_char('\n')?;
        }
        self.depth -= 1;
        self.indent()?;
        self.out.write_char('}')
    }

    fn statement(&mut self, statement: &Statement) -> fmt::Result {
        match statement {
            Statement::ExpressionStatement { expression } => write!(self.out, "{expression}"),
            Statement::Assignment {
                variable_names,
                value,
            } => {
                let names: Vec<&str> = variable_names.iter().map(|id| id.name.as_str()).collect();
                write!(self.out, "{} := {value}", names.join(", "))
            }
            Statement::VariableDeclaration(decl) => {
                write!(self.out, "let {}", TypedNames(&decl.variables))?;
                match &decl.value {
                    Some(value) => write!(self.out, " := {value}"),
                    None => Ok(()),
                }
            }
            Statement::FunctionDefinition(fun) => {
                write!(self.out, "function {}({})", fun.name, TypedNames(&fun.parameters))?;
                if !fun.return_variables.is_empty() {
                    write!(self.out, " -> {}", TypedNames(&fun.return_variables))?;
                }
                self.out.write_char(' ')?;
                self.block(&fun.body)
            }
            Statement::If { condition, body } => {
                write!(self.out, "if {condition} ")?;
                self.block(body)
            }
            Statement::Switch { expression, cases } => {
                write!(self.out, "switch {expression}")?;
                for case in cases {
                    self.out.write_char('\n')?;
                    self.indent()?;
                    match &case.value {
                        Some(value) => write!(self.out, "case {value} ")?,
                        None => self.out.write_str("default ")?,
                    }
                    self.block(&case.body)?;
                }
                Ok(())
            }
            Statement::ForLoop(for_loop) => {
                self.out.write_str("for ")?;
                self.block(&for_loop.pre)?;
                write!(self.out, " {} ", for_loop.condition)?;
                self.block(&for_loop.post)?;
                self.out.write_char(' ')?;
                self.block(&for_loop.body)
            }
            Statement::Block(block) => self.block(block),
        }
    }
}

struct TypedNames<'a>(&'a [TypedName]);

impl Display for TypedNames<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, typed) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&typed.name)?;
            if !typed.type_name.is_empty() {
                write!(f, ":{}", typed.type_name)?;
            }
        }
        Ok(())
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer { out: f, depth: 0 }.block(self)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer { out: f, depth: 0 }.statement(self)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LiteralKind::String => write!(f, "\"{}\"", self.value.escape_default())?,
            LiteralKind::Number | LiteralKind::Boolean => f.write_str(&self.value)?,
        }
        if !self.type_name.is_empty() {
            write!(f, ":{}", self.type_name)?;
        }
        Ok(())
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (callee, arguments) = match self {
            Expression::Literal(literal) => return write!(f, "{literal}"),
            Expression::Identifier(id) => return f.write_str(&id.name),
            Expression::FunctionalInstruction(instr) => (&instr.instruction, &instr.arguments),
            Expression::FunctionCall(call) => (&call.function_name.name, &call.arguments),
        };
        write!(f, "{callee}(")?;
        for (i, arg) in arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_char(')')
    }
}
