//! Statements, blocks and loop desugaring.

use std::fmt;

use super::expressions::LoopVariable;
use super::wrap;
use crate::ast::priority::{CONJUNCTION, POSTFIX};
use crate::ast::{
    Assignment, Block, ClassicFor, Expression, ForStatement, IfStatement, Jump, Statement, StatementBody,
    WhileStatement,
};
use crate::either::Either;

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Labeled { label, statement } => write!(f, "{}@ {}", label, statement),
            Statement::Assignment(assignment) => assignment.fmt(f),
            Statement::If(statement) => statement.fmt(f),
            Statement::For(statement) => statement.fmt(f),
            Statement::While(statement) => statement.fmt(f),
            Statement::Jump(jump) => jump.fmt(f),
            Statement::Block(block) => block.fmt(f),
            Statement::Declaration(declaration) => declaration.fmt(f),
            Statement::Expression(expression) => expression.fmt(f),
        }
    }
}

impl fmt::Display for StatementBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementBody::Block(block) => block.fmt(f),
            StatementBody::Statement(statement) => statement.fmt(f),
            StatementBody::Pass => write!(f, "{{}}"),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.statements.is_empty() {
            return write!(f, "{{}}");
        }
        writeln!(f, "{{")?;
        for statement in &self.statements {
            writeln!(f, "{}", statement)?;
        }
        write!(f, "}}")
    }
}

/// Compound operators without a Kotlin counterpart are spelled out as
/// `l = l op r`.
impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator.native() {
            Some(native) => write!(f, "{} {} {}", self.target, native, self.value),
            None => write!(
                f,
                "{} = {} {} {}",
                self.target,
                self.target,
                self.operator.combining(),
                wrap(&self.value, POSTFIX)
            ),
        }
    }
}

impl fmt::Display for IfStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "if ({}) {}", self.condition, self.then)?;
        if let Some(otherwise) = &self.otherwise {
            write!(f, " else {}", otherwise)?;
        }
        Ok(())
    }
}

impl fmt::Display for ForStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.header {
            Either::B(each) => write!(f, "for ({} in {}) {}", LoopVariable(each), each.iterable, self.body),
            Either::A(classic) => classic_for(f, classic, &self.body),
        }
    }
}

/// `run { vars; while (conditions) { body; updates } }`
fn classic_for(f: &mut fmt::Formatter<'_>, header: &ClassicFor, body: &StatementBody) -> fmt::Result {
    writeln!(f, "run {{")?;
    for variable in &header.variables {
        write!(f, "var {}", variable.name)?;
        if let Some(ty) = &variable.ty {
            write!(f, ": {}", ty)?;
        }
        writeln!(f, " = {}", variable.value)?;
    }
    writeln!(f, "while ({}) {{", Conditions(&header.conditions))?;
    match body {
        StatementBody::Block(block) => {
            for statement in &block.statements {
                writeln!(f, "{}", statement)?;
            }
        }
        StatementBody::Statement(statement) => writeln!(f, "{}", statement)?,
        StatementBody::Pass => {}
    }
    for update in &header.updates {
        writeln!(f, "{}", update)?;
    }
    writeln!(f, "}}")?;
    write!(f, "}}")
}

/// Loop conditions joined with `&&`; none at all means `true`.
struct Conditions<'a>(&'a [Expression]);

impl fmt::Display for Conditions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "true");
        }
        let mut first = true;
        for condition in self.0 {
            if !first {
                write!(f, " && ")?;
            }
            first = false;
            write!(f, "{}", wrap(condition, CONJUNCTION))?;
        }
        Ok(())
    }
}

impl fmt::Display for WhileStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.do_while {
            write!(f, "do {} while ({})", self.body, self.condition)
        } else {
            write!(f, "while ({}) {}", self.condition, self.body)
        }
    }
}

impl fmt::Display for Jump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (keyword, label) = match self {
            Jump::Throw(value) => return write!(f, "throw {}", value),
            Jump::Break(label) => ("break", label),
            Jump::Continue(label) => ("continue", label),
            Jump::Return { label, .. } => ("return", label),
        };
        write!(f, "{}", keyword)?;
        if let Some(label) = label {
            write!(f, "@{}", label)?;
        }
        if let Jump::Return { value: Some(value), .. } = self {
            write!(f, " {}", value)?;
        }
        Ok(())
    }
}
