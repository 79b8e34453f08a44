//! Statement nodes.

use serde::Serialize;

use super::{AssignmentOperator, Declaration, Expression, Type};
use crate::either::Either;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    Labeled {
        label: String,
        statement: Box<Statement>,
    },
    Assignment(Assignment),
    If(IfStatement),
    For(ForStatement),
    While(WhileStatement),
    Jump(Jump),
    Block(Block),
    Declaration(Declaration),
    Expression(Expression),
}

/// The body of a control-flow construct or switch branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StatementBody {
    Block(Block),
    Statement(Box<Statement>),
    /// A lone `;`.
    Pass,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Block {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub target: Expression,
    pub operator: AssignmentOperator,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfStatement {
    pub condition: Expression,
    pub then: Box<StatementBody>,
    pub otherwise: Option<Box<StatementBody>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForStatement {
    pub header: Either<ClassicFor, ForEach>,
    pub body: Box<StatementBody>,
}

/// `for (int i = 0; i < n; i++)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassicFor {
    pub variables: Vec<ForVariable>,
    pub conditions: Vec<Expression>,
    pub updates: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForVariable {
    pub ty: Option<Type>,
    pub name: String,
    pub value: Expression,
}

/// `T x in source`, shared by for-each loops and comprehensions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForEach {
    pub ty: Option<Type>,
    pub name: String,
    pub iterable: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhileStatement {
    pub do_while: bool,
    pub condition: Expression,
    pub body: Box<StatementBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Jump {
    Break(Option<String>),
    Continue(Option<String>),
    Throw(Expression),
    Return {
        label: Option<String>,
        value: Option<Expression>,
    },
}
