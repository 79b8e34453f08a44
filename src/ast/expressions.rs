//! Expression nodes and the static priority table.
//!
//! Every variant has a fixed priority (binding strength, lower binds tighter).
//! The renderer parenthesizes an operand exactly when its priority is strictly
//! greater than the priority of the operator that encloses it. The Pratt
//! parser in `syntax::expressions` registers its levels in the same order.

use serde::Serialize;

use super::{Annotation, Block, ForEach, StatementBody, Type, TypeArgument, UserType};
use crate::either::Either;

pub mod priority {
    pub const PRIMARY: i32 = -1;
    pub const POSTFIX: i32 = 0;
    pub const PREFIX: i32 = 1;
    pub const PRODUCT: i32 = 2;
    pub const SUM: i32 = 3;
    pub const RANGE: i32 = 4;
    pub const ELVIS: i32 = 5;
    pub const NAMED_CHECK: i32 = 6;
    pub const CAST: i32 = 7;
    pub const SHIFT: i32 = 8;
    pub const BIT_AND: i32 = 9;
    pub const BIT_XOR: i32 = 10;
    pub const BIT_OR: i32 = 11;
    pub const SPACESHIP: i32 = 12;
    pub const COMPARISON: i32 = 13;
    pub const EQUALITY: i32 = 14;
    pub const CONJUNCTION: i32 = 15;
    pub const DISJUNCTION: i32 = 16;
    pub const TERNARY: i32 = 17;
    pub const SPREAD: i32 = 18;
    pub const ASSIGNMENT: i32 = 19;
    pub const LIST_COMPREHENSION: i32 = 20;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression {
    Literal(Literal),
    Identifier(String),
    ConstructorInvocation(ConstructorInvocation),
    Switch(SwitchExpression),
    When(WhenExpression),
    /// Parentheses written in the source.
    Parenthesized(Box<Expression>),
    Postfix {
        operand: Box<Expression>,
        operator: PostfixOperator,
    },
    Prefix {
        operator: PrefixOperator,
        operand: Box<Expression>,
    },
    Cast {
        operand: Box<Expression>,
        ty: Type,
        safe: bool,
    },
    Product(Binary<ProductOperator>),
    Sum(Binary<SumOperator>),
    Range(Binary<()>),
    Elvis(Binary<()>),
    NamedCheck(Binary<NamedCheckOperator>),
    Shift(Binary<ShiftOperator>),
    BitAnd(Binary<()>),
    BitXor(Binary<()>),
    BitOr(Binary<()>),
    Spaceship(Binary<()>),
    Comparison(Binary<ComparisonOperator>),
    Equality(Binary<EqualityOperator>),
    Conjunction(Binary<()>),
    Disjunction(Binary<()>),
    Ternary {
        condition: Box<Expression>,
        then: Box<Expression>,
        otherwise: Box<Expression>,
    },
    Spread(Box<Expression>),
    Assignment(AssignmentExpression),
    ListComprehension(ListComprehension),
}

/// Two operands joined by an operator of the variant's class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binary<O> {
    pub left: Box<Expression>,
    pub operator: O,
    pub right: Box<Expression>,
}

impl<O> Binary<O> {
    pub fn new(left: Expression, operator: O, right: Expression) -> Self {
        Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProductOperator {
    Times,
    Divide,
    Modulo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SumOperator {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShiftOperator {
    Left,
    Right,
    UnsignedRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NamedCheckOperator {
    In,
    NotIn,
    Is,
    NotIs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComparisonOperator {
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EqualityOperator {
    Equal,
    NotEqual,
    Identical,
    NotIdentical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrefixOperator {
    Plus,
    Minus,
    Increment,
    Decrement,
    Not,
    /// Bitwise complement, rendered as a runtime call.
    Complement,
    /// `::name`
    Reference,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PostfixOperator {
    Increment,
    Decrement,
    NotNull,
    Invocation(Invocation),
    Indexing(Vec<Expression>),
    Call(Call),
}

/// Arguments of a call site; trailing lambdas are already merged in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invocation {
    pub type_arguments: Vec<TypeArgument>,
    pub arguments: Vec<ValueArgument>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Call {
    pub kind: CallKind,
    pub member: Member,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CallKind {
    /// `?.`
    Safe,
    /// `.`
    Dot,
    /// `::`
    Reference,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Member {
    Name(String),
    /// `::class`
    Class,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueArgument {
    pub name: Option<String>,
    pub value: Expression,
}

impl ValueArgument {
    pub fn positional(value: Expression) -> Self {
        ValueArgument { name: None, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignmentOperator {
    Assign,
    Plus,
    Minus,
    Times,
    Divide,
    Modulo,
    And,
    Xor,
    Or,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    Coalesce,
}

impl AssignmentOperator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let operator = match symbol {
            "=" => AssignmentOperator::Assign,
            "+=" => AssignmentOperator::Plus,
            "-=" => AssignmentOperator::Minus,
            "*=" => AssignmentOperator::Times,
            "/=" => AssignmentOperator::Divide,
            "%=" => AssignmentOperator::Modulo,
            "&=" => AssignmentOperator::And,
            "^=" => AssignmentOperator::Xor,
            "|=" => AssignmentOperator::Or,
            "<<=" => AssignmentOperator::ShiftLeft,
            ">>=" => AssignmentOperator::ShiftRight,
            ">>>=" => AssignmentOperator::UnsignedShiftRight,
            "??=" => AssignmentOperator::Coalesce,
            _ => return None,
        };
        Some(operator)
    }

    /// The Kotlin assignment operator, when Kotlin has one.
    pub fn native(self) -> Option<&'static str> {
        match self {
            AssignmentOperator::Assign => Some("="),
            AssignmentOperator::Plus => Some("+="),
            AssignmentOperator::Minus => Some("-="),
            AssignmentOperator::Times => Some("*="),
            AssignmentOperator::Divide => Some("/="),
            AssignmentOperator::Modulo => Some("%="),
            _ => None,
        }
    }

    /// The binary operator a non-native assignment combines with.
    pub fn combining(self) -> &'static str {
        match self {
            AssignmentOperator::And => "and",
            AssignmentOperator::Xor => "xor",
            AssignmentOperator::Or => "or",
            AssignmentOperator::ShiftLeft => "shl",
            AssignmentOperator::ShiftRight => "shr",
            AssignmentOperator::UnsignedShiftRight => "ushr",
            AssignmentOperator::Coalesce => "?:",
            AssignmentOperator::Assign => "=",
            AssignmentOperator::Plus => "+",
            AssignmentOperator::Minus => "-",
            AssignmentOperator::Times => "*",
            AssignmentOperator::Divide => "/",
            AssignmentOperator::Modulo => "%",
        }
    }
}

/// An assignment used as a value, e.g. `while ((line = next()) != null)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentExpression {
    pub target: Box<Expression>,
    pub operator: AssignmentOperator,
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListComprehension {
    pub mapping: Box<Expression>,
    pub source: ForEach,
    pub condition: Option<Box<Expression>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    /// Quoted text, kept verbatim including the quotes.
    String(String),
    MultilineString(String),
    This,
    Super(Option<UserType>),
    Integer(String),
    Long(String),
    Real(String),
    Char(String),
    Boolean(bool),
    Null,
    Void,
    Lambda(Lambda),
    InitializerList(InitializerList),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lambda {
    pub parameters: Vec<LambdaParameter>,
    pub body: Either<Box<Expression>, LambdaBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LambdaParameter {
    pub annotations: Vec<Annotation>,
    /// `None` for `var` or an omitted type.
    pub ty: Option<Type>,
    /// `None` for `_`.
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LambdaBody {
    pub statements: Vec<super::Statement>,
    pub result: Option<Box<Expression>>,
}

impl LambdaBody {
    pub fn from_block(block: Block) -> Self {
        LambdaBody {
            statements: block.statements,
            result: None,
        }
    }
}

/// `{a, b}` or `{k: v}`, optionally typed by a `new T[]` prefix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitializerList {
    pub entries: Either<Vec<ValueArgument>, Vec<DictionaryEntry>>,
    /// Element type of the outermost array when written as `new T[]{...}`.
    pub element_type: Option<Type>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DictionaryEntry {
    pub key: Expression,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ConstructorInvocation {
    /// `new Foo(a, b)`, `new Foo{a, b}`, or a synthesized sized-array constructor.
    Constructor {
        ty: Type,
        arguments: Vec<ValueArgument>,
    },
    /// `new int[]{1, 2}`
    Array(InitializerList),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchExpression {
    pub subject: Box<Expression>,
    pub branches: Vec<SwitchBranch>,
    pub default: Option<Box<StatementBody>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchBranch {
    pub conditions: Vec<SwitchCondition>,
    pub body: StatementBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchCondition {
    pub kind: ConditionKind,
    pub value: Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConditionKind {
    Case,
    In { negated: bool },
    Is { negated: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhenExpression {
    pub branches: Vec<WhenBranch>,
    pub default: Option<Box<StatementBody>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhenBranch {
    pub conditions: Vec<Expression>,
    pub body: StatementBody,
}

impl Expression {
    pub fn priority(&self) -> i32 {
        use priority::*;
        match self {
            Expression::Literal(_)
            | Expression::Identifier(_)
            | Expression::ConstructorInvocation(_)
            | Expression::Switch(_)
            | Expression::When(_)
            | Expression::Parenthesized(_) => PRIMARY,
            Expression::Postfix { .. } => POSTFIX,
            Expression::Prefix { .. } => PREFIX,
            Expression::Product(_) => PRODUCT,
            Expression::Sum(_) => SUM,
            Expression::Range(_) => RANGE,
            Expression::Elvis(_) => ELVIS,
            Expression::NamedCheck(_) => NAMED_CHECK,
            Expression::Cast { .. } => CAST,
            Expression::Shift(_) => SHIFT,
            Expression::BitAnd(_) => BIT_AND,
            Expression::BitXor(_) => BIT_XOR,
            Expression::BitOr(_) => BIT_OR,
            Expression::Spaceship(_) => SPACESHIP,
            Expression::Comparison(_) => COMPARISON,
            Expression::Equality(_) => EQUALITY,
            Expression::Conjunction(_) => CONJUNCTION,
            Expression::Disjunction(_) => DISJUNCTION,
            Expression::Ternary { .. } => TERNARY,
            Expression::Spread(_) => SPREAD,
            Expression::Assignment(_) => ASSIGNMENT,
            Expression::ListComprehension(_) => LIST_COMPREHENSION,
        }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier(name.into())
    }

    pub fn integer(text: impl Into<String>) -> Self {
        Expression::Literal(Literal::Integer(text.into()))
    }

    /// `operand(arguments)`
    pub fn invoke(operand: Expression, arguments: Vec<ValueArgument>) -> Self {
        Expression::Postfix {
            operand: Box::new(operand),
            operator: PostfixOperator::Invocation(Invocation {
                type_arguments: vec![],
                arguments,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priorities_form_a_strict_order() {
        use priority::*;
        let table = [
            PRIMARY,
            POSTFIX,
            PREFIX,
            PRODUCT,
            SUM,
            RANGE,
            ELVIS,
            NAMED_CHECK,
            CAST,
            SHIFT,
            BIT_AND,
            BIT_XOR,
            BIT_OR,
            SPACESHIP,
            COMPARISON,
            EQUALITY,
            CONJUNCTION,
            DISJUNCTION,
            TERNARY,
            SPREAD,
            ASSIGNMENT,
            LIST_COMPREHENSION,
        ];
        assert!(table.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn priority_is_fixed_per_variant() {
        let a = Expression::identifier("a");
        let b = Expression::identifier("b");
        let sum = Expression::Sum(Binary::new(a.clone(), SumOperator::Minus, b.clone()));
        let product = Expression::Product(Binary::new(a, ProductOperator::Modulo, b));
        assert_eq!(sum.priority(), priority::SUM);
        assert_eq!(product.priority(), priority::PRODUCT);
    }

    #[test]
    fn only_arithmetic_assignments_are_native() {
        assert_eq!(AssignmentOperator::Plus.native(), Some("+="));
        assert_eq!(AssignmentOperator::Or.native(), None);
        assert_eq!(AssignmentOperator::Or.combining(), "or");
        assert_eq!(AssignmentOperator::Coalesce.combining(), "?:");
        assert_eq!(AssignmentOperator::from_symbol(">>>="), Some(AssignmentOperator::UnsignedShiftRight));
    }
}
