//! Expressions, literals and their desugarings.

use std::fmt;

use super::{wrap, Join};
use crate::ast::priority::*;
use crate::ast::*;
use crate::either::Either;

/// Identifier bound by desugared assignment expressions.
const ASSIGNED_VALUE: &str = "`av-`";

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(literal) => literal.fmt(f),
            Expression::Identifier(name) => write!(f, "{}", name),
            Expression::ConstructorInvocation(invocation) => invocation.fmt(f),
            Expression::Switch(switch) => switch.fmt(f),
            Expression::When(when) => when.fmt(f),
            Expression::Parenthesized(inner) => write!(f, "({})", inner),
            Expression::Postfix { operand, operator } => write!(f, "{}{}", wrap(operand, POSTFIX), operator),
            Expression::Prefix { operator, operand } => prefix(f, *operator, operand),
            Expression::Cast { operand, ty, safe } => {
                write!(f, "{} as{} {}", wrap(operand, PREFIX), if *safe { "?" } else { "" }, ty)
            }
            Expression::Product(binary) => infix(f, binary, PRODUCT, |op| match op {
                ProductOperator::Times => "*",
                ProductOperator::Divide => "/",
                ProductOperator::Modulo => "%",
            }),
            Expression::Sum(binary) => infix(f, binary, SUM, |op| match op {
                SumOperator::Plus => "+",
                SumOperator::Minus => "-",
            }),
            Expression::Range(binary) => write!(f, "{}..{}", wrap(&binary.left, RANGE), wrap(&binary.right, RANGE)),
            Expression::Elvis(binary) => infix(f, binary, ELVIS, |_| "?:"),
            Expression::NamedCheck(binary) => infix(f, binary, NAMED_CHECK, |op| match op {
                NamedCheckOperator::In => "in",
                NamedCheckOperator::NotIn => "!in",
                NamedCheckOperator::Is => "is",
                NamedCheckOperator::NotIs => "!is",
            }),
            Expression::Shift(binary) => infix(f, binary, SHIFT, |op| match op {
                ShiftOperator::Left => "shl",
                ShiftOperator::Right => "shr",
                ShiftOperator::UnsignedRight => "ushr",
            }),
            Expression::BitAnd(binary) => infix(f, binary, BIT_AND, |_| "and"),
            Expression::BitXor(binary) => infix(f, binary, BIT_XOR, |_| "xor"),
            Expression::BitOr(binary) => infix(f, binary, BIT_OR, |_| "or"),
            Expression::Spaceship(binary) => {
                write!(f, "{}.compareTo({})", wrap(&binary.left, POSTFIX), binary.right)
            }
            Expression::Comparison(binary) => infix(f, binary, COMPARISON, |op| match op {
                ComparisonOperator::Less => "<",
                ComparisonOperator::LessEqual => "<=",
                ComparisonOperator::Greater => ">",
                ComparisonOperator::GreaterEqual => ">=",
            }),
            Expression::Equality(binary) => infix(f, binary, EQUALITY, |op| match op {
                EqualityOperator::Equal => "==",
                EqualityOperator::NotEqual => "!=",
                EqualityOperator::Identical => "===",
                EqualityOperator::NotIdentical => "!==",
            }),
            Expression::Conjunction(binary) => infix(f, binary, CONJUNCTION, |_| "&&"),
            Expression::Disjunction(binary) => infix(f, binary, DISJUNCTION, |_| "||"),
            Expression::Ternary {
                condition,
                then,
                otherwise,
            } => write!(
                f,
                "if ({}) {} else {}",
                condition,
                wrap(then, TERNARY),
                wrap(otherwise, TERNARY)
            ),
            Expression::Spread(operand) => write!(f, "*{}", wrap(operand, SPREAD)),
            Expression::Assignment(assignment) => assignment.fmt(f),
            Expression::ListComprehension(comprehension) => comprehension.fmt(f),
        }
    }
}

fn infix<O: Copy>(
    f: &mut fmt::Formatter<'_>,
    binary: &Binary<O>,
    priority: i32,
    symbol: impl Fn(O) -> &'static str,
) -> fmt::Result {
    write!(
        f,
        "{} {} {}",
        wrap(&binary.left, priority),
        symbol(binary.operator),
        wrap(&binary.right, priority)
    )
}

fn prefix(f: &mut fmt::Formatter<'_>, operator: PrefixOperator, operand: &Expression) -> fmt::Result {
    let symbol = match operator {
        PrefixOperator::Complement => return write!(f, "quova.internal.bitComplement({})", operand),
        PrefixOperator::Reference => return write!(f, "::{}", wrap(operand, PREFIX)),
        PrefixOperator::Plus => "+",
        PrefixOperator::Minus => "-",
        PrefixOperator::Increment => "++",
        PrefixOperator::Decrement => "--",
        PrefixOperator::Not => "!",
    };
    // `- -x` must not print as `--x`.
    if matches!(operand, Expression::Prefix { .. }) && matches!(operator, PrefixOperator::Plus | PrefixOperator::Minus) {
        return write!(f, "{}({})", symbol, operand);
    }
    write!(f, "{}{}", symbol, wrap(operand, PREFIX))
}

impl fmt::Display for AssignmentExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator.native() {
            Some(native) => write!(
                f,
                "{}.also {{ {av} -> {} {} {av} }}",
                wrap(&self.value, POSTFIX),
                self.target,
                native,
                av = ASSIGNED_VALUE
            ),
            None => write!(
                f,
                "({} {} {}).also {{ {av} -> {} = {av} }}",
                self.target,
                self.operator.combining(),
                wrap(&self.value, POSTFIX),
                self.target,
                av = ASSIGNED_VALUE
            ),
        }
    }
}

impl fmt::Display for ListComprehension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variable = LoopVariable(&self.source);
        write!(f, "{}", wrap(&self.source.iterable, POSTFIX))?;
        if let Some(condition) = &self.condition {
            write!(f, ".filter {{ {} -> {} }}", variable, condition)?;
        }
        write!(f, ".map {{ {} -> {} }}", variable, self.mapping)
    }
}

/// `name` or `name: T`.
pub(crate) struct LoopVariable<'a>(pub &'a ForEach);

impl fmt::Display for LoopVariable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.name)?;
        if let Some(ty) = &self.0.ty {
            write!(f, ": {}", ty)?;
        }
        Ok(())
    }
}

impl fmt::Display for PostfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostfixOperator::Increment => write!(f, "++"),
            PostfixOperator::Decrement => write!(f, "--"),
            PostfixOperator::NotNull => write!(f, "!!"),
            PostfixOperator::Invocation(invocation) => {
                if !invocation.type_arguments.is_empty() {
                    write!(f, "<{}>", Join(&invocation.type_arguments, ", "))?;
                }
                write!(f, "{}", Arguments(&invocation.arguments))
            }
            PostfixOperator::Indexing(indices) => write!(f, "[{}]", Join(indices, ", ")),
            PostfixOperator::Call(call) => {
                match call.kind {
                    CallKind::Safe => write!(f, "?.")?,
                    CallKind::Dot => write!(f, ".")?,
                    CallKind::Reference => write!(f, "::")?,
                }
                match &call.member {
                    Member::Name(name) => write!(f, "{}", name),
                    Member::Class => write!(f, "class"),
                }
            }
        }
    }
}

/// A call-site argument list. A final positional lambda moves outside the
/// parentheses, which disappear when nothing else is left inside.
pub(crate) struct Arguments<'a>(pub &'a [ValueArgument]);

impl fmt::Display for Arguments<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.split_last() {
            Some((
                ValueArgument {
                    name: None,
                    value: Expression::Literal(Literal::Lambda(lambda)),
                },
                rest,
            )) => {
                if !rest.is_empty() {
                    write!(f, "({})", Join(rest, ", "))?;
                }
                write!(f, " {}", lambda)
            }
            _ => write!(f, "({})", Join(self.0, ", ")),
        }
    }
}

impl fmt::Display for ValueArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{} = ", name)?;
        }
        self.value.fmt(f)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(text)
            | Literal::MultilineString(text)
            | Literal::Integer(text)
            | Literal::Long(text)
            | Literal::Real(text)
            | Literal::Char(text) => write!(f, "{}", text),
            Literal::This => write!(f, "this"),
            Literal::Super(None) => write!(f, "super"),
            Literal::Super(Some(ty)) => write!(f, "super<{}>", ty),
            Literal::Boolean(value) => write!(f, "{}", value),
            Literal::Null => write!(f, "null"),
            Literal::Void => write!(f, "Unit"),
            Literal::Lambda(lambda) => lambda.fmt(f),
            Literal::InitializerList(list) => list.fmt(f),
        }
    }
}

impl fmt::Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        if !self.parameters.is_empty() {
            write!(f, " {} ->", Join(&self.parameters, ", "))?;
        }
        match &self.body {
            Either::A(expression) => write!(f, " {} }}", expression),
            Either::B(body) => {
                writeln!(f)?;
                for statement in &body.statements {
                    writeln!(f, "{}", statement)?;
                }
                if let Some(result) = &body.result {
                    writeln!(f, "{}", result)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl fmt::Display for LambdaParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for annotation in &self.annotations {
            write!(f, "{} ", annotation)?;
        }
        write!(f, "{}", self.name.as_deref().unwrap_or("_"))?;
        if let Some(ty) = &self.ty {
            write!(f, ": {}", ty)?;
        }
        Ok(())
    }
}

impl fmt::Display for InitializerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elements = match &self.entries {
            Either::B(entries) => {
                write!(f, "hashMapOf(")?;
                let mut first = true;
                for entry in entries {
                    if !first {
                        write!(f, ", ")?;
                    }
                    first = false;
                    write!(f, "{} to {}", entry.key, entry.value)?;
                }
                return write!(f, ")");
            }
            Either::A(elements) => elements,
        };
        match &self.element_type {
            None => write!(f, "quova.internal.fittingArray({})", Join(elements, ", ")),
            Some(Type {
                inner: Either::A(TypeReference::Primitive(primitive)),
                array_dimensions: 0,
                nullable: false,
            }) if !primitive.array => write!(
                f,
                "{}ArrayOf({})",
                primitive.kind.kotlin_name().to_lowercase(),
                Join(elements, ", ")
            ),
            Some(ty) => write!(f, "arrayOf<{}>({})", ty, Join(elements, ", ")),
        }
    }
}

impl fmt::Display for ConstructorInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructorInvocation::Constructor { ty, arguments } => write!(f, "{}{}", ty, Arguments(arguments)),
            ConstructorInvocation::Array(list) => list.fmt(f),
        }
    }
}

impl fmt::Display for SwitchExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "when ({}) {{", self.subject)?;
        for branch in &self.branches {
            writeln!(f, "{} -> {}", Join(&branch.conditions, ", "), branch.body)?;
        }
        if let Some(default) = &self.default {
            writeln!(f, "else -> {}", default)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for SwitchCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let negation = |negated: bool| if negated { "!" } else { "" };
        match self.kind {
            ConditionKind::Case => write!(f, "{}", self.value),
            ConditionKind::In { negated } => write!(f, "{}in {}", negation(negated), self.value),
            ConditionKind::Is { negated } => write!(f, "{}is {}", negation(negated), self.value),
        }
    }
}

impl fmt::Display for WhenExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "when {{")?;
        for branch in &self.branches {
            writeln!(f, "{} -> {}", Join(&branch.conditions, ", "), branch.body)?;
        }
        if let Some(default) = &self.default {
            writeln!(f, "else -> {}", default)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn id(name: &str) -> Expression {
        Expression::identifier(name)
    }

    fn call(name: &str, argument: Expression) -> Expression {
        Expression::invoke(id(name), vec![ValueArgument::positional(argument)])
    }

    #[test]
    fn looser_operands_are_parenthesized() {
        let sum = Expression::Sum(Binary::new(id("a"), SumOperator::Plus, id("b")));
        let product = Expression::Product(Binary::new(sum.clone(), ProductOperator::Times, id("c")));
        assert_eq!(product.to_string(), "(a + b) * c");

        let tighter = Expression::Sum(Binary::new(
            id("a"),
            SumOperator::Plus,
            Expression::Product(Binary::new(id("b"), ProductOperator::Times, id("c"))),
        ));
        assert_eq!(tighter.to_string(), "a + b * c");
    }

    #[test]
    fn equal_priority_is_not_parenthesized() {
        let nested = Expression::Sum(Binary::new(
            Expression::Sum(Binary::new(id("a"), SumOperator::Minus, id("b"))),
            SumOperator::Minus,
            id("c"),
        ));
        assert_eq!(nested.to_string(), "a - b - c");
    }

    #[test]
    fn source_parentheses_are_kept() {
        let grouped = Expression::Sum(Binary::new(
            id("a"),
            SumOperator::Minus,
            Expression::Parenthesized(Box::new(Expression::Sum(Binary::new(
                id("b"),
                SumOperator::Minus,
                id("c"),
            )))),
        ));
        assert_eq!(grouped.priority(), priority::SUM);
        assert_eq!(grouped.to_string(), "a - (b - c)");
    }

    #[test]
    fn cast_operands_bind_like_prefix_operands() {
        let cast = Expression::Cast {
            operand: Box::new(Expression::Sum(Binary::new(id("a"), SumOperator::Plus, id("b")))),
            ty: Type::primitive(PrimitiveKind::Long, false),
            safe: false,
        };
        assert_eq!(cast.to_string(), "(a + b) as Long");

        let negated = Expression::Cast {
            operand: Box::new(Expression::Prefix {
                operator: PrefixOperator::Minus,
                operand: Box::new(id("x")),
            }),
            ty: Type::primitive(PrimitiveKind::Long, false),
            safe: true,
        };
        assert_eq!(negated.to_string(), "-x as? Long");
    }

    #[test]
    fn bitwise_operators_become_named_infix_calls() {
        let flags = Expression::BitOr(Binary::new(
            Expression::Shift(Binary::new(Expression::integer("1"), ShiftOperator::Left, id("n"))),
            (),
            Expression::Parenthesized(Box::new(Expression::BitAnd(Binary::new(id("mask"), (), id("m"))))),
        ));
        assert_eq!(flags.to_string(), "1 shl n or (mask and m)");
    }

    #[test]
    fn comprehension_becomes_filter_then_map() {
        let comprehension = Expression::ListComprehension(ListComprehension {
            mapping: Box::new(call("f", id("x"))),
            source: ForEach {
                ty: None,
                name: "x".into(),
                iterable: Box::new(id("list")),
            },
            condition: Some(Box::new(call("p", id("x")))),
        });
        assert_eq!(comprehension.to_string(), "list.filter { x -> p(x) }.map { x -> f(x) }");
    }

    #[test]
    fn assignment_expressions_use_also() {
        let native = Expression::Assignment(AssignmentExpression {
            target: Box::new(id("line")),
            operator: AssignmentOperator::Assign,
            value: Box::new(call("next", Expression::Literal(Literal::Void))),
        });
        assert_eq!(native.to_string(), "next(Unit).also { `av-` -> line = `av-` }");

        let combined = Expression::Assignment(AssignmentExpression {
            target: Box::new(id("a")),
            operator: AssignmentOperator::Xor,
            value: Box::new(Expression::Sum(Binary::new(id("b"), SumOperator::Plus, id("c")))),
        });
        assert_eq!(combined.to_string(), "(a xor (b + c)).also { `av-` -> a = `av-` }");
    }

    #[test]
    fn trailing_lambda_leaves_the_parentheses() {
        let lambda = Expression::Literal(Literal::Lambda(Lambda {
            parameters: vec![LambdaParameter {
                annotations: vec![],
                ty: None,
                name: Some("it".into()),
            }],
            body: Either::A(Box::new(id("it"))),
        }));
        let only = Expression::invoke(id("run"), vec![ValueArgument::positional(lambda.clone())]);
        assert_eq!(only.to_string(), "run { it -> it }");

        let mixed = Expression::invoke(
            id("fold"),
            vec![
                ValueArgument::positional(Expression::integer("0")),
                ValueArgument::positional(lambda),
            ],
        );
        assert_eq!(mixed.to_string(), "fold(0) { it -> it }");
    }

    #[test]
    fn spaceship_and_ternary_desugar() {
        let compare = Expression::Spaceship(Binary::new(
            Expression::Sum(Binary::new(id("a"), SumOperator::Plus, id("b"))),
            (),
            id("c"),
        ));
        assert_eq!(compare.to_string(), "(a + b).compareTo(c)");

        let ternary = Expression::Ternary {
            condition: Box::new(id("c")),
            then: Box::new(id("a")),
            otherwise: Box::new(id("b")),
        };
        assert_eq!(ternary.to_string(), "if (c) a else b");
    }

    #[test]
    fn complement_calls_the_runtime() {
        let complement = Expression::Prefix {
            operator: PrefixOperator::Complement,
            operand: Box::new(id("x")),
        };
        assert_eq!(complement.to_string(), "quova.internal.bitComplement(x)");
        let negated = Expression::Prefix {
            operator: PrefixOperator::Minus,
            operand: Box::new(Expression::Prefix {
                operator: PrefixOperator::Minus,
                operand: Box::new(id("x")),
            }),
        };
        assert_eq!(negated.to_string(), "-(-x)");
    }

    #[test]
    fn initializer_lists_pick_an_array_factory() {
        let elements = Either::A(vec![
            ValueArgument::positional(Expression::integer("1")),
            ValueArgument::positional(Expression::integer("2")),
        ]);
        let untyped = InitializerList {
            entries: elements.clone(),
            element_type: None,
        };
        assert_eq!(untyped.to_string(), "quova.internal.fittingArray(1, 2)");
        let bytes = InitializerList {
            entries: elements.clone(),
            element_type: Some(Type::primitive(PrimitiveKind::Byte, false)),
        };
        assert_eq!(bytes.to_string(), "ubyteArrayOf(1, 2)");
        let rows = InitializerList {
            entries: elements,
            element_type: Some(Type::primitive(PrimitiveKind::Int, true)),
        };
        assert_eq!(rows.to_string(), "arrayOf<IntArray>(1, 2)");
        let map = InitializerList {
            entries: Either::B(vec![DictionaryEntry {
                key: id("k"),
                value: id("v"),
            }]),
            element_type: None,
        };
        assert_eq!(map.to_string(), "hashMapOf(k to v)");
    }

    #[test]
    fn switch_renders_as_when_with_subject() {
        let switch = Expression::Switch(SwitchExpression {
            subject: Box::new(id("x")),
            branches: vec![SwitchBranch {
                conditions: vec![
                    SwitchCondition {
                        kind: ConditionKind::Case,
                        value: Expression::integer("1"),
                    },
                    SwitchCondition {
                        kind: ConditionKind::In { negated: true },
                        value: id("range"),
                    },
                    SwitchCondition {
                        kind: ConditionKind::Is { negated: false },
                        value: id("String"),
                    },
                ],
                body: StatementBody::Statement(Box::new(Statement::Expression(call("f", id("x"))))),
            }],
            default: Some(Box::new(StatementBody::Pass)),
        });
        assert_eq!(switch.to_string(), "when (x) {\n1, !in range, is String -> f(x)\nelse -> {}\n}");
    }
}
