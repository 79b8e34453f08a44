//! Expression productions.
//!
//! `operator_expression` arrives as a flat sequence of prefix operators,
//! primaries, postfix operators and infix operators. [`PRATT`] folds it into
//! a tree; its levels are registered loosest first and mirror the priority
//! table in [`crate::ast::priority`].

use once_cell::sync::Lazy;
use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};

use super::parser::Rule;
use super::visitor::{child, children, has, Result, Visitor};
use crate::ast::*;
use crate::either::Either;

static PRATT: Lazy<PrattParser<Rule>> = Lazy::new(|| {
    PrattParser::new()
        .op(Op::infix(Rule::assignment_operator, Assoc::Right))
        .op(Op::prefix(Rule::spread_operator))
        .op(Op::infix(Rule::ternary_operator, Assoc::Right))
        .op(Op::infix(Rule::disjunction_operator, Assoc::Left))
        .op(Op::infix(Rule::conjunction_operator, Assoc::Left))
        .op(Op::infix(Rule::equality_operator, Assoc::Left))
        .op(Op::infix(Rule::comparison_operator, Assoc::Left))
        .op(Op::infix(Rule::spaceship_operator, Assoc::Left))
        .op(Op::infix(Rule::bit_or_operator, Assoc::Left))
        .op(Op::infix(Rule::bit_xor_operator, Assoc::Left))
        .op(Op::infix(Rule::bit_and_operator, Assoc::Left))
        .op(Op::infix(Rule::shift_operator, Assoc::Left))
        .op(Op::postfix(Rule::cast_operator))
        .op(Op::infix(Rule::named_check_operator, Assoc::Left))
        .op(Op::infix(Rule::elvis_operator, Assoc::Left))
        .op(Op::infix(Rule::range_operator, Assoc::Left))
        .op(Op::infix(Rule::sum_operator, Assoc::Left))
        .op(Op::infix(Rule::product_operator, Assoc::Left))
        .op(Op::prefix(Rule::prefix_operator))
        .op(Op::postfix(Rule::postfix_operator))
});

fn boxed(expression: Expression) -> Box<Expression> {
    Box::new(expression)
}

/// `{ body }` with no parameters.
fn thunk(body: Expression) -> Expression {
    Expression::Literal(Literal::Lambda(Lambda {
        parameters: vec![],
        body: Either::A(boxed(body)),
    }))
}

/// Nested `Array(n) { ... }` constructors for `new T[a][b]...`, innermost level first.
fn sized_array(element: TypeReference, mut sizes: Vec<Expression>) -> Option<ConstructorInvocation> {
    let innermost = sizes.pop()?;
    let (mut ty, mut invocation) = match element {
        TypeReference::Primitive(primitive) => {
            let ty = Type::primitive(primitive.kind, true);
            let invocation = ConstructorInvocation::Constructor {
                ty: ty.clone(),
                arguments: vec![ValueArgument::positional(innermost)],
            };
            (ty, invocation)
        }
        TypeReference::User(user) => {
            let element = Type::reference(TypeReference::User(user)).nullable();
            let ty = Type::user("Array", vec![TypeArgument::of(element)]);
            let invocation = ConstructorInvocation::Constructor {
                ty: ty.clone(),
                arguments: vec![
                    ValueArgument::positional(innermost),
                    ValueArgument::positional(thunk(Expression::Literal(Literal::Null))),
                ],
            };
            (ty, invocation)
        }
    };
    for size in sizes.into_iter().rev() {
        let outer = Type::user("Array", vec![TypeArgument::of(ty)]);
        invocation = ConstructorInvocation::Constructor {
            ty: outer.clone(),
            arguments: vec![
                ValueArgument::positional(size),
                ValueArgument::positional(thunk(Expression::ConstructorInvocation(invocation))),
            ],
        };
        ty = outer;
    }
    Some(invocation)
}

/// Element type of the outermost array in `new T[]...[]{...}`.
fn array_element_type(element: TypeReference, dimensions: usize) -> Type {
    match element {
        TypeReference::Primitive(primitive) if dimensions <= 1 => Type::primitive(primitive.kind, false),
        TypeReference::Primitive(primitive) => Type {
            array_dimensions: dimensions - 2,
            ..Type::primitive(primitive.kind, true)
        },
        user => Type {
            array_dimensions: dimensions.saturating_sub(1),
            ..Type::reference(user)
        },
    }
}

impl Visitor {
    pub(crate) fn visit_expression(&self, pair: Pair<Rule>) -> Result<Expression> {
        let mapping = self.visit_operator_expression(self.required(&pair, Rule::operator_expression)?)?;
        let Some(suffix) = child(&pair, Rule::for_suffix) else {
            return Ok(mapping);
        };
        let condition = match child(&suffix, Rule::expression) {
            Some(condition) => Some(boxed(self.visit_expression(condition)?)),
            None => None,
        };
        Ok(Expression::ListComprehension(ListComprehension {
            mapping: boxed(mapping),
            source: self.visit_for_each(self.required(&suffix, Rule::for_each_condition)?)?,
            condition,
        }))
    }

    fn visit_operator_expression(&self, pair: Pair<Rule>) -> Result<Expression> {
        PRATT
            .map_primary(|primary| self.visit_primary(primary))
            .map_prefix(|op, operand| -> Result<Expression> {
                let operand = operand?;
                if op.as_rule() == Rule::spread_operator {
                    return Ok(Expression::Spread(boxed(operand)));
                }
                let operator = match op.as_str() {
                    "++" => PrefixOperator::Increment,
                    "--" => PrefixOperator::Decrement,
                    "::" => PrefixOperator::Reference,
                    "+" => PrefixOperator::Plus,
                    "-" => PrefixOperator::Minus,
                    "!" => PrefixOperator::Not,
                    "~" => PrefixOperator::Complement,
                    _ => return Err(self.unexpected(&op)),
                };
                Ok(Expression::Prefix {
                    operator,
                    operand: boxed(operand),
                })
            })
            .map_postfix(|operand, op| -> Result<Expression> {
                let operand = operand?;
                if op.as_rule() == Rule::cast_operator {
                    return Ok(Expression::Cast {
                        operand: boxed(operand),
                        ty: self.visit_type(self.required(&op, Rule::type_use)?)?,
                        safe: has(&op, Rule::safe_cast),
                    });
                }
                Ok(Expression::Postfix {
                    operand: boxed(operand),
                    operator: self.visit_postfix_operator(op)?,
                })
            })
            .map_infix(|left, op, right| -> Result<Expression> { self.visit_infix(left?, op, right?) })
            .parse(pair.into_inner())
    }

    fn visit_infix(&self, left: Expression, op: Pair<Rule>, right: Expression) -> Result<Expression> {
        let text = op.as_str();
        let expression = match op.as_rule() {
            Rule::assignment_operator => Expression::Assignment(AssignmentExpression {
                target: boxed(left),
                operator: AssignmentOperator::from_symbol(text).ok_or_else(|| self.unexpected(&op))?,
                value: boxed(right),
            }),
            Rule::ternary_operator => Expression::Ternary {
                condition: boxed(left),
                then: boxed(self.visit_expression(self.required(&op, Rule::expression)?)?),
                otherwise: boxed(right),
            },
            Rule::disjunction_operator => Expression::Disjunction(Binary::new(left, (), right)),
            Rule::conjunction_operator => Expression::Conjunction(Binary::new(left, (), right)),
            Rule::equality_operator => {
                let operator = match text {
                    "==" => EqualityOperator::Equal,
                    "!=" => EqualityOperator::NotEqual,
                    "===" => EqualityOperator::Identical,
                    "!==" => EqualityOperator::NotIdentical,
                    _ => return Err(self.unexpected(&op)),
                };
                Expression::Equality(Binary::new(left, operator, right))
            }
            Rule::comparison_operator => {
                let operator = match text {
                    "<" => ComparisonOperator::Less,
                    "<=" => ComparisonOperator::LessEqual,
                    ">" => ComparisonOperator::Greater,
                    ">=" => ComparisonOperator::GreaterEqual,
                    _ => return Err(self.unexpected(&op)),
                };
                Expression::Comparison(Binary::new(left, operator, right))
            }
            Rule::spaceship_operator => Expression::Spaceship(Binary::new(left, (), right)),
            Rule::bit_or_operator => Expression::BitOr(Binary::new(left, (), right)),
            Rule::bit_xor_operator => Expression::BitXor(Binary::new(left, (), right)),
            Rule::bit_and_operator => Expression::BitAnd(Binary::new(left, (), right)),
            Rule::shift_operator => {
                let operator = match text {
                    "<<" => ShiftOperator::Left,
                    ">>" => ShiftOperator::Right,
                    ">>>" => ShiftOperator::UnsignedRight,
                    _ => return Err(self.unexpected(&op)),
                };
                Expression::Shift(Binary::new(left, operator, right))
            }
            Rule::named_check_operator => {
                let operator = match text {
                    "in" => NamedCheckOperator::In,
                    "!in" => NamedCheckOperator::NotIn,
                    "instanceof" => NamedCheckOperator::Is,
                    "!instanceof" => NamedCheckOperator::NotIs,
                    _ => return Err(self.unexpected(&op)),
                };
                Expression::NamedCheck(Binary::new(left, operator, right))
            }
            Rule::elvis_operator => Expression::Elvis(Binary::new(left, (), right)),
            Rule::range_operator => Expression::Range(Binary::new(left, (), right)),
            Rule::sum_operator => {
                let operator = match text {
                    "+" => SumOperator::Plus,
                    "-" => SumOperator::Minus,
                    _ => return Err(self.unexpected(&op)),
                };
                Expression::Sum(Binary::new(left, operator, right))
            }
            Rule::product_operator => {
                let operator = match text {
                    "*" => ProductOperator::Times,
                    "/" => ProductOperator::Divide,
                    "%" => ProductOperator::Modulo,
                    _ => return Err(self.unexpected(&op)),
                };
                Expression::Product(Binary::new(left, operator, right))
            }
            _ => return Err(self.unexpected(&op)),
        };
        Ok(expression)
    }

    pub(crate) fn visit_postfix_operator(&self, pair: Pair<Rule>) -> Result<PostfixOperator> {
        let inner = self.first(&pair)?;
        match inner.as_rule() {
            Rule::postfix_token => match inner.as_str() {
                "++" => Ok(PostfixOperator::Increment),
                "--" => Ok(PostfixOperator::Decrement),
                "!!" => Ok(PostfixOperator::NotNull),
                _ => Err(self.unexpected(&inner)),
            },
            Rule::invocation_suffix => {
                let type_arguments = match child(&inner, Rule::type_arguments) {
                    Some(arguments) => self.visit_type_arguments(arguments)?,
                    None => Vec::new(),
                };
                let mut arguments = match child(&inner, Rule::value_arguments) {
                    Some(arguments) => self.visit_value_arguments(arguments)?,
                    None => Vec::new(),
                };
                if let Some(body) = child(&inner, Rule::lambda_body) {
                    arguments.push(ValueArgument::positional(Expression::Literal(Literal::Lambda(Lambda {
                        parameters: vec![],
                        body: Either::B(self.visit_lambda_body(body)?),
                    }))));
                }
                Ok(PostfixOperator::Invocation(Invocation {
                    type_arguments,
                    arguments,
                }))
            }
            Rule::indexing_suffix => Ok(PostfixOperator::Indexing(
                children(&inner, Rule::expression)
                    .map(|e| self.visit_expression(e))
                    .collect::<Result<Vec<_>>>()?,
            )),
            Rule::call_suffix => {
                let operator = self.required(&inner, Rule::call_operator)?;
                let kind = match operator.as_str() {
                    "?." => CallKind::Safe,
                    "::" => CallKind::Reference,
                    "." => CallKind::Dot,
                    _ => return Err(self.unexpected(&operator)),
                };
                let member = if has(&inner, Rule::class_reference) {
                    Member::Class
                } else {
                    Member::Name(self.name(&inner)?)
                };
                Ok(PostfixOperator::Call(Call { kind, member }))
            }
            _ => Err(self.unexpected(&inner)),
        }
    }

    // ========================================================================
    // PRIMARIES
    // ========================================================================

    pub(crate) fn visit_primary(&self, pair: Pair<Rule>) -> Result<Expression> {
        match pair.as_rule() {
            Rule::literal => Ok(Expression::Literal(self.visit_literal(self.first(&pair)?)?)),
            Rule::constructor_invocation => Ok(Expression::ConstructorInvocation(
                self.visit_constructor_invocation(pair)?,
            )),
            Rule::switch_expression => Ok(Expression::Switch(self.visit_switch(pair)?)),
            Rule::when_expression => Ok(Expression::When(self.visit_when(pair)?)),
            Rule::expression => Ok(Expression::Parenthesized(boxed(self.visit_expression(pair)?))),
            Rule::simple_identifier => Ok(Expression::identifier(pair.as_str())),
            _ => Err(self.unexpected(&pair)),
        }
    }

    fn visit_literal(&self, pair: Pair<Rule>) -> Result<Literal> {
        let text = pair.as_str().to_string();
        let literal = match pair.as_rule() {
            Rule::multiline_string_literal => Literal::MultilineString(text),
            Rule::string_literal => Literal::String(text),
            Rule::char_literal => Literal::Char(text),
            Rule::real_literal => Literal::Real(text),
            Rule::long_literal => Literal::Long(text),
            Rule::integer_literal => Literal::Integer(text),
            Rule::boolean_literal => Literal::Boolean(text == "true"),
            Rule::null_literal => Literal::Null,
            Rule::void_literal => Literal::Void,
            Rule::this_literal => Literal::This,
            Rule::super_literal => Literal::Super(
                child(&pair, Rule::user_type)
                    .map(|t| self.visit_user_type(t))
                    .transpose()?,
            ),
            Rule::lambda => Literal::Lambda(self.visit_lambda(pair)?),
            Rule::initializer_list => Literal::InitializerList(InitializerList {
                entries: self.visit_initializer_entries(&pair)?,
                element_type: None,
            }),
            _ => return Err(self.unexpected(&pair)),
        };
        Ok(literal)
    }

    fn visit_lambda(&self, pair: Pair<Rule>) -> Result<Lambda> {
        let parameters = children(&pair, Rule::lambda_parameter)
            .map(|parameter| -> Result<LambdaParameter> {
                let ty = match child(&parameter, Rule::type_or_var) {
                    Some(ty) => self.visit_type_or_var(ty)?,
                    None => None,
                };
                let name = self.name(&parameter)?;
                Ok(LambdaParameter {
                    annotations: self.visit_annotations(&parameter)?,
                    ty,
                    name: (name != "_").then_some(name),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let body = match child(&pair, Rule::lambda_body) {
            Some(body) => Either::B(self.visit_lambda_body(body)?),
            None => Either::A(boxed(self.visit_expression(self.required(&pair, Rule::expression)?)?)),
        };
        Ok(Lambda { parameters, body })
    }

    fn visit_lambda_body(&self, pair: Pair<Rule>) -> Result<LambdaBody> {
        let result = match child(&pair, Rule::expression) {
            Some(result) => Some(boxed(self.visit_expression(result)?)),
            None => None,
        };
        Ok(LambdaBody {
            statements: children(&pair, Rule::statement)
                .map(|s| self.visit_statement(s))
                .collect::<Result<Vec<_>>>()?,
            result,
        })
    }

    fn visit_initializer_entries(&self, pair: &Pair<Rule>) -> Result<Either<Vec<ValueArgument>, Vec<DictionaryEntry>>> {
        if !has(pair, Rule::dictionary_entry) {
            return Ok(Either::A(
                children(pair, Rule::value_argument)
                    .map(|a| self.visit_value_argument(a))
                    .collect::<Result<Vec<_>>>()?,
            ));
        }
        let entries = children(pair, Rule::dictionary_entry)
            .map(|entry| -> Result<DictionaryEntry> {
                let mut sides = children(&entry, Rule::expression);
                let key = sides.next().ok_or_else(|| self.missing(&entry, "dictionary key"))?;
                let value = sides.next().ok_or_else(|| self.missing(&entry, "dictionary value"))?;
                Ok(DictionaryEntry {
                    key: self.visit_expression(key)?,
                    value: self.visit_expression(value)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Either::B(entries))
    }

    fn visit_constructor_invocation(&self, pair: Pair<Rule>) -> Result<ConstructorInvocation> {
        let element = match child(&pair, Rule::primitive_type_no_array) {
            Some(primitive) => TypeReference::Primitive(PrimitiveType {
                kind: self.primitive_kind(&primitive)?,
                array: false,
            }),
            None => TypeReference::User(self.visit_user_type(self.required(&pair, Rule::user_type)?)?),
        };

        let sizes = children(&pair, Rule::array_size)
            .map(|size| -> Result<Expression> { self.visit_expression(self.required(&size, Rule::expression)?) })
            .collect::<Result<Vec<_>>>()?;
        if !sizes.is_empty() {
            return sized_array(element, sizes).ok_or_else(|| self.missing(&pair, "array size"));
        }

        let list = child(&pair, Rule::initializer_list);
        let dimensions = children(&pair, Rule::empty_dimension).count();
        if dimensions > 0 {
            let list = list.ok_or_else(|| self.missing(&pair, "array initializer"))?;
            return match self.visit_initializer_entries(&list)? {
                Either::A(arguments) => Ok(ConstructorInvocation::Array(InitializerList {
                    entries: Either::A(arguments),
                    element_type: Some(array_element_type(element, dimensions)),
                })),
                Either::B(_) => Err(self.unsupported(
                    &list,
                    "dictionary initializer for an array",
                    "array initializers take a plain element list such as `{a, b}`",
                )),
            };
        }

        let arguments = match (child(&pair, Rule::value_arguments), list) {
            (Some(arguments), _) => self.visit_value_arguments(arguments)?,
            (None, Some(list)) => match self.visit_initializer_entries(&list)? {
                Either::A(arguments) => arguments,
                Either::B(_) => {
                    return Err(self.unsupported(
                        &list,
                        "dictionary initializer in a constructor call",
                        "pass the entries as constructor arguments instead",
                    ))
                }
            },
            (None, None) => return Err(self.missing(&pair, "constructor arguments")),
        };
        Ok(ConstructorInvocation::Constructor {
            ty: Type::reference(element),
            arguments,
        })
    }

    // ========================================================================
    // SWITCH AND WHEN
    // ========================================================================

    pub(crate) fn visit_switch(&self, pair: Pair<Rule>) -> Result<SwitchExpression> {
        let branches = children(&pair, Rule::switch_branch)
            .map(|branch| -> Result<SwitchBranch> {
                Ok(SwitchBranch {
                    conditions: self.visit_switch_conditions(self.required(&branch, Rule::switch_condition)?)?,
                    body: self.visit_statement_body(self.required(&branch, Rule::statement_body)?)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(SwitchExpression {
            subject: boxed(self.visit_expression(self.required(&pair, Rule::expression)?)?),
            branches,
            default: self.visit_default_branch(&pair)?,
        })
    }

    /// Flattens the right-nested condition chain into one list.
    fn visit_switch_conditions(&self, pair: Pair<Rule>) -> Result<Vec<SwitchCondition>> {
        let mut conditions = Vec::new();
        let mut current = Some(pair);
        while let Some(condition) = current {
            let kind = self.visit_condition_kind(self.required(&condition, Rule::condition_kind)?)?;
            for value in children(&condition, Rule::expression) {
                conditions.push(SwitchCondition {
                    kind,
                    value: self.visit_expression(value)?,
                });
            }
            current = child(&condition, Rule::switch_condition);
        }
        Ok(conditions)
    }

    fn visit_condition_kind(&self, pair: Pair<Rule>) -> Result<ConditionKind> {
        let inner = self.first(&pair)?;
        let negated = inner.as_str().starts_with('!');
        match inner.as_rule() {
            Rule::kw_case => Ok(ConditionKind::Case),
            Rule::in_operator => Ok(ConditionKind::In { negated }),
            Rule::instance_operator => Ok(ConditionKind::Is { negated }),
            _ => Err(self.unexpected(&inner)),
        }
    }

    fn visit_default_branch(&self, pair: &Pair<Rule>) -> Result<Option<Box<StatementBody>>> {
        match child(pair, Rule::default_branch) {
            Some(branch) => Ok(Some(Box::new(
                self.visit_statement_body(self.required(&branch, Rule::statement_body)?)?,
            ))),
            None => Ok(None),
        }
    }

    pub(crate) fn visit_when(&self, pair: Pair<Rule>) -> Result<WhenExpression> {
        let branches = children(&pair, Rule::when_branch)
            .map(|branch| -> Result<WhenBranch> {
                Ok(WhenBranch {
                    conditions: children(&branch, Rule::expression)
                        .map(|e| self.visit_expression(e))
                        .collect::<Result<Vec<_>>>()?,
                    body: self.visit_statement_body(self.required(&branch, Rule::statement_body)?)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(WhenExpression {
            branches,
            default: self.visit_default_branch(&pair)?,
        })
    }
}
