//! Statement productions.

use pest::iterators::Pair;

use super::parser::Rule;
use super::visitor::{child, children, has, Result, Scope, Visitor};
use crate::ast::*;
use crate::either::Either;

impl Visitor {
    pub(crate) fn visit_statement(&self, pair: Pair<Rule>) -> Result<Statement> {
        let inner = self.first(&pair)?;
        match inner.as_rule() {
            Rule::labeled_statement => Ok(Statement::Labeled {
                label: self.name(&inner)?,
                statement: Box::new(self.visit_statement(self.required(&inner, Rule::statement)?)?),
            }),
            Rule::declaration => Ok(Statement::Declaration(self.visit_declaration(inner, Scope::Local)?)),
            Rule::if_statement => self.visit_if(inner),
            Rule::for_statement => self.visit_for(inner),
            Rule::while_statement => self.visit_while(inner),
            Rule::jump_statement => Ok(Statement::Jump(self.visit_jump(inner)?)),
            Rule::block => Ok(Statement::Block(self.visit_block(inner)?)),
            Rule::assignment => Ok(Statement::Assignment(self.visit_assignment(inner)?)),
            Rule::expression => Ok(Statement::Expression(self.visit_expression(inner)?)),
            Rule::switch_expression => Ok(Statement::Expression(Expression::Switch(self.visit_switch(inner)?))),
            Rule::when_expression => Ok(Statement::Expression(Expression::When(self.visit_when(inner)?))),
            _ => Err(self.unexpected(&inner)),
        }
    }

    pub(crate) fn visit_statement_body(&self, pair: Pair<Rule>) -> Result<StatementBody> {
        let inner = self.first(&pair)?;
        match inner.as_rule() {
            Rule::block => Ok(StatementBody::Block(self.visit_block(inner)?)),
            Rule::statement => Ok(StatementBody::Statement(Box::new(self.visit_statement(inner)?))),
            Rule::empty_statement => Ok(StatementBody::Pass),
            _ => Err(self.unexpected(&inner)),
        }
    }

    pub(crate) fn visit_block(&self, pair: Pair<Rule>) -> Result<Block> {
        Ok(Block {
            statements: children(&pair, Rule::statement)
                .map(|s| self.visit_statement(s))
                .collect::<Result<Vec<_>>>()?,
        })
    }

    fn visit_if(&self, pair: Pair<Rule>) -> Result<Statement> {
        let mut bodies = children(&pair, Rule::statement_body);
        let then = bodies.next().ok_or_else(|| self.missing(&pair, "if body"))?;
        let otherwise = match bodies.next() {
            Some(body) => Some(Box::new(self.visit_statement_body(body)?)),
            None => None,
        };
        Ok(Statement::If(IfStatement {
            condition: self.visit_expression(self.required(&pair, Rule::expression)?)?,
            then: Box::new(self.visit_statement_body(then)?),
            otherwise,
        }))
    }

    fn visit_for(&self, pair: Pair<Rule>) -> Result<Statement> {
        let header = match child(&pair, Rule::for_each_condition) {
            Some(condition) => Either::B(self.visit_for_each(condition)?),
            None => {
                let condition = self.required(&pair, Rule::classic_for_condition)?;
                Either::A(ClassicFor {
                    variables: children(&condition, Rule::for_variable)
                        .map(|variable| -> Result<ForVariable> {
                            Ok(ForVariable {
                                ty: self.optional_type(&variable)?,
                                name: self.name(&variable)?,
                                value: self.visit_expression(self.required(&variable, Rule::expression)?)?,
                            })
                        })
                        .collect::<Result<Vec<_>>>()?,
                    conditions: children(&condition, Rule::expression)
                        .map(|e| self.visit_expression(e))
                        .collect::<Result<Vec<_>>>()?,
                    updates: children(&condition, Rule::simple_statement)
                        .map(|s| self.visit_simple_statement(s))
                        .collect::<Result<Vec<_>>>()?,
                })
            }
        };
        Ok(Statement::For(ForStatement {
            header,
            body: Box::new(self.visit_statement_body(self.required(&pair, Rule::statement_body)?)?),
        }))
    }

    /// `[T] x in source`, shared with list comprehensions.
    pub(crate) fn visit_for_each(&self, pair: Pair<Rule>) -> Result<ForEach> {
        Ok(ForEach {
            ty: self.optional_type(&pair)?,
            name: self.name(&pair)?,
            iterable: Box::new(self.visit_expression(self.required(&pair, Rule::expression)?)?),
        })
    }

    fn optional_type(&self, pair: &Pair<Rule>) -> Result<Option<Type>> {
        match child(pair, Rule::type_or_var) {
            Some(ty) => self.visit_type_or_var(ty),
            None => Ok(None),
        }
    }

    fn visit_simple_statement(&self, pair: Pair<Rule>) -> Result<Statement> {
        let inner = self.first(&pair)?;
        match inner.as_rule() {
            Rule::assignment => Ok(Statement::Assignment(self.visit_assignment(inner)?)),
            Rule::expression => Ok(Statement::Expression(self.visit_expression(inner)?)),
            _ => Err(self.unexpected(&inner)),
        }
    }

    fn visit_while(&self, pair: Pair<Rule>) -> Result<Statement> {
        Ok(Statement::While(WhileStatement {
            do_while: has(&pair, Rule::kw_do),
            condition: self.visit_expression(self.required(&pair, Rule::expression)?)?,
            body: Box::new(self.visit_statement_body(self.required(&pair, Rule::statement_body)?)?),
        }))
    }

    fn visit_jump(&self, pair: Pair<Rule>) -> Result<Jump> {
        let keyword = self.first(&pair)?;
        let label = match child(&pair, Rule::jump_label) {
            Some(label) => Some(self.name(&label)?),
            None => None,
        };
        let value = match child(&pair, Rule::expression) {
            Some(value) => Some(self.visit_expression(value)?),
            None => None,
        };
        match keyword.as_rule() {
            Rule::kw_break => Ok(Jump::Break(label)),
            Rule::kw_continue => Ok(Jump::Continue(label)),
            Rule::kw_throw => Ok(Jump::Throw(value.ok_or_else(|| self.missing(&pair, "thrown value"))?)),
            Rule::kw_return => Ok(Jump::Return { label, value }),
            _ => Err(self.unexpected(&keyword)),
        }
    }

    fn visit_assignment(&self, pair: Pair<Rule>) -> Result<Assignment> {
        let operator = self.required(&pair, Rule::assignment_operator)?;
        Ok(Assignment {
            target: self.visit_assignable(self.required(&pair, Rule::assignable_expression)?)?,
            operator: AssignmentOperator::from_symbol(operator.as_str()).ok_or_else(|| self.unexpected(&operator))?,
            value: self.visit_expression(self.required(&pair, Rule::expression)?)?,
        })
    }

    /// A primary followed by postfix operators, folded left to right.
    fn visit_assignable(&self, pair: Pair<Rule>) -> Result<Expression> {
        let mut parts = pair.clone().into_inner();
        let primary = parts.next().ok_or_else(|| self.missing(&pair, "assignment target"))?;
        parts.try_fold(self.visit_primary(primary)?, |operand, postfix| -> Result<Expression> {
            Ok(Expression::Postfix {
                operand: Box::new(operand),
                operator: self.visit_postfix_operator(postfix)?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::either::Either;
    use crate::syntax::parse_file;

    fn body(source: &str) -> Vec<Statement> {
        let file = parse_file(&format!("void main() {{ {} }}", source), "statements.qv").unwrap();
        match file.declarations.into_iter().next() {
            Some(Declaration::Function(FunctionDeclaration {
                body: Some(Either::A(block)),
                ..
            })) => block.statements,
            other => panic!("expected a function with a block, got {:?}", other),
        }
    }

    #[test]
    fn classic_for_keeps_all_three_clauses() {
        let statements = body("for (int i = 0, j = 10; i < j; i++, j -= 1) {}");
        let Statement::For(ForStatement {
            header: Either::A(header),
            ..
        }) = &statements[0]
        else {
            panic!("expected a classic for");
        };
        assert_eq!(header.variables.len(), 2);
        assert!(header.variables[1].ty.is_none());
        assert_eq!(header.conditions.len(), 1);
        assert!(matches!(header.updates[0], Statement::Expression(_)));
        assert!(matches!(header.updates[1], Statement::Assignment(_)));
    }

    #[test]
    fn for_each_reads_optional_type() {
        let statements = body("for (String s in names) print(s);");
        let Statement::For(ForStatement {
            header: Either::B(each),
            body,
        }) = &statements[0]
        else {
            panic!("expected a for-each");
        };
        assert_eq!(each.name, "s");
        assert!(each.ty.is_some());
        assert!(matches!(**body, StatementBody::Statement(_)));
    }

    #[test]
    fn compound_assignment_target_is_folded() {
        let statements = body("a.b[0] |= 4;");
        let Statement::Assignment(assignment) = &statements[0] else {
            panic!("expected an assignment");
        };
        assert_eq!(assignment.operator, AssignmentOperator::Or);
        assert!(matches!(
            &assignment.target,
            Expression::Postfix {
                operator: PostfixOperator::Indexing(_),
                ..
            }
        ));
    }

    #[test]
    fn jumps_keep_labels_and_values() {
        let statements = body("outer@ while (true) { break@outer; } return 1;");
        assert!(matches!(&statements[0], Statement::Labeled { label, .. } if label == "outer"));
        assert_eq!(
            statements[1],
            Statement::Jump(Jump::Return {
                label: None,
                value: Some(Expression::integer("1")),
            })
        );
    }

    #[test]
    fn do_while_is_flagged() {
        let statements = body("do x++; while (x < 3);");
        assert!(matches!(&statements[0], Statement::While(w) if w.do_while));
    }

    #[test]
    fn empty_branch_is_a_pass() {
        let statements = body("if (x) ; else {}");
        let Statement::If(statement) = &statements[0] else {
            panic!("expected an if");
        };
        assert_eq!(*statement.then, StatementBody::Pass);
        assert!(matches!(statement.otherwise.as_deref(), Some(StatementBody::Block(_))));
    }
}
