//! Type productions.

use pest::iterators::Pair;

use super::parser::Rule;
use super::visitor::{child, children, has, Result, Visitor};
use crate::ast::{
    FunctionType, PrimitiveKind, PrimitiveType, ReturnType, Type, TypeArgument, TypeReference, UserType,
    Variance,
};
use crate::either::Either;

impl Visitor {
    pub(crate) fn visit_type(&self, pair: Pair<Rule>) -> Result<Type> {
        let inner = self.first(&pair)?;
        let inner = match inner.as_rule() {
            Rule::function_type => Either::B(self.visit_function_type(inner)?),
            Rule::primitive_type => Either::A(TypeReference::Primitive(self.visit_primitive_type(inner)?)),
            Rule::user_type => Either::A(TypeReference::User(self.visit_user_type(inner)?)),
            _ => return Err(self.unexpected(&inner)),
        };
        Ok(Type {
            inner,
            array_dimensions: children(&pair, Rule::empty_dimension).count(),
            nullable: has(&pair, Rule::nullable),
        })
    }

    /// `var` yields `None`.
    pub(crate) fn visit_type_or_var(&self, pair: Pair<Rule>) -> Result<Option<Type>> {
        child(&pair, Rule::type_use).map(|t| self.visit_type(t)).transpose()
    }

    pub(crate) fn visit_type_or_void(&self, pair: Pair<Rule>) -> Result<ReturnType> {
        match child(&pair, Rule::type_use) {
            Some(ty) => Ok(ReturnType::Type(self.visit_type(ty)?)),
            None => Ok(ReturnType::Void),
        }
    }

    fn visit_primitive_type(&self, pair: Pair<Rule>) -> Result<PrimitiveType> {
        Ok(PrimitiveType {
            kind: self.primitive_kind(&self.required(&pair, Rule::primitive_type_no_array)?)?,
            array: has(&pair, Rule::empty_dimension),
        })
    }

    pub(crate) fn primitive_kind(&self, pair: &Pair<Rule>) -> Result<PrimitiveKind> {
        PrimitiveKind::from_keyword(pair.as_str()).ok_or_else(|| self.unexpected(pair))
    }

    pub(crate) fn visit_user_type(&self, pair: Pair<Rule>) -> Result<UserType> {
        let type_arguments = match child(&pair, Rule::type_arguments) {
            Some(arguments) => self.visit_type_arguments(arguments)?,
            None => Vec::new(),
        };
        Ok(UserType {
            name: self.required(&pair, Rule::identifier)?.as_str().to_string(),
            type_arguments,
        })
    }

    fn visit_function_type(&self, pair: Pair<Rule>) -> Result<FunctionType> {
        let parameters = children(&self.required(&pair, Rule::function_type_parameters)?, Rule::type_use)
            .map(|t| self.visit_type(t))
            .collect::<Result<Vec<_>>>()?;
        Ok(FunctionType {
            suspend: has(&pair, Rule::kw_suspend),
            return_type: Box::new(self.visit_type(self.required(&pair, Rule::type_use)?)?),
            parameters,
        })
    }

    pub(crate) fn visit_type_arguments(&self, pair: Pair<Rule>) -> Result<Vec<TypeArgument>> {
        children(&pair, Rule::type_argument)
            .map(|argument| -> Result<TypeArgument> {
                if has(&argument, Rule::wildcard) {
                    return Ok(TypeArgument::Wildcard);
                }
                let variance = match child(&argument, Rule::variance_modifier) {
                    Some(modifier) => Some(
                        Variance::from_keyword(modifier.as_str()).ok_or_else(|| self.unexpected(&modifier))?,
                    ),
                    None => None,
                };
                Ok(TypeArgument::Concrete {
                    variance,
                    ty: self.visit_type(self.required(&argument, Rule::type_use)?)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::syntax::parse_file;

    fn property_type(source: &str) -> Option<Type> {
        let file = parse_file(source, "types.qv").unwrap();
        match file.declarations.into_iter().next() {
            Some(Declaration::Property(property)) => property.ty,
            other => panic!("expected a property, got {:?}", other),
        }
    }

    #[test]
    fn first_primitive_dimension_is_the_array_flag() {
        let ty = property_type("int[][] grid;").unwrap();
        assert_eq!(ty.array_dimensions, 1);
        assert_eq!(
            ty.inner,
            crate::either::Either::A(TypeReference::Primitive(PrimitiveType {
                kind: PrimitiveKind::Int,
                array: true,
            }))
        );
    }

    #[test]
    fn user_types_keep_arguments_and_nullability() {
        let ty = property_type("Map<String, ?>? cache;").unwrap();
        assert!(ty.nullable);
        let crate::either::Either::A(TypeReference::User(user)) = ty.inner else {
            panic!("expected a user type");
        };
        assert_eq!(user.name, "Map");
        assert_eq!(user.type_arguments[1], TypeArgument::Wildcard);
    }

    #[test]
    fn var_has_no_type() {
        assert_eq!(property_type("var x = 1;"), None);
    }
}
