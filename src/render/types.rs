//! Types, type arguments and type parameters.

use std::fmt;

use super::Join;
use crate::ast::{
    FunctionType, PrimitiveType, Type, TypeArgument, TypeParameter, TypeReference, UserType,
    Variance, VariantTypeParameter,
};
use crate::either::Either;

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.array_dimensions {
            write!(f, "Array<")?;
        }
        match &self.inner {
            Either::B(function) if self.nullable && self.array_dimensions == 0 => write!(f, "({})", function)?,
            inner => write!(f, "{}", inner)?,
        }
        for _ in 0..self.array_dimensions {
            write!(f, ">")?;
        }
        if self.nullable {
            write!(f, "?")?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeReference::Primitive(primitive) => primitive.fmt(f),
            TypeReference::User(user) => user.fmt(f),
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.kotlin_name())?;
        if self.array {
            write!(f, "Array")?;
        }
        Ok(())
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.type_arguments.is_empty() {
            write!(f, "<{}>", Join(&self.type_arguments, ", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.suspend {
            write!(f, "suspend ")?;
        }
        write!(f, "({}) -> {}", Join(&self.parameters, ", "), self.return_type)
    }
}

impl fmt::Display for Variance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variance::In => write!(f, "in"),
            Variance::Out => write!(f, "out"),
        }
    }
}

impl fmt::Display for TypeArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArgument::Wildcard => write!(f, "*"),
            TypeArgument::Concrete { variance: Some(variance), ty } => write!(f, "{} {}", variance, ty),
            TypeArgument::Concrete { variance: None, ty } => ty.fmt(f),
        }
    }
}

impl fmt::Display for TypeParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for annotation in &self.annotations {
            write!(f, "{} ", annotation)?;
        }
        if self.reified {
            write!(f, "reified ")?;
        }
        write!(f, "{}", self.name)?;
        if let Some(bound) = self.constraints.first() {
            write!(f, " : {}", bound)?;
        }
        Ok(())
    }
}

impl fmt::Display for VariantTypeParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for annotation in &self.annotations {
            write!(f, "{} ", annotation)?;
        }
        if let Some(variance) = self.variance {
            write!(f, "{} ", variance)?;
        }
        write!(f, "{}", self.name)?;
        if let Some(bound) = self.constraints.first() {
            write!(f, " : {}", bound)?;
        }
        Ok(())
    }
}

/// A type parameter as seen by `<...>` lists and `where` clauses.
pub(crate) trait Bounded: fmt::Display {
    fn name(&self) -> &str;
    fn constraints(&self) -> &[Type];
}

impl Bounded for TypeParameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn constraints(&self) -> &[Type] {
        &self.constraints
    }
}

impl Bounded for VariantTypeParameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn constraints(&self) -> &[Type] {
        &self.constraints
    }
}

/// `<A, B : C>`, or nothing for an empty list.
pub(crate) struct TypeParameters<'a, P>(pub &'a [P]);

impl<P: Bounded> fmt::Display for TypeParameters<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        write!(f, "<{}>", Join(self.0, ", "))
    }
}

/// ` where T : B, T : C` for every constraint after a parameter's first.
pub(crate) struct WhereClause<'a, P>(pub &'a [P]);

impl<P: Bounded> fmt::Display for WhereClause<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for parameter in self.0 {
            for bound in parameter.constraints().iter().skip(1) {
                write!(f, "{}{} : {}", if first { " where " } else { ", " }, parameter.name(), bound)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use pretty_assertions::assert_eq;

    fn parameter(name: &str, constraints: Vec<Type>) -> TypeParameter {
        TypeParameter {
            annotations: vec![],
            reified: false,
            name: name.into(),
            constraints,
        }
    }

    #[test]
    fn primitive_arrays_use_dedicated_kotlin_types() {
        assert_eq!(Type::primitive(PrimitiveKind::Byte, true).to_string(), "UByteArray");
        assert_eq!(Type::primitive(PrimitiveKind::SByte, false).to_string(), "Byte");
        let grid = Type {
            array_dimensions: 1,
            ..Type::primitive(PrimitiveKind::Int, true)
        };
        assert_eq!(grid.nullable().to_string(), "Array<IntArray>?");
    }

    #[test]
    fn nullable_function_types_are_parenthesized() {
        let function = Type {
            inner: Either::B(FunctionType {
                suspend: true,
                return_type: Box::new(Type::user("Unit", vec![])),
                parameters: vec![Type::primitive(PrimitiveKind::Int, false)],
            }),
            array_dimensions: 0,
            nullable: true,
        };
        assert_eq!(function.to_string(), "(suspend (Int) -> Unit)?");
    }

    #[test]
    fn type_arguments_carry_variance_and_star() {
        let map = Type::user(
            "Map",
            vec![
                TypeArgument::Concrete {
                    variance: Some(Variance::Out),
                    ty: Type::user("K", vec![]),
                },
                TypeArgument::Wildcard,
            ],
        );
        assert_eq!(map.to_string(), "Map<out K, *>");
    }

    #[test]
    fn extra_constraints_move_to_where() {
        let parameters = vec![
            parameter("T", vec![Type::user("A", vec![]), Type::user("B", vec![]), Type::user("C", vec![])]),
            parameter("U", vec![]),
        ];
        assert_eq!(TypeParameters(&parameters).to_string(), "<T : A, U>");
        assert_eq!(WhereClause(&parameters).to_string(), " where T : B, T : C");
        assert_eq!(WhereClause::<TypeParameter>(&[]).to_string(), "");
    }
}
