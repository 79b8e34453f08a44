//! Type nodes.

use serde::Serialize;

use super::{Annotation, Variance};
use crate::either::Either;

/// A type use: an inner reference or function type, array dimensions, nullability.
///
/// `int[][]?` is a primitive `int[]` with one extra dimension, nullable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Type {
    pub inner: Either<TypeReference, FunctionType>,
    pub array_dimensions: usize,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeReference {
    Primitive(PrimitiveType),
    User(UserType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveKind {
    Byte,
    SByte,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    Char,
    Boolean,
}

/// A primitive, optionally flagged as its dedicated array type (`int[]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PrimitiveType {
    pub kind: PrimitiveKind,
    pub array: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserType {
    pub name: String,
    pub type_arguments: Vec<TypeArgument>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionType {
    pub suspend: bool,
    pub return_type: Box<Type>,
    pub parameters: Vec<Type>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeArgument {
    /// `?`, rendered as a star projection.
    Wildcard,
    Concrete {
        variance: Option<Variance>,
        ty: Type,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeParameter {
    pub annotations: Vec<Annotation>,
    pub reified: bool,
    pub name: String,
    pub constraints: Vec<Type>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantTypeParameter {
    pub annotations: Vec<Annotation>,
    pub variance: Option<Variance>,
    pub name: String,
    pub constraints: Vec<Type>,
}

impl PrimitiveKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let kind = match keyword {
            "byte" => PrimitiveKind::Byte,
            "sbyte" => PrimitiveKind::SByte,
            "short" => PrimitiveKind::Short,
            "ushort" => PrimitiveKind::UShort,
            "int" => PrimitiveKind::Int,
            "uint" => PrimitiveKind::UInt,
            "long" => PrimitiveKind::Long,
            "ulong" => PrimitiveKind::ULong,
            "float" => PrimitiveKind::Float,
            "double" => PrimitiveKind::Double,
            "char" => PrimitiveKind::Char,
            "boolean" => PrimitiveKind::Boolean,
            _ => return None,
        };
        Some(kind)
    }

    /// Kotlin name of the scalar type. `byte` is unsigned, `sbyte` is signed.
    pub fn kotlin_name(self) -> &'static str {
        match self {
            PrimitiveKind::Byte => "UByte",
            PrimitiveKind::SByte => "Byte",
            PrimitiveKind::Short => "Short",
            PrimitiveKind::UShort => "UShort",
            PrimitiveKind::Int => "Int",
            PrimitiveKind::UInt => "UInt",
            PrimitiveKind::Long => "Long",
            PrimitiveKind::ULong => "ULong",
            PrimitiveKind::Float => "Float",
            PrimitiveKind::Double => "Double",
            PrimitiveKind::Char => "Char",
            PrimitiveKind::Boolean => "Boolean",
        }
    }
}

impl Type {
    pub fn primitive(kind: PrimitiveKind, array: bool) -> Self {
        Type::reference(TypeReference::Primitive(PrimitiveType { kind, array }))
    }

    pub fn user(name: impl Into<String>, type_arguments: Vec<TypeArgument>) -> Self {
        Type::reference(TypeReference::User(UserType {
            name: name.into(),
            type_arguments,
        }))
    }

    pub fn reference(reference: TypeReference) -> Self {
        Type {
            inner: Either::A(reference),
            array_dimensions: 0,
            nullable: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

impl TypeArgument {
    pub fn of(ty: Type) -> Self {
        TypeArgument::Concrete { variance: None, ty }
    }
}
