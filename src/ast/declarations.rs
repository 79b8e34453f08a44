//! Declaration and member nodes.
//!
//! Class and singleton members are separate closed sets that share the
//! [`Declaration`] variant. Every body is stored pre-partitioned into
//! instance and static buckets (see [`Members`]).

use serde::Serialize;

use super::{
    Block, Expression, FunctionModifier, InheritanceModifier, PrimitiveType, PropertyModifier,
    Type, TypeArgument, TypeParameter, UserType, ValueArgument, VariantTypeParameter, Visibility,
};
use crate::either::Either;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Declaration {
    Type(TypeDeclaration),
    Function(FunctionDeclaration),
    Property(PropertyDeclaration),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub name: String,
    pub type_arguments: Vec<TypeArgument>,
    pub arguments: Vec<AnnotationArgument>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationArgument {
    pub name: Option<String>,
    pub value: Either<Expression, Vec<Expression>>,
}

// ============================================================================
// TYPE DECLARATIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDeclaration {
    pub annotations: Vec<Annotation>,
    pub visibility: Visibility,
    pub kind: TypeDeclarationKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeDeclarationKind {
    Class(ClassDeclaration),
    Singleton(SingletonDeclaration),
    Interface(InterfaceDeclaration),
    EnumClass(EnumClassDeclaration),
    PrimitiveEnum(PrimitiveEnumDeclaration),
    Record(RecordDeclaration),
    InlineClass(InlineClassDeclaration),
    Annotation(AnnotationDeclaration),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDeclaration {
    pub inheritance: Option<InheritanceModifier>,
    pub sealed: bool,
    pub inner: bool,
    pub name: String,
    pub type_parameters: Vec<VariantTypeParameter>,
    /// Primary constructor; `None` when the parentheses are omitted.
    pub parameters: Option<Vec<ValueParameter>>,
    pub supertypes: Vec<Supertype>,
    pub members: Members<ClassMember, SingletonMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingletonDeclaration {
    pub name: String,
    pub supertypes: Vec<Supertype>,
    pub members: Members<SingletonMember, SingletonMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceDeclaration {
    pub name: String,
    pub type_parameters: Vec<VariantTypeParameter>,
    pub supertypes: Vec<UserType>,
    pub members: Members<Declaration, Declaration>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumClassDeclaration {
    pub name: String,
    pub type_parameters: Vec<VariantTypeParameter>,
    pub parameters: Option<Vec<ValueParameter>>,
    pub supertypes: Vec<Supertype>,
    pub entries: Vec<EnumEntry>,
    pub members: Members<ClassMember, SingletonMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumEntry {
    pub annotations: Vec<Annotation>,
    pub name: String,
    pub arguments: Vec<ValueArgument>,
    pub body: Option<Vec<ClassMember>>,
}

/// `[bitfield] enum Flags : int { A, B = 4, C << 3 }`, materialized as constants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimitiveEnumDeclaration {
    pub bitfield: bool,
    pub ty: PrimitiveType,
    pub name: String,
    pub entries: Vec<PrimitiveEnumEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimitiveEnumEntry {
    pub name: String,
    pub value: Option<EnumValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumValue {
    pub kind: EnumValueKind,
    pub value: Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EnumValueKind {
    /// `A = v`
    Assign,
    /// `A << v`, i.e. bit `v`.
    Shift,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordDeclaration {
    pub name: String,
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<ValueParameter>,
    pub supertypes: Vec<Supertype>,
    pub members: Members<ClassMember, SingletonMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineClassDeclaration {
    pub name: String,
    pub parameter: ValueParameter,
    pub supertypes: Vec<Supertype>,
    pub members: Members<ClassMember, SingletonMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationDeclaration {
    pub name: String,
    pub parameters: Vec<AnnotationParameter>,
    pub members: Members<ClassMember, SingletonMember>,
}

/// `int value() default 0;` inside an annotation body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationParameter {
    pub annotations: Vec<Annotation>,
    pub ty: Type,
    pub name: String,
    pub default: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Supertype {
    pub ty: UserType,
    /// Constructor arguments or a `by` delegate. `A(None)` is a bare reference.
    pub initializer: Either<Option<Vec<ValueArgument>>, Expression>,
}

// ============================================================================
// MEMBERS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ClassMember {
    Declaration(Declaration),
    Constructor(Constructor),
    InitBlock(InitBlock),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SingletonMember {
    Declaration(Declaration),
    InitBlock(InitBlock),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constructor {
    pub annotations: Vec<Annotation>,
    pub visibility: Visibility,
    pub parameters: Vec<ValueParameter>,
    pub delegations: Vec<ConstructorDelegation>,
    pub body: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstructorDelegation {
    pub target: DelegationTarget,
    pub arguments: Vec<ValueArgument>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DelegationTarget {
    This,
    Super,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitBlock {
    pub is_static: bool,
    pub body: Block,
}

/// A body split into instance members and static members, each in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Members<I, S> {
    pub instance: Vec<I>,
    pub statics: Vec<S>,
}

impl<I, S> Default for Members<I, S> {
    fn default() -> Self {
        Members {
            instance: Vec::new(),
            statics: Vec::new(),
        }
    }
}

impl<I, S> Members<I, S> {
    pub fn len(&self) -> usize {
        self.instance.len() + self.statics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A member that can be moved into a static bucket.
pub trait StaticMember: Sized {
    type Static;

    /// Returns the static form of a member that declares itself static, or
    /// gives the member back.
    fn into_static(self) -> Result<Self::Static, Self>;
}

/// Buckets `all` into instance and static members, preserving relative order.
pub fn partition_members<M: StaticMember>(all: Vec<M>) -> Members<M, M::Static> {
    let mut members = Members::default();
    for member in all {
        match member.into_static() {
            Ok(static_member) => members.statics.push(static_member),
            Err(instance_member) => members.instance.push(instance_member),
        }
    }
    members
}

/// Singleton members are static by membership.
pub fn partition_singleton_members(all: Vec<SingletonMember>) -> Members<SingletonMember, SingletonMember> {
    Members {
        instance: Vec::new(),
        statics: all,
    }
}

impl Declaration {
    /// Functions and properties declare themselves static through a modifier.
    pub fn is_static(&self) -> bool {
        match self {
            Declaration::Function(function) => function.modifiers.contains(&FunctionModifier::Static),
            Declaration::Property(property) => property.modifiers.contains(&PropertyModifier::Static),
            Declaration::Type(_) => false,
        }
    }
}

impl StaticMember for ClassMember {
    type Static = SingletonMember;

    fn into_static(self) -> Result<SingletonMember, ClassMember> {
        match self {
            ClassMember::Declaration(d) if d.is_static() => Ok(SingletonMember::Declaration(d)),
            ClassMember::InitBlock(b) if b.is_static => Ok(SingletonMember::InitBlock(b)),
            other => Err(other),
        }
    }
}

impl StaticMember for Declaration {
    type Static = Declaration;

    fn into_static(self) -> Result<Declaration, Declaration> {
        if self.is_static() {
            Ok(self)
        } else {
            Err(self)
        }
    }
}

// ============================================================================
// FUNCTIONS AND PROPERTIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDeclaration {
    pub annotations: Vec<Annotation>,
    pub visibility: Visibility,
    pub inheritance: Option<InheritanceModifier>,
    pub modifiers: Vec<FunctionModifier>,
    pub type_parameters: Vec<TypeParameter>,
    /// `None` when inferred from an expression body.
    pub return_type: Option<ReturnType>,
    pub name: String,
    pub parameters: Vec<ValueParameter>,
    pub throws: Vec<UserType>,
    pub body: Option<FunctionBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ReturnType {
    Type(Type),
    Void,
}

pub type FunctionBody = Either<Block, Expression>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDeclaration {
    pub annotations: Vec<Annotation>,
    pub visibility: Visibility,
    pub inheritance: Option<InheritanceModifier>,
    pub modifiers: Vec<PropertyModifier>,
    /// `None` for `var`.
    pub ty: Option<Type>,
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub name: String,
    pub value: Option<Expression>,
    pub delegate: Option<Expression>,
    pub getter: Option<Getter>,
    pub setter: Option<Setter>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Getter {
    pub annotations: Vec<Annotation>,
    pub body: Option<FunctionBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Setter {
    pub annotations: Vec<Annotation>,
    pub parameter: Option<String>,
    pub body: Option<FunctionBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueParameter {
    pub annotations: Vec<Annotation>,
    /// Declared `var`; in records and primary constructors this becomes a mutable property.
    pub mutable: bool,
    pub ty: Type,
    pub vararg: bool,
    pub name: String,
    pub default: Option<Expression>,
}
