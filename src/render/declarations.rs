//! Declarations and member bodies.
//!
//! Class-like bodies keep their two buckets: instance members render in the
//! body itself and the static bucket renders inside a `companion object`.
//! Singletons have no instance bucket and render their members directly.

use std::fmt;

use super::types::{TypeParameters, WhereClause};
use super::{visibility, Join};
use crate::ast::*;
use crate::either::Either;

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::Type(declaration) => declaration.fmt(f),
            Declaration::Function(function) => function.fmt(f),
            Declaration::Property(property) => property.fmt(f),
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.type_arguments.is_empty() {
            write!(f, "<{}>", Join(&self.type_arguments, ", "))?;
        }
        if !self.arguments.is_empty() {
            write!(f, "({})", Join(&self.arguments, ", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for AnnotationArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{} = ", name)?;
        }
        match &self.value {
            Either::A(value) => value.fmt(f),
            Either::B(values) => write!(f, "[{}]", Join(values, ", ")),
        }
    }
}

/// Each annotation on its own line.
struct AnnotationLines<'a>(&'a [Annotation]);

impl fmt::Display for AnnotationLines<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for annotation in self.0 {
            writeln!(f, "{}", annotation)?;
        }
        Ok(())
    }
}

// ============================================================================
// TYPE DECLARATIONS
// ============================================================================

impl fmt::Display for TypeDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", AnnotationLines(&self.annotations), visibility(self.visibility))?;
        match &self.kind {
            TypeDeclarationKind::Class(class) => class.fmt(f),
            TypeDeclarationKind::Singleton(singleton) => singleton.fmt(f),
            TypeDeclarationKind::Interface(interface) => interface.fmt(f),
            TypeDeclarationKind::EnumClass(enumeration) => enumeration.fmt(f),
            TypeDeclarationKind::PrimitiveEnum(enumeration) => enumeration.fmt(f),
            TypeDeclarationKind::Record(record) => record.fmt(f),
            TypeDeclarationKind::InlineClass(inline) => inline.fmt(f),
            TypeDeclarationKind::Annotation(annotation) => annotation.fmt(f),
        }
    }
}

impl fmt::Display for ClassDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.sealed, self.inheritance) {
            (true, _) => write!(f, "sealed ")?,
            (false, Some(InheritanceModifier::Abstract)) => write!(f, "abstract ")?,
            (false, Some(InheritanceModifier::Final)) => {}
            (false, None) => write!(f, "open ")?,
        }
        if self.inner {
            write!(f, "inner ")?;
        }
        write!(f, "class {}{}", self.name, TypeParameters(&self.type_parameters))?;
        if let Some(parameters) = &self.parameters {
            write!(f, "({})", PropertyParameters(parameters, None))?;
        }
        write!(
            f,
            "{}{}{}",
            Supertypes(&self.supertypes),
            WhereClause(&self.type_parameters),
            Body(&self.members)
        )
    }
}

impl fmt::Display for SingletonDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object {}{}", self.name, Supertypes(&self.supertypes))?;
        if self.members.is_empty() {
            return Ok(());
        }
        writeln!(f, " {{")?;
        writeln!(f, "{}", Join(&self.members.statics, "\n"))?;
        write!(f, "}}")
    }
}

impl fmt::Display for InterfaceDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interface {}{}", self.name, TypeParameters(&self.type_parameters))?;
        if !self.supertypes.is_empty() {
            write!(f, " : {}", Join(&self.supertypes, ", "))?;
        }
        write!(f, "{}{}", WhereClause(&self.type_parameters), Body(&self.members))
    }
}

impl fmt::Display for EnumClassDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enum class {}{}", self.name, TypeParameters(&self.type_parameters))?;
        if let Some(parameters) = &self.parameters {
            write!(f, "({})", PropertyParameters(parameters, None))?;
        }
        writeln!(f, "{}{} {{", Supertypes(&self.supertypes), WhereClause(&self.type_parameters))?;
        write!(f, "{};", Join(&self.entries, ",\n"))?;
        if !self.members.is_empty() {
            write!(f, "\n{}", MemberList(&self.members))?;
        }
        write!(f, "\n}}")
    }
}

impl fmt::Display for EnumEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for annotation in &self.annotations {
            write!(f, "{} ", annotation)?;
        }
        write!(f, "{}", self.name)?;
        if !self.arguments.is_empty() {
            write!(f, "({})", Join(&self.arguments, ", "))?;
        }
        if let Some(body) = &self.body {
            write!(f, " {{\n{}\n}}", Join(body, "\n"))?;
        }
        Ok(())
    }
}

/// Resolved value of every entry, in declaration order.
///
/// An entry without a value continues from the last explicit one: the
/// running offset starts at 0, and restarts at 1 after each explicit value.
/// Bitfield enums turn each implicit value into a bit position.
pub fn enum_values(declaration: &PrimitiveEnumDeclaration) -> Vec<Expression> {
    let bitfield = declaration.bitfield;
    declaration
        .entries
        .iter()
        .scan((None::<Expression>, 0u64), |(last, offset), entry| {
            let value = match &entry.value {
                Some(EnumValue { kind, value }) => {
                    *last = Some(value.clone());
                    *offset = 1;
                    match kind {
                        EnumValueKind::Assign => value.clone(),
                        EnumValueKind::Shift => bit(value.clone()),
                    }
                }
                None => {
                    let implicit = match last {
                        None => Expression::integer(offset.to_string()),
                        Some(last) => Expression::Sum(Binary::new(
                            last.clone(),
                            SumOperator::Plus,
                            Expression::integer(offset.to_string()),
                        )),
                    };
                    *offset += 1;
                    if bitfield {
                        bit(implicit)
                    } else {
                        implicit
                    }
                }
            };
            Some(value)
        })
        .collect()
}

/// `1 shl position`
fn bit(position: Expression) -> Expression {
    Expression::Shift(Binary::new(Expression::integer("1"), ShiftOperator::Left, position))
}

impl fmt::Display for PrimitiveEnumDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "object {} {{", self.name)?;
        for (entry, value) in self.entries.iter().zip(enum_values(self)) {
            writeln!(f, "const val {}: {} = {}", entry.name, self.ty, value)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for RecordDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "data class {}{}({}){}{}{}",
            self.name,
            TypeParameters(&self.type_parameters),
            PropertyParameters(&self.parameters, Some("val ")),
            Supertypes(&self.supertypes),
            WhereClause(&self.type_parameters),
            Body(&self.members)
        )
    }
}

impl fmt::Display for InlineClassDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "inline class {}({}){}{}",
            self.name,
            PropertyParameters(std::slice::from_ref(&self.parameter), Some("val ")),
            Supertypes(&self.supertypes),
            Body(&self.members)
        )
    }
}

impl fmt::Display for AnnotationDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "annotation class {}", self.name)?;
        if !self.parameters.is_empty() {
            write!(f, "({})", Join(&self.parameters, ", "))?;
        }
        write!(f, "{}", Body(&self.members))
    }
}

impl fmt::Display for AnnotationParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for annotation in &self.annotations {
            write!(f, "{} ", annotation)?;
        }
        write!(f, "val {}: {}", self.name, self.ty)?;
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}

impl fmt::Display for Supertype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty)?;
        match &self.initializer {
            Either::A(None) => Ok(()),
            Either::A(Some(arguments)) => write!(f, "({})", Join(arguments, ", ")),
            Either::B(delegate) => write!(f, " by {}", delegate),
        }
    }
}

/// ` : A, B(x)`, or nothing.
struct Supertypes<'a>(&'a [Supertype]);

impl fmt::Display for Supertypes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        write!(f, " : {}", Join(self.0, ", "))
    }
}

/// The two member buckets, statics wrapped in a companion object.
struct MemberList<'a, I, S>(&'a crate::ast::Members<I, S>);

impl<I: fmt::Display, S: fmt::Display> fmt::Display for MemberList<'_, I, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members = self.0;
        write!(f, "{}", Join(&members.instance, "\n"))?;
        if !members.statics.is_empty() {
            if !members.instance.is_empty() {
                writeln!(f)?;
            }
            write!(f, "companion object {{\n{}\n}}", Join(&members.statics, "\n"))?;
        }
        Ok(())
    }
}

/// ` { members }`, or nothing for an empty body.
struct Body<'a, I, S>(&'a crate::ast::Members<I, S>);

impl<I: fmt::Display, S: fmt::Display> fmt::Display for Body<'_, I, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        write!(f, " {{\n{}\n}}", MemberList(self.0))
    }
}

// ============================================================================
// MEMBERS
// ============================================================================

impl fmt::Display for ClassMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassMember::Declaration(declaration) => declaration.fmt(f),
            ClassMember::Constructor(constructor) => constructor.fmt(f),
            ClassMember::InitBlock(init) => init.fmt(f),
        }
    }
}

impl fmt::Display for SingletonMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SingletonMember::Declaration(declaration) => declaration.fmt(f),
            SingletonMember::InitBlock(init) => init.fmt(f),
        }
    }
}

impl fmt::Display for InitBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "init {}", self.body)
    }
}

impl fmt::Display for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}constructor({})",
            AnnotationLines(&self.annotations),
            visibility(self.visibility),
            Join(&self.parameters, ", ")
        )?;
        if !self.delegations.is_empty() {
            write!(f, " : {}", Join(&self.delegations, ", "))?;
        }
        if let Some(body) = &self.body {
            write!(f, " {}", body)?;
        }
        Ok(())
    }
}

impl fmt::Display for ConstructorDelegation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match self.target {
            DelegationTarget::This => "this",
            DelegationTarget::Super => "super",
        };
        write!(f, "{}({})", target, Join(&self.arguments, ", "))
    }
}

// ============================================================================
// FUNCTIONS AND PROPERTIES
// ============================================================================

fn is_override(annotation: &Annotation) -> bool {
    annotation.name == "Override"
}

fn inheritance(modifier: Option<InheritanceModifier>) -> &'static str {
    match modifier {
        Some(InheritanceModifier::Abstract) => "abstract ",
        Some(InheritanceModifier::Final) => "final ",
        None => "",
    }
}

impl fmt::Display for FunctionDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.throws.is_empty() {
            write!(f, "@Throws(")?;
            let mut first = true;
            for exception in &self.throws {
                if !first {
                    write!(f, ", ")?;
                }
                first = false;
                write!(f, "{}::class", exception)?;
            }
            writeln!(f, ")")?;
        }
        if self.modifiers.contains(&FunctionModifier::Strictfp) {
            writeln!(f, "@Strictfp")?;
        }
        if self.modifiers.contains(&FunctionModifier::Synchronized) {
            writeln!(f, "@Synchronized")?;
        }
        for annotation in self.annotations.iter().filter(|a| !is_override(a)) {
            writeln!(f, "{}", annotation)?;
        }
        write!(f, "{}", visibility(self.visibility))?;
        if self.annotations.iter().any(is_override) {
            write!(f, "override ")?;
        }
        write!(f, "{}", inheritance(self.inheritance))?;
        for modifier in &self.modifiers {
            match modifier {
                FunctionModifier::Inline => write!(f, "inline ")?,
                FunctionModifier::Tailrec => write!(f, "tailrec ")?,
                FunctionModifier::Suspend => write!(f, "suspend ")?,
                FunctionModifier::Native => write!(f, "external ")?,
                FunctionModifier::Static
                | FunctionModifier::Default
                | FunctionModifier::Strictfp
                | FunctionModifier::Synchronized => {}
            }
        }
        write!(f, "fun ")?;
        if !self.type_parameters.is_empty() {
            write!(f, "{} ", TypeParameters(&self.type_parameters))?;
        }
        write!(f, "{}({})", self.name, Join(&self.parameters, ", "))?;
        if let Some(return_type) = &self.return_type {
            write!(f, ": {}", return_type)?;
        }
        write!(f, "{}", WhereClause(&self.type_parameters))?;
        match &self.body {
            Some(body) => FunctionBodyText(body).fmt(f),
            None => Ok(()),
        }
    }
}

/// ` {...}` for blocks, ` = expr` for expression bodies.
struct FunctionBodyText<'a>(&'a FunctionBody);

impl fmt::Display for FunctionBodyText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Either::A(block) => write!(f, " {}", block),
            Either::B(expression) => write!(f, " = {}", expression),
        }
    }
}

/// Everything before the property name, shared by every property of one declaration.
struct PropertyPrefix<'a>(&'a PropertyDeclaration);

impl fmt::Display for PropertyPrefix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let declaration = self.0;
        let has = |modifier: PropertyModifier| declaration.modifiers.contains(&modifier);
        if has(PropertyModifier::Transient) {
            writeln!(f, "@Transient")?;
        }
        if has(PropertyModifier::Volatile) {
            writeln!(f, "@Volatile")?;
        }
        for annotation in declaration.annotations.iter().filter(|a| !is_override(a)) {
            writeln!(f, "{}", annotation)?;
        }
        write!(f, "{}", visibility(declaration.visibility))?;
        if declaration.annotations.iter().any(is_override) {
            write!(f, "override ")?;
        }
        if declaration.inheritance == Some(InheritanceModifier::Abstract) {
            write!(f, "abstract ")?;
        }
        if has(PropertyModifier::Const) {
            write!(f, "const ")?;
        }
        let immutable = has(PropertyModifier::Const)
            || has(PropertyModifier::Readonly)
            || declaration.inheritance == Some(InheritanceModifier::Final);
        write!(f, "{}", if immutable { "val " } else { "var " })
    }
}

impl fmt::Display for PropertyDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for property in &self.properties {
            if !first {
                writeln!(f)?;
            }
            first = false;
            write!(f, "{}{}", PropertyPrefix(self), property.name)?;
            if let Some(ty) = &self.ty {
                write!(f, ": {}", ty)?;
            }
            if let Some(value) = &property.value {
                write!(f, " = {}", value)?;
            }
            if let Some(delegate) = &property.delegate {
                write!(f, " by {}", delegate)?;
            }
            if let Some(getter) = &property.getter {
                write!(f, "\n{}", getter)?;
            }
            if let Some(setter) = &property.setter {
                write!(f, "\n{}", setter)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Getter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for annotation in &self.annotations {
            write!(f, "{} ", annotation)?;
        }
        match &self.body {
            Some(body) => write!(f, "get(){}", FunctionBodyText(body)),
            None => write!(f, "get"),
        }
    }
}

impl fmt::Display for Setter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for annotation in &self.annotations {
            write!(f, "{} ", annotation)?;
        }
        match &self.body {
            Some(body) => write!(
                f,
                "set({}){}",
                self.parameter.as_deref().unwrap_or("value"),
                FunctionBodyText(body)
            ),
            None => write!(f, "set"),
        }
    }
}

impl fmt::Display for ValueParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        parameter(f, self, "")
    }
}

fn parameter(f: &mut fmt::Formatter<'_>, parameter: &ValueParameter, keyword: &str) -> fmt::Result {
    for annotation in &parameter.annotations {
        write!(f, "{} ", annotation)?;
    }
    if parameter.vararg {
        write!(f, "vararg ")?;
    }
    write!(f, "{}{}: {}", keyword, parameter.name, parameter.ty)?;
    if let Some(default) = &parameter.default {
        write!(f, " = {}", default)?;
    }
    Ok(())
}

/// Primary-constructor parameters. Mutable ones always become `var`
/// properties; the rest use `immutable` when given, or stay plain parameters.
struct PropertyParameters<'a>(&'a [ValueParameter], Option<&'a str>);

impl fmt::Display for PropertyParameters<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for value in self.0 {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            let keyword = if value.mutable { "var " } else { self.1.unwrap_or("") };
            parameter(f, value, keyword)?;
        }
        Ok(())
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnType::Type(ty) => ty.fmt(f),
            ReturnType::Void => write!(f, "Unit"),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse_file;
    use pretty_assertions::assert_eq;

    fn render(source: &str) -> String {
        let file = parse_file(source, "render.qv").unwrap();
        file.declarations[0].to_string()
    }

    #[test]
    fn class_statics_move_into_a_companion() {
        assert_eq!(
            render("class Foo(int x) { static var y = 1; }"),
            "internal open class Foo(x: Int) {\ncompanion object {\ninternal var y = 1\n}\n}"
        );
    }

    #[test]
    fn sequential_enum_restarts_after_explicit_values() {
        assert_eq!(
            render("enum Color : int { A, B, C = 10, D }"),
            "internal object Color {\nconst val A: Int = 0\nconst val B: Int = 1\nconst val C: Int = 10\nconst val D: Int = 10 + 1\n}"
        );
    }

    #[test]
    fn bitfield_enum_uses_bit_positions() {
        assert_eq!(
            render("bitfield enum Flags : int { A, B, C << 4, D }"),
            "internal object Flags {\nconst val A: Int = 1 shl 0\nconst val B: Int = 1 shl 1\nconst val C: Int = 1 shl 4\nconst val D: Int = 1 shl 4 + 1\n}"
        );
    }

    #[test]
    fn enum_values_fold_in_order() {
        let file = parse_file("enum E : long { A = 5, B, C, D = 2, F }", "enum.qv").unwrap();
        let Declaration::Type(TypeDeclaration {
            kind: TypeDeclarationKind::PrimitiveEnum(enumeration),
            ..
        }) = &file.declarations[0]
        else {
            panic!("expected a primitive enum");
        };
        let values: Vec<String> = enum_values(enumeration).iter().map(ToString::to_string).collect();
        assert_eq!(values, vec!["5", "5 + 1", "5 + 2", "2", "2 + 1"]);
    }

    #[test]
    fn records_become_data_classes() {
        assert_eq!(
            render("record Point(int x, var int y);"),
            "internal data class Point(val x: Int, var y: Int)"
        );
    }

    #[test]
    fn function_prefix_annotations() {
        assert_eq!(
            render("@Override public synchronized String name() throws IOException = \"x\";"),
            "@Throws(IOException::class)\n@Synchronized\npublic override fun name(): String = \"x\""
        );
        assert_eq!(render("native void poke();"), "internal external fun poke(): Unit");
    }

    #[test]
    fn readonly_properties_are_vals() {
        assert_eq!(
            render("private readonly int a = 1, b = 2;"),
            "private val a: Int = 1\nprivate val b: Int = 2"
        );
        assert_eq!(render("volatile var flag = true;"), "@Volatile\ninternal var flag = true");
    }

    #[test]
    fn singleton_members_have_no_companion() {
        assert_eq!(
            render("object Registry { int count = 0; }"),
            "internal object Registry {\ninternal var count: Int = 0\n}"
        );
    }

    #[test]
    fn enum_class_lists_entries_before_members() {
        assert_eq!(
            render("enum class Planet(double mass) { EARTH(5.97), MARS(0.642); }"),
            "internal enum class Planet(mass: Double) {\nEARTH(5.97),\nMARS(0.642);\n}"
        );
    }

    #[test]
    fn supertypes_and_delegation() {
        assert_eq!(
            render("final class A : Base(1), Named, Shape by delegate;"),
            "internal class A : Base(1), Named, Shape by delegate"
        );
    }
}
