//! Declaration productions.
//!
//! Every class-like body is partitioned into instance and static members
//! right after its members are visited.

use pest::iterators::Pair;
use tracing::debug;

use super::parser::Rule;
use super::visitor::{child, children, has, Result, Scope, Visitor};
use crate::ast::*;
use crate::either::Either;

impl Visitor {
    pub(crate) fn visit_declaration(&self, pair: Pair<Rule>, scope: Scope) -> Result<Declaration> {
        let inner = self.first(&pair)?;
        match inner.as_rule() {
            Rule::type_declaration => Ok(Declaration::Type(self.visit_type_declaration(inner, scope)?)),
            Rule::function_declaration => Ok(Declaration::Function(self.visit_function(inner, scope)?)),
            Rule::property_declaration => Ok(Declaration::Property(self.visit_property(inner, scope)?)),
            _ => Err(self.unexpected(&inner)),
        }
    }

    fn visit_type_declaration(&self, pair: Pair<Rule>, scope: Scope) -> Result<TypeDeclaration> {
        let body = pair
            .clone()
            .into_inner()
            .find(|p| !matches!(p.as_rule(), Rule::annotation | Rule::visibility_modifier))
            .ok_or_else(|| self.missing(&pair, "type declaration body"))?;

        let kind = match body.as_rule() {
            Rule::class_declaration => TypeDeclarationKind::Class(self.visit_class(body)?),
            Rule::singleton_declaration => TypeDeclarationKind::Singleton(self.visit_singleton(body)?),
            Rule::interface_declaration => TypeDeclarationKind::Interface(self.visit_interface(body)?),
            Rule::enum_class_declaration => TypeDeclarationKind::EnumClass(self.visit_enum_class(body)?),
            Rule::primitive_enum_declaration => {
                TypeDeclarationKind::PrimitiveEnum(self.visit_primitive_enum(body)?)
            }
            Rule::record_declaration => TypeDeclarationKind::Record(self.visit_record(body)?),
            Rule::inline_class_declaration => TypeDeclarationKind::InlineClass(self.visit_inline_class(body)?),
            Rule::annotation_declaration => TypeDeclarationKind::Annotation(self.visit_annotation_type(body)?),
            _ => return Err(self.unexpected(&body)),
        };

        Ok(TypeDeclaration {
            annotations: self.visit_annotations(&pair)?,
            visibility: self.visibility(&pair, scope)?,
            kind,
        })
    }

    // ========================================================================
    // TYPE DECLARATIONS
    // ========================================================================

    fn visit_class(&self, pair: Pair<Rule>) -> Result<ClassDeclaration> {
        let parameters = match child(&pair, Rule::value_parameters) {
            Some(parameters) => Some(self.visit_value_parameters(parameters)?),
            None => None,
        };
        let name = self.name(&pair)?;
        Ok(ClassDeclaration {
            inheritance: self.inheritance(&pair)?,
            sealed: has(&pair, Rule::kw_sealed),
            inner: has(&pair, Rule::kw_inner),
            type_parameters: self.visit_variant_type_parameters(child(&pair, Rule::variant_type_parameters))?,
            parameters,
            supertypes: self.visit_supertypes(&pair)?,
            members: self.class_body(&name, child(&pair, Rule::class_body))?,
            name,
        })
    }

    fn visit_singleton(&self, pair: Pair<Rule>) -> Result<SingletonDeclaration> {
        let body = self.required(&pair, Rule::singleton_body)?;
        let all = body
            .into_inner()
            .map(|member| -> Result<SingletonMember> {
                match member.as_rule() {
                    Rule::init_block => Ok(SingletonMember::InitBlock(self.visit_init_block(member)?)),
                    Rule::declaration => Ok(SingletonMember::Declaration(
                        self.visit_declaration(member, Scope::Member)?,
                    )),
                    _ => Err(self.unexpected(&member)),
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(SingletonDeclaration {
            name: self.name(&pair)?,
            supertypes: self.visit_supertypes(&pair)?,
            members: partition_singleton_members(all),
        })
    }

    fn visit_interface(&self, pair: Pair<Rule>) -> Result<InterfaceDeclaration> {
        let all = match child(&pair, Rule::interface_body) {
            Some(body) => children(&body, Rule::declaration)
                .map(|d| self.visit_declaration(d, Scope::Interface))
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };
        let name = self.name(&pair)?;
        let members = partition_members(all);
        debug!(
            declaration = %name,
            instance = members.instance.len(),
            statics = members.statics.len(),
            "partitioned interface members"
        );
        Ok(InterfaceDeclaration {
            name,
            type_parameters: self.visit_variant_type_parameters(child(&pair, Rule::variant_type_parameters))?,
            supertypes: children(&pair, Rule::user_type)
                .map(|t| self.visit_user_type(t))
                .collect::<Result<Vec<_>>>()?,
            members,
        })
    }

    fn visit_enum_class(&self, pair: Pair<Rule>) -> Result<EnumClassDeclaration> {
        let body = self.required(&pair, Rule::enum_class_body)?;
        let entries = children(&body, Rule::enum_entry)
            .map(|entry| self.visit_enum_entry(entry))
            .collect::<Result<Vec<_>>>()?;
        let parameters = match child(&pair, Rule::value_parameters) {
            Some(parameters) => Some(self.visit_value_parameters(parameters)?),
            None => None,
        };
        let name = self.name(&pair)?;
        Ok(EnumClassDeclaration {
            type_parameters: self.visit_variant_type_parameters(child(&pair, Rule::variant_type_parameters))?,
            parameters,
            supertypes: self.visit_supertypes(&pair)?,
            entries,
            members: self.class_body(&name, Some(body))?,
            name,
        })
    }

    fn visit_enum_entry(&self, pair: Pair<Rule>) -> Result<EnumEntry> {
        let arguments = match child(&pair, Rule::value_arguments) {
            Some(arguments) => self.visit_value_arguments(arguments)?,
            None => Vec::new(),
        };
        let body = match child(&pair, Rule::class_body) {
            Some(body) => Some(self.class_members(body)?),
            None => None,
        };
        Ok(EnumEntry {
            annotations: self.visit_annotations(&pair)?,
            name: self.name(&pair)?,
            arguments,
            body,
        })
    }

    fn visit_primitive_enum(&self, pair: Pair<Rule>) -> Result<PrimitiveEnumDeclaration> {
        let entries = children(&pair, Rule::primitive_enum_entry)
            .map(|entry| -> Result<PrimitiveEnumEntry> {
                let value = match child(&entry, Rule::primitive_enum_value) {
                    Some(value) => Some(EnumValue {
                        kind: if has(&value, Rule::enum_shift) {
                            EnumValueKind::Shift
                        } else {
                            EnumValueKind::Assign
                        },
                        value: self.visit_expression(self.required(&value, Rule::expression)?)?,
                    }),
                    None => None,
                };
                Ok(PrimitiveEnumEntry {
                    name: self.name(&entry)?,
                    value,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(PrimitiveEnumDeclaration {
            bitfield: has(&pair, Rule::kw_bitfield),
            ty: PrimitiveType {
                kind: self.primitive_kind(&self.required(&pair, Rule::primitive_type_no_array)?)?,
                array: false,
            },
            name: self.name(&pair)?,
            entries,
        })
    }

    fn visit_record(&self, pair: Pair<Rule>) -> Result<RecordDeclaration> {
        let name = self.name(&pair)?;
        Ok(RecordDeclaration {
            type_parameters: self.visit_type_parameters(child(&pair, Rule::type_parameters))?,
            parameters: self.visit_value_parameters(self.required(&pair, Rule::value_parameters)?)?,
            supertypes: self.visit_supertypes(&pair)?,
            members: self.class_body(&name, child(&pair, Rule::class_body))?,
            name,
        })
    }

    fn visit_inline_class(&self, pair: Pair<Rule>) -> Result<InlineClassDeclaration> {
        let name = self.name(&pair)?;
        Ok(InlineClassDeclaration {
            parameter: self.visit_value_parameter(self.required(&pair, Rule::value_parameter)?)?,
            supertypes: self.visit_supertypes(&pair)?,
            members: self.class_body(&name, child(&pair, Rule::class_body))?,
            name,
        })
    }

    fn visit_annotation_type(&self, pair: Pair<Rule>) -> Result<AnnotationDeclaration> {
        let name = self.name(&pair)?;
        let body = child(&pair, Rule::annotation_body);
        let parameters = match &body {
            Some(body) => children(body, Rule::annotation_parameter)
                .map(|parameter| -> Result<AnnotationParameter> {
                    let default = match child(&parameter, Rule::expression) {
                        Some(default) => Some(self.visit_expression(default)?),
                        None => None,
                    };
                    Ok(AnnotationParameter {
                        annotations: self.visit_annotations(&parameter)?,
                        ty: self.visit_type(self.required(&parameter, Rule::type_use)?)?,
                        name: self.name(&parameter)?,
                        default,
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };
        Ok(AnnotationDeclaration {
            parameters,
            members: self.class_body(&name, body)?,
            name,
        })
    }

    fn visit_supertypes(&self, pair: &Pair<Rule>) -> Result<Vec<Supertype>> {
        children(pair, Rule::supertype)
            .map(|supertype| -> Result<Supertype> {
                let arguments = match child(&supertype, Rule::value_arguments) {
                    Some(arguments) => Some(Some(self.visit_value_arguments(arguments)?)),
                    None => None,
                };
                let delegate = match child(&supertype, Rule::expression) {
                    Some(delegate) => Some(self.visit_expression(delegate)?),
                    None => None,
                };
                Ok(Supertype {
                    ty: self.visit_user_type(self.required(&supertype, Rule::user_type)?)?,
                    initializer: Either::catching_a(arguments, delegate, || None),
                })
            })
            .collect()
    }

    // ========================================================================
    // MEMBERS
    // ========================================================================

    /// Visits the class members among `body`'s children and partitions them.
    fn class_body(
        &self,
        name: &str,
        body: Option<Pair<Rule>>,
    ) -> Result<Members<ClassMember, SingletonMember>> {
        let all = match body {
            Some(body) => self.class_members(body)?,
            None => Vec::new(),
        };
        let members = partition_members(all);
        debug!(
            declaration = %name,
            instance = members.instance.len(),
            statics = members.statics.len(),
            "partitioned members"
        );
        Ok(members)
    }

    fn class_members(&self, body: Pair<Rule>) -> Result<Vec<ClassMember>> {
        body.into_inner()
            .filter_map(|member| match member.as_rule() {
                Rule::constructor_declaration => Some(self.visit_constructor(member).map(ClassMember::Constructor)),
                Rule::init_block => Some(self.visit_init_block(member).map(ClassMember::InitBlock)),
                Rule::declaration => Some(
                    self.visit_declaration(member, Scope::Member)
                        .map(ClassMember::Declaration),
                ),
                _ => None,
            })
            .collect()
    }

    fn visit_constructor(&self, pair: Pair<Rule>) -> Result<Constructor> {
        let delegations = children(&pair, Rule::constructor_delegation)
            .map(|delegation| -> Result<ConstructorDelegation> {
                Ok(ConstructorDelegation {
                    target: if has(&delegation, Rule::this_literal) {
                        DelegationTarget::This
                    } else {
                        DelegationTarget::Super
                    },
                    arguments: self.visit_value_arguments(self.required(&delegation, Rule::value_arguments)?)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let body = match child(&pair, Rule::block) {
            Some(block) => Some(self.visit_block(block)?),
            None => None,
        };
        Ok(Constructor {
            annotations: self.visit_annotations(&pair)?,
            visibility: self.visibility(&pair, Scope::Member)?,
            parameters: self.visit_value_parameters(self.required(&pair, Rule::value_parameters)?)?,
            delegations,
            body,
        })
    }

    fn visit_init_block(&self, pair: Pair<Rule>) -> Result<InitBlock> {
        Ok(InitBlock {
            is_static: has(&pair, Rule::kw_static),
            body: self.visit_block(self.required(&pair, Rule::block)?)?,
        })
    }

    // ========================================================================
    // FUNCTIONS AND PROPERTIES
    // ========================================================================

    fn inheritance(&self, pair: &Pair<Rule>) -> Result<Option<InheritanceModifier>> {
        match child(pair, Rule::inheritance_modifier) {
            Some(modifier) => Ok(Some(
                InheritanceModifier::from_keyword(modifier.as_str()).ok_or_else(|| self.unexpected(&modifier))?,
            )),
            None => Ok(None),
        }
    }

    fn visit_function(&self, pair: Pair<Rule>, scope: Scope) -> Result<FunctionDeclaration> {
        let modifiers = children(&pair, Rule::function_modifier_keyword)
            .map(|m| FunctionModifier::from_keyword(m.as_str()).ok_or_else(|| self.unexpected(&m)))
            .collect::<Result<Vec<_>>>()?;
        let return_type = match child(&pair, Rule::type_or_void) {
            Some(ty) => Some(self.visit_type_or_void(ty)?),
            None => None,
        };
        let throws = match child(&pair, Rule::throws_clause) {
            Some(clause) => children(&clause, Rule::user_type)
                .map(|t| self.visit_user_type(t))
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };
        let body = match child(&pair, Rule::function_body) {
            Some(body) => Some(self.visit_function_body(body)?),
            None => None,
        };
        Ok(FunctionDeclaration {
            annotations: self.visit_annotations(&pair)?,
            visibility: self.visibility(&pair, scope)?,
            inheritance: self.inheritance(&pair)?,
            modifiers,
            type_parameters: self.visit_type_parameters(child(&pair, Rule::type_parameters))?,
            return_type,
            name: self.name(&pair)?,
            parameters: self.visit_value_parameters(self.required(&pair, Rule::value_parameters)?)?,
            throws,
            body,
        })
    }

    fn visit_function_body(&self, pair: Pair<Rule>) -> Result<FunctionBody> {
        let block = child(&pair, Rule::block).map(|b| self.visit_block(b)).transpose()?;
        let expression = child(&pair, Rule::expression)
            .map(|e| self.visit_expression(e))
            .transpose()?;
        Either::from_options(block, expression).ok_or_else(|| self.missing(&pair, "block or expression"))
    }

    fn visit_property(&self, pair: Pair<Rule>, scope: Scope) -> Result<PropertyDeclaration> {
        let modifiers = children(&pair, Rule::property_modifier_keyword)
            .map(|m| PropertyModifier::from_keyword(m.as_str()).ok_or_else(|| self.unexpected(&m)))
            .collect::<Result<Vec<_>>>()?;
        let properties = children(&pair, Rule::property)
            .map(|property| self.visit_property_entry(property))
            .collect::<Result<Vec<_>>>()?;
        Ok(PropertyDeclaration {
            annotations: self.visit_annotations(&pair)?,
            visibility: self.visibility(&pair, scope)?,
            inheritance: self.inheritance(&pair)?,
            modifiers,
            ty: self.visit_type_or_var(self.required(&pair, Rule::type_or_var)?)?,
            properties,
        })
    }

    fn visit_property_entry(&self, pair: Pair<Rule>) -> Result<Property> {
        let value = match child(&pair, Rule::property_value) {
            Some(value) => Some(self.visit_expression(self.required(&value, Rule::expression)?)?),
            None => None,
        };
        let delegate = match child(&pair, Rule::property_delegate) {
            Some(delegate) => Some(self.visit_expression(self.required(&delegate, Rule::expression)?)?),
            None => None,
        };
        let getter = match child(&pair, Rule::getter) {
            Some(getter) => Some(Getter {
                annotations: self.visit_annotations(&getter)?,
                body: child(&getter, Rule::function_body)
                    .map(|b| self.visit_function_body(b))
                    .transpose()?,
            }),
            None => None,
        };
        let setter = match child(&pair, Rule::setter) {
            Some(setter) => Some(Setter {
                annotations: self.visit_annotations(&setter)?,
                parameter: child(&setter, Rule::simple_identifier).map(|p| p.as_str().to_string()),
                body: child(&setter, Rule::function_body)
                    .map(|b| self.visit_function_body(b))
                    .transpose()?,
            }),
            None => None,
        };
        Ok(Property {
            name: self.name(&pair)?,
            value,
            delegate,
            getter,
            setter,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::either::Either;
    use crate::syntax::parse_file;

    fn type_declaration(source: &str) -> TypeDeclaration {
        let file = parse_file(source, "declarations.qv").unwrap();
        match file.declarations.into_iter().next() {
            Some(Declaration::Type(declaration)) => declaration,
            other => panic!("expected a type declaration, got {:?}", other),
        }
    }

    #[test]
    fn class_statics_are_partitioned() {
        let declaration = type_declaration("class Foo(int x) { static int y = 1; int z = 2; }");
        assert_eq!(declaration.visibility, Visibility::Internal);
        let TypeDeclarationKind::Class(class) = declaration.kind else {
            panic!("expected a class");
        };
        assert_eq!(class.parameters.as_ref().map(Vec::len), Some(1));
        assert_eq!(class.members.instance.len(), 1);
        assert_eq!(class.members.statics.len(), 1);
    }

    #[test]
    fn interface_members_default_to_public() {
        let declaration = type_declaration("interface Shape { double area(); }");
        let TypeDeclarationKind::Interface(interface) = declaration.kind else {
            panic!("expected an interface");
        };
        let Declaration::Function(area) = &interface.members.instance[0] else {
            panic!("expected a function");
        };
        assert_eq!(area.visibility, Visibility::Public);
        assert!(area.body.is_none());
    }

    #[test]
    fn supertype_forms_are_distinguished() {
        let declaration = type_declaration("class A : Base(1), Named, Shape by delegate;");
        let TypeDeclarationKind::Class(class) = declaration.kind else {
            panic!("expected a class");
        };
        assert!(matches!(&class.supertypes[0].initializer, Either::A(Some(args)) if args.len() == 1));
        assert_eq!(class.supertypes[1].initializer, Either::A(None));
        assert!(matches!(&class.supertypes[2].initializer, Either::B(_)));
    }

    #[test]
    fn primitive_enum_entries_keep_their_value_forms() {
        let declaration = type_declaration("bitfield enum Flags : int { A, B = 4, C << 3 }");
        let TypeDeclarationKind::PrimitiveEnum(flags) = declaration.kind else {
            panic!("expected a primitive enum");
        };
        assert!(flags.bitfield);
        assert_eq!(flags.entries[0].value, None);
        assert_eq!(flags.entries[1].value.as_ref().map(|v| v.kind), Some(EnumValueKind::Assign));
        assert_eq!(flags.entries[2].value.as_ref().map(|v| v.kind), Some(EnumValueKind::Shift));
    }

    #[test]
    fn expression_bodies_are_the_second_alternative() {
        let file = parse_file("int twice(int x) = x * 2;", "body.qv").unwrap();
        let Declaration::Function(twice) = &file.declarations[0] else {
            panic!("expected a function");
        };
        assert!(matches!(&twice.body, Some(Either::B(Expression::Product(_)))));
    }

    #[test]
    fn local_declarations_have_local_visibility() {
        let file = parse_file("void main() { int x = 1; }", "local.qv").unwrap();
        let Declaration::Function(main) = &file.declarations[0] else {
            panic!("expected a function");
        };
        let Some(Either::A(block)) = &main.body else {
            panic!("expected a block body");
        };
        let Statement::Declaration(Declaration::Property(x)) = &block.statements[0] else {
            panic!("expected a local property");
        };
        assert_eq!(x.visibility, Visibility::Local);
    }

    #[test]
    fn enum_class_entries_and_members() {
        let declaration = type_declaration("enum class Color(int rgb) { RED(1), GREEN(2) { int x = 1; }; int hex() = rgb; }");
        let TypeDeclarationKind::EnumClass(color) = declaration.kind else {
            panic!("expected an enum class");
        };
        assert_eq!(color.entries.len(), 2);
        assert!(color.entries[1].body.is_some());
        assert_eq!(color.members.instance.len(), 1);
    }
}
