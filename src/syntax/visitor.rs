//! Parse-tree-to-AST visitor.
//!
//! One `visit_*` method per grammar production, each turning a
//! `Pair<Rule>` into exactly one AST node. The methods are spread over the
//! sibling modules (`declarations`, `statements`, `expressions`, `types`);
//! this module holds the shared plumbing and the file-level productions.
//!
//! The grammar guarantees the presence of most children. When one is absent
//! anyway, the visitor fails with [`QuovaError::MissingNode`] pointing at the
//! enclosing pair instead of producing a malformed tree.

use pest::iterators::Pair;
use tracing::debug;

use super::parser::{get_span, Rule};
use crate::ast::{
    Annotation, AnnotationArgument, Import, QuovaFile, TypeParameter, ValueArgument, ValueParameter,
    VariantTypeParameter, Variance, Visibility,
};
use crate::diagnostics::{QuovaError, SourceArc};
use crate::either::Either;
use crate::err_ctx;

pub(crate) type Result<T> = std::result::Result<T, QuovaError>;

/// Where a declaration appears; decides its default visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    /// Top level and class-like bodies.
    Member,
    /// Interface bodies.
    Interface,
    /// Function bodies, lambdas and initializer blocks.
    Local,
}

impl Scope {
    pub(crate) fn default_visibility(self) -> Visibility {
        match self {
            Scope::Member => Visibility::Internal,
            Scope::Interface => Visibility::Public,
            Scope::Local => Visibility::Local,
        }
    }
}

/// Builds AST nodes for one source unit.
pub struct Visitor {
    source: SourceArc,
}

// ============================================================================
// PARSE TREE HELPERS
// ============================================================================

/// First direct child matching `rule`.
pub(crate) fn child<'i>(pair: &Pair<'i, Rule>, rule: Rule) -> Option<Pair<'i, Rule>> {
    pair.clone().into_inner().find(|p| p.as_rule() == rule)
}

/// All direct children matching `rule`, in source order.
pub(crate) fn children<'i>(pair: &Pair<'i, Rule>, rule: Rule) -> impl Iterator<Item = Pair<'i, Rule>> {
    pair.clone().into_inner().filter(move |p| p.as_rule() == rule)
}

pub(crate) fn has(pair: &Pair<Rule>, rule: Rule) -> bool {
    child(pair, rule).is_some()
}

impl Visitor {
    pub fn new(source: SourceArc) -> Self {
        Visitor { source }
    }

    pub(crate) fn required<'i>(&self, pair: &Pair<'i, Rule>, rule: Rule) -> Result<Pair<'i, Rule>> {
        child(pair, rule).ok_or_else(|| self.missing(pair, &format!("{:?}", rule)))
    }

    /// The first child, whatever its rule.
    pub(crate) fn first<'i>(&self, pair: &Pair<'i, Rule>) -> Result<Pair<'i, Rule>> {
        pair.clone()
            .into_inner()
            .next()
            .ok_or_else(|| self.missing(pair, "child node"))
    }

    pub(crate) fn missing(&self, pair: &Pair<Rule>, what: &str) -> QuovaError {
        err_ctx!(
            MissingNode,
            format!("expected {} in {:?}", what, pair.as_rule()),
            &self.source,
            get_span(pair)
        )
    }

    pub(crate) fn unexpected(&self, pair: &Pair<Rule>) -> QuovaError {
        err_ctx!(
            MissingNode,
            format!("unexpected {:?} `{}`", pair.as_rule(), pair.as_str()),
            &self.source,
            get_span(pair)
        )
    }

    pub(crate) fn unsupported(&self, pair: &Pair<Rule>, what: &str, help: &str) -> QuovaError {
        err_ctx!(Unsupported, what, &self.source, get_span(pair), help)
    }

    /// Text of the direct `simple_identifier` child.
    pub(crate) fn name(&self, pair: &Pair<Rule>) -> Result<String> {
        Ok(self.required(pair, Rule::simple_identifier)?.as_str().to_string())
    }

    pub(crate) fn visibility(&self, pair: &Pair<Rule>, scope: Scope) -> Result<Visibility> {
        match child(pair, Rule::visibility_modifier) {
            Some(modifier) => {
                Visibility::from_keyword(modifier.as_str()).ok_or_else(|| self.unexpected(&modifier))
            }
            None => Ok(scope.default_visibility()),
        }
    }

    // ========================================================================
    // FILE
    // ========================================================================

    pub fn visit_file(&self, pair: Pair<Rule>) -> Result<QuovaFile> {
        let shebang = child(&pair, Rule::shebang_line).map(|p| p.as_str().trim_end().to_string());
        let package = match child(&pair, Rule::package_header) {
            Some(header) => Some(self.required(&header, Rule::identifier)?.as_str().to_string()),
            None => None,
        };

        let mut imports = children(&pair, Rule::import_header)
            .map(|p| self.visit_import(p))
            .collect::<Result<Vec<_>>>()?;
        let declared = imports.len();
        imports.push(Import::standard_library());
        imports.push(Import::integer_alias());
        debug!(declared, total = imports.len(), "appended synthetic imports");

        let declarations = children(&pair, Rule::declaration)
            .map(|p| self.visit_declaration(p, Scope::Member))
            .collect::<Result<Vec<_>>>()?;

        Ok(QuovaFile {
            shebang,
            package,
            imports,
            declarations,
        })
    }

    fn visit_import(&self, pair: Pair<Rule>) -> Result<Import> {
        let names = match child(&pair, Rule::import_list) {
            Some(list) => children(&list, Rule::simple_identifier)
                .map(|p| p.as_str().to_string())
                .collect(),
            None => Vec::new(),
        };
        let alias = match child(&pair, Rule::import_alias) {
            Some(alias) => Some(self.name(&alias)?),
            None => None,
        };
        Ok(Import {
            path: self.required(&pair, Rule::identifier)?.as_str().to_string(),
            wildcard: has(&pair, Rule::import_all),
            names,
            alias,
        })
    }

    // ========================================================================
    // ANNOTATIONS
    // ========================================================================

    pub(crate) fn visit_annotations(&self, pair: &Pair<Rule>) -> Result<Vec<Annotation>> {
        children(pair, Rule::annotation)
            .map(|p| self.visit_annotation(p))
            .collect()
    }

    fn visit_annotation(&self, pair: Pair<Rule>) -> Result<Annotation> {
        let type_arguments = match child(&pair, Rule::type_arguments) {
            Some(arguments) => self.visit_type_arguments(arguments)?,
            None => Vec::new(),
        };
        let arguments = children(&pair, Rule::annotation_argument)
            .map(|argument| -> Result<AnnotationArgument> {
                let name = child(&argument, Rule::simple_identifier).map(|p| p.as_str().to_string());
                let value = match child(&argument, Rule::annotation_array) {
                    Some(array) => Either::B(
                        children(&array, Rule::expression)
                            .map(|e| self.visit_expression(e))
                            .collect::<Result<Vec<_>>>()?,
                    ),
                    None => Either::A(self.visit_expression(self.required(&argument, Rule::expression)?)?),
                };
                Ok(AnnotationArgument { name, value })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Annotation {
            name: self.required(&pair, Rule::identifier)?.as_str().to_string(),
            type_arguments,
            arguments,
        })
    }

    // ========================================================================
    // PARAMETERS AND ARGUMENTS
    // ========================================================================

    pub(crate) fn visit_value_parameters(&self, pair: Pair<Rule>) -> Result<Vec<ValueParameter>> {
        children(&pair, Rule::value_parameter)
            .map(|p| self.visit_value_parameter(p))
            .collect()
    }

    pub(crate) fn visit_value_parameter(&self, pair: Pair<Rule>) -> Result<ValueParameter> {
        let default = match child(&pair, Rule::expression) {
            Some(expression) => Some(self.visit_expression(expression)?),
            None => None,
        };
        Ok(ValueParameter {
            annotations: self.visit_annotations(&pair)?,
            mutable: has(&pair, Rule::kw_var),
            ty: self.visit_type(self.required(&pair, Rule::type_use)?)?,
            vararg: has(&pair, Rule::ellipsis),
            name: self.name(&pair)?,
            default,
        })
    }

    pub(crate) fn visit_value_arguments(&self, pair: Pair<Rule>) -> Result<Vec<ValueArgument>> {
        children(&pair, Rule::value_argument)
            .map(|p| self.visit_value_argument(p))
            .collect()
    }

    pub(crate) fn visit_value_argument(&self, pair: Pair<Rule>) -> Result<ValueArgument> {
        Ok(ValueArgument {
            name: child(&pair, Rule::simple_identifier).map(|p| p.as_str().to_string()),
            value: self.visit_expression(self.required(&pair, Rule::expression)?)?,
        })
    }

    pub(crate) fn visit_type_parameters(&self, pair: Option<Pair<Rule>>) -> Result<Vec<TypeParameter>> {
        let Some(pair) = pair else {
            return Ok(Vec::new());
        };
        children(&pair, Rule::type_parameter)
            .map(|parameter| -> Result<TypeParameter> {
                Ok(TypeParameter {
                    annotations: self.visit_annotations(&parameter)?,
                    reified: has(&parameter, Rule::kw_reified),
                    name: self.name(&parameter)?,
                    constraints: self.visit_constraints(&parameter)?,
                })
            })
            .collect()
    }

    pub(crate) fn visit_variant_type_parameters(
        &self,
        pair: Option<Pair<Rule>>,
    ) -> Result<Vec<VariantTypeParameter>> {
        let Some(pair) = pair else {
            return Ok(Vec::new());
        };
        children(&pair, Rule::variant_type_parameter)
            .map(|parameter| -> Result<VariantTypeParameter> {
                let variance = match child(&parameter, Rule::variance_modifier) {
                    Some(modifier) => {
                        Some(Variance::from_keyword(modifier.as_str()).ok_or_else(|| self.unexpected(&modifier))?)
                    }
                    None => None,
                };
                Ok(VariantTypeParameter {
                    annotations: self.visit_annotations(&parameter)?,
                    variance,
                    name: self.name(&parameter)?,
                    constraints: self.visit_constraints(&parameter)?,
                })
            })
            .collect()
    }

    fn visit_constraints(&self, pair: &Pair<Rule>) -> Result<Vec<crate::ast::Type>> {
        children(pair, Rule::type_use).map(|t| self.visit_type(t)).collect()
    }
}
