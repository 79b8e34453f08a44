//! Module description parser and visitor.

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use tracing::debug;

use super::{Dependency, DependencyKind, Plugin, QuovaModule, Repository, Setting};
use crate::diagnostics::{to_error_source, QuovaError, SourceArc, Span};
use crate::either::Either;
use crate::err_ctx;
use crate::syntax::parser::convert_parse_error;

#[derive(Parser)]
#[grammar = "module/module.pest"]
pub struct ModuleParser;

type Result<T> = std::result::Result<T, QuovaError>;

/// Parses and visits a module description.
pub fn parse_module(source_text: &str, name: &str) -> Result<QuovaModule> {
    let source = to_error_source(name, source_text);
    let tree = ModuleParser::parse(Rule::module_file, source_text)
        .map_err(|e| convert_parse_error(e, &source))?
        .next()
        .ok_or_else(|| err_ctx!(MissingNode, "module_file", &source, Span::default()))?;
    let module = ModuleVisitor { source }.visit_module(tree)?;
    debug!(
        project = %module.project,
        dependencies = module.dependencies.len(),
        "visited module description"
    );
    Ok(module)
}

fn child<'i>(pair: &Pair<'i, Rule>, rule: Rule) -> Option<Pair<'i, Rule>> {
    pair.clone().into_inner().find(|p| p.as_rule() == rule)
}

fn children<'i>(pair: &Pair<'i, Rule>, rule: Rule) -> impl Iterator<Item = Pair<'i, Rule>> {
    pair.clone().into_inner().filter(move |p| p.as_rule() == rule)
}

fn span(pair: &Pair<Rule>) -> Span {
    Span {
        start: pair.as_span().start(),
        end: pair.as_span().end(),
    }
}

struct ModuleVisitor {
    source: SourceArc,
}

impl ModuleVisitor {
    fn required<'i>(&self, pair: &Pair<'i, Rule>, rule: Rule) -> Result<Pair<'i, Rule>> {
        child(pair, rule).ok_or_else(|| {
            err_ctx!(
                MissingNode,
                format!("expected {:?} in {:?}", rule, pair.as_rule()),
                &self.source,
                span(pair)
            )
        })
    }

    fn text(&self, pair: &Pair<Rule>, rule: Rule) -> Result<String> {
        Ok(self.required(pair, rule)?.as_str().trim().to_string())
    }

    /// Contents of a ``raw `...` `` child, if the pair is one.
    fn raw(&self, pair: &Pair<Rule>) -> Result<Option<String>> {
        match child(pair, Rule::raw) {
            Some(raw) => Ok(Some(self.text(&raw, Rule::raw_content)?)),
            None => Ok(None),
        }
    }

    fn visit_module(&self, pair: Pair<Rule>) -> Result<QuovaModule> {
        let mut module = QuovaModule {
            project: self.text(&self.required(&pair, Rule::project_header)?, Rule::name)?,
            group: self.text(&self.required(&pair, Rule::group_header)?, Rule::name)?,
            version: self.text(&self.required(&pair, Rule::version_header)?, Rule::version_name)?,
            plugins: Vec::new(),
            repositories: Vec::new(),
            dependencies: Vec::new(),
            variables: Vec::new(),
            options: Vec::new(),
        };
        for element in pair.into_inner() {
            match element.as_rule() {
                Rule::plugins => {
                    for plugin in children(&element, Rule::plugin) {
                        module.plugins.push(self.visit_plugin(plugin)?);
                    }
                }
                Rule::repositories => {
                    for repository in children(&element, Rule::repository) {
                        module.repositories.push(self.visit_repository(repository)?);
                    }
                }
                Rule::dependencies => {
                    for dependency in children(&element, Rule::dependency) {
                        module.dependencies.push(self.visit_dependency(dependency)?);
                    }
                }
                Rule::variable => module.variables.push(self.visit_setting(element)?),
                Rule::option => module.options.push(self.visit_setting(element)?),
                _ => {}
            }
        }
        Ok(module)
    }

    fn visit_plugin(&self, pair: Pair<Rule>) -> Result<Either<Plugin, String>> {
        if let Some(raw) = self.raw(&pair)? {
            return Ok(Either::B(raw));
        }
        Ok(Either::A(Plugin {
            id: self.text(&pair, Rule::name)?,
            version: child(&pair, Rule::version_name).map(|v| v.as_str().to_string()),
        }))
    }

    fn visit_repository(&self, pair: Pair<Rule>) -> Result<Repository> {
        match self.raw(&pair)? {
            Some(raw) => Ok(Repository::Raw(raw)),
            None => Ok(Repository::Named(self.text(&pair, Rule::name)?)),
        }
    }

    fn visit_dependency(&self, pair: Pair<Rule>) -> Result<Either<Dependency, String>> {
        if let Some(raw) = self.raw(&pair)? {
            return Ok(Either::B(raw));
        }
        let kind = self.required(&pair, Rule::dependency_kind)?;
        let mut names = children(&pair, Rule::name);
        let (Some(group), Some(artifact)) = (names.next(), names.next()) else {
            return Err(err_ctx!(
                MissingNode,
                "expected group:artifact:version",
                &self.source,
                span(&pair)
            ));
        };
        Ok(Either::A(Dependency {
            kind: DependencyKind::from_keyword(kind.as_str()).ok_or_else(|| {
                err_ctx!(
                    MissingNode,
                    format!("unexpected dependency kind `{}`", kind.as_str()),
                    &self.source,
                    span(&kind)
                )
            })?,
            group: group.as_str().to_string(),
            artifact: artifact.as_str().to_string(),
            version: self.text(&pair, Rule::version_name)?,
        }))
    }

    fn visit_setting(&self, pair: Pair<Rule>) -> Result<Setting> {
        Ok(Setting {
            name: self.text(&pair, Rule::name)?,
            value: self.text(&pair, Rule::text)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorType;
    use pretty_assertions::assert_eq;

    const MODULE: &str = "\
project demo
group com.example
version 1.0.0

plugins {
    application
    org.jetbrains.dokka version 1.4.10
    raw `id 'maven-publish'`
}
repositories { jcenter raw `maven { url 'https://jitpack.io' }` }
dependencies {
    impl com.squareup:kotlinpoet:1.7.2
    runtime org.slf4j:slf4j-simple:${slf4j_version}
    raw `testImplementation 'junit:junit:4.13'`
}
var slf4j_version = '1.7.30'
mainClassName = 'demo.MainQv'
";

    #[test]
    fn headers_and_blocks() {
        let module = parse_module(MODULE, "module.qvm").unwrap();
        assert_eq!(module.project, "demo");
        assert_eq!(module.group, "com.example");
        assert_eq!(module.version, "1.0.0");
        assert_eq!(
            module.plugins,
            vec![
                Either::A(Plugin {
                    id: "application".into(),
                    version: None,
                }),
                Either::A(Plugin {
                    id: "org.jetbrains.dokka".into(),
                    version: Some("1.4.10".into()),
                }),
                Either::B("id 'maven-publish'".into()),
            ]
        );
        assert_eq!(
            module.repositories,
            vec![
                Repository::Named("jcenter".into()),
                Repository::Raw("maven { url 'https://jitpack.io' }".into()),
            ]
        );
    }

    #[test]
    fn dependencies_keep_kind_and_coordinates() {
        let module = parse_module(MODULE, "module.qvm").unwrap();
        assert_eq!(
            module.dependencies[1],
            Either::A(Dependency {
                kind: DependencyKind::RuntimeOnly,
                group: "org.slf4j".into(),
                artifact: "slf4j-simple".into(),
                version: "${slf4j_version}".into(),
            })
        );
        assert!(matches!(&module.dependencies[2], Either::B(raw) if raw.starts_with("testImplementation")));
    }

    #[test]
    fn variables_and_options_are_verbatim() {
        let module = parse_module(MODULE, "module.qvm").unwrap();
        assert_eq!(
            module.variables,
            vec![Setting {
                name: "slf4j_version".into(),
                value: "'1.7.30'".into(),
            }]
        );
        assert_eq!(module.options[0].value, "'demo.MainQv'");
    }

    #[test]
    fn block_keywords_are_not_entries() {
        let module = parse_module(
            "project demo\ngroup g\nversion 1\nplugins { }\nrepositories {}\ndependencies {\n}\n",
            "module.qvm",
        )
        .unwrap();
        assert!(module.plugins.is_empty());
        assert!(module.repositories.is_empty());
        assert!(module.dependencies.is_empty());

        let module = parse_module(
            "project demo\ngroup g\nversion 1\nrepositories { mavenCentral }\n",
            "module.qvm",
        )
        .unwrap();
        assert_eq!(module.repositories, vec![Repository::Named("mavenCentral".into())]);
    }

    #[test]
    fn missing_headers_fail_to_parse() {
        let err = parse_module("group com.example\nversion 1\n", "module.qvm").unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Parse);
    }
}
