//! # Kotlin Renderer
//!
//! Every AST node implements [`fmt::Display`] and prints as Kotlin source.
//! Rendering is a pure recursive walk; desugarings (comprehensions, compound
//! assignment, classic `for`, primitive enums) happen inline while printing.
//!
//! Operands are parenthesized through [`wrap`], which compares the operand's
//! priority against the priority of the operator it sits under.

mod declarations;
mod expressions;
mod statements;
mod types;

use std::fmt;

use crate::ast::{Expression, Import, QuovaFile, Visibility};

pub use declarations::enum_values;

/// A compilation unit together with its optional `@file:JvmName` header.
pub struct KotlinFile<'a> {
    pub file: &'a QuovaFile,
    pub jvm_name: Option<String>,
}

impl fmt::Display for KotlinFile<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = self.file;
        if let Some(shebang) = &file.shebang {
            writeln!(f, "{}", shebang)?;
        }
        if let Some(name) = &self.jvm_name {
            writeln!(f, "@file:JvmName(\"{}\")", name)?;
        }
        if let Some(package) = &file.package {
            writeln!(f, "package {}", package)?;
            writeln!(f)?;
        }
        for import in &file.imports {
            writeln!(f, "{}", import)?;
        }
        for declaration in &file.declarations {
            writeln!(f)?;
            writeln!(f, "{}", declaration)?;
        }
        Ok(())
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.names.is_empty() {
            let mut first = true;
            for name in &self.names {
                if !first {
                    writeln!(f)?;
                }
                first = false;
                write!(f, "import {}.{}", self.path, name)?;
            }
            return Ok(());
        }
        write!(f, "import {}", self.path)?;
        if self.wildcard {
            write!(f, ".*")?;
        }
        if let Some(alias) = &self.alias {
            write!(f, " as {}", alias)?;
        }
        Ok(())
    }
}

/// `items` separated by `separator`.
pub(crate) struct Join<'a, T>(pub &'a [T], pub &'a str);

impl<T: fmt::Display> fmt::Display for Join<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for item in self.0 {
            if !first {
                write!(f, "{}", self.1)?;
            }
            first = false;
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}

/// An operand printed under an operator of priority `enclosing`.
pub(crate) struct Wrapped<'a> {
    expression: &'a Expression,
    enclosing: i32,
}

/// Parenthesizes `expression` iff its priority is strictly greater than `enclosing`.
pub(crate) fn wrap(expression: &Expression, enclosing: i32) -> Wrapped<'_> {
    Wrapped { expression, enclosing }
}

impl fmt::Display for Wrapped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.expression.priority() > self.enclosing {
            write!(f, "({})", self.expression)
        } else {
            write!(f, "{}", self.expression)
        }
    }
}

/// Visibility keyword with its trailing space; local declarations print nothing.
pub(crate) fn visibility(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Public => "public ",
        Visibility::Private => "private ",
        Visibility::Internal => "internal ",
        Visibility::Protected => "protected ",
        Visibility::Local => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn join_separates_only_between_items() {
        assert_eq!(Join(&[1, 2, 3], ", ").to_string(), "1, 2, 3");
        assert_eq!(Join::<i32>(&[], ", ").to_string(), "");
    }

    #[test]
    fn wrap_is_strict() {
        let sum = Expression::Sum(Binary::new(
            Expression::identifier("a"),
            SumOperator::Plus,
            Expression::identifier("b"),
        ));
        assert_eq!(wrap(&sum, priority::PRODUCT).to_string(), "(a + b)");
        assert_eq!(wrap(&sum, priority::SUM).to_string(), "a + b");
        assert_eq!(wrap(&sum, priority::COMPARISON).to_string(), "a + b");
    }

    #[test]
    fn imports_expand_selections() {
        let import = Import {
            path: "a.b".into(),
            wildcard: false,
            names: vec!["C".into(), "D".into()],
            alias: None,
        };
        assert_eq!(import.to_string(), "import a.b.C\nimport a.b.D");
        assert_eq!(Import::standard_library().to_string(), "import quova.*");
        assert_eq!(Import::integer_alias().to_string(), "import kotlin.Int as Integer");
    }

    #[test]
    fn file_header_orders_shebang_annotation_and_package() {
        let file = QuovaFile {
            shebang: Some("#!/usr/bin/env quova".into()),
            package: Some("demo".into()),
            imports: vec![Import::standard_library()],
            declarations: vec![],
        };
        let text = KotlinFile {
            file: &file,
            jvm_name: Some("MainQv".into()),
        }
        .to_string();
        assert_eq!(
            text,
            "#!/usr/bin/env quova\n@file:JvmName(\"MainQv\")\npackage demo\n\nimport quova.*\n"
        );
    }
}
