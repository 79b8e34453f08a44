//! Gradle output for a [`QuovaModule`].

use std::fmt;

use super::{Dependency, Plugin, QuovaModule, Repository, Setting};

/// `build.gradle` text.
pub struct GradleBuild<'a>(pub &'a QuovaModule);

/// `settings.gradle` text.
pub struct GradleSettings<'a>(pub &'a QuovaModule);

impl fmt::Display for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id '{}'", self.id)?;
        if let Some(version) = &self.version {
            write!(f, " version '{}'", version)?;
        }
        Ok(())
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repository::Named(name) => write!(f, "{}()", name),
            Repository::Raw(raw) => write!(f, "{}", raw),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} \"{}:{}:{}\"",
            self.kind.gradle_name(),
            self.group,
            self.artifact,
            self.version
        )
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

/// `name {` + one tab-indented line per item + `}` and a blank line; nothing when empty.
fn section<T: fmt::Display>(f: &mut fmt::Formatter<'_>, name: &str, items: &[T]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(f, "{} {{", name)?;
    for item in items {
        writeln!(f, "\t{}", item)?;
    }
    writeln!(f, "}}")?;
    writeln!(f)
}

impl fmt::Display for GradleBuild<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let module = self.0;
        section(f, "plugins", &module.plugins)?;
        writeln!(f, "group = \"{}\"", module.group)?;
        writeln!(f, "version = \"{}\"", module.version)?;
        writeln!(f)?;
        section(f, "ext", &module.variables)?;
        section(f, "repositories", &module.repositories)?;
        section(f, "dependencies", &module.dependencies)?;
        let mut first = true;
        for option in &module.options {
            if !first {
                writeln!(f)?;
            }
            first = false;
            writeln!(f, "{}", option)?;
        }
        Ok(())
    }
}

impl fmt::Display for GradleSettings<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rootProject.name = '{}'", self.0.project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::either::Either;
    use crate::module::{parse_module, DependencyKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn minimal_module_gets_the_baseline() {
        let module = parse_module("project demo\ngroup com.example\nversion 0.1\n", "module.qvm")
            .unwrap()
            .with_baseline("1.4.10", "mavenCentral");
        assert_eq!(
            GradleBuild(&module).to_string(),
            "plugins {\n\tid 'org.jetbrains.kotlin.jvm' version '1.4.10'\n}\n\n\
             group = \"com.example\"\nversion = \"0.1\"\n\n\
             repositories {\n\tmavenCentral()\n}\n\n"
        );
        assert_eq!(GradleSettings(&module).to_string(), "rootProject.name = 'demo'\n");
    }

    #[test]
    fn declared_baseline_repository_appears_once() {
        let module = parse_module(
            "project demo\ngroup g\nversion 1\nrepositories { mavenCentral jcenter mavenCentral }\n",
            "module.qvm",
        )
        .unwrap()
        .with_baseline("1.4.10", "mavenCentral");
        let text = GradleBuild(&module).to_string();
        assert_eq!(text.matches("mavenCentral()").count(), 1);
        assert!(text.contains("repositories {\n\tmavenCentral()\n\tjcenter()\n}"));
    }

    #[test]
    fn sections_render_in_order() {
        let module = parse_module(
            "project demo\ngroup g\nversion 1\n\
             dependencies { compile a:b:1 raw `implementation files('libs/x.jar')` }\n\
             var v = 2\nsourceCompatibility = 1.8\ntargetCompatibility = 1.8\n",
            "module.qvm",
        )
        .unwrap();
        assert_eq!(
            module.dependencies[0],
            Either::A(Dependency {
                kind: DependencyKind::CompileOnly,
                group: "a".into(),
                artifact: "b".into(),
                version: "1".into(),
            })
        );
        let text = GradleBuild(&module).to_string();
        let ext = text.find("ext {\n\tv = 2\n}").unwrap();
        let dependencies = text
            .find("dependencies {\n\tcompileOnly \"a:b:1\"\n\timplementation files('libs/x.jar')\n}")
            .unwrap();
        assert!(ext < dependencies);
        assert!(text.ends_with("sourceCompatibility = 1.8\n\ntargetCompatibility = 1.8\n"));
    }
}
