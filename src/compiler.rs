//! # Compiler Pipelines
//!
//! [`compile_source`] and [`compile_module`] are the two unit-level entry
//! points: text in, text out, no file access. [`compile_project`] walks a
//! source tree and writes their results to disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::CompilerConfig;
use crate::diagnostics::QuovaError;
use crate::either::Either;
use crate::err_msg;
use crate::module::{parse_module, GradleBuild, GradleSettings};
use crate::render::KotlinFile;
use crate::syntax::parse_file;

type Result<T> = std::result::Result<T, QuovaError>;

/// The two files a module description compiles to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleOutput {
    pub build_gradle: String,
    pub settings_gradle: String,
}

/// What a project build wrote.
#[derive(Debug, Default)]
pub struct ProjectOutput {
    pub sources: Vec<PathBuf>,
    pub build_files: Vec<PathBuf>,
}

/// `src/util/main.qv` becomes `MainQv`.
pub fn jvm_name(unit: &str) -> String {
    let stem = Path::new(unit)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => format!("{}{}Qv", first.to_uppercase(), chars.as_str()),
        None => "Qv".to_string(),
    }
}

/// Compiles one source unit to Kotlin.
pub fn compile_source(source: &str, name: &str, config: &CompilerConfig) -> Result<String> {
    debug!(unit = name, bytes = source.len(), "compiling source unit");
    let file = parse_file(source, name)?;
    let jvm_name = config.jvm_name_header.then(|| jvm_name(name));
    let text = KotlinFile {
        file: &file,
        jvm_name,
    }
    .to_string();
    debug!(unit = name, bytes = text.len(), "rendered source unit");
    Ok(text)
}

/// Compiles a module description to `build.gradle` and `settings.gradle`.
pub fn compile_module(source: &str, config: &CompilerConfig) -> Result<ModuleOutput> {
    let mut module = parse_module(source, &config.module_file)?
        .with_baseline(&config.kotlin_version, &config.baseline_repository);
    if let Some(jar) = &config.stdlib_jar {
        module
            .dependencies
            .push(Either::B(format!("implementation files('{}')", jar.display())));
    }
    Ok(ModuleOutput {
        build_gradle: GradleBuild(&module).to_string(),
        settings_gradle: GradleSettings(&module).to_string(),
    })
}

fn write(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| QuovaError::io(parent, e))?;
    }
    fs::write(path, text).map_err(|e| QuovaError::io(path, e))
}

/// Finds every source unit under `root`, sorted for a stable build order.
pub fn discover_sources(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| err_msg!(Io, "failed to walk {}: {}", root.display(), e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        files.push(path.to_path_buf());
    }
    files.sort();
    Ok(files)
}

/// Compiles every unit under `dir` into `<out>/src/main/kotlin`, plus the
/// module description at the root of `dir` into `<out>`.
///
/// Units are independent; the first failing unit stops the build.
pub fn compile_project(dir: &Path, out: &Path, config: &CompilerConfig) -> Result<ProjectOutput> {
    let mut output = ProjectOutput::default();
    let kotlin_root = out.join("src").join("main").join("kotlin");
    for path in discover_sources(dir, &config.source_extension)? {
        let relative = path.strip_prefix(dir).unwrap_or(&path);
        let source = fs::read_to_string(&path).map_err(|e| QuovaError::io(&path, e))?;
        let text = compile_source(&source, &relative.to_string_lossy(), config)?;
        let target = kotlin_root.join(relative).with_extension("kt");
        write(&target, &text)?;
        debug!(source = %path.display(), target = %target.display(), "wrote unit");
        output.sources.push(target);
    }

    let module_path = dir.join(&config.module_file);
    if module_path.is_file() {
        let source = fs::read_to_string(&module_path).map_err(|e| QuovaError::io(&module_path, e))?;
        let module = compile_module(&source, config)?;
        for (name, text) in [
            ("build.gradle", &module.build_gradle),
            ("settings.gradle", &module.settings_gradle),
        ] {
            let target = out.join(name);
            write(&target, text)?;
            output.build_files.push(target);
        }
    } else {
        warn!(path = %module_path.display(), "no module description, skipping Gradle files");
    }

    info!(
        units = output.sources.len(),
        build_files = output.build_files.len(),
        out = %out.display(),
        "project compiled"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorType;
    use pretty_assertions::assert_eq;

    #[test]
    fn jvm_names_capitalize_the_stem() {
        assert_eq!(jvm_name("main.qv"), "MainQv");
        assert_eq!(jvm_name("src/util/strings.qv"), "StringsQv");
        assert_eq!(jvm_name("Already.qv"), "AlreadyQv");
    }

    #[test]
    fn header_follows_configuration() {
        let source = "package demo;\nclass Foo {}\n";
        let with = compile_source(source, "foo.qv", &CompilerConfig::default()).unwrap();
        assert!(with.starts_with("@file:JvmName(\"FooQv\")\npackage demo\n"));

        let config = CompilerConfig {
            jvm_name_header: false,
            ..CompilerConfig::default()
        };
        let without = compile_source(source, "foo.qv", &config).unwrap();
        assert!(without.starts_with("package demo\n"));
    }

    #[test]
    fn stdlib_jar_becomes_a_file_dependency() {
        let config = CompilerConfig {
            stdlib_jar: Some(PathBuf::from("libs/quova.jar")),
            ..CompilerConfig::default()
        };
        let output = compile_module("project demo\ngroup g\nversion 1\n", &config).unwrap();
        assert!(output
            .build_gradle
            .contains("dependencies {\n\timplementation files('libs/quova.jar')\n}"));
        assert_eq!(output.settings_gradle, "rootProject.name = 'demo'\n");
    }

    #[test]
    fn parse_failures_abort_the_unit() {
        let err = compile_source("class {", "broken.qv", &CompilerConfig::default()).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Parse);
    }

    #[test]
    fn project_mirrors_the_source_tree() {
        let dir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("util")).unwrap();
        fs::write(dir.path().join("main.qv"), "class Main {}\n").unwrap();
        fs::write(dir.path().join("util/strings.qv"), "class Strings {}\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::write(
            dir.path().join("module.qvm"),
            "project demo\ngroup g\nversion 1\n",
        )
        .unwrap();

        let output = compile_project(dir.path(), out.path(), &CompilerConfig::default()).unwrap();
        let kotlin = out.path().join("src/main/kotlin");
        assert_eq!(
            output.sources,
            vec![kotlin.join("main.kt"), kotlin.join("util/strings.kt")]
        );
        let strings = fs::read_to_string(kotlin.join("util/strings.kt")).unwrap();
        assert!(strings.starts_with("@file:JvmName(\"StringsQv\")\n"));
        assert!(out.path().join("build.gradle").is_file());
        assert_eq!(
            fs::read_to_string(out.path().join("settings.gradle")).unwrap(),
            "rootProject.name = 'demo'\n"
        );
    }
}
