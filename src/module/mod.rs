//! # Module Descriptions
//!
//! The second pipeline: a `module.qvm` file describing a project is parsed
//! with `module.pest`, visited into a [`QuovaModule`], completed with the
//! mandatory baseline entries, and rendered as `build.gradle` plus
//! `settings.gradle`.

mod parser;
mod render;

use serde::Serialize;
use tracing::debug;

use crate::either::Either;

pub use parser::{parse_module, ModuleParser};
pub use render::{GradleBuild, GradleSettings};

/// The Gradle plugin every compiled project needs.
pub const KOTLIN_PLUGIN: &str = "org.jetbrains.kotlin.jvm";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuovaModule {
    pub project: String,
    pub group: String,
    pub version: String,
    /// Declared plugins, or raw Gradle lines.
    pub plugins: Vec<Either<Plugin, String>>,
    pub repositories: Vec<Repository>,
    /// Declared dependencies, or raw Gradle lines.
    pub dependencies: Vec<Either<Dependency, String>>,
    /// `var name = value`, rendered into `ext { }`.
    pub variables: Vec<Setting>,
    /// `name = value` passed through as top-level Gradle statements.
    pub options: Vec<Setting>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plugin {
    pub id: String,
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Repository {
    /// `mavenCentral`, rendered as `mavenCentral()`.
    Named(String),
    Raw(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DependencyKind {
    Implementation,
    CompileOnly,
    RuntimeOnly,
}

impl DependencyKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "impl" => Some(DependencyKind::Implementation),
            "compile" => Some(DependencyKind::CompileOnly),
            "runtime" => Some(DependencyKind::RuntimeOnly),
            _ => None,
        }
    }

    pub fn gradle_name(self) -> &'static str {
        match self {
            DependencyKind::Implementation => "implementation",
            DependencyKind::CompileOnly => "compileOnly",
            DependencyKind::RuntimeOnly => "runtimeOnly",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub kind: DependencyKind,
    pub group: String,
    pub artifact: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Setting {
    pub name: String,
    pub value: String,
}

/// Where a baseline entry goes when it has to be added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Front,
    Back,
}

/// Leaves exactly one entry equal to `baseline` in `items`.
///
/// `Front` always moves the baseline to the start; `Back` keeps the first
/// declared copy where it is, or appends one when none was declared.
fn ensure_once<T: PartialEq>(items: Vec<T>, baseline: T, placement: Placement) -> Vec<T> {
    let mut seen = placement == Placement::Front;
    let mut kept: Vec<T> = items
        .into_iter()
        .filter(|item| {
            if *item != baseline {
                return true;
            }
            let keep = !seen;
            seen = true;
            keep
        })
        .collect();
    match placement {
        Placement::Front => kept.insert(0, baseline),
        Placement::Back if !seen => kept.push(baseline),
        Placement::Back => {}
    }
    kept
}

impl QuovaModule {
    /// Adds the Kotlin plugin and the baseline repository, each exactly once.
    pub fn with_baseline(mut self, kotlin_version: &str, repository: &str) -> Self {
        let plugin = Either::A(Plugin {
            id: KOTLIN_PLUGIN.to_string(),
            version: Some(kotlin_version.to_string()),
        });
        let declared = (self.plugins.len(), self.repositories.len());
        self.plugins = ensure_once(self.plugins, plugin, Placement::Front);
        self.repositories = ensure_once(
            self.repositories,
            Repository::Named(repository.to_string()),
            Placement::Back,
        );
        debug!(
            project = %self.project,
            declared_plugins = declared.0,
            plugins = self.plugins.len(),
            declared_repositories = declared.1,
            repositories = self.repositories.len(),
            "ensured baseline plugin and repository"
        );
        self
    }
}
