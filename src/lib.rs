//! # Quova
//!
//! A source-to-source compiler from Quova to Kotlin, plus a compiler from
//! Quova module descriptions to Gradle build files.
//!
//! Both pipelines share one shape: a pest grammar produces a parse tree, a
//! visitor turns it into an immutable AST, and `Display` impls render that
//! AST as target text.

pub use crate::compiler::{compile_module, compile_project, compile_source, ModuleOutput};
pub use crate::config::CompilerConfig;
pub use crate::diagnostics::{ErrorType, QuovaError};
pub use crate::syntax::parse_file;

pub mod ast;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod diagnostics;
pub mod either;
pub mod module;
pub mod render;
pub mod syntax;
