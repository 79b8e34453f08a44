//! Command-line arguments for the `quova` binary, declared with `clap` derive.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "quova",
    version,
    about = "Compiles Quova sources to Kotlin and module descriptions to Gradle builds."
)]
pub struct QuovaArgs {
    /// YAML compiler configuration.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile one source file to Kotlin.
    Compile {
        #[arg(required = true)]
        file: PathBuf,
        /// Write the Kotlin file here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compile a module description to build.gradle and settings.gradle.
    Module {
        #[arg(required = true)]
        file: PathBuf,
        /// Directory to write both Gradle files into instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compile every source file in a directory, plus its module description.
    Build {
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Output root; defaults to the configured output directory inside `dir`.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the Abstract Syntax Tree (AST) of a source file as JSON.
    Ast {
        #[arg(required = true)]
        file: PathBuf,
    },
}
