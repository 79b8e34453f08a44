//! The Quova Command-Line Interface.
//!
//! Reads files, hands their text to the compiler pipelines, and writes the
//! results. The pipelines themselves never touch the file system.

use std::path::Path;
use std::{fs, process};

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use tracing::{info, Level};

use crate::cli::args::{Command, QuovaArgs};
use crate::cli::output::Printer;
use crate::compiler::{compile_module, compile_project, compile_source};
use crate::config::CompilerConfig;
use crate::diagnostics::QuovaError;
use crate::syntax::parse_file;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = QuovaArgs::parse();
    init_tracing(args.verbose);
    let printer = Printer::new(args.color);

    let result = load_config(args.config.as_deref()).and_then(|config| match args.command {
        Command::Compile { file, output } => handle_compile(&printer, &config, &file, output.as_deref()),
        Command::Module { file, output } => handle_module(&printer, &config, &file, output.as_deref()),
        Command::Build { dir, output } => handle_build(&printer, &config, &dir, output.as_deref()),
        Command::Ast { file } => handle_ast(&printer, &file),
    });

    if let Err(report) = result {
        printer.report(report);
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<CompilerConfig> {
    match path {
        Some(path) => Ok(CompilerConfig::load(path)?),
        None => Ok(CompilerConfig::default()),
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| QuovaError::io(path, e).into())
}

fn write(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(|e| QuovaError::io(path, e).into())
}

fn handle_compile(printer: &Printer, config: &CompilerConfig, file: &Path, output: Option<&Path>) -> Result<()> {
    let source = read(file)?;
    let kotlin = compile_source(&source, &file.to_string_lossy(), config)?;
    match output {
        Some(target) => {
            write(target, &kotlin)?;
            printer.status("Compiled", &format!("{} -> {}", file.display(), target.display()));
        }
        None => printer.text(&kotlin),
    }
    Ok(())
}

fn handle_module(printer: &Printer, config: &CompilerConfig, file: &Path, output: Option<&Path>) -> Result<()> {
    let source = read(file)?;
    let module = compile_module(&source, config)?;
    match output {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|e| QuovaError::io(dir, e))?;
            write(&dir.join("build.gradle"), &module.build_gradle)?;
            write(&dir.join("settings.gradle"), &module.settings_gradle)?;
            printer.status("Generated", &format!("{}/build.gradle", dir.display()));
            printer.status("Generated", &format!("{}/settings.gradle", dir.display()));
        }
        None => {
            printer.text(&module.build_gradle);
            printer.text(&module.settings_gradle);
        }
    }
    Ok(())
}

fn handle_build(printer: &Printer, config: &CompilerConfig, dir: &Path, output: Option<&Path>) -> Result<()> {
    let out = output.map_or_else(|| dir.join(&config.output_dir), Path::to_path_buf);
    info!(dir = %dir.display(), out = %out.display(), "building project");
    let built = compile_project(dir, &out, config)?;
    for path in built.sources.iter().chain(&built.build_files) {
        printer.status("Wrote", &path.display().to_string());
    }
    printer.status(
        "Finished",
        &format!("{} source file(s) into {}", built.sources.len(), out.display()),
    );
    Ok(())
}

fn handle_ast(printer: &Printer, file: &Path) -> Result<()> {
    let source = read(file)?;
    let ast = parse_file(&source, &file.to_string_lossy())?;
    let json = serde_json::to_string_pretty(&ast).into_diagnostic()?;
    printer.text(&json);
    printer.text("\n");
    Ok(())
}
