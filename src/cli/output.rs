//! User-facing output for the CLI: colored status lines on stderr, results
//! on stdout, and miette reports for failures.

use std::io::Write;

use miette::{MietteHandlerOpts, Report, ReportHandler};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use super::args::ColorMode;

impl From<ColorMode> for ColorChoice {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Auto => ColorChoice::Auto,
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
        }
    }
}

pub struct Printer {
    choice: ColorChoice,
}

impl Printer {
    pub fn new(mode: ColorMode) -> Self {
        if mode != ColorMode::Auto {
            let color = mode == ColorMode::Always;
            let _ = miette::set_hook(Box::new(move |_| -> Box<dyn ReportHandler> {
                Box::new(MietteHandlerOpts::new().color(color).build())
            }));
        }
        Self {
            choice: mode.into(),
        }
    }

    /// `   Compiling main.qv`, with the verb right-aligned in bold green.
    pub fn status(&self, verb: &str, message: &str) {
        let mut stderr = StandardStream::stderr(self.choice);
        let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
        let _ = write!(stderr, "{:>12}", verb);
        let _ = stderr.reset();
        let _ = writeln!(stderr, " {}", message);
    }

    /// Prints generated text to stdout unchanged.
    pub fn text(&self, text: &str) {
        print!("{}", text);
    }

    pub fn report(&self, report: Report) {
        let mut stderr = StandardStream::stderr(self.choice);
        let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
        let _ = write!(stderr, "error");
        let _ = stderr.reset();
        let _ = writeln!(stderr, ": compilation failed");
        eprintln!("{:?}", report);
    }
}
