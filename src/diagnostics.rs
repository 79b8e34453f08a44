//! Unified `miette`-based diagnostics for the Quova compiler.
//!
//! Every stage of both pipelines (source files and module descriptions) fails
//! with a [`QuovaError`]. The first error aborts the unit being compiled; there
//! is no recovery and no partial output.
//!
//! # Error Construction Macros
//!
//! - `err_msg!(Unsupported, "dictionary initializer in {}", name)` for message-only errors.
//! - `err_ctx!(Parse, "Syntax error", src, span)` when a source and span are at hand.
//! - `err_ctx!(Parse, "Syntax error", src, span, help)` to attach a help line.
//!
//! Pass `src` as a `&SourceArc`; the macros clone it.

use std::path::Path;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use serde::Serialize;
use thiserror::Error;

pub type SourceArc = Arc<NamedSource<String>>;

/// Byte range into a source unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Type-safe classification of [`QuovaError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// The front end rejected the input text.
    Parse,
    /// A parse-tree child the grammar guarantees was absent.
    MissingNode,
    /// A construct with no rendering.
    Unsupported,
    /// Reading or writing files.
    Io,
    /// Malformed configuration.
    Config,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Parse => "parse",
            ErrorType::MissingNode => "missing-node",
            ErrorType::Unsupported => "unsupported",
            ErrorType::Io => "io",
            ErrorType::Config => "config",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where an error points, plus an optional help line.
#[derive(Debug, Default)]
pub struct ErrorContext {
    pub source: Option<SourceArc>,
    pub span: Option<Span>,
    pub help: Option<String>,
}

impl ErrorContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_source_and_span(source: SourceArc, span: Span) -> Self {
        Self {
            source: Some(source),
            span: Some(span),
            help: None,
        }
    }
}

/// Every failure the compiler can report.
#[derive(Debug, Error)]
pub enum QuovaError {
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Missing parse-tree node: {message}")]
    MissingNode {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Unsupported construct: {message}")]
    Unsupported {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("I/O error: {message}")]
    Io {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
}

impl QuovaError {
    fn get_ctx(&self) -> &ErrorContext {
        match self {
            QuovaError::Parse { ctx, .. }
            | QuovaError::MissingNode { ctx, .. }
            | QuovaError::Unsupported { ctx, .. }
            | QuovaError::Io { ctx, .. }
            | QuovaError::Config { ctx, .. } => ctx,
        }
    }

    fn message(&self) -> &str {
        match self {
            QuovaError::Parse { message, .. }
            | QuovaError::MissingNode { message, .. }
            | QuovaError::Unsupported { message, .. }
            | QuovaError::Io { message, .. }
            | QuovaError::Config { message, .. } => message,
        }
    }

    pub fn error_type(&self) -> ErrorType {
        match self {
            QuovaError::Parse { .. } => ErrorType::Parse,
            QuovaError::MissingNode { .. } => ErrorType::MissingNode,
            QuovaError::Unsupported { .. } => ErrorType::Unsupported,
            QuovaError::Io { .. } => ErrorType::Io,
            QuovaError::Config { .. } => ErrorType::Config,
        }
    }

    /// Wraps an `std::io::Error` raised while touching `path`.
    pub fn io(path: &Path, error: std::io::Error) -> Self {
        QuovaError::Io {
            message: format!("{}: {}", path.display(), error),
            ctx: ErrorContext::none(),
            source: Some(Box::new(error)),
        }
    }

    /// Wraps a YAML error raised while loading the configuration at `path`.
    pub fn config(path: &Path, error: serde_yaml::Error) -> Self {
        QuovaError::Config {
            message: format!("{}: {}", path.display(), error),
            ctx: ErrorContext::none(),
            source: Some(Box::new(error)),
        }
    }
}

impl Diagnostic for QuovaError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(format!("quova::{}", self.error_type())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.get_ctx()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.get_ctx()
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.get_ctx().span?;
        let len = if span.end > span.start {
            span.end - span.start
        } else {
            1
        };
        let label = LabeledSpan::new(Some(self.message().to_string()), span.start, len);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Names a source text for diagnostics.
pub fn to_error_source<S: AsRef<str>>(name: &str, source: S) -> SourceArc {
    Arc::new(NamedSource::new(name, source.as_ref().to_string()))
}

/// Constructs a `QuovaError` variant with a formatted message and no context.
#[macro_export]
macro_rules! err_msg {
    ($variant:ident, $($arg:tt)+) => {
        $crate::diagnostics::QuovaError::$variant {
            message: format!($($arg)+),
            ctx: $crate::diagnostics::ErrorContext::none(),
            source: None,
        }
    };
}

/// Constructs a `QuovaError` variant pointing into a source unit.
#[macro_export]
macro_rules! err_ctx {
    // Message, src, span, help
    ($variant:ident, $msg:expr, $src:expr, $span:expr, $help:expr) => {
        $crate::diagnostics::QuovaError::$variant {
            message: $msg.to_string(),
            ctx: $crate::diagnostics::ErrorContext {
                source: Some($crate::diagnostics::SourceArc::clone($src)),
                span: Some($span),
                help: Some(format!("{}", $help)),
            },
            source: None,
        }
    };
    // Message, src, span
    ($variant:ident, $msg:expr, $src:expr, $span:expr) => {
        $crate::diagnostics::QuovaError::$variant {
            message: $msg.to_string(),
            ctx: $crate::diagnostics::ErrorContext::with_source_and_span(
                $crate::diagnostics::SourceArc::clone($src),
                $span,
            ),
            source: None,
        }
    };
}

#[cfg(test)]
mod tests {
    use miette::Report;

    use super::*;

    #[test]
    fn labels_point_at_the_span() {
        let src = to_error_source("main.qv", "class Foo {");
        let err = err_ctx!(Parse, "Missing closing brace", &src, Span { start: 10, end: 11 });
        let labels: Vec<_> = err.labels().map(|l| l.collect()).unwrap_or_default();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 10);
        assert_eq!(labels[0].label(), Some("Missing closing brace"));
    }

    #[test]
    fn empty_span_still_gets_a_one_character_label() {
        let src = to_error_source("main.qv", "x");
        let err = err_ctx!(MissingNode, "expression", &src, Span { start: 0, end: 0 });
        let labels: Vec<_> = err.labels().map(|l| l.collect()).unwrap_or_default();
        assert_eq!(labels[0].len(), 1);
    }

    #[test]
    fn message_only_errors_have_no_labels() {
        let err = err_msg!(Unsupported, "dictionary initializer for {}", "Foo");
        assert_eq!(err.error_type(), ErrorType::Unsupported);
        assert!(err.labels().is_none());
        assert_eq!(
            err.to_string(),
            "Unsupported construct: dictionary initializer for Foo"
        );
    }

    #[test]
    fn io_errors_keep_their_source() {
        use std::error::Error as _;

        let cause = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = QuovaError::io(Path::new("main.qv"), cause);
        assert_eq!(err.error_type(), ErrorType::Io);
        assert_eq!(err.source().map(|s| s.to_string()), Some("gone".to_string()));
        assert!(err_msg!(Parse, "x").source().is_none());
    }

    #[test]
    fn report_renders_code_and_help() {
        let src = to_error_source("main.qv", "import ;");
        let err = err_ctx!(Parse, "Syntax error", &src, Span { start: 7, end: 8 }, "expected identifier");
        let rendered = format!("{:?}", Report::new(err));
        assert!(rendered.contains("quova::parse"));
        assert!(rendered.contains("expected identifier"));
    }
}
