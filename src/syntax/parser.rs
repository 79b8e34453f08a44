//! Quova Parser
//!
//! Runs the pest grammar over source text and hands the resulting parse tree
//! to the [`Visitor`]. The parser is purely syntactic; every shape decision
//! (defaults, desugaring, partitioning) happens in the visitor.

use pest::{error::Error, iterators::Pair, Parser};
use pest_derive::Parser;
use tracing::debug;

use super::Visitor;
use crate::ast::QuovaFile;
use crate::diagnostics::{to_error_source, QuovaError, SourceArc, Span};
use crate::err_ctx;

#[derive(Parser)]
#[grammar = "syntax/quova.pest"]
pub struct QuovaParser;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses and visits one compilation unit.
pub fn parse_file(source_text: &str, name: &str) -> Result<QuovaFile, QuovaError> {
    let source = to_error_source(name, source_text);
    let tree = parse_tree(source_text, &source)?;
    let file = Visitor::new(source).visit_file(tree)?;
    debug!(
        unit = name,
        declarations = file.declarations.len(),
        "visited compilation unit"
    );
    Ok(file)
}

/// Produces the `quova_file` parse tree without visiting it.
pub fn parse_tree<'i>(source_text: &'i str, source: &SourceArc) -> Result<Pair<'i, Rule>, QuovaError> {
    let mut pairs = QuovaParser::parse(Rule::quova_file, source_text)
        .map_err(|e| convert_parse_error(e, source))?;
    pairs
        .next()
        .ok_or_else(|| err_ctx!(MissingNode, "quova_file", source, Span::default()))
}

// ============================================================================
// UTILITIES
// ============================================================================

pub(crate) fn get_span(pair: &Pair<Rule>) -> Span {
    Span {
        start: pair.as_span().start(),
        end: pair.as_span().end(),
    }
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

pub(crate) fn convert_parse_error<R: pest::RuleType>(error: Error<R>, source: &SourceArc) -> QuovaError {
    let span = match error.location {
        pest::error::InputLocation::Pos(pos) => Span {
            start: pos,
            end: pos,
        },
        pest::error::InputLocation::Span((start, end)) => Span { start, end },
    };

    let expected = error.variant.message().to_string();
    let message = if expected.contains("\")\"") {
        "Missing closing parenthesis"
    } else if expected.contains("\"}\"") {
        "Missing closing brace"
    } else if expected.contains("\";\"") {
        "Missing semicolon"
    } else {
        "Syntax error"
    };

    err_ctx!(Parse, message, source, span, expected)
}
