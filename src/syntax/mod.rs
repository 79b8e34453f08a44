//! # Quova Front End
//!
//! Source text is parsed by the pest grammar in `quova.pest`; the resulting
//! `Pair<Rule>` tree is turned into the [`crate::ast`] by the [`Visitor`].
//!
//! ## Module Layout
//!
//! - `parser`: grammar binding, parse entry points, pest error conversion
//! - `visitor`: shared plumbing and file-level productions
//! - `declarations`, `statements`, `expressions`, `types`: the remaining productions

mod declarations;
mod expressions;
pub mod parser;
mod statements;
mod types;
mod visitor;

pub use parser::{parse_file, parse_tree, QuovaParser, Rule};
pub use visitor::Visitor;
