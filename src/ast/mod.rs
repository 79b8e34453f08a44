//! # Quova AST
//!
//! Immutable, structurally-compared value nodes built bottom-up by the
//! visitor in [`crate::syntax`] and consumed by the renderer in
//! [`crate::render`]. Nodes carry no spans; equality is structural.

pub mod declarations;
pub mod expressions;
pub mod modifiers;
pub mod statements;
pub mod types;

use serde::Serialize;

pub use declarations::*;
pub use expressions::*;
pub use modifiers::*;
pub use statements::*;
pub use types::*;

/// One compilation unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuovaFile {
    pub shebang: Option<String>,
    pub package: Option<String>,
    /// User imports followed by the two synthetic imports.
    pub imports: Vec<Import>,
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Import {
    pub path: String,
    pub wildcard: bool,
    /// `import a.b.{C, D}` selects `C` and `D`.
    pub names: Vec<String>,
    pub alias: Option<String>,
}

impl Import {
    /// `import quova.*`
    pub fn standard_library() -> Self {
        Import {
            path: "quova".to_string(),
            wildcard: true,
            names: vec![],
            alias: None,
        }
    }

    /// `import kotlin.Int as Integer`, freeing `Int` for Quova's own integer types.
    pub fn integer_alias() -> Self {
        Import {
            path: "kotlin.Int".to_string(),
            wildcard: false,
            names: vec![],
            alias: Some("Integer".to_string()),
        }
    }
}
