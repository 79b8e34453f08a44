//! Closed modifier enumerations.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Visibility {
    Public,
    Private,
    Internal,
    Protected,
    /// Declared inside a function body; renders as nothing.
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InheritanceModifier {
    Final,
    Abstract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Variance {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FunctionModifier {
    Inline,
    Tailrec,
    Static,
    Default,
    Suspend,
    Strictfp,
    Synchronized,
    Native,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PropertyModifier {
    Const,
    Readonly,
    Static,
    Volatile,
    Transient,
}

impl Visibility {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "public" => Some(Visibility::Public),
            "private" => Some(Visibility::Private),
            "protected" => Some(Visibility::Protected),
            "internal" => Some(Visibility::Internal),
            _ => None,
        }
    }
}

impl InheritanceModifier {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "final" => Some(InheritanceModifier::Final),
            "abstract" => Some(InheritanceModifier::Abstract),
            _ => None,
        }
    }
}

impl Variance {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "in" => Some(Variance::In),
            "out" => Some(Variance::Out),
            _ => None,
        }
    }
}

impl FunctionModifier {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "inline" => Some(FunctionModifier::Inline),
            "tailrec" => Some(FunctionModifier::Tailrec),
            "static" => Some(FunctionModifier::Static),
            "default" => Some(FunctionModifier::Default),
            "suspend" => Some(FunctionModifier::Suspend),
            "strictfp" => Some(FunctionModifier::Strictfp),
            "synchronized" => Some(FunctionModifier::Synchronized),
            "native" => Some(FunctionModifier::Native),
            _ => None,
        }
    }
}

impl PropertyModifier {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "const" => Some(PropertyModifier::Const),
            "readonly" => Some(PropertyModifier::Readonly),
            "static" => Some(PropertyModifier::Static),
            "volatile" => Some(PropertyModifier::Volatile),
            "transient" => Some(PropertyModifier::Transient),
            _ => None,
        }
    }
}
