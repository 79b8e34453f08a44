//! A two-way sum type for grammar positions that accept exactly one of two shapes.
//!
//! A function body is a block *or* an expression, a supertype is initialized
//! through arguments *or* a delegate, and so on. `Either` keeps both shapes in
//! one field and forces every consumer to handle both through [`Either::either`]
//! or an exhaustive `match`.

use std::fmt;

use serde::Serialize;

/// Exactly one of two values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Either<A, B> {
    A(A),
    B(B),
}

impl<A, B> Either<A, B> {
    /// Builds an `Either` from two optional values, preferring `a`.
    ///
    /// Returns `None` when both are absent; callers turn that into a front-end
    /// error since the grammar guarantees one of them.
    ///
    /// ```rust
    /// use quova::either::Either;
    ///
    /// let picked: Option<Either<i32, &str>> = Either::from_options(None, Some("body"));
    /// assert_eq!(picked, Some(Either::B("body")));
    /// ```
    pub fn from_options(a: Option<A>, b: Option<B>) -> Option<Self> {
        match (a, b) {
            (Some(a), _) => Some(Either::A(a)),
            (None, Some(b)) => Some(Either::B(b)),
            (None, None) => None,
        }
    }

    /// Like [`Either::from_options`], but synthesizes an `A` from `fallback`
    /// when both inputs are absent.
    pub fn catching_a(a: Option<A>, b: Option<B>, fallback: impl FnOnce() -> A) -> Self {
        Self::from_options(a, b).unwrap_or_else(|| Either::A(fallback()))
    }

    /// Eliminates the value with one total function per alternative.
    pub fn either<R>(self, if_a: impl FnOnce(A) -> R, if_b: impl FnOnce(B) -> R) -> R {
        match self {
            Either::A(a) => if_a(a),
            Either::B(b) => if_b(b),
        }
    }

    pub fn as_ref(&self) -> Either<&A, &B> {
        match self {
            Either::A(a) => Either::A(a),
            Either::B(b) => Either::B(b),
        }
    }

    pub fn is_a(&self) -> bool {
        matches!(self, Either::A(_))
    }
}

impl<A: fmt::Display, B: fmt::Display> fmt::Display for Either<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Either::A(a) => a.fmt(f),
            Either::B(b) => b.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_first_when_both_present() {
        let picked = Either::from_options(Some(1), Some("two"));
        assert_eq!(picked, Some(Either::A(1)));
    }

    #[test]
    fn absent_inputs_yield_none() {
        let picked: Option<Either<i32, i32>> = Either::from_options(None, None);
        assert!(picked.is_none());
    }

    #[test]
    fn catching_synthesizes_first_alternative() {
        let picked: Either<Vec<i32>, String> = Either::catching_a(None, None, Vec::new);
        assert_eq!(picked, Either::A(vec![]));

        let kept: Either<Vec<i32>, String> =
            Either::catching_a(None, Some("delegate".to_string()), Vec::new);
        assert_eq!(kept, Either::B("delegate".to_string()));
    }

    #[test]
    fn eliminator_visits_the_present_side() {
        let a: Either<i32, &str> = Either::A(4);
        let b: Either<i32, &str> = Either::B("four");
        assert_eq!(a.either(|n| n.to_string(), |s| s.to_uppercase()), "4");
        assert_eq!(b.either(|n| n.to_string(), |s| s.to_uppercase()), "FOUR");
    }

    #[test]
    fn displays_the_present_side() {
        let a: Either<i32, &str> = Either::A(4);
        assert_eq!(a.to_string(), "4");
        assert_eq!(Either::<i32, &str>::B("four").to_string(), "four");
    }
}
