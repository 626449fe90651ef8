//! Error type for system construction and quadratization.

use quadra_algebra::AlgebraError;
use thiserror::Error;

/// Errors reported while validating an input system or running a search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuadError {
    /// The input declares no equations at all.
    #[error("the system contains no equations")]
    EmptySystem,
    /// Two declared symbols share a name.
    #[error("name `{0}` is declared more than once")]
    DuplicateName(String),
    /// An unknown was declared but never given an evolution equation.
    #[error("unknown `{0}` has no evolution equation")]
    MissingEquation(String),
    /// An unknown was given more than one evolution equation.
    #[error("unknown `{0}` has more than one evolution equation")]
    DuplicateEquation(String),
    /// The time and space variables were given the same name.
    #[error("independent variables must be distinct, got `{0}` twice")]
    IndependentClash(String),
    /// An expression uses a handle that does not belong to this system.
    #[error("expression references a symbol from another system")]
    ForeignSymbol,
    /// A denominator is identically zero.
    #[error("division by an expression that is identically zero")]
    ZeroDenominator,
    /// An exponent or derivative order falls outside the supported range.
    #[error("exponent or derivative order outside the supported range")]
    ExponentOverflow,
    /// An auxiliary variable generator is not a power product.
    #[error("auxiliary variable generator must be a monomial")]
    NotMonomial,
    /// A generator divides by a denominator the system never produced.
    #[error("generator denominator does not appear in the system")]
    UnknownDenominator,
    /// An error bubbled up from the algebraic kernel.
    #[error(transparent)]
    Algebra(#[from] AlgebraError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            QuadError::DuplicateName("u".into()).to_string(),
            "name `u` is declared more than once"
        );
        assert_eq!(
            QuadError::ZeroDenominator.to_string(),
            "division by an expression that is identically zero"
        );
    }

    #[test]
    fn test_from_algebra() {
        let err: QuadError = AlgebraError::MissingDerivative(3).into();
        assert_eq!(err, QuadError::Algebra(AlgebraError::MissingDerivative(3)));
        assert_eq!(err.to_string(), "no derivative rule for variable 3");
    }
}
