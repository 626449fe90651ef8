//! Error types for the algebra layer.

use thiserror::Error;

/// Errors raised by the exact-arithmetic layer.
///
/// These surface when a computation leaves the representable universe, e.g.
/// a derivative rule is requested for a variable the derivation tables do
/// not cover. Callers propagate them uninterpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlgebraError {
    /// A derivation was requested for a variable without a table entry.
    #[error("no derivative rule for variable {0}")]
    MissingDerivative(u32),

    /// Division by a zero element.
    #[error("division by zero")]
    DivisionByZero,
}
