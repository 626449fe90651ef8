//! # quadra-algebra
//!
//! Exact arithmetic for the quadra quadratization engine.
//!
//! This crate provides:
//! - Arbitrary precision rationals backed by `dashu`
//! - Sparse Laurent monomials and multivariate polynomials over a generic ring
//! - Rational-function coefficients over symbolic constants
//! - Table-driven derivations (chain + Leibniz rule)
//! - An exact row-echelon span reducer with combination tracking
//!
//! Everything here is deterministic: no hashing-order iteration reaches an
//! observable result, so identical inputs always produce identical output.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod coeff;
pub mod derivation;
pub mod error;
pub mod linear;
pub mod monomial;
pub mod poly;
pub mod rationals;
pub mod traits;

#[cfg(test)]
mod proptests;

pub use coeff::Coeff;
pub use derivation::{Derivation, TableDerivation};
pub use error::AlgebraError;
pub use linear::{Reduction, SpanReducer};
pub use monomial::Monomial;
pub use poly::MultiPoly;
pub use rationals::Rational;
pub use traits::{Field, Ring};
