//! # Quadra
//!
//! Quadratization of one-dimensional evolution PDE systems.
//!
//! Given a system `u_t = f(u, u_x, ...)` with polynomial or rational
//! right-hand sides, quadra searches for a smallest set of auxiliary
//! monomial variables whose introduction rewrites every right-hand
//! side as a polynomial of total degree at most two. Quadratic form is
//! what many reduced-order-modelling and reachability pipelines expect
//! as input.
//!
//! ## Features
//!
//! - **Exact arithmetic**: arbitrary-precision rationals throughout, no
//!   floating point
//! - **Rational systems**: each multi-term denominator is interned as a
//!   reciprocal variable with its own evolution equation
//! - **Two search modes**: size-minimal branch-and-bound and a greedy
//!   nearest-neighbour variant
//! - **Witnesses**: every answer carries the closed quadratic system
//!
//! ## Quick Start
//!
//! ```rust
//! use quadra::prelude::*;
//!
//! // Allen-Cahn: u_t = u_xx + u - u^3
//! let mut input = PdeInput::new("t", "x");
//! let u = input.unknown("u");
//! input.equation(u, u.dx(2) + u.expr() - u.expr().pow(3));
//!
//! let outcome = quadratize(&input, &QuadratizeOptions::default()).unwrap();
//! let q = outcome.quadratization().unwrap();
//! assert_eq!(q.polynomial_vars(), vec!["u^2"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use quadra_algebra as algebra;
pub use quadra_core as core;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use quadra_core::{
        check_quadratization, quadratize, CheckReport, Expr, PdeInput, QuadError,
        QuadratizeOptions, Quadratization, SearchAlg, SearchOutcome,
    };
}
