//! # quadra-core
//!
//! Quadratization of one-dimensional evolution PDE systems.
//!
//! This crate provides:
//! - A builder for systems `u_t = f(u, u_x, ...)` with polynomial or
//!   rational right-hand sides over one space variable
//! - Lowering onto a differential polynomial ring, interning the
//!   reciprocal of each multi-term denominator as a fresh ring variable
//! - A branch-and-bound search for a smallest set of auxiliary monomial
//!   variables whose introduction makes every right-hand side at most
//!   quadratic, plus a greedy nearest-neighbour variant
//! - A membership checker for caller-proposed auxiliary sets
//!
//! The search runs in two passes: polynomial candidates first, then,
//! when that pass exhausts and the fallback is enabled, candidates
//! drawn from negative powers of the ring variables.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod expr;
pub mod input;
pub mod quadratization;

mod candidates;
mod checker;
mod heuristics;
mod lower;
mod ring;
mod search;
mod system;

#[cfg(test)]
mod proptests;

pub use config::{QuadratizeOptions, SearchAlg};
pub use error::QuadError;
pub use expr::{Constant, Expr, Unknown};
pub use heuristics::Heuristic;
pub use input::PdeInput;
pub use quadratization::{
    AuxKind, AuxVar, CheckReport, QuadEquation, QuadTerm, QuadraticSystem, Quadratization,
    ReciprocalVar, SearchOutcome,
};

use crate::checker::{check, CheckResult};
use crate::quadratization::{assemble, render_equations};
use crate::search::{run, SearchCfg, SearchOutput};
use crate::system::PdeSystem;

/// Searches for a smallest set of auxiliary monomial variables that
/// makes every right-hand side of `input` at most quadratic in the
/// extended variable set.
///
/// The first pass proposes polynomial auxiliary variables only. When it
/// exhausts without an answer and
/// [`rational_fallback`](QuadratizeOptions::rational_fallback) is set,
/// a second pass also proposes negative powers of the ring variables.
/// Node counts accumulate across passes.
///
/// Under [`SearchAlg::Bnb`] the returned set is as small as any set
/// reachable within the configured bounds; [`SearchAlg::Inn`] trades
/// that guarantee for speed.
///
/// # Errors
///
/// Fails when the input does not describe a well-formed system: no
/// equations, duplicate names, a missing or repeated evolution
/// equation, handles from another system, a denominator that is
/// identically zero, or an exponent outside the supported range.
pub fn quadratize(
    input: &PdeInput,
    options: &QuadratizeOptions,
) -> Result<SearchOutcome, QuadError> {
    let system = PdeSystem::build(input, options)?;
    let cfg = SearchCfg {
        heuristic: options.heuristic,
        alg: options.search,
        nvars_bound: options.nvars_bound,
        rational: false,
    };
    match run(&system, &cfg)? {
        SearchOutput::Accepted {
            set,
            equations,
            nodes,
        } => Ok(SearchOutcome::Found(assemble(
            &system, &set, equations, nodes,
        ))),
        SearchOutput::Exhausted {
            nodes: polynomial_nodes,
        } => {
            if !options.rational_fallback {
                return Ok(SearchOutcome::NotFound {
                    nodes_visited: polynomial_nodes,
                });
            }
            let rational_cfg = SearchCfg {
                rational: true,
                ..cfg
            };
            match run(&system, &rational_cfg)? {
                SearchOutput::Accepted {
                    set,
                    equations,
                    nodes,
                } => Ok(SearchOutcome::Found(assemble(
                    &system,
                    &set,
                    equations,
                    polynomial_nodes + nodes,
                ))),
                SearchOutput::Exhausted { nodes } => Ok(SearchOutcome::NotFound {
                    nodes_visited: polynomial_nodes + nodes,
                }),
            }
        }
    }
}

/// Checks whether a caller-proposed set of auxiliary variables closes
/// `input` into a quadratic system.
///
/// Each proposed variable must be a power product of the unknowns,
/// their derivatives and interned reciprocals, built with the same
/// expression API as the input, e.g. `u.expr() * u.dx(1).pow(2)`. The
/// scalar coefficient of the product is ignored. On success the witness
/// equations are returned.
///
/// # Errors
///
/// Fails on the same input defects as [`quadratize`], or when a
/// proposed variable is not a power product or divides by a denominator
/// the system never produced.
pub fn check_quadratization(
    input: &PdeInput,
    vars: &[Expr],
    options: &QuadratizeOptions,
) -> Result<CheckReport, QuadError> {
    let system = PdeSystem::build(input, options)?;
    let mut aux = Vec::with_capacity(vars.len());
    for expr in vars {
        input.check_handles(expr)?;
        aux.push(system.monomial_of(expr)?);
    }
    match check(&system, &aux)? {
        CheckResult::Quadratic(raw) => Ok(CheckReport::Quadratic(render_equations(&system, raw))),
        CheckResult::Blocked(_) => Ok(CheckReport::NonQuadratic),
    }
}
