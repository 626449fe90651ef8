//! Quadratic-form membership checking.
//!
//! A candidate set is accepted when every reduction target lies in the
//! linear span of pairwise atom products. The products feed a
//! row-echelon reducer with combination tracking, so acceptance comes
//! with the witness equations for free.

use rayon::prelude::*;

use quadra_algebra::{Coeff, Monomial, MultiPoly, SpanReducer};

use crate::error::QuadError;
use crate::system::{AtomLabel, PdeSystem, TargetLabel};

/// One reconstructed equation: a target expressed as a combination of
/// pairwise atom products.
#[derive(Debug, Clone)]
pub(crate) struct RawEquation {
    pub label: TargetLabel,
    pub terms: Vec<(Coeff, AtomLabel, AtomLabel)>,
}

/// Outcome of a membership check.
#[derive(Debug, Clone)]
pub(crate) enum CheckResult {
    /// Every target reduced to zero; witness equations attached.
    Quadratic(Vec<RawEquation>),
    /// Residuals of the targets that failed, in target order.
    Blocked(Vec<MultiPoly<Coeff>>),
}

/// Checks whether the system extended by `aux` closes quadratically.
pub(crate) fn check(system: &PdeSystem, aux: &[Monomial]) -> Result<CheckResult, QuadError> {
    let atoms = system.atoms(aux)?;
    let n = atoms.len();

    // Unordered atom pairs (i <= j); position in this list is the
    // generator tag used by the reducer.
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| (i..n).map(move |j| (i, j)))
        .collect();
    let products: Vec<MultiPoly<Coeff>> = pairs
        .par_iter()
        .map(|&(i, j)| atoms[i].expansion.mul(&atoms[j].expansion))
        .collect();

    let mut reducer = SpanReducer::new();
    for (tag, product) in products.into_iter().enumerate() {
        reducer.insert(tag, product);
    }

    let targets = system.targets(aux)?;
    let mut equations = Vec::with_capacity(targets.len());
    let mut residuals = Vec::new();
    for (label, target) in targets {
        let reduction = reducer.reduce(&target);
        if reduction.is_member() {
            let terms = reduction
                .combination
                .into_iter()
                .map(|(tag, coeff)| {
                    let (i, j) = pairs[tag];
                    (coeff, atoms[i].label, atoms[j].label)
                })
                .collect();
            equations.push(RawEquation { label, terms });
        } else {
            residuals.push(reduction.residual);
        }
    }

    if residuals.is_empty() {
        Ok(CheckResult::Quadratic(equations))
    } else {
        Ok(CheckResult::Blocked(residuals))
    }
}
