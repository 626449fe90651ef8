//! Candidate generation from blocked residuals.
//!
//! When a membership check fails, the lowest-degree residual monomial
//! is singled out as the blocking monomial; any accepted set must cover
//! it. Candidates are its two-factor decompositions, optionally joined
//! by reciprocal seeds in rational mode, ranked by the configured
//! heuristic.

use std::collections::HashSet;

use quadra_algebra::{Coeff, Monomial, MultiPoly};

use crate::heuristics::Heuristic;
use crate::system::PdeSystem;

/// Ranked candidate extensions for a blocked node.
///
/// Returns (monomial, score) pairs sorted by ascending score; ties keep
/// generation order.
pub(crate) fn candidates(
    system: &PdeSystem,
    current: &[Monomial],
    residuals: &[MultiPoly<Coeff>],
    heuristic: Heuristic,
    rational: bool,
) -> Vec<(Monomial, u64)> {
    let ring = system.ring();
    let max_der = ring.max_der();

    let blocking = residuals
        .iter()
        .flat_map(|r| r.terms().iter().map(|(m, _)| m))
        .min_by_key(|m| (m.abs_degree(), (*m).clone()));
    let Some(blocking) = blocking else {
        return Vec::new();
    };
    if blocking.is_one() {
        return Vec::new();
    }

    let mut seen: HashSet<Monomial> = HashSet::new();
    let mut out: Vec<(Monomial, u64)> = Vec::new();
    let mut push = |m: Monomial| {
        if m.is_one() {
            return;
        }
        // Single first-power variables are already atoms.
        if m.exponents().len() == 1 && m.exponents()[0].1 == 1 {
            return;
        }
        if current.contains(&m) {
            return;
        }
        if ring.monomial_order(&m) > max_der {
            return;
        }
        if !rational && m.has_negative() {
            return;
        }
        if seen.insert(m.clone()) {
            let score = heuristic.score(m.abs_degree(), ring.monomial_order(&m));
            out.push((m, score));
        }
    };

    // Every two-factor decomposition of the blocking monomial, both
    // halves, enumerated with the last variable's exponent moving
    // fastest.
    let exps = blocking.exponents();
    let mut combo = vec![0i32; exps.len()];
    let mut done = false;
    while !done {
        let half = Monomial::from_exps(
            exps.iter()
                .zip(&combo)
                .map(|(&(var, _), &exp)| (var, exp)),
        );
        let other = blocking.mul(&half.pow(-1));
        push(half);
        push(other);

        done = true;
        for pos in (0..combo.len()).rev() {
            let target = exps[pos].1;
            if combo[pos] == target {
                combo[pos] = 0;
                continue;
            }
            combo[pos] += if target > 0 { 1 } else { -1 };
            done = false;
            break;
        }
    }

    // Rational rescue: reciprocals of every in-scope variable and of
    // every auxiliary variable already in the set.
    if rational {
        for k in 0..ring.n_unknowns() {
            for order in 0..=max_der {
                push(Monomial::var_pow(ring.base_var(k, order), -1));
            }
        }
        for idx in 0..u32::try_from(ring.fracs().len()).unwrap_or(u32::MAX) {
            push(Monomial::var_pow(ring.frac_var(idx), -1));
        }
        for m in current {
            push(m.pow(-1));
        }
    }

    out.sort_by_key(|&(_, score)| score);
    out
}
