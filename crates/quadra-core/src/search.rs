//! Best-first search over candidate auxiliary sets.
//!
//! Nodes are sets of auxiliary monomials, grown one candidate at a
//! time from the root (the empty set). Branch-and-bound orders the
//! frontier by set size first, so the first accepted set is as small
//! as any reachable one; iterative nearest neighbour orders by score
//! alone and trades that guarantee for speed. Visited sets are
//! deduplicated order-insensitively.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use quadra_algebra::Monomial;

use crate::candidates::candidates;
use crate::checker::{check, CheckResult, RawEquation};
use crate::config::SearchAlg;
use crate::error::QuadError;
use crate::heuristics::Heuristic;
use crate::system::PdeSystem;

/// Parameters of one search pass.
#[derive(Clone, Copy)]
pub(crate) struct SearchCfg {
    pub heuristic: Heuristic,
    pub alg: SearchAlg,
    pub nvars_bound: usize,
    pub rational: bool,
}

/// Result of one search pass.
pub(crate) enum SearchOutput {
    /// A quadratizing set, in acceptance order, with its witness
    /// equations and the number of nodes checked.
    Accepted {
        set: Vec<Monomial>,
        equations: Vec<RawEquation>,
        nodes: usize,
    },
    /// The frontier ran dry below the size bound.
    Exhausted { nodes: usize },
}

/// Frontier priority. Unique sequence numbers make the order total, so
/// equal-priority nodes pop in generation order.
fn priority(alg: SearchAlg, size: u64, score: u64, seq: u64) -> (u64, u64, u64) {
    match alg {
        SearchAlg::Bnb => (size, score, seq),
        SearchAlg::Inn => (score, seq, 0),
    }
}

pub(crate) fn run(system: &PdeSystem, cfg: &SearchCfg) -> Result<SearchOutput, QuadError> {
    let mut frontier: BinaryHeap<Reverse<((u64, u64, u64), usize)>> = BinaryHeap::new();
    let mut paths: Vec<Vec<Monomial>> = Vec::new();
    let mut seen: HashSet<Vec<Monomial>> = HashSet::new();
    let mut seq = 0u64;

    paths.push(Vec::new());
    seen.insert(Vec::new());
    frontier.push(Reverse((priority(cfg.alg, 0, 0, 0), 0)));

    let mut nodes = 0usize;
    while let Some(Reverse((_, idx))) = frontier.pop() {
        nodes += 1;
        let path = paths[idx].clone();
        match check(system, &path)? {
            CheckResult::Quadratic(equations) => {
                return Ok(SearchOutput::Accepted {
                    set: path,
                    equations,
                    nodes,
                });
            }
            CheckResult::Blocked(residuals) => {
                if path.len() >= cfg.nvars_bound {
                    continue;
                }
                let ranked = candidates(system, &path, &residuals, cfg.heuristic, cfg.rational);
                for (monomial, score) in ranked {
                    let mut child = path.clone();
                    child.push(monomial);
                    let mut key = child.clone();
                    key.sort();
                    if seen.insert(key) {
                        seq += 1;
                        let size = u64::try_from(child.len()).unwrap_or(u64::MAX);
                        let pri = priority(cfg.alg, size, score, seq);
                        paths.push(child);
                        frontier.push(Reverse((pri, paths.len() - 1)));
                    }
                }
            }
        }
    }
    Ok(SearchOutput::Exhausted { nodes })
}
