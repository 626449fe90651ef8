//! Search configuration.

use crate::heuristics::Heuristic;

/// Frontier discipline used by the quadratization search.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum SearchAlg {
    /// Branch-and-bound: explores candidate sets smallest-first, so the
    /// first accepted set has minimal size among reachable sets.
    #[default]
    Bnb,
    /// Iterative nearest neighbour: always expands the best-scored
    /// frontier node regardless of its size. Faster on large systems,
    /// but the answer may use more auxiliary variables than necessary.
    Inn,
}

impl SearchAlg {
    /// Returns a short name for the algorithm.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            SearchAlg::Bnb => "bnb",
            SearchAlg::Inn => "inn",
        }
    }
}

impl std::fmt::Display for SearchAlg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Tuning knobs for [`quadratize`](crate::quadratize).
///
/// The defaults match the common case: derivative budget inferred from
/// the input, branch-and-bound search, and a rational rescue pass when
/// no polynomial quadratization exists.
#[derive(Clone, Debug)]
pub struct QuadratizeOptions {
    /// Highest derivative order allowed in auxiliary variables and
    /// their prolongations. `None` uses the highest order present in
    /// the input equations.
    pub max_der_order: Option<u32>,
    /// Upper bound on the number of auxiliary variables in a candidate
    /// set. Search nodes at this size are not expanded further.
    pub nvars_bound: usize,
    /// Candidate ranking heuristic.
    pub heuristic: Heuristic,
    /// Frontier discipline.
    pub search: SearchAlg,
    /// Whether to rerun the search with reciprocal candidates enabled
    /// after an exhausted polynomial pass.
    pub rational_fallback: bool,
}

impl Default for QuadratizeOptions {
    fn default() -> Self {
        QuadratizeOptions {
            max_der_order: None,
            nvars_bound: 10,
            heuristic: Heuristic::default(),
            search: SearchAlg::default(),
            rational_fallback: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = QuadratizeOptions::default();
        assert_eq!(options.max_der_order, None);
        assert_eq!(options.nvars_bound, 10);
        assert_eq!(options.search, SearchAlg::Bnb);
        assert!(options.rational_fallback);
    }

    #[test]
    fn test_names() {
        assert_eq!(SearchAlg::Bnb.to_string(), "bnb");
        assert_eq!(SearchAlg::Inn.to_string(), "inn");
    }
}
