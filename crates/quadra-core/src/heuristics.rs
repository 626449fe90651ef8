//! Candidate ranking heuristics.
//!
//! Each heuristic maps a candidate monomial to a score; smaller scores
//! are tried first. Scores combine the candidate's total degree (sum of
//! absolute exponents) with its differential order (highest derivative
//! order among its variables).

/// Ranking used to order candidate auxiliary variables.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Heuristic {
    /// Order first, degree as tiebreaker. Prefers candidates built from
    /// low derivatives even when their degree is large.
    ByOrderDegree,
    /// Degree first, order as tiebreaker. Prefers small power products.
    ByDegreeOrder,
    /// Weighted sum `degree + 2 * order`. A balanced default that
    /// penalizes high derivatives without ignoring degree.
    #[default]
    ByFun,
}

impl Heuristic {
    /// Returns a short name for the heuristic.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Heuristic::ByOrderDegree => "by-order-degree",
            Heuristic::ByDegreeOrder => "by-degree-order",
            Heuristic::ByFun => "by-fun",
        }
    }

    /// Scores a candidate with the given degree and differential order.
    ///
    /// Lexicographic rankings pack the dominant quantity into the high
    /// half of the score so a single integer comparison orders them.
    #[must_use]
    pub(crate) fn score(self, degree: u32, order: u32) -> u64 {
        match self {
            Heuristic::ByOrderDegree => (u64::from(order) << 32) | u64::from(degree),
            Heuristic::ByDegreeOrder => (u64::from(degree) << 32) | u64::from(order),
            Heuristic::ByFun => u64::from(degree) + 2 * u64::from(order),
        }
    }
}

impl std::fmt::Display for Heuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_order_degree() {
        let h = Heuristic::ByOrderDegree;
        // High degree but low order beats low degree with high order.
        assert!(h.score(9, 0) < h.score(1, 1));
        assert!(h.score(2, 1) < h.score(3, 1));
    }

    #[test]
    fn test_by_degree_order() {
        let h = Heuristic::ByDegreeOrder;
        assert!(h.score(1, 5) < h.score(2, 0));
        assert!(h.score(2, 1) < h.score(2, 3));
    }

    #[test]
    fn test_by_fun() {
        let h = Heuristic::ByFun;
        assert_eq!(h.score(3, 2), 7);
        // Degree and twice the order trade off against each other.
        assert_eq!(h.score(4, 0), h.score(2, 1));
    }
}
