//! Property-based tests for the search pipeline.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{
        check_quadratization, quadratize, AuxKind, Expr, PdeInput, QuadratizeOptions, SearchAlg,
    };

    // Strategy for one right-hand-side term c * u^a * u_x1^b
    fn term() -> impl Strategy<Value = (i64, u32, u32)> {
        (
            (-3i64..=3).prop_filter("nonzero coefficient", |c| *c != 0),
            0u32..=3,
            0u32..=2,
        )
    }

    fn small_system() -> impl Strategy<Value = Vec<(i64, u32, u32)>> {
        proptest::collection::vec(term(), 1..=3)
    }

    fn build_input(terms: &[(i64, u32, u32)]) -> PdeInput {
        let mut input = PdeInput::new("t", "x");
        let u = input.unknown("u");
        let mut rhs = Expr::int(0);
        for &(c, a, b) in terms {
            let mut t = Expr::int(c);
            if a > 0 {
                t = t * u.expr().pow(i32::try_from(a).unwrap());
            }
            if b > 0 {
                t = t * u.dx(1).pow(i32::try_from(b).unwrap());
            }
            rhs = rhs + t;
        }
        input.equation(u, rhs);
        input
    }

    // Tight limits keep the frontier small across hundreds of cases.
    fn small_options() -> QuadratizeOptions {
        QuadratizeOptions {
            max_der_order: Some(2),
            nvars_bound: 2,
            rational_fallback: false,
            ..QuadratizeOptions::default()
        }
    }

    proptest! {
        #[test]
        fn search_is_deterministic(terms in small_system()) {
            let input = build_input(&terms);
            let options = small_options();
            let first = quadratize(&input, &options).unwrap();
            let second = quadratize(&input, &options).unwrap();
            prop_assert_eq!(first.nodes_visited(), second.nodes_visited());
            prop_assert_eq!(first.is_found(), second.is_found());
            if let (Some(a), Some(b)) = (first.quadratization(), second.quadratization()) {
                prop_assert_eq!(a.polynomial_vars(), b.polynomial_vars());
            }
        }

        #[test]
        fn accepted_sets_respect_bound(terms in small_system()) {
            let input = build_input(&terms);
            let outcome = quadratize(&input, &small_options()).unwrap();
            if let Some(q) = outcome.quadratization() {
                prop_assert!(q.aux.len() <= 2);
            }
        }

        #[test]
        fn polynomial_pass_yields_polynomial_vars(terms in small_system()) {
            let input = build_input(&terms);
            let outcome = quadratize(&input, &small_options()).unwrap();
            if let Some(q) = outcome.quadratization() {
                prop_assert!(q.aux.iter().all(|a| a.kind == AuxKind::Polynomial));
                prop_assert!(q.rational_vars().is_empty());
            }
        }

        #[test]
        fn answers_round_trip_through_checker(terms in small_system()) {
            let input = build_input(&terms);
            let options = small_options();
            let outcome = quadratize(&input, &options).unwrap();
            if let Some(q) = outcome.quadratization() {
                let gens: Vec<Expr> =
                    q.aux.iter().filter_map(|a| a.generator.clone()).collect();
                prop_assert_eq!(gens.len(), q.aux.len());
                let report = check_quadratization(&input, &gens, &options).unwrap();
                prop_assert!(report.is_quadratic());
            }
        }

        // Branch-and-bound pops strictly by set size, so a wider bound
        // cannot change an answer that fits the tighter one.
        #[test]
        fn wider_bound_preserves_small_answers(terms in small_system()) {
            let input = build_input(&terms);
            let tight = quadratize(&input, &small_options()).unwrap();
            if let Some(q) = tight.quadratization() {
                let wide = QuadratizeOptions {
                    nvars_bound: 3,
                    ..small_options()
                };
                let again = quadratize(&input, &wide).unwrap();
                let p = again.quadratization();
                prop_assert!(p.is_some());
                let p = p.unwrap();
                prop_assert_eq!(p.nodes_visited, q.nodes_visited);
                prop_assert_eq!(p.polynomial_vars(), q.polynomial_vars());
            }
        }

        // Both strategies expand the same node space, and the
        // size-stratified frontier accepts a minimum-size member of it.
        #[test]
        fn bnb_result_no_larger_than_inn(terms in small_system()) {
            let input = build_input(&terms);
            let best = quadratize(&input, &small_options()).unwrap();
            let greedy_options = QuadratizeOptions {
                search: SearchAlg::Inn,
                ..small_options()
            };
            let greedy = quadratize(&input, &greedy_options).unwrap();
            if let Some(g) = greedy.quadratization() {
                let b = best.quadratization();
                prop_assert!(b.is_some());
                prop_assert!(b.unwrap().aux.len() <= g.aux.len());
            }
        }
    }
}
