//! Property-based tests for the exact-arithmetic layer.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::coeff::Coeff;
    use crate::monomial::Monomial;
    use crate::poly::MultiPoly;
    use crate::rationals::Rational;
    use crate::traits::{Field, Ring};

    // Strategy for generating small rational coefficients
    fn small_coeff() -> impl Strategy<Value = Rational> {
        (-50i64..50i64).prop_map(Rational::from_integer)
    }

    // Strategy for generating monomials over 3 variables, Laurent exponents
    fn small_monomial() -> impl Strategy<Value = Monomial> {
        proptest::collection::vec((0u32..3u32, -3i32..=3i32), 0..=3)
            .prop_map(Monomial::from_exps)
    }

    // Strategy for generating small sparse polynomials
    fn small_poly() -> impl Strategy<Value = MultiPoly<Rational>> {
        proptest::collection::vec((small_monomial(), small_coeff()), 0..=4)
            .prop_map(MultiPoly::new)
    }

    // Strategy for generating coefficients in Q(c0, c1)
    fn small_field_elem() -> impl Strategy<Value = Coeff> {
        (
            proptest::collection::vec((0u32..2u32, 0i32..=2i32), 0..=2),
            -20i64..20i64,
        )
            .prop_map(|(exps, c)| {
                Coeff::from_integer(c)
                    + Coeff::new(
                        MultiPoly::monomial(
                            Monomial::from_exps(exps),
                            Rational::from_integer(1),
                        ),
                        MultiPoly::one(),
                    )
            })
    }

    proptest! {
        // Monomial laws

        #[test]
        fn monomial_mul_commutative(a in small_monomial(), b in small_monomial()) {
            prop_assert_eq!(a.mul(&b), b.mul(&a));
        }

        #[test]
        fn monomial_mul_associative(
            a in small_monomial(),
            b in small_monomial(),
            c in small_monomial()
        ) {
            prop_assert_eq!(a.mul(&b).mul(&c), a.mul(&b.mul(&c)));
        }

        #[test]
        fn monomial_one_identity(a in small_monomial()) {
            prop_assert_eq!(a.mul(&Monomial::one()), a.clone());
        }

        #[test]
        fn monomial_inverse_cancels(a in small_monomial()) {
            prop_assert!(a.mul(&a.pow(-1)).is_one());
        }

        // Polynomial ring axioms

        #[test]
        fn poly_add_commutative(a in small_poly(), b in small_poly()) {
            prop_assert_eq!(a.add(&b), b.add(&a));
        }

        #[test]
        fn poly_add_associative(a in small_poly(), b in small_poly(), c in small_poly()) {
            prop_assert_eq!(a.add(&b).add(&c), a.add(&b.add(&c)));
        }

        #[test]
        fn poly_mul_commutative(a in small_poly(), b in small_poly()) {
            prop_assert_eq!(a.mul(&b), b.mul(&a));
        }

        #[test]
        fn poly_mul_associative(a in small_poly(), b in small_poly(), c in small_poly()) {
            prop_assert_eq!(a.mul(&b).mul(&c), a.mul(&b.mul(&c)));
        }

        #[test]
        fn poly_distributive(a in small_poly(), b in small_poly(), c in small_poly()) {
            // a * (b + c) = a * b + a * c
            let left = a.mul(&b.add(&c));
            let right = a.mul(&b).add(&a.mul(&c));
            prop_assert_eq!(left, right);
        }

        #[test]
        fn poly_additive_inverse(a in small_poly()) {
            prop_assert!(a.add(&a.neg()).is_zero());
        }

        #[test]
        fn poly_partial_leibniz(a in small_poly(), b in small_poly()) {
            // (a*b)' = a'*b + a*b' for each variable
            for v in 0..3 {
                let left = a.mul(&b).partial(v);
                let right = a.partial(v).mul(&b).add(&a.mul(&b.partial(v)));
                prop_assert_eq!(left, right);
            }
        }

        #[test]
        fn poly_partial_linear(a in small_poly(), b in small_poly()) {
            let left = a.add(&b).partial(0);
            let right = a.partial(0).add(&b.partial(0));
            prop_assert_eq!(left, right);
        }

        // Coefficient field laws

        #[test]
        fn coeff_add_commutative(a in small_field_elem(), b in small_field_elem()) {
            prop_assert_eq!(a.clone() + b.clone(), b + a);
        }

        #[test]
        fn coeff_mul_commutative(a in small_field_elem(), b in small_field_elem()) {
            prop_assert_eq!(a.clone() * b.clone(), b * a);
        }

        #[test]
        fn coeff_distributive(
            a in small_field_elem(),
            b in small_field_elem(),
            c in small_field_elem()
        ) {
            let left = a.clone() * (b.clone() + c.clone());
            let right = a.clone() * b + a * c;
            prop_assert_eq!(left, right);
        }

        #[test]
        fn coeff_mul_inverse(a in small_field_elem()) {
            if !a.is_zero() {
                let inv = Field::inv(&a).unwrap();
                prop_assert!((a * inv).is_one());
            }
        }

        // Span reducer: everything inserted is a member of the span

        #[test]
        fn reducer_members_reduce_to_zero(
            polys in proptest::collection::vec(small_poly(), 1..=4)
        ) {
            use crate::linear::SpanReducer;

            let mut basis = SpanReducer::new();
            for (i, p) in polys.iter().enumerate() {
                basis.insert(i, p.clone());
            }
            for p in &polys {
                prop_assert!(basis.reduce(p).is_member());
            }
        }

        #[test]
        fn reducer_witness_reconstructs_target(
            polys in proptest::collection::vec(small_poly(), 1..=4),
            target in small_poly()
        ) {
            use crate::linear::SpanReducer;

            let mut basis = SpanReducer::new();
            for (i, p) in polys.iter().enumerate() {
                basis.insert(i, p.clone());
            }

            let red = basis.reduce(&target);
            let mut spanned = red.residual.clone();
            for (tag, c) in &red.combination {
                spanned = spanned.add(&polys[*tag].scale(c));
            }
            prop_assert_eq!(spanned, target);
        }
    }
}
