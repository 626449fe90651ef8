//! Sparse multivariate polynomials.
//!
//! This module provides the sparse polynomial representation used for
//! every expanded expression in the engine: right-hand sides, derivative
//! tables, atom expansions, and reducer rows.

use std::collections::BTreeSet;

use crate::monomial::Monomial;
use crate::traits::{Field, Ring};

/// A sparse multivariate polynomial over a ring.
///
/// Terms are stored as (monomial, coefficient) pairs in ascending canonical
/// monomial order, so the leading term is last. Zero coefficients are never
/// stored; the zero polynomial has no terms.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MultiPoly<R: Ring> {
    terms: Vec<(Monomial, R)>,
}

impl<R: Ring> MultiPoly<R> {
    /// Creates a polynomial from terms.
    ///
    /// Terms are automatically sorted and combined.
    #[must_use]
    pub fn new(terms: Vec<(Monomial, R)>) -> Self {
        let mut poly = Self { terms };
        poly.normalize();
        poly
    }

    /// Creates the zero polynomial.
    #[must_use]
    pub fn zero() -> Self {
        Self { terms: Vec::new() }
    }

    /// Creates the constant polynomial 1.
    #[must_use]
    pub fn one() -> Self {
        Self {
            terms: vec![(Monomial::one(), R::one())],
        }
    }

    /// Creates a constant polynomial.
    #[must_use]
    pub fn constant(c: R) -> Self {
        if c.is_zero() {
            Self::zero()
        } else {
            Self {
                terms: vec![(Monomial::one(), c)],
            }
        }
    }

    /// Creates the polynomial consisting of a single variable.
    #[must_use]
    pub fn var(v: u32) -> Self {
        Self {
            terms: vec![(Monomial::var(v), R::one())],
        }
    }

    /// Creates a single-term polynomial `c * m`.
    #[must_use]
    pub fn monomial(m: Monomial, c: R) -> Self {
        if c.is_zero() {
            Self::zero()
        } else {
            Self {
                terms: vec![(m, c)],
            }
        }
    }

    /// Returns true if this is the zero polynomial.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns true if this is the constant polynomial 1.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.terms.len() == 1 && self.terms[0].0.is_one() && self.terms[0].1.is_one()
    }

    /// Returns the number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if there are no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the terms in ascending monomial order.
    #[must_use]
    pub fn terms(&self) -> &[(Monomial, R)] {
        &self.terms
    }

    /// Returns the leading term (greatest monomial).
    #[must_use]
    pub fn leading_term(&self) -> Option<&(Monomial, R)> {
        self.terms.last()
    }

    /// Removes and returns the leading term.
    pub fn remove_leading(&mut self) -> Option<(Monomial, R)> {
        self.terms.pop()
    }

    /// Returns the coefficient of `m`, if present.
    #[must_use]
    pub fn coefficient_of(&self, m: &Monomial) -> Option<&R> {
        self.terms
            .binary_search_by(|(tm, _)| tm.cmp(m))
            .ok()
            .map(|i| &self.terms[i].1)
    }

    /// Sorts terms and combines like terms.
    fn normalize(&mut self) {
        self.terms.sort_by(|a, b| a.0.cmp(&b.0));

        let mut i = 0;
        while i < self.terms.len() {
            while i + 1 < self.terms.len() && self.terms[i].0 == self.terms[i + 1].0 {
                let (_, c) = self.terms.remove(i + 1);
                self.terms[i].1 = self.terms[i].1.clone() + c;
            }
            if self.terms[i].1.is_zero() {
                self.terms.remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Adds two polynomials.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let mut terms = self.terms.clone();
        terms.extend(other.terms.iter().cloned());
        Self::new(terms)
    }

    /// Negates a polynomial.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .map(|(m, c)| (m.clone(), -c.clone()))
                .collect(),
        }
    }

    /// Subtracts two polynomials.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Multiplies two polynomials (schoolbook algorithm).
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }

        let mut terms = Vec::with_capacity(self.len() * other.len());
        for (m1, c1) in &self.terms {
            for (m2, c2) in &other.terms {
                terms.push((m1.mul(m2), c1.clone() * c2.clone()));
            }
        }
        Self::new(terms)
    }

    /// Multiplies by a scalar.
    #[must_use]
    pub fn scale(&self, c: &R) -> Self {
        if c.is_zero() {
            return Self::zero();
        }
        Self {
            terms: self
                .terms
                .iter()
                .map(|(m, x)| (m.clone(), x.clone() * c.clone()))
                .collect(),
        }
    }

    /// Multiplies by a single term `c * m`.
    #[must_use]
    pub fn mul_term(&self, m: &Monomial, c: &R) -> Self {
        if c.is_zero() {
            return Self::zero();
        }
        // Monomial multiplication preserves the term order.
        Self {
            terms: self
                .terms
                .iter()
                .map(|(m2, c2)| (m.mul(m2), c2.clone() * c.clone()))
                .collect(),
        }
    }

    /// The partial derivative with respect to variable `v`.
    ///
    /// Uses the power rule per term; valid for negative exponents too,
    /// since d/dv v^e = e*v^(e-1) holds for all integer e.
    #[must_use]
    pub fn partial(&self, v: u32) -> Self {
        let step = Monomial::var_pow(v, -1);
        let terms = self
            .terms
            .iter()
            .filter_map(|(m, c)| {
                let e = m.exponent(v);
                if e == 0 {
                    None
                } else {
                    Some((m.mul(&step), c.mul_by_scalar(i64::from(e))))
                }
            })
            .collect();
        Self::new(terms)
    }

    /// Raises the polynomial to a non-negative power.
    #[must_use]
    pub fn pow(&self, exp: u32) -> Self {
        let mut result = Self::one();
        let mut base = self.clone();
        let mut exp = exp;
        while exp > 0 {
            if exp & 1 == 1 {
                result = result.mul(&base);
            }
            base = base.mul(&base);
            exp >>= 1;
        }
        result
    }

    /// Splits off the monomial content: the largest monomial (over all
    /// variables, with possibly negative exponents) dividing every term.
    ///
    /// Returns `(content, reduced)` with `self = content * reduced`; the
    /// reduced part has non-negative exponents and, for every variable it
    /// uses, at least one term free of that variable. The zero polynomial
    /// splits as `(1, 0)`.
    #[must_use]
    pub fn split_content(&self) -> (Monomial, Self) {
        if self.is_zero() {
            return (Monomial::one(), Self::zero());
        }
        let mut vars = BTreeSet::new();
        for (m, _) in &self.terms {
            vars.extend(m.vars());
        }
        // A variable missing from a term has exponent zero there, so the
        // minimum already accounts for it.
        let mins = vars.into_iter().map(|v| {
            let min = self.terms.iter().map(|(m, _)| m.exponent(v)).min();
            (v, min.unwrap_or(0))
        });
        let content = Monomial::from_exps(mins);
        if content.is_one() {
            return (content, self.clone());
        }
        let reduced = self.mul_term(&content.pow(-1), &R::one());
        (content, reduced)
    }

    /// The maximum total degree over all terms (zero polynomial: 0).
    #[must_use]
    pub fn total_degree(&self) -> i64 {
        self.terms
            .iter()
            .map(|(m, _)| m.total_degree())
            .max()
            .unwrap_or(0)
    }

    /// Maps the coefficients into another ring.
    #[must_use]
    pub fn map_coeffs<S: Ring>(&self, f: impl Fn(&R) -> S) -> MultiPoly<S> {
        MultiPoly::new(
            self.terms
                .iter()
                .map(|(m, c)| (m.clone(), f(c)))
                .collect(),
        )
    }
}

impl<F: Field> MultiPoly<F> {
    /// Divides by `divisor` when the quotient is again a Laurent
    /// polynomial, returning `None` for inexact divisions.
    ///
    /// Monomial content on either side is a unit and is split off
    /// first; the remaining proper division runs over non-negative
    /// exponents, where the leading term strictly decreases each step.
    #[must_use]
    pub fn try_div_exact(&self, divisor: &Self) -> Option<Self> {
        if divisor.is_zero() {
            return None;
        }
        if self.is_zero() {
            return Some(Self::zero());
        }
        let (num_content, num) = self.split_content();
        let (div_content, den) = divisor.split_content();
        let (div_lm, div_lc) = den.leading_term()?.clone();

        let mut rem = num;
        let mut quo = Vec::new();
        while let Some((lm, lc)) = rem.leading_term().cloned() {
            if !div_lm.divides(&lm) {
                return None;
            }
            let qm = lm.mul(&div_lm.pow(-1));
            let qc = lc.field_div(&div_lc);
            rem = rem.sub(&den.mul_term(&qm, &qc));
            quo.push((qm, qc));
        }

        let shift = num_content.mul(&div_content.pow(-1));
        Some(Self::new(quo).mul_term(&shift, &F::one()))
    }
}

impl<R: Ring + std::fmt::Display> std::fmt::Display for MultiPoly<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let parts: Vec<String> = self
            .terms
            .iter()
            .rev()
            .map(|(m, c)| {
                if m.is_one() {
                    format!("{c}")
                } else if c.is_one() {
                    format!("{m}")
                } else {
                    format!("{c}*{m}")
                }
            })
            .collect();

        write!(f, "{}", parts.join(" + "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rationals::Rational;

    fn q(n: i64) -> Rational {
        Rational::from_integer(n)
    }

    #[test]
    fn test_basic() {
        let x = MultiPoly::<Rational>::var(0);
        let y = MultiPoly::<Rational>::var(1);

        let sum = x.add(&y);
        assert_eq!(sum.len(), 2);
        assert_eq!(sum.leading_term().map(|(m, _)| m.clone()), Some(Monomial::var(0)));
    }

    #[test]
    fn test_mul_square() {
        // (x + 1)^2 = x^2 + 2x + 1
        let x = MultiPoly::<Rational>::var(0);
        let xp1 = x.add(&MultiPoly::one());
        let sq = xp1.mul(&xp1);

        assert_eq!(sq.len(), 3);
        assert_eq!(sq.coefficient_of(&Monomial::var(0)), Some(&q(2)));
        assert_eq!(sq.coefficient_of(&Monomial::one()), Some(&q(1)));
    }

    #[test]
    fn test_cancellation() {
        let x = MultiPoly::<Rational>::var(0);
        assert!(x.sub(&x).is_zero());
    }

    #[test]
    fn test_partial_power_rule() {
        // d/dx (x^3 + 2xy) = 3x^2 + 2y
        let p = MultiPoly::new(vec![
            (Monomial::var_pow(0, 3), q(1)),
            (Monomial::from_exps([(0, 1), (1, 1)]), q(2)),
        ]);
        let d = p.partial(0);
        assert_eq!(d.coefficient_of(&Monomial::var_pow(0, 2)), Some(&q(3)));
        assert_eq!(d.coefficient_of(&Monomial::var(1)), Some(&q(2)));
    }

    #[test]
    fn test_partial_negative_exponent() {
        // d/dx x^-1 = -x^-2
        let p = MultiPoly::monomial(Monomial::var_pow(0, -1), q(1));
        let d = p.partial(0);
        assert_eq!(d.coefficient_of(&Monomial::var_pow(0, -2)), Some(&q(-1)));
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn test_mul_term() {
        let p = MultiPoly::new(vec![
            (Monomial::var(0), q(1)),
            (Monomial::one(), q(1)),
        ]);
        let shifted = p.mul_term(&Monomial::var_pow(0, -1), &q(2));
        assert_eq!(shifted.coefficient_of(&Monomial::one()), Some(&q(2)));
        assert_eq!(
            shifted.coefficient_of(&Monomial::var_pow(0, -1)),
            Some(&q(2))
        );
    }

    #[test]
    fn test_pow() {
        let x = MultiPoly::<Rational>::var(0);
        let xp1 = x.add(&MultiPoly::one());
        let cube = xp1.pow(3);
        assert_eq!(cube.len(), 4);
        assert_eq!(cube.coefficient_of(&Monomial::var_pow(0, 2)), Some(&q(3)));
        assert!(xp1.pow(0).is_one());
    }

    #[test]
    fn test_split_content() {
        // u^-1 + u = u^-1 * (1 + u^2)
        let p = MultiPoly::new(vec![
            (Monomial::var_pow(0, -1), q(1)),
            (Monomial::var(0), q(1)),
        ]);
        let (content, reduced) = p.split_content();
        assert_eq!(content, Monomial::var_pow(0, -1));
        assert_eq!(reduced.coefficient_of(&Monomial::one()), Some(&q(1)));
        assert_eq!(reduced.coefficient_of(&Monomial::var_pow(0, 2)), Some(&q(1)));
    }

    #[test]
    fn test_split_content_mixed_vars() {
        // {1, x^-1}: the content must pick up x^-1 even though the
        // constant term has no variables.
        let p = MultiPoly::new(vec![
            (Monomial::one(), q(1)),
            (Monomial::var_pow(0, -1), q(1)),
        ]);
        let (content, reduced) = p.split_content();
        assert_eq!(content, Monomial::var_pow(0, -1));
        assert!(!reduced
            .terms()
            .iter()
            .any(|(m, _)| m.has_negative()));
    }

    #[test]
    fn test_div_exact() {
        let x = MultiPoly::<Rational>::var(0);
        let xp1 = x.add(&MultiPoly::one());
        let sq = xp1.mul(&xp1);
        assert_eq!(sq.try_div_exact(&xp1), Some(xp1.clone()));

        // x^2 + 1 is not divisible by x + 1.
        let x2p1 = x.mul(&x).add(&MultiPoly::one());
        assert_eq!(x2p1.try_div_exact(&xp1), None);
    }

    #[test]
    fn test_div_exact_laurent() {
        // (x^-1 + 1) / (x + 1) = x^-1
        let p = MultiPoly::new(vec![
            (Monomial::var_pow(0, -1), q(1)),
            (Monomial::one(), q(1)),
        ]);
        let x = MultiPoly::<Rational>::var(0);
        let xp1 = x.add(&MultiPoly::one());
        assert_eq!(
            p.try_div_exact(&xp1),
            Some(MultiPoly::monomial(Monomial::var_pow(0, -1), q(1)))
        );
    }
}
