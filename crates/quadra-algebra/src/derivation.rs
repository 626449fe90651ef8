//! Table-driven derivations.
//!
//! A derivation is determined by its action on variables; it extends to
//! polynomials by linearity and the Leibniz rule. The engine's spatial and
//! time derivatives are both instances, each backed by a substitution table
//! mapping a variable id to the polynomial that is its derivative.

use std::collections::BTreeSet;

use crate::error::AlgebraError;
use crate::poly::MultiPoly;
use crate::traits::Ring;

/// A derivation of the polynomial ring.
pub trait Derivation<R: Ring> {
    /// The derivative of a single variable, or `None` when no rule exists.
    fn derive_var(&self, var: u32) -> Option<&MultiPoly<R>>;

    /// Derives a polynomial by the chain and Leibniz rules.
    ///
    /// # Errors
    ///
    /// Returns [`AlgebraError::MissingDerivative`] when the polynomial
    /// involves a variable the derivation has no rule for.
    fn derive(&self, poly: &MultiPoly<R>) -> Result<MultiPoly<R>, AlgebraError> {
        let vars: BTreeSet<u32> = poly
            .terms()
            .iter()
            .flat_map(|(m, _)| m.vars().collect::<Vec<_>>())
            .collect();

        let mut result = MultiPoly::zero();
        for v in vars {
            let dv = self
                .derive_var(v)
                .ok_or(AlgebraError::MissingDerivative(v))?;
            result = result.add(&poly.partial(v).mul(dv));
        }
        Ok(result)
    }

    /// Applies the derivation `order` times.
    ///
    /// # Errors
    ///
    /// Propagates [`AlgebraError::MissingDerivative`] from any step.
    fn derive_n(&self, poly: &MultiPoly<R>, order: u32) -> Result<MultiPoly<R>, AlgebraError> {
        let mut p = poly.clone();
        for _ in 0..order {
            p = self.derive(&p)?;
        }
        Ok(p)
    }
}

/// A derivation backed by a slice of optional per-variable rules.
///
/// Index = variable id; `None` (or an id past the end) means the variable
/// has no derivative rule in this table.
pub struct TableDerivation<'a, R: Ring> {
    table: &'a [Option<MultiPoly<R>>],
}

impl<'a, R: Ring> TableDerivation<'a, R> {
    /// Wraps a rule table.
    #[must_use]
    pub fn new(table: &'a [Option<MultiPoly<R>>]) -> Self {
        Self { table }
    }
}

impl<R: Ring> Derivation<R> for TableDerivation<'_, R> {
    fn derive_var(&self, var: u32) -> Option<&MultiPoly<R>> {
        self.table.get(var as usize).and_then(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monomial::Monomial;
    use crate::rationals::Rational;

    fn q(n: i64) -> Rational {
        Rational::from_integer(n)
    }

    #[test]
    fn test_leibniz() {
        // Table: x0' = x1, x1' = 1. Then (x0*x1)' = x1^2 + x0.
        let table = vec![
            Some(MultiPoly::<Rational>::var(1)),
            Some(MultiPoly::one()),
        ];
        let d = TableDerivation::new(&table);

        let p = MultiPoly::monomial(Monomial::from_exps([(0, 1), (1, 1)]), q(1));
        let dp = d.derive(&p).unwrap();

        assert_eq!(dp.coefficient_of(&Monomial::var_pow(1, 2)), Some(&q(1)));
        assert_eq!(dp.coefficient_of(&Monomial::var(0)), Some(&q(1)));
    }

    #[test]
    fn test_missing_rule() {
        let table = vec![Some(MultiPoly::<Rational>::one()), None];
        let d = TableDerivation::new(&table);

        let p = MultiPoly::<Rational>::var(1);
        assert_eq!(d.derive(&p), Err(AlgebraError::MissingDerivative(1)));

        // A rule is only required for variables that actually appear.
        let ok = MultiPoly::<Rational>::var(0);
        assert!(d.derive(&ok).is_ok());
    }

    #[test]
    fn test_derive_n() {
        // x0' = x0: repeated derivation leaves x0 fixed up to coefficient.
        let table = vec![Some(MultiPoly::<Rational>::var(0))];
        let d = TableDerivation::new(&table);

        let x = MultiPoly::<Rational>::var(0);
        let dd = d.derive_n(&x, 3).unwrap();
        assert_eq!(dd, x);
    }
}
