//! Lowering of input expressions into the differential ring.
//!
//! Every right-hand side becomes a fraction: an expanded Laurent
//! polynomial numerator over a product of canonical denominator
//! factors. Single-term denominators are units of the Laurent ring and
//! are absorbed into the numerator as negative exponents; only genuine
//! multi-term factors survive, interned so that repeated denominators
//! share one reciprocal variable.

use quadra_algebra::{Coeff, Field, Monomial, MultiPoly, Ring};

use crate::error::QuadError;
use crate::expr::Expr;

/// Largest exponent magnitude accepted from input powers.
const MAX_EXPONENT: u32 = 1024;

/// A lowered expression: `num / prod(factors[id]^pow)`.
#[derive(Debug, Clone)]
pub(crate) struct Frac {
    /// Expanded numerator; may carry negative exponents.
    pub num: MultiPoly<Coeff>,
    /// Denominator factors as (intern id, power >= 1), sorted by id.
    pub den: Vec<(usize, u32)>,
}

impl Frac {
    fn constant(c: Coeff) -> Self {
        Frac {
            num: MultiPoly::constant(c),
            den: Vec::new(),
        }
    }

    fn from_poly(num: MultiPoly<Coeff>) -> Self {
        Frac {
            num,
            den: Vec::new(),
        }
    }
}

/// Shared lowering state: the derivative cap of the ring and the
/// denominator factor intern table.
pub(crate) struct Lowerer {
    top: u32,
    factors: Vec<MultiPoly<Coeff>>,
}

impl Lowerer {
    pub(crate) fn new(top: u32) -> Self {
        Lowerer {
            top,
            factors: Vec::new(),
        }
    }

    /// Resumes lowering against an existing factor table.
    pub(crate) fn with_factors(top: u32, factors: Vec<MultiPoly<Coeff>>) -> Self {
        Lowerer { top, factors }
    }

    pub(crate) fn factors(&self) -> &[MultiPoly<Coeff>] {
        &self.factors
    }

    pub(crate) fn into_factors(self) -> Vec<MultiPoly<Coeff>> {
        self.factors
    }

    /// Lowers one equation right-hand side and cancels removable
    /// denominator factors.
    pub(crate) fn lower_equation(&mut self, expr: &Expr) -> Result<Frac, QuadError> {
        let frac = self.lower(expr)?;
        Ok(self.cancel(frac))
    }

    pub(crate) fn lower(&mut self, expr: &Expr) -> Result<Frac, QuadError> {
        match expr {
            Expr::Integer(n) => Ok(Frac::constant(Coeff::from_integer(*n))),
            Expr::Rational(num, den) => {
                if *den == 0 {
                    return Err(QuadError::ZeroDenominator);
                }
                Ok(Frac::constant(Coeff::from_rational(
                    quadra_algebra::Rational::from_i64(*num, *den),
                )))
            }
            Expr::Constant(c) => Ok(Frac::constant(Coeff::constant(c.0))),
            Expr::Unknown(u) => Ok(Frac::from_poly(MultiPoly::var(u.0 * (self.top + 1)))),
            Expr::Deriv(u, order) => {
                if *order > self.top {
                    return Err(QuadError::ExponentOverflow);
                }
                Ok(Frac::from_poly(MultiPoly::var(
                    u.0 * (self.top + 1) + order,
                )))
            }
            Expr::Add(args) => {
                let mut acc = Frac::from_poly(MultiPoly::zero());
                for arg in args {
                    let rhs = self.lower(arg)?;
                    acc = self.add(acc, rhs);
                }
                Ok(acc)
            }
            Expr::Mul(args) => {
                let mut acc = Frac::constant(Coeff::one());
                for arg in args {
                    let rhs = self.lower(arg)?;
                    acc = Self::mul(acc, rhs)?;
                }
                Ok(acc)
            }
            Expr::Pow(base, exp) => {
                if exp.unsigned_abs() > MAX_EXPONENT {
                    return Err(QuadError::ExponentOverflow);
                }
                let base = self.lower(base)?;
                if *exp >= 0 {
                    Self::pow(base, exp.unsigned_abs())
                } else {
                    let flipped = self.recip(base)?;
                    Self::pow(flipped, exp.unsigned_abs())
                }
            }
            Expr::Neg(inner) => {
                let mut frac = self.lower(inner)?;
                frac.num = frac.num.neg();
                Ok(frac)
            }
            Expr::Div(num, den) => {
                let num = self.lower(num)?;
                let den = self.lower(den)?;
                let den = self.recip(den)?;
                Self::mul(num, den)
            }
        }
    }

    /// Interns a canonical factor, reusing an existing id on a
    /// structural match.
    fn intern(&mut self, canonical: MultiPoly<Coeff>) -> usize {
        if let Some(id) = self.factors.iter().position(|f| *f == canonical) {
            return id;
        }
        self.factors.push(canonical);
        self.factors.len() - 1
    }

    /// Inverts a fraction.
    ///
    /// The old denominator factors expand back into the new numerator.
    /// The old numerator splits into unit content times either a
    /// constant (fully absorbed) or a canonical monic factor that gets
    /// interned.
    fn recip(&mut self, frac: Frac) -> Result<Frac, QuadError> {
        if frac.num.is_zero() {
            return Err(QuadError::ZeroDenominator);
        }

        let mut num = MultiPoly::one();
        for (id, pow) in &frac.den {
            num = num.mul(&self.factors[*id].pow(*pow));
        }

        let (content, reduced) = frac.num.split_content();
        let mut den = Vec::new();
        let scalar = if reduced.len() == 1 {
            // After the content split a single term is a constant.
            let (_, c) = &reduced.terms()[0];
            c.inv().ok_or(QuadError::ZeroDenominator)?
        } else {
            let (_, lead) = reduced
                .leading_term()
                .ok_or(QuadError::ZeroDenominator)?
                .clone();
            let lead_inv = lead.inv().ok_or(QuadError::ZeroDenominator)?;
            let canonical = reduced.scale(&lead_inv);
            den.push((self.intern(canonical), 1));
            lead_inv
        };
        num = num.mul_term(&content.pow(-1), &scalar);
        Ok(Frac { num, den })
    }

    fn mul(a: Frac, b: Frac) -> Result<Frac, QuadError> {
        let num = a.num.mul(&b.num);
        let mut den = Vec::with_capacity(a.den.len() + b.den.len());
        let (mut i, mut j) = (0, 0);
        while i < a.den.len() && j < b.den.len() {
            let (ida, pa) = a.den[i];
            let (idb, pb) = b.den[j];
            match ida.cmp(&idb) {
                std::cmp::Ordering::Less => {
                    den.push((ida, pa));
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    den.push((idb, pb));
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    let pow = pa.checked_add(pb).ok_or(QuadError::ExponentOverflow)?;
                    den.push((ida, pow));
                    i += 1;
                    j += 1;
                }
            }
        }
        den.extend_from_slice(&a.den[i..]);
        den.extend_from_slice(&b.den[j..]);
        Ok(Frac { num, den })
    }

    /// Adds two fractions over their least common denominator.
    fn add(&self, a: Frac, b: Frac) -> Frac {
        if a.den == b.den {
            return Frac {
                num: a.num.add(&b.num),
                den: a.den,
            };
        }

        let mut union: Vec<(usize, u32)> = a.den.clone();
        for &(id, pow) in &b.den {
            match union.binary_search_by_key(&id, |&(i, _)| i) {
                Ok(at) => union[at].1 = union[at].1.max(pow),
                Err(at) => union.insert(at, (id, pow)),
            }
        }

        let scale = |num: &MultiPoly<Coeff>, den: &[(usize, u32)]| {
            let mut scaled = num.clone();
            for &(id, pow) in &union {
                let have = den
                    .binary_search_by_key(&id, |&(i, _)| i)
                    .map_or(0, |at| den[at].1);
                if pow > have {
                    scaled = scaled.mul(&self.factors[id].pow(pow - have));
                }
            }
            scaled
        };

        let num = scale(&a.num, &a.den).add(&scale(&b.num, &b.den));
        Frac { num, den: union }
    }

    fn pow(frac: Frac, exp: u32) -> Result<Frac, QuadError> {
        if exp == 0 {
            return Ok(Frac::constant(Coeff::one()));
        }
        let num = frac.num.pow(exp);
        let den = frac
            .den
            .iter()
            .map(|&(id, pow)| {
                pow.checked_mul(exp)
                    .map(|p| (id, p))
                    .ok_or(QuadError::ExponentOverflow)
            })
            .collect::<Result<_, _>>()?;
        Ok(Frac { num, den })
    }

    /// Divides out denominator factors that the numerator is exactly
    /// divisible by. Additions can collapse a fraction this way.
    fn cancel(&self, frac: Frac) -> Frac {
        let mut num = frac.num;
        let mut den = Vec::new();
        for (id, mut pow) in frac.den {
            while pow > 0 {
                match num.try_div_exact(&self.factors[id]) {
                    Some(quotient) => {
                        num = quotient;
                        pow -= 1;
                    }
                    None => break,
                }
            }
            if pow > 0 {
                den.push((id, pow));
            }
        }
        Frac { num, den }
    }
}

/// Converts a lowered fraction into a Laurent monomial, stripping the
/// coefficient. Fails unless the numerator is a single term and every
/// denominator factor is backed by a ring variable.
pub(crate) fn as_monomial(frac: &Frac, frac_ids: &[Option<u32>]) -> Result<Monomial, QuadError> {
    if frac.num.len() != 1 {
        return Err(QuadError::NotMonomial);
    }
    let (m, _) = &frac.num.terms()[0];
    let mut result = m.clone();
    for &(id, pow) in &frac.den {
        let ring_var = frac_ids
            .get(id)
            .copied()
            .flatten()
            .ok_or(QuadError::UnknownDenominator)?;
        let exp = i32::try_from(pow).map_err(|_| QuadError::ExponentOverflow)?;
        result = result.mul(&Monomial::var_pow(ring_var, exp));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Unknown;
    use quadra_algebra::Rational;

    fn q(n: i64) -> Coeff {
        Coeff::from_integer(n)
    }

    #[test]
    fn test_atoms() {
        // One unknown, derivatives up to order 3.
        let mut lowerer = Lowerer::new(3);
        let u = Unknown(0);

        let f = lowerer.lower(&u.expr()).unwrap();
        assert_eq!(f.num, MultiPoly::var(0));
        assert!(f.den.is_empty());

        let f = lowerer.lower(&u.dx(2)).unwrap();
        assert_eq!(f.num, MultiPoly::var(2));

        let f = lowerer.lower(&Expr::ratio(3, 4)).unwrap();
        assert_eq!(
            f.num,
            MultiPoly::constant(Coeff::from_rational(Rational::from_i64(3, 4)))
        );
    }

    #[test]
    fn test_deriv_beyond_cap() {
        let mut lowerer = Lowerer::new(2);
        let u = Unknown(0);
        assert_eq!(
            lowerer.lower(&u.dx(3)).unwrap_err(),
            QuadError::ExponentOverflow
        );
    }

    #[test]
    fn test_monomial_denominator_absorbed() {
        let mut lowerer = Lowerer::new(1);
        let u = Unknown(0);

        // 1/u becomes the Laurent monomial u^-1 with no factors.
        let f = lowerer.lower(&(Expr::int(1) / u.expr())).unwrap();
        assert!(f.den.is_empty());
        assert_eq!(f.num, MultiPoly::monomial(Monomial::var_pow(0, -1), q(1)));
        assert!(lowerer.factors().is_empty());

        // 1/(2u^3) picks up the inverted scalar too.
        let f = lowerer
            .lower(&(Expr::int(1) / (Expr::int(2) * u.expr().pow(3))))
            .unwrap();
        assert_eq!(
            f.num,
            MultiPoly::monomial(
                Monomial::var_pow(0, -3),
                Coeff::from_rational(Rational::from_i64(1, 2))
            )
        );
    }

    #[test]
    fn test_polynomial_denominator_interned() {
        let mut lowerer = Lowerer::new(1);
        let u = Unknown(0);
        let up1 = u.expr() + Expr::int(1);

        let f = lowerer.lower(&(Expr::int(1) / up1.clone())).unwrap();
        assert_eq!(f.den, vec![(0, 1)]);
        assert!(f.num.is_one());
        assert_eq!(lowerer.factors().len(), 1);

        // The same denominator reuses the interned factor.
        let g = lowerer.lower(&(u.expr() / up1)).unwrap();
        assert_eq!(g.den, vec![(0, 1)]);
        assert_eq!(lowerer.factors().len(), 1);
    }

    #[test]
    fn test_denominator_scaled_monic() {
        let mut lowerer = Lowerer::new(1);
        let u = Unknown(0);

        // 1/(2u + 2): factor is the monic u + 1, numerator 1/2.
        let den = Expr::int(2) * u.expr() + Expr::int(2);
        let f = lowerer.lower(&(Expr::int(1) / den)).unwrap();
        assert_eq!(f.den, vec![(0, 1)]);
        assert_eq!(
            f.num,
            MultiPoly::constant(Coeff::from_rational(Rational::from_i64(1, 2)))
        );
        let factor = &lowerer.factors()[0];
        assert_eq!(factor.leading_term(), Some(&(Monomial::var(0), q(1))));
    }

    #[test]
    fn test_denominator_content_split() {
        let mut lowerer = Lowerer::new(1);
        let u = Unknown(0);

        // 1/(u^2 + u) = u^-1 / (u + 1): the monomial content is
        // absorbed, only the multi-term part is interned.
        let den = u.expr().pow(2) + u.expr();
        let f = lowerer.lower(&(Expr::int(1) / den)).unwrap();
        assert_eq!(f.den, vec![(0, 1)]);
        assert_eq!(f.num, MultiPoly::monomial(Monomial::var_pow(0, -1), q(1)));
        assert_eq!(lowerer.factors().len(), 1);
        assert_eq!(
            lowerer.factors()[0],
            MultiPoly::var(0).add(&MultiPoly::one())
        );
    }

    #[test]
    fn test_nested_reciprocal() {
        let mut lowerer = Lowerer::new(1);
        let u = Unknown(0);

        // 1/(1/(u+1)) expands back to u + 1.
        let inner = Expr::int(1) / (u.expr() + Expr::int(1));
        let f = lowerer.lower(&(Expr::int(1) / inner)).unwrap();
        assert!(f.den.is_empty());
        assert_eq!(f.num, MultiPoly::var(0).add(&MultiPoly::one()));
    }

    #[test]
    fn test_negative_power() {
        let mut lowerer = Lowerer::new(1);
        let u = Unknown(0);

        let f = lowerer
            .lower(&(u.expr() + Expr::int(1)).pow(-2))
            .unwrap();
        assert_eq!(f.den, vec![(0, 2)]);
        assert!(f.num.is_one());

        let f = lowerer.lower(&u.expr().pow(-3)).unwrap();
        assert!(f.den.is_empty());
        assert_eq!(f.num, MultiPoly::monomial(Monomial::var_pow(0, -3), q(1)));
    }

    #[test]
    fn test_addition_common_denominator() {
        let mut lowerer = Lowerer::new(1);
        let u = Unknown(0);
        let up1 = u.expr() + Expr::int(1);

        // 1/(u+1) + u: numerator (1 + u(u+1)) over the factor.
        let f = lowerer
            .lower(&(Expr::int(1) / up1 + u.expr()))
            .unwrap();
        assert_eq!(f.den, vec![(0, 1)]);
        assert_eq!(f.num.len(), 3);
        assert_eq!(f.num.coefficient_of(&Monomial::var_pow(0, 2)), Some(&q(1)));
    }

    #[test]
    fn test_cancel_collapses() {
        let mut lowerer = Lowerer::new(1);
        let u = Unknown(0);
        let up1 = u.expr() + Expr::int(1);

        // 1/(u+1) + u/(u+1) = 1 after cancellation.
        let expr = Expr::int(1) / up1.clone() + u.expr() / up1;
        let f = lowerer.lower_equation(&expr).unwrap();
        assert!(f.den.is_empty());
        assert!(f.num.is_one());
    }

    #[test]
    fn test_zero_denominator() {
        let mut lowerer = Lowerer::new(1);
        let u = Unknown(0);
        assert_eq!(
            lowerer
                .lower(&(Expr::int(1) / (u.expr() - u.expr())))
                .unwrap_err(),
            QuadError::ZeroDenominator
        );
        assert_eq!(
            lowerer.lower(&Expr::ratio(1, 0)).unwrap_err(),
            QuadError::ZeroDenominator
        );
    }

    #[test]
    fn test_as_monomial() {
        let mut lowerer = Lowerer::new(1);
        let u = Unknown(0);

        let f = lowerer.lower(&u.expr().pow(2)).unwrap();
        assert_eq!(
            as_monomial(&f, &[]).unwrap(),
            Monomial::var_pow(0, 2)
        );

        // 1/(u+1) maps onto the ring variable assigned to its factor.
        let f = lowerer
            .lower(&(Expr::int(1) / (u.expr() + Expr::int(1))))
            .unwrap();
        assert_eq!(as_monomial(&f, &[Some(7)]).unwrap(), Monomial::var(7));
        assert_eq!(
            as_monomial(&f, &[None]).unwrap_err(),
            QuadError::UnknownDenominator
        );

        let f = lowerer.lower(&(u.expr() + Expr::int(1))).unwrap();
        assert_eq!(as_monomial(&f, &[]).unwrap_err(), QuadError::NotMonomial);
    }
}
