//! Rational-function coefficients over symbolic constants.
//!
//! PDE systems may carry symbolic constants (diffusion rates, reaction
//! parameters). Coefficients then live in the fraction field
//! Q(c_0, ..., c_{k-1}): quotients of polynomials in the constants. With no
//! constants declared this degenerates to plain Q, with every denominator 1.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::monomial::Monomial;
use crate::poly::MultiPoly;
use crate::rationals::Rational;
use crate::traits::{Field, Ring};

/// An element of Q(c_0, ..., c_{k-1}).
///
/// Invariants: the denominator is non-zero with leading coefficient 1, the
/// shared monomial gcd of numerator and denominator is cancelled, and zero
/// is represented as 0/1. No full multivariate gcd is attempted; equality
/// and `is_zero` are exact regardless because expanded polynomials are
/// canonical, so cross-multiplied comparison decides.
#[derive(Clone, Debug)]
pub struct Coeff {
    num: MultiPoly<Rational>,
    den: MultiPoly<Rational>,
}

impl Coeff {
    /// Creates a coefficient from numerator and denominator polynomials.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero.
    #[must_use]
    pub fn new(num: MultiPoly<Rational>, den: MultiPoly<Rational>) -> Self {
        assert!(!den.is_zero(), "denominator cannot be zero");
        Self::normalized(num, den)
    }

    /// Creates a coefficient from a scalar rational.
    #[must_use]
    pub fn from_rational(r: Rational) -> Self {
        Self {
            num: MultiPoly::constant(r),
            den: MultiPoly::one(),
        }
    }

    /// Creates a coefficient from an integer.
    #[must_use]
    pub fn from_integer(n: i64) -> Self {
        Self::from_rational(Rational::from_integer(n))
    }

    /// The symbolic constant with id `c`.
    #[must_use]
    pub fn constant(c: u32) -> Self {
        Self {
            num: MultiPoly::var(c),
            den: MultiPoly::one(),
        }
    }

    /// Returns the numerator polynomial.
    #[must_use]
    pub fn numerator(&self) -> &MultiPoly<Rational> {
        &self.num
    }

    /// Returns the denominator polynomial.
    #[must_use]
    pub fn denominator(&self) -> &MultiPoly<Rational> {
        &self.den
    }

    /// Returns the scalar value if this coefficient is a plain rational.
    #[must_use]
    pub fn as_rational(&self) -> Option<&Rational> {
        if !self.den.is_one() {
            return None;
        }
        match self.num.terms() {
            [] => None,
            [(m, c)] if m.is_one() => Some(c),
            _ => None,
        }
    }

    /// Computes self^exp for any integer exp.
    ///
    /// Returns `None` when the base is zero and the exponent negative.
    #[must_use]
    pub fn pow_i32(&self, exp: i32) -> Option<Self> {
        if exp < 0 {
            Some(Field::inv(self)?.pow(exp.unsigned_abs()))
        } else {
            Some(Ring::pow(self, exp.unsigned_abs()))
        }
    }

    fn normalized(num: MultiPoly<Rational>, den: MultiPoly<Rational>) -> Self {
        if num.is_zero() {
            return Ring::zero();
        }

        let (num, den) = cancel_monomial_gcd(num, den);

        // Make the denominator's leading coefficient 1.
        let lead = den
            .leading_term()
            .map(|(_, c)| c.clone())
            .expect("denominator is non-zero");
        if lead.is_one() {
            Self { num, den }
        } else {
            let inv = lead.recip();
            Self {
                num: num.scale(&inv),
                den: den.scale(&inv),
            }
        }
    }
}

/// Cancels the componentwise-minimal monomial shared by all terms of both
/// polynomials.
fn cancel_monomial_gcd(
    num: MultiPoly<Rational>,
    den: MultiPoly<Rational>,
) -> (MultiPoly<Rational>, MultiPoly<Rational>) {
    let mut gcd: Option<Monomial> = None;
    for (m, _) in num.terms().iter().chain(den.terms()) {
        gcd = Some(match gcd {
            None => m.clone(),
            Some(g) => Monomial::from_exps(
                g.vars()
                    .chain(m.vars())
                    .collect::<std::collections::BTreeSet<_>>()
                    .into_iter()
                    .map(|v| (v, g.exponent(v).min(m.exponent(v)))),
            ),
        });
    }

    match gcd {
        Some(g) if !g.is_one() => {
            let shift = g.pow(-1);
            let one = Rational::from_integer(1);
            (num.mul_term(&shift, &one), den.mul_term(&shift, &one))
        }
        _ => (num, den),
    }
}

impl PartialEq for Coeff {
    fn eq(&self, other: &Self) -> bool {
        // Expanded polynomials are canonical, so cross-multiplication is
        // an exact equality test without full gcd reduction.
        self.num.mul(&other.den) == other.num.mul(&self.den)
    }
}

impl Eq for Coeff {}

impl Ring for Coeff {
    fn zero() -> Self {
        Self {
            num: MultiPoly::zero(),
            den: MultiPoly::one(),
        }
    }

    fn one() -> Self {
        Self {
            num: MultiPoly::one(),
            den: MultiPoly::one(),
        }
    }

    fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    fn is_one(&self) -> bool {
        self.num == self.den
    }
}

impl Field for Coeff {
    fn inv(&self) -> Option<Self> {
        if self.num.is_zero() {
            None
        } else {
            Some(Self::normalized(self.den.clone(), self.num.clone()))
        }
    }
}

impl Add for Coeff {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        let num = self.num.mul(&rhs.den).add(&rhs.num.mul(&self.den));
        let den = self.den.mul(&rhs.den);
        Self::normalized(num, den)
    }
}

impl Sub for Coeff {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl Mul for Coeff {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::normalized(self.num.mul(&rhs.num), self.den.mul(&rhs.den))
    }
}

impl Neg for Coeff {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            num: self.num.neg(),
            den: self.den,
        }
    }
}

impl fmt::Display for Coeff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den.is_one() {
            write!(f, "{}", self.num)
        } else {
            write!(f, "({})/({})", self.num, self.den)
        }
    }
}
