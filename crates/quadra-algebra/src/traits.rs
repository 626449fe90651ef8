//! Algebraic structure traits.
//!
//! The engine is generic over a coefficient ring; these traits are the
//! seam. Only the structures the engine instantiates are modeled.

use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

/// A ring is a set with addition and multiplication operations.
///
/// # Laws
///
/// - Addition is associative and commutative with identity `zero()`
/// - Multiplication is associative with identity `one()`
/// - Multiplication distributes over addition
/// - Every element has an additive inverse (`neg`)
pub trait Ring:
    Clone + Eq + Debug + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> + Neg<Output = Self>
{
    /// The additive identity.
    fn zero() -> Self;

    /// The multiplicative identity.
    fn one() -> Self;

    /// Returns true if this is the additive identity.
    fn is_zero(&self) -> bool;

    /// Returns true if this is the multiplicative identity.
    fn is_one(&self) -> bool;

    /// Computes self + self + ... (n times), negated for negative n.
    fn mul_by_scalar(&self, n: i64) -> Self {
        if n == 0 {
            return Self::zero();
        }

        let mut result = self.clone();
        let abs_n = n.unsigned_abs();

        for _ in 1..abs_n {
            result = result + self.clone();
        }

        if n < 0 {
            -result
        } else {
            result
        }
    }

    /// Computes self^n for non-negative n.
    fn pow(&self, n: u32) -> Self {
        if n == 0 {
            return Self::one();
        }

        let mut result = Self::one();
        let mut base = self.clone();
        let mut exp = n;

        while exp > 0 {
            if exp & 1 == 1 {
                result = result * base.clone();
            }
            base = base.clone() * base;
            exp >>= 1;
        }

        result
    }
}

/// A field is a ring where every non-zero element has a multiplicative inverse.
pub trait Field: Ring {
    /// Computes the multiplicative inverse.
    ///
    /// Returns `None` if the element is zero.
    fn inv(&self) -> Option<Self>;

    /// Divides by another element.
    ///
    /// # Panics
    ///
    /// Panics if `other` is zero.
    fn field_div(&self, other: &Self) -> Self {
        self.clone() * other.inv().expect("division by zero")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rationals::Rational;

    #[test]
    fn test_pow() {
        let two = Rational::from_integer(2);
        assert_eq!(Ring::pow(&two, 10), Rational::from_integer(1024));
        assert_eq!(Ring::pow(&two, 0), Rational::from_integer(1));
    }

    #[test]
    fn test_mul_by_scalar() {
        let third = Rational::from_i64(1, 3);
        assert_eq!(third.mul_by_scalar(3), Rational::from_integer(1));
        assert_eq!(third.mul_by_scalar(-3), Rational::from_integer(-1));
        assert_eq!(third.mul_by_scalar(0), Rational::from_integer(0));
    }

    #[test]
    fn test_field_div() {
        let a = Rational::from_i64(3, 4);
        let b = Rational::from_i64(1, 2);
        assert_eq!(a.field_div(&b), Rational::from_i64(3, 2));
    }
}
