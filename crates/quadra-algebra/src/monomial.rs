//! Sparse Laurent monomials.
//!
//! A monomial is a product of integer powers of variables, identified by
//! `u32` ids. Exponents may be negative (reciprocal powers), which is what
//! lets the engine treat `1/u` terms with the same machinery as `u^2`.

use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;

/// Exponent storage: (variable id, non-zero exponent), sorted by id.
type Exps = SmallVec<[(u32, i32); 4]>;

/// A sparse monomial with integer (possibly negative) exponents.
///
/// Invariants: pairs sorted by variable id, no zero exponents stored.
/// The empty monomial is the constant 1.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Monomial {
    exps: Exps,
}

impl Monomial {
    /// The constant monomial 1.
    #[must_use]
    pub fn one() -> Self {
        Self { exps: Exps::new() }
    }

    /// A single variable to the first power.
    #[must_use]
    pub fn var(v: u32) -> Self {
        Self::var_pow(v, 1)
    }

    /// A single variable raised to `exp`.
    #[must_use]
    pub fn var_pow(v: u32, exp: i32) -> Self {
        if exp == 0 {
            return Self::one();
        }
        let mut exps = Exps::new();
        exps.push((v, exp));
        Self { exps }
    }

    /// Builds a monomial from (variable, exponent) pairs.
    ///
    /// Pairs are sorted, duplicates merged, zero exponents dropped.
    #[must_use]
    pub fn from_exps<I: IntoIterator<Item = (u32, i32)>>(pairs: I) -> Self {
        let mut exps: Exps = pairs.into_iter().collect();
        exps.sort_by_key(|&(v, _)| v);

        let mut merged = Exps::new();
        for (v, e) in exps {
            match merged.last_mut() {
                Some((lv, le)) if *lv == v => *le += e,
                _ => merged.push((v, e)),
            }
        }
        merged.retain(|&mut (_, e)| e != 0);

        Self { exps: merged }
    }

    /// Returns true if this is the constant monomial 1.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.exps.is_empty()
    }

    /// Returns the (variable, exponent) pairs, sorted by variable id.
    #[must_use]
    pub fn exponents(&self) -> &[(u32, i32)] {
        &self.exps
    }

    /// Returns the exponent of `v` (zero when absent).
    #[must_use]
    pub fn exponent(&self, v: u32) -> i32 {
        self.exps
            .binary_search_by_key(&v, |&(var, _)| var)
            .map_or(0, |i| self.exps[i].1)
    }

    /// Iterates over the variables appearing in this monomial.
    pub fn vars(&self) -> impl Iterator<Item = u32> + '_ {
        self.exps.iter().map(|&(v, _)| v)
    }

    /// Multiplies two monomials (exponents add, cancellations drop out).
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        let mut exps = Exps::new();
        let (mut i, mut j) = (0, 0);

        while i < self.exps.len() && j < other.exps.len() {
            let (va, ea) = self.exps[i];
            let (vb, eb) = other.exps[j];
            match va.cmp(&vb) {
                Ordering::Less => {
                    exps.push((va, ea));
                    i += 1;
                }
                Ordering::Greater => {
                    exps.push((vb, eb));
                    j += 1;
                }
                Ordering::Equal => {
                    if ea + eb != 0 {
                        exps.push((va, ea + eb));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
        exps.extend_from_slice(&self.exps[i..]);
        exps.extend_from_slice(&other.exps[j..]);

        Self { exps }
    }

    /// Raises the monomial to an integer power.
    #[must_use]
    pub fn pow(&self, exp: i32) -> Self {
        if exp == 0 {
            return Self::one();
        }
        Self {
            exps: self.exps.iter().map(|&(v, e)| (v, e * exp)).collect(),
        }
    }

    /// The sum of exponents (may be negative for Laurent monomials).
    #[must_use]
    pub fn total_degree(&self) -> i64 {
        self.exps.iter().map(|&(_, e)| i64::from(e)).sum()
    }

    /// The sum of absolute exponents.
    #[must_use]
    pub fn abs_degree(&self) -> u32 {
        self.exps.iter().map(|&(_, e)| e.unsigned_abs()).sum()
    }

    /// Returns true if any exponent is negative.
    #[must_use]
    pub fn has_negative(&self) -> bool {
        self.exps.iter().any(|&(_, e)| e < 0)
    }

    /// Returns true if `other / self` has no negative exponents, i.e.
    /// every exponent here is at most the matching exponent in `other`.
    #[must_use]
    pub fn divides(&self, other: &Self) -> bool {
        self.exps.iter().all(|&(v, e)| e <= other.exponent(v))
    }
}

impl PartialOrd for Monomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Monomial {
    /// Lexicographic on exponent vectors: walk variables in ascending id
    /// order, first differing exponent decides, larger exponent greater.
    fn cmp(&self, other: &Self) -> Ordering {
        let (mut i, mut j) = (0, 0);

        while i < self.exps.len() || j < other.exps.len() {
            let a = self.exps.get(i).copied();
            let b = other.exps.get(j).copied();

            let (ea, eb) = match (a, b) {
                (Some((va, ea)), Some((vb, eb))) => match va.cmp(&vb) {
                    Ordering::Less => {
                        i += 1;
                        (ea, 0)
                    }
                    Ordering::Greater => {
                        j += 1;
                        (0, eb)
                    }
                    Ordering::Equal => {
                        i += 1;
                        j += 1;
                        (ea, eb)
                    }
                },
                (Some((_, ea)), None) => {
                    i += 1;
                    (ea, 0)
                }
                (None, Some((_, eb))) => {
                    j += 1;
                    (0, eb)
                }
                (None, None) => unreachable!(),
            };

            match ea.cmp(&eb) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }

        Ordering::Equal
    }
}

impl fmt::Debug for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_one() {
            return write!(f, "1");
        }
        let parts: Vec<String> = self
            .exps
            .iter()
            .map(|&(v, e)| {
                if e == 1 {
                    format!("x{v}")
                } else {
                    format!("x{v}^{e}")
                }
            })
            .collect();
        write!(f, "{}", parts.join("*"))
    }
}
