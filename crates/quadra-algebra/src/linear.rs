//! Exact span membership over sparse polynomials.
//!
//! The quadraticity check reduces to one linear-algebra question: is a
//! target polynomial a linear combination of a given family of product
//! polynomials? This module answers it with a row-echelon basis kept in
//! exact field arithmetic, tracking for every row the combination of
//! inserted generators that produced it, so membership comes with a
//! witness and failure comes with the exact residual.

use std::collections::BTreeMap;

use crate::monomial::Monomial;
use crate::poly::MultiPoly;
use crate::traits::{Field, Ring};

/// The outcome of reducing a target against the current basis.
#[derive(Clone, Debug)]
pub struct Reduction<F: Field> {
    /// The part of the target not in the span (zero iff the target is).
    pub residual: MultiPoly<F>,
    /// Generator combination accounting for the spanned part, as
    /// (generator tag, coefficient) pairs sorted by tag.
    pub combination: Vec<(usize, F)>,
}

impl<F: Field> Reduction<F> {
    /// Returns true if the target was entirely in the span.
    #[must_use]
    pub fn is_member(&self) -> bool {
        self.residual.is_zero()
    }
}

struct Row<F: Field> {
    /// Leading coefficient normalized to 1.
    poly: MultiPoly<F>,
    combo: BTreeMap<usize, F>,
}

/// An incremental row-echelon basis with combination tracking.
///
/// Insertion order is significant only for which combination witnesses are
/// produced; span membership itself is order-independent. All iteration is
/// over ordered structures, so results are deterministic.
pub struct SpanReducer<F: Field> {
    rows: Vec<Row<F>>,
    pivots: BTreeMap<Monomial, usize>,
}

impl<F: Field> Default for SpanReducer<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Field> SpanReducer<F> {
    /// Creates an empty basis.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            pivots: BTreeMap::new(),
        }
    }

    /// Returns the number of independent rows.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.rows.len()
    }

    /// Inserts a generator polynomial tagged `tag`.
    ///
    /// The generator is reduced against the basis; if anything remains it
    /// becomes a new row with its leading monomial as pivot.
    pub fn insert(&mut self, tag: usize, poly: MultiPoly<F>) {
        let mut p = poly;
        let mut combo: BTreeMap<usize, F> = BTreeMap::new();
        combo.insert(tag, F::one());

        while let Some((m, c)) = p.leading_term().cloned() {
            let Some(&ri) = self.pivots.get(&m) else {
                break;
            };
            eliminate(&mut p, &mut combo, &self.rows[ri], &c);
        }

        let Some((lead_m, lead_c)) = p.leading_term().cloned() else {
            return;
        };

        // Normalize the new row's leading coefficient to 1.
        let inv = lead_c.inv().expect("leading coefficient is non-zero");
        let row = Row {
            poly: p.scale(&inv),
            combo: combo
                .into_iter()
                .map(|(t, c)| (t, c * inv.clone()))
                .filter(|(_, c)| !c.is_zero())
                .collect(),
        };
        self.pivots.insert(lead_m, self.rows.len());
        self.rows.push(row);
    }

    /// Reduces a target polynomial against the basis.
    ///
    /// The returned combination satisfies
    /// `target = residual + sum(coeff * generator(tag))`.
    #[must_use]
    pub fn reduce(&self, target: &MultiPoly<F>) -> Reduction<F> {
        let mut p = target.clone();
        let mut combo: BTreeMap<usize, F> = BTreeMap::new();
        let mut residual_terms = Vec::new();

        while let Some((m, c)) = p.leading_term().cloned() {
            if let Some(&ri) = self.pivots.get(&m) {
                // The row accounts for c * row.poly of the target, so the
                // combination gains +c * row.combo.
                let row = &self.rows[ri];
                p = p.sub(&row.poly.scale(&c));
                for (t, rc) in &row.combo {
                    let entry = combo.remove(t).unwrap_or_else(F::zero);
                    let updated = entry + rc.clone() * c.clone();
                    if !updated.is_zero() {
                        combo.insert(*t, updated);
                    }
                }
            } else {
                residual_terms.push((m, c));
                p.remove_leading();
            }
        }

        Reduction {
            residual: MultiPoly::new(residual_terms),
            combination: combo
                .into_iter()
                .filter(|(_, c)| !c.is_zero())
                .collect(),
        }
    }
}

/// Subtracts `c * row.poly` from `p` and folds `c * row.combo` into `combo`.
fn eliminate<F: Field>(
    p: &mut MultiPoly<F>,
    combo: &mut BTreeMap<usize, F>,
    row: &Row<F>,
    c: &F,
) {
    *p = p.sub(&row.poly.scale(c));
    for (t, rc) in &row.combo {
        let entry = combo.remove(t).unwrap_or_else(F::zero);
        let updated = entry - rc.clone() * c.clone();
        if !updated.is_zero() {
            combo.insert(*t, updated);
        }
    }
}
