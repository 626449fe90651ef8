//! Variable layout of the differential polynomial ring.
//!
//! Every unknown together with its spatial derivatives up to a fixed
//! top order occupies a contiguous block of variable ids, followed by
//! one id per interned reciprocal (`q`) variable. The layout is fixed
//! when the system is built, so ids can be packed into plain `u32`s and
//! decoded without lookups.

use quadra_algebra::{Coeff, Monomial, MultiPoly};

/// An interned reciprocal variable `q = 1 / denominator`.
#[derive(Debug, Clone)]
pub(crate) struct FracVar {
    /// Canonical denominator: expanded, leading coefficient one, built
    /// from base variables only.
    pub denominator: MultiPoly<Coeff>,
    /// Highest derivative order appearing in the denominator.
    pub order: u32,
}

/// What a ring variable id stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VarKind {
    /// The `order`-th spatial derivative of an unknown.
    Base { unknown: u32, order: u32 },
    /// An interned reciprocal variable.
    Frac { idx: u32 },
}

/// Variable layout for one PDE system.
#[derive(Debug, Clone)]
pub(crate) struct DiffRing {
    unknowns: Vec<String>,
    /// Highest derivative order among the input right-hand sides.
    max_order: u32,
    /// Derivative budget for auxiliary variables.
    max_der: u32,
    /// Highest representable derivative order, `max_order + max_der`.
    top: u32,
    fracs: Vec<FracVar>,
}

impl DiffRing {
    pub(crate) fn new(unknowns: Vec<String>, max_order: u32, max_der: u32) -> Self {
        DiffRing {
            unknowns,
            max_order,
            max_der,
            top: max_order + max_der,
            fracs: Vec::new(),
        }
    }

    pub(crate) fn n_unknowns(&self) -> u32 {
        u32::try_from(self.unknowns.len()).unwrap_or(u32::MAX)
    }

    pub(crate) fn max_order(&self) -> u32 {
        self.max_order
    }

    pub(crate) fn max_der(&self) -> u32 {
        self.max_der
    }

    pub(crate) fn top(&self) -> u32 {
        self.top
    }

    pub(crate) fn fracs(&self) -> &[FracVar] {
        &self.fracs
    }

    pub(crate) fn push_frac(&mut self, frac: FracVar) -> u32 {
        self.fracs.push(frac);
        u32::try_from(self.fracs.len() - 1).unwrap_or(u32::MAX)
    }

    /// Total number of variable ids, base block plus reciprocals.
    pub(crate) fn var_count(&self) -> usize {
        self.unknowns.len() * (self.top as usize + 1) + self.fracs.len()
    }

    /// Id of the `order`-th derivative of unknown `k`.
    pub(crate) fn base_var(&self, k: u32, order: u32) -> u32 {
        debug_assert!(order <= self.top);
        k * (self.top + 1) + order
    }

    /// Id of the reciprocal variable `q_idx`.
    pub(crate) fn frac_var(&self, idx: u32) -> u32 {
        self.n_unknowns() * (self.top + 1) + idx
    }

    pub(crate) fn decode(&self, var: u32) -> VarKind {
        let base_count = self.n_unknowns() * (self.top + 1);
        if var < base_count {
            VarKind::Base {
                unknown: var / (self.top + 1),
                order: var % (self.top + 1),
            }
        } else {
            VarKind::Frac {
                idx: var - base_count,
            }
        }
    }

    /// Differential order carried by a single variable.
    ///
    /// A reciprocal variable counts as the order of its denominator,
    /// since that is the highest derivative its expansion touches.
    pub(crate) fn order_of(&self, var: u32) -> u32 {
        match self.decode(var) {
            VarKind::Base { order, .. } => order,
            VarKind::Frac { idx } => self.fracs[idx as usize].order,
        }
    }

    /// Differential order of a monomial: the highest order among its
    /// variables, zero for the empty monomial.
    pub(crate) fn monomial_order(&self, m: &Monomial) -> u32 {
        m.vars().map(|v| self.order_of(v)).max().unwrap_or(0)
    }

    /// Display name of a ring variable: `u`, `u_x2`, `q_0`.
    pub(crate) fn var_name(&self, var: u32) -> String {
        match self.decode(var) {
            VarKind::Base { unknown, order: 0 } => self.unknowns[unknown as usize].clone(),
            VarKind::Base { unknown, order } => {
                format!("{}_x{order}", self.unknowns[unknown as usize])
            }
            VarKind::Frac { idx } => format!("q_{idx}"),
        }
    }

    /// Renders a monomial over named ring variables: `u*u_x1^2`.
    pub(crate) fn monomial_string(&self, m: &Monomial) -> String {
        if m.is_one() {
            return "1".to_owned();
        }
        let mut parts = Vec::new();
        for (var, exp) in m.exponents() {
            if *exp == 1 {
                parts.push(self.var_name(*var));
            } else {
                parts.push(format!("{}^{exp}", self.var_name(*var)));
            }
        }
        parts.join("*")
    }
}
