//! A PDE system lowered into its differential polynomial ring.
//!
//! Building a [`PdeSystem`] runs validation, lowering, reciprocal
//! interning and the construction of both derivative tables. Everything
//! the search needs afterwards (atom expansions, reduction targets) is
//! derived from the tables kept here.

use quadra_algebra::{Coeff, Derivation, Monomial, MultiPoly, Ring, TableDerivation};

use crate::config::QuadratizeOptions;
use crate::error::QuadError;
use crate::expr::Expr;
use crate::input::PdeInput;
use crate::lower::{self, Lowerer};
use crate::ring::{DiffRing, FracVar, VarKind};

/// What one quadratic-form atom stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AtomLabel {
    /// The constant atom 1.
    One,
    /// A ring variable: a base derivative or a reciprocal variable.
    Var(u32),
    /// The `order`-th spatial derivative of reciprocal variable `idx`
    /// (order >= 1; order zero is `Var`).
    FracDer { idx: u32, order: u32 },
    /// The `order`-th spatial derivative of auxiliary variable `idx`
    /// (order zero is the generator itself).
    AuxDer { idx: usize, order: u32 },
}

/// An atom of the quadratic form: a label plus its expansion in the
/// ring, used to build the product span.
#[derive(Debug, Clone)]
pub(crate) struct Atom {
    pub label: AtomLabel,
    pub expansion: MultiPoly<Coeff>,
}

/// Which equation a reduction target corresponds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TargetLabel {
    /// Evolution equation of an input unknown.
    Unknown(u32),
    /// Prolonged evolution of a reciprocal variable.
    Frac(u32),
    /// Prolonged evolution of an auxiliary variable.
    Aux(usize),
}

/// A lowered evolution system with its derivative tables.
#[derive(Debug, Clone)]
pub(crate) struct PdeSystem {
    ring: DiffRing,
    constants: Vec<String>,
    /// Right-hand sides over the extended ring, indexed by unknown.
    rhs: Vec<MultiPoly<Coeff>>,
    /// Spatial derivative of each ring variable; `None` past the cap.
    dic_x: Vec<Option<MultiPoly<Coeff>>>,
    /// Time derivative rules: base variables up to the auxiliary
    /// budget, plus one rule per reciprocal variable.
    dic_t: Vec<Option<MultiPoly<Coeff>>>,
    /// Intern id of each denominator factor to its ring index; `None`
    /// when every occurrence cancelled during lowering.
    frac_ids: Vec<Option<u32>>,
    /// Factor intern table, kept so later expressions lower against
    /// the same ids.
    factors: Vec<MultiPoly<Coeff>>,
}

impl PdeSystem {
    pub(crate) fn build(input: &PdeInput, options: &QuadratizeOptions) -> Result<Self, QuadError> {
        let rhs_exprs = input.validated_rhs()?;
        let max_order = rhs_exprs
            .iter()
            .map(|e| e.max_derivative_order())
            .max()
            .unwrap_or(0);
        let max_der = options.max_der_order.unwrap_or(max_order);
        let top = max_order + max_der;

        let mut lowerer = Lowerer::new(top);
        let fracs = rhs_exprs
            .iter()
            .map(|e| lowerer.lower_equation(e))
            .collect::<Result<Vec<_>, _>>()?;
        let factors = lowerer.into_factors();

        // Reciprocal variables, in intern order, for the factors that
        // survived cancellation.
        let mut ring = DiffRing::new(input.unknowns().to_vec(), max_order, max_der);
        let mut frac_ids: Vec<Option<u32>> = vec![None; factors.len()];
        for id in 0..factors.len() {
            if fracs.iter().any(|f| f.den.iter().any(|&(i, _)| i == id)) {
                let order = factors[id]
                    .terms()
                    .iter()
                    .map(|(m, _)| {
                        m.vars()
                            .map(|v| match ring.decode(v) {
                                VarKind::Base { order, .. } => order,
                                VarKind::Frac { .. } => 0,
                            })
                            .max()
                            .unwrap_or(0)
                    })
                    .max()
                    .unwrap_or(0);
                frac_ids[id] = Some(ring.push_frac(FracVar {
                    denominator: factors[id].clone(),
                    order,
                }));
            }
        }

        // Rewrite each right-hand side as a polynomial over the
        // extended ring: surviving factors become reciprocal powers.
        let rhs: Vec<MultiPoly<Coeff>> = fracs
            .iter()
            .map(|f| {
                let exps = f.den.iter().filter_map(|&(id, pow)| {
                    let idx = frac_ids[id]?;
                    let exp = i32::try_from(pow).unwrap_or(i32::MAX);
                    Some((ring.frac_var(idx), exp))
                });
                f.num.mul_term(&Monomial::from_exps(exps), &Coeff::one())
            })
            .collect();

        let mut system = PdeSystem {
            ring,
            constants: input.constants().to_vec(),
            rhs,
            dic_x: Vec::new(),
            dic_t: Vec::new(),
            frac_ids,
            factors,
        };
        system.build_tables()?;
        Ok(system)
    }

    /// Fills both derivative tables.
    ///
    /// Order matters: base spatial rules come first, the reciprocal
    /// spatial rules differentiate denominators through them, and the
    /// time rules differentiate entire right-hand sides through the
    /// finished spatial table.
    fn build_tables(&mut self) -> Result<(), QuadError> {
        let ring = &self.ring;
        let n = ring.n_unknowns();
        let top = ring.top();
        let var_count = ring.var_count();

        // Spatial rules for base ids: shift one order up, cap at top.
        let mut dic_x: Vec<Option<MultiPoly<Coeff>>> = vec![None; var_count];
        for k in 0..n {
            for order in 0..top {
                dic_x[ring.base_var(k, order) as usize] =
                    Some(MultiPoly::var(ring.base_var(k, order + 1)));
            }
        }

        // Reciprocal spatial rules: d/dx (1/F) = -F_x / F^2. Missing
        // base rules mean the denominator order sits at the cap; the
        // reciprocal then has no spatial derivative either.
        for idx in 0..ring.fracs().len() {
            let q_id = ring.frac_var(u32::try_from(idx).unwrap_or(u32::MAX));
            let denominator = ring.fracs()[idx].denominator.clone();
            let rule = {
                let table = TableDerivation::new(&dic_x);
                table.derive(&denominator).ok()
            };
            dic_x[q_id as usize] = rule.map(|derived| {
                derived
                    .neg()
                    .mul_term(&Monomial::var_pow(q_id, 2), &Coeff::one())
            });
        }
        self.dic_x = dic_x;

        // Time rules for base ids: dic_t[u, i] = D_x^i(rhs_u), stored
        // up to the auxiliary derivative budget.
        let mut dic_t: Vec<Option<MultiPoly<Coeff>>> = vec![None; var_count];
        for k in 0..n {
            let mut level = self.rhs[k as usize].clone();
            dic_t[ring.base_var(k, 0) as usize] = Some(level.clone());
            for order in 1..=ring.max_der() {
                level = self.derive_x(&level)?;
                dic_t[ring.base_var(k, order) as usize] = Some(level.clone());
            }
        }

        // Reciprocal time rules: d/dt (1/F) = -F_t / F^2. The chain
        // needs base time rules up to the deepest denominator order,
        // which can exceed the stored budget; extend transiently.
        if !ring.fracs().is_empty() {
            let needed = ring.fracs().iter().map(|f| f.order).max().unwrap_or(0);
            let mut full_t = dic_t.clone();
            for k in 0..n {
                let mut level = self.rhs[k as usize].clone();
                for order in 1..=needed {
                    let slot = ring.base_var(k, order) as usize;
                    if let Some(stored) = &full_t[slot] {
                        level = stored.clone();
                    } else {
                        level = self.derive_x(&level)?;
                        full_t[slot] = Some(level.clone());
                    }
                }
            }
            for idx in 0..ring.fracs().len() {
                let q_id = ring.frac_var(u32::try_from(idx).unwrap_or(u32::MAX));
                let denominator = ring.fracs()[idx].denominator.clone();
                let table = TableDerivation::new(&full_t);
                let derived = table.derive(&denominator)?;
                dic_t[q_id as usize] = Some(
                    derived
                        .neg()
                        .mul_term(&Monomial::var_pow(q_id, 2), &Coeff::one()),
                );
            }
        }
        self.dic_t = dic_t;
        Ok(())
    }

    pub(crate) fn ring(&self) -> &DiffRing {
        &self.ring
    }

    pub(crate) fn constants(&self) -> &[String] {
        &self.constants
    }

    pub(crate) fn rhs(&self) -> &[MultiPoly<Coeff>] {
        &self.rhs
    }

    pub(crate) fn derive_x(&self, poly: &MultiPoly<Coeff>) -> Result<MultiPoly<Coeff>, QuadError> {
        let table = TableDerivation::new(&self.dic_x);
        Ok(table.derive(poly)?)
    }

    /// Lowers an auxiliary generator expression to a ring monomial,
    /// reusing the system's factor table.
    pub(crate) fn monomial_of(&self, expr: &Expr) -> Result<Monomial, QuadError> {
        let mut lowerer = Lowerer::with_factors(self.ring.top(), self.factors.clone());
        let frac = lowerer.lower(expr)?;
        lower::as_monomial(&frac, &self.frac_ids)
    }

    /// The atoms of the quadratic form for a candidate set: 1, every
    /// ring variable, and the prolongations of reciprocal and auxiliary
    /// variables up to the derivative budget.
    pub(crate) fn atoms(&self, aux: &[Monomial]) -> Result<Vec<Atom>, QuadError> {
        let ring = &self.ring;
        let mut atoms = Vec::new();
        atoms.push(Atom {
            label: AtomLabel::One,
            expansion: MultiPoly::one(),
        });
        for var in 0..u32::try_from(ring.var_count()).unwrap_or(u32::MAX) {
            atoms.push(Atom {
                label: AtomLabel::Var(var),
                expansion: MultiPoly::var(var),
            });
        }
        for idx in 0..u32::try_from(ring.fracs().len()).unwrap_or(u32::MAX) {
            let budget = ring
                .max_der()
                .saturating_sub(ring.fracs()[idx as usize].order);
            let mut level = MultiPoly::var(ring.frac_var(idx));
            for order in 1..=budget {
                level = self.derive_x(&level)?;
                atoms.push(Atom {
                    label: AtomLabel::FracDer { idx, order },
                    expansion: level.clone(),
                });
            }
        }
        for (idx, generator) in aux.iter().enumerate() {
            let budget = ring
                .max_der()
                .saturating_sub(ring.monomial_order(generator));
            let mut level = MultiPoly::monomial(generator.clone(), Coeff::one());
            atoms.push(Atom {
                label: AtomLabel::AuxDer { idx, order: 0 },
                expansion: level.clone(),
            });
            for order in 1..=budget {
                level = self.derive_x(&level)?;
                atoms.push(Atom {
                    label: AtomLabel::AuxDer { idx, order },
                    expansion: level.clone(),
                });
            }
        }
        Ok(atoms)
    }

    /// The reduction targets for a candidate set: every input
    /// right-hand side, the time evolution of every reciprocal
    /// variable, and the time evolution of every auxiliary generator.
    pub(crate) fn targets(
        &self,
        aux: &[Monomial],
    ) -> Result<Vec<(TargetLabel, MultiPoly<Coeff>)>, QuadError> {
        let ring = &self.ring;
        let mut targets = Vec::new();
        for k in 0..ring.n_unknowns() {
            targets.push((TargetLabel::Unknown(k), self.rhs[k as usize].clone()));
        }
        for idx in 0..u32::try_from(ring.fracs().len()).unwrap_or(u32::MAX) {
            let q_id = ring.frac_var(idx);
            let rule = self.dic_t[q_id as usize]
                .clone()
                .ok_or(QuadError::Algebra(
                    quadra_algebra::AlgebraError::MissingDerivative(q_id),
                ))?;
            targets.push((TargetLabel::Frac(idx), rule));
        }
        let table = TableDerivation::new(&self.dic_t);
        for (idx, generator) in aux.iter().enumerate() {
            let poly = MultiPoly::monomial(generator.clone(), Coeff::one());
            let derived = table.derive(&poly)?;
            targets.push((TargetLabel::Aux(idx), derived));
        }
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadra_algebra::Rational;

    fn options() -> QuadratizeOptions {
        QuadratizeOptions::default()
    }

    fn coeff(n: i64) -> Coeff {
        Coeff::from_integer(n)
    }

    #[test]
    fn test_polynomial_system_tables() {
        // u_t = u_xx + u - u^3, derivative budget 2, so orders reach 4.
        let mut input = PdeInput::new("t", "x");
        let u = input.unknown("u");
        input.equation(u, u.dx(2) + u.expr() - u.expr().pow(3));
        let system = PdeSystem::build(&input, &options()).unwrap();

        let ring = system.ring();
        assert_eq!(ring.max_order(), 2);
        assert_eq!(ring.max_der(), 2);
        assert_eq!(ring.top(), 4);
        assert_eq!(ring.var_count(), 5);

        // Spatial rules shift one order up and stop at the cap.
        assert_eq!(system.dic_x[0], Some(MultiPoly::var(1)));
        assert_eq!(system.dic_x[3], Some(MultiPoly::var(4)));
        assert_eq!(system.dic_x[4], None);

        // dic_t[u_x1] = D_x(rhs) = u_x3 + u_x1 - 3u^2 u_x1.
        let d1 = system.dic_t[1].clone().unwrap();
        assert_eq!(
            d1.coefficient_of(&Monomial::from_exps([(0, 2), (1, 1)])),
            Some(&coeff(-3))
        );
        assert_eq!(d1.coefficient_of(&Monomial::var(3)), Some(&coeff(1)));
        // Stored up to the budget, no further.
        assert!(system.dic_t[2].is_some());
        assert!(system.dic_t[3].is_none());
    }

    #[test]
    fn test_laurent_system() {
        // u_t = 1/u: the denominator is a unit, no reciprocal variable.
        let mut input = PdeInput::new("t", "x");
        let u = input.unknown("u");
        input.equation(u, Expr::int(1) / u.expr());
        let system = PdeSystem::build(&input, &options()).unwrap();

        assert!(system.ring().fracs().is_empty());
        assert_eq!(
            system.rhs[0],
            MultiPoly::monomial(Monomial::var_pow(0, -1), coeff(1))
        );
    }

    #[test]
    fn test_reciprocal_system() {
        // u_t = 1/(u + 1): one reciprocal variable q with q_t = -q^3.
        let mut input = PdeInput::new("t", "x");
        let u = input.unknown("u");
        input.equation(u, Expr::int(1) / (u.expr() + Expr::int(1)));
        let system = PdeSystem::build(&input, &options()).unwrap();

        let ring = system.ring();
        assert_eq!(ring.fracs().len(), 1);
        assert_eq!(ring.fracs()[0].order, 0);
        let q_id = ring.frac_var(0);
        assert_eq!(system.rhs[0], MultiPoly::var(q_id));

        // q_t = -D_t(u + 1) q^2 = -(1/(u+1)) q^2 = -q^3.
        let rule = system.dic_t[q_id as usize].clone().unwrap();
        assert_eq!(
            rule,
            MultiPoly::monomial(Monomial::var_pow(q_id, 3), coeff(-1))
        );
    }

    #[test]
    fn test_cancelled_factor_gets_no_ring_var() {
        // (1 + u)/(u + 1) collapses to 1; the interned factor must not
        // surface as a reciprocal variable.
        let mut input = PdeInput::new("t", "x");
        let u = input.unknown("u");
        input.equation(
            u,
            (Expr::int(1) + u.expr()) / (u.expr() + Expr::int(1)),
        );
        let system = PdeSystem::build(&input, &options()).unwrap();
        assert!(system.ring().fracs().is_empty());
        assert!(system.rhs[0].is_one());
    }

    #[test]
    fn test_atoms_for_aux_set() {
        // Burgers-type: u_t = u_xx - u u_x1, budget 2.
        let mut input = PdeInput::new("t", "x");
        let u = input.unknown("u");
        input.equation(u, u.dx(2) - u.expr() * u.dx(1));
        let system = PdeSystem::build(&input, &options()).unwrap();

        let aux = vec![Monomial::var_pow(0, 2)];
        let atoms = system.atoms(&aux).unwrap();
        // 1, five ring variables, then u^2 and its two prolongations.
        assert_eq!(atoms.len(), 1 + 5 + 3);
        assert_eq!(atoms[0].label, AtomLabel::One);
        assert_eq!(atoms[6].label, AtomLabel::AuxDer { idx: 0, order: 0 });

        // D_x(u^2) = 2 u u_x1.
        let first = &atoms[7].expansion;
        assert_eq!(
            first.coefficient_of(&Monomial::from_exps([(0, 1), (1, 1)])),
            Some(&coeff(2))
        );
    }

    #[test]
    fn test_targets_for_aux_set() {
        let mut input = PdeInput::new("t", "x");
        let u = input.unknown("u");
        input.equation(u, u.dx(2) - u.expr() * u.dx(1));
        let system = PdeSystem::build(&input, &options()).unwrap();

        let aux = vec![Monomial::var_pow(0, 2)];
        let targets = system.targets(&aux).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].0, TargetLabel::Unknown(0));
        assert_eq!(targets[1].0, TargetLabel::Aux(0));

        // (u^2)_t = 2u u_t = 2u u_x2 - 2u^2 u_x1.
        let aux_t = &targets[1].1;
        assert_eq!(
            aux_t.coefficient_of(&Monomial::from_exps([(0, 1), (2, 1)])),
            Some(&coeff(2))
        );
        assert_eq!(
            aux_t.coefficient_of(&Monomial::from_exps([(0, 2), (1, 1)])),
            Some(&coeff(-2))
        );
    }

    #[test]
    fn test_monomial_of_roundtrip() {
        let mut input = PdeInput::new("t", "x");
        let u = input.unknown("u");
        input.equation(u, Expr::int(1) / (u.expr() + Expr::int(1)));
        let system = PdeSystem::build(&input, &options()).unwrap();

        let q_id = system.ring().frac_var(0);
        let m = system
            .monomial_of(&(Expr::int(1) / (u.expr() + Expr::int(1))).pow(2))
            .unwrap();
        assert_eq!(m, Monomial::var_pow(q_id, 2));

        let m = system.monomial_of(&u.expr().pow(3)).unwrap();
        assert_eq!(m, Monomial::var_pow(0, 3));
    }
}
