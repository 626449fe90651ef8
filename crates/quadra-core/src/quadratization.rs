//! Quadratization results and their rendering.
//!
//! Results are returned both structurally (names, generators, witness
//! terms) and as display strings over the named variables, so callers
//! can print a quadratized system or feed the generators back into the
//! checker.

use quadra_algebra::{Coeff, Monomial, MultiPoly, Rational, Ring};

use crate::checker::RawEquation;
use crate::expr::{Constant, Expr, Unknown};
use crate::ring::VarKind;
use crate::system::{AtomLabel, PdeSystem, TargetLabel};

// === Public result types ===

/// Outcome of a quadratization search.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// A quadratizing set was found.
    Found(Quadratization),
    /// No set within the size bound closes the system.
    NotFound {
        /// Nodes checked across all passes.
        nodes_visited: usize,
    },
}

impl SearchOutcome {
    /// Returns true when a quadratization was found.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    /// Nodes checked across all passes.
    #[must_use]
    pub fn nodes_visited(&self) -> usize {
        match self {
            SearchOutcome::Found(q) => q.nodes_visited,
            SearchOutcome::NotFound { nodes_visited } => *nodes_visited,
        }
    }

    /// The quadratization, when one was found.
    #[must_use]
    pub fn quadratization(&self) -> Option<&Quadratization> {
        match self {
            SearchOutcome::Found(q) => Some(q),
            SearchOutcome::NotFound { .. } => None,
        }
    }
}

/// Whether an auxiliary variable is polynomial in the input unknowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuxKind {
    /// A power product with non-negative exponents.
    Polynomial,
    /// Carries a reciprocal: a negative power or an interned
    /// denominator variable.
    Rational,
}

/// One auxiliary variable introduced by the search.
#[derive(Debug, Clone)]
pub struct AuxVar {
    /// Assigned name: `w_0`, `w_1`, ... in acceptance order.
    pub name: String,
    /// The generator over named ring variables, e.g. `u*u_x1^2`.
    pub rendered: String,
    /// The generator as an input-level expression. `None` when a
    /// coefficient inside an interned denominator does not fit `i64`.
    pub generator: Option<Expr>,
    /// Polynomial or rational.
    pub kind: AuxKind,
}

/// A reciprocal variable interned while lowering the input.
#[derive(Debug, Clone)]
pub struct ReciprocalVar {
    /// Assigned name: `q_0`, `q_1`, ... in intern order.
    pub name: String,
    /// The rendered denominator, e.g. `u + 1`.
    pub denominator: String,
}

/// One term of a quadratic right-hand side: `coeff * left * right`.
#[derive(Debug, Clone)]
pub struct QuadTerm {
    /// Rendered coefficient, e.g. `-3/4` or `2*lam`.
    pub coeff: String,
    /// First atom factor, `1` for linear and constant terms.
    pub left: String,
    /// Second atom factor.
    pub right: String,
}

impl QuadTerm {
    fn rendered(&self) -> String {
        let mut factors = Vec::new();
        if self.left != "1" {
            factors.push(self.left.clone());
        }
        if self.right != "1" {
            factors.push(self.right.clone());
        }
        if factors.is_empty() {
            return self.coeff.clone();
        }
        match self.coeff.as_str() {
            "1" => factors.join("*"),
            "-1" => format!("-{}", factors.join("*")),
            _ => format!("{}*{}", self.coeff, factors.join("*")),
        }
    }
}

/// An equation whose right-hand side is at most quadratic in the atoms.
#[derive(Debug, Clone)]
pub struct QuadEquation {
    /// Left-hand side, e.g. `u_t` or `w_0_t`.
    pub lhs: String,
    /// Right-hand side terms, each at most quadratic in the atoms.
    pub terms: Vec<QuadTerm>,
}

impl std::fmt::Display for QuadEquation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rhs = join_signed(self.terms.iter().map(QuadTerm::rendered));
        write!(f, "{} = {rhs}", self.lhs)
    }
}

/// The closed quadratic system: one equation per input unknown,
/// reciprocal variable and auxiliary variable.
#[derive(Debug, Clone)]
pub struct QuadraticSystem {
    /// Equations in target order: unknowns, then reciprocal variables,
    /// then auxiliary variables.
    pub equations: Vec<QuadEquation>,
}

impl std::fmt::Display for QuadraticSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, eq) in self.equations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{eq}")?;
        }
        Ok(())
    }
}

/// A successful quadratization.
#[derive(Debug, Clone)]
pub struct Quadratization {
    /// Auxiliary variables in acceptance order.
    pub aux: Vec<AuxVar>,
    /// Reciprocal variables the lowering introduced.
    pub reciprocals: Vec<ReciprocalVar>,
    /// The closed quadratic system.
    pub system: QuadraticSystem,
    /// Nodes checked across all passes.
    pub nodes_visited: usize,
}

impl Quadratization {
    /// Rendered generators of the polynomial auxiliary variables.
    #[must_use]
    pub fn polynomial_vars(&self) -> Vec<String> {
        self.aux
            .iter()
            .filter(|a| a.kind == AuxKind::Polynomial)
            .map(|a| a.rendered.clone())
            .collect()
    }

    /// Rendered reciprocal introductions followed by the generators of
    /// the rational auxiliary variables.
    #[must_use]
    pub fn rational_vars(&self) -> Vec<String> {
        let mut vars: Vec<String> = self
            .reciprocals
            .iter()
            .map(|r| format!("1/({})", r.denominator))
            .collect();
        vars.extend(
            self.aux
                .iter()
                .filter(|a| a.kind == AuxKind::Rational)
                .map(|a| a.rendered.clone()),
        );
        vars
    }
}

impl std::fmt::Display for Quadratization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for r in &self.reciprocals {
            writeln!(f, "{} = 1/({})", r.name, r.denominator)?;
        }
        for a in &self.aux {
            writeln!(f, "{} = {}", a.name, a.rendered)?;
        }
        write!(f, "{}", self.system)
    }
}

/// Report from [`check_quadratization`](crate::check_quadratization).
#[derive(Debug, Clone)]
pub enum CheckReport {
    /// The given variables close the system; witness attached.
    Quadratic(QuadraticSystem),
    /// At least one target stays outside the quadratic span.
    NonQuadratic,
}

impl CheckReport {
    /// Returns true when the given variables close the system.
    #[must_use]
    pub fn is_quadratic(&self) -> bool {
        matches!(self, CheckReport::Quadratic(_))
    }
}

// === Rendering ===

/// Joins rendered terms with signs folded into the separators.
fn join_signed<I: IntoIterator<Item = String>>(parts: I) -> String {
    let mut out = String::new();
    for part in parts {
        if out.is_empty() {
            out.push_str(&part);
        } else if let Some(rest) = part.strip_prefix('-') {
            out.push_str(" - ");
            out.push_str(rest);
        } else {
            out.push_str(" + ");
            out.push_str(&part);
        }
    }
    if out.is_empty() {
        out.push('0');
    }
    out
}

fn const_monomial_string(m: &Monomial, constants: &[String]) -> Option<String> {
    if m.is_one() {
        return None;
    }
    let parts: Vec<String> = m
        .exponents()
        .iter()
        .map(|&(v, e)| {
            let name = constants
                .get(v as usize)
                .cloned()
                .unwrap_or_else(|| format!("c{v}"));
            if e == 1 {
                name
            } else {
                format!("{name}^{e}")
            }
        })
        .collect();
    Some(parts.join("*"))
}

fn const_poly_string(p: &MultiPoly<Rational>, constants: &[String]) -> String {
    if p.is_zero() {
        return "0".to_owned();
    }
    join_signed(p.terms().iter().rev().map(|(m, c)| {
        match const_monomial_string(m, constants) {
            None => c.to_string(),
            Some(mono) => {
                if c.is_one() {
                    mono
                } else if (-c.clone()).is_one() {
                    format!("-{mono}")
                } else {
                    format!("{c}*{mono}")
                }
            }
        }
    }))
}

/// Renders a coefficient over the named symbolic constants.
fn coeff_string(c: &Coeff, constants: &[String]) -> String {
    if let Some(r) = c.as_rational() {
        return r.to_string();
    }
    let num = const_poly_string(c.numerator(), constants);
    let num = if c.numerator().len() > 1 {
        format!("({num})")
    } else {
        num
    };
    if c.denominator().is_one() {
        num
    } else {
        let den = const_poly_string(c.denominator(), constants);
        let den = if c.denominator().len() > 1 {
            format!("({den})")
        } else {
            den
        };
        format!("{num}/{den}")
    }
}

/// Renders a ring polynomial, used for denominator displays.
fn ring_poly_string(system: &PdeSystem, p: &MultiPoly<Coeff>) -> String {
    let ring = system.ring();
    if p.is_zero() {
        return "0".to_owned();
    }
    join_signed(p.terms().iter().rev().map(|(m, c)| {
        let coeff = coeff_string(c, system.constants());
        if m.is_one() {
            coeff
        } else {
            let mono = ring.monomial_string(m);
            match coeff.as_str() {
                "1" => mono,
                "-1" => format!("-{mono}"),
                _ => format!("{coeff}*{mono}"),
            }
        }
    }))
}

fn atom_name(system: &PdeSystem, label: AtomLabel) -> String {
    match label {
        AtomLabel::One => "1".to_owned(),
        AtomLabel::Var(v) => system.ring().var_name(v),
        AtomLabel::FracDer { idx, order } => format!("q_{idx}x{order}"),
        AtomLabel::AuxDer { idx, order: 0 } => format!("w_{idx}"),
        AtomLabel::AuxDer { idx, order } => format!("w_{idx}x{order}"),
    }
}

fn target_name(system: &PdeSystem, label: TargetLabel) -> String {
    match label {
        TargetLabel::Unknown(k) => {
            format!("{}_t", system.ring().var_name(system.ring().base_var(k, 0)))
        }
        TargetLabel::Frac(j) => format!("q_{j}_t"),
        TargetLabel::Aux(i) => format!("w_{i}_t"),
    }
}

// === Generator reconstruction ===

fn rational_expr(r: &Rational) -> Option<Expr> {
    if r.is_integer() {
        return r.to_i64().map(Expr::int);
    }
    let num: i64 = r.numerator().clone().try_into().ok()?;
    let den: i64 = r.denominator().clone().try_into().ok()?;
    Some(Expr::ratio(num, den))
}

fn product_expr(mut factors: Vec<Expr>) -> Expr {
    match factors.len() {
        0 => Expr::int(1),
        1 => factors.remove(0),
        _ => Expr::Mul(factors),
    }
}

fn sum_expr(mut terms: Vec<Expr>) -> Expr {
    match terms.len() {
        0 => Expr::int(0),
        1 => terms.remove(0),
        _ => Expr::Add(terms),
    }
}

fn const_poly_expr(p: &MultiPoly<Rational>) -> Option<Expr> {
    let mut terms = Vec::with_capacity(p.len());
    for (m, c) in p.terms().iter().rev() {
        let mut factors = Vec::new();
        if !c.is_one() || m.is_one() {
            factors.push(rational_expr(c)?);
        }
        for &(v, e) in m.exponents() {
            let base = Constant(v).expr();
            factors.push(if e == 1 { base } else { base.pow(e) });
        }
        terms.push(product_expr(factors));
    }
    Some(sum_expr(terms))
}

fn coeff_expr(c: &Coeff) -> Option<Expr> {
    if let Some(r) = c.as_rational() {
        return rational_expr(r);
    }
    let num = const_poly_expr(c.numerator())?;
    if c.denominator().is_one() {
        Some(num)
    } else {
        Some(num / const_poly_expr(c.denominator())?)
    }
}

/// Rebuilds a ring polynomial as an input-level expression.
fn ring_poly_expr(system: &PdeSystem, p: &MultiPoly<Coeff>) -> Option<Expr> {
    let mut terms = Vec::with_capacity(p.len());
    for (m, c) in p.terms().iter().rev() {
        let mut factors = Vec::new();
        if !c.is_one() || m.is_one() {
            factors.push(coeff_expr(c)?);
        }
        for &(v, e) in m.exponents() {
            factors.push(var_expr(system, v, e)?);
        }
        terms.push(product_expr(factors));
    }
    Some(sum_expr(terms))
}

fn var_expr(system: &PdeSystem, var: u32, exp: i32) -> Option<Expr> {
    let base = match system.ring().decode(var) {
        VarKind::Base { unknown, order } => Unknown(unknown).dx(order),
        VarKind::Frac { idx } => {
            let den = &system.ring().fracs()[idx as usize].denominator;
            Expr::int(1) / ring_poly_expr(system, den)?
        }
    };
    Some(if exp == 1 { base } else { base.pow(exp) })
}

/// Rebuilds a generator monomial as an input-level expression.
pub(crate) fn monomial_expr(system: &PdeSystem, m: &Monomial) -> Option<Expr> {
    let mut factors = Vec::with_capacity(m.exponents().len());
    for &(v, e) in m.exponents() {
        factors.push(var_expr(system, v, e)?);
    }
    Some(product_expr(factors))
}

// === Assembly ===

pub(crate) fn render_equations(system: &PdeSystem, raw: Vec<RawEquation>) -> QuadraticSystem {
    let equations = raw
        .into_iter()
        .map(|eq| QuadEquation {
            lhs: target_name(system, eq.label),
            terms: eq
                .terms
                .into_iter()
                .map(|(c, a, b)| QuadTerm {
                    coeff: coeff_string(&c, system.constants()),
                    left: atom_name(system, a),
                    right: atom_name(system, b),
                })
                .collect(),
        })
        .collect();
    QuadraticSystem { equations }
}

pub(crate) fn assemble(
    system: &PdeSystem,
    set: &[Monomial],
    raw: Vec<RawEquation>,
    nodes_visited: usize,
) -> Quadratization {
    let ring = system.ring();
    let aux = set
        .iter()
        .enumerate()
        .map(|(i, g)| {
            let touches_frac = g
                .vars()
                .any(|v| matches!(ring.decode(v), VarKind::Frac { .. }));
            let kind = if g.has_negative() || touches_frac {
                AuxKind::Rational
            } else {
                AuxKind::Polynomial
            };
            AuxVar {
                name: format!("w_{i}"),
                rendered: ring.monomial_string(g),
                generator: monomial_expr(system, g),
                kind,
            }
        })
        .collect();
    let reciprocals = ring
        .fracs()
        .iter()
        .enumerate()
        .map(|(j, f)| ReciprocalVar {
            name: format!("q_{j}"),
            denominator: ring_poly_string(system, &f.denominator),
        })
        .collect();
    Quadratization {
        aux,
        reciprocals,
        system: render_equations(system, raw),
        nodes_visited,
    }
}
