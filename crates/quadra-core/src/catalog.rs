//! Ready-made PDE systems.
//!
//! A small collection of evolution equations from the quadratization
//! literature, used by the tests, the benchmarks and the demos.

use crate::expr::Expr;
use crate::input::PdeInput;

/// Modified Korteweg-de Vries equation `u_t = a*u^2*u_x - u_xxx` with
/// a symbolic coefficient `a`.
#[must_use]
pub fn kdv() -> PdeInput {
    let mut input = PdeInput::new("t", "x");
    let a = input.constant("a");
    let u = input.unknown("u");
    input.equation(u, a.expr() * u.expr().pow(2) * u.dx(1) - u.dx(3));
    input
}

/// Allen-Cahn equation `u_t = u_xx + u - u^3`.
#[must_use]
pub fn allen_cahn() -> PdeInput {
    let mut input = PdeInput::new("t", "x");
    let u = input.unknown("u");
    input.equation(u, u.dx(2) + u.expr() - u.expr().pow(3));
    input
}

/// Viscous Burgers equation `u_t = u_xx - u*u_x`, already quadratic.
#[must_use]
pub fn burgers() -> PdeInput {
    let mut input = PdeInput::new("t", "x");
    let u = input.unknown("u");
    input.equation(u, u.dx(2) - u.expr() * u.dx(1));
    input
}

/// Dym equation `u_t = u^3*u_xxx`.
#[must_use]
pub fn dym() -> PdeInput {
    let mut input = PdeInput::new("t", "x");
    let u = input.unknown("u");
    input.equation(u, u.expr().pow(3) * u.dx(3));
    input
}

/// Reduced nonlinear Schrodinger equation `u_t = -1/2*u_xx + u^3`.
#[must_use]
pub fn schrodinger() -> PdeInput {
    let mut input = PdeInput::new("t", "x");
    let u = input.unknown("u");
    input.equation(u, Expr::ratio(-1, 2) * u.dx(2) + u.expr().pow(3));
    input
}

/// Brusselator reaction system
/// `u_t = d_1*u_x + lambda*(1 - (b + 1)*u + b*u^2*v)`,
/// `v_t = d_2*v_x + lambda*a^2*(u - u^2*v)`.
#[must_use]
pub fn brusselator() -> PdeInput {
    let mut input = PdeInput::new("t", "x");
    let d1 = input.constant("d_1");
    let d2 = input.constant("d_2");
    let a = input.constant("a");
    let b = input.constant("b");
    let lam = input.constant("lambda");
    let u = input.unknown("u");
    let v = input.unknown("v");
    input.equation(
        u,
        d1.expr() * u.dx(1)
            + lam.expr()
                * (Expr::int(1) - (b.expr() + Expr::int(1)) * u.expr()
                    + b.expr() * u.expr().pow(2) * v.expr()),
    );
    input.equation(
        v,
        d2.expr() * v.dx(1)
            + lam.expr() * a.expr().pow(2) * (u.expr() - u.expr().pow(2) * v.expr()),
    );
    input
}

/// HUX solar wind model `v_r = omega*v_phi/v`, evolving in the radial
/// coordinate `r`.
#[must_use]
pub fn solar_wind() -> PdeInput {
    let mut input = PdeInput::new("r", "phi");
    let omega = input.constant("omega");
    let v = input.unknown("v");
    input.equation(v, omega.expr() * v.dx(1) / v.expr());
    input
}
