//! Input expression trees.
//!
//! Right-hand sides are written against handles returned by
//! [`PdeInput`](crate::input::PdeInput) and combined with the usual
//! arithmetic operators. The trees are lowered once into the internal
//! differential ring and never rewritten, so they are stored as plain
//! owned nodes rather than arena handles.

use std::ops::{Add, Div, Mul, Neg, Sub};

/// Handle to a declared unknown function of the system.
///
/// Obtained from [`PdeInput::unknown`](crate::input::PdeInput::unknown).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Unknown(pub(crate) u32);

/// Handle to a declared symbolic constant.
///
/// Obtained from [`PdeInput::constant`](crate::input::PdeInput::constant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Constant(pub(crate) u32);

impl Unknown {
    /// The unknown itself as an expression.
    #[must_use]
    pub fn expr(self) -> Expr {
        Expr::Unknown(self)
    }

    /// The `order`-th spatial derivative of the unknown.
    #[must_use]
    pub fn dx(self, order: u32) -> Expr {
        if order == 0 {
            Expr::Unknown(self)
        } else {
            Expr::Deriv(self, order)
        }
    }
}

impl Constant {
    /// The constant as an expression.
    #[must_use]
    pub fn expr(self) -> Expr {
        Expr::Constant(self)
    }
}

/// A symbolic right-hand side expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    // === Atoms ===
    /// A 64-bit integer literal.
    Integer(i64),
    /// A rational literal (numerator, denominator).
    ///
    /// Invariant: denominator != 0; checked when the tree is lowered.
    Rational(i64, i64),
    /// A declared symbolic constant.
    Constant(Constant),
    /// A declared unknown function.
    Unknown(Unknown),
    /// A spatial derivative of an unknown.
    ///
    /// Invariant: order >= 1; order-zero derivatives collapse to
    /// [`Expr::Unknown`] in [`Unknown::dx`].
    Deriv(Unknown, u32),

    // === Compound expressions ===
    /// Sum of expressions.
    Add(Vec<Expr>),
    /// Product of expressions.
    Mul(Vec<Expr>),
    /// Integer power of an expression. Negative exponents denote
    /// reciprocals.
    Pow(Box<Expr>, i32),
    /// Negation.
    Neg(Box<Expr>),
    /// Quotient of two expressions.
    Div(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// An integer literal.
    #[must_use]
    pub fn int(n: i64) -> Self {
        Expr::Integer(n)
    }

    /// A rational literal `num / den`.
    #[must_use]
    pub fn ratio(num: i64, den: i64) -> Self {
        Expr::Rational(num, den)
    }

    /// Raises the expression to an integer power.
    #[must_use]
    pub fn pow(self, exponent: i32) -> Self {
        Expr::Pow(Box::new(self), exponent)
    }

    /// Returns true if this node has no children.
    #[must_use]
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            Expr::Integer(_)
                | Expr::Rational(_, _)
                | Expr::Constant(_)
                | Expr::Unknown(_)
                | Expr::Deriv(_, _)
        )
    }

    /// Calls `f` on every node of the tree in pre-order.
    pub(crate) fn visit(&self, f: &mut impl FnMut(&Expr)) {
        f(self);
        match self {
            Expr::Add(args) | Expr::Mul(args) => {
                for arg in args {
                    arg.visit(f);
                }
            }
            Expr::Pow(base, _) | Expr::Neg(base) => base.visit(f),
            Expr::Div(num, den) => {
                num.visit(f);
                den.visit(f);
            }
            _ => {}
        }
    }

    /// Highest derivative order appearing anywhere in the tree.
    pub(crate) fn max_derivative_order(&self) -> u32 {
        let mut max = 0;
        self.visit(&mut |node| {
            if let Expr::Deriv(_, order) = node {
                max = max.max(*order);
            }
        });
        max
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::Integer(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        Expr::Integer(i64::from(n))
    }
}

impl From<Unknown> for Expr {
    fn from(u: Unknown) -> Self {
        Expr::Unknown(u)
    }
}

impl From<Constant> for Expr {
    fn from(c: Constant) -> Self {
        Expr::Constant(c)
    }
}

// === Operators ===
//
// Sums and products flatten one level so that `a + b + c` builds a
// single three-argument node rather than a left-leaning chain.

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        match (self, rhs) {
            (Expr::Add(mut lhs), Expr::Add(rhs)) => {
                lhs.extend(rhs);
                Expr::Add(lhs)
            }
            (Expr::Add(mut lhs), rhs) => {
                lhs.push(rhs);
                Expr::Add(lhs)
            }
            (lhs, Expr::Add(mut rhs)) => {
                rhs.insert(0, lhs);
                Expr::Add(rhs)
            }
            (lhs, rhs) => Expr::Add(vec![lhs, rhs]),
        }
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        self + (-rhs)
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        match (self, rhs) {
            (Expr::Mul(mut lhs), Expr::Mul(rhs)) => {
                lhs.extend(rhs);
                Expr::Mul(lhs)
            }
            (Expr::Mul(mut lhs), rhs) => {
                lhs.push(rhs);
                Expr::Mul(lhs)
            }
            (lhs, Expr::Mul(mut rhs)) => {
                rhs.insert(0, lhs);
                Expr::Mul(rhs)
            }
            (lhs, rhs) => Expr::Mul(vec![lhs, rhs]),
        }
    }
}

impl Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Expr) -> Expr {
        Expr::Div(Box::new(self), Box::new(rhs))
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        match self {
            Expr::Neg(inner) => *inner,
            other => Expr::Neg(Box::new(other)),
        }
    }
}
