//! Declaration of a PDE system.

use std::collections::HashSet;

use crate::error::QuadError;
use crate::expr::{Constant, Expr, Unknown};

/// Builder for a 1-D evolution system.
///
/// Unknowns are functions of one time and one space variable; every
/// unknown must be paired with exactly one evolution equation
/// `u_t = rhs` before the system can be quadratized.
///
/// # Examples
///
/// ```
/// use quadra_core::{Expr, PdeInput};
///
/// let mut input = PdeInput::new("t", "x");
/// let u = input.unknown("u");
/// input.equation(u, u.dx(2) + u.expr() - u.expr().pow(3));
/// ```
#[derive(Debug, Clone)]
pub struct PdeInput {
    time: String,
    space: String,
    constants: Vec<String>,
    unknowns: Vec<String>,
    equations: Vec<(Unknown, Expr)>,
}

impl PdeInput {
    /// Creates an empty system over the given independent variables.
    #[must_use]
    pub fn new(time: &str, space: &str) -> Self {
        PdeInput {
            time: time.to_owned(),
            space: space.to_owned(),
            constants: Vec::new(),
            unknowns: Vec::new(),
            equations: Vec::new(),
        }
    }

    /// Declares a symbolic constant and returns its handle.
    pub fn constant(&mut self, name: &str) -> Constant {
        let id = u32::try_from(self.constants.len()).unwrap_or(u32::MAX);
        self.constants.push(name.to_owned());
        Constant(id)
    }

    /// Declares an unknown function and returns its handle.
    pub fn unknown(&mut self, name: &str) -> Unknown {
        let id = u32::try_from(self.unknowns.len()).unwrap_or(u32::MAX);
        self.unknowns.push(name.to_owned());
        Unknown(id)
    }

    /// Records the evolution equation `u_t = rhs`.
    pub fn equation(&mut self, unknown: Unknown, rhs: Expr) {
        self.equations.push((unknown, rhs));
    }

    pub(crate) fn constants(&self) -> &[String] {
        &self.constants
    }

    pub(crate) fn unknowns(&self) -> &[String] {
        &self.unknowns
    }

    /// Checks the declaration for structural problems and returns the
    /// right-hand sides indexed by unknown.
    pub(crate) fn validated_rhs(&self) -> Result<Vec<&Expr>, QuadError> {
        if self.equations.is_empty() {
            return Err(QuadError::EmptySystem);
        }
        if self.time == self.space {
            return Err(QuadError::IndependentClash(self.time.clone()));
        }
        let mut names: HashSet<&str> = HashSet::new();
        names.insert(&self.time);
        names.insert(&self.space);
        for name in self.constants.iter().chain(&self.unknowns) {
            if !names.insert(name) {
                return Err(QuadError::DuplicateName(name.clone()));
            }
        }

        let mut rhs: Vec<Option<&Expr>> = vec![None; self.unknowns.len()];
        for (unknown, expr) in &self.equations {
            let idx = unknown.0 as usize;
            if idx >= rhs.len() {
                return Err(QuadError::ForeignSymbol);
            }
            if rhs[idx].is_some() {
                return Err(QuadError::DuplicateEquation(self.unknowns[idx].clone()));
            }
            self.check_handles(expr)?;
            rhs[idx] = Some(expr);
        }
        rhs.into_iter()
            .enumerate()
            .map(|(idx, entry)| {
                entry.ok_or_else(|| QuadError::MissingEquation(self.unknowns[idx].clone()))
            })
            .collect()
    }

    /// Rejects handles minted by a different `PdeInput`.
    ///
    /// Handles are plain indices, so the only detectable misuse is an
    /// index outside this system's declaration range.
    pub(crate) fn check_handles(&self, expr: &Expr) -> Result<(), QuadError> {
        let mut foreign = false;
        expr.visit(&mut |node| match node {
            Expr::Unknown(u) | Expr::Deriv(u, _) => {
                foreign |= u.0 as usize >= self.unknowns.len();
            }
            Expr::Constant(c) => {
                foreign |= c.0 as usize >= self.constants.len();
            }
            _ => {}
        });
        if foreign {
            Err(QuadError::ForeignSymbol)
        } else {
            Ok(())
        }
    }
}
