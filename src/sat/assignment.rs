//! Three-valued truth values and the per-variable value store.

use crate::sat::literal::{Literal, Variable};
use core::ops::{BitXor, Index, Not};

/// A lifted Boolean: `True`, `False` or `Undef` (unassigned).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LBool {
    /// Assigned true.
    True,
    /// Assigned false.
    False,
    /// Not assigned.
    #[default]
    Undef,
}

impl LBool {
    /// `true` iff the value is `True`.
    #[must_use]
    pub const fn is_true(self) -> bool {
        matches!(self, Self::True)
    }

    /// `true` iff the value is `False`.
    #[must_use]
    pub const fn is_false(self) -> bool {
        matches!(self, Self::False)
    }

    /// `true` iff the value is `Undef`.
    #[must_use]
    pub const fn is_undef(self) -> bool {
        matches!(self, Self::Undef)
    }

    /// Converts to `Some(bool)` for assigned values.
    #[must_use]
    pub const fn to_option(self) -> Option<bool> {
        match self {
            Self::True => Some(true),
            Self::False => Some(false),
            Self::Undef => None,
        }
    }
}

impl From<bool> for LBool {
    fn from(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}

impl From<Option<bool>> for LBool {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Undef, Self::from)
    }
}

impl Not for LBool {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::Undef => Self::Undef,
        }
    }
}

/// Flips the value when the right-hand side is `true`; `Undef` stays `Undef`.
impl BitXor<bool> for LBool {
    type Output = Self;

    fn bitxor(self, flip: bool) -> Self::Output {
        if flip { !self } else { self }
    }
}

/// Current values of all variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment(Vec<LBool>);

impl Assignment {
    /// Creates a store for `n` unassigned variables.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self(vec![LBool::Undef; n])
    }

    /// Adds one more (unassigned) variable.
    pub fn grow(&mut self) {
        self.0.push(LBool::Undef);
    }

    /// Number of variables tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if no variables are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Makes `lit` true.
    pub fn assign(&mut self, lit: Literal) {
        self.0[lit.variable() as usize] = LBool::from(lit.polarity());
    }

    /// Clears the value of `var`.
    pub fn unassign(&mut self, var: Variable) {
        self.0[var as usize] = LBool::Undef;
    }

    /// Value of `var`.
    #[must_use]
    pub fn var_value(&self, var: Variable) -> LBool {
        self.0[var as usize]
    }

    /// Value of `lit` under the current assignment.
    #[must_use]
    pub fn literal_value(&self, lit: Literal) -> LBool {
        self.0[lit.variable() as usize] ^ lit.is_negated()
    }

    /// `true` if `var` has a value.
    #[must_use]
    pub fn is_assigned(&self, var: Variable) -> bool {
        !self.0[var as usize].is_undef()
    }

    /// Iterates over all values in variable order.
    pub fn iter(&self) -> impl Iterator<Item = &LBool> {
        self.0.iter()
    }
}

impl Index<Variable> for Assignment {
    type Output = LBool;

    fn index(&self, index: Variable) -> &Self::Output {
        &self.0[index as usize]
    }
}
