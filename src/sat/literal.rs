#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Variables and literals.
//!
//! A `Variable` is a plain index in `[0, n)` handed out by the solver in
//! allocation order. A `Literal` packs a variable and a sign into a single
//! `u32` as `var * 2 + sign`, where the low bit is set for the negative
//! literal. This keeps a literal and its negation adjacent, so per-literal
//! tables (watch lists, for example) can be indexed directly by
//! [`Literal::index`].

use core::fmt::{Display, Formatter};
use core::ops::{Neg, Not};
use std::fmt::Debug;

/// A propositional variable, identified by its allocation index.
pub type Variable = u32;

/// A variable together with a sign.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Literal(u32);

impl Literal {
    /// Creates a literal for `var`. `polarity == true` yields the positive literal.
    #[must_use]
    pub const fn new(var: Variable, polarity: bool) -> Self {
        Self((var << 1) | (!polarity) as u32)
    }

    /// The positive literal of `var`.
    #[must_use]
    pub const fn positive(var: Variable) -> Self {
        Self::new(var, true)
    }

    /// The negative literal of `var`.
    #[must_use]
    pub const fn negative(var: Variable) -> Self {
        Self::new(var, false)
    }

    /// The variable this literal refers to.
    #[must_use]
    pub const fn variable(self) -> Variable {
        self.0 >> 1
    }

    /// `true` for a positive literal.
    #[must_use]
    pub const fn polarity(self) -> bool {
        self.0 & 1 == 0
    }

    /// `true` for a negative literal.
    #[must_use]
    pub const fn is_negated(self) -> bool {
        !self.polarity()
    }

    /// The same variable with the opposite sign.
    #[must_use]
    pub const fn negated(self) -> Self {
        Self(self.0 ^ 1)
    }

    /// Dense index of this literal, suitable for per-literal tables of size `2 * num_vars`.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Builds a literal from the DIMACS convention, where variable `v` (0-based)
    /// is written `v + 1` and negation is the arithmetic sign.
    ///
    /// # Panics
    ///
    /// Panics if `value` is zero, which does not denote a literal.
    #[must_use]
    pub fn from_i32(value: i32) -> Self {
        assert_ne!(value, 0, "0 is a clause terminator, not a literal");
        Self::new(value.unsigned_abs() - 1, value.is_positive())
    }

    /// The DIMACS representation of this literal (see [`Literal::from_i32`]).
    #[must_use]
    pub fn to_i32(self) -> i32 {
        let magnitude = i32::try_from(self.variable() + 1).unwrap_or(i32::MAX);
        if self.polarity() { magnitude } else { -magnitude }
    }
}

impl Debug for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_i32())
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.polarity() {
            write!(f, "x{}", self.variable())
        } else {
            write!(f, "¬x{}", self.variable())
        }
    }
}

impl Neg for Literal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

impl Not for &Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::from_i32(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_neg() {
        assert_eq!(Literal::new(1, false).negated(), Literal::new(1, true));
        assert_eq!(Literal::new(1, true).negated(), Literal::new(1, false));
        assert_eq!(!Literal::positive(7), Literal::negative(7));
        assert_eq!(-Literal::negative(7), Literal::positive(7));
    }

    #[test]
    fn test_variable_and_polarity() {
        let lit = Literal::new(42, true);
        assert_eq!(lit.variable(), 42);
        assert!(lit.polarity());
        assert!(!lit.is_negated());

        let lit = Literal::new(42, false);
        assert_eq!(lit.variable(), 42);
        assert!(!lit.polarity());
        assert!(lit.is_negated());
    }

    #[test]
    fn test_index_is_dense() {
        assert_eq!(Literal::positive(0).index(), 0);
        assert_eq!(Literal::negative(0).index(), 1);
        assert_eq!(Literal::positive(3).index(), 6);
        assert_eq!(Literal::negative(3).index(), 7);
    }

    #[test]
    fn test_dimacs_conversion() {
        assert_eq!(Literal::from_i32(1), Literal::positive(0));
        assert_eq!(Literal::from_i32(-3), Literal::negative(2));
        assert_eq!(Literal::negative(2).to_i32(), -3);
        assert_eq!(Literal::from(5).to_i32(), 5);
    }

    #[test]
    #[should_panic(expected = "clause terminator")]
    fn test_zero_is_not_a_literal() {
        let _ = Literal::from_i32(0);
    }
}
