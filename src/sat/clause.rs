//! A single clause: its literals plus the bookkeeping the solver needs.
//!
//! The first two literals are the watched ones. Propagation keeps the implied
//! literal of a reason clause in position 0, which conflict analysis relies on.

use crate::sat::assignment::Assignment;
use crate::sat::literal::Literal;
use core::ops::{Index, IndexMut};
use smallvec::SmallVec;

/// Inline storage for clause literals; longer clauses spill to the heap.
pub type LiteralStorage = SmallVec<[Literal; 8]>;

/// A clause with its learnt/deleted flags and activity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Clause {
    literals: LiteralStorage,
    learnt: bool,
    deleted: bool,
    activity: f64,
}

impl Clause {
    /// Creates a clause over `literals`.
    #[must_use]
    pub fn new(literals: &[Literal], learnt: bool) -> Self {
        Self {
            literals: SmallVec::from_slice(literals),
            learnt,
            deleted: false,
            activity: 0.0,
        }
    }

    /// Number of literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// `true` if the clause has no literals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Iterates over the literals in order.
    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    /// The literals as a slice.
    #[must_use]
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// Swaps the literals at `i` and `j`.
    pub fn swap(&mut self, i: usize, j: usize) {
        self.literals.swap(i, j);
    }

    /// Drops the literal at `index`, moving the last literal into its place.
    pub fn swap_remove(&mut self, index: usize) -> Literal {
        self.literals.swap_remove(index)
    }

    /// `true` for a clause derived by conflict analysis.
    #[must_use]
    pub const fn is_learnt(&self) -> bool {
        self.learnt
    }

    /// `true` once the clause has been freed.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Marks the clause as freed.
    pub fn delete(&mut self) {
        self.deleted = true;
    }

    /// The clause activity.
    #[must_use]
    pub const fn activity(&self) -> f64 {
        self.activity
    }

    /// Adds `increment` to the activity.
    pub fn bump_activity(&mut self, increment: f64) {
        self.activity += increment;
    }

    /// Multiplies the activity by `factor`.
    pub fn rescale_activity(&mut self, factor: f64) {
        self.activity *= factor;
    }

    /// `true` if some literal is currently true.
    #[must_use]
    pub fn is_satisfied(&self, assignment: &Assignment) -> bool {
        self.iter().any(|&l| assignment.literal_value(l).is_true())
    }
}

impl Index<usize> for Clause {
    type Output = Literal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl IndexMut<usize> for Clause {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.literals[index]
    }
}
