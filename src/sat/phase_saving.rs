//! Branching polarity: user-forced, random, or the saved phase.

use crate::sat::configs::PhaseSaving;
use crate::sat::literal::{Literal, Variable};
use bit_vec::BitVec;

/// Per-variable polarity state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedPhases {
    saved: BitVec,
    forced: Vec<Option<bool>>,
    mode: PhaseSaving,
    default_polarity: bool,
    random: bool,
}

impl SavedPhases {
    /// Creates an empty table.
    #[must_use]
    pub fn new(mode: PhaseSaving, default_polarity: bool, random: bool) -> Self {
        Self {
            saved: BitVec::new(),
            forced: Vec::new(),
            mode,
            default_polarity,
            random,
        }
    }

    /// Registers the next variable with an optional forced polarity.
    pub fn add_var(&mut self, forced: Option<bool>) {
        self.saved.push(self.default_polarity);
        self.forced.push(forced);
    }

    /// Sets or clears the forced polarity of `var`.
    pub fn set_forced(&mut self, var: Variable, polarity: Option<bool>) {
        self.forced[var as usize] = polarity;
    }

    /// The forced polarity of `var`, if any.
    #[must_use]
    pub fn forced(&self, var: Variable) -> Option<bool> {
        self.forced[var as usize]
    }

    /// The last saved polarity of `var`.
    #[must_use]
    pub fn saved(&self, var: Variable) -> bool {
        self.saved.get(var as usize).unwrap_or(self.default_polarity)
    }

    /// Records the value `lit` held before backtracking undid it.
    /// `last_level` tells whether it came from the deepest level undone.
    pub fn on_unassign(&mut self, lit: Literal, last_level: bool) {
        let save = match self.mode {
            PhaseSaving::None => false,
            PhaseSaving::Limited => last_level,
            PhaseSaving::Full => true,
        };
        if save {
            self.saved.set(lit.variable() as usize, lit.polarity());
        }
    }

    /// The literal to branch on for `var`.
    pub fn next_literal(&self, var: Variable, rng: &mut fastrand::Rng) -> Literal {
        let polarity = match self.forced(var) {
            Some(p) => p,
            None if self.random => rng.bool(),
            None => self.saved(var),
        };
        Literal::new(var, polarity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phases(mode: PhaseSaving, n: usize) -> SavedPhases {
        let mut p = SavedPhases::new(mode, false, false);
        for _ in 0..n {
            p.add_var(None);
        }
        p
    }

    #[test]
    fn test_default_polarity() {
        let p = phases(PhaseSaving::Full, 2);
        let mut rng = fastrand::Rng::with_seed(0);
        assert_eq!(p.next_literal(1, &mut rng), Literal::negative(1));
    }

    #[test]
    fn test_full_saves_everything() {
        let mut p = phases(PhaseSaving::Full, 2);
        let mut rng = fastrand::Rng::with_seed(0);
        p.on_unassign(Literal::positive(0), false);
        p.on_unassign(Literal::positive(1), true);
        assert_eq!(p.next_literal(0, &mut rng), Literal::positive(0));
        assert_eq!(p.next_literal(1, &mut rng), Literal::positive(1));
    }

    #[test]
    fn test_limited_saves_last_level_only() {
        let mut p = phases(PhaseSaving::Limited, 2);
        p.on_unassign(Literal::positive(0), false);
        p.on_unassign(Literal::positive(1), true);
        assert!(!p.saved(0));
        assert!(p.saved(1));
    }

    #[test]
    fn test_none_never_saves() {
        let mut p = phases(PhaseSaving::None, 1);
        p.on_unassign(Literal::positive(0), true);
        assert!(!p.saved(0));
    }

    #[test]
    fn test_forced_wins() {
        let mut p = SavedPhases::new(PhaseSaving::Full, false, true);
        p.add_var(Some(true));
        let mut rng = fastrand::Rng::with_seed(5);
        for _ in 0..16 {
            assert_eq!(p.next_literal(0, &mut rng), Literal::positive(0));
        }
        p.set_forced(0, None);
        assert_eq!(p.forced(0), None);
    }
}
