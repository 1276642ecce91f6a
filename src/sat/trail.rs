#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The assignment trail: every assigned literal in order, split into decision
//! levels, together with the level and reason recorded for each variable.
//!
//! The trail also owns the propagation queue head. Literals at positions
//! `qhead..` have been assigned but their consequences not yet propagated.

use crate::sat::assignment::Assignment;
use crate::sat::clause::Clause;
use crate::sat::clause_db::ClauseRef;
use crate::sat::literal::{Literal, Variable};
use rustc_hash::FxHashMap;
use std::ops::{Index, Range};

/// Why a variable holds its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Reason {
    /// Chosen by the heuristic, or an assumption.
    #[default]
    Decision,
    /// A unit clause, or a learnt unit. Only ever at level 0.
    Unit,
    /// Implied by the clause.
    Long(ClauseRef),
}

/// Assigned literals in assignment order, with per-variable level and reason.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    lits: Vec<Literal>,
    level_starts: Vec<usize>,
    levels: Vec<u32>,
    reasons: Vec<Reason>,
    qhead: usize,
}

impl Trail {
    /// Adds bookkeeping for one more variable.
    pub fn grow(&mut self) {
        self.levels.push(0);
        self.reasons.push(Reason::Decision);
    }

    /// The current decision level.
    #[must_use]
    pub fn decision_level(&self) -> u32 {
        u32::try_from(self.level_starts.len()).unwrap_or(u32::MAX)
    }

    /// Opens a new decision level.
    pub fn new_decision_level(&mut self) {
        self.level_starts.push(self.lits.len());
    }

    /// Number of assigned literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// `true` if nothing is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    /// Iterates over the assigned literals, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.lits.iter()
    }

    /// Makes `lit` true at the current level and queues it for propagation.
    pub fn assign(&mut self, lit: Literal, reason: Reason, assignment: &mut Assignment) {
        debug_assert!(assignment.literal_value(lit).is_undef());
        let var = lit.variable() as usize;
        assignment.assign(lit);
        self.levels[var] = self.decision_level();
        self.reasons[var] = reason;
        self.lits.push(lit);
    }

    /// Decision level at which `var` was assigned.
    #[must_use]
    pub fn level(&self, var: Variable) -> u32 {
        self.levels[var as usize]
    }

    /// Why `var` holds its value.
    #[must_use]
    pub fn reason(&self, var: Variable) -> Reason {
        self.reasons[var as usize]
    }

    /// Overwrites the reason recorded for `var`.
    pub fn set_reason(&mut self, var: Variable, reason: Reason) {
        self.reasons[var as usize] = reason;
    }

    /// Pops the next literal awaiting propagation.
    pub fn next_to_propagate(&mut self) -> Option<Literal> {
        let lit = self.lits.get(self.qhead).copied()?;
        self.qhead += 1;
        Some(lit)
    }

    /// Marks the whole trail as propagated; used after a conflict.
    pub const fn skip_queue(&mut self) {
        self.qhead = self.lits.len();
    }

    /// Position of the next literal to propagate.
    #[cfg(test)]
    #[must_use]
    pub const fn queue_head(&self) -> usize {
        self.qhead
    }

    /// Undoes every assignment above `level`. `on_unassign` sees each removed
    /// literal, newest first, and whether it belonged to the deepest level.
    pub fn backtrack_to(
        &mut self,
        level: u32,
        assignment: &mut Assignment,
        mut on_unassign: impl FnMut(Literal, bool),
    ) {
        if self.decision_level() <= level {
            return;
        }
        let boundary = self.level_starts[level as usize];
        let last_start = self.level_starts.last().copied().unwrap_or(boundary);

        for pos in (boundary..self.lits.len()).rev() {
            let lit = self.lits[pos];
            assignment.unassign(lit.variable());
            on_unassign(lit, pos >= last_start);
        }

        self.lits.truncate(boundary);
        self.level_starts.truncate(level as usize);
        self.qhead = boundary;
    }

    /// `true` if `cref` is currently the reason for its first literal.
    #[must_use]
    pub fn locked(&self, cref: ClauseRef, clause: &Clause, assignment: &Assignment) -> bool {
        let first = clause[0];
        self.reason(first.variable()) == Reason::Long(cref)
            && assignment.literal_value(first).is_true()
    }

    /// Number of literals fixed at level 0.
    #[must_use]
    pub fn level_zero_len(&self) -> usize {
        self.level_starts.first().copied().unwrap_or(self.lits.len())
    }

    /// Trail positions occupied by `level`.
    #[must_use]
    pub fn level_range(&self, level: u32) -> Range<usize> {
        let level = level as usize;
        let start = if level == 0 {
            0
        } else {
            self.level_starts[level - 1]
        };
        let end = self
            .level_starts
            .get(level)
            .copied()
            .unwrap_or(self.lits.len());
        start..end
    }

    /// Literals assigned at levels strictly above 0, oldest first.
    #[cfg(test)]
    #[must_use]
    pub fn above_root(&self) -> &[Literal] {
        &self.lits[self.level_zero_len()..]
    }

    /// Literals fixed at level 0.
    #[cfg(test)]
    #[must_use]
    pub fn root(&self) -> &[Literal] {
        &self.lits[..self.level_zero_len()]
    }

    /// Rewrites clause reasons after arena compaction.
    pub fn relocate(&mut self, old_to_new: &FxHashMap<ClauseRef, ClauseRef>) {
        for lit in &self.lits {
            let var = lit.variable() as usize;
            if let Reason::Long(old) = self.reasons[var] {
                self.reasons[var] = old_to_new
                    .get(&old)
                    .map_or(Reason::Unit, |&new| Reason::Long(new));
            }
        }
    }
}

impl Index<usize> for Trail {
    type Output = Literal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.lits[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::clause_db::ClauseDb;

    fn lit(value: i32) -> Literal {
        Literal::from_i32(value)
    }

    fn setup(vars: usize) -> (Trail, Assignment) {
        let mut trail = Trail::default();
        for _ in 0..vars {
            trail.grow();
        }
        (trail, Assignment::new(vars))
    }

    #[test]
    fn test_levels_and_reasons() {
        let (mut trail, mut assignment) = setup(3);
        trail.assign(lit(1), Reason::Unit, &mut assignment);
        trail.new_decision_level();
        trail.assign(lit(-2), Reason::Decision, &mut assignment);

        assert_eq!(trail.decision_level(), 1);
        assert_eq!(trail.level(0), 0);
        assert_eq!(trail.level(1), 1);
        assert_eq!(trail.reason(0), Reason::Unit);
        assert_eq!(trail.level_zero_len(), 1);
        assert_eq!(trail.level_range(1), 1..2);
        assert_eq!(trail.root(), &[lit(1)]);
        assert_eq!(trail.above_root(), &[lit(-2)]);
        assert!(assignment.literal_value(lit(-2)).is_true());
    }

    #[test]
    fn test_queue() {
        let (mut trail, mut assignment) = setup(2);
        trail.assign(lit(1), Reason::Unit, &mut assignment);
        trail.assign(lit(2), Reason::Unit, &mut assignment);
        assert_eq!(trail.next_to_propagate(), Some(lit(1)));
        trail.skip_queue();
        assert_eq!(trail.next_to_propagate(), None);
    }

    #[test]
    fn test_backtrack_reports_last_level() {
        let (mut trail, mut assignment) = setup(4);
        trail.assign(lit(1), Reason::Unit, &mut assignment);
        trail.new_decision_level();
        trail.assign(lit(2), Reason::Decision, &mut assignment);
        trail.new_decision_level();
        trail.assign(lit(3), Reason::Decision, &mut assignment);
        trail.assign(lit(-4), Reason::Decision, &mut assignment);

        let mut seen = Vec::new();
        trail.backtrack_to(0, &mut assignment, |l, last| seen.push((l, last)));

        assert_eq!(
            seen,
            vec![(lit(-4), true), (lit(3), true), (lit(2), false)]
        );
        assert_eq!(trail.decision_level(), 0);
        assert_eq!(trail.len(), 1);
        assert_eq!(trail.queue_head(), 1);
        assert!(!assignment.is_assigned(1));
        assert!(assignment.is_assigned(0));
    }

    #[test]
    fn test_backtrack_to_current_level_is_noop() {
        let (mut trail, mut assignment) = setup(1);
        trail.new_decision_level();
        trail.assign(lit(1), Reason::Decision, &mut assignment);
        trail.backtrack_to(1, &mut assignment, |_, _| panic!("nothing to undo"));
        assert_eq!(trail.len(), 1);
    }

    #[test]
    fn test_locked() {
        let (mut trail, mut assignment) = setup(2);
        let mut db = ClauseDb::new(0.999);
        let cref = db.alloc(&[lit(1), lit(2)], false);

        assert!(!trail.locked(cref, &db[cref], &assignment));
        trail.assign(lit(-2), Reason::Unit, &mut assignment);
        trail.assign(lit(1), Reason::Long(cref), &mut assignment);
        assert!(trail.locked(cref, &db[cref], &assignment));
    }
}
