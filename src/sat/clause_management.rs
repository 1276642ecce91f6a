#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! This module defines strategies for managing the learnt clause database.
//!
//! A CDCL solver learns a clause at almost every conflict, so without pruning
//! the database grows without bound and propagation slows to a crawl.
//! Effective management strategies aim to:
//! - Periodically remove learnt clauses that have stopped taking part in conflicts.
//! - Never remove a clause that is currently the reason for an assignment.
//! - Let the permitted database size grow slowly as the search goes on.
//!
//! This module provides a `ClauseManagement` trait that abstracts these
//! strategies, along with `ActivityClauseManagement` (activity-based reduction
//! with a geometrically growing size limit) and `NoClauseManagement` (keeps
//! every learnt clause).

use crate::sat::assignment::Assignment;
use crate::sat::clause_db::{ClauseDb, ClauseRef};
use crate::sat::configs::SolverOptions;
use crate::sat::propagation::WatchedLiterals;
use crate::sat::trail::{Reason, Trail};
use clap::ValueEnum;
use ordered_float::OrderedFloat;
use std::fmt::{Debug, Display};
use tracing::debug;

/// Removes `cref` from the solver: its watchers are detached lazily, a reason
/// it provides is downgraded to a root fact, and the clause is freed.
///
/// Only a clause whose implied literal is fixed at level 0 may be removed
/// while locked.
pub fn remove_clause(
    cref: ClauseRef,
    db: &mut ClauseDb,
    propagator: &mut WatchedLiterals,
    trail: &mut Trail,
    assignment: &Assignment,
) {
    let clause = &db[cref];
    propagator.detach(cref, clause, false);
    if trail.locked(cref, clause, assignment) {
        let var = clause[0].variable();
        debug_assert_eq!(trail.level(var), 0);
        trail.set_reason(var, Reason::Unit);
    }
    db.free(cref);
}

/// Trait defining the interface for clause database management strategies.
///
/// The solver informs the strategy when a solve call starts and after every
/// conflict, asks it before each decision whether the database is due for
/// cleaning, and lets it clean the database when it is.
pub trait ClauseManagement: Clone + Debug {
    /// Called at the start of every solve call with the number of original
    /// clauses, so limits can be sized to the problem.
    fn on_solve_start(&mut self, num_clauses: usize);

    /// Called after every conflict.
    ///
    /// # Returns
    ///
    /// `true` if the strategy adjusted its size limit on this conflict. The
    /// solver uses this as its cue to report progress.
    fn on_conflict(&mut self) -> bool;

    /// Determines whether the learnt clause database should be cleaned.
    ///
    /// # Arguments
    ///
    /// * `num_learnts`: Learnt clauses currently in the database.
    /// * `num_assigns`: Variables currently assigned.
    fn should_clean_db(&self, num_learnts: usize, num_assigns: usize) -> bool;

    /// Removes learnt clauses deemed no longer useful.
    ///
    /// Removed clauses are detached lazily and freed; the arena is compacted
    /// separately by the solver.
    ///
    /// # Returns
    ///
    /// The number of clauses removed.
    fn clean_clause_db(
        &mut self,
        db: &mut ClauseDb,
        propagator: &mut WatchedLiterals,
        trail: &mut Trail,
        assignment: &Assignment,
    ) -> usize;

    /// Returns the total number of clauses removed by this strategy so far.
    fn num_removed(&self) -> u64;

    /// The current learnt clause limit.
    fn max_learnts(&self) -> f64;
}

/// A clause management strategy based on clause activity.
///
/// The database is reduced whenever the number of learnt clauses, minus the
/// number of assigned variables, reaches `max_learnts`. Reduction:
/// 1. Sorts the learnt clauses so that binary clauses come last and the rest
///    are ordered by ascending activity.
/// 2. Removes the first half, together with any clause whose activity is
///    below `cla_inc / learnts`.
/// 3. Never removes binary clauses or clauses that are the reason for a
///    current assignment.
///
/// `max_learnts` starts at `learntsize_factor` times the number of original
/// clauses. After `learntsize_adjust_start_confl` conflicts it grows by
/// `learntsize_inc`, and the interval until the next adjustment grows by
/// `learntsize_adjust_inc`.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityClauseManagement {
    learntsize_factor: f64,
    learntsize_inc: f64,
    adjust_start_confl: u64,
    adjust_inc: f64,

    /// Current learnt clause limit.
    max_learnts: f64,
    /// Length of the current adjustment interval.
    adjust_confl: f64,
    /// Conflicts remaining until the next adjustment.
    adjust_cnt: u64,
    /// Total number of clauses removed by this strategy.
    num_removed: u64,

    /// Buffer for the sorted learnt clauses.
    candidates: Vec<ClauseRef>,
}

impl ActivityClauseManagement {
    /// Creates the strategy from the learnt size parameters of `options`.
    #[must_use]
    pub fn new(options: &SolverOptions) -> Self {
        Self {
            learntsize_factor: options.learntsize_factor,
            learntsize_inc: options.learntsize_inc,
            adjust_start_confl: options.learntsize_adjust_start_confl,
            adjust_inc: options.learntsize_adjust_inc,
            max_learnts: 0.0,
            #[allow(clippy::cast_precision_loss)]
            adjust_confl: options.learntsize_adjust_start_confl as f64,
            adjust_cnt: options.learntsize_adjust_start_confl,
            num_removed: 0,
            candidates: Vec::new(),
        }
    }
}

impl ClauseManagement for ActivityClauseManagement {
    #[allow(clippy::cast_precision_loss)]
    fn on_solve_start(&mut self, num_clauses: usize) {
        self.max_learnts = num_clauses as f64 * self.learntsize_factor;
        self.adjust_confl = self.adjust_start_confl as f64;
        self.adjust_cnt = self.adjust_start_confl;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn on_conflict(&mut self) -> bool {
        self.adjust_cnt = self.adjust_cnt.saturating_sub(1);
        if self.adjust_cnt > 0 {
            return false;
        }
        self.adjust_confl *= self.adjust_inc;
        self.adjust_cnt = (self.adjust_confl as u64).max(1);
        self.max_learnts *= self.learntsize_inc;
        true
    }

    #[allow(clippy::cast_precision_loss)]
    fn should_clean_db(&self, num_learnts: usize, num_assigns: usize) -> bool {
        num_learnts as f64 - num_assigns as f64 >= self.max_learnts
    }

    #[allow(clippy::cast_precision_loss)]
    fn clean_clause_db(
        &mut self,
        db: &mut ClauseDb,
        propagator: &mut WatchedLiterals,
        trail: &mut Trail,
        assignment: &Assignment,
    ) -> usize {
        let num_learnts = db.num_learnts();
        if num_learnts == 0 {
            return 0;
        }
        let extra_lim = db.clause_increment() / num_learnts as f64;

        self.candidates.clear();
        self.candidates.extend_from_slice(db.learnts());
        self.candidates
            .sort_by_key(|&c| (db[c].len() == 2, OrderedFloat(db[c].activity())));

        let mut removed = 0;
        for (i, &cref) in self.candidates.iter().enumerate() {
            let clause = &db[cref];
            if clause.len() > 2
                && !trail.locked(cref, clause, assignment)
                && (i < num_learnts / 2 || clause.activity() < extra_lim)
            {
                remove_clause(cref, db, propagator, trail, assignment);
                removed += 1;
            }
        }
        db.purge_lists();

        self.num_removed += removed as u64;
        debug!(
            removed,
            kept = db.num_learnts(),
            max_learnts = self.max_learnts,
            "reduced learnt clause database"
        );
        removed
    }

    fn num_removed(&self) -> u64 {
        self.num_removed
    }

    fn max_learnts(&self) -> f64 {
        self.max_learnts
    }
}

/// A clause management strategy that keeps every learnt clause.
#[derive(Debug, Clone, Default, PartialEq, Eq, Copy)]
pub struct NoClauseManagement;

impl ClauseManagement for NoClauseManagement {
    fn on_solve_start(&mut self, _num_clauses: usize) {}

    fn on_conflict(&mut self) -> bool {
        false
    }

    /// Always returns `false` as this strategy never cleans the database.
    fn should_clean_db(&self, _num_learnts: usize, _num_assigns: usize) -> bool {
        false
    }

    fn clean_clause_db(
        &mut self,
        _db: &mut ClauseDb,
        _propagator: &mut WatchedLiterals,
        _trail: &mut Trail,
        _assignment: &Assignment,
    ) -> usize {
        0
    }

    /// Always returns `0` as no clauses are ever removed.
    fn num_removed(&self) -> u64 {
        0
    }

    fn max_learnts(&self) -> f64 {
        f64::INFINITY
    }
}

/// Possible clause management implementations
#[derive(Debug, Clone, PartialEq)]
pub enum ClauseManagementImpls {
    /// No clause management variant
    NoClauseManagement(NoClauseManagement),
    /// Activity-based variant
    ActivityClauseManagement(ActivityClauseManagement),
}

impl ClauseManagement for ClauseManagementImpls {
    fn on_solve_start(&mut self, num_clauses: usize) {
        match self {
            Self::ActivityClauseManagement(m) => m.on_solve_start(num_clauses),
            Self::NoClauseManagement(m) => m.on_solve_start(num_clauses),
        }
    }

    fn on_conflict(&mut self) -> bool {
        match self {
            Self::ActivityClauseManagement(m) => m.on_conflict(),
            Self::NoClauseManagement(m) => m.on_conflict(),
        }
    }

    fn should_clean_db(&self, num_learnts: usize, num_assigns: usize) -> bool {
        match self {
            Self::ActivityClauseManagement(m) => m.should_clean_db(num_learnts, num_assigns),
            Self::NoClauseManagement(m) => m.should_clean_db(num_learnts, num_assigns),
        }
    }

    fn clean_clause_db(
        &mut self,
        db: &mut ClauseDb,
        propagator: &mut WatchedLiterals,
        trail: &mut Trail,
        assignment: &Assignment,
    ) -> usize {
        match self {
            Self::ActivityClauseManagement(m) => {
                m.clean_clause_db(db, propagator, trail, assignment)
            }
            Self::NoClauseManagement(m) => m.clean_clause_db(db, propagator, trail, assignment),
        }
    }

    fn num_removed(&self) -> u64 {
        match self {
            Self::ActivityClauseManagement(m) => m.num_removed(),
            Self::NoClauseManagement(m) => m.num_removed(),
        }
    }

    fn max_learnts(&self) -> f64 {
        match self {
            Self::ActivityClauseManagement(m) => m.max_learnts(),
            Self::NoClauseManagement(m) => m.max_learnts(),
        }
    }
}

/// Enum representing the type of clause management strategy to use.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash, Default, ValueEnum)]
pub enum ClauseManagementType {
    /// Keep every learnt clause
    NoClauseManagement,
    /// Activity-based learnt clause reduction
    #[default]
    ActivityClauseManagement,
}

impl Display for ClauseManagementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoClauseManagement => write!(f, "No Clause Management"),
            Self::ActivityClauseManagement => write!(f, "Activity Clause Management"),
        }
    }
}

impl ClauseManagementType {
    /// Converts the `ClauseManagementType` to a concrete `ClauseManagementImpls`.
    #[must_use]
    pub fn to_impl(self, options: &SolverOptions) -> ClauseManagementImpls {
        match self {
            Self::NoClauseManagement => {
                ClauseManagementImpls::NoClauseManagement(NoClauseManagement)
            }
            Self::ActivityClauseManagement => ClauseManagementImpls::ActivityClauseManagement(
                ActivityClauseManagement::new(options),
            ),
        }
    }
}
