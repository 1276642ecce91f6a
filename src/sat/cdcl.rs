#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The incremental CDCL solver.
//!
//! [`Cdcl`] owns every piece of solver state and drives the
//! decide / propagate / analyse / backjump loop. Clauses, activities and
//! saved phases persist across solve calls; the trail is unwound to level 0
//! and the assumptions are dropped at the end of every call.

use crate::sat::assignment::{Assignment, LBool};
use crate::sat::budget::Budget;
use crate::sat::clause_db::{ClauseDb, ClauseRef};
use crate::sat::clause_management::{
    ClauseManagement, ClauseManagementImpls, remove_clause,
};
use crate::sat::configs::SolverOptions;
use crate::sat::conflict_analysis::{Analyser, Conflict};
use crate::sat::error::{Result, SolverError};
use crate::sat::literal::{Literal, Variable};
use crate::sat::phase_saving::SavedPhases;
use crate::sat::propagation::WatchedLiterals;
use crate::sat::restarter::{Restarter, RestarterImpls};
use crate::sat::solver::{Model, SolutionStats, SolveResult};
use crate::sat::trail::{Reason, Trail};
use crate::sat::variable_selection::Vsids;
use tracing::{debug, info, trace};

/// How a single restart-free stretch of search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchOutcome {
    Sat,
    Unsat,
    /// A restart is due or the budget ran out.
    Interrupted,
}

/// An incremental CDCL SAT solver instance.
///
/// ```
/// use cdcl_engine::{Cdcl, Literal, SolveResult};
///
/// let mut solver = Cdcl::new();
/// let x = solver.new_var();
/// let y = solver.new_var();
/// solver.add_clause(&[Literal::positive(x), Literal::positive(y)]).unwrap();
/// solver.add_clause(&[Literal::negative(x)]).unwrap();
///
/// assert_eq!(solver.solve(&[]).unwrap(), SolveResult::Sat);
/// assert!(solver.model_value(y).unwrap().is_true());
///
/// let result = solver.solve(&[Literal::negative(y)]).unwrap();
/// assert_eq!(result, SolveResult::Unsat);
/// assert_eq!(solver.failed_assumptions(), &[Literal::negative(y)]);
/// assert!(solver.okay());
/// ```
#[derive(Debug, Clone)]
pub struct Cdcl {
    options: SolverOptions,

    assignment: Assignment,
    trail: Trail,
    db: ClauseDb,
    propagator: WatchedLiterals,
    analyser: Analyser,
    selector: Vsids,
    phases: SavedPhases,
    restarter: RestarterImpls,
    manager: ClauseManagementImpls,
    budget: Budget,
    rng: fastrand::Rng,

    /// `false` once the clauses are known to be unsatisfiable.
    ok: bool,
    model: Option<Model>,
    conflict: Vec<Literal>,
    assumptions: Vec<Literal>,

    stats: SolutionStats,
    /// Number of root assignments at the last `simplify`.
    simp_db_assigns: Option<usize>,
    /// Propagations left before `simplify` does any work again.
    simp_db_props: i64,
    progress_estimate: f64,
}

impl Default for Cdcl {
    fn default() -> Self {
        Self::new()
    }
}

impl Cdcl {
    /// Creates a solver with the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::build(SolverOptions::default())
    }

    /// Creates a solver with the given options.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidOption`] if an option is out of range.
    pub fn with_options(options: SolverOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::build(options))
    }

    fn build(options: SolverOptions) -> Self {
        Self {
            assignment: Assignment::default(),
            trail: Trail::default(),
            db: ClauseDb::new(options.clause_decay),
            propagator: WatchedLiterals::default(),
            analyser: Analyser::new(options.ccmin_mode),
            selector: Vsids::new(options.var_decay, options.random_var_freq),
            phases: SavedPhases::new(
                options.phase_saving,
                options.default_polarity,
                options.random_polarity,
            ),
            restarter: options
                .restart_policy
                .to_impl(options.restart_first, options.restart_inc),
            manager: options.clause_management.to_impl(&options),
            budget: Budget::default(),
            rng: fastrand::Rng::with_seed(options.random_seed),
            ok: true,
            model: None,
            conflict: Vec::new(),
            assumptions: Vec::new(),
            stats: SolutionStats::default(),
            simp_db_assigns: None,
            simp_db_props: 0,
            progress_estimate: 0.0,
            options,
        }
    }

    /// The options this solver was created with.
    #[must_use]
    pub const fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Allocates a fresh decision variable. Identifiers start at 0 and increase by one.
    pub fn new_var(&mut self) -> Variable {
        self.new_var_with(None, true)
    }

    /// Allocates a fresh variable with an optional forced polarity, and
    /// whether it may be branched on.
    pub fn new_var_with(&mut self, polarity: Option<bool>, decision: bool) -> Variable {
        let var = self.selector.add_var(decision);
        self.assignment.grow();
        self.trail.grow();
        self.propagator.grow();
        self.analyser.grow();
        self.phases.add_var(polarity);
        var
    }

    fn check_var(&self, var: Variable) -> Result<()> {
        if (var as usize) < self.assignment.len() {
            Ok(())
        } else {
            Err(SolverError::UnknownVariable(var))
        }
    }

    fn check_lits(&self, lits: &[Literal]) -> Result<()> {
        lits.iter().try_for_each(|l| self.check_var(l.variable()))
    }

    /// Adds a clause.
    ///
    /// The clause is normalised first: duplicate literals and literals false
    /// at level 0 are dropped, and a clause that is a tautology or already
    /// satisfied at level 0 is ignored.
    ///
    /// Returns `Ok(false)` exactly when the solver is (now) known to be
    /// unsatisfiable; every later call then returns `Ok(false)` immediately.
    ///
    /// # Errors
    ///
    /// [`SolverError::UnknownVariable`] if a literal refers to an unallocated variable.
    pub fn add_clause(&mut self, lits: &[Literal]) -> Result<bool> {
        self.check_lits(lits)?;
        if !self.ok {
            return Ok(false);
        }
        debug_assert_eq!(self.trail.decision_level(), 0);

        let mut sorted = lits.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut kept = Vec::with_capacity(sorted.len());
        let mut prev: Option<Literal> = None;
        for lit in sorted {
            let value = self.assignment.literal_value(lit);
            if value.is_true() || prev == Some(!lit) {
                return Ok(true);
            }
            if !value.is_false() {
                kept.push(lit);
            }
            prev = Some(lit);
        }

        match kept.as_slice() {
            [] => {
                debug!("empty clause added: root contradiction");
                self.ok = false;
            }
            [unit] => {
                self.trail
                    .assign(*unit, Reason::Unit, &mut self.assignment);
                if self.propagate().is_some() {
                    debug!(%unit, "unit clause propagates to a root contradiction");
                    self.ok = false;
                }
            }
            _ => {
                let cref = self.db.alloc(&kept, false);
                self.propagator.attach(cref, &self.db[cref]);
            }
        }
        Ok(self.ok)
    }

    /// `false` once the clauses have been proven unsatisfiable without assumptions.
    #[must_use]
    pub const fn okay(&self) -> bool {
        self.ok
    }

    fn propagate(&mut self) -> Option<ClauseRef> {
        let before = self.propagator.propagations();
        let conflict =
            self.propagator
                .propagate(&mut self.trail, &mut self.assignment, &mut self.db);
        let done = self.propagator.propagations() - before;
        self.simp_db_props -= i64::try_from(done).unwrap_or(i64::MAX);
        conflict
    }

    fn cancel_until(&mut self, level: u32) {
        let phases = &mut self.phases;
        let selector = &mut self.selector;
        self.trail
            .backtrack_to(level, &mut self.assignment, |lit, last_level| {
                phases.on_unassign(lit, last_level);
                selector.reinsert(lit.variable());
            });
    }

    fn check_garbage(&mut self) {
        if self.db.needs_collection(self.options.garbage_frac) {
            let wasted = self.db.wasted();
            let reclaimed = self
                .db
                .collect_garbage(self.propagator.watches_mut(), &mut self.trail);
            debug!(wasted, reclaimed, "garbage collection");
        }
    }

    /// Removes the clauses of `list` satisfied at level 0 and trims the
    /// literals false at level 0 from the rest.
    fn remove_satisfied(&mut self, list: &[ClauseRef]) {
        for &cref in list {
            if self.db[cref].is_satisfied(&self.assignment) {
                remove_clause(
                    cref,
                    &mut self.db,
                    &mut self.propagator,
                    &mut self.trail,
                    &self.assignment,
                );
            } else {
                self.db.trim_false(cref, &self.assignment);
            }
        }
    }

    /// Simplifies the clause database with the facts known at level 0.
    ///
    /// Returns `false` if propagating the root facts yields a contradiction,
    /// in which case the solver is permanently unsatisfiable. Does nothing
    /// unless new root facts have appeared since the last call.
    pub fn simplify(&mut self) -> bool {
        debug_assert_eq!(self.trail.decision_level(), 0);

        if !self.ok || self.propagate().is_some() {
            if self.ok {
                debug!("simplify found a root contradiction");
            }
            self.ok = false;
            return false;
        }

        if self.simp_db_assigns == Some(self.num_assigns()) || self.simp_db_props > 0 {
            return true;
        }

        let learnts = self.db.learnts().to_vec();
        self.remove_satisfied(&learnts);
        if self.options.remove_satisfied {
            let originals = self.db.originals().to_vec();
            self.remove_satisfied(&originals);
        }
        self.db.purge_lists();
        self.check_garbage();
        self.selector.rebuild(&self.assignment);

        self.simp_db_assigns = Some(self.num_assigns());
        self.simp_db_props =
            i64::try_from(self.db.original_literals() + self.db.learnt_literals())
                .unwrap_or(i64::MAX);
        true
    }

    fn within_budget(&self) -> bool {
        self.budget
            .within(self.stats.conflicts, self.propagator.propagations())
    }

    fn pick_branch_lit(&mut self) -> Option<Literal> {
        let var = self.selector.pick(&self.assignment, &mut self.rng)?;
        Some(self.phases.next_literal(var, &mut self.rng))
    }

    #[allow(clippy::cast_precision_loss)]
    fn compute_progress_estimate(&self) -> f64 {
        let num_vars = self.num_vars();
        if num_vars == 0 {
            return 0.0;
        }
        let f = (num_vars as f64).recip();
        let mut progress = 0.0;
        for level in 0..=self.trail.decision_level() {
            let range = self.trail.level_range(level);
            let exponent = i32::try_from(level).unwrap_or(i32::MAX);
            progress += f.powi(exponent) * range.len() as f64;
        }
        progress / num_vars as f64
    }

    fn log_progress(&self) {
        if self.options.verbosity >= 1 {
            info!(
                conflicts = self.stats.conflicts,
                vars = self.selector.num_decision_vars(),
                clauses = self.num_clauses(),
                clause_lits = self.db.original_literals(),
                max_learnts = self.manager.max_learnts(),
                learnts = self.num_learnts(),
                learnt_lits = self.db.learnt_literals(),
                progress = self.progress_estimate * 100.0,
                "search progress"
            );
        }
    }

    fn search(&mut self) -> SearchOutcome {
        debug_assert!(self.ok);
        let mut restart_pending = false;

        loop {
            if let Some(confl) = self.propagate() {
                self.stats.conflicts += 1;
                if self.trail.decision_level() == 0 {
                    return SearchOutcome::Unsat;
                }

                match self
                    .analyser
                    .analyse(confl, &self.trail, &mut self.db, &mut self.selector)
                {
                    Conflict::Unit(lit) => {
                        trace!(%lit, "learnt unit");
                        self.cancel_until(0);
                        self.trail
                            .assign(lit, Reason::Unit, &mut self.assignment);
                    }
                    Conflict::Learned {
                        clause,
                        backtrack_level,
                    } => {
                        trace!(len = clause.len(), backtrack_level, "learnt clause");
                        self.cancel_until(backtrack_level);
                        let cref = self.db.alloc(&clause, true);
                        self.propagator.attach(cref, &self.db[cref]);
                        self.db.bump_activity(cref);
                        self.trail
                            .assign(clause[0], Reason::Long(cref), &mut self.assignment);
                    }
                }

                self.selector.decay();
                self.db.decay_activity();

                if self.manager.on_conflict() {
                    self.log_progress();
                }
                if self.restarter.should_restart() {
                    restart_pending = true;
                }
            } else {
                if restart_pending || !self.within_budget() {
                    self.progress_estimate = self.compute_progress_estimate();
                    self.cancel_until(0);
                    return SearchOutcome::Interrupted;
                }

                if self.trail.decision_level() == 0 && !self.simplify() {
                    return SearchOutcome::Unsat;
                }

                if self
                    .manager
                    .should_clean_db(self.db.num_learnts(), self.num_assigns())
                {
                    self.manager.clean_clause_db(
                        &mut self.db,
                        &mut self.propagator,
                        &mut self.trail,
                        &self.assignment,
                    );
                    self.check_garbage();
                }

                let mut next = None;
                while (self.trail.decision_level() as usize) < self.assumptions.len() {
                    let p = self.assumptions[self.trail.decision_level() as usize];
                    match self.assignment.literal_value(p) {
                        LBool::True => self.trail.new_decision_level(),
                        LBool::False => {
                            self.conflict =
                                self.analyser
                                    .analyse_final(p, &self.trail, &self.db);
                            debug!(failed = %p, core = self.conflict.len(), "assumption conflict");
                            return SearchOutcome::Unsat;
                        }
                        LBool::Undef => {
                            next = Some(p);
                            break;
                        }
                    }
                }

                let next = match next {
                    Some(p) => p,
                    None => match self.pick_branch_lit() {
                        Some(lit) => {
                            self.stats.decisions += 1;
                            lit
                        }
                        None => return SearchOutcome::Sat,
                    },
                };

                trace!(lit = %next, level = self.trail.decision_level() + 1, "decision");
                self.trail.new_decision_level();
                self.trail
                    .assign(next, Reason::Decision, &mut self.assignment);
            }
        }
    }

    fn solve_internal(&mut self, assumptions: &[Literal]) -> Result<SolveResult> {
        self.check_lits(assumptions)?;

        self.model = None;
        self.conflict.clear();
        self.stats.solves += 1;
        if !self.ok {
            return Ok(SolveResult::Unsat);
        }

        self.assumptions = assumptions.to_vec();
        self.manager.on_solve_start(self.db.num_originals());
        self.restarter.reset();

        let status = loop {
            match self.search() {
                SearchOutcome::Sat => break SolveResult::Sat,
                SearchOutcome::Unsat => break SolveResult::Unsat,
                SearchOutcome::Interrupted => {
                    if !self.within_budget() {
                        break SolveResult::Unknown;
                    }
                    self.stats.restarts += 1;
                    debug!(
                        restarts = self.stats.restarts,
                        conflicts = self.stats.conflicts,
                        "restart"
                    );
                }
            }
        };

        match status {
            SolveResult::Sat => {
                self.model = Some(Model::new(self.assignment.iter().copied().collect()));
            }
            SolveResult::Unsat if self.conflict.is_empty() => {
                debug!("root contradiction");
                self.ok = false;
            }
            SolveResult::Unsat | SolveResult::Unknown => {}
        }

        self.cancel_until(0);
        self.assumptions.clear();

        debug!(result = %status, conflicts = self.stats.conflicts, "solve finished");
        self.log_progress();
        Ok(status)
    }

    /// Solves under `assumptions`, ignoring and clearing any budget.
    ///
    /// Never returns [`SolveResult::Unknown`]. On `Unsat`, the instance is
    /// permanently unsatisfiable iff [`Cdcl::okay`] is `false`; otherwise
    /// [`Cdcl::failed_assumptions`] holds the responsible assumptions.
    ///
    /// # Errors
    ///
    /// [`SolverError::UnknownVariable`] if an assumption refers to an unallocated variable.
    pub fn solve(&mut self, assumptions: &[Literal]) -> Result<SolveResult> {
        self.budget_off();
        self.solve_internal(assumptions)
    }

    /// Solves under `assumptions` within the current budget, returning
    /// [`SolveResult::Unknown`] if the budget runs out first.
    ///
    /// # Errors
    ///
    /// [`SolverError::UnknownVariable`] if an assumption refers to an unallocated variable.
    pub fn solve_limited(&mut self, assumptions: &[Literal]) -> Result<SolveResult> {
        self.solve_internal(assumptions)
    }

    /// Sets (`Some`) or clears (`None`) the forced branching polarity of `var`.
    ///
    /// # Errors
    ///
    /// [`SolverError::UnknownVariable`] for an unallocated variable.
    pub fn set_polarity(&mut self, var: Variable, polarity: Option<bool>) -> Result<()> {
        self.check_var(var)?;
        self.phases.set_forced(var, polarity);
        Ok(())
    }

    /// The forced branching polarity of `var`, if any.
    ///
    /// # Errors
    ///
    /// [`SolverError::UnknownVariable`] for an unallocated variable.
    pub fn polarity(&self, var: Variable) -> Result<Option<bool>> {
        self.check_var(var)?;
        Ok(self.phases.forced(var))
    }

    /// Includes `var` in, or excludes it from, branching.
    ///
    /// # Errors
    ///
    /// [`SolverError::UnknownVariable`] for an unallocated variable.
    pub fn set_decision_var(&mut self, var: Variable, decision: bool) -> Result<()> {
        self.check_var(var)?;
        self.selector.set_decision(var, decision);
        Ok(())
    }

    /// Whether `var` may be branched on.
    ///
    /// # Errors
    ///
    /// [`SolverError::UnknownVariable`] for an unallocated variable.
    pub fn is_decision_var(&self, var: Variable) -> Result<bool> {
        self.check_var(var)?;
        Ok(self.selector.is_decision(var))
    }

    /// Current value of `var`. Between solve calls only root facts are assigned.
    ///
    /// # Errors
    ///
    /// [`SolverError::UnknownVariable`] for an unallocated variable.
    pub fn value(&self, var: Variable) -> Result<LBool> {
        self.check_var(var)?;
        Ok(self.assignment.var_value(var))
    }

    /// Current value of `lit`.
    ///
    /// # Errors
    ///
    /// [`SolverError::UnknownVariable`] for an unallocated variable.
    pub fn lit_value(&self, lit: Literal) -> Result<LBool> {
        self.check_var(lit.variable())?;
        Ok(self.assignment.literal_value(lit))
    }

    /// The model found by the last solve call.
    ///
    /// # Errors
    ///
    /// [`SolverError::NoModel`] unless the last solve call returned `Sat`.
    pub fn model(&self) -> Result<&Model> {
        self.model.as_ref().ok_or(SolverError::NoModel)
    }

    /// Value of `var` in the last model.
    ///
    /// # Errors
    ///
    /// [`SolverError::UnknownVariable`] for an unallocated variable,
    /// [`SolverError::NoModel`] unless the last solve call returned `Sat`.
    pub fn model_value(&self, var: Variable) -> Result<LBool> {
        self.check_var(var)?;
        Ok(self.model()?.value(var))
    }

    /// Value of `lit` in the last model.
    ///
    /// # Errors
    ///
    /// As [`Cdcl::model_value`].
    pub fn model_lit_value(&self, lit: Literal) -> Result<LBool> {
        self.check_var(lit.variable())?;
        Ok(self.model()?.lit_value(lit))
    }

    /// The assumptions responsible for the last `Unsat` result, as a subset
    /// of the literals passed to the solve call. Empty unless the last call
    /// failed because of its assumptions.
    #[must_use]
    pub fn failed_assumptions(&self) -> &[Literal] {
        &self.conflict
    }

    /// Number of literals in [`Cdcl::failed_assumptions`].
    #[must_use]
    pub fn conflict_len(&self) -> usize {
        self.conflict.len()
    }

    /// The `index`-th failed assumption.
    ///
    /// # Errors
    ///
    /// [`SolverError::NoConflict`] if the last call did not fail under
    /// assumptions, [`SolverError::ConflictIndex`] if `index` is out of range.
    pub fn conflict_literal(&self, index: usize) -> Result<Literal> {
        if self.conflict.is_empty() {
            return Err(SolverError::NoConflict);
        }
        self.conflict
            .get(index)
            .copied()
            .ok_or(SolverError::ConflictIndex {
                index,
                len: self.conflict.len(),
            })
    }

    /// Number of assigned variables.
    #[must_use]
    pub fn num_assigns(&self) -> usize {
        self.trail.len()
    }

    /// Number of original clauses of length two or more.
    #[must_use]
    pub fn num_clauses(&self) -> usize {
        self.db.num_originals()
    }

    /// Number of learnt clauses currently kept.
    #[must_use]
    pub fn num_learnts(&self) -> usize {
        self.db.num_learnts()
    }

    /// Number of allocated variables.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.assignment.len()
    }

    /// Decision variables not fixed at level 0.
    #[must_use]
    pub fn num_free_vars(&self) -> usize {
        self.selector
            .num_decision_vars()
            .saturating_sub(self.trail.level_zero_len())
    }

    /// Conflicts encountered over the lifetime of the solver.
    #[must_use]
    pub const fn conflicts(&self) -> u64 {
        self.stats.conflicts
    }

    /// Branching decisions made by the heuristic.
    #[must_use]
    pub const fn decisions(&self) -> u64 {
        self.stats.decisions
    }

    /// Restarts performed.
    #[must_use]
    pub const fn restarts(&self) -> u64 {
        self.stats.restarts
    }

    /// Literals propagated.
    #[must_use]
    pub const fn propagations(&self) -> u64 {
        self.propagator.propagations()
    }

    /// Rough fraction of the search space covered at the last restart.
    #[must_use]
    pub const fn progress_estimate(&self) -> f64 {
        self.progress_estimate
    }

    /// Snapshot of all counters.
    #[must_use]
    pub fn stats(&self) -> SolutionStats {
        SolutionStats {
            propagations: self.propagator.propagations(),
            random_decisions: self.selector.random_decisions(),
            max_literals: self.analyser.max_literals(),
            tot_literals: self.analyser.tot_literals(),
            removed_clauses: self.manager.num_removed(),
            ..self.stats
        }
    }

    /// Allows `extra` more conflicts in bounded solving, counted from now.
    pub const fn set_conflict_budget(&mut self, extra: u64) {
        self.budget.set_conflicts(self.stats.conflicts, extra);
    }

    /// Allows `extra` more propagations in bounded solving, counted from now.
    pub const fn set_propagation_budget(&mut self, extra: u64) {
        let current = self.propagator.propagations();
        self.budget.set_propagations(current, extra);
    }

    /// Removes both budgets.
    pub const fn budget_off(&mut self) {
        self.budget.off();
    }

    /// Sets the diagnostic verbosity (0 silent, 1 progress, 2 verbose).
    pub const fn set_verbosity(&mut self, verbosity: u8) {
        self.options.verbosity = verbosity;
    }

    /// The current diagnostic verbosity.
    #[must_use]
    pub const fn verbosity(&self) -> u8 {
        self.options.verbosity
    }
}
