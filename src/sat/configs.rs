//! Tunable solver parameters.
//!
//! `SolverOptions::default()` reproduces the MiniSat 2.2 defaults. The enums
//! derive `clap::ValueEnum` so a front end can expose them as command-line
//! switches unchanged.

use crate::sat::clause_management::ClauseManagementType;
use crate::sat::error::{Result, SolverError};
use crate::sat::restarter::RestartPolicy;
use clap::ValueEnum;
use std::fmt::{Display, Formatter};

/// How aggressively learnt clauses are minimised after first-UIP analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum ClauseMinimisation {
    /// Keep the learnt clause as derived.
    None,
    /// Drop literals whose reason clause is subsumed by the learnt clause.
    Basic,
    /// Recursively drop literals implied by the rest of the learnt clause.
    #[default]
    Deep,
}

impl Display for ClauseMinimisation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Basic => write!(f, "basic"),
            Self::Deep => write!(f, "deep"),
        }
    }
}

/// Which unassigned variables remember their last value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum PhaseSaving {
    /// Never save; always branch on the default polarity.
    None,
    /// Save only for variables unassigned from the deepest level of a backjump.
    Limited,
    /// Save for every unassigned variable.
    #[default]
    Full,
}

impl Display for PhaseSaving {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Limited => write!(f, "limited"),
            Self::Full => write!(f, "full"),
        }
    }
}

/// Search parameters of a [`crate::Cdcl`] instance.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOptions {
    /// Variable activity decay factor, in `(0, 1)`.
    pub var_decay: f64,
    /// Learnt clause activity decay factor, in `(0, 1)`.
    pub clause_decay: f64,
    /// Probability of picking a random decision variable, in `[0, 1]`.
    pub random_var_freq: f64,
    /// Seed for every randomised choice.
    pub random_seed: u64,
    /// Learnt clause minimisation mode.
    pub ccmin_mode: ClauseMinimisation,
    /// Phase saving mode.
    pub phase_saving: PhaseSaving,
    /// Branch on a random polarity when no polarity is forced.
    pub random_polarity: bool,
    /// Polarity used for a variable that has never been assigned.
    pub default_polarity: bool,
    /// Restart schedule.
    pub restart_policy: RestartPolicy,
    /// Base restart interval, in conflicts.
    pub restart_first: u64,
    /// Growth factor of the geometric restart schedule, greater than 1.
    pub restart_inc: f64,
    /// Learnt clause database reduction strategy.
    pub clause_management: ClauseManagementType,
    /// Initial learnt clause limit as a fraction of the original clauses.
    pub learntsize_factor: f64,
    /// Growth of the learnt clause limit at each adjustment.
    pub learntsize_inc: f64,
    /// Conflicts before the first learnt limit adjustment.
    pub learntsize_adjust_start_confl: u64,
    /// Growth of the interval between learnt limit adjustments.
    pub learntsize_adjust_inc: f64,
    /// Fraction of wasted clause memory that triggers compaction.
    pub garbage_frac: f64,
    /// Let `simplify` remove satisfied original clauses, not just learnt ones.
    pub remove_satisfied: bool,
    /// Diagnostic verbosity; has no effect on search.
    pub verbosity: u8,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            var_decay: 0.95,
            clause_decay: 0.999,
            random_var_freq: 0.0,
            random_seed: 91_648_253,
            ccmin_mode: ClauseMinimisation::Deep,
            phase_saving: PhaseSaving::Full,
            random_polarity: false,
            default_polarity: false,
            restart_policy: RestartPolicy::Luby,
            restart_first: 100,
            restart_inc: 2.0,
            clause_management: ClauseManagementType::ActivityClauseManagement,
            learntsize_factor: 1.0 / 3.0,
            learntsize_inc: 1.1,
            learntsize_adjust_start_confl: 100,
            learntsize_adjust_inc: 1.5,
            garbage_frac: 0.20,
            remove_satisfied: true,
            verbosity: 0,
        }
    }
}

fn invalid(name: &'static str, reason: &str) -> SolverError {
    SolverError::InvalidOption {
        name,
        reason: reason.to_string(),
    }
}

impl SolverOptions {
    /// Checks every option against its valid range.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidOption`] naming the first offending option.
    pub fn validate(&self) -> Result<()> {
        let open_unit = |x: f64| x > 0.0 && x < 1.0;

        if !open_unit(self.var_decay) {
            return Err(invalid("var_decay", "must lie in (0, 1)"));
        }
        if !open_unit(self.clause_decay) {
            return Err(invalid("clause_decay", "must lie in (0, 1)"));
        }
        if !(0.0..=1.0).contains(&self.random_var_freq) {
            return Err(invalid("random_var_freq", "must lie in [0, 1]"));
        }
        if self.restart_first == 0 {
            return Err(invalid("restart_first", "must be positive"));
        }
        if self.restart_inc.is_nan() || self.restart_inc <= 1.0 {
            return Err(invalid("restart_inc", "must be greater than 1"));
        }
        if self.learntsize_factor.is_nan() || self.learntsize_factor <= 0.0 {
            return Err(invalid("learntsize_factor", "must be positive"));
        }
        if self.learntsize_inc.is_nan() || self.learntsize_inc < 1.0 {
            return Err(invalid("learntsize_inc", "must be at least 1"));
        }
        if self.learntsize_adjust_start_confl == 0 {
            return Err(invalid("learntsize_adjust_start_confl", "must be positive"));
        }
        if self.learntsize_adjust_inc.is_nan() || self.learntsize_adjust_inc < 1.0 {
            return Err(invalid("learntsize_adjust_inc", "must be at least 1"));
        }
        if self.garbage_frac.is_nan() || self.garbage_frac <= 0.0 {
            return Err(invalid("garbage_frac", "must be positive"));
        }
        Ok(())
    }
}
