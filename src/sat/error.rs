//! Errors reported for caller contract violations.
//!
//! Unsatisfiability and budget exhaustion are ordinary solve outcomes and are
//! reported through [`crate::sat::solver::SolveResult`], not through this type.

use crate::sat::literal::Variable;
use thiserror::Error;

/// A misuse of the solver API. The solver state is left untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    /// A variable (or the variable of a literal) was never allocated.
    #[error("variable {0} has not been allocated")]
    UnknownVariable(Variable),

    /// A model was requested but the last solve call did not return SAT.
    #[error("no model available: the last solve call did not return SAT")]
    NoModel,

    /// A conflict was requested but the last solve call did not fail under assumptions.
    #[error("no conflict available: the last solve call did not fail under assumptions")]
    NoConflict,

    /// A conflict literal index is out of range.
    #[error("conflict literal index {index} out of range (conflict has {len} literals)")]
    ConflictIndex {
        /// The requested index.
        index: usize,
        /// Number of literals in the conflict.
        len: usize,
    },

    /// A solver option is outside its valid range.
    #[error("invalid option `{name}`: {reason}")]
    InvalidOption {
        /// The option name.
        name: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
}

/// Result alias used throughout the solver API.
pub type Result<T> = std::result::Result<T, SolverError>;
