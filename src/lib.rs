#![deny(missing_docs)]
//! An incremental CDCL SAT solving engine.
//!
//! The engine decides satisfiability of Boolean formulas in conjunctive normal
//! form. A single [`Cdcl`] instance can be solved repeatedly: clauses may be
//! added between calls, each call may carry a set of assumption literals, and
//! a call that fails because of its assumptions reports the subset responsible.
//! Conflict and propagation budgets allow bounded solving.

/// The `sat` module holds the solver and the data structures it is built from.
pub mod sat;

pub use sat::assignment::LBool;
pub use sat::cdcl::Cdcl;
pub use sat::configs::{ClauseMinimisation, PhaseSaving, SolverOptions};
pub use sat::error::{Result, SolverError};
pub use sat::literal::{Literal, Variable};
pub use sat::solver::{Model, SolutionStats, SolveResult};
