//! Outcomes and reporting types shared by the solver front door.

use crate::sat::assignment::LBool;
use crate::sat::literal::{Literal, Variable};
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// Outcome of a solve call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveResult {
    /// A model satisfying every clause and assumption was found.
    Sat,
    /// The clauses, together with the assumptions if any, are unsatisfiable.
    Unsat,
    /// The search budget ran out before the question was settled.
    Unknown,
}

impl SolveResult {
    /// `true` for [`SolveResult::Sat`].
    #[must_use]
    pub const fn is_sat(self) -> bool {
        matches!(self, Self::Sat)
    }

    /// `true` for [`SolveResult::Unsat`].
    #[must_use]
    pub const fn is_unsat(self) -> bool {
        matches!(self, Self::Unsat)
    }

    /// `true` for [`SolveResult::Unknown`].
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl From<SolveResult> for LBool {
    fn from(result: SolveResult) -> Self {
        match result {
            SolveResult::Sat => Self::True,
            SolveResult::Unsat => Self::False,
            SolveResult::Unknown => Self::Undef,
        }
    }
}

impl Display for SolveResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sat => write!(f, "SATISFIABLE"),
            Self::Unsat => write!(f, "UNSATISFIABLE"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// A copy of the assignment found by the last satisfiable solve call.
///
/// Variables that are not decision variables and were never forced may be
/// left `Undef`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Model(Vec<LBool>);

impl Model {
    /// Wraps a per-variable value vector.
    #[must_use]
    pub const fn new(values: Vec<LBool>) -> Self {
        Self(values)
    }

    /// Value of `var`; `Undef` for variables created after the model was taken.
    #[must_use]
    pub fn value(&self, var: Variable) -> LBool {
        self.0.get(var as usize).copied().unwrap_or_default()
    }

    /// Value of `lit` under the model.
    #[must_use]
    pub fn lit_value(&self, lit: Literal) -> LBool {
        self.value(lit.variable()) ^ lit.is_negated()
    }

    /// Number of variables covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if no variables are covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the values in variable order.
    pub fn iter(&self) -> impl Iterator<Item = &LBool> {
        self.0.iter()
    }

    /// The literals made true by the model, one per assigned variable.
    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        self.0.iter().enumerate().filter_map(|(var, value)| {
            let var = Variable::try_from(var).ok()?;
            value.to_option().map(|polarity| Literal::new(var, polarity))
        })
    }

    /// `true` if some literal of `clause` is true under the model.
    #[must_use]
    pub fn satisfies(&self, clause: &[Literal]) -> bool {
        clause.iter().any(|&lit| self.lit_value(lit).is_true())
    }
}

/// DIMACS-style value line, e.g. `1 -2 3`.
impl Display for Model {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.literals().map(Literal::to_i32).join(" "))
    }
}

/// Counters accumulated over the lifetime of a solver instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolutionStats {
    /// Solve calls made.
    pub solves: u64,
    /// Conflicts encountered.
    pub conflicts: u64,
    /// Decisions made by the heuristic (assumptions are not counted).
    pub decisions: u64,
    /// Decisions that picked a random variable.
    pub random_decisions: u64,
    /// Literals dequeued by unit propagation.
    pub propagations: u64,
    /// Restarts performed.
    pub restarts: u64,
    /// Learnt literals before minimisation.
    pub max_literals: u64,
    /// Learnt literals after minimisation.
    pub tot_literals: u64,
    /// Learnt clauses removed by database reduction.
    pub removed_clauses: u64,
}

impl Display for SolutionStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "solves       : {}", self.solves)?;
        writeln!(f, "restarts     : {}", self.restarts)?;
        writeln!(f, "conflicts    : {}", self.conflicts)?;
        writeln!(
            f,
            "decisions    : {} ({} random)",
            self.decisions, self.random_decisions
        )?;
        writeln!(f, "propagations : {}", self.propagations)?;
        writeln!(f, "removed      : {}", self.removed_clauses)?;
        #[allow(clippy::cast_precision_loss)]
        let deleted = if self.max_literals == 0 {
            0.0
        } else {
            (self.max_literals - self.tot_literals) as f64 * 100.0 / self.max_literals as f64
        };
        write!(f, "conflict lits: {} ({deleted:.2} % deleted)", self.tot_literals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_values() {
        let model = Model::new(vec![LBool::True, LBool::False, LBool::Undef]);
        assert_eq!(model.value(0), LBool::True);
        assert_eq!(model.lit_value(Literal::negative(1)), LBool::True);
        assert_eq!(model.value(2), LBool::Undef);
        assert_eq!(model.value(17), LBool::Undef);
        assert_eq!(model.to_string(), "1 -2");
    }

    #[test]
    fn test_model_satisfies() {
        let model = Model::new(vec![LBool::False, LBool::False]);
        assert!(model.satisfies(&[Literal::positive(0), Literal::negative(1)]));
        assert!(!model.satisfies(&[Literal::positive(0), Literal::positive(1)]));
        assert!(!model.satisfies(&[]));
    }

    #[test]
    fn test_result_conversion() {
        assert_eq!(LBool::from(SolveResult::Sat), LBool::True);
        assert_eq!(LBool::from(SolveResult::Unsat), LBool::False);
        assert_eq!(LBool::from(SolveResult::Unknown), LBool::Undef);
        assert_eq!(SolveResult::Unknown.to_string(), "UNKNOWN");
    }
}
