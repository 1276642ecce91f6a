#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! VSIDS decision variable selection.
//!
//! Each variable carries an activity that is bumped when it takes part in a
//! conflict. Instead of decaying every activity after a conflict, the bump
//! increment grows by `1 / var_decay`; when any activity exceeds `1e100` all
//! activities and the increment are scaled down together.
//!
//! Unassigned decision variables are kept in an order heap. Assigned
//! variables are removed lazily: [`Vsids::pick`] discards them as it pops.

use crate::sat::assignment::Assignment;
use crate::sat::heap::VarHeap;
use crate::sat::literal::Variable;
use bit_vec::BitVec;

const RESCALE_LIMIT: f64 = 1e100;

/// Variable activities, decision flags and the order heap.
#[derive(Debug, Clone)]
pub struct Vsids {
    activity: Vec<f64>,
    var_inc: f64,
    var_decay: f64,
    heap: VarHeap,
    decision: BitVec,
    num_decision_vars: usize,
    random_var_freq: f64,
    random_decisions: u64,
}

impl Vsids {
    /// Creates an empty selector.
    #[must_use]
    pub fn new(var_decay: f64, random_var_freq: f64) -> Self {
        Self {
            activity: Vec::new(),
            var_inc: 1.0,
            var_decay,
            heap: VarHeap::default(),
            decision: BitVec::new(),
            num_decision_vars: 0,
            random_var_freq,
            random_decisions: 0,
        }
    }

    /// Registers the next variable with zero activity.
    pub fn add_var(&mut self, decision: bool) -> Variable {
        let var = Variable::try_from(self.activity.len()).unwrap_or(Variable::MAX);
        self.activity.push(0.0);
        self.heap.grow();
        self.decision.push(false);
        self.set_decision(var, decision);
        var
    }

    /// Includes or excludes `var` from branching.
    pub fn set_decision(&mut self, var: Variable, decision: bool) {
        let idx = var as usize;
        let was = self.decision.get(idx).unwrap_or(false);
        if decision && !was {
            self.num_decision_vars += 1;
        } else if !decision && was {
            self.num_decision_vars -= 1;
        }
        self.decision.set(idx, decision);
        if decision {
            self.heap.insert(var, &self.activity);
        }
    }

    /// `true` if `var` may be branched on.
    #[must_use]
    pub fn is_decision(&self, var: Variable) -> bool {
        self.decision.get(var as usize).unwrap_or(false)
    }

    /// Number of variables that may be branched on.
    #[must_use]
    pub const fn num_decision_vars(&self) -> usize {
        self.num_decision_vars
    }

    /// The activity of `var`.
    #[must_use]
    pub fn activity(&self, var: Variable) -> f64 {
        self.activity[var as usize]
    }

    /// Decisions picked at random so far.
    #[must_use]
    pub const fn random_decisions(&self) -> u64 {
        self.random_decisions
    }

    /// Raises the activity of `var` by the current increment.
    pub fn bump(&mut self, var: Variable) {
        let idx = var as usize;
        self.activity[idx] += self.var_inc;
        if self.activity[idx] > RESCALE_LIMIT {
            for a in &mut self.activity {
                *a *= RESCALE_LIMIT.recip();
            }
            self.var_inc *= RESCALE_LIMIT.recip();
        }
        self.heap.update(var, &self.activity);
    }

    /// Decays every activity by growing the increment.
    pub fn decay(&mut self) {
        self.var_inc *= self.var_decay.recip();
    }

    /// Puts `var` back in the order heap after it was unassigned.
    pub fn reinsert(&mut self, var: Variable) {
        if self.is_decision(var) {
            self.heap.insert(var, &self.activity);
        }
    }

    /// Picks the next unassigned decision variable: with probability
    /// `random_var_freq` a random heap entry, otherwise the most active one.
    pub fn pick(&mut self, assignment: &Assignment, rng: &mut fastrand::Rng) -> Option<Variable> {
        if self.random_var_freq > 0.0 && !self.heap.is_empty() && rng.f64() < self.random_var_freq
        {
            if let Some(var) = self.heap.get(rng.usize(..self.heap.len())) {
                if !assignment.is_assigned(var) && self.is_decision(var) {
                    self.random_decisions += 1;
                    return Some(var);
                }
            }
        }

        while let Some(var) = self.heap.pop(&self.activity) {
            if !assignment.is_assigned(var) && self.is_decision(var) {
                return Some(var);
            }
        }
        None
    }

    /// Refills the heap with exactly the unassigned decision variables.
    pub fn rebuild(&mut self, assignment: &Assignment) {
        let decision = &self.decision;
        let vars = (0..self.activity.len()).filter_map(|idx| {
            let var = Variable::try_from(idx).ok()?;
            (decision.get(idx).unwrap_or(false) && !assignment.is_assigned(var)).then_some(var)
        });
        self.heap.rebuild(vars, &self.activity);
    }

    /// Number of variables in the order heap.
    #[cfg(test)]
    #[must_use]
    pub fn heap_len(&self) -> usize {
        self.heap.len()
    }
}
