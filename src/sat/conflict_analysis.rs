#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Conflict analysis.
//!
//! [`Analyser::analyse`] derives the first-UIP learnt clause from a
//! conflicting clause by resolving backwards along the trail until exactly
//! one literal of the conflict level remains. The clause is then optionally
//! minimised, and its literals are arranged so that position 0 holds the
//! asserting literal and position 1 a literal of the backjump level.
//!
//! [`Analyser::analyse_final`] explains a failed assumption in terms of the
//! assumptions that imply its negation.

use crate::sat::clause_db::{ClauseDb, ClauseRef};
use crate::sat::configs::ClauseMinimisation;
use crate::sat::literal::{Literal, Variable};
use crate::sat::trail::{Reason, Trail};
use crate::sat::variable_selection::Vsids;
use bit_vec::BitVec;

/// What a conflict taught the solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// A single literal that must hold at level 0.
    Unit(Literal),
    /// An asserting clause and the level to backjump to before adding it.
    Learned {
        /// The asserting literal first, a literal of the backjump level second.
        clause: Vec<Literal>,
        /// The second highest decision level in `clause`.
        backtrack_level: u32,
    },
}

const fn abstract_level(level: u32) -> u32 {
    1 << (level & 31)
}

/// Conflict analysis with reusable scratch space.
#[derive(Debug, Clone)]
pub struct Analyser {
    seen: BitVec,
    learnt: Vec<Literal>,
    analyze_stack: Vec<Literal>,
    to_clear: Vec<Literal>,
    mode: ClauseMinimisation,
    max_literals: u64,
    tot_literals: u64,
}

impl Analyser {
    /// Creates an analyser using the given minimisation mode.
    #[must_use]
    pub fn new(mode: ClauseMinimisation) -> Self {
        Self {
            seen: BitVec::new(),
            learnt: Vec::new(),
            analyze_stack: Vec::new(),
            to_clear: Vec::new(),
            mode,
            max_literals: 0,
            tot_literals: 0,
        }
    }

    /// Adds scratch space for one more variable.
    pub fn grow(&mut self) {
        self.seen.push(false);
    }

    /// Learnt literals before minimisation, summed over all conflicts.
    #[must_use]
    pub const fn max_literals(&self) -> u64 {
        self.max_literals
    }

    /// Learnt literals after minimisation, summed over all conflicts.
    #[must_use]
    pub const fn tot_literals(&self) -> u64 {
        self.tot_literals
    }

    fn is_seen(&self, var: Variable) -> bool {
        self.seen.get(var as usize).unwrap_or(false)
    }

    fn mark(&mut self, var: Variable, value: bool) {
        self.seen.set(var as usize, value);
    }

    /// Analyses `conflict`, which must be false under the current assignment
    /// at a decision level above 0. Bumps the activity of every variable met
    /// and of every learnt clause resolved on.
    pub fn analyse(
        &mut self,
        conflict: ClauseRef,
        trail: &Trail,
        db: &mut ClauseDb,
        vsids: &mut Vsids,
    ) -> Conflict {
        let level = trail.decision_level();
        debug_assert!(level > 0);

        self.learnt.clear();
        // Placeholder for the asserting literal.
        self.learnt.push(Literal::default());

        let mut path_c = 0usize;
        let mut p: Option<Literal> = None;
        let mut index = trail.len();
        let mut confl = Some(conflict);

        loop {
            if let Some(cref) = confl {
                if db[cref].is_learnt() {
                    db.bump_activity(cref);
                }
                let start = usize::from(p.is_some());
                for &q in &db[cref].literals()[start..] {
                    let var = q.variable();
                    if !self.is_seen(var) && trail.level(var) > 0 {
                        vsids.bump(var);
                        self.mark(var, true);
                        if trail.level(var) >= level {
                            path_c += 1;
                        } else {
                            self.learnt.push(q);
                        }
                    }
                }
            }

            loop {
                index -= 1;
                if self.is_seen(trail[index].variable()) {
                    break;
                }
            }
            let lit = trail[index];
            p = Some(lit);
            confl = match trail.reason(lit.variable()) {
                Reason::Long(cref) => Some(cref),
                Reason::Decision | Reason::Unit => None,
            };
            self.mark(lit.variable(), false);
            path_c -= 1;
            if path_c == 0 {
                break;
            }
        }

        if let Some(uip) = p {
            self.learnt[0] = !uip;
        }

        self.minimise(trail, db);

        if self.learnt.len() == 1 {
            return Conflict::Unit(self.learnt[0]);
        }

        let mut max_i = 1;
        for i in 2..self.learnt.len() {
            if trail.level(self.learnt[i].variable()) > trail.level(self.learnt[max_i].variable()) {
                max_i = i;
            }
        }
        self.learnt.swap(1, max_i);

        Conflict::Learned {
            clause: self.learnt.clone(),
            backtrack_level: trail.level(self.learnt[1].variable()),
        }
    }

    fn minimise(&mut self, trail: &Trail, db: &ClauseDb) {
        self.to_clear.clear();
        self.to_clear.extend_from_slice(&self.learnt);

        let mut j = 1;
        match self.mode {
            ClauseMinimisation::Deep => {
                let abstract_levels = self.learnt[1..]
                    .iter()
                    .fold(0, |acc, l| acc | abstract_level(trail.level(l.variable())));
                for i in 1..self.learnt.len() {
                    let lit = self.learnt[i];
                    let keep = match trail.reason(lit.variable()) {
                        Reason::Long(_) => !self.lit_redundant(lit, abstract_levels, trail, db),
                        Reason::Decision | Reason::Unit => true,
                    };
                    if keep {
                        self.learnt[j] = lit;
                        j += 1;
                    }
                }
            }
            ClauseMinimisation::Basic => {
                for i in 1..self.learnt.len() {
                    let lit = self.learnt[i];
                    let keep = match trail.reason(lit.variable()) {
                        Reason::Long(cref) => db[cref].literals()[1..].iter().any(|q| {
                            !self.is_seen(q.variable()) && trail.level(q.variable()) > 0
                        }),
                        Reason::Decision | Reason::Unit => true,
                    };
                    if keep {
                        self.learnt[j] = lit;
                        j += 1;
                    }
                }
            }
            ClauseMinimisation::None => j = self.learnt.len(),
        }

        self.max_literals += self.learnt.len() as u64;
        self.learnt.truncate(j);
        self.tot_literals += self.learnt.len() as u64;

        for i in 0..self.to_clear.len() {
            let var = self.to_clear[i].variable();
            self.mark(var, false);
        }
    }

    /// `true` if `p` is implied by literals already in the learnt clause.
    /// Variables visited on a successful check stay marked until the caller
    /// clears `to_clear`.
    fn lit_redundant(
        &mut self,
        p: Literal,
        abstract_levels: u32,
        trail: &Trail,
        db: &ClauseDb,
    ) -> bool {
        self.analyze_stack.clear();
        self.analyze_stack.push(p);
        let top = self.to_clear.len();

        while let Some(lit) = self.analyze_stack.pop() {
            let Reason::Long(cref) = trail.reason(lit.variable()) else {
                continue;
            };
            for &q in &db[cref].literals()[1..] {
                let var = q.variable();
                if self.is_seen(var) || trail.level(var) == 0 {
                    continue;
                }
                let expandable = matches!(trail.reason(var), Reason::Long(_))
                    && abstract_level(trail.level(var)) & abstract_levels != 0;
                if expandable {
                    self.mark(var, true);
                    self.analyze_stack.push(q);
                    self.to_clear.push(q);
                } else {
                    for k in top..self.to_clear.len() {
                        let v = self.to_clear[k].variable();
                        self.mark(v, false);
                    }
                    self.to_clear.truncate(top);
                    return false;
                }
            }
        }
        true
    }

    /// Collects the assumptions responsible for `failed`, an assumption found
    /// false. The result contains `failed` itself followed by the earlier
    /// assumptions whose propagation forced it false.
    pub fn analyse_final(&mut self, failed: Literal, trail: &Trail, db: &ClauseDb) -> Vec<Literal> {
        let mut conflict = vec![failed];
        if trail.decision_level() == 0 {
            return conflict;
        }

        self.mark(failed.variable(), true);
        for i in (trail.level_zero_len()..trail.len()).rev() {
            let lit = trail[i];
            let var = lit.variable();
            if !self.is_seen(var) {
                continue;
            }
            match trail.reason(var) {
                Reason::Decision => {
                    debug_assert!(trail.level(var) > 0);
                    conflict.push(lit);
                }
                Reason::Long(cref) => {
                    for &q in &db[cref].literals()[1..] {
                        if trail.level(q.variable()) > 0 {
                            self.mark(q.variable(), true);
                        }
                    }
                }
                Reason::Unit => {}
            }
            self.mark(var, false);
        }
        self.mark(failed.variable(), false);
        conflict
    }
}
