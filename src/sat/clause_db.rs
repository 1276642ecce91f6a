#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The clause arena.
//!
//! Every clause, original or learnt, lives in a single `Vec<Clause>` and is
//! referred to everywhere else by its [`ClauseRef`] index. Deletion is lazy:
//! [`ClauseDb::free`] only marks the clause dead and counts its literals as
//! wasted. Storage is reclaimed by [`ClauseDb::collect_garbage`], which first
//! purges dead clauses from every watch list and only then compacts the arena
//! and remaps all surviving references (watchers and trail reasons).

use crate::sat::assignment::Assignment;
use crate::sat::clause::Clause;
use crate::sat::literal::Literal;
use crate::sat::trail::Trail;
use crate::sat::watch::WatchLists;
use core::ops::{Index, IndexMut};
use rustc_hash::FxHashMap;

/// Activities above this are rescaled to keep them finite.
const ACTIVITY_RESCALE_LIMIT: f64 = 1e20;

/// Index of a clause in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClauseRef(u32);

impl ClauseRef {
    /// Position of the clause in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Owner of all clauses plus learnt clause activity bookkeeping.
#[derive(Debug, Clone)]
pub struct ClauseDb {
    arena: Vec<Clause>,
    originals: Vec<ClauseRef>,
    learnts: Vec<ClauseRef>,
    /// Literals held by live and dead clauses in the arena.
    arena_literals: usize,
    /// Literals held by dead clauses or trimmed away.
    wasted_literals: usize,
    original_literals: usize,
    learnt_literals: usize,
    cla_inc: f64,
    cla_decay: f64,
}

impl ClauseDb {
    /// Creates an empty arena with the given activity decay factor.
    #[must_use]
    pub const fn new(clause_decay: f64) -> Self {
        Self {
            arena: Vec::new(),
            originals: Vec::new(),
            learnts: Vec::new(),
            arena_literals: 0,
            wasted_literals: 0,
            original_literals: 0,
            learnt_literals: 0,
            cla_inc: 1.0,
            cla_decay: clause_decay,
        }
    }

    /// Stores a new clause and registers it as original or learnt.
    pub fn alloc(&mut self, literals: &[Literal], learnt: bool) -> ClauseRef {
        debug_assert!(literals.len() > 1, "units are kept on the trail, not in the arena");
        let cref = ClauseRef(u32::try_from(self.arena.len()).unwrap_or(u32::MAX));
        self.arena.push(Clause::new(literals, learnt));
        self.arena_literals += literals.len();
        if learnt {
            self.learnts.push(cref);
            self.learnt_literals += literals.len();
        } else {
            self.originals.push(cref);
            self.original_literals += literals.len();
        }
        cref
    }

    /// Marks a clause dead. It stays in the arena, and in the original/learnt
    /// lists until [`ClauseDb::purge_lists`], and must be detached from the
    /// watch lists (strictly or lazily) by the caller.
    pub fn free(&mut self, cref: ClauseRef) {
        let clause = &mut self.arena[cref.index()];
        debug_assert!(!clause.is_deleted(), "clause freed twice");
        clause.delete();
        let len = clause.len();
        self.wasted_literals += len;
        if clause.is_learnt() {
            self.learnt_literals -= len;
        } else {
            self.original_literals -= len;
        }
    }

    /// Drops dead clauses from the original and learnt lists.
    pub fn purge_lists(&mut self) {
        let arena = &self.arena;
        self.originals.retain(|&c| !arena[c.index()].is_deleted());
        self.learnts.retain(|&c| !arena[c.index()].is_deleted());
    }

    /// Removes literals false under `assignment` from position 2 onwards.
    /// The two watched literals are left in place. Returns the number removed.
    pub fn trim_false(&mut self, cref: ClauseRef, assignment: &Assignment) -> usize {
        let clause = &mut self.arena[cref.index()];
        let before = clause.len();
        let mut k = 2;
        while k < clause.len() {
            if assignment.literal_value(clause[k]).is_false() {
                clause.swap_remove(k);
            } else {
                k += 1;
            }
        }
        let removed = before - clause.len();
        self.wasted_literals += removed;
        if clause.is_learnt() {
            self.learnt_literals -= removed;
        } else {
            self.original_literals -= removed;
        }
        removed
    }

    /// Original clauses, dead ones included until the next purge.
    #[must_use]
    pub fn originals(&self) -> &[ClauseRef] {
        &self.originals
    }

    /// Learnt clauses, dead ones included until the next purge.
    #[must_use]
    pub fn learnts(&self) -> &[ClauseRef] {
        &self.learnts
    }

    /// Length of the original list.
    #[must_use]
    pub fn num_originals(&self) -> usize {
        self.originals.len()
    }

    /// Length of the learnt list.
    #[must_use]
    pub fn num_learnts(&self) -> usize {
        self.learnts.len()
    }

    /// Literals held by live original clauses.
    #[must_use]
    pub const fn original_literals(&self) -> usize {
        self.original_literals
    }

    /// Literals held by live learnt clauses.
    #[must_use]
    pub const fn learnt_literals(&self) -> usize {
        self.learnt_literals
    }

    /// Literals held by dead clauses or trimmed away.
    #[must_use]
    pub const fn wasted(&self) -> usize {
        self.wasted_literals
    }

    /// Literals stored in the arena, dead ones included.
    #[cfg(test)]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.arena_literals
    }

    /// `true` once the wasted share of the arena exceeds `garbage_frac`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn needs_collection(&self, garbage_frac: f64) -> bool {
        self.wasted_literals as f64 > self.arena_literals as f64 * garbage_frac
    }

    /// The current clause activity increment.
    #[must_use]
    pub const fn clause_increment(&self) -> f64 {
        self.cla_inc
    }

    /// Bumps a learnt clause, rescaling every learnt activity on overflow.
    pub fn bump_activity(&mut self, cref: ClauseRef) {
        let inc = self.cla_inc;
        self.arena[cref.index()].bump_activity(inc);

        if self.arena[cref.index()].activity() > ACTIVITY_RESCALE_LIMIT {
            let factor = ACTIVITY_RESCALE_LIMIT.recip();
            for &c in &self.learnts {
                self.arena[c.index()].rescale_activity(factor);
            }
            self.cla_inc *= factor;
        }
    }

    /// Decays all clause activities by growing the bump increment.
    pub fn decay_activity(&mut self) {
        self.cla_inc *= self.cla_decay.recip();
    }

    /// Compacts the arena. Watchers of dead clauses are purged first; the
    /// surviving watchers and every clause reason on the trail are remapped.
    /// Returns the number of clauses reclaimed.
    pub fn collect_garbage(&mut self, watches: &mut WatchLists, trail: &mut Trail) -> usize {
        watches.clean_all(self);

        let live = self.arena.iter().filter(|c| !c.is_deleted()).count();
        let mut old_to_new: FxHashMap<ClauseRef, ClauseRef> = FxHashMap::default();
        old_to_new.reserve(live);

        let old_arena = std::mem::replace(&mut self.arena, Vec::with_capacity(live));
        let reclaimed = old_arena.len() - live;
        for (old_idx, clause) in old_arena.into_iter().enumerate() {
            if clause.is_deleted() {
                continue;
            }
            let old = ClauseRef(u32::try_from(old_idx).unwrap_or(u32::MAX));
            let new = ClauseRef(u32::try_from(self.arena.len()).unwrap_or(u32::MAX));
            old_to_new.insert(old, new);
            self.arena.push(clause);
        }

        let remap = |list: &mut Vec<ClauseRef>| {
            list.retain_mut(|c| match old_to_new.get(c) {
                Some(&new) => {
                    *c = new;
                    true
                }
                None => false,
            });
        };
        remap(&mut self.originals);
        remap(&mut self.learnts);

        watches.relocate(&old_to_new);
        trail.relocate(&old_to_new);

        self.arena_literals -= self.wasted_literals;
        self.wasted_literals = 0;
        reclaimed
    }

    /// Number of clause slots in the arena, dead ones included.
    #[cfg(test)]
    #[must_use]
    pub fn arena_len(&self) -> usize {
        self.arena.len()
    }
}

impl Index<ClauseRef> for ClauseDb {
    type Output = Clause;

    fn index(&self, index: ClauseRef) -> &Self::Output {
        &self.arena[index.index()]
    }
}

impl IndexMut<ClauseRef> for ClauseDb {
    fn index_mut(&mut self, index: ClauseRef) -> &mut Self::Output {
        &mut self.arena[index.index()]
    }
}
