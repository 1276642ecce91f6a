#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Per-literal watch lists.
//!
//! The list stored under literal `p` holds the clauses that watch `¬p`, i.e.
//! the clauses that must be visited when `p` becomes true. Each entry carries
//! a blocker literal from the clause; if the blocker is already true the
//! clause is satisfied and need not be touched.
//!
//! Removal of a clause can be strict (the watcher is searched for and erased
//! immediately) or lazy (the list is only marked dirty and purged of deleted
//! clauses the next time it is cleaned).

use crate::sat::clause_db::{ClauseDb, ClauseRef};
use crate::sat::literal::Literal;
use bit_vec::BitVec;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::ops::{Index, IndexMut};

/// A clause watching a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Watcher {
    /// The watching clause.
    pub cref: ClauseRef,
    /// Another literal of the clause; if true, the clause need not be visited.
    pub blocker: Literal,
}

/// The watchers of one literal.
pub type WatchList = SmallVec<[Watcher; 6]>;

/// One watch list per literal, with lazily cleaned dirty lists.
#[derive(Debug, Clone, Default)]
pub struct WatchLists {
    lists: Vec<WatchList>,
    dirty: BitVec,
    dirties: Vec<Literal>,
}

impl WatchLists {
    /// Adds the two lists of a freshly allocated variable.
    pub fn grow(&mut self) {
        self.lists.push(SmallVec::new());
        self.lists.push(SmallVec::new());
        self.dirty.push(false);
        self.dirty.push(false);
    }

    /// Appends `watcher` to the list of `lit`.
    pub fn push(&mut self, lit: Literal, watcher: Watcher) {
        self.lists[lit.index()].push(watcher);
    }

    /// Moves the list of `lit` out so it can be walked while the rest of the
    /// lists are updated. Must be paired with [`WatchLists::restore`].
    pub fn take(&mut self, lit: Literal) -> WatchList {
        std::mem::take(&mut self.lists[lit.index()])
    }

    /// Puts back a list taken with [`WatchLists::take`].
    pub fn restore(&mut self, lit: Literal, list: WatchList) {
        debug_assert!(self.lists[lit.index()].is_empty());
        self.lists[lit.index()] = list;
    }

    /// Marks the list of `lit` as possibly holding watchers of deleted clauses.
    pub fn smudge(&mut self, lit: Literal) {
        if !self.is_dirty(lit) {
            self.dirty.set(lit.index(), true);
            self.dirties.push(lit);
        }
    }

    /// `true` if the list of `lit` may hold watchers of freed clauses.
    #[must_use]
    pub fn is_dirty(&self, lit: Literal) -> bool {
        self.dirty.get(lit.index()).unwrap_or(false)
    }

    /// Drops watchers of deleted clauses from the list of `lit`.
    pub fn clean(&mut self, lit: Literal, db: &ClauseDb) {
        self.lists[lit.index()].retain(|w| !db[w.cref].is_deleted());
        self.dirty.set(lit.index(), false);
    }

    /// Cleans every list marked dirty since the last call.
    pub fn clean_all(&mut self, db: &ClauseDb) {
        let dirties = std::mem::take(&mut self.dirties);
        for lit in dirties {
            if self.is_dirty(lit) {
                self.clean(lit, db);
            }
        }
    }

    /// Erases the watcher of `cref` from the list of `lit` right away.
    pub fn remove(&mut self, lit: Literal, cref: ClauseRef) {
        let list = &mut self.lists[lit.index()];
        if let Some(pos) = list.iter().position(|w| w.cref == cref) {
            list.remove(pos);
        }
    }

    /// Rewrites clause references after arena compaction. Watchers whose
    /// clause did not survive are dropped.
    pub fn relocate(&mut self, old_to_new: &FxHashMap<ClauseRef, ClauseRef>) {
        for list in &mut self.lists {
            list.retain(|w| match old_to_new.get(&w.cref) {
                Some(&new) => {
                    w.cref = new;
                    true
                }
                None => false,
            });
        }
    }
}

impl Index<Literal> for WatchLists {
    type Output = WatchList;

    fn index(&self, index: Literal) -> &Self::Output {
        &self.lists[index.index()]
    }
}

impl IndexMut<Literal> for WatchLists {
    fn index_mut(&mut self, index: Literal) -> &mut Self::Output {
        &mut self.lists[index.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(value: i32) -> Literal {
        Literal::from_i32(value)
    }

    fn lists(vars: usize) -> WatchLists {
        let mut watches = WatchLists::default();
        for _ in 0..vars {
            watches.grow();
        }
        watches
    }

    #[test]
    fn test_grow_adds_two_lists() {
        let watches = lists(3);
        assert!(watches[lit(1)].is_empty());
        assert!(watches[lit(-3)].is_empty());
    }

    #[test]
    fn test_take_and_restore() {
        let mut db = ClauseDb::new(0.999);
        let cref = db.alloc(&[lit(1), lit(2)], false);
        let mut watches = lists(2);
        watches.push(lit(-1), Watcher { cref, blocker: lit(2) });

        let taken = watches.take(lit(-1));
        assert_eq!(taken.len(), 1);
        assert!(watches[lit(-1)].is_empty());
        watches.restore(lit(-1), taken);
        assert_eq!(watches[lit(-1)][0].cref, cref);
    }

    #[test]
    fn test_lazy_clean() {
        let mut db = ClauseDb::new(0.999);
        let a = db.alloc(&[lit(1), lit(2)], false);
        let b = db.alloc(&[lit(1), lit(3)], false);
        let mut watches = lists(3);
        watches.push(lit(-1), Watcher { cref: a, blocker: lit(2) });
        watches.push(lit(-1), Watcher { cref: b, blocker: lit(3) });

        db.free(a);
        watches.smudge(lit(-1));
        watches.smudge(lit(-1));
        assert!(watches.is_dirty(lit(-1)));
        assert_eq!(watches[lit(-1)].len(), 2);

        watches.clean_all(&db);
        assert!(!watches.is_dirty(lit(-1)));
        assert_eq!(watches[lit(-1)].len(), 1);
        assert_eq!(watches[lit(-1)][0].cref, b);
    }

    #[test]
    fn test_strict_remove() {
        let mut db = ClauseDb::new(0.999);
        let a = db.alloc(&[lit(1), lit(2)], false);
        let b = db.alloc(&[lit(1), lit(3)], false);
        let mut watches = lists(3);
        watches.push(lit(-1), Watcher { cref: a, blocker: lit(2) });
        watches.push(lit(-1), Watcher { cref: b, blocker: lit(3) });

        watches.remove(lit(-1), a);
        assert_eq!(watches[lit(-1)].len(), 1);
        assert_eq!(watches[lit(-1)][0].cref, b);
    }
}
