#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Unit propagation over two watched literals.
//!
//! Every clause of length two or more watches its first two literals. When a
//! watched literal becomes false the clause looks for a replacement among its
//! remaining literals; if none exists, the other watched literal is either
//! implied or, if already false, the clause is in conflict.

use crate::sat::assignment::Assignment;
use crate::sat::clause::Clause;
use crate::sat::clause_db::{ClauseDb, ClauseRef};
use crate::sat::trail::{Reason, Trail};
use crate::sat::watch::{WatchLists, Watcher};
use tracing::trace;

/// The watch lists together with the propagation counter.
#[derive(Debug, Clone, Default)]
pub struct WatchedLiterals {
    watches: WatchLists,
    propagations: u64,
}

impl WatchedLiterals {
    /// Adds watch lists for one more variable.
    pub fn grow(&mut self) {
        self.watches.grow();
    }

    /// Literals propagated so far.
    #[must_use]
    pub const fn propagations(&self) -> u64 {
        self.propagations
    }

    /// The watch lists.
    #[must_use]
    pub const fn watches(&self) -> &WatchLists {
        &self.watches
    }

    /// Mutable access to the watch lists, for garbage collection.
    pub const fn watches_mut(&mut self) -> &mut WatchLists {
        &mut self.watches
    }

    /// Starts watching the first two literals of `clause`.
    pub fn attach(&mut self, cref: ClauseRef, clause: &Clause) {
        debug_assert!(clause.len() > 1);
        let (c0, c1) = (clause[0], clause[1]);
        self.watches.push(!c0, Watcher { cref, blocker: c1 });
        self.watches.push(!c1, Watcher { cref, blocker: c0 });
    }

    /// Stops watching `clause`. A lazy detach only marks the two lists dirty;
    /// the clause must then be freed before the lists are next cleaned.
    pub fn detach(&mut self, cref: ClauseRef, clause: &Clause, strict: bool) {
        let (c0, c1) = (clause[0], clause[1]);
        if strict {
            self.watches.remove(!c0, cref);
            self.watches.remove(!c1, cref);
        } else {
            self.watches.smudge(!c0);
            self.watches.smudge(!c1);
        }
    }

    /// Propagates every queued literal on the trail. Returns the conflicting
    /// clause, if any; the queue is then emptied.
    pub fn propagate(
        &mut self,
        trail: &mut Trail,
        assignment: &mut Assignment,
        db: &mut ClauseDb,
    ) -> Option<ClauseRef> {
        let mut conflict = None;

        while let Some(p) = trail.next_to_propagate() {
            self.propagations += 1;
            let false_lit = !p;

            if self.watches.is_dirty(p) {
                self.watches.clean(p, db);
            }
            let mut ws = self.watches.take(p);
            let mut i = 0;
            let mut j = 0;

            while i < ws.len() {
                let w = ws[i];
                if assignment.literal_value(w.blocker).is_true() {
                    ws[j] = w;
                    j += 1;
                    i += 1;
                    continue;
                }

                let cref = w.cref;
                let clause = &mut db[cref];
                if clause[0] == false_lit {
                    clause.swap(0, 1);
                }
                debug_assert_eq!(clause[1], false_lit);
                i += 1;

                let first = clause[0];
                let watcher = Watcher {
                    cref,
                    blocker: first,
                };
                if first != w.blocker && assignment.literal_value(first).is_true() {
                    ws[j] = watcher;
                    j += 1;
                    continue;
                }

                let replacement =
                    (2..clause.len()).find(|&k| !assignment.literal_value(clause[k]).is_false());
                if let Some(k) = replacement {
                    clause.swap(1, k);
                    let new_watch = !clause[1];
                    self.watches.push(new_watch, watcher);
                    continue;
                }

                ws[j] = watcher;
                j += 1;
                if assignment.literal_value(first).is_false() {
                    trace!(clause = cref.index(), "conflict");
                    conflict = Some(cref);
                    trail.skip_queue();
                    while i < ws.len() {
                        ws[j] = ws[i];
                        j += 1;
                        i += 1;
                    }
                } else {
                    trail.assign(first, Reason::Long(cref), assignment);
                }
            }

            ws.truncate(j);
            self.watches.restore(p, ws);
            if conflict.is_some() {
                break;
            }
        }

        conflict
    }
}
