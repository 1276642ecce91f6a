#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Indexed binary max-heap of variables keyed by an external activity table.
//!
//! The heap stores variables only; scores are looked up in the slice passed to
//! each operation, so the owner can bump an activity and then call
//! [`VarHeap::update`] to restore the heap order. Ties are broken in favour of
//! the lower variable index.

use crate::sat::literal::Variable;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;

/// Max-heap of variables keyed by an external activity table.
#[derive(Debug, Clone, Default)]
pub struct VarHeap {
    heap: Vec<Variable>,
    indices: Vec<Option<usize>>,
}

fn key(activity: &[f64], var: Variable) -> (OrderedFloat<f64>, Reverse<Variable>) {
    (OrderedFloat(activity[var as usize]), Reverse(var))
}

impl VarHeap {
    /// Makes room for one more variable, initially absent.
    pub fn grow(&mut self) {
        self.indices.push(None);
    }

    /// Number of variables in the heap.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// `true` if the heap holds no variable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// `true` if `var` is in the heap.
    #[must_use]
    pub fn contains(&self, var: Variable) -> bool {
        self.indices
            .get(var as usize)
            .is_some_and(Option::is_some)
    }

    /// The variable at heap position `i`. Position 0 is the maximum.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<Variable> {
        self.heap.get(i).copied()
    }

    /// Inserts `var` unless it is already present.
    pub fn insert(&mut self, var: Variable, activity: &[f64]) {
        if self.contains(var) {
            return;
        }
        let pos = self.heap.len();
        self.heap.push(var);
        self.indices[var as usize] = Some(pos);
        self.sift_up(pos, activity);
    }

    /// Restores the heap order after the activity of `var` increased.
    pub fn update(&mut self, var: Variable, activity: &[f64]) {
        if let Some(pos) = self.indices[var as usize] {
            self.sift_up(pos, activity);
        }
    }

    /// Removes and returns the variable with the highest activity.
    pub fn pop(&mut self, activity: &[f64]) -> Option<Variable> {
        let top = *self.heap.first()?;
        let last = self.heap.pop()?;
        self.indices[top as usize] = None;
        if !self.heap.is_empty() {
            self.heap[0] = last;
            self.indices[last as usize] = Some(0);
            self.sift_down(0, activity);
        }
        Some(top)
    }

    /// Replaces the content with exactly `vars`.
    pub fn rebuild(&mut self, vars: impl IntoIterator<Item = Variable>, activity: &[f64]) {
        for &var in &self.heap {
            self.indices[var as usize] = None;
        }
        self.heap.clear();
        for var in vars {
            if !self.contains(var) {
                self.indices[var as usize] = Some(self.heap.len());
                self.heap.push(var);
            }
        }
        for pos in (0..self.heap.len() / 2).rev() {
            self.sift_down(pos, activity);
        }
    }

    fn sift_up(&mut self, mut pos: usize, activity: &[f64]) {
        let var = self.heap[pos];
        let var_key = key(activity, var);
        while pos > 0 {
            let parent = (pos - 1) / 2;
            let parent_var = self.heap[parent];
            if key(activity, parent_var) >= var_key {
                break;
            }
            self.heap[pos] = parent_var;
            self.indices[parent_var as usize] = Some(pos);
            pos = parent;
        }
        self.heap[pos] = var;
        self.indices[var as usize] = Some(pos);
    }

    fn sift_down(&mut self, mut pos: usize, activity: &[f64]) {
        let var = self.heap[pos];
        let var_key = key(activity, var);
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len
                && key(activity, self.heap[right]) > key(activity, self.heap[left])
            {
                right
            } else {
                left
            };
            let child_var = self.heap[child];
            if key(activity, child_var) <= var_key {
                break;
            }
            self.heap[pos] = child_var;
            self.indices[child_var as usize] = Some(pos);
            pos = child;
        }
        self.heap[pos] = var;
        self.indices[var as usize] = Some(pos);
    }
}
