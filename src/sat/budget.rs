//! Optional caps on search effort for bounded solving.
//!
//! Limits are absolute counter values computed when the budget is set, so a
//! budget of `n` conflicts allows `n` more conflicts from that point on,
//! across however many solve calls it takes to use them up.

/// Conflict and propagation caps. `None` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Budget {
    conflicts: Option<u64>,
    propagations: Option<u64>,
}

impl Budget {
    /// Allows `extra` more conflicts beyond `current`.
    pub const fn set_conflicts(&mut self, current: u64, extra: u64) {
        self.conflicts = Some(current.saturating_add(extra));
    }

    /// Allows `extra` more propagations beyond `current`.
    pub const fn set_propagations(&mut self, current: u64, extra: u64) {
        self.propagations = Some(current.saturating_add(extra));
    }

    /// Removes both limits.
    pub const fn off(&mut self) {
        self.conflicts = None;
        self.propagations = None;
    }

    /// `true` while both counters are strictly below their limits.
    #[must_use]
    pub fn within(&self, conflicts: u64, propagations: u64) -> bool {
        self.conflicts.is_none_or(|limit| conflicts < limit)
            && self.propagations.is_none_or(|limit| propagations < limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unlimited() {
        let budget = Budget::default();
        assert_eq!(budget, Budget::default());
        assert!(budget.within(u64::MAX - 1, u64::MAX - 1));
    }

    #[test]
    fn test_limits_are_relative_to_current_counters() {
        let mut budget = Budget::default();
        budget.set_conflicts(10, 5);
        assert!(budget.within(14, 0));
        assert!(!budget.within(15, 0));

        budget.set_propagations(100, 0);
        assert!(!budget.within(0, 100));
    }

    #[test]
    fn test_off_clears_both() {
        let mut budget = Budget::default();
        budget.set_conflicts(0, 0);
        budget.set_propagations(0, 0);
        budget.off();
        assert_eq!(budget, Budget::default());
        assert!(budget.within(u64::MAX - 1, u64::MAX - 1));
    }

    #[test]
    fn test_saturates() {
        let mut budget = Budget::default();
        budget.set_conflicts(u64::MAX, 10);
        assert!(budget.within(u64::MAX - 1, 0));
    }
}
