#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Defines restart strategies for the CDCL search.
//!
//! A restart abandons the current search path by backtracking to decision
//! level 0 while keeping everything learnt so far (clauses, activities, saved
//! phases). Restarts let the solver escape regions of the search space where
//! early decisions were poor.
//!
//! Every strategy here counts conflicts. The solver calls
//! [`Restarter::should_restart`] once per conflict; when the current interval
//! is used up the strategy schedules the next interval and reports that a
//! restart is due. The interval sequence starts over at the beginning of
//! every solve call ([`Restarter::reset`]). Counting the restarts actually
//! performed is left to the solver.
//!
//! This module provides:
//! - The `Restarter` trait, the common interface.
//! - Several concrete implementations:
//!   - `Luby`: intervals follow the Luby sequence scaled by a base interval.
//!     With growth factor 2 the sequence is 1, 1, 2, 1, 1, 2, 4, 1, ...
//!   - `Geometric`: each interval is the previous one multiplied by a factor.
//!   - `Fixed`: every interval has the same length.
//!   - `Linear`: each interval is one base interval longer than the previous.
//!   - `Never`: no restarts at all.
//! - `RestarterImpls`, a runtime choice between the strategies above.
//! - `RestartPolicy`, the user-facing selector.

use clap::ValueEnum;
use std::fmt::{Debug, Display};

/// Trait defining the interface for restart strategies.
pub trait Restarter: Debug + Clone {
    /// Conflicts remaining until the next restart.
    fn restarts_in(&self) -> u64;

    /// Counts one conflict against the current interval.
    fn increment_restarts_in(&mut self);

    /// Starts the next interval.
    fn restart(&mut self);

    /// Starts the interval sequence over from its first element.
    /// Called at the start of every solve call.
    fn reset(&mut self);

    /// Records a conflict and reports whether a restart is now due.
    ///
    /// The conflict is counted first; if that exhausts the current interval,
    /// `restart()` schedules the next one and `true` is returned.
    fn should_restart(&mut self) -> bool {
        self.increment_restarts_in();
        if self.restarts_in() == 0 {
            self.restart();
            true
        } else {
            false
        }
    }
}

/// Bookkeeping shared by every counting strategy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Countdown {
    /// Conflicts remaining in the current interval.
    restarts_in: u64,
    /// Position in the interval sequence since the last reset.
    sequence: u64,
}

impl Countdown {
    fn start(&mut self, interval: u64) {
        self.sequence = 0;
        self.restarts_in = interval.max(1);
    }

    fn tick(&mut self) {
        self.restarts_in = self.restarts_in.saturating_sub(1);
    }

    fn advance(&mut self, interval: impl FnOnce(u64) -> u64) {
        self.sequence = self.sequence.wrapping_add(1);
        self.restarts_in = interval(self.sequence).max(1);
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn scale(base: u64, factor: f64) -> u64 {
    let scaled = base as f64 * factor;
    if scaled >= u64::MAX as f64 {
        u64::MAX
    } else {
        scaled as u64
    }
}

/// The `x`-th element (0-based) of the Luby sequence with growth factor `y`.
///
/// The sequence is built from blocks: with `y = 2` it reads
/// 1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8, ...
/// A block of length `2^k - 1` is two copies of the previous block followed
/// by `y^(k-1)`.
#[must_use]
pub fn luby(y: f64, mut x: u64) -> f64 {
    let mut size = 1_u64;
    let mut seq = 0_i32;
    while size < x.saturating_add(1) {
        seq += 1;
        size = size.saturating_mul(2).saturating_add(1);
    }
    while size - 1 != x {
        size = (size - 1) >> 1;
        seq -= 1;
        x %= size;
    }
    y.powi(seq)
}

/// A restart strategy based on the Luby sequence.
///
/// Interval `i` lasts `base * luby(factor, i)` conflicts.
#[derive(Debug, Clone, PartialEq)]
pub struct Luby {
    countdown: Countdown,
    /// Base interval length.
    base: u64,
    /// Growth factor of the sequence.
    factor: f64,
}

impl Luby {
    /// Creates a Luby restarter with the given base interval and growth factor.
    #[must_use]
    pub fn new(base: u64, factor: f64) -> Self {
        let mut restarter = Self {
            countdown: Countdown::default(),
            base,
            factor,
        };
        restarter.reset();
        restarter
    }

    fn interval(&self, index: u64) -> u64 {
        scale(self.base, luby(self.factor, index))
    }
}

impl Restarter for Luby {
    fn restarts_in(&self) -> u64 {
        self.countdown.restarts_in
    }

    fn increment_restarts_in(&mut self) {
        self.countdown.tick();
    }

    fn restart(&mut self) {
        let (base, factor) = (self.base, self.factor);
        self.countdown
            .advance(|i| scale(base, luby(factor, i)));
    }

    fn reset(&mut self) {
        let first = self.interval(0);
        self.countdown.start(first);
    }
}

/// A geometric restart strategy.
///
/// Interval `i` lasts `base * factor^i` conflicts, so with `factor > 1` the
/// gaps between restarts grow exponentially.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometric {
    countdown: Countdown,
    /// Length of the first interval.
    base: u64,
    /// Growth factor per interval.
    factor: f64,
}

impl Geometric {
    /// Creates a geometric restarter.
    #[must_use]
    pub fn new(base: u64, factor: f64) -> Self {
        let mut restarter = Self {
            countdown: Countdown::default(),
            base,
            factor,
        };
        restarter.reset();
        restarter
    }
}

impl Restarter for Geometric {
    fn restarts_in(&self) -> u64 {
        self.countdown.restarts_in
    }

    fn increment_restarts_in(&mut self) {
        self.countdown.tick();
    }

    /// Multiplies the interval by `factor` for the next cycle.
    fn restart(&mut self) {
        let (base, factor) = (self.base, self.factor);
        self.countdown.advance(|i| {
            let exponent = i32::try_from(i).unwrap_or(i32::MAX);
            scale(base, factor.powi(exponent))
        });
    }

    fn reset(&mut self) {
        self.countdown.start(self.base);
    }
}

/// A fixed interval restart strategy: a restart every `interval` conflicts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixed {
    countdown: Countdown,
    /// The interval between restarts.
    interval: u64,
}

impl Fixed {
    /// Creates a fixed-interval restarter.
    #[must_use]
    pub fn new(interval: u64) -> Self {
        let mut restarter = Self {
            countdown: Countdown::default(),
            interval,
        };
        restarter.reset();
        restarter
    }
}

impl Restarter for Fixed {
    fn restarts_in(&self) -> u64 {
        self.countdown.restarts_in
    }

    fn increment_restarts_in(&mut self) {
        self.countdown.tick();
    }

    fn restart(&mut self) {
        let interval = self.interval;
        self.countdown.advance(|_| interval);
    }

    fn reset(&mut self) {
        self.countdown.start(self.interval);
    }
}

/// A linear restart strategy.
///
/// Interval `i` lasts `(i + 1) * step` conflicts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linear {
    countdown: Countdown,
    /// The amount each interval grows by.
    step: u64,
}

impl Linear {
    /// Creates a linear restarter.
    #[must_use]
    pub fn new(step: u64) -> Self {
        let mut restarter = Self {
            countdown: Countdown::default(),
            step,
        };
        restarter.reset();
        restarter
    }
}

impl Restarter for Linear {
    fn restarts_in(&self) -> u64 {
        self.countdown.restarts_in
    }

    fn increment_restarts_in(&mut self) {
        self.countdown.tick();
    }

    fn restart(&mut self) {
        let step = self.step;
        self.countdown
            .advance(|i| step.saturating_mul(i.saturating_add(1)));
    }

    fn reset(&mut self) {
        self.countdown.start(self.step);
    }
}

/// A strategy that never triggers a restart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Never;

impl Restarter for Never {
    /// Always `u64::MAX`; the countdown never runs out.
    fn restarts_in(&self) -> u64 {
        u64::MAX
    }

    fn increment_restarts_in(&mut self) {}

    fn restart(&mut self) {}

    fn reset(&mut self) {}

    fn should_restart(&mut self) -> bool {
        false
    }
}

/// Runtime choice of restart strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum RestarterImpls {
    /// Luby sequence intervals.
    Luby(Luby),
    /// Geometrically growing intervals.
    Geometric(Geometric),
    /// Constant intervals.
    Fixed(Fixed),
    /// Linearly growing intervals.
    Linear(Linear),
    /// No restarts.
    Never(Never),
}

impl Restarter for RestarterImpls {
    fn restarts_in(&self) -> u64 {
        match self {
            Self::Luby(r) => r.restarts_in(),
            Self::Geometric(r) => r.restarts_in(),
            Self::Fixed(r) => r.restarts_in(),
            Self::Linear(r) => r.restarts_in(),
            Self::Never(r) => r.restarts_in(),
        }
    }

    fn increment_restarts_in(&mut self) {
        match self {
            Self::Luby(r) => r.increment_restarts_in(),
            Self::Geometric(r) => r.increment_restarts_in(),
            Self::Fixed(r) => r.increment_restarts_in(),
            Self::Linear(r) => r.increment_restarts_in(),
            Self::Never(r) => r.increment_restarts_in(),
        }
    }

    fn restart(&mut self) {
        match self {
            Self::Luby(r) => r.restart(),
            Self::Geometric(r) => r.restart(),
            Self::Fixed(r) => r.restart(),
            Self::Linear(r) => r.restart(),
            Self::Never(r) => r.restart(),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Luby(r) => r.reset(),
            Self::Geometric(r) => r.reset(),
            Self::Fixed(r) => r.reset(),
            Self::Linear(r) => r.reset(),
            Self::Never(r) => r.reset(),
        }
    }

    fn should_restart(&mut self) -> bool {
        match self {
            Self::Luby(r) => r.should_restart(),
            Self::Geometric(r) => r.should_restart(),
            Self::Fixed(r) => r.should_restart(),
            Self::Linear(r) => r.should_restart(),
            Self::Never(r) => r.should_restart(),
        }
    }
}

/// Enum representing the restart strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum RestartPolicy {
    /// Luby sequence intervals.
    #[default]
    Luby,
    /// Geometrically growing intervals.
    Geometric,
    /// Constant intervals.
    Fixed,
    /// Linearly growing intervals.
    Linear,
    /// No restarts.
    Never,
}

impl Display for RestartPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Luby => write!(f, "Luby"),
            Self::Geometric => write!(f, "Geometric"),
            Self::Fixed => write!(f, "Fixed"),
            Self::Linear => write!(f, "Linear"),
            Self::Never => write!(f, "Never"),
        }
    }
}

impl RestartPolicy {
    /// Builds the strategy with base interval `restart_first` and growth
    /// factor `restart_inc` (used by `Luby` and `Geometric` only).
    #[must_use]
    pub fn to_impl(self, restart_first: u64, restart_inc: f64) -> RestarterImpls {
        match self {
            Self::Luby => RestarterImpls::Luby(Luby::new(restart_first, restart_inc)),
            Self::Geometric => {
                RestarterImpls::Geometric(Geometric::new(restart_first, restart_inc))
            }
            Self::Fixed => RestarterImpls::Fixed(Fixed::new(restart_first)),
            Self::Linear => RestarterImpls::Linear(Linear::new(restart_first)),
            Self::Never => RestarterImpls::Never(Never),
        }
    }
}
