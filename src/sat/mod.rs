#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
/// Three-valued truth values and the per-variable value store.
pub mod assignment;
/// Conflict and propagation limits for bounded solving.
pub mod budget;
/// The incremental solver instance.
pub mod cdcl;
/// Clause storage.
pub mod clause;
/// The clause arena and its garbage collection.
pub mod clause_db;
/// Learnt clause database reduction strategies.
pub mod clause_management;
/// Solver options.
pub mod configs;
/// First-UIP learning and failed assumption analysis.
pub mod conflict_analysis;
/// Errors reported on misuse.
pub mod error;
/// The variable order heap.
pub mod heap;
/// Variables and literals.
pub mod literal;
/// Branching polarity.
pub mod phase_saving;
/// Two-watched-literal unit propagation.
pub mod propagation;
/// Restart strategies.
pub mod restarter;
/// Solve results, models and statistics.
pub mod solver;
/// The assignment trail.
pub mod trail;
/// VSIDS decision variable selection.
pub mod variable_selection;
/// Watch lists.
pub mod watch;
