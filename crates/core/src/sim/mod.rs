//! Simulation facade and state snapshotting.
//!
//! File I/O, the command-line driver, and any presentation layer are
//! explicitly out of scope for this crate — [`Simulator`] consumes already-
//! read assembly source text and hands back deep-copy state.

/// Top-level simulator facade.
pub mod simulator;

/// Deep-copy snapshot of public engine state.
pub mod snapshot;

pub use simulator::Simulator;
pub use snapshot::Snapshot;
