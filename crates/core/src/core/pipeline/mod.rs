//! Tomasulo pipeline implementation.
//!
//! The engine is a fixed set of components — [`rob::Rob`], [`rat::Rat`],
//! [`reservation::Reservations`], [`functional_units::FunctionalUnits`], and
//! [`cdb::Cdb`] — wired together one cycle at a time by the free functions in
//! [`phases`]. There is no backend trait to implement: this engine only ever
//! runs one schedule, so `Core::step_cycle` calls the phase functions
//! directly in the fixed order the algorithm requires.

/// Shared value types passed between phases (no pointers, only indices).
pub mod types;

/// Reorder buffer for in-order commit.
pub mod rob;

/// Register alias table mapping architectural registers to ROB producers.
pub mod rat;

/// Reservation stations.
pub mod reservation;

/// Functional unit pools.
pub mod functional_units;

/// Common Data Bus arbitration.
pub mod cdb;

/// Per-cycle phase implementations.
pub mod phases;
