//! Cycle-accurate Tomasulo out-of-order execution simulator.
//!
//! This crate implements a small fixed 8-register, 16-bit ISA (`ADD SUB
//! NAND MUL LOAD STORE BEQ CALL RET`) driven through register renaming,
//! reservation stations, a Common Data Bus, and an in-order-commit reorder
//! buffer:
//! 1. **Core:** the Tomasulo engine — ROB, RAT, reservation stations,
//!    functional units, and CDB, advanced one cycle at a time by the
//!    [`core::pipeline::phases`] functions.
//! 2. **ISA:** opcode table, instruction/program representation, and the
//!    assembly parser for the target machine's text format.
//! 3. **Simulation:** [`Simulator`], the deep-copy [`Snapshot`] accessor,
//!    and run configuration.

/// Common types shared across the engine (errors, the architectural
/// register file).
pub mod common;
/// Engine configuration (ROB capacity, per-class functional unit latency
/// and count, general options).
pub mod config;
/// The Tomasulo engine: pipeline components and per-cycle phases.
pub mod core;
/// Instruction set: opcode table, instruction/program model, assembler.
pub mod isa;
/// Simulation facade and state snapshotting.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` for the spec's fixed
/// machine or deserialize overrides from JSON.
pub use crate::config::Config;
/// The Tomasulo engine. Most callers want [`Simulator`] instead, which
/// wraps it with deep-copy snapshotting.
pub use crate::core::Core;
/// Top-level simulator facade; owns the engine and returns deep-copy state.
pub use crate::sim::Simulator;
/// Deep-copy, read-only view of engine state between cycles.
pub use crate::sim::Snapshot;
