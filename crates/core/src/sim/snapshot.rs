//! Deep-copy, read-only view of engine state, handed to external observers
//! between cycles.
//!
//! A [`Snapshot`] owns everything it contains — no borrows into the live
//! [`crate::core::Core`] — so a presentation layer, an undo/redo history, or
//! a test can hold one indefinitely without perturbing the running
//! simulation. Undo/redo is trivially "restore an earlier snapshot"; there
//! is no separate history API.

use crate::common::reg::REGISTER_COUNT;
use crate::core::pipeline::functional_units::FuSlot;
use crate::core::pipeline::reservation::Station;
use crate::core::pipeline::rob::RobEntry;
use crate::core::pipeline::types::Completion;
use crate::core::timing::InstrTiming;
use crate::core::Core;
use crate::isa::{Instruction, InstructionId};
use serde::Serialize;

/// Deep-copy snapshot of every piece of state the API surface exposes.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    /// Current cycle counter.
    pub cycle: u64,
    /// The loaded program, in program order.
    pub instructions: Vec<Instruction>,
    /// Per-instruction stage timing, indexed in parallel with `instructions`.
    pub timing: Vec<InstrTiming>,
    /// Reservation station array.
    pub reservations: Vec<Station>,
    /// ROB entries, in head-to-tail (oldest-to-youngest) order.
    pub rob_entries: Vec<RobEntry>,
    /// ROB head index (next to commit).
    pub rob_head: usize,
    /// ROB tail index (next allocation).
    pub rob_tail: usize,
    /// ROB capacity.
    pub rob_capacity: usize,
    /// RAT: producer ROB index per architectural register, `None` if
    /// the value lives in the register file.
    pub rat: Vec<Option<usize>>,
    /// Architectural register values.
    pub registers: Vec<u16>,
    /// Sparse memory map: only addresses with a non-default value.
    pub memory: Vec<(u16, u16)>,
    /// Functional unit slots.
    pub functional_units: Vec<FuSlot>,
    /// Completion currently on the bus this cycle, if any.
    pub cdb_current: Option<Completion>,
    /// Completions still waiting in the CDB's FIFO.
    pub cdb_pending: Vec<Completion>,
    /// Instruction id issued this cycle, if any.
    pub last_issued: Option<InstructionId>,
    /// Instruction id committed this cycle, if any.
    pub last_committed: Option<InstructionId>,
    /// True iff the engine has run the loaded program to completion.
    pub complete: bool,
}

impl Snapshot {
    /// Deep-copies every public piece of state out of `core`.
    #[must_use]
    pub fn capture(core: &Core) -> Self {
        let rob = core.rob();
        let mut rob_entries = Vec::with_capacity(rob.len());
        rob.for_each_valid(|entry| rob_entries.push(entry.clone()));

        let rat = core.rat();
        let registers = core.regs();
        let cdb = core.cdb();

        Self {
            cycle: core.cycle(),
            instructions: core.program().instructions.clone(),
            timing: core.timing().records().to_vec(),
            reservations: core.reservations().stations().to_vec(),
            rob_entries,
            rob_head: rob.head(),
            rob_tail: rob.tail(),
            rob_capacity: rob.capacity(),
            rat: (0..REGISTER_COUNT).map(|r| rat.get_producer(r)).collect(),
            registers: (0..REGISTER_COUNT).map(|r| registers.read(r)).collect(),
            memory: core.memory().iter().collect(),
            functional_units: core.functional_units().slots().to_vec(),
            cdb_current: cdb.current(),
            cdb_pending: cdb.pending().iter().copied().collect(),
            last_issued: core.last_issued(),
            last_committed: core.last_committed(),
            complete: core.is_complete(),
        }
    }
}
