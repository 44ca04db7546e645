//! Core engine: owns every piece of architectural and microarchitectural
//! state and advances it one cycle at a time.
//!
//! [`Core`] is the single owned aggregate the step driver mutates; external
//! observers only ever see a deep-copy [`crate::sim::snapshot::Snapshot`]
//! taken between cycles, never a live reference into this struct.

use crate::common::error::{LoadError, MemoryInitError};
use crate::common::reg::RegisterFile;
use crate::config::Config;
use crate::core::memory::Memory;
use crate::core::pipeline::cdb::Cdb;
use crate::core::pipeline::functional_units::FunctionalUnits;
use crate::core::pipeline::phases::{branch, commit, dispatch, execute, issue, writeback};
use crate::core::pipeline::rat::Rat;
use crate::core::pipeline::reservation::Reservations;
use crate::core::pipeline::rob::Rob;
use crate::core::timing::Timing;
use crate::isa::{parse_program, InstructionId, Program};
use crate::stats::SimStats;

/// Flat, sparse memory.
pub mod memory;

/// Tomasulo pipeline components and per-cycle phase functions.
pub mod pipeline;

/// Per-instruction stage timing.
pub mod timing;

/// Pure per-opcode compute helpers used by the execute phase.
pub mod units;

/// The Tomasulo engine: architectural state plus every microarchitectural
/// structure the pipeline phases operate on.
#[derive(Debug)]
pub struct Core {
    program: Program,
    regs: RegisterFile,
    memory: Memory,
    rob: Rob,
    rat: Rat,
    reservations: Reservations,
    functional_units: FunctionalUnits,
    cdb: Cdb,
    timing: Timing,
    stats: SimStats,
    config: Config,
    pc: usize,
    cycle: u64,
    ret_pending: bool,
    last_issued: Option<InstructionId>,
    last_committed: Option<InstructionId>,
}

impl Core {
    /// Creates an engine with no program loaded. `load_program` must be
    /// called before stepping produces any useful state.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let rob = Rob::new(config.rob.capacity);
        let functional_units = FunctionalUnits::new(&config.functional_units);
        Self {
            program: Program::default(),
            regs: RegisterFile::new(),
            memory: Memory::new(),
            rob,
            rat: Rat::new(),
            reservations: Reservations::new(),
            functional_units,
            cdb: Cdb::new(),
            timing: Timing::new(0),
            stats: SimStats::default(),
            config,
            pc: 0,
            cycle: 0,
            ret_pending: false,
            last_issued: None,
            last_committed: None,
        }
    }

    /// Parses assembly source and resets the engine to its post-load initial
    /// state: ROB empty, RAT all architectural, registers all zero, memory
    /// empty, PC = 0. Leaves all prior state untouched on a parse failure.
    pub fn load_program(&mut self, source: &str) -> Result<(), LoadError> {
        let program = parse_program(source).map_err(LoadError)?;
        self.timing = Timing::new(program.len());
        self.program = program;
        self.reset_state();
        Ok(())
    }

    /// Replaces the given address/value memory entries. Rejects out-of-range
    /// addresses or values without mutating any state.
    pub fn initialize_memory(
        &mut self,
        entries: impl IntoIterator<Item = (i64, i64)>,
    ) -> Result<(), MemoryInitError> {
        let mut validated = Vec::new();
        for (address, value) in entries {
            if address < 0 {
                return Err(MemoryInitError::NegativeAddress { address });
            }
            if address > i64::from(u16::MAX) {
                return Err(MemoryInitError::AddressOutOfRange { address });
            }
            if !(0..=i64::from(u16::MAX)).contains(&value) {
                return Err(MemoryInitError::ValueOutOfRange {
                    address: address as u32,
                    value,
                });
            }
            validated.push((address as u16, value as u16));
        }
        self.memory.initialize(validated);
        Ok(())
    }

    /// Advances the engine by exactly one cycle, running phases 1 through 8
    /// in the fixed order the algorithm requires. A no-op once
    /// [`Core::is_complete`] holds — the cycle counter does not advance past
    /// completion.
    pub fn step_cycle(&mut self) {
        if self.is_complete() {
            return;
        }
        self.cycle += 1;
        if self.config.general.trace {
            tracing::debug!(cycle = self.cycle, pc = self.pc, "cycle start");
        }

        let first = writeback::attempt(
            &mut self.cdb,
            &mut self.rob,
            &mut self.reservations,
            &mut self.functional_units,
            &mut self.timing,
            &mut self.stats,
            self.cycle,
        );
        branch::resolve(
            first,
            &mut self.rob,
            &mut self.reservations,
            &mut self.functional_units,
            &mut self.cdb,
            &mut self.rat,
            &mut self.pc,
            &mut self.ret_pending,
            &mut self.stats,
        );

        execute::tick(&mut self.functional_units, &self.memory, &self.rob, &mut self.cdb);

        if first.is_none() {
            let completion = writeback::attempt(
                &mut self.cdb,
                &mut self.rob,
                &mut self.reservations,
                &mut self.functional_units,
                &mut self.timing,
                &mut self.stats,
                self.cycle,
            );
            branch::resolve(
                completion,
                &mut self.rob,
                &mut self.reservations,
                &mut self.functional_units,
                &mut self.cdb,
                &mut self.rat,
                &mut self.pc,
                &mut self.ret_pending,
                &mut self.stats,
            );
        }

        dispatch::dispatch(
            &self.program,
            &mut self.reservations,
            &mut self.functional_units,
            &mut self.timing,
            self.cycle,
        );

        self.cdb.clear_current();

        commit::commit(
            &mut self.rob,
            &mut self.rat,
            &mut self.regs,
            &mut self.memory,
            &mut self.timing,
            &mut self.stats,
            self.cycle,
            &mut self.last_committed,
        );

        issue::issue(
            &self.program,
            &mut self.pc,
            &mut self.rob,
            &mut self.rat,
            &mut self.reservations,
            &self.regs,
            &mut self.timing,
            &mut self.stats,
            self.cycle,
            &mut self.ret_pending,
            &mut self.last_issued,
        );

        self.stats.cycles = self.cycle;
    }

    /// Clears all core state back to the post-load initial state. The
    /// loaded program and its timing slots are retained.
    pub fn reset(&mut self) {
        self.reset_state();
    }

    fn reset_state(&mut self) {
        self.regs.reset();
        self.memory.reset();
        self.rob = Rob::new(self.config.rob.capacity);
        self.rat = Rat::new();
        self.reservations = Reservations::new();
        self.functional_units = FunctionalUnits::new(&self.config.functional_units);
        self.cdb = Cdb::new();
        self.timing = Timing::new(self.program.len());
        self.stats = SimStats::default();
        self.pc = 0;
        self.cycle = 0;
        self.ret_pending = false;
        self.last_issued = None;
        self.last_committed = None;
    }

    /// True iff the ROB is empty, no reservation station or functional unit
    /// is busy, and the PC has walked past the last instruction with no
    /// in-flight work remaining.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let rs_idle = self.reservations.stations().iter().all(|s| !s.busy);
        let fu_idle = self.functional_units.slots().iter().all(|u| !u.busy);
        self.rob.is_empty() && rs_idle && fu_idle && self.pc >= self.program.len()
    }

    /// Read-only accessors consumed by [`crate::sim::snapshot::Snapshot::capture`].
    pub(crate) fn program(&self) -> &Program {
        &self.program
    }
    pub(crate) fn regs(&self) -> &RegisterFile {
        &self.regs
    }
    pub(crate) fn memory(&self) -> &Memory {
        &self.memory
    }
    pub(crate) fn rob(&self) -> &Rob {
        &self.rob
    }
    pub(crate) fn rat(&self) -> &Rat {
        &self.rat
    }
    pub(crate) fn reservations(&self) -> &Reservations {
        &self.reservations
    }
    pub(crate) fn functional_units(&self) -> &FunctionalUnits {
        &self.functional_units
    }
    pub(crate) fn cdb(&self) -> &Cdb {
        &self.cdb
    }
    pub(crate) fn timing(&self) -> &Timing {
        &self.timing
    }
    pub(crate) fn cycle(&self) -> u64 {
        self.cycle
    }
    pub(crate) fn last_issued(&self) -> Option<InstructionId> {
        self.last_issued
    }
    pub(crate) fn last_committed(&self) -> Option<InstructionId> {
        self.last_committed
    }

    /// Statistics accumulated so far, for the CLI's end-of-run report.
    #[must_use]
    pub fn stats(&self) -> &SimStats {
        &self.stats
    }
}
