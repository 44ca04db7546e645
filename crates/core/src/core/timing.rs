//! Per-instruction stage timing, for reporting and the concrete timing
//! assertions in the end-to-end scenarios this engine is checked against.

use crate::isa::InstructionId;
use serde::Serialize;

/// The cycle each pipeline stage was reached for one instruction.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct InstrTiming {
    /// Cycle the instruction was issued.
    pub issue: Option<u64>,
    /// Cycle its reservation station dispatched into a functional unit.
    pub start_exec: Option<u64>,
    /// Cycle its result was broadcast on the CDB.
    pub write_back: Option<u64>,
    /// Cycle it retired from the ROB.
    pub commit: Option<u64>,
}

/// Timing records for every instruction in a loaded program, indexed by
/// [`InstructionId`].
#[derive(Clone, Debug, Default)]
pub struct Timing {
    records: Vec<InstrTiming>,
}

impl Timing {
    /// Creates a timing tracker sized for a program of `len` instructions.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            records: vec![InstrTiming::default(); len],
        }
    }

    /// Returns every instruction's timing record, in program order.
    #[must_use]
    pub fn records(&self) -> &[InstrTiming] {
        &self.records
    }

    /// Records the issue cycle.
    pub fn record_issue(&mut self, id: InstructionId, cycle: u64) {
        self.records[id.0 as usize].issue = Some(cycle);
    }

    /// Records the cycle a reservation station dispatched into a functional unit.
    pub fn record_start_exec(&mut self, id: InstructionId, cycle: u64) {
        self.records[id.0 as usize].start_exec = Some(cycle);
    }

    /// Records the write-back (CDB broadcast) cycle.
    pub fn record_write_back(&mut self, id: InstructionId, cycle: u64) {
        self.records[id.0 as usize].write_back = Some(cycle);
    }

    /// Records the commit cycle.
    pub fn record_commit(&mut self, id: InstructionId, cycle: u64) {
        self.records[id.0 as usize].commit = Some(cycle);
    }

    /// Looks up an instruction's timing record.
    #[must_use]
    pub fn get(&self, id: InstructionId) -> InstrTiming {
        self.records[id.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_each_stage_independently() {
        let mut timing = Timing::new(2);
        let id = InstructionId(1);
        timing.record_issue(id, 0);
        timing.record_start_exec(id, 3);
        timing.record_write_back(id, 5);
        timing.record_commit(id, 6);

        let record = timing.get(id);
        assert_eq!(record.issue, Some(0));
        assert_eq!(record.start_exec, Some(3));
        assert_eq!(record.write_back, Some(5));
        assert_eq!(record.commit, Some(6));
        assert_eq!(timing.get(InstructionId(0)).issue, None);
    }
}
