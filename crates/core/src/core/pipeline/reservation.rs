//! Reservation stations.
//!
//! Twelve fixed, named stations grouped by functional-unit class: two LOAD,
//! one STORE, two BEQ, one shared CALL/RET, four ADD/SUB, one NAND, one MUL.
//! Each tracks captured operand values directly (`Vj`/`Vk`) or, if the
//! operand is still in flight, the producing ROB index (`Qj`/`Qk`).

use crate::core::pipeline::types::CapturedOperands;
use crate::isa::opcode::RsClass;
use crate::isa::Opcode;
use serde::Serialize;

/// One reservation station slot.
#[derive(Clone, Debug, Serialize)]
pub struct Station {
    /// Fixed station name, for tracing and snapshots.
    pub name: &'static str,
    /// Functional-unit class this station feeds.
    pub class: RsClass,
    /// Whether this station currently holds an instruction.
    pub busy: bool,
    /// Whether the station has been claimed by a functional unit.
    pub executing: bool,
    /// The issued instruction's opcode.
    pub opcode: Option<Opcode>,
    /// Captured first operand value, once available.
    pub vj: Option<u16>,
    /// Captured second operand value, once available.
    pub vk: Option<u16>,
    /// ROB index producing `vj`, while still pending.
    pub qj: Option<usize>,
    /// ROB index producing `vk`, while still pending.
    pub qk: Option<usize>,
    /// Immediate operand (LOAD/STORE offset or BEQ branch offset).
    pub imm: Option<i16>,
    /// Resolved absolute target program index, for CALL.
    pub target: Option<usize>,
    /// Destination ROB index for this instruction's result.
    pub dest_rob: Option<usize>,
    /// Program index of the instruction, for BEQ/CALL target arithmetic.
    pub pc: usize,
    /// Cycle this station was issued into, for program-order tie-breaks.
    pub issued_cycle: u64,
}

impl Station {
    fn empty(name: &'static str, class: RsClass) -> Self {
        Self {
            name,
            class,
            busy: false,
            executing: false,
            opcode: None,
            vj: None,
            vk: None,
            qj: None,
            qk: None,
            imm: None,
            target: None,
            dest_rob: None,
            pc: 0,
            issued_cycle: 0,
        }
    }

    /// True once both operands have arrived and the station hasn't already
    /// been claimed by a functional unit.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.busy && !self.executing && self.qj.is_none() && self.qk.is_none()
    }

    fn clear(&mut self) {
        let name = self.name;
        let class = self.class;
        *self = Self::empty(name, class);
    }
}

/// The fixed bank of 12 reservation stations.
#[derive(Debug)]
pub struct Reservations {
    stations: Vec<Station>,
}

impl Default for Reservations {
    fn default() -> Self {
        Self::new()
    }
}

impl Reservations {
    /// Creates the 12 fixed stations.
    #[must_use]
    pub fn new() -> Self {
        let stations = vec![
            Station::empty("LOAD1", RsClass::Load),
            Station::empty("LOAD2", RsClass::Load),
            Station::empty("STORE", RsClass::Store),
            Station::empty("BEQ1", RsClass::Beq),
            Station::empty("BEQ2", RsClass::Beq),
            Station::empty("CALL/RET", RsClass::CallRet),
            Station::empty("ADD/SUB1", RsClass::AddSub),
            Station::empty("ADD/SUB2", RsClass::AddSub),
            Station::empty("ADD/SUB3", RsClass::AddSub),
            Station::empty("ADD/SUB4", RsClass::AddSub),
            Station::empty("NAND", RsClass::Nand),
            Station::empty("MUL", RsClass::Mul),
        ];
        Self { stations }
    }

    /// Returns the station slots, for snapshotting.
    #[must_use]
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Finds a free station slot for the given class.
    #[must_use]
    pub fn find_free(&self, class: RsClass) -> Option<usize> {
        self.stations
            .iter()
            .position(|s| s.class == class && !s.busy)
    }

    /// Occupies a free station slot with a newly issued instruction.
    #[allow(clippy::too_many_arguments)]
    pub fn issue(
        &mut self,
        slot: usize,
        opcode: Opcode,
        vj: Option<u16>,
        qj: Option<usize>,
        vk: Option<u16>,
        qk: Option<usize>,
        imm: Option<i16>,
        target: Option<usize>,
        dest_rob: usize,
        pc: usize,
        issued_cycle: u64,
    ) {
        let station = &mut self.stations[slot];
        station.busy = true;
        station.executing = false;
        station.opcode = Some(opcode);
        station.vj = vj;
        station.qj = qj;
        station.vk = vk;
        station.qk = qk;
        station.imm = imm;
        station.target = target;
        station.dest_rob = Some(dest_rob);
        station.pc = pc;
        station.issued_cycle = issued_cycle;
    }

    /// Snoops a CDB broadcast: any station waiting on `rob_index` captures
    /// `value` and clears the corresponding `Qj`/`Qk`.
    pub fn snoop_cdb(&mut self, rob_index: usize, value: u16) {
        for station in &mut self.stations {
            if station.qj == Some(rob_index) {
                station.vj = Some(value);
                station.qj = None;
            }
            if station.qk == Some(rob_index) {
                station.vk = Some(value);
                station.qk = None;
            }
        }
    }

    /// Ready stations (operands resolved, not yet claimed by a functional
    /// unit), ordered oldest-issued-first, then by dest ROB index — the
    /// program-order tie-break for contending dispatch onto a shared
    /// functional unit.
    #[must_use]
    pub fn ready_in_program_order(&self) -> Vec<usize> {
        let mut ready: Vec<usize> = (0..self.stations.len())
            .filter(|&i| self.stations[i].is_ready())
            .collect();
        ready.sort_by_key(|&i| {
            let s = &self.stations[i];
            (s.issued_cycle, s.dest_rob.unwrap_or(usize::MAX))
        });
        ready
    }

    /// Captures a ready station's operands for handoff to a functional unit.
    #[must_use]
    pub fn operands(&self, slot: usize) -> CapturedOperands {
        let s = &self.stations[slot];
        CapturedOperands {
            vj: s.vj.unwrap_or(0),
            vk: s.vk.unwrap_or(0),
            imm: s.imm,
            target: s.target,
            pc: s.pc,
            dest_rob: s.dest_rob.unwrap_or(0),
        }
    }

    /// Marks a station as claimed by a functional unit.
    pub fn mark_executing(&mut self, slot: usize) {
        self.stations[slot].executing = true;
    }

    /// Releases a station back to the free pool.
    pub fn release(&mut self, slot: usize) {
        self.stations[slot].clear();
    }

    /// Releases every station whose destination is in `discarded` (used
    /// after a branch misprediction flush).
    pub fn release_matching_rob(&mut self, discarded: &[usize]) {
        for station in &mut self.stations {
            if let Some(dest) = station.dest_rob {
                if discarded.contains(&dest) {
                    let name = station.name;
                    let class = station.class;
                    *station = Station::empty(name, class);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_free_respects_class() {
        let mut rs = Reservations::new();
        let slot = rs.find_free(RsClass::Load).unwrap();
        rs.issue(slot, Opcode::Load, Some(0), None, None, None, Some(4), None, 0, 0, 0);
        let other = rs.find_free(RsClass::Load).unwrap();
        assert_ne!(slot, other);
        rs.issue(other, Opcode::Load, Some(0), None, None, None, Some(4), None, 1, 1, 0);
        assert_eq!(rs.find_free(RsClass::Load), None);
    }

    #[test]
    fn snoop_resolves_pending_operand() {
        let mut rs = Reservations::new();
        let slot = rs.find_free(RsClass::AddSub).unwrap();
        rs.issue(slot, Opcode::Add, None, Some(3), Some(1), None, None, None, 0, 0, 0);
        assert!(!rs.stations()[slot].is_ready());

        rs.snoop_cdb(3, 42);
        assert!(rs.stations()[slot].is_ready());
        let operands = rs.operands(slot);
        assert_eq!(operands.vj, 42);
        assert_eq!(operands.vk, 1);
    }

    #[test]
    fn ready_in_program_order_breaks_ties_by_dest_rob() {
        let mut rs = Reservations::new();
        let a = rs.find_free(RsClass::AddSub).unwrap();
        rs.issue(a, Opcode::Add, Some(1), None, Some(1), None, None, None, 5, 0, 10);
        let b = rs.find_free(RsClass::AddSub).unwrap();
        rs.issue(b, Opcode::Add, Some(1), None, Some(1), None, None, None, 2, 1, 10);
        let order = rs.ready_in_program_order();
        assert_eq!(order, vec![b, a]);
    }

    #[test]
    fn release_matching_rob_clears_only_discarded() {
        let mut rs = Reservations::new();
        let a = rs.find_free(RsClass::AddSub).unwrap();
        rs.issue(a, Opcode::Add, Some(1), None, Some(1), None, None, None, 5, 0, 0);
        let b = rs.find_free(RsClass::Nand).unwrap();
        rs.issue(b, Opcode::Nand, Some(1), None, Some(1), None, None, None, 9, 1, 0);

        rs.release_matching_rob(&[5]);
        assert!(!rs.stations()[a].busy);
        assert!(rs.stations()[b].busy);
    }
}
