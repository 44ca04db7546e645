//! Functional unit pools.
//!
//! One flat array of unit slots, partitioned by class at construction time
//! from [`FunctionalUnitConfig`]. A slot stays busy from dispatch through
//! the cycle its result is actually broadcast on the CDB, not merely
//! through the end of its countdown — a computed-but-unbroadcast result
//! still occupies the unit that produced it.

use crate::config::FunctionalUnitConfig;
use crate::core::pipeline::types::CapturedOperands;
use crate::isa::opcode::RsClass;
use crate::isa::Opcode;
use serde::Serialize;

/// One functional unit slot.
#[derive(Clone, Debug, Serialize)]
pub struct FuSlot {
    /// Class this slot serves.
    pub class: RsClass,
    /// Countdown latency for this class.
    latency: u32,
    /// Whether this slot is occupied.
    pub busy: bool,
    /// Cycles remaining until the result is ready.
    pub remaining: u32,
    /// Set once `remaining` hits zero; cleared on release.
    pub done: bool,
    /// Reservation station slot that dispatched into this unit.
    pub rs_slot: usize,
    /// ROB index this result is destined for.
    pub dest_rob: usize,
    /// Opcode being executed.
    pub opcode: Option<Opcode>,
    /// Operands captured at dispatch time.
    pub operands: Option<CapturedOperands>,
}

impl FuSlot {
    fn empty(class: RsClass, latency: u32) -> Self {
        Self {
            class,
            latency,
            busy: false,
            remaining: 0,
            done: false,
            rs_slot: 0,
            dest_rob: 0,
            opcode: None,
            operands: None,
        }
    }
}

/// The flat bank of functional units across all seven classes.
#[derive(Debug)]
pub struct FunctionalUnits {
    slots: Vec<FuSlot>,
}

impl FunctionalUnits {
    /// Builds the unit bank sized and timed per `config`.
    #[must_use]
    pub fn new(config: &FunctionalUnitConfig) -> Self {
        let mut slots = Vec::new();
        for class in RsClass::ALL {
            let unit_config = match class {
                RsClass::AddSub => config.add_sub,
                RsClass::Nand => config.nand,
                RsClass::Mul => config.mul,
                RsClass::Load => config.load,
                RsClass::Store => config.store,
                RsClass::Beq => config.beq,
                RsClass::CallRet => config.call_ret,
            };
            for _ in 0..unit_config.units {
                slots.push(FuSlot::empty(class, unit_config.latency));
            }
        }
        Self { slots }
    }

    /// Returns the unit slots, for snapshotting.
    #[must_use]
    pub fn slots(&self) -> &[FuSlot] {
        &self.slots
    }

    /// Finds a free slot of the given class.
    #[must_use]
    pub fn find_free(&self, class: RsClass) -> Option<usize> {
        self.slots
            .iter()
            .position(|u| u.class == class && !u.busy)
    }

    /// Dispatches a ready reservation station's instruction into a unit.
    pub fn dispatch(
        &mut self,
        slot: usize,
        rs_slot: usize,
        dest_rob: usize,
        opcode: Opcode,
        operands: CapturedOperands,
    ) {
        let unit = &mut self.slots[slot];
        unit.busy = true;
        unit.done = false;
        unit.remaining = unit.latency;
        unit.rs_slot = rs_slot;
        unit.dest_rob = dest_rob;
        unit.opcode = Some(opcode);
        unit.operands = Some(operands);
    }

    /// Advances every busy, not-yet-done unit by one cycle. Returns the
    /// slots whose countdown just reached zero this tick.
    pub fn tick(&mut self) -> Vec<usize> {
        let mut finished = Vec::new();
        for (idx, unit) in self.slots.iter_mut().enumerate() {
            if unit.busy && !unit.done {
                unit.remaining = unit.remaining.saturating_sub(1);
                if unit.remaining == 0 {
                    unit.done = true;
                    finished.push(idx);
                }
            }
        }
        finished
    }

    /// Returns a slot's detail, for computing its result or tracing.
    #[must_use]
    pub fn get(&self, slot: usize) -> &FuSlot {
        &self.slots[slot]
    }

    /// Frees a unit once its result has been broadcast.
    pub fn release(&mut self, slot: usize) {
        let class = self.slots[slot].class;
        let latency = self.slots[slot].latency;
        self.slots[slot] = FuSlot::empty(class, latency);
    }

    /// Frees every unit working on a discarded ROB entry (misprediction flush).
    pub fn release_matching_rob(&mut self, discarded: &[usize]) {
        for idx in 0..self.slots.len() {
            if self.slots[idx].busy && discarded.contains(&self.slots[idx].dest_rob) {
                self.release(idx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operands() -> CapturedOperands {
        CapturedOperands {
            vj: 1,
            vk: 2,
            imm: None,
            target: None,
            pc: 0,
            dest_rob: 0,
        }
    }

    #[test]
    fn dispatch_and_countdown() {
        let config = FunctionalUnitConfig::default();
        let mut units = FunctionalUnits::new(&config);
        let slot = units.find_free(RsClass::AddSub).unwrap();
        units.dispatch(slot, 0, 7, Opcode::Add, operands());
        assert_eq!(units.get(slot).remaining, 2);

        let finished = units.tick();
        assert!(finished.is_empty());
        assert_eq!(units.get(slot).remaining, 1);

        let finished = units.tick();
        assert_eq!(finished, vec![slot]);
        assert!(units.get(slot).done);
    }

    #[test]
    fn single_cycle_unit_completes_on_first_tick() {
        let config = FunctionalUnitConfig::default();
        let mut units = FunctionalUnits::new(&config);
        let slot = units.find_free(RsClass::Nand).unwrap();
        units.dispatch(slot, 0, 0, Opcode::Nand, operands());
        assert_eq!(units.tick(), vec![slot]);
    }

    #[test]
    fn busy_slot_blocks_dispatch_until_released() {
        let config = FunctionalUnitConfig::default();
        let mut units = FunctionalUnits::new(&config);
        let slot = units.find_free(RsClass::Mul).unwrap();
        units.dispatch(slot, 0, 0, Opcode::Mul, operands());
        assert_eq!(units.find_free(RsClass::Mul), None);

        units.release(slot);
        assert_eq!(units.find_free(RsClass::Mul), Some(slot));
    }

    #[test]
    fn release_matching_rob_only_clears_discarded() {
        let config = FunctionalUnitConfig::default();
        let mut units = FunctionalUnits::new(&config);
        let a = units.find_free(RsClass::AddSub).unwrap();
        units.dispatch(a, 0, 3, Opcode::Add, operands());
        let b = units.find_free(RsClass::AddSub).unwrap();
        units.dispatch(b, 1, 9, Opcode::Add, operands());

        units.release_matching_rob(&[3]);
        assert!(!units.get(a).busy);
        assert!(units.get(b).busy);
    }
}
