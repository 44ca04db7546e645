//! Functional unit countdown and completion enqueue (Phase 2).

use crate::core::memory::Memory;
use crate::core::pipeline::cdb::Cdb;
use crate::core::pipeline::functional_units::FunctionalUnits;
use crate::core::pipeline::rob::Rob;
use crate::core::pipeline::types::Completion;
use crate::core::units::compute;

/// Advances every busy functional unit by one cycle. Units whose countdown
/// reaches zero compute their result and enqueue onto the CDB, ordered
/// oldest-ROB-first for same-cycle ties.
pub fn tick(functional_units: &mut FunctionalUnits, memory: &Memory, rob: &Rob, cdb: &mut Cdb) {
    let finished = functional_units.tick();
    if finished.is_empty() {
        return;
    }

    let mut completions: Vec<Completion> = finished
        .into_iter()
        .map(|slot| {
            let unit = functional_units.get(slot);
            let Some(opcode) = unit.opcode else {
                unreachable!("a finished unit was dispatched with an opcode");
            };
            let Some(operands) = unit.operands else {
                unreachable!("a finished unit was dispatched with operands");
            };
            Completion {
                rob: unit.dest_rob,
                value: compute::execute(opcode, &operands, memory),
                class: unit.class,
                rs_slot: unit.rs_slot,
                fu_slot: slot,
            }
        })
        .collect();

    let head = rob.head();
    let capacity = rob.capacity();
    completions.sort_by_key(|c| (c.rob + capacity - head) % capacity);
    cdb.enqueue(completions);
}
