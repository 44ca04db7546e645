//! Dispatch of ready reservation stations onto free functional units (Phase 5).

use crate::core::pipeline::functional_units::FunctionalUnits;
use crate::core::pipeline::reservation::Reservations;
use crate::core::timing::Timing;
use crate::isa::Program;

/// Claims a free functional unit for every ready reservation station, in
/// program order. A station with no free unit of its class this cycle is
/// left ready and retried next cycle.
pub fn dispatch(
    program: &Program,
    reservations: &mut Reservations,
    functional_units: &mut FunctionalUnits,
    timing: &mut Timing,
    cycle: u64,
) {
    for rs_slot in reservations.ready_in_program_order() {
        let station = &reservations.stations()[rs_slot];
        let class = station.class;
        let Some(opcode) = station.opcode else {
            unreachable!("a ready station was issued with an opcode");
        };
        let station_pc = station.pc;

        let Some(fu_slot) = functional_units.find_free(class) else {
            continue;
        };

        let operands = reservations.operands(rs_slot);
        functional_units.dispatch(fu_slot, rs_slot, operands.dest_rob, opcode, operands);
        reservations.mark_executing(rs_slot);

        if let Some(instr) = program.get(station_pc) {
            timing.record_start_exec(instr.id, cycle);
        }
    }
}
