//! Branch/CALL/RET resolution and misprediction flush (Phase 3).

use crate::core::pipeline::cdb::Cdb;
use crate::core::pipeline::functional_units::FunctionalUnits;
use crate::core::pipeline::rat::Rat;
use crate::core::pipeline::reservation::Reservations;
use crate::core::pipeline::rob::Rob;
use crate::core::pipeline::types::{Completion, CompletionValue};
use crate::isa::Opcode;
use crate::stats::SimStats;

/// Resolves a just-broadcast BEQ/CALL/RET completion, flushing speculative
/// state on a BEQ misprediction or redirecting the PC after a RET.
#[allow(clippy::too_many_arguments)]
pub fn resolve(
    completion: Option<Completion>,
    rob: &mut Rob,
    reservations: &mut Reservations,
    functional_units: &mut FunctionalUnits,
    cdb: &mut Cdb,
    rat: &mut Rat,
    pc: &mut usize,
    ret_pending: &mut bool,
    stats: &mut SimStats,
) {
    let Some(completion) = completion else {
        return;
    };
    let CompletionValue::Branch(outcome) = completion.value else {
        return;
    };
    let Some(opcode) = rob.get(completion.rob).map(|e| e.opcode) else {
        return;
    };

    match opcode {
        Opcode::Beq => {
            if outcome.taken {
                stats.branch_mispredicted += 1;
                flush(completion.rob, outcome.target, rob, reservations, functional_units, cdb, rat, pc);
            } else {
                stats.branch_correct += 1;
            }
        }
        Opcode::Call => {
            // CALL's predicted next-PC is its own target: it never mispredicts.
        }
        Opcode::Ret => {
            flush(completion.rob, outcome.target, rob, reservations, functional_units, cdb, rat, pc);
            *ret_pending = false;
        }
        Opcode::Add | Opcode::Sub | Opcode::Nand | Opcode::Mul | Opcode::Load | Opcode::Store => {}
    }
}

/// Discards every ROB entry younger than `keep`, releases the reservation
/// stations and functional units working on them, prunes the CDB pending
/// queue, rebuilds the RAT from survivors, and redirects the PC.
#[allow(clippy::too_many_arguments)]
fn flush(
    keep: usize,
    redirect_target: usize,
    rob: &mut Rob,
    reservations: &mut Reservations,
    functional_units: &mut FunctionalUnits,
    cdb: &mut Cdb,
    rat: &mut Rat,
    pc: &mut usize,
) {
    let discarded = rob.flush_after(keep);
    reservations.release_matching_rob(&discarded);
    functional_units.release_matching_rob(&discarded);
    cdb.prune_discarded(&discarded);
    rat.rebuild_from_rob(rob);
    *pc = redirect_target;
}
