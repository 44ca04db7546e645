//! In-order commit from the ROB head (Phase 7).

use crate::common::RegisterFile;
use crate::core::memory::Memory;
use crate::core::pipeline::rat::Rat;
use crate::core::pipeline::rob::Rob;
use crate::core::timing::Timing;
use crate::isa::{InstructionId, Opcode};
use crate::stats::SimStats;

/// Commits the ROB head if it is ready and non-speculative, applying its
/// architectural side effect and updating retirement statistics.
pub fn commit(
    rob: &mut Rob,
    rat: &mut Rat,
    regs: &mut RegisterFile,
    memory: &mut Memory,
    timing: &mut Timing,
    stats: &mut SimStats,
    cycle: u64,
    last_committed: &mut Option<InstructionId>,
) {
    let Some(entry) = rob.commit_head() else {
        return;
    };

    match entry.opcode {
        Opcode::Add | Opcode::Sub | Opcode::Nand | Opcode::Mul | Opcode::Load | Opcode::Call => {
            if let Some(dest) = entry.dest {
                regs.write(dest, entry.value);
                rat.clear_if_match(dest, entry.index);
            }
            stats.inst_arith += u64::from(matches!(
                entry.opcode,
                Opcode::Add | Opcode::Sub | Opcode::Nand | Opcode::Mul
            ));
            stats.inst_load += u64::from(entry.opcode == Opcode::Load);
            stats.inst_branch += u64::from(entry.opcode == Opcode::Call);
        }
        Opcode::Store => {
            if let Some((address, value)) = entry.store {
                memory.write(address, value);
            }
            stats.inst_store += 1;
        }
        Opcode::Beq | Opcode::Ret => {
            stats.inst_branch += 1;
        }
    }

    stats.instructions_retired += 1;
    timing.record_commit(entry.instruction_id, cycle);
    *last_committed = Some(entry.instruction_id);
}
