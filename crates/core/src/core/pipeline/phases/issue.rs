//! Issue stage (Phase 8).
//!
//! Issues at most one instruction per cycle: the next program-order
//! instruction, if a ROB slot and a matching reservation station are both
//! free and issue isn't stalled behind an unresolved RET.

use crate::common::RegisterFile;
use crate::core::pipeline::rat::Rat;
use crate::core::pipeline::reservation::Reservations;
use crate::core::pipeline::rob::Rob;
use crate::core::timing::Timing;
use crate::isa::{InstructionId, Opcode, Program};
use crate::stats::SimStats;

/// Attempts to issue the next instruction. No-op if the ROB is full, no
/// matching reservation station is free, or issue is stalled behind RET.
#[allow(clippy::too_many_arguments)]
pub fn issue(
    program: &Program,
    pc: &mut usize,
    rob: &mut Rob,
    rat: &mut Rat,
    reservations: &mut Reservations,
    regs: &RegisterFile,
    timing: &mut Timing,
    stats: &mut SimStats,
    cycle: u64,
    ret_pending: &mut bool,
    last_issued: &mut Option<InstructionId>,
) {
    if *ret_pending {
        stats.stalls_ret += 1;
        return;
    }
    let Some(instr) = program.get(*pc) else {
        return;
    };
    let class = instr.opcode.rs_class();
    let Some(rs_slot) = reservations.find_free(class) else {
        stats.stalls_resource += 1;
        return;
    };
    if rob.is_full() {
        stats.stalls_resource += 1;
        return;
    }

    let speculative = any_unresolved_branch(rob);
    let dest = instr.dest_register();
    let predicted_next_pc = match instr.opcode {
        Opcode::Call => instr.target.unwrap_or(*pc + 1),
        _ => *pc + 1,
    };

    let Some(rob_index) = rob.allocate(instr.id, *pc, instr.opcode, dest, predicted_next_pc, speculative)
    else {
        unreachable!("ROB has a free slot: just checked is_full above");
    };

    let (src1, src2) = instr.source_registers();
    let (vj, qj) = resolve_operand(src1, rat, rob, regs);
    let (vk, qk) = resolve_operand(src2, rat, rob, regs);
    let target = matches!(instr.opcode, Opcode::Call).then_some(predicted_next_pc);

    reservations.issue(
        rs_slot,
        instr.opcode,
        vj,
        qj,
        vk,
        qk,
        instr.imm,
        target,
        rob_index,
        *pc,
        cycle,
    );

    if let Some(dest_reg) = dest {
        rat.set_producer(dest_reg, rob_index);
    }

    timing.record_issue(instr.id, cycle);
    *last_issued = Some(instr.id);

    if instr.opcode == Opcode::Ret {
        *ret_pending = true;
    }

    *pc = predicted_next_pc;
}

/// True if the ROB currently holds any branch-like instruction (BEQ/CALL/RET)
/// — by construction such an entry is still in flight, so its outcome is
/// not yet committed.
fn any_unresolved_branch(rob: &Rob) -> bool {
    let mut found = false;
    rob.for_each_valid(|entry| {
        if entry.opcode.is_branch_like() {
            found = true;
        }
    });
    found
}

/// Resolves one source register through the RAT: architectural value,
/// forwarded ROB result, or a pending ROB index to wait on.
fn resolve_operand(
    reg: Option<usize>,
    rat: &Rat,
    rob: &Rob,
    regs: &RegisterFile,
) -> (Option<u16>, Option<usize>) {
    let Some(reg) = reg else {
        return (None, None);
    };
    match rat.get_producer(reg) {
        None => (Some(regs.read(reg)), None),
        Some(producer) => match rob.get(producer) {
            Some(entry) if entry.ready => (Some(entry.value), None),
            Some(_) => (None, Some(producer)),
            None => (Some(regs.read(reg)), None),
        },
    }
}
