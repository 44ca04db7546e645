//! End-to-end scenarios: one assembled program per documented behavior,
//! run through a real [`tomasim_core::Simulator`] rather than poking
//! individual pipeline components.

use crate::common;
use tomasim_core::isa::Opcode;

#[test]
fn straight_line_arithmetic_commits_in_program_order() {
    let mut sim = common::load(
        "LOAD R1,0(R0)\nLOAD R2,1(R0)\nADD R3,R1,R2\n",
        &[(0, 5), (1, 7)],
    );
    let snap = common::run_to_completion(&mut sim);

    assert_eq!(snap.registers[3], 12);
    assert!(snap.complete);

    // Every stage timestamp is recorded, and in the order the pipeline
    // actually visits them: dispatch can never land in the same cycle an
    // instruction issues (dispatch runs before issue within one cycle), and
    // a functional unit's result can't write back before it dispatches.
    for record in &snap.timing {
        let issue = record.issue.expect("every instruction here issues");
        let start_exec = record.start_exec.expect("every instruction here dispatches");
        let write_back = record.write_back.expect("every instruction here writes back");
        let commit = record.commit.expect("every instruction here commits");
        assert!(start_exec > issue);
        assert!(write_back > start_exec);
        assert!(commit >= write_back);
    }
}

#[test]
fn mul_has_only_one_functional_unit_so_back_to_back_muls_serialize() {
    let mut sim = common::load(
        "LOAD R1,0(R0)\nLOAD R2,1(R0)\nLOAD R4,2(R0)\nLOAD R5,3(R0)\nMUL R3,R1,R2\nMUL R6,R4,R5\n",
        &[(0, 3), (1, 4), (2, 5), (3, 6)],
    );
    let snap = common::run_to_completion(&mut sim);

    assert_eq!(snap.registers[3], 12);
    assert_eq!(snap.registers[6], 30);

    // Instruction ids: the two MULs are the last two instructions issued.
    let first_mul = &snap.timing[4];
    let second_mul = &snap.timing[5];
    // Only one MUL reservation station and one MUL functional unit exist,
    // so the second MUL cannot even issue until the first's station frees
    // — which happens no earlier than the first MUL's write-back.
    assert!(second_mul.issue.unwrap() >= first_mul.write_back.unwrap());
    assert!(sim.stats().stalls_resource > 0);
}

#[test]
fn store_writes_memory_only_at_commit_not_at_functional_unit_completion() {
    // MUL (latency 12) is issued before STORE (latency 6) and is therefore
    // older in the ROB; in-order commit holds STORE back even though its
    // functional unit finishes well before MUL's does.
    let mut sim = common::load("LOAD R1,0(R0)\nMUL R2,R1,R1\nSTORE R1,5(R0)\n", &[(0, 7)]);

    let before_commit = common::run_until(&mut sim, |snap| {
        snap.rob_entries
            .iter()
            .any(|e| e.opcode == Opcode::Store && e.ready)
    });
    assert!(
        !before_commit.memory.iter().any(|&(addr, _)| addr == 5),
        "store must not be visible in memory before it commits"
    );

    let after = common::run_to_completion(&mut sim);
    assert_eq!(
        after.memory.iter().find(|&&(addr, _)| addr == 5).map(|&(_, v)| v),
        Some(7)
    );
}

#[test]
fn beq_not_taken_falls_through_and_is_never_flagged_mispredicted() {
    let mut sim = common::load(
        "LOAD R1,0(R0)\nLOAD R2,1(R0)\nBEQ R1,R2,5\nADD R3,R1,R2\n",
        &[(0, 1), (1, 2)],
    );
    let snap = common::run_to_completion(&mut sim);

    assert_eq!(snap.registers[3], 3);
    assert_eq!(sim.stats().branch_correct, 1);
    assert_eq!(sim.stats().branch_mispredicted, 0);
}

#[test]
fn beq_taken_flushes_the_wrong_path_before_it_ever_commits() {
    let mut sim = common::load(
        "LOAD R1,0(R0)\nLOAD R2,1(R0)\nBEQ R1,R2,TARGET\nADD R4,R1,R1\nTARGET: ADD R5,R2,R2\n",
        &[(0, 3), (1, 3)],
    );
    let snap = common::run_to_completion(&mut sim);

    // The wrong-path ADD writes R4; registers only change at commit, and a
    // flushed ROB entry never reaches commit, so R4 must stay at its reset
    // value no matter how far the wrong-path instruction got before the
    // flush caught it.
    assert_eq!(snap.registers[4], 0);
    assert_eq!(snap.registers[5], 6);
    assert_eq!(sim.stats().branch_mispredicted, 1);
    assert_eq!(sim.stats().branch_correct, 0);
}

#[test]
fn call_writes_return_address_and_ret_redirects_to_it() {
    let mut sim = common::load(
        "LOAD R2,0(R0)\nCALL FUNC\nADD R3,R2,R2\nFUNC: ADD R4,R2,R2\nRET\n",
        &[(0, 10)],
    );
    let snap = common::run_until(&mut sim, |snap| snap.registers[3] != 0 && snap.registers[4] != 0);

    assert_eq!(snap.registers[1], 2, "CALL writes pc + 1 into R1");
    assert_eq!(snap.registers[4], 20, "the subroutine body ran");
    assert_eq!(snap.registers[3], 20, "RET landed back on CALL's successor");
}

#[test]
fn simultaneous_completions_contend_for_the_single_cdb() {
    // Two independent LOADs (2 units, same latency) finish the same cycle,
    // and once both have broadcast, two independent NANDs (2 units, latency
    // 1) that both depend on them become ready and finish the same cycle
    // too. Both pairs must arbitrate for the bus one cycle apart.
    let mut sim = common::load(
        "LOAD R1,0(R0)\nLOAD R2,1(R0)\nNAND R3,R1,R2\nNAND R4,R1,R2\n",
        &[(0, 5), (1, 3)],
    );
    let snap = common::run_to_completion(&mut sim);

    let expected = !(5u16 & 3u16);
    assert_eq!(snap.registers[3], expected);
    assert_eq!(snap.registers[4], expected);
    assert!(sim.stats().cdb_contentions > 0);
}
