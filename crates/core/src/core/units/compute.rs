//! Per-opcode arithmetic and branch-outcome computation.
//!
//! Called exactly once, when a functional unit's countdown reaches zero.
//! Pure given its inputs except for LOAD, which reads [`Memory`] at this
//! point rather than at dispatch — the address/data split the spec
//! describes is cosmetic timing, not a real two-stage pipeline.

use crate::core::memory::Memory;
use crate::core::pipeline::types::{BranchOutcome, CapturedOperands, CompletionValue};
use crate::isa::Opcode;

/// Computes the result of one functional unit's work.
#[must_use]
pub fn execute(opcode: Opcode, operands: &CapturedOperands, memory: &Memory) -> CompletionValue {
    match opcode {
        Opcode::Add => CompletionValue::Value(operands.vj.wrapping_add(operands.vk)),
        Opcode::Sub => CompletionValue::Value(operands.vj.wrapping_sub(operands.vk)),
        Opcode::Nand => CompletionValue::Value(!(operands.vj & operands.vk)),
        Opcode::Mul => {
            let product = u32::from(operands.vj) * u32::from(operands.vk);
            CompletionValue::Value((product & 0xFFFF) as u16)
        }
        Opcode::Load => {
            let address = address_of(operands);
            CompletionValue::Value(memory.read(address))
        }
        Opcode::Store => {
            let address = address_of(operands);
            CompletionValue::Store {
                address,
                value: operands.vk,
            }
        }
        Opcode::Beq => {
            let taken = operands.vj == operands.vk;
            let offset = i32::from(operands.imm.unwrap_or(0));
            let not_taken_target = operands.pc + 1;
            let taken_target = (operands.pc as i32 + 1 + offset) as usize;
            CompletionValue::Branch(BranchOutcome {
                taken,
                target: if taken { taken_target } else { not_taken_target },
                return_address: None,
            })
        }
        Opcode::Call => {
            let return_address = (operands.pc + 1) as u16;
            CompletionValue::Branch(BranchOutcome {
                taken: true,
                target: operands.target.unwrap_or(operands.pc + 1),
                return_address: Some(return_address),
            })
        }
        Opcode::Ret => CompletionValue::Branch(BranchOutcome {
            taken: true,
            target: operands.vj as usize,
            return_address: None,
        }),
    }
}

fn address_of(operands: &CapturedOperands) -> u16 {
    let offset = i32::from(operands.imm.unwrap_or(0));
    (i32::from(operands.vj) + offset) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::types::CapturedOperands;
    use rstest::rstest;

    fn operands(vj: u16, vk: u16, imm: Option<i16>) -> CapturedOperands {
        CapturedOperands {
            vj,
            vk,
            imm,
            target: None,
            pc: 0,
            dest_rob: 0,
        }
    }

    #[test]
    fn mul_wraps_to_low_16_bits() {
        let result = execute(Opcode::Mul, &operands(1000, 1000, None), &Memory::new());
        assert_eq!(result, CompletionValue::Value(1_000_000u32 as u16));
    }

    #[test]
    fn nand_self_check() {
        let result = execute(Opcode::Nand, &operands(0xFFFF, 0xFFFF, None), &Memory::new());
        assert_eq!(result, CompletionValue::Value(0));
    }

    #[test]
    fn beq_equal_with_zero_offset_is_taken() {
        let result = execute(Opcode::Beq, &operands(5, 5, Some(0)), &Memory::new());
        match result {
            CompletionValue::Branch(outcome) => assert!(outcome.taken),
            CompletionValue::Value(_) | CompletionValue::Store { .. } => panic!("expected branch"),
        }
    }

    #[rstest]
    #[case::add(Opcode::Add, 4, 3, 7)]
    #[case::sub(Opcode::Sub, 4, 3, 1)]
    #[case::sub_wraps(Opcode::Sub, 0, 1, 0xFFFF)]
    #[case::nand(Opcode::Nand, 0b1100, 0b1010, !0b1000u16)]
    #[case::nand_all_zero_operands(Opcode::Nand, 0, 0, 0xFFFF)]
    fn arithmetic_table(#[case] opcode: Opcode, #[case] vj: u16, #[case] vk: u16, #[case] expected: u16) {
        let result = execute(opcode, &operands(vj, vk, None), &Memory::new());
        assert_eq!(result, CompletionValue::Value(expected));
    }

    #[rstest]
    #[case::equal_offset_forward(5, 5, 3, true, 4)]
    #[case::unequal_falls_through(5, 6, 3, false, 1)]
    fn beq_table(
        #[case] vj: u16,
        #[case] vk: u16,
        #[case] offset: i16,
        #[case] expect_taken: bool,
        #[case] expect_target: usize,
    ) {
        let result = execute(Opcode::Beq, &operands(vj, vk, Some(offset)), &Memory::new());
        let CompletionValue::Branch(outcome) = result else {
            panic!("expected branch");
        };
        assert_eq!(outcome.taken, expect_taken);
        assert_eq!(outcome.target, expect_target);
    }
}
