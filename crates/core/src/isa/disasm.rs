//! Rendering an [`Instruction`] back to assembly source text.
//!
//! Used by the parse → render → parse round-trip law: `render` followed by
//! `parse_program` must reproduce the same instruction sequence (modulo
//! comments, whitespace, and the specific label spelling chosen here).

use super::instruction::{Instruction, Program};
use super::opcode::Opcode;
use std::fmt::Write as _;

/// Renders a single instruction as one line of assembly, without a label
/// prefix. BEQ/CALL targets are rendered as the resolved program index
/// rather than the original label spelling, since labels are not retained
/// once all references are resolved except for display purposes.
#[must_use]
pub fn render_instruction(instruction: &Instruction) -> String {
    match instruction.opcode {
        Opcode::Add | Opcode::Sub | Opcode::Nand | Opcode::Mul => format!(
            "{} R{},R{},R{}",
            instruction.opcode.mnemonic(),
            instruction.ra.unwrap_or(0),
            instruction.rb.unwrap_or(0),
            instruction.rc.unwrap_or(0),
        ),
        Opcode::Load | Opcode::Store => format!(
            "{} R{},{}(R{})",
            instruction.opcode.mnemonic(),
            instruction.ra.unwrap_or(0),
            instruction.imm.unwrap_or(0),
            instruction.rb.unwrap_or(0),
        ),
        Opcode::Beq => format!(
            "BEQ R{},R{},{}",
            instruction.ra.unwrap_or(0),
            instruction.rb.unwrap_or(0),
            instruction.imm.unwrap_or(0),
        ),
        Opcode::Call => format!("CALL {}", instruction.target.unwrap_or(0)),
        Opcode::Ret => "RET".to_string(),
    }
}

/// Renders a whole program, one instruction per line.
#[must_use]
pub fn render_program(program: &Program) -> String {
    let mut out = String::new();
    for instruction in &program.instructions {
        let _ = writeln!(out, "{}", render_instruction(instruction));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::super::parser::parse_program;
    use super::*;

    #[test]
    fn round_trips_through_render_and_reparse() {
        let source = "LOAD R1,0(R0)\nLOAD R2,4(R0)\nADD R3,R1,R2\nSTORE R3,8(R0)\nBEQ R1,R2,0\nRET\n";
        let program = parse_program(source).unwrap();
        let rendered = render_program(&program);
        let reparsed = parse_program(&rendered).unwrap();
        assert_eq!(program.len(), reparsed.len());
        for (a, b) in program.instructions.iter().zip(reparsed.instructions.iter()) {
            assert_eq!(a.opcode, b.opcode);
            assert_eq!(a.ra, b.ra);
            assert_eq!(a.rb, b.rb);
            assert_eq!(a.rc, b.rc);
            assert_eq!(a.imm, b.imm);
            assert_eq!(a.target, b.target);
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::super::instruction::InstructionId;
    use super::super::parser::parse_program;
    use super::*;
    use proptest::prelude::*;

    fn arith_opcode() -> impl Strategy<Value = Opcode> {
        prop_oneof![
            Just(Opcode::Add),
            Just(Opcode::Sub),
            Just(Opcode::Nand),
            Just(Opcode::Mul),
        ]
    }

    proptest! {
        /// Any ADD/SUB/NAND/MUL over any register triple renders to a line
        /// that reparses back to the same opcode and registers.
        #[test]
        fn arithmetic_instructions_round_trip(
            opcode in arith_opcode(),
            ra in 0usize..8,
            rb in 0usize..8,
            rc in 0usize..8,
        ) {
            let instruction = Instruction {
                id: InstructionId(0),
                pc: 0,
                opcode,
                ra: Some(ra),
                rb: Some(rb),
                rc: Some(rc),
                imm: None,
                target: None,
                label: None,
            };
            let rendered = render_instruction(&instruction);
            let reparsed = parse_program(&format!("{rendered}\n")).unwrap();
            let back = reparsed.get(0).unwrap();
            prop_assert_eq!(back.opcode, opcode);
            prop_assert_eq!(back.ra, Some(ra));
            prop_assert_eq!(back.rb, Some(rb));
            prop_assert_eq!(back.rc, Some(rc));
        }

        /// Any signed 16-bit LOAD/STORE offset survives a render/reparse pass.
        #[test]
        fn load_store_offsets_round_trip(
            opcode in prop_oneof![Just(Opcode::Load), Just(Opcode::Store)],
            ra in 0usize..8,
            rb in 0usize..8,
            imm in -1000i16..1000,
        ) {
            let instruction = Instruction {
                id: InstructionId(0),
                pc: 0,
                opcode,
                ra: Some(ra),
                rb: Some(rb),
                rc: None,
                imm: Some(imm),
                target: None,
                label: None,
            };
            let rendered = render_instruction(&instruction);
            let reparsed = parse_program(&format!("{rendered}\n")).unwrap();
            let back = reparsed.get(0).unwrap();
            prop_assert_eq!(back.imm, Some(imm));
            prop_assert_eq!(back.rb, Some(rb));
        }
    }
}
